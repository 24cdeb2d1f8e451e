//! GDF graph-exchange files annotated with hierarchy levels and colours.

use std::{borrow::Cow, io::Write};

use biogeonet_core::{Color, DerivedColumn, OccurrenceRelation, PartitionTable};
use tracing::{info, instrument, warn};

use crate::errors::NetworkFormatError;

/// Options for [`write_gdf`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GdfOptions {
    color_column: Option<String>,
    raw_colors: bool,
    directed: bool,
}

impl GdfOptions {
    /// No colour field, colours converted when present, undirected edges.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a `color` node field taken from the named derived text column.
    #[must_use]
    pub fn with_color_column(mut self, name: impl Into<String>) -> Self {
        self.color_column = Some(name.into());
        self
    }

    /// Writes colour values as stored instead of converting them to
    /// quoted `'r,g,b'` triplets.
    #[must_use]
    pub fn with_raw_colors(mut self, raw: bool) -> Self {
        self.raw_colors = raw;
        self
    }

    /// Adds a `directed` edge field.
    #[must_use]
    pub fn with_directed(mut self, directed: bool) -> Self {
        self.directed = directed;
        self
    }
}

/// Sizes of a written GDF file.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GdfCounts {
    /// Node rows written.
    pub nodes: usize,
    /// Edge rows written.
    pub edges: usize,
    /// Relation rows skipped because an endpoint is not a table node.
    pub skipped_edges: usize,
}

/// Writes the partition table as GDF nodes and the relation as GDF edges.
///
/// Nodes are identified by their hierarchy node id and carry their label
/// and one field per level. Each relation row becomes an edge from the
/// site to the species with its weight rounded to an integer.
///
/// # Errors
/// Returns [`NetworkFormatError::ColorColumn`] when the colour column is
/// missing or numeric, [`NetworkFormatError::Color`] when a colour cannot
/// be converted, and [`NetworkFormatError::Io`] when writing fails.
#[instrument(
    name = "network.write_gdf",
    err,
    skip(table, relation, options, writer),
    fields(nodes = table.len(), rows = relation.len(), directed = options.directed),
)]
pub fn write_gdf<W: Write>(
    table: &PartitionTable,
    relation: &OccurrenceRelation,
    options: &GdfOptions,
    mut writer: W,
) -> Result<GdfCounts, NetworkFormatError> {
    let colors = color_values(table, options)?;

    let mut header = String::from("nodedef>name VARCHAR,label VARCHAR");
    for column in table.levels() {
        header.push_str(&format!(",{} VARCHAR", column.level()));
    }
    if colors.is_some() {
        header.push_str(",color VARCHAR");
    }
    writeln!(writer, "{header}")?;

    for (row, node) in table.rows().iter().enumerate() {
        let mut line = format!("{},{}", node.node_id(), field(node.name()));
        for column in table.levels() {
            line.push(',');
            line.push_str(&field(column.value(row).unwrap_or_default()));
        }
        if let Some(colors) = &colors {
            line.push(',');
            line.push_str(colors.get(row).map_or("", String::as_str));
        }
        writeln!(writer, "{line}")?;
    }

    if options.directed {
        writeln!(
            writer,
            "edgedef>node1 VARCHAR,node2 VARCHAR,weight INTEGER,directed BOOLEAN"
        )?;
    } else {
        writeln!(writer, "edgedef>node1 VARCHAR,node2 VARCHAR,weight INTEGER")?;
    }
    let mut edges = 0;
    let mut skipped_edges = 0;
    for occurrence in relation.rows() {
        let endpoints = table
            .position(occurrence.site())
            .zip(table.position(occurrence.species()))
            .and_then(|(site, species)| table.rows().get(site).zip(table.rows().get(species)));
        let Some((site, species)) = endpoints else {
            skipped_edges += 1;
            continue;
        };
        let weight = occurrence.weight().round();
        if options.directed {
            writeln!(writer, "{},{},{weight:.0},true", site.node_id(), species.node_id())?;
        } else {
            writeln!(writer, "{},{},{weight:.0}", site.node_id(), species.node_id())?;
        }
        edges += 1;
    }
    writer.flush()?;

    if skipped_edges > 0 {
        warn!(skipped_edges, "relation rows without hierarchy nodes left out");
    }
    info!(nodes = table.len(), edges, "gdf written");
    Ok(GdfCounts {
        nodes: table.len(),
        edges,
        skipped_edges,
    })
}

fn color_values(
    table: &PartitionTable,
    options: &GdfOptions,
) -> Result<Option<Vec<String>>, NetworkFormatError> {
    let Some(name) = options.color_column.as_deref() else {
        return Ok(None);
    };
    let Some(DerivedColumn::Text(values)) = table.derived(name) else {
        return Err(NetworkFormatError::ColorColumn {
            name: name.to_owned(),
        });
    };
    values
        .iter()
        .map(|value| -> Result<String, NetworkFormatError> {
            match value.as_deref() {
                None => Ok(String::new()),
                Some(raw) if options.raw_colors => Ok(field(raw).into_owned()),
                Some(raw) => Ok(raw.parse::<Color>()?.gdf_literal()),
            }
        })
        .collect::<Result<Vec<_>, _>>()
        .map(Some)
}

/// Quotes values holding a separator or quote.
fn field(value: &str) -> Cow<'_, str> {
    if value.contains([',', '\'', '"']) {
        Cow::Owned(format!("'{}'", value.replace('\'', "\\'")))
    } else {
        Cow::Borrowed(value)
    }
}
