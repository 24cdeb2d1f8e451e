//! Tab-separated result tables.
//!
//! Missing values and undefined metrics are written as `NA`.

use std::io::Write;

use biogeonet_core::{
    ClusterColoring, OccurrenceIndices, Participation, PartitionTable, RegionStats, SiteStats,
    SpeciesStats,
};
use csv::WriterBuilder;

const MISSING: &str = "NA";

fn tsv<W: Write>(writer: W) -> csv::Writer<W> {
    WriterBuilder::new().delimiter(b'\t').from_writer(writer)
}

fn number(value: f64) -> String {
    if value.is_nan() {
        MISSING.to_owned()
    } else {
        value.to_string()
    }
}

fn optional(value: Option<f64>) -> String {
    value.map_or_else(|| MISSING.to_owned(), number)
}

fn text(value: Option<&str>) -> String {
    value.unwrap_or(MISSING).to_owned()
}

fn indices(indices: Option<&OccurrenceIndices>) -> [String; 6] {
    match indices {
        Some(i) => [i.ri, i.di, i.ai, i.fi, i.indval, i.dilval].map(number),
        None => std::array::from_fn(|_| MISSING.to_owned()),
    }
}

/// Writes the partition table: one row per node with its identity, type,
/// level columns and derived columns.
///
/// # Errors
/// Returns [`csv::Error`] when writing fails.
pub fn write_partition_table<W: Write>(table: &PartitionTable, writer: W) -> Result<(), csv::Error> {
    let mut out = tsv(writer);
    let derived: Vec<_> = table.derived_columns().collect();
    let mut header = vec![
        "name".to_owned(),
        "node_id".to_owned(),
        "code_length".to_owned(),
        "node_type".to_owned(),
    ];
    header.extend(table.levels().iter().map(|column| column.level().column_name()));
    header.extend(derived.iter().map(|(name, _)| (*name).to_owned()));
    out.write_record(&header)?;

    for (row, node) in table.rows().iter().enumerate() {
        let mut record = vec![
            node.name().to_owned(),
            node.node_id().to_string(),
            number(node.code_length()),
            node.node_type().as_str().to_owned(),
        ];
        record.extend(table.levels().iter().map(|column| text(column.value(row))));
        record.extend(
            derived
                .iter()
                .map(|(_, column)| column.display(row).unwrap_or_else(|| MISSING.to_owned())),
        );
        out.write_record(&record)?;
    }
    out.flush()?;
    Ok(())
}

/// Writes one row per cluster.
///
/// # Errors
/// Returns [`csv::Error`] when writing fails.
pub fn write_region_stats<W: Write>(regions: &[RegionStats], writer: W) -> Result<(), csv::Error> {
    let mut out = tsv(writer);
    out.write_record([
        "cluster",
        "sites",
        "area",
        "richness",
        "characteristic_richness",
        "endemic_richness",
        "nested_levels",
    ])?;
    for region in regions {
        out.write_record([
            region.cluster.clone(),
            region.sites.to_string(),
            optional(region.area),
            region.richness.to_string(),
            region.characteristic_richness.to_string(),
            region.endemic_richness.to_string(),
            region.nested_levels.to_string(),
        ])?;
    }
    out.flush()?;
    Ok(())
}

/// Writes one row per species with its occurrence and area indices.
///
/// # Errors
/// Returns [`csv::Error`] when writing fails.
pub fn write_species_stats<W: Write>(species: &[SpeciesStats], writer: W) -> Result<(), csv::Error> {
    let mut out = tsv(writer);
    out.write_record([
        "species", "cluster", "endemic", "ri", "di", "ai", "fi", "indval", "dilval", "ri_area",
        "di_area", "ai_area", "fi_area", "indval_area", "dilval_area",
    ])?;
    for stats in species {
        let mut record = vec![
            stats.species.clone(),
            stats.cluster.clone(),
            stats.endemic.to_string(),
        ];
        record.extend(indices(Some(&stats.occurrence)));
        record.extend(indices(stats.area.as_ref()));
        out.write_record(&record)?;
    }
    out.flush()?;
    Ok(())
}

/// Writes one row per clustered site with its robustness.
///
/// # Errors
/// Returns [`csv::Error`] when writing fails.
pub fn write_site_stats<W: Write>(sites: &[SiteStats], writer: W) -> Result<(), csv::Error> {
    let mut out = tsv(writer);
    out.write_record([
        "site",
        "cluster",
        "reference",
        "richness",
        "characteristic",
        "rg",
        "rrg",
        "rg_area",
        "rrg_area",
    ])?;
    for site in sites {
        out.write_record([
            site.site.clone(),
            site.cluster.clone(),
            site.reference.clone(),
            site.richness.to_string(),
            site.characteristic.to_string(),
            number(site.rg),
            number(site.rrg),
            optional(site.rg_area),
            optional(site.rrg_area),
        ])?;
    }
    out.flush()?;
    Ok(())
}

/// Writes one row per relation node with its participation coefficient.
///
/// # Errors
/// Returns [`csv::Error`] when writing fails.
pub fn write_participation<W: Write>(
    nodes: &[Participation],
    writer: W,
) -> Result<(), csv::Error> {
    let mut out = tsv(writer);
    out.write_record(["node", "node_type", "degree", "assigned", "participation"])?;
    for node in nodes {
        out.write_record([
            node.node.clone(),
            node.node_type.as_str().to_owned(),
            node.degree.to_string(),
            node.assigned.to_string(),
            number(node.coefficient),
        ])?;
    }
    out.flush()?;
    Ok(())
}

/// Writes the colour assigned to every ranked cluster.
///
/// # Errors
/// Returns [`csv::Error`] when writing fails.
pub fn write_coloring<W: Write>(coloring: &ClusterColoring, writer: W) -> Result<(), csv::Error> {
    let mut out = tsv(writer);
    out.write_record(["cluster", "rank", "color", "overflow"])?;
    for entry in coloring.entries() {
        out.write_record([
            entry.cluster.clone(),
            entry.rank.to_string(),
            entry.color.to_string(),
            entry.overflow.to_string(),
        ])?;
    }
    out.flush()?;
    Ok(())
}
