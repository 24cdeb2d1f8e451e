//! Pajek vertex/edge network files.
//!
//! The layout written here is what the external clustering tool consumes:
//!
//! ```text
//! *Vertices 4
//! 1 "Sp1"
//! 2 "Sp2"
//! 3 "A"
//! 4 "B"
//! *Edges 3
//! 1 3 10
//! 2 3 15
//! 1 4 1
//! ```
//!
//! Species take ids `1..=S` and sites `S+1..=S+T`; every edge runs from a
//! species to a site and carries the abundance, or `1` when none was given.

use std::{
    collections::HashMap,
    io::{BufRead, Write},
};

use biogeonet_core::{Occurrence, OccurrenceRelation};
use tracing::{info, instrument};

use crate::errors::NetworkFormatError;

/// Sizes of a written or parsed network.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct NetworkCounts {
    /// Species vertices.
    pub species: usize,
    /// Site vertices.
    pub sites: usize,
    /// Edges, one per relation row.
    pub edges: usize,
}

/// Writes `relation` as a Pajek network.
///
/// # Errors
/// Returns [`NetworkFormatError::UnwritableLabel`] when a label is empty,
/// holds a double quote or line break, or is used as both a site and a
/// species; returns [`NetworkFormatError::Io`] when writing fails.
#[instrument(name = "network.write_pajek", err, skip(relation, writer), fields(rows = relation.len()))]
pub fn write_pajek<W: Write>(
    relation: &OccurrenceRelation,
    mut writer: W,
) -> Result<NetworkCounts, NetworkFormatError> {
    let species = relation.species();
    let sites = relation.sites();
    for label in species.iter().chain(sites) {
        check_label(label)?;
    }
    if let Some(label) = relation.bipartite_violations().first() {
        return Err(NetworkFormatError::UnwritableLabel {
            label: (*label).to_owned(),
            reason: "used as both a site and a species",
        });
    }

    let ids: HashMap<&str, usize> = species
        .iter()
        .chain(sites)
        .enumerate()
        .map(|(offset, label)| (label.as_str(), offset + 1))
        .collect();

    writeln!(writer, "*Vertices {}", species.len() + sites.len())?;
    for (offset, label) in species.iter().chain(sites).enumerate() {
        writeln!(writer, "{} \"{label}\"", offset + 1)?;
    }
    writeln!(writer, "*Edges {}", relation.len())?;
    for row in relation.rows() {
        // Labels come from the relation itself, so both lookups succeed.
        let (Some(from), Some(to)) = (ids.get(row.species()), ids.get(row.site())) else {
            continue;
        };
        writeln!(writer, "{from} {to} {}", row.weight())?;
    }
    writer.flush()?;

    let counts = NetworkCounts {
        species: species.len(),
        sites: sites.len(),
        edges: relation.len(),
    };
    info!(
        species = counts.species,
        sites = counts.sites,
        edges = counts.edges,
        "network written"
    );
    Ok(counts)
}

/// Reads a Pajek network back into an occurrence relation.
///
/// The first endpoint of every edge is taken as the species and the second
/// as the site. A missing weight reads as `1`. Blank lines and lines
/// starting with `%` are ignored; `*Arcs` is accepted in place of `*Edges`.
///
/// # Errors
/// Returns [`NetworkFormatError`] when a section is missing, a line is
/// malformed, an edge names an undeclared vertex, the vertex count does
/// not match, or reading fails.
#[instrument(name = "network.read_pajek", err, skip(reader))]
pub fn read_pajek<R: BufRead>(reader: R) -> Result<OccurrenceRelation, NetworkFormatError> {
    let mut declared: Option<usize> = None;
    let mut labels: Vec<Option<String>> = Vec::new();
    let mut in_edges = false;
    let mut rows = Vec::new();

    for (index, line) in reader.lines().enumerate() {
        let line_no = index + 1;
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() || trimmed.starts_with('%') {
            continue;
        }
        if let Some(header) = trimmed.strip_prefix('*') {
            let mut parts = header.split_whitespace();
            let keyword = parts.next().unwrap_or_default().to_ascii_lowercase();
            match keyword.as_str() {
                "vertices" => {
                    let count = parts
                        .next()
                        .and_then(|raw| raw.parse::<usize>().ok())
                        .ok_or_else(|| malformed(line_no, "vertex count is missing or invalid"))?;
                    declared = Some(count);
                    labels = vec![None; count];
                }
                "edges" | "arcs" => {
                    let count = declared.ok_or(NetworkFormatError::MissingSection {
                        section: "*Vertices",
                    })?;
                    let listed = labels.iter().filter(|label| label.is_some()).count();
                    if listed != count {
                        return Err(NetworkFormatError::VertexCountMismatch {
                            declared: count,
                            listed,
                        });
                    }
                    in_edges = true;
                }
                _ => return Err(malformed(line_no, format!("unknown section `*{keyword}`"))),
            }
            continue;
        }

        if in_edges {
            rows.push(parse_edge(trimmed, line_no, &labels)?);
        } else if declared.is_some() {
            let (id, label) = parse_vertex(trimmed, line_no)?;
            let slot = id
                .checked_sub(1)
                .and_then(|position| labels.get_mut(position))
                .ok_or_else(|| malformed(line_no, format!("vertex id {id} is out of range")))?;
            *slot = Some(label);
        } else {
            return Err(NetworkFormatError::MissingSection {
                section: "*Vertices",
            });
        }
    }

    if !in_edges {
        return Err(NetworkFormatError::MissingSection { section: "*Edges" });
    }
    let relation = OccurrenceRelation::new(rows);
    info!(
        edges = relation.len(),
        sites = relation.sites().len(),
        species = relation.species().len(),
        "network read"
    );
    Ok(relation)
}

fn check_label(label: &str) -> Result<(), NetworkFormatError> {
    let reason = if label.is_empty() {
        "empty label"
    } else if label.contains('"') {
        "contains a double quote"
    } else if label.contains(['\n', '\r']) {
        "contains a line break"
    } else {
        return Ok(());
    };
    Err(NetworkFormatError::UnwritableLabel {
        label: label.to_owned(),
        reason,
    })
}

fn parse_vertex(line: &str, line_no: usize) -> Result<(usize, String), NetworkFormatError> {
    let (raw_id, rest) = line
        .split_once(char::is_whitespace)
        .ok_or_else(|| malformed(line_no, "vertex line needs an id and a label"))?;
    let id = raw_id
        .parse::<usize>()
        .map_err(|_| malformed(line_no, format!("invalid vertex id `{raw_id}`")))?;
    let rest = rest.trim_start();
    let label = match rest.strip_prefix('"') {
        Some(quoted) => quoted
            .split_once('"')
            .map(|(label, _)| label)
            .ok_or_else(|| malformed(line_no, "unterminated quoted label"))?,
        None => rest.split_whitespace().next().unwrap_or_default(),
    };
    if label.is_empty() {
        return Err(malformed(line_no, "empty vertex label"));
    }
    Ok((id, label.to_owned()))
}

fn parse_edge(
    line: &str,
    line_no: usize,
    labels: &[Option<String>],
) -> Result<Occurrence, NetworkFormatError> {
    let mut parts = line.split_whitespace();
    let species = endpoint(parts.next(), line_no, labels)?;
    let site = endpoint(parts.next(), line_no, labels)?;
    let weight = match parts.next() {
        Some(raw) => raw
            .parse::<f64>()
            .ok()
            .filter(|value| value.is_finite() && *value >= 0.0)
            .ok_or_else(|| malformed(line_no, format!("invalid edge weight `{raw}`")))?,
        None => 1.0,
    };
    Ok(Occurrence::new(site, species).with_abundance(weight))
}

fn endpoint<'l>(
    raw: Option<&str>,
    line_no: usize,
    labels: &'l [Option<String>],
) -> Result<&'l str, NetworkFormatError> {
    let raw = raw.ok_or_else(|| malformed(line_no, "edge line needs two vertex ids"))?;
    let id = raw
        .parse::<usize>()
        .map_err(|_| malformed(line_no, format!("invalid vertex id `{raw}`")))?;
    id.checked_sub(1)
        .and_then(|position| labels.get(position))
        .and_then(Option::as_deref)
        .ok_or(NetworkFormatError::UnknownVertex { line: line_no, id })
}

fn malformed(line: usize, message: impl Into<String>) -> NetworkFormatError {
    NetworkFormatError::Malformed {
        line,
        message: message.into(),
    }
}
