//! The bipartite site–species occurrence relation.
//!
//! [`OccurrenceRelation`] keeps the rows exactly as supplied and builds a
//! site → species and species → site index once, so every per-node metric
//! scans only the neighbours of that node instead of the whole relation.

use std::collections::{HashMap, HashSet};

use crate::error::MetricsError;

/// One row of the occurrence relation.
///
/// # Examples
/// ```
/// use biogeonet_core::Occurrence;
///
/// let row = Occurrence::new("A", "Sp1").with_abundance(10.0);
/// assert_eq!(row.site(), "A");
/// assert_eq!(row.weight(), 10.0);
/// assert_eq!(Occurrence::new("A", "Sp2").weight(), 1.0);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct Occurrence {
    site: String,
    species: String,
    abundance: Option<f64>,
}

impl Occurrence {
    /// Creates a presence-only occurrence.
    #[must_use]
    pub fn new(site: impl Into<String>, species: impl Into<String>) -> Self {
        Self {
            site: site.into(),
            species: species.into(),
            abundance: None,
        }
    }

    /// Attaches an abundance value.
    #[must_use]
    pub fn with_abundance(mut self, abundance: f64) -> Self {
        self.abundance = Some(abundance);
        self
    }

    /// Site label.
    #[must_use]
    pub fn site(&self) -> &str {
        &self.site
    }

    /// Species label.
    #[must_use]
    pub fn species(&self) -> &str {
        &self.species
    }

    /// Abundance, when one was supplied.
    #[must_use]
    pub fn abundance(&self) -> Option<f64> {
        self.abundance
    }

    /// Edge weight: the abundance, or `1.0` when absent.
    #[must_use]
    pub fn weight(&self) -> f64 {
        self.abundance.unwrap_or(1.0)
    }
}

/// Read-only bipartite occurrence relation with neighbour indices.
///
/// Distinct site and species labels are kept in first-appearance order.
/// Neighbour lists are deduplicated: a site–species pair listed twice is one
/// link.
///
/// # Examples
/// ```
/// use biogeonet_core::{Occurrence, OccurrenceRelation};
///
/// let relation = OccurrenceRelation::new(vec![
///     Occurrence::new("A", "Sp1"),
///     Occurrence::new("A", "Sp2"),
///     Occurrence::new("B", "Sp1"),
/// ]);
/// assert_eq!(relation.sites(), ["A", "B"]);
/// assert_eq!(relation.species(), ["Sp1", "Sp2"]);
/// assert_eq!(relation.species_at("A").collect::<Vec<_>>(), ["Sp1", "Sp2"]);
/// assert_eq!(relation.sites_of("Sp1").collect::<Vec<_>>(), ["A", "B"]);
/// ```
#[derive(Clone, Debug, Default)]
pub struct OccurrenceRelation {
    rows: Vec<Occurrence>,
    sites: Vec<String>,
    species: Vec<String>,
    site_index: HashMap<String, usize>,
    species_index: HashMap<String, usize>,
    site_neighbours: Vec<Vec<usize>>,
    species_neighbours: Vec<Vec<usize>>,
}

impl OccurrenceRelation {
    /// Builds the relation and its neighbour indices in one pass.
    #[must_use]
    pub fn new(rows: Vec<Occurrence>) -> Self {
        let mut relation = Self::default();
        let mut seen_pairs = HashSet::new();
        for row in &rows {
            let site = intern(&mut relation.sites, &mut relation.site_index, row.site());
            let species = intern(
                &mut relation.species,
                &mut relation.species_index,
                row.species(),
            );
            if relation.site_neighbours.len() < relation.sites.len() {
                relation.site_neighbours.push(Vec::new());
            }
            if relation.species_neighbours.len() < relation.species.len() {
                relation.species_neighbours.push(Vec::new());
            }
            if seen_pairs.insert((site, species)) {
                relation.site_neighbours[site].push(species);
                relation.species_neighbours[species].push(site);
            }
        }
        relation.rows = rows;
        relation
    }

    /// Convenience constructor from `(site, species, abundance)` triples.
    #[must_use]
    pub fn from_triples<'a, I>(triples: I) -> Self
    where
        I: IntoIterator<Item = (&'a str, &'a str, Option<f64>)>,
    {
        Self::new(
            triples
                .into_iter()
                .map(|(site, species, abundance)| {
                    let row = Occurrence::new(site, species);
                    match abundance {
                        Some(value) => row.with_abundance(value),
                        None => row,
                    }
                })
                .collect(),
        )
    }

    /// Rows in input order.
    #[must_use]
    pub fn rows(&self) -> &[Occurrence] {
        &self.rows
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the relation has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Distinct site labels in first-appearance order.
    #[must_use]
    pub fn sites(&self) -> &[String] {
        &self.sites
    }

    /// Distinct species labels in first-appearance order.
    #[must_use]
    pub fn species(&self) -> &[String] {
        &self.species
    }

    /// Whether `label` occurs in the site column.
    #[must_use]
    pub fn is_site(&self, label: &str) -> bool {
        self.site_index.contains_key(label)
    }

    /// Whether `label` occurs in the species column.
    #[must_use]
    pub fn is_species(&self, label: &str) -> bool {
        self.species_index.contains_key(label)
    }

    /// Distinct species observed at `site`; empty for unknown sites.
    pub fn species_at<'a>(&'a self, site: &str) -> impl Iterator<Item = &'a str> + use<'a> {
        let neighbours = self
            .site_index
            .get(site)
            .and_then(|&index| self.site_neighbours.get(index))
            .map_or(&[][..], Vec::as_slice);
        neighbours
            .iter()
            .filter_map(|&index| self.species.get(index).map(String::as_str))
    }

    /// Distinct sites where `species` occurs; empty for unknown species.
    pub fn sites_of<'a>(&'a self, species: &str) -> impl Iterator<Item = &'a str> + use<'a> {
        let neighbours = self
            .species_index
            .get(species)
            .and_then(|&index| self.species_neighbours.get(index))
            .map_or(&[][..], Vec::as_slice);
        neighbours
            .iter()
            .filter_map(|&index| self.sites.get(index).map(String::as_str))
    }

    /// Species indices neighbouring the site at `site_index`.
    pub(crate) fn site_neighbour_indices(&self, site_index: usize) -> &[usize] {
        self.site_neighbours
            .get(site_index)
            .map_or(&[][..], Vec::as_slice)
    }

    /// Site indices neighbouring the species at `species_index`.
    pub(crate) fn species_neighbour_indices(&self, species_index: usize) -> &[usize] {
        self.species_neighbours
            .get(species_index)
            .map_or(&[][..], Vec::as_slice)
    }

    /// Labels used both as a site and as a species, in site order.
    #[must_use]
    pub fn bipartite_violations(&self) -> Vec<&str> {
        self.sites
            .iter()
            .filter(|site| self.species_index.contains_key(site.as_str()))
            .map(String::as_str)
            .collect()
    }

    /// Fails when any label is both a site and a species.
    ///
    /// # Errors
    /// Returns [`MetricsError::BipartiteViolation`] listing the shared labels.
    pub fn ensure_bipartite(&self) -> Result<(), MetricsError> {
        let labels = self.bipartite_violations();
        match labels.first() {
            None => Ok(()),
            Some(first) => Err(MetricsError::BipartiteViolation {
                count: labels.len(),
                first: (*first).to_owned(),
                labels: labels.iter().map(|label| (*label).to_owned()).collect(),
            }),
        }
    }
}

fn intern(labels: &mut Vec<String>, index: &mut HashMap<String, usize>, label: &str) -> usize {
    if let Some(&position) = index.get(label) {
        return position;
    }
    let position = labels.len();
    labels.push(label.to_owned());
    index.insert(label.to_owned(), position);
    position
}
