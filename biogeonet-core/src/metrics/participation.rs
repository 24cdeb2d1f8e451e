//! Participation coefficient.

use tracing::{info, instrument};

use crate::{
    diagnostics::{Diagnostic, DiagnosticsReport, Reported},
    error::MetricsError,
    partition::NodeType,
};

use super::{ClusterMetrics, MetricsIndex, map_indexed};

/// Participation of one node of the relation.
#[derive(Clone, Debug, PartialEq)]
pub struct Participation {
    /// Node label.
    pub node: String,
    /// Whether the node is a site or a species.
    pub node_type: NodeType,
    /// Number of distinct neighbours.
    pub degree: usize,
    /// Neighbours with a cluster at the chosen level.
    pub assigned: usize,
    /// `1 − Σ (n_j / n)²`; `NaN` when no neighbour is assigned.
    pub coefficient: f64,
}

/// Participation coefficient of a node whose neighbours fall into groups of
/// the given sizes.
///
/// # Examples
/// ```
/// use biogeonet_core::participation_coefficient;
///
/// assert_eq!(participation_coefficient(&[10]), 0.0);
/// assert_eq!(participation_coefficient(&[5, 5]), 0.5);
/// assert!(participation_coefficient(&[]).is_nan());
/// ```
#[must_use]
pub fn participation_coefficient(group_sizes: &[usize]) -> f64 {
    let total: usize = group_sizes.iter().sum();
    if total == 0 {
        return f64::NAN;
    }
    let total = total as f64;
    let concentration: f64 = group_sizes
        .iter()
        .map(|&size| {
            let share = size as f64 / total;
            share * share
        })
        .sum();
    1.0 - concentration
}

impl ClusterMetrics<'_> {
    /// Computes the participation coefficient of every site, then every
    /// species, in relation order.
    ///
    /// A site's species neighbours are grouped by the species' own cluster,
    /// and a species' site neighbours by the sites' own cluster. Neighbours
    /// without a cluster are left out of the groups, and nodes without a
    /// cluster of their own are skipped.
    ///
    /// # Errors
    /// Returns [`MetricsError::BipartiteViolation`] when a label is used as
    /// both a site and a species.
    #[instrument(
        name = "core.participation",
        err,
        skip(self),
        fields(level = %self.level, nodes = self.relation.sites().len() + self.relation.species().len()),
    )]
    pub fn participation_coefficients(&self) -> Result<Reported<Vec<Participation>>, MetricsError> {
        self.relation.ensure_bipartite()?;
        let mut index = self.build_index();
        let site_count = self.relation.sites().len();
        let total = site_count + self.relation.species().len();
        let computed = map_indexed(total, |node| {
            if node < site_count {
                self.participation_of_site(&index, node)
            } else {
                self.participation_of_species(&index, node - site_count)
            }
        });

        let mut report = DiagnosticsReport::new();
        let values: Vec<Participation> = computed
            .into_iter()
            .flatten()
            .map(|(participation, diagnostic)| {
                report.extend(diagnostic);
                participation
            })
            .collect();
        index.report.merge(report);
        info!(nodes = values.len(), "participation coefficients computed");
        index.report.summarise("participation");
        Ok(Reported::new(values, index.report))
    }

    fn participation_of_site(
        &self,
        index: &MetricsIndex,
        site: usize,
    ) -> Option<(Participation, Option<Diagnostic>)> {
        index.site_cluster(site)?;
        let label = self.relation.sites().get(site).cloned().unwrap_or_default();
        let neighbours = self.relation.site_neighbour_indices(site);
        let clusters = neighbours
            .iter()
            .filter_map(|&species| index.species_cluster(species));
        Some(participation(label, NodeType::Site, neighbours.len(), clusters))
    }

    fn participation_of_species(
        &self,
        index: &MetricsIndex,
        species: usize,
    ) -> Option<(Participation, Option<Diagnostic>)> {
        index.species_cluster(species)?;
        let label = self
            .relation
            .species()
            .get(species)
            .cloned()
            .unwrap_or_default();
        let neighbours = self.relation.species_neighbour_indices(species);
        let clusters = neighbours
            .iter()
            .filter_map(|&site| index.site_cluster(site));
        Some(participation(label, NodeType::Species, neighbours.len(), clusters))
    }
}

fn participation(
    node: String,
    node_type: NodeType,
    degree: usize,
    clusters: impl Iterator<Item = usize>,
) -> (Participation, Option<Diagnostic>) {
    let mut clusters: Vec<usize> = clusters.collect();
    clusters.sort_unstable();
    let assigned = clusters.len();
    let groups: Vec<usize> = clusters
        .chunk_by(|a, b| a == b)
        .map(<[usize]>::len)
        .collect();
    let coefficient = participation_coefficient(&groups);
    let diagnostic = coefficient.is_nan().then(|| Diagnostic::UndefinedMetric {
        entity: node.clone(),
        metric: "participation",
        cause: "no neighbour has a cluster",
    });
    let value = Participation {
        node,
        node_type,
        degree,
        assigned,
        coefficient,
    };
    (value, diagnostic)
}
