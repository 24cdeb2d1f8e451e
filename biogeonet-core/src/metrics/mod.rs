//! Cluster statistics over the bipartite relation partitioned by one level.
//!
//! [`ClusterMetrics`] binds a [`PartitionTable`], an [`OccurrenceRelation`]
//! and a [`LevelId`]. Every statistic is recomputed from scratch on request:
//!
//! - [`ClusterMetrics::region_stats`]: per-cluster site counts, areas and
//!   richness figures.
//! - [`ClusterMetrics::species_stats`]: occurrence-based affinity, fidelity,
//!   indicator and dilution values (plus area-based variants).
//! - [`ClusterMetrics::site_stats`] and
//!   [`ClusterMetrics::site_stats_towards`]: site robustness.
//! - [`ClusterMetrics::participation_coefficients`]: neighbour-cluster
//!   diversity of every node.
//!
//! Entities that cannot be placed in a cluster are skipped and recorded in
//! the [`DiagnosticsReport`] returned with each result.

mod participation;
mod region;
mod site;
mod species;

use std::collections::HashMap;

use crate::{
    diagnostics::{Diagnostic, DiagnosticsReport, UnclassifiedReason},
    error::MetricsError,
    level::LevelId,
    partition::{LevelColumn, PartitionTable},
    relation::OccurrenceRelation,
};

pub use self::{
    participation::{Participation, participation_coefficient},
    region::RegionStats,
    site::SiteStats,
    species::{OccurrenceIndices, SpeciesStats},
};

/// Per-site areas used by the area-based statistics.
///
/// # Examples
/// ```
/// use biogeonet_core::AreaTable;
///
/// let areas: AreaTable = [("A", 2.5), ("B", 4.0)].into_iter().collect();
/// assert_eq!(areas.get("A"), Some(2.5));
/// assert_eq!(areas.get("C"), None);
/// ```
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AreaTable {
    areas: HashMap<String, f64>,
}

impl AreaTable {
    /// Creates an empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the area of `site`, replacing any previous value.
    pub fn insert(&mut self, site: impl Into<String>, area: f64) {
        self.areas.insert(site.into(), area);
    }

    /// Area of `site`.
    #[must_use]
    pub fn get(&self, site: &str) -> Option<f64> {
        self.areas.get(site).copied()
    }

    /// Number of sites with an area.
    #[must_use]
    pub fn len(&self) -> usize {
        self.areas.len()
    }

    /// Whether no areas are known.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.areas.is_empty()
    }
}

impl<S: Into<String>> FromIterator<(S, f64)> for AreaTable {
    fn from_iter<T: IntoIterator<Item = (S, f64)>>(iter: T) -> Self {
        Self {
            areas: iter
                .into_iter()
                .map(|(site, area)| (site.into(), area))
                .collect(),
        }
    }
}

/// Metrics engine for one level of a partition table.
#[derive(Clone, Copy, Debug)]
pub struct ClusterMetrics<'a> {
    table: &'a PartitionTable,
    relation: &'a OccurrenceRelation,
    level: LevelId,
    column: &'a LevelColumn,
    areas: Option<&'a AreaTable>,
}

impl<'a> ClusterMetrics<'a> {
    /// Binds `table` and `relation` at `level`.
    ///
    /// # Errors
    /// Returns [`MetricsError::UnknownLevel`] when `level` exceeds the table
    /// depth.
    pub fn new(
        table: &'a PartitionTable,
        relation: &'a OccurrenceRelation,
        level: LevelId,
    ) -> Result<Self, MetricsError> {
        let column = table.level(level).ok_or(MetricsError::UnknownLevel {
            level,
            depth: table.depth(),
        })?;
        Ok(Self {
            table,
            relation,
            level,
            column,
            areas: None,
        })
    }

    /// Enables the area-based statistics.
    #[must_use]
    pub fn with_areas(mut self, areas: &'a AreaTable) -> Self {
        self.areas = Some(areas);
        self
    }

    /// The level clusters are read from.
    #[must_use]
    pub fn level(&self) -> LevelId {
        self.level
    }

    /// The level column clusters are read from.
    #[must_use]
    pub fn column(&self) -> &'a LevelColumn {
        self.column
    }

    fn cluster_label(&self, cluster: usize) -> String {
        self.column
            .categories()
            .get(cluster)
            .cloned()
            .unwrap_or_default()
    }

    fn cluster_of(&self, name: &str, report: &mut DiagnosticsReport) -> Option<usize> {
        let Some(row) = self.table.position(name) else {
            report.push(Diagnostic::UnclassifiedNode {
                name: name.to_owned(),
                reason: UnclassifiedReason::AbsentFromHierarchy,
            });
            return None;
        };
        let cluster = self.column.category_of(row);
        if cluster.is_none() {
            report.push(Diagnostic::UnclassifiedNode {
                name: name.to_owned(),
                reason: UnclassifiedReason::UndefinedAtLevel,
            });
        }
        cluster
    }

    fn build_index(&self) -> MetricsIndex {
        let mut report = DiagnosticsReport::new();
        let site_cluster: Vec<Option<usize>> = self
            .relation
            .sites()
            .iter()
            .map(|site| self.cluster_of(site, &mut report))
            .collect();
        let species_cluster: Vec<Option<usize>> = self
            .relation
            .species()
            .iter()
            .map(|species| self.cluster_of(species, &mut report))
            .collect();

        let clusters = self.column.category_count();
        let mut sites_per_cluster = vec![0_usize; clusters];
        for cluster in site_cluster.iter().flatten() {
            if let Some(count) = sites_per_cluster.get_mut(*cluster) {
                *count += 1;
            }
        }

        let site_area = self.areas.map(|areas| {
            self.relation
                .sites()
                .iter()
                .map(|site| {
                    areas.get(site).unwrap_or_else(|| {
                        report.push(Diagnostic::UndefinedMetric {
                            entity: site.clone(),
                            metric: "area",
                            cause: "site missing from area table",
                        });
                        0.0
                    })
                })
                .collect::<Vec<f64>>()
        });
        let area_per_cluster = site_area.as_ref().map(|site_area| {
            let mut totals = vec![0.0_f64; clusters];
            for (cluster, area) in site_cluster.iter().zip(site_area) {
                if let Some(total) = cluster.and_then(|c| totals.get_mut(c)) {
                    *total += area;
                }
            }
            totals
        });

        let species_spread = (0..self.relation.species().len())
            .map(|species| {
                let mut clusters: Vec<usize> = self
                    .relation
                    .species_neighbour_indices(species)
                    .iter()
                    .filter_map(|&site| site_cluster.get(site).copied().flatten())
                    .collect();
                clusters.sort_unstable();
                clusters.dedup();
                clusters.len()
            })
            .collect();

        MetricsIndex {
            site_cluster,
            species_cluster,
            sites_per_cluster,
            site_area,
            area_per_cluster,
            species_spread,
            report,
        }
    }
}

/// Cluster assignments and per-cluster totals shared by every statistic.
struct MetricsIndex {
    site_cluster: Vec<Option<usize>>,
    species_cluster: Vec<Option<usize>>,
    sites_per_cluster: Vec<usize>,
    site_area: Option<Vec<f64>>,
    area_per_cluster: Option<Vec<f64>>,
    /// Number of distinct clusters each species' sites fall into.
    species_spread: Vec<usize>,
    report: DiagnosticsReport,
}

impl MetricsIndex {
    fn site_cluster(&self, site: usize) -> Option<usize> {
        self.site_cluster.get(site).copied().flatten()
    }

    fn species_cluster(&self, species: usize) -> Option<usize> {
        self.species_cluster.get(species).copied().flatten()
    }

    fn is_endemic(&self, species: usize) -> bool {
        self.species_spread.get(species) == Some(&1)
    }
}

/// Maps `f` over `0..len`, in parallel when the `parallel` feature is on.
/// Output order always matches the index order.
#[cfg(feature = "parallel")]
fn map_indexed<T, F>(len: usize, f: F) -> Vec<T>
where
    T: Send,
    F: Fn(usize) -> T + Sync + Send,
{
    use rayon::prelude::*;

    (0..len).into_par_iter().map(f).collect()
}

#[cfg(not(feature = "parallel"))]
fn map_indexed<T, F>(len: usize, f: F) -> Vec<T>
where
    F: Fn(usize) -> T,
{
    (0..len).map(f).collect()
}

#[cfg(test)]
mod tests;
