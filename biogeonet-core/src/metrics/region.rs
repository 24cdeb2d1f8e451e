//! Per-cluster aggregate statistics.

use std::collections::HashSet;

use tracing::{info, instrument};

use crate::diagnostics::Reported;

use super::ClusterMetrics;

/// Aggregate figures of one cluster at the chosen level.
#[derive(Clone, Debug, PartialEq)]
pub struct RegionStats {
    /// Cluster value.
    pub cluster: String,
    /// Distinct relation sites in the cluster.
    pub sites: usize,
    /// Summed site area, when an area table was supplied.
    pub area: Option<f64>,
    /// Distinct species observed at the cluster's sites.
    pub richness: usize,
    /// Species whose own cluster is this one, wherever they occur.
    pub characteristic_richness: usize,
    /// Species of [`Self::richness`] whose sites all fall in one cluster.
    pub endemic_richness: usize,
    /// Deepest level at which any node of the cluster still has a value.
    pub nested_levels: usize,
}

impl ClusterMetrics<'_> {
    /// Computes [`RegionStats`] for every category of the level, in
    /// canonical category order.
    #[instrument(
        name = "core.region_stats",
        skip(self),
        fields(level = %self.level, clusters = self.column.category_count()),
    )]
    pub fn region_stats(&self) -> Reported<Vec<RegionStats>> {
        let index = self.build_index();
        let clusters = self.column.category_count();

        let mut richness: Vec<HashSet<usize>> = vec![HashSet::new(); clusters];
        for (site, cluster) in index.site_cluster.iter().enumerate() {
            if let Some(set) = cluster.and_then(|c| richness.get_mut(c)) {
                set.extend(self.relation.site_neighbour_indices(site).iter().copied());
            }
        }

        let mut characteristic = vec![0_usize; clusters];
        for cluster in index.species_cluster.iter().flatten() {
            if let Some(count) = characteristic.get_mut(*cluster) {
                *count += 1;
            }
        }

        let mut nested = vec![0_usize; clusters];
        for row in 0..self.table.len() {
            let Some(cluster) = self.column.category_of(row) else {
                continue;
            };
            let defined = self
                .table
                .levels()
                .iter()
                .rposition(|column| column.value(row).is_some())
                .map_or(0, |offset| offset + 1);
            if let Some(deepest) = nested.get_mut(cluster) {
                *deepest = (*deepest).max(defined);
            }
        }

        let stats: Vec<RegionStats> = (0..clusters)
            .map(|cluster| {
                let species = richness.get(cluster);
                RegionStats {
                    cluster: self.cluster_label(cluster),
                    sites: index.sites_per_cluster.get(cluster).copied().unwrap_or(0),
                    area: index
                        .area_per_cluster
                        .as_ref()
                        .and_then(|areas| areas.get(cluster).copied()),
                    richness: species.map_or(0, HashSet::len),
                    characteristic_richness: characteristic.get(cluster).copied().unwrap_or(0),
                    endemic_richness: species.map_or(0, |set| {
                        set.iter().filter(|&&s| index.is_endemic(s)).count()
                    }),
                    nested_levels: nested.get(cluster).copied().unwrap_or(0),
                }
            })
            .collect();
        info!(clusters = stats.len(), "region stats computed");
        index.report.summarise("region_stats");
        Reported::new(stats, index.report)
    }
}
