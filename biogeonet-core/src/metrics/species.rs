//! Species-to-cluster association indices.

use tracing::{info, instrument};

use crate::diagnostics::{Diagnostic, DiagnosticsReport, Reported};

use super::{ClusterMetrics, MetricsIndex, map_indexed};

/// Affinity, fidelity, indicator and dilution values of one species.
///
/// Computed either from site counts or from summed site areas. `NaN` marks
/// a value that is undefined because its denominator is zero.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OccurrenceIndices {
    /// Occurrences (or area) inside the species' own cluster.
    pub ri: f64,
    /// Occurrences (or area) anywhere.
    pub di: f64,
    /// Affinity: `ri / size of own cluster`.
    pub ai: f64,
    /// Fidelity: `ri / di`.
    pub fi: f64,
    /// Indicator value: `ai * fi`.
    pub indval: f64,
    /// Dilution value: `ai * (1 - fi)`.
    pub dilval: f64,
}

impl OccurrenceIndices {
    /// Derives the indices from the in-cluster amount `ri`, the total amount
    /// `di` and the size of the species' cluster.
    ///
    /// # Examples
    /// ```
    /// use biogeonet_core::OccurrenceIndices;
    ///
    /// let indices = OccurrenceIndices::from_amounts(1.0, 2.0, 1.0);
    /// assert_eq!(indices.ai, 1.0);
    /// assert_eq!(indices.fi, 0.5);
    /// assert_eq!(indices.indval + indices.dilval, indices.ai);
    /// assert!(OccurrenceIndices::from_amounts(0.0, 1.0, 0.0).ai.is_nan());
    /// ```
    #[must_use]
    pub fn from_amounts(ri: f64, di: f64, cluster_size: f64) -> Self {
        let ai = ratio(ri, cluster_size);
        let fi = ratio(ri, di);
        Self {
            ri,
            di,
            ai,
            fi,
            indval: ai * fi,
            dilval: ai * (1.0 - fi),
        }
    }
}

fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator > 0.0 {
        numerator / denominator
    } else {
        f64::NAN
    }
}

/// Statistics of one species relative to its own cluster.
#[derive(Clone, Debug, PartialEq)]
pub struct SpeciesStats {
    /// Species label.
    pub species: String,
    /// The species' own cluster at the chosen level.
    pub cluster: String,
    /// Site-count based indices.
    pub occurrence: OccurrenceIndices,
    /// Area based indices, when an area table was supplied.
    pub area: Option<OccurrenceIndices>,
    /// Whether the species' sites all fall into a single cluster.
    pub endemic: bool,
}

impl ClusterMetrics<'_> {
    /// Computes [`SpeciesStats`] for every clustered species, in relation
    /// order.
    ///
    /// Species without a cluster at the chosen level are skipped and
    /// reported.
    #[instrument(
        name = "core.species_stats",
        skip(self),
        fields(level = %self.level, species = self.relation.species().len()),
    )]
    pub fn species_stats(&self) -> Reported<Vec<SpeciesStats>> {
        let mut index = self.build_index();
        let (stats, report) = self.species_by_index(&index);
        index.report.merge(report);
        let stats: Vec<SpeciesStats> = stats.into_iter().flatten().collect();
        info!(computed = stats.len(), "species stats computed");
        index.report.summarise("species_stats");
        Reported::new(stats, index.report)
    }

    /// Stats indexed by relation species position; `None` when unclustered.
    pub(super) fn species_by_index(
        &self,
        index: &MetricsIndex,
    ) -> (Vec<Option<SpeciesStats>>, DiagnosticsReport) {
        let computed = map_indexed(self.relation.species().len(), |species| {
            self.species_entry(index, species)
        });
        let mut report = DiagnosticsReport::new();
        let stats = computed
            .into_iter()
            .map(|(stats, diagnostics)| {
                report.extend(diagnostics);
                stats
            })
            .collect();
        (stats, report)
    }

    fn species_entry(
        &self,
        index: &MetricsIndex,
        species: usize,
    ) -> (Option<SpeciesStats>, Vec<Diagnostic>) {
        let mut diagnostics = Vec::new();
        let Some(cluster) = index.species_cluster(species) else {
            return (None, diagnostics);
        };
        let label = self
            .relation
            .species()
            .get(species)
            .cloned()
            .unwrap_or_default();
        let sites = self.relation.species_neighbour_indices(species);
        let in_cluster = || {
            sites
                .iter()
                .copied()
                .filter(move |&site| index.site_cluster(site) == Some(cluster))
        };

        let ri = in_cluster().count() as f64;
        let di = sites.len() as f64;
        let cluster_sites = index.sites_per_cluster.get(cluster).copied().unwrap_or(0);
        let occurrence = OccurrenceIndices::from_amounts(ri, di, cluster_sites as f64);
        if occurrence.ai.is_nan() {
            diagnostics.push(Diagnostic::UndefinedMetric {
                entity: label.clone(),
                metric: "Occ.Ai",
                cause: "cluster has no sites",
            });
        }

        let area = index
            .site_area
            .as_ref()
            .zip(index.area_per_cluster.as_ref())
            .map(|(site_area, cluster_area)| {
                let amount = |site: usize| site_area.get(site).copied().unwrap_or(0.0);
                let ri = in_cluster().map(amount).sum::<f64>();
                let di = sites.iter().copied().map(amount).sum::<f64>();
                let total = cluster_area.get(cluster).copied().unwrap_or(0.0);
                let indices = OccurrenceIndices::from_amounts(ri, di, total);
                if indices.ai.is_nan() || indices.fi.is_nan() {
                    diagnostics.push(Diagnostic::UndefinedMetric {
                        entity: label.clone(),
                        metric: "Area.Ai",
                        cause: "zero area in cluster or occupied sites",
                    });
                }
                indices
            });

        let stats = SpeciesStats {
            species: label,
            cluster: self.cluster_label(cluster),
            occurrence,
            area,
            endemic: index.is_endemic(species),
        };
        (Some(stats), diagnostics)
    }
}
