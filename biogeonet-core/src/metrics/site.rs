//! Site robustness.
//!
//! A site's robustness `Rg` rewards the indicator value of its characteristic
//! species (those whose own cluster is the site's cluster) and penalises the
//! dilution value of every other clustered species it hosts. `RRg` divides
//! `Rg` by the site's species richness.

use tracing::{info, instrument};

use crate::{
    diagnostics::{Diagnostic, Reported},
    error::MetricsError,
};

use super::{ClusterMetrics, MetricsIndex, OccurrenceIndices, SpeciesStats};

/// Robustness of one site against a reference cluster.
#[derive(Clone, Debug, PartialEq)]
pub struct SiteStats {
    /// Site label.
    pub site: String,
    /// The site's own cluster at the chosen level.
    pub cluster: String,
    /// Cluster the robustness is measured against; equals
    /// [`Self::cluster`] outside the focal mode.
    pub reference: String,
    /// Distinct species observed at the site.
    pub richness: usize,
    /// Hosted species whose own cluster is the reference cluster.
    pub characteristic: usize,
    /// Occurrence based robustness.
    pub rg: f64,
    /// Occurrence based relative robustness.
    pub rrg: f64,
    /// Area based robustness, when an area table was supplied.
    pub rg_area: Option<f64>,
    /// Area based relative robustness, when an area table was supplied.
    pub rrg_area: Option<f64>,
}

/// Which sums make up `Rg`.
#[derive(Clone, Copy)]
enum Mode {
    /// Standard robustness towards the site's own cluster.
    Own,
    /// Robustness of a site towards a focal cluster other than its own.
    Focal(usize),
}

impl ClusterMetrics<'_> {
    /// Computes robustness for every clustered site, in relation order.
    ///
    /// Sites without a cluster are skipped and reported.
    ///
    /// # Errors
    /// Returns [`MetricsError::BipartiteViolation`] when a label is used as
    /// both a site and a species.
    #[instrument(name = "core.site_stats", err, skip(self), fields(level = %self.level))]
    pub fn site_stats(&self) -> Result<Reported<Vec<SiteStats>>, MetricsError> {
        self.relation.ensure_bipartite()?;
        Ok(self.robustness(None))
    }

    /// Computes robustness of every clustered site towards `focal`.
    ///
    /// Sites already in `focal` get the standard value. For a site in
    /// cluster `c != focal`, hosted species are split by whether their own
    /// cluster is `focal`, `c` or neither, and
    /// `Rg = Σ IndVal(focal) − (Σ IndVal(c) + Σ DilVal(neither))`.
    ///
    /// # Errors
    /// Returns [`MetricsError::UnknownCluster`] when `focal` is not a value
    /// of the level and [`MetricsError::BipartiteViolation`] when the
    /// relation is not bipartite.
    #[instrument(name = "core.site_stats_towards", err, skip(self), fields(level = %self.level))]
    pub fn site_stats_towards(
        &self,
        focal: &str,
    ) -> Result<Reported<Vec<SiteStats>>, MetricsError> {
        let focal_index =
            self.column
                .category_index(focal)
                .ok_or_else(|| MetricsError::UnknownCluster {
                    level: self.level,
                    cluster: focal.to_owned(),
                })?;
        self.relation.ensure_bipartite()?;
        Ok(self.robustness(Some(focal_index)))
    }

    fn robustness(&self, focal: Option<usize>) -> Reported<Vec<SiteStats>> {
        let mut index = self.build_index();
        let (species, report) = self.species_by_index(&index);
        index.report.merge(report);

        let stats: Vec<SiteStats> = (0..self.relation.sites().len())
            .filter_map(|site| {
                let cluster = index.site_cluster(site)?;
                let mode = match focal {
                    Some(f) if f != cluster => Mode::Focal(f),
                    _ => Mode::Own,
                };
                Some(self.site_entry(&index, &species, site, cluster, mode))
            })
            .collect();
        for entry in &stats {
            let undefined = [
                ("Occ.Rg", entry.rg.is_nan()),
                ("Area.Rg", entry.rg_area.is_some_and(f64::is_nan)),
            ];
            for (metric, _) in undefined.into_iter().filter(|(_, nan)| *nan) {
                index.report.push(Diagnostic::UndefinedMetric {
                    entity: entry.site.clone(),
                    metric,
                    cause: "a hosted species has an undefined indicator or dilution value",
                });
            }
        }
        info!(computed = stats.len(), focal = focal.is_some(), "site stats computed");
        let context = if focal.is_some() {
            "site_stats_towards"
        } else {
            "site_stats"
        };
        index.report.summarise(context);
        Reported::new(stats, index.report)
    }

    fn site_entry(
        &self,
        index: &MetricsIndex,
        species: &[Option<SpeciesStats>],
        site: usize,
        cluster: usize,
        mode: Mode,
    ) -> SiteStats {
        let hosted = self.relation.site_neighbour_indices(site);
        let richness = hosted.len();
        let reference = match mode {
            Mode::Own => cluster,
            Mode::Focal(f) => f,
        };

        let mut characteristic = 0;
        let mut rg = 0.0;
        let mut rg_area = index.site_area.as_ref().map(|_| 0.0);
        for &s in hosted {
            let (Some(own), Some(Some(stats))) = (index.species_cluster(s), species.get(s)) else {
                continue;
            };
            if own == reference {
                characteristic += 1;
            }
            let (sign, pick_indval) = match mode {
                Mode::Own if own == cluster => (1.0, true),
                Mode::Own => (-1.0, false),
                Mode::Focal(f) if own == f => (1.0, true),
                Mode::Focal(_) if own == cluster => (-1.0, true),
                Mode::Focal(_) => (-1.0, false),
            };
            let pick = |indices: &OccurrenceIndices| {
                if pick_indval {
                    indices.indval
                } else {
                    indices.dilval
                }
            };
            rg += sign * pick(&stats.occurrence);
            if let (Some(total), Some(area)) = (rg_area.as_mut(), stats.area.as_ref()) {
                *total += sign * pick(area);
            }
        }

        let relative = |value: f64| value / richness as f64;
        SiteStats {
            site: self.relation.sites().get(site).cloned().unwrap_or_default(),
            cluster: self.cluster_label(cluster),
            reference: self.cluster_label(reference),
            richness,
            characteristic,
            rg,
            rrg: relative(rg),
            rg_area,
            rrg_area: rg_area.map(relative),
        }
    }
}
