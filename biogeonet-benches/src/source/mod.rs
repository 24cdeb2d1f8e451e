//! Seeded synthetic site–species networks.
//!
//! Sites and species are dealt round-robin into `clusters` groups. Each
//! site draws its species from its own group with probability `fidelity`
//! and from the whole pool otherwise, so the generated partition is a
//! plausible but imperfect bioregionalisation. The matching tree file nests
//! every node three levels deep: cluster, sub-cluster, leaf.

mod errors;

pub use errors::SyntheticError;

use biogeonet_core::{Occurrence, OccurrenceRelation};
use rand::{Rng, SeedableRng, rngs::SmallRng};

/// Sub-clusters per cluster in the generated tree.
pub const SUBCLUSTERS: usize = 4;

/// Shape of a synthetic network.
#[derive(Clone, Debug)]
pub struct SyntheticConfig {
    /// Number of sites.
    pub sites: usize,
    /// Number of species; at least `clusters`.
    pub species: usize,
    /// Number of top-level clusters.
    pub clusters: usize,
    /// Distinct species drawn per site.
    pub species_per_site: usize,
    /// Probability that a draw comes from the site's own cluster.
    pub fidelity: f64,
    /// Random seed.
    pub seed: u64,
}

/// A generated occurrence relation with its tree file.
#[derive(Clone, Debug)]
pub struct SyntheticNetwork {
    relation: OccurrenceRelation,
    tree: String,
}

impl SyntheticNetwork {
    /// Generates a network for `config`.
    ///
    /// # Errors
    /// Returns [`SyntheticError`] when a count is zero, the species pool
    /// cannot cover every cluster or site, or `fidelity` is not a
    /// probability.
    ///
    /// # Examples
    /// ```
    /// use biogeonet_benches::source::{SyntheticConfig, SyntheticNetwork};
    ///
    /// let network = SyntheticNetwork::generate(&SyntheticConfig {
    ///     sites: 8,
    ///     species: 12,
    ///     clusters: 2,
    ///     species_per_site: 3,
    ///     fidelity: 0.8,
    ///     seed: 7,
    /// })?;
    /// assert_eq!(network.relation().sites().len(), 8);
    /// assert!(network.tree().starts_with("# synthetic"));
    /// # Ok::<(), biogeonet_benches::source::SyntheticError>(())
    /// ```
    pub fn generate(config: &SyntheticConfig) -> Result<Self, SyntheticError> {
        validate(config)?;
        let mut rng = SmallRng::seed_from_u64(config.seed);
        let mut rows = Vec::with_capacity(config.sites.saturating_mul(config.species_per_site));
        for site in 0..config.sites {
            let label = site_label(site);
            for species in draw_species(config, site, &mut rng) {
                let abundance = f64::from(rng.gen_range(1_u32..=20));
                let row = Occurrence::new(label.clone(), species_label(species));
                rows.push(row.with_abundance(abundance));
            }
        }
        Ok(Self {
            relation: OccurrenceRelation::new(rows),
            tree: tree_text(config),
        })
    }

    /// The generated occurrence relation.
    #[must_use]
    pub const fn relation(&self) -> &OccurrenceRelation {
        &self.relation
    }

    /// The generated tree file, header included.
    #[must_use]
    pub const fn tree(&self) -> &str {
        self.tree.as_str()
    }
}

fn validate(config: &SyntheticConfig) -> Result<(), SyntheticError> {
    for (parameter, value) in [
        ("sites", config.sites),
        ("species", config.species),
        ("clusters", config.clusters),
        ("species_per_site", config.species_per_site),
    ] {
        if value == 0 {
            return Err(SyntheticError::ZeroValue { parameter });
        }
    }
    if config.species < config.clusters {
        return Err(SyntheticError::TooFewSpecies {
            clusters: config.clusters,
            species: config.species,
        });
    }
    if config.species_per_site > config.species {
        return Err(SyntheticError::OccupancyExceedsSpecies {
            requested: config.species_per_site,
            species: config.species,
        });
    }
    if !(0.0..=1.0).contains(&config.fidelity) {
        return Err(SyntheticError::InvalidFidelity {
            value: config.fidelity,
        });
    }
    Ok(())
}

/// Draws distinct species indices for `site`, in draw order.
fn draw_species(config: &SyntheticConfig, site: usize, rng: &mut SmallRng) -> Vec<usize> {
    let cluster = site.rem_euclid(config.clusters);
    // species `cluster`, `cluster + clusters`, ... belong to the cluster
    let own = (config.species - cluster).div_ceil(config.clusters);
    let mut taken = vec![false; config.species];
    let mut drawn = Vec::with_capacity(config.species_per_site);
    let attempts = config.species_per_site.saturating_mul(8);
    for _ in 0..attempts {
        if drawn.len() == config.species_per_site {
            break;
        }
        let species = if rng.gen_bool(config.fidelity) {
            cluster + rng.gen_range(0..own) * config.clusters
        } else {
            rng.gen_range(0..config.species)
        };
        if let Some(slot) = taken.get_mut(species).filter(|slot| !**slot) {
            *slot = true;
            drawn.push(species);
        }
    }
    // top up deterministically when the own cluster is exhausted
    for (species, slot) in taken.iter_mut().enumerate() {
        if drawn.len() == config.species_per_site {
            break;
        }
        if !*slot {
            *slot = true;
            drawn.push(species);
        }
    }
    drawn
}

fn site_label(site: usize) -> String {
    format!("site{site}")
}

fn species_label(species: usize) -> String {
    format!("sp{species}")
}

fn tree_path(index: usize, clusters: usize) -> (usize, usize) {
    let cluster = index.rem_euclid(clusters) + 1;
    let sub = index.div_euclid(clusters).rem_euclid(SUBCLUSTERS) + 1;
    (cluster, sub)
}

fn tree_text(config: &SyntheticConfig) -> String {
    let mut text = String::from("# synthetic\n# codelength 1.0 bits\n");
    let sites = (0..config.sites).map(|site| (site_label(site), tree_path(site, config.clusters)));
    let species = (0..config.species)
        .map(|species| (species_label(species), tree_path(species, config.clusters)));
    for (node, (name, (cluster, sub))) in sites.chain(species).enumerate() {
        let id = node + 1;
        text.push_str(&format!("{cluster}:{sub}:{id} 0.001 \"{name}\" {id}\n"));
    }
    text
}

#[cfg(test)]
mod tests;
