//! Unit tests for the synthetic network generator.

use super::{SUBCLUSTERS, SyntheticConfig, SyntheticError, SyntheticNetwork};
use biogeonet_core::{LevelId, PartitionTable, TreeParseOptions, parse_tree};
use rstest::{fixture, rstest};

fn base_config() -> SyntheticConfig {
    SyntheticConfig {
        sites: 24,
        species: 40,
        clusters: 3,
        species_per_site: 6,
        fidelity: 0.8,
        seed: 11,
    }
}

#[fixture]
fn config() -> SyntheticConfig {
    base_config()
}

fn rows(network: &SyntheticNetwork) -> Vec<(String, String, f64)> {
    network
        .relation()
        .rows()
        .iter()
        .map(|row| (row.site().to_owned(), row.species().to_owned(), row.weight()))
        .collect()
}

#[rstest]
fn generation_is_deterministic(config: SyntheticConfig) {
    let first = SyntheticNetwork::generate(&config).expect("config is valid");
    let second = SyntheticNetwork::generate(&config).expect("config is valid");
    assert_eq!(rows(&first), rows(&second));
    assert_eq!(first.tree(), second.tree());

    let reseeded = SyntheticNetwork::generate(&SyntheticConfig { seed: 12, ..config })
        .expect("config is valid");
    assert_ne!(rows(&first), rows(&reseeded));
}

#[rstest]
#[case::loyal(1.0)]
#[case::mixed(0.5)]
#[case::random(0.0)]
fn every_site_draws_distinct_species(config: SyntheticConfig, #[case] fidelity: f64) {
    let network = SyntheticNetwork::generate(&SyntheticConfig { fidelity, ..config.clone() })
        .expect("config is valid");
    let relation = network.relation();
    assert_eq!(relation.len(), config.sites * config.species_per_site);
    for site in relation.sites() {
        let mut species: Vec<&str> = relation.species_at(site).collect();
        species.sort_unstable();
        species.dedup();
        assert_eq!(species.len(), config.species_per_site);
    }
}

#[rstest]
fn tree_covers_every_node(config: SyntheticConfig) {
    let network = SyntheticNetwork::generate(&config).expect("config is valid");
    let options = TreeParseOptions::default();
    let tree = parse_tree(network.tree(), &options).expect("generated tree parses");
    assert_eq!(tree.records().len(), config.sites + config.species);
    assert_eq!(tree.depth(), 3);
    assert_eq!(tree.header().codelength(), Some(1.0));

    let table = PartitionTable::from_tree(&tree, &options);
    let summary = table.summary();
    assert_eq!(summary.clusters_per_level[0], config.clusters);
    assert_eq!(summary.clusters_per_level[1], config.clusters * SUBCLUSTERS);
    assert_eq!(table.value("site0", LevelId::FIRST), Some("1"));
    assert_eq!(table.value("sp1", LevelId::FIRST), Some("2"));
}

#[rstest]
#[case::zero_sites(SyntheticConfig { sites: 0, ..base_config() }, SyntheticError::ZeroValue { parameter: "sites" })]
#[case::zero_clusters(SyntheticConfig { clusters: 0, ..base_config() }, SyntheticError::ZeroValue { parameter: "clusters" })]
#[case::few_species(
    SyntheticConfig { species: 2, species_per_site: 1, ..base_config() },
    SyntheticError::TooFewSpecies { clusters: 3, species: 2 },
)]
#[case::crowded(
    SyntheticConfig { species_per_site: 41, ..base_config() },
    SyntheticError::OccupancyExceedsSpecies { requested: 41, species: 40 },
)]
#[case::fidelity(
    SyntheticConfig { fidelity: 1.5, ..base_config() },
    SyntheticError::InvalidFidelity { value: 1.5 },
)]
fn invalid_configs_are_rejected(#[case] config: SyntheticConfig, #[case] expected: SyntheticError) {
    let err = SyntheticNetwork::generate(&config).expect_err("config must be rejected");
    assert_eq!(err, expected);
}
