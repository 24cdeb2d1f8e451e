//! Shared test utilities for `biogeonet-core`.

use biogeonet_test_support::{fixtures, property_test_profile::ProptestRunProfile};
use proptest::test_runner::Config as ProptestConfig;

use crate::{OccurrenceRelation, PartitionTable, TreeParseOptions, parse_tree};

/// Builds a proptest configuration honouring `BIOGEONET_PROPTEST_CASES`.
#[must_use]
pub(crate) fn suite_proptest_config(default_cases: u32) -> ProptestConfig {
    let profile = ProptestRunProfile::load(default_cases);
    ProptestConfig {
        cases: profile.cases(),
        ..ProptestConfig::default()
    }
}

/// The scenario relation with abundances.
#[must_use]
pub(crate) fn scenario_relation() -> OccurrenceRelation {
    OccurrenceRelation::from_triples(
        fixtures::SCENARIO_RELATION
            .iter()
            .map(|&(site, species, abundance)| (site, species, Some(abundance))),
    )
}

/// The scenario partition table (depth one, leaf names not resolved).
#[must_use]
pub(crate) fn scenario_table() -> PartitionTable {
    let options = TreeParseOptions::default().with_leaf_names(false);
    let tree = parse_tree(fixtures::SCENARIO_TREE, &options).expect("scenario tree must parse");
    PartitionTable::from_tree(&tree, &options)
}

/// The nested relation.
#[must_use]
pub(crate) fn nested_relation() -> OccurrenceRelation {
    OccurrenceRelation::from_triples(
        fixtures::NESTED_RELATION
            .iter()
            .map(|&(site, species, abundance)| (site, species, Some(abundance))),
    )
}

/// The nested partition table, with leaf names resolved.
#[must_use]
pub(crate) fn nested_table() -> PartitionTable {
    let options = TreeParseOptions::default();
    let tree = parse_tree(fixtures::NESTED_TREE, &options).expect("nested tree must parse");
    PartitionTable::from_tree(&tree, &options)
}
