//! Unit tests for the cluster metrics engine.

use std::collections::BTreeSet;

use proptest::{collection::vec, prelude::*};
use rstest::{fixture, rstest};

use crate::{
    AreaTable, ClusterMetrics, Diagnostic, HierarchyPath, LevelId, MetricsError, Occurrence,
    OccurrenceRelation, PartitionTable, TreeRecord, UnclassifiedReason,
    test_utils::{
        nested_relation, nested_table, scenario_relation, scenario_table, suite_proptest_config,
    },
};

const TOLERANCE: f64 = 1e-12;

fn lvl(index: usize) -> LevelId {
    LevelId::new(index).expect("level index must be non-zero")
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < TOLERANCE,
        "expected {expected}, got {actual}"
    );
}

#[fixture]
fn scenario() -> (PartitionTable, OccurrenceRelation) {
    (scenario_table(), scenario_relation())
}

#[rstest]
fn region_stats_match_scenario(scenario: (PartitionTable, OccurrenceRelation)) {
    let (table, relation) = scenario;
    let metrics = ClusterMetrics::new(&table, &relation, LevelId::FIRST).expect("level exists");
    let (regions, report) = metrics.region_stats().into_parts();
    assert!(report.is_empty());
    assert_eq!(regions.len(), 2);

    let first = &regions[0];
    assert_eq!(first.cluster, "1");
    assert_eq!(first.sites, 1);
    assert_eq!(first.richness, 3);
    assert_eq!(first.characteristic_richness, 3);
    assert_eq!(first.endemic_richness, 2);
    assert_eq!(first.nested_levels, 1);
    assert_eq!(first.area, None);

    let second = &regions[1];
    assert_eq!(second.cluster, "2");
    assert_eq!(second.sites, 1);
    assert_eq!(second.richness, 2);
    assert_eq!(second.characteristic_richness, 1);
    assert_eq!(second.endemic_richness, 1);
}

#[rstest]
fn species_stats_match_scenario(scenario: (PartitionTable, OccurrenceRelation)) {
    let (table, relation) = scenario;
    let metrics = ClusterMetrics::new(&table, &relation, LevelId::FIRST).expect("level exists");
    let stats = metrics.species_stats().into_value();
    let names: Vec<&str> = stats.iter().map(|s| s.species.as_str()).collect();
    assert_eq!(names, ["Sp1", "Sp2", "Sp3", "Sp4"]);

    let sp1 = &stats[0];
    assert_eq!(sp1.cluster, "1");
    assert_close(sp1.occurrence.ri, 1.0);
    assert_close(sp1.occurrence.di, 2.0);
    assert_close(sp1.occurrence.ai, 1.0);
    assert_close(sp1.occurrence.fi, 0.5);
    assert_close(sp1.occurrence.indval, 0.5);
    assert_close(sp1.occurrence.dilval, 0.5);
    assert!(!sp1.endemic);
    assert!(sp1.area.is_none());

    let sp4 = &stats[3];
    assert_eq!(sp4.cluster, "2");
    assert_close(sp4.occurrence.indval, 1.0);
    assert_close(sp4.occurrence.dilval, 0.0);
    assert!(sp4.endemic);
}

#[rstest]
fn site_stats_match_scenario(scenario: (PartitionTable, OccurrenceRelation)) {
    let (table, relation) = scenario;
    let metrics = ClusterMetrics::new(&table, &relation, LevelId::FIRST).expect("level exists");
    let stats = metrics.site_stats().expect("relation is bipartite").into_value();
    assert_eq!(stats.len(), 2);

    let a = &stats[0];
    assert_eq!((a.site.as_str(), a.cluster.as_str(), a.reference.as_str()), ("A", "1", "1"));
    assert_eq!(a.richness, 3);
    assert_eq!(a.characteristic, 3);
    assert_close(a.rg, 2.5);
    assert_close(a.rrg, 2.5 / 3.0);

    let b = &stats[1];
    assert_eq!(b.characteristic, 1);
    assert_close(b.rg, 0.5);
    assert_close(b.rrg, 0.25);
}

#[rstest]
fn focal_robustness_uses_distinct_formula(scenario: (PartitionTable, OccurrenceRelation)) {
    let (table, relation) = scenario;
    let metrics = ClusterMetrics::new(&table, &relation, LevelId::FIRST).expect("level exists");
    let stats = metrics
        .site_stats_towards("2")
        .expect("cluster 2 exists")
        .into_value();

    let a = &stats[0];
    assert_eq!(a.reference, "2");
    assert_eq!(a.characteristic, 0);
    assert_close(a.rg, -2.5);

    // B already belongs to the focal cluster.
    let b = &stats[1];
    assert_eq!(b.reference, "2");
    assert_close(b.rg, 0.5);
}

#[rstest]
fn unknown_focal_cluster_is_rejected(scenario: (PartitionTable, OccurrenceRelation)) {
    let (table, relation) = scenario;
    let metrics = ClusterMetrics::new(&table, &relation, LevelId::FIRST).expect("level exists");
    let err = metrics.site_stats_towards("9").expect_err("cluster 9 is absent");
    assert_eq!(
        err,
        MetricsError::UnknownCluster {
            level: LevelId::FIRST,
            cluster: "9".into(),
        }
    );
}

#[rstest]
fn participation_matches_scenario(scenario: (PartitionTable, OccurrenceRelation)) {
    let (table, relation) = scenario;
    let metrics = ClusterMetrics::new(&table, &relation, LevelId::FIRST).expect("level exists");
    let values = metrics
        .participation_coefficients()
        .expect("relation is bipartite")
        .into_value();
    let by_node: Vec<(&str, f64)> = values
        .iter()
        .map(|p| (p.node.as_str(), p.coefficient))
        .collect();
    assert_eq!(
        by_node,
        [
            ("A", 0.0),
            ("B", 0.5),
            ("Sp1", 0.5),
            ("Sp2", 0.0),
            ("Sp3", 0.0),
            ("Sp4", 0.0),
        ]
    );
    assert_eq!(values[0].degree, 3);
}

#[test]
fn area_variants_use_summed_site_areas() {
    let table = scenario_table();
    let relation = scenario_relation();
    let areas: AreaTable = [("A", 2.5), ("B", 4.0)].into_iter().collect();
    let metrics = ClusterMetrics::new(&table, &relation, LevelId::FIRST)
        .expect("level exists")
        .with_areas(&areas);

    let regions = metrics.region_stats().into_value();
    assert_eq!(regions[0].area, Some(2.5));
    assert_eq!(regions[1].area, Some(4.0));

    let species = metrics.species_stats().into_value();
    let sp1 = species[0].area.expect("area indices present");
    assert_close(sp1.ri, 2.5);
    assert_close(sp1.di, 6.5);
    assert_close(sp1.ai, 1.0);
    assert_close(sp1.fi, 2.5 / 6.5);

    let sites = metrics.site_stats().expect("relation is bipartite").into_value();
    let b_area = sites[1].rg_area.expect("area robustness present");
    assert_close(b_area, 1.0 - (1.0 - 2.5 / 6.5));
}

#[test]
fn missing_areas_are_reported() {
    let table = scenario_table();
    let relation = scenario_relation();
    let areas: AreaTable = [("A", 2.5)].into_iter().collect();
    let metrics = ClusterMetrics::new(&table, &relation, LevelId::FIRST)
        .expect("level exists")
        .with_areas(&areas);
    let report = metrics.region_stats().into_parts().1;
    assert!(report.diagnostics().iter().any(|d| matches!(
        d,
        Diagnostic::UndefinedMetric { entity, metric: "area", .. } if entity == "B"
    )));
}

#[test]
fn unknown_level_is_rejected() {
    let table = scenario_table();
    let relation = scenario_relation();
    let err = ClusterMetrics::new(&table, &relation, lvl(2)).expect_err("depth is one");
    assert_eq!(err.code().as_str(), "METRICS_UNKNOWN_LEVEL");
}

#[test]
fn unclustered_site_is_skipped_and_reported() {
    let table = scenario_table();
    let relation = OccurrenceRelation::from_triples([
        ("A", "Sp1", None),
        ("A", "Sp2", None),
        ("C", "Sp2", None),
        ("B", "Sp4", None),
    ]);
    let metrics = ClusterMetrics::new(&table, &relation, LevelId::FIRST).expect("level exists");
    let (sites, report) = metrics
        .site_stats()
        .expect("relation is bipartite")
        .into_parts();
    let names: Vec<&str> = sites.iter().map(|s| s.site.as_str()).collect();
    assert_eq!(names, ["A", "B"]);
    assert!(report.diagnostics().contains(&Diagnostic::UnclassifiedNode {
        name: "C".into(),
        reason: UnclassifiedReason::AbsentFromHierarchy,
    }));

    // C still counts as an occurrence of Sp2.
    let species = metrics.species_stats().into_value();
    let sp2 = species
        .iter()
        .find(|s| s.species == "Sp2")
        .expect("Sp2 is clustered");
    assert_close(sp2.occurrence.di, 2.0);
    assert_close(sp2.occurrence.fi, 0.5);
}

#[test]
fn participation_skips_nodes_absent_from_hierarchy() {
    let table = scenario_table();
    let relation = OccurrenceRelation::from_triples([
        ("A", "Sp1", None),
        ("C", "Sp1", None),
        ("C", "Sp4", None),
        ("B", "Sp9", None),
    ]);
    let metrics = ClusterMetrics::new(&table, &relation, LevelId::FIRST).expect("level exists");
    let (values, report) = metrics
        .participation_coefficients()
        .expect("relation is bipartite")
        .into_parts();
    let nodes: Vec<&str> = values.iter().map(|p| p.node.as_str()).collect();
    assert_eq!(nodes, ["A", "B", "Sp1", "Sp4"]);
    for name in ["C", "Sp9"] {
        assert!(report.diagnostics().contains(&Diagnostic::UnclassifiedNode {
            name: name.into(),
            reason: UnclassifiedReason::AbsentFromHierarchy,
        }));
    }

    // B keeps its score although its only neighbour is unclustered.
    let b = values.iter().find(|p| p.node == "B").expect("B is clustered");
    assert_eq!((b.degree, b.assigned), (1, 0));
    assert!(b.coefficient.is_nan());
}

#[test]
fn empty_cluster_leaves_affinity_undefined() {
    let table = nested_table();
    let relation = nested_relation();
    let metrics = ClusterMetrics::new(&table, &relation, lvl(2)).expect("level exists");
    let (species, report) = metrics.species_stats().into_parts();
    let p2 = species
        .iter()
        .find(|s| s.species == "P2")
        .expect("P2 is clustered");
    assert_eq!(p2.cluster, "1.2");
    assert!(p2.occurrence.ai.is_nan());
    assert!(p2.occurrence.indval.is_nan());
    // P4 and P5 are alone in clusters 2.2 and 2.3 as well.
    assert_eq!(report.undefined_count(), 3);

    let regions = metrics.region_stats().into_value();
    let empty = regions
        .iter()
        .find(|r| r.cluster == "1.2")
        .expect("cluster 1.2 is listed");
    assert_eq!(empty.sites, 0);
    assert_eq!(empty.characteristic_richness, 1);
}

#[test]
fn undefined_species_values_are_reported_on_hosting_sites() {
    let table = nested_table();
    let relation = nested_relation();
    let metrics = ClusterMetrics::new(&table, &relation, lvl(2)).expect("level exists");
    let (sites, report) = metrics
        .site_stats()
        .expect("relation is bipartite")
        .into_parts();

    // P2, P4 and P5 sit in siteless clusters; S2 hosts none of them.
    let undefined: Vec<&str> = report
        .diagnostics()
        .iter()
        .filter_map(|d| match d {
            Diagnostic::UndefinedMetric {
                entity,
                metric: "Occ.Rg",
                ..
            } => Some(entity.as_str()),
            _ => None,
        })
        .collect();
    assert_eq!(undefined, ["S1", "S3", "S4"]);
    for site in &sites {
        assert_eq!(site.rg.is_nan(), undefined.contains(&site.site.as_str()));
    }
}

#[test]
fn nested_levels_reach_resolved_leaf_column() {
    let table = nested_table();
    let relation = nested_relation();
    let metrics = ClusterMetrics::new(&table, &relation, LevelId::FIRST).expect("level exists");
    let regions = metrics.region_stats().into_value();
    assert!(regions.iter().all(|r| r.nested_levels == 3));
}

#[test]
fn participation_spreads_across_three_clusters() {
    let table = nested_table();
    let relation = nested_relation();
    let metrics = ClusterMetrics::new(&table, &relation, lvl(2)).expect("level exists");
    let values = metrics
        .participation_coefficients()
        .expect("relation is bipartite")
        .into_value();
    let s4 = values.iter().find(|p| p.node == "S4").expect("S4 present");
    assert_close(s4.coefficient, 2.0 / 3.0);
}

#[test]
fn non_bipartite_relation_fails_lazily() {
    let table = scenario_table();
    let relation = OccurrenceRelation::from_triples([("A", "Sp1", None), ("Sp1", "B", None)]);
    let metrics = ClusterMetrics::new(&table, &relation, LevelId::FIRST)
        .expect("construction does not check bipartiteness");
    let _ = metrics.region_stats();
    let err = metrics
        .participation_coefficients()
        .expect_err("shared label must be rejected");
    assert_eq!(err.code().as_str(), "METRICS_BIPARTITE_VIOLATION");
    assert!(metrics.site_stats().is_err());
}

#[rstest]
#[case(&[10], 0.0)]
#[case(&[5, 5], 0.5)]
#[case(&[1, 1, 1, 1], 0.75)]
fn participation_coefficient_examples(#[case] groups: &[usize], #[case] expected: f64) {
    assert_close(crate::participation_coefficient(groups), expected);
}

#[derive(Debug, Clone)]
struct RandomNetwork {
    edges: Vec<(usize, usize, f64)>,
    site_clusters: Vec<u8>,
    species_clusters: Vec<u8>,
}

fn network_strategy() -> impl Strategy<Value = RandomNetwork> {
    (1usize..8, 1usize..10).prop_flat_map(|(sites, species)| {
        (
            vec((0..sites, 0..species, 1.0f64..20.0), 1..40),
            vec(1u8..5, sites),
            vec(1u8..5, species),
        )
            .prop_map(|(edges, site_clusters, species_clusters)| RandomNetwork {
                edges,
                site_clusters,
                species_clusters,
            })
    })
}

fn build(network: &RandomNetwork) -> (PartitionTable, OccurrenceRelation) {
    let relation = OccurrenceRelation::new(
        network
            .edges
            .iter()
            .map(|&(s, p, w)| Occurrence::new(format!("site{s}"), format!("sp{p}")).with_abundance(w))
            .collect(),
    );
    let mut records = Vec::new();
    for (s, cluster) in network.site_clusters.iter().enumerate() {
        let path = HierarchyPath::from_segments([cluster.to_string()]).expect("non-empty");
        records.push(TreeRecord::new(path, 0.0, format!("site{s}"), records.len() as u64 + 1));
    }
    for (p, cluster) in network.species_clusters.iter().enumerate() {
        let path = HierarchyPath::from_segments([cluster.to_string()]).expect("non-empty");
        records.push(TreeRecord::new(path, 0.0, format!("sp{p}"), records.len() as u64 + 1));
    }
    (PartitionTable::from_records(&records, false), relation)
}

proptest! {
    #![proptest_config(suite_proptest_config(96))]

    #[test]
    fn participation_stays_within_bounds(network in network_strategy()) {
        let (table, relation) = build(&network);
        let metrics = ClusterMetrics::new(&table, &relation, LevelId::FIRST)
            .expect("level exists");
        let values = metrics
            .participation_coefficients()
            .expect("labels are disjoint")
            .into_value();
        prop_assert_eq!(values.len(), relation.sites().len() + relation.species().len());
        for value in values {
            prop_assert!((0.0..=1.0).contains(&value.coefficient));
            prop_assert_eq!(value.assigned, value.degree);
        }
    }

    #[test]
    fn indval_and_dilval_sum_to_affinity(network in network_strategy()) {
        let (table, relation) = build(&network);
        let metrics = ClusterMetrics::new(&table, &relation, LevelId::FIRST)
            .expect("level exists");
        for stats in metrics.species_stats().into_value() {
            let o = stats.occurrence;
            if o.ai.is_nan() {
                continue;
            }
            prop_assert!((o.indval + o.dilval - o.ai).abs() < 1e-9);
            prop_assert!(o.fi > 0.0 || o.ri == 0.0);
            prop_assert!(o.fi <= 1.0);
        }
    }

    #[test]
    fn region_site_counts_cover_all_sites(network in network_strategy()) {
        let (table, relation) = build(&network);
        let metrics = ClusterMetrics::new(&table, &relation, LevelId::FIRST)
            .expect("level exists");
        let regions = metrics.region_stats().into_value();
        let total: usize = regions.iter().map(|r| r.sites).sum();
        prop_assert_eq!(total, relation.sites().len());
        let clusters: BTreeSet<&str> = regions.iter().map(|r| r.cluster.as_str()).collect();
        prop_assert_eq!(clusters.len(), regions.len());
    }
}
