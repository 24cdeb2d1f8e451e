//! Cluster metric and colouring benchmarks.
//!
//! Parses and tags a synthetic network once per size, then measures the
//! per-level computations in isolation from parsing.
#![expect(
    missing_docs,
    reason = "Criterion macros generate items without doc comments"
)]
#![expect(
    clippy::shadow_reuse,
    reason = "Criterion bench_with_input closures rebind parameter names"
)]
use criterion::{BenchmarkId, Criterion, criterion_group, criterion_main};

use biogeonet_benches::{
    error::BenchSetupError,
    params::LevelBenchParams,
    source::{SyntheticConfig, SyntheticNetwork},
};
use biogeonet_core::{
    ClusterMetrics, ColoringConfig, LevelId, OccurrenceRelation, OrderingMode, OverflowPolicy,
    PartitionTable, TreeParseOptions, color_clusters, parse_tree,
};

/// Seed used for all synthetic data generation in this benchmark.
const SEED: u64 = 7;

/// Site counts to benchmark; species are twice as many.
const SITE_COUNTS: &[usize] = &[250, 1_000, 4_000];

/// Levels measured: the coarse clusters and their sub-clusters.
const LEVELS: &[usize] = &[1, 2];

struct Prepared {
    table: PartitionTable,
    relation: OccurrenceRelation,
}

fn prepare(sites: usize) -> Result<Prepared, BenchSetupError> {
    let network = SyntheticNetwork::generate(&SyntheticConfig {
        sites,
        species: sites.saturating_mul(2),
        clusters: 8,
        species_per_site: 12,
        fidelity: 0.8,
        seed: SEED,
    })?;
    let options = TreeParseOptions::default();
    let tree = parse_tree(network.tree(), &options)?;
    let table = PartitionTable::from_tree(&tree, &options)
        .tag_node_types(network.relation())
        .into_value();
    Ok(Prepared {
        table,
        relation: network.relation().clone(),
    })
}

fn level(index: usize) -> Result<LevelId, BenchSetupError> {
    LevelId::new(index).ok_or(BenchSetupError::ZeroValue { context: "level" })
}

fn metrics_impl(c: &mut Criterion) -> Result<(), BenchSetupError> {
    let mut group = c.benchmark_group("cluster_metrics");
    group.sample_size(20);

    for &sites in SITE_COUNTS {
        let prepared = prepare(sites)?;
        for &index in LEVELS {
            let metrics = ClusterMetrics::new(&prepared.table, &prepared.relation, level(index)?)?;
            let params = LevelBenchParams { sites, level: index };
            group.bench_with_input(
                BenchmarkId::new("species_stats", &params),
                &metrics,
                |b, metrics| b.iter(|| metrics.species_stats()),
            );
            group.bench_with_input(
                BenchmarkId::new("site_stats", &params),
                &metrics,
                |b, metrics| b.iter(|| metrics.site_stats()),
            );
            group.bench_with_input(
                BenchmarkId::new("participation", &params),
                &metrics,
                |b, metrics| b.iter(|| metrics.participation_coefficients()),
            );
        }
    }

    group.finish();
    Ok(())
}

fn coloring_impl(c: &mut Criterion) -> Result<(), BenchSetupError> {
    let mut group = c.benchmark_group("color_clusters");
    let config = ColoringConfig::builder()
        .ordering(OrderingMode::Combined)
        .overflow(OverflowPolicy::Grayscale)
        .build()?;

    for &sites in SITE_COUNTS {
        let prepared = prepare(sites)?;
        for &index in LEVELS {
            let lvl = level(index)?;
            let params = LevelBenchParams { sites, level: index };
            group.bench_with_input(
                BenchmarkId::from_parameter(&params),
                &prepared,
                |b, prepared| {
                    b.iter(|| color_clusters(&prepared.table, &prepared.relation, lvl, &config));
                },
            );
        }
    }

    group.finish();
    Ok(())
}

fn metrics_bench(c: &mut Criterion) {
    if let Err(err) = metrics_impl(c) {
        panic!("cluster_metrics benchmark setup failed: {err}");
    }
}

fn coloring_bench(c: &mut Criterion) {
    if let Err(err) = coloring_impl(c) {
        panic!("color_clusters benchmark setup failed: {err}");
    }
}

criterion_group!(benches, metrics_bench, coloring_bench);
criterion_main!(benches);
