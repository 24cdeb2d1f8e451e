//! Biogeonet core library.
//!
//! Turns the hierarchical clustering of a bipartite site–species network
//! into a per-node [`PartitionTable`], and derives bioregion statistics and
//! deterministic cluster colours from it.
//!
//! ```
//! use biogeonet_core::{
//!     ClusterMetrics, LevelId, OccurrenceRelation, PartitionTable, TreeParseOptions,
//!     parse_tree,
//! };
//!
//! let tree = "# codelength 1.0 bits\n1 0.5 \"A\" 1\n1 0.5 \"Sp1\" 2\n";
//! let options = TreeParseOptions::default();
//! let parsed = parse_tree(tree, &options)?;
//! let relation = OccurrenceRelation::from_triples([("A", "Sp1", None)]);
//! let table = PartitionTable::from_tree(&parsed, &options);
//! let metrics = ClusterMetrics::new(&table, &relation, LevelId::FIRST)?;
//! let regions = metrics.region_stats().into_value();
//! assert_eq!(regions[0].sites, 1);
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
#![cfg_attr(docsrs, feature(doc_cfg))]

mod coloring;
mod diagnostics;
mod error;
mod hierarchy;
mod level;
mod metrics;
mod partition;
mod relation;

#[cfg(test)]
mod test_utils;

pub use crate::{
    coloring::{
        ClusterColor, ClusterColoring, ClusterRanking, Color, ColoringConfig,
        ColoringConfigBuilder, DEFAULT_PALETTE, OrderingMode, OverflowPolicy, RankedCluster,
        assign_colors, color_clusters, rank_clusters,
    },
    diagnostics::{Diagnostic, DiagnosticsReport, Reported, UnclassifiedReason},
    error::{
        ConfigurationError, ConfigurationErrorCode, HierarchyError, HierarchyErrorCode,
        MetricsError, MetricsErrorCode, TableError, TableErrorCode,
    },
    hierarchy::{
        HierarchyPath, LEVEL_SEPARATOR, LevelMatrix, ParsedTree, TreeHeader, TreeParseOptions,
        TreeRecord, materialize_levels, parse_tree, read_tree, resolve_leaf_names,
    },
    level::LevelId,
    metrics::{
        AreaTable, ClusterMetrics, OccurrenceIndices, Participation, RegionStats, SiteStats,
        SpeciesStats, participation_coefficient,
    },
    partition::{
        DerivedColumn, HierarchySummary, LevelColumn, NodeRow, NodeType, PartitionTable,
    },
    relation::{Occurrence, OccurrenceRelation},
};
