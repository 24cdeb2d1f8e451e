//! Command-line interface for biogeonet.
//!
//! Each subcommand loads a tree file and/or an occurrence relation through
//! the providers, runs one core computation and writes its results as
//! tab-separated tables or network files.

mod commands;
mod output;

pub use commands::{
    Cli, CliError, ColorArgs, ColorsCommand, Command, ExecutionSummary, GdfCommand,
    MetricsCommand, NetworkCommand, RelationArgs, TreeArgs, TreeCommand, render_summary,
    run_cli,
};
pub use output::{
    write_coloring, write_participation, write_partition_table, write_region_stats,
    write_site_stats, write_species_stats,
};

#[cfg(test)]
mod test_helpers;
