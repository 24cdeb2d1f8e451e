//! Command implementations and argument parsing for the biogeonet CLI.

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use biogeonet_core::{
    AreaTable, ClusterColoring, ClusterMetrics, ColoringConfig, ConfigurationError,
    DiagnosticsReport, HierarchyError, HierarchySummary, LevelId, MetricsError,
    OccurrenceRelation, OrderingMode, OverflowPolicy, PartitionTable, TableError,
    TreeParseOptions, color_clusters, read_tree,
};
use biogeonet_providers_delimited::{
    AreaColumns, DelimitedOptions, DelimitedProviderError, FieldSelector, RelationColumns,
    read_areas, read_relation,
};
use biogeonet_providers_network::{
    GdfCounts, GdfOptions, NetworkCounts, NetworkFormatError, write_gdf, write_pajek,
};
use biogeonet_providers_parquet::{
    ParquetColumns, ParquetProviderError, read_relation_parquet_reader,
};
use clap::{Args, Parser, Subcommand};
use thiserror::Error;
use tracing::{Span, field, info, instrument};

use super::output;

const DEFAULT_MAX_COLORS: usize = 12;

/// Top-level CLI options parsed by [`clap`].
#[derive(Debug, Parser, Clone)]
#[command(
    name = "biogeonet",
    about = "Analyse hierarchical bioregionalisations of site-species networks."
)]
pub struct Cli {
    /// Command to execute.
    #[command(subcommand)]
    pub command: Command,
}

/// Supported CLI commands.
#[derive(Debug, Subcommand, Clone)]
pub enum Command {
    /// Write the Pajek network file consumed by the clustering tool.
    Network(NetworkCommand),
    /// Parse a tree file and write its partition table.
    Tree(TreeCommand),
    /// Compute region, species, site and participation statistics.
    Metrics(MetricsCommand),
    /// Rank and colour the clusters of one level.
    Colors(ColorsCommand),
    /// Write the annotated GDF graph-exchange file.
    Gdf(GdfCommand),
}

impl Command {
    /// Subcommand name as typed on the command line.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Network(_) => "network",
            Self::Tree(_) => "tree",
            Self::Metrics(_) => "metrics",
            Self::Colors(_) => "colors",
            Self::Gdf(_) => "gdf",
        }
    }
}

/// Column selection for occurrence relation files.
///
/// Delimited files select columns by header name or zero-based position and
/// default to the first two columns. Parquet files select by name and
/// default to `site` and `species`.
#[derive(Debug, Args, Clone, Default)]
pub struct RelationArgs {
    /// Site column (name or zero-based position).
    #[arg(long = "site-field")]
    pub site_field: Option<FieldSelector>,

    /// Species column (name or zero-based position).
    #[arg(long = "species-field")]
    pub species_field: Option<FieldSelector>,

    /// Optional abundance column (name or zero-based position).
    #[arg(long = "abundance-field")]
    pub abundance_field: Option<FieldSelector>,

    /// Field delimiter of delimited files; inferred from the extension when
    /// omitted.
    #[arg(long)]
    pub delimiter: Option<char>,

    /// Treat the first row of delimited files as data.
    #[arg(long = "no-header")]
    pub no_header: bool,
}

/// Tree file input shared by the commands that read a hierarchy.
#[derive(Debug, Args, Clone)]
pub struct TreeArgs {
    /// Tree file written by the clustering tool.
    pub tree: PathBuf,

    /// Separator between path segments.
    #[arg(long = "tree-delimiter", default_value_t = ':')]
    pub tree_delimiter: char,

    /// Keep numeric leaf identifiers instead of replacing them by node names.
    #[arg(long = "keep-leaf-ids")]
    pub keep_leaf_ids: bool,
}

/// Palette options shared by `colors` and `gdf`.
#[derive(Debug, Args, Clone)]
pub struct ColorArgs {
    /// Number of palette colours available before overflow applies.
    #[arg(long = "max-colors", default_value_t = DEFAULT_MAX_COLORS)]
    pub max_colors: usize,

    /// Cluster ordering: insertion, sites, species or combined.
    #[arg(long = "order-by", default_value_t = OrderingMode::Insertion)]
    pub order_by: OrderingMode,

    /// Overflow policy: none, grayscale or single:<colour>.
    #[arg(long, default_value = "none")]
    pub overflow: OverflowPolicy,
}

impl ColorArgs {
    fn config(&self) -> Result<ColoringConfig, ConfigurationError> {
        ColoringConfig::builder()
            .max_colors(self.max_colors)
            .ordering(self.order_by)
            .overflow(self.overflow)
            .build()
    }
}

/// Options accepted by the `network` command.
#[derive(Debug, Args, Clone)]
pub struct NetworkCommand {
    /// Occurrence relation file (`.parquet`, `.csv` or `.tsv`).
    pub relation: PathBuf,

    /// Relation column selection.
    #[command(flatten)]
    pub fields: RelationArgs,

    /// Destination network file.
    #[arg(long, short)]
    pub output: PathBuf,
}

/// Options accepted by the `tree` command.
#[derive(Debug, Args, Clone)]
pub struct TreeCommand {
    /// Tree input.
    #[command(flatten)]
    pub tree: TreeArgs,

    /// Relation used to tag nodes as sites or species.
    #[arg(long)]
    pub relation: Option<PathBuf>,

    /// Relation column selection.
    #[command(flatten)]
    pub fields: RelationArgs,

    /// Destination of the partition table (tab-separated).
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}

/// Options accepted by the `metrics` command.
#[derive(Debug, Args, Clone)]
pub struct MetricsCommand {
    /// Tree input.
    #[command(flatten)]
    pub tree: TreeArgs,

    /// Occurrence relation file.
    pub relation: PathBuf,

    /// Relation column selection.
    #[command(flatten)]
    pub fields: RelationArgs,

    /// Level whose clusters are analysed (`lvl2`, `Level_2` or `2`).
    #[arg(long, default_value_t = LevelId::FIRST)]
    pub level: LevelId,

    /// Per-site area table enabling the area-based statistics.
    #[arg(long)]
    pub areas: Option<PathBuf>,

    /// Measure site robustness towards this cluster.
    #[arg(long)]
    pub focal: Option<String>,

    /// Directory receiving `regions.tsv`, `species.tsv`, `sites.tsv` and
    /// `participation.tsv`.
    #[arg(long = "output-dir", short)]
    pub output_dir: PathBuf,
}

/// Options accepted by the `colors` command.
#[derive(Debug, Args, Clone)]
pub struct ColorsCommand {
    /// Tree input.
    #[command(flatten)]
    pub tree: TreeArgs,

    /// Occurrence relation file.
    pub relation: PathBuf,

    /// Relation column selection.
    #[command(flatten)]
    pub fields: RelationArgs,

    /// Level whose clusters are coloured.
    #[arg(long, default_value_t = LevelId::FIRST)]
    pub level: LevelId,

    /// Palette configuration.
    #[command(flatten)]
    pub colors: ColorArgs,

    /// Destination of the colour table (tab-separated).
    #[arg(long, short)]
    pub output: Option<PathBuf>,
}

/// Options accepted by the `gdf` command.
#[derive(Debug, Args, Clone)]
pub struct GdfCommand {
    /// Tree input.
    #[command(flatten)]
    pub tree: TreeArgs,

    /// Occurrence relation file.
    pub relation: PathBuf,

    /// Relation column selection.
    #[command(flatten)]
    pub fields: RelationArgs,

    /// Destination GDF file.
    #[arg(long, short)]
    pub output: PathBuf,

    /// Colour nodes by their cluster at this level.
    #[arg(long = "color-level")]
    pub color_level: Option<LevelId>,

    /// Palette configuration used with `--color-level`.
    #[command(flatten)]
    pub colors: ColorArgs,

    /// Write colours as `#RRGGBB` instead of `'r,g,b'`.
    #[arg(long = "raw-colors")]
    pub raw_colors: bool,

    /// Mark edges as directed.
    #[arg(long)]
    pub directed: bool,
}

/// Errors surfaced while executing CLI commands.
#[derive(Debug, Error)]
pub enum CliError {
    /// A file could not be opened or created.
    #[error("failed to access `{path}`: {source}")]
    Io {
        /// Path that triggered the failure.
        path: PathBuf,
        /// Underlying operating system error.
        #[source]
        source: io::Error,
    },
    /// The delimiter is not a single ASCII character.
    #[error("delimiter `{provided}` must be a single ASCII character")]
    InvalidDelimiter {
        /// Character supplied on the command line.
        provided: char,
    },
    /// A Parquet column was selected by position.
    #[error("parquet {field} column must be selected by name")]
    ParquetNeedsNames {
        /// Field whose selector was positional.
        field: &'static str,
    },
    /// The tree file could not be parsed.
    #[error(transparent)]
    Hierarchy(#[from] HierarchyError),
    /// A derived column could not be attached.
    #[error(transparent)]
    Table(#[from] TableError),
    /// A metric computation failed.
    #[error(transparent)]
    Metrics(#[from] MetricsError),
    /// Level or palette configuration was rejected.
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    /// Delimited ingestion failed.
    #[error(transparent)]
    Delimited(#[from] DelimitedProviderError),
    /// Parquet ingestion failed.
    #[error(transparent)]
    Parquet(#[from] ParquetProviderError),
    /// A network file could not be written.
    #[error(transparent)]
    Network(#[from] NetworkFormatError),
    /// A result table could not be written.
    #[error("failed to write table: {0}")]
    Csv(#[from] csv::Error),
}

impl CliError {
    /// Stable machine-readable code of the underlying library error, if it
    /// carries one.
    #[must_use]
    pub fn code(&self) -> Option<&'static str> {
        match self {
            Self::Hierarchy(err) => Some(err.code().as_str()),
            Self::Table(err) => Some(err.code().as_str()),
            Self::Metrics(err) => Some(err.code().as_str()),
            Self::Configuration(err) | Self::Network(NetworkFormatError::Color(err)) => {
                Some(err.code().as_str())
            }
            _ => None,
        }
    }
}

/// Summarises the outcome of executing a CLI command.
#[derive(Debug, Clone)]
pub enum ExecutionSummary {
    /// Result of `network`.
    Network {
        /// File written.
        output: PathBuf,
        /// Vertices and edges written.
        counts: NetworkCounts,
    },
    /// Result of `tree`.
    Tree {
        /// Node, level and cluster counts.
        summary: HierarchySummary,
        /// Codelength announced in the tree header.
        codelength: Option<f64>,
        /// Nodes matching no relation label.
        unclassified: usize,
        /// Partition table file, when requested.
        output: Option<PathBuf>,
    },
    /// Result of `metrics`.
    Metrics {
        /// Level analysed.
        level: LevelId,
        /// Rows written to `regions.tsv`.
        regions: usize,
        /// Rows written to `species.tsv`.
        species: usize,
        /// Rows written to `sites.tsv`.
        sites: usize,
        /// Rows written to `participation.tsv`.
        nodes: usize,
        /// Data-quality diagnostics raised along the way.
        diagnostics: usize,
        /// Directory holding the tables.
        output_dir: PathBuf,
    },
    /// Result of `colors`.
    Colors {
        /// Colours in rank order.
        coloring: ClusterColoring,
        /// Colour table file, when requested.
        output: Option<PathBuf>,
    },
    /// Result of `gdf`.
    Gdf {
        /// File written.
        output: PathBuf,
        /// Nodes and edges written.
        counts: GdfCounts,
    },
}

/// Executes the CLI command represented by `cli`.
///
/// # Errors
/// Returns [`CliError`] when an input cannot be read, a computation fails or
/// an output cannot be written.
///
/// # Examples
/// ```
/// # use std::error::Error;
/// # use biogeonet_cli::cli::{Cli, Command, ExecutionSummary, RelationArgs, TreeArgs, TreeCommand, run_cli};
/// # use tempfile::NamedTempFile;
/// #
/// # fn main() -> Result<(), Box<dyn Error>> {
/// let file = NamedTempFile::new()?;
/// std::fs::write(file.path(), "# header\n1:1 0.5 \"A\" 1\n2:1 0.5 \"Sp1\" 2\n")?;
/// let cli = Cli {
///     command: Command::Tree(TreeCommand {
///         tree: TreeArgs {
///             tree: file.path().to_path_buf(),
///             tree_delimiter: ':',
///             keep_leaf_ids: false,
///         },
///         relation: None,
///         fields: RelationArgs::default(),
///         output: None,
///     }),
/// };
/// let ExecutionSummary::Tree { summary, .. } = run_cli(cli)? else {
///     unreachable!("tree command returns a tree summary");
/// };
/// assert_eq!(summary.clusters_per_level, vec![2, 2]);
/// # Ok(())
/// # }
/// ```
#[instrument(name = "cli.run", err, skip(cli), fields(command = field::Empty))]
pub fn run_cli(cli: Cli) -> Result<ExecutionSummary, CliError> {
    Span::current().record("command", cli.command.name());
    match cli.command {
        Command::Network(command) => run_network(command),
        Command::Tree(command) => run_tree(command),
        Command::Metrics(command) => run_metrics(command),
        Command::Colors(command) => run_colors(command),
        Command::Gdf(command) => run_gdf(command),
    }
}

#[instrument(name = "cli.network", err, skip(command), fields(output = %command.output.display()))]
pub(super) fn run_network(command: NetworkCommand) -> Result<ExecutionSummary, CliError> {
    let relation = load_relation(&command.relation, &command.fields)?;
    let counts = write_pajek(&relation, create(&command.output)?)?;
    info!(
        vertices = counts.species + counts.sites,
        edges = counts.edges,
        "network written"
    );
    Ok(ExecutionSummary::Network {
        output: command.output,
        counts,
    })
}

#[instrument(
    name = "cli.tree",
    err,
    skip(command),
    fields(tree = %command.tree.tree.display(), tagged = command.relation.is_some()),
)]
pub(super) fn run_tree(command: TreeCommand) -> Result<ExecutionSummary, CliError> {
    let TreeCommand {
        tree,
        relation,
        fields,
        output,
    } = command;
    let (parsed, codelength) = load_tree(&tree)?;
    let (table, unclassified) = match relation {
        Some(path) => {
            let occurrences = load_relation(&path, &fields)?;
            let (tagged, report) = parsed.tag_node_types(&occurrences).into_parts();
            (tagged, report.unclassified_count())
        }
        None => (parsed, 0),
    };
    if let Some(path) = &output {
        output::write_partition_table(&table, create(path)?)?;
    }
    let summary = table.summary();
    info!(
        nodes = summary.nodes,
        depth = summary.depth,
        unclassified,
        "tree processed"
    );
    Ok(ExecutionSummary::Tree {
        summary,
        codelength,
        unclassified,
        output,
    })
}

#[instrument(
    name = "cli.metrics",
    err,
    skip(command),
    fields(level = %command.level, focal = field::Empty, areas = command.areas.is_some()),
)]
pub(super) fn run_metrics(command: MetricsCommand) -> Result<ExecutionSummary, CliError> {
    let MetricsCommand {
        tree,
        relation,
        fields,
        level,
        areas,
        focal,
        output_dir,
    } = command;
    if let Some(cluster) = &focal {
        Span::current().record("focal", cluster.as_str());
    }
    let (table, occurrences, mut report) = load_inputs(&tree, &relation, &fields)?;
    let area_table = areas.as_deref().map(load_areas).transpose()?;

    let mut metrics = ClusterMetrics::new(&table, &occurrences, level)?;
    if let Some(area_table) = &area_table {
        metrics = metrics.with_areas(area_table);
    }
    let (regions, region_report) = metrics.region_stats().into_parts();
    let (species, species_report) = metrics.species_stats().into_parts();
    let sites = match focal.as_deref() {
        Some(cluster) => metrics.site_stats_towards(cluster)?,
        None => metrics.site_stats()?,
    };
    let (sites, site_report) = sites.into_parts();
    let (participation, participation_report) =
        metrics.participation_coefficients()?.into_parts();
    for part in [region_report, species_report, site_report, participation_report] {
        report.merge(part);
    }

    fs::create_dir_all(&output_dir).map_err(|source| CliError::Io {
        path: output_dir.clone(),
        source,
    })?;
    output::write_region_stats(&regions, create(&output_dir.join("regions.tsv"))?)?;
    output::write_species_stats(&species, create(&output_dir.join("species.tsv"))?)?;
    output::write_site_stats(&sites, create(&output_dir.join("sites.tsv"))?)?;
    output::write_participation(
        &participation,
        create(&output_dir.join("participation.tsv"))?,
    )?;
    info!(
        regions = regions.len(),
        species = species.len(),
        sites = sites.len(),
        diagnostics = report.len(),
        "metrics written"
    );
    Ok(ExecutionSummary::Metrics {
        level,
        regions: regions.len(),
        species: species.len(),
        sites: sites.len(),
        nodes: participation.len(),
        diagnostics: report.len(),
        output_dir,
    })
}

#[instrument(
    name = "cli.colors",
    err,
    skip(command),
    fields(level = %command.level, order_by = %command.colors.order_by, max_colors = command.colors.max_colors),
)]
pub(super) fn run_colors(command: ColorsCommand) -> Result<ExecutionSummary, CliError> {
    let config = command.colors.config()?;
    let (table, occurrences, _) = load_inputs(&command.tree, &command.relation, &command.fields)?;
    let coloring = color_clusters(&table, &occurrences, command.level, &config)?;
    if let Some(path) = &command.output {
        output::write_coloring(&coloring, create(path)?)?;
    }
    Ok(ExecutionSummary::Colors {
        coloring,
        output: command.output,
    })
}

#[instrument(
    name = "cli.gdf",
    err,
    skip(command),
    fields(output = %command.output.display(), color_level = field::Empty, directed = command.directed),
)]
pub(super) fn run_gdf(command: GdfCommand) -> Result<ExecutionSummary, CliError> {
    let (table, occurrences, _) = load_inputs(&command.tree, &command.relation, &command.fields)?;
    let options = GdfOptions::new()
        .with_directed(command.directed)
        .with_raw_colors(command.raw_colors);
    let (table, options) = match command.color_level {
        Some(level) => {
            Span::current().record("color_level", field::display(level));
            let coloring = color_clusters(&table, &occurrences, level, &command.colors.config()?)?;
            let name = coloring.column_name();
            let colored = table.with_column(name.clone(), coloring.to_column(&table)?)?;
            (colored, options.with_color_column(name))
        }
        None => (table, options),
    };
    let counts = write_gdf(&table, &occurrences, &options, create(&command.output)?)?;
    Ok(ExecutionSummary::Gdf {
        output: command.output,
        counts,
    })
}

/// Parses the tree file and builds its partition table.
fn load_tree(args: &TreeArgs) -> Result<(PartitionTable, Option<f64>), CliError> {
    let options = TreeParseOptions::new()
        .with_delimiter(args.tree_delimiter)
        .with_leaf_names(!args.keep_leaf_ids);
    let tree = read_tree(BufReader::new(open(&args.tree)?), &options)?;
    let table = PartitionTable::from_tree(&tree, &options);
    Ok((table, tree.header().codelength()))
}

/// Loads tree and relation, then tags the table's node types.
fn load_inputs(
    tree: &TreeArgs,
    relation: &Path,
    fields: &RelationArgs,
) -> Result<(PartitionTable, OccurrenceRelation, DiagnosticsReport), CliError> {
    let (table, _) = load_tree(tree)?;
    let occurrences = load_relation(relation, fields)?;
    let (tagged, report) = table.tag_node_types(&occurrences).into_parts();
    Ok((tagged, occurrences, report))
}

#[instrument(
    name = "cli.load_relation",
    err,
    skip(fields),
    fields(path = %path.display(), format = field::Empty, rows = field::Empty),
)]
pub(super) fn load_relation(
    path: &Path,
    fields: &RelationArgs,
) -> Result<OccurrenceRelation, CliError> {
    let span = Span::current();
    let file = open(path)?;
    let relation = if is_parquet(path) {
        span.record("format", "parquet");
        read_relation_parquet_reader(file, &parquet_columns(fields)?)?
    } else {
        span.record("format", "delimited");
        let options = delimited_options(path, fields)?;
        read_relation(BufReader::new(file), &relation_columns(fields), &options)?
    };
    span.record("rows", relation.len());
    Ok(relation)
}

fn load_areas(path: &Path) -> Result<AreaTable, CliError> {
    let options = DelimitedOptions::for_path(path);
    let areas = read_areas(BufReader::new(open(path)?), &AreaColumns::default(), &options)?;
    Ok(areas)
}

fn is_parquet(path: &Path) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("parquet"))
}

fn delimited_options(path: &Path, fields: &RelationArgs) -> Result<DelimitedOptions, CliError> {
    let options = DelimitedOptions::for_path(path).with_headers(!fields.no_header);
    match fields.delimiter {
        Some(provided) => {
            let byte = u8::try_from(provided)
                .ok()
                .filter(u8::is_ascii)
                .ok_or(CliError::InvalidDelimiter { provided })?;
            Ok(options.with_delimiter(byte))
        }
        None => Ok(options),
    }
}

fn relation_columns(fields: &RelationArgs) -> RelationColumns {
    let defaults = RelationColumns::default();
    let columns = RelationColumns::new(
        fields
            .site_field
            .clone()
            .unwrap_or_else(|| defaults.site().clone()),
        fields
            .species_field
            .clone()
            .unwrap_or_else(|| defaults.species().clone()),
    );
    match &fields.abundance_field {
        Some(abundance) => columns.with_abundance(abundance.clone()),
        None => columns,
    }
}

pub(super) fn parquet_columns(fields: &RelationArgs) -> Result<ParquetColumns, CliError> {
    let columns = ParquetColumns::new(
        column_name(fields.site_field.as_ref(), "site")?,
        column_name(fields.species_field.as_ref(), "species")?,
    );
    match &fields.abundance_field {
        Some(abundance) => Ok(columns.with_abundance(column_name(Some(abundance), "abundance")?)),
        None => Ok(columns),
    }
}

fn column_name(selector: Option<&FieldSelector>, field: &'static str) -> Result<String, CliError> {
    match selector {
        None => Ok(field.to_owned()),
        Some(FieldSelector::Name(name)) => Ok(name.clone()),
        Some(FieldSelector::Position(_)) => Err(CliError::ParquetNeedsNames { field }),
    }
}

fn open(path: &Path) -> Result<File, CliError> {
    File::open(path).map_err(|source| CliError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn create(path: &Path) -> Result<BufWriter<File>, CliError> {
    File::create(path)
        .map(BufWriter::new)
        .map_err(|source| CliError::Io {
            path: path.to_path_buf(),
            source,
        })
}

/// Renders `summary` to `writer` in a human-readable text format.
///
/// # Errors
/// Returns [`io::Error`] if writing to the supplied writer fails.
pub fn render_summary(summary: &ExecutionSummary, mut writer: impl Write) -> io::Result<()> {
    match summary {
        ExecutionSummary::Network { output, counts } => {
            writeln!(writer, "network: {}", output.display())?;
            writeln!(writer, "species: {}", counts.species)?;
            writeln!(writer, "sites: {}", counts.sites)?;
            writeln!(writer, "edges: {}", counts.edges)?;
        }
        ExecutionSummary::Tree {
            summary,
            codelength,
            unclassified,
            output,
        } => {
            writeln!(writer, "hierarchy: {summary}")?;
            if let Some(codelength) = codelength {
                writeln!(writer, "codelength: {codelength}")?;
            }
            writeln!(writer, "unclassified: {unclassified}")?;
            if let Some(output) = output {
                writeln!(writer, "table: {}", output.display())?;
            }
        }
        ExecutionSummary::Metrics {
            level,
            regions,
            species,
            sites,
            nodes,
            diagnostics,
            output_dir,
        } => {
            writeln!(writer, "level: {level}")?;
            writeln!(writer, "regions: {regions}")?;
            writeln!(writer, "species: {species}")?;
            writeln!(writer, "sites: {sites}")?;
            writeln!(writer, "participation: {nodes}")?;
            writeln!(writer, "diagnostics: {diagnostics}")?;
            writeln!(writer, "output: {}", output_dir.display())?;
        }
        ExecutionSummary::Colors { coloring, output } => {
            writeln!(writer, "level: {}", coloring.level())?;
            for entry in coloring.entries() {
                writeln!(writer, "{}\t{}\t{}", entry.rank, entry.cluster, entry.color)?;
            }
            if let Some(output) = output {
                writeln!(writer, "table: {}", output.display())?;
            }
        }
        ExecutionSummary::Gdf { output, counts } => {
            writeln!(writer, "gdf: {}", output.display())?;
            writeln!(writer, "nodes: {}", counts.nodes)?;
            writeln!(writer, "edges: {}", counts.edges)?;
            writeln!(writer, "skipped edges: {}", counts.skipped_edges)?;
        }
    }
    Ok(())
}
