//! The canonical node table shared by every downstream computation.
//!
//! A [`PartitionTable`] holds one row per hierarchy node with its name, id,
//! quality value, node type and one categorical [`LevelColumn`] per level.
//! The base table is immutable; derived columns (colours, metrics) are
//! attached with [`PartitionTable::with_column`], which returns a new table
//! sharing the base data.

mod column;

use std::{collections::HashMap, fmt, sync::Arc};

use tracing::{info, instrument};

use crate::{
    diagnostics::{Diagnostic, DiagnosticsReport, Reported, UnclassifiedReason},
    error::TableError,
    hierarchy::{LevelMatrix, ParsedTree, TreeParseOptions, TreeRecord, materialize_levels, resolve_leaf_names},
    level::LevelId,
    relation::OccurrenceRelation,
};

pub use self::column::LevelColumn;

/// Role of a node in the bipartite relation.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum NodeType {
    /// The node's name is a site label of the relation.
    Site,
    /// The node's name is a species label of the relation.
    Species,
    /// The node is absent from the relation, or no relation was applied.
    #[default]
    Unknown,
}

impl NodeType {
    /// Lower-case label used in exported tables.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Site => "site",
            Self::Species => "species",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fixed per-node attributes of a [`PartitionTable`] row.
#[derive(Clone, Debug, PartialEq)]
pub struct NodeRow {
    name: String,
    node_id: u64,
    code_length: f64,
    node_type: NodeType,
}

impl NodeRow {
    /// Node name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Node id reported by the clustering tool.
    #[must_use]
    pub fn node_id(&self) -> u64 {
        self.node_id
    }

    /// Quality value reported by the clustering tool.
    #[must_use]
    pub fn code_length(&self) -> f64 {
        self.code_length
    }

    /// Site, species or unknown.
    #[must_use]
    pub fn node_type(&self) -> NodeType {
        self.node_type
    }
}

/// Values of an appended column, one per row.
#[derive(Clone, Debug, PartialEq)]
pub enum DerivedColumn {
    /// Textual values such as colours.
    Text(Vec<Option<String>>),
    /// Numeric values such as metrics; `NaN` marks undefined results.
    Number(Vec<Option<f64>>),
}

impl DerivedColumn {
    /// Number of values.
    #[must_use]
    pub fn len(&self) -> usize {
        match self {
            Self::Text(values) => values.len(),
            Self::Number(values) => values.len(),
        }
    }

    /// Whether the column holds no values.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Value at `row` rendered as text; `None` for missing cells.
    #[must_use]
    pub fn display(&self, row: usize) -> Option<String> {
        match self {
            Self::Text(values) => values.get(row).cloned().flatten(),
            Self::Number(values) => values.get(row).copied().flatten().map(|v| v.to_string()),
        }
    }

    fn select(&self, rows: &[usize]) -> Self {
        match self {
            Self::Text(values) => Self::Text(
                rows.iter()
                    .map(|&row| values.get(row).cloned().flatten())
                    .collect(),
            ),
            Self::Number(values) => Self::Number(
                rows.iter()
                    .map(|&row| values.get(row).copied().flatten())
                    .collect(),
            ),
        }
    }
}

/// Size overview of a partition table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HierarchySummary {
    /// Number of nodes.
    pub nodes: usize,
    /// Number of level columns.
    pub depth: usize,
    /// Populated clusters per level, coarsest first.
    pub clusters_per_level: Vec<usize>,
}

impl fmt::Display for HierarchySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} nodes, {} levels", self.nodes, self.depth)?;
        for (offset, clusters) in self.clusters_per_level.iter().enumerate() {
            write!(f, "; lvl{}: {clusters} clusters", offset + 1)?;
        }
        Ok(())
    }
}

/// Immutable node table with append-only derived columns.
///
/// # Examples
/// ```
/// use biogeonet_core::{LevelId, PartitionTable, TreeParseOptions, parse_tree};
///
/// let text = "# header\n1:1 0.5 A 1\n1:2 0.2 Sp1 2\n2:1 0.3 B 3\n";
/// let options = TreeParseOptions::default();
/// let table = PartitionTable::from_tree(&parse_tree(text, &options)?, &options);
/// assert_eq!(table.depth(), 2);
/// assert_eq!(table.value("Sp1", LevelId::FIRST), Some("1"));
/// assert_eq!(table.value("Sp1", LevelId::new(2).expect("non-zero")), Some("Sp1"));
/// # Ok::<(), biogeonet_core::HierarchyError>(())
/// ```
#[derive(Clone, Debug)]
pub struct PartitionTable {
    rows: Arc<[NodeRow]>,
    levels: Arc<[LevelColumn]>,
    positions: Arc<HashMap<String, usize>>,
    derived: Vec<(String, Arc<DerivedColumn>)>,
}

impl PartitionTable {
    /// Builds the table from a parsed tree.
    #[must_use]
    pub fn from_tree(tree: &ParsedTree, options: &TreeParseOptions) -> Self {
        Self::from_records(tree.records(), options.resolve_leaf_names())
    }

    /// Builds the table from records, optionally resolving leaf names.
    #[must_use]
    pub fn from_records(records: &[TreeRecord], resolve: bool) -> Self {
        let matrix = materialize_levels(records);
        let matrix = if resolve {
            resolve_leaf_names(&matrix, records)
        } else {
            matrix
        };
        let rows = records
            .iter()
            .map(|record| NodeRow {
                name: record.name().to_owned(),
                node_id: record.node_id(),
                code_length: record.code_length(),
                node_type: NodeType::Unknown,
            })
            .collect();
        Self::assemble(rows, &matrix)
    }

    fn assemble(rows: Vec<NodeRow>, matrix: &LevelMatrix) -> Self {
        let levels = (1..=matrix.depth())
            .filter_map(LevelId::new)
            .map(|level| LevelColumn::build(level, matrix.column(level), level == LevelId::FIRST))
            .collect();
        Self::from_parts(rows, levels, Vec::new())
    }

    fn from_parts(
        rows: Vec<NodeRow>,
        levels: Vec<LevelColumn>,
        derived: Vec<(String, Arc<DerivedColumn>)>,
    ) -> Self {
        let mut positions = HashMap::with_capacity(rows.len());
        for (position, row) in rows.iter().enumerate() {
            positions.entry(row.name.clone()).or_insert(position);
        }
        Self {
            rows: rows.into(),
            levels: levels.into(),
            positions: Arc::new(positions),
            derived,
        }
    }

    /// Number of level columns `D`.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.levels.len()
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the table has no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Rows in tree-file order.
    #[must_use]
    pub fn rows(&self) -> &[NodeRow] {
        &self.rows
    }

    /// Level columns, coarsest first.
    #[must_use]
    pub fn levels(&self) -> &[LevelColumn] {
        &self.levels
    }

    /// Row index of the first node called `name`.
    #[must_use]
    pub fn position(&self, name: &str) -> Option<usize> {
        self.positions.get(name).copied()
    }

    /// The column for `level`, or `None` beyond the table depth.
    #[must_use]
    pub fn level(&self, level: LevelId) -> Option<&LevelColumn> {
        self.levels.get(level.offset())
    }

    /// The column for `level`.
    ///
    /// # Errors
    /// Returns [`TableError::UnknownLevel`] beyond the table depth.
    pub fn try_level(&self, level: LevelId) -> Result<&LevelColumn, TableError> {
        self.level(level).ok_or(TableError::UnknownLevel {
            level,
            depth: self.depth(),
        })
    }

    /// Value of node `name` at `level`.
    #[must_use]
    pub fn value(&self, name: &str, level: LevelId) -> Option<&str> {
        let row = self.position(name)?;
        self.level(level)?.value(row)
    }

    /// Classifies every row against `relation`.
    ///
    /// Rows whose name is a site label become [`NodeType::Site`], species
    /// labels become [`NodeType::Species`], anything else stays
    /// [`NodeType::Unknown`] and is reported. Relation entities missing from
    /// the hierarchy are reported too.
    #[instrument(
        name = "core.tag_node_types",
        skip(self, relation),
        fields(nodes = self.len(), relation_rows = relation.len()),
    )]
    pub fn tag_node_types(&self, relation: &OccurrenceRelation) -> Reported<Self> {
        let mut report = DiagnosticsReport::new();
        let rows: Vec<NodeRow> = self
            .rows
            .iter()
            .map(|row| {
                let node_type = if relation.is_site(&row.name) {
                    NodeType::Site
                } else if relation.is_species(&row.name) {
                    NodeType::Species
                } else {
                    report.push(Diagnostic::UnclassifiedNode {
                        name: row.name.clone(),
                        reason: UnclassifiedReason::AbsentFromRelation,
                    });
                    NodeType::Unknown
                };
                NodeRow {
                    node_type,
                    ..row.clone()
                }
            })
            .collect();
        report.extend(
            relation
                .sites()
                .iter()
                .chain(relation.species())
                .filter(|label| self.position(label).is_none())
                .map(|label| Diagnostic::UnclassifiedNode {
                    name: label.clone(),
                    reason: UnclassifiedReason::AbsentFromHierarchy,
                }),
        );
        let sites = rows.iter().filter(|row| row.node_type == NodeType::Site).count();
        let species = rows.iter().filter(|row| row.node_type == NodeType::Species).count();
        info!(sites, species, "node types tagged");
        report.summarise("tag_node_types");
        let table = Self {
            rows: rows.into(),
            levels: Arc::clone(&self.levels),
            positions: Arc::clone(&self.positions),
            derived: self.derived.clone(),
        };
        Reported::new(table, report)
    }

    /// Rows whose name is a site label of `relation`, with unused level
    /// values dropped.
    #[must_use]
    pub fn site_table(&self, relation: &OccurrenceRelation) -> Self {
        self.filter(|row| relation.is_site(row.name()))
    }

    /// Rows whose name is a species label of `relation`, with unused level
    /// values dropped.
    #[must_use]
    pub fn species_table(&self, relation: &OccurrenceRelation) -> Self {
        self.filter(|row| relation.is_species(row.name()))
    }

    fn filter(&self, keep: impl Fn(&NodeRow) -> bool) -> Self {
        let selected: Vec<usize> = self
            .rows
            .iter()
            .enumerate()
            .filter(|(_, row)| keep(row))
            .map(|(position, _)| position)
            .collect();
        let rows = selected
            .iter()
            .filter_map(|&position| self.rows.get(position).cloned())
            .collect();
        let levels = self.levels.iter().map(|column| column.select(&selected)).collect();
        let derived = self
            .derived
            .iter()
            .map(|(name, column)| (name.clone(), Arc::new(column.select(&selected))))
            .collect();
        Self::from_parts(rows, levels, derived)
    }

    /// Returns a new table with `column` appended under `name`.
    ///
    /// # Errors
    /// Returns [`TableError::DuplicateColumn`] when `name` is taken and
    /// [`TableError::ColumnLengthMismatch`] when the column does not have one
    /// value per row.
    pub fn with_column(&self, name: impl Into<String>, column: DerivedColumn) -> Result<Self, TableError> {
        let name = name.into();
        if self.derived(&name).is_some() {
            return Err(TableError::DuplicateColumn { name });
        }
        if column.len() != self.len() {
            return Err(TableError::ColumnLengthMismatch {
                name,
                expected: self.len(),
                actual: column.len(),
            });
        }
        let mut table = self.clone();
        table.derived.push((name, Arc::new(column)));
        Ok(table)
    }

    /// The derived column called `name`.
    #[must_use]
    pub fn derived(&self, name: &str) -> Option<&DerivedColumn> {
        self.derived
            .iter()
            .find(|(existing, _)| existing == name)
            .map(|(_, column)| column.as_ref())
    }

    /// Derived columns in insertion order.
    pub fn derived_columns(&self) -> impl Iterator<Item = (&str, &DerivedColumn)> {
        self.derived
            .iter()
            .map(|(name, column)| (name.as_str(), column.as_ref()))
    }

    /// Node count, depth and populated clusters per level.
    #[must_use]
    pub fn summary(&self) -> HierarchySummary {
        HierarchySummary {
            nodes: self.len(),
            depth: self.depth(),
            clusters_per_level: self.levels.iter().map(LevelColumn::populated_count).collect(),
        }
    }
}
