//! Parsing of path-encoded hierarchical clustering output.
//!
//! The external clustering tool emits one record per node. Each record holds
//! a path such as `2:3:1`, a quality value, the node name and a numeric id.
//! This module turns those records into per-level materialized cluster
//! strings (`2`, `2.3`, `2.3.1`) and optionally swaps the leaf position for
//! the node's own name.
//!
//! - [`read_tree`] / [`parse_tree`] read records and header metadata.
//! - [`materialize_levels`] performs the global depth pass and builds the
//!   padded level matrix.
//! - [`resolve_leaf_names`] writes each node's name into exactly one level
//!   column.

mod leaf;
mod levels;
mod parser;

use std::io::BufRead;

use tracing::{Span, field, info, instrument};

use crate::{error::HierarchyError, level::LevelId};

pub use self::{
    leaf::resolve_leaf_names,
    levels::{LEVEL_SEPARATOR, LevelMatrix, materialize_levels},
};

/// Ordered per-level cluster indices of one node.
///
/// Segments are stored as text so that cluster identifiers are never
/// reinterpreted numerically. Records read from a tree file always carry
/// positive integers; hand-built paths may use arbitrary labels.
///
/// # Examples
/// ```
/// use biogeonet_core::{HierarchyPath, LevelId};
///
/// let path = HierarchyPath::from_segments(["2", "3", "1"]).expect("non-empty");
/// assert_eq!(path.depth(), 3);
/// assert_eq!(path.materialize(LevelId::new(2).expect("non-zero")).as_deref(), Some("2.3"));
/// assert_eq!(path.materialize(LevelId::new(4).expect("non-zero")), None);
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct HierarchyPath(Vec<String>);

impl HierarchyPath {
    /// Builds a path from its segments. Returns `None` when there are no
    /// segments or any segment is empty.
    #[must_use]
    pub fn from_segments<I, S>(segments: I) -> Option<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();
        if segments.is_empty() || segments.iter().any(String::is_empty) {
            return None;
        }
        Some(Self(segments))
    }

    /// Native depth of the node (number of segments).
    #[must_use]
    pub fn depth(&self) -> usize {
        self.0.len()
    }

    /// Raw segments, coarsest first.
    #[must_use]
    pub fn segments(&self) -> &[String] {
        &self.0
    }

    /// Materialized cluster string at `level`, or `None` beyond the node's
    /// own depth.
    #[must_use]
    pub fn materialize(&self, level: LevelId) -> Option<String> {
        self.0
            .get(..level.get())
            .map(|prefix| prefix.join(LEVEL_SEPARATOR))
    }
}

/// One node record of a tree file.
#[derive(Clone, Debug, PartialEq)]
pub struct TreeRecord {
    path: HierarchyPath,
    code_length: f64,
    name: String,
    node_id: u64,
}

impl TreeRecord {
    /// Creates a record.
    #[must_use]
    pub fn new(path: HierarchyPath, code_length: f64, name: impl Into<String>, node_id: u64) -> Self {
        Self {
            path,
            code_length,
            name: name.into(),
            node_id,
        }
    }

    /// The node's hierarchy path.
    #[must_use]
    pub fn path(&self) -> &HierarchyPath {
        &self.path
    }

    /// The quality value (flow or code length) reported for the node.
    #[must_use]
    pub fn code_length(&self) -> f64 {
        self.code_length
    }

    /// The node's display name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The node's numeric id.
    #[must_use]
    pub fn node_id(&self) -> u64 {
        self.node_id
    }
}

/// Metadata gathered from the header and comment lines.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TreeHeader {
    comments: Vec<String>,
    codelength: Option<f64>,
}

impl TreeHeader {
    /// Header and comment lines in file order.
    #[must_use]
    pub fn comments(&self) -> &[String] {
        &self.comments
    }

    /// Total codelength reported by the clustering tool, when present.
    #[must_use]
    pub fn codelength(&self) -> Option<f64> {
        self.codelength
    }

    fn absorb(&mut self, line: &str) {
        if self.codelength.is_none() {
            self.codelength = parser::codelength_of(line);
        }
        self.comments.push(line.to_owned());
    }
}

/// Result of reading a tree file.
#[derive(Clone, Debug, PartialEq)]
pub struct ParsedTree {
    header: TreeHeader,
    records: Vec<TreeRecord>,
}

impl ParsedTree {
    /// Assembles a tree from already-parsed records.
    #[must_use]
    pub fn from_records(header: TreeHeader, records: Vec<TreeRecord>) -> Self {
        Self { header, records }
    }

    /// Header metadata.
    #[must_use]
    pub fn header(&self) -> &TreeHeader {
        &self.header
    }

    /// Node records in file order.
    #[must_use]
    pub fn records(&self) -> &[TreeRecord] {
        &self.records
    }

    /// Global depth `D`: the deepest path across all records.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.records
            .iter()
            .map(|record| record.path().depth())
            .max()
            .unwrap_or(0)
    }
}

/// Options controlling how a tree file is read and materialized.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TreeParseOptions {
    delimiter: char,
    resolve_leaf_names: bool,
}

impl Default for TreeParseOptions {
    fn default() -> Self {
        Self {
            delimiter: ':',
            resolve_leaf_names: true,
        }
    }
}

impl TreeParseOptions {
    /// Creates the default options: `:` delimiter, leaf names resolved.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the path delimiter.
    #[must_use]
    pub fn with_delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Enables or disables leaf-name resolution.
    #[must_use]
    pub fn with_leaf_names(mut self, resolve: bool) -> Self {
        self.resolve_leaf_names = resolve;
        self
    }

    /// Path delimiter.
    #[must_use]
    pub fn delimiter(&self) -> char {
        self.delimiter
    }

    /// Whether node names replace the leaf position.
    #[must_use]
    pub fn resolve_leaf_names(&self) -> bool {
        self.resolve_leaf_names
    }
}

/// Parses tree text held in memory.
///
/// # Errors
/// Returns [`HierarchyError`] for the first malformed record, or
/// [`HierarchyError::EmptyInput`] when no records follow the header.
///
/// # Examples
/// ```
/// use biogeonet_core::{TreeParseOptions, parse_tree};
///
/// let text = "# header\n1:1 0.5 \"A\" 1\n1:2 0.2 \"Sp1\" 2\n2:1 0.3 \"B\" 3\n";
/// let tree = parse_tree(text, &TreeParseOptions::default())?;
/// assert_eq!(tree.records().len(), 3);
/// assert_eq!(tree.depth(), 2);
/// # Ok::<(), biogeonet_core::HierarchyError>(())
/// ```
pub fn parse_tree(text: &str, options: &TreeParseOptions) -> Result<ParsedTree, HierarchyError> {
    read_tree(text.as_bytes(), options)
}

/// Reads a tree file from any buffered reader.
///
/// The first line is always treated as a header; later lines starting with
/// `#` are comments and blank lines are ignored.
///
/// # Errors
/// Returns [`HierarchyError`] when reading fails or a record is malformed.
/// No partial result is produced.
#[instrument(
    name = "core.read_tree",
    err,
    skip(reader, options),
    fields(delimiter = %options.delimiter(), records = field::Empty, depth = field::Empty),
)]
pub fn read_tree<R: BufRead>(
    reader: R,
    options: &TreeParseOptions,
) -> Result<ParsedTree, HierarchyError> {
    let (header, records) = parser::read_records(reader, options.delimiter())?;
    let tree = ParsedTree { header, records };
    let span = Span::current();
    span.record("records", tree.records.len());
    span.record("depth", tree.depth());
    info!(
        records = tree.records.len(),
        depth = tree.depth(),
        codelength = ?tree.header.codelength(),
        "tree parsed"
    );
    Ok(tree)
}

#[cfg(test)]
mod tests;
