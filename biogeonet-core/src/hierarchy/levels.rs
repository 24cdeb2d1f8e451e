//! Level materialization.

use crate::level::LevelId;

use super::TreeRecord;

/// Separator placed between path indices in a materialized level value.
pub const LEVEL_SEPARATOR: &str = ".";

/// Row-major matrix of materialized level values, padded to the global depth.
///
/// Row `r` corresponds to record `r`; column `i` holds `Level_{i+1}`.
/// Levels beyond a node's native depth are `None`, never zero.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LevelMatrix {
    depth: usize,
    rows: Vec<Vec<Option<String>>>,
}

impl LevelMatrix {
    /// Builds a matrix from rows that already have `depth` columns each.
    /// Rows that are shorter are padded with `None`; longer rows are cut.
    #[must_use]
    pub fn from_rows(depth: usize, rows: Vec<Vec<Option<String>>>) -> Self {
        let rows = rows
            .into_iter()
            .map(|mut row| {
                row.resize(depth, None);
                row
            })
            .collect();
        Self { depth, rows }
    }

    /// Number of level columns `D`.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the matrix holds no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// All rows.
    #[must_use]
    pub fn rows(&self) -> &[Vec<Option<String>>] {
        &self.rows
    }

    /// Value of row `row` at `level`.
    #[must_use]
    pub fn value(&self, row: usize, level: LevelId) -> Option<&str> {
        self.rows
            .get(row)
            .and_then(|values| values.get(level.offset()))
            .and_then(Option::as_deref)
    }

    /// Extracts one level as a column.
    #[must_use]
    pub fn column(&self, level: LevelId) -> Vec<Option<String>> {
        self.rows
            .iter()
            .map(|row| row.get(level.offset()).cloned().flatten())
            .collect()
    }

    pub(super) fn rows_mut(&mut self) -> &mut [Vec<Option<String>>] {
        &mut self.rows
    }
}

/// Materializes `Level_1 ..= Level_D` for every record.
///
/// The global depth `D` is determined over all records before any row is
/// built; each row is then computed independently.
///
/// # Examples
/// ```
/// use biogeonet_core::{HierarchyPath, TreeRecord, materialize_levels};
///
/// let path = |s: &[&str]| HierarchyPath::from_segments(s.iter().copied()).expect("non-empty");
/// let records = [
///     TreeRecord::new(path(&["2", "3", "1"]), 0.1, "A", 1),
///     TreeRecord::new(path(&["1"]), 0.2, "B", 2),
/// ];
/// let matrix = materialize_levels(&records);
/// assert_eq!(matrix.depth(), 3);
/// assert_eq!(matrix.rows()[0], [Some("2".to_owned()), Some("2.3".to_owned()), Some("2.3.1".to_owned())]);
/// assert_eq!(matrix.rows()[1], [Some("1".to_owned()), None, None]);
/// ```
#[must_use]
pub fn materialize_levels(records: &[TreeRecord]) -> LevelMatrix {
    let depth = records
        .iter()
        .map(|record| record.path().depth())
        .max()
        .unwrap_or(0);
    let rows = records
        .iter()
        .map(|record| materialize_row(record.path().segments(), depth))
        .collect();
    LevelMatrix { depth, rows }
}

fn materialize_row(segments: &[String], depth: usize) -> Vec<Option<String>> {
    let mut row = Vec::with_capacity(depth);
    let mut current = String::new();
    for segment in segments {
        if !current.is_empty() {
            current.push_str(LEVEL_SEPARATOR);
        }
        current.push_str(segment);
        row.push(Some(current.clone()));
    }
    row.resize(depth, None);
    row
}
