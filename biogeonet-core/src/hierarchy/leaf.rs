//! Leaf-name resolution.

use super::{LevelMatrix, TreeRecord};

/// Returns a copy of `matrix` in which each node's name occupies exactly one
/// level column.
///
/// For a node of native depth `d` in a table of depth `D`, the name is
/// written to `Level_{d+1}`, the first undefined column. A node with
/// `d == D` has no undefined column, so its `Level_D` is overwritten.
/// Shallower columns are never touched. Records and rows are matched by
/// position; surplus rows on either side are left unchanged.
///
/// # Examples
/// ```
/// use biogeonet_core::{HierarchyPath, LevelId, TreeRecord, materialize_levels, resolve_leaf_names};
///
/// let path = |s: &[&str]| HierarchyPath::from_segments(s.iter().copied()).expect("non-empty");
/// let records = [
///     TreeRecord::new(path(&["1", "1"]), 0.1, "Sp1", 1),
///     TreeRecord::new(path(&["1", "2", "1"]), 0.2, "Sp2", 2),
/// ];
/// let resolved = resolve_leaf_names(&materialize_levels(&records), &records);
/// let lvl = |n| LevelId::new(n).expect("non-zero");
/// assert_eq!(resolved.value(0, lvl(2)), Some("1.1"));
/// assert_eq!(resolved.value(0, lvl(3)), Some("Sp1"));
/// assert_eq!(resolved.value(1, lvl(3)), Some("Sp2"));
/// ```
#[must_use]
pub fn resolve_leaf_names(matrix: &LevelMatrix, records: &[TreeRecord]) -> LevelMatrix {
    let depth = matrix.depth();
    let mut resolved = matrix.clone();
    if depth == 0 {
        return resolved;
    }
    for (row, record) in resolved.rows_mut().iter_mut().zip(records) {
        let target = record.path().depth().min(depth - 1);
        if let Some(slot) = row.get_mut(target) {
            *slot = Some(record.name().to_owned());
        }
    }
    resolved
}
