//! Categorical level columns.

use std::collections::{HashMap, HashSet};

use crate::level::LevelId;

/// One `Level_i` column with its canonical category order.
///
/// Categories are enumerated by descending frequency; ties keep the order in
/// which values first appear in the table. The ordering is computed once
/// when the column is built and never changes afterwards.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LevelColumn {
    level: LevelId,
    values: Vec<Option<String>>,
    categories: Vec<String>,
    counts: Vec<usize>,
    index: HashMap<String, usize>,
}

impl LevelColumn {
    /// Builds a column. When `numeric_domain` is set and every defined value
    /// is a positive integer, the category set is widened to `1..=max` so
    /// that absent clusters keep a stable identity with a count of zero.
    pub(crate) fn build(level: LevelId, values: Vec<Option<String>>, numeric_domain: bool) -> Self {
        let mut first_seen: Vec<String> = Vec::new();
        let mut tally: HashMap<&str, usize> = HashMap::new();
        for value in values.iter().flatten() {
            let count = tally.entry(value.as_str()).or_insert(0);
            if *count == 0 {
                first_seen.push(value.clone());
            }
            *count += 1;
        }
        let mut ranked: Vec<(String, usize)> = first_seen
            .into_iter()
            .map(|value| {
                let count = tally.get(value.as_str()).copied().unwrap_or(0);
                (value, count)
            })
            .collect();
        // Stable sort keeps first-appearance order among equal counts.
        ranked.sort_by(|a, b| b.1.cmp(&a.1));

        if numeric_domain {
            extend_numeric_domain(&mut ranked);
        }

        let index = ranked
            .iter()
            .enumerate()
            .map(|(position, (value, _))| (value.clone(), position))
            .collect();
        let (categories, counts) = ranked.into_iter().unzip();
        Self {
            level,
            values,
            categories,
            counts,
            index,
        }
    }

    /// The level this column describes.
    #[must_use]
    pub fn level(&self) -> LevelId {
        self.level
    }

    /// Per-row values; `None` where the row's depth ends above this level.
    #[must_use]
    pub fn values(&self) -> &[Option<String>] {
        &self.values
    }

    /// Value at `row`.
    #[must_use]
    pub fn value(&self, row: usize) -> Option<&str> {
        self.values.get(row).and_then(Option::as_deref)
    }

    /// Distinct values in canonical order.
    #[must_use]
    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Row counts aligned with [`Self::categories`].
    #[must_use]
    pub fn counts(&self) -> &[usize] {
        &self.counts
    }

    /// Number of distinct categories, including zero-count domain entries.
    #[must_use]
    pub fn category_count(&self) -> usize {
        self.categories.len()
    }

    /// Number of categories with at least one row.
    #[must_use]
    pub fn populated_count(&self) -> usize {
        self.counts.iter().filter(|&&count| count > 0).count()
    }

    /// Canonical position of `value`, if it is a category.
    #[must_use]
    pub fn category_index(&self, value: &str) -> Option<usize> {
        self.index.get(value).copied()
    }

    /// Canonical position of the value held by `row`.
    #[must_use]
    pub fn category_of(&self, row: usize) -> Option<usize> {
        self.value(row).and_then(|value| self.category_index(value))
    }

    /// Number of rows holding `value`.
    #[must_use]
    pub fn count_of(&self, value: &str) -> usize {
        self.category_index(value)
            .and_then(|position| self.counts.get(position))
            .copied()
            .unwrap_or(0)
    }

    /// Keeps only the rows in `rows`, recomputing the category order.
    pub(crate) fn select(&self, rows: &[usize]) -> Self {
        let values = rows
            .iter()
            .map(|&row| self.values.get(row).cloned().flatten())
            .collect();
        Self::build(self.level, values, false)
    }
}

fn extend_numeric_domain(ranked: &mut Vec<(String, usize)>) {
    let mut present = HashSet::with_capacity(ranked.len());
    for (value, _) in ranked.iter() {
        match value.parse::<u64>() {
            Ok(parsed) if parsed > 0 && parsed.to_string() == *value => {
                present.insert(parsed);
            }
            _ => return,
        }
    }
    let max = present.iter().copied().max().unwrap_or(0);
    ranked.extend(
        (1..=max)
            .filter(|id| !present.contains(id))
            .map(|id| (id.to_string(), 0)),
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    use rstest::rstest;

    fn column(values: &[Option<&str>], numeric_domain: bool) -> LevelColumn {
        LevelColumn::build(
            LevelId::FIRST,
            values.iter().map(|value| value.map(str::to_owned)).collect(),
            numeric_domain,
        )
    }

    #[test]
    fn orders_by_descending_frequency() {
        let column = column(
            &[Some("2"), Some("1"), Some("3"), Some("3"), Some("1"), Some("3")],
            false,
        );
        assert_eq!(column.categories(), ["3", "1", "2"]);
        assert_eq!(column.counts(), [3, 2, 1]);
    }

    #[test]
    fn ties_keep_first_appearance() {
        let column = column(&[Some("b"), Some("a"), None, Some("a"), Some("b")], false);
        assert_eq!(column.categories(), ["b", "a"]);
        assert_eq!(column.category_of(2), None);
        assert_eq!(column.category_of(3), Some(1));
    }

    #[test]
    fn numeric_domain_fills_gaps_with_zero_counts() {
        let column = column(&[Some("4"), Some("1"), Some("4")], true);
        assert_eq!(column.categories(), ["4", "1", "2", "3"]);
        assert_eq!(column.counts(), [2, 1, 0, 0]);
        assert_eq!(column.populated_count(), 2);
        assert_eq!(column.count_of("3"), 0);
    }

    #[test]
    fn large_numeric_id_fills_domain_in_linear_time() {
        let started = std::time::Instant::now();
        let column = column(&[Some("100000"), Some("7")], true);
        assert_eq!(column.category_count(), 100_000);
        assert_eq!(column.categories()[..3], ["100000", "7", "1"]);
        assert_eq!(column.categories().last().map(String::as_str), Some("99999"));
        assert_eq!(column.populated_count(), 2);
        assert!(started.elapsed() < std::time::Duration::from_secs(10));
    }

    #[rstest]
    #[case(&[Some("1"), Some("north")])]
    #[case(&[Some("1"), Some("03")])]
    #[case(&[Some("0"), Some("2")])]
    fn non_numeric_values_keep_arbitrary_domain(#[case] values: &[Option<&str>]) {
        let column = column(values, true);
        assert_eq!(column.category_count(), 2);
    }

    #[test]
    fn selection_drops_unused_categories() {
        let column = column(&[Some("1"), Some("2"), Some("2"), Some("3")], true);
        let subset = column.select(&[0, 3]);
        assert_eq!(subset.categories(), ["1", "3"]);
        assert_eq!(subset.values().len(), 2);
    }
}
