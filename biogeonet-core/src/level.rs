//! Hierarchy level identifiers.

use std::{fmt, num::NonZeroUsize, str::FromStr};

use crate::error::ConfigurationError;

/// One-based index of a hierarchy level; level 1 is the coarsest.
///
/// Levels are displayed as `lvl1`, `lvl2`, … which is also the column name
/// used when a [`crate::PartitionTable`] is exported.
///
/// # Examples
/// ```
/// use biogeonet_core::LevelId;
///
/// let level: LevelId = "Level_2".parse()?;
/// assert_eq!(level.get(), 2);
/// assert_eq!(level.column_name(), "lvl2");
/// assert_eq!("lvl2".parse::<LevelId>()?, level);
/// # Ok::<(), biogeonet_core::ConfigurationError>(())
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LevelId(NonZeroUsize);

impl LevelId {
    /// The coarsest level.
    pub const FIRST: Self = Self(NonZeroUsize::MIN);

    /// Creates a level from its one-based index, returning `None` for zero.
    #[must_use]
    pub const fn new(index: usize) -> Option<Self> {
        match NonZeroUsize::new(index) {
            Some(value) => Some(Self(value)),
            None => None,
        }
    }

    /// Returns the one-based index.
    #[rustfmt::skip]
    #[must_use]
    pub const fn get(self) -> usize { self.0.get() }

    /// Returns the zero-based column offset of this level.
    #[must_use]
    pub const fn offset(self) -> usize {
        self.0.get() - 1
    }

    /// Returns the exported column name (`lvl<n>`).
    #[must_use]
    pub fn column_name(self) -> String {
        format!("lvl{}", self.0)
    }
}

impl fmt::Display for LevelId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "lvl{}", self.0)
    }
}

impl FromStr for LevelId {
    type Err = ConfigurationError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        let lowered = trimmed.to_ascii_lowercase();
        let digits = ["level_", "level", "lvl"]
            .iter()
            .find_map(|prefix| lowered.strip_prefix(prefix))
            .unwrap_or(lowered.as_str());
        digits
            .parse::<usize>()
            .ok()
            .and_then(Self::new)
            .ok_or_else(|| ConfigurationError::InvalidLevel {
                provided: trimmed.to_owned(),
            })
    }
}
