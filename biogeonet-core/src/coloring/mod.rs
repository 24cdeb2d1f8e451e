//! Deterministic cluster ranking and palette assignment.
//!
//! Ranking is an explicit pass producing a rank-to-cluster table for one
//! (level, ordering mode) pair; colouring maps ranks onto a bounded palette
//! with a configurable overflow policy. Neither step mutates the partition
//! table: the result can be attached as a derived column.

mod color;

use std::{fmt, str::FromStr};

use tracing::{info, instrument};

use crate::{
    error::ConfigurationError,
    level::LevelId,
    partition::{DerivedColumn, PartitionTable},
    relation::OccurrenceRelation,
};

pub use self::color::Color;

/// Default twelve-colour qualitative palette.
pub const DEFAULT_PALETTE: [Color; 12] = [
    Color::rgb(0xE4, 0x1A, 0x1C),
    Color::rgb(0x37, 0x7E, 0xB8),
    Color::rgb(0x4D, 0xAF, 0x4A),
    Color::rgb(0x98, 0x4E, 0xA3),
    Color::rgb(0xFF, 0x7F, 0x00),
    Color::rgb(0xFF, 0xFF, 0x33),
    Color::rgb(0xA6, 0x56, 0x28),
    Color::rgb(0xF7, 0x81, 0xBF),
    Color::rgb(0x66, 0xC2, 0xA5),
    Color::rgb(0xFC, 0x8D, 0x62),
    Color::rgb(0x8D, 0xA0, 0xCB),
    Color::rgb(0xE7, 0x8A, 0xC3),
];

const GRAY_START: f64 = 0.3;
const GRAY_END: f64 = 0.9;
const GRAY_GAMMA: f64 = 2.2;

/// Criterion used to rank the clusters of a level.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum OrderingMode {
    /// Canonical category order of the level column.
    #[default]
    Insertion,
    /// Descending number of site nodes.
    SiteCount,
    /// Descending number of species nodes.
    SpeciesCount,
    /// Descending number of site and species nodes together.
    Combined,
}

impl OrderingMode {
    /// The spelling accepted by [`FromStr`].
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Insertion => "insertion",
            Self::SiteCount => "sites",
            Self::SpeciesCount => "species",
            Self::Combined => "combined",
        }
    }
}

impl fmt::Display for OrderingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderingMode {
    type Err = ConfigurationError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "insertion" | "insertion-order" => Ok(Self::Insertion),
            "sites" | "site" | "site-count" => Ok(Self::SiteCount),
            "species" | "species-count" => Ok(Self::SpeciesCount),
            "combined" | "combined-count" => Ok(Self::Combined),
            _ => Err(ConfigurationError::UnknownOrderingMode {
                provided: raw.to_owned(),
            }),
        }
    }
}

/// What happens to ranks beyond the palette.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum OverflowPolicy {
    /// Fail with [`ConfigurationError::PaletteOverflow`].
    #[default]
    Reject,
    /// Give every overflow rank the same colour.
    Single(Color),
    /// Give overflow ranks a monotonic grey ramp, dark to light.
    Grayscale,
}

impl FromStr for OverflowPolicy {
    type Err = ConfigurationError;

    /// Parses `none`, `grayscale` (or `greyscale`) and `single:<colour>`.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let trimmed = raw.trim();
        let lowered = trimmed.to_ascii_lowercase();
        match lowered.as_str() {
            "none" | "reject" => Ok(Self::Reject),
            "grayscale" | "greyscale" => Ok(Self::Grayscale),
            _ => match lowered.strip_prefix("single:") {
                Some(color) => Ok(Self::Single(color.parse()?)),
                None => Err(ConfigurationError::UnknownOverflowPolicy {
                    provided: trimmed.to_owned(),
                }),
            },
        }
    }
}

/// Validated colouring configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColoringConfig {
    max_colors: usize,
    overflow: OverflowPolicy,
    ordering: OrderingMode,
    palette: Vec<Color>,
}

impl ColoringConfig {
    /// Starts a builder seeded with the default palette.
    #[must_use]
    pub fn builder() -> ColoringConfigBuilder {
        ColoringConfigBuilder::default()
    }

    /// Maximum number of distinct palette colours.
    #[must_use]
    pub fn max_colors(&self) -> usize {
        self.max_colors
    }

    /// Overflow policy.
    #[must_use]
    pub fn overflow(&self) -> OverflowPolicy {
        self.overflow
    }

    /// Ordering mode.
    #[must_use]
    pub fn ordering(&self) -> OrderingMode {
        self.ordering
    }

    /// Palette colours.
    #[must_use]
    pub fn palette(&self) -> &[Color] {
        &self.palette
    }
}

/// Builder for [`ColoringConfig`].
///
/// # Examples
/// ```
/// use biogeonet_core::{ColoringConfig, OrderingMode, OverflowPolicy};
///
/// let config = ColoringConfig::builder()
///     .max_colors(8)
///     .ordering(OrderingMode::SiteCount)
///     .overflow(OverflowPolicy::Grayscale)
///     .build()?;
/// assert_eq!(config.max_colors(), 8);
/// assert!(ColoringConfig::builder().max_colors(0).build().is_err());
/// # Ok::<(), biogeonet_core::ConfigurationError>(())
/// ```
#[derive(Clone, Debug)]
pub struct ColoringConfigBuilder {
    max_colors: Option<usize>,
    overflow: OverflowPolicy,
    ordering: OrderingMode,
    palette: Vec<Color>,
}

impl Default for ColoringConfigBuilder {
    fn default() -> Self {
        Self {
            max_colors: None,
            overflow: OverflowPolicy::default(),
            ordering: OrderingMode::default(),
            palette: DEFAULT_PALETTE.to_vec(),
        }
    }
}

impl ColoringConfigBuilder {
    /// Sets the maximum number of distinct colours; defaults to the palette
    /// length.
    #[must_use]
    pub fn max_colors(mut self, max_colors: usize) -> Self {
        self.max_colors = Some(max_colors);
        self
    }

    /// Sets the overflow policy.
    #[must_use]
    pub fn overflow(mut self, overflow: OverflowPolicy) -> Self {
        self.overflow = overflow;
        self
    }

    /// Sets the ordering mode.
    #[must_use]
    pub fn ordering(mut self, ordering: OrderingMode) -> Self {
        self.ordering = ordering;
        self
    }

    /// Replaces the palette.
    #[must_use]
    pub fn palette(mut self, palette: Vec<Color>) -> Self {
        self.palette = palette;
        self
    }

    /// Validates and builds the configuration.
    ///
    /// # Errors
    /// Returns [`ConfigurationError::ZeroMaxColors`] when `max_colors` is
    /// zero and [`ConfigurationError::PaletteTooSmall`] when the palette is
    /// empty or `max_colors` exceeds it under [`OverflowPolicy::Reject`].
    /// Any other policy caps `max_colors` at the palette length and colours
    /// the remaining ranks itself.
    pub fn build(self) -> Result<ColoringConfig, ConfigurationError> {
        let requested = self.max_colors.unwrap_or(self.palette.len());
        if requested == 0 {
            return Err(ConfigurationError::ZeroMaxColors);
        }
        let available = self.palette.len();
        let rejects = self.overflow == OverflowPolicy::Reject && requested > available;
        if rejects || available == 0 {
            return Err(ConfigurationError::PaletteTooSmall {
                requested,
                available,
            });
        }
        let max_colors = requested.min(available);
        Ok(ColoringConfig {
            max_colors,
            overflow: self.overflow,
            ordering: self.ordering,
            palette: self.palette,
        })
    }
}

/// One ranked cluster.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RankedCluster {
    /// Cluster value.
    pub cluster: String,
    /// One-based rank.
    pub rank: usize,
    /// Site nodes in the cluster.
    pub sites: usize,
    /// Species nodes in the cluster.
    pub species: usize,
}

/// Rank-to-cluster table for one level and ordering mode.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClusterRanking {
    level: LevelId,
    mode: OrderingMode,
    entries: Vec<RankedCluster>,
}

impl ClusterRanking {
    /// Level the ranking was computed for.
    #[must_use]
    pub fn level(&self) -> LevelId {
        self.level
    }

    /// Ordering mode used.
    #[must_use]
    pub fn mode(&self) -> OrderingMode {
        self.mode
    }

    /// Clusters by ascending rank.
    #[must_use]
    pub fn entries(&self) -> &[RankedCluster] {
        &self.entries
    }

    /// Number of ranked clusters `K`.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether nothing was ranked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Rank of `cluster`.
    #[must_use]
    pub fn rank_of(&self, cluster: &str) -> Option<usize> {
        self.entries
            .iter()
            .find(|entry| entry.cluster == cluster)
            .map(|entry| entry.rank)
    }
}

/// Ranks the populated clusters of `level`.
///
/// Count-based modes sort by descending count; ties keep the order in which
/// clusters first appear in the table.
///
/// # Errors
/// Returns [`ConfigurationError::UnknownLevel`] when `level` exceeds the
/// table depth.
pub fn rank_clusters(
    table: &PartitionTable,
    relation: &OccurrenceRelation,
    level: LevelId,
    mode: OrderingMode,
) -> Result<ClusterRanking, ConfigurationError> {
    let column = table.level(level).ok_or(ConfigurationError::UnknownLevel {
        level,
        depth: table.depth(),
    })?;

    let categories = column.category_count();
    let mut first_row = vec![usize::MAX; categories];
    let mut sites = vec![0_usize; categories];
    let mut species = vec![0_usize; categories];
    for (row, node) in table.rows().iter().enumerate() {
        let Some(category) = column.category_of(row) else {
            continue;
        };
        if let Some(first) = first_row.get_mut(category) {
            *first = (*first).min(row);
        }
        if relation.is_site(node.name()) {
            if let Some(count) = sites.get_mut(category) {
                *count += 1;
            }
        } else if relation.is_species(node.name())
            && let Some(count) = species.get_mut(category)
        {
            *count += 1;
        }
    }

    let mut order: Vec<usize> = (0..categories)
        .filter(|&category| column.counts().get(category).is_some_and(|&n| n > 0))
        .collect();
    match mode {
        OrderingMode::Insertion => {}
        OrderingMode::SiteCount | OrderingMode::SpeciesCount | OrderingMode::Combined => {
            order.sort_by_key(|&category| first_row[category]);
            let key = |category: usize| match mode {
                OrderingMode::SiteCount => sites[category],
                OrderingMode::SpeciesCount => species[category],
                _ => sites[category] + species[category],
            };
            order.sort_by(|&a, &b| key(b).cmp(&key(a)));
        }
    }

    let entries = order
        .into_iter()
        .enumerate()
        .map(|(position, category)| RankedCluster {
            cluster: column.categories()[category].clone(),
            rank: position + 1,
            sites: sites[category],
            species: species[category],
        })
        .collect();
    Ok(ClusterRanking {
        level,
        mode,
        entries,
    })
}

/// Colour given to one ranked cluster.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClusterColor {
    /// Cluster value.
    pub cluster: String,
    /// One-based rank.
    pub rank: usize,
    /// Assigned colour.
    pub color: Color,
    /// Whether the colour came from the overflow policy.
    pub overflow: bool,
}

/// Colours of every ranked cluster of one level.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClusterColoring {
    level: LevelId,
    entries: Vec<ClusterColor>,
}

impl ClusterColoring {
    /// Level the colours belong to.
    #[must_use]
    pub fn level(&self) -> LevelId {
        self.level
    }

    /// Colours by ascending rank.
    #[must_use]
    pub fn entries(&self) -> &[ClusterColor] {
        &self.entries
    }

    /// Colour of `cluster`.
    #[must_use]
    pub fn color_of(&self, cluster: &str) -> Option<Color> {
        self.entries
            .iter()
            .find(|entry| entry.cluster == cluster)
            .map(|entry| entry.color)
    }

    /// Name of the derived column produced by [`Self::to_column`].
    #[must_use]
    pub fn column_name(&self) -> String {
        format!("color_{}", self.level)
    }

    /// One `#RRGGBB` value per table row; rows without a value at the level
    /// stay empty.
    ///
    /// # Errors
    /// Returns [`ConfigurationError::UnknownLevel`] when `table` is
    /// shallower than the coloured level.
    pub fn to_column(&self, table: &PartitionTable) -> Result<DerivedColumn, ConfigurationError> {
        let column = table.level(self.level).ok_or(ConfigurationError::UnknownLevel {
            level: self.level,
            depth: table.depth(),
        })?;
        Ok(DerivedColumn::Text(
            (0..table.len())
                .map(|row| {
                    column
                        .value(row)
                        .and_then(|value| self.color_of(value))
                        .map(|color| color.to_string())
                })
                .collect(),
        ))
    }
}

/// Maps ranks onto the configured palette.
///
/// The first `min(K, max_colors)` ranks receive distinct palette colours;
/// later ranks follow the overflow policy. When `K == 2` or
/// `max_colors == 2`, ranks 1 and 2 receive the first and third palette
/// colours.
///
/// # Errors
/// Returns [`ConfigurationError::PaletteOverflow`] when `K > max_colors`
/// and the overflow policy is [`OverflowPolicy::Reject`].
pub fn assign_colors(
    ranking: &ClusterRanking,
    config: &ColoringConfig,
) -> Result<ClusterColoring, ConfigurationError> {
    let clusters = ranking.len();
    let max_colors = config.max_colors();
    if clusters > max_colors && config.overflow() == OverflowPolicy::Reject {
        return Err(ConfigurationError::PaletteOverflow {
            clusters,
            max_colors,
        });
    }

    let palette = config.palette();
    let binary = clusters == 2 || max_colors == 2;
    let overflow_count = clusters.saturating_sub(max_colors);
    let ramp = gray_ramp(overflow_count);

    let entries = ranking
        .entries()
        .iter()
        .map(|entry| {
            let position = entry.rank - 1;
            let (color, overflow) = if position < max_colors {
                let index = if binary && position == 1 {
                    2.min(palette.len() - 1)
                } else {
                    position
                };
                (palette[index], false)
            } else {
                let color = match config.overflow() {
                    OverflowPolicy::Single(color) => color,
                    _ => ramp[position - max_colors],
                };
                (color, true)
            };
            ClusterColor {
                cluster: entry.cluster.clone(),
                rank: entry.rank,
                color,
                overflow,
            }
        })
        .collect();
    Ok(ClusterColoring {
        level: ranking.level(),
        entries,
    })
}

/// Ranks and colours the clusters of `level`.
///
/// # Errors
/// Returns [`ConfigurationError`] when the level does not exist or the
/// palette overflows without a policy.
#[instrument(
    name = "core.color_clusters",
    err,
    skip(table, relation, config),
    fields(level = %level, ordering = %config.ordering(), max_colors = config.max_colors()),
)]
pub fn color_clusters(
    table: &PartitionTable,
    relation: &OccurrenceRelation,
    level: LevelId,
    config: &ColoringConfig,
) -> Result<ClusterColoring, ConfigurationError> {
    let ranking = rank_clusters(table, relation, level, config.ordering())?;
    let coloring = assign_colors(&ranking, config)?;
    let overflowed = coloring.entries().iter().filter(|entry| entry.overflow).count();
    info!(clusters = ranking.len(), overflowed, "clusters coloured");
    Ok(coloring)
}

/// `count` greys from dark to light, evenly spaced in gamma-encoded space.
fn gray_ramp(count: usize) -> Vec<Color> {
    match count {
        0 => Vec::new(),
        1 => vec![Color::gray(GRAY_START)],
        _ => {
            let low = GRAY_START.powf(GRAY_GAMMA);
            let high = GRAY_END.powf(GRAY_GAMMA);
            let steps = (count - 1) as f64;
            (0..count)
                .map(|step| {
                    let linear = low + (high - low) * step as f64 / steps;
                    Color::gray(linear.powf(1.0 / GRAY_GAMMA))
                })
                .collect()
        }
    }
}
