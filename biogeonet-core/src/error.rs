//! Error types for the biogeonet core library.
//!
//! Structural failures (a malformed tree file, a non-bipartite relation, an
//! impossible colouring request) are reported through the enums defined here.
//! Per-entity data-quality problems are not errors; they are collected as
//! [`crate::Diagnostic`] values instead.

use std::{fmt, io};

use thiserror::Error;

use crate::level::LevelId;

macro_rules! define_error_codes {
    (
        $(#[$enum_meta:meta])*
        enum $CodeTy:ident for $ErrTy:ident {
            $(
                $(#[$variant_meta:meta])*
                $CodeVariant:ident => $ErrVariant:ident $( { $($pattern:tt)* } )? $( ( $($tuple:tt)* ) )? => $code:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        #[non_exhaustive]
        pub enum $CodeTy {
            $(
                $(#[$variant_meta])*
                $CodeVariant,
            )+
        }

        impl $CodeTy {
            /// Return the stable machine-readable representation of this error code.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$CodeVariant => $code,)+
                }
            }
        }

        impl fmt::Display for $CodeTy {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $ErrTy {
            #[doc = concat!(
                "Retrieve the stable [`",
                stringify!($CodeTy),
                "`] for this error."
            )]
            #[must_use]
            pub const fn code(&self) -> $CodeTy {
                match self {
                    $(Self::$ErrVariant $( { $($pattern)* } )? $( ( $($tuple)* ) )? => $CodeTy::$CodeVariant,)+
                }
            }
        }
    };
}

/// Failure raised while parsing a hierarchical clustering tree.
///
/// Any of these aborts the whole parse; no partial table is produced.
#[non_exhaustive]
#[derive(Debug, Error)]
pub enum HierarchyError {
    /// The input held no node records after the header.
    #[error("tree input contains no node records")]
    EmptyInput,
    /// A record line ended before every required field was read.
    #[error("line {line}: missing `{field}` field")]
    MissingField {
        /// One-based line number of the offending record.
        line: usize,
        /// Name of the field that could not be read.
        field: &'static str,
    },
    /// A record carried an empty path, or a path with an empty segment.
    #[error("line {line}: empty path segment in `{path}`")]
    EmptyPath {
        /// One-based line number of the offending record.
        line: usize,
        /// The raw path text.
        path: String,
    },
    /// A path segment was not a positive integer.
    #[error("line {line}: malformed path token `{token}` (expected a positive integer)")]
    MalformedToken {
        /// One-based line number of the offending record.
        line: usize,
        /// The token that failed to parse.
        token: String,
    },
    /// A numeric field (quality value or node id) failed to parse.
    #[error("line {line}: invalid {field} `{value}`")]
    InvalidNumber {
        /// One-based line number of the offending record.
        line: usize,
        /// Name of the numeric field.
        field: &'static str,
        /// The raw text that failed to parse.
        value: String,
    },
    /// A quoted node name was never closed.
    #[error("line {line}: unterminated quoted name")]
    UnterminatedQuote {
        /// One-based line number of the offending record.
        line: usize,
    },
    /// Reading the tree source failed.
    #[error("failed to read tree input: {0}")]
    Io(#[from] io::Error),
}

define_error_codes! {
    /// Stable codes describing [`HierarchyError`] variants.
    enum HierarchyErrorCode for HierarchyError {
        /// The input held no node records after the header.
        EmptyInput => EmptyInput => "HIERARCHY_EMPTY_INPUT",
        /// A record line ended before every required field was read.
        MissingField => MissingField { .. } => "HIERARCHY_MISSING_FIELD",
        /// A record carried an empty path segment.
        EmptyPath => EmptyPath { .. } => "HIERARCHY_EMPTY_PATH",
        /// A path segment was not a positive integer.
        MalformedToken => MalformedToken { .. } => "HIERARCHY_MALFORMED_TOKEN",
        /// A numeric field failed to parse.
        InvalidNumber => InvalidNumber { .. } => "HIERARCHY_INVALID_NUMBER",
        /// A quoted node name was never closed.
        UnterminatedQuote => UnterminatedQuote { .. } => "HIERARCHY_UNTERMINATED_QUOTE",
        /// Reading the tree source failed.
        Io => Io(..) => "HIERARCHY_IO",
    }
}

/// Errors raised when manipulating a [`crate::PartitionTable`].
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum TableError {
    /// A level beyond the table depth was requested.
    #[error("level {level} does not exist (table depth is {depth})")]
    UnknownLevel {
        /// The requested level.
        level: LevelId,
        /// Number of level columns in the table.
        depth: usize,
    },
    /// A derived column with the same name already exists.
    #[error("derived column `{name}` already exists")]
    DuplicateColumn {
        /// The conflicting column name.
        name: String,
    },
    /// A derived column does not have one value per row.
    #[error("derived column `{name}` has {actual} values but the table has {expected} rows")]
    ColumnLengthMismatch {
        /// Name of the rejected column.
        name: String,
        /// Number of table rows.
        expected: usize,
        /// Number of supplied values.
        actual: usize,
    },
}

define_error_codes! {
    /// Stable codes describing [`TableError`] variants.
    enum TableErrorCode for TableError {
        /// A level beyond the table depth was requested.
        UnknownLevel => UnknownLevel { .. } => "TABLE_UNKNOWN_LEVEL",
        /// A derived column with the same name already exists.
        DuplicateColumn => DuplicateColumn { .. } => "TABLE_DUPLICATE_COLUMN",
        /// A derived column does not have one value per row.
        ColumnLengthMismatch => ColumnLengthMismatch { .. } => "TABLE_COLUMN_LENGTH_MISMATCH",
    }
}

/// Errors raised by [`crate::ClusterMetrics`].
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum MetricsError {
    /// Some labels occur both as a site and as a species.
    #[error("relation is not bipartite: {count} label(s) used as both site and species (first: `{first}`)")]
    BipartiteViolation {
        /// Number of offending labels.
        count: usize,
        /// First offending label, in site order.
        first: String,
        /// Every offending label, in site order.
        labels: Vec<String>,
    },
    /// The requested level is not a column of the partition table.
    #[error("level {level} does not exist (table depth is {depth})")]
    UnknownLevel {
        /// The requested level.
        level: LevelId,
        /// Number of level columns in the table.
        depth: usize,
    },
    /// The focal cluster is not a value of the chosen level.
    #[error("cluster `{cluster}` is not a value of level {level}")]
    UnknownCluster {
        /// The chosen level.
        level: LevelId,
        /// The unknown cluster value.
        cluster: String,
    },
}

define_error_codes! {
    /// Stable codes describing [`MetricsError`] variants.
    enum MetricsErrorCode for MetricsError {
        /// Some labels occur both as a site and as a species.
        BipartiteViolation => BipartiteViolation { .. } => "METRICS_BIPARTITE_VIOLATION",
        /// The requested level is not a column of the partition table.
        UnknownLevel => UnknownLevel { .. } => "METRICS_UNKNOWN_LEVEL",
        /// The focal cluster is not a value of the chosen level.
        UnknownCluster => UnknownCluster { .. } => "METRICS_UNKNOWN_CLUSTER",
    }
}

/// Invalid configuration detected before any computation starts.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum ConfigurationError {
    /// More clusters than colours and no overflow policy was chosen.
    #[error(
        "{clusters} clusters exceed the {max_colors} available colours and no overflow policy is set"
    )]
    PaletteOverflow {
        /// Number of clusters to colour.
        clusters: usize,
        /// Maximum number of distinct palette colours.
        max_colors: usize,
    },
    /// `max_colors` exceeds the palette length.
    #[error("requested {requested} colours but the palette only has {available}")]
    PaletteTooSmall {
        /// Requested number of colours.
        requested: usize,
        /// Colours available in the palette.
        available: usize,
    },
    /// `max_colors` was zero.
    #[error("max_colors must be at least 1")]
    ZeroMaxColors,
    /// The ordering mode string was not recognised.
    #[error("unknown ordering mode `{provided}`; expected insertion, sites, species or combined")]
    UnknownOrderingMode {
        /// Raw value supplied by the caller.
        provided: String,
    },
    /// The overflow policy string was not recognised.
    #[error("unknown overflow policy `{provided}`; expected none, grayscale or single:<colour>")]
    UnknownOverflowPolicy {
        /// Raw value supplied by the caller.
        provided: String,
    },
    /// A colour could not be parsed.
    #[error("invalid colour `{provided}`")]
    InvalidColor {
        /// Raw value supplied by the caller.
        provided: String,
    },
    /// A level name could not be parsed.
    #[error("invalid level `{provided}`; expected forms like `lvl2`, `Level_2` or `2`")]
    InvalidLevel {
        /// Raw value supplied by the caller.
        provided: String,
    },
    /// The requested level is not a column of the partition table.
    #[error("level {level} does not exist (table depth is {depth})")]
    UnknownLevel {
        /// The requested level.
        level: LevelId,
        /// Number of level columns in the table.
        depth: usize,
    },
}

define_error_codes! {
    /// Stable codes describing [`ConfigurationError`] variants.
    enum ConfigurationErrorCode for ConfigurationError {
        /// More clusters than colours and no overflow policy was chosen.
        PaletteOverflow => PaletteOverflow { .. } => "CONFIG_PALETTE_OVERFLOW",
        /// `max_colors` exceeds the palette length.
        PaletteTooSmall => PaletteTooSmall { .. } => "CONFIG_PALETTE_TOO_SMALL",
        /// `max_colors` was zero.
        ZeroMaxColors => ZeroMaxColors => "CONFIG_ZERO_MAX_COLORS",
        /// The ordering mode string was not recognised.
        UnknownOrderingMode => UnknownOrderingMode { .. } => "CONFIG_UNKNOWN_ORDERING_MODE",
        /// The overflow policy string was not recognised.
        UnknownOverflowPolicy => UnknownOverflowPolicy { .. } => "CONFIG_UNKNOWN_OVERFLOW_POLICY",
        /// A colour could not be parsed.
        InvalidColor => InvalidColor { .. } => "CONFIG_INVALID_COLOR",
        /// A level name could not be parsed.
        InvalidLevel => InvalidLevel { .. } => "CONFIG_INVALID_LEVEL",
        /// The requested level is not a column of the partition table.
        UnknownLevel => UnknownLevel { .. } => "CONFIG_UNKNOWN_LEVEL",
    }
}
