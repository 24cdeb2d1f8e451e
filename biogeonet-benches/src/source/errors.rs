//! Errors raised by the synthetic network generator.

use thiserror::Error;

/// Invalid [`super::SyntheticConfig`] values.
#[derive(Clone, Debug, Error, PartialEq)]
pub enum SyntheticError {
    /// A count that must be positive was zero.
    #[error("{parameter} must be non-zero")]
    ZeroValue {
        /// Name of the offending field.
        parameter: &'static str,
    },
    /// Some cluster would own no species.
    #[error("{clusters} clusters need at least {clusters} species, got {species}")]
    TooFewSpecies {
        /// Requested cluster count.
        clusters: usize,
        /// Requested species count.
        species: usize,
    },
    /// Sites would need more distinct species than exist.
    #[error("species_per_site ({requested}) exceeds the species pool ({species})")]
    OccupancyExceedsSpecies {
        /// Requested species per site.
        requested: usize,
        /// Requested species count.
        species: usize,
    },
    /// The fidelity probability lies outside `[0, 1]`.
    #[error("fidelity must lie in [0, 1], got {value}")]
    InvalidFidelity {
        /// Supplied probability.
        value: f64,
    },
}
