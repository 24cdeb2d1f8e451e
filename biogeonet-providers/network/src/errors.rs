use std::io;

use biogeonet_core::ConfigurationError;
use thiserror::Error;

/// Failure raised while writing or reading a network file.
#[derive(Debug, Error)]
pub enum NetworkFormatError {
    /// A label cannot be represented in the target format.
    #[error("label `{label}` cannot be written: {reason}")]
    UnwritableLabel {
        /// The offending label.
        label: String,
        /// Why the label is rejected.
        reason: &'static str,
    },
    /// A required `*Vertices` or `*Edges` section header is missing.
    #[error("missing `{section}` section")]
    MissingSection {
        /// Section keyword.
        section: &'static str,
    },
    /// A line could not be parsed.
    #[error("line {line}: {message}")]
    Malformed {
        /// One-based line number.
        line: usize,
        /// What was wrong with it.
        message: String,
    },
    /// An edge refers to a vertex id that was never declared.
    #[error("line {line}: unknown vertex id {id}")]
    UnknownVertex {
        /// One-based line number.
        line: usize,
        /// The undeclared id.
        id: usize,
    },
    /// The declared vertex count disagrees with the listed vertices.
    #[error("declared {declared} vertices but listed {listed}")]
    VertexCountMismatch {
        /// Count from the `*Vertices` line.
        declared: usize,
        /// Vertices actually listed.
        listed: usize,
    },
    /// The selected derived colour column does not exist or is not text.
    #[error("colour column `{name}` is missing or not a text column")]
    ColorColumn {
        /// Requested column name.
        name: String,
    },
    /// A colour value could not be converted.
    #[error(transparent)]
    Color(#[from] ConfigurationError),
    /// Reading or writing failed.
    #[error("i/o error: {0}")]
    Io(#[from] io::Error),
}
