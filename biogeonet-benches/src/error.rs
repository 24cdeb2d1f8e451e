//! Benchmark setup error type.
//!
//! Aggregates the errors that may arise while preparing benchmark inputs so
//! setup functions can propagate failures with `?` instead of `.expect()`.

use biogeonet_core::{ConfigurationError, HierarchyError, MetricsError};

use crate::source::SyntheticError;

/// Errors that may occur during benchmark setup.
#[derive(Debug, thiserror::Error)]
pub enum BenchSetupError {
    /// Synthetic network generation failed.
    #[error("synthetic network generation failed: {0}")]
    Synthetic(#[from] SyntheticError),
    /// The generated tree could not be parsed.
    #[error("tree parsing failed: {0}")]
    Hierarchy(#[from] HierarchyError),
    /// Metric setup failed.
    #[error("metric setup failed: {0}")]
    Metrics(#[from] MetricsError),
    /// A zero value was passed where a non-zero integer was required.
    #[error("expected a non-zero value for {context}")]
    ZeroValue {
        /// A description of the parameter that was unexpectedly zero.
        context: &'static str,
    },
    /// Colouring configuration was rejected.
    #[error("colouring configuration failed: {0}")]
    Configuration(#[from] ConfigurationError),
}
