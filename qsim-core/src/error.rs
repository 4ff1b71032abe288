//! Error types for the simulation framework

use thiserror::Error;

/// Top-level error type for simulation operations
///
/// Configuration errors are raised before any replication starts and are
/// fatal to the run that triggered them. Per-replication numeric edge cases
/// (zero samples, zero elapsed time) are handled locally by the statistics
/// layer instead of surfacing here.
#[derive(Debug, Error)]
pub enum SimError {
    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Invalid configuration: {0}")]
    Configuration(String),

    #[error("Component not found with ID: {id}")]
    ComponentNotFound { id: String },
}

impl SimError {
    /// Convenience constructor for distribution/capacity parameter failures
    pub fn invalid_parameter(msg: impl Into<String>) -> Self {
        SimError::InvalidParameter(msg.into())
    }
}
