//! Error types for floor-plan operations.

use thiserror::Error;

/// Result type for floor-plan operations.
pub type PlanResult<T> = Result<T, PlanError>;

/// Errors that can occur while ingesting or configuring a floor plan.
///
/// Drawing never fails: degenerate geometry is handled by fallbacks in the
/// projector, bounds calculator and viewport controller.
#[derive(Debug, Error)]
pub enum PlanError {
    /// A surface record was rejected at ingestion.
    #[error("Invalid surface: {reason}")]
    InvalidSurface {
        /// Why the record was rejected.
        reason: String,
    },

    /// Surface not found in scene.
    #[error("Surface not found: {0}")]
    UnknownSurface(String),

    /// Capture document or configuration serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Configuration values are out of range.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl PlanError {
    /// Shorthand for an [`PlanError::InvalidSurface`] with the given reason.
    pub fn invalid_surface(reason: impl Into<String>) -> Self {
        Self::InvalidSurface {
            reason: reason.into(),
        }
    }
}
