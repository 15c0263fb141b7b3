//! Renderer error types.

use floorplan_core::PlanError;
use thiserror::Error;

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Errors that can occur during rendering.
#[derive(Debug, Error)]
pub enum RenderError {
    /// No suitable rendering backend available.
    #[error("No rendering backend available: {0}")]
    NoBackend(String),

    /// Rendering frame failed.
    #[error("Frame render failed: {0}")]
    Frame(String),

    /// Export to an image or document format failed.
    #[error("Export failed: {0}")]
    Export(String),

    /// Error from the floor-plan core.
    #[error("Core error: {0}")]
    Core(#[from] PlanError),
}
