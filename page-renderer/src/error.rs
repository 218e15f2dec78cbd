//! Renderer error types.

use thiserror::Error;

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Errors that can occur when producing whole-page output.
///
/// Rendering a single element never fails; these cover the page as a unit.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The store has no document loaded.
    #[error("No document loaded")]
    NoDocument,

    /// Render output could not be serialized.
    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}
