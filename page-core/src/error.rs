//! Error types for page-builder operations.

use thiserror::Error;

use crate::ElementId;

/// Result type for page-builder operations.
pub type BuilderResult<T> = Result<T, BuilderError>;

/// Errors that can occur while manipulating a page document.
#[derive(Debug, Error)]
pub enum BuilderError {
    /// Element not found in the tree.
    #[error("Element not found: {0}")]
    ElementNotFound(ElementId),

    /// Target parent not found in the tree.
    #[error("Parent not found: {0}")]
    ParentNotFound(ElementId),

    /// The move would place an element inside itself or one of its descendants.
    #[error("Cannot move {id} into {parent}: would create a cycle")]
    CyclicMove {
        /// Element being moved.
        id: ElementId,
        /// Requested new parent.
        parent: ElementId,
    },

    /// Two elements in one document share an id.
    #[error("Duplicate element id: {0}")]
    DuplicateId(ElementId),

    /// No document is loaded in the store.
    #[error("No document loaded")]
    NoDocument,

    /// A dot path could not be applied.
    #[error("Invalid path: {0:?}")]
    InvalidPath(String),

    /// Document serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}
