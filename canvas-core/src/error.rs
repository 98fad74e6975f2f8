//! Error types for scene operations.

use thiserror::Error;

/// Result type for scene operations.
pub type CanvasResult<T> = Result<T, CanvasError>;

/// Errors that can occur in scene operations.
#[derive(Debug, Error)]
pub enum CanvasError {
    /// A selection-gated operation ran while nothing was active.
    #[error("No object selected: cannot {action}")]
    NothingSelected {
        /// The operation that was attempted (e.g. `"flip"`).
        action: &'static str,
    },

    /// Object not found in the store.
    #[error("Object not found: {0}")]
    ObjectNotFound(String),

    /// Invalid operation on the active object.
    #[error("Invalid operation on object: {0}")]
    InvalidOperation(String),

    /// Scene serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CanvasError {
    /// Whether this is the "nothing selected" precondition failure.
    #[must_use]
    pub fn is_nothing_selected(&self) -> bool {
        matches!(self, Self::NothingSelected { .. })
    }
}
