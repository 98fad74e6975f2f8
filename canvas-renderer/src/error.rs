//! Renderer error types.

use thiserror::Error;

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Errors that can occur while drawing or encoding the surface.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The pixel buffer could not be allocated.
    #[error("Drawing surface unavailable: {0}")]
    SurfaceUnavailable(String),

    /// A bitmap could not be decoded.
    #[error("Failed to load resource: {0}")]
    Resource(String),

    /// Rendering a frame failed.
    #[error("Frame render failed: {0}")]
    Frame(String),

    /// Encoding the pixels failed.
    #[error("Export failed: {0}")]
    Export(String),

    /// The surface holds pixels that may not be read back.
    #[error("Surface is tainted by a bitmap without read-back permission")]
    Tainted,
}
