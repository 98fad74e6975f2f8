//! Session errors and their user-facing notices.

use canvas_core::{CanvasError, Notice};
use canvas_renderer::RenderError;
use thiserror::Error;

/// Result type for editor operations.
pub type EditorResult<T> = Result<T, EditorError>;

/// Errors that can occur while fetching a bitmap source.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The source string could not be interpreted.
    #[error("invalid bitmap source: {0}")]
    InvalidSource(String),
    /// HTTP layer failed (connection, timeout, body).
    #[error("bitmap request failed: {0}")]
    Http(#[from] reqwest::Error),
    /// The server answered with a non-success status.
    #[error("bitmap request to {url} returned {status}")]
    Status {
        /// Requested URL.
        url: String,
        /// HTTP status code.
        status: u16,
    },
    /// A CORS-mode request was not granted read-back.
    #[error("{0} did not allow cross-origin access")]
    CorsRejected(String),
    /// Reading a local file failed.
    #[error("failed to read bitmap file: {0}")]
    Io(#[from] std::io::Error),
    /// A `data:` URI was malformed.
    #[error("invalid data URI: {0}")]
    DataUri(String),
}

/// Errors surfaced by [`Editor`](crate::Editor) operations.
#[derive(Debug, Error)]
pub enum EditorError {
    /// Scene precondition or lookup failure.
    #[error(transparent)]
    Canvas(#[from] CanvasError),
    /// Drawing, decoding or encoding failure.
    #[error(transparent)]
    Render(#[from] RenderError),
    /// Bitmap source could not be fetched.
    #[error(transparent)]
    Fetch(#[from] FetchError),
    /// The session was disposed; nothing was changed.
    #[error("editing session has been disposed")]
    Disposed,
}

impl EditorError {
    /// The notice to show the user for this error.
    ///
    /// `Disposed` has none: there is no longer anyone to show it to.
    #[must_use]
    pub fn notice(&self) -> Option<Notice> {
        let notice = match self {
            Self::Canvas(CanvasError::NothingSelected { action }) => {
                Notice::nothing_selected(action)
            }
            Self::Canvas(CanvasError::ObjectNotFound(_)) => {
                Notice::info("Object not found", "It may have been deleted")
            }
            Self::Canvas(CanvasError::InvalidOperation(reason)) => {
                Notice::info("Cannot apply change", reason.as_str())
            }
            Self::Canvas(CanvasError::Serialization(_)) | Self::Render(RenderError::Frame(_)) => {
                Notice::destructive("Error drawing canvas", "Please try again")
            }
            Self::Render(RenderError::SurfaceUnavailable(_)) => {
                Notice::destructive("Canvas unavailable", "Drawing is not supported here")
            }
            Self::Fetch(_) | Self::Render(RenderError::Resource(_)) => Notice::image_load_failed(),
            Self::Render(RenderError::Export(_) | RenderError::Tainted) => Notice::export_failed(),
            Self::Disposed => return None,
        };
        Some(notice)
    }

    /// Whether the operation failed only because nothing was selected.
    #[must_use]
    pub fn is_nothing_selected(&self) -> bool {
        matches!(self, Self::Canvas(e) if e.is_nothing_selected())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use canvas_core::Severity;

    #[test]
    fn test_notice_mapping() {
        let flip = EditorError::from(CanvasError::NothingSelected { action: "flip" });
        assert_eq!(
            flip.notice().map(|n| n.description),
            Some("Please select an object to flip".to_string())
        );
        assert!(flip.is_nothing_selected());

        let load = EditorError::from(FetchError::CorsRejected("https://x".to_string()));
        assert_eq!(load.notice(), Some(Notice::image_load_failed()));

        let decode = EditorError::from(RenderError::Resource("bad".to_string()));
        assert_eq!(decode.notice(), Some(Notice::image_load_failed()));

        let tainted = EditorError::from(RenderError::Tainted);
        let notice = tainted.notice().expect("notice");
        assert_eq!(notice.title, "Error downloading image");
        assert_eq!(notice.severity, Severity::Destructive);

        let invalid = EditorError::from(CanvasError::InvalidOperation("cannot rotate by NaN".into()));
        assert_eq!(
            invalid.notice(),
            Some(Notice::info("Cannot apply change", "cannot rotate by NaN"))
        );

        assert!(EditorError::Disposed.notice().is_none());
    }
}
