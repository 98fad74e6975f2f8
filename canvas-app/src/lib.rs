//! # Canvas Composer App
//!
//! Editing sessions on top of `canvas-core` and `canvas-renderer`: async
//! image loading, notifications and export.
//!
//! ```no_run
//! use canvas_app::{Editor, EditorConfig, TracingSink};
//!
//! # async fn run() -> Result<(), canvas_app::EditorError> {
//! let editor = Editor::new(EditorConfig::default(), TracingSink)?;
//! editor.add_text("Hello")?;
//! editor.flip_active()?;
//! let artifact = editor.export_to_image().await?;
//! std::fs::write(&artifact.file_name, &artifact.bytes).ok();
//! # Ok(())
//! # }
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod artifact;
pub mod config;
pub mod editor;
pub mod error;
pub mod fetch;
pub mod notify;

pub use artifact::ExportArtifact;
pub use config::{EditorConfig, DEFAULT_IMAGE_SOURCE, DEFAULT_ORIGIN};
pub use editor::Editor;
pub use error::{EditorError, EditorResult, FetchError};
pub use fetch::{BitmapFetcher, BitmapSource, FetchMode, FetchedBitmap, SourceFetcher};
pub use notify::{NotificationSink, TracingSink};

/// Canvas app version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
