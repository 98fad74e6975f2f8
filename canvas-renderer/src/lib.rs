//! # Canvas Composer Renderer
//!
//! Software renderer for the scene model in `canvas-core`.
//!
//! ## Pipeline
//!
//! ```text
//! ┌──────────┐   compose   ┌─────────┐  usvg/resvg  ┌──────────────┐
//! │  Scene   │ ──────────▶ │   SVG   │ ───────────▶ │ Surface      │
//! │ objects  │             │  frame  │              │ (tiny-skia)  │
//! └──────────┘             └─────────┘              └──────┬───────┘
//!                                                          │ read_pixels
//!                                                   ┌──────▼───────┐
//!                                                   │ PixelExporter│
//!                                                   │  PNG / JPEG  │
//!                                                   └──────────────┘
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod compose;
pub mod error;
pub mod export;
pub mod image;
pub mod surface;

pub use error::{RenderError, RenderResult};
pub use export::{ExportConfig, ExportFormat, PixelExporter};
pub use surface::{Surface, SurfaceConfig};
