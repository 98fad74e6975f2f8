//! # Canvas Composer Core
//!
//! Scene model for a small composition editor: a background, bitmap images
//! and editable text, one of which can be active at a time.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                 canvas-core                 │
//! ├─────────────────────────────────────────────┤
//! │  Object Store     │  Selection Controller   │
//! │  - Images, text   │  - Idle / Active(id)    │
//! │  - Insertion order│  - flip, move, rotate   │
//! │  - Transforms     │  - delete, edit text    │
//! ├─────────────────────────────────────────────┤
//! │  Palette          │  Notices                │
//! │  - Preset fills   │  - title, description   │
//! │  - Cycling cursor │  - severity             │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! Nothing here touches pixels or I/O; see `canvas-renderer` and
//! `canvas-app`.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod element;
pub mod error;
pub mod notice;
pub mod palette;
pub mod scene;
pub mod style;

pub use element::{Bitmap, ImageContent, ObjectId, ObjectKind, SceneObject, TextContent, Transform};
pub use error::{CanvasError, CanvasResult};
pub use notice::{Notice, Severity};
pub use palette::{Background, PRESET_BACKGROUNDS};
pub use scene::{Scene, Selection};
pub use style::{
    TextAlign, TextStyle, CANVAS_HEIGHT, CANVAS_WIDTH, DEFAULT_TEXT, IMAGE_TARGET_SIZE,
};

/// Canvas core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
