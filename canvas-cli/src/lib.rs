//! # Canvas Composer CLI
//!
//! Runs a list of editing operations against a fresh session and writes
//! exports to disk.
//!
//! ## Usage
//!
//! ```bash
//! canvas-cli add-image=photo.png add-text=Hello flip export
//! canvas-cli --format jpeg --out-dir out cycle-bg add-text export
//! ```
//!
//! ## Operations
//!
//! | Op                   | Effect                                      |
//! |----------------------|---------------------------------------------|
//! | `add-text[=TEXT]`    | add a text object (default content if bare) |
//! | `add-image[=SOURCE]` | fetch and add an image                      |
//! | `cycle-bg`           | next preset background                      |
//! | `flip`, `delete`     | act on the active object                    |
//! | `move=DX,DY`         | translate the active object                 |
//! | `rotate=DEG`         | rotate the active object                    |
//! | `edit=TEXT`          | replace the active text                     |
//! | `select=X,Y`         | select the topmost object at a point        |
//! | `deselect`           | clear the selection                         |
//! | `export`             | encode the surface and write it out         |

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]

use std::path::PathBuf;
use std::str::FromStr;

use canvas_app::{
    BitmapFetcher, Editor, EditorConfig, EditorResult, ExportArtifact, FetchMode,
    DEFAULT_IMAGE_SOURCE, DEFAULT_ORIGIN,
};
use canvas_renderer::{ExportConfig, ExportFormat};
use clap::Parser;
use thiserror::Error;

/// Command-line arguments for canvas-cli.
#[derive(Debug, Clone, Parser)]
#[command(name = "canvas-cli")]
#[command(about = "Compose images and text on a canvas and export the result")]
#[command(version)]
pub struct CliArgs {
    /// Operations to run, in order
    #[arg(value_name = "OP")]
    pub ops: Vec<Op>,

    /// Directory exports are written to
    #[arg(long, env = "CANVAS_OUT_DIR", default_value = ".")]
    pub out_dir: PathBuf,

    /// Export file name without extension
    #[arg(long, default_value = "canvas")]
    pub file_stem: String,

    /// Export format (png or jpeg)
    #[arg(long, env = "CANVAS_EXPORT_FORMAT", default_value = "png")]
    pub format: ExportFormat,

    /// JPEG quality, 1-100
    #[arg(long, default_value = "85", value_parser = clap::value_parser!(u8).range(1..=100))]
    pub jpeg_quality: u8,

    /// How remote images are requested (cors or no-cors)
    #[arg(long, env = "CANVAS_FETCH_MODE", default_value = "cors")]
    pub fetch_mode: FetchMode,

    /// Origin sent with CORS requests
    #[arg(long, env = "CANVAS_ORIGIN", default_value = DEFAULT_ORIGIN)]
    pub origin: String,

    /// Image used by a bare `add-image`
    #[arg(long, env = "CANVAS_DEFAULT_IMAGE", default_value = DEFAULT_IMAGE_SOURCE)]
    pub default_image: String,

    /// Surface width in pixels
    #[arg(long, default_value = "500")]
    pub width: u32,

    /// Surface height in pixels
    #[arg(long, default_value = "500")]
    pub height: u32,

    /// Skip loading system fonts (text will not be drawn)
    #[arg(long)]
    pub no_system_fonts: bool,

    /// Print the scene as JSON when done
    #[arg(long)]
    pub dump_scene: bool,
}

impl From<CliArgs> for EditorConfig {
    fn from(args: CliArgs) -> Self {
        Self {
            width: args.width,
            height: args.height,
            default_image_source: args.default_image,
            export_file_stem: args.file_stem,
            export: ExportConfig {
                format: args.format,
                jpeg_quality: args.jpeg_quality,
                ..ExportConfig::default()
            },
            fetch_mode: args.fetch_mode,
            origin: args.origin,
            load_system_fonts: !args.no_system_fonts,
            ..EditorConfig::default()
        }
    }
}

/// Errors parsing an operation argument.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum OpParseError {
    /// The operation name is not known.
    #[error("unknown operation '{0}'")]
    Unknown(String),
    /// The operation needs an argument.
    #[error("'{0}' needs an argument, e.g. {1}")]
    MissingArgument(&'static str, &'static str),
    /// The argument could not be parsed.
    #[error("invalid argument for '{op}': {value}")]
    InvalidArgument {
        /// Operation name.
        op: &'static str,
        /// Offending value.
        value: String,
    },
}

/// One editing operation.
#[derive(Debug, Clone, PartialEq)]
pub enum Op {
    /// Add text, with the default content if `None`.
    AddText(Option<String>),
    /// Add an image, from the default source if `None`.
    AddImage(Option<String>),
    /// Advance the background.
    CycleBackground,
    /// Flip the active object.
    Flip,
    /// Delete the active object.
    Delete,
    /// Translate the active object.
    Move {
        /// Horizontal offset.
        dx: f32,
        /// Vertical offset.
        dy: f32,
    },
    /// Rotate the active object by degrees.
    Rotate(f32),
    /// Replace the active text.
    Edit(String),
    /// Select at a point.
    Select {
        /// Surface x.
        x: f32,
        /// Surface y.
        y: f32,
    },
    /// Clear the selection.
    Deselect,
    /// Encode and write the surface.
    Export,
}

impl FromStr for Op {
    type Err = OpParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (name, arg) = match s.split_once('=') {
            Some((name, arg)) => (name, Some(arg)),
            None => (s, None),
        };

        match name {
            "add-text" => Ok(Self::AddText(arg.map(str::to_string))),
            "add-image" => Ok(Self::AddImage(arg.map(str::to_string))),
            "cycle-bg" => Ok(Self::CycleBackground),
            "flip" => Ok(Self::Flip),
            "delete" => Ok(Self::Delete),
            "deselect" => Ok(Self::Deselect),
            "export" => Ok(Self::Export),
            "move" => {
                let value = arg.ok_or(OpParseError::MissingArgument("move", "move=10,-5"))?;
                let (dx, dy) = parse_pair("move", value)?;
                Ok(Self::Move { dx, dy })
            }
            "select" => {
                let value = arg.ok_or(OpParseError::MissingArgument("select", "select=250,250"))?;
                let (x, y) = parse_pair("select", value)?;
                Ok(Self::Select { x, y })
            }
            "rotate" => {
                let value = arg.ok_or(OpParseError::MissingArgument("rotate", "rotate=90"))?;
                let degrees = value.trim().parse().map_err(|_| OpParseError::InvalidArgument {
                    op: "rotate",
                    value: value.to_string(),
                })?;
                Ok(Self::Rotate(degrees))
            }
            "edit" => {
                let text = arg.ok_or(OpParseError::MissingArgument("edit", "edit=Hello"))?;
                Ok(Self::Edit(text.to_string()))
            }
            other => Err(OpParseError::Unknown(other.to_string())),
        }
    }
}

fn parse_pair(op: &'static str, value: &str) -> Result<(f32, f32), OpParseError> {
    let invalid = || OpParseError::InvalidArgument {
        op,
        value: value.to_string(),
    };
    let (a, b) = value.split_once(',').ok_or_else(invalid)?;
    let a = a.trim().parse().map_err(|_| invalid())?;
    let b = b.trim().parse().map_err(|_| invalid())?;
    Ok((a, b))
}

/// Run one operation.
///
/// Returns the artifact for `export`, `None` for everything else. Editor
/// failures have already been sent to the notification sink by the time
/// this returns.
///
/// # Errors
///
/// Returns the editor error if the operation failed.
pub async fn run_op<F: BitmapFetcher>(
    editor: &Editor<F>,
    op: &Op,
) -> EditorResult<Option<ExportArtifact>> {
    tracing::debug!("Running {op:?}");
    match op {
        Op::AddText(Some(text)) => {
            editor.add_text(text.as_str())?;
        }
        Op::AddText(None) => {
            editor.add_default_text()?;
        }
        Op::AddImage(source) => {
            let source = source
                .as_deref()
                .unwrap_or(&editor.config().default_image_source);
            editor.add_image_from(source).await?;
        }
        Op::CycleBackground => {
            editor.cycle_background()?;
        }
        Op::Flip => {
            editor.flip_active()?;
        }
        Op::Delete => {
            editor.delete_active()?;
        }
        Op::Move { dx, dy } => editor.move_active(*dx, *dy)?,
        Op::Rotate(degrees) => {
            editor.rotate_active(*degrees)?;
        }
        Op::Edit(text) => editor.set_active_text(text.as_str())?,
        Op::Select { x, y } => {
            editor.select_at(*x, *y)?;
        }
        Op::Deselect => editor.deselect()?,
        Op::Export => return Ok(Some(editor.export_to_image().await?)),
    }
    Ok(None)
}
