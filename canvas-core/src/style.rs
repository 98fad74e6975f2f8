//! Text styling and the editor's fixed defaults.

use serde::Serialize;

/// Surface width used by the editor.
pub const CANVAS_WIDTH: u32 = 500;

/// Surface height used by the editor.
pub const CANVAS_HEIGHT: u32 = 500;

/// Width and height every added image is normalized to.
pub const IMAGE_TARGET_SIZE: f32 = 200.0;

/// Content of a freshly added text object.
pub const DEFAULT_TEXT: &str = "Your Text Here";

/// Horizontal alignment of text lines.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    /// Lines start at the left edge of the box.
    Left,
    /// Lines are centred on the anchor.
    #[default]
    Center,
    /// Lines end at the right edge of the box.
    Right,
}

impl TextAlign {
    /// The SVG `text-anchor` value for this alignment.
    #[must_use]
    pub fn svg_anchor(self) -> &'static str {
        match self {
            Self::Left => "start",
            Self::Center => "middle",
            Self::Right => "end",
        }
    }
}

/// Font and paint settings for a text object.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextStyle {
    /// Font family list, most preferred first.
    pub font_family: String,
    /// Font size in surface units.
    pub font_size: f32,
    /// Fill colour.
    pub fill: String,
    /// Outline colour.
    pub stroke: String,
    /// Outline width.
    pub stroke_width: f32,
    /// Line alignment.
    pub align: TextAlign,
    /// Line height as a multiple of the font size.
    pub line_height: f32,
}

impl Default for TextStyle {
    /// Bold white meme lettering with a thin black outline.
    fn default() -> Self {
        Self {
            font_family: "Impact".to_string(),
            font_size: 30.0,
            fill: "white".to_string(),
            stroke: "#000000".to_string(),
            stroke_width: 2.0,
            align: TextAlign::Center,
            line_height: 1.16,
        }
    }
}
