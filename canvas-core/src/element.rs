//! Scene objects - the drawable units of a composition.

use std::sync::Arc;

use serde::Serialize;
use uuid::Uuid;

use crate::style::TextStyle;

/// Unique identifier for a scene object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct ObjectId(Uuid);

impl ObjectId {
    /// Create a new unique object ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ObjectId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ObjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A decoded bitmap, normalized to PNG so it can be embedded when rendering.
#[derive(Debug, Clone, Serialize)]
pub struct Bitmap {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// PNG-encoded RGBA pixels.
    #[serde(skip)]
    pub png: Arc<[u8]>,
    /// Whether the pixels may be read back once drawn (cross-origin clean).
    pub readback_permitted: bool,
}

/// Image content: where it came from and what it decoded to.
#[derive(Debug, Clone, Serialize)]
pub struct ImageContent {
    /// The source reference the bitmap was fetched from.
    pub source: String,
    /// The decoded bitmap.
    pub bitmap: Bitmap,
}

/// Editable text content.
#[derive(Debug, Clone, Serialize)]
pub struct TextContent {
    /// The text, possibly spanning several lines.
    pub content: String,
    /// Font and paint settings.
    pub style: TextStyle,
}

impl TextContent {
    /// Iterate over the lines of the text (at least one, possibly empty).
    pub fn lines(&self) -> impl Iterator<Item = &str> {
        self.content.split('\n')
    }

    /// Number of lines.
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.lines().count()
    }
}

/// The type of content an object draws.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type", content = "data")]
pub enum ObjectKind {
    /// A bitmap image.
    Image(ImageContent),
    /// A text block.
    Text(TextContent),
}

/// Placement of an object on the surface.
///
/// `(x, y)` is the centre of the object; rotation, flip and scale all pivot
/// around it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Transform {
    /// Centre X in surface units.
    pub x: f32,
    /// Centre Y in surface units.
    pub y: f32,
    /// Horizontal scale applied to the natural width.
    pub scale_x: f32,
    /// Vertical scale applied to the natural height.
    pub scale_y: f32,
    /// Mirror left-to-right.
    pub flip_x: bool,
    /// Clockwise rotation in degrees, in `[0, 360)`.
    pub rotation: f32,
}

impl Default for Transform {
    fn default() -> Self {
        Self {
            x: 0.0,
            y: 0.0,
            scale_x: 1.0,
            scale_y: 1.0,
            flip_x: false,
            rotation: 0.0,
        }
    }
}

/// A drawable object with content and transform.
#[derive(Debug, Clone, Serialize)]
pub struct SceneObject {
    /// Unique identifier.
    pub id: ObjectId,
    /// What the object draws.
    pub kind: ObjectKind,
    /// Where and how it is drawn.
    pub transform: Transform,
}

impl SceneObject {
    /// Create a new object with the given kind and an identity transform.
    #[must_use]
    pub fn new(kind: ObjectKind) -> Self {
        Self {
            id: ObjectId::new(),
            kind,
            transform: Transform::default(),
        }
    }

    /// Create an image object scaled so that both its width and its height
    /// come out at `target` units.
    ///
    /// Each axis is scaled on its own, so the source aspect ratio is not
    /// kept.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn image(source: impl Into<String>, bitmap: Bitmap, target: f32) -> Self {
        let scale_x = target / bitmap.width.max(1) as f32;
        let scale_y = target / bitmap.height.max(1) as f32;
        let mut object = Self::new(ObjectKind::Image(ImageContent {
            source: source.into(),
            bitmap,
        }));
        object.transform.scale_x = scale_x;
        object.transform.scale_y = scale_y;
        object
    }

    /// Create a text object.
    #[must_use]
    pub fn text(content: impl Into<String>, style: TextStyle) -> Self {
        Self::new(ObjectKind::Text(TextContent {
            content: content.into(),
            style,
        }))
    }

    /// Place the object's centre at `(x, y)`.
    #[must_use]
    pub fn centered_at(mut self, x: f32, y: f32) -> Self {
        self.transform.x = x;
        self.transform.y = y;
        self
    }

    /// Size before scaling.
    ///
    /// Text has no layout engine here; its box is estimated from the longest
    /// line and the line count.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn natural_size(&self) -> (f32, f32) {
        match &self.kind {
            ObjectKind::Image(image) => (image.bitmap.width as f32, image.bitmap.height as f32),
            ObjectKind::Text(text) => {
                let longest = text.lines().map(|l| l.chars().count()).max().unwrap_or(0);
                let size = text.style.font_size;
                let width = longest as f32 * size * 0.6;
                let height = text.line_count() as f32 * size * text.style.line_height;
                (width, height)
            }
        }
    }

    /// Size after scaling, in surface units.
    #[must_use]
    pub fn scaled_size(&self) -> (f32, f32) {
        let (w, h) = self.natural_size();
        (w * self.transform.scale_x.abs(), h * self.transform.scale_y.abs())
    }

    /// Check if a point (in surface coordinates) falls inside this object.
    #[must_use]
    pub fn contains_point(&self, x: f32, y: f32) -> bool {
        let t = &self.transform;
        let dx = x - t.x;
        let dy = y - t.y;
        let (sin, cos) = t.rotation.to_radians().sin_cos();
        // Undo the rotation; flip is symmetric about the centre so it needs no inverse.
        let local_x = dx * cos + dy * sin;
        let local_y = -dx * sin + dy * cos;
        let (w, h) = self.scaled_size();
        local_x.abs() <= w / 2.0 && local_y.abs() <= h / 2.0
    }

    /// Whether this is a text object.
    #[must_use]
    pub fn is_text(&self) -> bool {
        matches!(self.kind, ObjectKind::Text(_))
    }

    /// Whether this is an image object.
    #[must_use]
    pub fn is_image(&self) -> bool {
        matches!(self.kind, ObjectKind::Image(_))
    }
}
