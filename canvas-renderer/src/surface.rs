//! The drawing surface: a fixed-size pixel buffer plus its background.

use canvas_core::{palette, Background, ObjectKind, Scene};
use tiny_skia::{Color, Pixmap};

use crate::compose::scene_to_svg;
use crate::error::{RenderError, RenderResult};

/// Configuration for a [`Surface`].
#[derive(Debug, Clone)]
pub struct SurfaceConfig {
    /// Load the system font database so text can be drawn.
    pub load_system_fonts: bool,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            load_system_fonts: true,
        }
    }
}

/// A fixed-size raster surface.
///
/// [`render`](Self::render) redraws the background and every scene object
/// into the pixel buffer; [`read_pixels`](Self::read_pixels) hands out a copy
/// of what was last drawn.
pub struct Surface {
    width: u32,
    height: u32,
    background: Background,
    pixmap: Pixmap,
    options: usvg::Options<'static>,
    tainted: bool,
    frame_count: u64,
}

impl Surface {
    /// Allocate a surface with the default configuration.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::SurfaceUnavailable`] if the pixel buffer
    /// cannot be allocated (zero or oversized dimensions).
    pub fn initialize(width: u32, height: u32) -> RenderResult<Self> {
        Self::with_config(width, height, &SurfaceConfig::default())
    }

    /// Allocate a surface.
    ///
    /// The buffer starts filled with the first preset background.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::SurfaceUnavailable`] if the pixel buffer
    /// cannot be allocated (zero or oversized dimensions).
    pub fn with_config(width: u32, height: u32, config: &SurfaceConfig) -> RenderResult<Self> {
        let mut pixmap = Pixmap::new(width, height).ok_or_else(|| {
            RenderError::SurfaceUnavailable(format!("cannot allocate {width}x{height} pixmap"))
        })?;

        let background = Background::new();
        pixmap.fill(background_fill(background));

        let mut options = usvg::Options::default();
        if config.load_system_fonts {
            options.fontdb_mut().load_system_fonts();
            tracing::debug!("Loaded {} font faces", options.fontdb.len());
        }

        tracing::info!("Surface initialized: {width}x{height}");

        Ok(Self {
            width,
            height,
            background,
            pixmap,
            options,
            tainted: false,
            frame_count: 0,
        })
    }

    /// Surface width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Surface height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.height
    }

    /// Current background.
    #[must_use]
    pub fn background(&self) -> Background {
        self.background
    }

    /// Position of the current background in the preset table.
    #[must_use]
    pub fn background_index(&self) -> usize {
        self.background.index()
    }

    /// Replace the background. Takes effect on the next render.
    pub fn set_background(&mut self, background: Background) {
        self.background = background;
    }

    /// Advance the background to the next preset.
    ///
    /// Takes effect on the next [`render`](Self::render).
    pub fn cycle_background(&mut self) -> &'static str {
        let color = self.background.cycle();
        tracing::debug!(
            "Background -> {color} (preset {})",
            self.background.index()
        );
        color
    }

    /// The SVG a render of `scene` would rasterize.
    #[must_use]
    pub fn compose(&self, scene: &Scene) -> String {
        scene_to_svg(scene, self.background, self.width, self.height)
    }

    /// Redraw the background and all objects in insertion order.
    ///
    /// On failure the previous frame is kept.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Frame`] if the composed frame cannot be
    /// rasterized.
    pub fn render(&mut self, scene: &Scene) -> RenderResult<()> {
        let svg = self.compose(scene);
        let tree = usvg::Tree::from_str(&svg, &self.options)
            .map_err(|e| RenderError::Frame(format!("SVG parsing failed: {e}")))?;

        let mut pixmap = Pixmap::new(self.width, self.height)
            .ok_or_else(|| RenderError::Frame("Failed to create pixmap".to_string()))?;
        resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());
        self.pixmap = pixmap;

        let draws_foreign = scene.objects().any(|o| {
            matches!(&o.kind, ObjectKind::Image(image) if !image.bitmap.readback_permitted)
        });
        if draws_foreign && !self.tainted {
            tracing::warn!("Surface tainted: drew a bitmap without read-back permission");
            self.tainted = true;
        }

        self.frame_count += 1;
        tracing::trace!(
            "Frame {}: {} objects on {}",
            self.frame_count,
            scene.len(),
            self.background.color()
        );
        Ok(())
    }

    /// The last rendered frame.
    #[must_use]
    pub fn pixels(&self) -> &Pixmap {
        &self.pixmap
    }

    /// Copy out the last rendered frame for encoding.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Tainted`] once a bitmap without read-back
    /// permission has been drawn. The flag is never cleared.
    pub fn read_pixels(&self) -> RenderResult<Pixmap> {
        if self.tainted {
            return Err(RenderError::Tainted);
        }
        Ok(self.pixmap.clone())
    }

    /// Whether read-back is blocked.
    #[must_use]
    pub fn is_tainted(&self) -> bool {
        self.tainted
    }

    /// Number of frames rendered so far.
    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Release the surface.
    pub fn dispose(self) {
        tracing::info!(
            "Surface disposed after {} frames",
            self.frame_count
        );
    }
}

impl std::fmt::Debug for Surface {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Surface")
            .field("width", &self.width)
            .field("height", &self.height)
            .field("background", &self.background)
            .field("tainted", &self.tainted)
            .field("frame_count", &self.frame_count)
            .finish_non_exhaustive()
    }
}

fn background_fill(background: Background) -> Color {
    let [r, g, b] = palette::parse_hex(background.color()).unwrap_or([0, 0, 0]);
    Color::from_rgba8(r, g, b, 255)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn surface() -> Surface {
        Surface::with_config(
            50,
            40,
            &SurfaceConfig {
                load_system_fonts: false,
            },
        )
        .expect("surface")
    }

    fn rgb_at(surface: &Surface, x: u32, y: u32) -> [u8; 3] {
        let px = surface.pixels().pixel(x, y).expect("in bounds");
        [px.red(), px.green(), px.blue()]
    }

    #[test]
    fn test_zero_size_is_unavailable() {
        let err = Surface::initialize(0, 10).unwrap_err();
        assert!(matches!(err, RenderError::SurfaceUnavailable(_)));
    }

    #[test]
    fn test_starts_with_first_preset() {
        let surface = surface();
        assert_eq!(surface.background_index(), 0);
        assert_eq!(rgb_at(&surface, 0, 0), [0x1f, 0x29, 0x37]);
        assert_eq!(surface.frame_count(), 0);
    }

    #[test]
    fn test_cycle_then_render_repaints() {
        let mut surface = surface();
        assert_eq!(surface.cycle_background(), "#374151");
        surface.render(&Scene::new()).expect("render");
        assert_eq!(rgb_at(&surface, 25, 20), [0x37, 0x41, 0x51]);
        assert_eq!(surface.frame_count(), 1);
    }

    #[test]
    fn test_render_is_idempotent() {
        let mut surface = surface();
        let scene = Scene::new();
        surface.render(&scene).expect("render");
        let first = surface.pixels().clone();
        surface.render(&scene).expect("render");
        assert_eq!(first.data(), surface.pixels().data());
    }

    #[test]
    fn test_read_pixels_when_clean() {
        let surface = surface();
        let pixels = surface.read_pixels().expect("clean surface");
        assert_eq!(pixels.width(), 50);
        assert_eq!(pixels.height(), 40);
        assert!(!surface.is_tainted());
    }
}
