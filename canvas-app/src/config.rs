//! Editor configuration.

use canvas_core::{CANVAS_HEIGHT, CANVAS_WIDTH, DEFAULT_TEXT, IMAGE_TARGET_SIZE};
use canvas_renderer::{ExportConfig, ExportFormat};

use crate::fetch::FetchMode;

/// Image added when the caller does not name one.
pub const DEFAULT_IMAGE_SOURCE: &str = "https://just-chill-guy.vercel.app/chillguy.png";

/// Origin presented to remote servers when fetching in CORS mode.
pub const DEFAULT_ORIGIN: &str = "http://localhost";

/// Configuration for an editing session.
#[derive(Debug, Clone)]
pub struct EditorConfig {
    /// Surface width in pixels.
    pub width: u32,
    /// Surface height in pixels.
    pub height: u32,
    /// Width and height added images are normalized to.
    pub image_target_size: f32,
    /// Content of new text objects.
    pub default_text: String,
    /// Source used by `add-image` without an argument.
    pub default_image_source: String,
    /// Export file name without extension.
    pub export_file_stem: String,
    /// Export encoding settings.
    pub export: ExportConfig,
    /// How remote bitmaps are requested.
    pub fetch_mode: FetchMode,
    /// Origin sent with CORS requests.
    pub origin: String,
    /// Load system fonts for text rendering.
    pub load_system_fonts: bool,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl EditorConfig {
    /// Create a configuration with the editor's standard values.
    #[must_use]
    pub fn new() -> Self {
        Self {
            width: CANVAS_WIDTH,
            height: CANVAS_HEIGHT,
            image_target_size: IMAGE_TARGET_SIZE,
            default_text: DEFAULT_TEXT.to_string(),
            default_image_source: DEFAULT_IMAGE_SOURCE.to_string(),
            export_file_stem: "canvas".to_string(),
            export: ExportConfig::default(),
            fetch_mode: FetchMode::Cors,
            origin: DEFAULT_ORIGIN.to_string(),
            load_system_fonts: true,
        }
    }

    /// File name exported artifacts are delivered under.
    #[must_use]
    pub fn export_file_name(&self) -> String {
        format!("{}.{}", self.export_file_stem, self.export.format.extension())
    }

    /// Set the export format.
    #[must_use]
    pub fn with_export_format(mut self, format: ExportFormat) -> Self {
        self.export.format = format;
        self
    }

    /// Centre of the surface.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn centre(&self) -> (f32, f32) {
        (self.width as f32 / 2.0, self.height as f32 / 2.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = EditorConfig::default();
        assert_eq!((config.width, config.height), (500, 500));
        assert_eq!(config.export_file_name(), "canvas.png");
        assert_eq!(config.centre(), (250.0, 250.0));
        assert_eq!(config.fetch_mode, FetchMode::Cors);
    }

    #[test]
    fn test_jpeg_file_name() {
        let config = EditorConfig::default().with_export_format(ExportFormat::Jpeg);
        assert_eq!(config.export_file_name(), "canvas.jpg");
    }
}
