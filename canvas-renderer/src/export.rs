//! Raster encoding of rendered pixels.
//!
//! Works on the pixel buffer the surface actually drew, never on the object
//! model, so exported files match what was on screen.

use image::ImageEncoder;
use tiny_skia::Pixmap;

use crate::error::{RenderError, RenderResult};

/// Export output format.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExportFormat {
    /// PNG image.
    #[default]
    Png,
    /// JPEG image.
    Jpeg,
}

impl ExportFormat {
    /// MIME type of the encoded output.
    #[must_use]
    pub fn mime_type(self) -> &'static str {
        match self {
            Self::Png => "image/png",
            Self::Jpeg => "image/jpeg",
        }
    }

    /// Conventional file extension, without the dot.
    #[must_use]
    pub fn extension(self) -> &'static str {
        match self {
            Self::Png => "png",
            Self::Jpeg => "jpg",
        }
    }
}

impl std::str::FromStr for ExportFormat {
    type Err = RenderError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "png" => Ok(Self::Png),
            "jpg" | "jpeg" => Ok(Self::Jpeg),
            other => Err(RenderError::Export(format!("unsupported format: {other}"))),
        }
    }
}

/// Configuration for pixel export.
#[derive(Debug, Clone)]
pub struct ExportConfig {
    /// Output format.
    pub format: ExportFormat,
    /// JPEG quality 1-100 (default: 85).
    pub jpeg_quality: u8,
    /// Colour translucent pixels are flattened onto for JPEG.
    pub matte: [u8; 3],
}

impl Default for ExportConfig {
    fn default() -> Self {
        Self {
            format: ExportFormat::Png,
            jpeg_quality: 85,
            matte: [255, 255, 255],
        }
    }
}

/// Encodes surface pixels into a portable raster format.
#[derive(Debug, Clone, Default)]
pub struct PixelExporter {
    config: ExportConfig,
}

impl PixelExporter {
    /// Create a new exporter with the given configuration.
    #[must_use]
    pub fn new(config: ExportConfig) -> Self {
        Self { config }
    }

    /// Create an exporter with default configuration.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::default()
    }

    /// The configured output format.
    #[must_use]
    pub fn format(&self) -> ExportFormat {
        self.config.format
    }

    /// Encode pixels in the configured format.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Export`] if encoding fails.
    pub fn encode(&self, pixels: &Pixmap) -> RenderResult<Vec<u8>> {
        let bytes = match self.config.format {
            ExportFormat::Png => Self::encode_png(pixels)?,
            ExportFormat::Jpeg => self.encode_jpeg(pixels)?,
        };
        tracing::debug!(
            "Encoded {}x{} frame as {:?}: {} bytes",
            pixels.width(),
            pixels.height(),
            self.config.format,
            bytes.len()
        );
        Ok(bytes)
    }

    /// Encode pixels as PNG.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Export`] if encoding fails.
    pub fn encode_png(pixels: &Pixmap) -> RenderResult<Vec<u8>> {
        pixels
            .encode_png()
            .map_err(|e| RenderError::Export(format!("PNG encoding failed: {e}")))
    }

    /// Encode pixels as JPEG, flattening alpha onto the matte colour.
    ///
    /// # Errors
    ///
    /// Returns [`RenderError::Export`] if encoding fails.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn encode_jpeg(&self, pixels: &Pixmap) -> RenderResult<Vec<u8>> {
        let (width, height) = (pixels.width(), pixels.height());
        let matte = &self.config.matte;
        let mut rgb_data = Vec::with_capacity((width * height * 3) as usize);
        // Premultiplied, so the matte only needs the uncovered share added.
        for pixel in pixels.data().chunks_exact(4) {
            let inv = 1.0 - f32::from(pixel[3]) / 255.0;
            for channel in 0..3 {
                let value = f32::from(matte[channel]).mul_add(inv, f32::from(pixel[channel]));
                rgb_data.push(value.round().clamp(0.0, 255.0) as u8);
            }
        }

        let mut buf = std::io::Cursor::new(Vec::new());
        let encoder =
            image::codecs::jpeg::JpegEncoder::new_with_quality(&mut buf, self.config.jpeg_quality);
        encoder
            .write_image(&rgb_data, width, height, image::ExtendedColorType::Rgb8)
            .map_err(|e| RenderError::Export(format!("JPEG encoding failed: {e}")))?;

        Ok(buf.into_inner())
    }
}
