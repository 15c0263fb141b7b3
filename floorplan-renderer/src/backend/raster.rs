//! Raster backend on the resvg/tiny-skia pipeline.
//!
//! Frames go through the SVG serializer, are parsed by usvg and painted by
//! resvg into a [`tiny_skia::Pixmap`] that stays around as the backing
//! surface until the next render.

use std::sync::{Arc, OnceLock};

use usvg::fontdb;

use crate::compositor::LayeredFrame;
use crate::error::{RenderError, RenderResult};
use crate::BackendType;

use super::svg::frame_to_svg;
use super::{PixelBuffer, RenderBackend};

/// Families tried, in order, for the generic `sans-serif` label font.
const SANS_SERIF_FAMILIES: &[&str] = &[
    "DejaVu Sans",
    "Liberation Sans",
    "Noto Sans",
    "Arial",
    "Helvetica",
];

/// System fonts, loaded once per process.
fn font_database() -> Arc<fontdb::Database> {
    static FONTS: OnceLock<Arc<fontdb::Database>> = OnceLock::new();
    FONTS
        .get_or_init(|| {
            let mut db = fontdb::Database::new();
            db.load_system_fonts();
            match sans_serif_family(&db) {
                Some(family) => {
                    tracing::debug!("Loaded {} font faces, labels use {family}", db.len());
                    db.set_sans_serif_family(family);
                }
                None => tracing::warn!("No system fonts found, labels will not rasterize"),
            }
            Arc::new(db)
        })
        .clone()
}

fn sans_serif_family(db: &fontdb::Database) -> Option<String> {
    let names: Vec<&str> = db
        .faces()
        .filter_map(|face| face.families.first().map(|(name, _)| name.as_str()))
        .collect();
    SANS_SERIF_FAMILIES
        .iter()
        .copied()
        .find(|family| names.contains(family))
        .or_else(|| names.iter().copied().find(|name| name.contains("Sans")))
        .or_else(|| names.first().copied())
        .map(str::to_string)
}

/// Rasterize an SVG document into a new pixmap.
///
/// Text is shaped with the system fonts.
///
/// # Errors
///
/// Returns an error if the SVG cannot be parsed or the pixmap cannot be
/// allocated.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
pub fn rasterize_svg(svg: &str) -> RenderResult<tiny_skia::Pixmap> {
    let opt = usvg::Options {
        fontdb: font_database(),
        ..usvg::Options::default()
    };
    let tree = usvg::Tree::from_str(svg, &opt)
        .map_err(|e| RenderError::Export(format!("SVG parsing failed: {e}")))?;

    let px_w = tree.size().width().ceil() as u32;
    let px_h = tree.size().height().ceil() as u32;

    let mut pixmap = tiny_skia::Pixmap::new(px_w.max(1), px_h.max(1))
        .ok_or_else(|| RenderError::Export("Failed to create pixmap".to_string()))?;

    resvg::render(&tree, tiny_skia::Transform::default(), &mut pixmap.as_mut());

    Ok(pixmap)
}

impl PixelBuffer {
    /// Encode the pixels as PNG.
    ///
    /// # Errors
    ///
    /// Returns an error if the buffer size does not match its dimensions or
    /// encoding fails.
    pub fn encode_png(&self) -> RenderResult<Vec<u8>> {
        let size = tiny_skia::IntSize::from_wh(self.width, self.height)
            .ok_or_else(|| RenderError::Export("Empty pixel buffer".to_string()))?;
        let pixmap = tiny_skia::Pixmap::from_vec(self.data.clone(), size)
            .ok_or_else(|| RenderError::Export("Pixel buffer size mismatch".to_string()))?;
        pixmap
            .encode_png()
            .map_err(|e| RenderError::Export(format!("PNG encoding failed: {e}")))
    }
}

/// Backend that paints frames into an owned pixmap.
///
/// The pixmap is sized from each frame, so `resize` only drops the stale
/// surface.
pub struct RasterBackend {
    pixel_ratio: f32,
    pixmap: Option<tiny_skia::Pixmap>,
}

impl RasterBackend {
    /// Create a raster backend.
    #[must_use]
    pub fn new(pixel_ratio: f32) -> Self {
        Self {
            pixel_ratio,
            pixmap: None,
        }
    }

    /// The backing surface of the last render.
    #[must_use]
    pub fn pixmap(&self) -> Option<&tiny_skia::Pixmap> {
        self.pixmap.as_ref()
    }

    /// Encode the last render as PNG.
    ///
    /// # Errors
    ///
    /// Returns an error if nothing has been rendered yet or encoding fails.
    pub fn encode_png(&self) -> RenderResult<Vec<u8>> {
        let pixmap = self
            .pixmap
            .as_ref()
            .ok_or_else(|| RenderError::Frame("nothing rendered yet".to_string()))?;
        pixmap
            .encode_png()
            .map_err(|e| RenderError::Export(format!("PNG encoding failed: {e}")))
    }
}

impl Default for RasterBackend {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl RenderBackend for RasterBackend {
    fn backend_type(&self) -> BackendType {
        BackendType::Raster
    }

    fn render(&mut self, frame: &LayeredFrame) -> RenderResult<()> {
        let svg = frame_to_svg(frame, self.pixel_ratio);
        let pixmap = rasterize_svg(&svg)?;
        tracing::trace!(
            "Raster render: {} primitives into {}x{} pixmap",
            frame.primitive_count(),
            pixmap.width(),
            pixmap.height()
        );
        self.pixmap = Some(pixmap);
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) -> RenderResult<()> {
        self.pixmap = None;
        tracing::debug!("Raster surface resized to {}x{}", width, height);
        Ok(())
    }

    fn pixels(&self) -> Option<PixelBuffer> {
        self.pixmap.as_ref().map(|pixmap| PixelBuffer {
            width: pixmap.width(),
            height: pixmap.height(),
            data: pixmap.data().to_vec(),
        })
    }
}
