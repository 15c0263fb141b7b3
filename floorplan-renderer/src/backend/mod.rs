//! Rendering backend implementations.

pub mod canvas2d;
#[cfg(feature = "raster")]
pub mod raster;
pub mod svg;

use crate::compositor::LayeredFrame;
use crate::{BackendType, RenderResult};

/// Premultiplied RGBA pixels sampled from a raster surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PixelBuffer {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// Row-major RGBA bytes, `width * height * 4` long.
    pub data: Vec<u8>,
}

impl PixelBuffer {
    /// RGBA bytes of the pixel at `(x, y)`, if in range.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let offset = ((y as usize) * (self.width as usize) + x as usize) * 4;
        let bytes = self.data.get(offset..offset + 4)?;
        Some([bytes[0], bytes[1], bytes[2], bytes[3]])
    }
}

/// Trait for rendering backends.
pub trait RenderBackend {
    /// Get the backend type.
    fn backend_type(&self) -> BackendType;

    /// Render a composited frame.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails.
    fn render(&mut self, frame: &LayeredFrame) -> RenderResult<()>;

    /// Resize the rendering surface.
    ///
    /// # Errors
    ///
    /// Returns an error if resizing fails.
    fn resize(&mut self, width: u32, height: u32) -> RenderResult<()>;

    /// Pixels of the last rendered frame, for backends that own a raster
    /// surface.
    fn pixels(&self) -> Option<PixelBuffer> {
        None
    }
}
