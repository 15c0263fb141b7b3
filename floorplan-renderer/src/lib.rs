//! # Floorplan Renderer
//!
//! Layered compositing and output backends for floor-plan views.
//!
//! ## Rendering Backends
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │     Compositor → LayeredFrame (5 layers)    │
//! ├─────────────┬─────────────┬─────────────────┤
//! │ Raster      │ SVG         │ 2D Recording    │
//! │ (resvg)     │ (document)  │ (draw commands) │
//! └─────────────┴─────────────┴─────────────────┘
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod backend;
pub mod compositor;
pub mod error;
pub mod primitive;
pub mod view;

pub use backend::{PixelBuffer, RenderBackend};
pub use compositor::{Compositor, Layer, LayerKind, LayeredFrame};
pub use error::{RenderError, RenderResult};
pub use primitive::{Color, LineCap, Primitive, Transform2D};
pub use view::FloorPlanView;

use serde::{Deserialize, Serialize};

/// Colors for each element of the drawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    /// Clear color; also used for label halos.
    pub background: Color,
    /// Room floor fill; also used to erase wall under openings.
    pub floor: Color,
    /// Wall strokes.
    pub wall: Color,
    /// Door swing arcs.
    pub door: Color,
    /// Window glazing lines.
    pub window: Color,
    /// Opening frame lines.
    pub frame: Color,
    /// Measurement text.
    pub label: Color,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            background: Color::WHITE,
            floor: Color::rgb(244, 241, 236),
            wall: Color::rgb(38, 38, 38),
            door: Color::rgb(120, 120, 120),
            window: Color::rgb(74, 144, 226),
            frame: Color::rgb(38, 38, 38),
            label: Color::rgb(20, 20, 20),
        }
    }
}

/// Configuration for the renderer.
#[derive(Debug, Clone)]
pub struct RendererConfig {
    /// Preferred backend (will fall back if unavailable).
    pub preferred_backend: BackendType,
    /// Drawing colors.
    pub palette: Palette,
    /// Device pixels per frame pixel.
    pub pixel_ratio: f32,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            preferred_backend: BackendType::Raster,
            palette: Palette::default(),
            pixel_ratio: 1.0,
        }
    }
}

/// Available rendering backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendType {
    /// Pixmap rendering via resvg (requires the `raster` feature).
    Raster,
    /// SVG document output.
    Svg,
    /// Recorded 2D canvas commands.
    Canvas2D,
}

/// The main renderer interface.
pub struct Renderer {
    config: RendererConfig,
    backend: Box<dyn RenderBackend>,
    frame_count: u64,
}

impl Renderer {
    /// Create a new renderer with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if no suitable backend is available.
    pub fn new(config: RendererConfig) -> RenderResult<Self> {
        if !(config.pixel_ratio.is_finite() && config.pixel_ratio > 0.0) {
            return Err(RenderError::NoBackend(format!(
                "invalid pixel ratio {}",
                config.pixel_ratio
            )));
        }
        let backend = Self::create_backend(&config);

        Ok(Self {
            config,
            backend,
            frame_count: 0,
        })
    }

    /// Create the appropriate backend based on config and availability.
    fn create_backend(config: &RendererConfig) -> Box<dyn RenderBackend> {
        match config.preferred_backend {
            BackendType::Raster => {
                #[cfg(feature = "raster")]
                {
                    Box::new(backend::raster::RasterBackend::new(config.pixel_ratio))
                }
                #[cfg(not(feature = "raster"))]
                {
                    tracing::warn!("Raster backend not compiled in, falling back to SVG");
                    Self::create_backend(&RendererConfig {
                        preferred_backend: BackendType::Svg,
                        ..config.clone()
                    })
                }
            }
            BackendType::Svg => Box::new(backend::svg::SvgBackend::new(config.pixel_ratio)),
            BackendType::Canvas2D => Box::new(backend::canvas2d::Canvas2DBackend::new()),
        }
    }

    /// Render a frame.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering fails.
    pub fn render(&mut self, frame: &LayeredFrame) -> RenderResult<()> {
        self.backend.render(frame)?;
        self.frame_count += 1;
        Ok(())
    }

    /// Get the current frame count.
    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Get the active backend type.
    #[must_use]
    pub fn active_backend(&self) -> BackendType {
        self.backend.backend_type()
    }

    /// Get the renderer configuration.
    #[must_use]
    pub fn config(&self) -> &RendererConfig {
        &self.config
    }

    /// Resize the rendering surface.
    ///
    /// # Errors
    ///
    /// Returns an error if resize fails.
    pub fn resize(&mut self, width: u32, height: u32) -> RenderResult<()> {
        self.backend.resize(width, height)
    }

    /// Pixels of the last frame, if the active backend is raster.
    #[must_use]
    pub fn pixels(&self) -> Option<PixelBuffer> {
        self.backend.pixels()
    }
}

/// Floorplan renderer version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
