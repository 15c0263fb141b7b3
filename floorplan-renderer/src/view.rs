//! The floor-plan view: viewer state, compositor and renderer together.

use std::time::Duration;

use floorplan_core::{
    EventOutcome, InputEvent, MeasurementLabel, RoomScene, ViewCommand, ViewerConfig,
    ViewerState,
};

use crate::compositor::{Compositor, LayerKind, LayeredFrame};
use crate::error::RenderResult;
use crate::{Renderer, RendererConfig};

/// An interactive floor-plan view.
///
/// Hosts forward input with [`handle_event`](Self::handle_event) or the
/// command methods, call [`tick`](Self::tick) once per display refresh, and
/// [`redraw`](Self::redraw) whenever either reports a change.
pub struct FloorPlanView {
    viewer: ViewerState,
    compositor: Compositor,
    renderer: Renderer,
}

impl FloorPlanView {
    /// Create a view of `scene` fitted to a `width` x `height` surface.
    ///
    /// # Errors
    ///
    /// Returns an error if the viewer configuration is invalid or no
    /// backend is available.
    pub fn new(
        scene: RoomScene,
        width: f32,
        height: f32,
        config: ViewerConfig,
        renderer_config: RendererConfig,
    ) -> RenderResult<Self> {
        config.validate()?;
        let compositor = Compositor::new(renderer_config.palette);
        let mut renderer = Renderer::new(renderer_config)?;
        let (px_w, px_h) = surface_size(width, height);
        renderer.resize(px_w, px_h)?;

        tracing::debug!(
            "Floor plan view {width}x{height} on {:?} backend",
            renderer.active_backend()
        );
        Ok(Self {
            viewer: ViewerState::new(scene, width, height, config),
            compositor,
            renderer,
        })
    }

    /// The viewer state.
    #[must_use]
    pub fn viewer(&self) -> &ViewerState {
        &self.viewer
    }

    /// Mutable access to the viewer state.
    pub fn viewer_mut(&mut self) -> &mut ViewerState {
        &mut self.viewer
    }

    /// The renderer.
    #[must_use]
    pub fn renderer(&self) -> &Renderer {
        &self.renderer
    }

    /// Zoom in one step.
    pub fn zoom_in(&mut self) -> EventOutcome {
        self.viewer.execute(ViewCommand::ZoomIn)
    }

    /// Zoom out one step.
    pub fn zoom_out(&mut self) -> EventOutcome {
        self.viewer.execute(ViewCommand::ZoomOut)
    }

    /// Animate back to the fitted view.
    pub fn reset_view(&mut self) -> EventOutcome {
        self.viewer.execute(ViewCommand::ResetView)
    }

    /// Show or hide measurement labels.
    pub fn toggle_measurements(&mut self) -> EventOutcome {
        self.viewer.execute(ViewCommand::ToggleMeasurements)
    }

    /// Switch between metric and imperial labels.
    pub fn toggle_units(&mut self) -> EventOutcome {
        self.viewer.execute(ViewCommand::ToggleUnits)
    }

    /// Forward an input event.
    ///
    /// # Errors
    ///
    /// Returns an error if resizing the backend surface fails.
    pub fn handle_event(&mut self, event: &InputEvent) -> RenderResult<EventOutcome> {
        if let InputEvent::Resize { width, height } = event {
            let (px_w, px_h) = surface_size(*width, *height);
            self.renderer.resize(px_w, px_h)?;
        }
        Ok(self.viewer.process_event(event))
    }

    /// Advance animations by `dt`. Returns whether a redraw is needed.
    pub fn tick(&mut self, dt: Duration) -> bool {
        self.viewer.tick(dt)
    }

    /// Composite and render one frame. Returns the layers that were rebuilt.
    ///
    /// # Errors
    ///
    /// Returns an error if the backend fails to render.
    pub fn redraw(&mut self) -> RenderResult<Vec<LayerKind>> {
        let (frame, regenerated) = self.compositor.compose(&mut self.viewer);
        self.renderer.render(frame)?;
        Ok(regenerated)
    }

    /// The last composited frame.
    #[must_use]
    pub fn drawable(&self) -> &LayeredFrame {
        self.compositor.frame()
    }

    /// Measurement labels for the presented view.
    pub fn labels(&mut self) -> &[MeasurementLabel] {
        self.viewer.labels()
    }

    /// Draw a complete frame and sample its pixels.
    ///
    /// Uses the active backend's surface when it is raster; otherwise the
    /// frame is rasterized on the side.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering or rasterization fails.
    #[cfg(feature = "raster")]
    pub fn capture_pixels(&mut self) -> RenderResult<crate::PixelBuffer> {
        self.redraw()?;
        if let Some(pixels) = self.renderer.pixels() {
            return Ok(pixels);
        }

        let svg = crate::backend::svg::frame_to_svg(
            self.compositor.frame(),
            self.renderer.config().pixel_ratio,
        );
        let pixmap = crate::backend::raster::rasterize_svg(&svg)?;
        Ok(crate::PixelBuffer {
            width: pixmap.width(),
            height: pixmap.height(),
            data: pixmap.data().to_vec(),
        })
    }

    /// The last composited frame as an SVG document.
    #[must_use]
    pub fn export_svg(&self) -> String {
        crate::backend::svg::frame_to_svg(
            self.compositor.frame(),
            self.renderer.config().pixel_ratio,
        )
    }

    /// Draw a complete frame and encode it as PNG.
    ///
    /// A raster backend's surface is encoded as is.
    ///
    /// # Errors
    ///
    /// Returns an error if rendering, rasterization or encoding fails.
    #[cfg(feature = "raster")]
    pub fn export_png(&mut self) -> RenderResult<Vec<u8>> {
        self.capture_pixels()?.encode_png()
    }
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn surface_size(width: f32, height: f32) -> (u32, u32) {
    let clamp = |v: f32| if v.is_finite() { v.max(0.0).round() as u32 } else { 0 };
    (clamp(width), clamp(height))
}
