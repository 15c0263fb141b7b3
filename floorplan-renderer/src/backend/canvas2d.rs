//! Recording 2D canvas backend.
//!
//! Flattens a frame into the command stream a host would replay onto an
//! immediate-mode 2D context: clear, then per layer a transform followed
//! by its primitives.

use crate::compositor::LayeredFrame;
use crate::primitive::{Color, Primitive, Transform2D};
use crate::{BackendType, RenderResult};

use super::RenderBackend;

/// One recorded draw call.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// Fill the whole surface.
    Clear(Color),
    /// Replace the current transform.
    SetTransform(Transform2D),
    /// Draw a primitive under the current transform.
    Draw(Primitive),
}

/// 2D canvas backend that records draw commands.
pub struct Canvas2DBackend {
    width: u32,
    height: u32,
    commands: Vec<DrawCommand>,
}

impl Canvas2DBackend {
    /// Create a new 2D canvas backend.
    #[must_use]
    pub fn new() -> Self {
        Self {
            width: 800,
            height: 600,
            commands: Vec::new(),
        }
    }

    /// Commands recorded by the last render.
    #[must_use]
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    /// Current surface size.
    #[must_use]
    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

impl Default for Canvas2DBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl RenderBackend for Canvas2DBackend {
    fn backend_type(&self) -> BackendType {
        BackendType::Canvas2D
    }

    fn render(&mut self, frame: &LayeredFrame) -> RenderResult<()> {
        tracing::trace!(
            "Canvas2D render: {} primitives, viewport {}x{}",
            frame.primitive_count(),
            self.width,
            self.height
        );

        self.commands.clear();
        self.commands.push(DrawCommand::Clear(frame.background));
        for layer in frame.layers.iter().filter(|layer| !layer.is_empty()) {
            self.commands.push(DrawCommand::SetTransform(layer.transform));
            for primitive in &layer.primitives {
                tracing::trace!("Draw {} on {}", primitive.name(), layer.kind.as_str());
                self.commands.push(DrawCommand::Draw(primitive.clone()));
            }
        }

        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) -> RenderResult<()> {
        self.width = width;
        self.height = height;
        tracing::debug!("Canvas2D resized to {}x{}", width, height);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compositor::LayerKind;
    use crate::primitive::LineCap;
    use floorplan_core::Vec2;

    #[test]
    fn test_records_layers_in_order() {
        let mut frame = LayeredFrame::empty(100.0, 100.0, Color::WHITE);
        frame.layers[1].primitives.push(Primitive::Line {
            from: Vec2::zero(),
            to: Vec2::new(1.0, 0.0),
            width: 0.1,
            color: Color::BLACK,
            cap: LineCap::Round,
        });
        assert_eq!(frame.layers[1].kind, LayerKind::Walls);

        let mut backend = Canvas2DBackend::new();
        backend.render(&frame).expect("render");
        let commands = backend.commands();
        assert_eq!(commands.len(), 3);
        assert_eq!(commands[0], DrawCommand::Clear(Color::WHITE));
        assert!(matches!(commands[1], DrawCommand::SetTransform(_)));
        assert!(matches!(commands[2], DrawCommand::Draw(Primitive::Line { .. })));

        backend.render(&LayeredFrame::empty(1.0, 1.0, Color::BLACK)).expect("render");
        assert_eq!(backend.commands().len(), 1);
    }

    #[test]
    fn test_resize() {
        let mut backend = Canvas2DBackend::default();
        backend.resize(1024, 768).expect("resize");
        assert_eq!(backend.size(), (1024, 768));
        assert_eq!(backend.backend_type(), BackendType::Canvas2D);
    }
}
