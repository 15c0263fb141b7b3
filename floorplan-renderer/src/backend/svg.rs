//! SVG backend.
//!
//! Serializes a [`LayeredFrame`] to an SVG document. Each layer becomes a
//! `<g>` carrying its transform as `matrix(..)`, so plan-space geometry is
//! emitted untouched and the viewer's pan, zoom and rotation live in one
//! attribute per layer.

use std::fmt::Write;

use crate::compositor::LayeredFrame;
use crate::primitive::{Color, Primitive, Transform2D};
use crate::{BackendType, RenderResult};

use super::RenderBackend;

/// Render a frame to an SVG document.
///
/// `pixel_ratio` scales the output size; the view box stays in frame
/// pixels.
#[must_use]
pub fn frame_to_svg(frame: &LayeredFrame, pixel_ratio: f32) -> String {
    let view_w = frame.width.max(1.0);
    let view_h = frame.height.max(1.0);
    let out_w = (view_w * pixel_ratio).max(1.0);
    let out_h = (view_h * pixel_ratio).max(1.0);

    let mut svg = String::with_capacity(4096);
    let _ = write!(
        svg,
        "<svg xmlns=\"http://www.w3.org/2000/svg\" width=\"{out_w}\" height=\"{out_h}\" viewBox=\"0 0 {view_w} {view_h}\">",
    );
    let _ = write!(
        svg,
        "<rect width=\"100%\" height=\"100%\"{}/>",
        paint("fill", frame.background)
    );

    for layer in frame.layers.iter().filter(|layer| !layer.is_empty()) {
        let _ = write!(svg, "<g id=\"{}\"", layer.kind.as_str());
        if !layer.transform.is_identity() {
            let _ = write!(svg, " transform=\"{}\"", matrix(&layer.transform));
        }
        svg.push('>');
        for primitive in &layer.primitives {
            write_primitive(&mut svg, primitive);
        }
        svg.push_str("</g>");
    }

    svg.push_str("</svg>");
    svg
}

fn matrix(t: &Transform2D) -> String {
    format!("matrix({} {} {} {} {} {})", t.a, t.b, t.c, t.d, t.e, t.f)
}

/// ` fill="#rrggbb"` plus an opacity attribute when translucent.
fn paint(attribute: &str, color: Color) -> String {
    let mut out = format!(
        " {attribute}=\"#{:02x}{:02x}{:02x}\"",
        color.r, color.g, color.b
    );
    if color.a != 255 {
        let _ = write!(out, " {attribute}-opacity=\"{}\"", color.opacity());
    }
    out
}

fn write_primitive(svg: &mut String, primitive: &Primitive) {
    match primitive {
        Primitive::Line {
            from,
            to,
            width,
            color,
            cap,
        } => {
            let _ = write!(
                svg,
                "<line x1=\"{}\" y1=\"{}\" x2=\"{}\" y2=\"{}\"{} stroke-width=\"{width}\" stroke-linecap=\"{}\"/>",
                from.x,
                from.y,
                to.x,
                to.y,
                paint("stroke", *color),
                cap.as_str(),
            );
        }

        Primitive::Arc {
            center,
            radius,
            start_angle,
            sweep,
            width,
            color,
        } => {
            let end_angle = start_angle + sweep;
            let x1 = radius.mul_add(start_angle.cos(), center.x);
            let y1 = radius.mul_add(start_angle.sin(), center.y);
            let x2 = radius.mul_add(end_angle.cos(), center.x);
            let y2 = radius.mul_add(end_angle.sin(), center.y);
            let large_arc = i32::from(sweep.abs() > std::f32::consts::PI);
            let sweep_flag = i32::from(*sweep > 0.0);
            let _ = write!(
                svg,
                "<path d=\"M{x1},{y1} A{radius},{radius} 0 {large_arc},{sweep_flag} {x2},{y2}\" fill=\"none\"{} stroke-width=\"{width}\"/>",
                paint("stroke", *color),
            );
        }

        Primitive::Polygon { points, fill } => {
            let mut coords = String::new();
            for (i, point) in points.iter().enumerate() {
                if i > 0 {
                    coords.push(' ');
                }
                let _ = write!(coords, "{},{}", point.x, point.y);
            }
            let _ = write!(svg, "<polygon points=\"{coords}\"{}/>", paint("fill", *fill));
        }

        Primitive::Text {
            position,
            text,
            font_size,
            rotation,
            color,
        } => {
            let escaped = escape_xml(text);
            let _ = write!(
                svg,
                "<text x=\"{}\" y=\"{}\" font-size=\"{font_size}\"{} text-anchor=\"middle\" dominant-baseline=\"central\" font-family=\"sans-serif\"",
                position.x,
                position.y,
                paint("fill", *color),
            );
            if rotation.abs() > f32::EPSILON {
                let _ = write!(
                    svg,
                    " transform=\"rotate({} {} {})\"",
                    rotation.to_degrees(),
                    position.x,
                    position.y
                );
            }
            let _ = write!(svg, ">{escaped}</text>");
        }
    }
}

/// Escape special XML characters.
fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// Backend that keeps the last frame as an SVG document.
pub struct SvgBackend {
    pixel_ratio: f32,
    document: String,
}

impl SvgBackend {
    /// Create an SVG backend.
    #[must_use]
    pub fn new(pixel_ratio: f32) -> Self {
        Self {
            pixel_ratio,
            document: String::new(),
        }
    }

    /// The last rendered document; empty before the first render.
    #[must_use]
    pub fn document(&self) -> &str {
        &self.document
    }
}

impl Default for SvgBackend {
    fn default() -> Self {
        Self::new(1.0)
    }
}

impl RenderBackend for SvgBackend {
    fn backend_type(&self) -> BackendType {
        BackendType::Svg
    }

    fn render(&mut self, frame: &LayeredFrame) -> RenderResult<()> {
        self.document = frame_to_svg(frame, self.pixel_ratio);
        tracing::trace!(
            "SVG render: {} primitives, {} bytes, frame {}x{}",
            frame.primitive_count(),
            self.document.len(),
            frame.width,
            frame.height
        );
        Ok(())
    }

    fn resize(&mut self, width: u32, height: u32) -> RenderResult<()> {
        tracing::debug!("SVG surface resized to {}x{}", width, height);
        Ok(())
    }
}
