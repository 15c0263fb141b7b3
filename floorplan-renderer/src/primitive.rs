//! Drawable primitives and layer transforms.

use std::fmt;

use floorplan_core::{Vec2, ViewportState};
use serde::{Deserialize, Serialize};

/// An 8-bit RGBA color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Color {
    /// Red.
    pub r: u8,
    /// Green.
    pub g: u8,
    /// Blue.
    pub b: u8,
    /// Alpha.
    pub a: u8,
}

impl Color {
    /// Opaque white.
    pub const WHITE: Self = Self::rgb(255, 255, 255);
    /// Opaque black.
    pub const BLACK: Self = Self::rgb(0, 0, 0);

    /// Opaque color from components.
    #[must_use]
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Color with alpha.
    #[must_use]
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Parse `#rrggbb` or `#rrggbbaa`.
    #[must_use]
    pub fn from_hex(hex: &str) -> Option<Self> {
        let digits = hex.strip_prefix('#')?;
        let channel = |i: usize| u8::from_str_radix(digits.get(i..i + 2)?, 16).ok();
        match digits.len() {
            6 => Some(Self::rgb(channel(0)?, channel(2)?, channel(4)?)),
            8 => Some(Self::rgba(channel(0)?, channel(2)?, channel(4)?, channel(6)?)),
            _ => None,
        }
    }

    /// Alpha as a fraction in `[0, 1]`.
    #[must_use]
    pub fn opacity(self) -> f32 {
        f32::from(self.a) / 255.0
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)?;
        if self.a != 255 {
            write!(f, "{:02x}", self.a)?;
        }
        Ok(())
    }
}

/// A 2D affine transform in SVG `matrix(a b c d e f)` order.
///
/// `x' = a·x + c·y + e`, `y' = b·x + d·y + f`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Transform2D {
    /// Row 1, column 1.
    pub a: f32,
    /// Row 2, column 1.
    pub b: f32,
    /// Row 1, column 2.
    pub c: f32,
    /// Row 2, column 2.
    pub d: f32,
    /// X translation.
    pub e: f32,
    /// Y translation.
    pub f: f32,
}

impl Transform2D {
    /// The identity transform.
    pub const IDENTITY: Self = Self {
        a: 1.0,
        b: 0.0,
        c: 0.0,
        d: 1.0,
        e: 0.0,
        f: 0.0,
    };

    /// The plan-to-screen transform of a viewport.
    #[must_use]
    pub fn from_view(view: &ViewportState) -> Self {
        let (sin, cos) = view.rotation.sin_cos();
        Self {
            a: view.scale * cos,
            b: view.scale * sin,
            c: -view.scale * sin,
            d: view.scale * cos,
            e: view.translation.x,
            f: view.translation.y,
        }
    }

    /// Transform a point.
    #[must_use]
    pub fn apply(&self, point: Vec2) -> Vec2 {
        Vec2::new(
            self.a.mul_add(point.x, self.c.mul_add(point.y, self.e)),
            self.b.mul_add(point.x, self.d.mul_add(point.y, self.f)),
        )
    }

    /// Uniform scale factor (square root of the determinant).
    #[must_use]
    pub fn scale_factor(&self) -> f32 {
        self.a.mul_add(self.d, -self.b * self.c).abs().sqrt()
    }

    /// Whether this is the identity.
    #[must_use]
    pub fn is_identity(&self) -> bool {
        *self == Self::IDENTITY
    }
}

impl Default for Transform2D {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Line end style.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineCap {
    /// Flat end at the endpoint.
    Butt,
    /// Semicircular end; joins neighbouring walls cleanly.
    Round,
}

impl LineCap {
    /// SVG `stroke-linecap` value.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Butt => "butt",
            Self::Round => "round",
        }
    }
}

/// One drawable item, in its layer's coordinate space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Primitive {
    /// A stroked line segment.
    Line {
        /// Start point.
        from: Vec2,
        /// End point.
        to: Vec2,
        /// Stroke width in layer units.
        width: f32,
        /// Stroke color.
        color: Color,
        /// End style.
        cap: LineCap,
    },
    /// A stroked circular arc.
    Arc {
        /// Arc center.
        center: Vec2,
        /// Radius in layer units.
        radius: f32,
        /// Start angle in radians.
        start_angle: f32,
        /// Signed sweep in radians.
        sweep: f32,
        /// Stroke width in layer units.
        width: f32,
        /// Stroke color.
        color: Color,
    },
    /// A filled polygon.
    Polygon {
        /// Vertices in order.
        points: Vec<Vec2>,
        /// Fill color.
        fill: Color,
    },
    /// A text run centered on `position`.
    Text {
        /// Center of the text.
        position: Vec2,
        /// Text content.
        text: String,
        /// Font size in layer units.
        font_size: f32,
        /// Rotation about `position`, in radians.
        rotation: f32,
        /// Fill color.
        color: Color,
    },
}

impl Primitive {
    /// Short name for logging.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Line { .. } => "line",
            Self::Arc { .. } => "arc",
            Self::Polygon { .. } => "polygon",
            Self::Text { .. } => "text",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_color_hex_round_trip() {
        let color = Color::from_hex("#1a2b3c").expect("hex");
        assert_eq!(color, Color::rgb(0x1a, 0x2b, 0x3c));
        assert_eq!(color.to_string(), "#1a2b3c");

        let translucent = Color::from_hex("#ffffff80").expect("hex");
        assert_eq!(translucent.a, 0x80);
        assert_eq!(translucent.to_string(), "#ffffff80");

        assert!(Color::from_hex("ffffff").is_none());
        assert!(Color::from_hex("#fff").is_none());
        assert!(Color::from_hex("#gggggg").is_none());
    }

    #[test]
    fn test_transform_matches_viewport() {
        let view = ViewportState {
            scale: 40.0,
            translation: Vec2::new(300.0, 200.0),
            rotation: 0.7,
            initial_scale: 20.0,
        };
        let transform = Transform2D::from_view(&view);
        for point in [Vec2::new(0.0, 0.0), Vec2::new(1.5, -2.0), Vec2::new(-3.0, 4.0)] {
            assert!(transform.apply(point).distance(view.to_screen(point)) < 1e-3);
        }
        assert!((transform.scale_factor() - 40.0).abs() < 1e-3);
    }

    #[test]
    fn test_identity() {
        assert!(Transform2D::default().is_identity());
        let p = Vec2::new(3.0, 4.0);
        assert_eq!(Transform2D::IDENTITY.apply(p), p);
    }
}
