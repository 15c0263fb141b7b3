//! Small vector and bounding-box types used by the projector.
//!
//! Screen space is y-down: positive `y` points toward the bottom of the
//! drawing surface. Plan space is the top-down view of the room, with the
//! 3D `x` axis mapped to plan `x` and the 3D `z` axis mapped to plan `y`.

use std::f32::consts::TAU;
use std::ops::{Add, Mul, Neg, Sub};

use serde::{Deserialize, Serialize};

/// A 2D vector in plan or screen space.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    /// X component.
    pub x: f32,
    /// Y component.
    pub y: f32,
}

impl Vec2 {
    /// Create a new vector.
    #[must_use]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Zero vector.
    #[must_use]
    pub const fn zero() -> Self {
        Self::new(0.0, 0.0)
    }

    /// Length (magnitude) of the vector.
    #[must_use]
    pub fn length(self) -> f32 {
        self.x.hypot(self.y)
    }

    /// Distance between two points.
    #[must_use]
    pub fn distance(self, other: Self) -> f32 {
        (other - self).length()
    }

    /// Dot product.
    #[must_use]
    pub fn dot(self, other: Self) -> f32 {
        self.x.mul_add(other.x, self.y * other.y)
    }

    /// Unit vector in the same direction, or zero for a zero vector.
    #[must_use]
    pub fn normalize(self) -> Self {
        let len = self.length();
        if len > 0.0 {
            Self::new(self.x / len, self.y / len)
        } else {
            self
        }
    }

    /// The vector rotated a quarter turn (`(x, y)` to `(-y, x)`).
    #[must_use]
    pub const fn perpendicular(self) -> Self {
        Self::new(-self.y, self.x)
    }

    /// Rotate by `angle` radians using the standard rotation matrix.
    ///
    /// In y-down screen space a positive angle turns clockwise.
    #[must_use]
    pub fn rotate(self, angle: f32) -> Self {
        let (sin, cos) = angle.sin_cos();
        Self::new(
            self.x.mul_add(cos, -self.y * sin),
            self.x.mul_add(sin, self.y * cos),
        )
    }

    /// Angle of the vector from the positive x axis, in radians.
    #[must_use]
    pub fn angle(self) -> f32 {
        self.y.atan2(self.x)
    }

    /// Linear interpolation toward `other`.
    #[must_use]
    pub fn lerp(self, other: Self, t: f32) -> Self {
        self + (other - self) * t
    }

    /// Midpoint between two points.
    #[must_use]
    pub fn midpoint(self, other: Self) -> Self {
        self.lerp(other, 0.5)
    }

    /// Whether both components are finite.
    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }
}

impl Add for Vec2 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Self;

    fn mul(self, rhs: f32) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

impl Neg for Vec2 {
    type Output = Self;

    fn neg(self) -> Self {
        Self::new(-self.x, -self.y)
    }
}

/// A 3D vector for capture-space positions and extents.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec3 {
    /// X component.
    pub x: f32,
    /// Y component (vertical, dropped by the top-down projection).
    pub y: f32,
    /// Z component (depth).
    pub z: f32,
}

impl Vec3 {
    /// Create a new vector.
    #[must_use]
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Zero vector.
    #[must_use]
    pub const fn zero() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    /// Top-down projection: drop the vertical axis.
    #[must_use]
    pub const fn to_plan(self) -> Vec2 {
        Vec2::new(self.x, self.z)
    }

    /// Whether all components are finite.
    #[must_use]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }
}

/// Axis-aligned bounding box in plan space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Aabb2 {
    /// Minimum x.
    pub min_x: f32,
    /// Maximum x.
    pub max_x: f32,
    /// Minimum plan y (world z).
    pub min_z: f32,
    /// Maximum plan y (world z).
    pub max_z: f32,
}

impl Aabb2 {
    /// Create a box from its extremes.
    #[must_use]
    pub const fn new(min_x: f32, max_x: f32, min_z: f32, max_z: f32) -> Self {
        Self {
            min_x,
            max_x,
            min_z,
            max_z,
        }
    }

    /// An inverted box that any `include` call will replace.
    #[must_use]
    pub const fn empty() -> Self {
        Self::new(f32::INFINITY, f32::NEG_INFINITY, f32::INFINITY, f32::NEG_INFINITY)
    }

    /// Whether no point has been included yet.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.min_x > self.max_x || self.min_z > self.max_z
    }

    /// Grow the box to contain `point`.
    pub fn include(&mut self, point: Vec2) {
        self.min_x = self.min_x.min(point.x);
        self.max_x = self.max_x.max(point.x);
        self.min_z = self.min_z.min(point.y);
        self.max_z = self.max_z.max(point.y);
    }

    /// Extent along x.
    #[must_use]
    pub fn width(&self) -> f32 {
        self.max_x - self.min_x
    }

    /// Extent along plan y.
    #[must_use]
    pub fn height(&self) -> f32 {
        self.max_z - self.min_z
    }

    /// Center point.
    #[must_use]
    pub fn center(&self) -> Vec2 {
        Vec2::new(
            (self.min_x + self.max_x) * 0.5,
            (self.min_z + self.max_z) * 0.5,
        )
    }

    /// Corners in drawing order (clockwise on a y-down surface).
    #[must_use]
    pub const fn corners(&self) -> [Vec2; 4] {
        [
            Vec2::new(self.min_x, self.min_z),
            Vec2::new(self.max_x, self.min_z),
            Vec2::new(self.max_x, self.max_z),
            Vec2::new(self.min_x, self.max_z),
        ]
    }

    /// Pad every side by `fraction` of the extent along that axis.
    #[must_use]
    pub fn padded(&self, fraction: f32) -> Self {
        let pad_x = self.width() * fraction;
        let pad_z = self.height() * fraction;
        Self::new(
            self.min_x - pad_x,
            self.max_x + pad_x,
            self.min_z - pad_z,
            self.max_z + pad_z,
        )
    }
}

/// A directed line segment.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// Start point.
    pub start: Vec2,
    /// End point.
    pub end: Vec2,
}

impl Segment {
    /// Create a segment.
    #[must_use]
    pub const fn new(start: Vec2, end: Vec2) -> Self {
        Self { start, end }
    }

    /// Segment length.
    #[must_use]
    pub fn length(&self) -> f32 {
        self.start.distance(self.end)
    }

    /// Unit direction from start to end (zero for a degenerate segment).
    #[must_use]
    pub fn direction(&self) -> Vec2 {
        (self.end - self.start).normalize()
    }

    /// Angle of the direction from the positive x axis.
    #[must_use]
    pub fn angle(&self) -> f32 {
        (self.end - self.start).angle()
    }

    /// Midpoint.
    #[must_use]
    pub fn midpoint(&self) -> Vec2 {
        self.start.midpoint(self.end)
    }

    /// Point at parameter `t` (0 = start, 1 = end).
    #[must_use]
    pub fn point_at(&self, t: f32) -> Vec2 {
        self.start.lerp(self.end, t)
    }

    /// Shift both endpoints by `offset`.
    #[must_use]
    pub fn translated(&self, offset: Vec2) -> Self {
        Self::new(self.start + offset, self.end + offset)
    }

    /// Shortest distance from `point` to the segment.
    #[must_use]
    pub fn distance_to(&self, point: Vec2) -> f32 {
        let along = self.end - self.start;
        let len_sq = along.dot(along);
        if len_sq <= f32::EPSILON {
            return self.start.distance(point);
        }
        let t = ((point - self.start).dot(along) / len_sq).clamp(0.0, 1.0);
        self.point_at(t).distance(point)
    }
}

/// Wrap an angle into `[0, 2π)`.
#[must_use]
pub fn wrap_angle(angle: f32) -> f32 {
    let wrapped = angle.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs
    if wrapped >= TAU {
        0.0
    } else {
        wrapped
    }
}
