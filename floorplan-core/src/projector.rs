//! Pure projection of surfaces into plan and screen space.
//!
//! Geometry here is computed in plan space (world units, y-down) unless a
//! function takes a [`ViewportState`], in which case it returns screen
//! pixels. Stroke widths are expressed in fit-scale pixels: the width a
//! stroke has on screen at zoom ratio 1.

use std::f32::consts::FRAC_PI_2;

use serde::{Deserialize, Serialize};

use crate::geometry::{Segment, Vec2};
use crate::viewport::ViewportState;
use crate::{PlanError, PlanResult, Surface};

/// Stroke and opening proportions.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StrokeConfig {
    /// Wall stroke width at zoom ratio 1, in fit-scale pixels.
    pub base_wall_width: f32,
    /// Floor for the wall stroke width, in fit-scale pixels.
    pub min_wall_width: f32,
    /// Opening frame stroke width as a fraction of the wall width.
    pub frame_width_fraction: f32,
    /// Frame inset from each end as a fraction of the opening length.
    pub frame_inset_fraction: f32,
    /// Door arc radius as a fraction of the door width.
    pub door_arc_fraction: f32,
    /// Largest door arc radius in world units.
    pub max_arc_radius: f32,
}

impl Default for StrokeConfig {
    fn default() -> Self {
        Self {
            base_wall_width: 8.0,
            min_wall_width: 3.0,
            frame_width_fraction: 0.25,
            frame_inset_fraction: 0.10,
            door_arc_fraction: 0.85,
            max_arc_radius: 1.2,
        }
    }
}

impl StrokeConfig {
    /// Check that widths and fractions are usable.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::InvalidConfig`] for non-positive widths or a
    /// frame inset of half the opening or more.
    pub fn validate(&self) -> PlanResult<()> {
        if !(self.base_wall_width > 0.0 && self.min_wall_width > 0.0) {
            return Err(PlanError::InvalidConfig(
                "wall stroke widths must be positive".to_string(),
            ));
        }
        if !(0.0..0.5).contains(&self.frame_inset_fraction) {
            return Err(PlanError::InvalidConfig(format!(
                "frame inset must be in [0, 0.5), got {}",
                self.frame_inset_fraction
            )));
        }
        if !(self.max_arc_radius > 0.0 && self.door_arc_fraction > 0.0) {
            return Err(PlanError::InvalidConfig(
                "door arc proportions must be positive".to_string(),
            ));
        }
        Ok(())
    }
}

/// Screen-space endpoints `(start, end)` of a surface under `view`.
#[must_use]
pub fn project_endpoints(surface: &Surface, view: &ViewportState) -> (Vec2, Vec2) {
    let (start, end) = surface.plan_endpoints();
    (view.to_screen(start), view.to_screen(end))
}

/// Screen-space segment of a surface under `view`.
#[must_use]
pub fn project_segment(surface: &Surface, view: &ViewportState) -> Segment {
    let (start, end) = project_endpoints(surface, view);
    Segment::new(start, end)
}

/// Plan-space segment of a surface.
#[must_use]
pub fn plan_segment(surface: &Surface) -> Segment {
    let (start, end) = surface.plan_endpoints();
    Segment::new(start, end)
}

/// Wall stroke width in fit-scale pixels.
///
/// Dividing by the zoom ratio keeps the on-screen width constant; the
/// floor stops the stroke from vanishing once it would drop below
/// `min_wall_width`.
#[must_use]
pub fn wall_stroke_width(config: &StrokeConfig, zoom_ratio: f32) -> f32 {
    let ratio = if zoom_ratio.is_finite() && zoom_ratio > 0.0 {
        zoom_ratio
    } else {
        1.0
    };
    (config.base_wall_width / ratio).max(config.min_wall_width)
}

/// Geometry of a door or window cut into a wall, in plan space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OpeningShape {
    /// Full opening segment, erased from the wall beneath.
    pub gap: Segment,
    /// The two frame lines on either face of the wall, inset from the ends.
    pub frames: [Segment; 2],
    /// Frame-start endpoint on the center line (the door hinge).
    pub hinge: Vec2,
}

/// Build the opening shape of `surface` with frame lines `half_thickness`
/// plan units either side of its center line.
#[must_use]
pub fn opening_shape(surface: &Surface, config: &StrokeConfig, half_thickness: f32) -> OpeningShape {
    let gap = plan_segment(surface);
    let inset = config.frame_inset_fraction;
    let inner = Segment::new(gap.point_at(inset), gap.point_at(1.0 - inset));
    let normal = gap.direction().perpendicular() * half_thickness;

    OpeningShape {
        gap,
        frames: [inner.translated(normal), inner.translated(-normal)],
        hinge: inner.start,
    }
}

/// A circular arc in plan space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Arc {
    /// Arc center.
    pub center: Vec2,
    /// Radius in plan units.
    pub radius: f32,
    /// Start angle in radians.
    pub start_angle: f32,
    /// Signed sweep in radians.
    pub sweep: f32,
}

impl Arc {
    /// Point on the arc at parameter `t` (0 = start, 1 = end).
    #[must_use]
    pub fn point_at(&self, t: f32) -> Vec2 {
        let angle = self.sweep.mul_add(t, self.start_angle);
        self.center + Vec2::new(angle.cos(), angle.sin()) * self.radius
    }

    /// First point of the arc.
    #[must_use]
    pub fn start_point(&self) -> Vec2 {
        self.point_at(0.0)
    }

    /// Last point of the arc.
    #[must_use]
    pub fn end_point(&self) -> Vec2 {
        self.point_at(1.0)
    }
}

/// The quarter-circle door swing, centered on the hinge.
///
/// The sweep is always a quarter turn counter to the segment direction;
/// the side it opens toward is a fixed convention, not derived from the
/// room interior.
#[must_use]
pub fn door_arc(surface: &Surface, config: &StrokeConfig) -> Arc {
    let shape = opening_shape(surface, config, 0.0);
    Arc {
        center: shape.hinge,
        radius: (surface.width() * config.door_arc_fraction).min(config.max_arc_radius),
        start_angle: shape.gap.angle(),
        sweep: -FRAC_PI_2,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Vec3;
    use crate::SurfaceKind;

    fn door(width: f32, yaw: f32) -> Surface {
        Surface::new(
            SurfaceKind::Door,
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(width, 2.0, 0.2),
            yaw,
        )
        .expect("door")
    }

    #[test]
    fn test_project_endpoints_identity() {
        let wall = Surface::new(
            SurfaceKind::Wall,
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(4.0, 0.0, 0.2),
            0.0,
        )
        .expect("wall");
        let (start, end) = project_endpoints(&wall, &ViewportState::identity());
        assert_eq!(start, Vec2::new(-2.0, 0.0));
        assert_eq!(end, Vec2::new(2.0, 0.0));
    }

    #[test]
    fn test_project_endpoints_scaled_and_translated() {
        let wall = Surface::wall(1.0, 1.0, 2.0, 0.0).expect("wall");
        let view = ViewportState {
            scale: 10.0,
            translation: Vec2::new(100.0, 50.0),
            rotation: 0.0,
            initial_scale: 10.0,
        };
        let (start, end) = project_endpoints(&wall, &view);
        assert!(start.distance(Vec2::new(100.0, 60.0)) < 1e-4);
        assert!(end.distance(Vec2::new(120.0, 60.0)) < 1e-4);
    }

    #[test]
    fn test_wall_stroke_width() {
        let config = StrokeConfig::default();
        assert!((wall_stroke_width(&config, 1.0) - 8.0).abs() < f32::EPSILON);
        assert!((wall_stroke_width(&config, 0.5) - 16.0).abs() < f32::EPSILON);
        assert!((wall_stroke_width(&config, 8.0) - 3.0).abs() < f32::EPSILON);
        assert!((wall_stroke_width(&config, f32::NAN) - 8.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_opening_frames_are_inset_and_offset() {
        let config = StrokeConfig::default();
        let shape = opening_shape(&door(1.0, 0.0), &config, 0.1);
        assert!(shape.gap.start.distance(Vec2::new(-0.5, 0.0)) < 1e-5);
        assert!(shape.hinge.distance(Vec2::new(-0.4, 0.0)) < 1e-5);

        let [a, b] = shape.frames;
        assert!((a.length() - 0.8).abs() < 1e-5);
        assert!((b.length() - 0.8).abs() < 1e-5);
        assert!((a.start.y - 0.1).abs() < 1e-5);
        assert!((b.start.y + 0.1).abs() < 1e-5);
    }

    #[test]
    fn test_door_arc_radius_is_capped() {
        let config = StrokeConfig::default();
        let small = door_arc(&door(1.0, 0.0), &config);
        assert!((small.radius - 0.85).abs() < 1e-5);
        let large = door_arc(&door(2.0, 0.0), &config);
        assert!((large.radius - 1.2).abs() < 1e-5);
    }

    #[test]
    fn test_door_arc_sweeps_quarter_turn() {
        let arc = door_arc(&door(1.0, 0.0), &StrokeConfig::default());
        assert!(arc.start_angle.abs() < 1e-5);
        assert!((arc.sweep + FRAC_PI_2).abs() < 1e-6);
        let start = arc.start_point();
        let end = arc.end_point();
        assert!(start.distance(Vec2::new(-0.4 + 0.85, 0.0)) < 1e-5);
        assert!(end.distance(Vec2::new(-0.4, -0.85)) < 1e-5);
    }

    #[test]
    fn test_stroke_config_validation() {
        assert!(StrokeConfig::default().validate().is_ok());
        let bad = StrokeConfig {
            frame_inset_fraction: 0.5,
            ..StrokeConfig::default()
        };
        assert!(bad.validate().is_err());
    }
}
