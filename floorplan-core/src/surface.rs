//! Architectural surfaces - the immutable input of a floor plan.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geometry::{wrap_angle, Vec2, Vec3};
use crate::{PlanError, PlanResult};

/// Unique identifier for a surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SurfaceId(Uuid);

impl SurfaceId {
    /// Create a new unique surface ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create from an existing UUID, such as the capture's own identifier.
    #[must_use]
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// The underlying UUID.
    #[must_use]
    pub fn as_uuid(&self) -> Uuid {
        self.0
    }
}

impl Default for SurfaceId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for SurfaceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// The kind of architectural element a surface represents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SurfaceKind {
    /// A solid wall.
    Wall,
    /// A door opening with a swing.
    Door,
    /// A window opening.
    Window,
}

impl SurfaceKind {
    /// All kinds in layer order.
    pub const ALL: [Self; 3] = [Self::Wall, Self::Door, Self::Window];

    /// Whether this kind cuts a gap into the wall beneath it.
    #[must_use]
    pub const fn is_opening(self) -> bool {
        matches!(self, Self::Door | Self::Window)
    }
}

impl std::fmt::Display for SurfaceKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Wall => "wall",
            Self::Door => "door",
            Self::Window => "window",
        };
        f.write_str(name)
    }
}

/// One wall, door or window, as delivered by the room capture.
///
/// `dimensions.x` is the along-wall width and `dimensions.z` the thickness.
/// The yaw is wrapped to `[0, 2π)` at construction.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Surface {
    id: SurfaceId,
    kind: SurfaceKind,
    position: Vec3,
    dimensions: Vec3,
    rotation_yaw: f32,
}

impl Surface {
    /// Create a validated surface with a fresh ID.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::InvalidSurface`] if any component is NaN or
    /// infinite, or if any dimension is negative.
    pub fn new(
        kind: SurfaceKind,
        position: Vec3,
        dimensions: Vec3,
        rotation_yaw: f32,
    ) -> PlanResult<Self> {
        Self::with_id(SurfaceId::new(), kind, position, dimensions, rotation_yaw)
    }

    /// Create a validated surface with the given ID.
    ///
    /// # Errors
    ///
    /// Same as [`Surface::new`].
    pub fn with_id(
        id: SurfaceId,
        kind: SurfaceKind,
        position: Vec3,
        dimensions: Vec3,
        rotation_yaw: f32,
    ) -> PlanResult<Self> {
        if !position.is_finite() {
            return Err(PlanError::invalid_surface(format!(
                "{kind} position is not finite: {position:?}"
            )));
        }
        if !dimensions.is_finite() {
            return Err(PlanError::invalid_surface(format!(
                "{kind} dimensions are not finite: {dimensions:?}"
            )));
        }
        if dimensions.x < 0.0 || dimensions.y < 0.0 || dimensions.z < 0.0 {
            return Err(PlanError::invalid_surface(format!(
                "{kind} has negative dimensions: {dimensions:?}"
            )));
        }
        if !rotation_yaw.is_finite() {
            return Err(PlanError::invalid_surface(format!(
                "{kind} rotation is not finite: {rotation_yaw}"
            )));
        }

        Ok(Self {
            id,
            kind,
            position,
            dimensions,
            rotation_yaw: wrap_angle(rotation_yaw),
        })
    }

    /// Shorthand for a wall of the given width centered at `(x, z)`.
    ///
    /// # Errors
    ///
    /// Same as [`Surface::new`].
    pub fn wall(x: f32, z: f32, width: f32, yaw: f32) -> PlanResult<Self> {
        Self::new(
            SurfaceKind::Wall,
            Vec3::new(x, 0.0, z),
            Vec3::new(width, 2.5, 0.2),
            yaw,
        )
    }

    /// Surface ID.
    #[must_use]
    pub fn id(&self) -> SurfaceId {
        self.id
    }

    /// Surface kind.
    #[must_use]
    pub fn kind(&self) -> SurfaceKind {
        self.kind
    }

    /// 3D center position.
    #[must_use]
    pub fn position(&self) -> Vec3 {
        self.position
    }

    /// 3D extent.
    #[must_use]
    pub fn dimensions(&self) -> Vec3 {
        self.dimensions
    }

    /// Yaw in `[0, 2π)`.
    #[must_use]
    pub fn rotation_yaw(&self) -> f32 {
        self.rotation_yaw
    }

    /// Along-wall width in world units.
    #[must_use]
    pub fn width(&self) -> f32 {
        self.dimensions.x
    }

    /// Center in plan space.
    #[must_use]
    pub fn plan_center(&self) -> Vec2 {
        self.position.to_plan()
    }

    /// Half of the segment, from center to end, in plan space.
    ///
    /// The 3D x axis rotated by the yaw about the vertical axis is
    /// `(cos, 0, -sin)`; dropping `y` gives the plan direction.
    #[must_use]
    pub fn plan_half_vector(&self) -> Vec2 {
        let (sin, cos) = self.rotation_yaw.sin_cos();
        Vec2::new(cos, -sin) * (self.dimensions.x * 0.5)
    }

    /// Unscaled endpoints `(start, end)` in plan space.
    #[must_use]
    pub fn plan_endpoints(&self) -> (Vec2, Vec2) {
        let center = self.plan_center();
        let half = self.plan_half_vector();
        (center - half, center + half)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    #[test]
    fn test_rejects_negative_dimensions() {
        let result = Surface::new(
            SurfaceKind::Wall,
            Vec3::zero(),
            Vec3::new(-1.0, 2.0, 0.2),
            0.0,
        );
        assert!(matches!(result, Err(PlanError::InvalidSurface { .. })));
    }

    #[test]
    fn test_rejects_nan_rotation() {
        let result = Surface::new(SurfaceKind::Door, Vec3::zero(), Vec3::new(1.0, 2.0, 0.1), f32::NAN);
        assert!(result.is_err());
    }

    #[test]
    fn test_rejects_infinite_position() {
        let result = Surface::new(
            SurfaceKind::Window,
            Vec3::new(f32::INFINITY, 0.0, 0.0),
            Vec3::new(1.0, 1.0, 0.1),
            0.0,
        );
        assert!(result.is_err());
    }

    #[test]
    fn test_yaw_is_wrapped() {
        let wall = Surface::wall(0.0, 0.0, 2.0, -FRAC_PI_2).expect("valid wall");
        assert!((wall.rotation_yaw() - 3.0 * FRAC_PI_2).abs() < 1e-5);
    }

    #[test]
    fn test_plan_endpoints_axis_aligned() {
        let wall = Surface::new(
            SurfaceKind::Wall,
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(4.0, 0.0, 0.2),
            0.0,
        )
        .expect("valid wall");
        let (start, end) = wall.plan_endpoints();
        assert_eq!(start, Vec2::new(-2.0, 0.0));
        assert_eq!(end, Vec2::new(2.0, 0.0));
    }

    #[test]
    fn test_plan_endpoints_quarter_turn() {
        let wall = Surface::wall(1.0, 1.0, 2.0, FRAC_PI_2).expect("valid wall");
        let (start, end) = wall.plan_endpoints();
        assert!((start.x - 1.0).abs() < 1e-5 && (start.y - 2.0).abs() < 1e-5);
        assert!((end.x - 1.0).abs() < 1e-5 && end.y.abs() < 1e-5);
    }

    #[test]
    fn test_zero_width_is_accepted() {
        let surface = Surface::new(SurfaceKind::Wall, Vec3::zero(), Vec3::zero(), 0.0);
        assert!(surface.is_ok());
    }
}
