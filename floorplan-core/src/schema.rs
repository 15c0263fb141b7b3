//! Serialized forms of capture results and viewport snapshots.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geometry::{Vec2, Vec3};
use crate::viewport::{ViewportController, ViewportPhase, ViewportState};
use crate::{PlanError, PlanResult, Surface, SurfaceId, SurfaceKind};

/// One surface as delivered by the room-capture collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurfaceRecord {
    /// Capture identifier, if the collaborator assigned one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub identifier: Option<Uuid>,
    /// 3D center.
    pub position: Vec3,
    /// 3D extent; `x` is the along-wall width, `z` the thickness.
    pub dimensions: Vec3,
    /// Rotation about the vertical axis, in radians.
    #[serde(default)]
    pub rotation_yaw: f32,
}

impl SurfaceRecord {
    /// Validate into a [`Surface`] of the given kind.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::InvalidSurface`] when the record has
    /// non-finite values or negative dimensions.
    pub fn into_surface(self, kind: SurfaceKind) -> PlanResult<Surface> {
        let id = self.identifier.map_or_else(SurfaceId::new, SurfaceId::from_uuid);
        Surface::with_id(id, kind, self.position, self.dimensions, self.rotation_yaw)
    }
}

impl From<&Surface> for SurfaceRecord {
    fn from(surface: &Surface) -> Self {
        Self {
            identifier: Some(surface.id().as_uuid()),
            position: surface.position(),
            dimensions: surface.dimensions(),
            rotation_yaw: surface.rotation_yaw(),
        }
    }
}

/// A completed capture, partitioned by kind.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CaptureDocument {
    /// Wall records.
    #[serde(default)]
    pub walls: Vec<SurfaceRecord>,
    /// Door records.
    #[serde(default)]
    pub doors: Vec<SurfaceRecord>,
    /// Window records.
    #[serde(default)]
    pub windows: Vec<SurfaceRecord>,
}

impl CaptureDocument {
    /// Parse a capture document from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed.
    pub fn from_json(json: &str) -> PlanResult<Self> {
        serde_json::from_str(json).map_err(PlanError::Serialization)
    }

    /// Serialize to JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization fails.
    pub fn to_json(&self) -> PlanResult<String> {
        serde_json::to_string_pretty(self).map_err(PlanError::Serialization)
    }

    /// Records paired with their kind, walls first.
    pub fn records(&self) -> impl Iterator<Item = (SurfaceKind, &SurfaceRecord)> {
        self.walls
            .iter()
            .map(|record| (SurfaceKind::Wall, record))
            .chain(self.doors.iter().map(|record| (SurfaceKind::Door, record)))
            .chain(self.windows.iter().map(|record| (SurfaceKind::Window, record)))
    }

    /// Total record count.
    #[must_use]
    pub fn len(&self) -> usize {
        self.walls.len() + self.doors.len() + self.windows.len()
    }

    /// Whether the capture has no records.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Snapshot of a viewport, for hosts that log or persist view state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportDocument {
    /// Width in pixels.
    pub width: f32,
    /// Height in pixels.
    pub height: f32,
    /// Presented transform.
    pub state: ViewportState,
    /// Presented zoom ratio.
    pub zoom_ratio: f32,
    /// Interaction phase.
    pub phase: ViewportPhase,
}

impl From<&ViewportController> for ViewportDocument {
    fn from(controller: &ViewportController) -> Self {
        let Vec2 { x: width, y: height } = controller.viewport_size();
        let state = controller.presented();
        Self {
            width,
            height,
            state,
            zoom_ratio: state.zoom_ratio(),
            phase: controller.phase(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CAPTURE: &str = r#"{
        "walls": [
            {"identifier": "6f1c1a7e-3a53-4a8e-9d25-1f0b5f0c2d11",
             "position": {"x": 0.0, "y": 1.2, "z": -2.0},
             "dimensions": {"x": 4.0, "y": 2.4, "z": 0.2},
             "rotation_yaw": 0.0}
        ],
        "doors": [
            {"position": {"x": 0.5, "y": 1.0, "z": -2.0},
             "dimensions": {"x": 0.9, "y": 2.0, "z": 0.1}}
        ]
    }"#;

    #[test]
    fn test_parse_capture() {
        let doc = CaptureDocument::from_json(CAPTURE).expect("parse");
        assert_eq!(doc.len(), 2);
        assert!(doc.windows.is_empty());

        let kinds: Vec<_> = doc.records().map(|(kind, _)| kind).collect();
        assert_eq!(kinds, vec![SurfaceKind::Wall, SurfaceKind::Door]);

        let wall = doc.walls[0].clone().into_surface(SurfaceKind::Wall).expect("wall");
        assert_eq!(
            wall.id().to_string(),
            "6f1c1a7e-3a53-4a8e-9d25-1f0b5f0c2d11"
        );
    }

    #[test]
    fn test_malformed_json() {
        assert!(matches!(
            CaptureDocument::from_json("{\"walls\": 3}"),
            Err(PlanError::Serialization(_))
        ));
    }

    #[test]
    fn test_record_round_trip() {
        let wall = Surface::wall(1.0, 2.0, 3.0, 0.5).expect("wall");
        let record = SurfaceRecord::from(&wall);
        let back = record.into_surface(SurfaceKind::Wall).expect("valid");
        assert_eq!(back, wall);
    }
}
