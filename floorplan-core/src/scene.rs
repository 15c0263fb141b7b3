//! The room scene built from one completed capture.

use serde::Serialize;

use crate::bounds::compute_bounds;
use crate::geometry::{Aabb2, Vec2};
use crate::projector::project_segment;
use crate::schema::CaptureDocument;
use crate::viewport::ViewportState;
use crate::{PlanError, PlanResult, Surface, SurfaceId, SurfaceKind};

/// A record rejected at ingestion.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RejectedRecord {
    /// Kind the record was listed under.
    pub kind: SurfaceKind,
    /// Index within that kind's list.
    pub index: usize,
    /// Why it was rejected.
    pub reason: String,
}

/// Outcome of ingesting a capture document.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct IngestReport {
    /// Number of surfaces accepted.
    pub accepted: usize,
    /// Records that failed validation.
    pub rejected: Vec<RejectedRecord>,
}

impl IngestReport {
    /// Whether every record was accepted.
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.rejected.is_empty()
    }
}

/// An immutable set of surfaces with cached, padded plan bounds.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RoomScene {
    surfaces: Vec<Surface>,
    bounds: Aabb2,
}

impl RoomScene {
    /// Build a scene from validated surfaces.
    #[must_use]
    pub fn new(surfaces: Vec<Surface>) -> Self {
        let bounds = compute_bounds(&surfaces);
        Self { surfaces, bounds }
    }

    /// A scene with no surfaces.
    #[must_use]
    pub fn empty() -> Self {
        Self::new(Vec::new())
    }

    /// Ingest a capture document, skipping records that fail validation.
    #[must_use]
    pub fn from_capture(document: &CaptureDocument) -> (Self, IngestReport) {
        let mut surfaces = Vec::with_capacity(document.len());
        let mut report = IngestReport::default();
        let mut counters = [0usize; 3];

        for (kind, record) in document.records() {
            let slot = SurfaceKind::ALL
                .iter()
                .position(|k| *k == kind)
                .unwrap_or_default();
            let index = counters[slot];
            counters[slot] += 1;

            match record.clone().into_surface(kind) {
                Ok(surface) => surfaces.push(surface),
                Err(err) => {
                    tracing::warn!("Rejected {kind} record {index}: {err}");
                    report.rejected.push(RejectedRecord {
                        kind,
                        index,
                        reason: err.to_string(),
                    });
                }
            }
        }

        report.accepted = surfaces.len();
        let scene = Self::new(surfaces);
        tracing::info!(
            "Loaded floor plan: {} walls, {} doors, {} windows ({} rejected)",
            scene.count(SurfaceKind::Wall),
            scene.count(SurfaceKind::Door),
            scene.count(SurfaceKind::Window),
            report.rejected.len()
        );
        (scene, report)
    }

    /// Parse and ingest a capture document from JSON.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed. Invalid records inside a
    /// well-formed document are reported, not raised.
    pub fn from_json(json: &str) -> PlanResult<(Self, IngestReport)> {
        let document = CaptureDocument::from_json(json)?;
        Ok(Self::from_capture(&document))
    }

    /// All surfaces in ingestion order.
    #[must_use]
    pub fn surfaces(&self) -> &[Surface] {
        &self.surfaces
    }

    /// Surfaces of one kind.
    pub fn surfaces_of(&self, kind: SurfaceKind) -> impl Iterator<Item = &Surface> {
        self.surfaces.iter().filter(move |s| s.kind() == kind)
    }

    /// Walls.
    pub fn walls(&self) -> impl Iterator<Item = &Surface> {
        self.surfaces_of(SurfaceKind::Wall)
    }

    /// Doors.
    pub fn doors(&self) -> impl Iterator<Item = &Surface> {
        self.surfaces_of(SurfaceKind::Door)
    }

    /// Windows.
    pub fn windows(&self) -> impl Iterator<Item = &Surface> {
        self.surfaces_of(SurfaceKind::Window)
    }

    /// Number of surfaces of one kind.
    #[must_use]
    pub fn count(&self, kind: SurfaceKind) -> usize {
        self.surfaces_of(kind).count()
    }

    /// Look up a surface by ID.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::UnknownSurface`] if no surface has this ID.
    pub fn surface(&self, id: SurfaceId) -> PlanResult<&Surface> {
        self.surfaces
            .iter()
            .find(|s| s.id() == id)
            .ok_or_else(|| PlanError::UnknownSurface(id.to_string()))
    }

    /// Padded plan bounds.
    #[must_use]
    pub fn bounds(&self) -> Aabb2 {
        self.bounds
    }

    /// Number of surfaces.
    #[must_use]
    pub fn len(&self) -> usize {
        self.surfaces.len()
    }

    /// Whether the scene has no surfaces.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.surfaces.is_empty()
    }

    /// Find the surface nearest to a screen point, within `tolerance` pixels.
    ///
    /// Openings win over the wall they sit in: windows, then doors, then
    /// walls are tried in turn.
    #[must_use]
    pub fn surface_at(&self, point: Vec2, view: &ViewportState, tolerance: f32) -> Option<SurfaceId> {
        [SurfaceKind::Window, SurfaceKind::Door, SurfaceKind::Wall]
            .into_iter()
            .find_map(|kind| {
                self.surfaces_of(kind)
                    .map(|s| (s.id(), project_segment(s, view).distance_to(point)))
                    .filter(|(_, distance)| *distance <= tolerance)
                    .min_by(|a, b| a.1.total_cmp(&b.1))
                    .map(|(id, _)| id)
            })
    }
}

impl Default for RoomScene {
    fn default() -> Self {
        Self::empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Vec3;
    use crate::schema::SurfaceRecord;

    fn record(x: f32, z: f32, width: f32) -> SurfaceRecord {
        SurfaceRecord {
            identifier: None,
            position: Vec3::new(x, 0.0, z),
            dimensions: Vec3::new(width, 2.4, 0.2),
            rotation_yaw: 0.0,
        }
    }

    #[test]
    fn test_from_capture_rejects_bad_records() {
        let document = CaptureDocument {
            walls: vec![record(0.0, -2.0, 4.0), record(0.0, 2.0, -4.0), record(0.0, 2.0, 4.0)],
            doors: vec![record(0.5, -2.0, 0.9)],
            windows: Vec::new(),
        };
        let (scene, report) = RoomScene::from_capture(&document);
        assert_eq!(scene.len(), 3);
        assert_eq!(report.accepted, 3);
        assert_eq!(report.rejected.len(), 1);
        assert_eq!(report.rejected[0].kind, SurfaceKind::Wall);
        assert_eq!(report.rejected[0].index, 1);
        assert!(!report.is_clean());
        assert_eq!(scene.count(SurfaceKind::Wall), 2);
        assert_eq!(scene.doors().count(), 1);
    }

    #[test]
    fn test_empty_scene_has_fallback_bounds() {
        let scene = RoomScene::empty();
        assert!(scene.is_empty());
        assert!((scene.bounds().width() - 5.2).abs() < 1e-4);
    }

    #[test]
    fn test_surface_lookup() {
        let wall = Surface::wall(0.0, 0.0, 2.0, 0.0).expect("wall");
        let id = wall.id();
        let scene = RoomScene::new(vec![wall]);
        assert!(scene.surface(id).is_ok());
        assert!(matches!(
            scene.surface(SurfaceId::new()),
            Err(PlanError::UnknownSurface(_))
        ));
    }

    #[test]
    fn test_surface_at_prefers_openings() {
        let wall = Surface::wall(0.0, 0.0, 4.0, 0.0).expect("wall");
        let door = Surface::new(
            SurfaceKind::Door,
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.9, 2.0, 0.2),
            0.0,
        )
        .expect("door");
        let (wall_id, door_id) = (wall.id(), door.id());
        let scene = RoomScene::new(vec![wall, door]);
        let view = ViewportState {
            scale: 100.0,
            translation: Vec2::new(400.0, 300.0),
            rotation: 0.0,
            initial_scale: 100.0,
        };

        assert_eq!(scene.surface_at(Vec2::new(500.0, 303.0), &view, 6.0), Some(door_id));
        assert_eq!(scene.surface_at(Vec2::new(250.0, 303.0), &view, 6.0), Some(wall_id));
        assert_eq!(scene.surface_at(Vec2::new(250.0, 350.0), &view, 6.0), None);
    }
}
