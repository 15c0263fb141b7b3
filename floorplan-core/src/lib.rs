//! # Floorplan Core
//!
//! Plan-view projection and interaction state for captured rooms.
//! Backend agnostic: everything here is pure data and math.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │               floorplan-core                │
//! ├─────────────────────────────────────────────┤
//! │  Scene           │  Viewport                │
//! │  - Surfaces      │  - Fit / zoom limits     │
//! │  - Bounds        │  - Gestures, transitions │
//! │  - Ingestion     │  - Model vs. presented   │
//! ├─────────────────────────────────────────────┤
//! │  Projector       │  Labels                  │
//! │  - Segments      │  - Metric / imperial     │
//! │  - Openings      │  - Size and orientation  │
//! └─────────────────────────────────────────────┘
//! ```

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod bounds;
pub mod config;
pub mod error;
pub mod event;
pub mod geometry;
pub mod labels;
pub mod projector;
pub mod scene;
pub mod schema;
pub mod settings;
pub mod state;
pub mod surface;
pub mod transition;
pub mod viewport;

pub use bounds::{compute_bounds, fit_scale, raw_bounds, FALLBACK_BOUNDS};
pub use config::ViewerConfig;
pub use error::{PlanError, PlanResult};
pub use event::{Gesture, GesturePhase, InputEvent, ViewCommand};
pub use geometry::{Aabb2, Segment, Vec2, Vec3};
pub use labels::{format_length, labels_for, LabelConfig, MeasurementLabel, Orientation, UnitSystem};
pub use projector::{
    door_arc, opening_shape, project_endpoints, project_segment, wall_stroke_width, Arc,
    OpeningShape, StrokeConfig,
};
pub use scene::{IngestReport, RejectedRecord, RoomScene};
pub use schema::{CaptureDocument, SurfaceRecord, ViewportDocument};
pub use settings::DisplaySettings;
pub use state::{EventOutcome, ViewerState};
pub use surface::{Surface, SurfaceId, SurfaceKind};
pub use transition::{ease_in_out, Transition};
pub use viewport::{
    ActiveGestures, GestureKind, ViewportConfig, ViewportController, ViewportPhase, ViewportState,
};

/// Floorplan core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
