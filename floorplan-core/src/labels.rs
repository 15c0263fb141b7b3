//! Measurement labels for walls and doors.
//!
//! Every decision is local to one edge: an edge is labelled when it is long
//! enough in world units to be a real surface and long enough on screen to
//! hold its text. Font size follows a square-root law in the zoom ratio.

use std::f32::consts::FRAC_PI_4;

use serde::{Deserialize, Serialize};

use crate::geometry::Vec2;
use crate::projector::project_segment;
use crate::viewport::ViewportState;
use crate::{PlanError, PlanResult, Surface, SurfaceId, SurfaceKind};

/// Inches per meter.
pub const INCHES_PER_METER: f64 = 39.3701;

/// Unit system for measurement text.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum UnitSystem {
    /// Meters with one decimal.
    #[default]
    Metric,
    /// Feet and inches.
    Imperial,
}

impl UnitSystem {
    /// The other unit system.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::Metric => Self::Imperial,
            Self::Imperial => Self::Metric,
        }
    }
}

/// Reading direction of a label.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Orientation {
    /// Text runs left to right.
    Horizontal,
    /// Text runs bottom to top.
    Vertical,
}

impl Orientation {
    /// Classify a screen-space edge angle: within 45° of horizontal reads
    /// horizontally.
    #[must_use]
    pub fn from_angle(angle: f32) -> Self {
        let folded = angle.abs();
        // fold (-π, π] onto the distance from the horizontal axis
        let from_horizontal = folded.min(std::f32::consts::PI - folded);
        if from_horizontal <= FRAC_PI_4 {
            Self::Horizontal
        } else {
            Self::Vertical
        }
    }

    /// Rotation to apply when drawing text with this orientation.
    #[must_use]
    pub fn text_rotation(self) -> f32 {
        match self {
            Self::Horizontal => 0.0,
            Self::Vertical => -std::f32::consts::FRAC_PI_2,
        }
    }
}

/// Typography and clutter thresholds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LabelConfig {
    /// Font size at zoom ratio 1.
    pub base_font_size: f32,
    /// Smallest font size.
    pub min_font_size: f32,
    /// Largest font size.
    pub max_font_size: f32,
    /// Edges shorter than this in world units are noise.
    pub min_world_length: f32,
    /// An edge needs this many font sizes of screen length to be labelled.
    pub min_length_factor: f32,
    /// Offset of the halo duplicates in screen pixels.
    pub halo_offset: f32,
    /// Whether windows are labelled too.
    pub include_windows: bool,
}

impl Default for LabelConfig {
    fn default() -> Self {
        Self {
            base_font_size: 12.0,
            min_font_size: 8.0,
            max_font_size: 14.0,
            min_world_length: 0.1,
            min_length_factor: 3.5,
            halo_offset: 1.0,
            include_windows: false,
        }
    }
}

impl LabelConfig {
    /// Check that font sizes are positive and ordered.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::InvalidConfig`] for non-positive or inverted
    /// font sizes.
    pub fn validate(&self) -> PlanResult<()> {
        if !(self.min_font_size > 0.0
            && self.min_font_size <= self.max_font_size
            && self.base_font_size > 0.0)
        {
            return Err(PlanError::InvalidConfig(format!(
                "font sizes must satisfy 0 < min <= max and base > 0, got base {} range {}..{}",
                self.base_font_size, self.min_font_size, self.max_font_size
            )));
        }
        Ok(())
    }

    /// Font size for a zoom ratio.
    #[must_use]
    pub fn font_size(&self, zoom_ratio: f32) -> f32 {
        let ratio = if zoom_ratio.is_finite() && zoom_ratio > 0.0 {
            zoom_ratio
        } else {
            1.0
        };
        (self.base_font_size * ratio.sqrt()).clamp(self.min_font_size, self.max_font_size)
    }

    /// Whether a kind of surface gets a measurement.
    #[must_use]
    pub fn measures(&self, kind: SurfaceKind) -> bool {
        match kind {
            SurfaceKind::Wall | SurfaceKind::Door => true,
            SurfaceKind::Window => self.include_windows,
        }
    }
}

/// One measurement to draw in the screen-space overlay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeasurementLabel {
    /// Surface being measured.
    pub surface: SurfaceId,
    /// Screen-space anchor (the edge midpoint).
    pub anchor: Vec2,
    /// Formatted length.
    pub text: String,
    /// Font size in pixels.
    pub font_size: f32,
    /// Reading direction.
    pub orientation: Orientation,
    /// Measured length in world units.
    pub world_length: f32,
}

impl MeasurementLabel {
    /// Screen-space positions of the halo duplicates drawn behind the text.
    #[must_use]
    pub fn halo_positions(&self, offset: f32) -> [Vec2; 4] {
        [
            self.anchor + Vec2::new(-offset, 0.0),
            self.anchor + Vec2::new(offset, 0.0),
            self.anchor + Vec2::new(0.0, -offset),
            self.anchor + Vec2::new(0.0, offset),
        ]
    }
}

/// Format a length in meters for the given unit system.
///
/// Imperial lengths round to the nearest inch and omit the feet when zero.
#[must_use]
pub fn format_length(meters: f32, units: UnitSystem) -> String {
    match units {
        UnitSystem::Metric => format!("{meters:.1}m"),
        UnitSystem::Imperial => {
            #[allow(clippy::cast_possible_truncation)]
            let total_inches = (f64::from(meters) * INCHES_PER_METER).round() as i64;
            let feet = total_inches / 12;
            let inches = total_inches % 12;
            if feet == 0 {
                format!("{inches}\"")
            } else {
                format!("{feet}' {inches}\"")
            }
        }
    }
}

/// Label one surface, or `None` when it is filtered out.
#[must_use]
pub fn label_for(
    surface: &Surface,
    view: &ViewportState,
    units: UnitSystem,
    config: &LabelConfig,
) -> Option<MeasurementLabel> {
    if !config.measures(surface.kind()) {
        return None;
    }

    let segment = project_segment(surface, view);
    let screen_length = segment.length();
    let world_length = screen_length / view.scale;
    if !world_length.is_finite() || world_length < config.min_world_length {
        return None;
    }

    let font_size = config.font_size(view.zoom_ratio());
    if screen_length < font_size * config.min_length_factor {
        return None;
    }

    Some(MeasurementLabel {
        surface: surface.id(),
        anchor: segment.midpoint(),
        text: format_length(world_length, units),
        font_size,
        orientation: Orientation::from_angle(segment.angle()),
        world_length,
    })
}

/// Labels for every eligible surface, in scene order.
#[must_use]
pub fn labels_for(
    surfaces: &[Surface],
    view: &ViewportState,
    units: UnitSystem,
    config: &LabelConfig,
) -> Vec<MeasurementLabel> {
    let labels: Vec<_> = surfaces
        .iter()
        .filter_map(|surface| label_for(surface, view, units, config))
        .collect();
    tracing::trace!(
        "{} of {} surfaces labelled at zoom {:.2}",
        labels.len(),
        surfaces.len(),
        view.zoom_ratio()
    );
    labels
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::Vec3;
    use std::f32::consts::FRAC_PI_2;

    fn view(scale: f32, initial_scale: f32) -> ViewportState {
        ViewportState {
            scale,
            translation: Vec2::new(400.0, 300.0),
            rotation: 0.0,
            initial_scale,
        }
    }

    #[test]
    fn test_metric_format() {
        assert_eq!(format_length(3.0, UnitSystem::Metric), "3.0m");
        assert_eq!(format_length(2.46, UnitSystem::Metric), "2.5m");
    }

    #[test]
    fn test_imperial_format() {
        assert_eq!(format_length(1.524, UnitSystem::Imperial), "5' 0\"");
        assert_eq!(format_length(0.254, UnitSystem::Imperial), "10\"");
        assert_eq!(format_length(3.0, UnitSystem::Imperial), "9' 10\"");
        // 11.9 inches rounds up to a full foot
        assert_eq!(format_length(0.3023, UnitSystem::Imperial), "1' 0\"");
    }

    #[test]
    fn test_font_size_square_root_law() {
        let config = LabelConfig::default();
        assert!((config.font_size(1.0) - 12.0).abs() < f32::EPSILON);
        assert!((config.font_size(4.0) - 14.0).abs() < f32::EPSILON);
        assert!((config.font_size(0.25) - 8.0).abs() < f32::EPSILON);
        assert!((config.font_size(0.64) - 9.6).abs() < 1e-4);
    }

    #[test]
    fn test_orientation() {
        assert_eq!(Orientation::from_angle(0.0), Orientation::Horizontal);
        assert_eq!(Orientation::from_angle(std::f32::consts::PI), Orientation::Horizontal);
        assert_eq!(Orientation::from_angle(-0.7), Orientation::Horizontal);
        assert_eq!(Orientation::from_angle(FRAC_PI_2), Orientation::Vertical);
        assert_eq!(Orientation::from_angle(-2.0), Orientation::Vertical);
        assert_eq!(Orientation::from_angle(2.5), Orientation::Horizontal);
    }

    #[test]
    fn test_three_meter_wall_label() {
        let wall = Surface::wall(0.0, 0.0, 3.0, 0.0).expect("wall");
        let label = label_for(&wall, &view(50.0, 50.0), UnitSystem::Metric, &LabelConfig::default())
            .expect("label");
        assert_eq!(label.text, "3.0m");
        assert!((label.font_size - 12.0).abs() < f32::EPSILON);
        assert_eq!(label.orientation, Orientation::Horizontal);
        assert!(label.anchor.distance(Vec2::new(400.0, 300.0)) < 1e-3);
        assert_eq!(label.surface, wall.id());
    }

    #[test]
    fn test_vertical_wall_label() {
        let wall = Surface::wall(0.0, 0.0, 3.0, FRAC_PI_2).expect("wall");
        let label = label_for(&wall, &view(50.0, 50.0), UnitSystem::Metric, &LabelConfig::default())
            .expect("label");
        assert_eq!(label.orientation, Orientation::Vertical);
    }

    #[test]
    fn test_short_edge_is_noise() {
        let stub = Surface::wall(0.0, 0.0, 0.05, 0.0).expect("wall");
        // 0.05m at 2000 px/m is 100 px on screen, still noise
        assert!(label_for(&stub, &view(2000.0, 2000.0), UnitSystem::Metric, &LabelConfig::default()).is_none());
    }

    #[test]
    fn test_cramped_edge_is_skipped() {
        let wall = Surface::wall(0.0, 0.0, 1.0, 0.0).expect("wall");
        let config = LabelConfig::default();
        // 1m at 40 px/m = 40 px < 12 * 3.5
        assert!(label_for(&wall, &view(40.0, 40.0), UnitSystem::Metric, &config).is_none());
        // 1m at 50 px/m = 50 px >= 42
        assert!(label_for(&wall, &view(50.0, 50.0), UnitSystem::Metric, &config).is_some());
    }

    #[test]
    fn test_windows_excluded_by_default() {
        let window = Surface::new(
            SurfaceKind::Window,
            Vec3::zero(),
            Vec3::new(2.0, 1.0, 0.1),
            0.0,
        )
        .expect("window");
        let door = Surface::new(SurfaceKind::Door, Vec3::zero(), Vec3::new(0.9, 2.0, 0.1), 0.0)
            .expect("door");
        let surfaces = vec![window.clone(), door];
        let labels = labels_for(&surfaces, &view(100.0, 100.0), UnitSystem::Imperial, &LabelConfig::default());
        assert_eq!(labels.len(), 1);

        let config = LabelConfig {
            include_windows: true,
            ..LabelConfig::default()
        };
        let labels = labels_for(&surfaces, &view(100.0, 100.0), UnitSystem::Imperial, &config);
        assert_eq!(labels.len(), 2);
        assert_eq!(labels[0].surface, window.id());
    }

    #[test]
    fn test_halo_positions() {
        let label = MeasurementLabel {
            surface: SurfaceId::new(),
            anchor: Vec2::new(10.0, 10.0),
            text: "1.0m".to_string(),
            font_size: 12.0,
            orientation: Orientation::Horizontal,
            world_length: 1.0,
        };
        let halo = label.halo_positions(1.0);
        assert!(halo.contains(&Vec2::new(9.0, 10.0)));
        assert!(halo.contains(&Vec2::new(10.0, 11.0)));
    }
}
