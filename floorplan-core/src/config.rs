//! Viewer configuration passed in at construction.

use serde::{Deserialize, Serialize};

use crate::labels::LabelConfig;
use crate::projector::StrokeConfig;
use crate::settings::DisplaySettings;
use crate::viewport::ViewportConfig;
use crate::{PlanError, PlanResult};

/// Everything a viewer needs besides the scene and the viewport size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerConfig {
    /// Zoom limits and transitions.
    pub viewport: ViewportConfig,
    /// Label typography.
    pub labels: LabelConfig,
    /// Stroke widths and opening proportions.
    pub strokes: StrokeConfig,
    /// Initial display settings.
    pub display: DisplaySettings,
    /// Tap hit-test tolerance in screen pixels.
    pub hit_tolerance: f32,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            viewport: ViewportConfig::default(),
            labels: LabelConfig::default(),
            strokes: StrokeConfig::default(),
            display: DisplaySettings::default(),
            hit_tolerance: 12.0,
        }
    }
}

impl ViewerConfig {
    /// Parse and validate a configuration from JSON. Missing fields take
    /// their defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON is malformed or a value is out of range.
    pub fn from_json(json: &str) -> PlanResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check every section.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::InvalidConfig`] describing the first bad value.
    pub fn validate(&self) -> PlanResult<()> {
        self.viewport.validate()?;
        self.labels.validate()?;
        self.strokes.validate()?;
        if !(self.hit_tolerance >= 0.0 && self.hit_tolerance.is_finite()) {
            return Err(PlanError::InvalidConfig(format!(
                "hit tolerance must be a non-negative number, got {}",
                self.hit_tolerance
            )));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::UnitSystem;

    #[test]
    fn test_partial_json_uses_defaults() {
        let config = ViewerConfig::from_json(
            r#"{"labels": {"base_font_size": 10.0}, "display": {"unit_system": "imperial"}}"#,
        )
        .expect("config");
        assert!((config.labels.base_font_size - 10.0).abs() < f32::EPSILON);
        assert!((config.labels.max_font_size - 14.0).abs() < f32::EPSILON);
        assert_eq!(config.display.unit_system, UnitSystem::Imperial);
        assert_eq!(config.viewport, ViewportConfig::default());
    }

    #[test]
    fn test_invalid_values_rejected() {
        let err = ViewerConfig::from_json(r#"{"viewport": {"min_zoom": 0.0}}"#);
        assert!(matches!(err, Err(PlanError::InvalidConfig(_))));
        let err = ViewerConfig::from_json(r#"{"labels": {"min_font_size": 20.0}}"#);
        assert!(matches!(err, Err(PlanError::InvalidConfig(_))));
        let err = ViewerConfig::from_json("not json");
        assert!(matches!(err, Err(PlanError::Serialization(_))));
    }
}
