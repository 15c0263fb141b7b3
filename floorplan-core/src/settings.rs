//! Display settings supplied by the host application.

use serde::{Deserialize, Serialize};

use crate::labels::UnitSystem;

/// User-facing display options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySettings {
    /// Whether measurement labels are drawn.
    pub show_measurements: bool,
    /// Unit system for measurement text.
    pub unit_system: UnitSystem,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        Self {
            show_measurements: true,
            unit_system: UnitSystem::Metric,
        }
    }
}

impl DisplaySettings {
    /// Flip measurement visibility; returns the new value.
    pub fn toggle_measurements(&mut self) -> bool {
        self.show_measurements = !self.show_measurements;
        self.show_measurements
    }

    /// Switch between metric and imperial; returns the new system.
    pub fn toggle_units(&mut self) -> UnitSystem {
        self.unit_system = self.unit_system.toggled();
        self.unit_system
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggles() {
        let mut settings = DisplaySettings::default();
        assert!(!settings.toggle_measurements());
        assert!(settings.toggle_measurements());
        assert_eq!(settings.toggle_units(), UnitSystem::Imperial);
        assert_eq!(settings.toggle_units(), UnitSystem::Metric);
    }

    #[test]
    fn test_serde_names() {
        let settings: DisplaySettings =
            serde_json::from_str(r#"{"unit_system":"imperial"}"#).expect("parse");
        assert!(settings.show_measurements);
        assert_eq!(settings.unit_system, UnitSystem::Imperial);
    }
}
