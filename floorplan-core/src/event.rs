//! Input events and view commands.

use serde::{Deserialize, Serialize};

use crate::geometry::Vec2;
use crate::viewport::GestureKind;

/// Phase of a continuous gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GesturePhase {
    /// Gesture recognized (fingers down).
    Began,
    /// Gesture updated.
    Changed,
    /// Gesture finished (fingers up).
    Ended,
    /// Gesture cancelled by the system.
    Cancelled,
}

impl GesturePhase {
    /// Whether this phase ends the gesture.
    #[must_use]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Ended | Self::Cancelled)
    }
}

/// Recognized gestures, carrying per-event deltas.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "gesture", content = "data")]
pub enum Gesture {
    /// Drag by a screen-space delta since the previous event.
    Pan {
        /// Translation since the last event.
        delta: Vec2,
    },

    /// Pinch by an incremental scale factor since the previous event.
    Pinch {
        /// Pinch center on screen.
        center: Vec2,
        /// Scale factor since the last event (1.0 = no change).
        scale: f32,
    },

    /// Two-finger rotation by an incremental angle since the previous event.
    Rotate {
        /// Rotation center on screen.
        center: Vec2,
        /// Angle since the last event, in radians.
        angle_radians: f32,
    },

    /// Single tap.
    Tap {
        /// Tap location on screen.
        point: Vec2,
    },

    /// Double tap.
    DoubleTap {
        /// Tap location on screen.
        point: Vec2,
    },
}

impl Gesture {
    /// The continuous gesture kind, if any (taps are discrete).
    #[must_use]
    pub const fn kind(&self) -> Option<GestureKind> {
        match self {
            Self::Pan { .. } => Some(GestureKind::Pan),
            Self::Pinch { .. } => Some(GestureKind::Zoom),
            Self::Rotate { .. } => Some(GestureKind::Rotate),
            Self::Tap { .. } | Self::DoubleTap { .. } => None,
        }
    }
}

/// Discrete commands exposed to the host application.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ViewCommand {
    /// Zoom in one step.
    ZoomIn,
    /// Zoom out one step.
    ZoomOut,
    /// Animate back to the fitted view.
    ResetView,
    /// Show or hide measurement labels.
    ToggleMeasurements,
    /// Switch between metric and imperial.
    ToggleUnits,
}

/// All input events the viewer can receive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum InputEvent {
    /// A recognized gesture in a given phase.
    Gesture {
        /// Gesture phase.
        phase: GesturePhase,
        /// Gesture payload.
        gesture: Gesture,
    },

    /// A discrete command.
    Command(ViewCommand),

    /// The drawing surface changed size.
    Resize {
        /// New width in pixels.
        width: f32,
        /// New height in pixels.
        height: f32,
    },
}

impl InputEvent {
    /// Shorthand for a gesture update.
    #[must_use]
    pub const fn gesture(phase: GesturePhase, gesture: Gesture) -> Self {
        Self::Gesture { phase, gesture }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_json_shape() {
        let event = InputEvent::gesture(
            GesturePhase::Changed,
            Gesture::Pinch {
                center: Vec2::new(1.0, 2.0),
                scale: 1.5,
            },
        );
        let json = serde_json::to_value(&event).expect("serialize");
        assert_eq!(json["type"], "Gesture");
        assert_eq!(json["data"]["phase"], "changed");
        assert_eq!(json["data"]["gesture"]["gesture"], "Pinch");

        let back: InputEvent = serde_json::from_value(json).expect("deserialize");
        assert_eq!(back, event);
    }

    #[test]
    fn test_command_json() {
        let event: InputEvent =
            serde_json::from_str(r#"{"type":"Command","data":"toggle_units"}"#).expect("parse");
        assert_eq!(event, InputEvent::Command(ViewCommand::ToggleUnits));
    }

    #[test]
    fn test_gesture_kinds() {
        assert_eq!(Gesture::Pan { delta: Vec2::zero() }.kind(), Some(GestureKind::Pan));
        assert_eq!(Gesture::Tap { point: Vec2::zero() }.kind(), None);
        assert!(GesturePhase::Cancelled.is_terminal());
        assert!(!GesturePhase::Began.is_terminal());
    }
}
