//! Viewer state: one scene, its viewport and the display settings.

use std::time::Duration;

use crate::config::ViewerConfig;
use crate::event::{Gesture, GesturePhase, InputEvent, ViewCommand};
use crate::labels::{labels_for, MeasurementLabel, UnitSystem};
use crate::settings::DisplaySettings;
use crate::viewport::ViewportController;
use crate::{RoomScene, SurfaceId};

/// What processing an event changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventOutcome {
    /// Nothing changed.
    Ignored,
    /// The viewport changed; every layer's transform and the labels are stale.
    ViewChanged,
    /// Display settings changed; only the labels are stale.
    SettingsChanged,
    /// A tap landed on a surface.
    SurfaceTapped(SurfaceId),
}

impl EventOutcome {
    /// Whether the host should redraw.
    #[must_use]
    pub const fn needs_redraw(self) -> bool {
        matches!(self, Self::ViewChanged | Self::SettingsChanged)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct LabelKey {
    revision: u64,
    units: UnitSystem,
}

/// The complete viewer state for one loaded floor plan.
#[derive(Debug, Clone)]
pub struct ViewerState {
    scene: RoomScene,
    controller: ViewportController,
    settings: DisplaySettings,
    config: ViewerConfig,
    labels: Vec<MeasurementLabel>,
    label_key: Option<LabelKey>,
}

impl ViewerState {
    /// Create a viewer fitted to a `width` x `height` drawing surface.
    #[must_use]
    pub fn new(scene: RoomScene, width: f32, height: f32, config: ViewerConfig) -> Self {
        let controller =
            ViewportController::new(scene.bounds(), width, height, config.viewport.clone());
        Self {
            scene,
            controller,
            settings: config.display,
            config,
            labels: Vec::new(),
            label_key: None,
        }
    }

    /// The scene.
    #[must_use]
    pub fn scene(&self) -> &RoomScene {
        &self.scene
    }

    /// The viewport controller.
    #[must_use]
    pub fn controller(&self) -> &ViewportController {
        &self.controller
    }

    /// Mutable access to the viewport controller.
    pub fn controller_mut(&mut self) -> &mut ViewportController {
        &mut self.controller
    }

    /// Current display settings.
    #[must_use]
    pub fn settings(&self) -> DisplaySettings {
        self.settings
    }

    /// Replace the display settings.
    pub fn set_settings(&mut self, settings: DisplaySettings) {
        self.settings = settings;
    }

    /// Configuration in use.
    #[must_use]
    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    /// Measurement labels for the presented viewport.
    ///
    /// Recomputed only when the viewport revision or unit system changed
    /// since the last call. Empty while measurements are hidden.
    pub fn labels(&mut self) -> &[MeasurementLabel] {
        if !self.settings.show_measurements {
            return &[];
        }

        let key = LabelKey {
            revision: self.controller.revision(),
            units: self.settings.unit_system,
        };
        if self.label_key != Some(key) {
            self.labels = labels_for(
                self.scene.surfaces(),
                &self.controller.presented(),
                key.units,
                &self.config.labels,
            );
            self.label_key = Some(key);
        }
        &self.labels
    }

    /// Run a discrete command.
    pub fn execute(&mut self, command: ViewCommand) -> EventOutcome {
        tracing::debug!("Command: {command:?}");
        let changed_view = match command {
            ViewCommand::ZoomIn => self.controller.zoom_in(),
            ViewCommand::ZoomOut => self.controller.zoom_out(),
            ViewCommand::ResetView => {
                let before = self.controller.revision();
                self.controller.reset_to_fit();
                self.controller.revision() != before
            }
            ViewCommand::ToggleMeasurements => {
                self.settings.toggle_measurements();
                return EventOutcome::SettingsChanged;
            }
            ViewCommand::ToggleUnits => {
                self.settings.toggle_units();
                return EventOutcome::SettingsChanged;
            }
        };

        if changed_view {
            EventOutcome::ViewChanged
        } else {
            EventOutcome::Ignored
        }
    }

    fn apply_gesture(&mut self, phase: GesturePhase, gesture: Gesture) -> EventOutcome {
        if let Some(kind) = gesture.kind() {
            if phase == GesturePhase::Began {
                self.controller.begin_gesture(kind);
            }
        }

        let before = self.controller.revision();
        let outcome = match gesture {
            _ if phase == GesturePhase::Cancelled => EventOutcome::Ignored,
            Gesture::Pan { delta } => {
                self.controller.pan_by(delta);
                EventOutcome::ViewChanged
            }
            Gesture::Pinch { center, scale } => {
                self.controller.pinch(scale, center);
                EventOutcome::ViewChanged
            }
            Gesture::Rotate {
                center,
                angle_radians,
            } => {
                self.controller.rotate_by(angle_radians, center);
                EventOutcome::ViewChanged
            }
            Gesture::Tap { point } => self
                .scene
                .surface_at(point, &self.controller.presented(), self.config.hit_tolerance)
                .map_or(EventOutcome::Ignored, |id| {
                    tracing::debug!("Tap on surface {id}");
                    EventOutcome::SurfaceTapped(id)
                }),
            Gesture::DoubleTap { .. } => {
                self.controller.reset_to_fit();
                EventOutcome::ViewChanged
            }
        };

        if let Some(kind) = gesture.kind() {
            if phase.is_terminal() {
                self.controller.end_gesture(kind);
            }
        }

        match outcome {
            EventOutcome::ViewChanged if self.controller.revision() == before => {
                EventOutcome::Ignored
            }
            other => other,
        }
    }

    /// Process an input event.
    pub fn process_event(&mut self, event: &InputEvent) -> EventOutcome {
        match event {
            InputEvent::Gesture { phase, gesture } => {
                tracing::trace!("Gesture {phase:?}: {gesture:?}");
                self.apply_gesture(*phase, *gesture)
            }
            InputEvent::Command(command) => self.execute(*command),
            InputEvent::Resize { width, height } => {
                self.controller.set_viewport_size(*width, *height);
                EventOutcome::ViewChanged
            }
        }
    }

    /// Advance transitions. Returns whether a redraw is needed.
    pub fn tick(&mut self, dt: Duration) -> bool {
        self.controller.tick(dt)
    }
}
