//! Viewport state and the controller that mutates it.
//!
//! The controller keeps two values: the model state, which every mutator
//! updates immediately and which always satisfies the zoom clamp, and the
//! presented state, which eases toward the model while a transition runs.
//! Renderers draw the presented state; commands compound on the model.
//!
//! ```text
//!            gesture began            gesture ended
//!   Idle ──────────────────► Panning / Zooming / Rotating ──► Idle
//!    ▲                                 │
//!    │        transition done          │ reset_to_fit / zoom_by
//!    └────────── Animating ◄───────────┘
//! ```

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::bounds::fit_scale;
use crate::geometry::{Aabb2, Vec2};
use crate::transition::Transition;
use crate::{PlanError, PlanResult};

/// Relative slack when checking a discrete zoom target against the bounds.
const ZOOM_BOUND_TOLERANCE: f32 = 1e-4;

/// The live transform from plan space to screen space.
///
/// `screen = R(rotation) · (scale · plan) + translation`
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportState {
    /// Pixels per world unit.
    pub scale: f32,
    /// Screen position of the plan origin.
    pub translation: Vec2,
    /// Rotation in radians, unclamped.
    pub rotation: f32,
    /// Scale that fits the room at load time.
    pub initial_scale: f32,
}

impl ViewportState {
    /// Identity transform.
    #[must_use]
    pub const fn identity() -> Self {
        Self {
            scale: 1.0,
            translation: Vec2::zero(),
            rotation: 0.0,
            initial_scale: 1.0,
        }
    }

    /// Current scale divided by the fit scale.
    #[must_use]
    pub fn zoom_ratio(&self) -> f32 {
        self.scale / self.initial_scale
    }

    /// Map a plan-space point to screen space.
    #[must_use]
    pub fn to_screen(&self, plan: Vec2) -> Vec2 {
        (plan * self.scale).rotate(self.rotation) + self.translation
    }

    /// Map a screen-space point back to plan space.
    #[must_use]
    pub fn to_plan(&self, screen: Vec2) -> Vec2 {
        (screen - self.translation).rotate(-self.rotation) * (1.0 / self.scale)
    }

    /// Component-wise linear interpolation.
    #[must_use]
    pub fn interpolate(from: &Self, to: &Self, t: f32) -> Self {
        Self {
            scale: (to.scale - from.scale).mul_add(t, from.scale),
            translation: from.translation.lerp(to.translation, t),
            rotation: (to.rotation - from.rotation).mul_add(t, from.rotation),
            initial_scale: to.initial_scale,
        }
    }
}

impl Default for ViewportState {
    fn default() -> Self {
        Self::identity()
    }
}

/// Zoom limits, step sizes and transition timing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportConfig {
    /// Smallest allowed zoom ratio.
    pub min_zoom: f32,
    /// Largest allowed zoom ratio.
    pub max_zoom: f32,
    /// Factor applied by one discrete zoom-in command.
    pub zoom_step: f32,
    /// Fraction of the viewport the fitted room occupies.
    pub fit_fraction: f32,
    /// Duration of the reset-to-fit transition.
    #[serde(with = "duration_secs")]
    pub reset_duration: Duration,
    /// Duration of a discrete zoom transition.
    #[serde(with = "duration_secs")]
    pub zoom_duration: Duration,
    /// Whether commands animate (gestures never do).
    pub animate: bool,
}

impl Default for ViewportConfig {
    fn default() -> Self {
        Self {
            min_zoom: 0.3,
            max_zoom: 8.0,
            zoom_step: 1.4,
            fit_fraction: 0.75,
            reset_duration: Duration::from_millis(400),
            zoom_duration: Duration::from_millis(250),
            animate: true,
        }
    }
}

impl ViewportConfig {
    /// Check that limits and steps are usable.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::InvalidConfig`] for inverted or non-positive
    /// zoom limits, a zoom step not greater than one, or a fit fraction
    /// outside `(0, 1]`.
    pub fn validate(&self) -> PlanResult<()> {
        if !(self.min_zoom > 0.0 && self.min_zoom <= 1.0 && self.max_zoom >= 1.0) {
            return Err(PlanError::InvalidConfig(format!(
                "zoom limits must satisfy 0 < min <= 1 <= max, got {}..{}",
                self.min_zoom, self.max_zoom
            )));
        }
        if !(self.zoom_step > 1.0 && self.zoom_step.is_finite()) {
            return Err(PlanError::InvalidConfig(format!(
                "zoom step must be greater than 1, got {}",
                self.zoom_step
            )));
        }
        if !(self.fit_fraction > 0.0 && self.fit_fraction <= 1.0) {
            return Err(PlanError::InvalidConfig(format!(
                "fit fraction must be in (0, 1], got {}",
                self.fit_fraction
            )));
        }
        Ok(())
    }
}

mod duration_secs {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_f64(value.as_secs_f64())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        let secs = f64::deserialize(deserializer)?;
        Duration::try_from_secs_f64(secs).map_err(serde::de::Error::custom)
    }
}

/// Gesture kinds the controller tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GestureKind {
    /// One-finger drag.
    Pan,
    /// Two-finger pinch.
    Zoom,
    /// Two-finger rotation.
    Rotate,
}

/// Gestures currently in progress; any combination may be active at once.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActiveGestures {
    /// Pan in progress.
    pub pan: bool,
    /// Pinch in progress.
    pub zoom: bool,
    /// Rotation in progress.
    pub rotate: bool,
}

impl ActiveGestures {
    /// Whether any gesture is active.
    #[must_use]
    pub const fn any(&self) -> bool {
        self.pan || self.zoom || self.rotate
    }

    fn set(&mut self, kind: GestureKind, active: bool) {
        match kind {
            GestureKind::Pan => self.pan = active,
            GestureKind::Zoom => self.zoom = active,
            GestureKind::Rotate => self.rotate = active,
        }
    }

    /// Whether the given gesture is active.
    #[must_use]
    pub const fn contains(&self, kind: GestureKind) -> bool {
        match kind {
            GestureKind::Pan => self.pan,
            GestureKind::Zoom => self.zoom,
            GestureKind::Rotate => self.rotate,
        }
    }
}

/// Coarse interaction phase of the viewport.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ViewportPhase {
    /// Nothing in progress.
    Idle,
    /// A pan gesture is active.
    Panning,
    /// A pinch gesture is active.
    Zooming,
    /// A rotation gesture is active.
    Rotating,
    /// A command transition is running.
    Animating,
}

/// Owns the viewport state for one floor plan.
#[derive(Debug, Clone)]
pub struct ViewportController {
    config: ViewportConfig,
    bounds: Aabb2,
    viewport_size: Vec2,
    fit: ViewportState,
    state: ViewportState,
    transition: Option<Transition>,
    gestures: ActiveGestures,
    revision: u64,
}

impl ViewportController {
    /// Create a controller fitted to `bounds` in a `width` x `height` viewport.
    #[must_use]
    pub fn new(bounds: Aabb2, width: f32, height: f32, config: ViewportConfig) -> Self {
        let fit = Self::fit_state(&bounds, width, height, &config);
        Self {
            config,
            bounds,
            viewport_size: Vec2::new(width, height),
            fit,
            state: fit,
            transition: None,
            gestures: ActiveGestures::default(),
            revision: 0,
        }
    }

    fn fit_state(bounds: &Aabb2, width: f32, height: f32, config: &ViewportConfig) -> ViewportState {
        let Some(scale) = fit_scale(bounds, width, height, config.fit_fraction) else {
            tracing::debug!("Degenerate viewport {width}x{height}, using unit scale");
            return ViewportState::identity();
        };
        let viewport_center = Vec2::new(width * 0.5, height * 0.5);
        ViewportState {
            scale,
            translation: viewport_center - bounds.center() * scale,
            rotation: 0.0,
            initial_scale: scale,
        }
    }

    /// Model state: the value every mutator has already applied.
    #[must_use]
    pub fn state(&self) -> ViewportState {
        self.state
    }

    /// Presented state: the model, or the in-flight transition value.
    #[must_use]
    pub fn presented(&self) -> ViewportState {
        self.transition.map_or(self.state, |t| t.value())
    }

    /// State that exactly fits the scene.
    #[must_use]
    pub fn fit(&self) -> ViewportState {
        self.fit
    }

    /// Plan bounds the controller fits to.
    #[must_use]
    pub fn bounds(&self) -> Aabb2 {
        self.bounds
    }

    /// Viewport size in pixels.
    #[must_use]
    pub fn viewport_size(&self) -> Vec2 {
        self.viewport_size
    }

    /// Whether the viewport has a drawable area.
    #[must_use]
    pub fn has_area(&self) -> bool {
        let Vec2 { x, y } = self.viewport_size;
        x.is_finite() && y.is_finite() && x > 0.0 && y > 0.0
    }

    /// Configuration in use.
    #[must_use]
    pub fn config(&self) -> &ViewportConfig {
        &self.config
    }

    /// Counter bumped whenever the presented state changes.
    #[must_use]
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Active gestures.
    #[must_use]
    pub fn gestures(&self) -> ActiveGestures {
        self.gestures
    }

    /// Whether a transition is running.
    #[must_use]
    pub fn is_animating(&self) -> bool {
        self.transition.is_some()
    }

    /// Current interaction phase.
    #[must_use]
    pub fn phase(&self) -> ViewportPhase {
        if self.transition.is_some() {
            ViewportPhase::Animating
        } else if self.gestures.zoom {
            ViewportPhase::Zooming
        } else if self.gestures.rotate {
            ViewportPhase::Rotating
        } else if self.gestures.pan {
            ViewportPhase::Panning
        } else {
            ViewportPhase::Idle
        }
    }

    /// Model zoom ratio.
    #[must_use]
    pub fn zoom_ratio(&self) -> f32 {
        self.state.zoom_ratio()
    }

    fn min_scale(&self) -> f32 {
        self.config.min_zoom * self.state.initial_scale
    }

    fn max_scale(&self) -> f32 {
        self.config.max_zoom * self.state.initial_scale
    }

    fn viewport_center(&self) -> Vec2 {
        self.viewport_size * 0.5
    }

    fn touch(&mut self) {
        self.revision = self.revision.wrapping_add(1);
    }

    /// Freeze any running transition where it currently is.
    fn settle(&mut self) {
        if let Some(transition) = self.transition.take() {
            self.state = transition.value();
        }
    }

    /// Replace the model, animating from the presented state when asked.
    fn commit(&mut self, target: ViewportState, duration: Option<Duration>) {
        let from = self.presented();
        self.state = target;
        self.transition = match duration {
            Some(duration) if self.config.animate && !duration.is_zero() => {
                Some(Transition::new(from, target, duration))
            }
            _ => None,
        };
        self.touch();
    }

    /// Scale `state` by `factor` about the screen point `anchor`.
    fn scaled_about(state: ViewportState, factor: f32, anchor: Vec2) -> ViewportState {
        ViewportState {
            scale: state.scale * factor,
            translation: anchor + (state.translation - anchor) * factor,
            ..state
        }
    }

    /// Discrete zoom by `factor` about the viewport center.
    ///
    /// The target is rejected (no state change) when it falls outside
    /// `min_zoom..=max_zoom` times the fit scale. Returns whether the zoom
    /// was applied.
    pub fn zoom_by(&mut self, factor: f32) -> bool {
        if !(factor.is_finite() && factor > 0.0) {
            tracing::debug!("Ignoring invalid zoom factor {factor}");
            return false;
        }

        let (lo, hi) = (self.min_scale(), self.max_scale());
        let target = self.state.scale * factor;
        if target < lo * (1.0 - ZOOM_BOUND_TOLERANCE) || target > hi * (1.0 + ZOOM_BOUND_TOLERANCE) {
            tracing::debug!(
                "Zoom to ratio {:.3} rejected, limits {}..{}",
                target / self.state.initial_scale,
                self.config.min_zoom,
                self.config.max_zoom
            );
            return false;
        }

        let effective = target.clamp(lo, hi) / self.state.scale;
        let next = Self::scaled_about(self.state, effective, self.viewport_center());
        tracing::debug!("Zoom ratio {:.3}", next.zoom_ratio());
        self.commit(next, Some(self.config.zoom_duration));
        true
    }

    /// Zoom in by one step.
    pub fn zoom_in(&mut self) -> bool {
        self.zoom_by(self.config.zoom_step)
    }

    /// Zoom out by one step.
    pub fn zoom_out(&mut self) -> bool {
        self.zoom_by(1.0 / self.config.zoom_step)
    }

    /// Apply an incremental pinch factor about `anchor`, clamped to the limits.
    ///
    /// Returns whether the scale changed.
    pub fn pinch(&mut self, factor: f32, anchor: Vec2) -> bool {
        if !(factor.is_finite() && factor > 0.0) {
            return false;
        }
        self.settle();

        let target = (self.state.scale * factor).clamp(self.min_scale(), self.max_scale());
        let effective = target / self.state.scale;
        if (effective - 1.0).abs() <= f32::EPSILON {
            return false;
        }
        let next = Self::scaled_about(self.state, effective, anchor);
        self.commit(next, None);
        true
    }

    /// Translate the drawing by `delta` screen pixels. Unclamped.
    pub fn pan_by(&mut self, delta: Vec2) {
        if !delta.is_finite() || delta == Vec2::zero() {
            return;
        }
        self.settle();
        let next = ViewportState {
            translation: self.state.translation + delta,
            ..self.state
        };
        self.commit(next, None);
    }

    /// Rotate the drawing by `delta` radians about the screen point `anchor`.
    pub fn rotate_by(&mut self, delta: f32, anchor: Vec2) {
        if !delta.is_finite() || delta.abs() < f32::EPSILON {
            return;
        }
        self.settle();
        let next = ViewportState {
            rotation: self.state.rotation + delta,
            translation: anchor + (self.state.translation - anchor).rotate(delta),
            ..self.state
        };
        self.commit(next, None);
    }

    /// Rotate about the viewport center.
    pub fn rotate_about_center(&mut self, delta: f32) {
        self.rotate_by(delta, self.viewport_center());
    }

    /// Return to the fitted scale, centered, unrotated.
    pub fn reset_to_fit(&mut self) {
        if self.state == self.fit && self.transition.is_none() {
            return;
        }
        tracing::debug!("Reset viewport to fit");
        self.commit(self.fit, Some(self.config.reset_duration));
    }

    /// Resize the viewport; the view snaps back to fit.
    pub fn set_viewport_size(&mut self, width: f32, height: f32) {
        self.viewport_size = Vec2::new(width, height);
        self.fit = Self::fit_state(&self.bounds, width, height, &self.config);
        self.transition = None;
        self.state = self.fit;
        self.touch();
        tracing::debug!("Viewport resized to {width}x{height}, scale {}", self.fit.scale);
    }

    /// Mark a gesture as started. Cancels any running transition.
    pub fn begin_gesture(&mut self, kind: GestureKind) {
        if self.transition.is_some() {
            self.settle();
            self.touch();
        }
        self.gestures.set(kind, true);
    }

    /// Mark a gesture as finished or cancelled.
    pub fn end_gesture(&mut self, kind: GestureKind) {
        self.gestures.set(kind, false);
    }

    /// Advance the running transition. Returns whether the presented state changed.
    pub fn tick(&mut self, dt: Duration) -> bool {
        let Some(transition) = self.transition.as_mut() else {
            return false;
        };
        if transition.advance(dt) {
            self.transition = None;
        }
        self.touch();
        true
    }
}
