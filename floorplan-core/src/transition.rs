//! Timed viewport transitions.

use std::f32::consts::{PI, TAU};
use std::time::Duration;

use crate::viewport::ViewportState;

/// Ease-in/ease-out pacing (smoothstep) for `t` in `[0, 1]`.
#[must_use]
pub fn ease_in_out(t: f32) -> f32 {
    let t = t.clamp(0.0, 1.0);
    t * t * 2.0f32.mul_add(-t, 3.0)
}

/// Wrap an angle into `(-π, π]`.
fn wrap_signed(angle: f32) -> f32 {
    let wrapped = (angle + PI).rem_euclid(TAU) - PI;
    if wrapped <= -PI {
        wrapped + TAU
    } else {
        wrapped
    }
}

/// An in-flight animation between two viewport states.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transition {
    from: ViewportState,
    to: ViewportState,
    elapsed: Duration,
    duration: Duration,
}

impl Transition {
    /// Start a transition.
    ///
    /// The starting rotation is moved to the turn closest to the target so
    /// that accumulated full turns are not spun back.
    #[must_use]
    pub fn new(from: ViewportState, to: ViewportState, duration: Duration) -> Self {
        let mut from = from;
        from.rotation = to.rotation + wrap_signed(from.rotation - to.rotation);
        Self {
            from,
            to,
            elapsed: Duration::ZERO,
            duration,
        }
    }

    /// Target state.
    #[must_use]
    pub fn target(&self) -> ViewportState {
        self.to
    }

    /// Linear progress in `[0, 1]`.
    #[must_use]
    pub fn progress(&self) -> f32 {
        if self.duration.is_zero() {
            return 1.0;
        }
        (self.elapsed.as_secs_f32() / self.duration.as_secs_f32()).min(1.0)
    }

    /// Whether the transition has reached its target.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.elapsed >= self.duration
    }

    /// Advance the clock. Returns `true` once finished.
    pub fn advance(&mut self, dt: Duration) -> bool {
        self.elapsed = self.elapsed.saturating_add(dt).min(self.duration);
        self.is_finished()
    }

    /// Current eased state.
    #[must_use]
    pub fn value(&self) -> ViewportState {
        if self.is_finished() {
            return self.to;
        }
        ViewportState::interpolate(&self.from, &self.to, ease_in_out(self.progress()))
    }
}
