//! Fixed-step scalar interpolation with retarget semantics.

use crate::easing::Easing;

/// Step count for a 0.2 s transition at 60 fps. A tunable constant, not an
/// architectural requirement.
pub const DEFAULT_TRANSITION_STEPS: u32 = 12;

/// Interpolates a scalar from `init` to `target` over a fixed number of
/// frame steps.
///
/// The step counter is 1-indexed: the first [`advance`](Self::advance)
/// yields a value strictly between the endpoints (for `steps > 1`), the
/// final one yields `target` exactly, with no asymptotic settling.
///
/// Retargeting restarts from the *current* interpolated value, so a
/// retargeted transition never jumps back behind the point it had reached.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScalarTransition {
    init: f64,
    target: f64,
    step: u32,
    steps: u32,
    easing: Easing,
}

impl ScalarTransition {
    pub fn new(init: f64, target: f64, steps: u32, easing: Easing) -> Self {
        Self {
            init,
            target,
            step: 0,
            steps: steps.max(1),
            easing,
        }
    }

    pub fn init(&self) -> f64 {
        self.init
    }

    pub fn target(&self) -> f64 {
        self.target
    }

    /// Current interpolated value (before the first advance: `init`).
    pub fn value(&self) -> f64 {
        if self.step >= self.steps {
            return self.target;
        }
        let t = self.step as f64 / self.steps as f64;
        self.init + self.easing.apply(t) * (self.target - self.init)
    }

    /// Linear progress of the current value between `init` and `target`.
    pub fn progress(&self) -> f64 {
        let span = self.target - self.init;
        if span.abs() < f64::EPSILON {
            return 1.0;
        }
        ((self.value() - self.init) / span).clamp(0.0, 1.0)
    }

    /// Advance one frame step and return the new value.
    pub fn advance(&mut self) -> f64 {
        self.step = (self.step + 1).min(self.steps);
        self.value()
    }

    pub fn is_done(&self) -> bool {
        self.step >= self.steps
    }

    /// Restart toward `new_target` from the current interpolated value,
    /// optionally switching the easing curve for the new direction.
    pub fn retarget(&mut self, new_target: f64, easing: Easing) {
        self.init = self.value();
        self.target = new_target;
        self.step = 0;
        self.easing = easing;
    }
}
