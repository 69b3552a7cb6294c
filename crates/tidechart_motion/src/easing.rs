//! Easing functions for transitions.

/// Easing curve applied to a transition's progress.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Easing {
    Linear,
    /// Cubic ease-in: slow start. Used for zoom-out when the chart
    /// inverts easing on negative deltas.
    EaseIn,
    /// Cubic ease-out: fast start, gentle landing. The default for
    /// vertical-scale changes.
    #[default]
    EaseOut,
    EaseInOut,
}

impl Easing {
    /// Apply the curve to a progress value in `[0, 1]`.
    ///
    /// Endpoints are exact: `apply(0) == 0` and `apply(1) == 1`.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Easing::Linear => t,
            Easing::EaseIn => t * t * t,
            Easing::EaseOut => 1.0 - (1.0 - t).powi(3),
            Easing::EaseInOut => {
                if t < 0.5 {
                    4.0 * t * t * t
                } else {
                    1.0 - (-2.0 * t + 2.0).powi(3) / 2.0
                }
            }
        }
    }
}
