//! Horizontal grid rows and their split/collapse behavior during a
//! vertical-scale transition.
//!
//! While the scale animates between two maxima, every row splits into an
//! entering half (labeled for the new maximum, sliding toward its resting
//! level) and a leaving half (labeled for the old maximum, sliding away),
//! cross-faded by the transition progress. When the scales are close
//! enough no split happens and the rows simply relabel.

use crate::format::format_grid_value;

/// Number of horizontal grid rows, the zero row included.
pub const GRID_ROW_COUNT: usize = 6;

/// Relative scale change below which rows relabel without animating.
pub const RESIZE_EPSILON: f64 = 0.02;

/// One half of a splitting grid row.
#[derive(Clone, Debug, PartialEq)]
pub struct RowHalf {
    /// Data value this half is labeled with.
    pub value: f64,
    /// Resting pixel level above the baseline once settled.
    pub orig_level: f64,
    /// Current pixel level above the baseline.
    pub level: f64,
    pub label: String,
    pub alpha: f64,
}

/// A grid row, either at rest or mid-transition.
#[derive(Clone, Debug, PartialEq)]
pub enum GridRow {
    Settled {
        value: f64,
        /// Pixel level above the baseline.
        level: f64,
        label: String,
        alpha: f64,
    },
    Transitioning {
        entering: RowHalf,
        leaving: RowHalf,
    },
}

impl GridRow {
    pub fn is_settled(&self) -> bool {
        matches!(self, GridRow::Settled { .. })
    }
}

/// Motion parameters shared by every row of one transition frame, derived
/// from the animated `step_y` scale.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ZoomPhase {
    /// Whether the scale change is large enough to animate at all.
    pub resizing: bool,
    /// Relative level offset of entering halves, `0.0` at rest.
    pub zoom_entering: f64,
    /// Relative level offset of leaving halves, `0.0` at their old rest.
    pub zoom_leaving: f64,
    pub alpha_entering: f64,
    pub alpha_leaving: f64,
}

impl ZoomPhase {
    /// A phase that renders settled rows unchanged.
    pub const AT_REST: ZoomPhase = ZoomPhase {
        resizing: false,
        zoom_entering: 0.0,
        zoom_leaving: 0.0,
        alpha_entering: 1.0,
        alpha_leaving: 0.0,
    };
}

/// Derive the per-frame row motion from the animated scale: `current` is
/// the interpolated `step_y`, `init` and `target` its endpoints.
pub fn zoom_phase(current: f64, init: f64, target: f64) -> ZoomPhase {
    if init <= f64::EPSILON || target <= f64::EPSILON {
        return ZoomPhase::AT_REST;
    }
    let resizing = (target / init - 1.0).abs() > RESIZE_EPSILON;
    if !resizing {
        return ZoomPhase::AT_REST;
    }

    let span = target - init;
    let progress = ((current - init) / span).clamp(0.0, 1.0);
    ZoomPhase {
        resizing,
        // An entering row's pixel level is value * current step_y with
        // value sized for the target scale, so its offset from rest is
        // current / target - 1. Leaving rows are sized for the old scale.
        zoom_entering: current / target - 1.0,
        zoom_leaving: current / init - 1.0,
        alpha_entering: progress,
        alpha_leaving: 1.0 - progress,
    }
}

/// Rows at rest for `max` on a plot `avail` pixels tall.
pub fn settled_rows(max: f64, avail: f64) -> Vec<GridRow> {
    if max <= 0.0 {
        return Vec::new();
    }
    (0..GRID_ROW_COUNT)
        .map(|k| {
            let value = (k as f64 * max / GRID_ROW_COUNT as f64).round();
            GridRow::Settled {
                value,
                level: k as f64 * avail / GRID_ROW_COUNT as f64,
                label: format_grid_value(value),
                alpha: 1.0,
            }
        })
        .collect()
}

/// Rows for one frame of a scale transition from `prev_max` to `next_max`.
///
/// Outside an animating phase this degrades to [`settled_rows`]; inside
/// one, every row is emitted as a [`GridRow::Transitioning`] pair so a
/// frame never mixes settled and splitting rows.
pub fn transitioning_rows(
    prev_max: f64,
    next_max: f64,
    phase: ZoomPhase,
    avail: f64,
) -> Vec<GridRow> {
    if !phase.resizing || prev_max <= 0.0 {
        return settled_rows(next_max, avail);
    }
    if next_max <= 0.0 {
        return Vec::new();
    }

    (0..GRID_ROW_COUNT)
        .map(|k| {
            let orig_level = k as f64 * avail / GRID_ROW_COUNT as f64;
            let entering_value = (k as f64 * next_max / GRID_ROW_COUNT as f64).round();
            let leaving_value = (k as f64 * prev_max / GRID_ROW_COUNT as f64).round();
            GridRow::Transitioning {
                entering: RowHalf {
                    value: entering_value,
                    orig_level,
                    level: orig_level * (1.0 + phase.zoom_entering),
                    label: format_grid_value(entering_value),
                    alpha: phase.alpha_entering,
                },
                leaving: RowHalf {
                    value: leaving_value,
                    orig_level,
                    level: orig_level * (1.0 + phase.zoom_leaving),
                    label: format_grid_value(leaving_value),
                    alpha: phase.alpha_leaving,
                },
            }
        })
        .collect()
}

/// Settle every transitioning row, keeping whichever half sits closer to
/// its resting level.
pub fn collapse(rows: &[GridRow]) -> Vec<GridRow> {
    rows.iter()
        .map(|row| match row {
            GridRow::Settled { .. } => row.clone(),
            GridRow::Transitioning { entering, leaving } => {
                let entering_drift = (entering.level - entering.orig_level).abs();
                let leaving_drift = (leaving.level - leaving.orig_level).abs();
                let winner = if entering_drift <= leaving_drift {
                    entering
                } else {
                    leaving
                };
                GridRow::Settled {
                    value: winner.value,
                    level: winner.orig_level,
                    label: winner.label.clone(),
                    alpha: 1.0,
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn settled_rows_divide_max_into_six() {
        let rows = settled_rows(20.0, 200.0);
        assert_eq!(rows.len(), GRID_ROW_COUNT);
        let values: Vec<f64> = rows
            .iter()
            .map(|r| match r {
                GridRow::Settled { value, .. } => *value,
                _ => unreachable!(),
            })
            .collect();
        assert_eq!(values, vec![0.0, 3.0, 7.0, 10.0, 13.0, 17.0]);
        if let GridRow::Settled { level, label, .. } = &rows[3] {
            assert_eq!(*level, 100.0);
            assert_eq!(label, "10");
        }
    }

    #[test]
    fn zero_max_produces_no_rows() {
        assert!(settled_rows(0.0, 200.0).is_empty());
        assert!(settled_rows(-1.0, 200.0).is_empty());
    }

    #[test]
    fn small_scale_change_does_not_animate() {
        let phase = zoom_phase(10.05, 10.0, 10.1);
        assert!(!phase.resizing);
        let rows = transitioning_rows(100.0, 99.0, phase, 200.0);
        assert!(rows.iter().all(GridRow::is_settled));
    }

    #[test]
    fn transition_start_shows_leaving_rows_at_rest() {
        // Scale shrinking from 10 to 5 px per unit, frame at the start.
        let phase = zoom_phase(10.0, 10.0, 5.0);
        assert!(phase.resizing);
        let rows = transitioning_rows(20.0, 40.0, phase, 200.0);
        assert_eq!(rows.len(), GRID_ROW_COUNT);
        for row in &rows {
            let GridRow::Transitioning { entering, leaving } = row else {
                panic!("expected every row to split");
            };
            assert_eq!(leaving.level, leaving.orig_level);
            assert_eq!(leaving.alpha, 1.0);
            assert_eq!(entering.alpha, 0.0);
            // Entering rows sized for the larger maximum start above rest.
            assert!((entering.level - entering.orig_level * 2.0).abs() < 1e-9);
        }
    }

    #[test]
    fn transition_end_lands_entering_rows_at_rest() {
        let phase = zoom_phase(5.0, 10.0, 5.0);
        let rows = transitioning_rows(20.0, 40.0, phase, 200.0);
        for row in &rows {
            let GridRow::Transitioning { entering, leaving } = row else {
                panic!("expected every row to split");
            };
            assert_eq!(entering.level, entering.orig_level);
            assert_eq!(entering.alpha, 1.0);
            assert_eq!(leaving.alpha, 0.0);
        }
    }

    #[test]
    fn zero_row_stays_pinned_to_the_baseline() {
        let phase = zoom_phase(7.0, 10.0, 5.0);
        let rows = transitioning_rows(20.0, 40.0, phase, 200.0);
        let GridRow::Transitioning { entering, leaving } = &rows[0] else {
            panic!("expected a split row");
        };
        assert_eq!(entering.level, 0.0);
        assert_eq!(leaving.level, 0.0);
    }

    #[test]
    fn collapse_keeps_the_half_closest_to_rest() {
        let phase = zoom_phase(5.0, 10.0, 5.0);
        let rows = transitioning_rows(20.0, 40.0, phase, 200.0);
        let collapsed = collapse(&rows);
        assert!(collapsed.iter().all(GridRow::is_settled));
        // At the end of the transition the entering half (new labels) wins.
        let settled = settled_rows(40.0, 200.0);
        assert_eq!(collapsed, settled);
    }
}
