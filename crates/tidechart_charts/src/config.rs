//! Geometry derivation: from data, canvas and slider window to the
//! per-frame scale factors the renderer consumes.

use crate::state::{ChartData, ChartSize};
use crate::surface::PointPx;

/// Line columns faded below this alpha stop contributing to the vertical
/// scale, so a fading-out series releases the Y axis mid-animation.
pub const MAX_VALUE_ALPHA_MIN: f64 = 0.5;

/// The vertical scale never zooms in beyond the scale a window maximum of
/// this value would get, keeping near-flat windows readable.
pub const ZOOM_CAP_MIN_MAX_VALUE: f64 = 10.0;

/// Fixed chart margins, in logical pixels except where noted.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChartLayout {
    /// Fraction of the canvas height reserved above the tallest point.
    pub top_offset_percent: f64,
    /// Room under the plot for the timeline labels.
    pub bottom_offset: f64,
    /// Horizontal inset on each side.
    pub side_offset: f64,
}

impl Default for ChartLayout {
    fn default() -> Self {
        ChartLayout {
            top_offset_percent: 0.1,
            bottom_offset: 20.0,
            side_offset: 10.0,
        }
    }
}

impl ChartLayout {
    /// Layout with no margins at all, as the navigation strip uses.
    pub const ZERO: ChartLayout = ChartLayout {
        top_offset_percent: 0.0,
        bottom_offset: 0.0,
        side_offset: 0.0,
    };
}

/// Derived scale factors for one frame.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct ChartConfig {
    /// Horizontal pixels per data point.
    pub step_x: f64,
    /// Vertical pixels per data unit.
    pub step_y: f64,
    /// Maximum visible line value inside the slider window.
    pub max_value: f64,
    /// Horizontal scroll of the plot in physical pixels.
    pub scroll_offset: f64,
    /// First data index inside the window.
    pub left_index: usize,
    /// Last data index inside the window.
    pub right_index: usize,
}

/// Plot height left for data once the top and bottom margins are taken.
pub fn available_height(size: ChartSize, layout: &ChartLayout) -> f64 {
    (size.height * (1.0 - layout.top_offset_percent) - layout.bottom_offset * size.ratio).max(0.0)
}

/// Derive the frame geometry for `data` on a canvas of `size`.
pub fn compute_config(data: &ChartData, size: ChartSize, layout: &ChartLayout) -> ChartConfig {
    let len = data.x_column().map(|c| c.data.len()).unwrap_or_default();
    if len == 0 {
        return ChartConfig::default();
    }

    let slider = data.slider;
    let inner_width = size.width - 2.0 * layout.side_offset * size.ratio;
    // Index intervals, not points: the first and last point sit on the
    // window edges.
    let intervals = (len - 1) as f64;
    let window_span = slider.span() * intervals;
    let step_x = if window_span > 0.0 && inner_width > 0.0 {
        inner_width / window_span
    } else {
        0.0
    };
    let scroll_offset = step_x * intervals * slider.left() - layout.side_offset * size.ratio;

    let last = len - 1;
    let left_index = ((len as f64 * slider.left()).round() as usize).min(last);
    let right_index = ((len as f64 * slider.right()).round() as usize)
        .saturating_sub(1)
        .clamp(left_index, last);

    let max_value = data
        .line_columns()
        .filter(|c| c.alpha >= MAX_VALUE_ALPHA_MIN)
        .flat_map(|c| c.data[left_index..=right_index].iter().copied())
        .fold(0.0_f64, f64::max);

    let avail = available_height(size, layout);
    let step_y = if max_value > 0.0 {
        (avail / max_value).min(avail / ZOOM_CAP_MIN_MAX_VALUE)
    } else {
        avail / ZOOM_CAP_MIN_MAX_VALUE
    };

    ChartConfig {
        step_x,
        step_y,
        max_value,
        scroll_offset,
        left_index,
        right_index,
    }
}

/// Closure mapping `(value, index)` to its canvas position.
pub fn data_point_px(
    size: ChartSize,
    config: ChartConfig,
    layout: ChartLayout,
) -> impl Fn(f64, usize) -> PointPx {
    let baseline = size.height - layout.bottom_offset * size.ratio;
    move |value, index| PointPx {
        x: -config.scroll_offset + index as f64 * config.step_x,
        y: baseline - value * config.step_y,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::parse_dataset;
    use crate::state::SliderWindow;
    use rustc_hash::FxHashMap;

    fn data_with(values: &[(&str, &[f64], f64)], slider: SliderWindow) -> ChartData {
        let columns: Vec<String> = std::iter::once({
            let len = values[0].1.len();
            let xs: Vec<String> = (0..len).map(|i| i.to_string()).collect();
            format!("[\"x\", {}]", xs.join(", "))
        })
        .chain(values.iter().map(|(id, data, _)| {
            let cells: Vec<String> = data.iter().map(|v| v.to_string()).collect();
            format!("[\"{id}\", {}]", cells.join(", "))
        }))
        .collect();
        let types: Vec<String> = std::iter::once("\"x\": \"x\"".to_owned())
            .chain(values.iter().map(|(id, _, _)| format!("\"{id}\": \"line\"")))
            .collect();
        let colors: Vec<String> = values
            .iter()
            .map(|(id, _, _)| format!("\"{id}\": \"#000000\""))
            .collect();
        let json = format!(
            "[{{\"columns\": [{}], \"types\": {{{}}}, \"colors\": {{{}}}}}]",
            columns.join(", "),
            types.join(", "),
            colors.join(", ")
        );
        let case = parse_dataset(&json).unwrap().remove(0);
        let alphas: FxHashMap<String, f64> = values
            .iter()
            .map(|(id, _, alpha)| ((*id).to_owned(), *alpha))
            .collect();
        ChartData::from_case(&case, &alphas, slider, 0)
    }

    fn size_1000() -> ChartSize {
        // Margins zeroed so the available height is the full canvas.
        ChartSize::new(1000.0, 1000.0, 1.0)
    }

    #[test]
    fn small_maximum_hits_the_zoom_cap() {
        // Window max 5 would give 200 px per unit; the cap holds it at
        // avail / 10.
        let data = data_with(&[("y0", &[1.0, 5.0, 3.0, 2.0], 1.0)], SliderWindow::FULL);
        let config = compute_config(&data, size_1000(), &ChartLayout::ZERO);
        assert_eq!(config.max_value, 5.0);
        assert_eq!(config.step_y, 100.0);
    }

    #[test]
    fn faded_columns_do_not_drive_the_scale() {
        let data = data_with(
            &[
                ("y0", &[1.0, 5.0, 3.0, 2.0], 1.0),
                ("y1", &[0.0, 900.0, 0.0, 0.0], 0.3),
            ],
            SliderWindow::FULL,
        );
        let config = compute_config(&data, size_1000(), &ChartLayout::ZERO);
        assert_eq!(config.max_value, 5.0);
        assert_eq!(config.step_y, 100.0);
    }

    #[test]
    fn half_alpha_column_still_counts() {
        let data = data_with(
            &[
                ("y0", &[1.0, 5.0, 3.0, 2.0], 1.0),
                ("y1", &[0.0, 100.0, 0.0, 0.0], 0.5),
            ],
            SliderWindow::FULL,
        );
        let config = compute_config(&data, size_1000(), &ChartLayout::ZERO);
        assert_eq!(config.max_value, 100.0);
        assert_eq!(config.step_y, 10.0);
    }

    #[test]
    fn window_indices_cover_only_the_slider_range() {
        let values: Vec<f64> = (0..100).map(|i| i as f64).collect();
        let data = data_with(&[("y0", &values, 1.0)], SliderWindow::new(0.25, 0.5));
        let config = compute_config(&data, size_1000(), &ChartLayout::ZERO);
        assert_eq!(config.left_index, 25);
        assert_eq!(config.right_index, 49);
        assert_eq!(config.max_value, 49.0);
    }

    #[test]
    fn empty_data_yields_default_config() {
        let data = ChartData {
            columns: Default::default(),
            slider: SliderWindow::FULL,
            data_index: 0,
        };
        let config = compute_config(&data, size_1000(), &ChartLayout::ZERO);
        assert_eq!(config, ChartConfig::default());
    }

    #[test]
    fn zero_span_window_does_not_divide_by_zero() {
        let data = data_with(&[("y0", &[1.0, 2.0], 1.0)], SliderWindow::new(0.5, 0.5));
        let config = compute_config(&data, size_1000(), &ChartLayout::ZERO);
        assert_eq!(config.step_x, 0.0);
        assert!(config.step_y.is_finite());
    }

    #[test]
    fn point_projection_uses_scroll_and_baseline() {
        let data = data_with(&[("y0", &[0.0, 10.0, 5.0, 20.0], 1.0)], SliderWindow::FULL);
        let size = ChartSize::new(400.0, 200.0, 1.0);
        let config = compute_config(&data, size, &ChartLayout::ZERO);
        assert!((config.step_x - 400.0 / 3.0).abs() < 1e-9);
        let project = data_point_px(size, config, ChartLayout::ZERO);

        // First point at the left edge, last at the right edge.
        let p0 = project(0.0, 0);
        assert_eq!(p0.x, 0.0);
        assert_eq!(p0.y, 200.0);

        let p3 = project(20.0, 3);
        assert!((p3.x - 400.0).abs() < 1e-9);
        assert_eq!(p3.y, 0.0);
    }
}
