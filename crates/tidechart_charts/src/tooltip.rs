//! Hit-testing a click to the nearest data point.

use crate::config::{data_point_px, ChartConfig, ChartLayout};
use crate::state::{ChartClick, ChartData, ChartSize};
use crate::surface::{Color, PointPx};
use crate::time_format::format_tooltip_date;

/// Only fully visible series appear in the tooltip. A fading series drops
/// out the moment its fade starts.
pub const TOOLTIP_ALPHA: f64 = 1.0;

/// One series row inside the tooltip.
#[derive(Clone, Debug, PartialEq)]
pub struct TooltipEntry {
    pub id: String,
    pub name: String,
    pub color: Color,
    pub value: f64,
    /// Canvas position of the highlighted point.
    pub point: PointPx,
}

/// Resolved tooltip for one click.
#[derive(Clone, Debug, PartialEq)]
pub struct TooltipModel {
    /// Data index the click snapped to.
    pub index: usize,
    pub title: String,
    /// X of the vertical guide line in physical pixels.
    pub line_x: f64,
    pub entries: Vec<TooltipEntry>,
}

/// Snap `click` to the nearest data index and collect the values there.
///
/// Returns `None` when the chart has no data or no horizontal scale yet.
pub fn tooltip_at(
    data: &ChartData,
    click: ChartClick,
    size: ChartSize,
    config: ChartConfig,
    layout: ChartLayout,
) -> Option<TooltipModel> {
    let x_column = data.x_column()?;
    let len = x_column.data.len();
    if len == 0 || config.step_x <= 0.0 {
        return None;
    }

    let raw = (config.scroll_offset + click.x * size.ratio) / config.step_x;
    let index = (raw.round().max(0.0) as usize).min(len - 1);

    let project = data_point_px(size, config, layout);
    let mut entries: Vec<TooltipEntry> = data
        .line_columns()
        .filter(|c| c.alpha >= TOOLTIP_ALPHA)
        .map(|c| TooltipEntry {
            id: c.id.clone(),
            name: c.name.clone(),
            color: c.color,
            value: c.data[index],
            point: project(c.data[index], index),
        })
        .collect();
    // Later series draw on top, so they lead the tooltip.
    entries.reverse();

    Some(TooltipModel {
        index,
        title: format_tooltip_date(x_column.data[index]),
        line_x: project(0.0, index).x,
        entries,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::compute_config;
    use crate::data::parse_dataset;
    use crate::state::SliderWindow;
    use rustc_hash::FxHashMap;

    fn sample_data(alpha_y1: f64) -> ChartData {
        let case = parse_dataset(
            r##"[{
                "columns": [
                    ["x", 1555718400000, 1555804800000, 1555891200000, 1555977600000],
                    ["y0", 0, 10, 5, 20],
                    ["y1", 1, 2, 3, 4]
                ],
                "types": {"x": "x", "y0": "line", "y1": "line"},
                "colors": {"y0": "#3DC23F", "y1": "#F34C44"}
            }]"##,
        )
        .unwrap()
        .remove(0);
        let mut alphas = FxHashMap::default();
        alphas.insert("y1".to_owned(), alpha_y1);
        ChartData::from_case(&case, &alphas, SliderWindow::FULL, 0)
    }

    #[test]
    fn click_snaps_to_nearest_index_round_trip() {
        let data = sample_data(1.0);
        let size = ChartSize::new(400.0, 200.0, 1.0);
        let config = compute_config(&data, size, &ChartLayout::ZERO);
        let project = data_point_px(size, config, ChartLayout::ZERO);

        // Click exactly on each point's x and expect that index back.
        for index in 0..4 {
            let x = project(0.0, index).x;
            let tip = tooltip_at(
                &data,
                ChartClick { x, y: 50.0 },
                size,
                config,
                ChartLayout::ZERO,
            )
            .unwrap();
            assert_eq!(tip.index, index);
            assert_eq!(tip.line_x, x);
        }
    }

    #[test]
    fn fading_series_is_excluded() {
        let data = sample_data(0.99);
        let size = ChartSize::new(400.0, 200.0, 1.0);
        let config = compute_config(&data, size, &ChartLayout::ZERO);
        let tip = tooltip_at(
            &data,
            ChartClick { x: 10.0, y: 10.0 },
            size,
            config,
            ChartLayout::ZERO,
        )
        .unwrap();
        assert_eq!(tip.entries.len(), 1);
        assert_eq!(tip.entries[0].id, "y0");
    }

    #[test]
    fn entries_are_listed_topmost_first() {
        let data = sample_data(1.0);
        let size = ChartSize::new(400.0, 200.0, 1.0);
        let config = compute_config(&data, size, &ChartLayout::ZERO);
        let tip = tooltip_at(
            &data,
            ChartClick { x: 0.0, y: 0.0 },
            size,
            config,
            ChartLayout::ZERO,
        )
        .unwrap();
        let ids: Vec<_> = tip.entries.iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["y1", "y0"]);
    }

    #[test]
    fn off_canvas_click_clamps_to_the_data_range() {
        let data = sample_data(1.0);
        let size = ChartSize::new(400.0, 200.0, 1.0);
        let config = compute_config(&data, size, &ChartLayout::ZERO);
        let tip = tooltip_at(
            &data,
            ChartClick { x: 9999.0, y: 0.0 },
            size,
            config,
            ChartLayout::ZERO,
        )
        .unwrap();
        assert_eq!(tip.index, 3);
    }
}
