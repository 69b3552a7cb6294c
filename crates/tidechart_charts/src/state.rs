//! Per-frame chart state.

use indexmap::IndexMap;
use rustc_hash::FxHashMap;

use crate::config::{ChartConfig, ChartLayout};
use crate::data::{Column, ColumnId, ColumnKind, DataCase};
use crate::grid::GridRow;

/// Normalized horizontal window selected by the navigation slider.
///
/// Both edges live in `[0, 1]` with `left <= right`; construction clamps
/// out-of-range input instead of failing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SliderWindow {
    left: f64,
    right: f64,
}

impl SliderWindow {
    /// The whole series.
    pub const FULL: SliderWindow = SliderWindow {
        left: 0.0,
        right: 1.0,
    };

    pub fn new(left: f64, right: f64) -> SliderWindow {
        let left = left.clamp(0.0, 1.0);
        let right = right.clamp(left, 1.0);
        SliderWindow { left, right }
    }

    pub fn left(&self) -> f64 {
        self.left
    }

    pub fn right(&self) -> f64 {
        self.right
    }

    pub fn span(&self) -> f64 {
        self.right - self.left
    }
}

impl Default for SliderWindow {
    fn default() -> Self {
        SliderWindow::FULL
    }
}

/// Canvas size in physical pixels plus the device pixel ratio.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChartSize {
    pub width: f64,
    pub height: f64,
    pub ratio: f64,
}

impl ChartSize {
    pub fn new(width: f64, height: f64, ratio: f64) -> ChartSize {
        ChartSize {
            width,
            height,
            ratio,
        }
    }
}

impl Default for ChartSize {
    fn default() -> Self {
        ChartSize::new(0.0, 0.0, 1.0)
    }
}

/// Pointer press position in logical pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChartClick {
    pub x: f64,
    pub y: f64,
}

/// A case snapshot with per-column fade alphas and slider window applied.
#[derive(Clone, Debug, Default)]
pub struct ChartData {
    pub columns: IndexMap<ColumnId, Column>,
    pub slider: SliderWindow,
    /// Which dataset case this snapshot came from. A change means a hard
    /// data cut, not a zoom.
    pub data_index: usize,
}

impl ChartData {
    /// Snapshot `case` with `alphas` applied. Columns absent from the map
    /// are fully visible.
    pub fn from_case(
        case: &DataCase,
        alphas: &FxHashMap<ColumnId, f64>,
        slider: SliderWindow,
        data_index: usize,
    ) -> ChartData {
        let columns = case
            .columns
            .iter()
            .map(|(id, column)| {
                let mut column = column.clone();
                column.alpha = alphas.get(id).copied().unwrap_or(1.0);
                (id.clone(), column)
            })
            .collect();
        ChartData {
            columns,
            slider,
            data_index,
        }
    }

    pub fn x_column(&self) -> Option<&Column> {
        self.columns.values().find(|c| c.kind == ColumnKind::X)
    }

    pub fn line_columns(&self) -> impl Iterator<Item = &Column> {
        self.columns.values().filter(|c| c.kind == ColumnKind::Line)
    }
}

/// Everything the renderer needs for one frame.
#[derive(Clone, Debug)]
pub struct ChartFrame {
    pub data: ChartData,
    pub size: ChartSize,
    pub layout: ChartLayout,
    pub config: ChartConfig,
    pub grid: Vec<GridRow>,
    pub dark: bool,
    pub click: Option<ChartClick>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slider_clamps_and_orders_edges() {
        let w = SliderWindow::new(-0.5, 1.5);
        assert_eq!((w.left(), w.right()), (0.0, 1.0));

        let w = SliderWindow::new(0.8, 0.3);
        assert_eq!((w.left(), w.right()), (0.8, 0.8));
        assert_eq!(w.span(), 0.0);
    }

    #[test]
    fn missing_alpha_defaults_to_fully_visible() {
        let case = crate::data::parse_dataset(
            r##"[{
                "columns": [["x", 1, 2], ["y0", 3, 4]],
                "types": {"x": "x", "y0": "line"},
                "colors": {"y0": "#000000"}
            }]"##,
        )
        .unwrap()
        .remove(0);

        let mut alphas = FxHashMap::default();
        alphas.insert("y0".to_owned(), 0.25);
        let data = ChartData::from_case(&case, &alphas, SliderWindow::FULL, 0);
        assert_eq!(data.columns["y0"].alpha, 0.25);
        assert_eq!(data.columns["x"].alpha, 1.0);

        let data = ChartData::from_case(&case, &FxHashMap::default(), SliderWindow::FULL, 0);
        assert_eq!(data.columns["y0"].alpha, 1.0);
    }
}
