//! Input events accepted by the chart widget.

use tidechart_charts::Dataset;

/// One user or host action, dispatched through
/// [`ChartWidget::dispatch`](crate::widget::ChartWidget::dispatch).
#[derive(Clone, Debug)]
pub enum InputEvent {
    /// Replace the loaded dataset. Case selection stays where it was.
    DatasetLoaded(Dataset),
    /// Switch to another case of the loaded dataset.
    SelectCase(usize),
    /// Host viewport changed, logical pixels. `paddings` is the total
    /// horizontal container padding subtracted from the width. Only
    /// width and padding changes reach the chart pipelines.
    Resize {
        width: f64,
        height: f64,
        paddings: f64,
    },
    /// Navigation slider moved, both edges normalized to `[0, 1]`.
    SliderMoved { left: f64, right: f64 },
    /// Fade a series in or out via the legend.
    ToggleColumn { id: String, visible: bool },
    ToggleTheme,
    /// Pointer press on the main chart, logical pixels.
    Click { x: f64, y: f64 },
    /// Dismiss the tooltip.
    ClearClick,
}
