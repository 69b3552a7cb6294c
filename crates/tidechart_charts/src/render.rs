//! Frame renderer: draws a [`ChartFrame`] onto a [`DrawSurface`].
//!
//! Draw order is background, grid lines, series polylines, grid labels,
//! timeline labels, tooltip. Labels draw above the lines so a dense chart
//! never buries its axis.

use crate::config::{available_height, data_point_px};
use crate::grid::GridRow;
use crate::state::ChartFrame;
use crate::surface::{DrawSurface, PointPx, RectPx, Stroke};
use crate::theme::ChartTheme;
use crate::tooltip::tooltip_at;

/// Data points drawn beyond each edge of the window so lines enter and
/// leave the canvas without visible clipping.
pub const CULL_MARGIN: usize = 2;

/// Logical pixels one timeline label is assumed to occupy.
pub const TIMELINE_LABEL_WIDTH: f64 = 100.0;

const GRID_LABEL_SIZE: f64 = 12.0;
const TOOLTIP_MARKER_RADIUS: f64 = 5.0;

/// Which layers to draw. The main chart draws everything; the navigation
/// strip draws lines only.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderOptions {
    pub with_grid: bool,
    pub with_timeline: bool,
    pub with_tooltip: bool,
    /// Line stroke width in logical pixels.
    pub line_width: f64,
}

impl Default for RenderOptions {
    fn default() -> Self {
        RenderOptions {
            with_grid: true,
            with_timeline: true,
            with_tooltip: true,
            line_width: 2.0,
        }
    }
}

impl RenderOptions {
    /// Bare polylines, as the navigation strip renders.
    pub fn lines_only() -> RenderOptions {
        RenderOptions {
            with_grid: false,
            with_timeline: false,
            with_tooltip: false,
            line_width: 1.0,
        }
    }
}

/// Draw one complete frame.
pub fn render_chart(surface: &mut dyn DrawSurface, frame: &ChartFrame, opts: &RenderOptions) {
    let theme = ChartTheme { dark: frame.dark };
    let palette = theme.palette();
    surface.clear(palette.background);

    let size = frame.size;
    let layout = frame.layout;
    let ratio = size.ratio;
    let baseline = size.height - layout.bottom_offset * ratio;
    let inset = layout.side_offset * ratio;

    if opts.with_grid {
        let mut grid_line = |surface: &mut dyn DrawSurface, level: f64, alpha: f64| {
            if alpha <= 0.0 {
                return;
            }
            let y = baseline - level;
            surface.line(
                PointPx::new(inset, y),
                PointPx::new(size.width - inset, y),
                palette.grid_line.with_alpha(palette.grid_line.a * alpha as f32),
                Stroke { width: ratio },
            );
        };
        for row in &frame.grid {
            match row {
                GridRow::Settled { level, alpha, .. } => grid_line(surface, *level, *alpha),
                GridRow::Transitioning { entering, leaving } => {
                    grid_line(surface, leaving.level, leaving.alpha);
                    grid_line(surface, entering.level, entering.alpha);
                }
            }
        }
    }

    let config = frame.config;
    let project = data_point_px(size, config, layout);
    let len = frame
        .data
        .x_column()
        .map(|c| c.data.len())
        .unwrap_or_default();
    if len > 0 {
        let from = config.left_index.saturating_sub(CULL_MARGIN);
        let to = (config.right_index + CULL_MARGIN).min(len - 1);
        for column in frame.data.line_columns() {
            if column.alpha <= 0.0 {
                continue;
            }
            let points: Vec<PointPx> = column.data[from..=to]
                .iter()
                .enumerate()
                .map(|(offset, &value)| project(value, from + offset))
                .collect();
            surface.stroke_polyline(
                &points,
                column.color.with_alpha(column.color.a * column.alpha as f32),
                Stroke {
                    width: opts.line_width * ratio,
                },
            );
        }
    }

    if opts.with_grid {
        let mut grid_label =
            |surface: &mut dyn DrawSurface, level: f64, label: &str, alpha: f64| {
                if alpha <= 0.0 {
                    return;
                }
                surface.text(
                    PointPx::new(inset, baseline - level - 5.0 * ratio),
                    label,
                    palette.label_text.with_alpha(palette.label_text.a * alpha as f32),
                    GRID_LABEL_SIZE * ratio,
                );
            };
        for row in &frame.grid {
            match row {
                GridRow::Settled { level, label, alpha, .. } => {
                    grid_label(surface, *level, label, *alpha)
                }
                GridRow::Transitioning { entering, leaving } => {
                    grid_label(surface, leaving.level, &leaving.label, leaving.alpha);
                    grid_label(surface, entering.level, &entering.label, entering.alpha);
                }
            }
        }
    }

    if opts.with_timeline && len > 0 && config.step_x > 0.0 {
        draw_timeline(surface, frame, len);
    }

    if opts.with_tooltip {
        if let Some(click) = frame.click {
            if let Some(tip) = tooltip_at(&frame.data, click, size, config, layout) {
                draw_tooltip(surface, frame, &tip);
            }
        }
    }
}

/// Adaptive date axis: label every `stride`-th point at full strength and
/// fade the midpoints in as the window widens, where `stride` is the
/// smallest power of two fitting the labels side by side.
fn draw_timeline(surface: &mut dyn DrawSurface, frame: &ChartFrame, len: usize) {
    let theme = ChartTheme { dark: frame.dark };
    let palette = theme.palette();
    let size = frame.size;
    let config = frame.config;
    let ratio = size.ratio;
    let layout = frame.layout;

    let x_column = match frame.data.x_column() {
        Some(c) => c,
        None => return,
    };

    let inner_width = size.width - 2.0 * layout.side_offset * ratio;
    let best = (inner_width / (TIMELINE_LABEL_WIDTH * ratio)).floor().max(1.0);
    let visible = (config.right_index - config.left_index + 1) as f64;
    let raw = visible / best;
    let mut stride: usize = 1;
    while (stride as f64) < raw {
        stride *= 2;
    }
    let mid_alpha = ((stride as f64 / raw) - 1.0).clamp(0.0, 1.0);

    let project = data_point_px(size, config, layout);
    let from = config.left_index.saturating_sub(CULL_MARGIN * stride);
    let to = (config.right_index + CULL_MARGIN * stride).min(len - 1);
    let label_y = size.height - 5.0 * ratio;
    for index in from..=to {
        let alpha = if index % stride == 0 {
            1.0
        } else if stride >= 2 && index % stride == stride / 2 {
            mid_alpha
        } else {
            continue;
        };
        if alpha <= 0.0 {
            continue;
        }
        surface.text(
            PointPx::new(project(0.0, index).x, label_y),
            &crate::time_format::format_axis_date(x_column.data[index]),
            palette.label_text.with_alpha(palette.label_text.a * alpha as f32),
            GRID_LABEL_SIZE * ratio,
        );
    }
}

fn draw_tooltip(
    surface: &mut dyn DrawSurface,
    frame: &ChartFrame,
    tip: &crate::tooltip::TooltipModel,
) {
    let theme = ChartTheme { dark: frame.dark };
    let palette = theme.palette();
    let size = frame.size;
    let ratio = size.ratio;
    let layout = frame.layout;
    let baseline = size.height - layout.bottom_offset * ratio;
    let avail = available_height(size, &layout);

    surface.line(
        PointPx::new(tip.line_x, baseline - avail),
        PointPx::new(tip.line_x, baseline),
        palette.guide_line,
        Stroke { width: ratio },
    );

    for entry in &tip.entries {
        surface.fill_circle(entry.point, TOOLTIP_MARKER_RADIUS * ratio, entry.color);
        surface.fill_circle(
            entry.point,
            (TOOLTIP_MARKER_RADIUS - 2.0) * ratio,
            palette.background,
        );
    }

    let box_w = 140.0 * ratio;
    let box_h = (30.0 + 20.0 * tip.entries.len() as f64) * ratio;
    let box_x = (tip.line_x - box_w / 2.0).clamp(0.0, (size.width - box_w).max(0.0));
    let box_y = 10.0 * ratio;
    surface.fill_rect(RectPx::new(box_x, box_y, box_w, box_h), palette.tooltip_bg);
    surface.text(
        PointPx::new(box_x + 10.0 * ratio, box_y + 18.0 * ratio),
        &tip.title,
        palette.tooltip_text,
        13.0 * ratio,
    );
    for (slot, entry) in tip.entries.iter().enumerate() {
        surface.text(
            PointPx::new(
                box_x + 10.0 * ratio,
                box_y + (38.0 + 20.0 * slot as f64) * ratio,
            ),
            &format!("{}: {}", entry.name, entry.value),
            entry.color,
            12.0 * ratio,
        );
    }
}
