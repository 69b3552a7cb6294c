//! Tidechart CLI - load a dataset, drive the widget headlessly, and
//! report what each frame drew.

use std::fs;
use std::path::PathBuf;

use anyhow::{ensure, Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use tidechart_app::{ChartWidget, HeadlessRunConfig, HeadlessRuntime, InputEvent, WidgetOptions};
use tidechart_charts::parse_dataset;

/// Headless runner for tidechart datasets
#[derive(Parser, Debug)]
#[command(name = "tidechart")]
#[command(about = "Render a chart dataset headlessly and report the frames")]
#[command(version)]
struct Args {
    /// Dataset JSON file (column-major cases)
    data: PathBuf,

    /// Dataset case to display
    #[arg(long, default_value_t = 0)]
    case: usize,

    /// Viewport width in logical pixels
    #[arg(long, default_value_t = 800.0)]
    width: f64,

    /// Viewport height in logical pixels
    #[arg(long, default_value_t = 600.0)]
    height: f64,

    /// Horizontal container padding subtracted from the width
    #[arg(long, default_value_t = 0.0)]
    paddings: f64,

    /// Device pixel ratio
    #[arg(long, default_value_t = 1.0)]
    ratio: f64,

    /// Frame budget for the headless run
    #[arg(long, default_value_t = 240)]
    frames: u32,

    /// Start in the dark theme
    #[arg(long)]
    dark: bool,

    /// Slider window as "left:right", both in [0, 1]
    #[arg(long)]
    slider: Option<String>,

    /// Series ids to hide, repeatable
    #[arg(long = "hide")]
    hide: Vec<String>,
}

fn parse_slider(spec: &str) -> Result<(f64, f64)> {
    let (left, right) = spec
        .split_once(':')
        .with_context(|| format!("slider spec {spec:?} is not \"left:right\""))?;
    let left: f64 = left
        .parse()
        .with_context(|| format!("bad slider left edge {left:?}"))?;
    let right: f64 = right
        .parse()
        .with_context(|| format!("bad slider right edge {right:?}"))?;
    ensure!(
        (0.0..=1.0).contains(&left) && (0.0..=1.0).contains(&right) && left <= right,
        "slider window {spec:?} must satisfy 0 <= left <= right <= 1"
    );
    Ok((left, right))
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let args = Args::parse();

    let json = fs::read_to_string(&args.data)
        .with_context(|| format!("reading dataset {}", args.data.display()))?;
    let dataset = parse_dataset(&json)?;
    ensure!(
        args.case < dataset.len(),
        "case {} out of range, dataset has {} cases",
        args.case,
        dataset.len()
    );
    tracing::info!(
        cases = dataset.len(),
        case = args.case,
        "dataset loaded from {}",
        args.data.display()
    );

    let widget = ChartWidget::new(WidgetOptions {
        device_ratio: args.ratio,
        ..WidgetOptions::default()
    });
    widget.dispatch(InputEvent::DatasetLoaded(dataset));
    if args.case > 0 {
        widget.dispatch(InputEvent::SelectCase(args.case));
    }
    if args.dark {
        widget.dispatch(InputEvent::ToggleTheme);
    }
    if let Some(spec) = &args.slider {
        let (left, right) = parse_slider(spec)?;
        widget.dispatch(InputEvent::SliderMoved { left, right });
    }
    for id in &args.hide {
        widget.dispatch(InputEvent::ToggleColumn {
            id: id.clone(),
            visible: false,
        });
    }

    let frames_run = HeadlessRuntime::run(
        &widget,
        HeadlessRunConfig {
            width: args.width,
            height: args.height,
            paddings: args.paddings,
            max_frames: args.frames,
        },
        |ctx| {
            tracing::debug!(
                frame = ctx.frame_index,
                ran = ctx.ran,
                pending = ctx.pending,
                "tick"
            );
        },
    )?;

    let main_ops = widget.main_ops().borrow().ops.len();
    let nav_ops = widget.nav_ops().borrow().ops.len();
    tracing::info!(frames_run, main_ops, nav_ops, "headless run complete");
    if let Some(frame) = widget.last_frame() {
        tracing::info!(
            max_value = frame.config.max_value,
            step_y = frame.config.step_y,
            rows = frame.grid.len(),
            "final frame"
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn slider_spec_parses_and_validates() {
        assert_eq!(parse_slider("0.25:0.5").unwrap(), (0.25, 0.5));
        assert!(parse_slider("0.5").is_err());
        assert!(parse_slider("0.8:0.2").is_err());
        assert!(parse_slider("-1:0.5").is_err());
    }
}
