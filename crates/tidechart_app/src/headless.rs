//! Deterministic headless execution of a chart widget.

use anyhow::{bail, Result};

use crate::input::InputEvent;
use crate::widget::ChartWidget;

/// Configuration for a headless frame loop.
#[derive(Debug, Clone, Copy)]
pub struct HeadlessRunConfig {
    /// Logical viewport width.
    pub width: f64,
    /// Logical viewport height.
    pub height: f64,
    /// Horizontal container padding subtracted from the width.
    pub paddings: f64,
    /// Frame budget; the loop stops earlier once no callbacks pend.
    pub max_frames: u32,
}

impl Default for HeadlessRunConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 600.0,
            paddings: 0.0,
            max_frames: 240,
        }
    }
}

/// Frame context passed to the per-frame callback.
#[derive(Debug, Clone, Copy)]
pub struct HeadlessContext {
    pub frame_index: u32,
    /// Callbacks run on this tick.
    pub ran: usize,
    /// Callbacks left pending after this tick.
    pub pending: usize,
}

/// Deterministic frame loop driving a widget's scheduler.
pub struct HeadlessRuntime;

impl HeadlessRuntime {
    /// Dispatch the initial resize, then tick the widget until it goes
    /// idle or the frame budget runs out.
    pub fn run<F>(widget: &ChartWidget, cfg: HeadlessRunConfig, mut on_frame: F) -> Result<u32>
    where
        F: FnMut(&HeadlessContext),
    {
        if cfg.width <= 0.0 || cfg.height <= 0.0 {
            bail!("headless dimensions must be positive");
        }
        if cfg.paddings < 0.0 || cfg.paddings >= cfg.width {
            bail!("headless paddings must fit inside the width");
        }
        if cfg.max_frames == 0 {
            bail!("headless max_frames must be > 0");
        }

        widget.dispatch(InputEvent::Resize {
            width: cfg.width,
            height: cfg.height,
            paddings: cfg.paddings,
        });

        let mut frames_run = 0;
        for frame_index in 0..cfg.max_frames {
            let ran = widget.run_frame();
            let pending = widget.pending_frames();
            frames_run = frame_index + 1;
            on_frame(&HeadlessContext {
                frame_index,
                ran,
                pending,
            });
            if pending == 0 {
                break;
            }
        }
        tracing::debug!(frames_run, "headless run finished");
        Ok(frames_run)
    }
}
