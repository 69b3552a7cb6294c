//! Tidechart widget runtime
//!
//! Hosts the chart engine behind a single [`ChartWidget`]: input events
//! in, recorded draw ops out. [`HeadlessRuntime`] drives the widget's
//! frame scheduler deterministically for tests and CLI runs.

pub mod headless;
pub mod input;
pub mod widget;

pub use headless::{HeadlessContext, HeadlessRunConfig, HeadlessRuntime};
pub use input::InputEvent;
pub use widget::{ChartWidget, WidgetOptions};
