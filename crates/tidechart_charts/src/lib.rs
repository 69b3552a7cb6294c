//! Tidechart chart engine
//!
//! Everything between raw dataset JSON and draw calls:
//!
//! - **data**: the column-major dataset model and its parser
//! - **state / config**: per-frame chart state and geometry derivation
//! - **grid**: horizontal grid rows with split/collapse zoom behavior
//! - **transition**: the animated vertical-scale channel combinator
//! - **tooltip / theme / format**: click hit-testing, palettes, labels
//! - **render / surface**: the frame renderer and its drawing target

pub mod config;
pub mod data;
pub mod format;
pub mod grid;
pub mod render;
pub mod state;
pub mod surface;
pub mod theme;
pub mod time_format;
pub mod tooltip;
pub mod transition;

pub use config::{available_height, compute_config, data_point_px, ChartConfig, ChartLayout};
pub use data::{parse_dataset, Column, ColumnId, ColumnKind, DataCase, Dataset, DatasetError};
pub use grid::{collapse, settled_rows, transitioning_rows, zoom_phase, GridRow, RowHalf, ZoomPhase};
pub use render::{render_chart, RenderOptions};
pub use state::{ChartClick, ChartData, ChartFrame, ChartSize, SliderWindow};
pub use surface::{Color, DrawOp, DrawSurface, PointPx, Recording, RectPx, Stroke};
pub use theme::{ChartTheme, Palette};
pub use tooltip::{tooltip_at, TooltipEntry, TooltipModel};
pub use transition::{with_scale_transition, IgnorePredicate, TransitionOptions};
