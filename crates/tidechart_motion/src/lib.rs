//! Tidechart animation system
//!
//! Frame-driven animation primitives for the chart engine:
//!
//! - **Easing**: the curve vocabulary used by transitions
//! - **Scheduler**: a cancellable "next display refresh" callback
//!   abstraction with a deterministic manual implementation
//! - **ScalarTransition**: the fixed-step interpolator with
//!   cancel-and-retarget semantics the zoom animation relies on

pub mod easing;
pub mod scheduler;
pub mod transition;

pub use easing::Easing;
pub use scheduler::{run_frame, FrameCallback, FrameHandle, FrameScheduler, ManualFrames, SharedScheduler};
pub use transition::{ScalarTransition, DEFAULT_TRANSITION_STEPS};
