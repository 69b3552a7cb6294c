//! Frame-callback scheduling.
//!
//! The transition engine needs exactly one primitive from its platform:
//! "run this once on the next display refresh, unless cancelled first".
//! [`FrameScheduler`] is that contract; [`ManualFrames`] is the provided
//! implementation, with refresh ticks driven explicitly (headless runtime,
//! tests). Any event loop with an equivalent cancellable one-shot timer
//! can implement the trait instead.

use std::cell::RefCell;
use std::rc::Rc;

use slotmap::{new_key_type, SlotMap};

new_key_type! {
    /// Handle for one pending frame callback.
    pub struct FrameHandle;
}

pub type FrameCallback = Box<dyn FnOnce()>;

/// A cancellable one-shot frame-callback scheduler.
pub trait FrameScheduler {
    /// Schedule `callback` for the next frame.
    fn schedule(&mut self, callback: FrameCallback) -> FrameHandle;

    /// Cancel a pending callback. A cancelled callback never fires.
    /// Returns `false` when the handle is unknown or already ran.
    fn cancel(&mut self, handle: FrameHandle) -> bool;

    /// Number of callbacks currently pending.
    fn pending(&self) -> usize;
}

/// Shared scheduler handle as consumed by combinators.
pub type SharedScheduler = Rc<RefCell<dyn FrameScheduler>>;

/// Deterministic scheduler: callbacks pend until [`run_frame`] is called
/// and run in the order they were scheduled.
#[derive(Default)]
pub struct ManualFrames {
    queue: SlotMap<FrameHandle, FrameCallback>,
    // Schedule order; slotmap key iteration is not FIFO once slots are
    // reused.
    order: Vec<FrameHandle>,
}

impl ManualFrames {
    pub fn new() -> Self {
        Self::default()
    }

    fn take_all(&mut self) -> Vec<FrameCallback> {
        std::mem::take(&mut self.order)
            .into_iter()
            .filter_map(|k| self.queue.remove(k))
            .collect()
    }
}

impl FrameScheduler for ManualFrames {
    fn schedule(&mut self, callback: FrameCallback) -> FrameHandle {
        let handle = self.queue.insert(callback);
        self.order.push(handle);
        handle
    }

    fn cancel(&mut self, handle: FrameHandle) -> bool {
        let cancelled = self.queue.remove(handle).is_some();
        if cancelled {
            self.order.retain(|k| *k != handle);
        }
        cancelled
    }

    fn pending(&self) -> usize {
        self.queue.len()
    }
}

/// Run one display-refresh tick: drain and invoke every callback pending
/// at tick start. Callbacks scheduled *during* the tick (a transition
/// scheduling its next step) run on the next tick, giving the
/// one-callback-per-frame cadence transitions assume.
///
/// Returns the number of callbacks that ran.
pub fn run_frame(scheduler: &Rc<RefCell<ManualFrames>>) -> usize {
    let callbacks = scheduler.borrow_mut().take_all();
    let ran = callbacks.len();
    for callback in callbacks {
        callback();
    }
    tracing::trace!(ran, "frame tick");
    ran
}
