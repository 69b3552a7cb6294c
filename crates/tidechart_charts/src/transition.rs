//! Animated vertical-scale transitions over a chart frame channel.
//!
//! [`with_scale_transition`] wraps an `Observable<ChartFrame>`: whenever
//! the upstream `step_y` scale changes, the output channel replays the
//! frame once per display refresh with an interpolated scale and a
//! splitting grid, landing on the upstream frame exactly. Frames whose
//! scale did not change, frames from a different dataset case, and frames
//! matched by `ignore_if` pass through untouched.

use std::cell::RefCell;
use std::rc::Rc;

use tidechart_flow::Observable;
use tidechart_motion::{
    Easing, FrameHandle, ScalarTransition, SharedScheduler, DEFAULT_TRANSITION_STEPS,
};

use crate::config::available_height;
use crate::grid::{collapse, transitioning_rows, zoom_phase};
use crate::state::ChartFrame;

/// Predicate deciding whether a frame should skip animation entirely.
/// Receives the incoming frame and the most recently emitted one.
pub type IgnorePredicate = Rc<dyn Fn(&ChartFrame, Option<&ChartFrame>) -> bool>;

#[derive(Clone)]
pub struct TransitionOptions {
    pub steps: u32,
    /// Use ease-in instead of ease-out when the scale shrinks, so zooming
    /// out starts gently.
    pub invert_ease: bool,
    pub ignore_if: Option<IgnorePredicate>,
}

impl Default for TransitionOptions {
    fn default() -> Self {
        TransitionOptions {
            steps: DEFAULT_TRANSITION_STEPS,
            invert_ease: false,
            ignore_if: None,
        }
    }
}

struct InFlight {
    transition: ScalarTransition,
    handle: FrameHandle,
    /// Maximum the leaving grid rows are labeled with.
    init_max: f64,
}

struct State {
    in_flight: Option<InFlight>,
    /// Latest upstream frame, the animation target.
    base: Option<ChartFrame>,
    last_emitted: Option<ChartFrame>,
}

/// Derive a channel animating every scale change of `source`.
///
/// One frame callback is pending at a time; a retargeted transition
/// cancels its pending step and continues from the scale it had reached.
pub fn with_scale_transition(
    source: &Observable<ChartFrame>,
    scheduler: SharedScheduler,
    opts: TransitionOptions,
) -> Observable<ChartFrame> {
    let out = Observable::new("scale_transition");
    let state = Rc::new(RefCell::new(State {
        in_flight: None,
        base: None,
        last_emitted: None,
    }));

    let sink = out.clone();
    source.subscribe(move |next: &ChartFrame, _| {
        enum Action {
            PassThrough,
            Merge(ChartFrame),
            Start,
        }

        let action = {
            let mut st = state.borrow_mut();
            let target = next.config.step_y;

            let data_cut = st
                .last_emitted
                .as_ref()
                .map_or(true, |f| f.data.data_index != next.data.data_index);
            let ignored = opts
                .ignore_if
                .as_ref()
                .is_some_and(|pred| pred(next, st.last_emitted.as_ref()));

            if data_cut || ignored {
                if let Some(in_flight) = st.in_flight.take() {
                    scheduler.borrow_mut().cancel(in_flight.handle);
                }
                st.base = Some(next.clone());
                st.last_emitted = Some(next.clone());
                Action::PassThrough
            } else if let Some((running, init_max)) = st
                .in_flight
                .as_ref()
                .map(|f| (f.transition, f.init_max))
            {
                if running.target() == target {
                    // Same destination, fresher data. Adopt the new base
                    // and re-emit at the current interpolated scale
                    // without restarting the animation.
                    st.base = Some(next.clone());
                    let frame = frame_at(next, &running, init_max);
                    st.last_emitted = Some(frame.clone());
                    Action::Merge(frame)
                } else {
                    // What was entering becomes the leaving scale.
                    let old_max = st
                        .base
                        .as_ref()
                        .map(|f| f.config.max_value)
                        .unwrap_or(init_max);
                    if let Some(in_flight) = st.in_flight.as_mut() {
                        scheduler.borrow_mut().cancel(in_flight.handle);
                        let current = in_flight.transition.value();
                        in_flight
                            .transition
                            .retarget(target, pick_easing(&opts, current, target));
                        in_flight.init_max = old_max;
                    }
                    st.base = Some(next.clone());
                    Action::Start
                }
            } else {
                let last_scale = st
                    .last_emitted
                    .as_ref()
                    .map(|f| f.config.step_y)
                    .unwrap_or(target);
                if last_scale == target {
                    st.base = Some(next.clone());
                    st.last_emitted = Some(next.clone());
                    Action::PassThrough
                } else {
                    let init_max = st
                        .base
                        .as_ref()
                        .map(|f| f.config.max_value)
                        .unwrap_or_default();
                    st.in_flight = Some(InFlight {
                        transition: ScalarTransition::new(
                            last_scale,
                            target,
                            opts.steps,
                            pick_easing(&opts, last_scale, target),
                        ),
                        handle: FrameHandle::default(),
                        init_max,
                    });
                    st.base = Some(next.clone());
                    Action::Start
                }
            }
        };

        match action {
            Action::PassThrough => sink.broadcast(next.clone()),
            Action::Merge(frame) => sink.broadcast(frame),
            Action::Start => {
                let handle = schedule_step(&state, &scheduler, &sink);
                if let Some(in_flight) = state.borrow_mut().in_flight.as_mut() {
                    in_flight.handle = handle;
                }
            }
        }
    });

    out
}

fn pick_easing(opts: &TransitionOptions, from: f64, to: f64) -> Easing {
    if opts.invert_ease && to < from {
        Easing::EaseIn
    } else {
        Easing::EaseOut
    }
}

/// The base frame re-scaled to the transition's current value, grid split
/// accordingly.
fn frame_at(base: &ChartFrame, transition: &ScalarTransition, init_max: f64) -> ChartFrame {
    let mut frame = base.clone();
    let current = transition.value();
    frame.config.step_y = current;
    let avail = available_height(frame.size, &frame.layout);
    let rows = transitioning_rows(
        init_max,
        frame.config.max_value,
        zoom_phase(current, transition.init(), transition.target()),
        avail,
    );
    // On the final step every entering half sits at its resting level, so
    // collapsing lands the rows settled at the target scale.
    frame.grid = if transition.is_done() {
        collapse(&rows)
    } else {
        rows
    };
    frame
}

fn schedule_step(
    state: &Rc<RefCell<State>>,
    scheduler: &SharedScheduler,
    out: &Observable<ChartFrame>,
) -> FrameHandle {
    let state = state.clone();
    let sch = scheduler.clone();
    let sink = out.clone();
    scheduler
        .borrow_mut()
        .schedule(Box::new(move || run_step(&state, &sch, &sink)))
}

fn run_step(state: &Rc<RefCell<State>>, scheduler: &SharedScheduler, out: &Observable<ChartFrame>) {
    let frame = {
        let mut st = state.borrow_mut();
        let Some(in_flight) = st.in_flight.as_mut() else {
            return;
        };
        in_flight.transition.advance();
        let transition = in_flight.transition;
        let init_max = in_flight.init_max;
        let Some(base) = st.base.as_ref() else {
            return;
        };
        let frame = frame_at(base, &transition, init_max);
        st.last_emitted = Some(frame.clone());
        if transition.is_done() {
            st.in_flight = None;
        }
        frame
    };
    out.broadcast(frame);

    let still_running = state.borrow().in_flight.is_some();
    if still_running {
        let handle = schedule_step(state, scheduler, out);
        if let Some(in_flight) = state.borrow_mut().in_flight.as_mut() {
            in_flight.handle = handle;
        }
    }
}
