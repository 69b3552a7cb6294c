//! The chart widget: channel graph wiring, input dispatch, and series
//! fade animations.
//!
//! Construction builds the whole reactive graph once. Input events are
//! broadcast into the source channels; the derived channels recompute
//! geometry, the scale-transition combinator animates, and the terminal
//! subscribers re-record the main chart and navigation strip draw ops.

use std::cell::RefCell;
use std::rc::Rc;

use rustc_hash::FxHashMap;
use tidechart_charts::{
    available_height, compute_config, render_chart, settled_rows, with_scale_transition,
    ChartClick, ChartData, ChartFrame, ChartLayout, ChartSize, DataCase, Dataset, Recording,
    RenderOptions, SliderWindow, TransitionOptions,
};
use tidechart_flow::{merge2, merge3, merge4, MapOptions, Observable};
use tidechart_motion::{
    run_frame as run_scheduler_frame, Easing, FrameHandle, FrameScheduler, ManualFrames,
    ScalarTransition, SharedScheduler, DEFAULT_TRANSITION_STEPS,
};

use crate::input::InputEvent;

/// Widget construction parameters.
#[derive(Clone, Copy, Debug)]
pub struct WidgetOptions {
    pub device_ratio: f64,
    /// Main chart height in logical pixels.
    pub main_height: f64,
    /// Navigation strip height in logical pixels.
    pub nav_height: f64,
    pub layout: ChartLayout,
    /// Step count for scale and fade animations.
    pub steps: u32,
}

impl Default for WidgetOptions {
    fn default() -> Self {
        WidgetOptions {
            device_ratio: 1.0,
            main_height: 400.0,
            nav_height: 60.0,
            layout: ChartLayout::default(),
            steps: DEFAULT_TRANSITION_STEPS,
        }
    }
}

type AlphaMap = FxHashMap<String, f64>;

/// Host viewport in logical pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
struct Viewport {
    width: f64,
    height: f64,
    paddings: f64,
}

#[derive(Clone, Debug, Default)]
struct SourceCase {
    case: DataCase,
    index: usize,
}

struct Fade {
    transition: ScalarTransition,
    handle: FrameHandle,
}

type FadeMap = Rc<RefCell<FxHashMap<String, Fade>>>;

/// An interactive time-series chart with a navigation strip.
pub struct ChartWidget {
    options: WidgetOptions,
    frames: Rc<RefCell<ManualFrames>>,
    dataset: Observable<Rc<Dataset>>,
    select: Observable<usize>,
    viewport: Observable<Viewport>,
    slider: Observable<SliderWindow>,
    alphas: Observable<AlphaMap>,
    theme: Observable<bool>,
    click: Observable<Option<ChartClick>>,
    fades: FadeMap,
    main_ops: Rc<RefCell<Recording>>,
    nav_ops: Rc<RefCell<Recording>>,
    last_frame: Rc<RefCell<Option<ChartFrame>>>,
    renders: Rc<RefCell<u64>>,
}

impl ChartWidget {
    pub fn new(options: WidgetOptions) -> ChartWidget {
        let frames = Rc::new(RefCell::new(ManualFrames::new()));
        let shared: SharedScheduler = frames.clone();

        let dataset: Observable<Rc<Dataset>> = Observable::new("dataset");
        let select = Observable::new("select").with_initial_event(0usize);
        let viewport: Observable<Viewport> = Observable::new("viewport");
        let slider = Observable::new("slider").with_initial_event(SliderWindow::FULL);
        let alphas = Observable::new("alphas").with_initial_event(AlphaMap::default());
        let theme = Observable::new("theme").with_initial_event(false);
        let click: Observable<Option<ChartClick>> = Observable::new_transient("click");

        // Height changes never alter chart geometry (chart heights are
        // fixed by options), so only width and paddings pass through.
        let width_changed = viewport.filter(
            |v: &Viewport, prev| {
                prev.map_or(true, |p| p.width != v.width || p.paddings != v.paddings)
            },
            MapOptions::default(),
        );
        let ratio = options.device_ratio;
        let main_height = options.main_height;
        let nav_height = options.nav_height;
        let main_size = width_changed
            .map(
                move |v, _| ChartSize::new((v.width - v.paddings) * ratio, main_height * ratio, ratio),
                MapOptions::inherit(),
            )
            .named("main_size");
        let nav_size = width_changed
            .map(
                move |v, _| ChartSize::new((v.width - v.paddings) * ratio, nav_height * ratio, ratio),
                MapOptions::inherit(),
            )
            .named("nav_size");

        let source_case = merge2(&dataset, &select)
            .filter(
                |(d, s), _| match (d, s) {
                    (Some(d), Some(s)) => *s < d.len(),
                    _ => false,
                },
                MapOptions::default(),
            )
            .map(
                |(d, s), _| {
                    let (Some(d), Some(s)) = (d, s) else {
                        return SourceCase::default();
                    };
                    SourceCase {
                        case: d[*s].clone(),
                        index: *s,
                    }
                },
                MapOptions::default(),
            )
            .named("case");

        let chart_data = merge3(&source_case, &slider, &alphas)
            .filter(|(c, _, _), _| c.is_some(), MapOptions::default())
            .map(
                |(c, s, a), _| {
                    let source = c.clone().unwrap_or_default();
                    let window = s.unwrap_or(SliderWindow::FULL);
                    let alphas = a.clone().unwrap_or_default();
                    ChartData::from_case(&source.case, &alphas, window, source.index)
                },
                MapOptions::default(),
            )
            .named("chart_data");

        let layout = options.layout;
        let main_frame = merge4(&chart_data, &main_size, &theme, &click)
            .filter(
                |(d, s, _, _), _| d.is_some() && s.is_some(),
                MapOptions::default(),
            )
            .map(
                move |(d, s, dark, click), _| {
                    let data = d.clone().unwrap_or_default();
                    let size = s.unwrap_or_default();
                    let config = compute_config(&data, size, &layout);
                    let grid = settled_rows(config.max_value, available_height(size, &layout));
                    ChartFrame {
                        data,
                        size,
                        layout,
                        config,
                        grid,
                        dark: dark.unwrap_or(false),
                        click: (*click).flatten(),
                    }
                },
                MapOptions::default(),
            )
            .named("main_frame");

        // Scale changes animate unless no series is fully visible.
        let animated = with_scale_transition(
            &main_frame,
            shared,
            TransitionOptions {
                steps: options.steps,
                invert_ease: true,
                ignore_if: Some(Rc::new(|next: &ChartFrame, _| {
                    next.data.line_columns().all(|c| c.alpha < 1.0)
                })),
            },
        );

        let main_ops = Rc::new(RefCell::new(Recording::new()));
        let last_frame: Rc<RefCell<Option<ChartFrame>>> = Rc::new(RefCell::new(None));
        let renders = Rc::new(RefCell::new(0u64));
        {
            let ops = main_ops.clone();
            let last = last_frame.clone();
            let renders = renders.clone();
            animated.subscribe(move |frame: &ChartFrame, _| {
                let mut rec = ops.borrow_mut();
                rec.clear_ops();
                render_chart(&mut *rec, frame, &RenderOptions::default());
                tracing::trace!(ops = rec.ops.len(), "main chart rendered");
                drop(rec);
                *last.borrow_mut() = Some(frame.clone());
                *renders.borrow_mut() += 1;
            });
        }

        let nav_frame = merge3(&source_case, &alphas, &nav_size)
            .filter(
                |(c, _, s), _| c.is_some() && s.is_some(),
                MapOptions::default(),
            )
            .map(
                |(c, a, s), _| {
                    let source = c.clone().unwrap_or_default();
                    let alphas = a.clone().unwrap_or_default();
                    let size = s.unwrap_or_default();
                    let data = ChartData::from_case(
                        &source.case,
                        &alphas,
                        SliderWindow::FULL,
                        source.index,
                    );
                    let config = compute_config(&data, size, &ChartLayout::ZERO);
                    ChartFrame {
                        data,
                        size,
                        layout: ChartLayout::ZERO,
                        config,
                        grid: Vec::new(),
                        dark: false,
                        click: None,
                    }
                },
                MapOptions::default(),
            )
            .named("nav_frame");
        let nav_ops = Rc::new(RefCell::new(Recording::new()));
        {
            let ops = nav_ops.clone();
            nav_frame.subscribe(move |frame: &ChartFrame, _| {
                let mut rec = ops.borrow_mut();
                rec.clear_ops();
                render_chart(&mut *rec, frame, &RenderOptions::lines_only());
            });
        }

        ChartWidget {
            options,
            frames,
            dataset,
            select,
            viewport,
            slider,
            alphas,
            theme,
            click,
            fades: Rc::new(RefCell::new(FxHashMap::default())),
            main_ops,
            nav_ops,
            last_frame,
            renders,
        }
    }

    /// Feed one input event into the channel graph.
    pub fn dispatch(&self, event: InputEvent) {
        match event {
            InputEvent::DatasetLoaded(dataset) => self.dataset.broadcast(Rc::new(dataset)),
            InputEvent::SelectCase(index) => self.select.broadcast(index),
            InputEvent::Resize {
                width,
                height,
                paddings,
            } => self.viewport.broadcast(Viewport {
                width,
                height,
                paddings,
            }),
            InputEvent::SliderMoved { left, right } => {
                self.slider.broadcast(SliderWindow::new(left, right))
            }
            InputEvent::ToggleColumn { id, visible } => self.toggle_column(id, visible),
            InputEvent::ToggleTheme => {
                let dark = self.theme.last_value().unwrap_or(false);
                self.theme.broadcast(!dark);
            }
            InputEvent::Click { x, y } => self.click.broadcast(Some(ChartClick { x, y })),
            InputEvent::ClearClick => self.click.broadcast(None),
        }
    }

    fn toggle_column(&self, id: String, visible: bool) {
        let target = if visible { 1.0 } else { 0.0 };
        let current = self
            .alphas
            .last_value()
            .unwrap_or_default()
            .get(&id)
            .copied()
            .unwrap_or(1.0);

        {
            let mut fades = self.fades.borrow_mut();
            if let Some(fade) = fades.get_mut(&id) {
                self.frames.borrow_mut().cancel(fade.handle);
                fade.transition.retarget(target, Easing::EaseOut);
            } else {
                if current == target {
                    return;
                }
                fades.insert(
                    id.clone(),
                    Fade {
                        transition: ScalarTransition::new(
                            current,
                            target,
                            self.options.steps,
                            Easing::EaseOut,
                        ),
                        handle: FrameHandle::default(),
                    },
                );
            }
        }

        let handle = schedule_fade_step(&self.fades, &self.frames, &self.alphas, id.clone());
        if let Some(fade) = self.fades.borrow_mut().get_mut(&id) {
            fade.handle = handle;
        }
    }

    /// Run one display-refresh tick. Returns the number of callbacks run.
    pub fn run_frame(&self) -> usize {
        run_scheduler_frame(&self.frames)
    }

    pub fn pending_frames(&self) -> usize {
        self.frames.borrow().pending()
    }

    /// Draw ops of the most recent main chart frame.
    pub fn main_ops(&self) -> Rc<RefCell<Recording>> {
        self.main_ops.clone()
    }

    /// Draw ops of the most recent navigation strip frame.
    pub fn nav_ops(&self) -> Rc<RefCell<Recording>> {
        self.nav_ops.clone()
    }

    /// The most recently rendered main chart frame.
    pub fn last_frame(&self) -> Option<ChartFrame> {
        self.last_frame.borrow().clone()
    }

    /// Total main chart renders since construction.
    pub fn render_count(&self) -> u64 {
        *self.renders.borrow()
    }
}

fn schedule_fade_step(
    fades: &FadeMap,
    frames: &Rc<RefCell<ManualFrames>>,
    alphas: &Observable<AlphaMap>,
    id: String,
) -> FrameHandle {
    let fades = fades.clone();
    let frames_again = frames.clone();
    let alphas = alphas.clone();
    frames.borrow_mut().schedule(Box::new(move || {
        run_fade_step(&fades, &frames_again, &alphas, id);
    }))
}

fn run_fade_step(
    fades: &FadeMap,
    frames: &Rc<RefCell<ManualFrames>>,
    alphas: &Observable<AlphaMap>,
    id: String,
) {
    let (value, done) = {
        let mut map = fades.borrow_mut();
        let Some(fade) = map.get_mut(&id) else {
            return;
        };
        let value = fade.transition.advance();
        let done = fade.transition.is_done();
        if done {
            map.remove(&id);
        }
        (value, done)
    };

    let mut snapshot = alphas.last_value().unwrap_or_default();
    snapshot.insert(id.clone(), value);
    alphas.broadcast(snapshot);

    if !done {
        let handle = schedule_fade_step(fades, frames, alphas, id.clone());
        if let Some(fade) = fades.borrow_mut().get_mut(&id) {
            fade.handle = handle;
        }
    }
}
