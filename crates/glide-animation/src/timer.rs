//! Frame-accurate countdown / count-up timer.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use glide_core::{FrameScheduler, FrameSchedulerOptions, RuntimeHandle};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimerMode {
    #[default]
    Countdown,
    Countup,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameTimerOptions {
    pub initial_time_ms: f64,
    /// Countdown stops here (default 0). Count-up only stops when a
    /// positive target is given.
    pub target_time_ms: Option<f64>,
    pub mode: TimerMode,
    pub auto_start: bool,
}

impl FrameTimerOptions {
    pub fn countdown(initial_time_ms: f64) -> Self {
        Self {
            initial_time_ms,
            target_time_ms: None,
            mode: TimerMode::Countdown,
            auto_start: false,
        }
    }

    pub fn countup(initial_time_ms: f64) -> Self {
        Self {
            mode: TimerMode::Countup,
            ..Self::countdown(initial_time_ms)
        }
    }

    pub fn with_target(mut self, target_time_ms: f64) -> Self {
        self.target_time_ms = Some(target_time_ms);
        self
    }

    pub fn with_auto_start(mut self, auto_start: bool) -> Self {
        self.auto_start = auto_start;
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TimerState {
    pub time_ms: f64,
    pub mode: TimerMode,
    pub target_time_ms: Option<f64>,
    pub running: bool,
    pub finished: bool,
}

impl TimerState {
    /// Advances by `dt_ms`. Returns `true` only on the step that reaches the
    /// target; a finished timer never advances again.
    pub fn advance(&mut self, dt_ms: f64) -> bool {
        if self.finished {
            return false;
        }
        match self.mode {
            TimerMode::Countdown => {
                let target = self.target_time_ms.unwrap_or(0.0);
                let next = self.time_ms - dt_ms;
                if next <= target {
                    self.time_ms = target;
                    self.finished = true;
                } else {
                    self.time_ms = next;
                }
            }
            TimerMode::Countup => {
                let next = self.time_ms + dt_ms;
                match self.target_time_ms {
                    Some(target) if target > 0.0 && next >= target => {
                        self.time_ms = target;
                        self.finished = true;
                    }
                    _ => self.time_ms = next,
                }
            }
        }
        self.finished
    }
}

struct TimerInner {
    state: RefCell<TimerState>,
    initial_time_ms: f64,
    on_end: RefCell<Option<Box<dyn FnMut()>>>,
    on_tick: RefCell<Option<Box<dyn FnMut(f64)>>>,
    end_count: Cell<u32>,
}

impl TimerInner {
    fn fire_tick(&self, time_ms: f64) {
        let callback = self.on_tick.borrow_mut().take();
        if let Some(mut callback) = callback {
            callback(time_ms);
            let mut slot = self.on_tick.borrow_mut();
            if slot.is_none() {
                *slot = Some(callback);
            }
        }
    }

    fn fire_end(&self) {
        self.end_count.set(self.end_count.get() + 1);
        let callback = self.on_end.borrow_mut().take();
        if let Some(mut callback) = callback {
            callback();
            let mut slot = self.on_end.borrow_mut();
            if slot.is_none() {
                *slot = Some(callback);
            }
        }
    }
}

pub struct FrameTimer {
    inner: Rc<TimerInner>,
    scheduler: FrameScheduler,
}

impl FrameTimer {
    pub fn new(runtime: &RuntimeHandle, options: FrameTimerOptions) -> Self {
        let inner = Rc::new(TimerInner {
            state: RefCell::new(TimerState {
                time_ms: options.initial_time_ms,
                mode: options.mode,
                target_time_ms: options.target_time_ms,
                running: false,
                finished: false,
            }),
            initial_time_ms: options.initial_time_ms,
            on_end: RefCell::new(None),
            on_tick: RefCell::new(None),
            end_count: Cell::new(0),
        });
        let weak = Rc::downgrade(&inner);
        let scheduler = FrameScheduler::new(
            runtime,
            FrameSchedulerOptions::default(),
            move |dt, control| {
                let Some(inner) = weak.upgrade() else {
                    control.stop();
                    return Ok(());
                };
                let (finished_now, time_ms) = {
                    let mut state = inner.state.borrow_mut();
                    (state.advance(dt), state.time_ms)
                };
                inner.fire_tick(time_ms);
                if finished_now {
                    control.stop();
                    log::trace!("frame timer finished at {time_ms}ms");
                    inner.fire_end();
                }
                Ok(())
            },
        );
        let timer = Self { inner, scheduler };
        if options.auto_start {
            timer.start();
        }
        timer
    }

    pub fn with_on_end(self, on_end: impl FnMut() + 'static) -> Self {
        *self.inner.on_end.borrow_mut() = Some(Box::new(on_end));
        self
    }

    /// Observer invoked with the new time after every frame.
    pub fn set_on_tick(&self, on_tick: impl FnMut(f64) + 'static) {
        *self.inner.on_tick.borrow_mut() = Some(Box::new(on_tick));
    }

    /// Resets to the initial time and runs.
    pub fn start(&self) {
        self.scheduler.stop();
        {
            let mut state = self.inner.state.borrow_mut();
            state.time_ms = self.inner.initial_time_ms;
            state.finished = false;
        }
        self.scheduler.start();
    }

    pub fn pause(&self) {
        self.scheduler.stop();
    }

    /// Continues from the current time. No-op while running or after the
    /// timer has finished.
    pub fn resume(&self) {
        if self.scheduler.is_running() || self.inner.state.borrow().finished {
            return;
        }
        self.scheduler.start();
    }

    /// Stops and sets the time, defaulting to the initial time.
    pub fn reset(&self, time_ms: Option<f64>) {
        self.scheduler.stop();
        let mut state = self.inner.state.borrow_mut();
        state.time_ms = time_ms.unwrap_or(self.inner.initial_time_ms);
        state.finished = false;
    }

    pub fn time_ms(&self) -> f64 {
        self.inner.state.borrow().time_ms
    }

    pub fn is_running(&self) -> bool {
        self.scheduler.is_running()
    }

    pub fn is_finished(&self) -> bool {
        self.inner.state.borrow().finished
    }

    pub fn state(&self) -> TimerState {
        TimerState {
            running: self.scheduler.is_running(),
            ..*self.inner.state.borrow()
        }
    }

    /// How many times the end callback has fired over the timer's lifetime.
    pub fn end_count(&self) -> u32 {
        self.inner.end_count.get()
    }
}

#[cfg(test)]
#[path = "tests/timer_tests.rs"]
mod tests;
