//! Single animation-frame loop with clamped delta time.
//!
//! A [`FrameScheduler`] keeps at most one frame request outstanding. The
//! first frame after `start()` only records the timing baseline; every
//! following frame calls the handler with the elapsed time since the
//! previous frame, clamped to `max_delta_ms` so a loop resumed after the
//! host was backgrounded does not jump.

use std::cell::{Cell, RefCell};
use std::rc::{Rc, Weak};

use crate::error::EngineError;
use crate::frame_clock::{FrameCallbackRegistration, FrameClock};
use crate::runtime::{RuntimeHandle, Visibility, VisibilityListenerId};
use crate::DEFAULT_MAX_DELTA_MS;

type FrameHandler = Box<dyn FnMut(f64, &FrameControl) -> Result<(), EngineError>>;
type ErrorHandler = Box<dyn FnMut(&EngineError)>;

/// Construction options for a [`FrameScheduler`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameSchedulerOptions {
    /// Start the loop as soon as it is created.
    pub auto_start: bool,
    /// Restart an auto-started loop when the host becomes visible again.
    pub resume_on_visibility: bool,
    /// Upper bound for a single frame delta in milliseconds.
    pub max_delta_ms: f64,
}

impl FrameSchedulerOptions {
    pub fn with_auto_start(mut self, auto_start: bool) -> Self {
        self.auto_start = auto_start;
        self
    }

    pub fn with_resume_on_visibility(mut self, resume: bool) -> Self {
        self.resume_on_visibility = resume;
        self
    }

    pub fn with_max_delta_ms(mut self, max_delta_ms: f64) -> Self {
        self.max_delta_ms = max_delta_ms;
        self
    }
}

impl Default for FrameSchedulerOptions {
    fn default() -> Self {
        Self {
            auto_start: false,
            resume_on_visibility: false,
            max_delta_ms: DEFAULT_MAX_DELTA_MS,
        }
    }
}

/// Timing state of one loop.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameLoopState {
    pub running: bool,
    /// `None` until the first frame after a start has been observed.
    pub last_frame_time_ms: Option<f64>,
    pub max_delta_ms: f64,
}

/// Passed to the frame handler so it can stop its own loop.
pub struct FrameControl {
    scheduler: Weak<SchedulerInner>,
}

impl FrameControl {
    pub fn stop(&self) {
        if let Some(inner) = self.scheduler.upgrade() {
            inner.stop();
        }
    }
}

struct SchedulerInner {
    clock: FrameClock,
    options: FrameSchedulerOptions,
    state: RefCell<FrameLoopState>,
    handler: RefCell<Option<FrameHandler>>,
    on_error: RefCell<Option<ErrorHandler>>,
    registration: RefCell<Option<FrameCallbackRegistration>>,
    visibility_listener: Cell<Option<VisibilityListenerId>>,
    frame_count: Cell<u64>,
}

impl SchedulerInner {
    fn start(this: &Rc<Self>) {
        {
            let mut state = this.state.borrow_mut();
            if state.running {
                return;
            }
            state.running = true;
            state.last_frame_time_ms = None;
        }
        log::trace!("frame loop started");
        Self::schedule(this);
    }

    fn stop(&self) {
        {
            let mut state = self.state.borrow_mut();
            if !state.running {
                return;
            }
            state.running = false;
            state.last_frame_time_ms = None;
        }
        let pending = self.registration.borrow_mut().take();
        drop(pending);
        log::trace!("frame loop stopped");
    }

    fn schedule(this: &Rc<Self>) {
        if this.registration.borrow().is_some() {
            return;
        }
        let weak = Rc::downgrade(this);
        let registration = this.clock.with_frame_millis(move |frame_time_ms| {
            if let Some(strong) = weak.upgrade() {
                Self::on_frame(&strong, frame_time_ms);
            }
        });
        if registration.is_active() {
            *this.registration.borrow_mut() = Some(registration);
        } else {
            // Runtime is gone: nothing will ever fire, so do not claim to run.
            this.state.borrow_mut().running = false;
        }
    }

    fn on_frame(this: &Rc<Self>, now_ms: f64) {
        // The request that fired is spent.
        let fired = this.registration.borrow_mut().take();
        drop(fired);

        let delta = {
            let mut state = this.state.borrow_mut();
            if !state.running {
                return;
            }
            let delta = state
                .last_frame_time_ms
                .map(|last| (now_ms - last).clamp(0.0, state.max_delta_ms));
            state.last_frame_time_ms = Some(now_ms);
            delta
        };

        if let Some(dt) = delta {
            let handler = this.handler.borrow_mut().take();
            if let Some(mut handler) = handler {
                this.frame_count.set(this.frame_count.get() + 1);
                let control = FrameControl {
                    scheduler: Rc::downgrade(this),
                };
                let result = handler(dt, &control);
                *this.handler.borrow_mut() = Some(handler);
                if let Err(error) = result {
                    this.stop();
                    this.report_error(error);
                    return;
                }
            }
        }

        if this.state.borrow().running {
            Self::schedule(this);
        }
    }

    fn report_error(&self, error: EngineError) {
        let on_error = self.on_error.borrow_mut().take();
        match on_error {
            Some(mut on_error) => {
                on_error(&error);
                let mut slot = self.on_error.borrow_mut();
                if slot.is_none() {
                    *slot = Some(on_error);
                }
            }
            None => log::error!("frame loop stopped: {error}"),
        }
    }

    fn on_visibility(this: &Rc<Self>, visibility: Visibility) {
        match visibility {
            Visibility::Hidden => {
                log::debug!("host hidden; stopping frame loop");
                this.stop();
            }
            Visibility::Visible => {
                if this.options.auto_start && this.options.resume_on_visibility {
                    log::debug!("host visible; resuming frame loop");
                    Self::start(this);
                }
            }
        }
    }
}

impl Drop for SchedulerInner {
    fn drop(&mut self) {
        if let Some(id) = self.visibility_listener.take() {
            self.clock.runtime_handle().remove_visibility_listener(id);
        }
    }
}

/// Owner of one animation-frame loop.
///
/// Clones share the same loop. `start` and `stop` are idempotent and both
/// may be called from inside the frame handler.
#[derive(Clone)]
pub struct FrameScheduler {
    inner: Rc<SchedulerInner>,
}

impl FrameScheduler {
    pub fn new(
        runtime: &RuntimeHandle,
        options: FrameSchedulerOptions,
        handler: impl FnMut(f64, &FrameControl) -> Result<(), EngineError> + 'static,
    ) -> Self {
        let inner = Rc::new(SchedulerInner {
            clock: runtime.frame_clock(),
            options,
            state: RefCell::new(FrameLoopState {
                running: false,
                last_frame_time_ms: None,
                max_delta_ms: options.max_delta_ms,
            }),
            handler: RefCell::new(Some(Box::new(handler))),
            on_error: RefCell::new(None),
            registration: RefCell::new(None),
            visibility_listener: Cell::new(None),
            frame_count: Cell::new(0),
        });

        let weak = Rc::downgrade(&inner);
        let listener = runtime.add_visibility_listener(move |visibility| {
            if let Some(inner) = weak.upgrade() {
                SchedulerInner::on_visibility(&inner, visibility);
            }
        });
        inner.visibility_listener.set(listener);

        let scheduler = Self { inner };
        if options.auto_start && runtime.visibility() != Some(Visibility::Hidden) {
            scheduler.start();
        }
        scheduler
    }

    /// Installs the callback receiving handler errors. Without one, errors
    /// are logged.
    pub fn with_on_error(self, on_error: impl FnMut(&EngineError) + 'static) -> Self {
        *self.inner.on_error.borrow_mut() = Some(Box::new(on_error));
        self
    }

    pub fn start(&self) {
        SchedulerInner::start(&self.inner);
    }

    pub fn stop(&self) {
        self.inner.stop();
    }

    pub fn is_running(&self) -> bool {
        self.inner.state.borrow().running
    }

    pub fn state(&self) -> FrameLoopState {
        *self.inner.state.borrow()
    }

    pub fn options(&self) -> FrameSchedulerOptions {
        self.inner.options
    }

    /// Number of times the handler has been invoked.
    pub fn frame_count(&self) -> u64 {
        self.inner.frame_count.get()
    }
}

#[cfg(test)]
#[path = "tests/frame_scheduler_tests.rs"]
mod tests;
