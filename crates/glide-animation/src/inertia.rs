//! Bounded, friction-decayed motion driven by a [`FrameScheduler`].

use std::cell::RefCell;
use std::rc::{Rc, Weak};

use glide_core::{EngineError, FrameScheduler, FrameSchedulerOptions, RuntimeHandle};

use crate::decay::{FrictionDecay, DEFAULT_FRICTION, DEFAULT_MIN_VELOCITY_PX_MS};

/// Inclusive range the simulated value is confined to.
///
/// `min <= max` is the caller's responsibility and is not checked.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InertiaBounds {
    pub min: f64,
    pub max: f64,
}

impl InertiaBounds {
    pub fn new(min: f64, max: f64) -> Self {
        Self { min, max }
    }

    pub fn clamp(&self, value: f64) -> f64 {
        value.max(self.min).min(self.max)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InertiaOptions {
    pub initial_value: f64,
    pub bounds: InertiaBounds,
    pub friction: f64,
    pub min_velocity_px_ms: f64,
}

impl InertiaOptions {
    pub fn new(initial_value: f64, min: f64, max: f64) -> Self {
        Self {
            initial_value,
            bounds: InertiaBounds::new(min, max),
            friction: DEFAULT_FRICTION,
            min_velocity_px_ms: DEFAULT_MIN_VELOCITY_PX_MS,
        }
    }

    pub fn with_friction(mut self, friction: f64) -> Self {
        self.friction = friction;
        self
    }

    pub fn with_min_velocity(mut self, min_velocity_px_ms: f64) -> Self {
        self.min_velocity_px_ms = min_velocity_px_ms;
        self
    }
}

/// Snapshot of the simulated motion.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct InertiaState {
    pub value: f64,
    pub velocity_px_ms: f64,
    pub bounds: InertiaBounds,
    pub friction: f64,
    pub min_velocity_px_ms: f64,
}

impl InertiaState {
    pub fn new(options: &InertiaOptions) -> Self {
        Self {
            value: options.initial_value,
            velocity_px_ms: 0.0,
            bounds: options.bounds,
            friction: options.friction,
            min_velocity_px_ms: options.min_velocity_px_ms,
        }
    }

    /// Advances the motion by `dt_ms`. Returns `false` once the motion is
    /// terminal (bound reached or velocity below threshold); velocity is
    /// zero whenever this returns `false`.
    pub fn step(&mut self, dt_ms: f64) -> Result<bool, EngineError> {
        let velocity = FrictionDecay::new(self.friction).decay_velocity(self.velocity_px_ms, dt_ms);
        let candidate = self.value + velocity * dt_ms;
        if !candidate.is_finite() {
            self.velocity_px_ms = 0.0;
            return Err(EngineError::frame_handler(format!(
                "inertia diverged (velocity {velocity}, dt {dt_ms})"
            )));
        }

        let clamped = self.bounds.clamp(candidate);
        self.value = clamped;
        if clamped != candidate {
            self.velocity_px_ms = 0.0;
            return Ok(false);
        }
        if velocity.abs() < self.min_velocity_px_ms {
            self.velocity_px_ms = 0.0;
            return Ok(false);
        }
        self.velocity_px_ms = velocity;
        Ok(true)
    }

    /// Value the motion would settle at if left alone, clamped to bounds.
    pub fn projected_rest_value(&self) -> f64 {
        let distance = FrictionDecay::new(self.friction)
            .projected_distance(self.velocity_px_ms, self.min_velocity_px_ms);
        self.bounds.clamp(self.value + distance)
    }
}

struct InertiaInner {
    state: RefCell<InertiaState>,
    on_change: RefCell<Option<Box<dyn FnMut(f64)>>>,
}

impl InertiaInner {
    fn notify(&self, value: f64) {
        let callback = self.on_change.borrow_mut().take();
        if let Some(mut callback) = callback {
            callback(value);
            let mut slot = self.on_change.borrow_mut();
            if slot.is_none() {
                *slot = Some(callback);
            }
        }
    }
}

/// Integrates a release velocity into a bounded value, one frame at a time.
pub struct InertiaSimulator {
    inner: Rc<InertiaInner>,
    scheduler: FrameScheduler,
}

impl InertiaSimulator {
    pub fn new(runtime: &RuntimeHandle, options: InertiaOptions) -> Self {
        let inner = Rc::new(InertiaInner {
            state: RefCell::new(InertiaState::new(&options)),
            on_change: RefCell::new(None),
        });
        let weak: Weak<InertiaInner> = Rc::downgrade(&inner);
        let scheduler = FrameScheduler::new(
            runtime,
            FrameSchedulerOptions::default(),
            move |dt, control| {
                let Some(inner) = weak.upgrade() else {
                    control.stop();
                    return Ok(());
                };
                let keep_going = inner.state.borrow_mut().step(dt)?;
                if !keep_going {
                    control.stop();
                }
                let value = inner.state.borrow().value;
                inner.notify(value);
                Ok(())
            },
        )
        .with_on_error(|error| log::warn!("inertia stopped: {error}"));
        Self { inner, scheduler }
    }

    /// Observer invoked whenever the value changes.
    pub fn set_on_change(&self, on_change: impl FnMut(f64) + 'static) {
        *self.inner.on_change.borrow_mut() = Some(Box::new(on_change));
    }

    /// Seeds the velocity (px/ms) and runs the simulation.
    pub fn start(&self, initial_velocity_px_ms: f64) {
        self.inner.state.borrow_mut().velocity_px_ms = initial_velocity_px_ms;
        self.scheduler.start();
    }

    pub fn stop(&self) {
        self.inner.state.borrow_mut().velocity_px_ms = 0.0;
        self.scheduler.stop();
    }

    /// Jumps to `value` and halts any in-flight motion.
    pub fn snap_to(&self, value: f64) {
        self.scheduler.stop();
        {
            let mut state = self.inner.state.borrow_mut();
            state.value = value;
            state.velocity_px_ms = 0.0;
        }
        self.inner.notify(value);
    }

    pub fn value(&self) -> f64 {
        self.inner.state.borrow().value
    }

    pub fn velocity(&self) -> f64 {
        self.inner.state.borrow().velocity_px_ms
    }

    pub fn is_running(&self) -> bool {
        self.scheduler.is_running()
    }

    pub fn state(&self) -> InertiaState {
        *self.inner.state.borrow()
    }

    pub fn projected_rest_value(&self) -> f64 {
        self.inner.state.borrow().projected_rest_value()
    }
}

#[cfg(test)]
#[path = "tests/inertia_tests.rs"]
mod tests;
