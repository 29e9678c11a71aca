//! Platform abstraction traits for the frame runtime.
//!
//! These traits let the engine delegate frame scheduling and clock
//! responsibilities to the host (a windowing loop, a browser, a test
//! driver) without depending on any of them directly.

use web_time::Instant;

/// Schedules work for the frame runtime.
///
/// Implementations are responsible for arranging a call to
/// [`FrameRuntime::drain_frame_callbacks`](crate::FrameRuntime::drain_frame_callbacks)
/// on the next vsync. They must be safe to use from multiple threads.
pub trait RuntimeScheduler: Send + Sync {
    /// Request that the host schedule a new frame.
    fn schedule_frame(&self);
}

/// Scheduler for hosts that poll the runtime on their own cadence.
#[derive(Debug, Default, Clone, Copy)]
pub struct DefaultScheduler;

impl RuntimeScheduler for DefaultScheduler {
    fn schedule_frame(&self) {}
}

/// Provides timing information to hosts.
pub trait Clock: Send + Sync {
    /// Instant type produced by this clock implementation.
    type Instant: Copy + Send + Sync;

    /// Returns the current instant.
    fn now(&self) -> Self::Instant;

    /// Returns the number of milliseconds elapsed since `since`.
    fn elapsed_millis(&self, since: Self::Instant) -> u64;
}

/// Monotonic clock backed by `web_time`, usable on native and wasm hosts.
#[derive(Debug, Default, Clone, Copy)]
pub struct WebClock;

impl WebClock {
    /// Fractional milliseconds elapsed since `origin`, the unit frame
    /// timestamps and input events are stamped in.
    pub fn millis_since(&self, origin: Instant) -> f64 {
        origin.elapsed().as_secs_f64() * 1_000.0
    }
}

impl Clock for WebClock {
    type Instant = Instant;

    fn now(&self) -> Instant {
        Instant::now()
    }

    fn elapsed_millis(&self, since: Instant) -> u64 {
        since.elapsed().as_millis() as u64
    }
}
