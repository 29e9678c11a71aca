use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use glide_core::{FrameRuntime, RuntimeHandle, RuntimeScheduler, Visibility};

const NANOS_PER_MILLI: f64 = 1_000_000.0;

#[derive(Default)]
struct CountingScheduler {
    requests: AtomicUsize,
}

impl RuntimeScheduler for CountingScheduler {
    fn schedule_frame(&self) {
        self.requests.fetch_add(1, Ordering::Relaxed);
    }
}

/// Manual vsync source over a [`FrameRuntime`].
///
/// Time only moves when the test says so. The first drain happens at
/// `t = 0`, so a freshly started loop gets its baseline there.
pub struct FrameDriver {
    runtime: FrameRuntime,
    scheduler: Arc<CountingScheduler>,
    now_nanos: u64,
}

impl FrameDriver {
    pub fn new() -> Self {
        let scheduler = Arc::new(CountingScheduler::default());
        Self {
            runtime: FrameRuntime::new(scheduler.clone()),
            scheduler,
            now_nanos: 0,
        }
    }

    pub fn handle(&self) -> RuntimeHandle {
        self.runtime.handle()
    }

    pub fn runtime(&self) -> &FrameRuntime {
        &self.runtime
    }

    pub fn now_ms(&self) -> f64 {
        self.now_nanos as f64 / NANOS_PER_MILLI
    }

    /// How many times the runtime asked the host for a frame.
    pub fn frame_requests(&self) -> usize {
        self.scheduler.requests.load(Ordering::Relaxed)
    }

    pub fn has_pending_frames(&self) -> bool {
        self.runtime.has_frame_callbacks()
    }

    /// Delivers a frame at the current time without advancing it.
    pub fn frame(&mut self) {
        self.runtime.drain_frame_callbacks(self.now_nanos);
    }

    /// Advances the clock by `ms` and delivers one frame.
    pub fn advance_by(&mut self, ms: f64) {
        self.now_nanos += (ms * NANOS_PER_MILLI).round() as u64;
        self.runtime.drain_frame_callbacks(self.now_nanos);
    }

    /// Delivers `count` frames spaced `frame_ms` apart.
    pub fn advance_frames(&mut self, count: usize, frame_ms: f64) {
        for _ in 0..count {
            self.advance_by(frame_ms);
        }
    }

    /// Delivers frames until nothing is pending or `max_frames` is hit.
    /// Returns the number of frames delivered.
    pub fn run_until_idle(&mut self, frame_ms: f64, max_frames: usize) -> usize {
        let mut frames = 0;
        while self.runtime.has_frame_callbacks() && frames < max_frames {
            self.advance_by(frame_ms);
            frames += 1;
        }
        if self.runtime.has_frame_callbacks() {
            log::debug!("frame driver stopped after {max_frames} frames with work pending");
        }
        frames
    }

    pub fn set_visibility(&self, visibility: Visibility) {
        self.runtime.set_visibility(visibility);
    }
}

impl Default for FrameDriver {
    fn default() -> Self {
        Self::new()
    }
}
