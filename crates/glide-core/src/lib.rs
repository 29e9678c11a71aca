//! Core runtime for the Glide interaction engine.
//!
//! Owns the animation-frame primitive ([`FrameRuntime`]), the RAII frame
//! clock built on it, and the [`FrameScheduler`] loop every animated
//! component in the workspace is driven by.

pub mod error;
pub mod frame_clock;
pub mod frame_scheduler;
pub mod platform;
pub mod registry;
pub mod runtime;

pub use error::{ElementId, EngineError};
pub use frame_clock::{FrameCallbackRegistration, FrameClock};
pub use frame_scheduler::{FrameControl, FrameLoopState, FrameScheduler, FrameSchedulerOptions};
pub use platform::{Clock, DefaultScheduler, RuntimeScheduler, WebClock};
pub use registry::EngineRegistry;
pub use runtime::{
    FrameCallbackId, FrameRuntime, RuntimeHandle, Visibility, VisibilityListenerId,
};

/// Default upper bound for a single frame delta (~30 fps floor).
pub const DEFAULT_MAX_DELTA_MS: f64 = 32.0;

pub(crate) const NANOS_PER_MILLI: f64 = 1_000_000.0;

pub mod prelude {
    pub use crate::error::{ElementId, EngineError};
    pub use crate::frame_scheduler::{FrameControl, FrameScheduler, FrameSchedulerOptions};
    pub use crate::runtime::{FrameRuntime, RuntimeHandle, Visibility};
}
