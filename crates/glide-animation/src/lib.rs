//! Frame-driven motion for Glide: friction-decayed inertia and a
//! frame-accurate countdown/count-up timer.

pub mod decay;
pub mod inertia;
pub mod timer;

pub use decay::{FrictionDecay, DEFAULT_FRICTION, DEFAULT_MIN_VELOCITY_PX_MS, REFERENCE_FRAME_MS};
pub use inertia::{InertiaBounds, InertiaOptions, InertiaSimulator, InertiaState};
pub use timer::{FrameTimer, FrameTimerOptions, TimerMode, TimerState};
