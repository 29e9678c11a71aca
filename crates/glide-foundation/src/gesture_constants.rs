//! Shared gesture constants.

/// If no movement is sampled for this long before release, the pointer is
/// assumed to have stopped and the release velocity is zero.
pub const ASSUME_STOPPED_MS: f64 = 40.0;
