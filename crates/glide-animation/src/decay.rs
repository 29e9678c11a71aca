//! Friction decay for velocity-driven motion.
//!
//! Friction is expressed per reference frame: a friction of `0.95` keeps
//! 95% of the velocity every 16 ms. Scaling the exponent by `dt` makes the
//! decay independent of the actual frame rate.

/// Frame length the friction coefficient is expressed against.
pub const REFERENCE_FRAME_MS: f64 = 16.0;
/// Fraction of velocity kept per reference frame.
pub const DEFAULT_FRICTION: f64 = 0.95;
/// Speed below which motion is considered settled.
pub const DEFAULT_MIN_VELOCITY_PX_MS: f64 = 0.01;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrictionDecay {
    pub friction: f64,
}

impl FrictionDecay {
    pub fn new(friction: f64) -> Self {
        Self { friction }
    }

    /// Velocity left after `dt_ms` of decay.
    pub fn decay_velocity(&self, velocity: f64, dt_ms: f64) -> f64 {
        velocity * self.friction.powf(dt_ms / REFERENCE_FRAME_MS)
    }

    /// Total distance travelled from `velocity` until it falls below
    /// `min_velocity`, assuming reference-length frames.
    ///
    /// Sums the geometric series of per-frame displacements in closed form.
    pub fn projected_distance(&self, velocity: f64, min_velocity: f64) -> f64 {
        let friction = self.friction;
        if !(0.0..1.0).contains(&friction) || velocity.abs() <= min_velocity {
            return 0.0;
        }
        // Frames until |v * f^n| < min_velocity.
        let frames = ((min_velocity / velocity.abs()).ln() / friction.ln()).ceil();
        let per_frame = velocity * friction * REFERENCE_FRAME_MS;
        per_frame * (1.0 - friction.powf(frames)) / (1.0 - friction)
    }
}

impl Default for FrictionDecay {
    fn default() -> Self {
        Self::new(DEFAULT_FRICTION)
    }
}
