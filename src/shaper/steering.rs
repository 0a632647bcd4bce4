//! Steering filter - the wheel's position state machine
//!
//! Each tick the filter is in one of two modes, decided by whether any
//! effective stick input survived the deadzone:
//!
//! - **Tracking**: blend the wheel toward the curved, travel-limited target
//!   at the configured smoothing rate.
//! - **Centering**: no input, so a synthetic spring pulls the wheel back to
//!   center. The pull scales with distance from center but is floored so the
//!   wheel still returns from small offsets, and capped so a single step can
//!   never overshoot.

use crate::config::SteeringConfig;

use super::analog::apply_gamma;

/// Smoothing-rate multiplier while the "faster" modifier button is held
pub const RATE_UP_SCALE: f32 = 1.5;
/// Smoothing-rate multiplier while the "slower" modifier button is held
pub const RATE_DOWN_SCALE: f32 = 0.5;

/// Combined smoothing-rate multiplier for the held modifier buttons.
///
/// Holding both applies both factors (net 0.75), not a cancellation.
pub fn rate_scale(rate_up: bool, rate_down: bool) -> f32 {
    let mut scale = 1.0;
    if rate_up {
        scale *= RATE_UP_SCALE;
    }
    if rate_down {
        scale *= RATE_DOWN_SCALE;
    }
    scale
}

/// Persistent steering position plus the tuning it was built with.
///
/// Owned by the shaper and updated exactly once per tick.
#[derive(Debug, Clone)]
pub struct SteeringFilter {
    gamma: f32,
    alpha: f32,
    center_spring: f32,
    travel_limit: f32,
    position: f32,
}

impl SteeringFilter {
    pub fn new(config: &SteeringConfig) -> Self {
        Self {
            gamma: config.gamma,
            alpha: config.alpha,
            center_spring: config.center_spring,
            travel_limit: config.travel_limit(),
            position: 0.0,
        }
    }

    /// Current wheel position in [-travel_limit, travel_limit]
    pub fn position(&self) -> f32 {
        self.position
    }

    pub fn travel_limit(&self) -> f32 {
        self.travel_limit
    }

    /// Advance the wheel by one tick.
    ///
    /// # Arguments
    /// * `input` - Deadzone-normalized stick value; exactly 0.0 means
    ///   "hands off" and selects the centering spring
    /// * `rate_scale` - Smoothing-rate multiplier from the modifier buttons
    ///
    /// # Returns
    /// The new wheel position.
    pub fn update(&mut self, input: f32, rate_scale: f32) -> f32 {
        if input == 0.0 {
            // Spring gain grows with distance from center: floor keeps the
            // wheel returning from near-zero offsets, cap prevents a single
            // step from crossing center
            let k = (self.position.abs() * 2.5).clamp(0.15, 1.0);
            self.position += (0.0 - self.position) * self.center_spring * k;
        } else {
            let target = apply_gamma(input, self.gamma) * self.travel_limit;
            self.position += (target - self.position) * self.alpha * rate_scale;
        }

        self.position = self.position.clamp(-self.travel_limit, self.travel_limit);
        self.position
    }
}
