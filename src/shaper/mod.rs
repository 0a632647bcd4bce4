//! Input shaping pipeline
//!
//! Turns one raw controller snapshot per tick into smoothed wheel and pedal
//! axes. The stages, in order: deadzone removal, response curve, steering
//! state machine (or pedal smoothing for the triggers), then encoding to the
//! device axis domain at the output boundary.

pub mod analog;
pub mod encode;
pub mod pedal;
pub mod steering;

use crate::config::AppConfig;
use crate::input::ControllerSnapshot;

pub use pedal::PedalFilter;
pub use steering::SteeringFilter;

/// One tick's worth of shaped output, still in normalized units.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapedFrame {
    /// Wheel position in [-travel_limit, travel_limit]
    pub steer: f32,
    /// Gas pedal position in [-1.0, 1.0]
    pub gas: f32,
    /// Brake pedal position in [-1.0, 1.0]
    pub brake: f32,
    /// Button bitmask passed through untouched
    pub buttons: u16,
}

impl ShapedFrame {
    /// Frame for a wheel at rest: centered, pedals released, no buttons.
    ///
    /// Emitted once before the loop starts and again on shutdown so the
    /// virtual device never parks with a pressed pedal.
    pub fn neutral() -> Self {
        Self {
            steer: 0.0,
            gas: PedalFilter::RELEASED,
            brake: PedalFilter::RELEASED,
            buttons: 0,
        }
    }
}

/// The tick transform and the only long-lived mutable state in the process.
///
/// Owned exclusively by the feeder loop; each filter mutates its position
/// exactly once per [`Shaper::tick`].
pub struct Shaper {
    deadzone: f32,
    steering: SteeringFilter,
    gas: PedalFilter,
    brake: PedalFilter,
}

impl Shaper {
    pub fn new(config: &AppConfig) -> Self {
        Self {
            deadzone: config.steering.deadzone,
            steering: SteeringFilter::new(&config.steering),
            gas: PedalFilter::new(config.pedals.alpha),
            brake: PedalFilter::new(config.pedals.alpha),
        }
    }

    /// Run the full pipeline for one controller snapshot.
    pub fn tick(&mut self, snapshot: &ControllerSnapshot) -> ShapedFrame {
        let stick = analog::apply_deadzone(snapshot.steer_norm(), self.deadzone);
        let scale = steering::rate_scale(snapshot.rate_up, snapshot.rate_down);

        ShapedFrame {
            steer: self.steering.update(stick, scale),
            gas: self.gas.update(snapshot.gas_norm()),
            brake: self.brake.update(snapshot.brake_norm()),
            buttons: snapshot.buttons,
        }
    }
}
