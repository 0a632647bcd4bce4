//! Pedal filter - exponential smoothing from trigger pressure to axis value
//!
//! Gas and brake each own one instance; the algorithm is shared, the state
//! is not. A released pedal sits at -1.0, a floored pedal at +1.0.

/// Persistent pedal position with its smoothing coefficient.
#[derive(Debug, Clone)]
pub struct PedalFilter {
    alpha: f32,
    position: f32,
}

impl PedalFilter {
    /// Released position of a pedal axis
    pub const RELEASED: f32 = -1.0;

    pub fn new(alpha: f32) -> Self {
        Self {
            alpha,
            position: Self::RELEASED,
        }
    }

    /// Current pedal position in [-1.0, 1.0]
    pub fn position(&self) -> f32 {
        self.position
    }

    /// Advance the pedal by one tick toward the given trigger pressure.
    ///
    /// Pressure is in [0.0, 1.0] and is rescaled to the bipolar axis range
    /// before smoothing.
    pub fn update(&mut self, pressure: f32) -> f32 {
        let target = pressure * 2.0 - 1.0;
        self.position += (target - self.position) * self.alpha;
        self.position = self.position.clamp(-1.0, 1.0);
        self.position
    }
}
