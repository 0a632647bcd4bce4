//! Analog shaping primitives (deadzone, response curve)
//!
//! Pure functions over normalized axis values. Both are total over their
//! numeric domain; neither allocates nor fails.

/// Remove the deadzone from a normalized stick value and rescale the
/// remaining travel back to the full range.
///
/// # Arguments
/// * `value` - Stick value in [-1.0, 1.0]
/// * `deadzone` - Travel fraction to ignore, in [0.0, 1.0)
///
/// # Returns
/// Exactly 0.0 inside the deadzone; otherwise the value rescaled so that
/// `deadzone` maps to 0.0 and full deflection still maps to ±1.0.
pub fn apply_deadzone(value: f32, deadzone: f32) -> f32 {
    if value.abs() < deadzone {
        return 0.0;
    }
    let sign = if value >= 0.0 { 1.0 } else { -1.0 };
    sign * (value.abs() - deadzone) / (1.0 - deadzone)
}

/// Apply a signed power-law response curve.
///
/// Preserves sign and zero. An exponent above 1.0 suppresses small
/// deflections and expands large ones; 1.0 is the identity.
pub fn apply_gamma(value: f32, gamma: f32) -> f32 {
    let sign = if value >= 0.0 { 1.0 } else { -1.0 };
    sign * value.abs().powf(gamma)
}

#[cfg(test)]
mod tests {
    use super::*;

    const DEADZONE: f32 = 0.06;

    #[test]
    fn test_deadzone_collapses_small_values() {
        assert_eq!(apply_deadzone(0.0, DEADZONE), 0.0);
        assert_eq!(apply_deadzone(0.05, DEADZONE), 0.0);
        assert_eq!(apply_deadzone(-0.05, DEADZONE), 0.0);
        assert_eq!(apply_deadzone(0.0599, DEADZONE), 0.0);
    }

    #[test]
    fn test_deadzone_continuous_at_boundary() {
        // Exactly at the threshold the rescaled value is zero
        assert!(apply_deadzone(DEADZONE, DEADZONE).abs() < 1e-6);
        // Full deflection is preserved in both directions
        assert!((apply_deadzone(1.0, DEADZONE) - 1.0).abs() < 1e-6);
        assert!((apply_deadzone(-1.0, DEADZONE) + 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_deadzone_monotonic_in_magnitude() {
        let mut prev = 0.0;
        for i in 0..=100 {
            let v = i as f32 / 100.0;
            let out = apply_deadzone(v, DEADZONE);
            assert!(out >= prev, "not monotonic at v = {}", v);
            prev = out;
        }
    }

    #[test]
    fn test_deadzone_preserves_sign() {
        assert!(apply_deadzone(0.5, DEADZONE) > 0.0);
        assert!(apply_deadzone(-0.5, DEADZONE) < 0.0);
        assert_eq!(
            apply_deadzone(0.5, DEADZONE),
            -apply_deadzone(-0.5, DEADZONE)
        );
    }

    #[test]
    fn test_zero_deadzone_is_identity() {
        for v in [-1.0, -0.3, 0.0, 0.7, 1.0] {
            assert!((apply_deadzone(v, 0.0) - v).abs() < 1e-6);
        }
    }

    #[test]
    fn test_gamma_odd_symmetric() {
        for v in [0.0, 0.1, 0.25, 0.5, 0.9, 1.0] {
            let pos = apply_gamma(v, 1.3);
            let neg = apply_gamma(-v, 1.3);
            assert!((pos + neg).abs() < 1e-6, "not odd at v = {}", v);
        }
        assert_eq!(apply_gamma(0.0, 1.3), 0.0);
    }

    #[test]
    fn test_gamma_identity_at_one() {
        for v in [-1.0, -0.5, 0.0, 0.3, 1.0] {
            assert!((apply_gamma(v, 1.0) - v).abs() < 1e-6);
        }
    }

    #[test]
    fn test_gamma_above_one_suppresses_midrange() {
        assert!(apply_gamma(0.5, 1.3) < 0.5);
        // Endpoints are fixed points
        assert!((apply_gamma(1.0, 1.3) - 1.0).abs() < 1e-6);
        assert!((apply_gamma(-1.0, 1.3) + 1.0).abs() < 1e-6);
    }
}
