//! Configuration management for Padwheel
//!
//! Handles loading and validation of the YAML configuration file. Every key
//! is optional; missing keys take their defaults. Out-of-range values are
//! clamped with a warning instead of failing startup - a misconfigured feel
//! is recoverable, a dead process is not.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use tokio::fs;
use tracing::{info, warn};

/// Full-scale rotation reference in degrees. A wheel configured with
/// `max_angle: 900` uses the entire axis range.
pub const FULL_SCALE_ANGLE_DEG: f32 = 900.0;

/// Root configuration structure
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
pub struct AppConfig {
    #[serde(default)]
    pub steering: SteeringConfig,
    #[serde(default)]
    pub pedals: PedalConfig,
    #[serde(default)]
    pub general: GeneralConfig,
}

/// Steering axis tuning
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SteeringConfig {
    /// Stick-travel fraction near center that is ignored entirely
    #[serde(default = "default_deadzone")]
    pub deadzone: f32,
    /// Response curve exponent; 1.0 is linear, higher values give more
    /// precision near center and a sharper ramp toward full lock
    #[serde(default = "default_gamma")]
    pub gamma: f32,
    /// Base smoothing coefficient applied while the stick is deflected
    #[serde(default = "default_steering_alpha")]
    pub alpha: f32,
    /// Spring coefficient pulling the wheel back once the stick is released
    #[serde(default = "default_center_spring")]
    pub center_spring: f32,
    /// Simulated wheel rotation in degrees (e.g. 540 for a typical GT wheel)
    #[serde(default = "default_max_angle")]
    pub max_angle: f32,
}

/// Gas/brake pedal tuning
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PedalConfig {
    /// Smoothing coefficient from trigger pressure to pedal position
    #[serde(default = "default_pedal_alpha")]
    pub alpha: f32,
}

/// Loop timing
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GeneralConfig {
    /// Tick period in milliseconds
    #[serde(default = "default_update_ms")]
    pub update_ms: u64,
}

fn default_deadzone() -> f32 {
    0.06
}

fn default_gamma() -> f32 {
    1.3
}

fn default_steering_alpha() -> f32 {
    0.04
}

fn default_center_spring() -> f32 {
    0.12
}

fn default_max_angle() -> f32 {
    540.0
}

fn default_pedal_alpha() -> f32 {
    0.3
}

fn default_update_ms() -> u64 {
    5
}

impl Default for SteeringConfig {
    fn default() -> Self {
        Self {
            deadzone: default_deadzone(),
            gamma: default_gamma(),
            alpha: default_steering_alpha(),
            center_spring: default_center_spring(),
            max_angle: default_max_angle(),
        }
    }
}

impl Default for PedalConfig {
    fn default() -> Self {
        Self {
            alpha: default_pedal_alpha(),
        }
    }
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            update_ms: default_update_ms(),
        }
    }
}

impl SteeringConfig {
    /// Maximum normalized wheel deflection derived from the configured
    /// rotation angle. Floored at 0.1 so a bogus angle never pins the
    /// wheel to center.
    pub fn travel_limit(&self) -> f32 {
        (self.max_angle / FULL_SCALE_ANGLE_DEG).clamp(0.1, 1.0)
    }
}

impl GeneralConfig {
    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.update_ms)
    }
}

impl AppConfig {
    /// Load configuration from a YAML file.
    ///
    /// If the file does not exist, a default configuration file is written
    /// next to where it was expected so the user has something to edit.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !fs::try_exists(path).await.unwrap_or(false) {
            let config = Self::default();
            config.write(path).await?;
            info!(
                "Configuration file not found, wrote defaults to {}",
                path.display()
            );
            return Ok(config);
        }

        let content = fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let mut config: Self = serde_yaml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;
        config.sanitize();

        Ok(config)
    }

    /// Write this configuration as YAML
    pub async fn write(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let yaml = serde_yaml::to_string(self).context("Failed to serialize config")?;
        fs::write(path, yaml)
            .await
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }

    /// Clamp every tunable into its valid domain, warning on each fix.
    pub fn sanitize(&mut self) {
        clamp_field("steering.deadzone", &mut self.steering.deadzone, 0.0, 0.99);
        clamp_field("steering.alpha", &mut self.steering.alpha, 0.0, 1.0);
        clamp_field(
            "steering.center_spring",
            &mut self.steering.center_spring,
            0.0,
            1.0,
        );
        clamp_field("pedals.alpha", &mut self.pedals.alpha, 0.0, 1.0);

        // Exponent must stay positive; zero or negative would invert the curve
        if self.steering.gamma <= 0.0 || !self.steering.gamma.is_finite() {
            warn!(
                "steering.gamma = {} is out of range, using {}",
                self.steering.gamma,
                default_gamma()
            );
            self.steering.gamma = default_gamma();
        }

        if !self.steering.max_angle.is_finite() {
            warn!(
                "steering.max_angle = {} is out of range, using {}",
                self.steering.max_angle,
                default_max_angle()
            );
            self.steering.max_angle = default_max_angle();
        }

        if self.general.update_ms == 0 {
            warn!("general.update_ms = 0 is out of range, using 1");
            self.general.update_ms = 1;
        }
    }
}

fn clamp_field(name: &str, value: &mut f32, min: f32, max: f32) {
    let clamped = if value.is_finite() {
        value.clamp(min, max)
    } else {
        min
    };
    if clamped != *value {
        warn!(
            "{} = {} is out of range, clamping to {}",
            name, value, clamped
        );
        *value = clamped;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AppConfig::default();
        assert_eq!(config.steering.deadzone, 0.06);
        assert_eq!(config.steering.gamma, 1.3);
        assert_eq!(config.steering.alpha, 0.04);
        assert_eq!(config.steering.center_spring, 0.12);
        assert_eq!(config.steering.max_angle, 540.0);
        assert_eq!(config.pedals.alpha, 0.3);
        assert_eq!(config.general.update_ms, 5);
    }

    #[test]
    fn test_missing_keys_take_defaults() {
        let config: AppConfig = serde_yaml::from_str("steering:\n  gamma: 2.0\n").unwrap();
        assert_eq!(config.steering.gamma, 2.0);
        // Everything else falls back
        assert_eq!(config.steering.deadzone, 0.06);
        assert_eq!(config.pedals.alpha, 0.3);
        assert_eq!(config.general.update_ms, 5);
    }

    #[test]
    fn test_empty_mapping_parses() {
        let config: AppConfig = serde_yaml::from_str("{}").unwrap();
        assert_eq!(config.general.update_ms, 5);
    }

    #[test]
    fn test_travel_limit_from_angle() {
        let mut steering = SteeringConfig::default();
        assert!((steering.travel_limit() - 0.6).abs() < 1e-6); // 540 / 900

        steering.max_angle = 900.0;
        assert_eq!(steering.travel_limit(), 1.0);

        steering.max_angle = 1800.0;
        assert_eq!(steering.travel_limit(), 1.0);

        steering.max_angle = 0.0;
        assert_eq!(steering.travel_limit(), 0.1);
    }

    #[test]
    fn test_sanitize_clamps_out_of_range() {
        let mut config = AppConfig::default();
        config.steering.deadzone = 1.5;
        config.steering.alpha = -0.2;
        config.steering.gamma = -1.0;
        config.pedals.alpha = 7.0;
        config.general.update_ms = 0;

        config.sanitize();

        assert_eq!(config.steering.deadzone, 0.99);
        assert_eq!(config.steering.alpha, 0.0);
        assert_eq!(config.steering.gamma, 1.3);
        assert_eq!(config.pedals.alpha, 1.0);
        assert_eq!(config.general.update_ms, 1);
    }

    #[test]
    fn test_sanitize_keeps_valid_values() {
        let mut config = AppConfig::default();
        config.steering.deadzone = 0.1;
        config.steering.gamma = 2.5;
        config.sanitize();
        assert_eq!(config.steering.deadzone, 0.1);
        assert_eq!(config.steering.gamma, 2.5);
    }

    #[tokio::test]
    async fn test_load_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");

        let mut config = AppConfig::default();
        config.steering.max_angle = 900.0;
        config.write(&path).await.unwrap();

        let loaded = AppConfig::load(&path).await.unwrap();
        assert_eq!(loaded.steering.max_angle, 900.0);
        assert_eq!(loaded.pedals.alpha, 0.3);
    }

    #[tokio::test]
    async fn test_load_missing_file_writes_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");

        let config = AppConfig::load(&path).await.unwrap();
        assert_eq!(config.general.update_ms, 5);
        // A default file should now exist and be loadable
        assert!(path.exists());
        let reloaded = AppConfig::load(&path).await.unwrap();
        assert_eq!(reloaded.steering.deadzone, 0.06);
    }
}
