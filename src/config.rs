//! Runtime configuration
//!
//! Every field has a default, so a config file only needs the values it
//! changes:
//!
//! ```toml
//! step_delay_ms = 250
//! array_size = 12
//! ```

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use thiserror::Error;

/// Delay between live-mode moments at speed 1
pub const DEFAULT_STEP_DELAY_MS: u64 = 500;

/// Elapsed-time refresh cadence (~60 Hz)
pub const DEFAULT_TIMER_TICK_MS: u64 = 16;

/// Dataset used whenever the array source cannot provide one
pub const DEFAULT_DATA: [i32; 8] = [8, 3, 5, 4, 7, 1, 6, 2];

/// Step history ceiling (64 MB)
pub const DEFAULT_HISTORY_LIMIT: usize = 64 * 1024 * 1024;

/// Errors raised while loading a configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Base delay per observable moment in live mode
    pub step_delay_ms: u64,
    /// Speed divisor applied to `step_delay_ms`
    pub speed: u32,
    /// Elapsed-time refresh interval
    pub timer_tick_ms: u64,
    /// Length of randomly generated arrays
    pub array_size: usize,
    pub min_value: i32,
    pub max_value: i32,
    /// Fallback dataset
    pub default_data: Vec<i32>,
    /// Memory ceiling for the step history in bytes
    pub history_limit_bytes: usize,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            step_delay_ms: DEFAULT_STEP_DELAY_MS,
            speed: 1,
            timer_tick_ms: DEFAULT_TIMER_TICK_MS,
            array_size: 10,
            min_value: 1,
            max_value: 99,
            default_data: DEFAULT_DATA.to_vec(),
            history_limit_bytes: DEFAULT_HISTORY_LIMIT,
        }
    }
}

impl Config {
    /// Read and validate a TOML config file
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: Config = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.speed == 0 {
            return Err(ConfigError::Invalid("speed must be at least 1".into()));
        }
        if self.timer_tick_ms == 0 {
            return Err(ConfigError::Invalid("timer_tick_ms must be positive".into()));
        }
        if self.array_size == 0 {
            return Err(ConfigError::Invalid("array_size must be at least 1".into()));
        }
        if self.min_value > self.max_value {
            return Err(ConfigError::Invalid(format!(
                "min_value {} is greater than max_value {}",
                self.min_value, self.max_value
            )));
        }
        Ok(())
    }

    /// Live-mode delay per moment at the given speed divisor
    pub fn step_delay(&self, speed: u32) -> Duration {
        Duration::from_millis(self.step_delay_ms / u64::from(speed.max(1)))
    }

    pub fn timer_tick(&self) -> Duration {
        Duration::from_millis(self.timer_tick_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.step_delay(1), Duration::from_millis(500));
        assert_eq!(config.step_delay(4), Duration::from_millis(125));
        assert_eq!(config.timer_tick(), Duration::from_millis(16));
        assert_eq!(config.default_data, vec![8, 3, 5, 4, 7, 1, 6, 2]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml() {
        let config = Config::from_toml_str("step_delay_ms = 100\narray_size = 4\n").unwrap();
        assert_eq!(config.step_delay_ms, 100);
        assert_eq!(config.array_size, 4);
        assert_eq!(config.speed, 1);
    }

    #[test]
    fn test_rejects_invalid_values() {
        assert!(matches!(
            Config::from_toml_str("speed = 0"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            Config::from_toml_str("min_value = 10\nmax_value = 5"),
            Err(ConfigError::Invalid(_))
        ));
        assert!(matches!(
            Config::from_toml_str("speed = \"fast\""),
            Err(ConfigError::Parse(_))
        ));
    }
}
