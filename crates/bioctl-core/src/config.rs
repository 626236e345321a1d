//! Session configuration: phase thresholds, CPP bounds, and safety limits.
//!
//! Everything the session needs is passed in here at construction; the core
//! reads no environment and touches no files. The CLI can load a TOML file
//! into this struct or fall back to the defaults, which carry the simulated
//! process's published parameters.

use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::cpp::{CppBounds, MinMax};

/// Errors from loading or validating a configuration.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    /// The TOML could not be parsed.
    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    /// The configuration parsed but is not usable.
    #[error("invalid config: {0}")]
    Validation(String),
}

/// Fill-phase settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FillSettings {
    /// Lower edge of the target fill band (percent). Reaching it advances
    /// the process to the run phase.
    #[serde(default = "default_fill_target_min")]
    pub target_min: f64,

    /// Upper edge of the target fill band (percent).
    #[serde(default = "default_fill_target_max")]
    pub target_max: f64,

    /// Fill level above which the batch is aborted as overfilled. The
    /// overfill check takes precedence over the target-band check when both
    /// hold on the same reading.
    #[serde(default = "default_fill_target_max")]
    pub overfill_ceiling: f64,
}

impl Default for FillSettings {
    fn default() -> Self {
        Self {
            target_min: default_fill_target_min(),
            target_max: default_fill_target_max(),
            overfill_ceiling: default_fill_target_max(),
        }
    }
}

/// Run-phase settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RunSettings {
    /// Temperature band that signals the reaction has completed. Entering
    /// the band advances the process to the empty phase; overshooting its
    /// upper edge aborts the batch.
    #[serde(default = "default_stop_temp")]
    pub stop_temp: MinMax,

    /// When set, the run phase also completes after this many seconds,
    /// regardless of temperature.
    #[serde(default)]
    pub run_secs: Option<f64>,

    /// When set, abort if the run phase has neither completed nor aborted
    /// after this many seconds.
    #[serde(default)]
    pub stall_timeout_secs: Option<f64>,
}

impl Default for RunSettings {
    fn default() -> Self {
        Self {
            stop_temp: default_stop_temp(),
            run_secs: None,
            stall_timeout_secs: None,
        }
    }
}

/// Empty-phase settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EmptySettings {
    /// The reactor counts as drained once fill level is at or below this
    /// value (percent).
    #[serde(default)]
    pub zero_tolerance: f64,

    /// Abort if fill level fails to decrease for this many seconds. The
    /// simulator can stall indefinitely otherwise.
    #[serde(default = "default_empty_stall_timeout")]
    pub stall_timeout_secs: f64,
}

impl Default for EmptySettings {
    fn default() -> Self {
        Self {
            zero_tolerance: 0.0,
            stall_timeout_secs: default_empty_stall_timeout(),
        }
    }
}

/// Safety-monitor backstop limits, deliberately looser than the process
/// limits the run phase enforces.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SafetySettings {
    /// Hard temperature ceiling, any phase.
    #[serde(default = "default_safety_max_temperature")]
    pub max_temperature: f64,

    /// Hard pressure ceiling, any phase.
    #[serde(default = "default_safety_max_pressure")]
    pub max_pressure: f64,
}

impl Default for SafetySettings {
    fn default() -> Self {
        Self {
            max_temperature: default_safety_max_temperature(),
            max_pressure: default_safety_max_pressure(),
        }
    }
}

/// Complete configuration for a [`ReactorSession`].
///
/// [`ReactorSession`]: crate::session::ReactorSession
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct SessionConfig {
    #[serde(default)]
    pub fill: FillSettings,

    #[serde(default)]
    pub run: RunSettings,

    #[serde(default)]
    pub empty: EmptySettings,

    #[serde(default)]
    pub bounds: CppBounds,

    #[serde(default)]
    pub safety: SafetySettings,
}

impl SessionConfig {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or validated.
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_toml(&content)
    }

    /// Parses configuration from a TOML string and validates it.
    ///
    /// # Errors
    ///
    /// Returns an error if the TOML is invalid or the values fail
    /// [`validate`](Self::validate).
    pub fn from_toml(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Rejects inverted bands, non-positive timeouts, and a ceiling below
    /// the fill target.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` naming the offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.fill.target_min > self.fill.target_max {
            return Err(ConfigError::Validation(format!(
                "fill target band is inverted: {} > {}",
                self.fill.target_min, self.fill.target_max
            )));
        }
        if self.fill.overfill_ceiling < self.fill.target_max {
            return Err(ConfigError::Validation(format!(
                "overfill ceiling {} is below the fill target max {}",
                self.fill.overfill_ceiling, self.fill.target_max
            )));
        }
        if self.run.stop_temp.min > self.run.stop_temp.max {
            return Err(ConfigError::Validation(format!(
                "stop temperature band is inverted: {} > {}",
                self.run.stop_temp.min, self.run.stop_temp.max
            )));
        }
        if let Some(secs) = self.run.run_secs {
            if secs <= 0.0 {
                return Err(ConfigError::Validation(
                    "run_secs must be positive".to_string(),
                ));
            }
        }
        if let Some(secs) = self.run.stall_timeout_secs {
            if secs <= 0.0 {
                return Err(ConfigError::Validation(
                    "run stall_timeout_secs must be positive".to_string(),
                ));
            }
        }
        if self.empty.stall_timeout_secs <= 0.0 {
            return Err(ConfigError::Validation(
                "empty stall_timeout_secs must be positive".to_string(),
            ));
        }
        if self.empty.zero_tolerance < 0.0 {
            return Err(ConfigError::Validation(
                "zero_tolerance must not be negative".to_string(),
            ));
        }
        if self.bounds.run_fill_band.min > self.bounds.run_fill_band.max {
            return Err(ConfigError::Validation(format!(
                "run fill band is inverted: {} > {}",
                self.bounds.run_fill_band.min, self.bounds.run_fill_band.max
            )));
        }
        if self.bounds.ph.min > self.bounds.ph.max {
            return Err(ConfigError::Validation(format!(
                "pH band is inverted: {} > {}",
                self.bounds.ph.min, self.bounds.ph.max
            )));
        }
        Ok(())
    }
}

fn default_fill_target_min() -> f64 {
    68.0
}

fn default_fill_target_max() -> f64 {
    72.0
}

fn default_stop_temp() -> MinMax {
    MinMax::new(79.0, 81.0)
}

fn default_empty_stall_timeout() -> f64 {
    60.0
}

fn default_safety_max_temperature() -> f64 {
    100.0
}

fn default_safety_max_pressure() -> f64 {
    250.0
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn defaults_carry_the_process_parameters() {
        let config = SessionConfig::default();
        assert_eq!(config.fill.target_min, 68.0);
        assert_eq!(config.fill.target_max, 72.0);
        assert_eq!(config.run.stop_temp, MinMax::new(79.0, 81.0));
        assert_eq!(config.bounds.pressure_max, 200.0);
        assert_eq!(config.safety.max_pressure, 250.0);
        assert_eq!(config.safety.max_temperature, 100.0);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn partial_toml_fills_in_defaults() {
        let config = SessionConfig::from_toml(
            r#"
            [fill]
            target_min = 40.0
            target_max = 50.0
            overfill_ceiling = 55.0
            "#,
        )
        .unwrap();
        assert_eq!(config.fill.target_min, 40.0);
        assert_eq!(config.fill.overfill_ceiling, 55.0);
        // Untouched sections keep their defaults.
        assert_eq!(config.empty.stall_timeout_secs, 60.0);
    }

    #[test]
    fn inverted_fill_band_is_rejected() {
        let result = SessionConfig::from_toml(
            r#"
            [fill]
            target_min = 72.0
            target_max = 68.0
            "#,
        );
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn ceiling_below_target_is_rejected() {
        let result = SessionConfig::from_toml(
            r#"
            [fill]
            target_min = 68.0
            target_max = 72.0
            overfill_ceiling = 70.0
            "#,
        );
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn zero_stall_timeout_is_rejected() {
        let result = SessionConfig::from_toml(
            r#"
            [empty]
            stall_timeout_secs = 0.0
            "#,
        );
        assert!(matches!(result, Err(ConfigError::Validation(_))));
    }

    #[test]
    fn config_round_trips_through_a_file() {
        let config = SessionConfig::default();
        let toml = toml::to_string_pretty(&config).unwrap();

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(toml.as_bytes()).unwrap();

        let loaded = SessionConfig::from_file(file.path()).unwrap();
        assert_eq!(config, loaded);
    }

    #[test]
    fn missing_file_reports_io_error() {
        let result = SessionConfig::from_file(Path::new("/nonexistent/bioctl.toml"));
        assert!(matches!(result, Err(ConfigError::Io(_))));
    }
}
