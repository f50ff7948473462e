//! Configuration of a processing pipeline run.
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::core::utils::check_positive;
use crate::error::RasterError;

/// The unit shared by every time parameter of a pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeUnit {
    #[default]
    Seconds,
    Milliseconds,
}

impl TimeUnit {
    /// Returns the duration of one unit in seconds.
    pub fn in_seconds(&self) -> f64 {
        match self {
            TimeUnit::Seconds => 1.0,
            TimeUnit::Milliseconds => 1e-3,
        }
    }

    /// Converts a time expressed in this unit into the target unit.
    pub fn convert(&self, time: f64, target: TimeUnit) -> f64 {
        if *self == target {
            time
        } else {
            time * self.in_seconds() / target.in_seconds()
        }
    }
}

impl fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TimeUnit::Seconds => write!(f, "s"),
            TimeUnit::Milliseconds => write!(f, "ms"),
        }
    }
}

impl FromStr for TimeUnit {
    type Err = RasterError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "s" | "sec" | "seconds" => Ok(TimeUnit::Seconds),
            "ms" | "milliseconds" => Ok(TimeUnit::Milliseconds),
            other => Err(RasterError::InvalidParameter(format!(
                "Unknown time unit '{}', expected s or ms",
                other
            ))),
        }
    }
}

/// The time bin and time unit of a pipeline run.
///
/// # Examples
///
/// ```rust
/// use rusty_raster::config::{Config, TimeUnit};
///
/// let config = Config::from_json(r#"{"dt": 0.5, "unit": "milliseconds"}"#).unwrap();
/// assert_eq!(config, Config::new(0.5, TimeUnit::Milliseconds).unwrap());
///
/// // The unit defaults to seconds
/// let config = Config::from_json(r#"{"dt": 0.01}"#).unwrap();
/// assert_eq!(config.unit, TimeUnit::Seconds);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// The time bin of every raster and series of the run.
    pub dt: f64,
    /// The unit of `dt` and of every other time parameter.
    #[serde(default)]
    pub unit: TimeUnit,
}

impl Config {
    /// Create a new configuration, failing for a non-positive time bin.
    pub fn new(dt: f64, unit: TimeUnit) -> Result<Self, RasterError> {
        let config = Config { dt, unit };
        config.validate()?;
        Ok(config)
    }

    /// Checks the configuration, e.g., after deserialization.
    pub fn validate(&self) -> Result<(), RasterError> {
        check_positive("dt", self.dt)
    }

    /// Parses and validates a JSON configuration.
    pub fn from_json(json: &str) -> Result<Self, RasterError> {
        let config: Config = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads and validates a JSON configuration file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, RasterError> {
        let json = fs::read_to_string(path.as_ref()).map_err(|e| {
            RasterError::IOError(format!(
                "Failed to read configuration {}: {}",
                path.as_ref().display(),
                e
            ))
        })?;
        Config::from_json(&json)
    }
}
