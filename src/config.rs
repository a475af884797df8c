//! # Run configuration
//!
//! The recognized options are the observer coordinates and the instant of the chart.
//! Every field is optional and falls back to its default:
//!
//! ```json
//! {
//!   "observer_latitude": 37.5665,
//!   "observer_longitude": 126.9780,
//!   "instant": "2024-03-20T12:00:00 UTC"
//! }
//! ```
//!
//! Without `instant` the chart is drawn for the current UTC time. Unknown keys are
//! rejected. The host reads the file named by the `STARMAP_CONFIG` environment variable,
//! when set.
use std::{ffi::OsString, fmt, fs};

use camino::{Utf8Path, Utf8PathBuf};
use hifitime::Epoch;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::{
    constants::{Degree, DEFAULT_OBSERVER_LATITUDE, DEFAULT_OBSERVER_LONGITUDE},
    observers::Observer,
    starmap_errors::StarMapError,
    time::{now_utc, parse_instant},
};

/// Environment variable holding the path of a JSON configuration file.
pub const CONFIG_ENV_VAR: &str = "STARMAP_CONFIG";

fn default_latitude() -> Degree {
    DEFAULT_OBSERVER_LATITUDE
}

fn default_longitude() -> Degree {
    DEFAULT_OBSERVER_LONGITUDE
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct StarMapConfig {
    /// Geodetic latitude of the observer, degrees in [-90, 90]
    #[serde(default = "default_latitude")]
    pub observer_latitude: Degree,

    /// Geodetic longitude of the observer, degrees east in [-180, 180]
    #[serde(default = "default_longitude")]
    pub observer_longitude: Degree,

    /// Instant of the chart, ISO-8601 / RFC-3339 (UTC when no scale is given)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub instant: Option<String>,
}

impl Default for StarMapConfig {
    fn default() -> Self {
        StarMapConfig {
            observer_latitude: DEFAULT_OBSERVER_LATITUDE,
            observer_longitude: DEFAULT_OBSERVER_LONGITUDE,
            instant: None,
        }
    }
}

impl StarMapConfig {
    /// Parse and validate a JSON document.
    pub fn from_json_str(json: &str) -> Result<Self, StarMapError> {
        let config: StarMapConfig = serde_json::from_str(json)
            .map_err(|e| StarMapError::InvalidConfiguration(format!("invalid JSON: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a JSON file.
    pub fn from_path(path: &Utf8Path) -> Result<Self, StarMapError> {
        let text = fs::read_to_string(path)
            .map_err(|e| StarMapError::InvalidConfiguration(format!("{path}: {e}")))?;
        debug!(%path, "configuration file read");
        Self::from_json_str(&text)
    }

    /// Configuration from the file named by [`CONFIG_ENV_VAR`], or the defaults when the
    /// variable is unset.
    pub fn from_env() -> Result<Self, StarMapError> {
        Self::from_env_value(std::env::var_os(CONFIG_ENV_VAR))
    }

    fn from_env_value(value: Option<OsString>) -> Result<Self, StarMapError> {
        match value {
            None => Ok(Self::default()),
            Some(raw) => {
                let path = Utf8PathBuf::from_path_buf(raw.into()).map_err(|p| {
                    StarMapError::InvalidConfiguration(format!(
                        "{CONFIG_ENV_VAR} is not valid UTF-8: {}",
                        p.display()
                    ))
                })?;
                Self::from_path(&path)
            }
        }
    }

    /// Check ranges and the instant format.
    ///
    /// Return
    /// ------
    /// * [`StarMapError::InvalidConfiguration`] describing the first invalid field.
    pub fn validate(&self) -> Result<(), StarMapError> {
        if !self.observer_latitude.is_finite() || !(-90.0..=90.0).contains(&self.observer_latitude)
        {
            return Err(StarMapError::InvalidConfiguration(format!(
                "observer_latitude must be in [-90, 90], got {}",
                self.observer_latitude
            )));
        }
        if !self.observer_longitude.is_finite()
            || !(-180.0..=180.0).contains(&self.observer_longitude)
        {
            return Err(StarMapError::InvalidConfiguration(format!(
                "observer_longitude must be in [-180, 180], got {}",
                self.observer_longitude
            )));
        }
        if let Some(instant) = &self.instant {
            parse_instant(instant)?;
        }
        Ok(())
    }

    /// Sea-level observer at the configured coordinates.
    pub fn observer(&self) -> Result<Observer, StarMapError> {
        let name = (self.observer_latitude == DEFAULT_OBSERVER_LATITUDE
            && self.observer_longitude == DEFAULT_OBSERVER_LONGITUDE)
            .then(|| "Seoul".to_string());
        Observer::new(self.observer_latitude, self.observer_longitude, 0.0, name)
    }

    /// The configured instant, or the current UTC time.
    pub fn instant(&self) -> Result<Epoch, StarMapError> {
        match &self.instant {
            Some(instant) => parse_instant(instant),
            None => now_utc(),
        }
    }
}

impl fmt::Display for StarMapConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "lat {:.2}°, lon {:.2}°, instant {}",
            self.observer_latitude,
            self.observer_longitude,
            self.instant.as_deref().unwrap_or("now")
        )
    }
}
