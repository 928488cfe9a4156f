//! Process configuration, resolved once at startup.

use std::time::Duration;

use thiserror::Error;

use crate::directions::{DEFAULT_DIRECTIONS_URL, DirectionsConfig};
use crate::refresh::RefreshPolicy;

pub const API_KEY_VAR: &str = "DIRECTIONS_API_KEY";
pub const BASE_URL_VAR: &str = "DIRECTIONS_BASE_URL";
pub const TIMEOUT_VAR: &str = "DIRECTIONS_TIMEOUT_SECS";
pub const REFRESH_INTERVAL_VAR: &str = "RIDE_REFRESH_INTERVAL_SECS";
pub const REFRESH_DISTANCE_VAR: &str = "RIDE_REFRESH_DISTANCE_M";

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("DIRECTIONS_API_KEY is not set")]
    MissingApiKey,

    #[error("invalid value for {var}: {value:?}")]
    InvalidValue { var: &'static str, value: String },
}

#[derive(Debug, Clone)]
pub struct RideConfig {
    pub directions: DirectionsConfig,
    pub refresh: RefreshPolicy,
}

impl RideConfig {
    /// Reads the process environment, after loading `.env` if present.
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|var| std::env::var(var).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let api_key = lookup(API_KEY_VAR)
            .filter(|key| !key.trim().is_empty())
            .ok_or(ConfigError::MissingApiKey)?;

        let mut directions = DirectionsConfig::new(api_key.trim());
        directions.base_url =
            lookup(BASE_URL_VAR).unwrap_or_else(|| DEFAULT_DIRECTIONS_URL.to_string());
        if let Some(timeout) = parse_var::<u64>(&lookup, TIMEOUT_VAR)? {
            directions.timeout_secs = timeout;
        }

        let min_interval = parse_var::<u64>(&lookup, REFRESH_INTERVAL_VAR)?
            .map(Duration::from_secs)
            .unwrap_or_default();
        let min_distance_m = parse_var::<f64>(&lookup, REFRESH_DISTANCE_VAR)?.unwrap_or(0.0);
        if !min_distance_m.is_finite() || min_distance_m < 0.0 {
            return Err(ConfigError::InvalidValue {
                var: REFRESH_DISTANCE_VAR,
                value: min_distance_m.to_string(),
            });
        }

        Ok(Self {
            directions,
            refresh: RefreshPolicy::new(min_interval, min_distance_m),
        })
    }
}

fn parse_var<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    var: &'static str,
) -> Result<Option<T>, ConfigError> {
    match lookup(var) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue { var, value }),
    }
}
