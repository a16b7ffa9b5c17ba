use std::env;
use std::path::PathBuf;
use std::time::Duration;

use chrono_tz::Tz;
use common::models::View;
use thiserror::Error;

use crate::clock::{Clock, parse_time_of_day};
use crate::refresh::RefreshConfig;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("SKY_MAP_VIEW: {0}")]
    InvalidView(String),

    #[error("SKY_MAP_TIMEZONE: unknown time zone '{0}'")]
    InvalidTimezone(String),

    #[error("SKY_MAP_TEST_TIME: expected HH:MM, got '{0}'")]
    InvalidTestTime(String),
}

/// Where cached records live
#[derive(Debug, Clone, PartialEq)]
pub enum StoreLocation {
    Memory,
    Directory(PathBuf),
    PlatformDefault,
}

pub struct Config {
    pub proxy_url: String,
    pub view: View,
    pub store: StoreLocation,
    pub timezone: Tz,
    pub clock: Clock,
    pub refresh: RefreshConfig,
    pub request_timeout_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Build from any variable lookup; missing or unparseable numbers fall back to defaults
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let view = match lookup("SKY_MAP_VIEW") {
            Some(v) => v.parse().map_err(ConfigError::InvalidView)?,
            None => View::default(),
        };

        let timezone = match lookup("SKY_MAP_TIMEZONE") {
            Some(tz) => tz
                .parse::<Tz>()
                .map_err(|_| ConfigError::InvalidTimezone(tz))?,
            None => chrono_tz::America::Los_Angeles,
        };

        let clock = match lookup("SKY_MAP_TEST_TIME") {
            Some(value) => {
                let time =
                    parse_time_of_day(&value).ok_or(ConfigError::InvalidTestTime(value))?;
                Clock::TimeOfDay { time, tz: timezone }
            }
            None => Clock::System,
        };

        let store = match lookup("SKY_MAP_CACHE_DIR") {
            Some(dir) if dir.eq_ignore_ascii_case("memory") => StoreLocation::Memory,
            Some(dir) => StoreLocation::Directory(PathBuf::from(dir)),
            None => StoreLocation::PlatformDefault,
        };

        let secs = |key: &str, default: u64| {
            lookup(key)
                .and_then(|v| v.parse::<u64>().ok())
                .filter(|&v| v > 0)
                .unwrap_or(default)
        };

        Ok(Self {
            proxy_url: lookup("PROXY_URL").unwrap_or_else(|| "http://localhost:8787".to_string()),
            view,
            store,
            timezone,
            clock,
            refresh: RefreshConfig {
                weather_interval: Duration::from_secs(secs("WEATHER_REFRESH_SECS", 30 * 60)),
                arc_interval: Duration::from_secs(secs("ARC_REFRESH_SECS", 60)),
            },
            request_timeout_secs: secs("REQUEST_TIMEOUT_SECS", 10),
        })
    }
}
