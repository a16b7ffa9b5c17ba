//! Freshness rules for the two persisted records.
//!
//! A record is either fully present and well-formed or treated as absent.
//! Storage and serialization failures are logged and swallowed here so
//! callers only ever see a hit or a miss.

use std::sync::Arc;

use chrono::TimeZone;
use chrono_tz::Tz;
use common::models::{SunTimes, View, WeatherReading};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use tracing::{debug, info, warn};

use crate::store::KeyValueStore;

pub const WEATHER_CACHE_KEY: &str = "sf_sunshine_weather_v5";
pub const SUN_CACHE_KEY: &str = "sf_sunshine_sun_times";

/// Ten minutes
pub const WEATHER_FRESHNESS_MS: i64 = 10 * 60 * 1000;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WeatherRecord {
    timestamp: i64,
    view_type: View,
    weather: Vec<WeatherReading>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SunTimesRecord {
    date: String,
    sun_times: SunTimes,
}

fn load<T: DeserializeOwned>(store: &dyn KeyValueStore, key: &str) -> Option<T> {
    let raw = match store.get(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return None,
        Err(e) => {
            warn!(key, error = %e, "Error reading cache");
            return None;
        }
    };

    match serde_json::from_str(&raw) {
        Ok(record) => Some(record),
        Err(e) => {
            warn!(key, error = %e, "Discarding unreadable cache record");
            None
        }
    }
}

fn save<T: Serialize>(store: &dyn KeyValueStore, key: &str, record: &T) {
    let raw = match serde_json::to_string(record) {
        Ok(raw) => raw,
        Err(e) => {
            warn!(key, error = %e, "Error serializing cache record");
            return;
        }
    };

    if let Err(e) = store.set(key, &raw) {
        warn!(key, error = %e, "Error saving cache");
    }
}

/// The most recent weather batch, valid for one view inside a rolling window
pub struct WeatherCache {
    store: Arc<dyn KeyValueStore>,
    freshness_ms: i64,
}

impl WeatherCache {
    pub fn new(store: Arc<dyn KeyValueStore>) -> Self {
        Self::with_freshness(store, WEATHER_FRESHNESS_MS)
    }

    pub fn with_freshness(store: Arc<dyn KeyValueStore>, freshness_ms: i64) -> Self {
        Self {
            store,
            freshness_ms,
        }
    }

    pub fn read(&self, view: View, now_ms: i64) -> Option<Vec<WeatherReading>> {
        let record: WeatherRecord = load(self.store.as_ref(), WEATHER_CACHE_KEY)?;

        let age_ms = now_ms - record.timestamp;
        if record.view_type != view || age_ms >= self.freshness_ms {
            debug!(
                cached_view = %record.view_type,
                requested_view = %view,
                age_ms,
                "Weather cache miss"
            );
            return None;
        }

        info!(view = %view, age_secs = age_ms / 1000, "Using cached weather data");
        Some(record.weather)
    }

    pub fn write(&self, view: View, readings: &[WeatherReading], now_ms: i64) {
        let record = WeatherRecord {
            timestamp: now_ms,
            view_type: view,
            weather: readings.to_vec(),
        };
        save(self.store.as_ref(), WEATHER_CACHE_KEY, &record);
    }

    pub fn clear(&self) {
        if let Err(e) = self.store.remove(WEATHER_CACHE_KEY) {
            warn!(error = %e, "Error clearing weather cache");
        }
    }
}

/// Sunrise and sunset, valid until the local calendar date changes
pub struct SunTimesCache {
    store: Arc<dyn KeyValueStore>,
    tz: Tz,
}

impl SunTimesCache {
    pub fn new(store: Arc<dyn KeyValueStore>, tz: Tz) -> Self {
        Self { store, tz }
    }

    pub fn read(&self, now_ms: i64) -> Option<SunTimes> {
        let record: SunTimesRecord = load(self.store.as_ref(), SUN_CACHE_KEY)?;
        let today = calendar_date(now_ms, self.tz)?;

        if record.date != today {
            debug!(cached = %record.date, today = %today, "Sun times are from another day");
            return None;
        }

        debug!("Using cached sun times");
        Some(record.sun_times)
    }

    pub fn write(&self, sun_times: SunTimes, now_ms: i64) {
        let Some(date) = calendar_date(now_ms, self.tz) else {
            warn!(now_ms, "Cannot date sun times record");
            return;
        };
        save(
            self.store.as_ref(),
            SUN_CACHE_KEY,
            &SunTimesRecord { date, sun_times },
        );
    }
}

/// Local calendar date as `Mon Oct 19 2026`
pub fn calendar_date(epoch_ms: i64, tz: Tz) -> Option<String> {
    let local = tz.timestamp_millis_opt(epoch_ms).single()?;
    Some(local.format("%a %b %d %Y").to_string())
}
