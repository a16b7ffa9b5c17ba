use common::models::{Location, SunTimes, View, WeatherReading};
use futures::future::join_all;
use tracing::{info, instrument, warn};

use crate::api_client::WeatherSource;
use crate::cache::{SunTimesCache, WeatherCache};
use crate::category::categorize;
use crate::clock::Now;
use crate::locations;
use crate::sun;

/// Counts of settled fetches in a batch
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct BatchSummary {
    pub total: usize,
    pub successful: usize,
    pub failed: usize,
}

impl BatchSummary {
    pub fn from_readings(readings: &[WeatherReading]) -> Self {
        let failed = readings.iter().filter(|r| r.is_failed()).count();
        Self {
            total: readings.len(),
            successful: readings.len() - failed,
            failed,
        }
    }
}

/// A batch plus whether it came from the cache
#[derive(Debug, Clone)]
pub struct WeatherLoad {
    pub view: View,
    pub readings: Vec<WeatherReading>,
    pub from_cache: bool,
}

pub struct Orchestrator<S> {
    source: S,
    weather_cache: WeatherCache,
    sun_cache: SunTimesCache,
    sun_location: Location,
}

impl<S: WeatherSource> Orchestrator<S> {
    pub fn new(source: S, weather_cache: WeatherCache, sun_cache: SunTimesCache) -> Self {
        Self {
            source,
            weather_cache,
            sun_cache,
            sun_location: locations::sun_reference(),
        }
    }

    /// Fetch every location concurrently. The result has one reading per
    /// location, in input order; failures become `unknown` readings.
    #[instrument(skip(self, locations), fields(count = locations.len()))]
    pub async fn fetch_all(&self, locations: &[Location], is_night: bool) -> Vec<WeatherReading> {
        let fetches = locations
            .iter()
            .map(|location| self.fetch_reading(location, is_night));
        let readings = join_all(fetches).await;

        let summary = BatchSummary::from_readings(&readings);
        info!(
            total = summary.total,
            successful = summary.successful,
            failed = summary.failed,
            "Weather batch settled"
        );

        readings
    }

    async fn fetch_reading(&self, location: &Location, is_night: bool) -> WeatherReading {
        match self.source.fetch_observation(location).await {
            Ok(observation) => match observation.primary_condition() {
                Some(condition) => WeatherReading::observed(
                    location.clone(),
                    categorize(condition.id, is_night),
                    Some(observation.rounded_temp()),
                    condition.description.clone(),
                ),
                None => WeatherReading::failed(location.clone(), "no weather conditions"),
            },
            Err(e) => {
                warn!(location = %location.name, error = %e, "Weather fetch failed");
                WeatherReading::failed(location.clone(), e.to_string())
            }
        }
    }

    /// Cache-first load of a view's batch. A forced refresh drops the cached
    /// record first; a fetched batch is always written back. Today's sun
    /// times are loaded before fetching so clear skies after dark are
    /// categorized as night.
    #[instrument(skip(self))]
    pub async fn load_weather(&self, view: View, force_refresh: bool, now: Now) -> WeatherLoad {
        if force_refresh {
            self.weather_cache.clear();
        } else if let Some(readings) = self.weather_cache.read(view, now.wall_ms) {
            return WeatherLoad {
                view,
                readings,
                from_cache: true,
            };
        }

        let is_night = self
            .load_sun_times(now)
            .await
            .is_some_and(|sun_times| sun::is_night(now.sky_ms, &sun_times));

        info!(view = %view, is_night, "Fetching fresh weather data");
        let readings = self.fetch_all(&locations::for_view(view), is_night).await;
        self.weather_cache.write(view, &readings, now.wall_ms);

        WeatherLoad {
            view,
            readings,
            from_cache: false,
        }
    }

    /// Today's sunrise and sunset, fetched at most once per local day.
    /// `None` when nothing is cached and the fetch fails.
    #[instrument(skip(self))]
    pub async fn load_sun_times(&self, now: Now) -> Option<SunTimes> {
        if let Some(sun_times) = self.sun_cache.read(now.wall_ms) {
            return Some(sun_times);
        }

        info!("Fetching fresh sun times");
        match self.source.fetch_observation(&self.sun_location).await {
            Ok(observation) => {
                let sun_times = observation.sun_times();
                self.sun_cache.write(sun_times, now.wall_ms);
                Some(sun_times)
            }
            Err(e) => {
                warn!(error = %e, "Error fetching sun times");
                None
            }
        }
    }

    /// Night according to cached sun times; day when none are cached
    pub fn is_night(&self, now: Now) -> bool {
        self.sun_cache
            .read(now.wall_ms)
            .is_some_and(|sun_times| sun::is_night(now.sky_ms, &sun_times))
    }
}
