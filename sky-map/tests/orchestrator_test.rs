use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use chrono_tz::America::Los_Angeles;
use common::errors::AppError;
use common::models::{
    Category, Condition, Location, MainReadings, ObservationResponse, SolarTimes, View,
};
use sky_map::api_client::WeatherSource;
use sky_map::cache::{SunTimesCache, WeatherCache};
use sky_map::clock::Now;
use sky_map::locations;
use sky_map::orchestrator::Orchestrator;
use sky_map::store::MemoryStore;
use tokio::sync::Barrier;

const NOW: i64 = 1_760_900_000_000;

fn observation(code: i64, temp: f64) -> ObservationResponse {
    ObservationResponse {
        weather: vec![Condition {
            id: code,
            description: "test conditions".to_string(),
        }],
        main: MainReadings { temp },
        sys: SolarTimes {
            sunrise: NOW / 1000 - 3 * 3600,
            sunset: NOW / 1000 + 8 * 3600,
        },
    }
}

/// Answers clear skies everywhere except the named locations
#[derive(Default)]
struct ScriptedSource {
    failing: HashSet<String>,
    code: i64,
    calls: AtomicUsize,
}

impl ScriptedSource {
    fn clear() -> Self {
        Self {
            code: 800,
            ..Self::default()
        }
    }

    fn failing(names: &[&str]) -> Self {
        Self {
            failing: names.iter().map(|n| n.to_string()).collect(),
            code: 800,
            ..Self::default()
        }
    }
}

impl WeatherSource for ScriptedSource {
    async fn fetch_observation(&self, location: &Location) -> Result<ObservationResponse, AppError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.contains(&location.name) {
            return Err(AppError::http(502, "bad gateway"));
        }
        Ok(observation(self.code, 64.4))
    }
}

fn orchestrator<S: WeatherSource>(source: S) -> (Orchestrator<S>, Arc<MemoryStore>) {
    let store = Arc::new(MemoryStore::new());
    let orchestrator = Orchestrator::new(
        source,
        WeatherCache::new(store.clone()),
        SunTimesCache::new(store.clone(), Los_Angeles),
    );
    (orchestrator, store)
}

fn three_locations() -> Vec<Location> {
    vec![
        Location::new("Mission", 37.7599, -122.4148),
        Location::new("Marina", 37.8037, -122.4368),
        Location::new("Castro", 37.7609, -122.435),
    ]
}

#[tokio::test]
async fn one_failure_does_not_sink_the_batch() {
    let (orchestrator, _) = orchestrator(ScriptedSource::failing(&["Marina"]));

    let readings = orchestrator.fetch_all(&three_locations(), false).await;

    assert_eq!(readings.len(), 3);
    let names: Vec<_> = readings.iter().map(|r| r.location.name.as_str()).collect();
    assert_eq!(names, ["Mission", "Marina", "Castro"]);

    assert_eq!(readings[1].category, Category::Unknown);
    assert!(readings[1].is_failed());
    assert_eq!(readings[1].temp, None);

    for reading in [&readings[0], &readings[2]] {
        assert_eq!(reading.category, Category::Sunny);
        assert_eq!(reading.temp, Some(64));
        assert!(!reading.is_failed());
    }
}

#[tokio::test]
async fn night_flag_is_applied_to_clear_skies() {
    let (orchestrator, _) = orchestrator(ScriptedSource::clear());
    let readings = orchestrator.fetch_all(&three_locations(), true).await;
    assert!(readings.iter().all(|r| r.category == Category::ClearNight));
}

#[tokio::test]
async fn empty_location_list_yields_empty_batch() {
    let (orchestrator, _) = orchestrator(ScriptedSource::clear());
    assert!(orchestrator.fetch_all(&[], false).await.is_empty());
}

/// Every fetch waits until all of them have started
struct RendezvousSource {
    barrier: Barrier,
}

impl WeatherSource for RendezvousSource {
    async fn fetch_observation(&self, _location: &Location) -> Result<ObservationResponse, AppError> {
        self.barrier.wait().await;
        Ok(observation(801, 55.0))
    }
}

#[tokio::test]
async fn fetches_are_issued_concurrently() {
    let locations = three_locations();
    let (orchestrator, _) = orchestrator(RendezvousSource {
        barrier: Barrier::new(locations.len()),
    });

    let readings = tokio::time::timeout(
        Duration::from_secs(5),
        orchestrator.fetch_all(&locations, false),
    )
    .await
    .expect("fetches ran one at a time");

    assert!(readings.iter().all(|r| r.category == Category::PartlyCloudy));
}

#[tokio::test]
async fn cache_hit_skips_fetching() {
    let source = Arc::new(ScriptedSource::clear());
    let (orchestrator, _) = orchestrator(source.clone());
    let expected = locations::for_view(View::Neighborhoods).len();

    let first = orchestrator.load_weather(View::Neighborhoods, false, Now::at(NOW)).await;
    assert!(!first.from_cache);
    assert_eq!(first.readings.len(), expected);
    // One extra call for today's sun times
    assert_eq!(source.calls.load(Ordering::SeqCst), expected + 1);

    let second = orchestrator
        .load_weather(View::Neighborhoods, false, Now::at(NOW + 60_000))
        .await;
    assert!(second.from_cache);
    assert_eq!(second.readings, first.readings);
    assert_eq!(source.calls.load(Ordering::SeqCst), expected + 1);
}

#[tokio::test]
async fn other_view_or_stale_cache_refetches() {
    let source = Arc::new(ScriptedSource::clear());
    let (orchestrator, _) = orchestrator(source.clone());
    let neighborhoods = locations::for_view(View::Neighborhoods).len();
    let citywide = locations::for_view(View::Citywide).len();

    orchestrator.load_weather(View::Neighborhoods, false, Now::at(NOW)).await;
    let switched = orchestrator.load_weather(View::Citywide, false, Now::at(NOW + 1)).await;
    assert!(!switched.from_cache);
    assert_eq!(switched.readings.len(), citywide);

    let stale = orchestrator
        .load_weather(View::Citywide, false, Now::at(NOW + 11 * 60 * 1000))
        .await;
    assert!(!stale.from_cache);
    assert_eq!(
        source.calls.load(Ordering::SeqCst),
        neighborhoods + 2 * citywide + 1
    );
}

#[tokio::test]
async fn forced_refresh_bypasses_a_fresh_cache() {
    let source = Arc::new(ScriptedSource::clear());
    let (orchestrator, _) = orchestrator(source.clone());
    let count = locations::for_view(View::Citywide).len();

    orchestrator.load_weather(View::Citywide, false, Now::at(NOW)).await;
    let forced = orchestrator.load_weather(View::Citywide, true, Now::at(NOW + 1)).await;

    assert!(!forced.from_cache);
    assert_eq!(source.calls.load(Ordering::SeqCst), 2 * count + 1);
}

#[tokio::test]
async fn sun_times_are_converted_and_cached_for_the_day() {
    let source = Arc::new(ScriptedSource::clear());
    let (orchestrator, _) = orchestrator(source.clone());

    let sun_times = orchestrator.load_sun_times(Now::at(NOW)).await.expect("sun times");
    assert_eq!(sun_times.sunrise, (NOW / 1000 - 3 * 3600) * 1000);
    assert_eq!(sun_times.sunset, (NOW / 1000 + 8 * 3600) * 1000);

    assert_eq!(orchestrator.load_sun_times(Now::at(NOW + 60_000)).await, Some(sun_times));
    assert_eq!(source.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn sun_times_failure_yields_none() {
    let reference = locations::sun_reference();
    let (orchestrator, _) = orchestrator(ScriptedSource::failing(&[reference.name.as_str()]));
    assert_eq!(orchestrator.load_sun_times(Now::at(NOW)).await, None);
}

#[tokio::test]
async fn cached_sun_times_drive_night_categories() {
    let (orchestrator, _) = orchestrator(ScriptedSource::clear());

    // Day by default, and while the cached sun is up
    assert!(!orchestrator.is_night(Now::at(NOW)));
    orchestrator.load_sun_times(Now::at(NOW)).await;
    assert!(!orchestrator.is_night(Now::at(NOW)));

    // Same local day, after sunset
    let evening = NOW + 9 * 3600 * 1000;
    assert!(orchestrator.is_night(Now::at(evening)));
    let batch = orchestrator.load_weather(View::Citywide, true, Now::at(evening)).await;
    assert!(batch.readings.iter().all(|r| r.category == Category::ClearNight));
}

#[tokio::test]
async fn first_load_after_dark_fetches_sun_times_before_categorizing() {
    let source = Arc::new(ScriptedSource::clear());
    let (orchestrator, _) = orchestrator(source.clone());

    // Nothing cached yet, and the sun set an hour ago
    let evening = NOW + 9 * 3600 * 1000;
    let batch = orchestrator
        .load_weather(View::Neighborhoods, false, Now::at(evening))
        .await;

    assert!(!batch.from_cache);
    assert!(batch.readings.iter().all(|r| r.category == Category::ClearNight));
    assert!(orchestrator.is_night(Now::at(evening)));

    let cached = orchestrator
        .load_weather(View::Neighborhoods, false, Now::at(evening + 60_000))
        .await;
    assert!(cached.from_cache);
    assert!(cached.readings.iter().all(|r| r.category == Category::ClearNight));
}

#[tokio::test]
async fn weather_cache_ages_by_wall_time_not_sky_time() {
    let source = Arc::new(ScriptedSource::clear());
    let (orchestrator, _) = orchestrator(source.clone());
    let pinned = |wall_ms| Now {
        sky_ms: NOW,
        wall_ms,
    };

    orchestrator
        .load_weather(View::Citywide, false, pinned(NOW))
        .await;
    let later = orchestrator
        .load_weather(View::Citywide, false, pinned(NOW + 11 * 60 * 1000))
        .await;

    assert!(!later.from_cache);
}
