use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use chrono::{NaiveTime, TimeZone, Utc};
use chrono_tz::America::Los_Angeles;
use common::errors::AppError;
use common::models::{
    Category, Condition, Location, MainReadings, ObservationResponse, SolarTimes, View,
};
use sky_map::api_client::WeatherSource;
use sky_map::cache::{SunTimesCache, WeatherCache};
use sky_map::clock::Clock;
use sky_map::locations;
use sky_map::orchestrator::Orchestrator;
use sky_map::refresh::{RefreshOutcome, Refresher};
use sky_map::state::AppState;
use sky_map::store::MemoryStore;
use tokio::sync::{RwLock, Semaphore};

/// Holds every fetch until the test opens the gate
struct GatedSource {
    gate: Semaphore,
    calls: AtomicUsize,
}

impl GatedSource {
    fn closed() -> Self {
        Self {
            gate: Semaphore::new(0),
            calls: AtomicUsize::new(0),
        }
    }

    fn open() -> Self {
        Self {
            gate: Semaphore::new(Semaphore::MAX_PERMITS),
            calls: AtomicUsize::new(0),
        }
    }
}

impl WeatherSource for GatedSource {
    async fn fetch_observation(&self, _location: &Location) -> Result<ObservationResponse, AppError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let _permit = self
            .gate
            .acquire()
            .await
            .map_err(|e| AppError::internal(e.to_string()))?;

        let now_secs = chrono::Utc::now().timestamp();
        Ok(ObservationResponse {
            weather: vec![Condition {
                id: 804,
                description: "overcast clouds".to_string(),
            }],
            main: MainReadings { temp: 58.2 },
            sys: SolarTimes {
                sunrise: now_secs - 3600,
                sunset: now_secs + 3600,
            },
        })
    }
}

fn refresher(source: Arc<GatedSource>, view: View) -> Arc<Refresher<Arc<GatedSource>>> {
    refresher_with_clock(source, view, Clock::System)
}

fn refresher_with_clock<S: WeatherSource + 'static>(
    source: S,
    view: View,
    clock: Clock,
) -> Arc<Refresher<S>> {
    let store = Arc::new(MemoryStore::new());
    let orchestrator = Orchestrator::new(
        source,
        WeatherCache::new(store.clone()),
        SunTimesCache::new(store, Los_Angeles),
    );
    let state = Arc::new(RwLock::new(AppState::new(view)));
    Arc::new(Refresher::new(orchestrator, state, clock))
}

/// Clear skies, with the sun up from 07:00 to 18:00 local time today
struct ClearDaySource;

impl WeatherSource for ClearDaySource {
    async fn fetch_observation(&self, _location: &Location) -> Result<ObservationResponse, AppError> {
        let today = Utc::now().with_timezone(&Los_Angeles).date_naive();
        let local_secs = |hour| {
            Los_Angeles
                .from_local_datetime(&today.and_hms_opt(hour, 0, 0).unwrap())
                .unwrap()
                .timestamp()
        };

        Ok(ObservationResponse {
            weather: vec![Condition {
                id: 800,
                description: "clear sky".to_string(),
            }],
            main: MainReadings { temp: 52.0 },
            sys: SolarTimes {
                sunrise: local_secs(7),
                sunset: local_secs(18),
            },
        })
    }
}

#[tokio::test]
async fn overlapping_refresh_is_skipped() {
    let source = Arc::new(GatedSource::closed());
    let refresher = refresher(source.clone(), View::Neighborhoods);

    let first = tokio::spawn({
        let refresher = refresher.clone();
        async move { refresher.refresh_weather(true).await }
    });

    // Wait until the first cycle is blocked inside its fetches
    while source.calls.load(Ordering::SeqCst) == 0 {
        tokio::task::yield_now().await;
    }

    assert_eq!(refresher.refresh_weather(true).await, RefreshOutcome::Skipped);

    source.gate.add_permits(Semaphore::MAX_PERMITS);
    let outcome = first.await.expect("refresh task");
    let count = locations::for_view(View::Neighborhoods).len();
    assert!(matches!(
        outcome,
        RefreshOutcome::Completed { view: View::Neighborhoods, summary, from_cache: false }
            if summary.total == count && summary.failed == 0
    ));

    let state = refresher.state();
    let state = state.read().await;
    assert_eq!(state.readings.len(), count);
    assert!(state.readings.iter().all(|r| r.category == Category::Cloudy));
    assert!(state.last_updated.is_some());
}

#[tokio::test]
async fn switching_view_loads_the_new_set() {
    let source = Arc::new(GatedSource::open());
    let refresher = refresher(source.clone(), View::Citywide);

    refresher.refresh_weather(false).await;
    let outcome = refresher.switch_view(View::Neighborhoods).await;

    assert!(matches!(
        outcome,
        RefreshOutcome::Completed { view: View::Neighborhoods, from_cache: false, .. }
    ));
    let state = refresher.state();
    assert_eq!(
        state.read().await.readings.len(),
        locations::for_view(View::Neighborhoods).len()
    );
}

#[tokio::test]
async fn arc_update_fetches_sun_times_once() {
    let source = Arc::new(GatedSource::open());
    let refresher = refresher(source.clone(), View::Citywide);

    let arc = refresher.update_arc().await.expect("arc state");
    assert!(!arc.is_night);
    assert!(arc.remaining_label.ends_with("of daylight left"));

    refresher.update_arc().await.expect("arc state");
    assert_eq!(source.calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn view_switch_during_a_load_reloads_the_new_view() {
    let source = Arc::new(GatedSource::closed());
    let refresher = refresher(source.clone(), View::Citywide);

    let first = tokio::spawn({
        let refresher = refresher.clone();
        async move { refresher.refresh_weather(false).await }
    });

    while source.calls.load(Ordering::SeqCst) == 0 {
        tokio::task::yield_now().await;
    }

    // The running cycle owns the load; the switch itself is skipped
    assert_eq!(
        refresher.switch_view(View::Neighborhoods).await,
        RefreshOutcome::Skipped
    );

    source.gate.add_permits(Semaphore::MAX_PERMITS);
    let outcome = first.await.expect("refresh task");
    let expected = locations::for_view(View::Neighborhoods);
    assert!(matches!(
        outcome,
        RefreshOutcome::Completed { view: View::Neighborhoods, summary, .. }
            if summary.total == expected.len()
    ));

    let state = refresher.state();
    let state = state.read().await;
    assert_eq!(state.view, View::Neighborhoods);
    let names: Vec<_> = state.readings.iter().map(|r| r.location.name.as_str()).collect();
    let expected_names: Vec<_> = expected.iter().map(|l| l.name.as_str()).collect();
    assert_eq!(names, expected_names);
}

#[tokio::test]
async fn cold_start_at_night_marks_clear_skies_as_night() {
    let clock = Clock::TimeOfDay {
        time: NaiveTime::from_hms_opt(23, 0, 0).unwrap(),
        tz: Los_Angeles,
    };
    let refresher = refresher_with_clock(ClearDaySource, View::Neighborhoods, clock);

    // Weather first, with nothing cached yet
    refresher.refresh_weather(false).await;
    let arc = refresher.update_arc().await.expect("arc state");
    assert!(arc.is_night);

    let state = refresher.state();
    {
        let state = state.read().await;
        assert!(state.theme.is_night());
        assert!(!state.readings.is_empty());
        assert!(state.readings.iter().all(|r| r.category == Category::ClearNight));
    }

    let outcome = refresher.refresh_weather(false).await;
    assert!(matches!(outcome, RefreshOutcome::Completed { from_cache: true, .. }));
    assert!(
        state
            .read()
            .await
            .readings
            .iter()
            .all(|r| r.category == Category::ClearNight)
    );
}
