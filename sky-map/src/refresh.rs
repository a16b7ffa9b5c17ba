//! Periodic weather refresh and arc updates.
//!
//! A weather refresh cycle is guarded by an in-flight flag: a cycle that
//! starts while another is still running is skipped, so two cycles never
//! write the current batch concurrently.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;

use common::models::View;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use tracing::{Instrument, debug, info, info_span, warn};

use crate::api_client::WeatherSource;
use crate::clock::Clock;
use crate::orchestrator::{BatchSummary, Orchestrator};
use crate::state::AppState;
use crate::sun::ArcState;

/// Timer periods
#[derive(Debug, Clone)]
pub struct RefreshConfig {
    pub weather_interval: Duration,
    pub arc_interval: Duration,
}

impl Default for RefreshConfig {
    fn default() -> Self {
        Self {
            weather_interval: Duration::from_secs(30 * 60),
            arc_interval: Duration::from_secs(60),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RefreshOutcome {
    Completed {
        view: View,
        summary: BatchSummary,
        from_cache: bool,
    },
    Skipped,
}

/// Clears the in-flight flag however the cycle ends
struct InFlight<'a>(&'a AtomicBool);

impl<'a> InFlight<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlight<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub struct Refresher<S> {
    orchestrator: Orchestrator<S>,
    state: Arc<RwLock<AppState>>,
    clock: Clock,
    in_flight: AtomicBool,
}

impl<S: WeatherSource + 'static> Refresher<S> {
    pub fn new(orchestrator: Orchestrator<S>, state: Arc<RwLock<AppState>>, clock: Clock) -> Self {
        Self {
            orchestrator,
            state,
            clock,
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn state(&self) -> Arc<RwLock<AppState>> {
        self.state.clone()
    }

    /// Load the current view's batch and store it in the app state. If the
    /// view changes while a batch is loading, that batch is dropped and the
    /// new view is loaded instead.
    pub async fn refresh_weather(&self, force_refresh: bool) -> RefreshOutcome {
        let Some(_guard) = InFlight::acquire(&self.in_flight) else {
            warn!("Weather refresh already in flight, skipping");
            return RefreshOutcome::Skipped;
        };

        let mut force = force_refresh;
        loop {
            let view = self.state.read().await.view;
            let load = self
                .orchestrator
                .load_weather(view, force, self.clock.now())
                .await;

            let mut state = self.state.write().await;
            if state.view != view {
                debug!(loaded = %view, current = %state.view, "View changed during refresh, reloading");
                force = false;
                continue;
            }

            let summary = BatchSummary::from_readings(&load.readings);
            state.apply_batch(load.readings, self.clock.now().wall_ms);
            info!(
                view = %view,
                from_cache = load.from_cache,
                total = summary.total,
                failed = summary.failed,
                "Weather updated"
            );

            return RefreshOutcome::Completed {
                view,
                summary,
                from_cache: load.from_cache,
            };
        }
    }

    /// Switch views and load the new one (cache first)
    pub async fn switch_view(&self, view: View) -> RefreshOutcome {
        let changed = self.state.write().await.switch_view(view);
        if changed {
            info!(view = %view, "Switched view");
        }
        self.refresh_weather(false).await
    }

    /// Recompute the arc from sun times, fetching them if today's are missing
    pub async fn update_arc(&self) -> Option<ArcState> {
        let now = self.clock.now();
        let sun_times = self.orchestrator.load_sun_times(now).await;

        let mut state = self.state.write().await;
        let was_night = state.theme.is_night();
        let arc = state.apply_sun(sun_times, now.sky_ms).cloned();

        if let Some(arc) = &arc {
            if arc.is_night != was_night {
                info!(night = arc.is_night, "Switched day/night mode");
            }
            debug!(progress = arc.progress, label = %arc.remaining_label, "Arc updated");
        }
        arc
    }

    /// Drive both timers until cancelled. The first ticks are consumed
    /// immediately since the caller performs the initial load.
    pub async fn run(self: Arc<Self>, config: RefreshConfig, cancel: CancellationToken) {
        let mut weather_tick = tokio::time::interval(config.weather_interval);
        let mut arc_tick = tokio::time::interval(config.arc_interval);
        weather_tick.tick().await;
        arc_tick.tick().await;

        info!(
            weather_secs = config.weather_interval.as_secs(),
            arc_secs = config.arc_interval.as_secs(),
            "Refresh timers started"
        );

        loop {
            tokio::select! {
                _ = weather_tick.tick() => {
                    let this = self.clone();
                    tokio::spawn(
                        async move {
                            this.refresh_weather(true).await;
                        }
                        .instrument(info_span!("scheduled_refresh")),
                    );
                }
                _ = arc_tick.tick() => {
                    self.update_arc().await;
                }
                _ = cancel.cancelled() => {
                    info!("Refresh timers stopped");
                    break;
                }
            }
        }
    }
}
