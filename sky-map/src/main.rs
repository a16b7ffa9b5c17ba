use std::sync::Arc;

use chrono_tz::Tz;
use common::http_client::HttpClient;
use common::tracing::init_from_env;
use sky_map::api_client::{ProxyClient, WeatherSource};
use sky_map::cache::{SunTimesCache, WeatherCache};
use sky_map::clock::format_clock;
use sky_map::command::Command;
use sky_map::config::{Config, StoreLocation};
use sky_map::orchestrator::Orchestrator;
use sky_map::refresh::Refresher;
use sky_map::state::{AppState, Bounds};
use sky_map::store::{FileStore, KeyValueStore, MemoryStore};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::signal;
use tokio::sync::RwLock;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_from_env();

    let config = Config::from_env()?;
    let store = open_store(&config.store);

    let source = ProxyClient::new(
        HttpClient::new(config.request_timeout_secs)?,
        config.proxy_url.clone(),
    );
    let orchestrator = Orchestrator::new(
        source,
        WeatherCache::new(store.clone()),
        SunTimesCache::new(store, config.timezone),
    );
    let state = Arc::new(RwLock::new(AppState::new(config.view)));
    let refresher = Arc::new(Refresher::new(orchestrator, state, config.clock));

    info!(proxy = %config.proxy_url, view = %config.view, "Sky map starting");

    if refresher.update_arc().await.is_none() {
        warn!("Sun times unavailable, arc widget disabled until they can be fetched");
    }
    refresher.refresh_weather(false).await;
    print_snapshot(&refresher.state(), config.timezone).await;

    let cancel = CancellationToken::new();
    tokio::spawn(watch_signals(cancel.clone()));
    tokio::spawn(read_commands(refresher.clone(), cancel.clone(), config.timezone));

    refresher.run(config.refresh.clone(), cancel).await;

    info!("Sky map stopped");
    Ok(())
}

fn open_store(location: &StoreLocation) -> Arc<dyn KeyValueStore> {
    match location {
        StoreLocation::Memory => Arc::new(MemoryStore::new()),
        StoreLocation::Directory(dir) => Arc::new(FileStore::new(dir.clone())),
        StoreLocation::PlatformDefault => match FileStore::platform_default() {
            Some(store) => {
                info!(dir = %store.dir().display(), "Caching to disk");
                Arc::new(store)
            }
            None => {
                warn!("No cache directory available, caching in memory");
                Arc::new(MemoryStore::new())
            }
        },
    }
}

async fn read_commands<S: WeatherSource + 'static>(
    refresher: Arc<Refresher<S>>,
    cancel: CancellationToken,
    tz: Tz,
) {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let line = tokio::select! {
            line = lines.next_line() => line,
            _ = cancel.cancelled() => break,
        };

        let line = match line {
            Ok(Some(line)) => line,
            Ok(None) => break,
            Err(e) => {
                error!(error = %e, "Failed to read command");
                break;
            }
        };

        match Command::parse(&line) {
            Ok(Command::View(view)) => {
                refresher.switch_view(view).await;
            }
            Ok(Command::Filter(category)) => {
                let active = refresher.state().write().await.toggle_filter(category);
                info!(filter = ?active, "Filter changed");
            }
            Ok(Command::Refresh) => {
                refresher.refresh_weather(true).await;
            }
            Ok(Command::Show) => {}
            Ok(Command::Quit) => {
                cancel.cancel();
                break;
            }
            Err(message) => {
                warn!("{}", message);
                continue;
            }
        }

        print_snapshot(&refresher.state(), tz).await;
    }
}

async fn print_snapshot(state: &RwLock<AppState>, tz: Tz) {
    let state = state.read().await;
    let theme = state.theme;

    println!("{} {} ({})", theme.icon(), theme.title(), state.view);
    println!("  {}", theme.subtitle());

    if let Some(arc) = &state.arc {
        println!(
            "  {} - {}: {}",
            format_clock(arc.start, tz),
            format_clock(arc.end, tz),
            arc.remaining_label
        );
    }

    match state.last_updated {
        Some(ms) => println!("  Last updated: {}", format_clock(ms, tz)),
        None => println!("  Loading weather data..."),
    }
    if let Some(filter) = state.active_filter {
        println!("  Filter: {}", filter.label());
    }

    for marker in state.markers() {
        println!(
            "  {} {:<16} {:>5}  {}",
            marker.icon,
            marker.name,
            marker.temp_text.as_deref().unwrap_or(""),
            marker.description
        );
    }

    if let Some(message) = state.no_match_message(&Bounds::initial(state.view)) {
        println!("  {}", message);
    }
}

async fn watch_signals(cancel: CancellationToken) {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            error!(error = %e, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received SIGINT, shutting down...");
        },
        _ = terminate => {
            info!("Received SIGTERM, shutting down...");
        },
        _ = cancel.cancelled() => return,
    }

    cancel.cancel();
}
