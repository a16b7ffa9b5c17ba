use common::http_client::HttpClient;
use common::tracing::init_from_env;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::signal;
use tokio_util::sync::CancellationToken;
use tracing::{error, info, warn};
use weather_proxy::{api_client::OpenWeatherClient, config::Config, create_router, handlers};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_from_env();

    let config = Config::from_env();
    let Some(api_key) = config.api_key.clone() else {
        error!("OPENWEATHER_API_KEY must be set");
        return Err("OPENWEATHER_API_KEY must be set".into());
    };

    let http_client = HttpClient::new(config.request_timeout_secs)?;
    let client = Arc::new(OpenWeatherClient::new(
        http_client,
        config.openweather_url.clone(),
        api_key,
        config.units.clone(),
    ));

    let app = create_router(handlers::AppState { client }, config.enable_docs);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    info!(docs = config.enable_docs, "Weather proxy starting on {}", addr);

    let shutdown = CancellationToken::new();
    tokio::spawn(watch_signals(shutdown.clone()));

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown.cancelled_owned())
        .await?;

    info!("Weather proxy stopped");
    Ok(())
}

async fn watch_signals(shutdown: CancellationToken) {
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
            info!("Received SIGINT, starting graceful shutdown...");
        },
        _ = terminate => {
            info!("Received SIGTERM, starting graceful shutdown...");
        },
    }

    shutdown.cancel();
    warn!("Shutting down gracefully...");
}
