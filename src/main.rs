use std::sync::Arc;
use std::time::Duration;

use tracing_subscriber::EnvFilter;
use weather_mood::{
    api::{create_router, AppState},
    config::Config,
    db::{create_redis_client, Cache},
    services::{CwaProvider, Library},
};

const SESSION_PRUNE_INTERVAL: Duration = Duration::from_secs(10 * 60);
const SESSION_MAX_IDLE: Duration = Duration::from_secs(24 * 60 * 60);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("weather_mood=info,tower_http=info")),
        )
        .init();

    let config = Config::from_env()?;

    let (cache, cache_handle) = match &config.redis_url {
        Some(url) => {
            tracing::info!("Forecast caching enabled");
            Cache::new(create_redis_client(url)?)
        }
        None => {
            tracing::info!("REDIS_URL not set, forecast caching disabled");
            Cache::disabled()
        }
    };

    let provider = CwaProvider::from_config(&config, cache)?;
    let library = Library::load(&config);
    let state =
        AppState::new(library, Arc::new(provider)).with_session_capacity(config.session_capacity);

    let sessions = state.sessions.clone();
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(SESSION_PRUNE_INTERVAL);
        loop {
            interval.tick().await;
            let removed = sessions.prune_idle(SESSION_MAX_IDLE).await;
            if removed > 0 {
                tracing::info!(removed, "Pruned idle sessions");
            }
        }
    });

    let app = create_router(state);

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, "Server running");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    cache_handle.shutdown().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutdown signal received");
}
