//! InspireHEP Tools - HTTP server exposing the literature tools
//!
//! Serves search, paper details and author publications with a response cache.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use inspirehep_tools::api::create_router;
use inspirehep_tools::{create_cache, AppState, Config, InspireClient};

/// Main entry point for the InspireHEP tools server.
///
/// # Startup Sequence
/// 1. Load `.env` if present
/// 2. Load configuration from environment variables
/// 3. Initialize tracing subscriber for logging
/// 4. Create the cache tier chosen by configuration
/// 5. Create the rate-limited InspireHEP client
/// 6. Start HTTP server on configured port
/// 7. Handle graceful shutdown on SIGINT/SIGTERM
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    if let Err(err) = dotenvy::dotenv() {
        if !err.not_found() {
            eprintln!("Failed to load .env: {}", err);
        }
    }

    let config = Config::from_env();

    // RUST_LOG overrides INSPIREHEP_LOG_LEVEL
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("inspirehep_tools={},tower_http=info", config.log_level).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting InspireHEP tools server");
    info!(
        "Configuration loaded: api={}, rate={}/s, cache_ttl={}s, cache_max_size={}, persistent={}, port={}",
        config.api_base_url,
        config.requests_per_second,
        config.cache_ttl,
        config.cache_max_size,
        config.cache_persistent,
        config.server_port
    );

    let cache = create_cache(&config.cache_options()).await;
    let client = InspireClient::new(&config).context("failed to create InspireHEP client")?;
    let state = AppState::new(Arc::new(client), cache);

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                warn!("Failed to install SIGTERM handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }
}
