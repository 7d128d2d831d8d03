//! Debt & Recovery Ledger - API Server Binary
//!
//! This binary starts the HTTP API server the local UI talks to.
//!
//! # Usage
//!
//! ```bash
//! # Run with default configuration (JSON files under ./data)
//! cargo run --bin debt-ledger-api
//!
//! # Run with environment variables
//! API_PORT=9000 API_DATA_DIR=/var/lib/ledger cargo run --bin debt-ledger-api
//! ```
//!
//! # Environment Variables
//!
//! * `API_HOST` - Server host (default: 127.0.0.1)
//! * `API_PORT` - Server port (default: 8080)
//! * `API_DATA_DIR` - Directory of the JSON file store (default: ./data)
//! * `API_STORE_BACKEND` - `file` or `memory` (default: file)
//! * `API_TIMEZONE` - IANA zone for "today" (default: Asia/Kolkata)
//! * `API_LOG_LEVEL` - Log level: trace, debug, info, warn, error (default: info)
//! * `API_REQUIRE_BASELINE` - Reject PnL entries before a baseline exists (default: true)
//! * `API_UPCOMING_LIMIT`, `API_PAID_LIMIT`, `API_PLANNER_WINDOW_DAYS` - Dashboard sizes

use std::net::SocketAddr;

use anyhow::Context;
use infra_store::open_store;
use interface_api::{config::ApiConfig, create_router, AppState};
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present (useful for local development)
    dotenvy::dotenv().ok();

    let config = ApiConfig::from_env().context("invalid API_* configuration")?;

    init_tracing(&config.log_level);

    tracing::info!(
        host = %config.host,
        port = %config.port,
        backend = ?config.store_backend,
        "Starting debt ledger API server"
    );

    let store = open_store(&config.store_config())
        .await
        .context("failed to open the store")?;

    let state = AppState::load(store, &config).await;
    let app = create_router(state);

    let addr: SocketAddr = config
        .server_addr()
        .parse()
        .with_context(|| format!("invalid server address {}", config.server_addr()))?;

    tracing::info!(%addr, "Server listening");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Initializes the tracing subscriber for structured logging.
///
/// `RUST_LOG` wins over the configured level.
fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
