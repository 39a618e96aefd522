//! Claim Router - API Server Binary
//!
//! # Usage
//!
//! ```bash
//! cargo run --bin claim-router
//!
//! ROUTER_PORT=9000 ROUTER_RULES_PATH=rules.json cargo run --bin claim-router
//! ```
//!
//! # Environment Variables
//!
//! * `ROUTER_HOST` - Server host (default: 0.0.0.0)
//! * `ROUTER_PORT` - Server port (default: 8080)
//! * `ROUTER_LOG_LEVEL` - trace, debug, info, warn, error (default: info)
//! * `ROUTER_RECENT_CAPACITY` - Entries kept in each status buffer (default: 200)
//! * `ROUTER_DATAFLOW` - `streaming` or `fallback` (default: streaming)
//! * `ROUTER_EVENT_CAPACITY` - Buffered events per subscriber (default: 1024)
//! * `ROUTER_RULES_PATH` - JSON rules file loaded at startup

use anyhow::Context;
use domain_routing::EngineHandle;
use interface_api::{create_router, config::ApiConfig};
use std::net::SocketAddr;
use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Loads configuration, starts the engine and serves until shutdown.
///
/// An engine that fails to initialize does not stop the server: the
/// routing endpoints answer 503 while health checks keep responding.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let config = load_config();
    init_tracing(&config.log_level);

    tracing::info!(
        host = %config.host,
        port = %config.port,
        dataflow = ?config.dataflow,
        "Starting claim router"
    );

    let engine = match EngineHandle::try_initialize(&config.engine_config()) {
        Ok(handle) => {
            tracing::info!("Routing engine ready");
            handle
        }
        Err(e) => {
            tracing::error!(error = %e, "Routing engine failed to initialize; serving as unavailable");
            EngineHandle::unavailable()
        }
    };

    let app = create_router(engine, config.clone());

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

fn load_config() -> ApiConfig {
    ApiConfig::from_env().unwrap_or_else(|e| {
        eprintln!("Falling back to per-variable configuration: {e}");
        ApiConfig::from_env_vars()
    })
}

fn init_tracing(log_level: &str) {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(log_level))
        .unwrap_or_else(|_| EnvFilter::new("info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(true))
        .init();
}

/// Waits for Ctrl+C or SIGTERM
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
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
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
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
