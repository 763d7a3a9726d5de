//! # Quincaillerie Jamal API Server
//!
//! REST server for the store management dashboard.
//!
//! ## Architecture
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                        API Server                                       │
//! │                                                                         │
//! │  Dashboard ───► HTTP (3001) ───► axum routes ───► jamal-db ───► SQLite │
//! │                                       │                                 │
//! │                                       ▼                                 │
//! │                      ledger / recorder / reports                        │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```

mod config;
mod error;
mod routes;

use std::net::SocketAddr;

use tracing::info;
use tracing_subscriber::EnvFilter;

use crate::config::ServerConfig;
use jamal_db::{Database, DbConfig};

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub config: ServerConfig,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing (RUST_LOG controls the filter, default info)
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    info!("Starting Quincaillerie Jamal API server...");

    // Load configuration
    let config = ServerConfig::load()?;
    info!(
        port = config.http_port,
        database = %config.database_path,
        policy = ?config.main_store_policy,
        "Configuration loaded"
    );

    // Connect to the database (creates the file and runs migrations)
    let db_config =
        DbConfig::new(&config.database_path).default_store_id(config.default_store_id.clone());
    let db = Database::new(db_config).await?;
    info!("Connected to SQLite");

    // Reserved settings defaults; existing values are never overwritten
    let outcomes = db.settings().ensure_defaults().await?;
    let created = outcomes.iter().filter(|(_, o)| o.is_created()).count();
    info!(created, "Settings defaults ensured");

    // Build the router
    let state = AppState {
        db,
        config: config.clone(),
    };
    let app = routes::router(state);

    // Start the server
    let addr: SocketAddr = format!("0.0.0.0:{}", config.http_port).parse()?;
    info!(%addr, "Starting HTTP server");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler.
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, starting graceful shutdown...");
}
