//! Arcadia - casual-games catalog backend
//!
//! REST API over the Arcadia catalog store: accounts, game catalog,
//! personal libraries, community chat and platform statistics.

use std::path::PathBuf;

use tokio::net::TcpListener;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use arcadia_core::Database;

mod config;
mod cookie;
mod envelope;
mod handlers;
mod routes;
mod session;
mod state;

use config::ServerConfig;
use state::AppState;

#[tokio::main]
async fn main() {
    // Initialize logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "arcadia_server=info,arcadia_core=info,tower_http=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!("Starting Arcadia");

    let config_path = std::env::var_os(config::CONFIG_ENV_VAR).map(PathBuf::from);
    let config = match ServerConfig::load(config_path.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    let db_path = match config.resolve_database_path() {
        Ok(path) => path,
        Err(e) => {
            tracing::error!("Failed to resolve database path: {e}");
            std::process::exit(1);
        }
    };
    if let Some(parent) = db_path.parent() {
        if let Err(e) = std::fs::create_dir_all(parent) {
            tracing::error!("Failed to create data directory: {e}");
            std::process::exit(1);
        }
    }

    let db = match Database::open(&db_path) {
        Ok(db) => db,
        Err(e) => {
            tracing::error!("Failed to open database: {e}");
            std::process::exit(1);
        }
    };
    tracing::info!(path = %db_path.display(), "Database ready");

    // Startup cleanup; a failure here should not prevent boot
    match db.users().cleanup_expired_sessions() {
        Ok(removed) => tracing::info!(removed, "Expired session cleanup completed"),
        Err(e) => tracing::warn!(error = %e, "Expired session cleanup failed, continuing anyway"),
    }

    let bind_addr = config.bind_addr.clone();
    let app = routes::router(AppState::new(db, config));

    let listener = match TcpListener::bind(&bind_addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("Failed to bind {bind_addr}: {e}");
            std::process::exit(1);
        }
    };
    tracing::info!("Listening on {bind_addr}");

    if let Err(e) = axum::serve(listener, app).await {
        tracing::error!("Server error: {e}");
        std::process::exit(1);
    }
}
