//! MedConnect API Server
//!
//! Run with: cargo run --bin medconnect-api
//!
//! # Configuration
//!
//! Read from `MEDCONNECT_CONFIG` when set, otherwise from the default
//! config locations. Environment variables override file values:
//! - `MEDCONNECT_API_HOST`, `MEDCONNECT_API_PORT`: bind address (default 0.0.0.0:8000)
//! - `MEDCONNECT_DB_PATH`: SQLite database file
//! - `MEDCONNECT_ADMIN_EMAIL`, `MEDCONNECT_ADMIN_PASSWORD`, `MEDCONNECT_ADMIN_NAME`:
//!   admin account created at startup when missing
//! - `RUST_LOG`: log filter (wins over `[logging] level`)

use anyhow::Context;
use medconnect::api::{bootstrap_admin, serve, spawn_session_sweeper, AppState};
use medconnect::config::Config;
use medconnect::logging::init_logging;
use medconnect::store::Store;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;

const SESSION_SWEEP_INTERVAL: Duration = Duration::from_secs(300);

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = load_config()?;
    init_logging(&config.logging)?;

    tracing::info!("Starting MedConnect API server v{}", env!("CARGO_PKG_VERSION"));
    tracing::info!("Database: {}", config.database.path);

    let store = Arc::new(
        Store::open(Path::new(&config.database.path))
            .with_context(|| format!("opening database {}", config.database.path))?,
    );

    match bootstrap_admin(&store, &config.auth)? {
        Some(admin) => tracing::info!(user_id = admin.id, email = %admin.email, "Admin account ready"),
        None => tracing::info!("No admin account configured (set MEDCONNECT_ADMIN_EMAIL and MEDCONNECT_ADMIN_PASSWORD)"),
    }

    let sweeper = spawn_session_sweeper(Arc::clone(&store), SESSION_SWEEP_INTERVAL);

    let state = AppState::new(store, config.api, config.auth);
    let result = serve(state).await;

    sweeper.abort();
    tracing::info!("MedConnect API server stopped");
    result.map_err(Into::into)
}

fn load_config() -> anyhow::Result<Config> {
    match std::env::var_os("MEDCONNECT_CONFIG") {
        Some(path) => {
            let path = PathBuf::from(path);
            Config::load_with_env(&path).with_context(|| format!("loading {}", path.display()))
        }
        None => Ok(Config::load_default()),
    }
}
