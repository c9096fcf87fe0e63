//! Health Routes
//!
//! - GET / - Welcome banner
//! - GET /health/live - Liveness check (process is alive)
//! - GET /health/ready - Readiness check (database reachable)
//! - GET /health - Full health status

use axum::{extract::State, http::StatusCode, Json};
use std::sync::Arc;

use crate::api::dto::HealthResponse;
use crate::api::state::AppState;
use crate::models::Message;

/// GET /
pub async fn root() -> Json<Message> {
    Json(Message::new("Welcome to MedConnect API"))
}

/// GET /health/live
///
/// Returns 200 if the process is alive, no dependency checks.
pub async fn liveness() -> StatusCode {
    StatusCode::OK
}

/// GET /health/ready
pub async fn readiness(State(state): State<Arc<AppState>>) -> StatusCode {
    if check_database(&state) {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    }
}

/// GET /health
pub async fn full_health(State(state): State<Arc<AppState>>) -> Json<HealthResponse> {
    let database_ok = check_database(&state);

    Json(HealthResponse {
        status: if database_ok { "healthy" } else { "unhealthy" }.to_string(),
        database: if database_ok { "ok" } else { "error" }.to_string(),
        uptime_seconds: state.uptime_seconds(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}

fn check_database(state: &AppState) -> bool {
    match state.store.ping() {
        Ok(()) => true,
        Err(e) => {
            tracing::error!("Database health check failed: {}", e);
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_liveness() {
        let status = liveness().await;
        assert_eq!(status, StatusCode::OK);
    }

    #[tokio::test]
    async fn test_root_banner() {
        let Json(body) = root().await;
        assert_eq!(body.message, "Welcome to MedConnect API");
    }
}
