//! MedConnect REST API
//!
//! HTTP API layer for the clinic, built with Axum.
//!
//! # Endpoints
//!
//! ## Auth
//! - `POST /auth/register` - Create a patient or doctor account
//! - `POST /auth/login` - Issue a bearer token
//! - `POST /auth/logout` - Revoke the current token
//! - `GET /auth/me` - Current account
//! - `GET /auth/profile` - Current account, profile view
//! - `PUT /auth/update-profile` - Multipart profile edit
//! - `GET /auth/profile-image/:id` - Avatar bytes
//!
//! ## Admin
//! - `GET /admin/dashboard` - Admin greeting
//!
//! ## Doctors
//! - `GET /doctors/all` - All profiles (admin)
//! - `GET /doctors/approved` - Approved profiles
//! - `GET /doctors/me` - Own profile (doctor)
//! - `POST /doctors/create` - Create or update own profile (doctor)
//! - `PUT /doctors/approve/:id` - Approve a profile (admin)
//!
//! ## Appointments
//! - `GET /appointments/admin` - All appointments (admin)
//! - `GET /appointments/doctor` - Own appointments (doctor)
//! - `GET /appointments/patient` - Own appointments (patient)
//! - `POST /appointments/book` - Book an appointment (patient)
//! - `PUT /appointments/:id/status` - Confirm or reject (doctor)
//! - `DELETE /appointments/:id` - Cancel (patient)
//!
//! ## Health
//! - `GET /` - Welcome banner
//! - `GET /health/live` - Liveness check
//! - `GET /health/ready` - Readiness check
//! - `GET /health` - Full health status
//!
//! # Example
//!
//! ```rust,ignore
//! use medconnect::api::{serve, AppState};
//! use medconnect::config::Config;
//! use medconnect::store::Store;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::load_default();
//!     let store = Arc::new(Store::open(config.database.path.as_ref())?);
//!     serve(AppState::new(store, config.api, config.auth)).await?;
//!     Ok(())
//! }
//! ```

pub mod dto;
pub mod error;
pub mod extract;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult, ErrorResponse};
pub use state::AppState;

use axum::{
    extract::DefaultBodyLimit,
    http::{HeaderValue, Method},
    routing::{delete, get, post, put},
    Router,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use crate::auth::hash_password;
use crate::config::AuthConfig;
use crate::models::{Role, User};
use crate::store::{NewUser, Store, StoreResult};

/// Build the API router with all routes and middleware
pub fn build_router(state: AppState) -> Router {
    let auth_routes = Router::new()
        .route("/register", post(routes::auth::register))
        .route("/login", post(routes::auth::login))
        .route("/logout", post(routes::auth::logout))
        .route("/me", get(routes::auth::me))
        .route("/profile", get(routes::auth::profile))
        .route("/update-profile", put(routes::auth::update_profile))
        .route("/profile-image/:id", get(routes::auth::profile_image));

    let doctor_routes = Router::new()
        .route("/all", get(routes::doctors::list_all))
        .route("/approved", get(routes::doctors::list_approved))
        .route("/me", get(routes::doctors::me))
        .route("/create", post(routes::doctors::create))
        .route("/approve/:id", put(routes::doctors::approve));

    let appointment_routes = Router::new()
        .route("/admin", get(routes::appointments::list_all))
        .route("/doctor", get(routes::appointments::list_for_doctor))
        .route("/patient", get(routes::appointments::list_for_patient))
        .route("/book", post(routes::appointments::book))
        .route("/:id/status", put(routes::appointments::update_status))
        .route("/:id", delete(routes::appointments::cancel));

    let health_routes = Router::new()
        .route("/live", get(routes::health::liveness))
        .route("/ready", get(routes::health::readiness))
        .route("/", get(routes::health::full_health));

    let cors = cors_layer(&state.api.cors_origins);
    let body_limit = DefaultBodyLimit::max(state.api.max_upload_bytes);

    // Create shared state
    let shared_state = Arc::new(state);

    Router::new()
        .route("/", get(routes::health::root))
        .nest("/auth", auth_routes)
        .route("/admin/dashboard", get(routes::admin::dashboard))
        .nest("/doctors", doctor_routes)
        .nest("/appointments", appointment_routes)
        .nest("/health", health_routes)
        .layer(body_limit)
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(shared_state)
}

/// Allow the configured dashboard origins, or any origin when none are set
fn cors_layer(origins: &[String]) -> CorsLayer {
    if origins.is_empty() {
        return CorsLayer::permissive();
    }

    let allowed: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                tracing::warn!(origin = %origin, "Ignoring invalid CORS origin");
                None
            }
        })
        .collect();

    CorsLayer::new()
        .allow_origin(allowed)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
        .allow_headers(Any)
}

/// Start the API server on the configured address
pub async fn serve(state: AppState) -> Result<(), ApiError> {
    let addr = state.api.addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    tracing::info!("MedConnect API listening on {}", addr);

    axum::serve(listener, build_router(state))
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| ApiError::Internal(format!("Server error: {}", e)))?;

    tracing::info!("MedConnect API shut down gracefully");
    Ok(())
}

/// Make sure the configured admin account exists.
///
/// Returns the account when credentials are configured. An existing account
/// with the same email is left untouched.
pub fn bootstrap_admin(store: &Store, auth: &AuthConfig) -> StoreResult<Option<User>> {
    let Some((name, email, password)) = auth.bootstrap_admin() else {
        tracing::debug!("No bootstrap admin configured");
        return Ok(None);
    };

    let email = email.trim().to_ascii_lowercase();
    if let Some(existing) = store.find_user_by_email(&email)? {
        if existing.user.role != Role::Admin {
            tracing::warn!(
                email = %email,
                role = %existing.user.role,
                "Bootstrap admin email belongs to a non-admin account"
            );
        }
        return Ok(Some(existing.user));
    }

    let (user, _) = store.ensure_user(NewUser {
        name: name.to_string(),
        email,
        password_hash: hash_password(password, auth.pbkdf2_iterations),
        role: Role::Admin,
    })?;
    tracing::info!(user_id = user.id, "Created bootstrap admin account");
    Ok(Some(user))
}

/// Periodically delete expired bearer sessions
pub fn spawn_session_sweeper(store: Arc<Store>, every: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(every);

        // Skip the first immediate tick
        ticker.tick().await;

        loop {
            ticker.tick().await;

            match store.purge_expired_sessions() {
                Ok(0) => {}
                Ok(removed) => tracing::info!(removed, "Purged expired sessions"),
                Err(e) => tracing::error!(error = %e, "Session sweep failed"),
            }
        }
    })
}

/// Wait for shutdown signal
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
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
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
