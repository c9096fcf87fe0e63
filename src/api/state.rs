//! Application State
//!
//! Shared state accessible by all API handlers.
//! Wrapped in Arc for thread-safe sharing across async tasks.

use std::sync::Arc;
use std::time::Instant;

use crate::config::{ApiConfig, AuthConfig};
use crate::store::Store;

/// Shared application state for all handlers
#[derive(Clone)]
pub struct AppState {
    /// Accounts, doctor profiles, appointments and sessions
    pub store: Arc<Store>,
    /// API configuration
    pub api: Arc<ApiConfig>,
    /// Token lifetime and hashing parameters
    pub auth: Arc<AuthConfig>,
    /// Server start time for uptime tracking
    pub start_time: Instant,
}

impl AppState {
    pub fn new(store: Arc<Store>, api: ApiConfig, auth: AuthConfig) -> Self {
        Self {
            store,
            api: Arc::new(api),
            auth: Arc::new(auth),
            start_time: Instant::now(),
        }
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// Session lifetime for newly issued tokens
    pub fn token_ttl(&self) -> chrono::Duration {
        chrono::Duration::minutes(self.auth.token_ttl_minutes)
    }
}
