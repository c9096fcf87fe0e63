//! Data Transfer Objects
//!
//! API-only request and response types. Entity payloads shared with the
//! dashboard client live in [`crate::models`].

use serde::{Deserialize, Serialize};

/// Full health status
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    /// "healthy" or "unhealthy"
    pub status: String,
    /// "ok" or "error"
    pub database: String,
    pub uptime_seconds: u64,
    pub version: String,
}

/// Fields collected from the `PUT /auth/update-profile` multipart body.
/// Empty text fields count as absent.
#[derive(Debug, Default)]
pub struct ProfileUpdateForm {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub image: Option<UploadedImage>,
}

#[derive(Debug)]
pub struct UploadedImage {
    pub file_name: Option<String>,
    pub content_type: String,
    pub bytes: Vec<u8>,
}
