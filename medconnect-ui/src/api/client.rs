//! HTTP API Client
//!
//! Functions for communicating with the MedConnect REST API. Every
//! authenticated call attaches `Authorization: Bearer <token>` read from
//! storage at send time.

use gloo_net::http::{Request, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use thiserror::Error;

use super::session;
use crate::state::models::{
    Appointment, BookingRequest, DoctorProfile, DoctorProfileRequest, LoginRequest, Message,
    RegisterRequest, Role, StatusUpdate, TokenResponse, User, UserProfile, AppointmentStatus,
};

/// Default API base URL
pub const DEFAULT_API_BASE: &str = "http://127.0.0.1:8000";

/// Shown when the profile has no image
pub const PLACEHOLDER_AVATAR: &str = "https://cdn-icons-png.flaticon.com/512/3135/3135715.png";

const API_URL_KEY: &str = "medconnect_api_url";

/// Get the API base URL from local storage or use default
pub fn get_api_base() -> String {
    let url = web_sys::window()
        .and_then(|window| window.local_storage().ok().flatten())
        .and_then(|storage| storage.get_item(API_URL_KEY).ok().flatten())
        .unwrap_or_else(|| DEFAULT_API_BASE.to_string());
    url.trim_end_matches('/').to_string()
}

/// Absolute URL for a stored image path, or the placeholder
pub fn image_url(base: &str, path: Option<&str>) -> String {
    match path.map(str::trim).filter(|p| !p.is_empty()) {
        Some(p) if p.starts_with("http://") || p.starts_with("https://") || p.starts_with("data:") => {
            p.to_string()
        }
        Some(p) => format!("{}/{}", base.trim_end_matches('/'), p.trim_start_matches('/')),
        None => PLACEHOLDER_AVATAR.to_string(),
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ApiError {
    #[error("Network error: {0}")]
    Network(String),

    /// 401: the token expired or was revoked
    #[error("Unauthorized: {}", .0.as_deref().unwrap_or("Could not validate credentials"))]
    Unauthorized(Option<String>),

    #[error("HTTP {status}: {}", .detail.as_deref().unwrap_or("request failed"))]
    Status { status: u16, detail: Option<String> },

    #[error("Parse error: {0}")]
    Parse(String),
}

impl ApiError {
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Unauthorized(_))
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::Status { status: 404, .. })
    }

    /// Backend `detail` when present, else `fallback`
    pub fn user_message(&self, fallback: &str) -> String {
        match self {
            ApiError::Unauthorized(Some(detail)) => detail.clone(),
            ApiError::Status {
                detail: Some(detail),
                ..
            } => detail.clone(),
            _ => fallback.to_string(),
        }
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[derive(serde::Deserialize)]
struct ErrorBody {
    #[serde(default)]
    detail: Option<String>,
}

fn error_from_status(status: u16, detail: Option<String>) -> ApiError {
    if status == 401 {
        ApiError::Unauthorized(detail)
    } else {
        ApiError::Status { status, detail }
    }
}

fn url(path: &str) -> String {
    format!("{}{}", get_api_base(), path)
}

fn authorized(builder: RequestBuilder) -> RequestBuilder {
    match session::token() {
        Some(token) => builder.header("Authorization", &format!("Bearer {}", token)),
        None => builder,
    }
}

async fn send(request: Request) -> ApiResult<Response> {
    let response = request
        .send()
        .await
        .map_err(|e| ApiError::Network(e.to_string()))?;

    if !response.ok() {
        let status = response.status();
        let detail = response.json::<ErrorBody>().await.ok().and_then(|b| b.detail);
        return Err(error_from_status(status, detail));
    }
    Ok(response)
}

async fn read<T: DeserializeOwned>(request: Request) -> ApiResult<T> {
    send(request)
        .await?
        .json()
        .await
        .map_err(|e| ApiError::Parse(e.to_string()))
}

fn build(builder: RequestBuilder) -> ApiResult<Request> {
    builder.build().map_err(|e| ApiError::Network(e.to_string()))
}

fn with_json<B: serde::Serialize>(builder: RequestBuilder, body: &B) -> ApiResult<Request> {
    builder
        .json(body)
        .map_err(|e| ApiError::Parse(format!("Request build error: {}", e)))
}

// ============ Auth ============

pub async fn register(req: &RegisterRequest) -> ApiResult<User> {
    read(with_json(Request::post(&url("/auth/register")), req)?).await
}

pub async fn login(req: &LoginRequest) -> ApiResult<TokenResponse> {
    read(with_json(Request::post(&url("/auth/login")), req)?).await
}

/// Revoke `token` on the server. Takes the token explicitly because the
/// local session is cleared without waiting for this call.
pub async fn logout(token: &str) -> ApiResult<Message> {
    let builder = Request::post(&url("/auth/logout"))
        .header("Authorization", &format!("Bearer {}", token));
    read(build(builder)?).await
}

pub async fn me() -> ApiResult<User> {
    read(build(authorized(Request::get(&url("/auth/me"))))?).await
}

pub async fn profile() -> ApiResult<UserProfile> {
    read(build(authorized(Request::get(&url("/auth/profile"))))?).await
}

/// Multipart `name`, `email`, optional `password` and `profile_image`
pub async fn update_profile(
    name: &str,
    email: &str,
    password: &str,
    image: Option<&web_sys::File>,
) -> ApiResult<UserProfile> {
    let form = web_sys::FormData::new().map_err(|e| ApiError::Network(format!("{:?}", e)))?;
    let append = |key: &str, value: &str| {
        form.append_with_str(key, value)
            .map_err(|e| ApiError::Network(format!("{:?}", e)))
    };
    append("name", name)?;
    append("email", email)?;
    if !password.is_empty() {
        append("password", password)?;
    }
    if let Some(file) = image {
        form.append_with_blob_and_filename("profile_image", file, &file.name())
            .map_err(|e| ApiError::Network(format!("{:?}", e)))?;
    }

    let request = authorized(Request::put(&url("/auth/update-profile")))
        .body(form)
        .map_err(|e| ApiError::Network(e.to_string()))?;
    read(request).await
}

// ============ Doctors ============

pub async fn all_doctors() -> ApiResult<Vec<DoctorProfile>> {
    read(build(authorized(Request::get(&url("/doctors/all"))))?).await
}

pub async fn approved_doctors() -> ApiResult<Vec<DoctorProfile>> {
    read(build(authorized(Request::get(&url("/doctors/approved"))))?).await
}

/// `None` when the doctor has not created a profile yet
pub async fn my_doctor_profile() -> ApiResult<Option<DoctorProfile>> {
    match read(build(authorized(Request::get(&url("/doctors/me"))))?).await {
        Ok(profile) => Ok(Some(profile)),
        Err(e) if e.is_not_found() => Ok(None),
        Err(e) => Err(e),
    }
}

pub async fn create_doctor_profile(req: &DoctorProfileRequest) -> ApiResult<DoctorProfile> {
    read(with_json(authorized(Request::post(&url("/doctors/create"))), req)?).await
}

pub async fn approve_doctor(id: i64) -> ApiResult<Message> {
    let path = format!("/doctors/approve/{}", id);
    read(build(authorized(Request::put(&url(&path))))?).await
}

// ============ Appointments ============

/// The role-scoped appointment list
pub async fn appointments(role: Role) -> ApiResult<Vec<Appointment>> {
    let path = format!("/appointments/{}", role.as_str());
    read(build(authorized(Request::get(&url(&path))))?).await
}

pub async fn book_appointment(req: &BookingRequest) -> ApiResult<Appointment> {
    read(with_json(authorized(Request::post(&url("/appointments/book"))), req)?).await
}

pub async fn update_appointment_status(id: i64, status: AppointmentStatus) -> ApiResult<Message> {
    let path = format!("/appointments/{}/status", id);
    read(with_json(
        authorized(Request::put(&url(&path))),
        &StatusUpdate { status },
    )?)
    .await
}

pub async fn cancel_appointment(id: i64) -> ApiResult<Message> {
    let path = format!("/appointments/{}", id);
    read(build(authorized(Request::delete(&url(&path))))?).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_image_url() {
        assert_eq!(
            image_url("http://127.0.0.1:8000/", Some("auth/profile-image/3")),
            "http://127.0.0.1:8000/auth/profile-image/3"
        );
        assert_eq!(image_url(DEFAULT_API_BASE, Some("  ")), PLACEHOLDER_AVATAR);
        assert_eq!(image_url(DEFAULT_API_BASE, None), PLACEHOLDER_AVATAR);
        assert_eq!(
            image_url(DEFAULT_API_BASE, Some("data:image/png;base64,AA")),
            "data:image/png;base64,AA"
        );
    }

    #[test]
    fn test_status_classification() {
        let expired = error_from_status(401, None);
        assert!(expired.is_unauthorized());
        assert_eq!(expired.user_message("Login failed"), "Login failed");

        let bad = error_from_status(401, Some("Invalid credentials".to_string()));
        assert_eq!(bad.user_message("Login failed"), "Invalid credentials");

        let missing = error_from_status(404, Some("Doctor profile not found".to_string()));
        assert!(missing.is_not_found());
        assert!(!missing.is_unauthorized());
    }
}
