//! Authentication Routes
//!
//! - POST /auth/register - Create a patient or doctor account
//! - POST /auth/login - Exchange credentials for a bearer token
//! - POST /auth/logout - Revoke the presented bearer token
//! - GET /auth/me - Signed-in account
//! - GET /auth/profile - Signed-in account, profile view
//! - PUT /auth/update-profile - Multipart profile edit (name, email, password, image)
//! - GET /auth/profile-image/:id - Stored avatar bytes

use axum::{
    extract::{Multipart, Path, State},
    http::{header, HeaderMap},
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;

use crate::api::dto::{ProfileUpdateForm, UploadedImage};
use crate::api::error::{ApiError, ApiResult};
use crate::api::extract::{bearer_token, CurrentUser};
use crate::api::state::AppState;
use crate::auth::{hash_password, verify_password};
use crate::models::{
    LoginRequest, Message, RegisterRequest, Role, TokenResponse, User, UserProfile,
};
use crate::store::{NewUser, ProfileImage, UserUpdate};

/// POST /auth/register
pub async fn register(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<Json<User>> {
    let name = req.name.trim().to_string();
    if name.is_empty() {
        return Err(ApiError::Validation("Name cannot be empty".to_string()));
    }
    let email = normalize_email(&req.email)
        .ok_or_else(|| ApiError::Validation("Invalid email address".to_string()))?;
    if req.password.is_empty() {
        return Err(ApiError::Validation("Password cannot be empty".to_string()));
    }
    if req.role == Role::Admin {
        return Err(ApiError::Validation(
            "Admin accounts cannot be self-registered".to_string(),
        ));
    }

    if state.store.find_user_by_email(&email)?.is_some() {
        return Err(ApiError::Validation("Email already registered".to_string()));
    }

    let password_hash = hash_blocking(req.password, state.auth.pbkdf2_iterations).await?;
    let user = state.store.create_user(NewUser {
        name,
        email,
        password_hash,
        role: req.role,
    })?;

    tracing::info!(user_id = user.id, role = %user.role, "Registered account");
    Ok(Json(user))
}

/// POST /auth/login
pub async fn login(
    State(state): State<Arc<AppState>>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<Json<TokenResponse>> {
    let invalid = || ApiError::Unauthorized("Invalid credentials".to_string());

    let email = normalize_email(&req.email).ok_or_else(invalid)?;
    let record = state.store.find_user_by_email(&email)?.ok_or_else(invalid)?;

    let stored = record.password_hash.clone();
    let password = req.password;
    let matches = tokio::task::spawn_blocking(move || verify_password(&password, &stored))
        .await
        .map_err(|e| ApiError::Internal(format!("Password check failed: {}", e)))?
        .unwrap_or_else(|e| {
            tracing::warn!(user_id = record.user.id, "Unreadable password hash: {}", e);
            false
        });

    if !matches {
        return Err(invalid());
    }

    let access_token = state.store.create_session(record.user.id, state.token_ttl())?;
    tracing::info!(user_id = record.user.id, "Issued session token");

    Ok(Json(TokenResponse {
        access_token,
        token_type: "bearer".to_string(),
    }))
}

/// POST /auth/logout
///
/// Revokes the token the request was made with. Unknown tokens are ignored.
pub async fn logout(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    headers: HeaderMap,
) -> ApiResult<Json<Message>> {
    if let Some(token) = headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(bearer_token)
    {
        state.store.delete_session(token)?;
    }
    tracing::info!(user_id = user.id, "Revoked session token");
    Ok(Json(Message::new("Logged out")))
}

/// GET /auth/me
pub async fn me(CurrentUser(user): CurrentUser) -> Json<User> {
    Json(user)
}

/// GET /auth/profile
pub async fn profile(CurrentUser(user): CurrentUser) -> Json<UserProfile> {
    Json(user.into())
}

/// PUT /auth/update-profile
///
/// Multipart fields: `name`, `email`, `password`, `profile_image`.
/// Absent or empty fields are left unchanged.
pub async fn update_profile(
    State(state): State<Arc<AppState>>,
    CurrentUser(user): CurrentUser,
    multipart: Multipart,
) -> ApiResult<Json<UserProfile>> {
    let form = read_profile_form(multipart).await?;

    let email = match form.email {
        Some(raw) => Some(
            normalize_email(&raw)
                .ok_or_else(|| ApiError::Validation("Invalid email address".to_string()))?,
        ),
        None => None,
    };

    let password_hash = match form.password {
        Some(password) => Some(hash_blocking(password, state.auth.pbkdf2_iterations).await?),
        None => None,
    };

    let update = UserUpdate {
        name: form.name,
        email,
        password_hash,
        image: form.image.map(|img| ProfileImage {
            bytes: img.bytes,
            content_type: img.content_type,
        }),
    };

    let updated = state
        .store
        .update_user(user.id, update)?
        .ok_or_else(ApiError::unauthenticated)?;

    tracing::info!(user_id = updated.id, "Updated profile");
    Ok(Json(updated.into()))
}

/// GET /auth/profile-image/:id
pub async fn profile_image(
    State(state): State<Arc<AppState>>,
    Path(id): Path<i64>,
) -> ApiResult<Response> {
    let image = state
        .store
        .profile_image(id)?
        .ok_or_else(|| ApiError::NotFound("Profile image not found".to_string()))?;

    Ok(([(header::CONTENT_TYPE, image.content_type)], image.bytes).into_response())
}

async fn read_profile_form(mut multipart: Multipart) -> ApiResult<ProfileUpdateForm> {
    let mut form = ProfileUpdateForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::Validation(format!("Malformed multipart body: {}", e)))?
    {
        let name = field.name().unwrap_or("").to_string();
        match name.as_str() {
            "name" | "email" | "password" => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ApiError::Validation(format!("Unreadable field {}: {}", name, e)))?;
                let value = non_empty(text);
                match name.as_str() {
                    "name" => form.name = value.map(|v| v.trim().to_string()),
                    "email" => form.email = value,
                    _ => form.password = value,
                }
            }
            "profile_image" => {
                let file_name = field.file_name().map(str::to_string);
                let declared = field.content_type().map(str::to_string);
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::Validation(format!("Failed to read image: {}", e)))?;

                if bytes.is_empty() {
                    continue;
                }

                let content_type = declared
                    .filter(|ct| ct != "application/octet-stream")
                    .or_else(|| {
                        file_name
                            .as_deref()
                            .and_then(|f| mime_guess::from_path(f).first())
                            .map(|m| m.essence_str().to_string())
                    })
                    .unwrap_or_else(|| "application/octet-stream".to_string());

                form.image = Some(UploadedImage {
                    file_name,
                    content_type,
                    bytes: bytes.to_vec(),
                });
            }
            other => {
                tracing::debug!(field = other, "Ignoring unknown multipart field");
            }
        }
    }

    Ok(form)
}

fn non_empty(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

/// Lowercase and sanity-check an email address
#[must_use]
pub fn normalize_email(email: &str) -> Option<String> {
    let normalized = email.trim().to_ascii_lowercase();
    let (local, domain) = normalized.split_once('@')?;
    if local.is_empty() || domain.is_empty() || domain.contains('@') {
        return None;
    }
    Some(normalized)
}

async fn hash_blocking(password: String, iterations: u32) -> ApiResult<String> {
    tokio::task::spawn_blocking(move || hash_password(&password, iterations))
        .await
        .map_err(|e| ApiError::Internal(format!("Password hashing failed: {}", e)))
}
