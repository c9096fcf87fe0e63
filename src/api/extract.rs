//! Request extractors
//!
//! `CurrentUser` resolves the `Authorization: Bearer <token>` header to an
//! account. Handlers then narrow it with [`CurrentUser::require`].

use axum::{async_trait, extract::FromRequestParts, http::header, http::request::Parts};
use std::sync::Arc;

use crate::api::error::ApiError;
use crate::api::state::AppState;
use crate::models::{Role, User};

/// The authenticated account behind the request
#[derive(Debug, Clone)]
pub struct CurrentUser(pub User);

impl CurrentUser {
    /// Reject with 403 unless the account has one of `allowed` roles
    pub fn require(self, allowed: &[Role]) -> Result<User, ApiError> {
        if allowed.contains(&self.0.role) {
            Ok(self.0)
        } else {
            tracing::debug!(user_id = self.0.id, role = %self.0.role, "Role check failed");
            Err(ApiError::forbidden())
        }
    }
}

/// Pull the token out of an `Authorization` header value
pub fn bearer_token(value: &str) -> Option<&str> {
    let (scheme, token) = value.trim().split_once(' ')?;
    if !scheme.eq_ignore_ascii_case("bearer") {
        return None;
    }
    let token = token.trim();
    (!token.is_empty()).then_some(token)
}

#[async_trait]
impl FromRequestParts<Arc<AppState>> for CurrentUser {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &Arc<AppState>,
    ) -> Result<Self, Self::Rejection> {
        let token = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .and_then(bearer_token)
            .ok_or_else(ApiError::unauthenticated)?;

        let user = state
            .store
            .validate_session(token)?
            .ok_or_else(ApiError::unauthenticated)?;

        Ok(CurrentUser(user))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bearer_token() {
        assert_eq!(bearer_token("Bearer abc123"), Some("abc123"));
        assert_eq!(bearer_token("bearer  abc123 "), Some("abc123"));
        assert_eq!(bearer_token("Basic dXNlcg=="), None);
        assert_eq!(bearer_token("Bearer "), None);
        assert_eq!(bearer_token("abc123"), None);
    }

    #[test]
    fn test_require_role() {
        let user = User {
            id: 1,
            name: "Asha".to_string(),
            email: "asha@clinic.test".to_string(),
            role: Role::Patient,
            profile_image: None,
            created_at: chrono::Utc::now(),
        };
        assert!(CurrentUser(user.clone()).require(&[Role::Patient]).is_ok());
        assert!(matches!(
            CurrentUser(user).require(&[Role::Doctor, Role::Admin]),
            Err(ApiError::Forbidden(_))
        ));
    }
}
