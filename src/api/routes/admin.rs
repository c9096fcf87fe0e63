//! Admin Routes
//!
//! - GET /admin/dashboard - Greeting for the signed-in admin

use axum::Json;

use crate::api::error::ApiResult;
use crate::api::extract::CurrentUser;
use crate::models::{Message, Role};

/// GET /admin/dashboard
pub async fn dashboard(current: CurrentUser) -> ApiResult<Json<Message>> {
    let admin = current.require(&[Role::Admin])?;
    Ok(Json(Message::new(format!("Welcome Admin {}", admin.name))))
}
