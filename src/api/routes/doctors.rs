//! Doctor Routes
//!
//! - GET /doctors/all - Every profile (admin)
//! - GET /doctors/approved - Bookable profiles (public)
//! - GET /doctors/me - The signed-in doctor's profile
//! - POST /doctors/create - Create or overwrite the signed-in doctor's profile
//! - PUT /doctors/approve/:id - Approve a profile (admin)

use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;

use crate::api::error::{ApiError, ApiResult};
use crate::api::extract::CurrentUser;
use crate::api::state::AppState;
use crate::models::{DoctorProfile, DoctorProfileRequest, Message, Role};

/// GET /doctors/all
pub async fn list_all(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
) -> ApiResult<Json<Vec<DoctorProfile>>> {
    current.require(&[Role::Admin])?;
    Ok(Json(state.store.list_doctors(false)?))
}

/// GET /doctors/approved
pub async fn list_approved(
    State(state): State<Arc<AppState>>,
) -> ApiResult<Json<Vec<DoctorProfile>>> {
    Ok(Json(state.store.list_doctors(true)?))
}

/// GET /doctors/me
pub async fn me(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
) -> ApiResult<Json<DoctorProfile>> {
    let doctor = current.require(&[Role::Doctor])?;
    let profile = state
        .store
        .doctor_by_user(doctor.id)?
        .ok_or_else(profile_not_found)?;
    Ok(Json(profile))
}

/// POST /doctors/create
pub async fn create(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Json(req): Json<DoctorProfileRequest>,
) -> ApiResult<Json<DoctorProfile>> {
    let doctor = current.require(&[Role::Doctor])?;
    let req = validate_profile(req)?;

    let profile = state.store.upsert_doctor_profile(doctor.id, &req)?;
    tracing::info!(
        user_id = doctor.id,
        doctor_id = profile.id,
        specialization = %profile.specialization,
        "Saved doctor profile"
    );
    Ok(Json(profile))
}

/// PUT /doctors/approve/:id
pub async fn approve(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Path(id): Path<i64>,
) -> ApiResult<Json<Message>> {
    let admin = current.require(&[Role::Admin])?;

    if !state.store.approve_doctor(id)? {
        return Err(ApiError::NotFound("Doctor not found".to_string()));
    }

    tracing::info!(doctor_id = id, admin_id = admin.id, "Approved doctor");
    Ok(Json(Message::new("Doctor approved successfully")))
}

fn profile_not_found() -> ApiError {
    ApiError::NotFound("Doctor profile not found".to_string())
}

fn validate_profile(mut req: DoctorProfileRequest) -> ApiResult<DoctorProfileRequest> {
    req.specialization = req.specialization.trim().to_string();
    if req.specialization.is_empty() {
        return Err(ApiError::Validation(
            "Specialization cannot be empty".to_string(),
        ));
    }
    if req.experience < 0 {
        return Err(ApiError::Validation(
            "Experience cannot be negative".to_string(),
        ));
    }
    if !req.fees.is_finite() || req.fees < 0.0 {
        return Err(ApiError::Validation(
            "Fees must be a non-negative number".to_string(),
        ));
    }
    Ok(req)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(specialization: &str, experience: i64, fees: f64) -> DoctorProfileRequest {
        DoctorProfileRequest {
            specialization: specialization.to_string(),
            experience,
            fees,
        }
    }

    #[test]
    fn test_validate_profile() {
        let ok = validate_profile(request("  Dermatology ", 3, 300.0)).unwrap();
        assert_eq!(ok.specialization, "Dermatology");

        assert!(validate_profile(request(" ", 3, 300.0)).is_err());
        assert!(validate_profile(request("ENT", -1, 300.0)).is_err());
        assert!(validate_profile(request("ENT", 1, -5.0)).is_err());
        assert!(validate_profile(request("ENT", 1, f64::NAN)).is_err());
    }
}
