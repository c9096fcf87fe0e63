//! Appointment Routes
//!
//! - GET /appointments/admin - Every appointment (admin)
//! - GET /appointments/doctor - The signed-in doctor's appointments
//! - GET /appointments/patient - The signed-in patient's appointments
//! - POST /appointments/book - Book an approved doctor (patient)
//! - PUT /appointments/:id/status - Confirm or reject (owning doctor)
//! - DELETE /appointments/:id - Cancel (owning patient)

use axum::{
    extract::{Path, State},
    Json,
};
use std::sync::Arc;

use crate::api::error::{ApiError, ApiResult};
use crate::api::extract::CurrentUser;
use crate::api::state::AppState;
use crate::models::{Appointment, AppointmentStatus, BookingRequest, Message, Role, StatusUpdate};
use crate::store::AppointmentFilter;

/// GET /appointments/admin
pub async fn list_all(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
) -> ApiResult<Json<Vec<Appointment>>> {
    current.require(&[Role::Admin])?;
    Ok(Json(state.store.list_appointments(AppointmentFilter::All)?))
}

/// GET /appointments/doctor
pub async fn list_for_doctor(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
) -> ApiResult<Json<Vec<Appointment>>> {
    let doctor = current.require(&[Role::Doctor])?;
    let profile = state
        .store
        .doctor_by_user(doctor.id)?
        .ok_or_else(|| ApiError::NotFound("Doctor profile not found".to_string()))?;

    Ok(Json(
        state
            .store
            .list_appointments(AppointmentFilter::Doctor(profile.id))?,
    ))
}

/// GET /appointments/patient
pub async fn list_for_patient(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
) -> ApiResult<Json<Vec<Appointment>>> {
    let patient = current.require(&[Role::Patient])?;
    Ok(Json(
        state
            .store
            .list_appointments(AppointmentFilter::Patient(patient.id))?,
    ))
}

/// POST /appointments/book
pub async fn book(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Json(mut req): Json<BookingRequest>,
) -> ApiResult<Json<Appointment>> {
    let patient = current.require(&[Role::Patient])?;

    req.time_slot = req.time_slot.trim().to_string();
    if req.time_slot.is_empty() {
        return Err(ApiError::Validation("Time slot cannot be empty".to_string()));
    }

    match state.store.get_doctor(req.doctor_id)? {
        Some(doctor) if doctor.approved => {}
        _ => {
            return Err(ApiError::NotFound(
                "Doctor not found or not approved".to_string(),
            ))
        }
    }

    let appointment = state.store.create_appointment(patient.id, &req)?;
    tracing::info!(
        appointment_id = appointment.id,
        doctor_id = appointment.doctor_id,
        patient_id = patient.id,
        date = %appointment.date,
        "Booked appointment"
    );
    Ok(Json(appointment))
}

/// PUT /appointments/:id/status
pub async fn update_status(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Path(id): Path<i64>,
    Json(update): Json<StatusUpdate>,
) -> ApiResult<Json<Message>> {
    let doctor = current.require(&[Role::Doctor])?;

    if !matches!(
        update.status,
        AppointmentStatus::Confirmed | AppointmentStatus::Rejected
    ) {
        return Err(ApiError::Validation(
            "Status must be confirmed or rejected".to_string(),
        ));
    }

    let appointment = find_appointment(&state, id)?;
    let owns = state
        .store
        .doctor_by_user(doctor.id)?
        .is_some_and(|profile| profile.id == appointment.doctor_id);
    if !owns {
        return Err(ApiError::Forbidden("Not your appointment".to_string()));
    }

    transition(&state, &appointment, update.status)?;
    tracing::info!(
        appointment_id = id,
        doctor_user_id = doctor.id,
        status = %update.status,
        "Updated appointment status"
    );
    Ok(Json(Message::new(format!(
        "Appointment status updated to {}",
        update.status
    ))))
}

/// DELETE /appointments/:id
///
/// The row is kept and marked cancelled.
pub async fn cancel(
    State(state): State<Arc<AppState>>,
    current: CurrentUser,
    Path(id): Path<i64>,
) -> ApiResult<Json<Message>> {
    let patient = current.require(&[Role::Patient])?;

    let appointment = find_appointment(&state, id)?;
    if appointment.patient_id != patient.id {
        return Err(ApiError::Forbidden("Not your appointment".to_string()));
    }

    transition(&state, &appointment, AppointmentStatus::Cancelled)?;
    tracing::info!(appointment_id = id, patient_id = patient.id, "Cancelled appointment");
    Ok(Json(Message::new("Appointment cancelled")))
}

fn find_appointment(state: &AppState, id: i64) -> ApiResult<Appointment> {
    state
        .store
        .get_appointment(id)?
        .ok_or_else(|| ApiError::NotFound("Appointment not found".to_string()))
}

fn transition(state: &AppState, appointment: &Appointment, next: AppointmentStatus) -> ApiResult<()> {
    if !appointment.status.can_transition_to(next) {
        return Err(ApiError::Conflict(format!(
            "Cannot change a {} appointment to {}",
            appointment.status, next
        )));
    }
    if state
        .store
        .set_appointment_status(appointment.id, appointment.status, next)?
    {
        return Ok(());
    }

    // The row moved since it was read
    let current = find_appointment(state, appointment.id)?;
    Err(ApiError::Conflict(format!(
        "Cannot change a {} appointment to {}",
        current.status, next
    )))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ApiConfig, AuthConfig};
    use crate::store::test_support;
    use chrono::NaiveDate;

    fn pending_appointment() -> (AppState, Appointment) {
        let store = test_support::store();
        let (_, rao) = test_support::doctor(&store, "Rao", true);
        let asha = test_support::user(&store, "Asha", Role::Patient);
        let appointment = store
            .create_appointment(
                asha.id,
                &BookingRequest {
                    doctor_id: rao,
                    date: NaiveDate::from_ymd_opt(2025, 6, 1).unwrap(),
                    time_slot: "10:00 AM".to_string(),
                },
            )
            .unwrap();
        let state = AppState::new(Arc::new(store), ApiConfig::default(), AuthConfig::default());
        (state, appointment)
    }

    #[test]
    fn test_transition_from_stale_read_conflicts() {
        let (state, stale) = pending_appointment();

        transition(&state, &stale, AppointmentStatus::Cancelled).unwrap();
        let err = transition(&state, &stale, AppointmentStatus::Confirmed).unwrap_err();
        match err {
            ApiError::Conflict(detail) => {
                assert_eq!(detail, "Cannot change a cancelled appointment to confirmed")
            }
            other => panic!("expected conflict, got {:?}", other),
        }

        let current = state.store.get_appointment(stale.id).unwrap().unwrap();
        assert_eq!(current.status, AppointmentStatus::Cancelled);
    }

    #[test]
    fn test_transition_follows_legal_moves() {
        let (state, pending) = pending_appointment();

        transition(&state, &pending, AppointmentStatus::Confirmed).unwrap();
        let confirmed = state.store.get_appointment(pending.id).unwrap().unwrap();
        assert!(matches!(
            transition(&state, &confirmed, AppointmentStatus::Rejected),
            Err(ApiError::Conflict(_))
        ));
        transition(&state, &confirmed, AppointmentStatus::Cancelled).unwrap();
    }
}
