//! Shared Data Model
//!
//! Wire types exchanged between the clinic API and the dashboard client.
//! Both sides serialize through these structs, so a field rename here is a
//! protocol change.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Account role. A closed set: every branch on it is an exhaustive match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Patient,
    Doctor,
    Admin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Patient => "patient",
            Role::Doctor => "doctor",
            Role::Admin => "admin",
        }
    }

    /// Title-case label used as a fallback display name
    pub fn label(&self) -> &'static str {
        match self {
            Role::Patient => "Patient",
            Role::Doctor => "Doctor",
            Role::Admin => "Admin",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "patient" => Ok(Role::Patient),
            "doctor" => Ok(Role::Doctor),
            "admin" => Ok(Role::Admin),
            other => Err(ParseEnumError::Role(other.to_string())),
        }
    }
}

/// Lifecycle of an appointment. Transitions only ever leave `Pending`
/// (or `Confirmed`, for a cancellation).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
    Pending,
    Confirmed,
    Rejected,
    Cancelled,
}

impl AppointmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AppointmentStatus::Pending => "pending",
            AppointmentStatus::Confirmed => "confirmed",
            AppointmentStatus::Rejected => "rejected",
            AppointmentStatus::Cancelled => "cancelled",
        }
    }

    /// Whether moving from `self` to `next` is a legal transition
    pub fn can_transition_to(&self, next: AppointmentStatus) -> bool {
        use AppointmentStatus::*;
        matches!(
            (self, next),
            (Pending, Confirmed) | (Pending, Rejected) | (Pending, Cancelled) | (Confirmed, Cancelled)
        )
    }

    /// Rows a patient may still cancel
    pub fn is_cancellable(&self) -> bool {
        self.can_transition_to(AppointmentStatus::Cancelled)
    }

    /// Rows a doctor may still confirm or reject
    pub fn is_actionable_by_doctor(&self) -> bool {
        matches!(self, AppointmentStatus::Pending)
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AppointmentStatus {
    type Err = ParseEnumError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(AppointmentStatus::Pending),
            "confirmed" => Ok(AppointmentStatus::Confirmed),
            "rejected" => Ok(AppointmentStatus::Rejected),
            "cancelled" => Ok(AppointmentStatus::Cancelled),
            other => Err(ParseEnumError::Status(other.to_string())),
        }
    }
}

#[derive(Debug, Error, PartialEq, Eq)]
pub enum ParseEnumError {
    #[error("Unknown role: {0}")]
    Role(String),

    #[error("Unknown appointment status: {0}")]
    Status(String),
}

// ============================================
// ENTITIES
// ============================================

/// Signed-in account as returned by `GET /auth/me`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: Role,
    /// Server-relative image path, e.g. `auth/profile-image/3`
    #[serde(default)]
    pub profile_image: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Profile view of the signed-in account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserProfile {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub profile_image: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            profile_image: user.profile_image,
            created_at: user.created_at,
        }
    }
}

/// Account summary embedded in a doctor profile
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoctorUser {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: Role,
}

/// Doctor-specific data, gated behind admin approval
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoctorProfile {
    pub id: i64,
    pub specialization: String,
    pub experience: i64,
    pub fees: f64,
    pub approved: bool,
    pub user: DoctorUser,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppointmentDoctorUser {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppointmentDoctor {
    pub id: i64,
    pub user: AppointmentDoctorUser,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppointmentPatient {
    pub id: i64,
    pub name: String,
}

/// A booking linking one patient and one doctor to a date and time slot
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Appointment {
    pub id: i64,
    pub doctor_id: i64,
    pub patient_id: i64,
    pub date: NaiveDate,
    pub time_slot: String,
    pub status: AppointmentStatus,
    pub doctor: AppointmentDoctor,
    pub patient: AppointmentPatient,
}

// ============================================
// REQUESTS / SMALL RESPONSES
// ============================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    #[serde(default = "default_role")]
    pub role: Role,
}

fn default_role() -> Role {
    Role::Patient
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
    #[serde(default = "default_token_type")]
    pub token_type: String,
}

fn default_token_type() -> String {
    "bearer".to_string()
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DoctorProfileRequest {
    pub specialization: String,
    pub experience: i64,
    pub fees: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BookingRequest {
    pub doctor_id: i64,
    pub date: NaiveDate,
    pub time_slot: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatusUpdate {
    pub status: AppointmentStatus,
}

/// Acknowledgement body for mutations without an entity payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Message {
    pub message: String,
}

impl Message {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_wire_format() {
        assert_eq!(serde_json::to_string(&Role::Doctor).unwrap(), "\"doctor\"");
        let role: Role = serde_json::from_str("\"admin\"").unwrap();
        assert_eq!(role, Role::Admin);
        assert!(serde_json::from_str::<Role>("\"nurse\"").is_err());
    }

    #[test]
    fn test_role_from_str() {
        assert_eq!("Patient".parse::<Role>().unwrap(), Role::Patient);
        assert_eq!(
            "nurse".parse::<Role>(),
            Err(ParseEnumError::Role("nurse".to_string()))
        );
    }

    #[test]
    fn test_status_transitions() {
        use AppointmentStatus::*;
        assert!(Pending.can_transition_to(Confirmed));
        assert!(Pending.can_transition_to(Rejected));
        assert!(Pending.can_transition_to(Cancelled));
        assert!(Confirmed.can_transition_to(Cancelled));

        assert!(!Confirmed.can_transition_to(Rejected));
        assert!(!Rejected.can_transition_to(Cancelled));
        assert!(!Cancelled.can_transition_to(Pending));
        assert!(!Pending.can_transition_to(Pending));
    }

    #[test]
    fn test_status_action_sets() {
        use AppointmentStatus::*;
        let cancellable: Vec<_> = [Pending, Confirmed, Rejected, Cancelled]
            .into_iter()
            .filter(|s| s.is_cancellable())
            .collect();
        assert_eq!(cancellable, vec![Pending, Confirmed]);
        assert!(Pending.is_actionable_by_doctor());
        assert!(!Confirmed.is_actionable_by_doctor());
    }

    #[test]
    fn test_appointment_deserialize() {
        let json = r#"{
            "id": 4, "doctor_id": 2, "patient_id": 9,
            "date": "2025-03-14", "time_slot": "10:00 AM", "status": "pending",
            "doctor": {"id": 2, "user": {"name": "Dr. Rao"}},
            "patient": {"id": 9, "name": "Asha"}
        }"#;
        let appt: Appointment = serde_json::from_str(json).unwrap();
        assert_eq!(appt.status, AppointmentStatus::Pending);
        assert_eq!(appt.date, NaiveDate::from_ymd_opt(2025, 3, 14).unwrap());
        assert_eq!(appt.doctor.user.name, "Dr. Rao");
    }

    #[test]
    fn test_register_request_defaults_to_patient() {
        let req: RegisterRequest =
            serde_json::from_str(r#"{"name":"A","email":"a@x.io","password":"pw"}"#).unwrap();
        assert_eq!(req.role, Role::Patient);
    }
}
