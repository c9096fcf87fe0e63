//! Wire Types
//!
//! JSON shapes returned by the MedConnect API.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Account role, stored as a lowercase string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
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

    /// Fallback display name while `/auth/me` is loading or failed
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
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "patient" => Ok(Role::Patient),
            "doctor" => Ok(Role::Doctor),
            "admin" => Ok(Role::Admin),
            other => Err(format!("Unknown role: {}", other)),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
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

    /// Rows with a Cancel action on the patient dashboard
    pub fn is_cancellable(&self) -> bool {
        matches!(self, AppointmentStatus::Pending | AppointmentStatus::Confirmed)
    }

    /// Rows with Confirm and Reject on the doctor dashboard
    pub fn is_actionable_by_doctor(&self) -> bool {
        *self == AppointmentStatus::Pending
    }
}

impl fmt::Display for AppointmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct User {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: Role,
    #[serde(default)]
    pub profile_image: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// `/auth/profile` and `/auth/update-profile`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct UserProfile {
    pub id: i64,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub profile_image: Option<String>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DoctorUser {
    pub id: i64,
    pub name: String,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DoctorProfile {
    pub id: i64,
    pub specialization: String,
    pub experience: i64,
    pub fees: f64,
    pub approved: bool,
    pub user: DoctorUser,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AppointmentDoctorUser {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AppointmentDoctor {
    pub id: i64,
    pub user: AppointmentDoctorUser,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AppointmentPatient {
    pub id: i64,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
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

// ============ Requests ============

#[derive(Debug, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Serialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
}

#[derive(Debug, Deserialize)]
pub struct TokenResponse {
    pub access_token: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DoctorProfileRequest {
    pub specialization: String,
    pub experience: i64,
    pub fees: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BookingRequest {
    pub doctor_id: i64,
    pub date: NaiveDate,
    pub time_slot: String,
}

#[derive(Debug, Serialize)]
pub struct StatusUpdate {
    pub status: AppointmentStatus,
}

/// `{message}` body of mutations without an entity
#[derive(Debug, Deserialize)]
pub struct Message {
    pub message: String,
}
