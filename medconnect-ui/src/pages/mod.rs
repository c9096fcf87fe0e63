//! Pages
//!
//! Top-level page components for each route.

pub mod admin_dashboard;
pub mod admin_doctors;
pub mod doctor_dashboard;
pub mod login;
pub mod patient_dashboard;
pub mod profile;
pub mod register;

pub use admin_dashboard::AdminDashboard;
pub use admin_doctors::AdminDoctors;
pub use doctor_dashboard::DoctorDashboard;
pub use login::Login;
pub use patient_dashboard::PatientDashboard;
pub use profile::Profile;
pub use register::Register;

/// Appointment date as shown in tables
pub(crate) fn format_date(date: chrono::NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}
