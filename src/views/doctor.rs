//! Doctor dashboard
//!
//! Shows exactly one of three branches depending on the doctor's profile:
//! no profile yet, awaiting approval, or approved with the appointment list.

use async_trait::async_trait;

use super::table::{capitalize, Table};
use super::{handle_failure, LocalList, Notice, Page, Route, LOADING};
use crate::client::{ClinicApi, Session};
use crate::models::{Appointment, AppointmentStatus, DoctorProfile, DoctorProfileRequest, Role};

pub const PROFILE_SUBMITTED: &str = "Profile submitted! Waiting for admin approval.";
pub const PROFILE_SUBMIT_FAILED: &str = "Failed to submit profile";
pub const STATUS_UPDATE_FAILED: &str = "Failed to update appointment status";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DoctorBranch {
    NoProfile,
    PendingApproval,
    Approved,
}

/// Profile creation form. Numbers stay as typed until submit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DoctorProfileForm {
    pub specialization: String,
    pub experience: String,
    pub fees: String,
}

impl DoctorProfileForm {
    fn to_request(&self) -> Result<DoctorProfileRequest, String> {
        let experience = self
            .experience
            .trim()
            .parse::<i64>()
            .map_err(|_| "Experience must be a whole number of years".to_string())?;
        let fees = self
            .fees
            .trim()
            .parse::<f64>()
            .map_err(|_| "Fees must be a number".to_string())?;
        Ok(DoctorProfileRequest {
            specialization: self.specialization.trim().to_string(),
            experience,
            fees,
        })
    }
}

pub struct DoctorDashboard {
    session: Session,
    loading: bool,
    name: Option<String>,
    profile: Option<DoctorProfile>,
    appointments: LocalList<Appointment>,
    show_profile_form: bool,
    pub form: DoctorProfileForm,
    success_message: Option<String>,
    redirect: Option<Route>,
}

impl DoctorDashboard {
    pub fn new(session: Session) -> Self {
        Self {
            session,
            loading: true,
            name: None,
            profile: None,
            appointments: LocalList::default(),
            show_profile_form: false,
            form: DoctorProfileForm::default(),
            success_message: None,
            redirect: None,
        }
    }

    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or(Role::Doctor.label())
    }

    pub fn branch(&self) -> DoctorBranch {
        match &self.profile {
            None => DoctorBranch::NoProfile,
            Some(profile) if !profile.approved => DoctorBranch::PendingApproval,
            Some(_) => DoctorBranch::Approved,
        }
    }

    pub fn profile(&self) -> Option<&DoctorProfile> {
        self.profile.as_ref()
    }

    pub fn appointments(&self) -> &LocalList<Appointment> {
        &self.appointments
    }

    pub fn success_message(&self) -> Option<&str> {
        self.success_message.as_deref()
    }

    pub fn is_profile_form_shown(&self) -> bool {
        self.show_profile_form
    }

    pub fn toggle_profile_form(&mut self) {
        self.show_profile_form = !self.show_profile_form;
    }

    /// Fetch the profile; a 404 is the no-profile branch, not an error
    async fn fetch_profile(&mut self, api: &dyn ClinicApi) {
        match api.my_doctor_profile().await {
            Ok(Some(profile)) => self.profile = Some(profile),
            Ok(None) => {
                tracing::info!("No doctor profile yet");
                self.profile = None;
            }
            Err(e) => {
                self.redirect = handle_failure(&self.session, &e, "Error fetching doctor profile")
            }
        }
    }

    async fn fetch_appointments(&mut self, api: &dyn ClinicApi) {
        match api.appointments(Role::Doctor).await {
            Ok(rows) => self.appointments.reset(rows),
            Err(e) => {
                self.redirect = handle_failure(&self.session, &e, "Error fetching appointments")
            }
        }
    }

    /// Create the profile, then fetch it again so the page moves to the
    /// pending-approval branch
    pub async fn submit_profile(&mut self, api: &dyn ClinicApi) -> Option<Notice> {
        let req = match self.form.to_request() {
            Ok(req) => req,
            Err(msg) => return Some(Notice::Error(msg)),
        };

        match api.create_doctor_profile(&req).await {
            Ok(profile) => {
                tracing::info!(
                    doctor_id = profile.id,
                    specialization = %profile.specialization,
                    "Doctor profile submitted"
                );
                self.success_message = Some(PROFILE_SUBMITTED.to_string());
                self.show_profile_form = false;
                self.fetch_profile(api).await;
                None
            }
            Err(e) => {
                self.redirect = handle_failure(&self.session, &e, "Error submitting profile");
                Some(Notice::Error(e.user_message(PROFILE_SUBMIT_FAILED)))
            }
        }
    }

    /// Confirm or reject one appointment and patch only that row
    pub async fn set_status(
        &mut self,
        api: &dyn ClinicApi,
        id: i64,
        status: AppointmentStatus,
    ) -> Option<Notice> {
        match api.update_appointment_status(id, status).await {
            Ok(_) => {
                tracing::info!(appointment_id = id, status = %status, "Appointment status updated");
                self.appointments.set_status(id, status);
                None
            }
            Err(e) => {
                self.redirect = handle_failure(&self.session, &e, "Error updating status");
                Some(Notice::Error(e.user_message(STATUS_UPDATE_FAILED)))
            }
        }
    }

    fn render_no_profile(&self, out: &mut String) {
        out.push_str("You haven't created your profile yet. Please complete your profile.\n");
        if self.show_profile_form {
            out.push_str("[Close Form]\n\n");
            out.push_str(&format!("Specialization: {}\n", self.form.specialization));
            out.push_str(&format!("Experience (years): {}\n", self.form.experience));
            out.push_str(&format!("Fees: {}\n", self.form.fees));
            out.push_str("[Submit Profile]\n");
        } else {
            out.push_str("[Complete Profile]\n");
        }
    }

    fn render_appointments(&self, out: &mut String) {
        let mut table = Table::new(&["ID", "Date", "Time", "Patient", "Status", "Action"])
            .empty("No appointments found");
        for appt in self.appointments.iter() {
            let action = if appt.status.is_actionable_by_doctor() {
                "Confirm / Reject"
            } else {
                "-"
            };
            table.row(vec![
                appt.id.to_string(),
                appt.date.to_string(),
                appt.time_slot.clone(),
                appt.patient.name.clone(),
                capitalize(appt.status.as_str()),
                action.to_string(),
            ]);
        }
        out.push_str("Appointments\n");
        out.push_str(&table.render());
    }
}

#[async_trait]
impl Page for DoctorDashboard {
    async fn mount(&mut self, api: &dyn ClinicApi) {
        match api.me().await {
            Ok(user) => self.name = Some(user.name),
            Err(e) => self.redirect = handle_failure(&self.session, &e, "Error fetching doctor data"),
        }

        if self.redirect.is_none() {
            self.fetch_profile(api).await;
        }
        if self.redirect.is_none() && self.branch() == DoctorBranch::Approved {
            self.fetch_appointments(api).await;
        }
        self.loading = false;
    }

    fn render(&self) -> String {
        if self.loading {
            return format!("{}\n", LOADING);
        }

        let mut out = format!("Welcome, Dr. {}\n\n", self.name());
        if let Some(message) = &self.success_message {
            out.push_str(message);
            out.push_str("\n\n");
        }

        match self.branch() {
            DoctorBranch::NoProfile => self.render_no_profile(&mut out),
            DoctorBranch::PendingApproval => {
                out.push_str("Your profile is submitted but awaiting admin approval.\n")
            }
            DoctorBranch::Approved => self.render_appointments(&mut out),
        }
        out
    }

    fn redirect(&self) -> Option<Route> {
        self.redirect
    }
}
