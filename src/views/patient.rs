//! Patient dashboard: own appointments, booking and cancellation

use async_trait::async_trait;
use chrono::NaiveDate;

use super::table::{capitalize, Table};
use super::{handle_failure, LocalList, Notice, Page, Route, LOADING};
use crate::client::{ClinicApi, Session};
use crate::models::{Appointment, AppointmentStatus, BookingRequest, DoctorProfile, Role};

pub const BOOK_FAILED: &str = "Failed to book appointment";
pub const CANCELLED: &str = "Appointment cancelled successfully!";
pub const CANCEL_FAILED: &str = "Failed to cancel appointment.";

/// Fields of the booking form
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BookingForm {
    pub doctor_id: Option<i64>,
    /// `YYYY-MM-DD`
    pub date: String,
    pub time_slot: String,
}

impl BookingForm {
    fn to_request(&self) -> Result<BookingRequest, String> {
        let doctor_id = self.doctor_id.ok_or("Please select a doctor")?;
        let date = NaiveDate::parse_from_str(self.date.trim(), "%Y-%m-%d")
            .map_err(|_| format!("Invalid date: {}", self.date.trim()))?;
        let time_slot = self.time_slot.trim();
        if time_slot.is_empty() {
            return Err("Please choose a time slot".to_string());
        }
        Ok(BookingRequest {
            doctor_id,
            date,
            time_slot: time_slot.to_string(),
        })
    }
}

pub struct PatientDashboard {
    session: Session,
    loading: bool,
    name: Option<String>,
    appointments: LocalList<Appointment>,
    doctors: Vec<DoctorProfile>,
    show_form: bool,
    pub form: BookingForm,
    redirect: Option<Route>,
}

impl PatientDashboard {
    pub fn new(session: Session) -> Self {
        Self {
            session,
            loading: true,
            name: None,
            appointments: LocalList::default(),
            doctors: Vec::new(),
            show_form: false,
            form: BookingForm::default(),
            redirect: None,
        }
    }

    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or(Role::Patient.label())
    }

    pub fn appointments(&self) -> &LocalList<Appointment> {
        &self.appointments
    }

    /// Approved doctors offered by the booking form
    pub fn doctors(&self) -> &[DoctorProfile] {
        &self.doctors
    }

    pub fn is_form_shown(&self) -> bool {
        self.show_form
    }

    pub fn toggle_form(&mut self) {
        self.show_form = !self.show_form;
    }

    /// Rows that currently offer a Cancel action
    pub fn cancellable_ids(&self) -> Vec<i64> {
        self.appointments
            .iter()
            .filter(|a| a.status.is_cancellable())
            .map(|a| a.id)
            .collect()
    }

    async fn fetch_appointments(&mut self, api: &dyn ClinicApi) -> bool {
        match api.appointments(Role::Patient).await {
            Ok(rows) => {
                self.appointments.reset(rows);
                true
            }
            Err(e) => {
                self.redirect = handle_failure(&self.session, &e, "Error fetching appointments");
                false
            }
        }
    }

    /// Book from the form. Success resets and hides the form, then fetches
    /// the list again.
    pub async fn book(&mut self, api: &dyn ClinicApi) -> Option<Notice> {
        let req = match self.form.to_request() {
            Ok(req) => req,
            Err(msg) => return Some(Notice::Error(msg)),
        };

        match api.book_appointment(&req).await {
            Ok(appt) => {
                tracing::info!(
                    appointment_id = appt.id,
                    doctor_id = appt.doctor_id,
                    date = %appt.date,
                    "Appointment booked"
                );
                self.form = BookingForm::default();
                self.show_form = false;
                self.fetch_appointments(api).await;
                None
            }
            Err(e) => {
                self.redirect = handle_failure(&self.session, &e, "Booking failed");
                Some(Notice::Error(e.user_message(BOOK_FAILED)))
            }
        }
    }

    /// Cancel after the user confirmed. The row is marked cancelled locally,
    /// then the list is fetched again; a failed refetch keeps the patch.
    pub async fn cancel(&mut self, api: &dyn ClinicApi, id: i64, confirmed: bool) -> Option<Notice> {
        if !confirmed {
            return None;
        }

        match api.cancel_appointment(id).await {
            Ok(_) => {
                tracing::info!(appointment_id = id, "Appointment cancelled");
                self.appointments.set_status(id, AppointmentStatus::Cancelled);
                self.fetch_appointments(api).await;
                Some(Notice::Success(CANCELLED.to_string()))
            }
            Err(e) => {
                self.redirect = handle_failure(&self.session, &e, "Cancel failed");
                Some(Notice::Error(CANCEL_FAILED.to_string()))
            }
        }
    }

    fn render_form(&self) -> String {
        let mut out = String::from("Book Appointment\n");
        let mut table = Table::new(&["ID", "Doctor", "Specialization", "Fees"])
            .empty("No approved doctors available");
        for doctor in &self.doctors {
            let marker = if self.form.doctor_id == Some(doctor.id) { "*" } else { "" };
            table.row(vec![
                format!("{}{}", doctor.id, marker),
                doctor.user.name.clone(),
                doctor.specialization.clone(),
                format!("₹{}", doctor.fees),
            ]);
        }
        out.push_str(&table.render());
        out.push_str(&format!("Date: {}\n", self.form.date));
        out.push_str(&format!("Time Slot: {}\n", self.form.time_slot));
        out.push_str("[Book]\n\n");
        out
    }
}

#[async_trait]
impl Page for PatientDashboard {
    async fn mount(&mut self, api: &dyn ClinicApi) {
        self.fetch_appointments(api).await;

        if self.redirect.is_none() {
            match api.approved_doctors().await {
                Ok(doctors) => self.doctors = doctors,
                Err(e) => tracing::error!(error = %e, "Error fetching doctors"),
            }
        }

        if self.redirect.is_none() {
            match api.me().await {
                Ok(user) => self.name = Some(user.name),
                Err(e) => {
                    self.redirect = handle_failure(&self.session, &e, "Error fetching patient data")
                }
            }
        }
        self.loading = false;
    }

    fn render(&self) -> String {
        if self.loading {
            return format!("{}\n", LOADING);
        }

        let mut out = format!("Welcome, {}\n", self.name());
        out.push_str(if self.show_form {
            "[Close Form]\n\n"
        } else {
            "[Book Appointment]\n\n"
        });
        if self.show_form {
            out.push_str(&self.render_form());
        }

        let mut table = Table::new(&["ID", "Date", "Time", "Doctor", "Status", "Actions"])
            .empty("No upcoming appointments");
        for appt in self.appointments.iter() {
            table.row(vec![
                appt.id.to_string(),
                appt.date.to_string(),
                appt.time_slot.clone(),
                appt.doctor.user.name.clone(),
                capitalize(appt.status.as_str()),
                if appt.status.is_cancellable() { "Cancel" } else { "" }.to_string(),
            ]);
        }
        out.push_str("Upcoming Appointments\n");
        out.push_str(&table.render());
        out
    }

    fn redirect(&self) -> Option<Route> {
        self.redirect
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::User;
    use crate::views::fake::FakeApi;

    struct Clinic {
        api: FakeApi,
        patient: User,
        doctor_id: i64,
    }

    fn clinic() -> Clinic {
        let api = FakeApi::new();
        let doctor = api.add_user("Rao", Role::Doctor);
        let doctor_id = api.add_doctor(&doctor, true);
        let patient = api.add_user("Asha", Role::Patient);
        api.sign_in(&patient);
        Clinic {
            api,
            patient,
            doctor_id,
        }
    }

    #[tokio::test]
    async fn test_mount_loads_everything() {
        let c = clinic();
        c.api
            .add_appointment(c.doctor_id, &c.patient, 14, AppointmentStatus::Pending);

        let mut page = PatientDashboard::new(c.api.session());
        assert_eq!(page.render(), "Loading...\n");
        page.mount(&c.api).await;

        assert_eq!(page.name(), "Asha");
        assert_eq!(page.doctors().len(), 1);
        assert_eq!(page.appointments().len(), 1);
        let out = page.render();
        assert!(out.starts_with("Welcome, Asha\n"));
        assert!(out.contains("Pending"));
        assert!(out.contains("Cancel"));
    }

    #[tokio::test]
    async fn test_only_pending_and_confirmed_are_cancellable() {
        let c = clinic();
        let pending = c
            .api
            .add_appointment(c.doctor_id, &c.patient, 1, AppointmentStatus::Pending);
        let confirmed =
            c.api
                .add_appointment(c.doctor_id, &c.patient, 2, AppointmentStatus::Confirmed);
        c.api
            .add_appointment(c.doctor_id, &c.patient, 3, AppointmentStatus::Rejected);
        c.api
            .add_appointment(c.doctor_id, &c.patient, 4, AppointmentStatus::Cancelled);

        let mut page = PatientDashboard::new(c.api.session());
        page.mount(&c.api).await;
        assert_eq!(page.cancellable_ids(), vec![pending, confirmed]);
    }

    #[tokio::test]
    async fn test_cancel_removes_action_and_refetches() {
        let c = clinic();
        let id = c
            .api
            .add_appointment(c.doctor_id, &c.patient, 14, AppointmentStatus::Pending);

        let mut page = PatientDashboard::new(c.api.session());
        page.mount(&c.api).await;

        assert_eq!(page.cancel(&c.api, id, false).await, None);
        assert_eq!(page.cancellable_ids(), vec![id]);

        let before = c.api.calls().len();
        let notice = page.cancel(&c.api, id, true).await.unwrap();
        assert_eq!(notice, Notice::Success(CANCELLED.to_string()));
        assert!(page.cancellable_ids().is_empty());
        assert_eq!(
            &c.api.calls()[before..],
            &["cancel_appointment", "appointments"]
        );
        assert!(page.render().contains("Cancelled"));
    }

    #[tokio::test]
    async fn test_cancel_keeps_patch_when_refetch_fails() {
        let c = clinic();
        let id = c
            .api
            .add_appointment(c.doctor_id, &c.patient, 14, AppointmentStatus::Confirmed);

        let mut page = PatientDashboard::new(c.api.session());
        page.mount(&c.api).await;
        c.api.fail("appointments");

        page.cancel(&c.api, id, true).await;
        assert_eq!(
            page.appointments().get(id).unwrap().status,
            AppointmentStatus::Cancelled
        );
    }

    #[tokio::test]
    async fn test_cancel_failure() {
        let c = clinic();
        let id = c
            .api
            .add_appointment(c.doctor_id, &c.patient, 14, AppointmentStatus::Pending);

        let mut page = PatientDashboard::new(c.api.session());
        page.mount(&c.api).await;
        c.api.fail("cancel_appointment");

        let notice = page.cancel(&c.api, id, true).await.unwrap();
        assert_eq!(notice.text(), CANCEL_FAILED);
        assert_eq!(page.cancellable_ids(), vec![id]);
    }

    #[tokio::test]
    async fn test_book_resets_form_and_refetches() {
        let c = clinic();
        let mut page = PatientDashboard::new(c.api.session());
        page.mount(&c.api).await;

        page.toggle_form();
        assert!(page.render().contains("Book Appointment\n"));
        page.form = BookingForm {
            doctor_id: Some(c.doctor_id),
            date: "2025-04-02".to_string(),
            time_slot: " 11:30 AM ".to_string(),
        };

        assert_eq!(page.book(&c.api).await, None);
        assert!(!page.is_form_shown());
        assert_eq!(page.form, BookingForm::default());

        let booked = &page.appointments().items()[0];
        assert_eq!(booked.time_slot, "11:30 AM");
        assert_eq!(booked.status, AppointmentStatus::Pending);
        assert_eq!(c.api.calls().last(), Some(&"appointments"));
    }

    #[tokio::test]
    async fn test_book_rejects_bad_form_locally() {
        let c = clinic();
        let mut page = PatientDashboard::new(c.api.session());
        page.mount(&c.api).await;
        let before = c.api.calls().len();

        page.form.date = "2025-04-02".to_string();
        page.form.time_slot = "9:00 AM".to_string();
        assert!(page.book(&c.api).await.unwrap().is_error());

        page.form.doctor_id = Some(c.doctor_id);
        page.form.date = "04/02/2025".to_string();
        assert!(page.book(&c.api).await.unwrap().is_error());
        assert_eq!(c.api.calls().len(), before);
    }

    #[tokio::test]
    async fn test_book_unapproved_doctor_shows_detail() {
        let c = clinic();
        let pending = c.api.add_user("Mehta", Role::Doctor);
        let pending_id = c.api.add_doctor(&pending, false);

        let mut page = PatientDashboard::new(c.api.session());
        page.mount(&c.api).await;
        page.toggle_form();
        page.form = BookingForm {
            doctor_id: Some(pending_id),
            date: "2025-04-02".to_string(),
            time_slot: "9:00 AM".to_string(),
        };

        let notice = page.book(&c.api).await.unwrap();
        assert_eq!(notice.text(), "Doctor not found or not approved");
        assert!(page.is_form_shown());
    }

    #[tokio::test]
    async fn test_expired_session_redirects() {
        let c = clinic();
        c.api.expire_tokens();

        let mut page = PatientDashboard::new(c.api.session());
        page.mount(&c.api).await;
        assert_eq!(page.redirect(), Some(Route::Login));
        assert!(!c.api.session().is_signed_in().unwrap());
        assert_eq!(page.name(), "Patient");
        assert!(page.doctors().is_empty());
        assert!(!c.api.calls().contains(&"approved_doctors"));
        assert!(!c.api.calls().contains(&"me"));
    }
}
