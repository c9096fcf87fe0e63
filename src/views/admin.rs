//! Admin pages: every appointment, and the doctor approval list

use async_trait::async_trait;

use super::table::{capitalize, Table};
use super::{handle_failure, LocalList, Notice, Page, Route, LOADING};
use crate::client::{ClinicApi, Session};
use crate::models::{Appointment, DoctorProfile, Role};

pub const APPROVE_FAILED: &str = "Failed to approve doctor";

pub struct AdminDashboard {
    session: Session,
    loading: bool,
    name: Option<String>,
    appointments: LocalList<Appointment>,
    redirect: Option<Route>,
}

impl AdminDashboard {
    pub fn new(session: Session) -> Self {
        Self {
            session,
            loading: true,
            name: None,
            appointments: LocalList::default(),
            redirect: None,
        }
    }

    pub fn name(&self) -> &str {
        self.name.as_deref().unwrap_or(Role::Admin.label())
    }

    pub fn appointments(&self) -> &LocalList<Appointment> {
        &self.appointments
    }
}

#[async_trait]
impl Page for AdminDashboard {
    async fn mount(&mut self, api: &dyn ClinicApi) {
        match api.me().await {
            Ok(user) => self.name = Some(user.name),
            Err(e) => self.redirect = handle_failure(&self.session, &e, "Error fetching admin data"),
        }

        if self.redirect.is_none() {
            match api.appointments(Role::Admin).await {
                Ok(rows) => self.appointments.reset(rows),
                Err(e) => {
                    self.redirect = handle_failure(&self.session, &e, "Error fetching appointments")
                }
            }
        }
        self.loading = false;
    }

    fn render(&self) -> String {
        if self.loading {
            return format!("{}\n", LOADING);
        }

        let mut table = Table::new(&["Date", "Time", "Doctor", "Patient", "Status"])
            .empty("No appointments found");
        for appt in self.appointments.iter() {
            table.row(vec![
                appt.date.to_string(),
                appt.time_slot.clone(),
                appt.doctor.user.name.clone(),
                appt.patient.name.clone(),
                capitalize(appt.status.as_str()),
            ]);
        }

        format!(
            "Welcome, {}!\n\nAll Appointments\n{}",
            self.name(),
            table.render()
        )
    }

    fn redirect(&self) -> Option<Route> {
        self.redirect
    }
}

/// Doctor list with per-row approval
pub struct AdminDoctors {
    session: Session,
    loading: bool,
    doctors: LocalList<DoctorProfile>,
    redirect: Option<Route>,
}

impl AdminDoctors {
    pub fn new(session: Session) -> Self {
        Self {
            session,
            loading: true,
            doctors: LocalList::default(),
            redirect: None,
        }
    }

    pub fn doctors(&self) -> &LocalList<DoctorProfile> {
        &self.doctors
    }

    pub fn status_label(&self, id: i64) -> Option<&'static str> {
        self.doctors
            .get(id)
            .map(|d| if d.approved { "Approved" } else { "Pending" })
    }

    /// Approve one doctor and flip only that row. The list is not fetched
    /// again.
    pub async fn approve(&mut self, api: &dyn ClinicApi, id: i64) -> Option<Notice> {
        match api.approve_doctor(id).await {
            Ok(_) => {
                tracing::info!(doctor_id = id, "Doctor approved");
                self.doctors.apply(id, |d| d.approved = true);
                None
            }
            Err(e) => {
                self.redirect = handle_failure(&self.session, &e, "Approval failed");
                Some(Notice::Error(APPROVE_FAILED.to_string()))
            }
        }
    }
}

#[async_trait]
impl Page for AdminDoctors {
    async fn mount(&mut self, api: &dyn ClinicApi) {
        match api.all_doctors().await {
            Ok(rows) => self.doctors.reset(rows),
            Err(e) => self.redirect = handle_failure(&self.session, &e, "Error fetching doctors"),
        }
        self.loading = false;
    }

    fn render(&self) -> String {
        if self.loading {
            return format!("{}\n", LOADING);
        }

        let mut table = Table::new(&[
            "Name",
            "Email",
            "Specialization",
            "Experience",
            "Fees",
            "Status",
            "Action",
        ])
        .empty("No doctors found");
        for doctor in self.doctors.iter() {
            let (status, action) = if doctor.approved {
                ("Approved", "")
            } else {
                ("Pending", "Approve")
            };
            table.row(vec![
                doctor.user.name.clone(),
                doctor.user.email.clone(),
                doctor.specialization.clone(),
                format!("{} yrs", doctor.experience),
                format!("₹{}", doctor.fees),
                status.to_string(),
                action.to_string(),
            ]);
        }

        format!("Doctors List\n{}", table.render())
    }

    fn redirect(&self) -> Option<Route> {
        self.redirect
    }
}
