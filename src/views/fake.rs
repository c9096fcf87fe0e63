//! In-memory [`ClinicApi`] for page tests
//!
//! Mirrors the server's auth and status rules closely enough that the pages
//! see the same successes and failures they would over HTTP.

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use std::collections::{HashMap, HashSet};
use std::sync::{Mutex, MutexGuard};

use crate::client::{
    resolve_image_url, ClientError, ClientResult, ClinicApi, ProfileUpdate, Session,
};
use crate::models::{
    Appointment, AppointmentDoctor, AppointmentDoctorUser, AppointmentPatient, AppointmentStatus,
    BookingRequest, DoctorProfile, DoctorProfileRequest, DoctorUser, LoginRequest, Message,
    RegisterRequest, Role, TokenResponse, User, UserProfile,
};

pub const BASE_URL: &str = "http://fake.test";
pub const PASSWORD: &str = "secret";

#[derive(Default)]
struct State {
    accounts: Vec<(User, String)>,
    tokens: HashMap<String, i64>,
    doctors: Vec<DoctorProfile>,
    appointments: Vec<Appointment>,
    failing: HashSet<&'static str>,
    calls: Vec<&'static str>,
    next_id: i64,
}

impl State {
    fn next_id(&mut self) -> i64 {
        self.next_id += 1;
        self.next_id
    }
}

pub struct FakeApi {
    session: Session,
    state: Mutex<State>,
}

fn api_error(status: u16, detail: &str) -> ClientError {
    ClientError::Api {
        status,
        detail: detail.to_string(),
    }
}

fn require(user: &User, role: Role) -> ClientResult<()> {
    if user.role == role {
        Ok(())
    } else {
        Err(api_error(403, "Not enough permissions"))
    }
}

impl FakeApi {
    pub fn new() -> Self {
        Self {
            session: Session::in_memory(),
            state: Mutex::new(State::default()),
        }
    }

    pub fn session(&self) -> Session {
        self.session.clone()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap()
    }

    pub fn add_user(&self, name: &str, role: Role) -> User {
        let mut state = self.lock();
        let user = User {
            id: state.next_id(),
            name: name.to_string(),
            email: format!("{}@clinic.test", name.to_lowercase()),
            role,
            profile_image: None,
            created_at: Utc::now(),
        };
        state.accounts.push((user.clone(), PASSWORD.to_string()));
        user
    }

    /// Issue a token for `user` and store it in the session
    pub fn sign_in(&self, user: &User) {
        let token = format!("token-{}", user.id);
        self.lock().tokens.insert(token.clone(), user.id);
        self.session.login(&token, user.role).unwrap();
    }

    pub fn add_doctor(&self, user: &User, approved: bool) -> i64 {
        let mut state = self.lock();
        let id = state.next_id();
        state.doctors.push(DoctorProfile {
            id,
            specialization: "Cardiology".to_string(),
            experience: 7,
            fees: 500.0,
            approved,
            user: DoctorUser {
                id: user.id,
                name: user.name.clone(),
                email: user.email.clone(),
                role: user.role,
            },
        });
        id
    }

    pub fn add_appointment(
        &self,
        doctor_id: i64,
        patient: &User,
        day: u32,
        status: AppointmentStatus,
    ) -> i64 {
        let mut state = self.lock();
        let id = state.next_id();
        let doctor_name = state
            .doctors
            .iter()
            .find(|d| d.id == doctor_id)
            .map(|d| d.user.name.clone())
            .unwrap_or_default();
        state.appointments.push(Appointment {
            id,
            doctor_id,
            patient_id: patient.id,
            date: NaiveDate::from_ymd_opt(2025, 3, day).unwrap(),
            time_slot: "10:00 AM".to_string(),
            status,
            doctor: AppointmentDoctor {
                id: doctor_id,
                user: AppointmentDoctorUser { name: doctor_name },
            },
            patient: AppointmentPatient {
                id: patient.id,
                name: patient.name.clone(),
            },
        });
        id
    }

    /// Make every later call of `op` fail with a 500
    pub fn fail(&self, op: &'static str) {
        self.lock().failing.insert(op);
    }

    /// Invalidate every issued token, as if they expired server-side
    pub fn expire_tokens(&self) {
        self.lock().tokens.clear();
    }

    pub fn calls(&self) -> Vec<&'static str> {
        self.lock().calls.clone()
    }

    pub fn appointment_status(&self, id: i64) -> Option<AppointmentStatus> {
        self.lock()
            .appointments
            .iter()
            .find(|a| a.id == id)
            .map(|a| a.status)
    }

    pub fn doctor_approved(&self, id: i64) -> Option<bool> {
        self.lock().doctors.iter().find(|d| d.id == id).map(|d| d.approved)
    }

    fn begin(&self, op: &'static str) -> ClientResult<MutexGuard<'_, State>> {
        let mut state = self.lock();
        state.calls.push(op);
        if state.failing.contains(op) {
            return Err(api_error(500, ""));
        }
        Ok(state)
    }

    fn current(&self, state: &State) -> ClientResult<User> {
        let unauthorized = || ClientError::Unauthorized {
            detail: "Could not validate credentials".to_string(),
        };
        let token = self.session.token()?.ok_or_else(unauthorized)?;
        let id = state.tokens.get(&token).ok_or_else(unauthorized)?;
        state
            .accounts
            .iter()
            .find(|(u, _)| u.id == *id)
            .map(|(u, _)| u.clone())
            .ok_or_else(unauthorized)
    }
}

#[async_trait]
impl ClinicApi for FakeApi {
    async fn register(&self, req: &RegisterRequest) -> ClientResult<User> {
        let mut state = self.begin("register")?;
        if req.role == Role::Admin {
            return Err(api_error(400, "Admin accounts cannot be self-registered"));
        }
        if state.accounts.iter().any(|(u, _)| u.email == req.email) {
            return Err(api_error(400, "Email already registered"));
        }
        let user = User {
            id: state.next_id(),
            name: req.name.clone(),
            email: req.email.clone(),
            role: req.role,
            profile_image: None,
            created_at: Utc::now(),
        };
        state.accounts.push((user.clone(), req.password.clone()));
        Ok(user)
    }

    async fn login(&self, req: &LoginRequest) -> ClientResult<TokenResponse> {
        let mut state = self.begin("login")?;
        let id = state
            .accounts
            .iter()
            .find(|(u, p)| u.email == req.email && *p == req.password)
            .map(|(u, _)| u.id)
            .ok_or_else(|| ClientError::Unauthorized {
                detail: "Invalid credentials".to_string(),
            })?;
        let token = format!("token-{}", id);
        state.tokens.insert(token.clone(), id);
        Ok(TokenResponse {
            access_token: token,
            token_type: "bearer".to_string(),
        })
    }

    async fn revoke_session(&self) -> ClientResult<Message> {
        let mut state = self.begin("revoke_session")?;
        self.current(&state)?;
        if let Some(token) = self.session.token()? {
            state.tokens.remove(&token);
        }
        Ok(Message::new("Logged out"))
    }

    async fn me(&self) -> ClientResult<User> {
        let state = self.begin("me")?;
        self.current(&state)
    }

    async fn profile(&self) -> ClientResult<UserProfile> {
        let state = self.begin("profile")?;
        Ok(self.current(&state)?.into())
    }

    async fn update_profile(&self, update: &ProfileUpdate) -> ClientResult<UserProfile> {
        let mut state = self.begin("update_profile")?;
        let user = self.current(&state)?;
        let (account, password) = state
            .accounts
            .iter_mut()
            .find(|(u, _)| u.id == user.id)
            .ok_or_else(|| api_error(404, "User not found"))?;
        account.name = update.name.clone();
        account.email = update.email.clone();
        if !update.password.is_empty() {
            *password = update.password.clone();
        }
        if update.image.is_some() {
            account.profile_image = Some(format!("auth/profile-image/{}", account.id));
        }
        Ok(account.clone().into())
    }

    async fn all_doctors(&self) -> ClientResult<Vec<DoctorProfile>> {
        let state = self.begin("all_doctors")?;
        require(&self.current(&state)?, Role::Admin)?;
        Ok(state.doctors.clone())
    }

    async fn approved_doctors(&self) -> ClientResult<Vec<DoctorProfile>> {
        let state = self.begin("approved_doctors")?;
        Ok(state.doctors.iter().filter(|d| d.approved).cloned().collect())
    }

    async fn my_doctor_profile(&self) -> ClientResult<Option<DoctorProfile>> {
        let state = self.begin("my_doctor_profile")?;
        let user = self.current(&state)?;
        require(&user, Role::Doctor)?;
        Ok(state.doctors.iter().find(|d| d.user.id == user.id).cloned())
    }

    async fn create_doctor_profile(
        &self,
        req: &DoctorProfileRequest,
    ) -> ClientResult<DoctorProfile> {
        let mut state = self.begin("create_doctor_profile")?;
        let user = self.current(&state)?;
        require(&user, Role::Doctor)?;

        if let Some(existing) = state.doctors.iter_mut().find(|d| d.user.id == user.id) {
            existing.specialization = req.specialization.clone();
            existing.experience = req.experience;
            existing.fees = req.fees;
            return Ok(existing.clone());
        }

        let profile = DoctorProfile {
            id: state.next_id(),
            specialization: req.specialization.clone(),
            experience: req.experience,
            fees: req.fees,
            approved: false,
            user: DoctorUser {
                id: user.id,
                name: user.name,
                email: user.email,
                role: user.role,
            },
        };
        state.doctors.push(profile.clone());
        Ok(profile)
    }

    async fn approve_doctor(&self, id: i64) -> ClientResult<Message> {
        let mut state = self.begin("approve_doctor")?;
        require(&self.current(&state)?, Role::Admin)?;
        let doctor = state
            .doctors
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or_else(|| api_error(404, "Doctor not found"))?;
        doctor.approved = true;
        Ok(Message::new("Doctor approved successfully"))
    }

    async fn appointments(&self, role: Role) -> ClientResult<Vec<Appointment>> {
        let state = self.begin("appointments")?;
        let user = self.current(&state)?;
        require(&user, role)?;

        let rows = match role {
            Role::Admin => state.appointments.clone(),
            Role::Doctor => {
                let profile = state
                    .doctors
                    .iter()
                    .find(|d| d.user.id == user.id)
                    .ok_or_else(|| api_error(404, "Doctor profile not found"))?;
                state
                    .appointments
                    .iter()
                    .filter(|a| a.doctor_id == profile.id)
                    .cloned()
                    .collect()
            }
            Role::Patient => state
                .appointments
                .iter()
                .filter(|a| a.patient_id == user.id)
                .cloned()
                .collect(),
        };
        Ok(rows)
    }

    async fn book_appointment(&self, req: &BookingRequest) -> ClientResult<Appointment> {
        let mut state = self.begin("book_appointment")?;
        let user = self.current(&state)?;
        require(&user, Role::Patient)?;

        let doctor_name = state
            .doctors
            .iter()
            .find(|d| d.id == req.doctor_id && d.approved)
            .map(|d| d.user.name.clone())
            .ok_or_else(|| api_error(404, "Doctor not found or not approved"))?;

        let appointment = Appointment {
            id: state.next_id(),
            doctor_id: req.doctor_id,
            patient_id: user.id,
            date: req.date,
            time_slot: req.time_slot.clone(),
            status: AppointmentStatus::Pending,
            doctor: AppointmentDoctor {
                id: req.doctor_id,
                user: AppointmentDoctorUser { name: doctor_name },
            },
            patient: AppointmentPatient {
                id: user.id,
                name: user.name,
            },
        };
        state.appointments.push(appointment.clone());
        Ok(appointment)
    }

    async fn update_appointment_status(
        &self,
        id: i64,
        status: AppointmentStatus,
    ) -> ClientResult<Message> {
        let mut state = self.begin("update_appointment_status")?;
        require(&self.current(&state)?, Role::Doctor)?;
        let appt = state
            .appointments
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| api_error(404, "Appointment not found"))?;
        if !appt.status.can_transition_to(status) {
            return Err(api_error(409, "Illegal transition"));
        }
        appt.status = status;
        Ok(Message::new(format!("Appointment status updated to {}", status)))
    }

    async fn cancel_appointment(&self, id: i64) -> ClientResult<Message> {
        let mut state = self.begin("cancel_appointment")?;
        let user = self.current(&state)?;
        require(&user, Role::Patient)?;
        let appt = state
            .appointments
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| api_error(404, "Appointment not found"))?;
        if appt.patient_id != user.id {
            return Err(api_error(403, "Not your appointment"));
        }
        if !appt.status.is_cancellable() {
            return Err(api_error(409, "Illegal transition"));
        }
        appt.status = AppointmentStatus::Cancelled;
        Ok(Message::new("Appointment cancelled"))
    }

    fn image_url(&self, path: Option<&str>) -> String {
        resolve_image_url(BASE_URL, path)
    }
}
