//! Dashboard client
//!
//! Everything the dashboard pages need from the backend goes through the
//! [`ClinicApi`] trait. [`ApiClient`] implements it over HTTP with a bearer
//! token taken from the [`Session`] on every request.

pub mod error;
pub mod http;
pub mod session;

pub use error::{ClientError, ClientResult};
pub use http::ApiClient;
pub use session::{FileSessionStore, MemorySessionStore, Session, SessionData, SessionStore};

use async_trait::async_trait;

use crate::models::{
    Appointment, AppointmentStatus, BookingRequest, DoctorProfile, DoctorProfileRequest,
    LoginRequest, Message, RegisterRequest, Role, TokenResponse, User, UserProfile,
};

/// Avatar shown when an account has no image or the profile fetch failed
pub const PLACEHOLDER_AVATAR: &str = "https://cdn-icons-png.flaticon.com/512/3135/3135715.png";

/// A local image picked for upload
#[derive(Debug, Clone, PartialEq)]
pub struct ImageUpload {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

/// Multipart body for `PUT /auth/update-profile`
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileUpdate {
    pub name: String,
    pub email: String,
    /// Sent only when non-empty
    pub password: String,
    pub image: Option<ImageUpload>,
}

/// Backend operations used by the dashboard pages
#[async_trait]
pub trait ClinicApi: Send + Sync {
    async fn register(&self, req: &RegisterRequest) -> ClientResult<User>;

    async fn login(&self, req: &LoginRequest) -> ClientResult<TokenResponse>;

    /// Revoke the current token on the server
    async fn revoke_session(&self) -> ClientResult<Message>;

    async fn me(&self) -> ClientResult<User>;

    async fn profile(&self) -> ClientResult<UserProfile>;

    async fn update_profile(&self, update: &ProfileUpdate) -> ClientResult<UserProfile>;

    async fn all_doctors(&self) -> ClientResult<Vec<DoctorProfile>>;

    async fn approved_doctors(&self) -> ClientResult<Vec<DoctorProfile>>;

    /// The signed-in doctor's profile; `None` when not created yet
    async fn my_doctor_profile(&self) -> ClientResult<Option<DoctorProfile>>;

    async fn create_doctor_profile(&self, req: &DoctorProfileRequest)
        -> ClientResult<DoctorProfile>;

    async fn approve_doctor(&self, id: i64) -> ClientResult<Message>;

    /// Role-scoped appointment list (`/appointments/{role}`)
    async fn appointments(&self, role: Role) -> ClientResult<Vec<Appointment>>;

    async fn book_appointment(&self, req: &BookingRequest) -> ClientResult<Appointment>;

    async fn update_appointment_status(
        &self,
        id: i64,
        status: AppointmentStatus,
    ) -> ClientResult<Message>;

    async fn cancel_appointment(&self, id: i64) -> ClientResult<Message>;

    /// Absolute URL for a server-relative image path, or the placeholder
    fn image_url(&self, path: Option<&str>) -> String;
}

/// Join a stored image path onto the API origin. Absolute and `data:` URLs
/// pass through; a missing path gives [`PLACEHOLDER_AVATAR`].
pub fn resolve_image_url(base_url: &str, path: Option<&str>) -> String {
    match path.map(str::trim).filter(|p| !p.is_empty()) {
        Some(p) if p.starts_with("http://") || p.starts_with("https://") || p.starts_with("data:") => {
            p.to_string()
        }
        Some(p) => format!(
            "{}/{}",
            base_url.trim_end_matches('/'),
            p.trim_start_matches('/')
        ),
        None => PLACEHOLDER_AVATAR.to_string(),
    }
}
