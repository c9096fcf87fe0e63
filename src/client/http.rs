//! MedConnect REST API Client
//!
//! Thin reqwest wrapper. Every request reads the bearer token from the
//! session at send time. Responses are decoded into [`crate::models`] types;
//! error bodies are mapped onto [`ClientError`] using the server's `detail`.

use async_trait::async_trait;
use reqwest::{multipart, Client, RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::error::{ClientError, ClientResult};
use super::session::Session;
use super::{resolve_image_url, ClinicApi, ProfileUpdate};
use crate::models::{
    Appointment, AppointmentStatus, BookingRequest, DoctorProfile, DoctorProfileRequest,
    LoginRequest, Message, RegisterRequest, Role, StatusUpdate, TokenResponse, User, UserProfile,
};

/// HTTP implementation of [`ClinicApi`]
#[derive(Clone)]
pub struct ApiClient {
    client: Client,
    base_url: String,
    session: Session,
}

/// Error body shape. `detail` is usually a string, but validation failures
/// may carry structured detail.
#[derive(Debug, Deserialize)]
struct ErrorBody {
    detail: serde_json::Value,
}

impl ApiClient {
    pub fn new(base_url: impl Into<String>, session: Session) -> ClientResult<Self> {
        let client = Client::builder().build()?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            session,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn session(&self) -> &Session {
        &self.session
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    /// Attach the stored bearer token, if any
    fn authorized(&self, builder: RequestBuilder) -> ClientResult<RequestBuilder> {
        Ok(match self.session.token()? {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        })
    }

    async fn get<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let builder = self.authorized(self.client.get(self.url(path)))?;
        self.send(builder).await
    }

    async fn post<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let builder = self.authorized(self.client.post(self.url(path)).json(body))?;
        self.send(builder).await
    }

    async fn put<B: Serialize + Sync, T: DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<T> {
        let builder = self.authorized(self.client.put(self.url(path)).json(body))?;
        self.send(builder).await
    }

    async fn delete<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let builder = self.authorized(self.client.delete(self.url(path)))?;
        self.send(builder).await
    }

    async fn send<T: DeserializeOwned>(&self, builder: RequestBuilder) -> ClientResult<T> {
        let response = builder.send().await?;
        let status = response.status();

        if !status.is_success() {
            return Err(error_from_response(response).await);
        }

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| ClientError::Decode(e.to_string()))
    }
}

async fn error_from_response(response: Response) -> ClientError {
    let status = response.status();
    let text = response.text().await.unwrap_or_default();
    let detail = parse_detail(&text);

    if status == StatusCode::UNAUTHORIZED {
        ClientError::Unauthorized { detail }
    } else {
        ClientError::Api {
            status: status.as_u16(),
            detail,
        }
    }
}

/// Extract the human-readable message from an error body
fn parse_detail(text: &str) -> String {
    match serde_json::from_str::<ErrorBody>(text) {
        Ok(ErrorBody {
            detail: serde_json::Value::String(detail),
        }) => detail,
        Ok(ErrorBody { detail }) => detail.to_string(),
        Err(_) => text.trim().to_string(),
    }
}

fn profile_form(update: &ProfileUpdate) -> ClientResult<multipart::Form> {
    let mut form = multipart::Form::new()
        .text("name", update.name.clone())
        .text("email", update.email.clone());

    if !update.password.is_empty() {
        form = form.text("password", update.password.clone());
    }

    if let Some(image) = &update.image {
        let part = multipart::Part::bytes(image.bytes.clone())
            .file_name(image.file_name.clone())
            .mime_str(&image.content_type)?;
        form = form.part("profile_image", part);
    }

    Ok(form)
}

#[async_trait]
impl ClinicApi for ApiClient {
    async fn register(&self, req: &RegisterRequest) -> ClientResult<User> {
        self.post("/auth/register", req).await
    }

    async fn login(&self, req: &LoginRequest) -> ClientResult<TokenResponse> {
        self.post("/auth/login", req).await
    }

    async fn revoke_session(&self) -> ClientResult<Message> {
        self.post("/auth/logout", &serde_json::json!({})).await
    }

    async fn me(&self) -> ClientResult<User> {
        self.get("/auth/me").await
    }

    async fn profile(&self) -> ClientResult<UserProfile> {
        self.get("/auth/profile").await
    }

    async fn update_profile(&self, update: &ProfileUpdate) -> ClientResult<UserProfile> {
        let builder = self
            .client
            .put(self.url("/auth/update-profile"))
            .multipart(profile_form(update)?);
        let builder = self.authorized(builder)?;
        self.send(builder).await
    }

    async fn all_doctors(&self) -> ClientResult<Vec<DoctorProfile>> {
        self.get("/doctors/all").await
    }

    async fn approved_doctors(&self) -> ClientResult<Vec<DoctorProfile>> {
        self.get("/doctors/approved").await
    }

    async fn my_doctor_profile(&self) -> ClientResult<Option<DoctorProfile>> {
        match self.get::<DoctorProfile>("/doctors/me").await {
            Ok(profile) => Ok(Some(profile)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn create_doctor_profile(
        &self,
        req: &DoctorProfileRequest,
    ) -> ClientResult<DoctorProfile> {
        self.post("/doctors/create", req).await
    }

    async fn approve_doctor(&self, id: i64) -> ClientResult<Message> {
        self.put(&format!("/doctors/approve/{}", id), &serde_json::json!({}))
            .await
    }

    async fn appointments(&self, role: Role) -> ClientResult<Vec<Appointment>> {
        self.get(&format!("/appointments/{}", role.as_str())).await
    }

    async fn book_appointment(&self, req: &BookingRequest) -> ClientResult<Appointment> {
        self.post("/appointments/book", req).await
    }

    async fn update_appointment_status(
        &self,
        id: i64,
        status: AppointmentStatus,
    ) -> ClientResult<Message> {
        self.put(
            &format!("/appointments/{}/status", id),
            &StatusUpdate { status },
        )
        .await
    }

    async fn cancel_appointment(&self, id: i64) -> ClientResult<Message> {
        self.delete(&format!("/appointments/{}", id)).await
    }

    fn image_url(&self, path: Option<&str>) -> String {
        resolve_image_url(&self.base_url, path)
    }
}
