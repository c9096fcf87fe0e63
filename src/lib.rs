//! # MedConnect
//!
//! Clinic appointment booking: patients book with approved doctors, doctors
//! confirm or reject, admins approve doctor profiles.
//!
//! ## Modules
//!
//! - [`models`]: wire types shared by server and client
//! - [`store`]: SQLite persistence for accounts, profiles, appointments and sessions
//! - [`auth`]: password hashing and bearer session tokens
//! - [`api`]: REST API server with Axum
//! - [`client`]: typed HTTP client and the persisted [`client::Session`]
//! - [`views`]: role-based dashboard pages rendered as text
//!
//! The browser dashboard is the `medconnect-ui` workspace member (Leptos).
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use medconnect::client::{ApiClient, ClinicApi, Session};
//! use medconnect::views::{dashboard_page, LoginForm};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let session = Session::in_memory();
//!     let api = ApiClient::new("http://127.0.0.1:8000", session.clone())?;
//!
//!     let mut login = LoginForm::new(session.clone());
//!     login.email = "asha@clinic.example".to_string();
//!     login.password = "secret".to_string();
//!     let route = login.submit(&api).await.map_err(|n| n.to_string())?;
//!     println!("Signed in, landing on {}", route);
//!
//!     if let Some(role) = session.role()? {
//!         let mut page = dashboard_page(role, session.clone());
//!         page.mount(&api).await;
//!         print!("{}", page.render());
//!     }
//!     Ok(())
//! }
//! ```

pub mod api;
pub mod auth;
pub mod client;
pub mod config;
pub mod logging;
pub mod models;
pub mod store;
pub mod views;

pub use api::{build_router, serve, ApiError, AppState};
pub use client::{ApiClient, ClientError, ClinicApi, Session};
pub use config::{Config, ConfigError, LoggingConfig};
pub use models::{Appointment, AppointmentStatus, DoctorProfile, Role, User};
pub use store::{Store, StoreError};
