//! Dashboard pages
//!
//! Headless view models for each dashboard screen. A page is created with
//! the shared [`Session`], filled by [`Page::mount`], and drawn as text by
//! [`Page::render`]. User actions are async methods on the concrete page
//! types; each issues one request and patches the page's local state.
//!
//! Failed requests are logged and leave the page as it was. A 401 from any
//! authenticated request signs the session out and sets the page's redirect
//! to [`Route::Login`].

pub mod admin;
pub mod auth;
pub mod doctor;
pub mod list;
pub mod nav;
pub mod patient;
pub mod profile;
pub mod route;
pub mod table;

#[cfg(test)]
mod e2e;
#[cfg(test)]
pub(crate) mod fake;

pub use admin::{AdminDashboard, AdminDoctors};
pub use auth::{logout, LoginForm, RegisterForm};
pub use doctor::{DoctorBranch, DoctorDashboard};
pub use list::{Keyed, LocalList};
pub use nav::{Navbar, Sidebar};
pub use patient::PatientDashboard;
pub use profile::ProfilePage;
pub use route::Route;

use async_trait::async_trait;
use std::fmt;

use crate::client::{ClientError, ClinicApi, Session};
use crate::models::Role;

/// Shown while a page's first fetch is outstanding
pub const LOADING: &str = "Loading...";

/// A message the user has to acknowledge
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Success(String),
    Error(String),
}

impl Notice {
    pub fn text(&self) -> &str {
        match self {
            Notice::Success(text) | Notice::Error(text) => text,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Notice::Error(_))
    }
}

impl fmt::Display for Notice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.text())
    }
}

/// Common surface of the mountable pages
#[async_trait]
pub trait Page: Send {
    /// Issue the page's initial fetches
    async fn mount(&mut self, api: &dyn ClinicApi);

    fn render(&self) -> String;

    /// Set when the page wants to navigate away, e.g. after a 401
    fn redirect(&self) -> Option<Route>;
}

/// The dashboard page for a role
pub fn dashboard_page(role: Role, session: Session) -> Box<dyn Page> {
    match role {
        Role::Patient => Box::new(PatientDashboard::new(session)),
        Role::Doctor => Box::new(DoctorDashboard::new(session)),
        Role::Admin => Box::new(AdminDashboard::new(session)),
    }
}

/// Log a failed request and apply the 401 policy. Returns the route to
/// redirect to, if any.
pub(crate) fn handle_failure(session: &Session, err: &ClientError, context: &str) -> Option<Route> {
    tracing::error!(error = %err, "{}", context);

    if !err.is_unauthorized() {
        return None;
    }

    if let Err(e) = session.logout() {
        tracing::warn!(error = %e, "Failed to clear session after 401");
    }
    Some(Route::Login)
}
