//! Global Application State
//!
//! The auth context (`{user, token, role}`) and toast messages, provided to
//! every component as reactive signals.

use leptos::*;

use super::models::{Role, User};
use crate::api::{self, session, ApiError};

/// Global application state provided to all components
#[derive(Clone, Copy)]
pub struct GlobalState {
    /// Bearer token mirrored from storage
    pub token: RwSignal<Option<String>>,
    /// Role persisted at login, not derived from the token
    pub role: RwSignal<Option<Role>>,
    /// Signed-in account, fetched by the navbar
    pub user: RwSignal<Option<User>>,
    /// Success message (for toasts)
    pub success: RwSignal<Option<String>>,
    /// Error message to display
    pub error: RwSignal<Option<String>>,
}

/// Provide global state to the component tree
pub fn provide_global_state() {
    let state = GlobalState {
        token: create_rw_signal(session::token()),
        role: create_rw_signal(session::role()),
        user: create_rw_signal(None),
        success: create_rw_signal(None),
        error: create_rw_signal(None),
    };

    provide_context(state);
}

/// The state provided by `App`
pub fn use_global_state() -> GlobalState {
    expect_context::<GlobalState>()
}

impl GlobalState {
    pub fn is_signed_in(&self) -> bool {
        self.token.get().is_some()
    }

    /// Store the token before `/auth/me` so that call is authenticated
    pub fn set_token(&self, token: &str) {
        session::set_token(token);
        self.token.set(Some(token.to_string()));
    }

    /// Finish login once the role is known
    pub fn set_user(&self, user: User) {
        session::set_role(user.role);
        self.role.set(Some(user.role));
        self.user.set(Some(user));
    }

    /// Clear `token` and `role` together
    pub fn sign_out(&self) {
        session::clear();
        self.token.set(None);
        self.role.set(None);
        self.user.set(None);
    }

    /// Log a failed request. A 401 also signs out; returns `true` when the
    /// caller should navigate to the login page.
    pub fn handle_failure(&self, err: &ApiError, context: &str) -> bool {
        web_sys::console::error_1(&format!("{}: {}", context, err).into());
        if err.is_unauthorized() {
            self.sign_out();
            return true;
        }
        false
    }

    /// Best-effort server-side revoke, then local sign-out
    pub fn logout(&self) {
        if let Some(token) = session::token() {
            spawn_local(async move {
                if let Err(e) = api::logout(&token).await {
                    web_sys::console::warn_1(&format!("Server-side logout failed: {}", e).into());
                }
            });
        }
        self.sign_out();
    }

    /// Show a success message (auto-clears after timeout)
    pub fn show_success(&self, message: &str) {
        self.success.set(Some(message.to_string()));

        let success_signal = self.success;
        gloo_timers::callback::Timeout::new(3000, move || {
            success_signal.set(None);
        })
        .forget();
    }

    /// Show an error message (auto-clears after timeout)
    pub fn show_error(&self, message: &str) {
        self.error.set(Some(message.to_string()));

        let error_signal = self.error;
        gloo_timers::callback::Timeout::new(5000, move || {
            error_signal.set(None);
        })
        .forget();
    }
}
