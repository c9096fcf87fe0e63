//! Login and registration forms

use super::{Notice, Route};
use crate::client::{ClientError, ClinicApi, Session};
use crate::models::{LoginRequest, RegisterRequest, Role};

pub const LOGIN_FAILED: &str = "Login failed";
pub const REGISTRATION_FAILED: &str = "Registration failed";
pub const REGISTERED: &str = "Registration successful! Please log in.";

/// Roles offered by the sign-up form
pub const REGISTER_ROLES: [Role; 2] = [Role::Patient, Role::Doctor];

pub struct LoginForm {
    session: Session,
    pub email: String,
    pub password: String,
}

impl LoginForm {
    pub fn new(session: Session) -> Self {
        Self {
            session,
            email: String::new(),
            password: String::new(),
        }
    }

    /// Exchange credentials for a token, look up the role, and return the
    /// role's dashboard. On any failure the session is left empty.
    pub async fn submit(&mut self, api: &dyn ClinicApi) -> Result<Route, Notice> {
        match self.sign_in(api).await {
            Ok(role) => {
                tracing::info!(role = %role, "Signed in");
                Ok(role.dashboard())
            }
            Err(e) => {
                tracing::error!(error = %e, "Login failed");
                if let Err(clear) = self.session.logout() {
                    tracing::warn!(error = %clear, "Failed to clear session");
                }
                Err(Notice::Error(e.user_message(LOGIN_FAILED)))
            }
        }
    }

    async fn sign_in(&self, api: &dyn ClinicApi) -> Result<Role, ClientError> {
        let token = api
            .login(&LoginRequest {
                email: self.email.trim().to_string(),
                password: self.password.clone(),
            })
            .await?;
        self.session.start(&token.access_token)?;

        let user = api.me().await?;
        self.session.set_role(user.role)?;
        Ok(user.role)
    }
}

pub struct RegisterForm {
    pub name: String,
    pub email: String,
    pub password: String,
    role: Role,
}

impl Default for RegisterForm {
    fn default() -> Self {
        Self {
            name: String::new(),
            email: String::new(),
            password: String::new(),
            role: Role::Patient,
        }
    }
}

impl RegisterForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn role(&self) -> Role {
        self.role
    }

    /// Pick the account type. Only [`REGISTER_ROLES`] are accepted.
    pub fn set_role(&mut self, role: Role) -> bool {
        if REGISTER_ROLES.contains(&role) {
            self.role = role;
            true
        } else {
            false
        }
    }

    /// Create the account. Success sends the user to the login page.
    pub async fn submit(&mut self, api: &dyn ClinicApi) -> Result<(Route, Notice), Notice> {
        let req = RegisterRequest {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            password: self.password.clone(),
            role: self.role,
        };

        match api.register(&req).await {
            Ok(user) => {
                tracing::info!(user_id = user.id, role = %user.role, "Registered account");
                Ok((Route::Login, Notice::Success(REGISTERED.to_string())))
            }
            Err(e) => {
                tracing::error!(error = %e, "Registration failed");
                Err(Notice::Error(e.user_message(REGISTRATION_FAILED)))
            }
        }
    }
}

/// Clear `token` and `role` together and go to the login page
pub fn logout(session: &Session) -> Route {
    match session.logout() {
        Ok(()) => tracing::info!("Signed out"),
        Err(e) => tracing::warn!(error = %e, "Failed to clear session"),
    }
    Route::Login
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::views::fake::{FakeApi, PASSWORD};

    async fn login_as(api: &FakeApi, role: Role) -> Result<Route, Notice> {
        let user = api.add_user(&format!("user-{}", role), role);
        let mut form = LoginForm::new(api.session());
        form.email = user.email.clone();
        form.password = PASSWORD.to_string();
        form.submit(api).await
    }

    #[tokio::test]
    async fn test_login_routes_to_role_dashboard() {
        for (role, path) in [
            (Role::Patient, "/patient-dashboard"),
            (Role::Doctor, "/doctor-dashboard"),
            (Role::Admin, "/admin-dashboard"),
        ] {
            let api = FakeApi::new();
            let route = login_as(&api, role).await.unwrap();
            assert_eq!(route.path(), path);

            let session = api.session();
            assert!(session.token().unwrap().is_some());
            assert_eq!(session.role().unwrap(), Some(role));
        }
    }

    #[tokio::test]
    async fn test_login_invalid_credentials() {
        let api = FakeApi::new();
        api.add_user("Asha", Role::Patient);

        let mut form = LoginForm::new(api.session());
        form.email = "asha@clinic.test".to_string();
        form.password = "wrong".to_string();

        let notice = form.submit(&api).await.unwrap_err();
        assert_eq!(notice, Notice::Error("Invalid credentials".to_string()));
        assert_eq!(api.session().token().unwrap(), None);
        assert_eq!(api.session().role().unwrap(), None);
    }

    #[tokio::test]
    async fn test_login_me_failure_clears_token() {
        let api = FakeApi::new();
        let user = api.add_user("Asha", Role::Patient);
        api.fail("me");

        let mut form = LoginForm::new(api.session());
        form.email = user.email;
        form.password = PASSWORD.to_string();

        let notice = form.submit(&api).await.unwrap_err();
        assert_eq!(notice.text(), LOGIN_FAILED);
        assert_eq!(api.session().token().unwrap(), None);
    }

    #[tokio::test]
    async fn test_register_success_and_failure() {
        let api = FakeApi::new();

        let mut form = RegisterForm::new();
        form.name = "Rao".to_string();
        form.email = "rao@clinic.test".to_string();
        form.password = "pw".to_string();
        assert!(form.set_role(Role::Doctor));
        assert!(!form.set_role(Role::Admin));
        assert_eq!(form.role(), Role::Doctor);

        let (route, notice) = form.submit(&api).await.unwrap();
        assert_eq!(route, Route::Login);
        assert_eq!(notice.text(), REGISTERED);

        let notice = form.submit(&api).await.unwrap_err();
        assert_eq!(notice.text(), "Email already registered");

        api.fail("register");
        let notice = form.submit(&api).await.unwrap_err();
        assert_eq!(notice.text(), REGISTRATION_FAILED);
    }

    #[test]
    fn test_logout_clears_both_values() {
        let session = Session::in_memory();
        session.login("tok", Role::Admin).unwrap();

        assert_eq!(logout(&session).path(), "/login");
        assert_eq!(session.token().unwrap(), None);
        assert_eq!(session.role().unwrap(), None);
    }
}
