//! Navigation chrome: the top bar and the role-aware sidebar

use async_trait::async_trait;

use super::{handle_failure, logout, Page, Route};
use crate::client::{ClinicApi, Session, PLACEHOLDER_AVATAR};
use crate::models::Role;

/// Top bar with the logo, the avatar link and sign-in/out actions
pub struct Navbar {
    session: Session,
    avatar: Option<String>,
    redirect: Option<Route>,
}

impl Navbar {
    pub fn new(session: Session) -> Self {
        Self {
            session,
            avatar: None,
            redirect: None,
        }
    }

    fn signed_in(&self) -> bool {
        self.session.is_signed_in().unwrap_or(false)
    }

    /// Where the logo goes: the role's dashboard, or the login page when
    /// signed out or the role is unknown
    pub fn logo_route(&self) -> Route {
        if !self.signed_in() {
            return Route::Login;
        }
        match self.session.role() {
            Ok(Some(role)) => role.dashboard(),
            _ => Route::Login,
        }
    }

    /// Avatar URL once mounted; `None` while signed out
    pub fn avatar(&self) -> Option<&str> {
        self.avatar.as_deref()
    }

    pub fn profile_route(&self) -> Route {
        Route::Profile
    }

    pub fn logout(&mut self) -> Route {
        self.avatar = None;
        logout(&self.session)
    }
}

#[async_trait]
impl Page for Navbar {
    async fn mount(&mut self, api: &dyn ClinicApi) {
        if !self.signed_in() {
            self.avatar = None;
            return;
        }

        match api.profile().await {
            Ok(profile) => self.avatar = Some(api.image_url(profile.profile_image.as_deref())),
            Err(e) => {
                self.redirect = handle_failure(&self.session, &e, "Failed to fetch profile image");
                self.avatar = self.redirect.is_none().then(|| PLACEHOLDER_AVATAR.to_string());
            }
        }
    }

    fn render(&self) -> String {
        if self.signed_in() {
            format!(
                "MedConnect ({})  |  Profile [{}]  |  Logout\n",
                self.logo_route(),
                self.avatar.as_deref().unwrap_or(PLACEHOLDER_AVATAR)
            )
        } else {
            "MedConnect (/login)  |  Login  |  Sign Up\n".to_string()
        }
    }

    fn redirect(&self) -> Option<Route> {
        self.redirect
    }
}

/// One sidebar entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SidebarLink {
    pub label: &'static str,
    pub route: Route,
}

/// Side navigation. Which links render depends on the stored role.
pub struct Sidebar {
    session: Session,
}

impl Sidebar {
    pub fn new(session: Session) -> Self {
        Self { session }
    }

    fn role(&self) -> Option<Role> {
        self.session.role().unwrap_or_else(|e| {
            tracing::error!(error = %e, "Failed to read role");
            None
        })
    }

    /// Appointments for everyone, Doctors for admins, then Logout
    pub fn links(&self) -> Vec<SidebarLink> {
        let role = self.role();
        let appointments = role.unwrap_or(Role::Patient).dashboard();

        let mut links = vec![SidebarLink {
            label: "Appointments",
            route: appointments,
        }];
        match role {
            Some(Role::Admin) => links.push(SidebarLink {
                label: "Doctors",
                route: Route::AdminDoctors,
            }),
            Some(Role::Patient) | Some(Role::Doctor) | None => {}
        }
        links.push(SidebarLink {
            label: "Logout",
            route: Route::Login,
        });
        links
    }

    pub fn logout(&self) -> Route {
        logout(&self.session)
    }

    /// Draw the links, marking the one matching `current`. Any dashboard
    /// counts as the Appointments entry.
    pub fn render(&self, current: Route) -> String {
        self.links()
            .iter()
            .map(|link| {
                let active = match link.label {
                    "Appointments" => current.is_dashboard(),
                    "Logout" => false,
                    _ => link.route == current,
                };
                format!("{} {}\n", if active { ">" } else { " " }, link.label)
            })
            .collect()
    }
}
