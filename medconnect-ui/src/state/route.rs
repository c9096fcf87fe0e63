//! Routes
//!
//! Every path the router serves, and the role-gated links of the chrome.

use super::models::Role;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppRoute {
    Login,
    Register,
    PatientDashboard,
    DoctorDashboard,
    AdminDashboard,
    AdminDoctors,
    Profile,
}

impl AppRoute {
    pub fn path(&self) -> &'static str {
        match self {
            AppRoute::Login => "/login",
            AppRoute::Register => "/register",
            AppRoute::PatientDashboard => "/patient-dashboard",
            AppRoute::DoctorDashboard => "/doctor-dashboard",
            AppRoute::AdminDashboard => "/admin-dashboard",
            AppRoute::AdminDoctors => "/doctors",
            AppRoute::Profile => "/profile",
        }
    }

    /// Landing page for a signed-in role
    pub fn dashboard(role: Role) -> AppRoute {
        match role {
            Role::Patient => AppRoute::PatientDashboard,
            Role::Doctor => AppRoute::DoctorDashboard,
            Role::Admin => AppRoute::AdminDashboard,
        }
    }

    /// Where the navbar logo points
    pub fn home(role: Option<Role>) -> AppRoute {
        role.map(AppRoute::dashboard).unwrap_or(AppRoute::Login)
    }
}

/// Sidebar entries for a role, excluding Logout
pub fn sidebar_links(role: Role) -> Vec<(&'static str, AppRoute)> {
    let mut links = vec![("Appointments", AppRoute::dashboard(role))];
    if role == Role::Admin {
        links.push(("Doctors", AppRoute::AdminDoctors));
    }
    links
}
