//! Dashboard routes

use std::fmt;

use crate::models::Role;

/// Every page the dashboard can navigate to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Route {
    Login,
    Register,
    PatientDashboard,
    DoctorDashboard,
    AdminDashboard,
    AdminDoctors,
    Profile,
}

impl Route {
    pub const ALL: [Route; 7] = [
        Route::Login,
        Route::Register,
        Route::PatientDashboard,
        Route::DoctorDashboard,
        Route::AdminDashboard,
        Route::AdminDoctors,
        Route::Profile,
    ];

    pub fn path(&self) -> &'static str {
        match self {
            Route::Login => "/login",
            Route::Register => "/register",
            Route::PatientDashboard => "/patient-dashboard",
            Route::DoctorDashboard => "/doctor-dashboard",
            Route::AdminDashboard => "/admin-dashboard",
            Route::AdminDoctors => "/doctors",
            Route::Profile => "/profile",
        }
    }

    pub fn from_path(path: &str) -> Option<Route> {
        Route::ALL.into_iter().find(|r| r.path() == path)
    }

    /// Any of the three role dashboards
    pub fn is_dashboard(&self) -> bool {
        matches!(
            self,
            Route::PatientDashboard | Route::DoctorDashboard | Route::AdminDashboard
        )
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.path())
    }
}

impl Role {
    /// Landing page for a signed-in role
    pub fn dashboard(&self) -> Route {
        match self {
            Role::Patient => Route::PatientDashboard,
            Role::Doctor => Route::DoctorDashboard,
            Role::Admin => Route::AdminDashboard,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_dashboards() {
        assert_eq!(Role::Patient.dashboard().path(), "/patient-dashboard");
        assert_eq!(Role::Doctor.dashboard().path(), "/doctor-dashboard");
        assert_eq!(Role::Admin.dashboard().path(), "/admin-dashboard");
    }

    #[test]
    fn test_path_roundtrip() {
        for route in Route::ALL {
            assert_eq!(Route::from_path(route.path()), Some(route));
        }
        assert_eq!(Route::from_path("/nowhere"), None);
        assert!(Route::AdminDashboard.is_dashboard());
        assert!(!Route::AdminDoctors.is_dashboard());
    }
}
