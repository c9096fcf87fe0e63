//! UI Components
//!
//! Reusable Leptos components for the dashboard.

pub mod loading;
pub mod navbar;
pub mod sidebar;
pub mod toast;

pub use loading::Loading;
pub use navbar::Navbar;
pub use sidebar::Sidebar;
pub use toast::Toast;
