//! API Routes
//!
//! Route handlers organized by resource.

pub mod admin;
pub mod appointments;
pub mod auth;
pub mod doctors;
pub mod health;
