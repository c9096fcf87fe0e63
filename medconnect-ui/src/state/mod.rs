//! State Management
//!
//! Global session state, wire types, and the pure logic pages share.

pub mod forms;
pub mod global;
pub mod list;
pub mod models;
pub mod route;

pub use route::AppRoute;
