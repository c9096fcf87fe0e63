//! API Access
//!
//! The REST client and the persisted session it authenticates with.

pub mod client;
pub mod session;

pub use client::*;
