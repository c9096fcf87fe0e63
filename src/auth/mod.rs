//! Credentials
//!
//! Password hashing and bearer-token generation used by the clinic API.
//! Session rows themselves live in [`crate::store`].

pub mod password;
pub mod token;

pub use password::{hash_password, verify_password, PasswordError};
pub use token::generate_token;
