//! Password hashing
//!
//! PBKDF2-HMAC-SHA256 with a random per-password salt. Hashes are stored as
//! `pbkdf2-sha256$<iterations>$<salt b64>$<hash b64>` so the round count can
//! change without invalidating existing accounts.

use base64::engine::general_purpose::STANDARD_NO_PAD;
use base64::Engine;
use pbkdf2::pbkdf2_hmac;
use rand::RngCore;
use sha2::Sha256;

const SCHEME: &str = "pbkdf2-sha256";
pub const SALT_LENGTH: usize = 16;
pub const HASH_LENGTH: usize = 32;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum PasswordError {
    #[error("Malformed password hash")]
    Malformed,

    #[error("Unsupported hash scheme: {0}")]
    UnsupportedScheme(String),
}

fn derive(password: &str, salt: &[u8], iterations: u32) -> [u8; HASH_LENGTH] {
    let mut out = [0u8; HASH_LENGTH];
    pbkdf2_hmac::<Sha256>(password.as_bytes(), salt, iterations, &mut out);
    out
}

/// Hash a password with a fresh random salt
pub fn hash_password(password: &str, iterations: u32) -> String {
    let mut salt = [0u8; SALT_LENGTH];
    rand::thread_rng().fill_bytes(&mut salt);
    let hash = derive(password, &salt, iterations);

    format!(
        "{}${}${}${}",
        SCHEME,
        iterations,
        STANDARD_NO_PAD.encode(salt),
        STANDARD_NO_PAD.encode(hash)
    )
}

/// Check a password against a stored hash
pub fn verify_password(password: &str, stored: &str) -> Result<bool, PasswordError> {
    let mut parts = stored.split('$');
    let (Some(scheme), Some(iterations), Some(salt), Some(hash), None) = (
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
        parts.next(),
    ) else {
        return Err(PasswordError::Malformed);
    };

    if scheme != SCHEME {
        return Err(PasswordError::UnsupportedScheme(scheme.to_string()));
    }

    let iterations: u32 = iterations.parse().map_err(|_| PasswordError::Malformed)?;
    let salt = STANDARD_NO_PAD
        .decode(salt)
        .map_err(|_| PasswordError::Malformed)?;
    let expected = STANDARD_NO_PAD
        .decode(hash)
        .map_err(|_| PasswordError::Malformed)?;

    let actual = derive(password, &salt, iterations);

    // Constant-time comparison
    if expected.len() != actual.len() {
        return Ok(false);
    }
    let diff = expected
        .iter()
        .zip(actual.iter())
        .fold(0u8, |acc, (a, b)| acc | (a ^ b));
    Ok(diff == 0)
}
