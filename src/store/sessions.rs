//! Bearer session rows
//!
//! Tokens are opaque random strings. A token is valid until `expires_at`;
//! expired rows are ignored on lookup and swept by `purge_expired_sessions`.

use chrono::Duration;
use rusqlite::{params, OptionalExtension};

use super::users::get_user_locked;
use super::{Store, StoreResult};
use crate::auth::generate_token;
use crate::models::User;

impl Store {
    /// Create a session for the given user, returning the token.
    pub fn create_session(&self, user_id: i64, ttl: Duration) -> StoreResult<String> {
        let token = generate_token();
        let expires_at = (chrono::Utc::now() + ttl).timestamp_millis();

        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO sessions (token, user_id, expires_at) VALUES (?, ?, ?)",
            params![token, user_id, expires_at],
        )?;
        Ok(token)
    }

    /// Validate a session token and return the associated user.
    pub fn validate_session(&self, token: &str) -> StoreResult<Option<User>> {
        let now = chrono::Utc::now().timestamp_millis();
        let conn = self.conn()?;

        let user_id: Option<i64> = conn
            .query_row(
                "SELECT user_id FROM sessions WHERE token = ? AND expires_at > ?",
                params![token, now],
                |row| row.get(0),
            )
            .optional()?;

        match user_id {
            Some(id) => Ok(get_user_locked(&conn, id)?),
            None => Ok(None),
        }
    }

    /// Delete a session by token.
    pub fn delete_session(&self, token: &str) -> StoreResult<()> {
        let conn = self.conn()?;
        conn.execute("DELETE FROM sessions WHERE token = ?", params![token])?;
        Ok(())
    }

    /// Drop expired sessions, returning how many were removed
    pub fn purge_expired_sessions(&self) -> StoreResult<usize> {
        let now = chrono::Utc::now().timestamp_millis();
        let conn = self.conn()?;
        let removed = conn.execute("DELETE FROM sessions WHERE expires_at <= ?", params![now])?;
        Ok(removed)
    }
}
