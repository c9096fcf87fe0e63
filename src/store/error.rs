//! Store error types

use thiserror::Error;

/// Errors that can occur in the clinic store
#[derive(Error, Debug)]
pub enum StoreError {
    /// SQLite failure
    #[error("Database error: {0}")]
    Sqlite(#[from] rusqlite::Error),

    /// Creating the database directory failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Unique constraint on `users.email`
    #[error("Email already registered")]
    EmailTaken,

    /// Connection mutex was poisoned
    #[error("Lock error: {0}")]
    Lock(String),
}

impl StoreError {
    /// Map a unique-constraint failure to `EmailTaken`, pass everything else through
    pub(crate) fn from_user_write(err: rusqlite::Error) -> Self {
        match &err {
            rusqlite::Error::SqliteFailure(e, _)
                if e.code == rusqlite::ErrorCode::ConstraintViolation =>
            {
                StoreError::EmailTaken
            }
            _ => StoreError::Sqlite(err),
        }
    }
}

/// Result type alias for store operations
pub type StoreResult<T> = Result<T, StoreError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        assert_eq!(StoreError::EmailTaken.to_string(), "Email already registered");
    }

    #[test]
    fn test_non_constraint_passes_through() {
        let err = StoreError::from_user_write(rusqlite::Error::QueryReturnedNoRows);
        assert!(matches!(err, StoreError::Sqlite(_)));
    }
}
