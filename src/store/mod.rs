//! Clinic Store
//!
//! SQLite-backed persistence for the clinic API: accounts, doctor profiles,
//! appointments and bearer sessions.
//!
//! # Schema
//!
//! ```text
//! users(id, name, email UNIQUE, hashed_password, role, created_at, profile_image, profile_image_type)
//! doctors(id, user_id UNIQUE -> users, specialization, experience, fees, approved)
//! appointments(id, doctor_id -> doctors, patient_id -> users, date, time_slot, status)
//! sessions(token PK, user_id -> users, expires_at)
//! ```
//!
//! Timestamps are stored as milliseconds since epoch, dates as `YYYY-MM-DD`.
//!
//! # Concurrency
//!
//! A single connection sits behind a `std::sync::Mutex` (rusqlite's
//! `Connection` is not `Sync`). Every method takes the lock for one short
//! synchronous unit of work; callers never hold it across an `.await`.

pub mod appointments;
pub mod doctors;
pub mod error;
pub mod sessions;
pub mod users;

pub use appointments::AppointmentFilter;
pub use error::{StoreError, StoreResult};
pub use users::{NewUser, ProfileImage, UserRecord, UserUpdate};

use rusqlite::{Connection, OpenFlags};
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::{Mutex, MutexGuard};

const SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS users (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        email TEXT NOT NULL UNIQUE,
        hashed_password TEXT NOT NULL,
        role TEXT NOT NULL DEFAULT 'patient',
        created_at INTEGER NOT NULL,
        profile_image BLOB,
        profile_image_type TEXT
    );

    CREATE TABLE IF NOT EXISTS doctors (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        user_id INTEGER NOT NULL UNIQUE REFERENCES users(id),
        specialization TEXT NOT NULL,
        experience INTEGER NOT NULL,
        fees REAL NOT NULL,
        approved INTEGER NOT NULL DEFAULT 0
    );

    CREATE TABLE IF NOT EXISTS appointments (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        doctor_id INTEGER NOT NULL REFERENCES doctors(id),
        patient_id INTEGER NOT NULL REFERENCES users(id),
        date TEXT NOT NULL,
        time_slot TEXT NOT NULL,
        status TEXT NOT NULL DEFAULT 'pending'
    );

    CREATE INDEX IF NOT EXISTS idx_appointments_doctor ON appointments(doctor_id);
    CREATE INDEX IF NOT EXISTS idx_appointments_patient ON appointments(patient_id);

    CREATE TABLE IF NOT EXISTS sessions (
        token TEXT PRIMARY KEY,
        user_id INTEGER NOT NULL REFERENCES users(id) ON DELETE CASCADE,
        expires_at INTEGER NOT NULL
    );

    CREATE INDEX IF NOT EXISTS idx_sessions_expiry ON sessions(expires_at);
";

/// Persistent clinic state
pub struct Store {
    conn: Mutex<Connection>,
    path: Option<PathBuf>,
}

impl Store {
    /// Create or open the database at `path`
    pub fn open(path: &Path) -> StoreResult<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                std::fs::create_dir_all(parent)?;
            }
        }

        let conn = Connection::open_with_flags(
            path,
            OpenFlags::SQLITE_OPEN_READ_WRITE
                | OpenFlags::SQLITE_OPEN_CREATE
                | OpenFlags::SQLITE_OPEN_NO_MUTEX,
        )?;

        conn.execute_batch(
            "
            PRAGMA journal_mode = WAL;
            PRAGMA synchronous = NORMAL;
            PRAGMA foreign_keys = ON;
            ",
        )?;

        Self::init(conn, Some(path.to_path_buf()))
    }

    /// Open a throwaway in-memory database
    pub fn open_in_memory() -> StoreResult<Self> {
        let conn = Connection::open_in_memory()?;
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        Self::init(conn, None)
    }

    fn init(conn: Connection, path: Option<PathBuf>) -> StoreResult<Self> {
        conn.execute_batch(SCHEMA)?;
        Ok(Self {
            conn: Mutex::new(conn),
            path,
        })
    }

    /// Database file, `None` for in-memory stores
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Liveness check used by the health route
    pub fn ping(&self) -> StoreResult<()> {
        let conn = self.conn()?;
        conn.query_row("SELECT 1", [], |_| Ok(()))?;
        Ok(())
    }

    pub(crate) fn conn(&self) -> StoreResult<MutexGuard<'_, Connection>> {
        self.conn
            .lock()
            .map_err(|e| StoreError::Lock(e.to_string()))
    }
}

/// Parse a text column into a typed value, surfacing failures as rusqlite
/// conversion errors
pub(crate) fn parse_column<T>(idx: usize, raw: String) -> rusqlite::Result<T>
where
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    raw.parse::<T>().map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

pub(crate) fn millis_to_datetime(
    idx: usize,
    millis: i64,
) -> rusqlite::Result<chrono::DateTime<chrono::Utc>> {
    chrono::DateTime::from_timestamp_millis(millis).ok_or_else(|| {
        rusqlite::Error::IntegralValueOutOfRange(idx, millis)
    })
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::models::{DoctorProfileRequest, Role, User};

    pub fn store() -> Store {
        Store::open_in_memory().unwrap()
    }

    pub fn user(store: &Store, name: &str, role: Role) -> User {
        store
            .create_user(NewUser {
                name: name.to_string(),
                email: format!("{}@clinic.test", name.to_lowercase()),
                password_hash: "pbkdf2-sha256$1$AA$AA".to_string(),
                role,
            })
            .unwrap()
    }

    /// A doctor account with a profile, approved or not
    pub fn doctor(store: &Store, name: &str, approved: bool) -> (User, i64) {
        let user = user(store, name, Role::Doctor);
        let profile = store
            .upsert_doctor_profile(
                user.id,
                &DoctorProfileRequest {
                    specialization: "Cardiology".to_string(),
                    experience: 8,
                    fees: 500.0,
                },
            )
            .unwrap();
        if approved {
            assert!(store.approve_doctor(profile.id).unwrap());
        }
        (user, profile.id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_open_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("clinic.db");
        let store = Store::open(&path).unwrap();
        assert!(path.exists());
        assert_eq!(store.path(), Some(path.as_path()));
        store.ping().unwrap();
    }

    #[test]
    fn test_reopen_is_idempotent() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("clinic.db");
        drop(Store::open(&path).unwrap());
        let store = Store::open(&path).unwrap();
        store.ping().unwrap();
    }

    #[test]
    fn test_in_memory() {
        let store = Store::open_in_memory().unwrap();
        assert!(store.path().is_none());
        store.ping().unwrap();
    }
}
