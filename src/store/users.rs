//! Account rows

use rusqlite::{params, Connection, OptionalExtension, Row};

use super::{millis_to_datetime, parse_column, Store, StoreError, StoreResult};
use crate::models::{Role, User};

/// Insert payload for a new account
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
    pub role: Role,
}

/// An account together with its password hash (never serialized)
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub user: User,
    pub password_hash: String,
}

/// Stored avatar bytes and their content type
#[derive(Debug, Clone, PartialEq)]
pub struct ProfileImage {
    pub bytes: Vec<u8>,
    pub content_type: String,
}

/// Partial account update; `None` fields are left untouched
#[derive(Debug, Clone, Default)]
pub struct UserUpdate {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password_hash: Option<String>,
    pub image: Option<ProfileImage>,
}

/// Server-relative path under which a user's avatar is served
pub fn profile_image_path(user_id: i64) -> String {
    format!("auth/profile-image/{}", user_id)
}

const USER_COLUMNS: &str =
    "id, name, email, role, created_at, profile_image IS NOT NULL";

fn user_from_row(row: &Row<'_>) -> rusqlite::Result<User> {
    let id: i64 = row.get(0)?;
    let has_image: bool = row.get(5)?;
    Ok(User {
        id,
        name: row.get(1)?,
        email: row.get(2)?,
        role: parse_column(3, row.get(3)?)?,
        created_at: millis_to_datetime(4, row.get(4)?)?,
        profile_image: has_image.then(|| profile_image_path(id)),
    })
}

pub(crate) fn get_user_locked(conn: &Connection, id: i64) -> rusqlite::Result<Option<User>> {
    conn.query_row(
        &format!("SELECT {} FROM users WHERE id = ?", USER_COLUMNS),
        params![id],
        user_from_row,
    )
    .optional()
}

impl Store {
    /// Insert an account. Fails with `EmailTaken` on a duplicate email.
    pub fn create_user(&self, new: NewUser) -> StoreResult<User> {
        let conn = self.conn()?;
        let now = chrono::Utc::now().timestamp_millis();

        conn.execute(
            "INSERT INTO users (name, email, hashed_password, role, created_at)
             VALUES (?, ?, ?, ?, ?)",
            params![new.name, new.email, new.password_hash, new.role.as_str(), now],
        )
        .map_err(StoreError::from_user_write)?;

        let id = conn.last_insert_rowid();
        get_user_locked(&conn, id)?.ok_or(StoreError::Sqlite(rusqlite::Error::QueryReturnedNoRows))
    }

    pub fn get_user(&self, id: i64) -> StoreResult<Option<User>> {
        let conn = self.conn()?;
        Ok(get_user_locked(&conn, id)?)
    }

    /// Look up an account by email, including its password hash
    pub fn find_user_by_email(&self, email: &str) -> StoreResult<Option<UserRecord>> {
        let conn = self.conn()?;
        let record = conn
            .query_row(
                &format!(
                    "SELECT {}, hashed_password FROM users WHERE email = ?",
                    USER_COLUMNS
                ),
                params![email],
                |row| {
                    Ok(UserRecord {
                        user: user_from_row(row)?,
                        password_hash: row.get(6)?,
                    })
                },
            )
            .optional()?;
        Ok(record)
    }

    /// Apply a partial update in one transaction. Returns `None` for an unknown id.
    pub fn update_user(&self, id: i64, update: UserUpdate) -> StoreResult<Option<User>> {
        let mut conn = self.conn()?;
        let tx = conn.transaction()?;

        if get_user_locked(&tx, id)?.is_none() {
            return Ok(None);
        }

        if let Some(name) = &update.name {
            tx.execute("UPDATE users SET name = ? WHERE id = ?", params![name, id])?;
        }
        if let Some(email) = &update.email {
            tx.execute("UPDATE users SET email = ? WHERE id = ?", params![email, id])
                .map_err(StoreError::from_user_write)?;
        }
        if let Some(hash) = &update.password_hash {
            tx.execute(
                "UPDATE users SET hashed_password = ? WHERE id = ?",
                params![hash, id],
            )?;
        }
        if let Some(image) = &update.image {
            tx.execute(
                "UPDATE users SET profile_image = ?, profile_image_type = ? WHERE id = ?",
                params![image.bytes, image.content_type, id],
            )?;
        }

        let user = get_user_locked(&tx, id)?;
        tx.commit()?;
        Ok(user)
    }

    /// Raw avatar for `GET /auth/profile-image/{id}`
    pub fn profile_image(&self, id: i64) -> StoreResult<Option<ProfileImage>> {
        let conn = self.conn()?;
        let image = conn
            .query_row(
                "SELECT profile_image, profile_image_type FROM users
                 WHERE id = ? AND profile_image IS NOT NULL",
                params![id],
                |row| {
                    let content_type: Option<String> = row.get(1)?;
                    Ok(ProfileImage {
                        bytes: row.get(0)?,
                        content_type: content_type
                            .unwrap_or_else(|| "application/octet-stream".to_string()),
                    })
                },
            )
            .optional()?;
        Ok(image)
    }

    /// Create the account unless the email already exists. Returns the
    /// account and whether it was created.
    pub fn ensure_user(&self, new: NewUser) -> StoreResult<(User, bool)> {
        if let Some(existing) = self.find_user_by_email(&new.email)? {
            return Ok((existing.user, false));
        }
        Ok((self.create_user(new)?, true))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::test_support;

    fn new_user(email: &str) -> NewUser {
        NewUser {
            name: "Asha".to_string(),
            email: email.to_string(),
            password_hash: "hash".to_string(),
            role: Role::Patient,
        }
    }

    #[test]
    fn test_create_and_get() {
        let store = test_support::store();
        let user = store.create_user(new_user("asha@clinic.test")).unwrap();
        assert_eq!(user.role, Role::Patient);
        assert!(user.profile_image.is_none());

        let fetched = store.get_user(user.id).unwrap().unwrap();
        assert_eq!(fetched, user);
        assert!(store.get_user(999).unwrap().is_none());
    }

    #[test]
    fn test_duplicate_email() {
        let store = test_support::store();
        store.create_user(new_user("dup@clinic.test")).unwrap();
        let err = store.create_user(new_user("dup@clinic.test")).unwrap_err();
        assert!(matches!(err, StoreError::EmailTaken));
    }

    #[test]
    fn test_find_by_email_carries_hash() {
        let store = test_support::store();
        store.create_user(new_user("find@clinic.test")).unwrap();
        let record = store.find_user_by_email("find@clinic.test").unwrap().unwrap();
        assert_eq!(record.password_hash, "hash");
        assert!(store.find_user_by_email("nobody@clinic.test").unwrap().is_none());
    }

    #[test]
    fn test_partial_update() {
        let store = test_support::store();
        let user = store.create_user(new_user("old@clinic.test")).unwrap();

        let updated = store
            .update_user(
                user.id,
                UserUpdate {
                    name: Some("Asha K".to_string()),
                    image: Some(ProfileImage {
                        bytes: vec![0x89, b'P', b'N', b'G'],
                        content_type: "image/png".to_string(),
                    }),
                    ..Default::default()
                },
            )
            .unwrap()
            .unwrap();

        assert_eq!(updated.name, "Asha K");
        assert_eq!(updated.email, "old@clinic.test");
        assert_eq!(
            updated.profile_image.as_deref(),
            Some(profile_image_path(user.id).as_str())
        );

        let image = store.profile_image(user.id).unwrap().unwrap();
        assert_eq!(image.content_type, "image/png");
        assert_eq!(image.bytes.len(), 4);
    }

    #[test]
    fn test_update_email_conflict_rolls_back() {
        let store = test_support::store();
        store.create_user(new_user("taken@clinic.test")).unwrap();
        let user = store.create_user(new_user("mine@clinic.test")).unwrap();

        let err = store
            .update_user(
                user.id,
                UserUpdate {
                    name: Some("Renamed".to_string()),
                    email: Some("taken@clinic.test".to_string()),
                    ..Default::default()
                },
            )
            .unwrap_err();
        assert!(matches!(err, StoreError::EmailTaken));

        let unchanged = store.get_user(user.id).unwrap().unwrap();
        assert_eq!(unchanged.name, "Asha");
    }

    #[test]
    fn test_update_unknown_user() {
        let store = test_support::store();
        assert!(store.update_user(42, UserUpdate::default()).unwrap().is_none());
    }

    #[test]
    fn test_ensure_user() {
        let store = test_support::store();
        let (first, created) = store.ensure_user(new_user("root@clinic.test")).unwrap();
        assert!(created);
        let (second, created) = store.ensure_user(new_user("root@clinic.test")).unwrap();
        assert!(!created);
        assert_eq!(first.id, second.id);
    }
}
