//! Doctor profile rows

use rusqlite::{params, Connection, OptionalExtension, Row};

use super::{parse_column, Store, StoreResult};
use crate::models::{DoctorProfile, DoctorProfileRequest, DoctorUser};

const DOCTOR_SELECT: &str = "
    SELECT d.id, d.specialization, d.experience, d.fees, d.approved,
           u.id, u.name, u.email, u.role
    FROM doctors d
    JOIN users u ON u.id = d.user_id";

fn doctor_from_row(row: &Row<'_>) -> rusqlite::Result<DoctorProfile> {
    Ok(DoctorProfile {
        id: row.get(0)?,
        specialization: row.get(1)?,
        experience: row.get(2)?,
        fees: row.get(3)?,
        approved: row.get(4)?,
        user: DoctorUser {
            id: row.get(5)?,
            name: row.get(6)?,
            email: row.get(7)?,
            role: parse_column(8, row.get(8)?)?,
        },
    })
}

fn doctor_where(
    conn: &Connection,
    clause: &str,
    id: i64,
) -> rusqlite::Result<Option<DoctorProfile>> {
    conn.query_row(
        &format!("{} WHERE {}", DOCTOR_SELECT, clause),
        params![id],
        doctor_from_row,
    )
    .optional()
}

impl Store {
    /// Create the doctor's profile, or overwrite its fields if one exists.
    /// Approval state is preserved across updates.
    pub fn upsert_doctor_profile(
        &self,
        user_id: i64,
        req: &DoctorProfileRequest,
    ) -> StoreResult<DoctorProfile> {
        let conn = self.conn()?;

        conn.execute(
            "INSERT INTO doctors (user_id, specialization, experience, fees)
             VALUES (?1, ?2, ?3, ?4)
             ON CONFLICT(user_id) DO UPDATE SET
                 specialization = excluded.specialization,
                 experience = excluded.experience,
                 fees = excluded.fees",
            params![user_id, req.specialization, req.experience, req.fees],
        )?;

        let profile = doctor_where(&conn, "d.user_id = ?", user_id)?
            .ok_or(rusqlite::Error::QueryReturnedNoRows)?;
        Ok(profile)
    }

    /// Profile owned by an account, if the doctor created one
    pub fn doctor_by_user(&self, user_id: i64) -> StoreResult<Option<DoctorProfile>> {
        let conn = self.conn()?;
        Ok(doctor_where(&conn, "d.user_id = ?", user_id)?)
    }

    pub fn get_doctor(&self, id: i64) -> StoreResult<Option<DoctorProfile>> {
        let conn = self.conn()?;
        Ok(doctor_where(&conn, "d.id = ?", id)?)
    }

    /// All profiles, or only approved ones
    pub fn list_doctors(&self, approved_only: bool) -> StoreResult<Vec<DoctorProfile>> {
        let conn = self.conn()?;
        let sql = if approved_only {
            format!("{} WHERE d.approved = 1 ORDER BY d.id", DOCTOR_SELECT)
        } else {
            format!("{} ORDER BY d.id", DOCTOR_SELECT)
        };

        let mut stmt = conn.prepare(&sql)?;
        let doctors = stmt
            .query_map([], doctor_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(doctors)
    }

    /// Mark a profile approved. Returns `false` when the id is unknown.
    pub fn approve_doctor(&self, id: i64) -> StoreResult<bool> {
        let conn = self.conn()?;
        let changed = conn.execute("UPDATE doctors SET approved = 1 WHERE id = ?", params![id])?;
        Ok(changed > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;
    use crate::store::test_support;

    fn request(specialization: &str) -> DoctorProfileRequest {
        DoctorProfileRequest {
            specialization: specialization.to_string(),
            experience: 12,
            fees: 750.5,
        }
    }

    #[test]
    fn test_create_profile() {
        let store = test_support::store();
        let user = test_support::user(&store, "Rao", Role::Doctor);

        let profile = store.upsert_doctor_profile(user.id, &request("Pediatrics")).unwrap();
        assert!(!profile.approved);
        assert_eq!(profile.user.id, user.id);
        assert_eq!(profile.user.role, Role::Doctor);
        assert_eq!(profile.fees, 750.5);

        assert_eq!(store.doctor_by_user(user.id).unwrap(), Some(profile));
    }

    #[test]
    fn test_upsert_keeps_id_and_approval() {
        let store = test_support::store();
        let (user, id) = test_support::doctor(&store, "Mehta", true);

        let updated = store.upsert_doctor_profile(user.id, &request("Neurology")).unwrap();
        assert_eq!(updated.id, id);
        assert_eq!(updated.specialization, "Neurology");
        assert!(updated.approved);
    }

    #[test]
    fn test_missing_profile() {
        let store = test_support::store();
        let user = test_support::user(&store, "Nobody", Role::Doctor);
        assert!(store.doctor_by_user(user.id).unwrap().is_none());
        assert!(store.get_doctor(77).unwrap().is_none());
    }

    #[test]
    fn test_list_and_approve() {
        let store = test_support::store();
        let (_, first) = test_support::doctor(&store, "Alpha", false);
        let (_, second) = test_support::doctor(&store, "Beta", false);

        assert_eq!(store.list_doctors(false).unwrap().len(), 2);
        assert!(store.list_doctors(true).unwrap().is_empty());

        assert!(store.approve_doctor(second).unwrap());
        let approved = store.list_doctors(true).unwrap();
        assert_eq!(approved.len(), 1);
        assert_eq!(approved[0].id, second);

        let all = store.list_doctors(false).unwrap();
        assert!(!all.iter().find(|d| d.id == first).unwrap().approved);

        assert!(!store.approve_doctor(999).unwrap());
    }
}
