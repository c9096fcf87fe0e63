//! Appointment rows

use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};

use super::{parse_column, Store, StoreResult};
use crate::models::{
    Appointment, AppointmentDoctor, AppointmentDoctorUser, AppointmentPatient, AppointmentStatus,
    BookingRequest,
};

/// Which appointments a listing should return
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppointmentFilter {
    All,
    /// By doctor profile id
    Doctor(i64),
    /// By patient account id
    Patient(i64),
}

const APPOINTMENT_SELECT: &str = "
    SELECT a.id, a.doctor_id, a.patient_id, a.date, a.time_slot, a.status,
           du.name, p.name
    FROM appointments a
    JOIN doctors d ON d.id = a.doctor_id
    JOIN users du ON du.id = d.user_id
    JOIN users p ON p.id = a.patient_id";

fn appointment_from_row(row: &Row<'_>) -> rusqlite::Result<Appointment> {
    let doctor_id: i64 = row.get(1)?;
    let patient_id: i64 = row.get(2)?;
    Ok(Appointment {
        id: row.get(0)?,
        doctor_id,
        patient_id,
        date: parse_column(3, row.get(3)?)?,
        time_slot: row.get(4)?,
        status: parse_column(5, row.get(5)?)?,
        doctor: AppointmentDoctor {
            id: doctor_id,
            user: AppointmentDoctorUser { name: row.get(6)? },
        },
        patient: AppointmentPatient {
            id: patient_id,
            name: row.get(7)?,
        },
    })
}

fn get_appointment_locked(conn: &Connection, id: i64) -> rusqlite::Result<Option<Appointment>> {
    conn.query_row(
        &format!("{} WHERE a.id = ?", APPOINTMENT_SELECT),
        params![id],
        appointment_from_row,
    )
    .optional()
}

impl Store {
    /// Insert a pending appointment for `patient_id`
    pub fn create_appointment(
        &self,
        patient_id: i64,
        req: &BookingRequest,
    ) -> StoreResult<Appointment> {
        let conn = self.conn()?;
        conn.execute(
            "INSERT INTO appointments (doctor_id, patient_id, date, time_slot, status)
             VALUES (?, ?, ?, ?, ?)",
            params![
                req.doctor_id,
                patient_id,
                req.date.format("%Y-%m-%d").to_string(),
                req.time_slot,
                AppointmentStatus::Pending.as_str()
            ],
        )?;

        let id = conn.last_insert_rowid();
        let appointment =
            get_appointment_locked(&conn, id)?.ok_or(rusqlite::Error::QueryReturnedNoRows)?;
        Ok(appointment)
    }

    pub fn get_appointment(&self, id: i64) -> StoreResult<Option<Appointment>> {
        let conn = self.conn()?;
        Ok(get_appointment_locked(&conn, id)?)
    }

    /// Appointments ordered by date, then booking order
    pub fn list_appointments(&self, filter: AppointmentFilter) -> StoreResult<Vec<Appointment>> {
        let conn = self.conn()?;

        let (clause, args) = match filter {
            AppointmentFilter::All => ("", vec![]),
            AppointmentFilter::Doctor(id) => ("WHERE a.doctor_id = ?", vec![id]),
            AppointmentFilter::Patient(id) => ("WHERE a.patient_id = ?", vec![id]),
        };

        let mut stmt = conn.prepare(&format!(
            "{} {} ORDER BY a.date, a.id",
            APPOINTMENT_SELECT, clause
        ))?;
        let appointments = stmt
            .query_map(params_from_iter(args), appointment_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(appointments)
    }

    /// Move the status from `from` to `to` in one statement.
    ///
    /// Returns `false` when the id is unknown or the row no longer holds
    /// `from`. Transition legality is checked by the caller.
    pub fn set_appointment_status(
        &self,
        id: i64,
        from: AppointmentStatus,
        to: AppointmentStatus,
    ) -> StoreResult<bool> {
        let conn = self.conn()?;
        let changed = conn.execute(
            "UPDATE appointments SET status = ?1 WHERE id = ?2 AND status = ?3",
            params![to.as_str(), id, from.as_str()],
        )?;
        Ok(changed > 0)
    }
}
