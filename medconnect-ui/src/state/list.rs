//! Optimistic Patching
//!
//! After a successful mutation a page patches its copy of the list in place.
//! The next fetch replaces the whole copy.

use super::models::{Appointment, DoctorProfile};

/// Rows addressable by server id
pub trait Keyed {
    fn key(&self) -> i64;
}

impl Keyed for Appointment {
    fn key(&self) -> i64 {
        self.id
    }
}

impl Keyed for DoctorProfile {
    fn key(&self) -> i64 {
        self.id
    }
}

/// Patch the row with `id`. Returns `false` when no row matches.
pub fn patch_row<T: Keyed>(rows: &mut [T], id: i64, patch: impl FnOnce(&mut T)) -> bool {
    match rows.iter_mut().find(|row| row.key() == id) {
        Some(row) => {
            patch(row);
            true
        }
        None => false,
    }
}

/// Admin doctors table label
pub fn approval_label(doctor: &DoctorProfile) -> &'static str {
    if doctor.approved {
        "Approved"
    } else {
        "Pending"
    }
}
