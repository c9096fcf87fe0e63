//! Page-local working copy of a fetched list
//!
//! A page fetches a list once on mount, then patches rows in place after
//! each successful mutation. A later fetch replaces the whole copy, so the
//! last local write wins only until the next fetch.

use crate::models::{Appointment, AppointmentStatus, DoctorProfile};

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

#[derive(Debug, Clone, PartialEq)]
pub struct LocalList<T> {
    items: Vec<T>,
}

impl<T> Default for LocalList<T> {
    fn default() -> Self {
        Self { items: Vec::new() }
    }
}

impl<T: Keyed> LocalList<T> {
    pub fn new(items: Vec<T>) -> Self {
        Self { items }
    }

    /// Replace the working copy with a fresh fetch
    pub fn reset(&mut self, items: Vec<T>) {
        self.items = items;
    }

    /// Patch the row with `id` in place. Returns `false` when no row matches.
    pub fn apply(&mut self, id: i64, patch: impl FnOnce(&mut T)) -> bool {
        match self.items.iter_mut().find(|item| item.key() == id) {
            Some(item) => {
                patch(item);
                true
            }
            None => false,
        }
    }

    /// Swap in a server copy of a row, matched by id
    pub fn replace(&mut self, item: T) -> bool {
        match self.items.iter_mut().find(|existing| existing.key() == item.key()) {
            Some(existing) => {
                *existing = item;
                true
            }
            None => false,
        }
    }

    pub fn get(&self, id: i64) -> Option<&T> {
        self.items.iter().find(|item| item.key() == id)
    }

    pub fn items(&self) -> &[T] {
        &self.items
    }

    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl LocalList<Appointment> {
    pub fn set_status(&mut self, id: i64, status: AppointmentStatus) -> bool {
        self.apply(id, |appt| appt.status = status)
    }
}
