//! Appointment store.

use super::EntityStore;
use crate::error::ClientResult;
use clinic_types::Appointment;

/// Store owning the appointment collection.
///
/// Appointments reference patients, doctors, and departments, but nothing
/// references an appointment — deletion needs no integrity check.
pub type AppointmentStore = EntityStore<Appointment>;

impl EntityStore<Appointment> {
    pub async fn remove(&mut self, id: &str) -> ClientResult<()> {
        self.remove_unchecked(id).await
    }
}
