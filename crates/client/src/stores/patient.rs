//! Patient store.

use super::EntityStore;
use crate::error::ClientResult;
use clinic_types::Patient;

/// Store owning the patient collection.
pub type PatientStore = EntityStore<Patient>;

impl EntityStore<Patient> {
    /// Delete a patient. Patients are referenced by nothing, so no
    /// integrity check applies.
    pub async fn remove(&mut self, id: &str) -> ClientResult<()> {
        self.remove_unchecked(id).await
    }

    /// Is a patient with this national identifier already registered
    /// locally?
    pub fn national_id_exists(&self, national_id: &str) -> bool {
        self.exists_by_natural_key(national_id)
    }
}
