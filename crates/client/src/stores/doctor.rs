//! Doctor store.

use super::EntityStore;
use crate::error::{ClientError, ClientResult};
use crate::integrity;
use clinic_types::{Doctor, Patient};

/// Store owning the doctor collection.
pub type DoctorStore = EntityStore<Doctor>;

impl EntityStore<Doctor> {
    /// Delete a doctor, unless a patient still references them.
    ///
    /// The check runs against the caller-supplied patient collection
    /// before any request is sent; a blocked deletion never reaches the
    /// backend.
    pub async fn remove(&mut self, id: &str, patients: &[Patient]) -> ClientResult<()> {
        if integrity::references_doctor(patients, id) {
            let err = ClientError::Conflict(
                "doctor still has assigned patients and cannot be deleted".into(),
            );
            return Err(self.surface(err));
        }
        self.remove_unchecked(id).await
    }

    /// Is a doctor with this license number already registered locally?
    pub fn license_number_exists(&self, license_number: &str) -> bool {
        self.exists_by_natural_key(license_number)
    }
}
