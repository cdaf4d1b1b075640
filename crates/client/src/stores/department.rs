//! Department store.

use super::EntityStore;
use crate::error::{ClientError, ClientResult};
use crate::integrity;
use clinic_types::{Department, Patient};

/// Store owning the department collection.
pub type DepartmentStore = EntityStore<Department>;

impl EntityStore<Department> {
    /// Delete a department, unless a patient still references it.
    ///
    /// Checked client-side before any request is sent.
    pub async fn remove(&mut self, id: &str, patients: &[Patient]) -> ClientResult<()> {
        if integrity::references_department(patients, id) {
            let err = ClientError::Conflict(
                "department still has registered patients and cannot be deleted".into(),
            );
            return Err(self.surface(err));
        }
        self.remove_unchecked(id).await
    }

    /// Is a department with this name already registered locally?
    pub fn name_exists(&self, name: &str) -> bool {
        self.exists_by_natural_key(name)
    }
}
