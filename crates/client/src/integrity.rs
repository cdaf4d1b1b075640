//! Cross-store referential-integrity checks.
//!
//! Pure predicates over the patient collection, consulted before a doctor
//! or department deletion is sent to the backend. This is a client-side
//! safety check only — the backend remains responsible for real
//! enforcement.

use clinic_types::Patient;

/// Does any patient reference the given doctor?
pub fn references_doctor(patients: &[Patient], doctor_id: &str) -> bool {
    patients
        .iter()
        .any(|patient| patient.doctor_id.as_deref() == Some(doctor_id))
}

/// Does any patient reference the given department?
pub fn references_department(patients: &[Patient], department_id: &str) -> bool {
    patients
        .iter()
        .any(|patient| patient.department_id.as_deref() == Some(department_id))
}
