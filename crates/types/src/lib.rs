//! # Clinic Types
//!
//! Shared domain model for the clinic client workspace.
//!
//! This crate contains the wire-level representations of the entities the
//! backend exposes (patients, doctors, departments, appointments), the
//! resolved [`Session`] of the signed-in user, and the [`Role`] vocabulary.
//!
//! **No I/O concerns**: HTTP, caching, and store logic belong in
//! `clinic-client`.

pub mod appointment;
pub mod department;
pub mod doctor;
pub mod patient;
pub mod role;
pub mod session;

pub use appointment::{Appointment, AppointmentDraft, AppointmentStatus};
pub use department::{Department, DepartmentDraft};
pub use doctor::{Doctor, DoctorDraft};
pub use patient::{Gender, Patient, PatientDraft};
pub use role::{Role, RoleError};
pub use session::Session;

use serde::de::DeserializeOwned;
use serde::Serialize;

/// A backend-managed domain entity that lives in one REST collection.
///
/// Implemented by [`Patient`], [`Doctor`], [`Department`], and
/// [`Appointment`]. The generic store and API plumbing in `clinic-client`
/// is written against this trait.
pub trait Entity: Clone + Serialize + DeserializeOwned + Send + Sync + 'static {
    /// Path segment of the entity's collection on the backend, e.g. `patients`.
    const COLLECTION: &'static str;

    /// Payload accepted by the backend when creating a new entity.
    ///
    /// The id is always backend-assigned, so drafts never carry one.
    type Draft: Serialize + Send + Sync;

    /// Backend-assigned identifier.
    fn id(&self) -> &str;

    /// Domain-specific natural key used for client-side uniqueness checks,
    /// when the entity has one (national id, license number, name).
    fn natural_key(&self) -> Option<&str> {
        None
    }
}
