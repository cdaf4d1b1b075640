//! Domain-entity stores.
//!
//! One store per backend collection, all built on the same generic
//! pattern: the store mirrors its collection from the gateway, applies
//! optimistic local mutation on create/update/delete, and exposes the
//! busy flag and error message the UI renders.
//!
//! Overlapping calls to one store's mutating operations are not
//! serialized; the last response to arrive wins on the local collection.
//! Callers issuing rapid repeated mutations against the same entity may
//! observe out-of-order application.

mod appointment;
mod department;
mod doctor;
mod patient;

pub use appointment::AppointmentStore;
pub use department::DepartmentStore;
pub use doctor::DoctorStore;
pub use patient::PatientStore;

use crate::api::EntityApi;
use crate::error::{ClientError, ClientResult};
use crate::gateway::HttpGateway;
use clinic_types::Entity;
use serde::Serialize;
use std::sync::Arc;

/// Insertion-ordered collection of one entity type, synchronized with the
/// backend through the gateway.
///
/// The store is the single owner of its collection's mutation surface;
/// nothing else rewrites the items.
pub struct EntityStore<E: Entity> {
    api: EntityApi<E>,
    items: Vec<E>,
    busy: bool,
    error: Option<String>,
}

impl<E: Entity> EntityStore<E> {
    pub fn new(gateway: Arc<HttpGateway>) -> Self {
        Self {
            api: EntityApi::new(gateway),
            items: Vec::new(),
            busy: false,
            error: None,
        }
    }

    /// Current local collection, in insertion order.
    pub fn items(&self) -> &[E] {
        &self.items
    }

    /// Whether a round trip for this store is in flight.
    pub fn busy(&self) -> bool {
        self.busy
    }

    /// Last failure message for this store, cleared by the next success.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Pure local lookup; absence is not an error.
    pub fn get_by_id(&self, id: &str) -> Option<&E> {
        self.items.iter().find(|entity| entity.id() == id)
    }

    /// Does any local entity carry this natural key?
    ///
    /// Always `false` for entity types without a natural key.
    pub fn exists_by_natural_key(&self, key: &str) -> bool {
        self.items
            .iter()
            .any(|entity| entity.natural_key() == Some(key))
    }

    /// Replace the local collection with the backend's.
    ///
    /// The busy flag is guaranteed cleared on every exit path.
    pub async fn fetch_all(&mut self) -> ClientResult<()> {
        self.busy = true;
        let result = self.api.list().await;
        self.busy = false;

        match result {
            Ok(items) => {
                self.items = items;
                self.error = None;
                Ok(())
            }
            Err(err) => Err(self.surface(err)),
        }
    }

    /// Create an entity from a draft.
    ///
    /// The backend-assigned representation is appended to the end of the
    /// local collection. On failure the collection is left untouched.
    pub async fn create(&mut self, draft: &E::Draft) -> ClientResult<E> {
        self.busy = true;
        let result = self.api.create(draft).await;
        self.busy = false;

        match result {
            Ok(created) => {
                self.items.push(created.clone());
                self.error = None;
                Ok(created)
            }
            Err(err) => Err(self.surface(err)),
        }
    }

    /// Apply a partial update to one entity.
    ///
    /// The identity field is never caller-writable: an `id` key in
    /// `changes` is dropped before the request is sent. On success the
    /// local entity is replaced wholesale with the backend's returned
    /// representation — the backend is authoritative for the post-update
    /// shape, this is not a local merge.
    pub async fn update<C: Serialize>(&mut self, id: &str, changes: &C) -> ClientResult<E> {
        let mut payload = match serde_json::to_value(changes) {
            Ok(payload) => payload,
            Err(e) => {
                let err = ClientError::Validation(format!("unserialisable update payload: {e}"));
                return Err(self.surface(err));
            }
        };
        let Some(object) = payload.as_object_mut() else {
            let err = ClientError::Validation("update payload must be a JSON object".into());
            return Err(self.surface(err));
        };
        object.remove("id");

        self.busy = true;
        let result = self.api.update(id, &payload).await;
        self.busy = false;

        match result {
            Ok(updated) => {
                if let Some(index) = self.items.iter().position(|entity| entity.id() == id) {
                    self.items[index] = updated.clone();
                } else {
                    tracing::debug!(collection = E::COLLECTION, id, "updated entity not held locally");
                }
                self.error = None;
                Ok(updated)
            }
            Err(err) => Err(self.surface(err)),
        }
    }

    /// Delete by id without any integrity check.
    ///
    /// The typed wrappers decide whether a check applies first.
    pub(crate) async fn remove_unchecked(&mut self, id: &str) -> ClientResult<()> {
        self.busy = true;
        let result = self.api.delete(id).await;
        self.busy = false;

        match result {
            Ok(()) => {
                self.items.retain(|entity| entity.id() != id);
                self.error = None;
                Ok(())
            }
            Err(err) => Err(self.surface(err)),
        }
    }

    pub(crate) fn surface(&mut self, err: ClientError) -> ClientError {
        self.error = Some(err.to_string());
        err
    }
}
