//! # Clinic Client
//!
//! Client-side data layer for the clinic administration backend.
//!
//! This crate owns the session/authentication state machine and the
//! domain-entity stores:
//! - [`HttpGateway`] — the single outbound HTTP client; attaches the
//!   cached bearer credential and forces a session reset when the backend
//!   rejects it
//! - [`SessionManager`] — login, logout, and session restoration with
//!   role resolution
//! - [`stores`] — per-collection stores with optimistic local mutation
//! - [`integrity`] — client-side referential checks guarding doctor and
//!   department deletion
//!
//! **No UI concerns**: navigation and rendering belong to the hosting
//! application, which subscribes through [`ClientEvents`] and renders the
//! observable session/store fields.

pub mod api;
pub mod cache;
pub mod config;
pub mod error;
pub mod events;
pub mod gateway;
pub mod integrity;
pub mod session;
pub mod stores;
pub mod token;

#[cfg(test)]
pub(crate) mod test_support;

pub use api::{AuthApi, EntityApi, RegisterRequest, RegisterResponse, UserInfo};
pub use cache::{FileCache, MemoryCache, SessionCache};
pub use config::{ClientConfig, DEFAULT_BASE_URL, DEFAULT_TIMEOUT};
pub use error::{ClientError, ClientResult};
pub use events::{ClientEvents, NavTarget, NullEvents};
pub use gateway::HttpGateway;
pub use session::SessionManager;
pub use stores::{AppointmentStore, DepartmentStore, DoctorStore, EntityStore, PatientStore};
