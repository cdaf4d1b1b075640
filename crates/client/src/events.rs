//! Host-application subscription surface.
//!
//! The client never performs navigation itself. Where the original
//! single-page application would hard-redirect the browser, this layer
//! raises an event and lets the host decide how to react.

/// Destination the host application is asked to present.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum NavTarget {
    /// The login entry point.
    Login,
    /// The authenticated landing area.
    Dashboard,
}

/// Callbacks the hosting application subscribes to.
pub trait ClientEvents: Send + Sync {
    /// The session layer asks the host to present `target`.
    fn navigate(&self, target: NavTarget);

    /// The backend rejected the cached credential; local state was cleared
    /// and the user must sign in again. Fired by the transport gateway,
    /// independent of which operation triggered the rejection.
    fn session_revoked(&self);
}

/// No-op subscriber for headless use and tests.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullEvents;

impl ClientEvents for NullEvents {
    fn navigate(&self, _target: NavTarget) {}

    fn session_revoked(&self) {}
}
