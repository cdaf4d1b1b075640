//! Client error taxonomy.
//!
//! Every public session/store operation converts its failure into one of
//! these variants, records a human-readable message on its own error field,
//! and returns the error to the caller as well. Nothing here is fatal: all
//! failures are recoverable by retrying the operation or signing in again.

/// Errors surfaced by the clinic client.
#[derive(Debug, thiserror::Error)]
pub enum ClientError {
    /// Malformed or missing required input, e.g. a login response without a
    /// credential or an update payload that is not a JSON object.
    #[error("{0}")]
    Validation(String),

    /// The backend refused the request as unauthenticated. Carries the
    /// server-supplied message when one was present.
    #[error("{0}")]
    Auth(String),

    /// The credential's payload could not be decoded.
    #[error("invalid access token: {0}")]
    Token(String),

    /// Sign-in completed but no role could be resolved for the user.
    #[error("could not resolve a role for the signed-in user")]
    RoleUnresolved,

    /// A client-side referential-integrity check blocked the operation
    /// before any request was sent.
    #[error("{0}")]
    Conflict(String),

    /// Network or server-side failure; the message is passed through
    /// verbatim when the server supplied one.
    #[error("{0}")]
    Transport(String),
}

pub type ClientResult<T> = std::result::Result<T, ClientError>;
