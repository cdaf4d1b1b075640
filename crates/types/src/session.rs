//! Resolved in-memory representation of the signed-in user.

use crate::role::Role;
use serde::{Deserialize, Serialize};

/// Who is currently logged in, and with what role.
///
/// A `Session` only exists once the role has been resolved — there is no
/// representation of a signed-in user with an unknown role.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Session {
    /// Login identity, normally the user's email address.
    pub identity: String,

    /// Human-readable display name, when the backend supplied one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,

    /// Resolved authorisation role.
    pub role: Role,
}
