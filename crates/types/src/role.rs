//! Role vocabulary and claim normalisation.

use serde::{Deserialize, Serialize};

/// Errors that can occur when resolving a role from a claim value.
#[derive(Debug, thiserror::Error)]
pub enum RoleError {
    /// The claim value did not normalise to a known role.
    #[error("unrecognised role claim: {0:?}")]
    Unrecognised(String),
}

/// Authorisation role of a signed-in user.
///
/// The backend encodes roles either as plain names (`"admin"`) or with a
/// `ROLE_` prefix (`"ROLE_DOCTOR"`). Both forms normalise to one of these
/// three variants; anything else is rejected rather than defaulted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Admin,
    Doctor,
    Patient,
}

impl Role {
    /// Resolve a role from a raw claim value.
    ///
    /// The value is trimmed, any leading `ROLE_` prefix is stripped
    /// (case-insensitively), and the remainder is matched upper-cased.
    ///
    /// # Errors
    ///
    /// Returns [`RoleError::Unrecognised`] when the normalised value is not
    /// one of `ADMIN`, `DOCTOR`, or `PATIENT`.
    pub fn from_claim(claim: &str) -> Result<Self, RoleError> {
        let normalised = claim.trim().to_uppercase();
        let normalised = normalised
            .strip_prefix("ROLE_")
            .unwrap_or(normalised.as_str());

        match normalised {
            "ADMIN" => Ok(Role::Admin),
            "DOCTOR" => Ok(Role::Doctor),
            "PATIENT" => Ok(Role::Patient),
            _ => Err(RoleError::Unrecognised(claim.to_string())),
        }
    }

    /// Canonical wire spelling of the role.
    pub fn as_str(self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::Doctor => "DOCTOR",
            Role::Patient => "PATIENT",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
