//! Access-token payload decoding.
//!
//! The backend issues signed three-segment tokens. This layer never checks
//! the signature — that is the backend's job on every request — it only
//! decodes the payload segment to recover the session claims.

use crate::error::{ClientError, ClientResult};
use base64::{engine::general_purpose, Engine as _};
use serde::Deserialize;

/// Claims extracted from a token payload.
///
/// Every field is optional on the wire; the session manager decides which
/// absences are fatal.
#[derive(Clone, Debug, Default, Deserialize)]
pub struct TokenClaims {
    /// Subject — the login identity the token was issued for.
    pub sub: Option<String>,
    /// Display name, when the backend embeds one.
    pub name: Option<String>,
    /// Role claim, possibly `ROLE_`-prefixed.
    pub role: Option<String>,
}

/// Decode the payload segment of a bearer token.
///
/// # Errors
///
/// Returns [`ClientError::Token`] when the token is not a three-segment
/// string, the payload is not valid unpadded base64url, or the decoded
/// payload is not a JSON object.
pub fn decode_claims(token: &str) -> ClientResult<TokenClaims> {
    let mut segments = token.split('.');
    let (Some(_header), Some(payload), Some(_signature), None) = (
        segments.next(),
        segments.next(),
        segments.next(),
        segments.next(),
    ) else {
        return Err(ClientError::Token("not a three-segment token".into()));
    };

    let bytes = general_purpose::URL_SAFE_NO_PAD
        .decode(payload)
        .map_err(|e| ClientError::Token(format!("payload is not base64url: {e}")))?;

    serde_json::from_slice(&bytes)
        .map_err(|e| ClientError::Token(format!("payload is not a claims object: {e}")))
}
