//! Typed endpoint groups over the transport gateway.
//!
//! Mirrors the backend REST surface: an auth group plus one CRUD group per
//! entity collection. These wrappers translate between typed payloads and
//! the gateway's JSON verbs; they hold no collection state of their own.

use crate::error::{ClientError, ClientResult};
use crate::gateway::HttpGateway;
use clinic_types::{Entity, Role};
use serde::{Deserialize, Serialize};
use std::marker::PhantomData;
use std::sync::Arc;

// ============================================================================
// Auth endpoints
// ============================================================================

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct LoginRequest<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AuthResponse {
    #[serde(default)]
    access_token: String,
}

/// Payload for creating a backend user account.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    pub email: String,
    pub password: String,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,
}

/// Backend representation of a freshly registered account.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterResponse {
    pub id: String,
    pub email: String,
    pub role: String,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

/// Identity-query response, used when the token omits the role claim.
#[derive(Clone, Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserInfo {
    pub email: String,
    #[serde(default)]
    pub role: Option<String>,
    #[serde(default)]
    pub first_name: Option<String>,
    #[serde(default)]
    pub last_name: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
}

impl UserInfo {
    /// Best available display name for this account.
    pub fn display_name(&self) -> Option<String> {
        if let Some(name) = &self.name {
            return Some(name.clone());
        }
        match (&self.first_name, &self.last_name) {
            (Some(first), Some(last)) => Some(format!("{first} {last}")),
            (Some(first), None) => Some(first.clone()),
            (None, Some(last)) => Some(last.clone()),
            (None, None) => None,
        }
    }
}

/// Authentication endpoints.
pub struct AuthApi {
    gateway: Arc<HttpGateway>,
}

impl AuthApi {
    pub fn new(gateway: Arc<HttpGateway>) -> Self {
        Self { gateway }
    }

    /// Exchange credentials for an access token.
    ///
    /// A successful exchange persists the token through the gateway's
    /// cache before returning it.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Validation`] when the response carries no
    /// token, or the auth/transport failure reported by the gateway.
    pub async fn login(&self, identity: &str, secret: &str) -> ClientResult<String> {
        let response: AuthResponse = self
            .gateway
            .post_json(
                "auth/login",
                &LoginRequest {
                    email: identity,
                    password: secret,
                },
            )
            .await?;

        if response.access_token.trim().is_empty() {
            return Err(ClientError::Validation(
                "login response carried no access token".into(),
            ));
        }
        self.gateway.cache().save_token(&response.access_token);

        Ok(response.access_token)
    }

    /// Query the backend for the signed-in user's identity and role.
    pub async fn me(&self) -> ClientResult<UserInfo> {
        self.gateway.get_json("auth/me").await
    }

    /// Create a new backend account. Does not sign the account in.
    pub async fn register(&self, request: &RegisterRequest) -> ClientResult<RegisterResponse> {
        self.gateway.post_json("auth/register", request).await
    }
}

// ============================================================================
// Entity endpoints
// ============================================================================

/// CRUD endpoints for one entity collection.
pub struct EntityApi<E> {
    gateway: Arc<HttpGateway>,
    _entity: PhantomData<fn() -> E>,
}

impl<E: Entity> EntityApi<E> {
    pub fn new(gateway: Arc<HttpGateway>) -> Self {
        Self {
            gateway,
            _entity: PhantomData,
        }
    }

    pub async fn list(&self) -> ClientResult<Vec<E>> {
        self.gateway.get_json(E::COLLECTION).await
    }

    pub async fn get(&self, id: &str) -> ClientResult<E> {
        self.gateway
            .get_json(&format!("{}/{id}", E::COLLECTION))
            .await
    }

    pub async fn create(&self, draft: &E::Draft) -> ClientResult<E> {
        self.gateway.post_json(E::COLLECTION, draft).await
    }

    pub async fn update(&self, id: &str, changes: &serde_json::Value) -> ClientResult<E> {
        self.gateway
            .put_json(&format!("{}/{id}", E::COLLECTION), changes)
            .await
    }

    pub async fn delete(&self, id: &str) -> ClientResult<()> {
        self.gateway
            .delete(&format!("{}/{id}", E::COLLECTION))
            .await
    }
}
