//! Transport gateway.
//!
//! The single outbound HTTP client of the workspace. Two behaviours cut
//! across every request it dispatches:
//!
//! - a cached credential is attached as a bearer authorisation header, and
//! - a response rejecting that credential clears the local cache, raises
//!   [`ClientEvents::session_revoked`], and still fails the calling
//!   operation — callers must not assume the reset alone resolves the
//!   error.
//!
//! The gateway is the only component that reads or writes the raw
//! credential cache key.

use crate::cache::SessionCache;
use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};
use crate::events::ClientEvents;
use reqwest::{RequestBuilder, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// HTTP client over the backend REST surface.
pub struct HttpGateway {
    http: reqwest::Client,
    base_url: String,
    cache: Arc<dyn SessionCache>,
    events: Arc<dyn ClientEvents>,
}

impl HttpGateway {
    /// Build the gateway from resolved configuration.
    ///
    /// The underlying client is constructed once, with the configured
    /// request timeout applied to every round trip.
    pub fn new(
        config: &ClientConfig,
        cache: Arc<dyn SessionCache>,
        events: Arc<dyn ClientEvents>,
    ) -> ClientResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(config.timeout())
            .build()
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        Ok(Self {
            http,
            base_url: config.base_url().trim_end_matches('/').to_string(),
            cache,
            events,
        })
    }

    /// Credential/session cache handle.
    ///
    /// Exposed so the auth endpoint wrappers can persist a freshly issued
    /// token through the gateway rather than holding their own cache.
    pub fn cache(&self) -> &Arc<dyn SessionCache> {
        &self.cache
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    fn authorise(&self, request: RequestBuilder) -> RequestBuilder {
        match self.cache.load_token() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn dispatch(&self, request: RequestBuilder) -> ClientResult<Response> {
        let response = self
            .authorise(request)
            .send()
            .await
            .map_err(|e| ClientError::Transport(e.to_string()))?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            // The credential is no longer accepted. Drop everything local
            // and tell the host; the caller still sees the failure.
            self.cache.clear();
            self.events.session_revoked();
            tracing::warn!("backend rejected the credential; forced a session reset");
            return Err(ClientError::Auth(error_message(response).await));
        }
        if !status.is_success() {
            return Err(ClientError::Transport(error_message(response).await));
        }

        Ok(response)
    }

    pub async fn get_json<T: DeserializeOwned>(&self, path: &str) -> ClientResult<T> {
        let response = self.dispatch(self.http.get(self.endpoint(path))).await?;
        decode_body(response).await
    }

    pub async fn post_json<B, T>(&self, path: &str, body: &B) -> ClientResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.http.post(self.endpoint(path)).json(body);
        let response = self.dispatch(request).await?;
        decode_body(response).await
    }

    pub async fn put_json<B, T>(&self, path: &str, body: &B) -> ClientResult<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.http.put(self.endpoint(path)).json(body);
        let response = self.dispatch(request).await?;
        decode_body(response).await
    }

    pub async fn delete(&self, path: &str) -> ClientResult<()> {
        self.dispatch(self.http.delete(self.endpoint(path)))
            .await
            .map(|_| ())
    }
}

async fn decode_body<T: DeserializeOwned>(response: Response) -> ClientResult<T> {
    response
        .json::<T>()
        .await
        .map_err(|e| ClientError::Transport(format!("invalid response body: {e}")))
}

/// Error payload shape the backend uses for failures.
#[derive(Deserialize)]
struct ErrorBody {
    message: Option<String>,
    error: Option<String>,
}

/// Prefer the server-supplied message; fall back to the status line.
async fn error_message(response: Response) -> String {
    let status = response.status();
    match response.json::<ErrorBody>().await {
        Ok(ErrorBody {
            message: Some(message),
            ..
        }) => message,
        Ok(ErrorBody {
            error: Some(error), ..
        }) => error,
        _ => status.to_string(),
    }
}

#[cfg(test)]
mod gateway_tests {
    use crate::cache::SessionCache;
    use crate::error::ClientError;
    use crate::test_support::{fixture, BackendState};
    use clinic_types::Patient;

    #[tokio::test]
    async fn attaches_the_cached_credential_as_bearer() {
        let fx = fixture(BackendState::new()).await;
        let token = fx.sign_in_token();
        fx.cache.save_token(&token);

        let patients: Vec<Patient> = fx.gateway.get_json("patients").await.expect("list");
        assert!(patients.is_empty());
    }

    #[tokio::test]
    async fn missing_credential_is_rejected_and_propagated() {
        let fx = fixture(BackendState::new()).await;

        let result = fx.gateway.get_json::<Vec<Patient>>("patients").await;
        assert!(matches!(result, Err(ClientError::Auth(_))));
    }

    #[tokio::test]
    async fn rejection_clears_the_cache_and_fires_session_revoked_once() {
        let fx = fixture(BackendState::new()).await;
        let token = fx.sign_in_token();
        fx.cache.save_token(&token);
        fx.backend.lock().unwrap().revoke_all = true;

        let result = fx.gateway.get_json::<Vec<Patient>>("patients").await;
        assert!(matches!(result, Err(ClientError::Auth(_))));
        assert_eq!(fx.cache.load_token(), None);
        assert_eq!(fx.cache.load_session(), None);
        assert_eq!(fx.events.revocations(), 1);
    }

    #[tokio::test]
    async fn server_error_messages_pass_through_verbatim() {
        let fx = fixture(BackendState::new()).await;
        let token = fx.sign_in_token();
        fx.cache.save_token(&token);

        let result = fx.gateway.delete("patients/absent").await;
        match result {
            Err(ClientError::Transport(message)) => assert_eq!(message, "patients entity not found"),
            other => panic!("expected transport failure, got {other:?}"),
        }
    }
}
