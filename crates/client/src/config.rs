//! Client runtime configuration.
//!
//! Configuration is resolved once at startup and passed into the gateway.
//! The library itself never reads environment variables during request
//! handling; hosting applications resolve their environment in `main` and
//! construct a [`ClientConfig`] from it.

use crate::error::{ClientError, ClientResult};
use std::time::Duration;

/// Base address used when the host application supplies none.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080/api";

/// Fixed per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Connection settings for the transport gateway.
#[derive(Clone, Debug)]
pub struct ClientConfig {
    base_url: String,
    timeout: Duration,
}

impl ClientConfig {
    /// Create a new `ClientConfig`.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Validation`] when `base_url` is not an
    /// absolute HTTP(S) URL.
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> ClientResult<Self> {
        let base_url = base_url.into();
        let parsed = reqwest::Url::parse(&base_url)
            .map_err(|e| ClientError::Validation(format!("invalid base URL {base_url:?}: {e}")))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(ClientError::Validation(format!(
                "unsupported base URL scheme {:?}",
                parsed.scheme()
            )));
        }

        Ok(Self { base_url, timeout })
    }

    /// Create a config with the [`DEFAULT_TIMEOUT`].
    pub fn with_base_url(base_url: impl Into<String>) -> ClientResult<Self> {
        Self::new(base_url, DEFAULT_TIMEOUT)
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_string(),
            timeout: DEFAULT_TIMEOUT,
        }
    }
}
