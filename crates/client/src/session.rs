//! Session manager.
//!
//! Owns the authenticated-user state: sign-in, sign-out, and restoration
//! of a previous sign-in from the local cache. The manager is anonymous
//! until a login or restoration succeeds, and a session is only ever
//! exposed once its role has been resolved.
//!
//! Role resolution order on sign-in:
//!
//! 1. the token payload's `role` claim, normalised;
//! 2. failing that, one identity query (`/auth/me`), same normalisation;
//! 3. failing that, the sign-in is rejected — there is no "signed in with
//!    an unknown role" state.

use crate::api::{AuthApi, RegisterRequest, RegisterResponse, UserInfo};
use crate::cache::SessionCache;
use crate::error::{ClientError, ClientResult};
use crate::events::{ClientEvents, NavTarget};
use crate::gateway::HttpGateway;
use crate::token;
use clinic_types::{Role, Session};
use std::sync::Arc;

/// Authentication state machine and owner of the current [`Session`].
pub struct SessionManager {
    auth: AuthApi,
    cache: Arc<dyn SessionCache>,
    events: Arc<dyn ClientEvents>,
    session: Option<Session>,
    busy: bool,
    error: Option<String>,
}

impl SessionManager {
    pub fn new(
        gateway: Arc<HttpGateway>,
        cache: Arc<dyn SessionCache>,
        events: Arc<dyn ClientEvents>,
    ) -> Self {
        Self {
            auth: AuthApi::new(gateway),
            cache,
            events,
            session: None,
            busy: false,
            error: None,
        }
    }

    /// The signed-in user, or `None` while anonymous.
    pub fn session(&self) -> Option<&Session> {
        self.session.as_ref()
    }

    /// Whether a sign-in or restoration round trip is in flight.
    pub fn busy(&self) -> bool {
        self.busy
    }

    /// Last user-visible failure message, cleared by the next success.
    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    /// Sign in with the given identity and secret.
    ///
    /// On success the credential and the resolved session are persisted,
    /// any prior error is cleared, and the host is asked to present the
    /// authenticated landing area. On failure the manager stays anonymous
    /// and the failure message is recorded on [`error`](Self::error).
    pub async fn login(&mut self, identity: &str, secret: &str) -> ClientResult<Session> {
        self.busy = true;
        self.error = None;
        let result = self.try_login(identity, secret).await;
        self.busy = false;

        match result {
            Ok(session) => {
                self.events.navigate(NavTarget::Dashboard);
                Ok(session)
            }
            Err(err) => Err(self.surface(err)),
        }
    }

    async fn try_login(&mut self, identity: &str, secret: &str) -> ClientResult<Session> {
        // A previous user's cached session must not leak a role into this
        // attempt.
        self.session = None;
        self.cache.clear_session();

        let access_token = self.auth.login(identity, secret).await?;
        let session = self.resolve_session(&access_token, Some(identity)).await?;

        self.cache.save_session(&session);
        self.session = Some(session.clone());
        tracing::info!(identity = %session.identity, role = %session.role, "signed in");

        Ok(session)
    }

    /// Sign out unconditionally.
    ///
    /// Clears the cached credential and session, drops the in-memory
    /// session, and asks the host to present the login entry point.
    pub fn logout(&mut self) {
        self.cache.clear();
        self.session = None;
        self.error = None;
        self.events.navigate(NavTarget::Login);
    }

    /// Restore a previous sign-in from the cache at application start.
    ///
    /// When both the credential and the session are cached, the session is
    /// adopted as-is with no backend contact. When only the credential
    /// survived, the session is re-derived from it exactly as during
    /// login, then persisted. With no cached credential the manager stays
    /// anonymous.
    pub async fn restore_session(&mut self) -> ClientResult<Option<Session>> {
        let Some(access_token) = self.cache.load_token() else {
            // A cached session without its credential is unusable.
            self.cache.clear();
            return Ok(None);
        };

        if let Some(session) = self.cache.load_session() {
            self.session = Some(session.clone());
            return Ok(Some(session));
        }

        self.busy = true;
        let result = self.resolve_session(&access_token, None).await;
        self.busy = false;

        match result {
            Ok(session) => {
                self.cache.save_session(&session);
                self.session = Some(session.clone());
                self.error = None;
                Ok(Some(session))
            }
            Err(err) => Err(self.surface(err)),
        }
    }

    /// Create a new backend account.
    ///
    /// Pass-through to the registration endpoint; neither the session nor
    /// the cache is touched.
    pub async fn register(&mut self, request: &RegisterRequest) -> ClientResult<RegisterResponse> {
        match self.auth.register(request).await {
            Ok(created) => Ok(created),
            Err(err) => Err(self.surface(err)),
        }
    }

    /// Derive a session from a token, consulting `/auth/me` only when the
    /// payload omits the role claim.
    async fn resolve_session(
        &self,
        access_token: &str,
        fallback_identity: Option<&str>,
    ) -> ClientResult<Session> {
        let claims = token::decode_claims(access_token)?;

        let mut queried: Option<UserInfo> = None;
        let role_claim = match claims.role.clone() {
            Some(claim) => claim,
            None => {
                let info = self.auth.me().await?;
                let claim = info.role.clone().ok_or(ClientError::RoleUnresolved)?;
                queried = Some(info);
                claim
            }
        };
        let role = Role::from_claim(&role_claim).map_err(|_| ClientError::RoleUnresolved)?;

        let identity = claims
            .sub
            .or_else(|| queried.as_ref().map(|info| info.email.clone()))
            .or_else(|| fallback_identity.map(str::to_string))
            .ok_or_else(|| {
                ClientError::Validation("token payload carries no subject claim".into())
            })?;
        let display_name = claims
            .name
            .or_else(|| queried.as_ref().and_then(UserInfo::display_name));

        Ok(Session {
            identity,
            display_name,
            role,
        })
    }

    fn surface(&mut self, err: ClientError) -> ClientError {
        self.error = Some(err.to_string());
        err
    }
}
