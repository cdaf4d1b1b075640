//! Local persistence of the credential and the resolved session.
//!
//! The cache mirrors the two logical keys the original browser client kept
//! in local storage: the raw access token and the serialised session. It is
//! deliberately best-effort — a cache that cannot be read or written must
//! never break a sign-in, so storage failures are logged and swallowed
//! rather than propagated.

use clinic_types::Session;
use serde_json::Value;
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;
use std::sync::{Mutex, MutexGuard, PoisonError};

/// Cache key holding the raw access token.
pub const TOKEN_KEY: &str = "accessToken";

/// Cache key holding the serialised session.
pub const SESSION_KEY: &str = "user";

/// Persistence boundary for the session layer.
///
/// `load`/`save`/`clear` over the two logical keys. Injecting this into the
/// gateway and the session manager keeps them storage-agnostic and lets
/// tests substitute an in-memory fake.
pub trait SessionCache: Send + Sync {
    fn load_token(&self) -> Option<String>;
    fn save_token(&self, token: &str);

    /// Load the cached session. A present-but-unreadable entry is treated
    /// as missing.
    fn load_session(&self) -> Option<Session>;
    fn save_session(&self, session: &Session);

    /// Drop only the cached session, keeping the credential.
    fn clear_session(&self);

    /// Drop both keys.
    fn clear(&self);
}

fn encode_session(session: &Session) -> Option<String> {
    match serde_json::to_string(session) {
        Ok(raw) => Some(raw),
        Err(e) => {
            tracing::warn!("failed to serialise session for caching: {e}");
            None
        }
    }
}

fn decode_session(raw: &str) -> Option<Session> {
    match serde_json::from_str(raw) {
        Ok(session) => Some(session),
        Err(e) => {
            tracing::warn!("cached session is unreadable, ignoring it: {e}");
            None
        }
    }
}

// ============================================================================
// In-memory cache
// ============================================================================

/// Volatile cache for embedding and tests.
#[derive(Debug, Default)]
pub struct MemoryCache {
    entries: Mutex<HashMap<String, String>>,
}

impl MemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    fn entries(&self) -> MutexGuard<'_, HashMap<String, String>> {
        self.entries.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl SessionCache for MemoryCache {
    fn load_token(&self) -> Option<String> {
        self.entries().get(TOKEN_KEY).cloned()
    }

    fn save_token(&self, token: &str) {
        self.entries().insert(TOKEN_KEY.to_string(), token.to_string());
    }

    fn load_session(&self) -> Option<Session> {
        self.entries()
            .get(SESSION_KEY)
            .and_then(|raw| decode_session(raw))
    }

    fn save_session(&self, session: &Session) {
        if let Some(raw) = encode_session(session) {
            self.entries().insert(SESSION_KEY.to_string(), raw);
        }
    }

    fn clear_session(&self) {
        self.entries().remove(SESSION_KEY);
    }

    fn clear(&self) {
        self.entries().clear();
    }
}

// ============================================================================
// File-backed cache
// ============================================================================

/// Cache persisted as a single JSON document on disk.
///
/// Used by the CLI so a sign-in survives process restarts, standing in for
/// the browser's local storage.
#[derive(Debug)]
pub struct FileCache {
    path: PathBuf,
}

impl FileCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read_entries(&self) -> serde_json::Map<String, Value> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(_) => return serde_json::Map::new(),
        };
        match serde_json::from_str::<Value>(&raw) {
            Ok(Value::Object(map)) => map,
            _ => {
                tracing::warn!("cache file {} is unreadable, starting empty", self.path.display());
                serde_json::Map::new()
            }
        }
    }

    fn write_entries(&self, entries: &serde_json::Map<String, Value>) {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                if let Err(e) = fs::create_dir_all(parent) {
                    tracing::warn!("failed to create cache directory {}: {e}", parent.display());
                    return;
                }
            }
        }
        let raw = Value::Object(entries.clone()).to_string();
        if let Err(e) = fs::write(&self.path, raw) {
            tracing::warn!("failed to write cache file {}: {e}", self.path.display());
        }
    }

    fn load_string(&self, key: &str) -> Option<String> {
        self.read_entries()
            .get(key)
            .and_then(Value::as_str)
            .map(str::to_string)
    }

    fn store_string(&self, key: &str, value: String) {
        let mut entries = self.read_entries();
        entries.insert(key.to_string(), Value::String(value));
        self.write_entries(&entries);
    }
}

impl SessionCache for FileCache {
    fn load_token(&self) -> Option<String> {
        self.load_string(TOKEN_KEY)
    }

    fn save_token(&self, token: &str) {
        self.store_string(TOKEN_KEY, token.to_string());
    }

    fn load_session(&self) -> Option<Session> {
        self.load_string(SESSION_KEY)
            .and_then(|raw| decode_session(&raw))
    }

    fn save_session(&self, session: &Session) {
        if let Some(raw) = encode_session(session) {
            self.store_string(SESSION_KEY, raw);
        }
    }

    fn clear_session(&self) {
        let mut entries = self.read_entries();
        if entries.remove(SESSION_KEY).is_some() {
            self.write_entries(&entries);
        }
    }

    fn clear(&self) {
        if let Err(e) = fs::remove_file(&self.path) {
            if e.kind() != std::io::ErrorKind::NotFound {
                tracing::warn!("failed to remove cache file {}: {e}", self.path.display());
            }
        }
    }
}
