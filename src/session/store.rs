//! Session store backend interface and registry.
//!
//! # Responsibilities
//! - Define the uniform load/persist/delete contract all backends meet
//! - Hold the named backend instances configured for the process
//! - Resolve a store name to a backend, or fail with an explicit error
//!
//! # Design Decisions
//! - `persist` returns the client-facing token: server-side backends
//!   echo the identifier, the cookie backend re-encodes its payload
//! - Backends are process-wide and shared; per-request state lives in
//!   [`Session`](crate::session::Session), never in the store
//! - The registry is immutable after construction

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use serde_json::Value;
use thiserror::Error;

use super::cookie::CookieStore;
use super::memcache::MemcacheStore;
use super::memory::MemoryStore;
use super::SessionError;
use crate::config::SessionConfig;

/// Key/value mapping held by one session.
pub type SessionData = HashMap<String, Value>;

/// Default backend name when the configuration disables sessions.
pub const STORE_NONE: &str = "none";

/// Failure inside a concrete backend.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Session payload could not be encoded or decoded.
    #[error("session codec error: {0}")]
    Codec(#[from] serde_json::Error),

    /// The backing engine refused or lost the operation.
    #[error("session backend unavailable: {0}")]
    Backend(String),
}

/// A session loaded from a client token.
#[derive(Debug, Clone)]
pub struct LoadedSession {
    /// The session identifier the backend knows this session by.
    pub id: String,
    pub data: SessionData,
}

/// Uniform contract every session backend implements.
///
/// Identifiers are opaque to callers; `load` takes the raw client token
/// (usually a cookie value) and recovers identifier plus data, or reports
/// absence when the token is unknown, expired, or unreadable.
pub trait SessionStore: Send + Sync + fmt::Debug {
    /// Recover a session from a client token. Unknown or invalid tokens
    /// read as absent, never as an error.
    fn load(&self, token: &str) -> Result<Option<LoadedSession>, StoreError>;

    /// Mint a fresh session identifier.
    fn new_identifier(&self) -> String;

    /// Write the session, returning the token to hand back to the client.
    fn persist(&self, id: &str, data: &SessionData) -> Result<String, StoreError>;

    /// Drop the backend's copy of the session, invalidating the identifier.
    fn delete(&self, id: &str) -> Result<(), StoreError>;
}

/// Named backend instances active for this process.
#[derive(Debug)]
pub struct StoreRegistry {
    stores: HashMap<String, Arc<dyn SessionStore>>,
    default_name: Option<String>,
}

impl StoreRegistry {
    /// Build the standard backends and pick the configured default.
    ///
    /// A `session_store` of `"none"` leaves the registry without a
    /// default; `session()` calls then fail fast rather than silently
    /// discarding writes.
    pub fn from_config(config: &SessionConfig) -> Self {
        let mut stores: HashMap<String, Arc<dyn SessionStore>> = HashMap::new();
        stores.insert("memory".to_string(), Arc::new(MemoryStore::new()));
        stores.insert(
            "memcache".to_string(),
            Arc::new(MemcacheStore::new(config.memcache_ttl_secs)),
        );
        stores.insert("cookie".to_string(), Arc::new(CookieStore::new()));

        let default_name = if config.store == STORE_NONE {
            None
        } else {
            Some(config.store.clone())
        };

        Self {
            stores,
            default_name,
        }
    }

    /// Name of the default backend, unless sessions are disabled.
    pub fn default_name(&self) -> Option<&str> {
        self.default_name.as_deref()
    }

    /// Names of every configured backend.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.stores.keys().map(String::as_str)
    }

    /// Resolve a backend by name.
    pub fn get(&self, name: &str) -> Result<Arc<dyn SessionStore>, SessionError> {
        self.stores
            .get(name)
            .cloned()
            .ok_or_else(|| SessionError::UnknownStore(name.to_string()))
    }
}
