//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files,
//! and every field has a default so minimal configs work.

use serde::{Deserialize, Serialize};

/// Root configuration for the dispatch core and its transport adapter.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct AppConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Session backend selection and tuning.
    pub session: SessionConfig,

    /// Include fault detail in error responses. Leave off outside
    /// development-like environments.
    pub exception_details: bool,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

/// Session backend configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Default backend name: "cookie", "memory", "memcache", or "none"
    /// to disable default-store sessions entirely.
    pub store: String,

    /// Prefix for session cookies; the cookie for store `memory` is
    /// `<prefix>_memory`.
    pub cookie_prefix: String,

    /// Time-to-live for memcache-backend sessions, in seconds.
    pub memcache_ttl_secs: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            store: "cookie".to_string(),
            cookie_prefix: "sid".to_string(),
            memcache_ttl_secs: 1800,
        }
    }
}

/// Timeout configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}
