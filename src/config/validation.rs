//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Check that the session store names a known backend
//! - Validate value ranges and address syntax
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Validation is a pure function: AppConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::fmt;
use std::net::SocketAddr;

use super::schema::AppConfig;

const KNOWN_STORES: &[&str] = &["cookie", "memory", "memcache", "none"];

/// One semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: String,
    pub message: String,
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.message)
    }
}

impl std::error::Error for ValidationError {}

/// Check every semantic constraint, collecting all failures.
pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError {
            field: "listener.bind_address".to_string(),
            message: format!("not a socket address: {:?}", config.listener.bind_address),
        });
    }

    if !KNOWN_STORES.contains(&config.session.store.as_str()) {
        errors.push(ValidationError {
            field: "session.store".to_string(),
            message: format!(
                "unknown backend {:?}; expected one of {KNOWN_STORES:?}",
                config.session.store
            ),
        });
    }

    if config.session.cookie_prefix.is_empty()
        || !config
            .session
            .cookie_prefix
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    {
        errors.push(ValidationError {
            field: "session.cookie_prefix".to_string(),
            message: format!(
                "must be a non-empty cookie-safe token, got {:?}",
                config.session.cookie_prefix
            ),
        });
    }

    if config.session.memcache_ttl_secs == 0 {
        errors.push(ValidationError {
            field: "session.memcache_ttl_secs".to_string(),
            message: "must be greater than zero".to_string(),
        });
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError {
            field: "timeouts.request_secs".to_string(),
            message: "must be greater than zero".to_string(),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
