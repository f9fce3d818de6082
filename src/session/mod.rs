//! Session subsystem.
//!
//! # Data Flow
//! ```text
//! RequestHead cookies
//!     → manager.rs (lazy per-store-name session cache)
//!     → store.rs (registry resolves backend by name)
//!     → memory.rs / memcache.rs / cookie.rs (load by client token)
//!     → Session (request-scoped mutable key/value state)
//!
//! End of request:
//!     SessionManager::finish()
//!     → every created session persisted exactly once, creation order
//!     → SessionTicket per session (cookie name + client token)
//! ```
//!
//! # Design Decisions
//! - One Session per (request, store name); several may coexist per
//!   request, independently mutable and independently persisted
//! - Backends are process-wide; sessions are request-scoped and unlocked
//! - `session_store = "none"` disables the default and fails fast

pub mod cookie;
pub mod manager;
pub mod memcache;
pub mod memory;
mod session;
pub mod store;

use thiserror::Error;

pub use manager::{SessionManager, SessionTicket};
pub use session::Session;
pub use store::{LoadedSession, SessionData, SessionStore, StoreError, StoreRegistry};

/// Failure at the session layer, surfaced to the handler (or, uncaught,
/// converted to a 500 at the dispatcher boundary).
#[derive(Debug, Error)]
pub enum SessionError {
    /// A session was requested for a backend name with no configured store.
    #[error("unknown session store {0:?}")]
    UnknownStore(String),

    /// The named backend failed while loading or persisting.
    #[error("session store {store:?} failed")]
    Store {
        store: String,
        #[source]
        source: StoreError,
    },
}
