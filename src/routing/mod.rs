//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming RequestHead (method, path, protocol, headers)
//!     → router.rs (ordered table scan)
//!     → pattern.rs (path match, bind captures)
//!     → matcher.rs (evaluate conditions, AND semantics)
//!     → Return: RouteMatch { index, captures, behavior } or None
//!
//! Route table preparation (startup / test setup):
//!     Router::prepare(builder callback)
//!     → RouteSet::route(pattern).method(..).to(..) / .redirect(..)
//!     → Compile patterns, freeze routes
//!     → Atomic table swap (arc-swap)
//! ```
//!
//! # Design Decisions
//! - Routes compiled at prepare time, immutable at runtime
//! - First match wins; insertion order is the only priority
//! - Behavior fixed at construction: Dispatch or Redirect, never both
//! - Deterministic: same input always matches same route

pub mod matcher;
pub mod pattern;
pub mod route;
pub mod router;

use thiserror::Error;

pub use matcher::Condition;
pub use pattern::PathPattern;
pub use route::{Behavior, Route, RouteBuilder};
pub use router::{RouteMatch, RouteSet, Router};

/// Malformed route registered during `prepare`. Fatal to startup and
/// never recovered at runtime.
#[derive(Debug, Error)]
pub enum RouteDefinitionError {
    /// Patterns are absolute paths.
    #[error("route pattern must start with '/': {0:?}")]
    MissingLeadingSlash(String),

    /// A `:` or `*` segment with no name following it.
    #[error("empty capture name in route pattern {0:?}")]
    EmptyCapture(String),

    /// A `*name` segment anywhere but the last position.
    #[error("wildcard segment must be last in route pattern {0:?}")]
    WildcardNotLast(String),

    /// Two captures in one pattern under the same name.
    #[error("duplicate capture {name:?} in route pattern {pattern:?}")]
    DuplicateCapture { name: String, pattern: String },

    /// A redirect target that cannot be sent as a `Location` header.
    #[error("redirect location is not a valid header value: {0:?}")]
    InvalidRedirectLocation(String),
}
