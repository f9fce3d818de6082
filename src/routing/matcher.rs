//! Route condition evaluation.
//!
//! # Responsibilities
//! - Match HTTP method (exact)
//! - Match protocol (http vs https, decided by the transport layer)
//! - Match request headers (name case-insensitive per HTTP, value exact)
//! - Combine conditions with AND semantics
//!
//! # Design Decisions
//! - Conditions only run after the path pattern already matched
//! - An empty condition list always matches (pattern-only route)
//! - No regex, so evaluation cost is bounded by the condition count

use axum::http::Method;

use crate::http::{Protocol, RequestHead};

/// One predicate a matched path must additionally satisfy.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Condition {
    /// Request method equals the given method.
    Method(Method),
    /// Request arrived over the given protocol.
    Protocol(Protocol),
    /// Header is present with exactly the given value.
    Header { name: String, value: String },
}

impl Condition {
    /// Evaluate this condition against a request head.
    pub fn holds(&self, request: &RequestHead) -> bool {
        match self {
            Condition::Method(method) => request.method == *method,
            Condition::Protocol(protocol) => request.protocol == *protocol,
            Condition::Header { name, value } => request
                .headers
                .get(name.as_str())
                .and_then(|v| v.to_str().ok())
                .map(|v| v == value)
                .unwrap_or(false),
        }
    }
}

/// True when every condition holds. Empty slice is a wildcard.
pub fn all_hold(conditions: &[Condition], request: &RequestHead) -> bool {
    conditions.iter().all(|c| c.holds(request))
}
