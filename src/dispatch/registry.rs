//! Handler/action registry.
//!
//! # Responsibilities
//! - Map (handler, action) names to callables
//! - Report a missing target as its own error, distinct from a fault
//!   raised inside an action
//!
//! # Design Decisions
//! - An explicit registry populated at setup time, immutable afterwards;
//!   no open-ended reflection to resolve names at dispatch
//! - Actions are plain synchronous functions over a [`Context`]

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use super::context::Context;
use crate::http::Reply;

/// Fault raised by an action body. Caught at the dispatcher boundary,
/// logged, and rendered with detail gated by `exception_details`.
#[derive(Debug, Error)]
#[error("{0}")]
pub struct ActionError(String);

impl ActionError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

impl From<crate::session::SessionError> for ActionError {
    fn from(err: crate::session::SessionError) -> Self {
        Self(err.to_string())
    }
}

/// A dispatch route that points at nothing registered.
#[derive(Debug, Error)]
#[error("route targets unregistered action {target}#{action}")]
pub struct MissingDispatchTarget {
    pub target: String,
    pub action: String,
}

/// A registered action: a synchronous callable over the request context.
pub type ActionFn = Arc<dyn Fn(&mut Context) -> Result<Reply, ActionError> + Send + Sync>;

/// Named actions available to dispatch routes.
#[derive(Default)]
pub struct HandlerRegistry {
    actions: HashMap<(String, String), ActionFn>,
}

impl HandlerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register one action under a handler name. Last registration wins.
    pub fn register<F>(&mut self, handler: &str, action: &str, f: F)
    where
        F: Fn(&mut Context) -> Result<Reply, ActionError> + Send + Sync + 'static,
    {
        self.actions
            .insert((handler.to_string(), action.to_string()), Arc::new(f));
    }

    /// Resolve an action or report the missing target.
    pub fn lookup(&self, target: &str, action: &str) -> Result<ActionFn, MissingDispatchTarget> {
        self.actions
            .get(&(target.to_string(), action.to_string()))
            .cloned()
            .ok_or_else(|| MissingDispatchTarget {
                target: target.to_string(),
                action: action.to_string(),
            })
    }
}

impl fmt::Debug for HandlerRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HandlerRegistry")
            .field("actions", &self.actions.len())
            .finish()
    }
}
