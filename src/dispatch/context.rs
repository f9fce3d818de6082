//! Per-request handler context.
//!
//! What an action sees: merged params (query parameters overlaid by
//! path captures, captures winning), the request head, and lazy session
//! access through the attached [`SessionManager`].

use std::collections::HashMap;

use crate::http::RequestHead;
use crate::session::{Session, SessionError, SessionManager};

/// Everything handed to an action for one request.
#[derive(Debug)]
pub struct Context<'a> {
    request: &'a RequestHead,
    params: HashMap<String, String>,
    sessions: SessionManager,
}

impl<'a> Context<'a> {
    pub(super) fn new(
        request: &'a RequestHead,
        captures: HashMap<String, String>,
        sessions: SessionManager,
    ) -> Self {
        let mut params: HashMap<String, String> =
            request.query_params().into_iter().collect();
        // Path captures shadow query parameters of the same name.
        params.extend(captures);
        Self {
            request,
            params,
            sessions,
        }
    }

    pub fn request(&self) -> &RequestHead {
        self.request
    }

    /// One merged parameter by name.
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    /// The full merged parameter mapping.
    pub fn params(&self) -> &HashMap<String, String> {
        &self.params
    }

    /// Session bound to the configured default store.
    pub fn session(&mut self) -> Result<&mut Session, SessionError> {
        self.sessions.session()
    }

    /// Session bound to a specific named store.
    pub fn session_named(&mut self, name: &str) -> Result<&mut Session, SessionError> {
        self.sessions.session_named(name)
    }

    pub(super) fn into_sessions(self) -> SessionManager {
        self.sessions
    }
}
