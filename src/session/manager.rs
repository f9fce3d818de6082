//! Request-scoped session manager.
//!
//! # Responsibilities
//! - Lazily create one [`Session`] per store name on first access
//! - Hand back the cached instance on repeat access
//! - Flush every created session exactly once at end-of-request
//!
//! # Design Decisions
//! - Sessions load from the request cookie named `<prefix>_<store>`;
//!   a missing or unreadable token starts a fresh session
//! - Flush runs in creation order so ticket emission is deterministic
//! - With `session_store = "none"` there is no default: `session()`
//!   fails fast instead of silently discarding writes

use std::collections::HashMap;
use std::sync::Arc;

use super::store::{SessionData, StoreRegistry};
use super::{Session, SessionError};
use crate::http::RequestHead;

/// Tells the transport layer which cookie carries a flushed session.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionTicket {
    pub cookie_name: String,
    pub token: String,
}

/// Owns every session touched by one request.
#[derive(Debug)]
pub struct SessionManager {
    registry: Arc<StoreRegistry>,
    cookie_prefix: String,
    incoming: HashMap<String, String>,
    active: HashMap<String, Session>,
    order: Vec<String>,
}

impl SessionManager {
    /// Bind a manager to one request's cookies. Nothing is loaded yet.
    pub fn new(registry: Arc<StoreRegistry>, cookie_prefix: &str, request: &RequestHead) -> Self {
        let mut incoming = HashMap::new();
        for name in registry.names() {
            let cookie_name = format!("{cookie_prefix}_{name}");
            if let Some(token) = request.cookie(&cookie_name) {
                incoming.insert(name.to_string(), token.to_string());
            }
        }
        Self {
            registry,
            cookie_prefix: cookie_prefix.to_string(),
            incoming,
            active: HashMap::new(),
            order: Vec::new(),
        }
    }

    /// The session for the configured default store.
    pub fn session(&mut self) -> Result<&mut Session, SessionError> {
        let name = self
            .registry
            .default_name()
            .ok_or_else(|| SessionError::UnknownStore(super::store::STORE_NONE.to_string()))?
            .to_string();
        self.session_named(&name)
    }

    /// The session for a specific store. Independent per store name;
    /// repeat calls return the same instance.
    pub fn session_named(&mut self, name: &str) -> Result<&mut Session, SessionError> {
        if !self.active.contains_key(name) {
            let session = self.load(name)?;
            self.active.insert(name.to_string(), session);
            self.order.push(name.to_string());
        }
        Ok(self
            .active
            .get_mut(name)
            .expect("session cached on first access"))
    }

    fn load(&self, name: &str) -> Result<Session, SessionError> {
        let store = self.registry.get(name)?;
        let loaded = match self.incoming.get(name) {
            Some(token) => store.load(token).map_err(|source| SessionError::Store {
                store: name.to_string(),
                source,
            })?,
            None => None,
        };
        let session = match loaded {
            Some(found) => Session::new(name.to_string(), store, found.id, found.data),
            None => {
                let id = store.new_identifier();
                tracing::debug!(store = %name, "Fresh session created");
                Session::new(name.to_string(), store, id, SessionData::new())
            }
        };
        Ok(session)
    }

    /// True when this request never touched any session.
    pub fn is_empty(&self) -> bool {
        self.active.is_empty()
    }

    /// Flush every created session exactly once, in creation order.
    ///
    /// Untouched sessions still flush so identifier allocation reaches
    /// the client. A persist failure surfaces; session state is never
    /// silently dropped.
    pub fn finish(self) -> Result<Vec<SessionTicket>, SessionError> {
        let mut tickets = Vec::with_capacity(self.order.len());
        for name in &self.order {
            let session = &self.active[name];
            let token = session.flush().map_err(|source| SessionError::Store {
                store: name.clone(),
                source,
            })?;
            tickets.push(SessionTicket {
                cookie_name: format!("{}_{}", self.cookie_prefix, name),
                token,
            });
        }
        Ok(tickets)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::SessionConfig;
    use serde_json::json;

    fn registry(default: &str) -> Arc<StoreRegistry> {
        Arc::new(StoreRegistry::from_config(&SessionConfig {
            store: default.to_string(),
            ..SessionConfig::default()
        }))
    }

    fn manager(default: &str) -> SessionManager {
        SessionManager::new(registry(default), "sid", &RequestHead::get("/"))
    }

    #[test]
    fn default_store_shorthand() {
        let mut manager = manager("memory");
        let session = manager.session().unwrap();
        assert_eq!(session.store_name(), "memory");
    }

    #[test]
    fn stores_are_independent_within_one_request() {
        let mut manager = manager("cookie");

        manager
            .session_named("cookie")
            .unwrap()
            .insert("foo", json!("a"));

        let memory = manager.session_named("memory").unwrap();
        assert_eq!(memory.get("foo"), None);

        let cookie = manager.session_named("cookie").unwrap();
        assert_eq!(cookie.get("foo"), Some(&json!("a")));
    }

    #[test]
    fn repeat_access_returns_same_instance() {
        let mut manager = manager("memory");
        let id = manager.session().unwrap().id().to_string();
        manager.session().unwrap().insert("k", json!(1));
        let again = manager.session().unwrap();
        assert_eq!(again.id(), id);
        assert_eq!(again.get("k"), Some(&json!(1)));
    }

    #[test]
    fn none_store_fails_fast() {
        let mut manager = manager("none");
        assert!(matches!(
            manager.session(),
            Err(SessionError::UnknownStore(name)) if name == "none"
        ));
        // Explicitly named stores stay reachable.
        assert!(manager.session_named("memory").is_ok());
    }

    #[test]
    fn unknown_named_store_fails() {
        let mut manager = manager("memory");
        assert!(matches!(
            manager.session_named("redis"),
            Err(SessionError::UnknownStore(_))
        ));
    }

    #[test]
    fn finish_flushes_untouched_sessions() {
        let mut manager = manager("memory");
        let id = manager.session().unwrap().id().to_string();

        let tickets = manager.finish().unwrap();
        assert_eq!(tickets.len(), 1);
        assert_eq!(tickets[0].cookie_name, "sid_memory");
        assert_eq!(tickets[0].token, id);
    }

    #[test]
    fn finish_emits_one_ticket_per_store_in_creation_order() {
        let mut manager = manager("cookie");
        manager.session_named("memory").unwrap();
        manager.session_named("cookie").unwrap().insert("x", json!(1));

        let tickets = manager.finish().unwrap();
        assert_eq!(tickets.len(), 2);
        assert_eq!(tickets[0].cookie_name, "sid_memory");
        assert_eq!(tickets[1].cookie_name, "sid_cookie");
    }

    #[test]
    fn session_round_trips_through_cookie_token() {
        let registry = registry("memory");
        let mut first =
            SessionManager::new(registry.clone(), "sid", &RequestHead::get("/"));
        first.session().unwrap().insert("foo", json!("bar"));
        let tickets = first.finish().unwrap();

        let request =
            RequestHead::get("/").with_cookie(&tickets[0].cookie_name, &tickets[0].token);
        let mut second = SessionManager::new(registry, "sid", &request);
        assert_eq!(second.session().unwrap().get("foo"), Some(&json!("bar")));
    }
}
