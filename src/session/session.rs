//! One request-scoped session bound to one backend.

use std::sync::Arc;

use serde_json::Value;

use super::store::{SessionData, SessionStore, StoreError};

/// Mutable key/value state for one (request, store) pair.
///
/// Created lazily by the [`SessionManager`](super::SessionManager) and
/// flushed exactly once at end-of-request, whether or not it was
/// mutated.
#[derive(Debug)]
pub struct Session {
    store_name: String,
    store: Arc<dyn SessionStore>,
    id: String,
    data: SessionData,
}

impl Session {
    pub(super) fn new(
        store_name: String,
        store: Arc<dyn SessionStore>,
        id: String,
        data: SessionData,
    ) -> Self {
        Self {
            store_name,
            store,
            id,
            data,
        }
    }

    /// Name of the backend this session is bound to.
    pub fn store_name(&self) -> &str {
        &self.store_name
    }

    /// Current session identifier. Changes on [`regenerate`](Self::regenerate).
    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.data.get(key)
    }

    pub fn insert(&mut self, key: &str, value: impl Into<Value>) {
        self.data.insert(key.to_string(), value.into());
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.data.remove(key)
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Issue a new identifier while keeping all data, deleting the
    /// backend's copy under the old identifier. Defeats session fixation.
    pub fn regenerate(&mut self) -> Result<(), StoreError> {
        let old = std::mem::replace(&mut self.id, self.store.new_identifier());
        self.store.delete(&old)?;
        tracing::debug!(store = %self.store_name, "Session identifier regenerated");
        Ok(())
    }

    /// Empty the data mapping and drop the backend's copy. The
    /// identifier itself is kept; the empty session is re-persisted at
    /// flush time.
    pub fn clear(&mut self) -> Result<(), StoreError> {
        self.data.clear();
        self.store.delete(&self.id)
    }

    /// Persist this session, returning the client-facing token.
    pub(super) fn flush(&self) -> Result<String, StoreError> {
        self.store.persist(&self.id, &self.data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::memory::MemoryStore;
    use serde_json::json;

    fn session() -> Session {
        let store = Arc::new(MemoryStore::new());
        let id = store.new_identifier();
        Session::new("memory".to_string(), store, id, SessionData::new())
    }

    #[test]
    fn regenerate_changes_id_and_keeps_data() {
        let mut session = session();
        session.insert("foo", json!("a"));
        let before = session.id().to_string();

        session.regenerate().unwrap();

        assert_ne!(session.id(), before);
        assert_eq!(session.get("foo"), Some(&json!("a")));
    }

    #[test]
    fn regenerate_invalidates_old_identifier() {
        let store = Arc::new(MemoryStore::new());
        let id = store.new_identifier();
        let mut session = Session::new(
            "memory".to_string(),
            store.clone(),
            id.clone(),
            SessionData::new(),
        );
        session.flush().unwrap();
        assert!(store.load(&id).unwrap().is_some());

        session.regenerate().unwrap();
        assert!(store.load(&id).unwrap().is_none());
    }

    #[test]
    fn clear_empties_data() {
        let mut session = session();
        session.insert("foo", json!("a"));
        session.insert("bar", json!(1));

        session.clear().unwrap();

        assert!(session.is_empty());
        assert_eq!(session.get("foo"), None);
        assert_eq!(session.get("bar"), None);
    }
}
