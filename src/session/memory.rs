//! In-memory session backend.
//!
//! Sessions live in a process-wide `DashMap` and survive until the
//! process exits or the session is deleted. Concurrent persists to the
//! same identifier from different requests are serialized by the map's
//! shard locks.

use dashmap::DashMap;
use uuid::Uuid;

use super::store::{LoadedSession, SessionData, SessionStore, StoreError};

#[derive(Debug, Default)]
pub struct MemoryStore {
    sessions: DashMap<String, SessionData>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemoryStore {
    fn load(&self, token: &str) -> Result<Option<LoadedSession>, StoreError> {
        Ok(self.sessions.get(token).map(|entry| LoadedSession {
            id: token.to_string(),
            data: entry.value().clone(),
        }))
    }

    fn new_identifier(&self) -> String {
        Uuid::new_v4().to_string()
    }

    fn persist(&self, id: &str, data: &SessionData) -> Result<String, StoreError> {
        self.sessions.insert(id.to_string(), data.clone());
        Ok(id.to_string())
    }

    fn delete(&self, id: &str) -> Result<(), StoreError> {
        self.sessions.remove(id);
        Ok(())
    }
}
