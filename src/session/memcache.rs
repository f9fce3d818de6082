//! Expiring in-memory session backend.
//!
//! Models a memcache-class engine: every persist stamps an absolute
//! expiry, expired entries read as absent and are reaped atomically on
//! access, with a counter-gated sweep on persist bounding what dead
//! cookies leave behind. The real wire protocol is out of scope; what
//! matters to the core is the TTL semantics and per-identifier write
//! serialization, which the `DashMap` entry locks provide — reaping
//! goes through `remove_if` so an expiry observation and its removal
//! are one atomic step and can never delete a concurrent fresh persist.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant};

use dashmap::DashMap;
use uuid::Uuid;

use super::store::{LoadedSession, SessionData, SessionStore, StoreError};

/// Every this-many persists, sweep the whole map for expired entries.
const SWEEP_EVERY: u64 = 64;

#[derive(Debug, Clone)]
struct Entry {
    data: SessionData,
    expires_at: Instant,
}

#[derive(Debug)]
pub struct MemcacheStore {
    sessions: DashMap<String, Entry>,
    ttl: Duration,
    persist_count: AtomicU64,
}

impl MemcacheStore {
    pub fn new(ttl_secs: u64) -> Self {
        Self {
            sessions: DashMap::new(),
            ttl: Duration::from_secs(ttl_secs),
            persist_count: AtomicU64::new(0),
        }
    }

    /// Drop every expired entry. Runs under the map's shard locks, so a
    /// concurrent persist either lands before the sweep (and is live,
    /// hence kept) or after it.
    fn sweep(&self) {
        let now = Instant::now();
        self.sessions.retain(|_, entry| entry.expires_at > now);
    }
}

impl SessionStore for MemcacheStore {
    fn load(&self, token: &str) -> Result<Option<LoadedSession>, StoreError> {
        // Check-and-remove must be one step: a separate remove could
        // race a fresh persist under the same identifier and delete it.
        self.sessions
            .remove_if(token, |_, entry| entry.expires_at <= Instant::now());

        Ok(self.sessions.get(token).and_then(|entry| {
            (entry.expires_at > Instant::now()).then(|| LoadedSession {
                id: token.to_string(),
                data: entry.data.clone(),
            })
        }))
    }

    fn new_identifier(&self) -> String {
        Uuid::new_v4().to_string()
    }

    fn persist(&self, id: &str, data: &SessionData) -> Result<String, StoreError> {
        if self.persist_count.fetch_add(1, Ordering::Relaxed) % SWEEP_EVERY == 0 {
            self.sweep();
        }
        self.sessions.insert(
            id.to_string(),
            Entry {
                data: data.clone(),
                expires_at: Instant::now() + self.ttl,
            },
        );
        Ok(id.to_string())
    }

    fn delete(&self, id: &str) -> Result<(), StoreError> {
        self.sessions.remove(id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use std::sync::Arc;

    #[test]
    fn live_entry_loads() {
        let store = MemcacheStore::new(60);
        let id = store.new_identifier();
        let mut data = SessionData::new();
        data.insert("k".to_string(), json!("v"));
        store.persist(&id, &data).unwrap();

        let loaded = store.load(&id).unwrap().unwrap();
        assert_eq!(loaded.data.get("k"), Some(&json!("v")));
    }

    #[test]
    fn expired_entry_reads_as_absent() {
        let store = MemcacheStore::new(0);
        let id = store.new_identifier();
        store.persist(&id, &SessionData::new()).unwrap();
        std::thread::sleep(Duration::from_millis(5));
        assert!(store.load(&id).unwrap().is_none());
    }

    #[test]
    fn concurrent_load_never_deletes_a_fresh_persist() {
        let store = Arc::new(MemcacheStore::new(60));
        let mut data = SessionData::new();
        data.insert("k".to_string(), json!("fresh"));

        for _ in 0..200 {
            let id = store.new_identifier();
            // Plant an already-expired entry so the loader wants to reap
            // it while the persist below replaces it.
            store.sessions.insert(
                id.clone(),
                Entry {
                    data: SessionData::new(),
                    expires_at: Instant::now(),
                },
            );

            let loader = {
                let store = Arc::clone(&store);
                let id = id.clone();
                std::thread::spawn(move || {
                    let _ = store.load(&id);
                })
            };
            store.persist(&id, &data).unwrap();
            loader.join().unwrap();

            let survived = store.load(&id).unwrap();
            assert!(
                survived.is_some(),
                "reaping an expired entry deleted a live persist"
            );
            assert_eq!(survived.unwrap().data.get("k"), Some(&json!("fresh")));
        }
    }

    #[test]
    fn persist_sweep_reaps_sessions_whose_cookies_never_return() {
        let store = MemcacheStore::new(0);
        let stale = store.new_identifier();
        store.persist(&stale, &SessionData::new()).unwrap();
        std::thread::sleep(Duration::from_millis(5));

        // Enough persists to cross the sweep interval.
        for _ in 0..SWEEP_EVERY {
            store
                .persist(&store.new_identifier(), &SessionData::new())
                .unwrap();
        }

        assert!(
            !store.sessions.contains_key(&stale),
            "stale entry survived the sweep without ever being loaded"
        );
    }
}
