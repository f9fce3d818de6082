//! Client-side session backend.
//!
//! Nothing is kept server-side: the client token *is* the session,
//! a base64 encoding of `{ "id": ..., "data": ... }` as JSON. `persist`
//! therefore re-encodes and returns a new token every flush, and
//! `delete` has nothing to delete.
//!
//! Tampered or truncated tokens decode as absent rather than erroring,
//! so a bad cookie costs the client its session, not a 500.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::store::{LoadedSession, SessionData, SessionStore, StoreError};

#[derive(Debug, Serialize, Deserialize)]
struct Payload {
    id: String,
    data: SessionData,
}

#[derive(Debug, Default)]
pub struct CookieStore;

impl CookieStore {
    pub fn new() -> Self {
        Self
    }
}

impl SessionStore for CookieStore {
    fn load(&self, token: &str) -> Result<Option<LoadedSession>, StoreError> {
        let Ok(bytes) = URL_SAFE_NO_PAD.decode(token) else {
            return Ok(None);
        };
        let Ok(payload) = serde_json::from_slice::<Payload>(&bytes) else {
            return Ok(None);
        };
        Ok(Some(LoadedSession {
            id: payload.id,
            data: payload.data,
        }))
    }

    fn new_identifier(&self) -> String {
        Uuid::new_v4().to_string()
    }

    fn persist(&self, id: &str, data: &SessionData) -> Result<String, StoreError> {
        let payload = Payload {
            id: id.to_string(),
            data: data.clone(),
        };
        let bytes = serde_json::to_vec(&payload)?;
        Ok(URL_SAFE_NO_PAD.encode(bytes))
    }

    fn delete(&self, _id: &str) -> Result<(), StoreError> {
        // The client holds the only copy; expiring the cookie is the
        // transport layer's job.
        Ok(())
    }
}
