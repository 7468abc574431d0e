//! Session persistence for the signed-in identity

use common::cache::KeyValueStore;
use tracing::{info, warn};

use crate::{error::AccessResult, models::Identity};

/// Session store holding at most one serialized [`Identity`] under a fixed key
#[derive(Clone)]
pub struct SessionStore<S> {
    backend: S,
    key: String,
    ttl_seconds: Option<u64>,
}

impl<S: KeyValueStore> SessionStore<S> {
    /// Create a new session store over `backend`, keyed by `key`
    pub fn new(backend: S, key: impl Into<String>) -> Self {
        Self {
            backend,
            key: key.into(),
            ttl_seconds: None,
        }
    }

    /// Expire the persisted record after `ttl_seconds`; `None` keeps it until cleared
    pub fn with_ttl(mut self, ttl_seconds: Option<u64>) -> Self {
        self.ttl_seconds = ttl_seconds;
        self
    }

    /// Storage key of the persisted record
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Read the persisted identity
    ///
    /// Missing, unparseable or unreadable records all come back as `None`:
    /// a broken session means signed out, never signed in.
    pub async fn load(&self) -> Option<Identity> {
        let raw = match self.backend.get(&self.key).await {
            Ok(Some(raw)) => raw,
            Ok(None) => return None,
            Err(e) => {
                warn!("Failed to read session {}: {}", self.key, e);
                return None;
            }
        };

        match serde_json::from_str::<Identity>(&raw) {
            Ok(identity) => Some(identity),
            Err(e) => {
                warn!("Discarding corrupt session {}: {}", self.key, e);
                None
            }
        }
    }

    /// Persist `identity`, replacing any previous record
    pub async fn save(&self, identity: &Identity) -> AccessResult<()> {
        info!("Saving session {} for identity {}", self.key, identity.id);

        let raw = serde_json::to_string(identity)?;
        self.backend.set(&self.key, &raw, self.ttl_seconds).await?;

        Ok(())
    }

    /// Remove the persisted record
    pub async fn clear(&self) -> AccessResult<()> {
        info!("Clearing session {}", self.key);

        self.backend.delete(&self.key).await?;

        Ok(())
    }
}
