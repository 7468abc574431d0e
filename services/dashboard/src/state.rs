//! Application state shared across handlers

use std::sync::Arc;

use access::{AccessConfig, AuthContext, SessionStore};
use common::cache::SessionBackend;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub backend: SessionBackend,
    pub access: Arc<AccessConfig>,
}

impl AppState {
    pub fn new(backend: SessionBackend, access: AccessConfig) -> Self {
        Self {
            backend,
            access: Arc::new(access),
        }
    }

    /// Session store for one client
    pub fn session_store(&self, client_id: &str) -> SessionStore<SessionBackend> {
        SessionStore::new(self.backend.clone(), self.access.storage_key_for(client_id))
            .with_ttl(self.access.session_ttl_seconds)
    }

    /// Boot an auth context for one client from its persisted session
    pub async fn context(&self, client_id: &str) -> AuthContext<SessionBackend> {
        AuthContext::init(self.session_store(client_id), self.access.routes()).await
    }
}
