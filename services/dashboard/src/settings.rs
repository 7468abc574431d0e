//! Dashboard service settings

use config::{Config, ConfigError, Environment};
use serde::Deserialize;

/// Which backend holds persisted sessions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackendKind {
    Redis,
    Memory,
}

/// Dashboard service configuration
#[derive(Debug, Clone, Deserialize)]
pub struct DashboardConfig {
    pub bind_address: String,
    pub storage_backend: StorageBackendKind,
    pub log_level: String,
}

impl DashboardConfig {
    /// Load configuration from defaults and the environment
    ///
    /// # Environment Variables
    /// - `CHARGEBYTE_BIND_ADDRESS` (default: "0.0.0.0:3000")
    /// - `CHARGEBYTE_STORAGE_BACKEND`: `redis` or `memory` (default: "redis")
    /// - `CHARGEBYTE_LOG_LEVEL` (default: "info")
    pub fn from_env() -> Result<Self, ConfigError> {
        Config::builder()
            .set_default("bind_address", "0.0.0.0:3000")?
            .set_default("storage_backend", "redis")?
            .set_default("log_level", "info")?
            .add_source(Environment::with_prefix("CHARGEBYTE"))
            .build()?
            .try_deserialize()
    }
}
