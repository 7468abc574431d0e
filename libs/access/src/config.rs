//! Access-control configuration

use config::{Config, Environment};
use serde::Deserialize;

use crate::error::AccessResult;

/// Default storage key of the persisted identity
pub const DEFAULT_STORAGE_KEY: &str = "chargebyte:user";

/// Access-control configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AccessConfig {
    /// Storage key of the persisted identity
    pub storage_key: String,
    /// Where unauthenticated visitors are sent
    pub login_path: String,
    /// Where signed-in visitors without the right role are sent
    pub unauthorized_path: String,
    /// Lifetime of the persisted identity; `None` keeps it until logout
    #[serde(default)]
    pub session_ttl_seconds: Option<u64>,
}

impl AccessConfig {
    /// Load configuration from defaults and the environment
    ///
    /// # Environment Variables
    /// - `CHARGEBYTE_STORAGE_KEY` (default: "chargebyte:user")
    /// - `CHARGEBYTE_LOGIN_PATH` (default: "/login")
    /// - `CHARGEBYTE_UNAUTHORIZED_PATH` (default: "/unauthorized")
    /// - `CHARGEBYTE_SESSION_TTL_SECONDS` (default: unset; `0` also means no expiry)
    pub fn from_env() -> AccessResult<Self> {
        let settings = Config::builder()
            .set_default("storage_key", DEFAULT_STORAGE_KEY)?
            .set_default("login_path", "/login")?
            .set_default("unauthorized_path", "/unauthorized")?
            .add_source(Environment::with_prefix("CHARGEBYTE").try_parsing(true))
            .build()?;

        let mut config: AccessConfig = settings.try_deserialize()?;
        config.session_ttl_seconds = config.session_ttl_seconds.filter(|ttl| *ttl > 0);

        Ok(config)
    }

    /// Redirect destinations used by the auth context and role gates
    pub fn routes(&self) -> Routes {
        Routes {
            login: self.login_path.clone(),
            unauthorized: self.unauthorized_path.clone(),
        }
    }

    /// Storage key for one client's session
    pub fn storage_key_for(&self, client_id: &str) -> String {
        format!("{}:{}", self.storage_key, client_id)
    }
}

impl Default for AccessConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            login_path: "/login".to_string(),
            unauthorized_path: "/unauthorized".to_string(),
            session_ttl_seconds: None,
        }
    }
}

/// Redirect destinations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Routes {
    pub login: String,
    pub unauthorized: String,
}

impl Default for Routes {
    fn default() -> Self {
        AccessConfig::default().routes()
    }
}
