use anyhow::Result;
use tracing::{info, warn};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

mod client;
mod error;
mod routes;
mod settings;
mod state;

use access::AccessConfig;
use common::cache::{MemoryCache, RedisConfig, RedisPool, SessionBackend};

use crate::{
    settings::{DashboardConfig, StorageBackendKind},
    state::AppState,
};

#[tokio::main]
async fn main() -> Result<()> {
    let dashboard_config = DashboardConfig::from_env()?;
    let access_config = AccessConfig::from_env()?;

    // Initialize logging
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(EnvFilter::new(&dashboard_config.log_level))
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    info!("Starting dashboard service");

    // Initialize the session backend
    let backend = match dashboard_config.storage_backend {
        StorageBackendKind::Redis => {
            let redis_config = RedisConfig::from_env();
            SessionBackend::Redis(RedisPool::new(&redis_config)?)
        }
        StorageBackendKind::Memory => {
            warn!("Sessions are kept in memory and will not survive a restart");
            SessionBackend::Memory(MemoryCache::new())
        }
    };

    // Check backend connectivity
    match backend.health_check().await {
        Ok(true) => info!("Session backend ({}) reachable", backend.kind()),
        Ok(false) => anyhow::bail!("Session backend ({}) is unhealthy", backend.kind()),
        Err(e) => anyhow::bail!("Failed to reach session backend ({}): {}", backend.kind(), e),
    }

    if access_config.session_ttl_seconds.is_none() {
        info!("Sessions persist until logout");
    }

    let app_state = AppState::new(backend, access_config);

    // Start the web server
    let app = routes::create_router(app_state);

    let listener = tokio::net::TcpListener::bind(&dashboard_config.bind_address).await?;
    info!("Dashboard service listening on {}", dashboard_config.bind_address);

    axum::serve(listener, app).await?;

    Ok(())
}
