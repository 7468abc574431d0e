//! Key/value backends for the Chargebyte dashboard
//!
//! This module provides the storage seam used to persist sessions: a Redis
//! connection pool for deployed services, an in-process map for tests and
//! local runs, and [`SessionBackend`] to pick between them at startup.

use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use redis::{AsyncCommands, Client};
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::error::{CacheError, CacheResult};

/// Minimal string key/value operations with optional expiry
///
/// A TTL of `Some(0)` means no expiry, the same as `None`.
pub trait KeyValueStore: Send + Sync {
    /// Set a key-value pair, overwriting any previous value
    fn set(
        &self,
        key: &str,
        value: &str,
        ttl_seconds: Option<u64>,
    ) -> impl Future<Output = CacheResult<()>> + Send;

    /// Get a value by key
    fn get(&self, key: &str) -> impl Future<Output = CacheResult<Option<String>>> + Send;

    /// Delete a key. Deleting a missing key is not an error.
    fn delete(&self, key: &str) -> impl Future<Output = CacheResult<()>> + Send;
}

/// Configuration for Redis connection
#[derive(Debug, Clone)]
pub struct RedisConfig {
    /// Redis connection URL (e.g., "redis://localhost:6379")
    pub url: String,
}

impl RedisConfig {
    /// Create a new RedisConfig from environment variables
    ///
    /// # Environment Variables
    /// - `REDIS_URL`: Redis connection URL (default: "redis://localhost:6379")
    pub fn from_env() -> Self {
        let url =
            std::env::var("REDIS_URL").unwrap_or_else(|_| "redis://localhost:6379".to_string());

        RedisConfig { url }
    }
}

/// Redis client handing out multiplexed connections
///
/// A multiplexed connection pipelines every command over one socket, so
/// there is no pool size to tune.
#[derive(Clone)]
pub struct RedisPool {
    client: Client,
}

impl RedisPool {
    /// Initialize a new Redis connection pool
    ///
    /// No connection is opened until the first command runs.
    pub fn new(config: &RedisConfig) -> CacheResult<Self> {
        let client = Client::open(config.url.clone()).map_err(|e| {
            CacheError::Configuration(format!("Invalid Redis URL {}: {}", config.url, e))
        })?;
        info!("Redis client initialized with URL: {}", config.url);
        Ok(RedisPool { client })
    }

    /// Get a connection from the pool
    async fn get_connection(&self) -> CacheResult<redis::aio::MultiplexedConnection> {
        self.client
            .get_multiplexed_async_connection()
            .await
            .map_err(CacheError::Connection)
    }

    /// Check if Redis is reachable
    pub async fn health_check(&self) -> CacheResult<bool> {
        let mut conn = self.get_connection().await?;
        let pong: String = redis::cmd("PING")
            .query_async(&mut conn)
            .await
            .map_err(CacheError::Command)?;
        Ok(pong == "PONG")
    }
}

impl KeyValueStore for RedisPool {
    async fn set(&self, key: &str, value: &str, ttl_seconds: Option<u64>) -> CacheResult<()> {
        let mut conn = self.get_connection().await?;

        if let Some(ttl) = effective_ttl(ttl_seconds) {
            let _: () = conn
                .set_ex(key, value, ttl)
                .await
                .map_err(CacheError::Command)?;
        } else {
            let _: () = conn.set(key, value).await.map_err(CacheError::Command)?;
        }

        Ok(())
    }

    async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        let mut conn = self.get_connection().await?;
        let value: Option<String> = conn.get(key).await.map_err(CacheError::Command)?;
        Ok(value)
    }

    async fn delete(&self, key: &str) -> CacheResult<()> {
        let mut conn = self.get_connection().await?;
        let _: u64 = conn.del(key).await.map_err(CacheError::Command)?;
        Ok(())
    }
}

/// TTL actually applied: zero is treated as no expiry
fn effective_ttl(ttl_seconds: Option<u64>) -> Option<u64> {
    ttl_seconds.filter(|ttl| *ttl > 0)
}

#[derive(Debug, Clone)]
struct MemoryEntry {
    value: String,
    expires: Option<Instant>,
}

/// In-process key/value store
///
/// Clones share the same underlying map. Expired entries are dropped when
/// read and swept from the whole map on every write.
#[derive(Debug, Clone, Default)]
pub struct MemoryCache {
    entries: Arc<Mutex<HashMap<String, MemoryEntry>>>,
}

impl MemoryCache {
    /// Create an empty in-process store
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of live entries
    pub async fn len(&self) -> usize {
        let now = Instant::now();
        let entries = self.entries.lock().await;
        entries
            .values()
            .filter(|entry| entry.expires.is_none_or(|at| at > now))
            .count()
    }

    /// Whether the store holds no live entries
    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    async fn insert(&self, key: &str, value: &str, expires: Option<Instant>) {
        let now = Instant::now();
        let mut entries = self.entries.lock().await;

        let before = entries.len();
        entries.retain(|_, entry| entry.expires.is_none_or(|at| at > now));
        let swept = before - entries.len();
        if swept > 0 {
            debug!("Swept {} expired keys", swept);
        }

        entries.insert(
            key.to_string(),
            MemoryEntry {
                value: value.to_string(),
                expires,
            },
        );
    }
}

impl KeyValueStore for MemoryCache {
    async fn set(&self, key: &str, value: &str, ttl_seconds: Option<u64>) -> CacheResult<()> {
        let expires =
            effective_ttl(ttl_seconds).map(|ttl| Instant::now() + Duration::from_secs(ttl));
        self.insert(key, value, expires).await;
        Ok(())
    }

    async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        let mut entries = self.entries.lock().await;

        let expired = match entries.get(key) {
            Some(entry) => entry.expires.is_some_and(|at| Instant::now() >= at),
            None => return Ok(None),
        };

        if expired {
            debug!("Dropping expired key {}", key);
            entries.remove(key);
            return Ok(None);
        }

        Ok(entries.get(key).map(|entry| entry.value.clone()))
    }

    async fn delete(&self, key: &str) -> CacheResult<()> {
        let mut entries = self.entries.lock().await;
        entries.remove(key);
        Ok(())
    }
}

/// Backend selected at startup
#[derive(Clone)]
pub enum SessionBackend {
    Redis(RedisPool),
    Memory(MemoryCache),
}

impl SessionBackend {
    /// Check if the backend is reachable
    pub async fn health_check(&self) -> CacheResult<bool> {
        match self {
            SessionBackend::Redis(pool) => pool.health_check().await,
            SessionBackend::Memory(_) => Ok(true),
        }
    }

    /// Short name used in logs and health output
    pub fn kind(&self) -> &'static str {
        match self {
            SessionBackend::Redis(_) => "redis",
            SessionBackend::Memory(_) => "memory",
        }
    }
}

impl KeyValueStore for SessionBackend {
    async fn set(&self, key: &str, value: &str, ttl_seconds: Option<u64>) -> CacheResult<()> {
        match self {
            SessionBackend::Redis(pool) => pool.set(key, value, ttl_seconds).await,
            SessionBackend::Memory(cache) => cache.set(key, value, ttl_seconds).await,
        }
    }

    async fn get(&self, key: &str) -> CacheResult<Option<String>> {
        match self {
            SessionBackend::Redis(pool) => pool.get(key).await,
            SessionBackend::Memory(cache) => cache.get(key).await,
        }
    }

    async fn delete(&self, key: &str) -> CacheResult<()> {
        match self {
            SessionBackend::Redis(pool) => pool.delete(key).await,
            SessionBackend::Memory(cache) => cache.delete(key).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_memory_set_get_delete() -> CacheResult<()> {
        let cache = MemoryCache::new();

        let key = "test_key";
        let value = "test_value";
        cache.set(key, value, None).await?;

        let retrieved = cache.get(key).await?;
        assert_eq!(retrieved, Some(value.to_string()));

        cache.delete(key).await?;
        let retrieved = cache.get(key).await?;
        assert_eq!(retrieved, None);

        Ok(())
    }

    #[tokio::test]
    async fn test_memory_delete_missing_key() -> CacheResult<()> {
        let cache = MemoryCache::new();
        cache.delete("never_set").await?;
        assert!(cache.is_empty().await);
        Ok(())
    }

    fn already_expired() -> Option<Instant> {
        Some(
            Instant::now()
                .checked_sub(Duration::from_secs(1))
                .unwrap_or_else(Instant::now),
        )
    }

    #[test]
    fn test_effective_ttl_treats_zero_as_none() {
        assert_eq!(effective_ttl(None), None);
        assert_eq!(effective_ttl(Some(0)), None);
        assert_eq!(effective_ttl(Some(30)), Some(30));
    }

    #[tokio::test]
    async fn test_memory_zero_ttl_never_expires() -> CacheResult<()> {
        let cache = MemoryCache::new();
        cache.set("kept", "value", Some(0)).await?;

        assert_eq!(cache.get("kept").await?, Some("value".to_string()));
        assert_eq!(cache.len().await, 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_memory_expired_entry_reads_as_missing() -> CacheResult<()> {
        let cache = MemoryCache::new();
        cache.insert("short_lived", "value", already_expired()).await;

        assert_eq!(cache.get("short_lived").await?, None);
        assert_eq!(cache.len().await, 0);
        Ok(())
    }

    #[tokio::test]
    async fn test_memory_write_sweeps_expired_keys() -> CacheResult<()> {
        let cache = MemoryCache::new();
        for i in 0..1000 {
            cache
                .insert(&format!("abandoned:{}", i), "value", already_expired())
                .await;
        }

        cache.set("live", "value", Some(60)).await?;

        assert_eq!(cache.entries.lock().await.len(), 1);
        assert_eq!(cache.get("live").await?, Some("value".to_string()));
        Ok(())
    }

    #[tokio::test]
    async fn test_memory_clones_share_entries() -> CacheResult<()> {
        let cache = MemoryCache::new();
        let other = cache.clone();

        cache.set("shared", "yes", Some(60)).await?;
        assert_eq!(other.get("shared").await?, Some("yes".to_string()));
        Ok(())
    }

    #[tokio::test]
    async fn test_backend_delegates_to_memory() -> CacheResult<()> {
        let backend = SessionBackend::Memory(MemoryCache::new());
        assert_eq!(backend.kind(), "memory");
        assert!(backend.health_check().await?);

        backend.set("k", "v", None).await?;
        assert_eq!(backend.get("k").await?, Some("v".to_string()));
        backend.delete("k").await?;
        assert_eq!(backend.get("k").await?, None);
        Ok(())
    }

    #[test]
    #[serial_test::serial]
    fn test_redis_config_reads_url_only() {
        // SAFETY: tests touching the environment are serialized
        unsafe { std::env::set_var("REDIS_URL", "redis://cache:6380") };
        let config = RedisConfig::from_env();
        // SAFETY: as above
        unsafe { std::env::remove_var("REDIS_URL") };

        assert_eq!(config.url, "redis://cache:6380");
        assert_eq!(RedisConfig::from_env().url, "redis://localhost:6379");
    }

    #[test]
    fn test_redis_pool_rejects_invalid_url() {
        let config = RedisConfig {
            url: "not a url".to_string(),
        };

        assert!(matches!(
            RedisPool::new(&config),
            Err(CacheError::Configuration(_))
        ));
    }

    #[test]
    fn test_redis_pool_accepts_valid_url() {
        let config = RedisConfig {
            url: "redis://localhost:6379".to_string(),
        };

        assert!(RedisPool::new(&config).is_ok());
    }
}
