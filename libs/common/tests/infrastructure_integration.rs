//! Integration tests for the infrastructure components
//!
//! These tests verify that the Redis backend used for persisted sessions is
//! configured and reachable. They need a live server, so run them with
//! `--ignored` once Redis is up.

use common::cache::{KeyValueStore, RedisConfig, RedisPool, SessionBackend};

/// Test that Redis is reachable and honours set/get/delete
#[tokio::test]
#[ignore = "requires a running Redis server"]
async fn test_redis_integration() -> Result<(), Box<dyn std::error::Error>> {
    let redis_config = RedisConfig::from_env();
    let redis_pool = RedisPool::new(&redis_config)?;

    assert!(
        redis_pool.health_check().await?,
        "Redis health check failed"
    );

    let backend = SessionBackend::Redis(redis_pool);
    let test_key = "integration_test_key";
    let test_value = "integration_test_value";

    backend.set(test_key, test_value, Some(10)).await?;

    let retrieved_value = backend.get(test_key).await?;
    assert_eq!(
        retrieved_value,
        Some(test_value.to_string()),
        "Redis SET/GET test failed"
    );

    backend.delete(test_key).await?;

    let retrieved_value = backend.get(test_key).await?;
    assert_eq!(retrieved_value, None, "Redis delete operation failed");

    Ok(())
}
