//! Common library for the Chargebyte dashboard
//!
//! This crate provides the key/value backends shared by the access-control
//! core and the dashboard service, along with their error types.
//!
//! ```rust,no_run
//! use common::cache::{KeyValueStore, RedisConfig, RedisPool};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = RedisConfig::from_env();
//!     let pool = RedisPool::new(&config)?;
//!     pool.set("greeting", "hello", Some(30)).await?;
//!     println!("Stored value: {:?}", pool.get("greeting").await?);
//!     Ok(())
//! }
//! ```

pub mod cache;
pub mod error;
