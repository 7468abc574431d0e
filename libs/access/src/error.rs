//! Error types for the access-control core

use common::error::CacheError;
use thiserror::Error;

/// Custom error type for access-control operations
///
/// Missing identities and wrong roles are never errors; they resolve to
/// redirects. These variants cover storage, parsing and configuration only.
#[derive(Error, Debug)]
pub enum AccessError {
    /// The session backend failed to read or write
    #[error("Session storage error: {0}")]
    Storage(#[from] CacheError),

    /// An identity could not be serialized for storage
    #[error("Session serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A role string outside the known enumeration
    #[error("Unknown role: {0}")]
    UnknownRole(String),

    /// Configuration could not be loaded
    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

/// Type alias for Result with AccessError
pub type AccessResult<T> = Result<T, AccessError>;
