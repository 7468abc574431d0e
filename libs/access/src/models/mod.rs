//! Access-control models

pub mod identity;
pub mod role;

// Re-export for convenience
pub use identity::{Identity, LoginResult};
pub use role::{Role, RoleSet};
