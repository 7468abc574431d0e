//! Role-based access control for the Chargebyte dashboard
//!
//! The pieces, leaf first:
//!
//! - [`session::SessionStore`] persists the signed-in [`Identity`].
//! - [`permission::has_permission`] decides set membership of a role.
//! - [`context::AuthContext`] holds the current identity and funnels every
//!   change through `login`/`logout`.
//! - [`gate::RoleGate`] renders protected content or redirects, and
//!   re-checks whenever the identity changes.
//!
//! ```rust
//! use access::{AuthContext, NavigationLog, Role, RoleGate, RoleSet, Routes, SessionStore};
//! use common::cache::MemoryCache;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), access::AccessError> {
//! let store = SessionStore::new(MemoryCache::new(), "chargebyte:user");
//! let ctx = AuthContext::init(store, Routes::default()).await;
//! let nav = NavigationLog::new();
//!
//! let mut gate = RoleGate::new(&ctx, RoleSet::of(&[Role::SuperAdmin, Role::Staff]));
//! assert_eq!(gate.render(&nav, || "orders"), None);
//! assert_eq!(nav.last().as_deref(), Some("/login"));
//!
//! ctx.login(access::Identity::new("1", "a@b.com", "A", Role::Staff)).await?;
//! assert_eq!(gate.render(&nav, || "orders"), Some("orders"));
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod context;
pub mod error;
pub mod gate;
pub mod models;
pub mod navigation;
pub mod permission;
pub mod session;

pub use crate::config::{AccessConfig, Routes};
pub use crate::context::AuthContext;
pub use crate::error::{AccessError, AccessResult};
pub use crate::gate::{GateState, NavigationLog, Navigator, RoleGate};
pub use crate::models::{Identity, LoginResult, Role, RoleSet};
pub use crate::session::SessionStore;
