//! Auth context: the single holder of who is signed in

use common::cache::KeyValueStore;
use tokio::sync::watch;
use tracing::{debug, error, info};

use crate::{
    config::Routes,
    error::AccessResult,
    gate::Navigator,
    models::{Identity, LoginResult, RoleSet},
    permission,
    session::SessionStore,
};

/// Shared auth state for one client
///
/// All mutation goes through [`login`](Self::login) and
/// [`logout`](Self::logout). Dependents read a snapshot with
/// [`current`](Self::current) or follow changes through
/// [`subscribe`](Self::subscribe).
pub struct AuthContext<S> {
    store: SessionStore<S>,
    routes: Routes,
    current: watch::Sender<Option<Identity>>,
}

impl<S: KeyValueStore> AuthContext<S> {
    /// Boot the context from whatever the session store holds
    pub async fn init(store: SessionStore<S>, routes: Routes) -> Self {
        let identity = store.load().await;
        match &identity {
            Some(identity) => info!(
                "Restored session {} for identity {} ({})",
                store.key(),
                identity.id,
                identity.role
            ),
            None => info!("No session restored from {}", store.key()),
        }

        let (current, _) = watch::channel(identity);
        Self {
            store,
            routes,
            current,
        }
    }

    /// Snapshot of the current identity
    pub fn current(&self) -> Option<Identity> {
        self.current.borrow().clone()
    }

    pub fn is_authenticated(&self) -> bool {
        self.current.borrow().is_some()
    }

    /// Whether the current identity holds one of `allowed`
    pub fn has_permission(&self, allowed: RoleSet) -> bool {
        permission::has_permission(self.current.borrow().as_ref(), allowed)
    }

    /// Receiver notified on every identity change
    pub fn subscribe(&self) -> watch::Receiver<Option<Identity>> {
        self.current.subscribe()
    }

    pub fn routes(&self) -> &Routes {
        &self.routes
    }

    /// Landing page for the current identity, or the login page when signed out
    pub fn home_path(&self) -> String {
        match self.current.borrow().as_ref() {
            Some(identity) => identity.role.home_path().to_string(),
            None => self.routes.login.clone(),
        }
    }

    /// Sign `identity` in, replacing whoever was signed in before
    ///
    /// The identity is persisted first. If that fails the context keeps its
    /// previous state and the error is returned.
    pub async fn login(&self, identity: Identity) -> AccessResult<()> {
        info!("Login for identity {} ({})", identity.id, identity.role);

        self.store.save(&identity).await.inspect_err(|e| {
            error!("Failed to persist session for {}: {}", identity.id, e);
        })?;
        let changed = self.current.send_if_modified(|current| {
            if current.as_ref() == Some(&identity) {
                false
            } else {
                *current = Some(identity);
                true
            }
        });
        if !changed {
            debug!("Identity unchanged, subscribers not notified");
        }

        Ok(())
    }

    /// Sign in from a login result delivered by the authentication backend
    pub async fn login_with(&self, result: LoginResult) -> AccessResult<Identity> {
        let identity = Identity::try_from(result)?;
        self.login(identity.clone()).await?;
        Ok(identity)
    }

    /// Sign out and navigate to the login page
    ///
    /// The in-memory identity is dropped before storage is touched, so a
    /// storage failure still leaves this context signed out.
    pub async fn logout(&self, navigator: &dyn Navigator) -> AccessResult<()> {
        let mut previous = None;
        self.current.send_if_modified(|current| {
            previous = current.take();
            previous.is_some()
        });
        if let Some(previous) = previous {
            info!("Logout for identity {}", previous.id);
        }

        let cleared = self.store.clear().await.inspect_err(|e| {
            error!("Failed to clear session {}: {}", self.store.key(), e);
        });
        navigator.navigate(&self.routes.login);

        cleared
    }
}
