//! Role gate: render protected content or redirect
//!
//! A gate is mounted with an allow-list and starts in
//! [`GateState::Checking`]. Evaluating it settles on either
//! [`GateState::Authorized`] or [`GateState::Redirecting`]. Any later change
//! to the signed-in identity, or to the allow-list, sends it back to
//! `Checking` so the next evaluation never shows stale content.

use std::sync::Mutex;

use tokio::sync::watch;
use tracing::{debug, info};

use crate::{
    config::Routes,
    context::AuthContext,
    models::{Identity, RoleSet},
    permission,
};

/// Receives navigation requests
///
/// Navigation is fire-and-forget: the gate does not wait for or observe the
/// outcome.
pub trait Navigator: Send + Sync {
    fn navigate(&self, target: &str);
}

/// Navigator that records every request in order
#[derive(Debug, Default)]
pub struct NavigationLog {
    targets: Mutex<Vec<String>>,
}

impl NavigationLog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Most recent navigation target
    pub fn last(&self) -> Option<String> {
        self.targets
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .last()
            .cloned()
    }

    /// Every navigation target, oldest first
    pub fn history(&self) -> Vec<String> {
        self.targets
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl Navigator for NavigationLog {
    fn navigate(&self, target: &str) {
        self.targets
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(target.to_string());
    }
}

/// Per-mount gate state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateState {
    Checking,
    Authorized,
    Redirecting(String),
}

/// Guard around content open only to `allowed`
pub struct RoleGate {
    allowed: RoleSet,
    redirect_to: Option<String>,
    routes: Routes,
    identity: watch::Receiver<Option<Identity>>,
    state: GateState,
}

impl RoleGate {
    /// Mount a gate against `ctx`
    pub fn new<S>(ctx: &AuthContext<S>, allowed: RoleSet) -> Self
    where
        S: common::cache::KeyValueStore,
    {
        Self {
            allowed,
            redirect_to: None,
            routes: ctx.routes().clone(),
            identity: ctx.subscribe(),
            state: GateState::Checking,
        }
    }

    /// Send signed-in visitors without permission here instead of the
    /// unauthorized page
    pub fn with_redirect(mut self, target: impl Into<String>) -> Self {
        self.redirect_to = Some(target.into());
        self
    }

    pub fn allowed_roles(&self) -> RoleSet {
        self.allowed
    }

    /// Replace the allow-list; the gate re-checks on the next evaluation
    pub fn set_allowed_roles(&mut self, allowed: RoleSet) {
        if allowed != self.allowed {
            self.allowed = allowed;
            self.state = GateState::Checking;
        }
    }

    pub fn state(&self) -> &GateState {
        &self.state
    }

    /// Run the state machine
    ///
    /// Settled states are kept until the identity or the allow-list
    /// changes. Entering `Redirecting` issues exactly one navigation.
    pub fn evaluate(&mut self, navigator: &dyn Navigator) -> &GateState {
        if self.identity.has_changed().unwrap_or(false) {
            debug!("Identity changed, re-checking gate");
            self.state = GateState::Checking;
        }

        if self.state == GateState::Checking {
            let identity = self.identity.borrow_and_update().clone();
            let next = self.check(identity.as_ref());

            if let GateState::Redirecting(target) = &next {
                navigator.navigate(target);
            }
            self.state = next;
        }

        &self.state
    }

    /// Evaluate and produce the protected content only when authorized
    pub fn render<T>(
        &mut self,
        navigator: &dyn Navigator,
        children: impl FnOnce() -> T,
    ) -> Option<T> {
        match self.evaluate(navigator) {
            GateState::Authorized => Some(children()),
            _ => None,
        }
    }

    /// Wait for the next identity change
    ///
    /// Returns `false` once the auth context is gone and no further change
    /// can arrive.
    pub async fn changed(&mut self) -> bool {
        match self.identity.changed().await {
            Ok(()) => {
                self.state = GateState::Checking;
                true
            }
            Err(_) => false,
        }
    }

    fn check(&self, identity: Option<&Identity>) -> GateState {
        let Some(identity) = identity else {
            info!("Gate redirect to {}: nobody signed in", self.routes.login);
            return GateState::Redirecting(self.routes.login.clone());
        };

        if permission::has_permission(Some(identity), self.allowed) {
            return GateState::Authorized;
        }

        let target = self
            .redirect_to
            .clone()
            .unwrap_or_else(|| self.routes.unauthorized.clone());
        info!(
            "Gate redirect to {}: identity {} ({}) not in {:?}",
            target, identity.id, identity.role, self.allowed
        );
        GateState::Redirecting(target)
    }
}
