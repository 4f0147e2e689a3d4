//! Role guard state machine.

use gopark_core::{Role, Routes};

use super::{GuardDecision, GuardPolicy};
use crate::TRACING_TARGET_GUARD;
use crate::credential::SessionRepository;
use crate::navigation::Navigator;

/// Lifecycle of a mounted guard.
///
/// ```text
/// Hydrating -> Checking -> Allowed
///                      \-> Redirecting
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardState {
    /// Mounted, identity not yet known. Nothing renders.
    Hydrating,
    /// Reading the stored role.
    Checking,
    /// Guarded content renders. Terminal for this mount.
    Allowed,
    /// Access denied. Nothing renders.
    ///
    /// `navigated` is `false` when the destination was the guarded path
    /// itself and the navigation was suppressed.
    Redirecting { destination: String, navigated: bool },
}

/// Gate around protected content.
///
/// A guard checks exactly once per mount: the first [`hydrate`](Self::hydrate)
/// reads the role and settles the state, later calls change nothing. Role
/// changes after that are only observed by mounting a new guard.
#[derive(Debug, Clone)]
pub struct RoleGuard {
    policy: GuardPolicy,
    routes: Routes,
    path: String,
    state: GuardState,
}

impl RoleGuard {
    /// Mounts a guard for content displayed at `path`.
    pub fn mount(policy: GuardPolicy, routes: Routes, path: impl Into<String>) -> Self {
        Self {
            policy,
            routes,
            path: path.into(),
            state: GuardState::Hydrating,
        }
    }

    /// Returns the current state.
    pub fn state(&self) -> &GuardState {
        &self.state
    }

    /// Returns the guarded path.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the policy this guard enforces.
    pub fn policy(&self) -> &GuardPolicy {
        &self.policy
    }

    /// Runs the one check of this mount once the client side is ready.
    pub fn hydrate(
        &mut self,
        repo: &dyn SessionRepository,
        navigator: &dyn Navigator,
    ) -> &GuardState {
        if self.state != GuardState::Hydrating {
            return &self.state;
        }

        self.state = GuardState::Checking;
        let role = repo.get_role().unwrap_or_else(|error| {
            tracing::warn!(
                target: TRACING_TARGET_GUARD,
                error = %error,
                path = %self.path,
                "failed to read role, treating as guest"
            );
            Role::Guest
        });

        self.state = match self.policy.evaluate(role, &self.routes) {
            GuardDecision::Allow => {
                tracing::debug!(
                    target: TRACING_TARGET_GUARD,
                    path = %self.path,
                    role = %role,
                    "access allowed"
                );
                GuardState::Allowed
            }
            GuardDecision::Redirect(destination) => {
                self.redirect(role, destination, navigator)
            }
        };

        &self.state
    }

    fn redirect(
        &self,
        role: Role,
        destination: String,
        navigator: &dyn Navigator,
    ) -> GuardState {
        if destination == self.path {
            tracing::warn!(
                target: TRACING_TARGET_GUARD,
                path = %self.path,
                role = %role,
                "redirect target is the guarded path, navigation suppressed"
            );
            return GuardState::Redirecting {
                destination,
                navigated: false,
            };
        }

        tracing::info!(
            target: TRACING_TARGET_GUARD,
            path = %self.path,
            role = %role,
            destination = %destination,
            "access denied, redirecting"
        );
        navigator.replace(&destination);

        GuardState::Redirecting {
            destination,
            navigated: true,
        }
    }

    /// Returns `true` once the guarded content may render.
    pub fn is_allowed(&self) -> bool {
        self.state == GuardState::Allowed
    }

    /// Renders the guarded content when allowed, nothing otherwise.
    pub fn render<T>(&self, children: impl FnOnce() -> T) -> Option<T> {
        self.is_allowed().then(children)
    }
}
