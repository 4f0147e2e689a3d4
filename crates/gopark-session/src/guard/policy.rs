//! Guard policies.

use gopark_core::{Role, Routes};
use serde::{Deserialize, Serialize};

/// Access rule evaluated by a [`RoleGuard`](super::RoleGuard).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "roles", rename_all = "snake_case")]
pub enum GuardPolicy {
    /// Allows only the given authenticated role; everyone else is sent to the
    /// forbidden route.
    RequireExactly(Role),
    /// Allows anyone whose role is not listed; listed roles are sent to their
    /// own home area.
    RequireNoneOf(Vec<Role>),
}

/// Outcome of evaluating a policy against a role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    /// Render the guarded content.
    Allow,
    /// Leave for the given destination.
    Redirect(String),
}

impl GuardPolicy {
    /// Guard for content reserved to one role.
    pub fn require(role: Role) -> Self {
        Self::RequireExactly(role)
    }

    /// Guard for public-only content such as the login page.
    pub fn public_only() -> Self {
        Self::RequireNoneOf(vec![Role::Admin, Role::Owner])
    }

    /// Evaluates the policy.
    ///
    /// `RequireExactly` never admits an unauthenticated role, even when it is
    /// configured with [`Role::Guest`].
    pub fn evaluate(&self, role: Role, routes: &Routes) -> GuardDecision {
        match self {
            Self::RequireExactly(required) => {
                if role.is_authenticated() && role == *required {
                    GuardDecision::Allow
                } else {
                    GuardDecision::Redirect(routes.forbidden.clone())
                }
            }
            Self::RequireNoneOf(denied) => {
                if denied.contains(&role) {
                    GuardDecision::Redirect(role.home(routes).to_owned())
                } else {
                    GuardDecision::Allow
                }
            }
        }
    }
}
