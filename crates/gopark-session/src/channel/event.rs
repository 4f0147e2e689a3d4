//! Typed session events.

use gopark_core::Role;
use serde::{Deserialize, Serialize};

/// Well-known name of the session-expired signal.
pub const SESSION_EXPIRED: &str = "session-expired";

/// Events broadcast on the [`SessionChannel`](super::SessionChannel).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum SessionEvent {
    /// The identity token is no longer accepted upstream.
    #[serde(rename = "session-expired")]
    Expired,
    /// A login completed and credentials were stored.
    LoggedIn { role: Role },
    /// Credentials were cleared by the logout coordinator.
    LoggedOut,
}

impl SessionEvent {
    /// Returns the event name.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Expired => SESSION_EXPIRED,
            Self::LoggedIn { .. } => "logged-in",
            Self::LoggedOut => "logged-out",
        }
    }
}
