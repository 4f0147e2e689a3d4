//! Navigation destinations used by guards and logout.

use serde::{Deserialize, Serialize};

/// Default route shown when a role guard denies access.
pub const DEFAULT_FORBIDDEN_ROUTE: &str = "/403";

/// Default route of the login surface.
pub const DEFAULT_LOGIN_ROUTE: &str = "/login";

/// Fixed routing table for session-related redirects.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Routes {
    /// Destination for role mismatches.
    pub forbidden: String,
    /// Login surface.
    pub login: String,
    /// Home area of administrators.
    pub admin_home: String,
    /// Home area of parking lot owners.
    pub owner_home: String,
    /// Public landing page.
    pub public_home: String,
}

impl Default for Routes {
    fn default() -> Self {
        Self {
            forbidden: DEFAULT_FORBIDDEN_ROUTE.to_owned(),
            login: DEFAULT_LOGIN_ROUTE.to_owned(),
            admin_home: "/admin".to_owned(),
            owner_home: "/owner".to_owned(),
            public_home: "/".to_owned(),
        }
    }
}

impl Routes {
    /// Overrides the forbidden destination.
    #[must_use]
    pub fn with_forbidden(mut self, path: impl Into<String>) -> Self {
        self.forbidden = path.into();
        self
    }

    /// Overrides the login destination.
    #[must_use]
    pub fn with_login(mut self, path: impl Into<String>) -> Self {
        self.login = path.into();
        self
    }
}
