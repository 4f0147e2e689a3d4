//! Account roles as persisted alongside the identity token.

use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumIter, EnumString, IntoStaticStr};

use crate::Routes;

/// Role classifier for the current session.
///
/// The role is written by the login response and is not validated against the
/// token on the client. [`Role::Guest`] stands for "no role stored".
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(Serialize, Deserialize)]
#[derive(AsRefStr, Display, EnumIter, EnumString, IntoStaticStr)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Role {
    /// Platform administrator.
    Admin,
    /// Parking lot owner.
    Owner,
    /// No authenticated role.
    #[default]
    Guest,
}

impl Role {
    /// Parses a role as found in storage.
    ///
    /// Anything that is not a known authenticated role, including the empty
    /// string and unknown values, maps to [`Role::Guest`].
    pub fn from_stored(value: &str) -> Self {
        match value.trim().parse::<Self>() {
            Ok(role) => role,
            Err(_) => Self::Guest,
        }
    }

    /// Returns `true` for roles that imply a signed-in account.
    #[must_use]
    pub const fn is_authenticated(self) -> bool {
        matches!(self, Self::Admin | Self::Owner)
    }

    /// Returns the home area for this role.
    pub fn home<'a>(self, routes: &'a Routes) -> &'a str {
        match self {
            Self::Admin => &routes.admin_home,
            Self::Owner => &routes.owner_home,
            Self::Guest => &routes.public_home,
        }
    }
}
