//! Repository traits injected into guards and the logout coordinator.

use gopark_core::Role;

use super::RememberedLogin;
use crate::Result;

/// Identity token and role persistence.
///
/// Guards and the logout coordinator receive this by injection instead of
/// reaching for ambient global storage.
pub trait SessionRepository: Send + Sync {
    /// Stores the identity token.
    fn save_token(&self, token: &str) -> Result<()>;

    /// Reads the identity token.
    fn get_token(&self) -> Result<Option<String>>;

    /// Removes the identity token.
    fn clear_token(&self) -> Result<()>;

    /// Stores the role; [`Role::Guest`] removes it.
    fn save_role(&self, role: Role) -> Result<()>;

    /// Reads the role, [`Role::Guest`] when none is stored.
    fn get_role(&self) -> Result<Role>;

    /// Removes the role.
    fn clear_role(&self) -> Result<()>;
}

/// Remembered login persistence.
pub trait RememberedLogins: Send + Sync {
    /// Stores a remembered login, replacing any existing one.
    fn save_remembered(&self, email: &str, password: &str) -> Result<()>;

    /// Reads the remembered login.
    fn get_remembered(&self) -> Result<Option<RememberedLogin>>;

    /// Returns `true` iff a record exists, whether or not it decodes.
    fn has_remembered(&self) -> Result<bool>;

    /// Removes the remembered login. Idempotent.
    fn clear_remembered(&self) -> Result<()>;
}

/// Full credential persistence: session plus remembered login.
pub trait CredentialRepository: SessionRepository + RememberedLogins {}

impl<T: SessionRepository + RememberedLogins + ?Sized> CredentialRepository for T {}
