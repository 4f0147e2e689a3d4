//! Fixed storage keys.

use strum::{AsRefStr, Display, EnumIter, EnumString, IntoStaticStr};

/// Keys under which the session layer persists its state.
///
/// Every variant maps to a distinct string; storage backends use
/// [`StorageKey::as_ref`] as the persisted name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[derive(AsRefStr, Display, EnumIter, EnumString, IntoStaticStr)]
pub enum StorageKey {
    /// Opaque bearer token issued at login.
    #[strum(serialize = "gopark.token")]
    Token,
    /// Role written alongside the token.
    #[strum(serialize = "gopark.role")]
    Role,
    /// Remembered email and protected password for login prefill.
    #[strum(serialize = "gopark.remembered_login")]
    RememberedLogin,
}
