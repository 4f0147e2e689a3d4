//! Persistent credential store.
//!
//! This module provides:
//! - `CredentialStore`: token, role and remembered login over injected [`Storage`]
//! - `SessionRepository` / `RememberedLogins`: the seams guards and logout depend on
//! - `RememberPolicy`: how (and whether) remembered passwords are persisted
//!
//! [`Storage`]: crate::storage::Storage

mod policy;
mod remembered;
mod repository;
mod store;

pub use policy::RememberPolicy;
pub use remembered::RememberedLogin;
pub use repository::{CredentialRepository, RememberedLogins, SessionRepository};
pub use store::CredentialStore;
