//! Convenient re-exports for common use.

pub use crate::crypto::{CryptoError, CryptoResult, EncryptionKey};
pub use crate::role::Role;
pub use crate::routes::Routes;
pub use crate::toast::{Severity, Toast, ToastId, ToastQueue};
