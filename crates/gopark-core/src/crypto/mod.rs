//! Sealing of remembered credentials.
//!
//! Passwords kept for login-form prefill are never written to storage in clear
//! unless a caller opts into it explicitly. This module seals them with
//! XChaCha20-Poly1305 under a device-local key.
//!
//! # Example
//!
//! ```rust
//! use gopark_core::crypto::{EncryptionKey, open_str, seal_str};
//!
//! let key = EncryptionKey::generate();
//! let sealed = seal_str(&key, "hunter2").unwrap();
//! assert_eq!(open_str(&key, &sealed).unwrap(), "hunter2");
//! ```

mod cipher;
mod error;
mod key;

pub use cipher::{decrypt, encrypt, open_str, seal_str};
pub use error::{CryptoError, CryptoResult};
pub use key::{EncryptionKey, KEY_SIZE};
