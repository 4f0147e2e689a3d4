//! Remembered login records.

use std::fmt;

use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// Email and password kept for login-form prefill.
///
/// Presence of a remembered login never implies an active session.
#[derive(Clone, PartialEq, Eq)]
pub struct RememberedLogin {
    pub email: String,
    pub password: String,
}

impl RememberedLogin {
    /// Creates a new remembered login.
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }

    /// Returns `true` if no password is available for prefill.
    #[must_use]
    pub fn is_email_only(&self) -> bool {
        self.password.is_empty()
    }
}

impl fmt::Debug for RememberedLogin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RememberedLogin")
            .field("email", &self.email)
            .field("password", &"[redacted]")
            .finish()
    }
}

/// Password as it is written to storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "scheme", content = "value", rename_all = "snake_case")]
pub(crate) enum StoredPassword {
    /// XChaCha20-Poly1305 sealed, base64 encoded.
    Sealed(String),
    /// Clear text; only written under an explicit plaintext policy.
    Plain(String),
}

/// Persisted form of a [`RememberedLogin`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub(crate) struct StoredLogin {
    pub email: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub password: Option<StoredPassword>,
    pub saved_at: Timestamp,
}
