//! Credential storage configuration.

use std::path::PathBuf;

use anyhow::Context;
use clap::Args;
use gopark_core::crypto::EncryptionKey;
use gopark_session::credential::RememberPolicy;
use serde::{Deserialize, Serialize};

use crate::TRACING_TARGET_CONFIG;

/// Default location of the session file.
pub const DEFAULT_STORE_PATH: &str = ".gopark/session.json";

/// Credential storage configuration.
///
/// # Environment Variables
///
/// - `GOPARK_STORE` - Path of the session file (default: .gopark/session.json)
/// - `GOPARK_REMEMBER_KEY` - Base64 32-byte key sealing remembered passwords
#[derive(Clone, Args, Serialize, Deserialize)]
#[must_use = "config does nothing unless you use it"]
pub struct SessionConfig {
    /// Path of the file holding the token, role and remembered login.
    #[arg(long = "store-path", env = "GOPARK_STORE", default_value = DEFAULT_STORE_PATH)]
    pub store_path: PathBuf,

    /// Base64-encoded 32-byte key used to seal remembered passwords.
    ///
    /// Without a key only the email of a remembered login is kept.
    #[arg(long = "remember-key", env = "GOPARK_REMEMBER_KEY", hide_env_values = true)]
    #[serde(default, skip_serializing)]
    pub remember_key: Option<String>,
}

impl std::fmt::Debug for SessionConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionConfig")
            .field("store_path", &self.store_path)
            .field("remember_key", &self.remember_key.as_ref().map(|_| "[redacted]"))
            .finish()
    }
}

impl SessionConfig {
    /// Builds the remembered-password policy from the configured key.
    pub fn remember_policy(&self) -> anyhow::Result<RememberPolicy> {
        let key = self
            .remember_key
            .as_deref()
            .map(EncryptionKey::from_base64)
            .transpose()
            .context("remember key must be 32 bytes of base64")?;

        Ok(RememberPolicy::from(key))
    }

    /// Logs configuration at debug level (no sensitive information).
    pub fn log(&self) {
        tracing::debug!(
            target: TRACING_TARGET_CONFIG,
            store_path = %self.store_path.display(),
            remember_key = self.remember_key.is_some(),
            "Session configuration"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(remember_key: Option<String>) -> SessionConfig {
        SessionConfig {
            store_path: PathBuf::from(DEFAULT_STORE_PATH),
            remember_key,
        }
    }

    #[test]
    fn test_no_key_keeps_email_only() {
        let policy = config(None).remember_policy().unwrap();
        assert!(matches!(policy, RememberPolicy::EmailOnly));
    }

    #[test]
    fn test_key_enables_sealing() {
        let key = EncryptionKey::generate().to_base64();
        let policy = config(Some(key)).remember_policy().unwrap();
        assert!(matches!(policy, RememberPolicy::Encrypted(_)));
    }

    #[test]
    fn test_malformed_key_is_rejected() {
        assert!(config(Some("short".to_owned())).remember_policy().is_err());
    }

    #[test]
    fn test_debug_hides_key() {
        let key = EncryptionKey::generate().to_base64();
        let debug = format!("{:?}", config(Some(key.clone())));
        assert!(!debug.contains(&key));
    }
}
