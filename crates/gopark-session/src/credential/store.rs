//! Credential store over injected storage.

use std::sync::Arc;

use gopark_core::Role;
use gopark_core::crypto::{open_str, seal_str};
use jiff::Timestamp;

use super::remembered::{StoredLogin, StoredPassword};
use super::{RememberPolicy, RememberedLogin, RememberedLogins, SessionRepository};
use crate::storage::{Storage, StorageKey};
use crate::{Result, TRACING_TARGET_CREDENTIAL};

/// Persistent credential store.
///
/// Holds the identity token, the role written next to it, and at most one
/// remembered login. Every write is last-write-wins.
#[derive(Clone)]
pub struct CredentialStore {
    storage: Arc<dyn Storage>,
    policy: RememberPolicy,
}

impl std::fmt::Debug for CredentialStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialStore")
            .field("policy", &self.policy.name())
            .finish_non_exhaustive()
    }
}

impl CredentialStore {
    /// Creates a store that never persists remembered passwords.
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self::with_policy(storage, RememberPolicy::default())
    }

    /// Creates a store with an explicit remembered-password policy.
    pub fn with_policy(storage: Arc<dyn Storage>, policy: RememberPolicy) -> Self {
        tracing::debug!(
            target: TRACING_TARGET_CREDENTIAL,
            policy = policy.name(),
            "credential store created"
        );

        Self { storage, policy }
    }

    /// Returns the remembered-password policy.
    pub fn policy(&self) -> &RememberPolicy {
        &self.policy
    }

    /// Returns `true` when a token is stored.
    pub fn has_token(&self) -> Result<bool> {
        self.storage.contains(StorageKey::Token)
    }

    fn protect(&self, password: &str) -> Result<Option<StoredPassword>> {
        let stored = match &self.policy {
            RememberPolicy::EmailOnly => None,
            RememberPolicy::Encrypted(key) => {
                Some(StoredPassword::Sealed(seal_str(key, password)?))
            }
            RememberPolicy::Plaintext => Some(StoredPassword::Plain(password.to_owned())),
        };

        Ok(stored)
    }

    /// Recovers the password; `None` means the record cannot be opened.
    fn reveal(&self, stored: Option<StoredPassword>) -> Option<String> {
        match stored {
            None => Some(String::new()),
            Some(StoredPassword::Plain(password)) => Some(password),
            Some(StoredPassword::Sealed(sealed)) => {
                let Some(key) = self.policy.key() else {
                    tracing::warn!(
                        target: TRACING_TARGET_CREDENTIAL,
                        policy = self.policy.name(),
                        "remembered password is sealed but no key is configured"
                    );
                    return None;
                };

                open_str(key, &sealed)
                    .inspect_err(|error| {
                        tracing::warn!(
                            target: TRACING_TARGET_CREDENTIAL,
                            error = %error,
                            "failed to open remembered password"
                        );
                    })
                    .ok()
            }
        }
    }
}

impl SessionRepository for CredentialStore {
    fn save_token(&self, token: &str) -> Result<()> {
        self.storage.set(StorageKey::Token, token)?;
        tracing::debug!(
            target: TRACING_TARGET_CREDENTIAL,
            token_len = token.len(),
            "identity token saved"
        );
        Ok(())
    }

    fn get_token(&self) -> Result<Option<String>> {
        self.storage.get(StorageKey::Token)
    }

    fn clear_token(&self) -> Result<()> {
        self.storage.remove(StorageKey::Token)
    }

    fn save_role(&self, role: Role) -> Result<()> {
        if !role.is_authenticated() {
            return self.clear_role();
        }

        self.storage.set(StorageKey::Role, role.as_ref())?;
        tracing::debug!(
            target: TRACING_TARGET_CREDENTIAL,
            role = %role,
            "role saved"
        );
        Ok(())
    }

    fn get_role(&self) -> Result<Role> {
        let stored = self.storage.get(StorageKey::Role)?;
        Ok(stored.as_deref().map_or(Role::Guest, Role::from_stored))
    }

    fn clear_role(&self) -> Result<()> {
        self.storage.remove(StorageKey::Role)
    }
}

impl RememberedLogins for CredentialStore {
    fn save_remembered(&self, email: &str, password: &str) -> Result<()> {
        let record = StoredLogin {
            email: email.to_owned(),
            password: self.protect(password)?,
            saved_at: Timestamp::now(),
        };

        let json = serde_json::to_string(&record)?;
        self.storage.set(StorageKey::RememberedLogin, &json)?;

        tracing::debug!(
            target: TRACING_TARGET_CREDENTIAL,
            policy = self.policy.name(),
            "remembered login saved"
        );
        Ok(())
    }

    fn get_remembered(&self) -> Result<Option<RememberedLogin>> {
        let Some(raw) = self.storage.get(StorageKey::RememberedLogin)? else {
            return Ok(None);
        };

        let record: StoredLogin = match serde_json::from_str(&raw) {
            Ok(record) => record,
            Err(error) => {
                tracing::warn!(
                    target: TRACING_TARGET_CREDENTIAL,
                    error = %error,
                    "remembered login record is malformed"
                );
                return Ok(None);
            }
        };

        let Some(password) = self.reveal(record.password) else {
            return Ok(None);
        };

        Ok(Some(RememberedLogin {
            email: record.email,
            password,
        }))
    }

    fn has_remembered(&self) -> Result<bool> {
        self.storage.contains(StorageKey::RememberedLogin)
    }

    fn clear_remembered(&self) -> Result<()> {
        self.storage.remove(StorageKey::RememberedLogin)?;
        tracing::debug!(
            target: TRACING_TARGET_CREDENTIAL,
            "remembered login cleared"
        );
        Ok(())
    }
}
