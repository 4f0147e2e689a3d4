//! Protection policy for remembered passwords.

use gopark_core::crypto::EncryptionKey;

/// How the password half of a remembered login is persisted.
///
/// The default never writes the password at all.
#[derive(Debug, Clone, Default)]
pub enum RememberPolicy {
    /// Only the email is persisted; the password is dropped.
    #[default]
    EmailOnly,
    /// The password is sealed with the given device key.
    Encrypted(EncryptionKey),
    /// The password is written in clear. Must be chosen explicitly.
    Plaintext,
}

impl RememberPolicy {
    /// Returns the policy name used in logs.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::EmailOnly => "email_only",
            Self::Encrypted(_) => "encrypted",
            Self::Plaintext => "plaintext",
        }
    }

    /// Returns the key used for sealing, if any.
    pub fn key(&self) -> Option<&EncryptionKey> {
        match self {
            Self::Encrypted(key) => Some(key),
            _ => None,
        }
    }
}

impl From<Option<EncryptionKey>> for RememberPolicy {
    fn from(key: Option<EncryptionKey>) -> Self {
        key.map_or(Self::EmailOnly, Self::Encrypted)
    }
}
