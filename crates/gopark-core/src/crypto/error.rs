//! Cryptographic error types.

use thiserror::Error;

/// Result type for cryptographic operations.
pub type CryptoResult<T> = std::result::Result<T, CryptoError>;

/// Errors that can occur while sealing or opening credentials.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CryptoError {
    /// The sealed value is too short to contain a valid nonce and tag.
    #[error("sealed value too short to contain nonce and authentication tag")]
    CiphertextTooShort,
    /// Decryption failed - data may be corrupted, tampered with, or sealed with another key.
    #[error("decryption failed: data may be corrupted or sealed with another key")]
    DecryptionFailed,
    /// Encryption failed.
    #[error("encryption failed")]
    EncryptionFailed,
    /// The provided key has an invalid length.
    #[error("invalid key length: expected 32 bytes")]
    InvalidKeyLength,
    /// The sealed value or key is not valid base64.
    #[error("invalid base64 encoding: {0}")]
    Encoding(String),
    /// The opened value is not valid UTF-8.
    #[error("opened value is not valid UTF-8")]
    InvalidUtf8,
}
