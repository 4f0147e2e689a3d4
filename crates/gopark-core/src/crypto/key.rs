//! Symmetric key used to seal remembered credentials.

use std::fmt;

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chacha20poly1305::XChaCha20Poly1305;
use chacha20poly1305::aead::{KeyInit, OsRng};
use sha2::{Digest, Sha256};

use super::error::{CryptoError, CryptoResult};

/// Size of the encryption key in bytes.
pub const KEY_SIZE: usize = 32;

/// A 256-bit XChaCha20-Poly1305 key.
///
/// The `Debug` output never includes key material.
#[derive(Clone, PartialEq, Eq)]
pub struct EncryptionKey([u8; KEY_SIZE]);

impl EncryptionKey {
    /// Generates a new random key from the operating system RNG.
    pub fn generate() -> Self {
        let key = XChaCha20Poly1305::generate_key(&mut OsRng);
        let mut bytes = [0u8; KEY_SIZE];
        bytes.copy_from_slice(key.as_slice());
        Self(bytes)
    }

    /// Creates a key from raw bytes.
    pub fn from_bytes(bytes: &[u8]) -> CryptoResult<Self> {
        let bytes: [u8; KEY_SIZE] = bytes
            .try_into()
            .map_err(|_| CryptoError::InvalidKeyLength)?;
        Ok(Self(bytes))
    }

    /// Decodes a key from standard base64.
    pub fn from_base64(encoded: &str) -> CryptoResult<Self> {
        let bytes = STANDARD
            .decode(encoded.trim())
            .map_err(|e| CryptoError::Encoding(e.to_string()))?;
        Self::from_bytes(&bytes)
    }

    /// Derives a key from a passphrase with SHA-256.
    ///
    /// Only suitable for high-entropy passphrases such as device secrets.
    pub fn derive_from_passphrase(passphrase: &str) -> Self {
        let digest = Sha256::digest(passphrase.as_bytes());
        let mut bytes = [0u8; KEY_SIZE];
        bytes.copy_from_slice(&digest);
        Self(bytes)
    }

    /// Encodes the key as standard base64.
    pub fn to_base64(&self) -> String {
        STANDARD.encode(self.0)
    }

    /// Returns the raw key bytes.
    #[inline]
    pub fn as_bytes(&self) -> &[u8; KEY_SIZE] {
        &self.0
    }
}

impl fmt::Debug for EncryptionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("EncryptionKey(..)")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_base64_roundtrip() {
        let key = EncryptionKey::generate();
        let decoded = EncryptionKey::from_base64(&key.to_base64()).unwrap();
        assert_eq!(key, decoded);
    }

    #[test]
    fn test_invalid_length() {
        let result = EncryptionKey::from_bytes(&[0u8; 16]);
        assert_eq!(result, Err(CryptoError::InvalidKeyLength));
    }

    #[test]
    fn test_invalid_base64() {
        let result = EncryptionKey::from_base64("not base64!");
        assert!(matches!(result, Err(CryptoError::Encoding(_))));
    }

    #[test]
    fn test_passphrase_derivation_is_stable() {
        let a = EncryptionKey::derive_from_passphrase("device-secret");
        let b = EncryptionKey::derive_from_passphrase("device-secret");
        let c = EncryptionKey::derive_from_passphrase("other-secret");
        assert_eq!(a, b);
        assert_ne!(a, c);
    }

    #[test]
    fn test_debug_hides_material() {
        let key = EncryptionKey::generate();
        assert_eq!(format!("{key:?}"), "EncryptionKey(..)");
    }
}
