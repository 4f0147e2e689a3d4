//! XChaCha20-Poly1305 sealing of credential strings.
//!
//! # Wire Format
//!
//! The sealed format is: `nonce (24 bytes) || ciphertext || tag (16 bytes)`,
//! carried as standard base64 when stored as text.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use chacha20poly1305::XChaCha20Poly1305;
use chacha20poly1305::aead::{Aead, AeadCore, KeyInit, OsRng};

use super::error::{CryptoError, CryptoResult};
use super::key::EncryptionKey;
use crate::TRACING_TARGET_CRYPTO;

/// Size of the XChaCha20-Poly1305 nonce in bytes.
pub const NONCE_SIZE: usize = 24;

/// Size of the Poly1305 authentication tag in bytes.
pub const TAG_SIZE: usize = 16;

/// Minimum size of a valid sealed value (nonce + tag, no plaintext).
pub const MIN_CIPHERTEXT_SIZE: usize = NONCE_SIZE + TAG_SIZE;

/// Encrypts plaintext, returning `nonce || ciphertext || tag`.
pub fn encrypt(key: &EncryptionKey, plaintext: &[u8]) -> CryptoResult<Vec<u8>> {
    let cipher = XChaCha20Poly1305::new(key.as_bytes().as_slice().into());
    let nonce = XChaCha20Poly1305::generate_nonce(&mut OsRng);

    let ciphertext = cipher
        .encrypt(&nonce, plaintext)
        .map_err(|_| CryptoError::EncryptionFailed)?;

    let mut result = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
    result.extend_from_slice(&nonce);
    result.extend_from_slice(&ciphertext);

    Ok(result)
}

/// Decrypts a value produced by [`encrypt`].
///
/// # Errors
///
/// - [`CryptoError::CiphertextTooShort`] if the input is shorter than nonce + tag
/// - [`CryptoError::DecryptionFailed`] on a wrong key, corruption, or tampering
pub fn decrypt(key: &EncryptionKey, ciphertext: &[u8]) -> CryptoResult<Vec<u8>> {
    if ciphertext.len() < MIN_CIPHERTEXT_SIZE {
        return Err(CryptoError::CiphertextTooShort);
    }

    let cipher = XChaCha20Poly1305::new(key.as_bytes().as_slice().into());
    let (nonce_bytes, encrypted) = ciphertext.split_at(NONCE_SIZE);

    cipher
        .decrypt(nonce_bytes.into(), encrypted)
        .map_err(|_| CryptoError::DecryptionFailed)
}

/// Seals a string and encodes the result as base64 text.
pub fn seal_str(key: &EncryptionKey, plaintext: &str) -> CryptoResult<String> {
    let sealed = encrypt(key, plaintext.as_bytes())?;
    Ok(STANDARD.encode(sealed))
}

/// Opens a base64 value produced by [`seal_str`].
pub fn open_str(key: &EncryptionKey, sealed: &str) -> CryptoResult<String> {
    let bytes = STANDARD
        .decode(sealed)
        .map_err(|e| CryptoError::Encoding(e.to_string()))?;

    let plaintext = decrypt(key, &bytes).inspect_err(|error| {
        tracing::debug!(
            target: TRACING_TARGET_CRYPTO,
            error = %error,
            sealed_len = bytes.len(),
            "failed to open sealed value"
        );
    })?;

    String::from_utf8(plaintext).map_err(|_| CryptoError::InvalidUtf8)
}
