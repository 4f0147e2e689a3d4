//! Error types for session storage operations.

use gopark_core::crypto::CryptoError;

/// Result type for all session operations in this crate.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Unified error type for session storage.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Storage cannot be reached at all (locked, poisoned, or disabled).
    #[error("storage unavailable: {reason}")]
    Unavailable { reason: String },

    /// Reading or writing the backing file failed.
    #[error("storage I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Stored data could not be (de)serialized.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Sealing a remembered password failed.
    #[error("credential sealing error: {0}")]
    Crypto(#[from] CryptoError),
}

impl Error {
    /// Creates an unavailable-storage error.
    pub fn unavailable(reason: impl Into<String>) -> Self {
        Self::Unavailable {
            reason: reason.into(),
        }
    }
}
