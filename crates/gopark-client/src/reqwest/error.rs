//! Error types for the reqwest transport.

use thiserror::Error;

/// Result type alias for reqwest operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error type for reqwest operations.
#[derive(Debug, Error)]
pub enum Error {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Reqwest(#[from] reqwest::Error),
    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serde(#[from] serde_json::Error),
    /// Endpoint URL could not be built.
    #[error("URL error: {0}")]
    Url(#[from] url::ParseError),
}

impl From<Error> for crate::Error {
    fn from(err: Error) -> Self {
        match err {
            Error::Reqwest(e) => {
                if e.is_timeout() {
                    crate::Error::Transport(format!("request timed out: {e}"))
                } else if e.is_connect() {
                    crate::Error::Transport(format!("connection failed: {e}"))
                } else if e.is_decode() {
                    crate::Error::Decode(e.to_string())
                } else {
                    crate::Error::Transport(e.to_string())
                }
            }
            Error::Serde(e) => crate::Error::Decode(e.to_string()),
            Error::Url(e) => crate::Error::Transport(format!("invalid endpoint: {e}")),
        }
    }
}
