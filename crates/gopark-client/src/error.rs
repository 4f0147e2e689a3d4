//! Error types for authentication API calls.

use strum::IntoStaticStr;
use thiserror::Error;
use validator::ValidationErrors;

/// Result type alias for authentication API calls.
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Fallback shown when the server rejects credentials without a message.
pub const DEFAULT_UNAUTHORIZED_MESSAGE: &str = "Invalid email or password.";

/// Error type for authentication API calls.
#[derive(Debug, Error, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum Error {
    /// The server did not accept the credentials or token.
    #[error("unauthorized: {message}")]
    Unauthorized { message: String },
    /// The server answered with a non-success status.
    #[error("request rejected ({status}): {message}")]
    Rejected { status: u16, message: String },
    /// The request failed local validation and was never sent.
    #[error("invalid request: {0}")]
    Validation(#[from] ValidationErrors),
    /// The server could not be reached.
    #[error("transport error: {0}")]
    Transport(String),
    /// The response body did not have the expected shape.
    #[error("decode error: {0}")]
    Decode(String),
    /// An authenticated call was attempted without a stored token.
    #[error("no identity token stored")]
    MissingToken,
    /// Credentials could not be persisted or read.
    #[error("session storage error: {0}")]
    Storage(#[from] gopark_session::Error),
}

impl Error {
    /// Creates an unauthorized error, using the default text for an empty message.
    pub fn unauthorized(message: impl Into<String>) -> Self {
        let message = message.into();
        Self::Unauthorized {
            message: if message.trim().is_empty() {
                DEFAULT_UNAUTHORIZED_MESSAGE.to_owned()
            } else {
                message
            },
        }
    }

    /// Creates a rejection error.
    pub fn rejected(status: u16, message: impl Into<String>) -> Self {
        Self::Rejected {
            status,
            message: message.into(),
        }
    }

    /// Returns the snake_case kind name used in logs.
    pub fn kind(&self) -> &'static str {
        self.into()
    }

    /// Returns `true` when the server no longer accepts the caller's identity.
    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }

    /// Renders the message shown to the user.
    pub fn user_message(&self) -> String {
        match self {
            Self::Unauthorized { message } | Self::Rejected { message, .. } => message.clone(),
            Self::Validation(errors) => {
                let mut fields: Vec<String> = errors
                    .field_errors()
                    .into_keys()
                    .map(|field| field.to_string())
                    .collect();
                fields.sort_unstable();
                format!("Please check the following fields: {}.", fields.join(", "))
            }
            Self::Transport(_) => "Unable to reach the server. Please try again.".to_owned(),
            Self::Decode(_) => "The server sent an unexpected response.".to_owned(),
            Self::MissingToken => "Please sign in to continue.".to_owned(),
            Self::Storage(_) => "Your session could not be saved on this device.".to_owned(),
        }
    }
}
