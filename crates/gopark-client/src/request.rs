//! Authentication request payloads.
//!
//! Every payload is validated locally before it is sent.

use std::fmt;

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Request payload for login.
#[must_use]
#[derive(Clone, Serialize, Deserialize, Validate)]
pub struct LoginRequest {
    /// Email address of the account.
    #[validate(email)]
    #[validate(length(min = 5, max = 254))]
    pub email: String,

    /// Password of the account.
    #[validate(length(min = 1, max = 1000))]
    pub password: String,
}

impl LoginRequest {
    /// Creates a login request.
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for LoginRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginRequest")
            .field("email", &self.email)
            .field("password", &"[redacted]")
            .finish()
    }
}

/// Request payload for signup.
#[must_use]
#[derive(Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SignupRequest {
    /// Display name of the account.
    #[validate(length(min = 2, max = 64))]
    pub full_name: String,

    /// Email address of the account.
    #[validate(email)]
    #[validate(length(min = 5, max = 254))]
    pub email: String,

    /// Password of the account.
    #[validate(length(min = 8, max = 128))]
    pub password: String,
}

impl SignupRequest {
    /// Creates a signup request.
    pub fn new(
        full_name: impl Into<String>,
        email: impl Into<String>,
        password: impl Into<String>,
    ) -> Self {
        Self {
            full_name: full_name.into(),
            email: email.into(),
            password: password.into(),
        }
    }
}

impl fmt::Debug for SignupRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SignupRequest")
            .field("full_name", &self.full_name)
            .field("email", &self.email)
            .field("password", &"[redacted]")
            .finish()
    }
}

/// Request payload for password reset initiation.
#[must_use]
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct ForgotPasswordRequest {
    /// Email address of the account to reset.
    #[validate(email)]
    #[validate(length(min = 5, max = 254))]
    pub email: String,
}

impl ForgotPasswordRequest {
    /// Creates a password reset initiation request.
    pub fn new(email: impl Into<String>) -> Self {
        Self {
            email: email.into(),
        }
    }
}

/// Request payload for password reset confirmation.
#[must_use]
#[derive(Clone, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ResetPasswordRequest {
    /// Reset token received by email.
    #[validate(length(min = 1, max = 512))]
    pub token: String,

    /// New password.
    #[validate(length(min = 8, max = 128))]
    pub new_password: String,
}

impl ResetPasswordRequest {
    /// Creates a password reset confirmation request.
    pub fn new(token: impl Into<String>, new_password: impl Into<String>) -> Self {
        Self {
            token: token.into(),
            new_password: new_password.into(),
        }
    }
}

impl fmt::Debug for ResetPasswordRequest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ResetPasswordRequest")
            .field("token", &"[redacted]")
            .field("new_password", &"[redacted]")
            .finish()
    }
}
