#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod error;
mod session;

pub mod request;
pub mod response;

#[cfg(feature = "reqwest")]
#[cfg_attr(docsrs, doc(cfg(feature = "reqwest")))]
pub mod reqwest;

pub use error::{Error, Result};
pub use request::{ForgotPasswordRequest, LoginRequest, ResetPasswordRequest, SignupRequest};
pub use response::{ApiEnvelope, LoginData, MessageData, ProfileData};
pub use session::{AuthSession, LoginOutcome};

/// Tracing target for authentication API calls and the login session.
pub const TRACING_TARGET: &str = "gopark_client";

/// Upstream authentication API.
///
/// Implement this trait to plug a transport under [`AuthSession`].
#[async_trait::async_trait]
pub trait AuthApi: Send + Sync {
    /// Exchanges credentials for an identity token and role.
    async fn login(&self, request: &LoginRequest) -> Result<LoginData>;

    /// Registers a new account.
    async fn signup(&self, request: &SignupRequest) -> Result<MessageData>;

    /// Starts the password reset flow.
    async fn forgot_password(&self, request: &ForgotPasswordRequest) -> Result<MessageData>;

    /// Completes the password reset flow.
    async fn reset_password(&self, request: &ResetPasswordRequest) -> Result<MessageData>;

    /// Returns the account behind `token`.
    ///
    /// Fails with [`Error::Unauthorized`] once the token is no longer accepted.
    async fn profile(&self, token: &str) -> Result<ProfileData>;
}
