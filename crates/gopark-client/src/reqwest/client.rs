//! Reqwest-based authentication API client.

use std::sync::Arc;

use reqwest::{Client, RequestBuilder, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use uuid::Uuid;

use super::{ClientConfig, Error, TRACING_TARGET};
use crate::{
    ApiEnvelope, AuthApi, ForgotPasswordRequest, LoginData, LoginRequest, MessageData,
    ProfileData, ResetPasswordRequest, SignupRequest,
};

/// Header carrying the per-request correlation id.
pub const REQUEST_ID_HEADER: &str = "X-Request-Id";

struct ReqwestClientInner {
    http: Client,
    config: ClientConfig,
}

/// HTTP implementation of [`AuthApi`].
///
/// Calls are not retried; the configured timeout is the only bound.
///
/// # Examples
///
/// ```rust,ignore
/// use gopark_client::reqwest::{ClientConfig, ReqwestClient};
/// use gopark_client::{AuthApi, LoginRequest};
///
/// let client = ReqwestClient::new(ClientConfig::default())?;
/// let login = client.login(&LoginRequest::new("owner@gopark.app", "secret")).await?;
/// ```
#[derive(Clone)]
pub struct ReqwestClient {
    inner: Arc<ReqwestClientInner>,
}

impl std::fmt::Debug for ReqwestClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReqwestClient")
            .field("config", &self.inner.config)
            .finish_non_exhaustive()
    }
}

impl ReqwestClient {
    /// Creates a new client with the given configuration.
    pub fn new(config: ClientConfig) -> crate::Result<Self> {
        let timeout = config.effective_timeout();
        let user_agent = config.effective_user_agent();

        tracing::debug!(
            target: TRACING_TARGET,
            api_url = %config.api_url,
            timeout_ms = timeout.as_millis(),
            "Creating reqwest client"
        );

        let http = Client::builder()
            .timeout(timeout)
            .user_agent(&user_agent)
            .build()
            .map_err(Error::from)?;

        let inner = ReqwestClientInner { http, config };
        Ok(Self {
            inner: Arc::new(inner),
        })
    }

    /// Gets the client configuration.
    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }

    async fn post<B, T>(&self, path: &str, body: &B) -> crate::Result<T>
    where
        B: Serialize + Sync,
        T: DeserializeOwned,
    {
        let url = self.inner.config.endpoint(path).map_err(Error::from)?;
        let request = self.inner.http.post(url).json(body);
        self.send(path, request).await
    }

    async fn get_authenticated<T>(&self, path: &str, token: &str) -> crate::Result<T>
    where
        T: DeserializeOwned,
    {
        let url = self.inner.config.endpoint(path).map_err(Error::from)?;
        let request = self.inner.http.get(url).bearer_auth(token);
        self.send(path, request).await
    }

    async fn send<T>(&self, path: &str, request: RequestBuilder) -> crate::Result<T>
    where
        T: DeserializeOwned,
    {
        let request_id = Uuid::now_v7();

        tracing::debug!(
            target: TRACING_TARGET,
            request_id = %request_id,
            path,
            "Sending auth request"
        );

        let response = request
            .header(REQUEST_ID_HEADER, request_id.to_string())
            .send()
            .await
            .map_err(Error::from)?;

        let status = response.status();
        let body = response.bytes().await.map_err(Error::from)?;

        tracing::debug!(
            target: TRACING_TARGET,
            request_id = %request_id,
            path,
            status = status.as_u16(),
            "Auth request completed"
        );

        decode_response(status, &body)
    }
}

/// Maps a raw response onto the API envelope.
pub(crate) fn decode_response<T>(status: StatusCode, body: &[u8]) -> crate::Result<T>
where
    T: DeserializeOwned,
{
    if status.is_success() {
        let envelope: ApiEnvelope<T> = serde_json::from_slice(body).map_err(Error::from)?;
        return envelope.into_data();
    }

    let message = serde_json::from_slice::<ApiEnvelope<serde_json::Value>>(body)
        .ok()
        .and_then(|envelope| envelope.error)
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .map_or_else(|| format!("Request failed ({status})"), str::to_owned)
        });

    if status == StatusCode::UNAUTHORIZED {
        Err(crate::Error::unauthorized(message))
    } else {
        Err(crate::Error::rejected(status.as_u16(), message))
    }
}

#[async_trait::async_trait]
impl AuthApi for ReqwestClient {
    async fn login(&self, request: &LoginRequest) -> crate::Result<LoginData> {
        self.post("auth/login", request).await
    }

    async fn signup(&self, request: &SignupRequest) -> crate::Result<MessageData> {
        self.post("auth/signup", request).await
    }

    async fn forgot_password(&self, request: &ForgotPasswordRequest) -> crate::Result<MessageData> {
        self.post("auth/forgot-password", request).await
    }

    async fn reset_password(&self, request: &ResetPasswordRequest) -> crate::Result<MessageData> {
        self.post("auth/reset-password", request).await
    }

    async fn profile(&self, token: &str) -> crate::Result<ProfileData> {
        self.get_authenticated("auth/me", token).await
    }
}

#[cfg(test)]
mod tests {
    use gopark_core::Role;

    use super::*;

    #[test]
    fn test_client_creation() {
        let client = ReqwestClient::new(ClientConfig::default()).unwrap();
        assert!(client.config().user_agent.is_none());
    }

    #[test]
    fn test_decode_success() {
        let body = br#"{"data":{"token":"abc","role":"admin"}}"#;
        let data: LoginData = decode_response(StatusCode::OK, body).unwrap();
        assert_eq!(data.role, Role::Admin);
    }

    #[test]
    fn test_decode_unauthorized() {
        let body = br#"{"error":"Wrong password"}"#;
        let error = decode_response::<LoginData>(StatusCode::UNAUTHORIZED, body).unwrap_err();

        assert!(error.is_unauthorized());
        assert_eq!(error.user_message(), "Wrong password");
    }

    #[test]
    fn test_decode_rejection_with_message() {
        let body = br#"{"error":"Email already registered"}"#;
        let error = decode_response::<MessageData>(StatusCode::CONFLICT, body).unwrap_err();

        let crate::Error::Rejected { status, message } = error else {
            panic!("expected a rejection, got {error:?}");
        };
        assert_eq!(status, 409);
        assert_eq!(message, "Email already registered");
    }

    #[test]
    fn test_decode_rejection_without_body() {
        let error = decode_response::<MessageData>(StatusCode::BAD_GATEWAY, b"").unwrap_err();
        assert_eq!(error.user_message(), "Bad Gateway");
    }

    #[test]
    fn test_decode_malformed_success() {
        let error = decode_response::<LoginData>(StatusCode::OK, b"<html>").unwrap_err();
        assert!(matches!(error, crate::Error::Decode(_)));
    }
}
