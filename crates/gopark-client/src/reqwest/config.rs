//! Reqwest client configuration.

use std::time::Duration;

#[cfg(feature = "config")]
use clap::Args;
use serde::{Deserialize, Serialize};
use url::Url;

/// Default timeout for HTTP requests: 30 seconds.
pub const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Default base URL of the authentication API.
pub const DEFAULT_API_URL: &str = "http://localhost:8080/api/";

/// Configuration for the authentication API client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "config", derive(Args))]
pub struct ClientConfig {
    /// Base URL of the authentication API
    #[cfg_attr(
        feature = "config",
        arg(long = "api-url", env = "GOPARK_API_URL", default_value = DEFAULT_API_URL)
    )]
    #[serde(default = "default_api_url")]
    pub api_url: Url,

    /// HTTP request timeout in seconds
    #[cfg_attr(
        feature = "config",
        arg(long = "http-timeout", env = "GOPARK_HTTP_TIMEOUT", default_value = "30")
    )]
    #[serde(default = "default_timeout_secs")]
    pub http_timeout: u64,

    /// User-Agent header to send with requests
    #[cfg_attr(
        feature = "config",
        arg(long = "http-user-agent", env = "GOPARK_HTTP_USER_AGENT")
    )]
    #[serde(default)]
    pub user_agent: Option<String>,
}

fn default_timeout_secs() -> u64 {
    DEFAULT_TIMEOUT_SECS
}

fn default_api_url() -> Url {
    Url::parse(DEFAULT_API_URL).unwrap_or_else(|_| unreachable!("default API url is valid"))
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            http_timeout: default_timeout_secs(),
            user_agent: None,
        }
    }
}

impl ClientConfig {
    /// Creates a configuration for the given API base URL.
    pub fn new(api_url: Url) -> Self {
        Self {
            api_url,
            ..Self::default()
        }
    }

    /// Returns the effective timeout, using default if zero.
    pub fn effective_timeout(&self) -> Duration {
        if self.http_timeout == 0 {
            Duration::from_secs(DEFAULT_TIMEOUT_SECS)
        } else {
            Duration::from_secs(self.http_timeout)
        }
    }

    /// Returns the effective user agent, using default if not set.
    pub fn effective_user_agent(&self) -> String {
        self.user_agent
            .clone()
            .unwrap_or_else(Self::default_user_agent)
    }

    fn default_user_agent() -> String {
        format!("gopark/{}", env!("CARGO_PKG_VERSION"))
    }

    /// Resolves an endpoint path against the base URL.
    ///
    /// The base is treated as a directory even without a trailing slash.
    pub fn endpoint(&self, path: &str) -> Result<Url, url::ParseError> {
        let mut base = self.api_url.clone();
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }
        base.join(path.trim_start_matches('/'))
    }

    /// Set the timeout in seconds.
    #[must_use]
    pub fn with_timeout(mut self, timeout_secs: u64) -> Self {
        self.http_timeout = timeout_secs;
        self
    }

    /// Set the user agent.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }
}
