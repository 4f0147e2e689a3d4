//! Reqwest-based HTTP transport for the authentication API.
//!
//! # Example
//!
//! ```rust,ignore
//! use gopark_client::reqwest::{ClientConfig, ReqwestClient};
//!
//! let client = ReqwestClient::new(ClientConfig::default())?;
//! ```

mod client;
mod config;
mod error;

pub use client::{REQUEST_ID_HEADER, ReqwestClient};
pub use config::{ClientConfig, DEFAULT_API_URL, DEFAULT_TIMEOUT_SECS};
pub use error::{Error, Result};

/// Tracing target for reqwest client operations.
pub const TRACING_TARGET: &str = "gopark_client::reqwest";
