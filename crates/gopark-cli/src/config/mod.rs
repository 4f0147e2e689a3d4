//! CLI configuration management.
//!
//! This module defines the complete CLI configuration hierarchy:
//!
//! ```text
//! Cli
//! ├── session: SessionConfig # Store path, remember key
//! ├── client: ClientConfig   # API base URL, timeout, user agent
//! └── command: Command       # Subcommand to run
//! ```
//!
//! All global options can be provided via CLI arguments or environment variables.
//!
//! # Example
//!
//! ```bash
//! gopark --store-path ~/.gopark/session.json login --email owner@gopark.app --password ...
//!
//! # Or via environment variables
//! GOPARK_STORE=~/.gopark/session.json GOPARK_API_URL=https://gopark.app/api/ gopark status
//! ```

mod command;
mod session;

use std::process;

use anyhow::Context;
use clap::Parser;
pub use command::{Command, GuardArgs};
use gopark_client::reqwest::ClientConfig;
pub use session::SessionConfig;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::{TRACING_TARGET_CONFIG, TRACING_TARGET_STARTUP};

/// Complete CLI configuration.
#[derive(Debug, Clone, Parser)]
#[command(name = "gopark")]
#[command(about = "GoPark client session tool")]
#[command(version)]
pub struct Cli {
    /// Credential storage configuration.
    #[clap(flatten)]
    pub session: SessionConfig,

    /// Authentication API client configuration.
    #[clap(flatten)]
    pub client: ClientConfig,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Command,
}

impl Cli {
    /// Loads environment variables from .env file (if enabled) and parses CLI arguments.
    pub fn init() -> Self {
        Self::load_dotenv();
        Self::parse()
    }

    /// Loads environment variables from .env file if the dotenv feature is enabled.
    #[cfg(feature = "dotenv")]
    fn load_dotenv() {
        if let Err(err) = dotenvy::dotenv()
            && !err.not_found()
        {
            eprintln!("Warning: failed to load .env file: {err}");
        }
    }

    /// No-op when dotenv feature is disabled.
    #[cfg(not(feature = "dotenv"))]
    fn load_dotenv() {}

    /// Initializes tracing with environment-based filtering.
    ///
    /// Logs go to stderr so command output stays clean on stdout.
    pub fn init_tracing() {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));

        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
            .init();
    }

    /// Logs build information at debug level.
    fn log_build_info() {
        tracing::debug!(
            target: TRACING_TARGET_STARTUP,
            version = env!("CARGO_PKG_VERSION"),
            pid = process::id(),
            arch = std::env::consts::ARCH,
            os = std::env::consts::OS,
            features = ?Self::enabled_features(),
            "Build information"
        );
    }

    /// Validates all configuration values.
    pub fn validate(&self) -> anyhow::Result<()> {
        self.session
            .remember_policy()
            .context("invalid session configuration")?;
        self.command.validate()?;
        Ok(())
    }

    /// Logs configuration at debug level (no sensitive information).
    pub fn log(&self) {
        Self::log_build_info();
        self.session.log();

        tracing::debug!(
            target: TRACING_TARGET_CONFIG,
            api_url = %self.client.api_url,
            http_timeout_secs = self.client.http_timeout,
            command = self.command.name(),
            "Client configuration"
        );
    }

    /// Returns a list of enabled compile-time features.
    fn enabled_features() -> Vec<&'static str> {
        [cfg!(feature = "dotenv").then_some("dotenv")]
            .into_iter()
            .flatten()
            .collect()
    }
}
