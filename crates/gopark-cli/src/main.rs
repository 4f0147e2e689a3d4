#![forbid(unsafe_code)]
#![cfg_attr(docsrs, feature(doc_cfg))]
#![doc = include_str!("../README.md")]

mod command;
mod config;

use std::process;

use crate::config::Cli;

// Tracing target constants
pub const TRACING_TARGET_STARTUP: &str = "gopark_cli::startup";
pub const TRACING_TARGET_COMMAND: &str = "gopark_cli::command";
pub const TRACING_TARGET_CONFIG: &str = "gopark_cli::config";

#[tokio::main]
async fn main() {
    let Err(error) = run().await else {
        process::exit(0);
    };

    if tracing::enabled!(tracing::Level::ERROR) {
        tracing::error!(
            target: TRACING_TARGET_COMMAND,
            error = %error,
            "command failed"
        );
    }
    eprintln!("Error: {error:#}");

    process::exit(1);
}

/// Main application entry point.
async fn run() -> anyhow::Result<()> {
    let cli = Cli::init();

    Cli::init_tracing();
    cli.log();
    cli.validate()?;

    let mut stdout = std::io::stdout().lock();
    command::execute(&cli, &mut stdout).await
}
