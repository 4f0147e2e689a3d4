//! Subcommand execution.

mod auth;
mod session;

use std::io::Write;
use std::sync::Arc;

use anyhow::Context as _;
use gopark_client::AuthSession;
use gopark_client::reqwest::{ClientConfig, ReqwestClient};
use gopark_core::{Routes, ToastQueue};
use gopark_session::channel::SessionChannel;
use gopark_session::credential::CredentialStore;
use gopark_session::logout::LogoutCoordinator;
use gopark_session::navigation::HistoryNavigator;
use gopark_session::storage::FileStorage;

use crate::TRACING_TARGET_COMMAND;
use crate::config::{Cli, Command, SessionConfig};

/// Collaborators shared by every subcommand.
pub struct Context {
    pub store: Arc<CredentialStore>,
    pub channel: SessionChannel,
    pub navigator: Arc<HistoryNavigator>,
    pub routes: Routes,
}

impl Context {
    /// Opens the session file and wires the session layer around it.
    pub fn open(config: &SessionConfig, start: &str) -> anyhow::Result<Self> {
        let storage = FileStorage::open(&config.store_path).with_context(|| {
            format!("failed to open session store {}", config.store_path.display())
        })?;
        let policy = config.remember_policy()?;

        Ok(Self {
            store: Arc::new(CredentialStore::with_policy(Arc::new(storage), policy)),
            channel: SessionChannel::new(),
            navigator: Arc::new(HistoryNavigator::new(start)),
            routes: Routes::default(),
        })
    }

    /// Builds a logout coordinator over this context.
    pub fn coordinator(&self) -> LogoutCoordinator {
        LogoutCoordinator::new(
            self.store.clone(),
            self.navigator.clone(),
            self.channel.clone(),
            self.routes.clone(),
        )
    }

    /// Builds the login session service against the configured API.
    pub fn auth_session(
        &self,
        client: &ClientConfig,
    ) -> anyhow::Result<AuthSession<ReqwestClient>> {
        let api = ReqwestClient::new(client.clone()).context("failed to create API client")?;
        Ok(AuthSession::new(
            api,
            self.store.clone(),
            self.channel.clone(),
            self.routes.clone(),
        ))
    }
}

/// Runs the selected subcommand, writing its output to `out`.
pub async fn execute(cli: &Cli, out: &mut dyn Write) -> anyhow::Result<()> {
    tracing::debug!(
        target: TRACING_TARGET_COMMAND,
        command = cli.command.name(),
        "executing command"
    );

    let open = |start: &str| Context::open(&cli.session, start);

    match &cli.command {
        Command::Login {
            email,
            password,
            remember,
        } => {
            let auth = open("/")?.auth_session(&cli.client)?;
            auth::login(&auth, out, email, password, *remember).await
        }
        Command::Signup {
            full_name,
            email,
            password,
        } => {
            let auth = open("/")?.auth_session(&cli.client)?;
            auth::signup(&auth, out, full_name, email, password).await
        }
        Command::ForgotPassword { email } => {
            let auth = open("/")?.auth_session(&cli.client)?;
            auth::forgot_password(&auth, out, email).await
        }
        Command::ResetPassword {
            token,
            new_password,
        } => {
            let auth = open("/")?.auth_session(&cli.client)?;
            auth::reset_password(&auth, out, token, new_password).await
        }
        Command::Status { remote } => {
            let context = open("/")?;
            session::status(&context, out)?;
            if *remote {
                let auth = context.auth_session(&cli.client)?;
                auth::profile(&context, &auth, out).await?;
            }
            Ok(())
        }
        Command::Logout { forget } => session::logout(&open("/")?, out, *forget),
        Command::Guard(guard) => session::guard(&open(&guard.path)?, out, guard),
        Command::Expire => session::expire(&open("/")?, out),
        Command::Keygen => session::keygen(out),
    }
}

/// Writes queued toasts, oldest first.
fn print_toasts(toasts: &ToastQueue, out: &mut dyn Write) -> anyhow::Result<()> {
    for toast in toasts.iter() {
        writeln!(out, "[{}] {}", toast.severity.as_ref(), toast.message)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use clap::Parser;

    use super::*;

    #[tokio::test]
    async fn test_keygen_does_not_touch_store() {
        let dir = tempfile::tempdir().unwrap();
        let store_path = dir.path().join("session.json");
        let cli = Cli::try_parse_from([
            "gopark",
            "--store-path",
            store_path.to_str().unwrap(),
            "keygen",
        ])
        .unwrap();

        let mut buffer = Vec::new();
        execute(&cli, &mut buffer).await.unwrap();

        assert!(!String::from_utf8(buffer).unwrap().trim().is_empty());
        assert!(!store_path.exists());
    }

    #[tokio::test]
    async fn test_guard_opens_store_at_guarded_path() {
        let dir = tempfile::tempdir().unwrap();
        let store_path = dir.path().join("session.json");
        let cli = Cli::try_parse_from([
            "gopark",
            "--store-path",
            store_path.to_str().unwrap(),
            "guard",
            "--path",
            "/login",
            "--public-only",
        ])
        .unwrap();

        let mut buffer = Vec::new();
        execute(&cli, &mut buffer).await.unwrap();

        assert_eq!(String::from_utf8(buffer).unwrap(), "allowed\n");
    }
}
