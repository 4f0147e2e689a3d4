//! Subcommands that talk to the authentication API.

use std::io::Write;

use gopark_client::{AuthApi, AuthSession};
use gopark_session::modal::SessionExpiredModal;

use super::{Context, print_toasts};

pub async fn login<A: AuthApi>(
    auth: &AuthSession<A>,
    out: &mut dyn Write,
    email: &str,
    password: &str,
    remember: bool,
) -> anyhow::Result<()> {
    let result = auth.login(email, password, remember).await;
    print_toasts(&auth.toasts(), out)?;

    let outcome = result.map_err(anyhow::Error::msg)?;
    writeln!(out, "role: {}", outcome.role)?;
    writeln!(out, "redirect: {}", outcome.redirect_to)?;
    Ok(())
}

pub async fn signup<A: AuthApi>(
    auth: &AuthSession<A>,
    out: &mut dyn Write,
    full_name: &str,
    email: &str,
    password: &str,
) -> anyhow::Result<()> {
    let result = auth.signup(full_name, email, password).await;
    print_toasts(&auth.toasts(), out)?;
    result.map(drop).map_err(anyhow::Error::msg)
}

pub async fn forgot_password<A: AuthApi>(
    auth: &AuthSession<A>,
    out: &mut dyn Write,
    email: &str,
) -> anyhow::Result<()> {
    let result = auth.forgot_password(email).await;
    print_toasts(&auth.toasts(), out)?;
    result.map(drop).map_err(anyhow::Error::msg)
}

pub async fn reset_password<A: AuthApi>(
    auth: &AuthSession<A>,
    out: &mut dyn Write,
    token: &str,
    new_password: &str,
) -> anyhow::Result<()> {
    let result = auth.reset_password(token, new_password).await;
    print_toasts(&auth.toasts(), out)?;
    result.map(drop).map_err(anyhow::Error::msg)
}

/// Fetches the profile with the expiry modal attached.
///
/// A rejected token opens the modal, which is acknowledged right away so the
/// stored session ends up cleared.
pub async fn profile<A: AuthApi>(
    context: &Context,
    auth: &AuthSession<A>,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    let modal = SessionExpiredModal::attach(&context.channel, context.coordinator());

    match auth.refresh_profile().await {
        Ok(profile) => {
            writeln!(out, "remote email: {}", profile.email)?;
            writeln!(out, "remote role: {}", profile.role)?;
        }
        Err(message) => writeln!(out, "remote: {message}")?,
    }

    if modal.is_open() {
        writeln!(out, "session expired")?;
        if let Some(report) = modal.acknowledge() {
            writeln!(out, "redirect: {}", report.redirected_to)?;
        }
    }

    Ok(())
}
