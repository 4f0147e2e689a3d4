//! Subcommands that only touch the local session.

use std::io::Write;

use gopark_core::crypto::EncryptionKey;
use gopark_session::credential::{RememberedLogins, SessionRepository};
use gopark_session::guard::{GuardState, RoleGuard};
use gopark_session::logout::LogoutOptions;
use gopark_session::modal::SessionExpiredModal;

use super::Context;
use crate::TRACING_TARGET_COMMAND;
use crate::config::GuardArgs;

pub fn status(context: &Context, out: &mut dyn Write) -> anyhow::Result<()> {
    let role = context.store.get_role()?;
    let has_token = context.store.has_token()?;
    let remembered = context.store.get_remembered()?;

    writeln!(out, "role: {role}")?;
    writeln!(out, "token: {}", if has_token { "present" } else { "absent" })?;
    match remembered {
        Some(login) => writeln!(out, "remembered: {}", login.email)?,
        None => writeln!(out, "remembered: none")?,
    }
    Ok(())
}

pub fn logout(context: &Context, out: &mut dyn Write, forget: bool) -> anyhow::Result<()> {
    let options = LogoutOptions::to_login(&context.routes).forget_login(forget);
    let report = context.coordinator().logout(&options);

    for step in &report.failed {
        writeln!(out, "warning: could not clear {step}")?;
    }
    writeln!(out, "redirect: {}", report.redirected_to)?;
    Ok(())
}

pub fn guard(context: &Context, out: &mut dyn Write, args: &GuardArgs) -> anyhow::Result<()> {
    let mut guard = RoleGuard::mount(args.policy(), context.routes.clone(), &args.path);

    match guard.hydrate(context.store.as_ref(), context.navigator.as_ref()) {
        GuardState::Allowed => writeln!(out, "allowed")?,
        GuardState::Redirecting {
            destination,
            navigated: true,
        } => writeln!(out, "redirect: {destination}")?,
        GuardState::Redirecting {
            destination,
            navigated: false,
        } => writeln!(out, "blocked: redirect to {destination} suppressed")?,
        state => {
            tracing::warn!(target: TRACING_TARGET_COMMAND, ?state, "guard did not settle");
            writeln!(out, "blocked")?;
        }
    }
    Ok(())
}

pub fn expire(context: &Context, out: &mut dyn Write) -> anyhow::Result<()> {
    let modal = SessionExpiredModal::attach(&context.channel, context.coordinator());

    context.channel.raise_expired();
    context.channel.raise_expired();
    writeln!(
        out,
        "modal: {} (opened {} time, {} duplicate raise ignored)",
        modal.phase(),
        modal.times_opened(),
        modal.ignored_raises()
    )?;

    if !modal.dismiss() {
        writeln!(out, "dismiss: refused")?;
    }

    if let Some(report) = modal.acknowledge() {
        writeln!(out, "redirect: {}", report.redirected_to)?;
    }
    writeln!(out, "modal: {}", modal.phase())?;
    Ok(())
}

pub fn keygen(out: &mut dyn Write) -> anyhow::Result<()> {
    writeln!(out, "{}", EncryptionKey::generate().to_base64())?;
    Ok(())
}
