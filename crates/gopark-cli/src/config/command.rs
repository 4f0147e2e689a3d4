//! Subcommand definitions.

use clap::{Args, Subcommand};
use gopark_core::Role;
use gopark_session::guard::GuardPolicy;

/// Subcommands of the `gopark` binary.
#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Logs in and stores the issued credentials.
    Login {
        #[arg(long)]
        email: String,
        #[arg(long, env = "GOPARK_PASSWORD", hide_env_values = true)]
        password: String,
        /// Keep the login for prefill on this device.
        #[arg(long)]
        remember: bool,
    },
    /// Registers a new account.
    Signup {
        #[arg(long)]
        full_name: String,
        #[arg(long)]
        email: String,
        #[arg(long, env = "GOPARK_PASSWORD", hide_env_values = true)]
        password: String,
    },
    /// Requests a password reset email.
    ForgotPassword {
        #[arg(long)]
        email: String,
    },
    /// Sets a new password with a reset token.
    ResetPassword {
        #[arg(long)]
        token: String,
        #[arg(long, env = "GOPARK_NEW_PASSWORD", hide_env_values = true)]
        new_password: String,
    },
    /// Clears the stored session.
    Logout {
        /// Also forget the remembered login.
        #[arg(long)]
        forget: bool,
    },
    /// Prints the stored session.
    Status {
        /// Also fetch the profile from the server.
        #[arg(long)]
        remote: bool,
    },
    /// Mounts a role guard and prints its outcome.
    Guard(GuardArgs),
    /// Simulates a session-expired broadcast and acknowledges the modal.
    Expire,
    /// Prints a fresh base64 remember key.
    Keygen,
}

/// Arguments of the `guard` subcommand.
#[derive(Debug, Clone, Args)]
pub struct GuardArgs {
    /// Path the guarded content is displayed at.
    #[arg(long)]
    pub path: String,
    /// Only this role may see the content.
    #[arg(long, required_unless_present = "public_only", conflicts_with = "public_only")]
    pub require: Option<Role>,
    /// Only visitors without a role may see the content.
    #[arg(long)]
    pub public_only: bool,
}

impl GuardArgs {
    /// Returns the policy selected on the command line.
    pub fn policy(&self) -> GuardPolicy {
        match self.require {
            Some(role) => GuardPolicy::require(role),
            None => GuardPolicy::public_only(),
        }
    }
}

impl Command {
    /// Returns the subcommand name used in logs.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Login { .. } => "login",
            Self::Signup { .. } => "signup",
            Self::ForgotPassword { .. } => "forgot-password",
            Self::ResetPassword { .. } => "reset-password",
            Self::Logout { .. } => "logout",
            Self::Status { .. } => "status",
            Self::Guard(_) => "guard",
            Self::Expire => "expire",
            Self::Keygen => "keygen",
        }
    }

    /// Rejects argument combinations clap cannot express.
    pub fn validate(&self) -> anyhow::Result<()> {
        if let Self::Guard(guard) = self {
            anyhow::ensure!(
                guard.path.starts_with('/'),
                "guarded path must start with '/', got {:?}",
                guard.path
            );
        }
        Ok(())
    }
}
