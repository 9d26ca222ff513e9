//! Auth command - sign in, register, sign out.

use anyhow::Result;
use clap::{Args, Subcommand};
use spendlog_store::SettingsStore;

use crate::output::JsonFormatter;
use crate::{Cli, OutputFormat, context};

/// Arguments for the auth command.
#[derive(Args)]
pub struct AuthArgs {
    #[command(subcommand)]
    pub action: AuthAction,
}

/// Auth subcommands.
#[derive(Subcommand)]
pub enum AuthAction {
    /// Sign in. Any credentials are accepted.
    Login {
        /// Account email.
        #[arg(long, short = 'e')]
        email: String,

        /// Account password.
        #[arg(long, short = 'p')]
        password: String,
    },

    /// Create an account and sign in.
    Register {
        /// Display name.
        #[arg(long, short = 'u')]
        username: String,

        /// Account email.
        #[arg(long, short = 'e')]
        email: String,

        /// Account password.
        #[arg(long, short = 'p')]
        password: String,
    },

    /// Sign out and forget the session.
    Logout,

    /// Show the signed-in user.
    Whoami,
}

/// Runs the auth command.
pub async fn run(args: &AuthArgs, cli: &Cli, settings: &SettingsStore) -> Result<()> {
    let state = context::open(cli, settings).await?;

    match &args.action {
        AuthAction::Login { email, password } => {
            state.login(email, password).await?;
        }
        AuthAction::Register {
            username,
            email,
            password,
        } => {
            state.register(username, email, password).await?;
        }
        AuthAction::Logout => {
            state.logout().await?;
            if cli.format == OutputFormat::Text {
                println!("Signed out");
                return Ok(());
            }
        }
        AuthAction::Whoami => {}
    }

    let user = state.user().await;
    match cli.format {
        OutputFormat::Json => {
            println!(
                "{}",
                JsonFormatter::new(cli.pretty).format_session(user.as_ref())?
            );
        }
        OutputFormat::Text => {
            println!("{}", super::text(cli).format_session(user.as_ref()));
        }
    }
    Ok(())
}
