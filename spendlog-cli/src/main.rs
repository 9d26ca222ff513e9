// Lint configuration for this crate
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! Spendlog CLI - expense and savings-goal tracking from the command line.
//!
//! # Examples
//!
//! ```bash
//! # Sign in (any credentials work)
//! spendlog auth login --email me@example.com --password secret
//!
//! # Log an expense
//! spendlog expense add "Coffee" 50 --category food
//!
//! # This month's statistics
//! spendlog stats --timeframe month
//!
//! # Everything at a glance
//! spendlog dashboard
//!
//! # JSON output
//! spendlog expense list --format json --pretty
//! ```

mod commands;
mod context;
mod output;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use spendlog_store::{LogLevel, SettingsStore};
use std::path::PathBuf;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use commands::{auth, config, dashboard, expense, goal, stats};

// ============================================================================
// CLI Definition
// ============================================================================

/// Spendlog CLI - personal expense tracking.
#[derive(Parser)]
#[command(name = "spendlog")]
#[command(about = "Personal expense and savings-goal tracker")]
#[command(long_about = r#"
Spendlog records expenses, summarizes spending and tracks savings goals.

Expenses live in a local data directory by default, or on a REST backend
when `config backend remote` is set.

Examples:
  spendlog auth login --email me@example.com --password x
  spendlog expense add "Coffee" 50 --category food
  spendlog expense list --category food
  spendlog stats --timeframe week
  spendlog goal add "Emergency Fund" 100000 --target-date 2025-12-31
  spendlog goal contribute <ID> 2500
  spendlog dashboard
"#)]
#[command(version)]
#[command(author = "Spendlog Contributors")]
pub struct Cli {
    /// Subcommand to run. If none, shows the dashboard.
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Output format (text or json).
    #[arg(long, short = 'f', default_value = "text", global = true)]
    pub format: OutputFormat,

    /// Pretty-print JSON output.
    #[arg(long, global = true)]
    pub pretty: bool,

    /// Data directory (overrides the configured one).
    #[arg(long, global = true, value_name = "DIR")]
    pub data_dir: Option<PathBuf>,

    /// Verbose output (show debug info).
    #[arg(long, short, global = true)]
    pub verbose: bool,

    /// Disable colored output.
    #[arg(long, global = true)]
    pub no_color: bool,

    /// Quiet mode (minimal output).
    #[arg(long, short, global = true)]
    pub quiet: bool,
}

/// CLI commands.
#[derive(Subcommand)]
pub enum Commands {
    /// Sign in, register, sign out.
    #[command(visible_alias = "a")]
    Auth(auth::AuthArgs),

    /// Add, list, update and delete expenses.
    #[command(visible_alias = "e")]
    Expense(expense::ExpenseArgs),

    /// Show spending statistics.
    #[command(visible_alias = "s")]
    Stats(stats::StatsArgs),

    /// Manage savings goals.
    #[command(visible_alias = "g")]
    Goal(goal::GoalArgs),

    /// Totals, distribution, recent expenses and goal progress.
    #[command(visible_alias = "d")]
    Dashboard(dashboard::DashboardArgs),

    /// Manage configuration.
    Config(config::ConfigArgs),
}

/// Output format options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Default)]
pub enum OutputFormat {
    /// Human-readable text with colors.
    #[default]
    Text,
    /// JSON output for scripting.
    Json,
}

/// CLI exit codes.
#[repr(i32)]
pub enum ExitCode {
    /// Success.
    Success = 0,
    /// General error.
    Error = 1,
}

// ============================================================================
// Logging Setup
// ============================================================================

fn log_filter(verbose: bool, level: LogLevel) -> EnvFilter {
    if verbose {
        EnvFilter::new("spendlog=debug,info")
    } else {
        EnvFilter::new(format!("spendlog={level}"))
    }
}

fn setup_logging(verbose: bool, quiet: bool, level: LogLevel) {
    if quiet {
        return;
    }

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(log_filter(verbose, level))
        .init();
}

// ============================================================================
// Main Entry Point
// ============================================================================

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let settings = SettingsStore::load_default().await?;
    setup_logging(cli.verbose, cli.quiet, settings.get().await.log_level);

    let result = match &cli.command {
        Some(Commands::Auth(args)) => auth::run(args, &cli, &settings).await,
        Some(Commands::Expense(args)) => expense::run(args, &cli, &settings).await,
        Some(Commands::Stats(args)) => stats::run(args, &cli, &settings).await,
        Some(Commands::Goal(args)) => goal::run(args, &cli, &settings).await,
        Some(Commands::Dashboard(args)) => dashboard::run(args, &cli, &settings).await,
        Some(Commands::Config(args)) => config::run(args, &cli, &settings).await,
        None => dashboard::run(&dashboard::DashboardArgs::default(), &cli, &settings).await,
    };

    if let Err(e) = result {
        if !cli.quiet {
            eprintln!("Error: {e:#}");
        }
        std::process::exit(ExitCode::Error as i32);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "spendlog", "expense", "list", "--format", "json", "--pretty", "--data-dir", "/tmp/x",
        ])
        .unwrap();
        assert_eq!(cli.format, OutputFormat::Json);
        assert!(cli.pretty);
        assert_eq!(cli.data_dir, Some(PathBuf::from("/tmp/x")));
        assert!(matches!(cli.command, Some(Commands::Expense(_))));
    }

    #[test]
    fn test_no_subcommand_defaults_to_dashboard() {
        let cli = Cli::try_parse_from(["spendlog"]).unwrap();
        assert!(cli.command.is_none());
        assert_eq!(cli.format, OutputFormat::Text);
    }

    #[test]
    fn test_log_filter_uses_configured_level() {
        assert!(log_filter(false, LogLevel::Info).to_string().contains("spendlog=info"));
        assert!(log_filter(true, LogLevel::Error).to_string().contains("spendlog=debug"));
    }
}
