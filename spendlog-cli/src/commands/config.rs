//! Config command - manage configuration.

use anyhow::{Context, Result};
use clap::{Args, Subcommand};
use spendlog_fetch::HttpClient;
use spendlog_store::{BackendMode, SettingsStore, default_config_dir};
use tracing::info;

use crate::output::JsonFormatter;
use crate::{Cli, OutputFormat, context};

/// Arguments for the config command.
#[derive(Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub action: ConfigAction,
}

/// Config subcommands.
#[derive(Subcommand)]
pub enum ConfigAction {
    /// Show current configuration.
    Show,

    /// Show configuration and data paths.
    Path,

    /// Choose where expenses are kept.
    Backend {
        /// local or remote.
        mode: BackendMode,
    },

    /// Set the REST backend base URL.
    ApiUrl {
        /// Base URL, e.g. http://localhost:5000/api.
        url: String,
    },

    /// Reset to defaults.
    Reset,
}

/// Runs the config command.
pub async fn run(args: &ConfigArgs, cli: &Cli, settings: &SettingsStore) -> Result<()> {
    match &args.action {
        ConfigAction::Show => show_config(cli, settings).await,
        ConfigAction::Path => show_paths(cli, settings).await,
        ConfigAction::Backend { mode } => set_backend(*mode, settings).await,
        ConfigAction::ApiUrl { url } => set_api_url(url, settings).await,
        ConfigAction::Reset => reset_config(settings).await,
    }
}

async fn show_config(cli: &Cli, store: &SettingsStore) -> Result<()> {
    let settings = store.get().await;

    match cli.format {
        OutputFormat::Text => {
            println!("Spendlog Configuration");
            println!("{}", "─".repeat(40));
            println!();
            println!("Backend:           {}", settings.backend);
            println!("API URL:           {}", settings.api_url);
            println!("Data dir:          {}", context::data_dir(cli, &settings).display());
            println!("Log level:         {}", settings.log_level);
            println!("Default timeframe: {}", settings.default_timeframe);
            println!("Recent expenses:   {}", settings.recent_expense_count);
        }
        OutputFormat::Json => {
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format(&settings)?);
        }
    }

    Ok(())
}

async fn show_paths(cli: &Cli, store: &SettingsStore) -> Result<()> {
    let config_dir = default_config_dir();
    let settings_path = store.path();
    let data_dir = context::data_dir(cli, &store.get().await);

    match cli.format {
        OutputFormat::Text => {
            println!("Configuration Paths");
            println!("{}", "─".repeat(40));
            println!();
            println!("Config dir:    {}", config_dir.display());
            println!("Settings file: {}", settings_path.display());
            println!("Data dir:      {}", data_dir.display());
        }
        OutputFormat::Json => {
            let paths = serde_json::json!({
                "config_dir": config_dir.display().to_string(),
                "settings_file": settings_path.display().to_string(),
                "data_dir": data_dir.display().to_string(),
            });
            let formatter = JsonFormatter::new(cli.pretty);
            println!("{}", formatter.format(&paths)?);
        }
    }

    Ok(())
}

async fn set_backend(mode: BackendMode, store: &SettingsStore) -> Result<()> {
    store.set_backend(mode).await;
    store.save().await?;

    info!(backend = %mode, "Backend updated");
    println!("Backend set to: {mode}");

    Ok(())
}

async fn set_api_url(url: &str, store: &SettingsStore) -> Result<()> {
    let client = HttpClient::new(url).with_context(|| format!("invalid API URL: {url}"))?;

    store.set_api_url(url.trim()).await;
    store.save().await?;

    info!(url = %client.base_url(), "API URL updated");
    println!("API URL set to: {}", url.trim());

    Ok(())
}

async fn reset_config(store: &SettingsStore) -> Result<()> {
    store.reset().await;
    store.save().await?;

    info!(path = %store.path().display(), "Settings reset");
    println!("Configuration reset to defaults");

    Ok(())
}
