//! Wires settings, blob storage and the expense backend into an [`AppState`].

use anyhow::{Context, Result};
use spendlog_core::ExpenseService;
use spendlog_fetch::RemoteExpenseService;
use spendlog_store::{
    AppState, AuthStore, BackendMode, BlobStore, ExpenseStore, FileBlobStore, SavingsStore,
    Settings, SettingsStore,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

use crate::Cli;

/// Data directory: the `--data-dir` flag wins over settings.
pub fn data_dir(cli: &Cli, settings: &Settings) -> PathBuf {
    cli.data_dir
        .clone()
        .unwrap_or_else(|| settings.resolved_data_dir())
}

/// Opens the stores and restores any saved session.
pub async fn open(cli: &Cli, settings: &SettingsStore) -> Result<AppState> {
    let settings = settings.get().await;
    let dir = data_dir(cli, &settings);
    let state = open_at(&dir, &settings).await?;
    state.restore_session().await?;
    Ok(state)
}

/// Builds an [`AppState`] over the blob store at `dir`.
pub async fn open_at(dir: &Path, settings: &Settings) -> Result<AppState> {
    let blob: Arc<dyn BlobStore> = Arc::new(
        FileBlobStore::open(dir)
            .await
            .with_context(|| format!("cannot open data directory {}", dir.display()))?,
    );
    debug!(dir = %dir.display(), backend = %settings.backend, "Opening stores");

    let auth = Arc::new(AuthStore::new(Arc::clone(&blob)));
    let savings = Arc::new(SavingsStore::new(Arc::clone(&blob)));

    let expenses: Arc<dyn ExpenseService> = match settings.backend {
        BackendMode::Local => Arc::new(ExpenseStore::new(blob)),
        BackendMode::Remote => {
            let token = auth.token().await?;
            Arc::new(
                RemoteExpenseService::new(&settings.api_url, token)
                    .with_context(|| format!("invalid api_url {}", settings.api_url))?,
            )
        }
    };

    Ok(AppState::new(expenses, savings, auth))
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use tempfile::TempDir;

    #[test]
    fn test_flag_overrides_settings_dir() {
        let settings = Settings {
            data_dir: Some(PathBuf::from("/from/settings")),
            ..Settings::default()
        };

        let cli = Cli::try_parse_from(["spendlog", "--data-dir", "/from/flag"]).unwrap();
        assert_eq!(data_dir(&cli, &settings), PathBuf::from("/from/flag"));

        let cli = Cli::try_parse_from(["spendlog"]).unwrap();
        assert_eq!(data_dir(&cli, &settings), PathBuf::from("/from/settings"));
    }

    #[tokio::test]
    async fn test_local_backend_by_default() {
        let dir = TempDir::new().unwrap();
        let state = open_at(dir.path(), &Settings::default()).await.unwrap();
        assert_eq!(state.backend_name(), "local");
    }

    #[tokio::test]
    async fn test_remote_backend_when_configured() {
        let dir = TempDir::new().unwrap();
        let settings = Settings {
            backend: BackendMode::Remote,
            ..Settings::default()
        };
        let state = open_at(dir.path(), &settings).await.unwrap();
        assert_eq!(state.backend_name(), "remote");
    }

    #[tokio::test]
    async fn test_bad_api_url_is_reported() {
        let dir = TempDir::new().unwrap();
        let settings = Settings {
            backend: BackendMode::Remote,
            api_url: "not a url".to_string(),
            ..Settings::default()
        };
        assert!(open_at(dir.path(), &settings).await.is_err());
    }
}
