//! User preferences store.
//!
//! Manages user settings with persistence and change notification.

use serde::{Deserialize, Serialize};
use spendlog_core::Timeframe;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::sync::Arc;
use tokio::sync::{RwLock, watch};
use tracing::{debug, info};

use crate::error::StoreError;
use crate::persistence::{
    default_data_dir, default_settings_path, load_json_or_default, save_json,
};

/// Base URL of the REST backend when none is configured.
pub const DEFAULT_API_URL: &str = "http://localhost:5000/api";

/// Number of expenses shown in the recent list by default.
pub const DEFAULT_RECENT_EXPENSE_COUNT: usize = 5;

// ============================================================================
// Settings Types
// ============================================================================

/// User preferences.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Where expenses are kept.
    pub backend: BackendMode,

    /// Base URL of the REST backend.
    pub api_url: String,

    /// Blob store directory override.
    pub data_dir: Option<PathBuf>,

    /// Log level.
    pub log_level: LogLevel,

    /// How many expenses the dashboard lists.
    pub recent_expense_count: usize,

    /// Timeframe used when none is given.
    pub default_timeframe: Timeframe,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            backend: BackendMode::default(),
            api_url: DEFAULT_API_URL.to_string(),
            data_dir: None,
            log_level: LogLevel::default(),
            recent_expense_count: DEFAULT_RECENT_EXPENSE_COUNT,
            default_timeframe: Timeframe::default(),
        }
    }
}

impl Settings {
    /// Blob store directory: the override, or the platform default.
    pub fn resolved_data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(default_data_dir)
    }
}

/// Expense backend selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum BackendMode {
    /// Blob store on this machine.
    #[default]
    Local,
    /// REST backend at `api_url`.
    Remote,
}

impl std::fmt::Display for BackendMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendMode::Local => write!(f, "local"),
            BackendMode::Remote => write!(f, "remote"),
        }
    }
}

impl FromStr for BackendMode {
    type Err = StoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" => Ok(BackendMode::Local),
            "remote" => Ok(BackendMode::Remote),
            other => Err(StoreError::Config(format!(
                "unknown backend '{other}' (expected local or remote)"
            ))),
        }
    }
}

/// Log level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum LogLevel {
    /// Error level logging.
    Error,
    /// Warning level logging.
    #[default]
    Warn,
    /// Info level logging.
    Info,
    /// Debug level logging.
    Debug,
    /// Trace level logging.
    Trace,
}

impl LogLevel {
    /// The level as an env-filter directive.
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

// ============================================================================
// Settings Store
// ============================================================================

/// Persistent settings store with change notifications.
pub struct SettingsStore {
    settings: Arc<RwLock<Settings>>,
    path: PathBuf,
    notify: watch::Sender<u64>,
    version: Arc<RwLock<u64>>,
}

impl SettingsStore {
    /// Creates a new settings store with defaults.
    pub fn new(path: PathBuf) -> Self {
        Self::with_settings(path, Settings::default())
    }

    fn with_settings(path: PathBuf, settings: Settings) -> Self {
        let (notify, _) = watch::channel(0);
        Self {
            settings: Arc::new(RwLock::new(settings)),
            path,
            notify,
            version: Arc::new(RwLock::new(0)),
        }
    }

    /// Loads settings from the default path.
    ///
    /// # Errors
    ///
    /// Returns error if settings cannot be loaded from disk.
    pub async fn load_default() -> Result<Self, StoreError> {
        Self::load(default_settings_path()).await
    }

    /// Loads settings from a path.
    ///
    /// A missing or unreadable file yields defaults.
    ///
    /// # Errors
    ///
    /// Returns error if settings cannot be loaded from disk.
    pub async fn load(path: PathBuf) -> Result<Self, StoreError> {
        let settings = if path.exists() {
            info!(path = %path.display(), "Loading settings");
            load_json_or_default(&path).await
        } else {
            debug!(path = %path.display(), "Settings file not found, using defaults");
            Settings::default()
        };

        Ok(Self::with_settings(path, settings))
    }

    /// Path of the settings file.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Gets a copy of the current settings.
    pub async fn get(&self) -> Settings {
        self.settings.read().await.clone()
    }

    /// Updates settings and notifies subscribers.
    pub async fn update<F>(&self, f: F)
    where
        F: FnOnce(&mut Settings),
    {
        {
            let mut settings = self.settings.write().await;
            f(&mut settings);
        }
        self.notify_change().await;
    }

    /// Restores defaults and notifies subscribers.
    pub async fn reset(&self) {
        self.update(|s| *s = Settings::default()).await;
    }

    /// Saves settings to disk.
    ///
    /// # Errors
    ///
    /// Returns error if settings cannot be written to disk.
    pub async fn save(&self) -> Result<(), StoreError> {
        let settings = self.settings.read().await;
        save_json(&self.path, &*settings).await?;
        info!(path = %self.path.display(), "Settings saved");
        Ok(())
    }

    /// Subscribes to settings changes.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.notify.subscribe()
    }

    async fn notify_change(&self) {
        let mut version = self.version.write().await;
        *version += 1;
        let _ = self.notify.send(*version);
    }

    // ========================================================================
    // Convenience Methods
    // ========================================================================

    /// Selected expense backend.
    pub async fn backend(&self) -> BackendMode {
        self.settings.read().await.backend
    }

    /// Selects the expense backend.
    pub async fn set_backend(&self, backend: BackendMode) {
        self.update(|s| s.backend = backend).await;
    }

    /// REST backend base URL.
    pub async fn api_url(&self) -> String {
        self.settings.read().await.api_url.clone()
    }

    /// Sets the REST backend base URL.
    pub async fn set_api_url(&self, url: impl Into<String>) {
        let url = url.into();
        self.update(|s| s.api_url = url).await;
    }

    /// Resolved blob store directory.
    pub async fn data_dir(&self) -> PathBuf {
        self.settings.read().await.resolved_data_dir()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.backend, BackendMode::Local);
        assert_eq!(settings.api_url, DEFAULT_API_URL);
        assert_eq!(settings.recent_expense_count, 5);
        assert_eq!(settings.default_timeframe, Timeframe::Month);
        assert_eq!(settings.resolved_data_dir(), default_data_dir());
    }

    #[test]
    fn test_backend_mode_parse() {
        assert_eq!("local".parse::<BackendMode>().unwrap(), BackendMode::Local);
        assert_eq!(" Remote ".parse::<BackendMode>().unwrap(), BackendMode::Remote);
        assert!(matches!("cloud".parse::<BackendMode>(), Err(StoreError::Config(_))));
    }

    #[test]
    fn test_partial_settings_use_defaults() {
        let settings: Settings = serde_json::from_str(r#"{"backend": "remote"}"#).unwrap();
        assert_eq!(settings.backend, BackendMode::Remote);
        assert_eq!(settings.api_url, DEFAULT_API_URL);
        assert_eq!(settings.log_level, LogLevel::Warn);
    }

    #[tokio::test]
    async fn test_settings_store_update_notifies() {
        let store = SettingsStore::new(PathBuf::from("/tmp/spendlog_test_settings.json"));
        let mut rx = store.subscribe();

        store.set_backend(BackendMode::Remote).await;

        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), 1);
        assert_eq!(store.backend().await, BackendMode::Remote);
    }

    #[tokio::test]
    async fn test_reset_restores_defaults() {
        let store = SettingsStore::new(PathBuf::from("/tmp/spendlog_test_settings.json"));
        store.set_api_url("https://example.com/api").await;
        store.reset().await;
        assert_eq!(store.get().await, Settings::default());
    }

    #[tokio::test]
    async fn test_save_and_reload() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("settings.json");

        let store = SettingsStore::new(path.clone());
        store.set_api_url("https://example.com/api").await;
        store
            .update(|s| s.data_dir = Some(PathBuf::from("/srv/spendlog")))
            .await;
        store.save().await.unwrap();

        let reloaded = SettingsStore::load(path).await.unwrap();
        assert_eq!(reloaded.api_url().await, "https://example.com/api");
        assert_eq!(reloaded.data_dir().await, PathBuf::from("/srv/spendlog"));
    }

    #[tokio::test]
    async fn test_corrupt_file_falls_back_to_defaults() {
        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("settings.json");
        tokio::fs::write(&path, "not json").await.unwrap();

        let store = SettingsStore::load(path).await.unwrap();
        assert_eq!(store.get().await, Settings::default());
    }
}
