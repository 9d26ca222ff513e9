// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Spendlog Store
//!
//! Persistence and state management for Spendlog.
//!
//! This crate provides:
//!
//! - **BlobStore**: String-keyed JSON storage (file or in-memory)
//! - **AuthStore**: Mock session user and token
//! - **ExpenseStore**: Expense CRUD and statistics, as an `ExpenseService`
//! - **SavingsStore**: Savings goals with contribution logs
//! - **AppState**: Cached data with watch-channel change notification
//! - **SettingsStore**: User preferences with persistence
//!
//! ## Usage
//!
//! ```ignore
//! use spendlog_store::{AppState, AuthStore, ExpenseStore, FileBlobStore, SavingsStore};
//! use std::sync::Arc;
//!
//! let blob = Arc::new(FileBlobStore::open(data_dir).await?);
//! let state = AppState::new(
//!     Arc::new(ExpenseStore::new(blob.clone())),
//!     Arc::new(SavingsStore::new(blob.clone())),
//!     Arc::new(AuthStore::new(blob)),
//! );
//!
//! state.refresh_all().await?;
//!
//! let mut rx = state.subscribe();
//! while rx.changed().await.is_ok() {
//!     println!("State updated!");
//! }
//! ```

pub mod app_state;
pub mod auth_store;
pub mod blob;
pub mod error;
pub mod expense_store;
pub mod persistence;
pub mod savings_store;
pub mod schema;
pub mod settings_store;

pub use app_state::{
    ADD_GOAL_ERROR, AppState, CONTRIBUTION_ERROR, DELETE_EXPENSE_ERROR, DELETE_GOAL_ERROR,
    EXPENSES_ERROR, GOALS_ERROR, LOGIN_ERROR, REGISTER_ERROR, SAVE_EXPENSE_ERROR, STATISTICS_ERROR,
    UPDATE_GOAL_ERROR,
};
pub use auth_store::AuthStore;
pub use blob::{BlobStore, FileBlobStore, MemoryBlobStore, keys};
pub use error::StoreError;
pub use expense_store::ExpenseStore;
pub use persistence::{
    default_config_dir, default_data_dir, default_settings_path, load_json, load_json_or_default,
    save_json,
};
pub use savings_store::SavingsStore;
pub use schema::SCHEMA_VERSION;
pub use settings_store::{
    BackendMode, DEFAULT_API_URL, DEFAULT_RECENT_EXPENSE_COUNT, LogLevel, Settings, SettingsStore,
};
