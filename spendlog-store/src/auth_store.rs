//! Mock authentication store.
//!
//! Keeps the current user and session token in the blob store. Every
//! credential is accepted and the token is a fixed placeholder.

use serde_json::Value;
use spendlog_core::{DEFAULT_USER_NAME, User};
use std::sync::Arc;
use tracing::{debug, info, warn};

use crate::blob::{BlobStore, keys};
use crate::error::StoreError;

/// Current-user and session-token store.
pub struct AuthStore {
    blob: Arc<dyn BlobStore>,
}

impl AuthStore {
    /// Creates an auth store over a blob store.
    pub fn new(blob: Arc<dyn BlobStore>) -> Self {
        Self { blob }
    }

    /// Signs in. Any credentials succeed.
    ///
    /// # Errors
    ///
    /// Returns error if the session cannot be persisted.
    pub async fn login(&self, email: &str, _password: &str) -> Result<User, StoreError> {
        let user = User::mock(DEFAULT_USER_NAME, email);
        self.persist(&user).await?;
        info!(email, "Signed in");
        Ok(user)
    }

    /// Registers and signs in. Same as [`AuthStore::login`] with a chosen name.
    ///
    /// # Errors
    ///
    /// Returns error if the session cannot be persisted.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        _password: &str,
    ) -> Result<User, StoreError> {
        let user = User::mock(username, email);
        self.persist(&user).await?;
        info!(email, name = username, "Registered");
        Ok(user)
    }

    /// Clears the persisted user and token.
    ///
    /// # Errors
    ///
    /// Returns error if the blob store fails.
    pub async fn logout(&self) -> Result<(), StoreError> {
        self.blob.remove(keys::USER).await?;
        self.blob.remove(keys::TOKEN).await?;
        info!("Signed out");
        Ok(())
    }

    /// The saved user, if a session exists.
    ///
    /// A user blob that no longer parses is treated as no session.
    ///
    /// # Errors
    ///
    /// Returns error if the blob store fails.
    pub async fn current_user(&self) -> Result<Option<User>, StoreError> {
        let Some(value) = self.blob.get(keys::USER).await? else {
            debug!("No saved session");
            return Ok(None);
        };
        match serde_json::from_value(value) {
            Ok(user) => Ok(Some(user)),
            Err(e) => {
                warn!(error = %e, "Ignoring unreadable saved user");
                Ok(None)
            }
        }
    }

    /// The saved session token, if any.
    ///
    /// # Errors
    ///
    /// Returns error if the blob store fails.
    pub async fn token(&self) -> Result<Option<String>, StoreError> {
        Ok(match self.blob.get(keys::TOKEN).await? {
            Some(Value::String(token)) => Some(token),
            _ => None,
        })
    }

    /// Returns true if a session token is saved.
    ///
    /// # Errors
    ///
    /// Returns error if the blob store fails.
    pub async fn is_authenticated(&self) -> Result<bool, StoreError> {
        Ok(self.token().await?.is_some())
    }

    async fn persist(&self, user: &User) -> Result<(), StoreError> {
        self.blob.put(keys::USER, serde_json::to_value(user)?).await?;
        self.blob
            .put(keys::TOKEN, Value::String(user.token.clone()))
            .await
    }
}
