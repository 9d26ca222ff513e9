//! Session user.

use serde::{Deserialize, Serialize};

/// Placeholder session token issued by the local auth store.
pub const MOCK_TOKEN: &str = "mock-jwt-token";

/// Identifier given to the single local user.
pub const MOCK_USER_ID: &str = "1";

/// Display name used when logging in without registering.
pub const DEFAULT_USER_NAME: &str = "Test User";

/// The signed-in user and their session token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    /// User identifier.
    pub id: String,
    /// Display name.
    pub name: String,
    /// Email address used to sign in.
    pub email: String,
    /// Bearer token for the session.
    pub token: String,
}

impl User {
    /// Builds the local mock user for an email and display name.
    pub fn mock(name: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            id: MOCK_USER_ID.to_string(),
            name: name.into(),
            email: email.into(),
            token: MOCK_TOKEN.to_string(),
        }
    }
}
