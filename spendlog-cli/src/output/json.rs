//! JSON output formatting.

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Serialize, Serializer};
use spendlog_core::{Expense, SavingsGoal, Statistics, User};

// ============================================================================
// Output Types
// ============================================================================

/// A goal with its derived progress figures.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalOutput {
    #[serde(flatten)]
    pub goal: SavingsGoal,
    pub progress_percent: f64,
    pub remaining: f64,
    pub complete: bool,
}

impl From<&SavingsGoal> for GoalOutput {
    fn from(goal: &SavingsGoal) -> Self {
        Self {
            goal: goal.clone(),
            progress_percent: goal.progress_percent(),
            remaining: goal.remaining(),
            complete: goal.is_complete(),
        }
    }
}

/// Signed-in user, without the token.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserOutput {
    pub id: String,
    pub name: String,
    pub email: String,
}

impl From<&User> for UserOutput {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.clone(),
            name: user.name.clone(),
            email: user.email.clone(),
        }
    }
}

/// Session status.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionOutput {
    pub authenticated: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserOutput>,
}

/// Everything the dashboard shows.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardOutput {
    pub backend: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<UserOutput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub statistics: Option<Statistics>,
    pub recent_expenses: Vec<Expense>,
    pub goals: Vec<GoalOutput>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none", serialize_with = "serialize_datetime_opt")]
    pub updated_at: Option<DateTime<Utc>>,
}

/// Result of a delete.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeletedOutput {
    pub id: String,
    pub deleted: bool,
}

// ============================================================================
// Serialization helpers
// ============================================================================

#[allow(clippy::ref_option)]
fn serialize_datetime_opt<S>(dt: &Option<DateTime<Utc>>, s: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    match dt {
        Some(dt) => s.serialize_str(&dt.to_rfc3339()),
        None => s.serialize_none(),
    }
}

// ============================================================================
// JSON Formatter
// ============================================================================

/// JSON formatter.
pub struct JsonFormatter {
    pretty: bool,
}

impl JsonFormatter {
    /// Creates a new JSON formatter.
    pub fn new(pretty: bool) -> Self {
        Self { pretty }
    }

    /// Formats any serializable value.
    pub fn format<T: Serialize + ?Sized>(&self, data: &T) -> Result<String> {
        let json = if self.pretty {
            serde_json::to_string_pretty(data)?
        } else {
            serde_json::to_string(data)?
        };
        Ok(json)
    }

    /// Formats goals with their progress figures.
    pub fn format_goals(&self, goals: &[SavingsGoal]) -> Result<String> {
        let outputs: Vec<GoalOutput> = goals.iter().map(GoalOutput::from).collect();
        self.format(&outputs)
    }

    /// Formats the session status.
    pub fn format_session(&self, user: Option<&User>) -> Result<String> {
        self.format(&SessionOutput {
            authenticated: user.is_some(),
            user: user.map(UserOutput::from),
        })
    }
}
