//! Savings goal types.
//!
//! - [`SavingsGoal`] - A goal with its append-only contribution log
//! - [`Contribution`] - One deposit towards a goal
//! - [`NewGoal`], [`GoalPatch`], [`NewContribution`] - Request payloads

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::CoreError;
use crate::ids::new_id;
use crate::models::expense::validate_amount;

/// Note attached to the contribution recorded for a goal's starting balance.
pub const OPENING_BALANCE_NOTE: &str = "Opening balance";

// ============================================================================
// Contribution
// ============================================================================

/// A single deposit towards a savings goal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Contribution {
    /// Unique identifier.
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    /// Amount deposited. Always positive.
    pub amount: f64,
    /// When the deposit was made.
    pub date: DateTime<Utc>,
    /// Optional note.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// Payload for a new contribution.
///
/// Missing id and date are filled in when the contribution is recorded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewContribution {
    /// Amount deposited.
    pub amount: f64,
    /// When the deposit was made (defaults to now).
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<DateTime<Utc>>,
    /// Optional note.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

impl NewContribution {
    /// Creates a contribution payload for the given amount.
    pub fn new(amount: f64) -> Self {
        Self {
            amount,
            date: None,
            note: None,
        }
    }

    /// Sets the note.
    #[must_use]
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.note = Some(note.into());
        self
    }

    /// Sets the deposit time.
    #[must_use]
    pub fn with_date(mut self, date: DateTime<Utc>) -> Self {
        self.date = Some(date);
        self
    }

    /// Checks that the amount is positive.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Validation`] for a non-positive or non-finite amount.
    pub fn validate(&self) -> Result<(), CoreError> {
        validate_amount("contribution amount", self.amount)
    }

    /// Turns the payload into a stored contribution, filling id and date.
    pub fn into_contribution(self, now: DateTime<Utc>) -> Contribution {
        Contribution {
            id: new_id(),
            amount: self.amount,
            date: self.date.unwrap_or(now),
            note: self.note,
        }
    }
}

// ============================================================================
// Savings Goal
// ============================================================================

/// A savings goal and its contribution log.
///
/// `current_amount` always equals the sum of `contributions`. It is only
/// changed through [`SavingsGoal::record_contribution`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavingsGoal {
    /// Unique identifier.
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    /// Goal title, e.g. "Emergency Fund".
    pub title: String,
    /// Amount to reach.
    pub target_amount: f64,
    /// Amount saved so far.
    #[serde(default)]
    pub current_amount: f64,
    /// Free-form category label.
    #[serde(default)]
    pub category: String,
    /// Day the goal should be reached.
    pub target_date: NaiveDate,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Deposits in insertion order.
    #[serde(default)]
    pub contributions: Vec<Contribution>,
}

impl SavingsGoal {
    /// Builds a stored goal from a creation payload.
    ///
    /// Supplied contributions are kept in order. A starting balance becomes an
    /// opening contribution so the running total matches the log.
    pub fn from_new(id: impl Into<String>, new: NewGoal, now: DateTime<Utc>) -> Self {
        let mut goal = Self {
            id: id.into(),
            title: new.title,
            target_amount: new.target_amount,
            current_amount: 0.0,
            category: new.category,
            target_date: new.target_date,
            description: new.description,
            contributions: Vec::new(),
        };

        if let Some(initial) = new.initial_amount.filter(|a| *a > 0.0) {
            goal.record_contribution(
                NewContribution::new(initial)
                    .with_note(OPENING_BALANCE_NOTE)
                    .into_contribution(now),
            );
        }
        for contribution in new.contributions {
            goal.record_contribution(contribution.into_contribution(now));
        }
        goal
    }

    /// Appends a contribution and bumps the running total.
    pub fn record_contribution(&mut self, contribution: Contribution) {
        self.current_amount += contribution.amount;
        self.contributions.push(contribution);
    }

    /// Shallow-merges a patch. Amounts and contributions are untouched.
    pub fn apply(&mut self, patch: &GoalPatch) {
        if let Some(title) = &patch.title {
            self.title.clone_from(title);
        }
        if let Some(target) = patch.target_amount {
            self.target_amount = target;
        }
        if let Some(category) = &patch.category {
            self.category.clone_from(category);
        }
        if let Some(date) = patch.target_date {
            self.target_date = date;
        }
        if let Some(description) = &patch.description {
            self.description.clone_from(description);
        }
    }

    /// Sum of the contribution log.
    pub fn contributions_total(&self) -> f64 {
        self.contributions.iter().map(|c| c.amount).sum()
    }

    /// Percentage of the target reached, clamped to [0, 100].
    pub fn progress_percent(&self) -> f64 {
        if self.target_amount <= 0.0 {
            return 0.0;
        }
        (self.current_amount / self.target_amount * 100.0).clamp(0.0, 100.0)
    }

    /// Amount still needed. Zero once the goal is reached.
    pub fn remaining(&self) -> f64 {
        (self.target_amount - self.current_amount).max(0.0)
    }

    /// Returns true once the target has been reached.
    pub fn is_complete(&self) -> bool {
        self.current_amount >= self.target_amount
    }

    /// Checks the goal's field constraints.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Validation`] for an empty title, a non-positive
    /// target or a negative balance.
    pub fn validate(&self) -> Result<(), CoreError> {
        validate_title(&self.title)?;
        validate_amount("target amount", self.target_amount)?;
        if self.current_amount < 0.0 || !self.current_amount.is_finite() {
            return Err(CoreError::Validation(format!(
                "current amount {} must be a non-negative number",
                self.current_amount
            )));
        }
        Ok(())
    }
}

// ============================================================================
// Payloads
// ============================================================================

/// Creation payload for a savings goal.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewGoal {
    /// Goal title.
    pub title: String,
    /// Amount to reach.
    pub target_amount: f64,
    /// Free-form category label.
    #[serde(default)]
    pub category: String,
    /// Day the goal should be reached.
    pub target_date: NaiveDate,
    /// Free-form description.
    #[serde(default)]
    pub description: String,
    /// Starting balance, recorded as an opening contribution.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initial_amount: Option<f64>,
    /// Contributions to seed the log with.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub contributions: Vec<NewContribution>,
}

impl NewGoal {
    /// Creates a payload with no starting balance.
    pub fn new(title: impl Into<String>, target_amount: f64, target_date: NaiveDate) -> Self {
        Self {
            title: title.into(),
            target_amount,
            category: String::new(),
            target_date,
            description: String::new(),
            initial_amount: None,
            contributions: Vec::new(),
        }
    }

    /// Sets the category label.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = category.into();
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Sets a starting balance.
    #[must_use]
    pub fn with_initial_amount(mut self, amount: f64) -> Self {
        self.initial_amount = Some(amount);
        self
    }

    /// Checks the payload's field constraints.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Validation`] for an empty title, a non-positive
    /// target, a negative starting balance or an invalid seeded contribution.
    pub fn validate(&self) -> Result<(), CoreError> {
        validate_title(&self.title)?;
        validate_amount("target amount", self.target_amount)?;
        if let Some(initial) = self.initial_amount {
            if initial < 0.0 || !initial.is_finite() {
                return Err(CoreError::Validation(format!(
                    "initial amount {initial} must be a non-negative number"
                )));
            }
        }
        for contribution in &self.contributions {
            contribution.validate()?;
        }
        Ok(())
    }
}

/// Partial update for a savings goal.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GoalPatch {
    /// New title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    /// New target amount.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_amount: Option<f64>,
    /// New category label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    /// New target date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub target_date: Option<NaiveDate>,
    /// New description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl GoalPatch {
    /// Returns true if the patch carries no fields.
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.target_amount.is_none()
            && self.category.is_none()
            && self.target_date.is_none()
            && self.description.is_none()
    }
}

fn validate_title(title: &str) -> Result<(), CoreError> {
    if title.trim().is_empty() {
        return Err(CoreError::Validation("title must not be empty".to_string()));
    }
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
