//! Expense types.
//!
//! This module contains the expense record and the payloads used to create,
//! patch and filter it:
//! - [`ExpenseCategory`] - Fixed set of spending categories
//! - [`Expense`] - A stored expense record
//! - [`NewExpense`] - Creation payload (no id yet)
//! - [`ExpensePatch`] - Partial update, merged field by field
//! - [`ExpenseFilter`] - Category and date-range filter for listings

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

// ============================================================================
// Expense Category
// ============================================================================

/// Spending categories offered by the expense form.
///
/// The declaration order is also the tie-break order used by the statistics
/// aggregator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ExpenseCategory {
    /// Groceries, restaurants, coffee.
    Food,
    /// Fuel, fares, parking.
    Transportation,
    /// Rent, mortgage, repairs.
    Housing,
    /// Power, water, internet, phone.
    Utilities,
    /// Movies, games, subscriptions.
    Entertainment,
    /// Doctor visits, medicine, insurance.
    Healthcare,
    /// Clothes and general retail.
    Shopping,
    /// Anything else.
    Other,
}

impl ExpenseCategory {
    /// Returns all categories in display order.
    pub fn all() -> &'static [ExpenseCategory] {
        &[
            Self::Food,
            Self::Transportation,
            Self::Housing,
            Self::Utilities,
            Self::Entertainment,
            Self::Healthcare,
            Self::Shopping,
            Self::Other,
        ]
    }

    /// Returns the display name for this category.
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Food => "Food",
            Self::Transportation => "Transportation",
            Self::Housing => "Housing",
            Self::Utilities => "Utilities",
            Self::Entertainment => "Entertainment",
            Self::Healthcare => "Healthcare",
            Self::Shopping => "Shopping",
            Self::Other => "Other",
        }
    }

    /// Position in [`ExpenseCategory::all`].
    pub fn to_index(self) -> usize {
        Self::all().iter().position(|&c| c == self).unwrap_or(0)
    }
}

impl fmt::Display for ExpenseCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for ExpenseCategory {
    type Err = CoreError;

    /// Parses a category name, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Self::all()
            .iter()
            .find(|c| c.display_name().eq_ignore_ascii_case(needle))
            .copied()
            .ok_or_else(|| CoreError::Validation(format!("unknown expense category: {needle}")))
    }
}

// ============================================================================
// Expense
// ============================================================================

/// A single logged expense.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Expense {
    /// Unique identifier assigned at creation.
    #[serde(rename = "_id", alias = "id")]
    pub id: String,
    /// Short description, e.g. "Coffee".
    pub description: String,
    /// Amount spent. Always positive.
    pub amount: f64,
    /// Spending category.
    pub category: ExpenseCategory,
    /// Day the money was spent.
    pub date: NaiveDate,
    /// Free-form notes.
    #[serde(default)]
    pub notes: String,
}

impl Expense {
    /// Builds a stored record from a creation payload and a fresh id.
    pub fn from_new(id: impl Into<String>, new: NewExpense) -> Self {
        Self {
            id: id.into(),
            description: new.description,
            amount: new.amount,
            category: new.category,
            date: new.date,
            notes: new.notes,
        }
    }

    /// Shallow-merges a patch into this record.
    ///
    /// Present fields overwrite, absent fields are kept. The id never changes.
    pub fn apply(&mut self, patch: &ExpensePatch) {
        if let Some(description) = &patch.description {
            self.description.clone_from(description);
        }
        if let Some(amount) = patch.amount {
            self.amount = amount;
        }
        if let Some(category) = patch.category {
            self.category = category;
        }
        if let Some(date) = patch.date {
            self.date = date;
        }
        if let Some(notes) = &patch.notes {
            self.notes.clone_from(notes);
        }
    }

    /// Checks the record's field constraints.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Validation`] for an empty description or a
    /// non-positive amount.
    pub fn validate(&self) -> Result<(), CoreError> {
        validate_description(&self.description)?;
        validate_amount("amount", self.amount)
    }
}

// ============================================================================
// Payloads
// ============================================================================

/// Creation payload for an expense.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewExpense {
    /// Short description.
    pub description: String,
    /// Amount spent.
    pub amount: f64,
    /// Spending category.
    pub category: ExpenseCategory,
    /// Day the money was spent.
    pub date: NaiveDate,
    /// Free-form notes.
    #[serde(default)]
    pub notes: String,
}

impl NewExpense {
    /// Creates a payload with empty notes.
    pub fn new(
        description: impl Into<String>,
        amount: f64,
        category: ExpenseCategory,
        date: NaiveDate,
    ) -> Self {
        Self {
            description: description.into(),
            amount,
            category,
            date,
            notes: String::new(),
        }
    }

    /// Sets the notes.
    #[must_use]
    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    /// Checks the payload's field constraints.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::Validation`] for an empty description or a
    /// non-positive amount.
    pub fn validate(&self) -> Result<(), CoreError> {
        validate_description(&self.description)?;
        validate_amount("amount", self.amount)
    }
}

/// Partial update for an expense.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpensePatch {
    /// New description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// New amount.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    /// New category.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<ExpenseCategory>,
    /// New date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<NaiveDate>,
    /// New notes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
}

impl ExpensePatch {
    /// Returns true if the patch carries no fields.
    pub fn is_empty(&self) -> bool {
        self.description.is_none()
            && self.amount.is_none()
            && self.category.is_none()
            && self.date.is_none()
            && self.notes.is_none()
    }
}

// ============================================================================
// Filter
// ============================================================================

/// Filter applied when listing expenses.
///
/// Date bounds are inclusive. An empty filter matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExpenseFilter {
    /// Only this category.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<ExpenseCategory>,
    /// Earliest date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<NaiveDate>,
    /// Latest date.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<NaiveDate>,
}

impl ExpenseFilter {
    /// A filter that matches every expense.
    pub fn all() -> Self {
        Self::default()
    }

    /// Restricts to one category.
    #[must_use]
    pub fn with_category(mut self, category: ExpenseCategory) -> Self {
        self.category = Some(category);
        self
    }

    /// Restricts to an inclusive date range. Either bound may be open.
    #[must_use]
    pub fn between(mut self, from: Option<NaiveDate>, to: Option<NaiveDate>) -> Self {
        self.from = from;
        self.to = to;
        self
    }

    /// Returns true if the filter has no constraints.
    pub fn is_empty(&self) -> bool {
        self.category.is_none() && self.from.is_none() && self.to.is_none()
    }

    /// Returns true if the expense passes the filter.
    pub fn matches(&self, expense: &Expense) -> bool {
        if self.category.is_some_and(|c| c != expense.category) {
            return false;
        }
        if self.from.is_some_and(|from| expense.date < from) {
            return false;
        }
        if self.to.is_some_and(|to| expense.date > to) {
            return false;
        }
        true
    }

    /// Query-string pairs for the REST listing endpoint.
    pub fn query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if let Some(category) = self.category {
            pairs.push(("category", category.display_name().to_string()));
        }
        if let Some(from) = self.from {
            pairs.push(("from", from.format("%Y-%m-%d").to_string()));
        }
        if let Some(to) = self.to {
            pairs.push(("to", to.format("%Y-%m-%d").to_string()));
        }
        pairs
    }
}

// ============================================================================
// Validation helpers
// ============================================================================

fn validate_description(description: &str) -> Result<(), CoreError> {
    if description.trim().is_empty() {
        return Err(CoreError::Validation("description must not be empty".to_string()));
    }
    Ok(())
}

/// Checks that an amount is finite and strictly positive.
pub(crate) fn validate_amount(field: &str, amount: f64) -> Result<(), CoreError> {
    if !amount.is_finite() {
        return Err(CoreError::Validation(format!("{field} is not a finite number")));
    }
    if amount <= 0.0 {
        return Err(CoreError::Validation(format!(
            "{field} must be greater than zero, got {amount}"
        )));
    }
    Ok(())
}

// ============================================================================
// Tests
// ============================================================================
