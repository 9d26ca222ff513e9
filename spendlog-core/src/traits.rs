//! Trait definitions for Spendlog.
//!
//! [`ExpenseService`] is the seam between the front end and whichever
//! backend holds the expenses: the local blob-backed store or the REST
//! collaborator.

use async_trait::async_trait;

use crate::error::CoreError;
use crate::models::{Expense, ExpenseFilter, ExpensePatch, NewExpense, Statistics, Timeframe};

/// CRUD and statistics over a user's expenses.
///
/// Updating with the same patch twice must equal updating once, and deleting
/// an absent id is a no-op.
#[async_trait]
pub trait ExpenseService: Send + Sync {
    /// Short backend name for logs and status output.
    fn backend_name(&self) -> &'static str;

    /// Lists expenses matching the filter, in store order.
    async fn list(&self, filter: &ExpenseFilter) -> Result<Vec<Expense>, CoreError>;

    /// Stores a new expense and returns it with its assigned id.
    async fn create(&self, expense: NewExpense) -> Result<Expense, CoreError>;

    /// Merges a patch into an expense and returns the merged record.
    async fn update(&self, id: &str, patch: ExpensePatch) -> Result<Expense, CoreError>;

    /// Removes an expense. Removing an unknown id succeeds.
    async fn delete(&self, id: &str) -> Result<(), CoreError>;

    /// Summarizes spending over a timeframe.
    async fn statistics(&self, timeframe: Timeframe) -> Result<Statistics, CoreError>;
}
