//! Domain models for Spendlog.
//!
//! ## Submodules
//!
//! - [`expense`] - Expenses, categories and their request payloads
//! - [`savings`] - Savings goals and contributions
//! - [`stats`] - Derived statistics and timeframes
//! - [`user`] - The session user

mod expense;
mod savings;
mod stats;
mod user;

// Re-export everything at the models level
pub use expense::{Expense, ExpenseCategory, ExpenseFilter, ExpensePatch, NewExpense};
pub use savings::{
    Contribution, GoalPatch, NewContribution, NewGoal, OPENING_BALANCE_NOTE, SavingsGoal,
};
pub use stats::{CategoryTotal, Statistics, Timeframe, TrendPoint};
pub use user::{DEFAULT_USER_NAME, MOCK_TOKEN, MOCK_USER_ID, User};
#[cfg(test)]
mod serde_tests;
