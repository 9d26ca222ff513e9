// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Spendlog Core
//!
//! Core types, models, and traits for the Spendlog expense tracker.
//!
//! This crate provides the foundational abstractions used across all other
//! Spendlog crates, including:
//!
//! - Domain models (expenses, savings goals, the session user)
//! - The statistics aggregator
//! - Error types
//! - The [`ExpenseService`] trait implemented by every expense backend
//!
//! ## Key Types
//!
//! ### Expenses
//! - [`Expense`] - A stored expense
//! - [`ExpenseCategory`] - The fixed category list
//! - [`NewExpense`], [`ExpensePatch`], [`ExpenseFilter`] - Request payloads
//!
//! ### Savings
//! - [`SavingsGoal`] - A goal with its contribution log
//! - [`Contribution`] - One deposit
//! - [`NewGoal`], [`GoalPatch`], [`NewContribution`] - Request payloads
//!
//! ### Statistics
//! - [`Statistics`] - Totals, averages, trend and distribution
//! - [`Timeframe`] - Reporting window
//! - [`stats::compute`] - The aggregator

pub mod error;
pub mod ids;
pub mod models;
pub mod stats;
pub mod traits;

// Re-export error types
pub use error::CoreError;

pub use ids::new_id;

// Re-export all model types
pub use models::{
    // Expenses
    Expense,
    ExpenseCategory,
    ExpenseFilter,
    ExpensePatch,
    NewExpense,
    // Savings
    Contribution,
    GoalPatch,
    NewContribution,
    NewGoal,
    OPENING_BALANCE_NOTE,
    SavingsGoal,
    // Statistics
    CategoryTotal,
    Statistics,
    Timeframe,
    TrendPoint,
    // Session
    DEFAULT_USER_NAME,
    MOCK_TOKEN,
    MOCK_USER_ID,
    User,
};

// Re-export traits
pub use traits::ExpenseService;
