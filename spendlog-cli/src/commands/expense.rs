//! Expense command - add, list, update, delete.

use anyhow::{Result, bail};
use chrono::{Local, NaiveDate};
use clap::{Args, Subcommand};
use spendlog_core::{ExpenseCategory, ExpenseFilter, ExpensePatch, NewExpense};
use spendlog_store::SettingsStore;
use tracing::debug;

use super::emit;
use crate::output::DeletedOutput;
use crate::{Cli, context};

/// Arguments for the expense command.
#[derive(Args)]
pub struct ExpenseArgs {
    #[command(subcommand)]
    pub action: ExpenseAction,
}

/// Expense subcommands.
#[derive(Subcommand)]
pub enum ExpenseAction {
    /// Record an expense.
    Add {
        /// What the money was spent on.
        description: String,

        /// Amount spent.
        amount: f64,

        /// Category: food, transportation, housing, utilities,
        /// entertainment, healthcare, shopping, other.
        #[arg(long, short = 'c', default_value = "other")]
        category: ExpenseCategory,

        /// Day of the expense (YYYY-MM-DD, defaults to today).
        #[arg(long, short = 'd')]
        date: Option<NaiveDate>,

        /// Free-form notes.
        #[arg(long, short = 'n', default_value = "")]
        notes: String,
    },

    /// List expenses, newest first.
    #[command(visible_alias = "ls")]
    List(ListArgs),

    /// Change fields of an expense.
    Update {
        /// Expense ID.
        id: String,

        /// New description.
        #[arg(long)]
        description: Option<String>,

        /// New amount.
        #[arg(long, short = 'a')]
        amount: Option<f64>,

        /// New category.
        #[arg(long, short = 'c')]
        category: Option<ExpenseCategory>,

        /// New date (YYYY-MM-DD).
        #[arg(long, short = 'd')]
        date: Option<NaiveDate>,

        /// New notes.
        #[arg(long, short = 'n')]
        notes: Option<String>,
    },

    /// Delete an expense. Deleting an unknown ID is not an error.
    #[command(visible_alias = "rm")]
    Delete {
        /// Expense ID.
        id: String,
    },
}

/// Arguments for `expense list`.
#[derive(Args, Default)]
pub struct ListArgs {
    /// Only this category.
    #[arg(long, short = 'c')]
    pub category: Option<ExpenseCategory>,

    /// Earliest date (inclusive).
    #[arg(long)]
    pub from: Option<NaiveDate>,

    /// Latest date (inclusive).
    #[arg(long)]
    pub to: Option<NaiveDate>,

    /// Show at most this many.
    #[arg(long, short = 'l')]
    pub limit: Option<usize>,
}

impl ListArgs {
    fn filter(&self) -> ExpenseFilter {
        let filter = ExpenseFilter::all().between(self.from, self.to);
        match self.category {
            Some(category) => filter.with_category(category),
            None => filter,
        }
    }
}

/// Runs the expense command.
pub async fn run(args: &ExpenseArgs, cli: &Cli, settings: &SettingsStore) -> Result<()> {
    let state = context::open(cli, settings).await?;

    match &args.action {
        ExpenseAction::Add {
            description,
            amount,
            category,
            date,
            notes,
        } => {
            let date = date.unwrap_or_else(|| Local::now().date_naive());
            let new = NewExpense::new(description.clone(), *amount, *category, date)
                .with_notes(notes.clone());
            let created = state.add_expense(new).await?;
            emit(cli, &created, |f| f.format_expense(&created))
        }

        ExpenseAction::List(list) => {
            let filter = list.filter();
            debug!(?filter, "Listing expenses");
            let mut expenses = state.find_expenses(&filter).await?;
            expenses.sort_by(|a, b| b.date.cmp(&a.date));
            if let Some(limit) = list.limit {
                expenses.truncate(limit);
            }
            emit(cli, &expenses, |f| f.format_expenses(&expenses))
        }

        ExpenseAction::Update {
            id,
            description,
            amount,
            category,
            date,
            notes,
        } => {
            let patch = ExpensePatch {
                description: description.clone(),
                amount: *amount,
                category: *category,
                date: *date,
                notes: notes.clone(),
            };
            if patch.is_empty() {
                bail!("nothing to update; pass at least one field");
            }
            let updated = state.update_expense(id, patch).await?;
            emit(cli, &updated, |f| f.format_expense(&updated))
        }

        ExpenseAction::Delete { id } => {
            state.delete_expense(id).await?;
            let out = DeletedOutput {
                id: id.clone(),
                deleted: true,
            };
            emit(cli, &out, |_| format!("Deleted expense {id}"))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_filter_from_args() {
        let args = ListArgs {
            category: Some(ExpenseCategory::Food),
            from: NaiveDate::from_ymd_opt(2024, 3, 1),
            to: None,
            limit: None,
        };
        let filter = args.filter();
        assert_eq!(filter.category, Some(ExpenseCategory::Food));
        assert_eq!(filter.from, NaiveDate::from_ymd_opt(2024, 3, 1));
        assert!(filter.to.is_none());

        assert!(ListArgs::default().filter().is_empty());
    }
}
