//! Dashboard command - everything at a glance.

use anyhow::Result;
use clap::Args;
use spendlog_core::Timeframe;
use spendlog_store::{AppState, SettingsStore};
use tracing::warn;

use super::emit;
use crate::output::{DashboardOutput, GoalOutput, UserOutput};
use crate::{Cli, context};

/// Arguments for the dashboard command.
#[derive(Args, Default)]
pub struct DashboardArgs {
    /// Statistics window (defaults to the configured one).
    #[arg(long, short = 't')]
    pub timeframe: Option<Timeframe>,

    /// Number of recent expenses to show (defaults to the configured count).
    #[arg(long, short = 'r')]
    pub recent: Option<usize>,
}

/// Runs the dashboard command.
pub async fn run(args: &DashboardArgs, cli: &Cli, settings: &SettingsStore) -> Result<()> {
    let state = context::open(cli, settings).await?;
    let config = settings.get().await;

    let timeframe = args.timeframe.unwrap_or(config.default_timeframe);
    let recent = args.recent.unwrap_or(config.recent_expense_count);

    let dashboard = build(&state, timeframe, recent).await;
    emit(cli, &dashboard, |f| f.format_dashboard(&dashboard))
}

/// Loads everything and collects what succeeded.
///
/// A failed refresh does not abort the dashboard; its message is shown
/// alongside whatever data did load.
pub async fn build(state: &AppState, timeframe: Timeframe, recent: usize) -> DashboardOutput {
    if let Err(e) = state.set_timeframe(timeframe).await {
        warn!(error = %e, "Statistics unavailable");
    }
    let (expenses, goals) = tokio::join!(state.refresh_expenses(), state.refresh_goals());
    if let Err(e) = expenses.and(goals) {
        warn!(error = %e, "Dashboard refresh incomplete");
    }

    let user = state.user().await;
    let goals = state.goals().await;

    DashboardOutput {
        backend: state.backend_name().to_string(),
        user: user.as_ref().map(UserOutput::from),
        statistics: state.stats().await,
        recent_expenses: state.recent_expenses(recent).await,
        goals: goals.iter().map(GoalOutput::from).collect(),
        error: state.error().await,
        updated_at: state.last_refresh().await,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Local, NaiveDate};
    use spendlog_core::{ExpenseCategory, NewContribution, NewExpense, NewGoal};
    use spendlog_store::Settings;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_dashboard_collects_everything() {
        let dir = TempDir::new().unwrap();
        let state = context::open_at(dir.path(), &Settings::default()).await.unwrap();
        state.login("me@example.com", "pw").await.unwrap();

        let today = Local::now().date_naive();
        for i in 0..7 {
            state
                .add_expense(NewExpense::new(
                    format!("Item {i}"),
                    10.0,
                    ExpenseCategory::Shopping,
                    today,
                ))
                .await
                .unwrap();
        }
        let goal = state
            .add_goal(NewGoal::new(
                "Laptop",
                1000.0,
                NaiveDate::from_ymd_opt(2030, 1, 1).unwrap(),
            ))
            .await
            .unwrap();
        state
            .contribute(&goal.id, NewContribution::new(250.0))
            .await
            .unwrap();

        let dashboard = build(&state, Timeframe::Week, 5).await;

        assert_eq!(dashboard.backend, "local");
        assert_eq!(dashboard.user.as_ref().unwrap().email, "me@example.com");
        assert_eq!(dashboard.statistics.as_ref().unwrap().total, 70.0);
        assert_eq!(dashboard.recent_expenses.len(), 5);
        assert_eq!(dashboard.recent_expenses[0].description, "Item 6");
        assert_eq!(dashboard.goals.len(), 1);
        assert!((dashboard.goals[0].progress_percent - 25.0).abs() < f64::EPSILON);
        assert!(dashboard.error.is_none());
        assert!(dashboard.updated_at.is_some());
    }

    #[tokio::test]
    async fn test_empty_dashboard() {
        let dir = TempDir::new().unwrap();
        let state = context::open_at(dir.path(), &Settings::default()).await.unwrap();

        let dashboard = build(&state, Timeframe::Month, 5).await;
        assert!(dashboard.user.is_none());
        assert!(dashboard.recent_expenses.is_empty());
        assert!(dashboard.goals.is_empty());
        assert_eq!(dashboard.statistics.unwrap().total, 0.0);
    }
}
