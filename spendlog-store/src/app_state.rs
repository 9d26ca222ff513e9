//! Application state.
//!
//! Holds the session user, the expense list, the current statistics and the
//! savings goals in memory, refreshed from the stores. Front ends observe
//! changes through a watch channel.

use chrono::{DateTime, Utc};
use spendlog_core::{
    CoreError, Expense, ExpenseFilter, ExpensePatch, ExpenseService, GoalPatch, NewContribution,
    NewExpense, NewGoal, SavingsGoal, Statistics, Timeframe, User,
};
use std::sync::Arc;
use tokio::sync::{RwLock, watch};
use tracing::{debug, info, warn};

use crate::auth_store::AuthStore;
use crate::error::StoreError;
use crate::savings_store::SavingsStore;

/// Error shown when the expense list cannot be loaded.
pub const EXPENSES_ERROR: &str = "Failed to fetch expenses";

/// Error shown when statistics cannot be loaded.
pub const STATISTICS_ERROR: &str = "Failed to fetch statistics";

/// Error shown when savings goals cannot be loaded.
pub const GOALS_ERROR: &str = "Failed to fetch savings goals";

/// Error shown when an expense cannot be created or updated.
pub const SAVE_EXPENSE_ERROR: &str = "Failed to save expense";

/// Error shown when an expense cannot be deleted.
pub const DELETE_EXPENSE_ERROR: &str = "Failed to delete expense";

/// Error shown when a savings goal cannot be created.
pub const ADD_GOAL_ERROR: &str = "Failed to add savings goal";

/// Error shown when a savings goal cannot be updated.
pub const UPDATE_GOAL_ERROR: &str = "Failed to update savings goal";

/// Error shown when a savings goal cannot be deleted.
pub const DELETE_GOAL_ERROR: &str = "Failed to delete savings goal";

/// Error shown when a contribution cannot be recorded.
pub const CONTRIBUTION_ERROR: &str = "Failed to add contribution";

/// Error shown when signing in fails.
pub const LOGIN_ERROR: &str = "Login failed";

/// Error shown when registration fails.
pub const REGISTER_ERROR: &str = "Registration failed";

// ============================================================================
// Inner State
// ============================================================================

#[derive(Default)]
struct AppStateInner {
    user: Option<User>,
    expenses: Vec<Expense>,
    stats: Option<Statistics>,
    goals: Vec<SavingsGoal>,
    timeframe: Timeframe,
    /// Refreshes currently running.
    in_flight: usize,
    error: Option<String>,
    last_refresh: Option<DateTime<Utc>>,
}

// ============================================================================
// App State
// ============================================================================

/// Shared in-memory view of the user's data.
///
/// Observable via watch channels for UI updates.
pub struct AppState {
    expenses: Arc<dyn ExpenseService>,
    savings: Arc<SavingsStore>,
    auth: Arc<AuthStore>,
    inner: Arc<RwLock<AppStateInner>>,
    notify: watch::Sender<u64>,
    version: Arc<RwLock<u64>>,
}

impl AppState {
    /// Creates an empty state over the given backends.
    pub fn new(
        expenses: Arc<dyn ExpenseService>,
        savings: Arc<SavingsStore>,
        auth: Arc<AuthStore>,
    ) -> Self {
        let (notify, _) = watch::channel(0);
        Self {
            expenses,
            savings,
            auth,
            inner: Arc::new(RwLock::new(AppStateInner::default())),
            notify,
            version: Arc::new(RwLock::new(0)),
        }
    }

    /// Name of the expense backend in use.
    pub fn backend_name(&self) -> &'static str {
        self.expenses.backend_name()
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    /// Signed-in user.
    pub async fn user(&self) -> Option<User> {
        self.inner.read().await.user.clone()
    }

    /// Returns true if a user is signed in.
    pub async fn is_authenticated(&self) -> bool {
        self.inner.read().await.user.is_some()
    }

    /// Cached expenses.
    pub async fn expenses(&self) -> Vec<Expense> {
        self.inner.read().await.expenses.clone()
    }

    /// Cached statistics, if loaded.
    pub async fn stats(&self) -> Option<Statistics> {
        self.inner.read().await.stats.clone()
    }

    /// Cached savings goals.
    pub async fn goals(&self) -> Vec<SavingsGoal> {
        self.inner.read().await.goals.clone()
    }

    /// Timeframe used for statistics.
    pub async fn timeframe(&self) -> Timeframe {
        self.inner.read().await.timeframe
    }

    /// Returns true while any refresh is running.
    pub async fn is_loading(&self) -> bool {
        self.inner.read().await.in_flight > 0
    }

    /// Last error message.
    pub async fn error(&self) -> Option<String> {
        self.inner.read().await.error.clone()
    }

    /// When data was last refreshed successfully.
    pub async fn last_refresh(&self) -> Option<DateTime<Utc>> {
        self.inner.read().await.last_refresh
    }

    /// The `limit` most recent cached expenses, newest first.
    pub async fn recent_expenses(&self, limit: usize) -> Vec<Expense> {
        let mut indexed: Vec<(usize, Expense)> =
            self.expenses().await.into_iter().enumerate().collect();
        indexed.sort_by(|(ia, a), (ib, b)| b.date.cmp(&a.date).then(ib.cmp(ia)));
        indexed.into_iter().take(limit).map(|(_, e)| e).collect()
    }

    // ========================================================================
    // Errors
    // ========================================================================

    /// Sets the error message.
    pub async fn set_error(&self, error: impl Into<String>) {
        let error = error.into();
        warn!(error = %error, "App state error");
        self.inner.write().await.error = Some(error);
        self.notify_change().await;
    }

    /// Clears the error message.
    pub async fn clear_error(&self) {
        self.inner.write().await.error = None;
        self.notify_change().await;
    }

    /// Clears the error on success and records `message` on failure.
    async fn track<T, E: std::fmt::Display>(
        &self,
        result: Result<T, E>,
        message: &str,
    ) -> Result<T, E> {
        match &result {
            Ok(_) => self.clear_error().await,
            Err(e) => {
                debug!(error = %e, "{message}");
                self.set_error(message).await;
            }
        }
        result
    }

    // ========================================================================
    // Refresh
    // ========================================================================

    /// Reloads the expense list. Keeps the previous list on failure.
    ///
    /// # Errors
    ///
    /// Returns the backend error after recording [`EXPENSES_ERROR`].
    pub async fn refresh_expenses(&self) -> Result<(), CoreError> {
        self.begin_refresh().await;
        let result = self.expenses.list(&ExpenseFilter::all()).await;
        match result {
            Ok(expenses) => {
                debug!(count = expenses.len(), "Expenses refreshed");
                self.finish_refresh(|inner| inner.expenses = expenses).await;
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Expense refresh failed");
                self.fail_refresh(EXPENSES_ERROR).await;
                Err(e)
            }
        }
    }

    /// Reloads statistics for the current timeframe.
    ///
    /// # Errors
    ///
    /// Returns the backend error after recording [`STATISTICS_ERROR`].
    pub async fn refresh_stats(&self) -> Result<(), CoreError> {
        let timeframe = self.timeframe().await;
        self.begin_refresh().await;
        match self.expenses.statistics(timeframe).await {
            Ok(stats) => {
                debug!(timeframe = %timeframe, total = stats.total, "Statistics refreshed");
                self.finish_refresh(|inner| inner.stats = Some(stats)).await;
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Statistics refresh failed");
                self.fail_refresh(STATISTICS_ERROR).await;
                Err(e)
            }
        }
    }

    /// Reloads the savings goals.
    ///
    /// # Errors
    ///
    /// Returns the store error after recording [`GOALS_ERROR`].
    pub async fn refresh_goals(&self) -> Result<(), CoreError> {
        self.begin_refresh().await;
        match self.savings.list_goals().await {
            Ok(goals) => {
                debug!(count = goals.len(), "Savings goals refreshed");
                self.finish_refresh(|inner| inner.goals = goals).await;
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "Savings goal refresh failed");
                self.fail_refresh(GOALS_ERROR).await;
                Err(e.into())
            }
        }
    }

    /// Clears the error message, then reloads everything concurrently.
    ///
    /// # Errors
    ///
    /// Returns the first failure; the others still complete.
    pub async fn refresh_all(&self) -> Result<(), CoreError> {
        self.clear_error().await;
        let (expenses, stats, goals) = tokio::join!(
            self.refresh_expenses(),
            self.refresh_stats(),
            self.refresh_goals()
        );
        expenses.and(stats).and(goals)
    }

    /// Changes the statistics timeframe and reloads statistics.
    ///
    /// # Errors
    ///
    /// Returns error if the statistics refresh fails.
    pub async fn set_timeframe(&self, timeframe: Timeframe) -> Result<(), CoreError> {
        self.inner.write().await.timeframe = timeframe;
        self.notify_change().await;
        self.refresh_stats().await
    }

    // ========================================================================
    // Uncached Queries
    // ========================================================================

    /// Lists expenses matching `filter` without touching the cache.
    ///
    /// # Errors
    ///
    /// Returns error if the backend fails.
    pub async fn find_expenses(&self, filter: &ExpenseFilter) -> Result<Vec<Expense>, CoreError> {
        self.expenses.list(filter).await
    }

    /// Computes statistics for any timeframe without touching the cache.
    ///
    /// # Errors
    ///
    /// Returns error if the backend fails.
    pub async fn statistics_for(&self, timeframe: Timeframe) -> Result<Statistics, CoreError> {
        self.expenses.statistics(timeframe).await
    }

    async fn begin_refresh(&self) {
        self.inner.write().await.in_flight += 1;
        self.notify_change().await;
    }

    async fn finish_refresh<F>(&self, apply: F)
    where
        F: FnOnce(&mut AppStateInner),
    {
        {
            let mut inner = self.inner.write().await;
            apply(&mut inner);
            inner.in_flight = inner.in_flight.saturating_sub(1);
            inner.last_refresh = Some(Utc::now());
        }
        self.notify_change().await;
    }

    async fn fail_refresh(&self, message: &str) {
        {
            let mut inner = self.inner.write().await;
            inner.in_flight = inner.in_flight.saturating_sub(1);
            inner.error = Some(message.to_string());
        }
        self.notify_change().await;
    }

    // ========================================================================
    // Expense Mutations
    // ========================================================================

    /// Adds an expense, then reloads expenses and statistics.
    ///
    /// # Errors
    ///
    /// Returns error if the backend rejects the expense.
    pub async fn add_expense(&self, expense: NewExpense) -> Result<Expense, CoreError> {
        let created = self
            .track(self.expenses.create(expense).await, SAVE_EXPENSE_ERROR)
            .await?;
        self.after_expense_change().await;
        Ok(created)
    }

    /// Updates an expense, then reloads expenses and statistics.
    ///
    /// # Errors
    ///
    /// Returns error if the expense is unknown or the merge is invalid.
    pub async fn update_expense(&self, id: &str, patch: ExpensePatch) -> Result<Expense, CoreError> {
        let updated = self
            .track(self.expenses.update(id, patch).await, SAVE_EXPENSE_ERROR)
            .await?;
        self.after_expense_change().await;
        Ok(updated)
    }

    /// Deletes an expense, then reloads expenses and statistics.
    ///
    /// # Errors
    ///
    /// Returns error if the backend fails.
    pub async fn delete_expense(&self, id: &str) -> Result<(), CoreError> {
        self.track(self.expenses.delete(id).await, DELETE_EXPENSE_ERROR)
            .await?;
        self.after_expense_change().await;
        Ok(())
    }

    async fn after_expense_change(&self) {
        // Failures are already recorded in the error message.
        let _ = tokio::join!(self.refresh_expenses(), self.refresh_stats());
    }

    // ========================================================================
    // Goal Mutations
    // ========================================================================

    /// Creates a goal, then reloads goals.
    ///
    /// # Errors
    ///
    /// Returns error if the goal is invalid or cannot be stored.
    pub async fn add_goal(&self, goal: NewGoal) -> Result<SavingsGoal, CoreError> {
        let created = self
            .track(self.savings.create_goal(goal).await, ADD_GOAL_ERROR)
            .await?;
        let _ = self.refresh_goals().await;
        Ok(created)
    }

    /// Updates a goal, then reloads goals.
    ///
    /// # Errors
    ///
    /// Returns error if the goal is unknown or the merge is invalid.
    pub async fn update_goal(&self, id: &str, patch: &GoalPatch) -> Result<SavingsGoal, CoreError> {
        let updated = self
            .track(self.savings.update_goal(id, patch).await, UPDATE_GOAL_ERROR)
            .await?;
        let _ = self.refresh_goals().await;
        Ok(updated)
    }

    /// Deletes a goal, then reloads goals.
    ///
    /// # Errors
    ///
    /// Returns error if the store fails.
    pub async fn delete_goal(&self, id: &str) -> Result<(), CoreError> {
        self.track(self.savings.delete_goal(id).await, DELETE_GOAL_ERROR)
            .await?;
        let _ = self.refresh_goals().await;
        Ok(())
    }

    /// Adds a contribution to a goal, then reloads goals.
    ///
    /// # Errors
    ///
    /// Returns error if the goal is unknown or the amount is invalid.
    pub async fn contribute(
        &self,
        goal_id: &str,
        contribution: NewContribution,
    ) -> Result<SavingsGoal, CoreError> {
        let updated = self
            .track(
                self.savings.add_contribution(goal_id, contribution).await,
                CONTRIBUTION_ERROR,
            )
            .await?;
        let _ = self.refresh_goals().await;
        Ok(updated)
    }

    // ========================================================================
    // Session
    // ========================================================================

    /// Restores a saved session. Returns the user if one was found.
    ///
    /// # Errors
    ///
    /// Returns error if the auth store cannot be read.
    pub async fn restore_session(&self) -> Result<Option<User>, StoreError> {
        let user = self.auth.current_user().await?;
        if let Some(user) = &user {
            info!(email = %user.email, "Restored session");
        }
        self.set_user(user.clone()).await;
        Ok(user)
    }

    /// Signs in and records the user.
    ///
    /// # Errors
    ///
    /// Returns error if the session cannot be persisted.
    pub async fn login(&self, email: &str, password: &str) -> Result<User, StoreError> {
        let user = self
            .track(self.auth.login(email, password).await, LOGIN_ERROR)
            .await?;
        self.set_user(Some(user.clone())).await;
        Ok(user)
    }

    /// Registers, signs in and records the user.
    ///
    /// # Errors
    ///
    /// Returns error if the session cannot be persisted.
    pub async fn register(
        &self,
        username: &str,
        email: &str,
        password: &str,
    ) -> Result<User, StoreError> {
        let user = self
            .track(self.auth.register(username, email, password).await, REGISTER_ERROR)
            .await?;
        self.set_user(Some(user.clone())).await;
        Ok(user)
    }

    /// Signs out and drops every cached record.
    ///
    /// # Errors
    ///
    /// Returns error if the session cannot be cleared.
    pub async fn logout(&self) -> Result<(), StoreError> {
        self.auth.logout().await?;
        {
            let mut inner = self.inner.write().await;
            let timeframe = inner.timeframe;
            *inner = AppStateInner {
                timeframe,
                ..AppStateInner::default()
            };
        }
        self.notify_change().await;
        Ok(())
    }

    async fn set_user(&self, user: Option<User>) {
        self.inner.write().await.user = user;
        self.notify_change().await;
    }

    // ========================================================================
    // Change Notification
    // ========================================================================

    /// Subscribes to state changes.
    pub fn subscribe(&self) -> watch::Receiver<u64> {
        self.notify.subscribe()
    }

    async fn notify_change(&self) {
        let mut version = self.version.write().await;
        *version += 1;
        let _ = self.notify.send(*version);
    }
}

// ============================================================================
// Tests
// ============================================================================
