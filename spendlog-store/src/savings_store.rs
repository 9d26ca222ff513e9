//! Savings goal store.
//!
//! Keeps the goal list, each goal with its nested contribution log, under the
//! `savingsGoals` key.

use chrono::{DateTime, Utc};
use spendlog_core::{
    Contribution, CoreError, GoalPatch, NewContribution, NewGoal, OPENING_BALANCE_NOTE,
    SavingsGoal, new_id,
};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::blob::{BlobStore, keys};
use crate::error::StoreError;
use crate::schema::{Versioned, read_list, write_list};

/// Savings goals persisted in a blob store.
pub struct SavingsStore {
    blob: Arc<dyn BlobStore>,
    write_lock: Mutex<()>,
}

impl SavingsStore {
    /// Creates a savings store over a blob store.
    pub fn new(blob: Arc<dyn BlobStore>) -> Self {
        Self {
            blob,
            write_lock: Mutex::new(()),
        }
    }

    async fn load(&self) -> Result<Versioned<SavingsGoal>, StoreError> {
        let mut list = read_list::<SavingsGoal>(self.blob.as_ref(), keys::SAVINGS_GOALS).await?;
        debug!(count = list.items.len(), version = list.version, "Loaded savings goals");

        if list.is_outdated() {
            let now = Utc::now();
            for goal in &mut list.items {
                reconcile_legacy_goal(goal, now);
            }
        }
        Ok(list)
    }

    /// Loads the goals for a query. A legacy blob is written back in the
    /// current schema so reconciled records stay stable across reads.
    async fn read(&self) -> Result<Vec<SavingsGoal>, StoreError> {
        let list = self.load().await?;
        if !list.is_outdated() {
            return Ok(list.items);
        }

        let _guard = self.write_lock.lock().await;
        let list = self.load().await?;
        if list.is_outdated() {
            self.save(&list.items).await?;
            info!(count = list.items.len(), "Upgraded savings goals to current schema");
        }
        Ok(list.items)
    }

    async fn save(&self, goals: &[SavingsGoal]) -> Result<(), StoreError> {
        write_list(self.blob.as_ref(), keys::SAVINGS_GOALS, goals).await
    }

    /// Lists every goal in insertion order.
    ///
    /// # Errors
    ///
    /// Returns error if the blob cannot be read.
    pub async fn list_goals(&self) -> Result<Vec<SavingsGoal>, StoreError> {
        self.read().await
    }

    /// Looks up one goal.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] for an unknown id.
    pub async fn get_goal(&self, id: &str) -> Result<SavingsGoal, StoreError> {
        self.read()
            .await?
            .into_iter()
            .find(|g| g.id == id)
            .ok_or_else(|| CoreError::goal_not_found(id).into())
    }

    /// Validates and stores a new goal, returning the stored record.
    ///
    /// # Errors
    ///
    /// Returns error if validation or persistence fails.
    pub async fn create_goal(&self, new: NewGoal) -> Result<SavingsGoal, StoreError> {
        new.validate()?;
        let _guard = self.write_lock.lock().await;

        let mut goals = self.load().await?.items;
        let goal = SavingsGoal::from_new(new_id(), new, Utc::now());
        goals.push(goal.clone());
        self.save(&goals).await?;

        info!(id = %goal.id, title = %goal.title, target = goal.target_amount, "Savings goal created");
        Ok(goal)
    }

    /// Merges `patch` into a goal and returns the merged record.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] for an unknown id and
    /// [`StoreError::Validation`] if the merged goal is invalid.
    pub async fn update_goal(&self, id: &str, patch: &GoalPatch) -> Result<SavingsGoal, StoreError> {
        let _guard = self.write_lock.lock().await;

        let mut goals = self.load().await?.items;
        let slot = goals
            .iter_mut()
            .find(|g| g.id == id)
            .ok_or_else(|| CoreError::goal_not_found(id))?;

        let mut merged = slot.clone();
        merged.apply(patch);
        merged.validate()?;
        *slot = merged.clone();
        self.save(&goals).await?;

        info!(id, "Savings goal updated");
        Ok(merged)
    }

    /// Removes a goal. Returns whether anything was removed.
    ///
    /// # Errors
    ///
    /// Returns error if the blob store fails.
    pub async fn delete_goal(&self, id: &str) -> Result<bool, StoreError> {
        let _guard = self.write_lock.lock().await;

        let mut goals = self.load().await?.items;
        let before = goals.len();
        goals.retain(|g| g.id != id);
        if goals.len() == before {
            debug!(id, "Delete of unknown savings goal ignored");
            return Ok(false);
        }
        self.save(&goals).await?;

        info!(id, "Savings goal deleted");
        Ok(true)
    }

    /// Appends a contribution to a goal and returns the updated goal.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Validation`] for a non-positive amount and
    /// [`StoreError::NotFound`] for an unknown goal.
    pub async fn add_contribution(
        &self,
        goal_id: &str,
        contribution: NewContribution,
    ) -> Result<SavingsGoal, StoreError> {
        contribution.validate()?;
        let _guard = self.write_lock.lock().await;

        let mut goals = self.load().await?.items;
        let goal = goals
            .iter_mut()
            .find(|g| g.id == goal_id)
            .ok_or_else(|| CoreError::goal_not_found(goal_id))?;

        let contribution = contribution.into_contribution(Utc::now());
        let amount = contribution.amount;
        goal.record_contribution(contribution);
        let updated = goal.clone();
        self.save(&goals).await?;

        info!(
            goal_id,
            amount,
            current = updated.current_amount,
            target = updated.target_amount,
            "Contribution added"
        );
        Ok(updated)
    }
}

/// Makes an unversioned goal's balance agree with its contribution log.
///
/// The old web client stored a starting balance in `currentAmount` without a
/// matching contribution. The gap becomes an opening contribution with id
/// `<goal id>-opening`, dated at the earliest logged deposit; a balance below
/// the log total is raised to the log total.
fn reconcile_legacy_goal(goal: &mut SavingsGoal, now: DateTime<Utc>) {
    let logged = goal.contributions_total();
    let gap = goal.current_amount - logged;

    if gap > f64::EPSILON {
        debug!(id = %goal.id, gap, "Recording opening balance for legacy goal");
        let opening = Contribution {
            id: format!("{}-opening", goal.id),
            amount: gap,
            date: goal.contributions.iter().map(|c| c.date).min().unwrap_or(now),
            note: Some(OPENING_BALANCE_NOTE.to_string()),
        };
        goal.contributions.insert(0, opening);
    } else if gap < -f64::EPSILON {
        warn!(id = %goal.id, current = goal.current_amount, logged, "Legacy goal balance below contributions");
        goal.current_amount = logged;
    }
}
