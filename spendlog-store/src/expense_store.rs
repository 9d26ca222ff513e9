//! Local expense store.
//!
//! Keeps the expense list under the `expenses` key and implements
//! [`ExpenseService`] so the front end can swap it for the REST backend.

use async_trait::async_trait;
use chrono::{Local, NaiveDate};
use spendlog_core::{
    CoreError, Expense, ExpenseFilter, ExpensePatch, ExpenseService, NewExpense, Statistics,
    Timeframe, new_id, stats,
};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info};

use crate::blob::{BlobStore, keys};
use crate::error::StoreError;
use crate::schema::{read_list, write_list};

/// Expense list persisted in a blob store.
pub struct ExpenseStore {
    blob: Arc<dyn BlobStore>,
    /// Serializes read-modify-write cycles.
    write_lock: Mutex<()>,
}

impl ExpenseStore {
    /// Creates an expense store over a blob store.
    pub fn new(blob: Arc<dyn BlobStore>) -> Self {
        Self {
            blob,
            write_lock: Mutex::new(()),
        }
    }

    async fn load(&self) -> Result<Vec<Expense>, StoreError> {
        let list = read_list(self.blob.as_ref(), keys::EXPENSES).await?;
        debug!(count = list.items.len(), version = list.version, "Loaded expenses");
        Ok(list.items)
    }

    async fn save(&self, expenses: &[Expense]) -> Result<(), StoreError> {
        write_list(self.blob.as_ref(), keys::EXPENSES, expenses).await
    }

    /// Lists expenses matching `filter`, in insertion order.
    ///
    /// # Errors
    ///
    /// Returns error if the blob cannot be read.
    pub async fn list(&self, filter: &ExpenseFilter) -> Result<Vec<Expense>, StoreError> {
        let mut expenses = self.load().await?;
        if !filter.is_empty() {
            expenses.retain(|e| filter.matches(e));
        }
        Ok(expenses)
    }

    /// Looks up one expense.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] for an unknown id.
    pub async fn get(&self, id: &str) -> Result<Expense, StoreError> {
        self.load()
            .await?
            .into_iter()
            .find(|e| e.id == id)
            .ok_or_else(|| CoreError::expense_not_found(id).into())
    }

    /// Validates and appends a new expense, returning the stored record.
    ///
    /// # Errors
    ///
    /// Returns error if validation or persistence fails.
    pub async fn create(&self, new: NewExpense) -> Result<Expense, StoreError> {
        new.validate()?;
        let _guard = self.write_lock.lock().await;

        let mut expenses = self.load().await?;
        let expense = Expense::from_new(new_id(), new);
        expenses.push(expense.clone());
        self.save(&expenses).await?;

        info!(id = %expense.id, amount = expense.amount, category = %expense.category, "Expense added");
        Ok(expense)
    }

    /// Merges `patch` into an expense and returns the merged record.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::NotFound`] for an unknown id and
    /// [`StoreError::Validation`] if the merged record is invalid.
    pub async fn update(&self, id: &str, patch: &ExpensePatch) -> Result<Expense, StoreError> {
        let _guard = self.write_lock.lock().await;

        let mut expenses = self.load().await?;
        let slot = expenses
            .iter_mut()
            .find(|e| e.id == id)
            .ok_or_else(|| CoreError::expense_not_found(id))?;

        let mut merged = slot.clone();
        merged.apply(patch);
        merged.validate()?;
        *slot = merged.clone();
        self.save(&expenses).await?;

        info!(id, "Expense updated");
        Ok(merged)
    }

    /// Removes an expense. Returns whether anything was removed.
    ///
    /// # Errors
    ///
    /// Returns error if the blob store fails.
    pub async fn delete(&self, id: &str) -> Result<bool, StoreError> {
        let _guard = self.write_lock.lock().await;

        let mut expenses = self.load().await?;
        let before = expenses.len();
        expenses.retain(|e| e.id != id);
        if expenses.len() == before {
            debug!(id, "Delete of unknown expense ignored");
            return Ok(false);
        }
        self.save(&expenses).await?;

        info!(id, "Expense deleted");
        Ok(true)
    }

    /// Statistics for the window of `timeframe` ending today.
    ///
    /// # Errors
    ///
    /// Returns error if the blob cannot be read.
    pub async fn statistics(&self, timeframe: Timeframe) -> Result<Statistics, StoreError> {
        self.statistics_as_of(timeframe, Local::now().date_naive())
            .await
    }

    /// Statistics for the window of `timeframe` ending on `as_of`.
    ///
    /// # Errors
    ///
    /// Returns error if the blob cannot be read.
    pub async fn statistics_as_of(
        &self,
        timeframe: Timeframe,
        as_of: NaiveDate,
    ) -> Result<Statistics, StoreError> {
        let expenses = self.load().await?;
        Ok(stats::compute(&expenses, timeframe, as_of))
    }
}

#[async_trait]
impl ExpenseService for ExpenseStore {
    fn backend_name(&self) -> &'static str {
        "local"
    }

    async fn list(&self, filter: &ExpenseFilter) -> Result<Vec<Expense>, CoreError> {
        Ok(ExpenseStore::list(self, filter).await?)
    }

    async fn create(&self, expense: NewExpense) -> Result<Expense, CoreError> {
        Ok(ExpenseStore::create(self, expense).await?)
    }

    async fn update(&self, id: &str, patch: ExpensePatch) -> Result<Expense, CoreError> {
        Ok(ExpenseStore::update(self, id, &patch).await?)
    }

    async fn delete(&self, id: &str) -> Result<(), CoreError> {
        ExpenseStore::delete(self, id).await?;
        Ok(())
    }

    async fn statistics(&self, timeframe: Timeframe) -> Result<Statistics, CoreError> {
        Ok(ExpenseStore::statistics(self, timeframe).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::blob::MemoryBlobStore;
    use serde_json::json;
    use spendlog_core::ExpenseCategory;

    fn day(d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(2024, 3, d).unwrap()
    }

    fn store() -> (Arc<MemoryBlobStore>, ExpenseStore) {
        let blob = Arc::new(MemoryBlobStore::new());
        (blob.clone(), ExpenseStore::new(blob))
    }

    fn coffee(d: u32) -> NewExpense {
        NewExpense::new("Coffee", 50.0, ExpenseCategory::Food, day(d))
    }

    #[tokio::test]
    async fn test_create_assigns_unique_ids() {
        let (_, store) = store();
        let a = store.create(coffee(1)).await.unwrap();
        let b = store.create(coffee(1)).await.unwrap();
        assert_ne!(a.id, b.id);

        let listed = store.list(&ExpenseFilter::all()).await.unwrap();
        assert_eq!(listed, vec![a, b]);
    }

    #[tokio::test]
    async fn test_create_rejects_invalid_amount() {
        let (blob, store) = store();
        let err = store
            .create(NewExpense::new("Coffee", 0.0, ExpenseCategory::Food, day(1)))
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::Validation(_)));
        assert!(blob.is_empty().await);
    }

    #[tokio::test]
    async fn test_create_writes_envelope() {
        let (blob, store) = store();
        store.create(coffee(1)).await.unwrap();

        let raw = blob.get(keys::EXPENSES).await.unwrap().unwrap();
        assert_eq!(raw["schemaVersion"], 1);
        assert_eq!(raw["items"][0]["description"], "Coffee");
        assert!(raw["items"][0]["_id"].is_string());
    }

    #[tokio::test]
    async fn test_update_returns_merged_record() {
        let (_, store) = store();
        let created = store.create(coffee(1).with_notes("oat milk")).await.unwrap();

        let patch = ExpensePatch {
            amount: Some(65.0),
            ..ExpensePatch::default()
        };
        let updated = store.update(&created.id, &patch).await.unwrap();

        assert_eq!(updated.amount, 65.0);
        assert_eq!(updated.description, "Coffee");
        assert_eq!(updated.notes, "oat milk");
        assert_eq!(store.get(&created.id).await.unwrap(), updated);
    }

    #[tokio::test]
    async fn test_update_twice_equals_once() {
        let (_, store) = store();
        let created = store.create(coffee(1)).await.unwrap();
        let patch = ExpensePatch {
            description: Some("Latte".to_string()),
            ..ExpensePatch::default()
        };

        let once = store.update(&created.id, &patch).await.unwrap();
        let twice = store.update(&created.id, &patch).await.unwrap();
        assert_eq!(once, twice);
    }

    #[tokio::test]
    async fn test_update_unknown_id() {
        let (_, store) = store();
        let err = store
            .update("missing", &ExpensePatch::default())
            .await
            .unwrap_err();
        assert!(matches!(err, StoreError::NotFound { kind: "expense", .. }));
    }

    #[tokio::test]
    async fn test_update_rejects_invalid_merge() {
        let (_, store) = store();
        let created = store.create(coffee(1)).await.unwrap();
        let patch = ExpensePatch {
            amount: Some(-5.0),
            ..ExpensePatch::default()
        };
        assert!(store.update(&created.id, &patch).await.is_err());
        assert_eq!(store.get(&created.id).await.unwrap().amount, 50.0);
    }

    #[tokio::test]
    async fn test_delete_is_idempotent() {
        let (_, store) = store();
        let created = store.create(coffee(1)).await.unwrap();

        assert!(store.delete(&created.id).await.unwrap());
        assert!(!store.delete(&created.id).await.unwrap());
        assert!(store.list(&ExpenseFilter::all()).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_list_applies_filter() {
        let (_, store) = store();
        store.create(coffee(1)).await.unwrap();
        store
            .create(NewExpense::new("Bus", 30.0, ExpenseCategory::Transportation, day(2)))
            .await
            .unwrap();
        store.create(coffee(5)).await.unwrap();

        let food = ExpenseFilter::all().with_category(ExpenseCategory::Food);
        assert_eq!(store.list(&food).await.unwrap().len(), 2);

        let early = ExpenseFilter::all().between(Some(day(1)), Some(day(2)));
        assert_eq!(store.list(&early).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn test_reads_legacy_bare_array() {
        let (blob, store) = store();
        blob.put(
            keys::EXPENSES,
            json!([{"_id": "1700000000000", "description": "Rent", "amount": 12000,
                    "category": "Housing", "date": "2024-03-01"}]),
        )
        .await
        .unwrap();

        let listed = store.list(&ExpenseFilter::all()).await.unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].id, "1700000000000");

        store.create(coffee(2)).await.unwrap();
        let raw = blob.get(keys::EXPENSES).await.unwrap().unwrap();
        assert_eq!(raw["items"].as_array().map(Vec::len), Some(2));
    }

    #[tokio::test]
    async fn test_coffee_month_statistics() {
        let (_, store) = store();
        for d in 1..=3 {
            store.create(coffee(d)).await.unwrap();
        }

        let stats = store
            .statistics_as_of(Timeframe::Month, day(3))
            .await
            .unwrap();
        assert_eq!(stats.total, 150.0);
        assert_eq!(stats.top_category, Some(ExpenseCategory::Food));
        assert_eq!(stats.distribution.len(), 1);
        assert_eq!(stats.trend.len(), 3);
    }

    #[tokio::test]
    async fn test_service_maps_errors() {
        let (blob, store) = store();
        let service: &dyn ExpenseService = &store;
        assert_eq!(service.backend_name(), "local");

        let err = service.delete("nope").await;
        assert!(err.is_ok());

        blob.set_available(false);
        let err = service.list(&ExpenseFilter::all()).await.unwrap_err();
        assert!(matches!(err, CoreError::StorageUnavailable(_)));
    }
}
