//! REST expense backend.
//!
//! [`RemoteExpenseService`] implements [`ExpenseService`] against the
//! `/expenses` endpoints:
//!
//! | Operation    | Request                                   |
//! |--------------|-------------------------------------------|
//! | `list`       | `GET /expenses?category=&from=&to=`       |
//! | `create`     | `POST /expenses`                          |
//! | `update`     | `PUT /expenses/{id}`                      |
//! | `delete`     | `DELETE /expenses/{id}`                   |
//! | `statistics` | `GET /expenses/statistics?timeframe=`     |

use async_trait::async_trait;
use spendlog_core::{
    CoreError, Expense, ExpenseFilter, ExpensePatch, ExpenseService, NewExpense, Statistics,
    Timeframe,
};
use tracing::{debug, info};
use url::Url;

use crate::error::FetchError;
use crate::http::HttpClient;
use crate::retry::RetryStrategy;

const EXPENSES: &str = "expenses";
const STATISTICS: &str = "statistics";

/// Expense service backed by the REST API.
#[derive(Debug, Clone)]
pub struct RemoteExpenseService {
    client: HttpClient,
    retry: RetryStrategy,
}

impl RemoteExpenseService {
    /// Creates a service for `base_url`, authorizing with `token`.
    ///
    /// # Errors
    ///
    /// Returns error if the base URL is invalid.
    pub fn new(base_url: &str, token: Option<String>) -> Result<Self, FetchError> {
        Ok(Self::with_client(HttpClient::new(base_url)?.with_token(token)))
    }

    /// Creates a service over a configured client.
    pub fn with_client(client: HttpClient) -> Self {
        Self {
            client,
            retry: RetryStrategy::default(),
        }
    }

    /// Sets the retry strategy used for reads.
    #[must_use]
    pub fn with_retry(mut self, retry: RetryStrategy) -> Self {
        self.retry = retry;
        self
    }

    /// Backend base URL.
    pub fn base_url(&self) -> &Url {
        self.client.base_url()
    }

    async fn fetch_list(&self, filter: &ExpenseFilter) -> Result<Vec<Expense>, FetchError> {
        let query = filter.query_pairs();
        self.retry
            .run(|| self.client.get_json(&[EXPENSES], &query))
            .await
    }

    async fn fetch_statistics(&self, timeframe: Timeframe) -> Result<Statistics, FetchError> {
        let query = [("timeframe", timeframe.as_str().to_string())];
        let mut stats: Statistics = self
            .retry
            .run(|| self.client.get_json(&[EXPENSES, STATISTICS], &query))
            .await?;
        stats.timeframe = timeframe;
        Ok(stats)
    }
}

/// Maps a 404 on an id-addressed request to a missing-expense error.
fn not_found_as_missing(err: FetchError, id: &str) -> CoreError {
    match err {
        FetchError::NotFound(_) => CoreError::expense_not_found(id),
        other => other.into(),
    }
}

#[async_trait]
impl ExpenseService for RemoteExpenseService {
    fn backend_name(&self) -> &'static str {
        "remote"
    }

    async fn list(&self, filter: &ExpenseFilter) -> Result<Vec<Expense>, CoreError> {
        let expenses = self.fetch_list(filter).await?;
        debug!(count = expenses.len(), "Fetched expenses");
        Ok(expenses)
    }

    async fn create(&self, expense: NewExpense) -> Result<Expense, CoreError> {
        expense.validate()?;
        let created: Expense = self.client.post_json(&[EXPENSES], &expense).await?;
        info!(id = %created.id, "Expense created remotely");
        Ok(created)
    }

    async fn update(&self, id: &str, patch: ExpensePatch) -> Result<Expense, CoreError> {
        let updated: Expense = self
            .client
            .put_json(&[EXPENSES, id], &patch)
            .await
            .map_err(|e| not_found_as_missing(e, id))?;
        info!(id, "Expense updated remotely");
        Ok(updated)
    }

    async fn delete(&self, id: &str) -> Result<(), CoreError> {
        match self.client.delete(&[EXPENSES, id]).await {
            Ok(()) => {
                info!(id, "Expense deleted remotely");
                Ok(())
            }
            Err(FetchError::NotFound(_)) => {
                debug!(id, "Delete of unknown remote expense ignored");
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }

    async fn statistics(&self, timeframe: Timeframe) -> Result<Statistics, CoreError> {
        Ok(self.fetch_statistics(timeframe).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_bad_url() {
        assert!(RemoteExpenseService::new("localhost:5000", None).is_err());
    }

    #[test]
    fn test_base_url_and_name() {
        let service =
            RemoteExpenseService::new("http://localhost:5000/api", Some("t".to_string())).unwrap();
        assert_eq!(service.base_url().as_str(), "http://localhost:5000/api/");
        assert_eq!(service.backend_name(), "remote");
    }

    #[test]
    fn test_not_found_maps_to_missing_expense() {
        let err = not_found_as_missing(FetchError::NotFound("404".to_string()), "abc");
        assert!(matches!(err, CoreError::NotFound { kind: "expense", ref id } if id == "abc"));

        let err = not_found_as_missing(FetchError::AuthenticationFailed("401".to_string()), "abc");
        assert!(matches!(err, CoreError::Unauthorized(_)));
    }
}
