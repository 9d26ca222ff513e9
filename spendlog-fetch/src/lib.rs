// Lint configuration for this crate
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

//! # Spendlog Fetch
//!
//! Client for the Spendlog REST backend.
//!
//! - [`http::HttpClient`] - reqwest wrapper with a base URL, bearer auth,
//!   tracing and status mapping
//! - [`retry::RetryStrategy`] - exponential backoff for transient failures
//! - [`remote::RemoteExpenseService`] - [`spendlog_core::ExpenseService`]
//!   over HTTP
//!
//! ## Example
//!
//! ```ignore
//! use spendlog_fetch::RemoteExpenseService;
//! use spendlog_core::{ExpenseService, Timeframe};
//!
//! let service = RemoteExpenseService::new("http://localhost:5000/api", token)?;
//! let stats = service.statistics(Timeframe::Month).await?;
//! ```

pub mod error;
pub mod http;
pub mod remote;
pub mod retry;

pub use error::{FetchError, HttpError};
pub use http::{HttpClient, ResponseExt};
pub use remote::RemoteExpenseService;
pub use retry::RetryStrategy;
