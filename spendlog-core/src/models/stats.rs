//! Derived expense statistics.
//!
//! These types are computed on demand by [`crate::stats`] and never stored.

use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;
use crate::models::expense::ExpenseCategory;

// ============================================================================
// Timeframe
// ============================================================================

/// Reporting window for statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Timeframe {
    /// The last 7 days.
    Week,
    /// The last 30 days.
    #[default]
    Month,
    /// The last 365 days.
    Year,
    /// Every expense on record.
    All,
}

impl Timeframe {
    /// Returns all timeframes.
    pub fn all() -> &'static [Timeframe] {
        &[Self::Week, Self::Month, Self::Year, Self::All]
    }

    /// Wire name, as used in the `timeframe` query parameter.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Week => "week",
            Self::Month => "month",
            Self::Year => "year",
            Self::All => "all",
        }
    }

    /// Number of days in the window, or `None` for [`Timeframe::All`].
    pub fn window_days(&self) -> Option<i64> {
        match self {
            Self::Week => Some(7),
            Self::Month => Some(30),
            Self::Year => Some(365),
            Self::All => None,
        }
    }

    /// First day of the window ending on `as_of` (inclusive), clamped to
    /// [`NaiveDate::MIN`].
    pub fn window_start(&self, as_of: NaiveDate) -> Option<NaiveDate> {
        self.window_days().map(|days| {
            as_of
                .checked_sub_signed(Duration::days(days - 1))
                .unwrap_or(NaiveDate::MIN)
        })
    }

    /// Returns true if `date` falls inside the window ending on `as_of`.
    pub fn contains(&self, date: NaiveDate, as_of: NaiveDate) -> bool {
        match self.window_start(as_of) {
            Some(start) => date >= start && date <= as_of,
            None => true,
        }
    }
}

impl fmt::Display for Timeframe {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Timeframe {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "week" | "w" => Ok(Self::Week),
            "month" | "m" => Ok(Self::Month),
            "year" | "y" => Ok(Self::Year),
            "all" => Ok(Self::All),
            other => Err(CoreError::Validation(format!("unknown timeframe: {other}"))),
        }
    }
}

// ============================================================================
// Statistics
// ============================================================================

/// Total spent on one day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrendPoint {
    /// The day.
    pub date: NaiveDate,
    /// Sum of that day's expenses.
    pub amount: f64,
}

/// Total spent in one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CategoryTotal {
    /// The category.
    pub name: ExpenseCategory,
    /// Sum of that category's expenses.
    pub value: f64,
}

/// Spending summary over a timeframe.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Statistics {
    /// Window the summary covers.
    #[serde(default)]
    pub timeframe: Timeframe,
    /// Total spent within the window.
    #[serde(rename = "monthlyTotal")]
    pub total: f64,
    /// Total divided by the number of days in the window.
    pub daily_average: f64,
    /// Category with the largest total, if anything was spent.
    pub top_category: Option<ExpenseCategory>,
    /// Per-day totals, oldest first.
    #[serde(default)]
    pub trend: Vec<TrendPoint>,
    /// Per-category totals, largest first.
    #[serde(default)]
    pub distribution: Vec<CategoryTotal>,
}

impl Statistics {
    /// An empty summary for a timeframe.
    pub fn empty(timeframe: Timeframe) -> Self {
        Self {
            timeframe,
            total: 0.0,
            daily_average: 0.0,
            top_category: None,
            trend: Vec::new(),
            distribution: Vec::new(),
        }
    }

    /// Returns true if no spending was recorded in the window.
    pub fn is_empty(&self) -> bool {
        self.trend.is_empty()
    }

    /// Share of the total spent in a category, as a percentage.
    pub fn category_share(&self, category: ExpenseCategory) -> f64 {
        if self.total <= 0.0 {
            return 0.0;
        }
        self.distribution
            .iter()
            .find(|c| c.name == category)
            .map_or(0.0, |c| c.value / self.total * 100.0)
    }
}

// ============================================================================
// Tests
// ============================================================================
