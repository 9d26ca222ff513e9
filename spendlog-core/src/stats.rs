//! Expense statistics aggregation.
//!
//! Turns a list of expenses into a [`Statistics`] summary: the total and
//! daily average over a timeframe window, the top category, a per-day trend
//! and a per-category distribution.

use chrono::NaiveDate;
use std::collections::BTreeMap;

use crate::models::{CategoryTotal, Expense, ExpenseCategory, Statistics, Timeframe, TrendPoint};

/// Computes statistics for the window of `timeframe` ending on `as_of`.
///
/// Expenses outside the window are ignored. For [`Timeframe::All`] the daily
/// average divides by the inclusive span between the earliest and latest
/// expense.
#[allow(clippy::cast_precision_loss)]
pub fn compute(expenses: &[Expense], timeframe: Timeframe, as_of: NaiveDate) -> Statistics {
    let in_window: Vec<&Expense> = expenses
        .iter()
        .filter(|e| timeframe.contains(e.date, as_of))
        .collect();

    if in_window.is_empty() {
        return Statistics::empty(timeframe);
    }

    let total: f64 = in_window.iter().map(|e| e.amount).sum();
    let days = timeframe
        .window_days()
        .unwrap_or_else(|| span_days(&in_window));

    let distribution = distribution(&in_window);
    let top_category = distribution.first().map(|c| c.name);

    Statistics {
        timeframe,
        total,
        daily_average: total / days as f64,
        top_category,
        trend: trend(&in_window),
        distribution,
    }
}

/// Inclusive number of days between the earliest and latest expense.
fn span_days(expenses: &[&Expense]) -> i64 {
    let first = expenses.iter().map(|e| e.date).min();
    let last = expenses.iter().map(|e| e.date).max();
    match (first, last) {
        (Some(first), Some(last)) => (last - first).num_days() + 1,
        _ => 1,
    }
}

/// Per-day totals, oldest first.
fn trend(expenses: &[&Expense]) -> Vec<TrendPoint> {
    let mut by_day: BTreeMap<NaiveDate, f64> = BTreeMap::new();
    for expense in expenses {
        *by_day.entry(expense.date).or_insert(0.0) += expense.amount;
    }
    by_day
        .into_iter()
        .map(|(date, amount)| TrendPoint { date, amount })
        .collect()
}

/// Per-category totals, largest first; equal totals keep category order.
fn distribution(expenses: &[&Expense]) -> Vec<CategoryTotal> {
    let mut by_category: BTreeMap<ExpenseCategory, f64> = BTreeMap::new();
    for expense in expenses {
        *by_category.entry(expense.category).or_insert(0.0) += expense.amount;
    }
    let mut totals: Vec<CategoryTotal> = by_category
        .into_iter()
        .map(|(name, value)| CategoryTotal { name, value })
        .collect();
    // Stable sort keeps BTreeMap (category) order for ties.
    totals.sort_by(|a, b| b.value.total_cmp(&a.value));
    totals
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::NewExpense;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn expense(id: &str, amount: f64, category: ExpenseCategory, day: NaiveDate) -> Expense {
        Expense::from_new(id, NewExpense::new(id, amount, category, day))
    }

    #[test]
    fn test_empty_input() {
        let stats = compute(&[], Timeframe::Month, date(2024, 5, 31));
        assert_eq!(stats, Statistics::empty(Timeframe::Month));
        assert!(stats.top_category.is_none());
    }

    #[test]
    fn test_single_coffee() {
        let expenses = vec![expense("coffee", 150.0, ExpenseCategory::Food, date(2024, 5, 1))];
        let stats = compute(&expenses, Timeframe::Month, date(2024, 5, 15));

        assert!((stats.total - 150.0).abs() < f64::EPSILON);
        assert!((stats.daily_average - 5.0).abs() < f64::EPSILON);
        assert_eq!(stats.top_category, Some(ExpenseCategory::Food));
        assert_eq!(stats.distribution, vec![CategoryTotal { name: ExpenseCategory::Food, value: 150.0 }]);
        assert_eq!(stats.trend, vec![TrendPoint { date: date(2024, 5, 1), amount: 150.0 }]);
    }

    #[test]
    fn test_window_at_earliest_date() {
        let expenses = vec![expense("first", 40.0, ExpenseCategory::Other, NaiveDate::MIN)];
        let stats = compute(&expenses, Timeframe::Year, NaiveDate::MIN);
        assert!((stats.total - 40.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_window_excludes_old_and_future_expenses() {
        let expenses = vec![
            expense("old", 999.0, ExpenseCategory::Housing, date(2024, 1, 1)),
            expense("in", 70.0, ExpenseCategory::Food, date(2024, 5, 30)),
            expense("future", 500.0, ExpenseCategory::Shopping, date(2024, 6, 2)),
        ];
        let stats = compute(&expenses, Timeframe::Week, date(2024, 5, 31));

        assert!((stats.total - 70.0).abs() < f64::EPSILON);
        assert!((stats.daily_average - 10.0).abs() < f64::EPSILON);
        assert_eq!(stats.trend.len(), 1);
    }

    #[test]
    fn test_trend_buckets_and_sorts_by_day() {
        let expenses = vec![
            expense("b", 20.0, ExpenseCategory::Food, date(2024, 5, 3)),
            expense("a", 10.0, ExpenseCategory::Food, date(2024, 5, 1)),
            expense("c", 5.0, ExpenseCategory::Other, date(2024, 5, 3)),
        ];
        let stats = compute(&expenses, Timeframe::All, date(2024, 5, 31));

        assert_eq!(
            stats.trend,
            vec![
                TrendPoint { date: date(2024, 5, 1), amount: 10.0 },
                TrendPoint { date: date(2024, 5, 3), amount: 25.0 },
            ]
        );
    }

    #[test]
    fn test_distribution_largest_first() {
        let expenses = vec![
            expense("rent", 1500.0, ExpenseCategory::Housing, date(2024, 5, 1)),
            expense("lunch", 200.0, ExpenseCategory::Food, date(2024, 5, 2)),
            expense("power", 300.0, ExpenseCategory::Utilities, date(2024, 5, 3)),
            expense("dinner", 400.0, ExpenseCategory::Food, date(2024, 5, 4)),
        ];
        let stats = compute(&expenses, Timeframe::Month, date(2024, 5, 10));

        let names: Vec<_> = stats.distribution.iter().map(|c| c.name).collect();
        assert_eq!(
            names,
            vec![ExpenseCategory::Housing, ExpenseCategory::Food, ExpenseCategory::Utilities]
        );
        assert_eq!(stats.top_category, Some(ExpenseCategory::Housing));
        let sum: f64 = stats.distribution.iter().map(|c| c.value).sum();
        assert!((sum - stats.total).abs() < 1e-9);
    }

    #[test]
    fn test_top_category_tie_uses_category_order() {
        let expenses = vec![
            expense("movie", 100.0, ExpenseCategory::Entertainment, date(2024, 5, 1)),
            expense("bus", 100.0, ExpenseCategory::Transportation, date(2024, 5, 1)),
        ];
        let stats = compute(&expenses, Timeframe::Month, date(2024, 5, 1));
        assert_eq!(stats.top_category, Some(ExpenseCategory::Transportation));
    }

    #[test]
    fn test_all_timeframe_average_uses_span() {
        let expenses = vec![
            expense("a", 30.0, ExpenseCategory::Food, date(2024, 5, 1)),
            expense("b", 30.0, ExpenseCategory::Food, date(2024, 5, 10)),
        ];
        let stats = compute(&expenses, Timeframe::All, date(2020, 1, 1));
        assert!((stats.total - 60.0).abs() < f64::EPSILON);
        assert!((stats.daily_average - 6.0).abs() < f64::EPSILON);
    }
}
