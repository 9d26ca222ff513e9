//! Serde wire-format tests for core types.
//!
//! These pin the JSON layout shared with the browser client's stored blobs
//! and the REST backend: `_id` keys, camelCase fields and category names.

use chrono::{NaiveDate, TimeZone, Utc};
use serde_json::json;

use crate::{
    CategoryTotal, Contribution, Expense, ExpenseCategory, ExpensePatch, NewExpense, SavingsGoal,
    Statistics, Timeframe, TrendPoint, User,
};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

// ============================================================================
// Expense
// ============================================================================

#[test]
fn test_expense_serializes_with_underscore_id() {
    let expense = Expense::from_new(
        "1714550400000",
        NewExpense::new("Coffee", 150.0, ExpenseCategory::Food, date(2024, 5, 1)),
    );
    let value = serde_json::to_value(&expense).unwrap();

    assert_eq!(value["_id"], "1714550400000");
    assert_eq!(value["category"], "Food");
    assert_eq!(value["date"], "2024-05-01");
    assert_eq!(value["notes"], "");
    assert!(value.get("id").is_none());
}

#[test]
fn test_expense_accepts_plain_id_and_missing_notes() {
    let value = json!({
        "id": "abc",
        "description": "Bus pass",
        "amount": 600,
        "category": "Transportation",
        "date": "2024-04-30"
    });
    let expense: Expense = serde_json::from_value(value).unwrap();

    assert_eq!(expense.id, "abc");
    assert_eq!(expense.category, ExpenseCategory::Transportation);
    assert!((expense.amount - 600.0).abs() < f64::EPSILON);
    assert!(expense.notes.is_empty());
}

#[test]
fn test_expense_rejects_unknown_category() {
    let value = json!({
        "_id": "x",
        "description": "Mystery",
        "amount": 1,
        "category": "Groceries",
        "date": "2024-04-30"
    });
    assert!(serde_json::from_value::<Expense>(value).is_err());
}

#[test]
fn test_patch_skips_absent_fields() {
    let patch = ExpensePatch {
        amount: Some(99.5),
        ..Default::default()
    };
    assert_eq!(serde_json::to_value(&patch).unwrap(), json!({"amount": 99.5}));

    let parsed: ExpensePatch = serde_json::from_value(json!({"notes": "n"})).unwrap();
    assert_eq!(parsed.notes.as_deref(), Some("n"));
    assert!(parsed.amount.is_none());
}

// ============================================================================
// Savings
// ============================================================================

#[test]
fn test_browser_goal_blob_parses() {
    let value = json!({
        "_id": "1",
        "title": "Emergency Fund",
        "targetAmount": 100000,
        "currentAmount": 25000,
        "category": "Emergency",
        "targetDate": "2025-12-31",
        "description": "Emergency savings",
        "contributions": []
    });
    let goal: SavingsGoal = serde_json::from_value(value).unwrap();

    assert_eq!(goal.id, "1");
    assert_eq!(goal.target_date, date(2025, 12, 31));
    assert!((goal.current_amount - 25_000.0).abs() < f64::EPSILON);
    assert!(goal.contributions.is_empty());
}

#[test]
fn test_goal_roundtrip_keeps_contribution_order() {
    let at = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
    let goal = SavingsGoal {
        id: "g".to_string(),
        title: "Bike".to_string(),
        target_amount: 1000.0,
        current_amount: 350.0,
        category: "Fun".to_string(),
        target_date: date(2024, 12, 1),
        description: String::new(),
        contributions: vec![
            Contribution { id: "c1".to_string(), amount: 100.0, date: at, note: None },
            Contribution { id: "c2".to_string(), amount: 250.0, date: at, note: Some("bonus".to_string()) },
        ],
    };
    let json = serde_json::to_string(&goal).unwrap();
    assert!(json.contains("\"targetAmount\""));
    assert!(json.contains("\"currentAmount\""));

    let parsed: SavingsGoal = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, goal);
    assert_eq!(parsed.contributions[0].id, "c1");
    assert_eq!(parsed.contributions[1].id, "c2");
}

// ============================================================================
// Statistics & User
// ============================================================================

#[test]
fn test_statistics_wire_names() {
    let stats = Statistics {
        timeframe: Timeframe::Month,
        total: 150.0,
        daily_average: 5.0,
        top_category: Some(ExpenseCategory::Food),
        trend: vec![TrendPoint { date: date(2024, 5, 1), amount: 150.0 }],
        distribution: vec![CategoryTotal { name: ExpenseCategory::Food, value: 150.0 }],
    };
    let value = serde_json::to_value(&stats).unwrap();

    assert_eq!(value["monthlyTotal"], 150.0);
    assert_eq!(value["dailyAverage"], 5.0);
    assert_eq!(value["topCategory"], "Food");
    assert_eq!(value["timeframe"], "month");
    assert_eq!(value["trend"][0]["date"], "2024-05-01");
    assert_eq!(value["distribution"][0]["name"], "Food");
    assert_eq!(value["distribution"][0]["value"], 150.0);
}

#[test]
fn test_statistics_without_timeframe_defaults_to_month() {
    let value = json!({
        "monthlyTotal": 0,
        "dailyAverage": 0,
        "topCategory": null,
        "trend": [],
        "distribution": []
    });
    let stats: Statistics = serde_json::from_value(value).unwrap();
    assert_eq!(stats.timeframe, Timeframe::Month);
    assert!(stats.top_category.is_none());
}

#[test]
fn test_user_roundtrip() {
    let user = User::mock("Asha", "asha@example.com");
    let json = serde_json::to_string(&user).unwrap();
    let parsed: User = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed, user);
    assert_eq!(parsed.token, "mock-jwt-token");
}
