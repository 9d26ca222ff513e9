//! CLI output formatting tests.
//!
//! These tests verify that CLI output is correctly formatted for both
//! text and JSON output modes.

#[cfg(test)]
mod fixtures {
    use chrono::{NaiveDate, TimeZone, Utc};
    use spendlog_core::{
        Expense, ExpenseCategory, NewContribution, NewExpense, NewGoal, SavingsGoal,
    };

    pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    pub fn expense(id: &str, description: &str, amount: f64, category: ExpenseCategory) -> Expense {
        Expense::from_new(id, NewExpense::new(description, amount, category, date(2024, 3, 5)))
    }

    pub fn coffees() -> Vec<Expense> {
        (1..=3)
            .map(|i| {
                Expense::from_new(
                    format!("c{i}"),
                    NewExpense::new("Coffee", 50.0, ExpenseCategory::Food, date(2024, 3, i)),
                )
            })
            .collect()
    }

    pub fn goal() -> SavingsGoal {
        let now = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        let mut new = NewGoal::new("Emergency Fund", 1000.0, date(2030, 12, 31));
        new.contributions = vec![
            NewContribution::new(100.0),
            NewContribution::new(400.0).with_note("Bonus"),
        ];
        SavingsGoal::from_new("g1", new, now)
    }
}

#[cfg(test)]
mod text_formatter_tests {
    use super::super::json::{DashboardOutput, GoalOutput, UserOutput};
    use super::super::text::TextFormatter;
    use super::fixtures::{coffees, date, expense, goal};
    use spendlog_core::{ExpenseCategory, Timeframe, User, stats};

    #[test]
    fn test_progress_bar_empty() {
        let formatter = TextFormatter::new(false);
        assert_eq!(formatter.progress_bar(0.0), "░░░░░░░░░░");
    }

    #[test]
    fn test_progress_bar_full() {
        let formatter = TextFormatter::new(false);
        assert_eq!(formatter.progress_bar(100.0), "██████████");
    }

    #[test]
    fn test_progress_bar_boundary_values() {
        let formatter = TextFormatter::new(false);

        let test_cases = vec![
            (0.0, "░░░░░░░░░░"),
            (10.0, "█░░░░░░░░░"),
            (25.0, "███░░░░░░░"), // 2.5 rounds to 3 blocks
            (50.0, "█████░░░░░"),
            (75.0, "████████░░"),
            (100.0, "██████████"),
        ];

        for (percent, expected) in test_cases {
            assert_eq!(formatter.progress_bar(percent), expected, "Failed for {percent}%");
        }
    }

    #[test]
    fn test_progress_bar_with_colors() {
        let formatter = TextFormatter::new(true);
        assert!(formatter.progress_bar(10.0).contains("\x1b[31m"));
        assert!(formatter.progress_bar(40.0).contains("\x1b[33m"));
        assert!(formatter.progress_bar(80.0).contains("\x1b[32m"));
    }

    #[test]
    fn test_no_color_output_has_no_escapes() {
        let formatter = TextFormatter::new(false);
        let output = formatter.format_expenses(&coffees());
        assert!(!output.contains('\x1b'));
    }

    #[test]
    fn test_format_expenses_table() {
        let formatter = TextFormatter::new(false);
        let output = formatter.format_expenses(&[expense(
            "e1",
            "Groceries",
            1234.5,
            ExpenseCategory::Food,
        )]);

        let mut lines = output.lines();
        assert!(lines.next().unwrap().starts_with("Date"));
        let row = lines.next().unwrap();
        assert!(row.starts_with("2024-03-05"));
        assert!(row.contains("Groceries"));
        assert!(row.contains("₹1,234.5"));
        assert!(row.ends_with("e1"));
    }

    #[test]
    fn test_format_expenses_empty() {
        let formatter = TextFormatter::new(false);
        assert_eq!(formatter.format_expenses(&[]), "No expenses");
    }

    #[test]
    fn test_format_statistics_coffee_month() {
        let formatter = TextFormatter::new(false);
        let stats = stats::compute(&coffees(), Timeframe::Month, date(2024, 3, 10));
        let output = formatter.format_statistics(&stats);

        assert!(output.contains("Spending (month)"));
        assert!(output.contains("Total:         ₹150"));
        assert!(output.contains("Top category:  Food"));
        assert!(output.contains("100.0%"));
    }

    #[test]
    fn test_format_comparison_lists_each_window() {
        let formatter = TextFormatter::new(false);
        let all: Vec<_> = Timeframe::all()
            .iter()
            .map(|tf| stats::compute(&coffees(), *tf, date(2024, 3, 10)))
            .collect();
        let output = formatter.format_comparison(&all);

        assert_eq!(output.lines().count(), 5);
        assert!(output.lines().nth(1).unwrap().starts_with("week"));
        assert!(output.lines().nth(4).unwrap().starts_with("all"));
    }

    #[test]
    fn test_format_goal_progress() {
        let formatter = TextFormatter::new(false);
        let output = formatter.format_goal(&goal());

        assert!(output.starts_with("Emergency Fund g1"));
        assert!(output.contains("█████░░░░░ 50%"));
        assert!(output.contains("₹500 of ₹1,000"));
        assert!(output.contains("₹500 to go"));
    }

    #[test]
    fn test_format_goal_detail_lists_contributions() {
        let formatter = TextFormatter::new(false);
        let output = formatter.format_goal_detail(&goal());
        assert!(output.contains("Contributions:"));
        assert!(output.contains("₹400  Bonus"));
    }

    #[test]
    fn test_format_session() {
        let formatter = TextFormatter::new(false);
        let user = User::mock("Test User", "me@example.com");
        assert_eq!(
            formatter.format_session(Some(&user)),
            "Signed in as Test User <me@example.com>"
        );
        assert_eq!(formatter.format_session(None), "Not signed in");
    }

    #[test]
    fn test_format_dashboard() {
        let formatter = TextFormatter::new(false);
        let user = User::mock("Test User", "me@example.com");
        let goal = goal();
        let dashboard = DashboardOutput {
            backend: "local".to_string(),
            user: Some(UserOutput::from(&user)),
            statistics: Some(stats::compute(&coffees(), Timeframe::Month, date(2024, 3, 10))),
            recent_expenses: coffees(),
            goals: vec![GoalOutput::from(&goal)],
            error: None,
            updated_at: None,
        };

        let output = formatter.format_dashboard(&dashboard);
        assert!(output.starts_with("Spendlog Dashboard - Test User"));
        assert!(output.contains("Spent this month: ₹150"));
        assert!(output.contains("Recent expenses"));
        assert_eq!(output.matches("Coffee").count(), 3);
        assert!(output.contains("Emergency Fund"));
        assert!(output.ends_with("Backend: local"));
    }

    #[test]
    fn test_format_dashboard_shows_error() {
        let formatter = TextFormatter::new(false);
        let dashboard = DashboardOutput {
            backend: "remote".to_string(),
            user: None,
            statistics: None,
            recent_expenses: Vec::new(),
            goals: Vec::new(),
            error: Some("Failed to fetch expenses".to_string()),
            updated_at: None,
        };

        let output = formatter.format_dashboard(&dashboard);
        assert!(output.contains("Failed to fetch expenses"));
        assert!(output.contains("No statistics"));
        assert!(output.contains("No savings goals"));
    }
}

#[cfg(test)]
mod json_formatter_tests {
    use super::super::json::{GoalOutput, JsonFormatter};
    use super::fixtures::{coffees, date, goal};
    use spendlog_core::{Timeframe, User, stats};

    #[test]
    fn test_format_pretty_json() {
        let formatter = JsonFormatter::new(true);
        let output = formatter.format(&serde_json::json!({"key": "value"})).unwrap();
        assert!(output.contains('\n'));
        assert!(output.contains("  "));
    }

    #[test]
    fn test_format_compact_json() {
        let formatter = JsonFormatter::new(false);
        let output = formatter.format(&serde_json::json!({"key": "value"})).unwrap();
        assert_eq!(output, r#"{"key":"value"}"#);
    }

    #[test]
    fn test_statistics_use_wire_names() {
        let formatter = JsonFormatter::new(false);
        let stats = stats::compute(&coffees(), Timeframe::Month, date(2024, 3, 10));
        let parsed: serde_json::Value =
            serde_json::from_str(&formatter.format(&stats).unwrap()).unwrap();

        assert_eq!(parsed["monthlyTotal"], 150.0);
        assert_eq!(parsed["topCategory"], "Food");
        assert_eq!(parsed["distribution"][0]["name"], "Food");
    }

    #[test]
    fn test_goal_output_flattens_goal() {
        let formatter = JsonFormatter::new(false);
        let output = formatter.format_goals(&[goal()]).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();

        let first = &parsed[0];
        assert_eq!(first["_id"], "g1");
        assert_eq!(first["currentAmount"], 500.0);
        assert_eq!(first["progressPercent"], 50.0);
        assert_eq!(first["remaining"], 500.0);
        assert_eq!(first["complete"], false);
        assert_eq!(first["contributions"].as_array().unwrap().len(), 2);
    }

    #[test]
    fn test_goal_output_from_goal() {
        let output = GoalOutput::from(&goal());
        assert!((output.progress_percent - 50.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_session_hides_token() {
        let formatter = JsonFormatter::new(false);
        let user = User::mock("Test User", "me@example.com");
        let output = formatter.format_session(Some(&user)).unwrap();

        assert!(output.contains(r#""authenticated":true"#));
        assert!(!output.contains("mock-jwt-token"));

        let output = formatter.format_session(None).unwrap();
        assert_eq!(output, r#"{"authenticated":false}"#);
    }
}
