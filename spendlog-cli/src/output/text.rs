//! Text output formatting with progress bars and colors.

use chrono::{Local, NaiveDate};
use spendlog_core::{Expense, SavingsGoal, Statistics, Timeframe, User};

use super::json::DashboardOutput;

// ============================================================================
// ANSI Colors
// ============================================================================

const RESET: &str = "\x1b[0m";
const BOLD: &str = "\x1b[1m";
const DIM: &str = "\x1b[2m";
const GREEN: &str = "\x1b[32m";
const YELLOW: &str = "\x1b[33m";
const RED: &str = "\x1b[31m";
const BLUE: &str = "\x1b[34m";
const CYAN: &str = "\x1b[36m";

// Progress bar characters
const BAR_FULL: char = '█';
const BAR_EMPTY: char = '░';

// ============================================================================
// Currency
// ============================================================================

/// Formats an amount as Indian rupees: `₹1,23,456.5`.
///
/// The last three integer digits form one group, the rest are grouped in
/// pairs. Up to two fraction digits are shown, trailing zeros dropped.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn format_inr(amount: f64) -> String {
    if !amount.is_finite() {
        return "₹-".to_string();
    }

    let paise = (amount.abs() * 100.0).round() as u64;
    let whole = paise / 100;
    let fraction = paise % 100;

    let mut out = String::new();
    if amount < 0.0 && paise > 0 {
        out.push('-');
    }
    out.push('₹');
    out.push_str(&group_lakh(whole));
    if fraction > 0 {
        out.push('.');
        out.push_str(format!("{fraction:02}").trim_end_matches('0'));
    }
    out
}

fn group_lakh(n: u64) -> String {
    let digits = n.to_string();
    if digits.len() <= 3 {
        return digits;
    }

    let (mut rest, tail) = digits.split_at(digits.len() - 3);
    let mut groups = Vec::new();
    while rest.len() > 2 {
        let (head, pair) = rest.split_at(rest.len() - 2);
        groups.push(pair);
        rest = head;
    }
    groups.push(rest);
    groups.reverse();

    format!("{},{tail}", groups.join(","))
}

// ============================================================================
// Text Formatter
// ============================================================================

/// Text formatter with optional colors.
pub struct TextFormatter {
    use_colors: bool,
    bar_width: usize,
}

impl TextFormatter {
    /// Creates a new text formatter.
    pub fn new(use_colors: bool) -> Self {
        Self {
            use_colors,
            bar_width: 10,
        }
    }

    /// Set the progress bar width.
    #[must_use]
    pub fn with_bar_width(mut self, width: usize) -> Self {
        self.bar_width = width;
        self
    }

    // ========================================================================
    // Expenses
    // ========================================================================

    /// Formats expenses as a table, newest first as given.
    pub fn format_expenses(&self, expenses: &[Expense]) -> String {
        if expenses.is_empty() {
            return self.dim("No expenses");
        }

        let mut lines = Vec::new();
        lines.push(format!(
            "{:<10}  {:<24}  {:<14}  {:>12}  {}",
            self.bold("Date"),
            self.bold("Description"),
            self.bold("Category"),
            self.bold("Amount"),
            self.bold("ID")
        ));
        for expense in expenses {
            lines.push(self.format_expense_line(expense));
        }
        lines.join("\n")
    }

    /// Formats one expense row.
    pub fn format_expense_line(&self, expense: &Expense) -> String {
        format!(
            "{:<10}  {:<24}  {:<14}  {:>12}  {}",
            expense.date.format("%Y-%m-%d"),
            truncate(&expense.description, 24),
            expense.category.display_name(),
            format_inr(expense.amount),
            self.dim(&expense.id)
        )
    }

    /// Formats a single expense with its notes.
    pub fn format_expense(&self, expense: &Expense) -> String {
        let mut lines = vec![
            format!(
                "{} {}",
                self.bold(&expense.description),
                self.green(&format_inr(expense.amount))
            ),
            format!("Category: {}", expense.category.display_name()),
            format!("Date:     {}", expense.date.format("%Y-%m-%d")),
        ];
        if !expense.notes.is_empty() {
            lines.push(format!("Notes:    {}", expense.notes));
        }
        lines.push(format!("ID:       {}", self.dim(&expense.id)));
        lines.join("\n")
    }

    // ========================================================================
    // Statistics
    // ========================================================================

    /// Formats statistics with a distribution chart.
    pub fn format_statistics(&self, stats: &Statistics) -> String {
        let mut lines = Vec::new();

        lines.push(format!(
            "{} ({})",
            self.bold("Spending"),
            stats.timeframe.as_str()
        ));
        lines.push("─".repeat(40));

        lines.push(format!(
            "Total:         {}",
            self.green(&format_inr(stats.total))
        ));
        lines.push(format!(
            "Daily average: {}",
            format_inr(stats.daily_average)
        ));
        lines.push(format!(
            "Top category:  {}",
            stats
                .top_category
                .map_or_else(|| self.dim("−"), |c| self.cyan(c.display_name()))
        ));

        if !stats.distribution.is_empty() {
            lines.push(String::new());
            lines.push(self.dim("By category:"));
            for entry in &stats.distribution {
                let share = stats.category_share(entry.name);
                lines.push(format!(
                    "  {:<14} {} {:>5.1}%  {}",
                    entry.name.display_name(),
                    self.share_bar(share),
                    share,
                    format_inr(entry.value)
                ));
            }
        }

        if !stats.trend.is_empty() {
            lines.push(String::new());
            lines.push(self.dim("Daily trend:"));
            for point in &stats.trend {
                lines.push(format!(
                    "  {}  {}",
                    point.date.format("%Y-%m-%d"),
                    format_inr(point.amount)
                ));
            }
        }

        lines.join("\n")
    }

    /// Formats one line per timeframe for side-by-side comparison.
    pub fn format_comparison(&self, all: &[Statistics]) -> String {
        let mut lines = Vec::new();
        lines.push(format!(
            "{:<8} {:>14} {:>14}  {}",
            self.bold("Window"),
            self.bold("Total"),
            self.bold("Daily avg"),
            self.bold("Top category")
        ));
        for stats in all {
            lines.push(format!(
                "{:<8} {:>14} {:>14}  {}",
                stats.timeframe.as_str(),
                format_inr(stats.total),
                format_inr(stats.daily_average),
                stats.top_category.map_or("−", |c| c.display_name())
            ));
        }
        lines.join("\n")
    }

    // ========================================================================
    // Savings Goals
    // ========================================================================

    /// Formats a goal with a progress bar.
    pub fn format_goal(&self, goal: &SavingsGoal) -> String {
        let progress = goal.progress_percent();
        let bar = self.progress_bar(progress);
        let pct = self.color_for_percent(progress, &format!("{progress:.0}%"));

        let mut lines = vec![format!(
            "{} {}",
            self.bold(&goal.title),
            self.dim(&goal.id)
        )];
        lines.push(format!(
            "  {} {}  {} of {}",
            bar,
            pct,
            format_inr(goal.current_amount),
            format_inr(goal.target_amount)
        ));

        let due = self.format_due_date(goal.target_date, Local::now().date_naive());
        if goal.is_complete() {
            lines.push(format!("  {}", self.green("Reached")));
        } else {
            lines.push(format!(
                "  {} to go, {}",
                format_inr(goal.remaining()),
                due
            ));
        }
        if !goal.category.is_empty() {
            lines.push(format!("  Category: {}", self.blue(&goal.category)));
        }
        lines.join("\n")
    }

    /// Formats a goal with its contribution log.
    pub fn format_goal_detail(&self, goal: &SavingsGoal) -> String {
        let mut lines = vec![self.format_goal(goal)];
        if !goal.description.is_empty() {
            lines.push(format!("  {}", goal.description));
        }
        if !goal.contributions.is_empty() {
            lines.push(self.dim("  Contributions:"));
            for contribution in &goal.contributions {
                let note = contribution
                    .note
                    .as_deref()
                    .map(|n| format!("  {}", self.dim(n)))
                    .unwrap_or_default();
                lines.push(format!(
                    "    {}  {:>12}{}",
                    contribution.date.with_timezone(&Local).format("%Y-%m-%d"),
                    format_inr(contribution.amount),
                    note
                ));
            }
        }
        lines.join("\n")
    }

    /// Formats every goal, separated by blank lines.
    pub fn format_goals(&self, goals: &[SavingsGoal]) -> String {
        if goals.is_empty() {
            return self.dim("No savings goals");
        }
        goals
            .iter()
            .map(|g| self.format_goal(g))
            .collect::<Vec<_>>()
            .join("\n\n")
    }

    /// Describes how far away a target date is.
    fn format_due_date(&self, target: NaiveDate, today: NaiveDate) -> String {
        let days = (target - today).num_days();
        match days {
            0 => self.yellow("due today"),
            1 => "due tomorrow".to_string(),
            d if d > 1 => format!("due in {d} days ({})", target.format("%Y-%m-%d")),
            d => self.red(&format!(
                "overdue by {} day{}",
                -d,
                if d == -1 { "" } else { "s" }
            )),
        }
    }

    // ========================================================================
    // Session & Dashboard
    // ========================================================================

    /// Formats the signed-in user, if any.
    pub fn format_session(&self, user: Option<&User>) -> String {
        match user {
            Some(user) => format!(
                "Signed in as {} <{}>",
                self.bold(&user.name),
                self.cyan(&user.email)
            ),
            None => self.dim("Not signed in"),
        }
    }

    /// Formats the dashboard.
    pub fn format_dashboard(&self, dashboard: &DashboardOutput) -> String {
        let mut lines = Vec::new();

        let who = dashboard
            .user
            .as_ref()
            .map_or_else(String::new, |u| format!(" - {}", u.name));
        lines.push(format!("{}{}", self.bold("Spendlog Dashboard"), who));
        lines.push("─".repeat(50));

        if let Some(error) = &dashboard.error {
            lines.push(self.red(error));
        }

        match &dashboard.statistics {
            Some(stats) => {
                lines.push(String::new());
                lines.push(self.format_statistics_summary(stats));
            }
            None => lines.push(self.dim("No statistics")),
        }

        lines.push(String::new());
        lines.push(self.bold("Recent expenses"));
        if dashboard.recent_expenses.is_empty() {
            lines.push(self.dim("  No expenses"));
        } else {
            for expense in &dashboard.recent_expenses {
                lines.push(format!(
                    "  {}  {:<24} {:>12}",
                    expense.date.format("%Y-%m-%d"),
                    truncate(&expense.description, 24),
                    format_inr(expense.amount)
                ));
            }
        }

        lines.push(String::new());
        lines.push(self.bold("Savings goals"));
        if dashboard.goals.is_empty() {
            lines.push(self.dim("  No savings goals"));
        } else {
            for goal in &dashboard.goals {
                let pct = self.color_for_percent(
                    goal.progress_percent,
                    &format!("{:.0}%", goal.progress_percent),
                );
                lines.push(format!(
                    "  {:<20} {} {}",
                    truncate(&goal.goal.title, 20),
                    self.progress_bar(goal.progress_percent),
                    pct
                ));
            }
        }

        lines.push(String::new());
        lines.push(self.dim(&format!("Backend: {}", dashboard.backend)));

        lines.join("\n")
    }

    fn format_statistics_summary(&self, stats: &Statistics) -> String {
        let label = match stats.timeframe {
            Timeframe::Week => "Spent this week: ",
            Timeframe::Month => "Spent this month:",
            Timeframe::Year => "Spent this year: ",
            Timeframe::All => "Spent overall:   ",
        };
        let mut lines = vec![
            format!("{label} {}", self.green(&format_inr(stats.total))),
            format!("Daily average:   {}", format_inr(stats.daily_average)),
        ];
        if let Some(top) = stats.top_category {
            lines.push(format!("Top category:    {}", self.cyan(top.display_name())));
        }
        for entry in &stats.distribution {
            let share = stats.category_share(entry.name);
            lines.push(format!(
                "  {:<14} {} {:>5.1}%",
                entry.name.display_name(),
                self.share_bar(share),
                share
            ));
        }
        lines.join("\n")
    }

    // ========================================================================
    // Bars
    // ========================================================================

    /// Formats a progress bar colored by how far along it is.
    pub fn progress_bar(&self, percent: f64) -> String {
        let bar = self.bar(percent);
        self.color_for_percent(percent, &bar)
    }

    /// Formats an uncolored bar for a share of the total.
    fn share_bar(&self, percent: f64) -> String {
        self.cyan(&self.bar(percent))
    }

    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    fn bar(&self, percent: f64) -> String {
        let filled = ((percent.clamp(0.0, 100.0) / 100.0) * self.bar_width as f64).round() as usize;
        let empty = self.bar_width.saturating_sub(filled);

        format!(
            "{}{}",
            BAR_FULL.to_string().repeat(filled),
            BAR_EMPTY.to_string().repeat(empty)
        )
    }

    // ========================================================================
    // Color/style helpers
    // ========================================================================

    fn color_for_percent(&self, percent: f64, text: &str) -> String {
        if !self.use_colors {
            return text.to_string();
        }

        if percent < 20.0 {
            self.red(text)
        } else if percent < 50.0 {
            self.yellow(text)
        } else {
            self.green(text)
        }
    }

    fn paint(&self, code: &str, text: &str) -> String {
        if self.use_colors {
            format!("{code}{text}{RESET}")
        } else {
            text.to_string()
        }
    }

    fn bold(&self, text: &str) -> String {
        self.paint(BOLD, text)
    }

    fn dim(&self, text: &str) -> String {
        self.paint(DIM, text)
    }

    fn green(&self, text: &str) -> String {
        self.paint(GREEN, text)
    }

    fn yellow(&self, text: &str) -> String {
        self.paint(YELLOW, text)
    }

    fn red(&self, text: &str) -> String {
        self.paint(RED, text)
    }

    fn blue(&self, text: &str) -> String {
        self.paint(BLUE, text)
    }

    fn cyan(&self, text: &str) -> String {
        self.paint(CYAN, text)
    }
}

/// Shortens `text` to `max` characters, ending with an ellipsis.
fn truncate(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        return text.to_string();
    }
    let kept: String = text.chars().take(max.saturating_sub(1)).collect();
    format!("{kept}…")
}

// ============================================================================
// Tests
// ============================================================================
