//! Output formatting for CLI.

mod json;
mod text;

pub use json::{DashboardOutput, DeletedOutput, GoalOutput, JsonFormatter, UserOutput};
pub use text::{TextFormatter, format_inr};
#[cfg(test)]
mod tests;
