//! Goal command - savings goals and contributions.

use anyhow::{Result, anyhow, bail};
use chrono::NaiveDate;
use clap::{Args, Subcommand};
use spendlog_core::{GoalPatch, NewContribution, NewGoal};
use spendlog_store::SettingsStore;

use super::emit;
use crate::output::{DeletedOutput, GoalOutput, JsonFormatter};
use crate::{Cli, OutputFormat, context};

/// Bar width for goal listings.
const GOAL_BAR_WIDTH: usize = 20;

/// Arguments for the goal command.
#[derive(Args)]
pub struct GoalArgs {
    #[command(subcommand)]
    pub action: GoalAction,
}

/// Goal subcommands.
#[derive(Subcommand)]
pub enum GoalAction {
    /// List goals with their progress.
    #[command(visible_alias = "ls")]
    List,

    /// Show one goal and its contributions.
    Show {
        /// Goal ID.
        id: String,
    },

    /// Create a goal.
    Add {
        /// Goal title.
        title: String,

        /// Amount to reach.
        target: f64,

        /// Day the goal should be reached (YYYY-MM-DD).
        #[arg(long, short = 'd')]
        target_date: NaiveDate,

        /// Category label.
        #[arg(long, short = 'c', default_value = "")]
        category: String,

        /// Description.
        #[arg(long, default_value = "")]
        description: String,

        /// Amount already saved, recorded as an opening contribution.
        #[arg(long, short = 'i')]
        initial: Option<f64>,
    },

    /// Change fields of a goal. The saved amount only changes through
    /// contributions.
    Update {
        /// Goal ID.
        id: String,

        /// New title.
        #[arg(long)]
        title: Option<String>,

        /// New target amount.
        #[arg(long, short = 't')]
        target: Option<f64>,

        /// New target date (YYYY-MM-DD).
        #[arg(long, short = 'd')]
        target_date: Option<NaiveDate>,

        /// New category label.
        #[arg(long, short = 'c')]
        category: Option<String>,

        /// New description.
        #[arg(long)]
        description: Option<String>,
    },

    /// Delete a goal. Deleting an unknown ID is not an error.
    #[command(visible_alias = "rm")]
    Delete {
        /// Goal ID.
        id: String,
    },

    /// Add money to a goal.
    Contribute {
        /// Goal ID.
        id: String,

        /// Amount deposited.
        amount: f64,

        /// Note stored with the contribution.
        #[arg(long, short = 'n')]
        note: Option<String>,
    },
}

/// Runs the goal command.
pub async fn run(args: &GoalArgs, cli: &Cli, settings: &SettingsStore) -> Result<()> {
    let state = context::open(cli, settings).await?;

    match &args.action {
        GoalAction::List => {
            state.refresh_goals().await?;
            let goals = state.goals().await;
            match cli.format {
                OutputFormat::Json => {
                    println!("{}", JsonFormatter::new(cli.pretty).format_goals(&goals)?);
                }
                OutputFormat::Text => {
                    let formatter = super::text(cli).with_bar_width(GOAL_BAR_WIDTH);
                    println!("{}", formatter.format_goals(&goals));
                }
            }
            Ok(())
        }

        GoalAction::Show { id } => {
            state.refresh_goals().await?;
            let goal = state
                .goals()
                .await
                .into_iter()
                .find(|g| &g.id == id)
                .ok_or_else(|| anyhow!("savings goal not found: {id}"))?;
            let out = GoalOutput::from(&goal);
            emit(cli, &out, |f| f.format_goal_detail(&goal))
        }

        GoalAction::Add {
            title,
            target,
            target_date,
            category,
            description,
            initial,
        } => {
            let mut new = NewGoal::new(title.clone(), *target, *target_date)
                .with_category(category.clone())
                .with_description(description.clone());
            if let Some(initial) = initial {
                new = new.with_initial_amount(*initial);
            }
            let goal = state.add_goal(new).await?;
            let out = GoalOutput::from(&goal);
            emit(cli, &out, |f| f.format_goal(&goal))
        }

        GoalAction::Update {
            id,
            title,
            target,
            target_date,
            category,
            description,
        } => {
            let patch = GoalPatch {
                title: title.clone(),
                target_amount: *target,
                category: category.clone(),
                target_date: *target_date,
                description: description.clone(),
            };
            if patch.is_empty() {
                bail!("nothing to update; pass at least one field");
            }
            let goal = state.update_goal(id, &patch).await?;
            let out = GoalOutput::from(&goal);
            emit(cli, &out, |f| f.format_goal(&goal))
        }

        GoalAction::Delete { id } => {
            state.delete_goal(id).await?;
            let out = DeletedOutput {
                id: id.clone(),
                deleted: true,
            };
            emit(cli, &out, |_| format!("Deleted savings goal {id}"))
        }

        GoalAction::Contribute { id, amount, note } => {
            let mut contribution = NewContribution::new(*amount);
            if let Some(note) = note {
                contribution = contribution.with_note(note.clone());
            }
            let goal = state.contribute(id, contribution).await?;
            let out = GoalOutput::from(&goal);
            emit(cli, &out, |f| f.format_goal(&goal))
        }
    }
}
