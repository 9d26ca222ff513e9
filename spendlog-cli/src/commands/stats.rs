//! Stats command - spending summaries.

use anyhow::Result;
use clap::Args;
use futures::future::join_all;
use spendlog_core::{Statistics, Timeframe};
use spendlog_store::{AppState, SettingsStore};
use tracing::debug;

use super::emit;
use crate::{Cli, context};

/// Arguments for the stats command.
#[derive(Args, Default)]
pub struct StatsArgs {
    /// Window: week, month, year or all (defaults to the configured one).
    #[arg(long, short = 't')]
    pub timeframe: Option<Timeframe>,

    /// Show every window side by side.
    #[arg(long, conflicts_with = "timeframe")]
    pub compare: bool,
}

/// Runs the stats command.
pub async fn run(args: &StatsArgs, cli: &Cli, settings: &SettingsStore) -> Result<()> {
    let state = context::open(cli, settings).await?;

    if args.compare {
        let all = compare(&state).await?;
        return emit(cli, &all, |f| f.format_comparison(&all));
    }

    let timeframe = match args.timeframe {
        Some(tf) => tf,
        None => settings.get().await.default_timeframe,
    };
    state.set_timeframe(timeframe).await?;

    let stats = state
        .stats()
        .await
        .unwrap_or_else(|| Statistics::empty(timeframe));
    emit(cli, &stats, |f| f.format_statistics(&stats))
}

/// Fetches statistics for every timeframe concurrently.
async fn compare(state: &AppState) -> Result<Vec<Statistics>> {
    let results = join_all(
        Timeframe::all()
            .iter()
            .map(|tf| state.statistics_for(*tf)),
    )
    .await;
    debug!(count = results.len(), "Fetched statistics for comparison");

    Ok(results.into_iter().collect::<Result<Vec<_>, _>>()?)
}
