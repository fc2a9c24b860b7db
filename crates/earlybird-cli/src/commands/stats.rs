use std::path::PathBuf;

use clap::Args;
use earlybird_core::{comparison, CompletionStats, Config, IncentiveEngine};
use serde::Serialize;

use super::{print_json, read_tasks, CommandResult};

#[derive(Args)]
pub struct StatsArgs {
    /// JSON file with task records
    #[arg(long)]
    tasks: PathBuf,
}

#[derive(Serialize)]
struct StatsReport {
    #[serde(flatten)]
    stats: CompletionStats,
    /// Leaderboard blurb
    comparison: String,
}

pub fn run(args: StatsArgs) -> CommandResult {
    let config = Config::load()?;
    let engine = IncentiveEngine::from_config(&config);
    let tasks = read_tasks(&args.tasks, &config)?;

    let stats = engine.stats(&tasks)?;
    let comparison = comparison(&stats, stats.total_coins);
    print_json(&StatsReport { stats, comparison })
}
