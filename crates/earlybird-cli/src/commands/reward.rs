use std::path::PathBuf;

use clap::Args;
use earlybird_core::{Config, IncentiveEngine};
use serde::Serialize;

use super::{print_json, read_tasks, CommandResult};

#[derive(Args)]
pub struct RewardArgs {
    /// JSON file with task records
    #[arg(long)]
    tasks: PathBuf,
}

#[derive(Serialize)]
struct RewardReport {
    rewards: Vec<earlybird_core::RewardBreakdown>,
    /// Completed tasks that could not be priced, keyed by task id.
    rejected: Vec<(String, String)>,
    total: u64,
}

pub fn run(args: RewardArgs) -> CommandResult {
    let config = Config::load()?;
    let engine = IncentiveEngine::from_config(&config);
    let tasks = read_tasks(&args.tasks, &config)?;

    let mut report = RewardReport {
        rewards: Vec::new(),
        rejected: Vec::new(),
        total: 0,
    };
    for task in tasks.iter().filter(|t| t.is_completed()) {
        match engine.reward_breakdown(task) {
            Ok(breakdown) => {
                report.total = report.total.saturating_add(breakdown.total);
                report.rewards.push(breakdown);
            }
            Err(e) => {
                tracing::warn!(task_id = %task.id, error = %e, "task rejected");
                report.rejected.push((task.id.clone(), e.to_string()));
            }
        }
    }

    print_json(&report)
}
