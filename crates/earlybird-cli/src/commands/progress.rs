use std::path::PathBuf;

use clap::Args;
use earlybird_core::{Config, IncentiveEngine};

use super::{instant_or_now, print_json, read_tasks, CommandResult};

#[derive(Args)]
pub struct ProgressArgs {
    /// JSON file with task records
    #[arg(long)]
    tasks: PathBuf,
    /// Reference time (ISO-8601); defaults to now
    #[arg(long)]
    now: Option<String>,
}

pub fn run(args: ProgressArgs) -> CommandResult {
    let config = Config::load()?;
    let engine = IncentiveEngine::from_config(&config);
    let tasks = read_tasks(&args.tasks, &config)?;
    let now = instant_or_now(args.now.as_deref())?;

    print_json(&engine.evaluate(&tasks, now))
}
