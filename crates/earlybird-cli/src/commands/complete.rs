use std::path::PathBuf;

use clap::Args;
use earlybird_core::{Config, IncentiveEngine, ValidationError};

use super::{instant_or_now, print_json, read_tasks, CommandResult};

#[derive(Args)]
pub struct CompleteArgs {
    /// JSON file with task records
    #[arg(long)]
    tasks: PathBuf,
    /// Task ID
    #[arg(long)]
    id: String,
    /// Completion time (ISO-8601); defaults to now
    #[arg(long)]
    at: Option<String>,
}

pub fn run(args: CompleteArgs) -> CommandResult {
    let config = Config::load()?;
    let engine = IncentiveEngine::from_config(&config);
    let tasks = read_tasks(&args.tasks, &config)?;
    let at = instant_or_now(args.at.as_deref())?;

    let task = tasks
        .iter()
        .find(|t| t.id == args.id)
        .ok_or_else(|| ValidationError::TaskNotFound(args.id.clone()))?;

    let completion = engine.complete(task, at)?;
    eprintln!("Earned {} coins", completion.earned);
    print_json(&completion)
}
