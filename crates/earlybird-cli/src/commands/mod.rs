pub mod complete;
pub mod config;
pub mod progress;
pub mod rank;
pub mod reward;
pub mod stats;

use std::path::Path;

use earlybird_core::{tasks_from_json_with_default, to_instant, Config, Instant, ScoredUser, Task};
use serde::Serialize;

pub type CommandResult = Result<(), Box<dyn std::error::Error>>;

/// Read a JSON array of task-store records.
///
/// Records without `coinsReward` take `rewards.default_base_reward`.
pub fn read_tasks(path: &Path, config: &Config) -> Result<Vec<Task>, Box<dyn std::error::Error>> {
    let json = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
    let tasks = tasks_from_json_with_default(&json, config.rewards.default_base_reward)?;
    tracing::debug!(count = tasks.len(), path = %path.display(), "loaded tasks");
    Ok(tasks)
}

/// Read a JSON array of users with their coin totals.
pub fn read_users(path: &Path) -> Result<Vec<ScoredUser>, Box<dyn std::error::Error>> {
    let json = std::fs::read_to_string(path)
        .map_err(|e| format!("cannot read {}: {e}", path.display()))?;
    Ok(serde_json::from_str(&json)?)
}

/// Parse `--now`/`--at`, falling back to the wall clock.
pub fn instant_or_now(value: Option<&str>) -> Result<Instant, Box<dyn std::error::Error>> {
    match value {
        Some(text) => Ok(to_instant(text)?),
        None => Ok(Instant::now()),
    }
}

pub fn print_json<T: Serialize + ?Sized>(value: &T) -> CommandResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
