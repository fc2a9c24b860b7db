use std::path::PathBuf;

use clap::Args;
use earlybird_core::{Config, IncentiveEngine, ScoredUser};

use super::{print_json, read_users, CommandResult};

#[derive(Args)]
pub struct RankArgs {
    /// JSON file with users and their coin totals
    #[arg(long)]
    users: PathBuf,
    /// Identity of the signed-in user to merge into the cohort
    #[arg(long, requires = "coins")]
    me: Option<String>,
    /// Coin total of the signed-in user
    #[arg(long, requires = "me")]
    coins: Option<u64>,
    /// Show at most this many rows (overrides leaderboard.limit)
    #[arg(long)]
    limit: Option<usize>,
}

pub fn run(args: RankArgs) -> CommandResult {
    let config = Config::load()?;
    let engine = IncentiveEngine::from_config(&config);
    let friends = read_users(&args.users)?;

    let me = args
        .me
        .zip(args.coins)
        .map(|(identity, coins)| ScoredUser::new(identity, coins));

    let mut board = engine.leaderboard(&friends, me);
    if let Some(limit) = args.limit.or(config.leaderboard.limit) {
        board.truncate(limit);
    }

    print_json(&board)
}
