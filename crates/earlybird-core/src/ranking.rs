//! Leaderboard ranking by accumulated coins.

use serde::{Deserialize, Serialize};

use crate::stats::CompletionStats;

/// A cohort member and their coin total.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoredUser {
    #[serde(alias = "email")]
    pub identity: String,
    #[serde(alias = "quackCoins")]
    pub accumulated_reward: u64,
}

impl ScoredUser {
    pub fn new(identity: impl Into<String>, accumulated_reward: u64) -> Self {
        Self {
            identity: identity.into(),
            accumulated_reward,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RankedUser {
    #[serde(flatten)]
    pub user: ScoredUser,
    /// 1-based; equal scores still get distinct ranks.
    pub rank: usize,
}

/// Rank users by coins, highest first.
///
/// The sort is stable, so users with equal totals keep their input order and
/// receive consecutive ranks (`1, 2, 3`, never `1, 1, 3`).
pub fn rank(users: &[ScoredUser]) -> Vec<RankedUser> {
    let mut sorted = users.to_vec();
    sorted.sort_by(|a, b| b.accumulated_reward.cmp(&a.accumulated_reward));

    let ranked: Vec<RankedUser> = sorted
        .into_iter()
        .enumerate()
        .map(|(i, user)| RankedUser { user, rank: i + 1 })
        .collect();

    tracing::debug!(cohort = ranked.len(), "ranked cohort");
    ranked
}

/// Add the signed-in user to their friends' cohort.
///
/// The user goes last, so friends win ties. An existing entry with the same
/// identity is replaced in place instead.
pub fn merge_current_user(cohort: &[ScoredUser], me: ScoredUser) -> Vec<ScoredUser> {
    let mut merged = cohort.to_vec();
    match merged.iter().position(|u| u.identity == me.identity) {
        Some(i) => merged[i] = me,
        None => merged.push(me),
    }
    merged
}

pub fn rank_of(ranked: &[RankedUser], identity: &str) -> Option<usize> {
    ranked
        .iter()
        .find(|r| r.user.identity == identity)
        .map(|r| r.rank)
}

/// One-line summary shown under a user's name on the leaderboard.
///
/// Fewer than three completions is always "Just getting started". Above that,
/// an early percent over 80 wins, then more than five early completions.
pub fn comparison(stats: &CompletionStats, accumulated_reward: u64) -> String {
    if stats.completed < 3 {
        return "Just getting started".to_string();
    }

    let early = stats.early_percent();
    if early > 80 {
        format!("Completes assignments {}% faster than average", early - 50)
    } else if stats.early_completions > 5 {
        format!("Earned {accumulated_reward} coins from early completions")
    } else {
        format!("Completed {} assignments", stats.completed)
    }
}
