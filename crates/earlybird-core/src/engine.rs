//! Incentive engine facade.
//!
//! Bundles progress, rewards and ranking behind one value holding the reward
//! table. The engine keeps no state between calls; "now" is always an
//! argument, so re-evaluating on every render or tick is safe.

use serde::{Deserialize, Serialize};

use crate::clock::{self, DateLike, Instant};
use crate::error::{CoreError, EngineError};
use crate::progress::{self, days_left, Fraction};
use crate::ranking::{self, merge_current_user, RankedUser, ScoredUser};
use crate::reward::{RewardBreakdown, RewardSchedule};
use crate::stats::CompletionStats;
use crate::storage::Config;
use crate::task::Task;

/// What a task card needs to render.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskView {
    pub id: String,
    pub title: String,
    pub completed: bool,
    pub days_left: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub progress: Option<Fraction>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub percent: Option<u8>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reward: Option<u64>,
    /// Set instead of progress/reward when the task cannot be evaluated.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Result of completing a task.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Completion {
    pub task: Task,
    pub earned: u64,
}

/// Incomplete tasks first, each group by deadline ascending. Stable.
pub fn urgency_order(tasks: &[Task]) -> Vec<&Task> {
    let mut ordered: Vec<&Task> = tasks.iter().collect();
    ordered.sort_by_key(|t| (t.is_completed(), t.deadline));
    ordered
}

#[derive(Debug, Clone, Default)]
pub struct IncentiveEngine {
    schedule: RewardSchedule,
}

impl IncentiveEngine {
    pub fn new(schedule: RewardSchedule) -> Self {
        Self { schedule }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.rewards.bands.clone())
    }

    pub fn schedule(&self) -> &RewardSchedule {
        &self.schedule
    }

    /// See [`clock::to_instant`].
    pub fn to_instant<'a>(&self, value: impl Into<DateLike<'a>>) -> Result<Instant, EngineError> {
        clock::to_instant(value)
    }

    /// See [`progress::time_progress`].
    pub fn time_progress(
        &self,
        start: Instant,
        deadline: Instant,
        reference: Instant,
    ) -> Result<Fraction, EngineError> {
        progress::time_progress(start, deadline, reference)
    }

    /// See [`progress::display_progress`].
    pub fn display_progress(&self, task: &Task, now: Instant) -> Result<Fraction, EngineError> {
        progress::display_progress(task, now)
    }

    /// Coins for one completed task under this engine's table.
    ///
    /// # Errors
    ///
    /// [`EngineError::NotCompleted`] or [`EngineError::DegenerateWindow`].
    pub fn compute_reward(&self, task: &Task) -> Result<u64, EngineError> {
        self.schedule.compute(task)
    }

    /// # Errors
    ///
    /// As [`IncentiveEngine::compute_reward`].
    pub fn reward_breakdown(&self, task: &Task) -> Result<RewardBreakdown, EngineError> {
        self.schedule.breakdown(task)
    }

    /// See [`ranking::rank`].
    pub fn rank(&self, users: &[ScoredUser]) -> Vec<RankedUser> {
        ranking::rank(users)
    }

    /// Rank friends together with the signed-in user, if any.
    pub fn leaderboard(&self, friends: &[ScoredUser], me: Option<ScoredUser>) -> Vec<RankedUser> {
        match me {
            Some(me) => ranking::rank(&merge_current_user(friends, me)),
            None => ranking::rank(friends),
        }
    }

    /// Sum of rewards over completed tasks; open tasks contribute nothing.
    ///
    /// # Errors
    ///
    /// The first completed task with a degenerate window fails the sum.
    pub fn accumulated_reward(&self, tasks: &[Task]) -> Result<u64, EngineError> {
        tasks
            .iter()
            .filter(|t| t.is_completed())
            .try_fold(0_u64, |sum, t| -> Result<u64, EngineError> {
                Ok(sum.saturating_add(self.compute_reward(t)?))
            })
    }

    /// # Errors
    ///
    /// As [`IncentiveEngine::accumulated_reward`].
    pub fn stats(&self, tasks: &[Task]) -> Result<CompletionStats, EngineError> {
        let coins = self.accumulated_reward(tasks)?;
        Ok(CompletionStats::from_tasks(tasks).with_total_coins(coins))
    }

    /// Complete `task` at `at` and price it.
    ///
    /// # Errors
    ///
    /// [`crate::ValidationError::AlreadyCompleted`] for a finished task, or an
    /// engine error if the window is degenerate.
    pub fn complete(&self, task: &Task, at: Instant) -> Result<Completion, CoreError> {
        let task = task.complete(at)?;
        let earned = self.compute_reward(&task)?;
        tracing::debug!(task_id = %task.id, earned, "task completed");
        Ok(Completion { task, earned })
    }

    /// One view per task, most urgent first.
    ///
    /// Tasks that cannot be evaluated carry their error message rather than
    /// failing the whole batch.
    pub fn evaluate(&self, tasks: &[Task], now: Instant) -> Vec<TaskView> {
        urgency_order(tasks)
            .into_iter()
            .map(|task| self.view(task, now))
            .collect()
    }

    fn view(&self, task: &Task, now: Instant) -> TaskView {
        let mut view = TaskView {
            id: task.id.clone(),
            title: task.title.clone(),
            completed: task.is_completed(),
            days_left: days_left(task.deadline, now),
            progress: None,
            percent: None,
            reward: None,
            error: None,
        };

        let evaluated = self.display_progress(task, now).and_then(|progress| {
            let reward = if task.is_completed() {
                Some(self.compute_reward(task)?)
            } else {
                None
            };
            Ok((progress, reward))
        });

        match evaluated {
            Ok((progress, reward)) => {
                view.progress = Some(progress);
                view.percent = Some(progress.as_percent());
                view.reward = reward;
            }
            Err(e) => {
                tracing::warn!(task_id = %task.id, error = %e, "task cannot be evaluated");
                view.error = Some(e.to_string());
            }
        }
        view
    }
}
