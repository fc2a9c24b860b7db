//! # Early Bird Core Library
//!
//! This library provides the deadline incentive engine behind the Early Bird
//! assignment tracker: how far along an assignment's window is, how many
//! coins finishing it early is worth, and where each friend stands on the
//! leaderboard.
//!
//! ## Architecture
//!
//! - **Clock**: normalizes ISO strings and instants into [`Instant`]
//! - **Progress**: elapsed fraction of a start/deadline window
//! - **Reward**: tiered early-completion bonus over a [`RewardSchedule`]
//! - **Ranking**: stable leaderboard ordering
//! - **Engine**: the [`IncentiveEngine`] facade composing the above
//!
//! Every engine operation is a pure function of its arguments. Nothing reads
//! the system clock or keeps state between calls.
//!
//! ## Key Components
//!
//! - [`IncentiveEngine`]: facade used by presentation layers
//! - [`TaskRecord`]: task store shape, validated into [`Task`]
//! - [`CompletionStats`]: per-user completion aggregates
//! - [`Config`]: reward table and display settings

pub mod clock;
pub mod engine;
pub mod error;
pub mod progress;
pub mod ranking;
pub mod reward;
pub mod stats;
pub mod storage;
pub mod task;

pub use clock::{to_instant, DateLike, Instant};
pub use engine::{urgency_order, Completion, IncentiveEngine, TaskView};
pub use error::{ConfigError, CoreError, EngineError, ValidationError};
pub use progress::{days_left, display_progress, time_progress, Fraction};
pub use ranking::{comparison, merge_current_user, rank, rank_of, RankedUser, ScoredUser};
pub use reward::{compute_reward, RewardBand, RewardBreakdown, RewardSchedule};
pub use stats::CompletionStats;
pub use storage::Config;
pub use task::{tasks_from_json, tasks_from_json_with_default, Task, TaskRecord};
