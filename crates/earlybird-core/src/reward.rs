//! Early-completion coin rewards.
//!
//! A completed task pays its base reward plus a bonus that depends on how
//! much of the window was used:
//!
//! | time used | bonus |
//! |-----------|-------|
//! | ≤ 25%     | 50%   |
//! | ≤ 50%     | 30%   |
//! | ≤ 75%     | 15%   |
//! | ≤ 100%    | 5%    |
//!
//! Bounds are inclusive and checked in order. Band selection and bonus
//! rounding are done in integer basis points so a value sitting exactly on a
//! boundary, or a bonus of exactly `.5`, always lands the same way. Bonuses
//! round half away from zero.

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, EngineError};
use crate::progress::{clamped_elapsed, Fraction};
use crate::task::Task;

/// 100% in basis points.
pub const FULL_BPS: u32 = 10_000;

/// One row of the reward table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct RewardBand {
    /// Inclusive upper bound on time used, in basis points of the window.
    pub upper_bps: u32,
    /// Bonus as basis points of the base reward.
    pub bonus_bps: u32,
}

impl RewardBand {
    pub const fn new(upper_bps: u32, bonus_bps: u32) -> Self {
        Self {
            upper_bps,
            bonus_bps,
        }
    }

    pub fn multiplier(&self) -> f64 {
        f64::from(self.bonus_bps) / f64::from(FULL_BPS)
    }
}

const DEFAULT_BANDS: [RewardBand; 4] = [
    RewardBand::new(2_500, 5_000),
    RewardBand::new(5_000, 3_000),
    RewardBand::new(7_500, 1_500),
    RewardBand::new(FULL_BPS, 500),
];

/// An ordered partition of `[0, 1]` into bonus bands.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct RewardSchedule {
    bands: Vec<RewardBand>,
}

impl<'de> Deserialize<'de> for RewardSchedule {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let bands = Vec::<RewardBand>::deserialize(deserializer)?;
        RewardSchedule::new(bands).map_err(serde::de::Error::custom)
    }
}

impl Default for RewardSchedule {
    fn default() -> Self {
        Self {
            bands: DEFAULT_BANDS.to_vec(),
        }
    }
}

impl RewardSchedule {
    /// Build a schedule from bands ordered by ascending upper bound.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] unless the bands are non-empty,
    /// strictly ascending within `(0, 10000]`, end exactly at 10000, and
    /// carry non-increasing bonuses no larger than 10000.
    pub fn new(bands: Vec<RewardBand>) -> Result<Self, ConfigError> {
        let invalid = |message: String| ConfigError::InvalidValue {
            key: "rewards.bands".into(),
            message,
        };

        let last = bands.last().ok_or_else(|| invalid("at least one band is required".into()))?;
        if last.upper_bps != FULL_BPS {
            return Err(invalid(format!(
                "last band must end at {FULL_BPS}, found {}",
                last.upper_bps
            )));
        }

        let mut prev: Option<&RewardBand> = None;
        for (i, band) in bands.iter().enumerate() {
            if band.upper_bps == 0 {
                return Err(invalid(format!("band {i} has an empty range")));
            }
            if band.bonus_bps > FULL_BPS {
                return Err(invalid(format!(
                    "band {i} bonus {} exceeds {FULL_BPS}",
                    band.bonus_bps
                )));
            }
            if let Some(prev) = prev {
                if band.upper_bps <= prev.upper_bps {
                    return Err(invalid(format!("band {i} upper bound is not ascending")));
                }
                if band.bonus_bps > prev.bonus_bps {
                    return Err(invalid(format!(
                        "band {i} pays more than an earlier band"
                    )));
                }
            }
            prev = Some(band);
        }

        Ok(Self { bands })
    }

    pub fn bands(&self) -> &[RewardBand] {
        &self.bands
    }

    /// Index of the first band whose bound covers `elapsed / total`.
    fn band_index(&self, elapsed: i64, total: i64) -> usize {
        let scaled = i128::from(elapsed) * i128::from(FULL_BPS);
        self.bands
            .iter()
            .position(|band| scaled <= i128::from(band.upper_bps) * i128::from(total))
            .unwrap_or(self.bands.len() - 1)
    }

    /// Reward with intermediate values.
    ///
    /// # Errors
    ///
    /// [`EngineError::NotCompleted`] for an open task,
    /// [`EngineError::DegenerateWindow`] for a window with no length.
    pub fn breakdown(&self, task: &Task) -> Result<RewardBreakdown, EngineError> {
        let completed_at = task.completed_at.ok_or_else(|| EngineError::NotCompleted {
            task_id: task.id.clone(),
        })?;

        let (elapsed, total) = clamped_elapsed(task.start, task.deadline, completed_at)?;
        let band_index = self.band_index(elapsed, total);
        let band = self.bands[band_index];
        let bonus = round_bps(task.base_reward, band.bonus_bps);

        let breakdown = RewardBreakdown {
            task_id: task.id.clone(),
            base_reward: task.base_reward,
            time_used: Fraction::clamped(elapsed as f64 / total as f64),
            band: band_index,
            multiplier: band.multiplier(),
            bonus,
            total: task.base_reward.saturating_add(bonus),
        };
        tracing::debug!(
            task_id = %breakdown.task_id,
            time_used = breakdown.time_used.value(),
            band = breakdown.band,
            total = breakdown.total,
            "computed reward"
        );
        Ok(breakdown)
    }

    /// Coins earned for a completed task.
    ///
    /// # Errors
    ///
    /// See [`RewardSchedule::breakdown`].
    pub fn compute(&self, task: &Task) -> Result<u64, EngineError> {
        self.breakdown(task).map(|b| b.total)
    }
}

/// `value × bps / 10000`, rounded half away from zero.
fn round_bps(value: u64, bps: u32) -> u64 {
    let scaled = u128::from(value) * u128::from(bps);
    let half = u128::from(FULL_BPS / 2);
    let rounded = (scaled + half) / u128::from(FULL_BPS);
    u64::try_from(rounded).unwrap_or(u64::MAX)
}

/// How a reward was arrived at.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RewardBreakdown {
    pub task_id: String,
    pub base_reward: u64,
    pub time_used: Fraction,
    /// Zero-based index into the schedule's bands.
    pub band: usize,
    pub multiplier: f64,
    pub bonus: u64,
    pub total: u64,
}

/// Coins earned for a completed task under the default schedule.
///
/// # Errors
///
/// [`EngineError::NotCompleted`] for an open task,
/// [`EngineError::DegenerateWindow`] for a window with no length.
pub fn compute_reward(task: &Task) -> Result<u64, EngineError> {
    RewardSchedule::default().compute(task)
}
