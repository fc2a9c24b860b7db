//! Time-elapsed progress for a single task window.

use serde::{Deserialize, Deserializer, Serialize};

use crate::clock::Instant;
use crate::error::EngineError;
use crate::task::Task;

const MILLIS_PER_DAY: i64 = 86_400_000;

/// A ratio clamped to `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, PartialOrd, Serialize)]
#[serde(transparent)]
pub struct Fraction(f64);

impl<'de> Deserialize<'de> for Fraction {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        f64::deserialize(deserializer).map(Fraction::clamped)
    }
}

impl Fraction {
    pub const ZERO: Fraction = Fraction(0.0);
    pub const ONE: Fraction = Fraction(1.0);

    /// Clamp an arbitrary ratio into range. NaN maps to zero.
    pub fn clamped(value: f64) -> Self {
        if value.is_nan() {
            Self::ZERO
        } else {
            Self(value.clamp(0.0, 1.0))
        }
    }

    pub fn value(self) -> f64 {
        self.0
    }

    /// Whole percent, rounded half away from zero.
    pub fn as_percent(self) -> u8 {
        (self.0 * 100.0).round() as u8
    }
}

/// Length of a window in milliseconds.
///
/// # Errors
///
/// Returns [`EngineError::DegenerateWindow`] unless `deadline > start`.
pub(crate) fn window_millis(start: Instant, deadline: Instant) -> Result<i64, EngineError> {
    let total = deadline - start;
    if total <= 0 {
        return Err(EngineError::DegenerateWindow { start, deadline });
    }
    Ok(total)
}

/// Elapsed milliseconds clamped into `[0, total]`, alongside `total`.
pub(crate) fn clamped_elapsed(
    start: Instant,
    deadline: Instant,
    reference: Instant,
) -> Result<(i64, i64), EngineError> {
    let total = window_millis(start, deadline)?;
    let elapsed = (reference - start).clamp(0, total);
    Ok((elapsed, total))
}

/// Fraction of the window `[start, deadline]` that has elapsed at `reference`.
///
/// Before the start this is 0, after the deadline it is 1. Reaching 1 only
/// means the window is used up; completion is tracked separately.
///
/// # Errors
///
/// Returns [`EngineError::DegenerateWindow`] when the deadline is not
/// strictly after the start.
pub fn time_progress(
    start: Instant,
    deadline: Instant,
    reference: Instant,
) -> Result<Fraction, EngineError> {
    let (elapsed, total) = clamped_elapsed(start, deadline, reference)?;
    Ok(Fraction::clamped(elapsed as f64 / total as f64))
}

/// Progress as shown to the user: completion overrides elapsed time.
///
/// # Errors
///
/// For incomplete tasks, propagates [`time_progress`] errors.
pub fn display_progress(task: &Task, now: Instant) -> Result<Fraction, EngineError> {
    if task.is_completed() {
        return Ok(Fraction::ONE);
    }
    time_progress(task.start, task.deadline, now)
}

/// Whole days until `deadline`, rounded up; negative once overdue.
pub fn days_left(deadline: Instant, now: Instant) -> i64 {
    let remaining = deadline - now;
    let days = remaining.div_euclid(MILLIS_PER_DAY);
    if remaining.rem_euclid(MILLIS_PER_DAY) == 0 {
        days
    } else {
        days + 1
    }
}
