//! Completion statistics over one user's tasks.
//!
//! Rates are percentages rounded to one decimal place, as the profile page
//! shows them.

use serde::{Deserialize, Serialize};

use crate::task::Task;

const MILLIS_PER_HOUR: i64 = 3_600_000;
const MILLIS_PER_DAY: i64 = 86_400_000;

/// Aggregates for a single user's task list.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CompletionStats {
    pub total: usize,
    pub completed: usize,
    /// Percent of all tasks completed.
    pub completion_rate: f64,
    /// Completed strictly before the deadline.
    pub early_completions: usize,
    /// Percent of completed tasks that were early.
    pub early_rate: f64,
    /// Sum over early completions, each rounded to whole hours.
    pub hours_saved: u64,
    /// Whole days saved by early completions, averaged over all completions.
    pub avg_days_saved: f64,
    /// Whole days from start to completion, averaged over all completions.
    pub avg_days_to_complete: f64,
    /// Completed / total as a whole percent.
    pub overall_progress: u8,
    /// Coins earned across completed tasks.
    pub total_coins: u64,
}

impl CompletionStats {
    pub fn from_tasks(tasks: &[Task]) -> Self {
        let total = tasks.len();
        let completed: Vec<&Task> = tasks.iter().filter(|t| t.is_completed()).collect();
        let early: Vec<(&Task, i64)> = completed
            .iter()
            .filter_map(|t| {
                let at = t.completed_at?;
                (at < t.deadline).then_some((*t, t.deadline - at))
            })
            .collect();

        let hours_saved = early
            .iter()
            .map(|(_, saved)| round_div(*saved, MILLIS_PER_HOUR))
            .sum();
        let days_saved: i64 = early.iter().map(|(_, saved)| saved / MILLIS_PER_DAY).sum();
        let days_taken: i64 = completed
            .iter()
            .filter_map(|t| t.completed_at.map(|at| (at - t.start).div_euclid(MILLIS_PER_DAY)))
            .fold(0_i64, |sum, days| sum.saturating_add(days));

        Self {
            total,
            completed: completed.len(),
            completion_rate: percent(completed.len(), total),
            early_completions: early.len(),
            early_rate: percent(early.len(), completed.len()),
            hours_saved,
            avg_days_saved: if completed.is_empty() {
                0.0
            } else {
                round1(days_saved as f64 / completed.len() as f64)
            },
            avg_days_to_complete: if completed.is_empty() {
                0.0
            } else {
                round1(days_taken as f64 / completed.len() as f64)
            },
            overall_progress: if total == 0 {
                0
            } else {
                (completed.len() as f64 / total as f64 * 100.0).round() as u8
            },
            total_coins: 0,
        }
    }

    pub fn with_total_coins(mut self, coins: u64) -> Self {
        self.total_coins = coins;
        self
    }

    /// Early completions as a whole percent of completions, truncated.
    pub fn early_percent(&self) -> u64 {
        if self.completed == 0 {
            return 0;
        }
        (self.early_completions as u64 * 100) / self.completed as u64
    }
}

fn percent(part: usize, whole: usize) -> f64 {
    if whole == 0 {
        return 0.0;
    }
    round1(part as f64 / whole as f64 * 100.0)
}

fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Positive-only division rounding half up.
fn round_div(value: i64, unit: i64) -> u64 {
    u64::try_from(value.saturating_add(unit / 2) / unit).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::{to_instant, Instant};
    use chrono::Duration;

    fn day(n: i64) -> Instant {
        to_instant("2024-01-01").unwrap() + Duration::days(n)
    }

    #[test]
    fn empty_list_is_all_zero() {
        let stats = CompletionStats::from_tasks(&[]);
        assert_eq!(stats, CompletionStats::default());
    }

    #[test]
    fn aggregates_mixed_tasks() {
        let tasks = vec![
            // 3 days and 2 hours early
            Task::new("a", day(0), day(10), 10).with_completion(day(6) + Duration::hours(22)),
            // exactly at the deadline: not early
            Task::new("b", day(0), day(5), 10).with_completion(day(5)),
            // late
            Task::new("c", day(0), day(5), 10).with_completion(day(7)),
            Task::new("d", day(0), day(5), 10),
        ];
        let stats = CompletionStats::from_tasks(&tasks);

        assert_eq!(stats.total, 4);
        assert_eq!(stats.completed, 3);
        assert_eq!(stats.completion_rate, 75.0);
        assert_eq!(stats.early_completions, 1);
        assert_eq!(stats.early_rate, 33.3);
        assert_eq!(stats.hours_saved, 74);
        assert_eq!(stats.avg_days_saved, 1.0);
        // 6, 5 and 7 whole days from start
        assert_eq!(stats.avg_days_to_complete, 6.0);
        assert_eq!(stats.overall_progress, 75);
        assert_eq!(stats.total_coins, 0);
    }

    #[test]
    fn hours_round_per_task() {
        let tasks = vec![
            Task::new("a", day(0), day(1), 10).with_completion(day(1) - Duration::minutes(30)),
            Task::new("b", day(0), day(1), 10).with_completion(day(1) - Duration::minutes(29)),
        ];
        let stats = CompletionStats::from_tasks(&tasks);
        assert_eq!(stats.hours_saved, 1);
    }

    #[test]
    fn no_completions_means_zero_rates() {
        let tasks = vec![Task::new("a", day(0), day(1), 10)];
        let stats = CompletionStats::from_tasks(&tasks).with_total_coins(0);
        assert_eq!(stats.completion_rate, 0.0);
        assert_eq!(stats.early_rate, 0.0);
        assert_eq!(stats.avg_days_saved, 0.0);
        assert_eq!(stats.avg_days_to_complete, 0.0);
        assert_eq!(stats.early_percent(), 0);
    }

    #[test]
    fn days_to_complete_truncates_partial_days() {
        let tasks = vec![
            Task::new("a", day(0), day(10), 10).with_completion(day(1) + Duration::hours(23)),
            Task::new("b", day(0), day(10), 10).with_completion(day(3)),
            Task::new("c", day(0), day(10), 10).with_completion(day(3)),
        ];
        let stats = CompletionStats::from_tasks(&tasks);
        // (1 + 3 + 3) / 3
        assert_eq!(stats.avg_days_to_complete, 2.3);
    }

    #[test]
    fn early_percent_truncates() {
        let tasks = vec![
            Task::new("a", day(0), day(5), 10).with_completion(day(1)),
            Task::new("b", day(0), day(5), 10).with_completion(day(2)),
            Task::new("c", day(0), day(5), 10).with_completion(day(6)),
        ];
        assert_eq!(CompletionStats::from_tasks(&tasks).early_percent(), 66);
    }

    #[test]
    fn extreme_early_completion_does_not_overflow() {
        let task = Task::new(
            "a",
            Instant::from_millis(i64::MIN + 1),
            Instant::from_millis(i64::MAX),
            10,
        )
        .with_completion(Instant::from_millis(0));
        let stats = CompletionStats::from_tasks(&[task]);
        assert_eq!(stats.early_completions, 1);
        assert_eq!(stats.hours_saved, (i64::MAX / MILLIS_PER_HOUR) as u64);
    }
}
