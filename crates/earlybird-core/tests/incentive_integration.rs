//! Integration tests for the incentive engine.
//!
//! Covers the full path from task-store JSON through progress, rewards,
//! statistics and the leaderboard.

use chrono::Duration;
use earlybird_core::{
    compute_reward, rank, tasks_from_json, to_instant, EngineError, IncentiveEngine, Instant,
    ScoredUser, Task,
};

fn day(n: i64) -> Instant {
    to_instant("2024-09-01T08:00:00Z").unwrap() + Duration::days(n)
}

#[test]
fn scenario_early_first_quarter() {
    let task = Task::new("essay", day(0), day(10), 20).with_completion(day(2));
    assert_eq!(compute_reward(&task).unwrap(), 30);
}

#[test]
fn scenario_third_quarter() {
    let task = Task::new("project", day(0), day(30), 50).with_completion(day(20));
    assert_eq!(compute_reward(&task).unwrap(), 58);
}

#[test]
fn scenario_at_deadline() {
    let task = Task::new("quiz", day(0), day(10), 25).with_completion(day(10));
    assert_eq!(compute_reward(&task).unwrap(), 26);
}

#[test]
fn scenario_degenerate_window() {
    let task = Task::new("broken", day(3), day(3), 25).with_completion(day(3));
    assert!(matches!(
        compute_reward(&task),
        Err(EngineError::DegenerateWindow { .. })
    ));
}

#[test]
fn scenario_leaderboard_ties() {
    let users = vec![
        ScoredUser::new("A", 100),
        ScoredUser::new("B", 150),
        ScoredUser::new("C", 150),
        ScoredUser::new("D", 90),
    ];
    let ranked: Vec<(String, usize)> = rank(&users)
        .into_iter()
        .map(|r| (r.user.identity, r.rank))
        .collect();
    assert_eq!(
        ranked,
        vec![
            ("B".to_string(), 1),
            ("C".to_string(), 2),
            ("A".to_string(), 3),
            ("D".to_string(), 4),
        ]
    );
}

#[test]
fn store_json_through_engine() {
    let json = r#"[
        {
            "id": 1,
            "title": "Problem set 3",
            "course": "MATH 221",
            "startDate": "2024-09-01T08:00:00",
            "deadline": "2024-09-11T08:00:00",
            "coinsReward": 20,
            "completed": true,
            "completedDate": "2024-09-03T08:00:00"
        },
        {
            "id": 2,
            "title": "Reading response",
            "startDate": "2024-09-01",
            "deadline": "2024-09-05",
            "coinsReward": 10
        },
        {
            "id": 3,
            "title": "Lab writeup",
            "startDate": "2024-09-01T08:00:00Z",
            "deadline": "2024-10-01T08:00:00Z",
            "coinsReward": 50,
            "completed": true,
            "completedDate": "2024-09-21T08:00:00Z"
        }
    ]"#;

    let tasks = tasks_from_json(json).unwrap();
    let engine = IncentiveEngine::default();
    let now = to_instant("2024-09-03").unwrap();

    let views = engine.evaluate(&tasks, now);
    assert_eq!(views[0].id, "2", "open task first");
    assert_eq!(views[0].percent, Some(50));
    assert_eq!(views[0].days_left, 2);

    let stats = engine.stats(&tasks).unwrap();
    assert_eq!(stats.total, 3);
    assert_eq!(stats.completed, 2);
    assert_eq!(stats.early_completions, 2);
    assert_eq!(stats.total_coins, 30 + 58);
}

#[test]
fn completing_then_ranking_accumulates_coins() {
    let engine = IncentiveEngine::default();
    let open = vec![
        Task::new("a", day(0), day(10), 20),
        Task::new("b", day(0), day(4), 40),
    ];

    let mut finished = Vec::new();
    let mut earned = 0;
    for (task, at) in open.iter().zip([day(2), day(4)]) {
        let completion = engine.complete(task, at).unwrap();
        earned += completion.earned;
        finished.push(completion.task);
    }

    assert_eq!(earned, 30 + 42);
    assert_eq!(engine.accumulated_reward(&finished).unwrap(), earned);

    let friends = vec![ScoredUser::new("sam@uni.edu", 80), ScoredUser::new("kai@uni.edu", 60)];
    let board = engine.leaderboard(&friends, Some(ScoredUser::new("me@uni.edu", earned)));
    let me = board.iter().find(|r| r.user.identity == "me@uni.edu").unwrap();
    assert_eq!(me.rank, 2);
}

#[test]
fn display_progress_ignores_completion_time() {
    let engine = IncentiveEngine::default();
    for at in [day(-5), day(0), day(7), day(100)] {
        let task = Task::new("t", day(0), day(10), 10).with_completion(at);
        assert_eq!(engine.display_progress(&task, day(1)).unwrap().value(), 1.0);
    }
}

#[test]
fn engine_calls_are_safe_across_threads() {
    let engine = std::sync::Arc::new(IncentiveEngine::default());
    let handles: Vec<_> = (0..4)
        .map(|i| {
            let engine = engine.clone();
            std::thread::spawn(move || {
                let task = Task::new("t", day(0), day(10), 20).with_completion(day(i));
                engine.compute_reward(&task).unwrap()
            })
        })
        .collect();
    let rewards: Vec<u64> = handles.into_iter().map(|h| h.join().unwrap()).collect();
    assert_eq!(rewards, vec![30, 30, 30, 26]);
}
