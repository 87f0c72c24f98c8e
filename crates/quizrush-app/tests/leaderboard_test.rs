//! Integration tests for leaderboard maintenance jobs.

mod common;

use quizrush_leaderboard::application::query_handlers::LeaderboardPeriod;
use quizrush_leaderboard::domain::commands::{RecomputeRanks, ResetWeeklyScores};
use uuid::Uuid;

#[tokio::test]
async fn test_recompute_and_weekly_reset_after_quizzes() {
    // Arrange
    let app = common::build_app(common::fixed_clock());
    let difficulty_id = Uuid::new_v4();
    common::seed_questions(&app, difficulty_id, 10).await;
    let winner = common::register(&app, "ada").await;
    let runner_up = common::register(&app, "grace").await;
    let idle = common::register(&app, "linus").await;
    common::play_quiz(&app, winner, difficulty_id, true).await;
    common::play_quiz(&app, winner, difficulty_id, true).await;
    common::play_quiz(&app, runner_up, difficulty_id, true).await;

    // Act
    let recomputed = app
        .recompute_ranks(&RecomputeRanks {
            correlation_id: Uuid::new_v4(),
        })
        .await
        .unwrap();
    app.reset_weekly_scores(&ResetWeeklyScores {
        correlation_id: Uuid::new_v4(),
    })
    .await
    .unwrap();

    // Assert
    assert_eq!(recomputed.rankings_updated, 3);
    let global = app.leaderboard(LeaderboardPeriod::Global, 10).await.unwrap();
    let order: Vec<(Uuid, &str, u64, Option<u32>)> = global
        .iter()
        .map(|entry| (entry.user_id, entry.username.as_str(), entry.score, entry.rank))
        .collect();
    assert_eq!(
        order,
        vec![
            (winner, "ada", 2800, Some(1)),
            (runner_up, "grace", 1400, Some(2)),
            (idle, "linus", 0, Some(3)),
        ]
    );
    let weekly = app.leaderboard(LeaderboardPeriod::Weekly, 10).await.unwrap();
    assert!(weekly.iter().all(|entry| entry.score == 0));
}
