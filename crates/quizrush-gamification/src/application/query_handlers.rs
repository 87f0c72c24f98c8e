//! Query handlers for the Gamification context.

use quizrush_core::clock::Clock;
use quizrush_core::error::DomainError;
use quizrush_core::repository::UserRepository;
use serde::Serialize;
use uuid::Uuid;

use crate::domain::progress::{PlayerProgress, XP_PER_LEVEL};

/// Read-only view of a player's progress.
#[derive(Debug, Serialize)]
pub struct ProgressView {
    /// The player.
    pub user_id: Uuid,
    /// Total XP.
    pub current_xp: i64,
    /// Current level.
    pub current_level: u32,
    /// XP still needed for the next level.
    pub xp_to_next_level: i64,
    /// Current streak.
    pub current_streak: u32,
    /// Longest streak ever reached.
    pub longest_streak: u32,
    /// Completed quizzes.
    pub total_quizzes: u32,
    /// Quizzes with every answer correct.
    pub perfect_quizzes: u32,
    /// Correct answers over all quizzes.
    pub total_correct: u32,
    /// Answers over all quizzes.
    pub total_answers: u32,
    /// Percentage of correct answers.
    pub accuracy: f64,
}

/// Returns the user's progress, creating level-1 progress on first access.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` if the repository fails.
pub async fn get_progress(
    user_id: Uuid,
    clock: &dyn Clock,
    repo: &dyn UserRepository<PlayerProgress>,
) -> Result<ProgressView, DomainError> {
    let progress = repo.get_or_create(user_id, clock).await?;
    Ok(ProgressView {
        user_id,
        current_xp: progress.current_xp(),
        current_level: progress.current_level(),
        xp_to_next_level: i64::from(progress.current_level()) * XP_PER_LEVEL
            - progress.current_xp(),
        current_streak: progress.current_streak(),
        longest_streak: progress.longest_streak(),
        total_quizzes: progress.total_quizzes(),
        perfect_quizzes: progress.perfect_quizzes(),
        total_correct: progress.total_correct(),
        total_answers: progress.total_answers(),
        accuracy: progress.accuracy(),
    })
}
