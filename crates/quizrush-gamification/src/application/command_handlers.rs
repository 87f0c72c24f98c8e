//! Command handlers for the Gamification context.

use quizrush_core::clock::Clock;
use quizrush_core::error::DomainError;
use quizrush_core::repository::UserRepository;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::domain::commands::ResetStreak;
use crate::domain::progress::PlayerProgress;

/// Result of a successfully handled command.
#[derive(Debug)]
pub struct ProgressCommandResult {
    /// The aggregate ID affected by the command.
    pub aggregate_id: Uuid,
}

/// Handles the `ResetStreak` command. Produces no event.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` if the repository fails.
#[instrument(skip(command, clock, repo), fields(user_id = %command.user_id))]
pub async fn handle_reset_streak(
    command: &ResetStreak,
    clock: &dyn Clock,
    repo: &dyn UserRepository<PlayerProgress>,
) -> Result<ProgressCommandResult, DomainError> {
    info!(correlation_id = %command.correlation_id, "handling reset_streak command");

    let mut progress = repo.get_or_create(command.user_id, clock).await?;
    progress.reset_streak(clock);
    repo.save(&progress).await?;

    Ok(ProgressCommandResult {
        aggregate_id: progress.id(),
    })
}

#[cfg(test)]
mod tests {
    use quizrush_core::aggregate::{AggregateRoot, UserAggregate};
    use quizrush_core::event::Causation;
    use quizrush_test_support::{FixedClock, InMemoryUserRepository, fixed_now};

    use super::*;

    #[tokio::test]
    async fn test_handle_reset_streak_zeroes_current_and_keeps_longest() {
        // Arrange
        let clock = FixedClock(fixed_now());
        let user_id = Uuid::new_v4();
        let mut progress = PlayerProgress::new_for_user(Uuid::new_v4(), user_id, fixed_now());
        progress.increment_streak(Causation::root(Uuid::new_v4()), &clock);
        progress.increment_streak(Causation::root(Uuid::new_v4()), &clock);
        progress.clear_uncommitted_events();
        let repo = InMemoryUserRepository::with(progress);
        let command = ResetStreak {
            correlation_id: Uuid::new_v4(),
            user_id,
        };

        // Act
        let result = handle_reset_streak(&command, &clock, &repo).await.unwrap();

        // Assert
        let stored = repo.stored_for(user_id).unwrap();
        assert_eq!(result.aggregate_id, stored.id());
        assert_eq!(stored.current_streak(), 0);
        assert_eq!(stored.longest_streak(), 2);
    }
}
