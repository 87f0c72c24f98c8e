//! Choreography reactions owned by the Gamification context.

use std::sync::Arc;

use async_trait::async_trait;
use quizrush_core::aggregate::AggregateRoot;
use quizrush_core::clock::Clock;
use quizrush_core::error::DomainError;
use quizrush_core::event::{
    Causation, GameEvent, GameEventKind, QUIZ_SESSION_COMPLETED_EVENT_TYPE,
    USER_REGISTERED_EVENT_TYPE,
};
use quizrush_core::handler::{EventHandler, EventPublisher, unexpected_event};
use quizrush_core::repository::UserRepository;
use tracing::{error, info};

use crate::domain::progress::PlayerProgress;

/// XP per correct answer.
pub const XP_PER_CORRECT: i64 = 50;

/// Creates level-1 progress for a newly registered user.
pub struct UserRegisteredGamificationHandler {
    progress: Arc<dyn UserRepository<PlayerProgress>>,
    clock: Arc<dyn Clock>,
}

impl UserRegisteredGamificationHandler {
    /// Creates the handler.
    #[must_use]
    pub fn new(progress: Arc<dyn UserRepository<PlayerProgress>>, clock: Arc<dyn Clock>) -> Self {
        Self { progress, clock }
    }
}

#[async_trait]
impl EventHandler for UserRegisteredGamificationHandler {
    fn handler_name(&self) -> &'static str {
        "gamification.user_registered"
    }

    fn subscriptions(&self) -> &'static [&'static str] {
        &[USER_REGISTERED_EVENT_TYPE]
    }

    async fn handle(
        &self,
        event: &GameEvent,
        _publisher: &dyn EventPublisher,
    ) -> Result<(), DomainError> {
        let GameEventKind::UserRegistered(registered) = &event.kind else {
            return Err(unexpected_event(self.handler_name(), event));
        };
        info!(user_id = %registered.user_id, "initializing player progress");
        self.progress
            .get_or_create(registered.user_id, self.clock.as_ref())
            .await?;
        Ok(())
    }
}

/// Awards XP, records statistics and extends the streak for a completed
/// quiz. The streak grows on every completion, whatever the score.
pub struct QuizSessionCompletedGamificationHandler {
    progress: Arc<dyn UserRepository<PlayerProgress>>,
    clock: Arc<dyn Clock>,
}

impl QuizSessionCompletedGamificationHandler {
    /// Creates the handler.
    #[must_use]
    pub fn new(progress: Arc<dyn UserRepository<PlayerProgress>>, clock: Arc<dyn Clock>) -> Self {
        Self { progress, clock }
    }
}

#[async_trait]
impl EventHandler for QuizSessionCompletedGamificationHandler {
    fn handler_name(&self) -> &'static str {
        "gamification.quiz_session_completed"
    }

    fn subscriptions(&self) -> &'static [&'static str] {
        &[QUIZ_SESSION_COMPLETED_EVENT_TYPE]
    }

    async fn handle(
        &self,
        event: &GameEvent,
        publisher: &dyn EventPublisher,
    ) -> Result<(), DomainError> {
        let GameEventKind::QuizSessionCompleted(completed) = &event.kind else {
            return Err(unexpected_event(self.handler_name(), event));
        };
        let user_id = completed.user_id;
        info!(
            %user_id,
            correct = completed.correct_answers,
            total = completed.total_questions,
            "updating progress for quiz"
        );

        let clock = self.clock.as_ref();
        let cause = Causation::caused_by(event);
        let mut progress = self.progress.get_or_create(user_id, clock).await?;
        let xp = i64::from(completed.correct_answers) * XP_PER_CORRECT;
        progress.add_xp(xp, cause, clock);
        progress.record_quiz_completion(
            completed.correct_answers,
            completed.total_questions,
            clock,
        );
        progress.increment_streak(cause, clock);

        let events = progress.take_uncommitted_events();
        self.progress.save(&progress).await?;
        publisher
            .publish_all(events)
            .await
            .inspect_err(|error| error!(%user_id, %error, "progress event subscribers failed"))?;
        info!(
            %user_id,
            xp,
            level = progress.current_level(),
            streak = progress.current_streak(),
            "progress updated"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use quizrush_core::event::{
        LEVEL_UP_EVENT_TYPE, QuizSessionCompleted, STREAK_UPDATED_EVENT_TYPE, UserRegistered,
    };
    use quizrush_test_support::{FixedClock, InMemoryUserRepository, RecordingPublisher, fixed_now};
    use uuid::Uuid;

    use super::*;

    fn clock() -> Arc<dyn Clock> {
        Arc::new(FixedClock(fixed_now()))
    }

    fn completed(user_id: Uuid, correct: u32, total: u32) -> GameEvent {
        GameEvent::new(
            Uuid::new_v4(),
            Causation::root(Uuid::new_v4()),
            fixed_now(),
            GameEventKind::QuizSessionCompleted(QuizSessionCompleted {
                session_id: Uuid::new_v4(),
                user_id,
                category_id: None,
                difficulty_id: Uuid::new_v4(),
                score: 0,
                total_questions: total,
                correct_answers: correct,
                total_points: 0,
                is_perfect_score: correct == total,
            }),
        )
    }

    #[tokio::test]
    async fn test_user_registered_creates_level_one_progress() {
        let repo = Arc::new(InMemoryUserRepository::<PlayerProgress>::new());
        let handler = UserRegisteredGamificationHandler::new(repo.clone(), clock());
        let user_id = Uuid::new_v4();
        let registered = GameEvent::new(
            user_id,
            Causation::root(Uuid::new_v4()),
            fixed_now(),
            GameEventKind::UserRegistered(UserRegistered {
                user_id,
                email: "grace@example.com".to_owned(),
                username: "grace".to_owned(),
            }),
        );

        handler
            .handle(&registered, &RecordingPublisher::new())
            .await
            .unwrap();

        let progress = repo.stored_for(user_id).unwrap();
        assert_eq!(progress.current_level(), 1);
        assert_eq!(progress.current_xp(), 0);
    }

    #[tokio::test]
    async fn test_completed_awards_xp_and_publishes_level_up_then_streak() {
        // Arrange
        let repo = Arc::new(InMemoryUserRepository::<PlayerProgress>::new());
        let handler = QuizSessionCompletedGamificationHandler::new(repo.clone(), clock());
        let publisher = RecordingPublisher::new();
        let user_id = Uuid::new_v4();
        handler
            .handle(&completed(user_id, 10, 10), &publisher)
            .await
            .unwrap();

        // Act
        handler
            .handle(&completed(user_id, 10, 10), &publisher)
            .await
            .unwrap();

        // Assert
        let progress = repo.stored_for(user_id).unwrap();
        assert_eq!(progress.current_xp(), 1000);
        assert_eq!(progress.current_level(), 2);
        assert_eq!(progress.current_streak(), 2);
        assert_eq!(progress.perfect_quizzes(), 2);
        assert_eq!(
            publisher.published_types(),
            vec![
                STREAK_UPDATED_EVENT_TYPE,
                LEVEL_UP_EVENT_TYPE,
                STREAK_UPDATED_EVENT_TYPE
            ]
        );
    }

    #[tokio::test]
    async fn test_zero_correct_completion_still_extends_streak() {
        let repo = Arc::new(InMemoryUserRepository::<PlayerProgress>::new());
        let handler = QuizSessionCompletedGamificationHandler::new(repo.clone(), clock());
        let publisher = RecordingPublisher::new();
        let user_id = Uuid::new_v4();

        handler
            .handle(&completed(user_id, 0, 10), &publisher)
            .await
            .unwrap();

        let progress = repo.stored_for(user_id).unwrap();
        assert_eq!(progress.current_xp(), 0);
        assert_eq!(progress.current_streak(), 1);
        assert_eq!(progress.total_answers(), 10);
        assert_eq!(progress.perfect_quizzes(), 0);
        assert_eq!(publisher.published_types(), vec![STREAK_UPDATED_EVENT_TYPE]);
    }
}
