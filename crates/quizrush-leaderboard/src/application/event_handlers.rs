//! Choreography reactions owned by the Leaderboard context.

use std::sync::Arc;

use async_trait::async_trait;
use quizrush_core::clock::Clock;
use quizrush_core::error::DomainError;
use quizrush_core::event::{
    GameEvent, GameEventKind, QUIZ_SESSION_COMPLETED_EVENT_TYPE, USER_REGISTERED_EVENT_TYPE,
};
use quizrush_core::handler::{EventHandler, EventPublisher, unexpected_event};
use quizrush_core::repository::UserRepository;
use tracing::info;

use crate::domain::ranking::PlayerRanking;

/// Creates an unranked zero-score ranking for a newly registered user and
/// records the name the leaderboard displays.
pub struct UserRegisteredLeaderboardHandler {
    rankings: Arc<dyn UserRepository<PlayerRanking>>,
    clock: Arc<dyn Clock>,
}

impl UserRegisteredLeaderboardHandler {
    /// Creates the handler.
    #[must_use]
    pub fn new(rankings: Arc<dyn UserRepository<PlayerRanking>>, clock: Arc<dyn Clock>) -> Self {
        Self { rankings, clock }
    }
}

#[async_trait]
impl EventHandler for UserRegisteredLeaderboardHandler {
    fn handler_name(&self) -> &'static str {
        "leaderboard.user_registered"
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
        info!(user_id = %registered.user_id, "initializing player ranking");
        let clock = self.clock.as_ref();
        let mut ranking = self.rankings.get_or_create(registered.user_id, clock).await?;
        if ranking.record_username(&registered.username, clock) {
            self.rankings.save(&ranking).await?;
        }
        Ok(())
    }
}

/// Adds a completed quiz's total points to the player's scores.
pub struct QuizSessionCompletedLeaderboardHandler {
    rankings: Arc<dyn UserRepository<PlayerRanking>>,
    clock: Arc<dyn Clock>,
}

impl QuizSessionCompletedLeaderboardHandler {
    /// Creates the handler.
    #[must_use]
    pub fn new(rankings: Arc<dyn UserRepository<PlayerRanking>>, clock: Arc<dyn Clock>) -> Self {
        Self { rankings, clock }
    }
}

#[async_trait]
impl EventHandler for QuizSessionCompletedLeaderboardHandler {
    fn handler_name(&self) -> &'static str {
        "leaderboard.quiz_session_completed"
    }

    fn subscriptions(&self) -> &'static [&'static str] {
        &[QUIZ_SESSION_COMPLETED_EVENT_TYPE]
    }

    async fn handle(
        &self,
        event: &GameEvent,
        _publisher: &dyn EventPublisher,
    ) -> Result<(), DomainError> {
        let GameEventKind::QuizSessionCompleted(completed) = &event.kind else {
            return Err(unexpected_event(self.handler_name(), event));
        };
        let clock = self.clock.as_ref();
        let mut ranking = self.rankings.get_or_create(completed.user_id, clock).await?;
        ranking.add_score(completed.total_points, clock);
        self.rankings.save(&ranking).await?;
        info!(
            user_id = %completed.user_id,
            points = completed.total_points,
            global_score = ranking.global_score(),
            "leaderboard score updated"
        );
        Ok(())
    }
}
