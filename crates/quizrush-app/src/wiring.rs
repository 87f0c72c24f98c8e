//! Repositories and the choreography registry.
//!
//! Reactions are registered Economy first, then Gamification, then
//! Leaderboard. For a completed quiz this means coins are credited before XP
//! is awarded, and a level-up bonus lands inside the Gamification reaction.

use std::sync::Arc;

use quizrush_core::clock::Clock;
use quizrush_economy::application::event_handlers::{
    LevelUpEconomyHandler, QuizSessionCompletedEconomyHandler, QuizSessionStartedEconomyHandler,
    UserRegisteredEconomyHandler,
};
use quizrush_economy::domain::lives::Lives;
use quizrush_economy::domain::wallet::Wallet;
use quizrush_event_bus::HandlerRegistry;
use quizrush_gamification::application::event_handlers::{
    QuizSessionCompletedGamificationHandler, UserRegisteredGamificationHandler,
};
use quizrush_gamification::domain::progress::PlayerProgress;
use quizrush_leaderboard::application::event_handlers::{
    QuizSessionCompletedLeaderboardHandler, UserRegisteredLeaderboardHandler,
};
use quizrush_leaderboard::domain::ranking::PlayerRanking;
use quizrush_quiz::domain::question::Question;
use quizrush_quiz::domain::session::QuizSession;
use quizrush_store::InMemoryRepository;

/// Every aggregate store of one backend instance.
#[derive(Debug, Clone, Default)]
pub struct Repositories {
    /// Questions.
    pub questions: Arc<InMemoryRepository<Question>>,
    /// Quiz sessions.
    pub sessions: Arc<InMemoryRepository<QuizSession>>,
    /// Wallets.
    pub wallets: Arc<InMemoryRepository<Wallet>>,
    /// Lives.
    pub lives: Arc<InMemoryRepository<Lives>>,
    /// Player progress.
    pub progress: Arc<InMemoryRepository<PlayerProgress>>,
    /// Leaderboard rankings.
    pub rankings: Arc<InMemoryRepository<PlayerRanking>>,
}

/// Builds the frozen registry of choreography reactions.
#[must_use]
pub fn build_registry(repos: &Repositories, clock: &Arc<dyn Clock>) -> HandlerRegistry {
    HandlerRegistry::builder()
        // Economy
        .register(Arc::new(UserRegisteredEconomyHandler::new(
            repos.wallets.clone(),
            repos.lives.clone(),
            Arc::clone(clock),
        )))
        .register(Arc::new(QuizSessionStartedEconomyHandler::new(
            repos.lives.clone(),
            Arc::clone(clock),
        )))
        .register(Arc::new(QuizSessionCompletedEconomyHandler::new(
            repos.wallets.clone(),
            Arc::clone(clock),
        )))
        .register(Arc::new(LevelUpEconomyHandler::new(
            repos.wallets.clone(),
            Arc::clone(clock),
        )))
        // Gamification
        .register(Arc::new(UserRegisteredGamificationHandler::new(
            repos.progress.clone(),
            Arc::clone(clock),
        )))
        .register(Arc::new(QuizSessionCompletedGamificationHandler::new(
            repos.progress.clone(),
            Arc::clone(clock),
        )))
        // Leaderboard
        .register(Arc::new(UserRegisteredLeaderboardHandler::new(
            repos.rankings.clone(),
            Arc::clone(clock),
        )))
        .register(Arc::new(QuizSessionCompletedLeaderboardHandler::new(
            repos.rankings.clone(),
            Arc::clone(clock),
        )))
        .build()
}

#[cfg(test)]
mod tests {
    use quizrush_core::event::{
        LEVEL_UP_EVENT_TYPE, QUIZ_SESSION_COMPLETED_EVENT_TYPE, QUIZ_SESSION_STARTED_EVENT_TYPE,
        USER_REGISTERED_EVENT_TYPE,
    };
    use quizrush_test_support::{FixedClock, fixed_now};

    use super::*;

    #[test]
    fn test_registry_orders_reactions_economy_gamification_leaderboard() {
        let clock: Arc<dyn Clock> = Arc::new(FixedClock(fixed_now()));

        let registry = build_registry(&Repositories::default(), &clock);

        assert_eq!(
            registry.handler_names(USER_REGISTERED_EVENT_TYPE),
            vec![
                "economy.user_registered",
                "gamification.user_registered",
                "leaderboard.user_registered",
            ]
        );
        assert_eq!(
            registry.handler_names(QUIZ_SESSION_COMPLETED_EVENT_TYPE),
            vec![
                "economy.quiz_session_completed",
                "gamification.quiz_session_completed",
                "leaderboard.quiz_session_completed",
            ]
        );
        assert_eq!(registry.handler_names(QUIZ_SESSION_STARTED_EVENT_TYPE).len(), 1);
        assert_eq!(registry.handler_names(LEVEL_UP_EVENT_TYPE).len(), 1);
    }
}
