//! Typed command and query facade over every bounded context.
//!
//! Callers hand in already validated inputs and a trusted user ID; the
//! facade supplies the clock, the RNG, the repositories and the event bus.

use std::sync::Arc;

use quizrush_core::clock::{Clock, SystemClock};
use quizrush_core::event::{Causation, GameEvent, GameEventKind, UserRegistered};
use quizrush_core::handler::EventPublisher;
use quizrush_core::rng::DeterministicRng;
use quizrush_economy::application::command_handlers::{PurchaseResult, handle_purchase_item};
use quizrush_economy::application::query_handlers::{
    LivesView, ShopItemView, WalletView, get_lives, get_shop_items, get_wallet,
};
use quizrush_economy::domain::commands::PurchaseItem;
use quizrush_economy::domain::shop::ShopCatalog;
use quizrush_event_bus::InProcessEventBus;
use quizrush_gamification::application::command_handlers::{
    ProgressCommandResult, handle_reset_streak,
};
use quizrush_gamification::application::query_handlers::{ProgressView, get_progress};
use quizrush_gamification::domain::commands::ResetStreak;
use quizrush_leaderboard::application::command_handlers::{
    LeaderboardCommandResult, handle_recompute_ranks, handle_reset_weekly_scores,
};
use quizrush_leaderboard::application::query_handlers::{
    LeaderboardEntry, LeaderboardPeriod, get_leaderboard,
};
use quizrush_leaderboard::domain::commands::{RecomputeRanks, ResetWeeklyScores};
use quizrush_quiz::application::command_handlers::{
    CompletedQuizSession, QuizCommandResult, SessionSettings, StartedQuizSession,
    SubmitAnswerResult, handle_abandon_quiz_session, handle_archive_question,
    handle_complete_quiz_session, handle_create_question, handle_publish_question,
    handle_start_quiz_session, handle_submit_answer,
};
use quizrush_quiz::application::query_handlers::{
    QuestionView, QuizSessionView, get_question_by_id, get_session_by_id, list_sessions_for_user,
};
use quizrush_quiz::domain::commands::{
    AbandonQuizSession, ArchiveQuestion, CompleteQuizSession, CreateQuestion, PublishQuestion,
    StartQuizSession, SubmitAnswer,
};
use quizrush_store::InMemoryShopCatalog;
use tracing::info;
use uuid::Uuid;

use crate::config::AppConfig;
use crate::error::AppError;
use crate::rng::{SharedRng, SystemRng};
use crate::wiring::{Repositories, build_registry};

/// One running game backend.
pub struct QuizRushApp {
    settings: SessionSettings,
    clock: Arc<dyn Clock>,
    rng: SharedRng,
    catalog: Arc<dyn ShopCatalog>,
    repos: Repositories,
    bus: InProcessEventBus,
}

impl QuizRushApp {
    /// Wires a backend from explicit collaborators.
    #[must_use]
    pub fn new(
        config: &AppConfig,
        clock: Arc<dyn Clock>,
        rng: Box<dyn DeterministicRng>,
        catalog: Arc<dyn ShopCatalog>,
    ) -> Self {
        let repos = Repositories::default();
        let registry = build_registry(&repos, &clock);
        Self {
            settings: config.session_settings(),
            clock,
            rng: SharedRng::new(rng),
            catalog,
            repos,
            bus: InProcessEventBus::new(Arc::new(registry)),
        }
    }

    /// Wires a backend on the system clock and an OS-seeded RNG.
    #[must_use]
    pub fn with_system_defaults(config: &AppConfig, catalog: InMemoryShopCatalog) -> Self {
        Self::new(
            config,
            Arc::new(SystemClock),
            Box::new(SystemRng::new()),
            Arc::new(catalog),
        )
    }

    /// The aggregate stores behind this backend.
    #[must_use]
    pub fn repositories(&self) -> &Repositories {
        &self.repos
    }

    /// The bus every command publishes through.
    #[must_use]
    pub fn event_bus(&self) -> &InProcessEventBus {
        &self.bus
    }

    // --- identity boundary ---

    /// Publishes `user.registered` for an account created by the identity
    /// service, initializing the player's wallet, lives, progress and
    /// ranking.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Domain` if a reaction fails.
    pub async fn on_user_registered(
        &self,
        user_id: Uuid,
        email: &str,
        username: &str,
    ) -> Result<(), AppError> {
        info!(%user_id, "user registered");
        let event = GameEvent::new(
            user_id,
            Causation::root(Uuid::new_v4()),
            self.clock.now(),
            GameEventKind::UserRegistered(UserRegistered {
                user_id,
                email: email.to_owned(),
                username: username.to_owned(),
            }),
        );
        self.bus.publish_all(vec![event]).await?;
        Ok(())
    }

    // --- quiz commands ---

    /// Authors a draft question.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Domain` on invalid input.
    pub async fn create_question(
        &self,
        command: &CreateQuestion,
    ) -> Result<QuizCommandResult, AppError> {
        Ok(handle_create_question(
            command,
            self.clock.as_ref(),
            self.repos.questions.as_ref(),
            &self.bus,
        )
        .await?)
    }

    /// Makes a question playable.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Domain` if the question is missing or not a draft.
    pub async fn publish_question(
        &self,
        command: &PublishQuestion,
    ) -> Result<QuizCommandResult, AppError> {
        Ok(
            handle_publish_question(command, self.clock.as_ref(), self.repos.questions.as_ref())
                .await?,
        )
    }

    /// Retires a question.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Domain` if the question is missing or archived.
    pub async fn archive_question(
        &self,
        command: &ArchiveQuestion,
    ) -> Result<QuizCommandResult, AppError> {
        Ok(
            handle_archive_question(command, self.clock.as_ref(), self.repos.questions.as_ref())
                .await?,
        )
    }

    /// Starts a timed session, consuming one life through choreography.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Domain` if the user already plays, too few
    /// questions exist, or the player has no life left. In the last case the
    /// session stays persisted as started.
    pub async fn start_quiz_session(
        &self,
        command: &StartQuizSession,
    ) -> Result<StartedQuizSession, AppError> {
        Ok(handle_start_quiz_session(
            command,
            self.settings,
            self.clock.as_ref(),
            &mut self.rng.handle(),
            self.repos.questions.as_ref(),
            self.repos.sessions.as_ref(),
            &self.bus,
        )
        .await?)
    }

    /// Records one answer.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Domain` for unknown ids, a duplicate answer, or an
    /// expired session.
    pub async fn submit_answer(
        &self,
        command: &SubmitAnswer,
    ) -> Result<SubmitAnswerResult, AppError> {
        Ok(handle_submit_answer(
            command,
            self.clock.as_ref(),
            self.repos.questions.as_ref(),
            self.repos.sessions.as_ref(),
        )
        .await?)
    }

    /// Completes a session and runs the reward saga.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Domain` if the session is not in progress or a
    /// reaction fails.
    pub async fn complete_quiz_session(
        &self,
        command: &CompleteQuizSession,
    ) -> Result<CompletedQuizSession, AppError> {
        Ok(handle_complete_quiz_session(
            command,
            self.clock.as_ref(),
            self.repos.sessions.as_ref(),
            &self.bus,
        )
        .await?)
    }

    /// Abandons a session. Nothing is published.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Domain` if the session is not in progress.
    pub async fn abandon_quiz_session(
        &self,
        command: &AbandonQuizSession,
    ) -> Result<QuizCommandResult, AppError> {
        Ok(
            handle_abandon_quiz_session(command, self.clock.as_ref(), self.repos.sessions.as_ref())
                .await?,
        )
    }

    // --- economy commands ---

    /// Buys a shop item.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Domain` for an unknown or unavailable item or an
    /// insufficient balance.
    pub async fn purchase_item(&self, command: &PurchaseItem) -> Result<PurchaseResult, AppError> {
        Ok(handle_purchase_item(
            command,
            self.clock.as_ref(),
            self.catalog.as_ref(),
            self.repos.wallets.as_ref(),
            self.repos.lives.as_ref(),
            &self.bus,
        )
        .await?)
    }

    // --- periodic jobs ---

    /// Breaks a player's streak.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Domain` if the store fails.
    pub async fn reset_streak(
        &self,
        command: &ResetStreak,
    ) -> Result<ProgressCommandResult, AppError> {
        Ok(handle_reset_streak(command, self.clock.as_ref(), self.repos.progress.as_ref()).await?)
    }

    /// Recomputes every global and weekly rank.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Domain` if the store fails.
    pub async fn recompute_ranks(
        &self,
        command: &RecomputeRanks,
    ) -> Result<LeaderboardCommandResult, AppError> {
        Ok(
            handle_recompute_ranks(command, self.clock.as_ref(), self.repos.rankings.as_ref())
                .await?,
        )
    }

    /// Zeroes every weekly score.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Domain` if the store fails.
    pub async fn reset_weekly_scores(
        &self,
        command: &ResetWeeklyScores,
    ) -> Result<LeaderboardCommandResult, AppError> {
        Ok(
            handle_reset_weekly_scores(command, self.clock.as_ref(), self.repos.rankings.as_ref())
                .await?,
        )
    }

    // --- queries ---

    /// A question with its correct answer.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Domain` if the question does not exist.
    pub async fn question(&self, question_id: Uuid) -> Result<QuestionView, AppError> {
        Ok(get_question_by_id(question_id, self.repos.questions.as_ref()).await?)
    }

    /// A quiz session.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Domain` if the session does not exist.
    pub async fn session(&self, session_id: Uuid) -> Result<QuizSessionView, AppError> {
        Ok(get_session_by_id(session_id, self.repos.sessions.as_ref()).await?)
    }

    /// A player's sessions, newest first.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Domain` if the store fails.
    pub async fn sessions_for_user(&self, user_id: Uuid) -> Result<Vec<QuizSessionView>, AppError> {
        Ok(list_sessions_for_user(user_id, self.repos.sessions.as_ref()).await?)
    }

    /// A player's wallet.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Domain` if the store fails.
    pub async fn wallet(&self, user_id: Uuid) -> Result<WalletView, AppError> {
        Ok(get_wallet(user_id, self.clock.as_ref(), self.repos.wallets.as_ref()).await?)
    }

    /// A player's lives, after pending regeneration.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Domain` if the store or a subscriber fails.
    pub async fn lives(&self, user_id: Uuid) -> Result<LivesView, AppError> {
        Ok(get_lives(
            user_id,
            self.clock.as_ref(),
            self.repos.lives.as_ref(),
            &self.bus,
        )
        .await?)
    }

    /// Shop items currently on sale.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Domain` if the catalogue fails.
    pub async fn shop_items(&self) -> Result<Vec<ShopItemView>, AppError> {
        Ok(get_shop_items(self.catalog.as_ref()).await?)
    }

    /// A player's XP, level, streak and statistics.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Domain` if the store fails.
    pub async fn progress(&self, user_id: Uuid) -> Result<ProgressView, AppError> {
        Ok(get_progress(user_id, self.clock.as_ref(), self.repos.progress.as_ref()).await?)
    }

    /// The top `limit` players for `period`.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Domain` if the store fails.
    pub async fn leaderboard(
        &self,
        period: LeaderboardPeriod,
        limit: usize,
    ) -> Result<Vec<LeaderboardEntry>, AppError> {
        Ok(get_leaderboard(period, limit, self.repos.rankings.as_ref()).await?)
    }
}
