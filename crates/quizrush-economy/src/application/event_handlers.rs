//! Choreography reactions owned by the Economy context.
//!
//! Each reaction loads (or creates) its own aggregate, mutates it, persists
//! it and publishes whatever it produced. Failures are logged and returned
//! to the bus; nothing is compensated.

use std::sync::Arc;

use async_trait::async_trait;
use quizrush_core::aggregate::AggregateRoot;
use quizrush_core::clock::Clock;
use quizrush_core::error::DomainError;
use quizrush_core::event::{
    Causation, GameEvent, GameEventKind, LEVEL_UP_EVENT_TYPE, QUIZ_SESSION_COMPLETED_EVENT_TYPE,
    QUIZ_SESSION_STARTED_EVENT_TYPE, USER_REGISTERED_EVENT_TYPE,
};
use quizrush_core::handler::{EventHandler, EventPublisher, unexpected_event};
use quizrush_core::repository::UserRepository;
use tracing::{error, info, warn};

use crate::domain::lives::Lives;
use crate::domain::wallet::Wallet;

/// Coins per correct answer.
pub const COINS_PER_CORRECT: i64 = 10;
/// Extra coins for a perfect quiz.
pub const PERFECT_SCORE_BONUS: i64 = 50;
/// Coins granted on every level-up.
pub const LEVEL_UP_BONUS: i64 = 100;

/// Sets up an empty wallet and full lives for a newly registered user.
pub struct UserRegisteredEconomyHandler {
    wallets: Arc<dyn UserRepository<Wallet>>,
    lives: Arc<dyn UserRepository<Lives>>,
    clock: Arc<dyn Clock>,
}

impl UserRegisteredEconomyHandler {
    /// Creates the handler.
    #[must_use]
    pub fn new(
        wallets: Arc<dyn UserRepository<Wallet>>,
        lives: Arc<dyn UserRepository<Lives>>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            wallets,
            lives,
            clock,
        }
    }
}

#[async_trait]
impl EventHandler for UserRegisteredEconomyHandler {
    fn handler_name(&self) -> &'static str {
        "economy.user_registered"
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
        info!(user_id = %registered.user_id, "initializing wallet and lives");

        self.wallets
            .get_or_create(registered.user_id, self.clock.as_ref())
            .await?;
        self.lives
            .get_or_create(registered.user_id, self.clock.as_ref())
            .await?;
        Ok(())
    }
}

/// Spends a life when a quiz session starts, after applying any pending
/// regeneration.
pub struct QuizSessionStartedEconomyHandler {
    lives: Arc<dyn UserRepository<Lives>>,
    clock: Arc<dyn Clock>,
}

impl QuizSessionStartedEconomyHandler {
    /// Creates the handler.
    #[must_use]
    pub fn new(lives: Arc<dyn UserRepository<Lives>>, clock: Arc<dyn Clock>) -> Self {
        Self { lives, clock }
    }
}

#[async_trait]
impl EventHandler for QuizSessionStartedEconomyHandler {
    fn handler_name(&self) -> &'static str {
        "economy.quiz_session_started"
    }

    fn subscriptions(&self) -> &'static [&'static str] {
        &[QUIZ_SESSION_STARTED_EVENT_TYPE]
    }

    async fn handle(
        &self,
        event: &GameEvent,
        publisher: &dyn EventPublisher,
    ) -> Result<(), DomainError> {
        let GameEventKind::QuizSessionStarted(started) = &event.kind else {
            return Err(unexpected_event(self.handler_name(), event));
        };
        let user_id = started.user_id;
        info!(%user_id, session_id = %started.session_id, "consuming life for quiz session");

        let clock = self.clock.as_ref();
        let cause = Causation::caused_by(event);
        let mut lives = self.lives.get_or_create(user_id, clock).await?;
        lives.regenerate_lives(cause, clock);
        if let Err(error) = lives.consume_life(cause, clock) {
            warn!(%user_id, %error, "no life to consume; session stays started");
            return Err(error);
        }

        let events = lives.take_uncommitted_events();
        self.lives.save(&lives).await?;
        publisher
            .publish_all(events)
            .await
            .inspect_err(|error| error!(%user_id, %error, "life event subscribers failed"))?;
        info!(%user_id, lives_remaining = lives.current_lives(), "life consumed");
        Ok(())
    }
}

/// Awards coins for a completed quiz.
pub struct QuizSessionCompletedEconomyHandler {
    wallets: Arc<dyn UserRepository<Wallet>>,
    clock: Arc<dyn Clock>,
}

impl QuizSessionCompletedEconomyHandler {
    /// Creates the handler.
    #[must_use]
    pub fn new(wallets: Arc<dyn UserRepository<Wallet>>, clock: Arc<dyn Clock>) -> Self {
        Self { wallets, clock }
    }
}

#[async_trait]
impl EventHandler for QuizSessionCompletedEconomyHandler {
    fn handler_name(&self) -> &'static str {
        "economy.quiz_session_completed"
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
            "awarding coins for quiz"
        );

        let clock = self.clock.as_ref();
        let cause = Causation::caused_by(event);
        let mut wallet = self.wallets.get_or_create(user_id, clock).await?;

        // A zero-correct run earns nothing; crediting zero would be rejected.
        let base = i64::from(completed.correct_answers) * COINS_PER_CORRECT;
        if base > 0 {
            let description = format!(
                "Answered {} questions correctly",
                completed.correct_answers
            );
            wallet.add_coins(base, "quiz_reward", Some(description.as_str()), cause, clock)?;
        }
        if completed.is_perfect_score {
            wallet.add_coins(
                PERFECT_SCORE_BONUS,
                "perfect_score_bonus",
                Some("Perfect quiz score!"),
                cause,
                clock,
            )?;
        }

        let events = wallet.take_uncommitted_events();
        self.wallets.save(&wallet).await?;
        publisher
            .publish_all(events)
            .await
            .inspect_err(|error| error!(%user_id, %error, "coin event subscribers failed"))?;
        info!(%user_id, balance = wallet.balance(), "quiz coins awarded");
        Ok(())
    }
}

/// Grants the level-up coin bonus.
pub struct LevelUpEconomyHandler {
    wallets: Arc<dyn UserRepository<Wallet>>,
    clock: Arc<dyn Clock>,
}

impl LevelUpEconomyHandler {
    /// Creates the handler.
    #[must_use]
    pub fn new(wallets: Arc<dyn UserRepository<Wallet>>, clock: Arc<dyn Clock>) -> Self {
        Self { wallets, clock }
    }
}

#[async_trait]
impl EventHandler for LevelUpEconomyHandler {
    fn handler_name(&self) -> &'static str {
        "economy.level_up"
    }

    fn subscriptions(&self) -> &'static [&'static str] {
        &[LEVEL_UP_EVENT_TYPE]
    }

    async fn handle(
        &self,
        event: &GameEvent,
        publisher: &dyn EventPublisher,
    ) -> Result<(), DomainError> {
        let GameEventKind::LevelUp(level_up) = &event.kind else {
            return Err(unexpected_event(self.handler_name(), event));
        };
        let user_id = level_up.user_id;
        info!(%user_id, new_level = level_up.new_level, "awarding level-up bonus");

        let clock = self.clock.as_ref();
        let mut wallet = self.wallets.get_or_create(user_id, clock).await?;
        let description = format!("Reached level {}", level_up.new_level);
        wallet.add_coins(
            LEVEL_UP_BONUS,
            "level_up_bonus",
            Some(description.as_str()),
            Causation::caused_by(event),
            clock,
        )?;

        let events = wallet.take_uncommitted_events();
        self.wallets.save(&wallet).await?;
        publisher
            .publish_all(events)
            .await
            .inspect_err(|error| error!(%user_id, %error, "coin event subscribers failed"))?;
        Ok(())
    }
}
