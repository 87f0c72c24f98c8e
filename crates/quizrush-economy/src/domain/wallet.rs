//! The `Wallet` aggregate: a player's coin ledger.

use chrono::{DateTime, Utc};
use quizrush_core::aggregate::{AggregateRoot, UserAggregate};
use quizrush_core::clock::Clock;
use quizrush_core::error::DomainError;
use quizrush_core::event::{Causation, CoinsEarned, CoinsSpent, GameEvent, GameEventKind};
use uuid::Uuid;

/// The aggregate root for a player's coins.
///
/// `balance` always equals `lifetime_earned - lifetime_spent` and never
/// goes negative.
#[derive(Debug, Clone)]
pub struct Wallet {
    id: Uuid,
    user_id: Uuid,
    balance: i64,
    lifetime_earned: i64,
    lifetime_spent: i64,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    /// Uncommitted events pending publication.
    uncommitted_events: Vec<GameEvent>,
}

impl Wallet {
    /// Credits `amount` coins, producing a `CoinsEarned` event.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvariantViolation` if `amount` is not positive
    /// or the balance would overflow. The wallet is unchanged on error.
    pub fn add_coins(
        &mut self,
        amount: i64,
        source: &str,
        description: Option<&str>,
        cause: Causation,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        if amount <= 0 {
            return Err(DomainError::invariant("Amount must be positive"));
        }

        let (Some(balance), Some(lifetime_earned)) = (
            self.balance.checked_add(amount),
            self.lifetime_earned.checked_add(amount),
        ) else {
            return Err(DomainError::invariant("Balance overflow"));
        };

        let now = clock.now();
        self.balance = balance;
        self.lifetime_earned = lifetime_earned;
        self.updated_at = now;

        self.uncommitted_events.push(GameEvent::new(
            self.id,
            cause,
            now,
            GameEventKind::CoinsEarned(CoinsEarned {
                user_id: self.user_id,
                amount,
                source: source.to_owned(),
                description: description.map(str::to_owned),
                balance_after: self.balance,
            }),
        ));
        Ok(())
    }

    /// Debits `amount` coins, producing a `CoinsSpent` event.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvariantViolation` if `amount` is not positive
    /// or exceeds the balance. The wallet is unchanged on error.
    pub fn spend_coins(
        &mut self,
        amount: i64,
        source: &str,
        description: Option<&str>,
        cause: Causation,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        if amount <= 0 {
            return Err(DomainError::invariant("Amount must be positive"));
        }
        if !self.has_balance(amount) {
            return Err(DomainError::invariant("Insufficient balance"));
        }

        let Some(lifetime_spent) = self.lifetime_spent.checked_add(amount) else {
            return Err(DomainError::invariant("Balance overflow"));
        };

        let now = clock.now();
        self.balance -= amount;
        self.lifetime_spent = lifetime_spent;
        self.updated_at = now;

        self.uncommitted_events.push(GameEvent::new(
            self.id,
            cause,
            now,
            GameEventKind::CoinsSpent(CoinsSpent {
                user_id: self.user_id,
                amount,
                source: source.to_owned(),
                description: description.map(str::to_owned),
                balance_after: self.balance,
            }),
        ));
        Ok(())
    }

    /// Whether the wallet holds at least `amount` coins.
    #[must_use]
    pub fn has_balance(&self, amount: i64) -> bool {
        self.balance >= amount
    }

    /// Wallet identifier.
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Current balance.
    #[must_use]
    pub fn balance(&self) -> i64 {
        self.balance
    }

    /// Total coins ever credited.
    #[must_use]
    pub fn lifetime_earned(&self) -> i64 {
        self.lifetime_earned
    }

    /// Total coins ever debited.
    #[must_use]
    pub fn lifetime_spent(&self) -> i64 {
        self.lifetime_spent
    }

    /// Creation timestamp.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Last modification timestamp.
    #[must_use]
    pub fn updated_at(&self) -> DateTime<Utc> {
        self.updated_at
    }
}

impl AggregateRoot for Wallet {
    fn aggregate_id(&self) -> Uuid {
        self.id
    }

    fn uncommitted_events(&self) -> &[GameEvent] {
        &self.uncommitted_events
    }

    fn clear_uncommitted_events(&mut self) {
        self.uncommitted_events.clear();
    }
}

impl UserAggregate for Wallet {
    fn user_id(&self) -> Uuid {
        self.user_id
    }

    fn new_for_user(id: Uuid, user_id: Uuid, now: DateTime<Utc>) -> Self {
        Self {
            id,
            user_id,
            balance: 0,
            lifetime_earned: 0,
            lifetime_spent: 0,
            created_at: now,
            updated_at: now,
            uncommitted_events: Vec::new(),
        }
    }
}
