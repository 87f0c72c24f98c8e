//! Domain event abstractions and the closed event catalog.
//!
//! Every fact any bounded context can publish is a variant of
//! [`GameEventKind`], with one concrete payload struct per event name.
//! Handlers subscribe by exact event name and pattern-match the payload.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Event name for [`UserRegistered`].
pub const USER_REGISTERED_EVENT_TYPE: &str = "user.registered";
/// Event name for [`QuestionCreated`].
pub const QUESTION_CREATED_EVENT_TYPE: &str = "question.created";
/// Event name for [`QuizSessionStarted`].
pub const QUIZ_SESSION_STARTED_EVENT_TYPE: &str = "quiz.session.started";
/// Event name for [`QuizSessionCompleted`].
pub const QUIZ_SESSION_COMPLETED_EVENT_TYPE: &str = "quiz.session.completed";
/// Event name for [`CoinsEarned`].
pub const COINS_EARNED_EVENT_TYPE: &str = "coins.earned";
/// Event name for [`CoinsSpent`].
pub const COINS_SPENT_EVENT_TYPE: &str = "coins.spent";
/// Event name for [`LifeConsumed`].
pub const LIFE_CONSUMED_EVENT_TYPE: &str = "life.consumed";
/// Event name for [`LifeRestored`].
pub const LIFE_RESTORED_EVENT_TYPE: &str = "life.restored";
/// Event name for [`LevelUp`].
pub const LEVEL_UP_EVENT_TYPE: &str = "player.level_up";
/// Event name for [`StreakUpdated`].
pub const STREAK_UPDATED_EVENT_TYPE: &str = "player.streak_updated";

/// Metadata attached to every domain event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventMetadata {
    /// Unique event identifier.
    pub event_id: Uuid,
    /// Stable dot-namespaced event name.
    pub event_type: String,
    /// Aggregate that produced this event.
    pub aggregate_id: Uuid,
    /// Correlation ID for tracing a command through its effects.
    pub correlation_id: Uuid,
    /// Causation ID linking this event to the event/command that caused it.
    pub causation_id: Uuid,
    /// Timestamp of event creation.
    pub occurred_at: DateTime<Utc>,
}

/// Correlation/causation pair threaded into every mutating aggregate method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Causation {
    /// Correlation ID shared by everything a single command sets in motion.
    pub correlation_id: Uuid,
    /// The command or event that directly caused the mutation.
    pub causation_id: Uuid,
}

impl Causation {
    /// Causation for a mutation issued directly by a command.
    #[must_use]
    pub fn root(correlation_id: Uuid) -> Self {
        Self {
            correlation_id,
            causation_id: correlation_id,
        }
    }

    /// Causation for a mutation performed in reaction to `event`.
    #[must_use]
    pub fn caused_by(event: &GameEvent) -> Self {
        Self {
            correlation_id: event.metadata.correlation_id,
            causation_id: event.metadata.event_id,
        }
    }
}

/// Emitted by the identity collaborator once a user account exists.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRegistered {
    /// The new user.
    pub user_id: Uuid,
    /// Registered e-mail address.
    pub email: String,
    /// Chosen display name.
    pub username: String,
}

/// Emitted when a question is authored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionCreated {
    /// The question identifier.
    pub question_id: Uuid,
    /// Category the question belongs to.
    pub category_id: Uuid,
    /// Difficulty tier.
    pub difficulty_id: Uuid,
    /// Author.
    pub created_by_id: Uuid,
}

/// Emitted when a quiz session starts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizSessionStarted {
    /// The session identifier.
    pub session_id: Uuid,
    /// The player.
    pub user_id: Uuid,
    /// Optional category filter.
    pub category_id: Option<Uuid>,
    /// Difficulty tier.
    pub difficulty_id: Uuid,
}

/// Emitted when a quiz session completes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizSessionCompleted {
    /// The session identifier.
    pub session_id: Uuid,
    /// The player.
    pub user_id: Uuid,
    /// Optional category filter.
    pub category_id: Option<Uuid>,
    /// Difficulty tier.
    pub difficulty_id: Uuid,
    /// Session score at completion.
    pub score: u64,
    /// Number of recorded answers.
    pub total_questions: u32,
    /// Number of correct answers.
    pub correct_answers: u32,
    /// Sum of points earned plus time bonuses.
    pub total_points: u64,
    /// Whether every recorded answer was correct.
    pub is_perfect_score: bool,
}

/// Emitted when coins are credited to a wallet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoinsEarned {
    /// Wallet owner.
    pub user_id: Uuid,
    /// Credited amount.
    pub amount: i64,
    /// Machine-readable source, e.g. `quiz_reward`.
    pub source: String,
    /// Optional human-readable description.
    pub description: Option<String>,
    /// Balance after the credit.
    pub balance_after: i64,
}

/// Emitted when coins are debited from a wallet.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CoinsSpent {
    /// Wallet owner.
    pub user_id: Uuid,
    /// Debited amount.
    pub amount: i64,
    /// Machine-readable source, e.g. `shop_purchase`.
    pub source: String,
    /// Optional human-readable description.
    pub description: Option<String>,
    /// Balance after the debit.
    pub balance_after: i64,
}

/// Emitted when a life is consumed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifeConsumed {
    /// Lives owner.
    pub user_id: Uuid,
    /// Lives left after consumption.
    pub lives_remaining: u32,
}

/// Emitted when lives are restored, by purchase or by regeneration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LifeRestored {
    /// Lives owner.
    pub user_id: Uuid,
    /// Lives after restoration.
    pub lives_remaining: u32,
    /// Whether the life was bought in the shop.
    pub is_purchased: bool,
}

/// Emitted once per `add_xp` call that raises the player's level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelUp {
    /// The player.
    pub user_id: Uuid,
    /// Level reached (final level if several thresholds were crossed).
    pub new_level: u32,
    /// Total XP after the award.
    pub total_xp: i64,
}

/// Emitted whenever the streak is incremented.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StreakUpdated {
    /// The player.
    pub user_id: Uuid,
    /// Streak after the increment.
    pub current_streak: u32,
    /// Longest streak ever observed.
    pub longest_streak: u32,
}

/// Event payload variants across all bounded contexts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEventKind {
    /// A user account has been registered.
    UserRegistered(UserRegistered),
    /// A question has been authored.
    QuestionCreated(QuestionCreated),
    /// A quiz session has started.
    QuizSessionStarted(QuizSessionStarted),
    /// A quiz session has completed.
    QuizSessionCompleted(QuizSessionCompleted),
    /// Coins have been credited.
    CoinsEarned(CoinsEarned),
    /// Coins have been debited.
    CoinsSpent(CoinsSpent),
    /// A life has been consumed.
    LifeConsumed(LifeConsumed),
    /// Lives have been restored.
    LifeRestored(LifeRestored),
    /// The player reached a new level.
    LevelUp(LevelUp),
    /// The player's streak changed.
    StreakUpdated(StreakUpdated),
}

impl GameEventKind {
    /// Returns the stable event name for this payload.
    #[must_use]
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::UserRegistered(_) => USER_REGISTERED_EVENT_TYPE,
            Self::QuestionCreated(_) => QUESTION_CREATED_EVENT_TYPE,
            Self::QuizSessionStarted(_) => QUIZ_SESSION_STARTED_EVENT_TYPE,
            Self::QuizSessionCompleted(_) => QUIZ_SESSION_COMPLETED_EVENT_TYPE,
            Self::CoinsEarned(_) => COINS_EARNED_EVENT_TYPE,
            Self::CoinsSpent(_) => COINS_SPENT_EVENT_TYPE,
            Self::LifeConsumed(_) => LIFE_CONSUMED_EVENT_TYPE,
            Self::LifeRestored(_) => LIFE_RESTORED_EVENT_TYPE,
            Self::LevelUp(_) => LEVEL_UP_EVENT_TYPE,
            Self::StreakUpdated(_) => STREAK_UPDATED_EVENT_TYPE,
        }
    }
}

/// Trait that all domain events implement.
pub trait DomainEvent: Send + Sync + std::fmt::Debug {
    /// Returns the event type name (used for subscription routing).
    fn event_type(&self) -> &'static str;

    /// Serializes the event payload to JSON.
    fn to_payload(&self) -> serde_json::Value;

    /// Returns the metadata for this event.
    fn metadata(&self) -> &EventMetadata;

    /// Returns the identifier of the aggregate that produced the event.
    fn aggregate_id(&self) -> Uuid {
        self.metadata().aggregate_id
    }
}

/// Immutable, timestamped domain event envelope.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GameEvent {
    /// Event metadata.
    pub metadata: EventMetadata,
    /// Event-specific payload.
    pub kind: GameEventKind,
}

impl GameEvent {
    /// Builds an event for `aggregate_id` with a fresh event identifier.
    #[must_use]
    pub fn new(
        aggregate_id: Uuid,
        cause: Causation,
        occurred_at: DateTime<Utc>,
        kind: GameEventKind,
    ) -> Self {
        // TODO: event_id uses Uuid::new_v4(); thread DeterministicRng through
        // aggregate methods if replayable event ids are ever needed.
        Self {
            metadata: EventMetadata {
                event_id: Uuid::new_v4(),
                event_type: kind.event_type().to_owned(),
                aggregate_id,
                correlation_id: cause.correlation_id,
                causation_id: cause.causation_id,
                occurred_at,
            },
            kind,
        }
    }
}

impl DomainEvent for GameEvent {
    fn event_type(&self) -> &'static str {
        self.kind.event_type()
    }

    fn to_payload(&self) -> serde_json::Value {
        // Serialization of derived Serialize types to Value is infallible.
        serde_json::to_value(&self.kind).expect("GameEventKind serialization is infallible")
    }

    fn metadata(&self) -> &EventMetadata {
        &self.metadata
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap()
    }

    #[test]
    fn test_new_event_carries_kind_name_and_causation() {
        // Arrange
        let aggregate_id = Uuid::new_v4();
        let correlation_id = Uuid::new_v4();
        let kind = GameEventKind::LifeConsumed(LifeConsumed {
            user_id: Uuid::new_v4(),
            lives_remaining: 4,
        });

        // Act
        let event = GameEvent::new(
            aggregate_id,
            Causation::root(correlation_id),
            fixed_now(),
            kind,
        );

        // Assert
        assert_eq!(event.event_type(), LIFE_CONSUMED_EVENT_TYPE);
        assert_eq!(event.metadata.event_type, "life.consumed");
        assert_eq!(event.aggregate_id(), aggregate_id);
        assert_eq!(event.metadata.correlation_id, correlation_id);
        assert_eq!(event.metadata.causation_id, correlation_id);
        assert_eq!(event.metadata.occurred_at, fixed_now());
    }

    #[test]
    fn test_caused_by_keeps_correlation_and_points_at_trigger() {
        // Arrange
        let correlation_id = Uuid::new_v4();
        let trigger = GameEvent::new(
            Uuid::new_v4(),
            Causation::root(correlation_id),
            fixed_now(),
            GameEventKind::LevelUp(LevelUp {
                user_id: Uuid::new_v4(),
                new_level: 2,
                total_xp: 1000,
            }),
        );

        // Act
        let cause = Causation::caused_by(&trigger);

        // Assert
        assert_eq!(cause.correlation_id, correlation_id);
        assert_eq!(cause.causation_id, trigger.metadata.event_id);
    }

    #[test]
    fn test_payload_is_tagged_by_variant() {
        let event = GameEvent::new(
            Uuid::new_v4(),
            Causation::root(Uuid::new_v4()),
            fixed_now(),
            GameEventKind::StreakUpdated(StreakUpdated {
                user_id: Uuid::nil(),
                current_streak: 3,
                longest_streak: 5,
            }),
        );

        let payload = event.to_payload();

        assert_eq!(payload["StreakUpdated"]["current_streak"], 3);
        assert_eq!(payload["StreakUpdated"]["longest_streak"], 5);
    }

    #[test]
    fn test_event_names_are_dot_namespaced() {
        let completed = GameEventKind::QuizSessionCompleted(QuizSessionCompleted {
            session_id: Uuid::nil(),
            user_id: Uuid::nil(),
            category_id: None,
            difficulty_id: Uuid::nil(),
            score: 0,
            total_questions: 0,
            correct_answers: 0,
            total_points: 0,
            is_perfect_score: true,
        });

        assert_eq!(completed.event_type(), "quiz.session.completed");
        assert_eq!(LEVEL_UP_EVENT_TYPE, "player.level_up");
    }
}
