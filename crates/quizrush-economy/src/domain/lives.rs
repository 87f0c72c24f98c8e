//! The `Lives` aggregate: hearts spent to play, regenerated over time.
//!
//! Regeneration is lazy. Nothing ticks in the background; elapsed intervals
//! are counted whenever `regenerate_lives` is called, which happens before a
//! life is consumed and whenever the lives are read.

use chrono::{DateTime, Duration, Utc};
use quizrush_core::aggregate::{AggregateRoot, UserAggregate};
use quizrush_core::clock::Clock;
use quizrush_core::error::DomainError;
use quizrush_core::event::{Causation, GameEvent, GameEventKind, LifeConsumed, LifeRestored};
use uuid::Uuid;

/// Lives a new player starts with and regeneration caps at.
pub const DEFAULT_MAX_LIVES: u32 = 5;
/// Minutes per regenerated life.
pub const REGEN_INTERVAL_MINUTES: i64 = 30;

/// The aggregate root for a player's lives.
#[derive(Debug, Clone)]
pub struct Lives {
    id: Uuid,
    user_id: Uuid,
    current_lives: u32,
    max_lives: u32,
    /// Anchor of the running regeneration timer; `None` when not regenerating.
    last_regen_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    /// Uncommitted events pending publication.
    uncommitted_events: Vec<GameEvent>,
}

impl Lives {
    /// Spends one life, producing a `LifeConsumed` event. Starts the
    /// regeneration timer if it is not already running.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvariantViolation` if no lives are left.
    pub fn consume_life(&mut self, cause: Causation, clock: &dyn Clock) -> Result<(), DomainError> {
        if self.current_lives == 0 {
            return Err(DomainError::invariant("No lives available"));
        }

        let now = clock.now();
        self.current_lives -= 1;
        self.updated_at = now;
        if self.current_lives < self.max_lives && self.last_regen_at.is_none() {
            self.last_regen_at = Some(now);
        }

        self.uncommitted_events.push(GameEvent::new(
            self.id,
            cause,
            now,
            GameEventKind::LifeConsumed(LifeConsumed {
                user_id: self.user_id,
                lives_remaining: self.current_lives,
            }),
        ));
        Ok(())
    }

    /// Adds one life, producing a `LifeRestored` event. A purchased life may
    /// take the count above the maximum.
    ///
    /// # Errors
    ///
    /// Returns `DomainError::InvariantViolation` if the life is not
    /// purchased and the lives are already at maximum.
    pub fn restore_life(
        &mut self,
        is_purchased: bool,
        cause: Causation,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        if !is_purchased && self.current_lives >= self.max_lives {
            return Err(DomainError::invariant("Lives already at maximum"));
        }

        let now = clock.now();
        self.current_lives = self.current_lives.saturating_add(1);
        self.updated_at = now;
        self.last_regen_at = if self.current_lives >= self.max_lives {
            None
        } else {
            Some(now)
        };

        self.push_restored(is_purchased, cause, now);
        Ok(())
    }

    /// Restores one life per full interval elapsed since the timer anchor,
    /// up to the maximum, and returns how many were restored.
    ///
    /// The whole batch is one update: the anchor advances by exactly the
    /// consumed intervals (so partial progress is kept), or is cleared once
    /// the maximum is reached. A single `LifeRestored` event reports the
    /// result.
    pub fn regenerate_lives(&mut self, cause: Causation, clock: &dyn Clock) -> u32 {
        if self.current_lives >= self.max_lives {
            return 0;
        }
        let Some(anchor) = self.last_regen_at else {
            return 0;
        };

        let now = clock.now();
        let interval = Duration::minutes(REGEN_INTERVAL_MINUTES);
        let elapsed_intervals = (now - anchor).num_milliseconds() / interval.num_milliseconds();
        if elapsed_intervals <= 0 {
            return 0;
        }

        let missing = self.max_lives - self.current_lives;
        let restored = u32::try_from(elapsed_intervals).map_or(missing, |n| n.min(missing));
        self.current_lives += restored;
        self.updated_at = now;
        self.last_regen_at = if self.current_lives >= self.max_lives {
            None
        } else {
            Some(anchor + Duration::minutes(REGEN_INTERVAL_MINUTES * i64::from(restored)))
        };
        self.push_restored(false, cause, now);
        restored
    }

    fn push_restored(&mut self, is_purchased: bool, cause: Causation, now: DateTime<Utc>) {
        self.uncommitted_events.push(GameEvent::new(
            self.id,
            cause,
            now,
            GameEventKind::LifeRestored(LifeRestored {
                user_id: self.user_id,
                lives_remaining: self.current_lives,
                is_purchased,
            }),
        ));
    }

    /// Whether at least one life is left.
    #[must_use]
    pub fn has_lives(&self) -> bool {
        self.current_lives > 0
    }

    /// When the next life regenerates, if the timer is running.
    #[must_use]
    pub fn next_regen_at(&self) -> Option<DateTime<Utc>> {
        self.last_regen_at
            .map(|anchor| anchor + Duration::minutes(REGEN_INTERVAL_MINUTES))
    }

    /// Lives identifier.
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Lives left.
    #[must_use]
    pub fn current_lives(&self) -> u32 {
        self.current_lives
    }

    /// Regeneration cap.
    #[must_use]
    pub fn max_lives(&self) -> u32 {
        self.max_lives
    }

    /// Anchor of the regeneration timer.
    #[must_use]
    pub fn last_regen_at(&self) -> Option<DateTime<Utc>> {
        self.last_regen_at
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

impl AggregateRoot for Lives {
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

impl UserAggregate for Lives {
    fn user_id(&self) -> Uuid {
        self.user_id
    }

    fn new_for_user(id: Uuid, user_id: Uuid, now: DateTime<Utc>) -> Self {
        Self {
            id,
            user_id,
            current_lives: DEFAULT_MAX_LIVES,
            max_lives: DEFAULT_MAX_LIVES,
            last_regen_at: None,
            created_at: now,
            updated_at: now,
            uncommitted_events: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quizrush_core::event::{DomainEvent, LIFE_RESTORED_EVENT_TYPE};
    use quizrush_test_support::{FixedClock, SteppingClock, fixed_now};

    fn lives() -> Lives {
        Lives::new_for_user(Uuid::new_v4(), Uuid::new_v4(), fixed_now())
    }

    fn cause() -> Causation {
        Causation::root(Uuid::new_v4())
    }

    fn restored_payload(event: &GameEvent) -> LifeRestored {
        match &event.kind {
            GameEventKind::LifeRestored(payload) => payload.clone(),
            other => panic!("expected LifeRestored, got {other:?}"),
        }
    }

    #[test]
    fn test_new_lives_start_full_without_timer() {
        let lives = lives();

        assert_eq!(lives.current_lives(), 5);
        assert_eq!(lives.max_lives(), 5);
        assert!(lives.last_regen_at().is_none());
        assert!(lives.uncommitted_events().is_empty());
    }

    #[test]
    fn test_consuming_all_lives_then_one_more_fails() {
        // Arrange
        let clock = FixedClock(fixed_now());
        let mut lives = lives();

        // Act
        for _ in 0..5 {
            lives.consume_life(cause(), &clock).unwrap();
        }
        let sixth = lives.consume_life(cause(), &clock);

        // Assert
        assert_eq!(lives.current_lives(), 0);
        assert!(!lives.has_lives());
        assert_eq!(sixth, Err(DomainError::invariant("No lives available")));
        assert_eq!(lives.uncommitted_events().len(), 5);
    }

    #[test]
    fn test_first_consumption_starts_timer_and_later_ones_keep_it() {
        let clock = SteppingClock::new(fixed_now());
        let mut lives = lives();

        lives.consume_life(cause(), &clock).unwrap();
        clock.advance(Duration::minutes(10));
        lives.consume_life(cause(), &clock).unwrap();

        assert_eq!(lives.last_regen_at(), Some(fixed_now()));
        assert_eq!(lives.next_regen_at(), Some(fixed_now() + Duration::minutes(30)));
    }

    #[test]
    fn test_restore_at_maximum_requires_purchase() {
        let clock = FixedClock(fixed_now());
        let mut lives = lives();

        let free = lives.restore_life(false, cause(), &clock);
        lives.restore_life(true, cause(), &clock).unwrap();

        assert_eq!(free, Err(DomainError::invariant("Lives already at maximum")));
        assert_eq!(lives.current_lives(), 6);
        assert!(lives.last_regen_at().is_none());
        assert!(restored_payload(&lives.uncommitted_events()[0]).is_purchased);
    }

    #[test]
    fn test_restore_below_maximum_restarts_timer() {
        let clock = SteppingClock::new(fixed_now());
        let mut lives = lives();
        lives.consume_life(cause(), &clock).unwrap();
        lives.consume_life(cause(), &clock).unwrap();
        clock.advance(Duration::minutes(5));

        lives.restore_life(false, cause(), &clock).unwrap();

        assert_eq!(lives.current_lives(), 4);
        assert_eq!(lives.last_regen_at(), Some(fixed_now() + Duration::minutes(5)));
    }

    #[test]
    fn test_regenerate_restores_whole_intervals_in_one_event() {
        // Arrange
        let clock = SteppingClock::new(fixed_now());
        let mut lives = lives();
        for _ in 0..4 {
            lives.consume_life(cause(), &clock).unwrap();
        }
        lives.clear_uncommitted_events();
        clock.advance(Duration::minutes(75));

        // Act
        let restored = lives.regenerate_lives(cause(), &clock);

        // Assert
        assert_eq!(restored, 2);
        assert_eq!(lives.current_lives(), 3);
        // Anchor advances by the two consumed intervals; the 15 minutes of
        // partial progress are kept.
        assert_eq!(lives.last_regen_at(), Some(fixed_now() + Duration::minutes(60)));
        let events = lives.uncommitted_events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type(), LIFE_RESTORED_EVENT_TYPE);
        let payload = restored_payload(&events[0]);
        assert_eq!(payload.lives_remaining, 3);
        assert!(!payload.is_purchased);
    }

    #[test]
    fn test_regenerate_twice_within_interval_is_a_no_op_the_second_time() {
        let clock = SteppingClock::new(fixed_now());
        let mut lives = lives();
        lives.consume_life(cause(), &clock).unwrap();
        lives.consume_life(cause(), &clock).unwrap();
        clock.advance(Duration::minutes(31));
        assert_eq!(lives.regenerate_lives(cause(), &clock), 1);
        let anchor = lives.last_regen_at();
        let events = lives.uncommitted_events().len();

        clock.advance(Duration::minutes(10));
        let second = lives.regenerate_lives(cause(), &clock);

        assert_eq!(second, 0);
        assert_eq!(lives.last_regen_at(), anchor);
        assert_eq!(lives.uncommitted_events().len(), events);
    }

    #[test]
    fn test_regenerate_caps_at_maximum_and_clears_timer() {
        let clock = SteppingClock::new(fixed_now());
        let mut lives = lives();
        lives.consume_life(cause(), &clock).unwrap();
        lives.consume_life(cause(), &clock).unwrap();
        clock.advance(Duration::hours(10));

        let restored = lives.regenerate_lives(cause(), &clock);

        assert_eq!(restored, 2);
        assert_eq!(lives.current_lives(), 5);
        assert!(lives.last_regen_at().is_none());
    }

    #[test]
    fn test_regenerate_does_nothing_without_timer_or_when_full() {
        let clock = FixedClock(fixed_now());
        let mut full = lives();
        full.restore_life(true, cause(), &clock).unwrap();
        full.clear_uncommitted_events();

        assert_eq!(full.regenerate_lives(cause(), &clock), 0);
        assert_eq!(lives().regenerate_lives(cause(), &clock), 0);
        assert!(full.uncommitted_events().is_empty());
    }

    #[test]
    fn test_regenerate_before_first_interval_restores_nothing() {
        let clock = SteppingClock::new(fixed_now());
        let mut lives = lives();
        lives.consume_life(cause(), &clock).unwrap();
        clock.advance(Duration::minutes(29));

        assert_eq!(lives.regenerate_lives(cause(), &clock), 0);
        assert_eq!(lives.current_lives(), 4);
    }
}
