//! The `PlayerProgress` aggregate.

use chrono::{DateTime, Utc};
use quizrush_core::aggregate::{AggregateRoot, UserAggregate};
use quizrush_core::clock::Clock;
use quizrush_core::event::{Causation, GameEvent, GameEventKind, LevelUp, StreakUpdated};
use uuid::Uuid;

/// XP needed per level. Level is `xp / XP_PER_LEVEL + 1`.
pub const XP_PER_LEVEL: i64 = 1000;

/// The aggregate root for a player's experience, level, streak and quiz
/// statistics.
#[derive(Debug, Clone)]
pub struct PlayerProgress {
    id: Uuid,
    user_id: Uuid,
    current_xp: i64,
    current_level: u32,
    current_streak: u32,
    longest_streak: u32,
    total_quizzes: u32,
    perfect_quizzes: u32,
    total_correct: u32,
    total_answers: u32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    /// Uncommitted events pending publication.
    uncommitted_events: Vec<GameEvent>,
}

impl PlayerProgress {
    /// Adds XP. Non-positive amounts are ignored and XP saturates at
    /// `i64::MAX`.
    ///
    /// Crossing one or more level thresholds produces exactly one `LevelUp`
    /// event carrying the final level.
    pub fn add_xp(&mut self, amount: i64, cause: Causation, clock: &dyn Clock) {
        if amount <= 0 {
            return;
        }

        let now = clock.now();
        self.current_xp = self.current_xp.saturating_add(amount);
        self.updated_at = now;

        let new_level = level_for(self.current_xp);
        if new_level > self.current_level {
            self.current_level = new_level;
            self.uncommitted_events.push(GameEvent::new(
                self.id,
                cause,
                now,
                GameEventKind::LevelUp(LevelUp {
                    user_id: self.user_id,
                    new_level,
                    total_xp: self.current_xp,
                }),
            ));
        }
    }

    /// Updates lifetime quiz statistics. No event.
    pub fn record_quiz_completion(&mut self, correct: u32, total: u32, clock: &dyn Clock) {
        self.total_quizzes = self.total_quizzes.saturating_add(1);
        self.total_correct = self.total_correct.saturating_add(correct);
        self.total_answers = self.total_answers.saturating_add(total);
        if correct == total {
            self.perfect_quizzes = self.perfect_quizzes.saturating_add(1);
        }
        self.updated_at = clock.now();
    }

    /// Extends the streak by one, producing a `StreakUpdated` event.
    pub fn increment_streak(&mut self, cause: Causation, clock: &dyn Clock) {
        let now = clock.now();
        self.current_streak = self.current_streak.saturating_add(1);
        self.longest_streak = self.longest_streak.max(self.current_streak);
        self.updated_at = now;

        self.uncommitted_events.push(GameEvent::new(
            self.id,
            cause,
            now,
            GameEventKind::StreakUpdated(StreakUpdated {
                user_id: self.user_id,
                current_streak: self.current_streak,
                longest_streak: self.longest_streak,
            }),
        ));
    }

    /// Breaks the streak. The longest streak is kept. No event.
    pub fn reset_streak(&mut self, clock: &dyn Clock) {
        self.current_streak = 0;
        self.updated_at = clock.now();
    }

    /// Percentage of answers that were correct; 0 before any answer.
    #[must_use]
    pub fn accuracy(&self) -> f64 {
        if self.total_answers == 0 {
            return 0.0;
        }
        f64::from(self.total_correct) / f64::from(self.total_answers) * 100.0
    }

    /// Progress identifier.
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Total XP.
    #[must_use]
    pub fn current_xp(&self) -> i64 {
        self.current_xp
    }

    /// Current level, starting at 1.
    #[must_use]
    pub fn current_level(&self) -> u32 {
        self.current_level
    }

    /// Current streak.
    #[must_use]
    pub fn current_streak(&self) -> u32 {
        self.current_streak
    }

    /// Longest streak ever reached.
    #[must_use]
    pub fn longest_streak(&self) -> u32 {
        self.longest_streak
    }

    /// Completed quizzes.
    #[must_use]
    pub fn total_quizzes(&self) -> u32 {
        self.total_quizzes
    }

    /// Quizzes with every answer correct.
    #[must_use]
    pub fn perfect_quizzes(&self) -> u32 {
        self.perfect_quizzes
    }

    /// Correct answers over all quizzes.
    #[must_use]
    pub fn total_correct(&self) -> u32 {
        self.total_correct
    }

    /// Answers over all quizzes.
    #[must_use]
    pub fn total_answers(&self) -> u32 {
        self.total_answers
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

fn level_for(xp: i64) -> u32 {
    u32::try_from(xp / XP_PER_LEVEL + 1).unwrap_or(u32::MAX)
}

impl AggregateRoot for PlayerProgress {
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

impl UserAggregate for PlayerProgress {
    fn user_id(&self) -> Uuid {
        self.user_id
    }

    fn new_for_user(id: Uuid, user_id: Uuid, now: DateTime<Utc>) -> Self {
        Self {
            id,
            user_id,
            current_xp: 0,
            current_level: 1,
            current_streak: 0,
            longest_streak: 0,
            total_quizzes: 0,
            perfect_quizzes: 0,
            total_correct: 0,
            total_answers: 0,
            created_at: now,
            updated_at: now,
            uncommitted_events: Vec::new(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quizrush_core::event::{DomainEvent, LEVEL_UP_EVENT_TYPE, STREAK_UPDATED_EVENT_TYPE};
    use quizrush_test_support::{FixedClock, fixed_now};

    fn progress() -> PlayerProgress {
        PlayerProgress::new_for_user(Uuid::new_v4(), Uuid::new_v4(), fixed_now())
    }

    fn cause() -> Causation {
        Causation::root(Uuid::new_v4())
    }

    #[test]
    fn test_add_xp_across_two_thresholds_emits_one_level_up() {
        // Arrange
        let mut progress = progress();

        // Act
        progress.add_xp(2500, cause(), &FixedClock(fixed_now()));

        // Assert
        assert_eq!(progress.current_level(), 3);
        assert_eq!(progress.current_xp(), 2500);
        let events = progress.uncommitted_events();
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event_type(), LEVEL_UP_EVENT_TYPE);
        match &events[0].kind {
            GameEventKind::LevelUp(payload) => {
                assert_eq!(payload.new_level, 3);
                assert_eq!(payload.total_xp, 2500);
            }
            other => panic!("expected LevelUp, got {other:?}"),
        }
    }

    #[test]
    fn test_add_xp_below_threshold_emits_nothing() {
        let mut progress = progress();

        progress.add_xp(999, cause(), &FixedClock(fixed_now()));

        assert_eq!(progress.current_level(), 1);
        assert!(progress.uncommitted_events().is_empty());
    }

    #[test]
    fn test_add_xp_exactly_at_threshold_levels_up() {
        let mut progress = progress();
        let clock = FixedClock(fixed_now());
        progress.add_xp(500, cause(), &clock);

        progress.add_xp(500, cause(), &clock);

        assert_eq!(progress.current_level(), 2);
        assert_eq!(progress.uncommitted_events().len(), 1);
    }

    #[test]
    fn test_add_xp_saturates_instead_of_overflowing() {
        // Arrange
        let mut progress = progress();
        let clock = FixedClock(fixed_now());
        progress.add_xp(500, cause(), &clock);

        // Act
        progress.add_xp(i64::MAX, cause(), &clock);

        // Assert
        assert_eq!(progress.current_xp(), i64::MAX);
        assert_eq!(progress.current_level(), u32::MAX);
        assert_eq!(progress.uncommitted_events().len(), 1);
    }

    #[test]
    fn test_add_xp_ignores_non_positive_amounts() {
        let mut progress = progress();
        let clock = FixedClock(fixed_now());

        progress.add_xp(0, cause(), &clock);
        progress.add_xp(-100, cause(), &clock);

        assert_eq!(progress.current_xp(), 0);
        assert!(progress.uncommitted_events().is_empty());
    }

    #[test]
    fn test_record_quiz_completion_tracks_totals_and_perfects() {
        let mut progress = progress();
        let clock = FixedClock(fixed_now());

        progress.record_quiz_completion(10, 10, &clock);
        progress.record_quiz_completion(5, 10, &clock);

        assert_eq!(progress.total_quizzes(), 2);
        assert_eq!(progress.perfect_quizzes(), 1);
        assert_eq!(progress.total_correct(), 15);
        assert_eq!(progress.total_answers(), 20);
        assert!((progress.accuracy() - 75.0).abs() < f64::EPSILON);
        assert!(progress.uncommitted_events().is_empty());
    }

    #[test]
    fn test_accuracy_is_zero_without_answers() {
        assert!(progress().accuracy().abs() < f64::EPSILON);
    }

    #[test]
    fn test_streak_increment_and_reset_keep_longest() {
        // Arrange
        let mut progress = progress();
        let clock = FixedClock(fixed_now());

        // Act
        progress.increment_streak(cause(), &clock);
        progress.increment_streak(cause(), &clock);
        progress.increment_streak(cause(), &clock);
        progress.reset_streak(&clock);
        progress.increment_streak(cause(), &clock);

        // Assert
        assert_eq!(progress.current_streak(), 1);
        assert_eq!(progress.longest_streak(), 3);
        let events = progress.uncommitted_events();
        assert_eq!(events.len(), 4);
        assert!(events.iter().all(|e| e.event_type() == STREAK_UPDATED_EVENT_TYPE));
        match &events[3].kind {
            GameEventKind::StreakUpdated(payload) => {
                assert_eq!(payload.current_streak, 1);
                assert_eq!(payload.longest_streak, 3);
            }
            other => panic!("expected StreakUpdated, got {other:?}"),
        }
    }
}
