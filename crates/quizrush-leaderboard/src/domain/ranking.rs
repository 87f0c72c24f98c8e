//! The `PlayerRanking` aggregate.

use chrono::{DateTime, Utc};
use quizrush_core::aggregate::{AggregateRoot, UserAggregate};
use quizrush_core::clock::Clock;
use quizrush_core::event::GameEvent;
use uuid::Uuid;

/// The aggregate root for a player's leaderboard scores and ranks.
///
/// Ranks are computed outside the aggregate, across all players, and stored
/// here through [`PlayerRanking::update_rank`]. No mutation emits an event.
#[derive(Debug, Clone)]
pub struct PlayerRanking {
    id: Uuid,
    user_id: Uuid,
    username: Option<String>,
    global_score: u64,
    weekly_score: u64,
    global_rank: Option<u32>,
    weekly_rank: Option<u32>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    uncommitted_events: Vec<GameEvent>,
}

impl PlayerRanking {
    /// Adds points to both the global and the weekly score. Scores saturate
    /// at `u64::MAX`.
    pub fn add_score(&mut self, points: u64, clock: &dyn Clock) {
        self.global_score = self.global_score.saturating_add(points);
        self.weekly_score = self.weekly_score.saturating_add(points);
        self.updated_at = clock.now();
    }

    /// Records the display name shown on the leaderboard. Returns whether it
    /// changed.
    pub fn record_username(&mut self, username: &str, clock: &dyn Clock) -> bool {
        if self.username.as_deref() == Some(username) {
            return false;
        }
        self.username = Some(username.to_owned());
        self.updated_at = clock.now();
        true
    }

    /// Zeroes the weekly score. The global score is untouched.
    pub fn reset_weekly_score(&mut self, clock: &dyn Clock) {
        self.weekly_score = 0;
        self.updated_at = clock.now();
    }

    /// Stores externally computed ranks.
    pub fn update_rank(
        &mut self,
        global_rank: Option<u32>,
        weekly_rank: Option<u32>,
        clock: &dyn Clock,
    ) {
        self.global_rank = global_rank;
        self.weekly_rank = weekly_rank;
        self.updated_at = clock.now();
    }

    /// Ranking identifier.
    #[must_use]
    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Display name, once the player's registration has been seen.
    #[must_use]
    pub fn username(&self) -> Option<&str> {
        self.username.as_deref()
    }

    /// All-time score.
    #[must_use]
    pub fn global_score(&self) -> u64 {
        self.global_score
    }

    /// Score since the last weekly reset.
    #[must_use]
    pub fn weekly_score(&self) -> u64 {
        self.weekly_score
    }

    /// 1-based global rank, if computed.
    #[must_use]
    pub fn global_rank(&self) -> Option<u32> {
        self.global_rank
    }

    /// 1-based weekly rank, if computed.
    #[must_use]
    pub fn weekly_rank(&self) -> Option<u32> {
        self.weekly_rank
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

impl AggregateRoot for PlayerRanking {
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

impl UserAggregate for PlayerRanking {
    fn user_id(&self) -> Uuid {
        self.user_id
    }

    fn new_for_user(id: Uuid, user_id: Uuid, now: DateTime<Utc>) -> Self {
        Self {
            id,
            user_id,
            username: None,
            global_score: 0,
            weekly_score: 0,
            global_rank: None,
            weekly_rank: None,
            created_at: now,
            updated_at: now,
            uncommitted_events: Vec::new(),
        }
    }
}
