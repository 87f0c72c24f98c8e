//! Commands for the Leaderboard context.
//!
//! Both commands are issued by an external periodic process.

use quizrush_core::command::Command;
use uuid::Uuid;

/// Command to recompute global and weekly ranks across all players.
#[derive(Debug, Clone)]
pub struct RecomputeRanks {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
}

impl Command for RecomputeRanks {
    fn command_type(&self) -> &'static str {
        "leaderboard.recompute_ranks"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to zero every player's weekly score.
#[derive(Debug, Clone)]
pub struct ResetWeeklyScores {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
}

impl Command for ResetWeeklyScores {
    fn command_type(&self) -> &'static str {
        "leaderboard.reset_weekly_scores"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}
