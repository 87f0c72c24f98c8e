//! Commands for the Gamification context.

use quizrush_core::command::Command;
use uuid::Uuid;

/// Command to break a player's streak. Issued by the daily streak check.
#[derive(Debug, Clone)]
pub struct ResetStreak {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The player.
    pub user_id: Uuid,
}

impl Command for ResetStreak {
    fn command_type(&self) -> &'static str {
        "gamification.reset_streak"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}
