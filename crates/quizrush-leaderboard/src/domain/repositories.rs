//! Repository contracts for the Leaderboard context.

use async_trait::async_trait;
use quizrush_core::error::DomainError;
use quizrush_core::repository::UserRepository;

use crate::domain::ranking::PlayerRanking;

/// Storage for player rankings.
#[async_trait]
pub trait RankingRepository: UserRepository<PlayerRanking> {
    /// Every stored ranking, in no particular order.
    async fn find_all(&self) -> Result<Vec<PlayerRanking>, DomainError>;
}
