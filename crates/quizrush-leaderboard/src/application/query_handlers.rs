//! Query handlers for the Leaderboard context.

use std::cmp::Reverse;

use quizrush_core::aggregate::UserAggregate;
use quizrush_core::error::DomainError;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::ranking::PlayerRanking;
use crate::domain::repositories::RankingRepository;

/// Which score a leaderboard is ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum LeaderboardPeriod {
    /// All-time scores.
    Global,
    /// Scores since the last weekly reset.
    Weekly,
}

/// Shown for a player whose registration was never seen.
pub const UNKNOWN_USERNAME: &str = "Unknown";

/// One row of a leaderboard.
#[derive(Debug, Serialize)]
pub struct LeaderboardEntry {
    /// 1-based position in this listing.
    pub position: u32,
    /// The player.
    pub user_id: Uuid,
    /// Display name, or [`UNKNOWN_USERNAME`].
    pub username: String,
    /// Score for the requested period.
    pub score: u64,
    /// Rank stored by the last recompute, if any.
    pub rank: Option<u32>,
}

/// Returns the top `limit` players for `period`, ordered by score
/// descending, then user ID.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` if the repository fails.
pub async fn get_leaderboard(
    period: LeaderboardPeriod,
    limit: usize,
    repo: &dyn RankingRepository,
) -> Result<Vec<LeaderboardEntry>, DomainError> {
    let rankings = repo.find_all().await?;
    let (score, rank): (fn(&PlayerRanking) -> u64, fn(&PlayerRanking) -> Option<u32>) =
        match period {
            LeaderboardPeriod::Global => (PlayerRanking::global_score, PlayerRanking::global_rank),
            LeaderboardPeriod::Weekly => (PlayerRanking::weekly_score, PlayerRanking::weekly_rank),
        };

    let mut ordered: Vec<&PlayerRanking> = rankings.iter().collect();
    ordered.sort_by_key(|ranking| (Reverse(score(ranking)), ranking.user_id()));

    Ok(ordered
        .into_iter()
        .take(limit)
        .zip(1u32..)
        .map(|(ranking, position)| LeaderboardEntry {
            position,
            user_id: ranking.user_id(),
            username: ranking.username().unwrap_or(UNKNOWN_USERNAME).to_owned(),
            score: score(ranking),
            rank: rank(ranking),
        })
        .collect())
}
