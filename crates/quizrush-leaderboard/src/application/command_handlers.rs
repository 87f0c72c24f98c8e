//! Command handlers for the Leaderboard context.
//!
//! Ranks are ordered by score descending with ties broken by user ID, so a
//! recompute over the same scores always yields the same ranks.

use std::cmp::Reverse;
use std::collections::HashMap;

use quizrush_core::aggregate::UserAggregate;
use quizrush_core::clock::Clock;
use quizrush_core::error::DomainError;
use tracing::{info, instrument};
use uuid::Uuid;

use crate::domain::commands::{RecomputeRanks, ResetWeeklyScores};
use crate::domain::ranking::PlayerRanking;
use crate::domain::repositories::RankingRepository;

/// Result of a command applied across every ranking.
#[derive(Debug)]
pub struct LeaderboardCommandResult {
    /// Number of rankings updated.
    pub rankings_updated: usize,
}

/// Assigns 1-based ranks ordered by `score` descending, then user ID.
fn rank_by(rankings: &[PlayerRanking], score: fn(&PlayerRanking) -> u64) -> HashMap<Uuid, u32> {
    let mut ordered: Vec<(u64, Uuid)> = rankings
        .iter()
        .map(|ranking| (score(ranking), ranking.user_id()))
        .collect();
    ordered.sort_by_key(|&(points, user_id)| (Reverse(points), user_id));
    ordered
        .into_iter()
        .zip(1u32..)
        .map(|((_, user_id), rank)| (user_id, rank))
        .collect()
}

/// Handles the `RecomputeRanks` command: orders every ranking by global and
/// by weekly score and stores the resulting ranks.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` if the repository fails.
#[instrument(skip(command, clock, repo))]
pub async fn handle_recompute_ranks(
    command: &RecomputeRanks,
    clock: &dyn Clock,
    repo: &dyn RankingRepository,
) -> Result<LeaderboardCommandResult, DomainError> {
    info!(correlation_id = %command.correlation_id, "handling recompute_ranks command");

    let mut rankings = repo.find_all().await?;
    let global = rank_by(&rankings, PlayerRanking::global_score);
    let weekly = rank_by(&rankings, PlayerRanking::weekly_score);

    for ranking in &mut rankings {
        let user_id = ranking.user_id();
        ranking.update_rank(
            global.get(&user_id).copied(),
            weekly.get(&user_id).copied(),
            clock,
        );
        repo.save(ranking).await?;
    }

    info!(rankings = rankings.len(), "ranks recomputed");
    Ok(LeaderboardCommandResult {
        rankings_updated: rankings.len(),
    })
}

/// Handles the `ResetWeeklyScores` command.
///
/// # Errors
///
/// Returns `DomainError::Infrastructure` if the repository fails.
#[instrument(skip(command, clock, repo))]
pub async fn handle_reset_weekly_scores(
    command: &ResetWeeklyScores,
    clock: &dyn Clock,
    repo: &dyn RankingRepository,
) -> Result<LeaderboardCommandResult, DomainError> {
    info!(correlation_id = %command.correlation_id, "handling reset_weekly_scores command");

    let mut rankings = repo.find_all().await?;
    for ranking in &mut rankings {
        ranking.reset_weekly_score(clock);
        repo.save(ranking).await?;
    }

    Ok(LeaderboardCommandResult {
        rankings_updated: rankings.len(),
    })
}
