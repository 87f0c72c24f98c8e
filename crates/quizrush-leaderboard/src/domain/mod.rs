//! Domain layer for the Leaderboard context.

pub mod commands;
pub mod ranking;
pub mod repositories;
