//! Application layer for the Leaderboard context.

pub mod command_handlers;
pub mod event_handlers;
pub mod query_handlers;
