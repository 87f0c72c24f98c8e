//! Application layer for the Gamification context.

pub mod command_handlers;
pub mod event_handlers;
pub mod query_handlers;
