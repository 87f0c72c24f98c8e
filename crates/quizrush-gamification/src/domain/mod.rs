//! Domain layer for the Gamification context.

pub mod commands;
pub mod progress;
