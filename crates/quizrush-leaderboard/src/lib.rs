//! QuizRush: Leaderboard bounded context.
//!
//! Responsible for global and weekly scores and the ranks computed from
//! them.

pub mod application;
pub mod domain;
