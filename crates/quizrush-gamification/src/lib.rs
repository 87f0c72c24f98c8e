//! QuizRush: Gamification bounded context.
//!
//! Responsible for experience points, levels, streaks and lifetime quiz
//! statistics.

pub mod application;
pub mod domain;
