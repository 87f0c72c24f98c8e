//! QuizRush: Economy bounded context.
//!
//! Owns each player's coin wallet and lives. Reacts to registration, quiz
//! start and completion, and level-ups; sells shop items for coins.

pub mod application;
pub mod domain;
