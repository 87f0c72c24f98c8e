//! QuizRush: Quiz bounded context.
//!
//! Responsible for question authoring and publication, timed quiz sessions,
//! answer scoring and session completion. Completion is the fact the rest of
//! the game reacts to.

pub mod application;
pub mod domain;
