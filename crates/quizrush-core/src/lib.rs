//! QuizRush Core: shared domain abstractions.
//!
//! This crate defines the fundamental traits and types that all bounded
//! contexts depend on: aggregates, the closed domain event catalog, the
//! publish/subscribe seams and the repository contracts. It contains no
//! infrastructure code.

pub mod aggregate;
pub mod clock;
pub mod command;
pub mod error;
pub mod event;
pub mod handler;
pub mod repository;
pub mod rng;
