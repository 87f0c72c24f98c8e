//! Domain layer for the Quiz context.

pub mod commands;
pub mod question;
pub mod repositories;
pub mod scoring;
pub mod session;
