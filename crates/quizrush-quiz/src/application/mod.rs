//! Application layer for the Quiz context.

pub mod command_handlers;
pub mod query_handlers;
