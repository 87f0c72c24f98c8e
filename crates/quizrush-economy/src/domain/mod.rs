//! Domain layer for the Economy context.

pub mod commands;
pub mod lives;
pub mod shop;
pub mod wallet;
