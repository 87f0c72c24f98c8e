//! QuizRush: composition root.
//!
//! Loads configuration, installs tracing, builds the repositories and the
//! choreography registry, and exposes every command and query of the game
//! backend through [`QuizRushApp`].

pub mod app;
pub mod config;
pub mod error;
pub mod rng;
pub mod telemetry;
pub mod wiring;

pub use app::QuizRushApp;
pub use config::AppConfig;
pub use error::AppError;
