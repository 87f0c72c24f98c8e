//! Runtime configuration read from the environment.

use quizrush_quiz::application::command_handlers::SessionSettings;

use crate::error::AppError;

/// Session length in minutes.
pub const SESSION_MINUTES_VAR: &str = "QUIZRUSH_SESSION_MINUTES";
/// Questions drawn per session.
pub const QUESTIONS_PER_SESSION_VAR: &str = "QUIZRUSH_QUESTIONS_PER_SESSION";
/// Tracing filter directive.
pub const LOG_FILTER_VAR: &str = "RUST_LOG";

/// Settings for one backend instance.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppConfig {
    /// Minutes before a new quiz session expires.
    pub session_minutes: u32,
    /// Questions drawn for every quiz session.
    pub questions_per_session: usize,
    /// `tracing` filter used when installing the subscriber.
    pub log_filter: String,
}

impl Default for AppConfig {
    fn default() -> Self {
        let session = SessionSettings::default();
        Self {
            session_minutes: session.duration_minutes,
            questions_per_session: session.questions_per_session,
            log_filter: "info".to_owned(),
        }
    }
}

impl AppConfig {
    /// Reads the configuration from the process environment.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a numeric variable is not a positive
    /// integer.
    pub fn from_env() -> Result<Self, AppError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Reads the configuration through `lookup`. Unset variables keep their
    /// defaults.
    ///
    /// # Errors
    ///
    /// Returns `AppError::Config` if a numeric variable is not a positive
    /// integer.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, AppError> {
        let defaults = Self::default();
        Ok(Self {
            session_minutes: positive(&lookup, SESSION_MINUTES_VAR)?
                .unwrap_or(defaults.session_minutes),
            questions_per_session: positive(&lookup, QUESTIONS_PER_SESSION_VAR)?
                .unwrap_or(defaults.questions_per_session),
            log_filter: lookup(LOG_FILTER_VAR).unwrap_or(defaults.log_filter),
        })
    }

    /// Session tunables for the quiz command handlers.
    #[must_use]
    pub fn session_settings(&self) -> SessionSettings {
        SessionSettings {
            duration_minutes: self.session_minutes,
            questions_per_session: self.questions_per_session,
        }
    }
}

fn positive<T>(lookup: &impl Fn(&str) -> Option<String>, name: &str) -> Result<Option<T>, AppError>
where
    T: std::str::FromStr + Default + PartialEq,
{
    let Some(raw) = lookup(name) else {
        return Ok(None);
    };
    match raw.trim().parse::<T>() {
        Ok(value) if value != T::default() => Ok(Some(value)),
        _ => Err(AppError::Config(format!(
            "{name} must be a positive integer, got {raw:?}"
        ))),
    }
}
