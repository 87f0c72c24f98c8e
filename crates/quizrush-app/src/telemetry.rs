//! Tracing subscriber setup.

use tracing_subscriber::EnvFilter;

use crate::config::AppConfig;
use crate::error::AppError;

/// Installs a global JSON subscriber. `RUST_LOG` wins over the configured
/// filter when both are set.
///
/// # Errors
///
/// Returns `AppError::Telemetry` if the filter is malformed or a global
/// subscriber is already installed.
pub fn init_tracing(config: &AppConfig) -> Result<(), AppError> {
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(&config.log_filter)
            .map_err(|e| AppError::Telemetry(format!("invalid log filter: {e}")))?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .json()
        .try_init()
        .map_err(|e| AppError::Telemetry(e.to_string()))?;

    tracing::info!(
        session_minutes = config.session_minutes,
        questions_per_session = config.questions_per_session,
        "tracing initialized"
    );
    Ok(())
}
