//! Tracing subscriber setup.

use tracing_subscriber::EnvFilter;
use turnmark_core::config::LoggingSettings;

/// Environment variable that overrides the configured log filter.
pub const LOG_ENV_VAR: &str = "TURNMARK_LOG";

/// Builds the log filter: `TURNMARK_LOG` when set and valid, otherwise the
/// configured level, otherwise `info`.
pub fn build_filter(settings: &LoggingSettings) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV_VAR)
        .or_else(|_| EnvFilter::try_new(&settings.level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

/// Installs a global fmt subscriber.
///
/// Safe to call more than once: later calls leave the first subscriber in
/// place and return `false`.
pub fn init_tracing(settings: &LoggingSettings) -> bool {
    tracing_subscriber::fmt()
        .with_env_filter(build_filter(settings))
        .with_target(true)
        .try_init()
        .is_ok()
}
