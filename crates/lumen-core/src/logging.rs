#![forbid(unsafe_code)]

//! Structured logging helpers.
//!
//! Every Lumen crate logs through `tracing`. This module re-exports the
//! macros so downstream crates can log without naming `tracing` directly, and
//! behind the `tracing-json` feature installs a JSON subscriber filtered by
//! the `LUMEN_LOG` environment variable.

pub use tracing::{debug, debug_span, error, info, info_span, trace, warn, warn_span};

/// Environment variable holding the `EnvFilter` directive.
pub const LOG_ENV: &str = "LUMEN_LOG";

/// Error returned when a global subscriber is already installed.
#[derive(Debug, Clone)]
pub struct LoggingError(pub String);

impl std::fmt::Display for LoggingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "logging init failed: {}", self.0)
    }
}

impl std::error::Error for LoggingError {}

/// Install a JSON `tracing` subscriber.
///
/// The filter comes from `LUMEN_LOG` when set, else `default_filter`
/// (e.g. `"lumen_runtime=info"`).
#[cfg(feature = "tracing-json")]
pub fn init_json_logging(default_filter: &str) -> Result<(), LoggingError> {
    use tracing_subscriber::EnvFilter;

    let filter =
        EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(default_filter));
    tracing_subscriber::fmt()
        .json()
        .with_env_filter(filter)
        .with_current_span(true)
        .try_init()
        .map_err(|e| LoggingError(e.to_string()))
}
