//! Tracing initialisation for programs embedding the loader.
//!
//! The filter comes from `SLATE_LOG`, then `RUST_LOG`, then the supplied
//! default level. Only the first successful call installs a subscriber.

use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

/// Environment variable consulted before `RUST_LOG`.
pub const LOG_ENV: &str = "SLATE_LOG";

/// Output format for log lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Text,
    /// Newline-delimited JSON for log aggregation
    Json,
}

/// Build the filter: `SLATE_LOG`, else `RUST_LOG`, else `default_level`.
pub fn env_filter(default_level: Level) -> EnvFilter {
    EnvFilter::try_from_env(LOG_ENV)
        .or_else(|_| EnvFilter::try_from_default_env())
        .unwrap_or_else(|_| EnvFilter::new(default_level.as_str()))
}

/// Install the global subscriber.
///
/// Returns `false` when a subscriber was already installed.
pub fn init_tracing(format: LogFormat, default_level: Level) -> bool {
    let registry = tracing_subscriber::registry().with(env_filter(default_level));

    match format {
        LogFormat::Json => registry
            .with(fmt::layer().with_target(false).json())
            .try_init()
            .is_ok(),
        LogFormat::Text => registry
            .with(fmt::layer().with_target(false))
            .try_init()
            .is_ok(),
    }
}
