//! # Structured Logging
//!
//! The library itself only emits `tracing` events. This module installs a
//! subscriber for processes (and test binaries) that want to see them, with
//! either human-readable or JSON output and `RUST_LOG`-style filtering.
//!
//! Output goes to stderr.

use thiserror::Error;
use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::ChainConfig;

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    /// Human-readable output for local development.
    Pretty,
    /// JSON lines for log aggregation.
    Json,
}

impl LogFormat {
    /// Parse a format string. Accepts "json" or "pretty" (case-insensitive);
    /// anything else is `Pretty`.
    pub fn from_str_lossy(s: &str) -> Self {
        match s.trim().to_lowercase().as_str() {
            "json" => LogFormat::Json,
            _ => LogFormat::Pretty,
        }
    }
}

#[derive(Debug, Error)]
pub enum LoggingError {
    #[error("a global tracing subscriber is already installed")]
    AlreadyInitialized,
}

/// Install the global tracing subscriber.
///
/// `RUST_LOG` overrides `default_level` when set. Returns an error instead
/// of panicking if a subscriber is already installed, so test binaries can
/// call it from every test.
///
/// ```text
/// RUST_LOG=ledger_core=debug
/// ```
pub fn init_logging(default_level: &str, format: LogFormat) -> Result<(), LoggingError> {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    let installed = match format {
        LogFormat::Pretty => tracing_subscriber::registry()
            .with(env_filter)
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true)
                    .with_file(true)
                    .with_line_number(true),
            )
            .try_init(),
        LogFormat::Json => tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt::layer().json().with_writer(std::io::stderr).with_target(true))
            .try_init(),
    };
    installed.map_err(|_| LoggingError::AlreadyInitialized)?;

    tracing::debug!("logging initialized (format={:?})", format);
    Ok(())
}

/// [`init_logging`] with the level and format from `config`.
pub fn init_from_config(config: &ChainConfig) -> Result<(), LoggingError> {
    init_logging(&config.log_level, config.log_format)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_parsing() {
        assert_eq!(LogFormat::from_str_lossy("json"), LogFormat::Json);
        assert_eq!(LogFormat::from_str_lossy(" JSON "), LogFormat::Json);
        assert_eq!(LogFormat::from_str_lossy("pretty"), LogFormat::Pretty);
        assert_eq!(LogFormat::from_str_lossy("yaml"), LogFormat::Pretty);
    }

    #[test]
    fn test_second_init_reports_error() {
        // Whichever call comes first in this test binary wins; at most one
        // of these two can succeed.
        let first = init_logging("warn", LogFormat::Pretty);
        let second = init_logging("warn", LogFormat::Json);
        assert!(first.is_err() || second.is_err());
        assert!(matches!(second, Err(LoggingError::AlreadyInitialized)));
    }
}
