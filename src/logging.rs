//! Structured logging setup
//!
//! Library code only emits `tracing` events; installing a subscriber is
//! left to the binary (or to an embedding application).

use std::env;
use std::fmt;
use std::io;

use anyhow::{Result, anyhow};
use serde::{Deserialize, Serialize};
use tracing::debug;
use tracing_subscriber::{EnvFilter, fmt as layers, layer::SubscriberExt, util::SubscriberInitExt};

/// Log levels accepted in configuration
pub const LOG_LEVELS: [&str; 5] = ["error", "warn", "info", "debug", "trace"];

/// Log output format options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable, multi-field lines
    #[default]
    Pretty,
    /// One JSON object per event
    Json,
    /// Single-line terse output
    Compact,
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogFormat::Pretty => write!(f, "pretty"),
            LogFormat::Json => write!(f, "json"),
            LogFormat::Compact => write!(f, "compact"),
        }
    }
}

/// Logging configuration settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (error, warn, info, debug, trace)
    pub level: String,
    pub format: LogFormat,
    /// Include source file and line numbers
    pub include_location: bool,
}

pub(crate) fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: LogFormat::default(),
            include_location: false,
        }
    }
}

impl LoggingConfig {
    /// Filter built from `RUST_LOG` when set, otherwise from the configured level
    pub fn env_filter(&self) -> Result<EnvFilter> {
        self.filter_for(env::var("RUST_LOG").ok().as_deref())
    }

    /// `rust_log` replaces the configured level entirely when non-empty
    fn filter_for(&self, rust_log: Option<&str>) -> Result<EnvFilter> {
        match rust_log.map(str::trim).filter(|directives| !directives.is_empty()) {
            Some(directives) => EnvFilter::try_new(directives)
                .map_err(|e| anyhow!("Invalid RUST_LOG '{directives}': {e}")),
            None => EnvFilter::try_new(format!("weather_odds={}", self.level))
                .map_err(|e| anyhow!("Invalid log level '{}': {e}", self.level)),
        }
    }

    /// Install the global subscriber. Output goes to stderr so that reports
    /// on stdout stay machine-readable.
    pub fn init(&self) -> Result<()> {
        let registry = tracing_subscriber::registry().with(self.env_filter()?);

        let installed = match self.format {
            LogFormat::Json => registry
                .with(
                    layers::layer()
                        .json()
                        .with_file(self.include_location)
                        .with_line_number(self.include_location)
                        .with_target(true)
                        .with_writer(io::stderr),
                )
                .try_init(),
            LogFormat::Pretty => registry
                .with(
                    layers::layer()
                        .with_file(self.include_location)
                        .with_line_number(self.include_location)
                        .with_target(true)
                        .with_writer(io::stderr),
                )
                .try_init(),
            LogFormat::Compact => registry
                .with(
                    layers::layer()
                        .compact()
                        .with_target(false)
                        .with_writer(io::stderr),
                )
                .try_init(),
        };
        installed.map_err(|e| anyhow!("Failed to install tracing subscriber: {e}"))?;

        debug!(level = %self.level, format = %self.format, "Logging initialised");
        Ok(())
    }
}
