use std::io;

use anyhow::Result;
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{EnvFilter, Layer};

use crate::domain::models::LoggingConfig;

/// Logger implementation using tracing
#[derive(Debug)]
pub struct LoggerImpl {
    level: Level,
    json: bool,
}

impl LoggerImpl {
    /// Initialize the global subscriber with the given configuration
    ///
    /// # Errors
    /// Returns an error if the level or format is unknown, or a global
    /// subscriber is already installed
    pub fn init(config: &LoggingConfig) -> Result<Self> {
        let logger = Self::from_config(config)?;

        let env_filter = EnvFilter::builder()
            .with_default_directive(logger.level.into())
            .from_env_lossy();

        if logger.json {
            let stdout_layer = tracing_subscriber::fmt::layer()
                .json()
                .with_writer(io::stdout)
                .with_current_span(true)
                .with_target(true)
                .with_file(true)
                .with_line_number(true)
                .with_filter(env_filter);
            tracing_subscriber::registry()
                .with(stdout_layer)
                .try_init()?;
        } else {
            let stdout_layer = tracing_subscriber::fmt::layer()
                .pretty()
                .with_writer(io::stdout)
                .with_target(true)
                .with_filter(env_filter);
            tracing_subscriber::registry()
                .with(stdout_layer)
                .try_init()?;
        }

        tracing::info!(level = %config.level, format = %config.format, "logger initialized");
        Ok(logger)
    }

    /// Resolve level and format without installing anything.
    pub fn from_config(config: &LoggingConfig) -> Result<Self> {
        let level = parse_log_level(&config.level)?;
        let json = match config.format.to_lowercase().as_str() {
            "json" => true,
            "pretty" => false,
            other => anyhow::bail!("Invalid log format: {other}"),
        };
        Ok(Self { level, json })
    }

    pub const fn level(&self) -> Level {
        self.level
    }

    pub const fn is_json(&self) -> bool {
        self.json
    }
}

/// Parse log level string to Level
fn parse_log_level(level: &str) -> Result<Level> {
    match level.to_lowercase().as_str() {
        "trace" => Ok(Level::TRACE),
        "debug" => Ok(Level::DEBUG),
        "info" => Ok(Level::INFO),
        "warn" => Ok(Level::WARN),
        "error" => Ok(Level::ERROR),
        _ => anyhow::bail!("Invalid log level: {level}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_log_level() {
        assert!(matches!(parse_log_level("trace"), Ok(Level::TRACE)));
        assert!(matches!(parse_log_level("debug"), Ok(Level::DEBUG)));
        assert!(matches!(parse_log_level("info"), Ok(Level::INFO)));
        assert!(matches!(parse_log_level("warn"), Ok(Level::WARN)));
        assert!(matches!(parse_log_level("error"), Ok(Level::ERROR)));
        assert!(matches!(parse_log_level("TRACE"), Ok(Level::TRACE)));
        assert!(parse_log_level("invalid").is_err());
    }

    #[test]
    fn test_from_config_resolves_format() {
        let logger = LoggerImpl::from_config(&LoggingConfig {
            level: "debug".to_string(),
            format: "pretty".to_string(),
        })
        .unwrap();
        assert_eq!(logger.level(), Level::DEBUG);
        assert!(!logger.is_json());

        assert!(LoggerImpl::from_config(&LoggingConfig::default())
            .unwrap()
            .is_json());
    }

    #[test]
    fn test_from_config_rejects_unknown_format() {
        let config = LoggingConfig {
            level: "info".to_string(),
            format: "xml".to_string(),
        };
        assert!(LoggerImpl::from_config(&config).is_err());
    }
}
