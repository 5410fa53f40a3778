use std::path::Path;

use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use thiserror::Error;

use crate::domain::models::config::Config;

/// Project config file, relative to the working directory.
pub const CONFIG_FILE: &str = "uslugi-bot.yaml";

/// Optional local overrides, relative to the working directory.
pub const LOCAL_CONFIG_FILE: &str = "uslugi-bot.local.yaml";

/// Prefix of environment overrides (`USLUGI_TELEGRAM__BOT_TOKEN`, ...).
pub const ENV_PREFIX: &str = "USLUGI_";

const REDACTED: &str = "[REDACTED]";

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Invalid max_verification_attempts: {0}. Must be at least 1")]
    InvalidMaxAttempts(u32),

    #[error("Invalid webhook path: {0:?}. Must be non-empty and start with '/'")]
    InvalidWebhookPath(String),

    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),

    #[error("Invalid log format: {0}. Must be one of: json, pretty")]
    InvalidLogFormat(String),

    #[error("{0} must be set to a non-zero chat id")]
    MissingChatId(&'static str),

    #[error("staff_chat_id and emergency_chat_id must differ (both are {0})")]
    SharedChatId(i64),

    #[error("Missing credential: {0}")]
    MissingCredential(&'static str),
}

/// Configuration loader with hierarchical merging
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. `uslugi-bot.yaml`, or `path` when given
    /// 3. `uslugi-bot.local.yaml` (optional local overrides)
    /// 4. Environment variables (`USLUGI_*` prefix, highest priority)
    pub fn load(path: Option<&Path>) -> Result<Config> {
        let config: Config = Self::figment(path)
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// The merged providers, before extraction.
    pub fn figment(path: Option<&Path>) -> Figment {
        let file = path.unwrap_or_else(|| Path::new(CONFIG_FILE));
        Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(file))
            .merge(Yaml::file(LOCAL_CONFIG_FILE))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Load configuration from a specific file, without local or environment overrides
    pub fn load_from_file(path: impl AsRef<Path>) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path.as_ref()))
            .extract()
            .context(format!(
                "Failed to load config from {}",
                path.as_ref().display()
            ))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate configuration after loading
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        if config.bot.max_verification_attempts == 0 {
            return Err(ConfigError::InvalidMaxAttempts(
                config.bot.max_verification_attempts,
            ));
        }

        let path = &config.server.webhook_path;
        if path.is_empty() || !path.starts_with('/') {
            return Err(ConfigError::InvalidWebhookPath(path.clone()));
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        let valid_log_formats = ["json", "pretty"];
        if !valid_log_formats.contains(&config.logging.format.as_str()) {
            return Err(ConfigError::InvalidLogFormat(config.logging.format.clone()));
        }

        if config.bot.staff_chat_id == 0 {
            return Err(ConfigError::MissingChatId("bot.staff_chat_id"));
        }
        if config.bot.emergency_chat_id == 0 {
            return Err(ConfigError::MissingChatId("bot.emergency_chat_id"));
        }
        if config.bot.staff_chat_id == config.bot.emergency_chat_id {
            return Err(ConfigError::SharedChatId(config.bot.staff_chat_id));
        }

        Ok(())
    }

    /// Check the credentials needed to talk to the external services.
    pub fn validate_credentials(config: &Config) -> Result<(), ConfigError> {
        let required = [
            ("telegram.bot_token", &config.telegram.bot_token),
            ("server.secret_token", &config.server.secret_token),
            ("sheets.service_user", &config.sheets.service_user),
            ("sheets.service_key", &config.sheets.service_key),
            ("sheets.spreadsheet_id", &config.sheets.spreadsheet_id),
            ("sheets.roster_gid", &config.sheets.roster_gid),
            ("sheets.state_gid", &config.sheets.state_gid),
            ("sheets.menu_gid", &config.sheets.menu_gid),
            ("trello.key", &config.trello.key),
            ("trello.token", &config.trello.token),
        ];
        match required.into_iter().find(|(_, value)| value.trim().is_empty()) {
            Some((name, _)) => Err(ConfigError::MissingCredential(name)),
            None => Ok(()),
        }
    }

    /// A copy of `config` with every secret replaced, for display.
    pub fn redacted(config: &Config) -> Config {
        let mut shown = config.clone();
        for secret in [
            &mut shown.server.secret_token,
            &mut shown.telegram.bot_token,
            &mut shown.sheets.service_key,
            &mut shown.trello.key,
            &mut shown.trello.token,
        ] {
            if !secret.is_empty() {
                *secret = REDACTED.to_string();
            }
        }
        shown
    }
}
