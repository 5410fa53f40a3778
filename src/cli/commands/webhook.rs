//! Implementation of the `uslugi-bot set-webhook` command.

use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use crate::adapters::telegram::TelegramClient;
use crate::cli::output::{output, CommandOutput};
use crate::infrastructure::config::{ConfigError, ConfigLoader};

#[derive(Args, Debug)]
pub struct SetWebhookArgs {
    /// Public base URL of this server, e.g. https://bot.example.org
    #[arg(long)]
    pub url: String,
}

#[derive(Debug, Serialize)]
pub struct SetWebhookOutput {
    pub success: bool,
    pub webhook_url: String,
}

impl CommandOutput for SetWebhookOutput {
    fn to_human(&self) -> String {
        format!("Webhook registered: {}", self.webhook_url)
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

/// The full webhook URL for a public base URL and the configured path.
pub fn webhook_url(base: &str, path: &str) -> String {
    format!("{}{path}", base.trim_end_matches('/'))
}

pub async fn execute(args: SetWebhookArgs, config_path: Option<&Path>, json_mode: bool) -> Result<()> {
    let config = ConfigLoader::load(config_path)?;
    if config.telegram.bot_token.is_empty() {
        return Err(ConfigError::MissingCredential("telegram.bot_token").into());
    }

    let url = webhook_url(&args.url, &config.server.webhook_path);
    TelegramClient::new(&config.telegram)
        .set_webhook(&url, &config.server.secret_token)
        .await
        .context("Failed to register webhook")?;

    output(
        &SetWebhookOutput {
            success: true,
            webhook_url: url,
        },
        json_mode,
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_webhook_url_joins_path() {
        assert_eq!(
            webhook_url("https://bot.example.org/", "/lpr-uslugi-bot"),
            "https://bot.example.org/lpr-uslugi-bot"
        );
        assert_eq!(
            webhook_url("https://bot.example.org", "/hook"),
            "https://bot.example.org/hook"
        );
    }
}
