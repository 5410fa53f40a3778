//! Implementation of the `uslugi-bot check-config` command.

use std::path::Path;

use anyhow::{Context, Result};
use clap::Args;
use serde::Serialize;

use crate::cli::output::{output, CommandOutput};
use crate::domain::models::Config;
use crate::infrastructure::config::ConfigLoader;

#[derive(Args, Debug)]
pub struct CheckConfigArgs {
    /// Also require every credential needed by `serve`
    #[arg(long)]
    pub strict: bool,
}

#[derive(Debug, Serialize)]
pub struct CheckConfigOutput {
    pub valid: bool,
    /// Credential check outcome, when requested.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub credentials: Option<String>,
    pub config: Config,
}

impl CommandOutput for CheckConfigOutput {
    fn to_human(&self) -> String {
        let mut lines = vec!["Configuration is valid.".to_string()];
        if let Some(credentials) = &self.credentials {
            lines.push(format!("Credentials: {credentials}"));
        }
        lines.push(String::new());
        lines.push(serde_yaml::to_string(&self.config).unwrap_or_default());
        lines.join("\n")
    }

    fn to_json(&self) -> serde_json::Value {
        serde_json::to_value(self).unwrap_or_default()
    }
}

pub fn execute(args: &CheckConfigArgs, config_path: Option<&Path>, json_mode: bool) -> Result<()> {
    let config = ConfigLoader::load(config_path).context("Configuration is invalid")?;

    let credentials = if args.strict {
        ConfigLoader::validate_credentials(&config)?;
        Some("complete".to_string())
    } else {
        None
    };

    output(
        &CheckConfigOutput {
            valid: true,
            credentials,
            config: ConfigLoader::redacted(&config),
        },
        json_mode,
    );
    Ok(())
}
