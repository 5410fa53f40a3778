//! CLI type definitions
//!
//! This module contains clap command structures that define the CLI interface.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use super::commands::config::CheckConfigArgs;
use super::commands::serve::ServeArgs;
use super::commands::webhook::SetWebhookArgs;

#[derive(Parser, Debug)]
#[command(name = "uslugi-bot")]
#[command(about = "LPR Uslugi Telegram bot", long_about = None)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file (defaults to ./uslugi-bot.yaml)
    #[arg(short, long, global = true, env = "USLUGI_CONFIG")]
    pub config: Option<PathBuf>,

    /// Output in JSON format
    #[arg(short, long, global = true)]
    pub json: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Run the webhook server
    Serve(ServeArgs),

    /// Register the webhook URL and secret with the Telegram Bot API
    SetWebhook(SetWebhookArgs),

    /// Load, validate and print the effective configuration (secrets redacted)
    CheckConfig(CheckConfigArgs),
}
