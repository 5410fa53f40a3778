//! Implementation of the `uslugi-bot serve` command.

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Args;

use crate::adapters::sheets::{SheetConversationStore, SheetMenuTable, SheetRoster, SheetsClient};
use crate::adapters::telegram::TelegramClient;
use crate::adapters::trello::TrelloClient;
use crate::adapters::webhook::WebhookServer;
use crate::domain::models::Config;
use crate::infrastructure::config::ConfigLoader;
use crate::infrastructure::logging::LoggerImpl;
use crate::services::{ConversationEngine, EnginePorts, EngineSettings};

#[derive(Args, Debug)]
pub struct ServeArgs {
    /// Override the configured listen port
    #[arg(short, long)]
    pub port: Option<u16>,
}

/// Wire the production adapters into a conversation engine.
pub fn build_engine(config: &Config) -> Result<ConversationEngine> {
    let sheets = SheetsClient::new(&config.sheets).context("Failed to set up Google Sheets client")?;
    let sheets_config = &config.sheets;

    let ports = EnginePorts {
        store: Arc::new(SheetConversationStore::new(
            sheets.sheet(&sheets_config.state_gid, &sheets_config.state_sheet),
        )),
        roster: Arc::new(SheetRoster::new(
            sheets.sheet(&sheets_config.roster_gid, &sheets_config.roster_sheet),
        )),
        menus: Arc::new(SheetMenuTable::new(
            sheets.sheet(&sheets_config.menu_gid, &sheets_config.menu_sheet),
        )),
        tickets: Arc::new(TrelloClient::new(&config.trello)),
        messenger: Arc::new(TelegramClient::new(&config.telegram)),
    };

    Ok(ConversationEngine::new(ports, EngineSettings::from(&config.bot)))
}

pub async fn execute(args: ServeArgs, config_path: Option<&Path>) -> Result<()> {
    let mut config = ConfigLoader::load(config_path)?;
    ConfigLoader::validate_credentials(&config)?;
    if let Some(port) = args.port {
        config.server.port = port;
    }

    let _logger = LoggerImpl::init(&config.logging)?;

    let engine = Arc::new(build_engine(&config)?);
    tracing::info!(
        max_attempts = engine.settings().max_verification_attempts,
        "conversation engine ready"
    );

    WebhookServer::new(engine, config.server).serve().await
}
