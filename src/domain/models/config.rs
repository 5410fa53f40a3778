use serde::{Deserialize, Serialize};

/// Main configuration structure for the bot
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Webhook server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Telegram Bot API configuration
    #[serde(default)]
    pub telegram: TelegramConfig,

    /// Google Sheets (roster, conversation state, menu table) configuration
    #[serde(default)]
    pub sheets: SheetsConfig,

    /// Trello (ticket tracker) configuration
    #[serde(default)]
    pub trello: TrelloConfig,

    /// Conversation engine settings
    #[serde(default)]
    pub bot: BotConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Webhook server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ServerConfig {
    /// Host to bind to
    #[serde(default = "default_host")]
    pub host: String,

    /// Port to listen on
    #[serde(default = "default_port")]
    pub port: u16,

    /// The single path accepting updates
    #[serde(default = "default_webhook_path")]
    pub webhook_path: String,

    /// Shared secret expected in `X-Telegram-Bot-Api-Secret-Token`
    #[serde(default)]
    pub secret_token: String,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

const fn default_port() -> u16 {
    8080
}

fn default_webhook_path() -> String {
    "/lpr-uslugi-bot".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            webhook_path: default_webhook_path(),
            secret_token: String::new(),
        }
    }
}

/// Telegram Bot API configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct TelegramConfig {
    /// Bot token issued by `@BotFather`
    #[serde(default)]
    pub bot_token: String,

    /// Bot API base URL
    #[serde(default = "default_telegram_api_base")]
    pub api_base: String,
}

fn default_telegram_api_base() -> String {
    "https://api.telegram.org".to_string()
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            bot_token: String::new(),
            api_base: default_telegram_api_base(),
        }
    }
}

/// Google Sheets configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct SheetsConfig {
    /// Service account e-mail
    #[serde(default)]
    pub service_user: String,

    /// Service account private key (PEM)
    #[serde(default)]
    pub service_key: String,

    /// Spreadsheet holding all three sheets
    #[serde(default)]
    pub spreadsheet_id: String,

    /// Roster sheet gid
    #[serde(default)]
    pub roster_gid: String,

    /// Roster sheet name (used in write ranges)
    #[serde(default = "default_roster_sheet")]
    pub roster_sheet: String,

    /// Conversation state sheet gid
    #[serde(default)]
    pub state_gid: String,

    /// Conversation state sheet name
    #[serde(default = "default_state_sheet")]
    pub state_sheet: String,

    /// Menu table sheet gid
    #[serde(default)]
    pub menu_gid: String,

    /// Menu table sheet name
    #[serde(default = "default_menu_sheet")]
    pub menu_sheet: String,

    /// OAuth token endpoint for the service account
    #[serde(default = "default_token_uri")]
    pub token_uri: String,

    /// Base URL of the visualization query endpoint
    #[serde(default = "default_query_base")]
    pub query_base: String,

    /// Base URL of the Sheets values API
    #[serde(default = "default_sheets_api_base")]
    pub api_base: String,
}

fn default_roster_sheet() -> String {
    "HourlyBase".to_string()
}

fn default_state_sheet() -> String {
    "LPRUslugiBotState".to_string()
}

fn default_menu_sheet() -> String {
    "LPRUslugiBotMenu".to_string()
}

fn default_token_uri() -> String {
    "https://oauth2.googleapis.com/token".to_string()
}

fn default_query_base() -> String {
    "https://docs.google.com".to_string()
}

fn default_sheets_api_base() -> String {
    "https://sheets.googleapis.com".to_string()
}

impl Default for SheetsConfig {
    fn default() -> Self {
        Self {
            service_user: String::new(),
            service_key: String::new(),
            spreadsheet_id: String::new(),
            roster_gid: String::new(),
            roster_sheet: default_roster_sheet(),
            state_gid: String::new(),
            state_sheet: default_state_sheet(),
            menu_gid: String::new(),
            menu_sheet: default_menu_sheet(),
            token_uri: default_token_uri(),
            query_base: default_query_base(),
            api_base: default_sheets_api_base(),
        }
    }
}

/// Trello configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct TrelloConfig {
    /// API key
    #[serde(default)]
    pub key: String,

    /// API token
    #[serde(default)]
    pub token: String,

    /// REST API base URL
    #[serde(default = "default_trello_api_base")]
    pub api_base: String,
}

fn default_trello_api_base() -> String {
    "https://api.trello.com".to_string()
}

impl Default for TrelloConfig {
    fn default() -> Self {
        Self {
            key: String::new(),
            token: String::new(),
            api_base: default_trello_api_base(),
        }
    }
}

/// Conversation engine settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct BotConfig {
    /// Failed roster lookups allowed before verification is refused
    #[serde(default = "default_max_verification_attempts")]
    pub max_verification_attempts: u32,

    /// Staff (MRK) group chat receiving relayed messages
    #[serde(default)]
    pub staff_chat_id: i64,

    /// Emergency staff group chat receiving detention notices
    #[serde(default)]
    pub emergency_chat_id: i64,

    /// Prefix of every ticket audit comment
    #[serde(default = "default_audit_tag")]
    pub audit_tag: String,
}

const fn default_max_verification_attempts() -> u32 {
    5
}

fn default_audit_tag() -> String {
    "ЛПРУслуги".to_string()
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            max_verification_attempts: default_max_verification_attempts(),
            staff_chat_id: 0,
            emergency_chat_id: 0,
            audit_tag: default_audit_tag(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "json".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}
