//! Domain models for the conversation engine.

pub mod config;
pub mod conversation;
pub mod menu;
pub mod roster;
pub mod telegram;
pub mod text;
pub mod ticket;

pub use config::{
    BotConfig, Config, LoggingConfig, ServerConfig, SheetsConfig, TelegramConfig, TrelloConfig,
};
pub use conversation::{ConversationRecord, ConversationState, Verification};
pub use menu::MenuEntry;
pub use roster::{
    CandidateEntry, ContactKey, ContactSummary, DetentionProfile, FieldSnapshot, FieldSpec,
    IdentityQuery, LinkedEntry, RosterField,
};
pub use telegram::{
    Chat, ChatKind, Contact, KeyboardButton, Message, OutgoingMessage, ParseMode, ReplyMarkup,
    Update, User,
};
pub use ticket::{patch_description, TicketDescription};
