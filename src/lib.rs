//! LPR Uslugi bot - webhook-driven Telegram bot for enrolled members
//!
//! A member verifies their identity against the roster, then navigates a
//! table-defined menu to review or change their contact data, escalate a
//! detention, or chat with staff through relayed messages.
//!
//! # Architecture
//!
//! This crate follows Clean Architecture / Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): models, errors and port traits
//! - **Service Layer** (`services`): the conversation engine
//! - **Adapters** (`adapters`): Google Sheets, Trello, Telegram and the webhook server
//! - **Infrastructure Layer** (`infrastructure`): configuration and logging
//! - **CLI Layer** (`cli`): command-line interface

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::models::{Config, ConversationRecord, ConversationState, Update, Verification};
pub use domain::ports::{ConversationStore, MenuTable, Messenger, Roster, TicketTracker};
pub use domain::{DomainError, DomainResult};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::{ConversationEngine, EnginePorts, EngineSettings, StepOutcome};
