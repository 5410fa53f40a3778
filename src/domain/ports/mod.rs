//! Port trait definitions (Hexagonal Architecture)
//!
//! The conversation engine talks to the outside world only through these
//! async traits:
//! - ConversationStore: per-person conversation records
//! - Roster: the authoritative roster of enrolled persons
//! - MenuTable: the externally defined menu transition table
//! - TicketTracker: tickets linked to roster entries
//! - Messenger: outbound chat messages
//!
//! Adapters in `crate::adapters` implement them over Google Sheets, Trello
//! and the Telegram Bot API, plus in-memory versions for tests.

pub mod conversation_store;
pub mod menu_table;
pub mod messenger;
pub mod roster;
pub mod ticket_tracker;

pub use conversation_store::ConversationStore;
pub use menu_table::MenuTable;
pub use messenger::Messenger;
pub use roster::Roster;
pub use ticket_tracker::TicketTracker;
