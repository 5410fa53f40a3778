//! Google Sheets adapter.
//!
//! One spreadsheet holds the roster, the bot state sheet and the menu
//! table; each port implementation wraps one [`Sheet`].

pub mod auth;
pub mod client;
pub mod conversation_store;
pub mod menu_table;
pub mod roster;

pub use auth::ServiceAccountAuth;
pub use client::{Sheet, SheetsClient};
pub use conversation_store::SheetConversationStore;
pub use menu_table::SheetMenuTable;
pub use roster::SheetRoster;
