//! Trello adapter: the ticket tracker holding one card per roster entry.

pub mod client;
pub mod models;

pub use client::TrelloClient;
