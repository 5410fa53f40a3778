//! Telegram Bot API adapter.

pub mod client;

pub use client::TelegramClient;
