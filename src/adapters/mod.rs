//! Adapters implementing the domain ports over external systems.

pub mod memory;
pub mod sheets;
pub mod telegram;
pub mod trello;
pub mod webhook;
