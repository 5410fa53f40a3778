//! Inbound webhook endpoint.

pub mod server;

pub use server::{WebhookServer, SECRET_HEADER};
