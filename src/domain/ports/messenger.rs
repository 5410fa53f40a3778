use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::OutgoingMessage;

/// Outbound messaging port.
#[async_trait]
pub trait Messenger: Send + Sync {
    async fn send_message(&self, message: &OutgoingMessage) -> DomainResult<()>;

    /// Relay an existing message verbatim into another chat.
    async fn copy_message(&self, to_chat: i64, from_chat: i64, message_id: i64)
        -> DomainResult<()>;

    async fn leave_chat(&self, chat_id: i64) -> DomainResult<()>;
}
