//! Immutable per-message request context.

use crate::domain::models::text::{normalize_handle, sanitize};
use crate::domain::models::{Contact, ConversationRecord, Message};

/// Everything a workflow step may read about the inbound message and the
/// conversation record as it was when the message arrived.
#[derive(Debug, Clone)]
pub struct RequestContext {
    pub from_id: i64,
    pub chat_id: i64,
    pub message_id: i64,
    /// Public handle without `@`, when the sender has one.
    pub handle: Option<String>,
    pub text: Option<String>,
    pub contact: Option<Contact>,
    pub record: ConversationRecord,
}

impl RequestContext {
    pub fn new(message: &Message, record: ConversationRecord) -> Self {
        let handle = message
            .chat
            .username
            .as_deref()
            .or_else(|| message.from.as_ref().and_then(|u| u.username.as_deref()))
            .map(normalize_handle)
            .filter(|h| !h.is_empty());

        Self {
            from_id: sender_id(message),
            chat_id: message.chat.id,
            message_id: message.message_id,
            handle,
            text: message.text.clone(),
            contact: message.contact.clone(),
            record,
        }
    }

    /// Sanitized text, empty when the message had none.
    pub fn input(&self) -> String {
        self.text.as_deref().map(sanitize).unwrap_or_default()
    }

    /// Raw text, empty when the message had none.
    pub fn raw_text(&self) -> &str {
        self.text.as_deref().unwrap_or_default()
    }

    /// Identifier linking this conversation to a roster entry.
    pub fn person_id(&self) -> i64 {
        self.record.person_id.unwrap_or(self.from_id)
    }

    pub const fn row(&self) -> u64 {
        self.record.row_id
    }
}

/// The stable sender id of a message; private chats share it with the chat id.
pub fn sender_id(message: &Message) -> i64 {
    message.from.as_ref().map_or(message.chat.id, |u| u.id)
}
