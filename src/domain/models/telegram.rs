//! Telegram Bot API payloads: inbound updates and outgoing messages.
//!
//! Only the fields the engine reads are modelled; everything else in the
//! update is ignored during deserialization.

use serde::{Deserialize, Serialize};

/// Webhook update envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    #[serde(default)]
    pub update_id: Option<i64>,
    #[serde(default)]
    pub message: Option<Message>,
}

/// An inbound message.
#[derive(Debug, Clone, Deserialize)]
pub struct Message {
    pub message_id: i64,
    #[serde(default)]
    pub from: Option<User>,
    pub chat: Chat,
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub contact: Option<Contact>,
    #[serde(default)]
    pub reply_to_message: Option<Box<Message>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChatKind {
    Private,
    Group,
    Supergroup,
    Channel,
    #[serde(other)]
    Other,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Chat {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: ChatKind,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct User {
    pub id: i64,
    #[serde(default)]
    pub username: Option<String>,
}

/// A shared contact card.
#[derive(Debug, Clone, Deserialize)]
pub struct Contact {
    pub phone_number: String,
    /// Set when the contact belongs to a Telegram user.
    #[serde(default)]
    pub user_id: Option<i64>,
}

/// One button of a reply keyboard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct KeyboardButton {
    pub text: String,
    #[serde(skip_serializing_if = "std::ops::Not::not")]
    pub request_contact: bool,
}

impl KeyboardButton {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            request_contact: false,
        }
    }

    /// A button that shares the sender's phone number when pressed.
    pub fn request_contact(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            request_contact: true,
        }
    }
}

/// Keyboard or reply prompt attached to an outgoing message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ReplyMarkup {
    Keyboard {
        keyboard: Vec<Vec<KeyboardButton>>,
        is_persistent: bool,
        resize_keyboard: bool,
        one_time_keyboard: bool,
    },
    ForceReply {
        force_reply: bool,
        input_field_placeholder: String,
    },
    RemoveKeyboard {
        remove_keyboard: bool,
    },
}

impl ReplyMarkup {
    /// A persistent one-time keyboard with one button per row.
    pub fn keyboard(buttons: Vec<KeyboardButton>) -> Self {
        Self::Keyboard {
            keyboard: buttons.into_iter().map(|b| vec![b]).collect(),
            is_persistent: true,
            resize_keyboard: true,
            one_time_keyboard: true,
        }
    }

    /// A keyboard built from plain button labels.
    pub fn labels<I, S>(labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::keyboard(labels.into_iter().map(KeyboardButton::new).collect())
    }

    pub fn force_reply(placeholder: impl Into<String>) -> Self {
        Self::ForceReply {
            force_reply: true,
            input_field_placeholder: placeholder.into(),
        }
    }

    /// Hide any custom keyboard currently shown.
    pub const fn remove() -> Self {
        Self::RemoveKeyboard {
            remove_keyboard: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ParseMode {
    #[serde(rename = "HTML")]
    Html,
    MarkdownV2,
}

/// Payload of `sendMessage`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutgoingMessage {
    pub chat_id: i64,
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reply_markup: Option<ReplyMarkup>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parse_mode: Option<ParseMode>,
}

impl OutgoingMessage {
    pub fn text(chat_id: i64, text: impl Into<String>) -> Self {
        Self {
            chat_id,
            text: text.into(),
            reply_markup: None,
            parse_mode: None,
        }
    }

    #[must_use]
    pub fn with_markup(mut self, markup: ReplyMarkup) -> Self {
        self.reply_markup = Some(markup);
        self
    }

    #[must_use]
    pub const fn with_parse_mode(mut self, mode: ParseMode) -> Self {
        self.parse_mode = Some(mode);
        self
    }
}
