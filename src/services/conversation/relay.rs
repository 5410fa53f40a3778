//! Staff relay between private conversations and the staff group chats.
//!
//! Outbound, every message of a person in `chat` or `emergency_chat` is
//! copied to the matching staff chat after a one-line header carrying the
//! person id. Inbound, a staff reply to such a header is copied back to the
//! person's private chat. The inbound side keeps no state: the person id is
//! recovered from the header text alone.

use std::sync::LazyLock;

use regex::Regex;
use tracing::{info, warn};

use crate::domain::errors::DomainResult;
use crate::domain::models::{ConversationState, Message};

use super::context::RequestContext;
use super::outcome::{RecoverableFailure, StepOutcome};
use super::{texts, ConversationEngine};

static HEADER_PERSON_ID: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\(TUID: ([0-9]+)\)").expect("valid regex"));

/// One-line header preceding a relayed message.
///
/// Names the sender by handle when known, otherwise by name and phone.
pub fn relay_header(ctx: &RequestContext) -> String {
    let person_id = ctx.person_id();
    if let Some(handle) = &ctx.handle {
        return format!("Сообщение от @{handle} (TUID: {person_id})");
    }
    let name = format!("{} {}", ctx.record.family_name, ctx.record.given_name);
    let name = name.trim();
    if ctx.record.phone.is_empty() {
        format!("Сообщение от {name} (TUID: {person_id})")
    } else {
        format!("Сообщение от {name}, {} (TUID: {person_id})", ctx.record.phone)
    }
}

/// Recover the person id embedded in a relay header.
pub fn parse_relay_header(text: &str) -> Option<i64> {
    HEADER_PERSON_ID
        .captures(text)
        .and_then(|caps| caps[1].parse().ok())
}

impl ConversationEngine {
    /// Forward a private message to the staff chat of the current relay mode.
    pub(super) async fn relay_private(&self, ctx: &RequestContext) -> DomainResult<StepOutcome> {
        let in_chat = ctx.record.state == ConversationState::Chat;

        if in_chat && ctx.raw_text().trim().to_lowercase() == texts::EXIT.to_lowercase() {
            self.set_state(ctx, &ConversationState::MainMenu).await?;
            self.send_main_menu(ctx.chat_id).await?;
            return Ok(StepOutcome::Transitioned(ConversationState::MainMenu));
        }

        let staff_chat = if in_chat {
            self.settings.staff_chat_id
        } else {
            self.settings.emergency_chat_id
        };

        if let Err(err) = self.send_text(staff_chat, &relay_header(ctx)).await {
            warn!(from_id = ctx.from_id, staff_chat, error = %err, "relay header not delivered");
            return Ok(StepOutcome::Degraded(RecoverableFailure::RelayFailed(
                err.to_string(),
            )));
        }
        if let Err(err) = self
            .messenger
            .copy_message(staff_chat, ctx.chat_id, ctx.message_id)
            .await
        {
            warn!(from_id = ctx.from_id, staff_chat, error = %err, "relayed message not copied");
            return Ok(StepOutcome::Degraded(RecoverableFailure::RelayFailed(
                err.to_string(),
            )));
        }

        info!(from_id = ctx.from_id, staff_chat, "relayed message to staff");
        Ok(StepOutcome::Relayed)
    }

    /// Handle a message posted in a group chat.
    ///
    /// Unknown groups get their chat id announced and are left. In the staff
    /// chats, a reply to a relay header is copied back to the person.
    pub async fn process_group(&self, message: &Message) -> DomainResult<StepOutcome> {
        let chat_id = message.chat.id;
        let staff_chat = self.settings.staff_chat_id;
        let emergency_chat = self.settings.emergency_chat_id;

        if chat_id != staff_chat && chat_id != emergency_chat {
            info!(chat_id, title = ?message.chat.title, "leaving unknown group");
            self.send_text(chat_id, &format!("chat id: {chat_id}")).await?;
            self.messenger.leave_chat(chat_id).await?;
            return Ok(StepOutcome::LeftChat(chat_id));
        }

        let Some(person_id) = message
            .reply_to_message
            .as_deref()
            .and_then(|reply| reply.text.as_deref())
            .and_then(parse_relay_header)
        else {
            return Ok(StepOutcome::Ignored);
        };

        let notice = if chat_id == staff_chat {
            texts::STAFF_REPLIED
        } else {
            texts::EMERGENCY_REPLIED
        };

        if let Err(err) = self.send_text(person_id, notice).await {
            warn!(person_id, chat_id, error = %err, "staff reply notice not delivered");
            return Ok(StepOutcome::Degraded(RecoverableFailure::RelayFailed(
                err.to_string(),
            )));
        }
        if let Err(err) = self
            .messenger
            .copy_message(person_id, chat_id, message.message_id)
            .await
        {
            warn!(person_id, chat_id, error = %err, "staff reply not copied");
            return Ok(StepOutcome::Degraded(RecoverableFailure::RelayFailed(
                err.to_string(),
            )));
        }

        info!(person_id, chat_id, "relayed staff reply");
        Ok(StepOutcome::Relayed)
    }
}
