//! Entry point per inbound update.

use tracing::{error, info, warn};

use crate::domain::errors::DomainResult;
use crate::domain::models::{ChatKind, ConversationState, Message, Update, Verification};

use super::context::{sender_id, RequestContext};
use super::outcome::StepOutcome;
use super::{texts, ConversationEngine};

impl ConversationEngine {
    /// Handle one webhook update.
    ///
    /// Private messages go through the conversation workflows, group
    /// messages through the stateless staff relay. Any error is logged here
    /// and swallowed: the record keeps whatever was written before the
    /// failing step.
    pub async fn handle_update(&self, update: Update) -> Option<StepOutcome> {
        let Some(message) = update.message else {
            tracing::debug!(update_id = ?update.update_id, "update without message ignored");
            return None;
        };

        let result = match message.chat.kind {
            ChatKind::Private => self.process_private(&message).await,
            ChatKind::Group | ChatKind::Supergroup => self.process_group(&message).await,
            ChatKind::Channel | ChatKind::Other => return None,
        };

        match result {
            Ok(StepOutcome::Degraded(failure)) => {
                warn!(chat_id = message.chat.id, %failure, "message handled with absorbed failure");
                Some(StepOutcome::Degraded(failure))
            }
            Ok(outcome) => Some(outcome),
            Err(err) => {
                error!(
                    from_id = sender_id(&message),
                    chat_id = message.chat.id,
                    error = %err,
                    "failed to handle message"
                );
                None
            }
        }
    }

    /// Run the workflow selected by the sender's conversation record.
    pub async fn process_private(&self, message: &Message) -> DomainResult<StepOutcome> {
        let from_id = sender_id(message);
        let chat_id = message.chat.id;
        let _guard = self.locks.acquire(from_id).await;

        let mut record = match self.store.find(from_id).await? {
            Some(record) => record,
            None => {
                info!(from_id, "creating conversation record");
                self.store.create(from_id, chat_id).await?
            }
        };

        if record.chat_id != chat_id {
            info!(from_id, old = record.chat_id, new = chat_id, "chat id changed");
            self.store.set_chat_id(record.row_id, chat_id).await?;
            record.chat_id = chat_id;
        }

        let ctx = RequestContext::new(message, record);
        match ctx.record.verification {
            Verification::Duplicate => {
                self.send_text(ctx.chat_id, texts::DUPLICATE).await?;
                Ok(StepOutcome::Duplicate)
            }
            Verification::Done => self.navigate(&ctx).await,
            Verification::Attempts(n) if n >= self.settings.max_verification_attempts => {
                self.send_text(ctx.chat_id, texts::ATTEMPTS_EXHAUSTED).await?;
                Ok(StepOutcome::AttemptsExhausted)
            }
            Verification::Attempts(n) => self.verify(&ctx, n).await,
        }
    }

    /// Route a verified sender by the kind of state they are in.
    async fn navigate(&self, ctx: &RequestContext) -> DomainResult<StepOutcome> {
        match &ctx.record.state {
            ConversationState::MainMenu | ConversationState::Menu(_) => {
                self.follow_menu(ctx).await
            }
            ConversationState::Changing(field) => self.change_field(ctx, *field).await,
            ConversationState::EmergencyConfirm => self.confirm_emergency(ctx).await,
            ConversationState::Chat | ConversationState::EmergencyChat => {
                self.relay_private(ctx).await
            }
            state => {
                warn!(from_id = ctx.from_id, row = ctx.row(), %state, "registration state for verified sender");
                self.set_state(ctx, &ConversationState::MainMenu).await?;
                self.send_text(ctx.chat_id, texts::UNKNOWN_COMMAND).await?;
                self.send_main_menu(ctx.chat_id).await?;
                Ok(StepOutcome::Transitioned(ConversationState::MainMenu))
            }
        }
    }
}
