//! Conversation engine.
//!
//! One inbound message runs exactly one workflow:
//! - `dispatch`: loads the sender's record and picks the workflow
//! - `identity`: roster verification with bounded retries and duplicate detection
//! - `menus`: traversal of the externally defined menu table
//! - `field_change`: edit one roster field and mirror it into the linked ticket
//! - `emergency`: detention confirmation and broadcast
//! - `relay`: private ↔ staff group message relay
//!
//! Workflows read an immutable [`RequestContext`], perform their writes as
//! sequential awaits and report a [`StepOutcome`].

mod context;
mod dispatch;
mod emergency;
mod field_change;
mod identity;
mod locks;
mod menus;
mod outcome;
mod relay;
pub mod texts;

use std::sync::Arc;

use crate::domain::errors::DomainResult;
use crate::domain::models::{
    BotConfig, ConversationState, KeyboardButton, OutgoingMessage, ReplyMarkup,
};
use crate::domain::ports::{ConversationStore, MenuTable, Messenger, Roster, TicketTracker};

pub use context::{sender_id, RequestContext};
pub use field_change::FieldUpdate;
pub use locks::{UserGuard, UserLocks};
pub use outcome::{RecoverableFailure, StepOutcome};
pub use relay::{parse_relay_header, relay_header};

/// Engine settings derived from [`BotConfig`].
#[derive(Debug, Clone)]
pub struct EngineSettings {
    pub max_verification_attempts: u32,
    pub staff_chat_id: i64,
    pub emergency_chat_id: i64,
    pub audit_tag: String,
}

impl From<&BotConfig> for EngineSettings {
    fn from(config: &BotConfig) -> Self {
        Self {
            max_verification_attempts: config.max_verification_attempts,
            staff_chat_id: config.staff_chat_id,
            emergency_chat_id: config.emergency_chat_id,
            audit_tag: config.audit_tag.clone(),
        }
    }
}

/// The external collaborators the engine works through.
#[derive(Clone)]
pub struct EnginePorts {
    pub store: Arc<dyn ConversationStore>,
    pub roster: Arc<dyn Roster>,
    pub menus: Arc<dyn MenuTable>,
    pub tickets: Arc<dyn TicketTracker>,
    pub messenger: Arc<dyn Messenger>,
}

/// Decides, for each inbound message and the sender's persisted record,
/// the next state and the side effects to perform.
pub struct ConversationEngine {
    store: Arc<dyn ConversationStore>,
    roster: Arc<dyn Roster>,
    menus: Arc<dyn MenuTable>,
    tickets: Arc<dyn TicketTracker>,
    messenger: Arc<dyn Messenger>,
    settings: EngineSettings,
    locks: UserLocks,
}

impl ConversationEngine {
    pub fn new(ports: EnginePorts, settings: EngineSettings) -> Self {
        Self {
            store: ports.store,
            roster: ports.roster,
            menus: ports.menus,
            tickets: ports.tickets,
            messenger: ports.messenger,
            settings,
            locks: UserLocks::new(),
        }
    }

    pub const fn settings(&self) -> &EngineSettings {
        &self.settings
    }

    async fn send_text(&self, chat_id: i64, text: &str) -> DomainResult<()> {
        self.messenger
            .send_message(&OutgoingMessage::text(chat_id, text))
            .await
    }

    async fn send_with_markup(
        &self,
        chat_id: i64,
        text: &str,
        markup: ReplyMarkup,
    ) -> DomainResult<()> {
        self.messenger
            .send_message(&OutgoingMessage::text(chat_id, text).with_markup(markup))
            .await
    }

    async fn force_reply(&self, chat_id: i64, placeholder: &str, text: &str) -> DomainResult<()> {
        self.send_with_markup(chat_id, text, ReplyMarkup::force_reply(placeholder))
            .await
    }

    /// Labels of the buttons shown in `state`, in table order.
    async fn buttons(&self, state: &ConversationState) -> DomainResult<Vec<KeyboardButton>> {
        let entries = self.menus.entries_from(&state.as_tag()).await?;
        Ok(entries
            .into_iter()
            .map(|entry| KeyboardButton::new(entry.label))
            .collect())
    }

    /// Send `description` with the buttons of `state`.
    async fn send_menu(
        &self,
        chat_id: i64,
        description: &str,
        state: &ConversationState,
    ) -> DomainResult<()> {
        // Telegram rejects empty message text.
        let text = if description.is_empty() { " " } else { description };
        let buttons = self.buttons(state).await?;
        self.send_with_markup(chat_id, text, ReplyMarkup::keyboard(buttons))
            .await
    }

    async fn send_main_menu(&self, chat_id: i64) -> DomainResult<()> {
        self.send_menu(chat_id, texts::MAIN_MENU, &ConversationState::MainMenu)
            .await
    }

    async fn set_state(&self, ctx: &RequestContext, state: &ConversationState) -> DomainResult<()> {
        tracing::debug!(from_id = ctx.from_id, from = %ctx.record.state, to = %state, "state change");
        self.store.set_state(ctx.row(), state).await
    }
}
