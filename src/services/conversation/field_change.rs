//! Field-change workflow and the generic roster + ticket field update.

use chrono::Utc;
use tracing::{debug, info};

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::text::{normalize_phone, sanitize};
use crate::domain::models::{patch_description, ConversationState, RosterField};

use super::context::RequestContext;
use super::outcome::StepOutcome;
use super::{texts, ConversationEngine};

/// One roster field rewrite, mirrored into the linked ticket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldUpdate {
    pub row: u64,
    pub ticket_id: String,
    pub field: RosterField,
    pub old: String,
    pub new: String,
}

impl FieldUpdate {
    /// Audit comment text: `<tag>;<timestamp>;Уточнение <field>;<old>;<new>`.
    pub fn audit_comment(&self, tag: &str, timestamp: &str) -> String {
        format!(
            "{tag};{timestamp};Уточнение {};{};{}",
            self.field.spec().audit_label,
            self.old,
            self.new
        )
    }
}

impl ConversationEngine {
    /// Overwrite the roster cell, log the change on the ticket and patch
    /// the ticket description line for the field.
    ///
    /// Returns `false` without touching anything when the value is unchanged.
    pub async fn apply_field_update(&self, update: FieldUpdate) -> DomainResult<bool> {
        if update.old == update.new {
            debug!(row = update.row, field = update.field.tag(), "value unchanged, skipping");
            return Ok(false);
        }

        let spec = update.field.spec();
        info!(
            row = update.row,
            field = spec.tag,
            ticket_id = %update.ticket_id,
            "updating roster field"
        );

        self.roster
            .overwrite(update.row, update.field, &update.new)
            .await?;

        let comment = update.audit_comment(&self.settings.audit_tag, &Utc::now().to_rfc3339());
        self.tickets.add_comment(&update.ticket_id, &comment).await?;

        let description = self.tickets.description(&update.ticket_id).await?;
        let patched = patch_description(&description, spec.ticket_label, &update.new);
        self.tickets
            .set_description(&update.ticket_id, &patched)
            .await?;
        Ok(true)
    }

    /// Handle the reply to a `changing_*` prompt.
    pub(super) async fn change_field(
        &self,
        ctx: &RequestContext,
        field: RosterField,
    ) -> DomainResult<StepOutcome> {
        let input = sanitize(ctx.raw_text()).trim().to_string();

        if input.to_lowercase() == texts::CANCEL.to_lowercase() {
            self.set_state(ctx, &ConversationState::changing_menu()).await?;
            self.send_text(ctx.chat_id, texts::CHANGE_CANCELLED).await?;
            self.send_changing_menu(ctx.chat_id).await?;
            return Ok(StepOutcome::Transitioned(ConversationState::changing_menu()));
        }

        let value = match field {
            RosterField::Phone => normalize_phone(&input),
            _ => input,
        };
        let rejection = if value.is_empty() {
            Some(texts::VALUE_REQUIRED)
        } else if field == RosterField::Email && !value.contains('@') {
            Some(texts::EMAIL_NEEDS_AT)
        } else {
            None
        };
        if let Some(notice) = rejection {
            self.set_state(ctx, &ConversationState::changing_menu()).await?;
            self.send_text(ctx.chat_id, notice).await?;
            self.send_changing_menu(ctx.chat_id).await?;
            return Ok(StepOutcome::Rejected);
        }

        let person_id = ctx.person_id();
        let snapshot = self
            .roster
            .field_snapshot(person_id, field)
            .await?
            .ok_or(DomainError::RosterEntryNotFound(person_id))?;

        self.apply_field_update(FieldUpdate {
            row: snapshot.row,
            ticket_id: snapshot.ticket_id,
            field,
            old: snapshot.value,
            new: value,
        })
        .await?;

        self.set_state(ctx, &ConversationState::changing_menu()).await?;
        self.send_text(ctx.chat_id, texts::DATA_CHANGED).await?;
        self.send_changing_menu(ctx.chat_id).await?;
        Ok(StepOutcome::Transitioned(ConversationState::changing_menu()))
    }

    async fn send_changing_menu(&self, chat_id: i64) -> DomainResult<()> {
        self.send_menu(chat_id, texts::CHANGING_MENU, &ConversationState::changing_menu())
            .await
    }
}
