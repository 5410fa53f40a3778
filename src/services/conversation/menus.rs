//! Menu navigation driven by the external menu table.

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::text::sanitize;
use crate::domain::models::{ContactSummary, ConversationState, MenuEntry, ReplyMarkup};

use super::context::RequestContext;
use super::outcome::StepOutcome;
use super::{texts, ConversationEngine};

impl ConversationEngine {
    /// Resolve a button press in `main_menu` or a `menu_*` state.
    pub(super) async fn follow_menu(&self, ctx: &RequestContext) -> DomainResult<StepOutcome> {
        let current = &ctx.record.state;
        let label = sanitize(ctx.raw_text());

        let Some(entry) = self.menus.destination(&current.as_tag(), &label).await? else {
            self.send_text(ctx.chat_id, texts::UNKNOWN_COMMAND).await?;
            if *current == ConversationState::MainMenu {
                self.send_main_menu(ctx.chat_id).await?;
            } else {
                let description = self
                    .menus
                    .description_of(&current.as_tag())
                    .await?
                    .unwrap_or_default();
                self.send_menu(ctx.chat_id, &description, current).await?;
            }
            return Ok(StepOutcome::Rejected);
        };

        let target: ConversationState = entry.target.parse()?;
        if target != *current {
            self.set_state(ctx, &target).await?;
        }
        self.enter(ctx, &target, &entry).await?;
        Ok(StepOutcome::Transitioned(target))
    }

    /// Render whatever the user sees on arriving in `target`.
    async fn enter(
        &self,
        ctx: &RequestContext,
        target: &ConversationState,
        entry: &MenuEntry,
    ) -> DomainResult<()> {
        match target {
            ConversationState::MainMenu => {
                if !entry.description.is_empty() {
                    self.send_text(ctx.chat_id, &entry.description).await?;
                }
                self.send_main_menu(ctx.chat_id).await
            }
            ConversationState::Changing(field) => {
                let person_id = ctx.person_id();
                let snapshot = self
                    .roster
                    .field_snapshot(person_id, *field)
                    .await?
                    .ok_or(DomainError::RosterEntryNotFound(person_id))?;
                let name = field.spec().display_name;
                let current = if snapshot.value.is_empty() {
                    texts::EMPTY_VALUE
                } else {
                    snapshot.value.as_str()
                };

                self.send_text(ctx.chat_id, &format!("{name} сейчас:")).await?;
                self.send_with_markup(ctx.chat_id, current, ReplyMarkup::labels([texts::CANCEL]))
                    .await?;
                self.force_reply(
                    ctx.chat_id,
                    name,
                    &format!(
                        "Введите новое значение ({}) или нажмите «{}»:",
                        name.to_lowercase(),
                        texts::CANCEL
                    ),
                )
                .await
            }
            ConversationState::EmergencyConfirm => {
                let markup = ReplyMarkup::labels([texts::EMERGENCY_CONFIRM, texts::EMERGENCY_DENY]);
                self.send_with_markup(ctx.chat_id, texts::EMERGENCY_WARNING, markup)
                    .await
            }
            ConversationState::Chat => {
                self.send_with_markup(ctx.chat_id, texts::CHAT_INTRO, ReplyMarkup::labels([texts::EXIT]))
                    .await
            }
            _ if entry.description == texts::CURRENT_DATA => {
                let person_id = ctx.person_id();
                let summary = self
                    .roster
                    .contact_summary(person_id)
                    .await?
                    .ok_or(DomainError::RosterEntryNotFound(person_id))?;
                self.send_menu(ctx.chat_id, &format_summary(&summary), target)
                    .await
            }
            _ => self.send_menu(ctx.chat_id, &entry.description, target).await,
        }
    }
}

/// The current-data summary shown instead of the table description.
pub fn format_summary(summary: &ContactSummary) -> String {
    format!(
        "{}\nТелефон: {}\nEmail: {}\nРегион: {}\nГород: {}\nРайон: {}\nАдрес: {}",
        texts::CURRENT_DATA,
        summary.phone,
        summary.email,
        summary.region,
        summary.city,
        summary.district,
        summary.address
    )
}
