//! Identity verification workflow.
//!
//! `start → register_phone → register_familyname → register_name →
//! register_birthdate → main_menu`, looping back to `register_phone` on a
//! failed roster lookup until the attempt budget is spent.

use tracing::{info, warn};

use crate::domain::errors::DomainResult;
use crate::domain::models::text::{normalize_name, normalize_phone, parse_birth_date};
use crate::domain::models::{
    ContactKey, ConversationState, IdentityQuery, KeyboardButton, LinkedEntry, ReplyMarkup,
    RosterField, Verification,
};

use super::context::RequestContext;
use super::field_change::FieldUpdate;
use super::outcome::StepOutcome;
use super::{texts, ConversationEngine};

impl ConversationEngine {
    pub(super) async fn verify(
        &self,
        ctx: &RequestContext,
        attempts: u32,
    ) -> DomainResult<StepOutcome> {
        match &ctx.record.state {
            ConversationState::Start => {
                self.set_state(ctx, &ConversationState::RegisterPhone).await?;
                self.send_text(ctx.chat_id, texts::WELCOME).await?;
                self.send_registration_choice(ctx.chat_id).await?;
                Ok(StepOutcome::Transitioned(ConversationState::RegisterPhone))
            }
            ConversationState::RegisterPhone => self.register_phone(ctx).await,
            ConversationState::RegisterFamilyName => {
                let family_name = normalize_name(ctx.raw_text());
                if family_name.trim().is_empty() {
                    self.force_reply(ctx.chat_id, texts::FAMILY_NAME_PLACEHOLDER, texts::EMPTY_ANSWER)
                        .await?;
                    return Ok(StepOutcome::Rejected);
                }
                self.set_state(ctx, &ConversationState::RegisterName).await?;
                self.store.set_family_name(ctx.row(), &family_name).await?;
                self.force_reply(ctx.chat_id, texts::GIVEN_NAME_PLACEHOLDER, texts::ASK_GIVEN_NAME)
                    .await?;
                Ok(StepOutcome::Transitioned(ConversationState::RegisterName))
            }
            ConversationState::RegisterName => {
                let given_name = normalize_name(ctx.raw_text());
                if given_name.trim().is_empty() {
                    self.force_reply(ctx.chat_id, texts::GIVEN_NAME_PLACEHOLDER, texts::EMPTY_ANSWER)
                        .await?;
                    return Ok(StepOutcome::Rejected);
                }
                self.set_state(ctx, &ConversationState::RegisterBirthDate).await?;
                self.store.set_given_name(ctx.row(), &given_name).await?;
                self.force_reply(ctx.chat_id, texts::BIRTH_DATE_PLACEHOLDER, texts::ASK_BIRTH_DATE)
                    .await?;
                Ok(StepOutcome::Transitioned(ConversationState::RegisterBirthDate))
            }
            ConversationState::RegisterBirthDate => self.match_identity(ctx, attempts).await,
            state => {
                warn!(from_id = ctx.from_id, row = ctx.row(), %state, "menu state for unverified sender");
                self.set_state(ctx, &ConversationState::RegisterPhone).await?;
                self.send_text(ctx.chat_id, texts::UNKNOWN_COMMAND).await?;
                self.send_registration_choice(ctx.chat_id).await?;
                Ok(StepOutcome::Transitioned(ConversationState::RegisterPhone))
            }
        }
    }

    async fn send_registration_choice(&self, chat_id: i64) -> DomainResult<()> {
        let markup = ReplyMarkup::keyboard(vec![
            KeyboardButton::new(texts::BY_HANDLE),
            KeyboardButton::request_contact(texts::BY_PHONE),
        ]);
        self.send_with_markup(chat_id, texts::CHOOSE_REGISTRATION, markup)
            .await
    }

    async fn register_phone(&self, ctx: &RequestContext) -> DomainResult<StepOutcome> {
        if let Some(contact) = &ctx.contact {
            if contact.user_id != Some(ctx.from_id) {
                self.send_text(ctx.chat_id, texts::PHONE_UNREADABLE).await?;
                self.send_registration_choice(ctx.chat_id).await?;
                return Ok(StepOutcome::Rejected);
            }
            let phone = normalize_phone(&contact.phone_number);
            if phone.is_empty() {
                self.send_text(ctx.chat_id, texts::PHONE_UNREADABLE).await?;
                self.send_registration_choice(ctx.chat_id).await?;
                return Ok(StepOutcome::Rejected);
            }
            self.store.set_phone(ctx.row(), &phone).await?;
        } else if ctx.text.as_deref() == Some(texts::BY_HANDLE) {
            if ctx.handle.is_none() {
                self.send_text(ctx.chat_id, texts::HANDLE_UNREADABLE).await?;
                self.send_registration_choice(ctx.chat_id).await?;
                return Ok(StepOutcome::Rejected);
            }
            self.store.set_phone(ctx.row(), "").await?;
        } else {
            self.send_text(ctx.chat_id, texts::UNRECOGNIZED).await?;
            self.send_registration_choice(ctx.chat_id).await?;
            return Ok(StepOutcome::Rejected);
        }

        self.set_state(ctx, &ConversationState::RegisterFamilyName).await?;
        self.force_reply(ctx.chat_id, texts::FAMILY_NAME_PLACEHOLDER, texts::ASK_FAMILY_NAME)
            .await?;
        Ok(StepOutcome::Transitioned(ConversationState::RegisterFamilyName))
    }

    async fn match_identity(
        &self,
        ctx: &RequestContext,
        attempts: u32,
    ) -> DomainResult<StepOutcome> {
        let Some(birth_date) = parse_birth_date(ctx.raw_text()) else {
            self.force_reply(ctx.chat_id, texts::BIRTH_DATE_PLACEHOLDER, texts::BAD_BIRTH_DATE)
                .await?;
            return Ok(StepOutcome::Rejected);
        };

        let query = IdentityQuery {
            given_name: ctx.record.given_name.clone(),
            family_name: ctx.record.family_name.clone(),
            birth_date,
        };
        let person_id = ctx.person_id();

        if let Some(linked) = self.roster.find_linked(&query, person_id).await? {
            info!(from_id = ctx.from_id, row = linked.row, "matched roster entry by person id");
            self.reconcile(ctx, &linked).await?;
            return self.complete_verification(ctx).await;
        }

        let key = if ctx.record.phone.is_empty() {
            let Some(handle) = ctx.handle.clone() else {
                self.send_text(ctx.chat_id, texts::HANDLE_UNREADABLE).await?;
                self.send_text(ctx.chat_id, texts::WELCOME_AGAIN).await?;
                self.set_state(ctx, &ConversationState::RegisterPhone).await?;
                self.send_registration_choice(ctx.chat_id).await?;
                return Ok(StepOutcome::Transitioned(ConversationState::RegisterPhone));
            };
            ContactKey::Handle(handle)
        } else {
            ContactKey::Phone(ctx.record.phone.clone())
        };

        if let Some(candidate) = self.roster.find_candidate(&query, &key).await? {
            if let Some(existing) = candidate.person_id.filter(|id| *id != person_id) {
                warn!(
                    from_id = ctx.from_id,
                    row = candidate.row,
                    linked_to = existing,
                    "roster entry already linked to another person"
                );
                self.store
                    .set_verification(ctx.row(), Verification::Duplicate)
                    .await?;
                self.send_text(ctx.chat_id, texts::DUPLICATE).await?;
                return Ok(StepOutcome::Duplicate);
            }

            info!(from_id = ctx.from_id, row = candidate.row, "linking roster entry");
            self.apply_field_update(FieldUpdate {
                row: candidate.row,
                ticket_id: candidate.ticket_id,
                field: RosterField::PersonId,
                old: candidate.person_id.map(|id| id.to_string()).unwrap_or_default(),
                new: person_id.to_string(),
            })
            .await?;
            return self.complete_verification(ctx).await;
        }

        let attempts = attempts + 1;
        info!(from_id = ctx.from_id, attempts, "no roster match");
        self.store
            .set_verification(ctx.row(), Verification::Attempts(attempts))
            .await?;

        if attempts >= self.settings.max_verification_attempts {
            let notice = if ctx.record.phone.is_empty() {
                texts::NOT_FOUND_FINAL_HANDLE
            } else {
                texts::NOT_FOUND_FINAL_PHONE
            };
            self.send_text(ctx.chat_id, notice).await?;
            self.set_state(ctx, &ConversationState::Start).await?;
            return Ok(StepOutcome::AttemptsExhausted);
        }

        self.send_text(ctx.chat_id, texts::NOT_FOUND_RETRY).await?;
        self.set_state(ctx, &ConversationState::RegisterPhone).await?;
        self.send_registration_choice(ctx.chat_id).await?;
        Ok(StepOutcome::VerificationFailed { attempts })
    }

    /// Bring handle and phone of an already linked roster row up to date.
    async fn reconcile(&self, ctx: &RequestContext, linked: &LinkedEntry) -> DomainResult<()> {
        if let Some(handle) = &ctx.handle {
            if *handle != linked.handle {
                self.apply_field_update(FieldUpdate {
                    row: linked.row,
                    ticket_id: linked.ticket_id.clone(),
                    field: RosterField::Handle,
                    old: linked.handle.clone(),
                    new: handle.clone(),
                })
                .await?;
            }
        }
        if !ctx.record.phone.is_empty() && ctx.record.phone != linked.phone {
            self.apply_field_update(FieldUpdate {
                row: linked.row,
                ticket_id: linked.ticket_id.clone(),
                field: RosterField::Phone,
                old: linked.phone.clone(),
                new: ctx.record.phone.clone(),
            })
            .await?;
        }
        Ok(())
    }

    async fn complete_verification(&self, ctx: &RequestContext) -> DomainResult<StepOutcome> {
        self.set_state(ctx, &ConversationState::MainMenu).await?;
        self.store
            .set_verification(ctx.row(), Verification::Done)
            .await?;
        self.send_text(ctx.chat_id, texts::VERIFIED).await?;
        self.send_main_menu(ctx.chat_id).await?;
        Ok(StepOutcome::Verified)
    }
}
