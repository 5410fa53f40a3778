//! Emergency escalation: detention confirmation and broadcast.

use tracing::{info, warn};

use crate::domain::errors::DomainResult;
use crate::domain::models::{ConversationState, DetentionProfile, ReplyMarkup};

use super::context::RequestContext;
use super::outcome::{RecoverableFailure, StepOutcome};
use super::{texts, ConversationEngine};

impl ConversationEngine {
    /// Handle the answer to the detention confirmation prompt.
    pub(super) async fn confirm_emergency(
        &self,
        ctx: &RequestContext,
    ) -> DomainResult<StepOutcome> {
        if ctx.raw_text().trim() != texts::EMERGENCY_CONFIRM {
            self.set_state(ctx, &ConversationState::MainMenu).await?;
            self.send_text(ctx.chat_id, texts::EMERGENCY_NOT_CONFIRMED).await?;
            self.send_main_menu(ctx.chat_id).await?;
            return Ok(StepOutcome::Transitioned(ConversationState::MainMenu));
        }

        let person_id = ctx.person_id();
        let profile = match self.roster.detention_profile(person_id).await {
            Ok(Some(profile)) => profile,
            Ok(None) => {
                warn!(person_id, "no roster entry for detention notice, sending partial notice");
                DetentionProfile {
                    family_name: ctx.record.family_name.clone(),
                    given_name: ctx.record.given_name.clone(),
                    phone: ctx.record.phone.clone(),
                    handle: ctx.handle.clone().unwrap_or_default(),
                    ..DetentionProfile::default()
                }
            }
            Err(err) => {
                warn!(person_id, error = %err, "roster unavailable, detention notice not sent");
                return Ok(StepOutcome::Degraded(RecoverableFailure::RosterUnavailable(
                    err.to_string(),
                )));
            }
        };

        info!(person_id, "broadcasting detention notice");
        self.send_text(
            self.settings.emergency_chat_id,
            &detention_notice(person_id, &profile),
        )
        .await?;
        self.set_state(ctx, &ConversationState::EmergencyChat).await?;
        self.send_with_markup(
            ctx.chat_id,
            texts::EMERGENCY_SENT,
            ReplyMarkup::remove(),
        )
        .await?;
        Ok(StepOutcome::Transitioned(ConversationState::EmergencyChat))
    }
}

/// Text broadcast to the emergency staff chat.
pub fn detention_notice(person_id: i64, profile: &DetentionProfile) -> String {
    let handle = if profile.handle.is_empty() {
        String::new()
    } else {
        format!("@{}", profile.handle)
    };
    format!(
        "ЗАДЕРЖАНИЕ\nTUID: {person_id}\nФИО: {} {}\nДата рождения: {}\nТелефон: {}\nTelegram: {handle}\n\
         Регион: {}\nГород: {}\nРайон: {}\nАдрес: {}\nКарточка: {}",
        profile.family_name,
        profile.given_name,
        profile.birth_date,
        profile.phone,
        profile.region,
        profile.city,
        profile.district,
        profile.address,
        profile.ticket_id
    )
}
