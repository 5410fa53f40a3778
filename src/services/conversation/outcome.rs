//! Results of one workflow run.

use std::fmt;

use crate::domain::models::ConversationState;

/// What a single inbound message did to its conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StepOutcome {
    /// The conversation moved to (or re-entered) this state.
    Transitioned(ConversationState),
    /// Input was rejected inline; a corrective prompt was sent and nothing advanced.
    Rejected,
    /// Verification completed and the main menu was sent.
    Verified,
    /// The roster lookup failed and consumed an attempt.
    VerificationFailed { attempts: u32 },
    /// No attempts are left; nothing was looked up.
    AttemptsExhausted,
    /// The conversation is latched as a duplicate account.
    Duplicate,
    /// The message was relayed between a private and a staff chat.
    Relayed,
    /// The bot announced the chat id of an unknown group and left it.
    LeftChat(i64),
    /// Nothing to do for this message.
    Ignored,
    /// A step failed in a way that is logged and absorbed rather than propagated.
    Degraded(RecoverableFailure),
}

/// Failures absorbed inside the emergency and relay workflows.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecoverableFailure {
    /// The roster could not be read; nothing was broadcast and the state was kept.
    RosterUnavailable(String),
    /// Part of a relay (header, copy or notice) could not be delivered.
    RelayFailed(String),
}

impl fmt::Display for RecoverableFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RosterUnavailable(reason) => write!(f, "roster unavailable: {reason}"),
            Self::RelayFailed(reason) => write!(f, "relay failed: {reason}"),
        }
    }
}
