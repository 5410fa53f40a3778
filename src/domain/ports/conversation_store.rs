use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::{ConversationRecord, ConversationState, Verification};

/// Persistence port for conversation records.
///
/// Every setter is an independent single-cell write addressed by the
/// record's row locator; there is no transaction spanning several setters
/// and records are never deleted.
#[async_trait]
pub trait ConversationStore: Send + Sync {
    /// Load the record of a sender.
    async fn find(&self, from_id: i64) -> DomainResult<Option<ConversationRecord>>;

    /// Create the record of a first-time sender in state `start` with zero attempts.
    async fn create(&self, from_id: i64, chat_id: i64) -> DomainResult<ConversationRecord>;

    async fn set_chat_id(&self, row: u64, chat_id: i64) -> DomainResult<()>;

    async fn set_state(&self, row: u64, state: &ConversationState) -> DomainResult<()>;

    async fn set_verification(&self, row: u64, verification: Verification) -> DomainResult<()>;

    /// Store an already normalized family name.
    async fn set_family_name(&self, row: u64, family_name: &str) -> DomainResult<()>;

    /// Store an already normalized given name.
    async fn set_given_name(&self, row: u64, given_name: &str) -> DomainResult<()>;

    /// Store a normalized phone, or the empty string for handle-based lookup.
    async fn set_phone(&self, row: u64, phone: &str) -> DomainResult<()>;
}
