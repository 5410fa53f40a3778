use async_trait::async_trait;

use crate::domain::errors::DomainResult;

/// Port over the ticket tracker holding one card per roster entry.
#[async_trait]
pub trait TicketTracker: Send + Sync {
    /// Free-text description of a ticket.
    async fn description(&self, ticket_id: &str) -> DomainResult<String>;

    async fn set_description(&self, ticket_id: &str, description: &str) -> DomainResult<()>;

    /// Append a comment to the ticket's activity log.
    async fn add_comment(&self, ticket_id: &str, text: &str) -> DomainResult<()>;
}
