//! Domain errors for the conversation engine.

use thiserror::Error;

/// Domain-level errors that can occur while handling an inbound message.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Conversation record for {0} could not be loaded or created")]
    ConversationNotFound(i64),

    #[error("Roster entry not found for person {0}")]
    RosterEntryNotFound(i64),

    #[error("Invalid conversation state: {0}")]
    InvalidState(String),

    #[error("Malformed {table} row: {reason}")]
    MalformedRow { table: String, reason: String },

    #[error("Upstream {service} call failed: {message}")]
    Upstream { service: String, message: String },

    #[error("Authentication failed: {0}")]
    Authentication(String),

    #[error("Validation failed: {0}")]
    ValidationFailed(String),

    #[error("Serialization error: {0}")]
    SerializationError(String),
}

pub type DomainResult<T> = Result<T, DomainError>;

impl DomainError {
    /// Build an [`DomainError::Upstream`] for the named external service.
    pub fn upstream(service: &str, message: impl Into<String>) -> Self {
        Self::Upstream {
            service: service.to_string(),
            message: message.into(),
        }
    }

    /// Build a [`DomainError::MalformedRow`] for the named table.
    pub fn malformed(table: &str, reason: impl Into<String>) -> Self {
        Self::MalformedRow {
            table: table.to_string(),
            reason: reason.into(),
        }
    }
}

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        DomainError::SerializationError(err.to_string())
    }
}
