use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::MenuEntry;

/// Read-only port over the menu transition table.
#[async_trait]
pub trait MenuTable: Send + Sync {
    /// All rows shown as buttons in `source`, in table order.
    async fn entries_from(&self, source: &str) -> DomainResult<Vec<MenuEntry>>;

    /// The row whose source and label match exactly.
    async fn destination(&self, source: &str, label: &str) -> DomainResult<Option<MenuEntry>>;

    /// Description of the first row leading into `target`.
    async fn description_of(&self, target: &str) -> DomainResult<Option<String>>;
}
