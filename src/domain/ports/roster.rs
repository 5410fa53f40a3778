use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::{
    CandidateEntry, ContactKey, ContactSummary, DetentionProfile, FieldSnapshot, IdentityQuery,
    LinkedEntry, RosterField,
};

/// Port over the external roster of enrolled persons.
///
/// The engine never creates or deletes roster rows; it only reads them and
/// overwrites single cells once a row has been matched.
#[async_trait]
pub trait Roster: Send + Sync {
    /// Row matching name, birth date and the person id it is already linked to.
    async fn find_linked(
        &self,
        query: &IdentityQuery,
        person_id: i64,
    ) -> DomainResult<Option<LinkedEntry>>;

    /// Row matching name, birth date and phone or handle, whatever person id it holds.
    async fn find_candidate(
        &self,
        query: &IdentityQuery,
        key: &ContactKey,
    ) -> DomainResult<Option<CandidateEntry>>;

    /// Row locator, current value and linked ticket for one field of a person's row.
    async fn field_snapshot(
        &self,
        person_id: i64,
        field: RosterField,
    ) -> DomainResult<Option<FieldSnapshot>>;

    /// All editable contact fields of a person's row in one query.
    async fn contact_summary(&self, person_id: i64) -> DomainResult<Option<ContactSummary>>;

    /// The fields included in a detention notice.
    async fn detention_profile(&self, person_id: i64) -> DomainResult<Option<DetentionProfile>>;

    /// Overwrite one cell of a roster row.
    async fn overwrite(&self, row: u64, field: RosterField, value: &str) -> DomainResult<()>;
}
