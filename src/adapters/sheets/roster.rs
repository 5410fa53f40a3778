//! The roster sheet.
//!
//! Columns read here: `A` row locator, `E` given name, `F` family name,
//! `O` birth date, `J` ticket id, `T` person id, plus the contact columns
//! listed on [`RosterField`].

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{
    CandidateEntry, ContactKey, ContactSummary, DetentionProfile, FieldSnapshot, IdentityQuery,
    LinkedEntry, RosterField,
};
use crate::domain::ports::Roster;

use super::client::{cell, parse_int, quote, Sheet};

const TABLE: &str = "roster";

pub struct SheetRoster {
    sheet: Sheet,
}

impl SheetRoster {
    pub const fn new(sheet: Sheet) -> Self {
        Self { sheet }
    }

    async fn first(&self, statement: &str) -> DomainResult<Option<Vec<String>>> {
        Ok(self.sheet.query(statement).await?.into_iter().next())
    }
}

/// Name and birth date condition shared by both identity lookups.
fn identity_condition(query: &IdentityQuery) -> String {
    format!(
        "lower(E) = {} and lower(F) = {} and O = date {}",
        quote(&query.given_name),
        quote(&query.family_name),
        quote(&query.birth_date)
    )
}

fn row_locator(row: &[String]) -> DomainResult<u64> {
    parse_int(&cell(row, 0))
        .and_then(|n| u64::try_from(n).ok())
        .ok_or_else(|| DomainError::malformed(TABLE, format!("bad row locator {:?}", cell(row, 0))))
}

/// Cell value written for `field`: person ids stay numeric so later
/// `T = <id>` comparisons match.
fn cell_value(field: RosterField, value: &str) -> Value {
    match field {
        RosterField::PersonId => parse_int(value).map_or_else(|| Value::from(value), Value::from),
        _ => Value::from(value),
    }
}

#[async_trait]
impl Roster for SheetRoster {
    async fn find_linked(
        &self,
        query: &IdentityQuery,
        person_id: i64,
    ) -> DomainResult<Option<LinkedEntry>> {
        let statement = format!(
            "select A, J, I, H where {} and T = {person_id}",
            identity_condition(query)
        );
        let Some(row) = self.first(&statement).await? else {
            return Ok(None);
        };
        Ok(Some(LinkedEntry {
            row: row_locator(&row)?,
            ticket_id: cell(&row, 1),
            handle: cell(&row, 2),
            phone: cell(&row, 3),
        }))
    }

    async fn find_candidate(
        &self,
        query: &IdentityQuery,
        key: &ContactKey,
    ) -> DomainResult<Option<CandidateEntry>> {
        let key_condition = match key {
            ContactKey::Phone(phone) => format!("H = {}", quote(phone)),
            ContactKey::Handle(handle) => format!("I = {}", quote(handle)),
        };
        let statement = format!(
            "select A, J, T where {} and {key_condition}",
            identity_condition(query)
        );
        let Some(row) = self.first(&statement).await? else {
            return Ok(None);
        };
        Ok(Some(CandidateEntry {
            row: row_locator(&row)?,
            ticket_id: cell(&row, 1),
            person_id: parse_int(&cell(&row, 2)),
        }))
    }

    async fn field_snapshot(
        &self,
        person_id: i64,
        field: RosterField,
    ) -> DomainResult<Option<FieldSnapshot>> {
        let statement = format!("select A, {}, J where T = {person_id}", field.column());
        let Some(row) = self.first(&statement).await? else {
            return Ok(None);
        };
        Ok(Some(FieldSnapshot {
            row: row_locator(&row)?,
            value: cell(&row, 1),
            ticket_id: cell(&row, 2),
        }))
    }

    async fn contact_summary(&self, person_id: i64) -> DomainResult<Option<ContactSummary>> {
        let statement = format!("select H, K, L, M, N, V where T = {person_id}");
        Ok(self.first(&statement).await?.map(|row| ContactSummary {
            phone: cell(&row, 0),
            email: cell(&row, 1),
            region: cell(&row, 2),
            district: cell(&row, 3),
            city: cell(&row, 4),
            address: cell(&row, 5),
        }))
    }

    async fn detention_profile(&self, person_id: i64) -> DomainResult<Option<DetentionProfile>> {
        let statement = format!("select F, E, O, H, I, L, N, M, V, J where T = {person_id}");
        Ok(self.first(&statement).await?.map(|row| DetentionProfile {
            family_name: cell(&row, 0),
            given_name: cell(&row, 1),
            birth_date: cell(&row, 2),
            phone: cell(&row, 3),
            handle: cell(&row, 4),
            region: cell(&row, 5),
            city: cell(&row, 6),
            district: cell(&row, 7),
            address: cell(&row, 8),
            ticket_id: cell(&row, 9),
        }))
    }

    async fn overwrite(&self, row: u64, field: RosterField, value: &str) -> DomainResult<()> {
        tracing::debug!(row, field = field.tag(), "overwriting roster cell");
        self.sheet
            .set_cell(field.column(), row, cell_value(field, value))
            .await
    }
}
