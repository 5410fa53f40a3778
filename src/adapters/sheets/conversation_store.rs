//! Conversation records in the bot state sheet.
//!
//! Columns: `A` row locator (`=ROW()`), `B` sender id, `C` chat id,
//! `D` state, `E` verification, `G` family name, `H` given name, `I` phone.

use async_trait::async_trait;
use serde_json::Value;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{ConversationRecord, ConversationState, Verification};
use crate::domain::ports::ConversationStore;

use super::client::{cell, parse_int, Sheet};

const TABLE: &str = "state";

/// Older rows mark a duplicate sender in the state column.
const DUPLICATE_STATE: &str = "duplicate";

pub struct SheetConversationStore {
    sheet: Sheet,
}

impl SheetConversationStore {
    pub const fn new(sheet: Sheet) -> Self {
        Self { sheet }
    }

    async fn set(&self, column: &str, row: u64, value: Value) -> DomainResult<()> {
        self.sheet.set_cell(column, row, value).await
    }
}

/// Build a record from `select A, B, C, D, E, G, H, I`.
fn parse_record(row: &[String]) -> DomainResult<ConversationRecord> {
    let row_id = parse_int(&cell(row, 0))
        .and_then(|n| u64::try_from(n).ok())
        .ok_or_else(|| DomainError::malformed(TABLE, format!("bad row locator {:?}", cell(row, 0))))?;
    let chat_id = parse_int(&cell(row, 2))
        .ok_or_else(|| DomainError::malformed(TABLE, format!("bad chat id at row {row_id}")))?;

    let (state, verification) = match cell(row, 3).trim() {
        DUPLICATE_STATE => (ConversationState::Start, Verification::Duplicate),
        tag => (tag.parse()?, Verification::parse(&cell(row, 4))?),
    };

    Ok(ConversationRecord {
        row_id,
        person_id: parse_int(&cell(row, 1)),
        chat_id,
        state,
        verification,
        family_name: cell(row, 5),
        given_name: cell(row, 6),
        phone: cell(row, 7),
    })
}

#[async_trait]
impl ConversationStore for SheetConversationStore {
    async fn find(&self, from_id: i64) -> DomainResult<Option<ConversationRecord>> {
        let rows = self
            .sheet
            .query(&format!("select A, B, C, D, E, G, H, I where B = {from_id}"))
            .await?;
        rows.first().map(|row| parse_record(row)).transpose()
    }

    async fn create(&self, from_id: i64, chat_id: i64) -> DomainResult<ConversationRecord> {
        self.sheet
            .append(
                "A:E",
                vec![vec![
                    Value::from("=ROW()"),
                    Value::from(from_id.to_string()),
                    Value::from(chat_id.to_string()),
                    Value::from(ConversationState::Start.as_tag()),
                    Value::from(0),
                ]],
            )
            .await?;
        self.find(from_id)
            .await?
            .ok_or(DomainError::ConversationNotFound(from_id))
    }

    async fn set_chat_id(&self, row: u64, chat_id: i64) -> DomainResult<()> {
        self.set("C", row, Value::from(chat_id)).await
    }

    async fn set_state(&self, row: u64, state: &ConversationState) -> DomainResult<()> {
        self.set("D", row, Value::from(state.as_tag())).await
    }

    async fn set_verification(&self, row: u64, verification: Verification) -> DomainResult<()> {
        self.set("E", row, verification.as_cell()).await
    }

    async fn set_family_name(&self, row: u64, family_name: &str) -> DomainResult<()> {
        self.set("G", row, Value::from(family_name)).await
    }

    async fn set_given_name(&self, row: u64, given_name: &str) -> DomainResult<()> {
        self.set("H", row, Value::from(given_name)).await
    }

    async fn set_phone(&self, row: u64, phone: &str) -> DomainResult<()> {
        self.set("I", row, Value::from(phone)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| (*c).to_string()).collect()
    }

    #[test]
    fn test_parse_fresh_record() {
        let record = parse_record(&row(&["5", "42", "42", "start", "0", "", "", ""])).unwrap();
        assert_eq!(record, ConversationRecord::new(5, 42, 42));
    }

    #[test]
    fn test_parse_verified_record() {
        let record = parse_record(&row(&[
            "7",
            "42",
            "43",
            "changing_email",
            "done",
            "иванов",
            "иван",
            "+79990001122",
        ]))
        .unwrap();
        assert_eq!(record.chat_id, 43);
        assert_eq!(
            record.state,
            ConversationState::Changing(crate::domain::models::RosterField::Email)
        );
        assert_eq!(record.verification, Verification::Done);
        assert_eq!(record.phone, "+79990001122");
    }

    #[test]
    fn test_short_row_fills_blanks() {
        let record = parse_record(&row(&["5", "42", "42", "register_name", "2"])).unwrap();
        assert_eq!(record.verification, Verification::Attempts(2));
        assert!(record.family_name.is_empty());
    }

    #[test]
    fn test_duplicate_in_state_column_latches_verification() {
        let record = parse_record(&row(&["5", "42", "42", "duplicate", "0"])).unwrap();
        assert_eq!(record.verification, Verification::Duplicate);
        assert_eq!(record.state, ConversationState::Start);
    }

    #[test]
    fn test_unknown_state_is_an_error() {
        assert!(matches!(
            parse_record(&row(&["5", "42", "42", "register_city", "0"])),
            Err(DomainError::InvalidState(_))
        ));
    }

    #[test]
    fn test_missing_locator_is_malformed() {
        assert!(matches!(
            parse_record(&row(&["", "42", "42", "start", "0"])),
            Err(DomainError::MalformedRow { .. })
        ));
    }
}
