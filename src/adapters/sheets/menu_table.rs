//! The menu transition table sheet.
//!
//! Columns: `A` source state, `B` button label, `C` target state,
//! `D` description sent on entering the target.

use async_trait::async_trait;

use crate::domain::errors::DomainResult;
use crate::domain::models::MenuEntry;
use crate::domain::ports::MenuTable;

use super::client::{cell, quote, Sheet};

pub struct SheetMenuTable {
    sheet: Sheet,
}

impl SheetMenuTable {
    pub const fn new(sheet: Sheet) -> Self {
        Self { sheet }
    }

    async fn select(&self, condition: &str) -> DomainResult<Vec<MenuEntry>> {
        let rows = self
            .sheet
            .query(&format!("select A, B, C, D where {condition}"))
            .await?;
        Ok(rows
            .iter()
            .map(|row| MenuEntry::new(cell(row, 0), cell(row, 1), cell(row, 2), cell(row, 3)))
            .collect())
    }
}

#[async_trait]
impl MenuTable for SheetMenuTable {
    async fn entries_from(&self, source: &str) -> DomainResult<Vec<MenuEntry>> {
        self.select(&format!("A = {}", quote(source))).await
    }

    async fn destination(&self, source: &str, label: &str) -> DomainResult<Option<MenuEntry>> {
        let entries = self
            .select(&format!("A = {} and B = {}", quote(source), quote(label)))
            .await?;
        Ok(entries.into_iter().next())
    }

    async fn description_of(&self, target: &str) -> DomainResult<Option<String>> {
        let rows = self
            .sheet
            .query(&format!("select D where C = {}", quote(target)))
            .await?;
        Ok(rows.first().map(|row| cell(row, 0)))
    }
}
