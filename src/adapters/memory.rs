//! In-memory port implementations.
//!
//! Used by unit and integration tests to drive the conversation engine
//! without any external service. Each double records what was written to
//! it so tests can assert on side effects.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{
    CandidateEntry, ContactKey, ContactSummary, ConversationRecord, ConversationState,
    DetentionProfile, FieldSnapshot, IdentityQuery, LinkedEntry, MenuEntry, OutgoingMessage,
    RosterField, Verification,
};
use crate::domain::ports::{ConversationStore, MenuTable, Messenger, Roster, TicketTracker};

/// Conversation records keyed by row.
#[derive(Debug, Default)]
pub struct MemoryConversationStore {
    records: RwLock<HashMap<u64, ConversationRecord>>,
    next_row: AtomicU64,
}

impl MemoryConversationStore {
    pub fn new() -> Self {
        Self {
            records: RwLock::new(HashMap::new()),
            // Row 1 is the sheet header.
            next_row: AtomicU64::new(2),
        }
    }

    /// Seed an existing record.
    pub async fn insert(&self, record: ConversationRecord) {
        self.next_row.fetch_max(record.row_id + 1, Ordering::SeqCst);
        self.records.write().await.insert(record.row_id, record);
    }

    /// Current record of a sender.
    pub async fn get(&self, from_id: i64) -> Option<ConversationRecord> {
        self.records
            .read()
            .await
            .values()
            .find(|r| r.person_id == Some(from_id))
            .cloned()
    }

    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    async fn update(
        &self,
        row: u64,
        apply: impl FnOnce(&mut ConversationRecord) + Send,
    ) -> DomainResult<()> {
        let mut records = self.records.write().await;
        let record = records.get_mut(&row).ok_or_else(|| {
            DomainError::malformed("conversation", format!("no record at row {row}"))
        })?;
        apply(record);
        Ok(())
    }
}

#[async_trait]
impl ConversationStore for MemoryConversationStore {
    async fn find(&self, from_id: i64) -> DomainResult<Option<ConversationRecord>> {
        Ok(self.get(from_id).await)
    }

    async fn create(&self, from_id: i64, chat_id: i64) -> DomainResult<ConversationRecord> {
        let row = self.next_row.fetch_add(1, Ordering::SeqCst);
        let record = ConversationRecord::new(row, from_id, chat_id);
        self.records.write().await.insert(row, record.clone());
        Ok(record)
    }

    async fn set_chat_id(&self, row: u64, chat_id: i64) -> DomainResult<()> {
        self.update(row, |r| r.chat_id = chat_id).await
    }

    async fn set_state(&self, row: u64, state: &ConversationState) -> DomainResult<()> {
        let state = state.clone();
        self.update(row, |r| r.state = state).await
    }

    async fn set_verification(&self, row: u64, verification: Verification) -> DomainResult<()> {
        self.update(row, |r| r.verification = verification).await
    }

    async fn set_family_name(&self, row: u64, family_name: &str) -> DomainResult<()> {
        let family_name = family_name.to_string();
        self.update(row, |r| r.family_name = family_name).await
    }

    async fn set_given_name(&self, row: u64, given_name: &str) -> DomainResult<()> {
        let given_name = given_name.to_string();
        self.update(row, |r| r.given_name = given_name).await
    }

    async fn set_phone(&self, row: u64, phone: &str) -> DomainResult<()> {
        let phone = phone.to_string();
        self.update(row, |r| r.phone = phone).await
    }
}

/// One roster row with the columns the engine uses.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RosterRow {
    pub row: u64,
    pub ticket_id: String,
    pub family_name: String,
    pub given_name: String,
    /// `YYYY-MM-DD`.
    pub birth_date: String,
    pub phone: String,
    pub handle: String,
    pub person_id: Option<i64>,
    pub email: String,
    pub region: String,
    pub city: String,
    pub district: String,
    pub address: String,
}

impl RosterRow {
    pub fn get(&self, field: RosterField) -> String {
        match field {
            RosterField::Phone => self.phone.clone(),
            RosterField::Email => self.email.clone(),
            RosterField::Region => self.region.clone(),
            RosterField::City => self.city.clone(),
            RosterField::District => self.district.clone(),
            RosterField::Address => self.address.clone(),
            RosterField::Handle => self.handle.clone(),
            RosterField::PersonId => self.person_id.map(|id| id.to_string()).unwrap_or_default(),
        }
    }

    pub fn set(&mut self, field: RosterField, value: &str) {
        let value = value.to_string();
        match field {
            RosterField::Phone => self.phone = value,
            RosterField::Email => self.email = value,
            RosterField::Region => self.region = value,
            RosterField::City => self.city = value,
            RosterField::District => self.district = value,
            RosterField::Address => self.address = value,
            RosterField::Handle => self.handle = value,
            RosterField::PersonId => self.person_id = value.parse().ok(),
        }
    }

    fn matches_identity(&self, query: &IdentityQuery) -> bool {
        self.family_name.to_lowercase() == query.family_name
            && self.given_name.to_lowercase() == query.given_name
            && self.birth_date == query.birth_date
    }
}

/// Roster rows with query accounting and an outage switch.
#[derive(Debug, Default)]
pub struct MemoryRoster {
    rows: RwLock<Vec<RosterRow>>,
    queries: AtomicUsize,
    unavailable: AtomicBool,
}

impl MemoryRoster {
    pub fn new(rows: Vec<RosterRow>) -> Self {
        Self {
            rows: RwLock::new(rows),
            queries: AtomicUsize::new(0),
            unavailable: AtomicBool::new(false),
        }
    }

    /// Make every read fail as if the roster could not be reached.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Number of read queries served so far.
    pub fn queries(&self) -> usize {
        self.queries.load(Ordering::SeqCst)
    }

    pub async fn row(&self, row: u64) -> Option<RosterRow> {
        self.rows.read().await.iter().find(|r| r.row == row).cloned()
    }

    async fn read<T>(&self, pick: impl FnOnce(&[RosterRow]) -> T + Send) -> DomainResult<T> {
        self.queries.fetch_add(1, Ordering::SeqCst);
        if self.unavailable.load(Ordering::SeqCst) {
            return Err(DomainError::upstream("roster", "unavailable"));
        }
        Ok(pick(&self.rows.read().await))
    }
}

#[async_trait]
impl Roster for MemoryRoster {
    async fn find_linked(
        &self,
        query: &IdentityQuery,
        person_id: i64,
    ) -> DomainResult<Option<LinkedEntry>> {
        self.read(|rows| {
            rows.iter()
                .find(|r| r.matches_identity(query) && r.person_id == Some(person_id))
                .map(|r| LinkedEntry {
                    row: r.row,
                    ticket_id: r.ticket_id.clone(),
                    handle: r.handle.clone(),
                    phone: r.phone.clone(),
                })
        })
        .await
    }

    async fn find_candidate(
        &self,
        query: &IdentityQuery,
        key: &ContactKey,
    ) -> DomainResult<Option<CandidateEntry>> {
        self.read(|rows| {
            rows.iter()
                .find(|r| {
                    r.matches_identity(query)
                        && match key {
                            ContactKey::Phone(phone) => r.phone == *phone,
                            ContactKey::Handle(handle) => {
                                r.handle.to_lowercase() == handle.to_lowercase()
                            }
                        }
                })
                .map(|r| CandidateEntry {
                    row: r.row,
                    ticket_id: r.ticket_id.clone(),
                    person_id: r.person_id,
                })
        })
        .await
    }

    async fn field_snapshot(
        &self,
        person_id: i64,
        field: RosterField,
    ) -> DomainResult<Option<FieldSnapshot>> {
        self.read(|rows| {
            rows.iter()
                .find(|r| r.person_id == Some(person_id))
                .map(|r| FieldSnapshot {
                    row: r.row,
                    value: r.get(field),
                    ticket_id: r.ticket_id.clone(),
                })
        })
        .await
    }

    async fn contact_summary(&self, person_id: i64) -> DomainResult<Option<ContactSummary>> {
        self.read(|rows| {
            rows.iter()
                .find(|r| r.person_id == Some(person_id))
                .map(|r| ContactSummary {
                    phone: r.phone.clone(),
                    email: r.email.clone(),
                    region: r.region.clone(),
                    city: r.city.clone(),
                    district: r.district.clone(),
                    address: r.address.clone(),
                })
        })
        .await
    }

    async fn detention_profile(&self, person_id: i64) -> DomainResult<Option<DetentionProfile>> {
        self.read(|rows| {
            rows.iter()
                .find(|r| r.person_id == Some(person_id))
                .map(|r| DetentionProfile {
                    family_name: r.family_name.clone(),
                    given_name: r.given_name.clone(),
                    birth_date: r.birth_date.clone(),
                    phone: r.phone.clone(),
                    handle: r.handle.clone(),
                    region: r.region.clone(),
                    city: r.city.clone(),
                    district: r.district.clone(),
                    address: r.address.clone(),
                    ticket_id: r.ticket_id.clone(),
                })
        })
        .await
    }

    async fn overwrite(&self, row: u64, field: RosterField, value: &str) -> DomainResult<()> {
        let mut rows = self.rows.write().await;
        let entry = rows
            .iter_mut()
            .find(|r| r.row == row)
            .ok_or_else(|| DomainError::malformed("roster", format!("no row {row}")))?;
        entry.set(field, value);
        Ok(())
    }
}

/// A fixed menu table.
#[derive(Debug, Default)]
pub struct MemoryMenuTable {
    entries: Vec<MenuEntry>,
}

impl MemoryMenuTable {
    pub const fn new(entries: Vec<MenuEntry>) -> Self {
        Self { entries }
    }
}

#[async_trait]
impl MenuTable for MemoryMenuTable {
    async fn entries_from(&self, source: &str) -> DomainResult<Vec<MenuEntry>> {
        Ok(self
            .entries
            .iter()
            .filter(|e| e.source == source)
            .cloned()
            .collect())
    }

    async fn destination(&self, source: &str, label: &str) -> DomainResult<Option<MenuEntry>> {
        Ok(self
            .entries
            .iter()
            .find(|e| e.source == source && e.label == label)
            .cloned())
    }

    async fn description_of(&self, target: &str) -> DomainResult<Option<String>> {
        Ok(self
            .entries
            .iter()
            .find(|e| e.target == target)
            .map(|e| e.description.clone()))
    }
}

/// Ticket descriptions plus the comments added to each ticket.
#[derive(Debug, Default)]
pub struct MemoryTicketTracker {
    descriptions: RwLock<HashMap<String, String>>,
    comments: RwLock<Vec<(String, String)>>,
}

impl MemoryTicketTracker {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, ticket_id: &str, description: &str) {
        self.descriptions
            .write()
            .await
            .insert(ticket_id.to_string(), description.to_string());
    }

    pub async fn description_of(&self, ticket_id: &str) -> Option<String> {
        self.descriptions.read().await.get(ticket_id).cloned()
    }

    /// `(ticket_id, text)` pairs in the order they were added.
    pub async fn comments(&self) -> Vec<(String, String)> {
        self.comments.read().await.clone()
    }
}

#[async_trait]
impl TicketTracker for MemoryTicketTracker {
    async fn description(&self, ticket_id: &str) -> DomainResult<String> {
        Ok(self.description_of(ticket_id).await.unwrap_or_default())
    }

    async fn set_description(&self, ticket_id: &str, description: &str) -> DomainResult<()> {
        self.insert(ticket_id, description).await;
        Ok(())
    }

    async fn add_comment(&self, ticket_id: &str, text: &str) -> DomainResult<()> {
        self.comments
            .write()
            .await
            .push((ticket_id.to_string(), text.to_string()));
        Ok(())
    }
}

/// One call made through [`RecordingMessenger`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Delivery {
    Message(OutgoingMessage),
    Copy {
        to_chat: i64,
        from_chat: i64,
        message_id: i64,
    },
    Leave(i64),
}

/// Messenger that records every delivery and can be told to fail.
#[derive(Debug, Default, Clone)]
pub struct RecordingMessenger {
    deliveries: Arc<RwLock<Vec<Delivery>>>,
    failing: Arc<AtomicBool>,
}

impl RecordingMessenger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make every later call fail.
    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub async fn deliveries(&self) -> Vec<Delivery> {
        self.deliveries.read().await.clone()
    }

    /// Messages sent to one chat, in order.
    pub async fn messages_to(&self, chat_id: i64) -> Vec<OutgoingMessage> {
        self.deliveries
            .read()
            .await
            .iter()
            .filter_map(|d| match d {
                Delivery::Message(m) if m.chat_id == chat_id => Some(m.clone()),
                _ => None,
            })
            .collect()
    }

    /// Texts sent to one chat, in order.
    pub async fn texts_to(&self, chat_id: i64) -> Vec<String> {
        self.messages_to(chat_id)
            .await
            .into_iter()
            .map(|m| m.text)
            .collect()
    }

    pub async fn clear(&self) {
        self.deliveries.write().await.clear();
    }

    async fn record(&self, delivery: Delivery) -> DomainResult<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(DomainError::upstream("telegram", "delivery failed"));
        }
        self.deliveries.write().await.push(delivery);
        Ok(())
    }
}

#[async_trait]
impl Messenger for RecordingMessenger {
    async fn send_message(&self, message: &OutgoingMessage) -> DomainResult<()> {
        self.record(Delivery::Message(message.clone())).await
    }

    async fn copy_message(
        &self,
        to_chat: i64,
        from_chat: i64,
        message_id: i64,
    ) -> DomainResult<()> {
        self.record(Delivery::Copy {
            to_chat,
            from_chat,
            message_id,
        })
        .await
    }

    async fn leave_chat(&self, chat_id: i64) -> DomainResult<()> {
        self.record(Delivery::Leave(chat_id)).await
    }
}
