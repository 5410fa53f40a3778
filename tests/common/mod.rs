//! Common test utilities for integration tests
//!
//! Provides an engine wired to the in-memory adapters, update builders and
//! roster / menu fixtures shared across the integration test files.

#![allow(dead_code)]

use std::sync::atomic::{AtomicI64, Ordering};
use std::sync::Arc;

use serde_json::{json, Value};

use uslugi_bot::adapters::memory::{
    MemoryConversationStore, MemoryMenuTable, MemoryRoster, MemoryTicketTracker,
    RecordingMessenger, RosterRow,
};
use uslugi_bot::domain::models::{
    ConversationRecord, ConversationState, MenuEntry, Update, Verification,
};
use uslugi_bot::services::conversation::texts;
use uslugi_bot::services::{ConversationEngine, EnginePorts, EngineSettings, StepOutcome};

pub const USER: i64 = 42;
pub const STAFF_CHAT: i64 = -1001;
pub const EMERGENCY_CHAT: i64 = -1002;
pub const ROSTER_ROW: u64 = 10;
pub const TICKET: &str = "card-1";

/// Setup test logging
///
/// Initializes tracing subscriber for test output.
pub fn setup_test_logging() {
    use tracing_subscriber::fmt;

    let _ = fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

pub fn settings(max_attempts: u32) -> EngineSettings {
    EngineSettings {
        max_verification_attempts: max_attempts,
        staff_chat_id: STAFF_CHAT,
        emergency_chat_id: EMERGENCY_CHAT,
        audit_tag: "ЛПРУслуги".to_string(),
    }
}

/// The roster entry of Иван Иванов, not yet linked to any sender.
pub fn ivanov() -> RosterRow {
    RosterRow {
        row: ROSTER_ROW,
        ticket_id: TICKET.to_string(),
        family_name: "Иванов".to_string(),
        given_name: "Иван".to_string(),
        birth_date: "1990-01-31".to_string(),
        phone: "+79990001122".to_string(),
        handle: "ivan".to_string(),
        person_id: None,
        email: "ivan@example.org".to_string(),
        region: "Ленинградская область".to_string(),
        city: "Гатчина".to_string(),
        district: "Гатчинский".to_string(),
        address: "ул. Мира, 1".to_string(),
    }
}

/// The same entry, already linked to [`USER`].
pub fn linked_ivanov() -> RosterRow {
    RosterRow {
        person_id: Some(USER),
        ..ivanov()
    }
}

pub const TICKET_DESCRIPTION: &str =
    "ФИО: Иванов Иван\nТелефон: +79990001122\nEmail: ivan@example.org\nГород: Гатчина";

pub fn menu() -> Vec<MenuEntry> {
    vec![
        MenuEntry::new("main_menu", "Мои данные", "menu_data", texts::CURRENT_DATA),
        MenuEntry::new("main_menu", "Изменить данные", "menu_changing", texts::CHANGING_MENU),
        MenuEntry::new("main_menu", "Информация", "menu_info", "Раздел информации"),
        MenuEntry::new("main_menu", "Меня задержали!", "emergency_confirm", ""),
        MenuEntry::new("main_menu", "Написать в РК", "chat", ""),
        MenuEntry::new("menu_data", "Назад", "main_menu", ""),
        MenuEntry::new("menu_info", "Назад", "main_menu", ""),
        MenuEntry::new("menu_changing", "Email", "changing_email", ""),
        MenuEntry::new("menu_changing", "Город", "changing_city", ""),
        MenuEntry::new("menu_changing", "Назад", "main_menu", ""),
    ]
}

/// A conversation record of [`USER`] in `state` with `verification`.
pub fn record(state: ConversationState, verification: Verification) -> ConversationRecord {
    ConversationRecord {
        state,
        verification,
        family_name: "иванов".to_string(),
        given_name: "иван".to_string(),
        phone: "+79990001122".to_string(),
        ..ConversationRecord::new(2, USER, USER)
    }
}

/// Engine over in-memory adapters, with handles on each adapter.
pub struct Harness {
    pub engine: Arc<ConversationEngine>,
    pub store: Arc<MemoryConversationStore>,
    pub roster: Arc<MemoryRoster>,
    pub tickets: Arc<MemoryTicketTracker>,
    pub messenger: RecordingMessenger,
    next_message_id: AtomicI64,
}

impl Harness {
    pub async fn new(rows: Vec<RosterRow>) -> Self {
        Self::with_settings(rows, settings(5)).await
    }

    pub async fn with_settings(rows: Vec<RosterRow>, settings: EngineSettings) -> Self {
        let store = Arc::new(MemoryConversationStore::new());
        let roster = Arc::new(MemoryRoster::new(rows));
        let tickets = Arc::new(MemoryTicketTracker::new());
        tickets.insert(TICKET, TICKET_DESCRIPTION).await;
        let messenger = RecordingMessenger::new();

        let ports = EnginePorts {
            store: store.clone(),
            roster: roster.clone(),
            menus: Arc::new(MemoryMenuTable::new(menu())),
            tickets: tickets.clone(),
            messenger: Arc::new(messenger.clone()),
        };

        Self {
            engine: Arc::new(ConversationEngine::new(ports, settings)),
            store,
            roster,
            tickets,
            messenger,
            next_message_id: AtomicI64::new(100),
        }
    }

    pub async fn seed(&self, record: ConversationRecord) {
        self.store.insert(record).await;
    }

    pub fn message_id(&self) -> i64 {
        self.next_message_id.fetch_add(1, Ordering::SeqCst)
    }

    /// Send a private text message from [`USER`].
    pub async fn text(&self, handle: Option<&str>, text: &str) -> Option<StepOutcome> {
        let update = private_update(self.message_id(), USER, handle, json!({ "text": text }));
        self.engine.handle_update(update).await
    }

    /// Share a contact card from [`USER`].
    pub async fn contact(&self, phone: &str, owner: Option<i64>) -> Option<StepOutcome> {
        let contact = json!({ "phone_number": phone, "first_name": "Иван", "user_id": owner });
        let update = private_update(
            self.message_id(),
            USER,
            None,
            json!({ "contact": contact }),
        );
        self.engine.handle_update(update).await
    }

    pub async fn current(&self) -> ConversationRecord {
        self.store
            .get(USER)
            .await
            .expect("conversation record should exist")
    }

    pub async fn user_texts(&self) -> Vec<String> {
        self.messenger.texts_to(USER).await
    }
}

/// An update carrying a private message; `body` holds text or contact fields.
pub fn private_update(message_id: i64, from: i64, handle: Option<&str>, body: Value) -> Update {
    let mut message = json!({
        "message_id": message_id,
        "date": 1_700_000_000,
        "from": { "id": from, "is_bot": false, "first_name": "Иван" },
        "chat": { "id": from, "type": "private", "first_name": "Иван" },
    });
    if let Some(handle) = handle {
        message["chat"]["username"] = json!(handle);
    }
    merge(&mut message, body);
    serde_json::from_value(json!({ "update_id": message_id, "message": message }))
        .expect("valid update")
}

/// An update carrying a group message, optionally replying to `reply_to`.
pub fn group_update(message_id: i64, chat_id: i64, text: &str, reply_to: Option<&str>) -> Update {
    let mut message = json!({
        "message_id": message_id,
        "date": 1_700_000_000,
        "from": { "id": 7, "is_bot": false, "first_name": "Оператор" },
        "chat": { "id": chat_id, "type": "supergroup", "title": "Штаб" },
        "text": text,
    });
    if let Some(original) = reply_to {
        message["reply_to_message"] = json!({
            "message_id": message_id - 1,
            "date": 1_700_000_000,
            "chat": { "id": chat_id, "type": "supergroup" },
            "text": original,
        });
    }
    serde_json::from_value(json!({ "update_id": message_id, "message": message }))
        .expect("valid update")
}

fn merge(target: &mut Value, extra: Value) {
    if let (Value::Object(target), Value::Object(extra)) = (target, extra) {
        target.extend(extra);
    }
}
