//! Per-person conversation record and its tagged state.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;

use super::roster::RosterField;

/// Step of the conversation a person is currently in.
///
/// Persisted as a plain tag (`start`, `menu_changing`, `changing_phone`, …)
/// in the conversation store; menus other than the main menu carry their
/// full tag, field-change prompts carry the field being edited.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ConversationState {
    Start,
    RegisterPhone,
    RegisterFamilyName,
    RegisterName,
    RegisterBirthDate,
    MainMenu,
    /// A table-defined submenu; holds the full `menu_*` tag.
    Menu(String),
    /// Waiting for a new value of an editable roster field.
    Changing(RosterField),
    Chat,
    EmergencyConfirm,
    EmergencyChat,
}

impl ConversationState {
    /// The tag under which this state is persisted and referenced by the menu table.
    pub fn as_tag(&self) -> String {
        match self {
            Self::Start => "start".to_string(),
            Self::RegisterPhone => "register_phone".to_string(),
            Self::RegisterFamilyName => "register_familyname".to_string(),
            Self::RegisterName => "register_name".to_string(),
            Self::RegisterBirthDate => "register_birthdate".to_string(),
            Self::MainMenu => "main_menu".to_string(),
            Self::Menu(tag) => tag.clone(),
            Self::Changing(field) => format!("changing_{}", field.tag()),
            Self::Chat => "chat".to_string(),
            Self::EmergencyConfirm => "emergency_confirm".to_string(),
            Self::EmergencyChat => "emergency_chat".to_string(),
        }
    }

    /// The menu that renders changes of contact data.
    pub fn changing_menu() -> Self {
        Self::Menu("menu_changing".to_string())
    }
}

impl FromStr for ConversationState {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let state = match s {
            "start" => Self::Start,
            "register_phone" => Self::RegisterPhone,
            "register_familyname" => Self::RegisterFamilyName,
            "register_name" => Self::RegisterName,
            "register_birthdate" => Self::RegisterBirthDate,
            "main_menu" => Self::MainMenu,
            "chat" => Self::Chat,
            "emergency_confirm" => Self::EmergencyConfirm,
            "emergency_chat" => Self::EmergencyChat,
            other => {
                if let Some(field) = other.strip_prefix("changing_") {
                    let field = RosterField::EDITABLE
                        .into_iter()
                        .find(|f| f.tag() == field)
                        .ok_or_else(|| DomainError::InvalidState(other.to_string()))?;
                    Self::Changing(field)
                } else if other.starts_with("menu_") && other.len() > "menu_".len() {
                    Self::Menu(other.to_string())
                } else {
                    return Err(DomainError::InvalidState(other.to_string()));
                }
            }
        };
        Ok(state)
    }
}

impl fmt::Display for ConversationState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.as_tag())
    }
}

/// Progress of identity verification, stored in the same cell as the retry counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Verification {
    /// Number of failed roster lookups so far.
    Attempts(u32),
    /// Linked to a roster entry.
    Done,
    /// Latched when another conversation already owns the matching roster entry.
    /// Never cleared by the engine.
    Duplicate,
}

impl Verification {
    /// Parse the stored cell value; an empty cell counts as zero attempts.
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        match raw.trim() {
            "done" => Ok(Self::Done),
            "duplicate" => Ok(Self::Duplicate),
            "" => Ok(Self::Attempts(0)),
            other => other
                .parse::<f64>()
                .ok()
                .filter(|n| n.is_finite() && *n >= 0.0)
                .map(|n| Self::Attempts(n as u32))
                .ok_or_else(|| DomainError::InvalidState(format!("verification = {other}"))),
        }
    }

    /// The persisted form: `done`, `duplicate`, or the attempt count.
    pub fn as_cell(&self) -> serde_json::Value {
        match self {
            Self::Attempts(n) => serde_json::Value::from(*n),
            Self::Done => serde_json::Value::from("done"),
            Self::Duplicate => serde_json::Value::from("duplicate"),
        }
    }
}

/// One conversation per distinct sender.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConversationRecord {
    /// Opaque locator used for every later write to this record.
    pub row_id: u64,
    /// Stable external identifier correlating this conversation to a roster entry.
    pub person_id: Option<i64>,
    /// Current delivery address.
    pub chat_id: i64,
    pub state: ConversationState,
    pub verification: Verification,
    pub family_name: String,
    pub given_name: String,
    /// `+<digits>`, or empty when the person registered by handle.
    pub phone: String,
}

impl ConversationRecord {
    /// A freshly created record: `start`, zero attempts.
    pub fn new(row_id: u64, person_id: i64, chat_id: i64) -> Self {
        Self {
            row_id,
            person_id: Some(person_id),
            chat_id,
            state: ConversationState::Start,
            verification: Verification::Attempts(0),
            family_name: String::new(),
            given_name: String::new(),
            phone: String::new(),
        }
    }
}
