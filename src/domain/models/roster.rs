//! Roster fields and the rows the engine reads from the roster.

/// A roster column the engine reads or rewrites.
///
/// The first six are editable through `changing_*` prompts; `Handle` and
/// `PersonId` are only written while reconciling or linking during
/// verification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RosterField {
    Phone,
    Email,
    Region,
    City,
    District,
    Address,
    Handle,
    PersonId,
}

/// How one roster field is stored, audited and mirrored into the ticket description.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Tag used in `changing_<tag>` states.
    pub tag: &'static str,
    /// Roster column letter.
    pub column: &'static str,
    /// Word used in the audit comment (`Уточнение <audit_label>`).
    pub audit_label: &'static str,
    /// Label of the line holding this value in the ticket description.
    pub ticket_label: &'static str,
    /// Name shown to the user when displaying or prompting for the value.
    pub display_name: &'static str,
}

const PHONE: FieldSpec = FieldSpec {
    tag: "phone",
    column: "H",
    audit_label: "телефона",
    ticket_label: "Телефон:",
    display_name: "Телефон",
};

const EMAIL: FieldSpec = FieldSpec {
    tag: "email",
    column: "K",
    audit_label: "email",
    ticket_label: "Email:",
    display_name: "Email",
};

const REGION: FieldSpec = FieldSpec {
    tag: "region",
    column: "L",
    audit_label: "региона",
    ticket_label: "Регион:",
    display_name: "Регион",
};

const CITY: FieldSpec = FieldSpec {
    tag: "city",
    column: "N",
    audit_label: "города",
    ticket_label: "Город:",
    display_name: "Город",
};

const DISTRICT: FieldSpec = FieldSpec {
    tag: "district",
    column: "M",
    audit_label: "района",
    ticket_label: "Район:",
    display_name: "Район",
};

const ADDRESS: FieldSpec = FieldSpec {
    tag: "address",
    column: "V",
    audit_label: "адреса",
    ticket_label: "Адрес:",
    display_name: "Адрес",
};

const HANDLE: FieldSpec = FieldSpec {
    tag: "handle",
    column: "I",
    audit_label: "юзернейма",
    ticket_label: "Telegram:",
    display_name: "Telegram",
};

const PERSON_ID: FieldSpec = FieldSpec {
    tag: "tuid",
    column: "T",
    audit_label: "TUID",
    ticket_label: "TUID:",
    display_name: "TUID",
};

impl RosterField {
    /// Fields a verified person may edit from the change menu.
    pub const EDITABLE: [Self; 6] = [
        Self::Phone,
        Self::Email,
        Self::Region,
        Self::City,
        Self::District,
        Self::Address,
    ];

    pub const fn spec(self) -> &'static FieldSpec {
        match self {
            Self::Phone => &PHONE,
            Self::Email => &EMAIL,
            Self::Region => &REGION,
            Self::City => &CITY,
            Self::District => &DISTRICT,
            Self::Address => &ADDRESS,
            Self::Handle => &HANDLE,
            Self::PersonId => &PERSON_ID,
        }
    }

    pub const fn tag(self) -> &'static str {
        self.spec().tag
    }

    pub const fn column(self) -> &'static str {
        self.spec().column
    }

}

/// Everything needed to rewrite one field of a roster row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldSnapshot {
    /// Roster row locator.
    pub row: u64,
    /// Value currently stored in the field.
    pub value: String,
    /// Ticket linked to the roster row.
    pub ticket_id: String,
}

/// Roster row already linked to the person (name, birth date and person id all match).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkedEntry {
    pub row: u64,
    pub ticket_id: String,
    pub handle: String,
    pub phone: String,
}

/// Roster row matched by name, birth date and phone or handle, ignoring the person id.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CandidateEntry {
    pub row: u64,
    pub ticket_id: String,
    /// Person id already stored in the row, if any.
    pub person_id: Option<i64>,
}

/// Lookup keys for identity verification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IdentityQuery {
    pub given_name: String,
    pub family_name: String,
    /// `YYYY-MM-DD`.
    pub birth_date: String,
}

/// Second key of a candidate lookup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ContactKey {
    Phone(String),
    Handle(String),
}

/// Editable contact data shown in the current-data summary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ContactSummary {
    pub phone: String,
    pub email: String,
    pub region: String,
    pub city: String,
    pub district: String,
    pub address: String,
}

/// Roster data included in an emergency detention notice.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DetentionProfile {
    pub family_name: String,
    pub given_name: String,
    pub birth_date: String,
    pub phone: String,
    pub handle: String,
    pub region: String,
    pub city: String,
    pub district: String,
    pub address: String,
    pub ticket_id: String,
}
