/// One row of the externally defined menu transition table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MenuEntry {
    /// State tag the button is shown in.
    pub source: String,
    /// Button label, matched against sanitized user input.
    pub label: String,
    /// State tag entered when the button is pressed.
    pub target: String,
    /// Text sent on entering `target`; may be empty.
    pub description: String,
}

impl MenuEntry {
    pub fn new(
        source: impl Into<String>,
        label: impl Into<String>,
        target: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            label: label.into(),
            target: target.into(),
            description: description.into(),
        }
    }
}
