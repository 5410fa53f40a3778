//! Ticket descriptions as a small key-line format.
//!
//! A description is free text in which some lines carry labeled values
//! (`Телефон: +7999…`). Patching a label replaces the first line that starts
//! with it (after optional leading spaces) and leaves every other line
//! untouched; a label with no line yet is prepended.

/// A ticket description split into lines.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TicketDescription {
    lines: Vec<String>,
}

impl TicketDescription {
    pub fn parse(text: &str) -> Self {
        Self {
            lines: text.split('\n').map(str::to_string).collect(),
        }
    }

    /// Index of the first line labeled `label`.
    fn find(&self, label: &str) -> Option<usize> {
        self.lines
            .iter()
            .position(|line| line.trim_start_matches(' ').starts_with(label))
    }

    /// Set `label` to `value`, replacing its line or prepending a new one.
    pub fn patch(&mut self, label: &str, value: &str) {
        let line = format!("{label} {value}");
        match self.find(label) {
            Some(idx) => {
                // Keep CRLF line endings intact.
                let line = if self.lines[idx].ends_with('\r') {
                    format!("{line}\r")
                } else {
                    line
                };
                self.lines[idx] = line;
            }
            None => self.lines.insert(0, line),
        }
    }

    pub fn render(&self) -> String {
        self.lines.join("\n")
    }
}

/// Parse, patch one label and render in one step.
pub fn patch_description(text: &str, label: &str, value: &str) -> String {
    let mut description = TicketDescription::parse(text);
    description.patch(label, value);
    description.render()
}
