//! Local notes editing with unsaved-changes tracking.

/// Editable notes text alongside the last value the server confirmed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NotesDraft {
    saved: String,
    text: String,
}

impl NotesDraft {
    pub fn new(saved: Option<&str>) -> Self {
        let saved = saved.unwrap_or_default().to_string();
        Self {
            text: saved.clone(),
            saved,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn saved(&self) -> &str {
        &self.saved
    }

    pub fn edit(&mut self, text: impl Into<String>) {
        self.text = text.into();
    }

    /// Local text differs from the last confirmed value.
    pub fn is_dirty(&self) -> bool {
        self.text != self.saved
    }

    /// The server accepted `text`; it becomes the new baseline.
    pub fn mark_saved(&mut self, text: impl Into<String>) {
        self.saved = text.into();
    }

    /// Take a freshly fetched server value. Pending edits are kept.
    pub fn reseed(&mut self, server: Option<&str>) {
        let server = server.unwrap_or_default().to_string();
        if !self.is_dirty() {
            self.text = server.clone();
        }
        self.saved = server;
    }
}
