//! Channel-agnostic notification documents.

use serde::Serialize;

/// A single named field of a notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmbedField {
    pub name: String,
    pub value: String,
    /// Whether the field may be laid out next to its neighbours.
    pub inline: bool,
}

/// Structured notification: a title, a description and ordered fields.
///
/// Documents are assembled through [`NotificationDocument::new`] and
/// [`NotificationDocument::with_field`] and are read-only afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct NotificationDocument {
    title: String,
    description: String,
    fields: Vec<EmbedField>,
}

impl NotificationDocument {
    pub fn new(title: impl Into<String>, description: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            fields: Vec::new(),
        }
    }

    /// Append a field.
    pub fn with_field(
        mut self,
        name: impl Into<String>,
        value: impl Into<String>,
        inline: bool,
    ) -> Self {
        self.fields.push(EmbedField {
            name: name.into(),
            value: value.into(),
            inline,
        });
        self
    }

    /// Replace the description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn fields(&self) -> &[EmbedField] {
        &self.fields
    }
}
