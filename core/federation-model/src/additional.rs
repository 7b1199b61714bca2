//! Elements the schema does not declare.

/// An undeclared element, kept as received so it survives a round trip.
///
/// `text` is what a relayable signature covers. `raw` holds the exact form
/// the element arrived in whenever plain text cannot carry it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AdditionalElement {
    name: String,
    text: String,
    raw: Option<RawContent>,
}

/// Wire form of a structured undeclared element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawContent {
    /// The serialized XML element, children included.
    Xml(String),
    /// A serialized JSON value other than a string.
    Json(String),
}

impl AdditionalElement {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
            raw: None,
        }
    }

    #[must_use]
    pub fn with_raw(mut self, raw: RawContent) -> Self {
        self.raw = Some(raw);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn raw(&self) -> Option<&RawContent> {
        self.raw.as_ref()
    }
}
