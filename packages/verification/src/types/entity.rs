//! Entity types - the extracted units of meaning.

use serde::{Deserialize, Serialize};

/// An extracted unit of meaning from a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entity {
    /// Unique identifier, stable within one run.
    ///
    /// The pipeline re-keys extracted entities so ids are unique across the
    /// union of main and reference entities, regardless of what the
    /// extraction service returned.
    pub id: String,

    /// Exact extracted text span
    pub text: String,

    /// What kind of unit this is
    #[serde(rename = "type")]
    pub kind: EntityKind,

    /// Surrounding text (advisory, not authoritative)
    #[serde(default)]
    pub context: String,

    /// Name of the document the entity came from.
    ///
    /// Absent for main-document entities, present for reference entities.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,
}

impl Entity {
    /// Create a new entity.
    pub fn new(id: impl Into<String>, text: impl Into<String>, kind: EntityKind) -> Self {
        Self {
            id: id.into(),
            text: text.into(),
            kind,
            context: String::new(),
            source: None,
        }
    }

    /// Set the surrounding context.
    pub fn with_context(mut self, context: impl Into<String>) -> Self {
        self.context = context.into();
        self
    }

    /// Tag the entity with its source document name.
    pub fn with_source(mut self, source: impl Into<String>) -> Self {
        self.source = Some(source.into());
        self
    }
}

/// The kind of an extracted entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    /// A named idea or topic
    Concept,

    /// A numeric or quantitative value
    Value,

    /// A mathematical or chemical equation
    Equation,

    /// A citation or pointer to another work
    Reference,

    /// A factual claim that can be checked against references
    Assertion,
}

impl EntityKind {
    /// Parse a kind label as returned by the extraction service.
    ///
    /// Returns `None` for labels outside the documented set; callers decide
    /// the fallback.
    pub fn parse(label: &str) -> Option<Self> {
        match label.trim().to_lowercase().as_str() {
            "concept" => Some(Self::Concept),
            "value" => Some(Self::Value),
            "equation" => Some(Self::Equation),
            "reference" => Some(Self::Reference),
            "assertion" => Some(Self::Assertion),
            _ => None,
        }
    }

    /// The canonical lowercase label.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Concept => "concept",
            Self::Value => "value",
            Self::Equation => "equation",
            Self::Reference => "reference",
            Self::Assertion => "assertion",
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
