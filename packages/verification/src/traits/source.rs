//! Document source trait - content acquisition behind an opaque handle.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// An opaque handle to a document.
///
/// `name` labels the document in logs, entity sources, and reports;
/// `location` is interpreted by the `DocumentSource` implementation
/// (a filesystem path, an in-memory key, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentRef {
    /// Display name of the document
    pub name: String,

    /// Implementation-specific locator
    pub location: String,
}

impl DocumentRef {
    /// Create a document reference.
    pub fn new(name: impl Into<String>, location: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            location: location.into(),
        }
    }

    /// Create a reference whose locator is its name.
    pub fn named(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            location: name.clone(),
            name,
        }
    }
}

/// Supplies full document text for an opaque handle.
///
/// Binary formats are out of scope: implementations return text that has
/// already been extracted. A read failure is pipeline-fatal.
#[async_trait]
pub trait DocumentSource: Send + Sync {
    /// Read the full text content of a document.
    async fn read(&self, document: &DocumentRef) -> Result<String>;
}
