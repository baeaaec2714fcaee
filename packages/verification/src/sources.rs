//! Document source implementations.

use async_trait::async_trait;
use std::collections::HashMap;
use std::path::PathBuf;

use crate::error::{AnalysisError, Result};
use crate::traits::source::{DocumentRef, DocumentSource};

/// Reads documents from the filesystem; the `location` is a path.
///
/// Only plain-text content is supported - text extraction from binary
/// formats happens upstream.
#[derive(Debug, Clone, Default)]
pub struct FsDocumentSource {
    base_dir: Option<PathBuf>,
}

impl FsDocumentSource {
    /// Create a source resolving locations as given.
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve relative locations against a base directory.
    pub fn with_base_dir(mut self, base_dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(base_dir.into());
        self
    }

    fn resolve(&self, location: &str) -> PathBuf {
        match &self.base_dir {
            Some(base) => base.join(location),
            None => PathBuf::from(location),
        }
    }
}

#[async_trait]
impl DocumentSource for FsDocumentSource {
    async fn read(&self, document: &DocumentRef) -> Result<String> {
        let path = self.resolve(&document.location);
        tokio::fs::read_to_string(&path)
            .await
            .map_err(|e| AnalysisError::Document {
                name: document.name.clone(),
                source: Box::new(e),
            })
    }
}

/// In-memory document source for tests and embedded use.
#[derive(Debug, Clone, Default)]
pub struct MemoryDocumentSource {
    documents: HashMap<String, String>,
}

impl MemoryDocumentSource {
    /// Create an empty source.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a document keyed by its location.
    pub fn with_document(mut self, location: impl Into<String>, content: impl Into<String>) -> Self {
        self.documents.insert(location.into(), content.into());
        self
    }
}

#[async_trait]
impl DocumentSource for MemoryDocumentSource {
    async fn read(&self, document: &DocumentRef) -> Result<String> {
        self.documents
            .get(&document.location)
            .cloned()
            .ok_or_else(|| AnalysisError::Document {
                name: document.name.clone(),
                source: Box::new(std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    format!("no document at {}", document.location),
                )),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn memory_source_reads_by_location() {
        let source = MemoryDocumentSource::new().with_document("main.txt", "hello world");

        let content = source
            .read(&DocumentRef::named("main.txt"))
            .await
            .unwrap();
        assert_eq!(content, "hello world");
    }

    #[tokio::test]
    async fn memory_source_missing_document_is_fatal() {
        let source = MemoryDocumentSource::new();
        let result = source.read(&DocumentRef::named("missing.txt")).await;
        assert!(matches!(
            result,
            Err(AnalysisError::Document { name, .. }) if name == "missing.txt"
        ));
    }

    #[tokio::test]
    async fn fs_source_reads_files() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("doc.txt"), "file content").unwrap();

        let source = FsDocumentSource::new().with_base_dir(dir.path());
        let content = source.read(&DocumentRef::named("doc.txt")).await.unwrap();
        assert_eq!(content, "file content");
    }

    #[tokio::test]
    async fn fs_source_missing_file_is_fatal() {
        let dir = tempfile::tempdir().unwrap();
        let source = FsDocumentSource::new().with_base_dir(dir.path());
        let result = source.read(&DocumentRef::named("absent.txt")).await;
        assert!(matches!(result, Err(AnalysisError::Document { .. })));
    }
}
