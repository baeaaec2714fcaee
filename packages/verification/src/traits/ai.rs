//! AI trait for reasoning-service operations.
//!
//! The trait abstracts the LLM capabilities the pipeline needs:
//! - Entity extraction from raw document text
//! - Consistency judgment against retrieved references
//! - Run summarization
//! - Embedding generation

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{
    entity::Entity,
    issue::{SimilarEntity, Verdict},
    report::RunStatistics,
};

/// AI trait for reasoning-service operations.
///
/// Implementations wrap a specific provider and handle the specifics of
/// prompting and response parsing. Parse failures surface as errors; the
/// pipeline applies the documented per-operation fallbacks (empty entity
/// list, fallback vector, degraded verdict, template summary) so a failing
/// service never aborts a run.
#[async_trait]
pub trait AI: Send + Sync {
    /// Extract discrete factual/conceptual entities from document text.
    ///
    /// Returned ids are advisory only; the pipeline re-keys entities to
    /// guarantee run-wide uniqueness.
    async fn extract_entities(&self, content: &str) -> Result<Vec<Entity>>;

    /// Judge whether an entity's assertion is consistent with the retrieved
    /// references.
    async fn verify_consistency(
        &self,
        entity: &Entity,
        references: &[SimilarEntity],
    ) -> Result<Verdict>;

    /// Produce a short narrative summary of a finished run.
    async fn summarize_run(&self, statistics: &RunStatistics) -> Result<String>;

    /// Generate an embedding for text.
    ///
    /// Returns a fixed-length vector for semantic similarity search.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;
}
