//! Configuration for the analysis pipeline.

use serde::{Deserialize, Serialize};

/// Tunable constants for one analysis run.
///
/// Defaults mirror the values the pipeline was designed around; they are
/// surfaced here rather than hard-coded so callers can adjust them without
/// a rebuild.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisConfig {
    /// Entities per segment during cross-verification. Default: 20.
    pub segment_size: usize,

    /// Minimum cosine similarity (exclusive) for a reference to count as a
    /// match. Default: 0.7.
    pub similarity_threshold: f32,

    /// Maximum matched references passed to the verifier per entity.
    /// Default: 5.
    pub max_references: usize,

    /// Dimensionality of the deterministic fallback vector used when the
    /// embedding service fails. Default: 384.
    pub fallback_dimensions: usize,

    /// Maximum characters of document content sent to the extraction
    /// service per call. Default: 8000.
    pub max_document_chars: usize,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            segment_size: 20,
            similarity_threshold: 0.7,
            max_references: 5,
            fallback_dimensions: 384,
            max_document_chars: 8000,
        }
    }
}

impl AnalysisConfig {
    /// Create a config with default values.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the segment size.
    pub fn with_segment_size(mut self, size: usize) -> Self {
        self.segment_size = size;
        self
    }

    /// Set the similarity threshold.
    pub fn with_similarity_threshold(mut self, threshold: f32) -> Self {
        self.similarity_threshold = threshold;
        self
    }

    /// Set the maximum number of matched references.
    pub fn with_max_references(mut self, max: usize) -> Self {
        self.max_references = max;
        self
    }

    /// Set the fallback vector dimensionality.
    pub fn with_fallback_dimensions(mut self, dimensions: usize) -> Self {
        self.fallback_dimensions = dimensions;
        self
    }

    /// Set the per-call document content limit.
    pub fn with_max_document_chars(mut self, max: usize) -> Self {
        self.max_document_chars = max;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_design_constants() {
        let config = AnalysisConfig::default();
        assert_eq!(config.segment_size, 20);
        assert!((config.similarity_threshold - 0.7).abs() < f32::EPSILON);
        assert_eq!(config.max_references, 5);
        assert_eq!(config.fallback_dimensions, 384);
        assert_eq!(config.max_document_chars, 8000);
    }

    #[test]
    fn builder_overrides() {
        let config = AnalysisConfig::new()
            .with_segment_size(5)
            .with_similarity_threshold(0.5)
            .with_max_references(3);
        assert_eq!(config.segment_size, 5);
        assert!((config.similarity_threshold - 0.5).abs() < f32::EPSILON);
        assert_eq!(config.max_references, 3);
    }
}
