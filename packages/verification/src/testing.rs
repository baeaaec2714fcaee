//! Testing utilities including mock implementations.
//!
//! These make it possible to exercise the pipeline without real AI or
//! network calls.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use crate::error::{AnalysisError, Result};
use crate::pipeline::AnalysisPhase;
use crate::traits::{ai::AI, progress::ProgressSink};
use crate::types::{
    entity::{Entity, EntityKind},
    issue::{SimilarEntity, Verdict},
    report::RunStatistics,
};

/// A mock AI implementation for testing.
///
/// Returns deterministic, configurable responses for every AI operation,
/// with per-operation failure switches to exercise the pipeline's
/// fallbacks.
/// Cloning shares the scripted responses and the call log, so a test can
/// keep a handle while the pipeline owns the mock.
#[derive(Clone, Default)]
pub struct MockAI {
    /// Scripted entity lists, keyed by document content
    entities: Arc<RwLock<HashMap<String, Vec<Entity>>>>,

    /// Scripted verdicts, keyed by entity text
    verdicts: Arc<RwLock<HashMap<String, Verdict>>>,

    /// Scripted embeddings, keyed by text
    embeddings: Arc<RwLock<HashMap<String, Vec<f32>>>>,

    /// Scripted summary
    summary: Arc<RwLock<Option<String>>>,

    /// Dimension of generated deterministic embeddings
    embedding_dim: usize,

    fail_extraction: bool,
    fail_verification: bool,
    fail_embedding: bool,
    fail_summary: bool,

    /// Call tracking for assertions
    calls: Arc<RwLock<Vec<MockAICall>>>,
}

/// Record of a call made to the mock AI.
#[derive(Debug, Clone)]
pub enum MockAICall {
    ExtractEntities { content_len: usize },
    VerifyConsistency { entity_id: String, reference_count: usize },
    SummarizeRun,
    Embed { text_len: usize },
}

impl MockAI {
    /// Create a new mock with default behavior.
    pub fn new() -> Self {
        Self {
            embedding_dim: 384,
            ..Default::default()
        }
    }

    /// Set the dimension of generated embeddings.
    pub fn with_embedding_dim(mut self, dim: usize) -> Self {
        self.embedding_dim = dim;
        self
    }

    /// Script the entities returned for a document's content.
    pub fn with_entities(self, content: impl Into<String>, entities: Vec<Entity>) -> Self {
        self.entities.write().unwrap().insert(content.into(), entities);
        self
    }

    /// Script the verdict returned for an entity's text.
    pub fn with_verdict(self, entity_text: impl Into<String>, verdict: Verdict) -> Self {
        self.verdicts
            .write()
            .unwrap()
            .insert(entity_text.into(), verdict);
        self
    }

    /// Script the embedding returned for a text.
    pub fn with_embedding(self, text: impl Into<String>, embedding: Vec<f32>) -> Self {
        self.embeddings
            .write()
            .unwrap()
            .insert(text.into(), embedding);
        self
    }

    /// Script the run summary.
    pub fn with_summary(self, summary: impl Into<String>) -> Self {
        *self.summary.write().unwrap() = Some(summary.into());
        self
    }

    /// Make every extraction call fail.
    pub fn fail_extraction(mut self) -> Self {
        self.fail_extraction = true;
        self
    }

    /// Make every verification call fail.
    pub fn fail_verification(mut self) -> Self {
        self.fail_verification = true;
        self
    }

    /// Make every embedding call fail.
    pub fn fail_embedding(mut self) -> Self {
        self.fail_embedding = true;
        self
    }

    /// Make the summary call fail.
    pub fn fail_summary(mut self) -> Self {
        self.fail_summary = true;
        self
    }

    /// Get all calls made to this mock.
    pub fn calls(&self) -> Vec<MockAICall> {
        self.calls.read().unwrap().clone()
    }

    /// Clear call history.
    pub fn clear_calls(&self) {
        self.calls.write().unwrap().clear();
    }

    /// Generate a deterministic embedding based on the text.
    fn generate_deterministic_embedding(&self, text: &str) -> Vec<f32> {
        use sha2::{Digest, Sha256};

        let mut hasher = Sha256::new();
        hasher.update(text.as_bytes());
        let hash = hasher.finalize();

        (0..self.embedding_dim)
            .map(|i| {
                let byte = hash[i % 32] as f32;
                (byte / 127.5) - 1.0
            })
            .collect()
    }

    /// Default extraction for unscripted content: one assertion per
    /// non-empty line.
    fn default_entities(&self, content: &str) -> Vec<Entity> {
        content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .enumerate()
            .map(|(i, line)| Entity::new(format!("entity_{i}"), line, EntityKind::Assertion))
            .collect()
    }
}

#[async_trait]
impl AI for MockAI {
    async fn extract_entities(&self, content: &str) -> Result<Vec<Entity>> {
        self.calls.write().unwrap().push(MockAICall::ExtractEntities {
            content_len: content.len(),
        });

        if self.fail_extraction {
            return Err(AnalysisError::Ai("mock extraction failure".into()));
        }

        Ok(self
            .entities
            .read()
            .unwrap()
            .get(content)
            .cloned()
            .unwrap_or_else(|| self.default_entities(content)))
    }

    async fn verify_consistency(
        &self,
        entity: &Entity,
        references: &[SimilarEntity],
    ) -> Result<Verdict> {
        self.calls
            .write()
            .unwrap()
            .push(MockAICall::VerifyConsistency {
                entity_id: entity.id.clone(),
                reference_count: references.len(),
            });

        if self.fail_verification {
            return Err(AnalysisError::Ai("mock verification failure".into()));
        }

        Ok(self
            .verdicts
            .read()
            .unwrap()
            .get(&entity.text)
            .cloned()
            .unwrap_or(Verdict {
                consistent: true,
                reason: "consistent with references".to_string(),
                confidence: 0.9,
            }))
    }

    async fn summarize_run(&self, _statistics: &RunStatistics) -> Result<String> {
        self.calls.write().unwrap().push(MockAICall::SummarizeRun);

        if self.fail_summary {
            return Err(AnalysisError::Ai("mock summary failure".into()));
        }

        Ok(self
            .summary
            .read()
            .unwrap()
            .clone()
            .unwrap_or_else(|| "Mock analysis summary.".to_string()))
    }

    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.calls.write().unwrap().push(MockAICall::Embed {
            text_len: text.len(),
        });

        if self.fail_embedding {
            return Err(AnalysisError::Ai("mock embedding failure".into()));
        }

        Ok(self
            .embeddings
            .read()
            .unwrap()
            .get(text)
            .cloned()
            .unwrap_or_else(|| self.generate_deterministic_embedding(text)))
    }
}

/// A progress event captured by [`RecordingProgress`].
#[derive(Debug, Clone, PartialEq)]
pub enum ProgressEvent {
    PhaseStarted(AnalysisPhase),
    PhaseCompleted(AnalysisPhase),
    PhaseFailed(AnalysisPhase),
    Progress(f32, String),
    Log(String),
}

/// Records every progress event for assertions in tests.
#[derive(Debug, Default, Clone)]
pub struct RecordingProgress {
    events: Arc<RwLock<Vec<ProgressEvent>>>,
}

impl RecordingProgress {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// All recorded events, in order.
    pub fn events(&self) -> Vec<ProgressEvent> {
        self.events.read().unwrap().clone()
    }
}

impl ProgressSink for RecordingProgress {
    fn phase_started(&self, phase: AnalysisPhase) {
        self.events
            .write()
            .unwrap()
            .push(ProgressEvent::PhaseStarted(phase));
    }

    fn phase_completed(&self, phase: AnalysisPhase) {
        self.events
            .write()
            .unwrap()
            .push(ProgressEvent::PhaseCompleted(phase));
    }

    fn phase_failed(&self, phase: AnalysisPhase) {
        self.events
            .write()
            .unwrap()
            .push(ProgressEvent::PhaseFailed(phase));
    }

    fn progress(&self, percent: f32, message: &str) {
        self.events
            .write()
            .unwrap()
            .push(ProgressEvent::Progress(percent, message.to_string()));
    }

    fn log(&self, message: &str) {
        self.events
            .write()
            .unwrap()
            .push(ProgressEvent::Log(message.to_string()));
    }
}
