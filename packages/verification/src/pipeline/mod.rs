//! Analysis pipeline - the core of the library.
//!
//! The pipeline orchestrates four strictly ordered phases:
//! 1. Extraction: entities from the main and reference documents
//! 2. Indexing: one embedding per entity
//! 3. Cross-verification: segment-by-segment consistency checks
//! 4. Synthesis: domains, tags, summary, and the final report

pub mod parse;
pub mod prompts;
pub mod report;
pub mod retrieval;
pub mod segmenter;
pub mod verify;

pub use parse::{parse_entities_response, parse_verdict_response, strip_code_fences};
pub use report::{
    collect_tags, detect_domains, entity_tags, fallback_summary, render_text, DOMAIN_KEYWORDS,
};
pub use retrieval::find_similar;
pub use segmenter::segment_entities;
pub use verify::{average_confidence, verify_segment};

use std::sync::Arc;

use chrono::Utc;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{AnalysisError, Result};
use crate::index::{fallback_vector, EmbeddingIndex};
use crate::progress::NullProgress;
use crate::traits::{
    ai::AI,
    progress::ProgressSink,
    source::{DocumentRef, DocumentSource},
};
use crate::types::{
    config::AnalysisConfig,
    entity::Entity,
    issue::VerificationRecord,
    report::{Report, RunStatistics},
};

/// The four ordered phases of an analysis run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnalysisPhase {
    /// Entity extraction from main and reference documents
    Extraction,

    /// Embedding generation and indexing
    Indexing,

    /// Segment-by-segment consistency checks
    CrossVerification,

    /// Report synthesis
    Synthesis,
}

impl AnalysisPhase {
    /// 1-based position in the run.
    pub fn number(&self) -> u8 {
        match self {
            Self::Extraction => 1,
            Self::Indexing => 2,
            Self::CrossVerification => 3,
            Self::Synthesis => 4,
        }
    }

    /// Lowercase phase name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::Extraction => "extraction",
            Self::Indexing => "indexing",
            Self::CrossVerification => "cross-verification",
            Self::Synthesis => "synthesis",
        }
    }
}

impl std::fmt::Display for AnalysisPhase {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Run-scoped state passed through the phases.
///
/// Owned exclusively by one run; nothing here is shared across runs, so no
/// locking is needed.
#[derive(Debug, Default)]
struct RunContext {
    main_entities: Vec<Entity>,
    reference_entities: Vec<Entity>,
    index: EmbeddingIndex,
    statistics: RunStatistics,
    verifications: Vec<VerificationRecord>,
}

/// The analysis pipeline - drives one run end to end.
///
/// # Example
///
/// ```rust,ignore
/// let source = FsDocumentSource::new();
/// let ai = OpenAI::from_env()?;
/// let pipeline = AnalysisPipeline::new(source, ai);
///
/// let main = DocumentRef::new("thesis.txt", "docs/thesis.txt");
/// let refs = vec![DocumentRef::new("handbook.txt", "docs/handbook.txt")];
/// let report = pipeline.run(&main, &refs).await?;
/// ```
pub struct AnalysisPipeline<S: DocumentSource, A: AI> {
    source: S,
    ai: A,
    config: AnalysisConfig,
    progress: Arc<dyn ProgressSink>,
}

impl<S: DocumentSource, A: AI> AnalysisPipeline<S, A> {
    /// Create a pipeline with default configuration and no progress output.
    pub fn new(source: S, ai: A) -> Self {
        Self {
            source,
            ai,
            config: AnalysisConfig::default(),
            progress: Arc::new(NullProgress),
        }
    }

    /// Set the configuration.
    pub fn with_config(mut self, config: AnalysisConfig) -> Self {
        self.config = config;
        self
    }

    /// Set the progress sink.
    pub fn with_progress(mut self, progress: Arc<dyn ProgressSink>) -> Self {
        self.progress = progress;
        self
    }

    /// Get a reference to the configuration.
    pub fn config(&self) -> &AnalysisConfig {
        &self.config
    }

    /// Execute one analysis run.
    ///
    /// Phases run strictly in order; no phase starts before the previous one
    /// completes. The first unrecoverable error aborts the run with an error
    /// naming the failing phase and carrying the statistics computed so far.
    /// Service-call failures inside a phase are recovered locally (empty
    /// entity list, fallback vector, degraded verdict, template summary) and
    /// never abort the run.
    pub async fn run(&self, main: &DocumentRef, references: &[DocumentRef]) -> Result<Report> {
        let mut ctx = RunContext::default();

        let phase = AnalysisPhase::Extraction;
        self.progress.phase_started(phase);
        match self.extract(&mut ctx, main, references).await {
            Ok(()) => self.progress.phase_completed(phase),
            Err(error) => return Err(self.fail(phase, &ctx, error)),
        }

        let phase = AnalysisPhase::Indexing;
        self.progress.phase_started(phase);
        match self.index_entities(&mut ctx).await {
            Ok(()) => self.progress.phase_completed(phase),
            Err(error) => return Err(self.fail(phase, &ctx, error)),
        }

        let phase = AnalysisPhase::CrossVerification;
        self.progress.phase_started(phase);
        match self.cross_verify(&mut ctx).await {
            Ok(()) => self.progress.phase_completed(phase),
            Err(error) => return Err(self.fail(phase, &ctx, error)),
        }

        let phase = AnalysisPhase::Synthesis;
        self.progress.phase_started(phase);
        match self.synthesize(&mut ctx).await {
            Ok(report) => {
                self.progress.phase_completed(phase);
                self.progress.progress(100.0, "analysis complete");
                Ok(report)
            }
            Err(error) => Err(self.fail(phase, &ctx, error)),
        }
    }

    /// Mark a phase failed and attach diagnostics to the error.
    fn fail(&self, phase: AnalysisPhase, ctx: &RunContext, error: AnalysisError) -> AnalysisError {
        self.progress.phase_failed(phase);
        error.in_phase(phase, ctx.statistics)
    }

    /// Phase 1: extract entities from the main document, then from every
    /// reference document in input order.
    async fn extract(
        &self,
        ctx: &mut RunContext,
        main: &DocumentRef,
        references: &[DocumentRef],
    ) -> Result<()> {
        self.progress.progress(10.0, "phase 1: extracting entities");
        self.progress
            .log(&format!("loading main document: {}", main.name));

        let content = self.source.read(main).await?;
        let mut next_id = 0usize;

        let mut main_entities = self.extract_document(&content).await;
        for entity in &mut main_entities {
            entity.id = format!("entity_{next_id}");
            next_id += 1;
        }
        ctx.statistics.entities = main_entities.len();
        ctx.main_entities = main_entities;

        for (i, document) in references.iter().enumerate() {
            self.progress.log(&format!(
                "processing reference {}/{}: {}",
                i + 1,
                references.len(),
                document.name
            ));

            let content = self.source.read(document).await?;
            let mut entities = self.extract_document(&content).await;
            for entity in &mut entities {
                entity.id = format!("entity_{next_id}");
                next_id += 1;
                entity.source = Some(document.name.clone());
            }
            ctx.reference_entities.extend(entities);
            ctx.statistics.reference_entities = ctx.reference_entities.len();

            self.progress.progress(
                10.0 + (i as f32 / references.len() as f32) * 15.0,
                &format!("reference extraction {}/{}", i + 1, references.len()),
            );
        }

        info!(
            main = ctx.statistics.entities,
            references = ctx.statistics.reference_entities,
            "extraction complete"
        );
        Ok(())
    }

    /// Extract entities from one document's content, recovering a failed
    /// service call as an empty list.
    async fn extract_document(&self, content: &str) -> Vec<Entity> {
        let truncated = truncate_chars(content, self.config.max_document_chars);
        match self.ai.extract_entities(truncated).await {
            Ok(entities) => entities,
            Err(error) => {
                warn!(%error, "entity extraction failed, continuing with no entities");
                self.progress
                    .log(&format!("entity extraction failed: {error}"));
                Vec::new()
            }
        }
    }

    /// Phase 2: embed every entity (main + reference) and index it by id.
    ///
    /// A failed embedding call falls back to the deterministic hashed
    /// vector, so indexing always completes.
    async fn index_entities(&self, ctx: &mut RunContext) -> Result<()> {
        self.progress.progress(25.0, "phase 2: building vector index");

        let all: Vec<Entity> = ctx
            .main_entities
            .iter()
            .chain(ctx.reference_entities.iter())
            .cloned()
            .collect();
        let total = all.len();

        for (i, entity) in all.into_iter().enumerate() {
            let embedding = match self.ai.embed(&entity.text).await {
                Ok(vector) => vector,
                Err(error) => {
                    warn!(entity = %entity.id, %error, "embedding failed, using fallback vector");
                    fallback_vector(&entity.text, self.config.fallback_dimensions)
                }
            };
            ctx.index.insert(entity, embedding);

            if i % 50 == 0 {
                self.progress.progress(
                    25.0 + (i as f32 / total as f32) * 25.0,
                    &format!("embeddings {i}/{total}"),
                );
            }
        }

        info!(indexed = ctx.index.len(), "indexing complete");
        Ok(())
    }

    /// Phase 3: segment the main entities and cross-verify each segment
    /// against the reference pool.
    async fn cross_verify(&self, ctx: &mut RunContext) -> Result<()> {
        self.progress.progress(50.0, "phase 3: cross-checking sources");

        let segments = segment_entities(&ctx.main_entities, self.config.segment_size);
        ctx.statistics.segments = segments.len();
        let total = segments.len();

        for (i, segment) in segments.iter().enumerate() {
            self.progress
                .log(&format!("verifying segment {}/{}", i + 1, total));

            let record = verify_segment(
                &self.ai,
                segment,
                &ctx.reference_entities,
                &ctx.index,
                &self.config,
            )
            .await;

            ctx.statistics.verifications += segment.len();
            ctx.statistics.issues += record.issues.len();
            ctx.verifications.push(record);

            self.progress.progress(
                50.0 + (i as f32 / total as f32) * 25.0,
                &format!("segment {}/{}", i + 1, total),
            );
        }

        info!(
            segments = total,
            issues = ctx.statistics.issues,
            "cross-verification complete"
        );
        Ok(())
    }

    /// Phase 4: compute domains, tags, and the narrative summary, then
    /// assemble the report.
    async fn synthesize(&self, ctx: &mut RunContext) -> Result<Report> {
        self.progress.progress(75.0, "phase 4: synthesis");

        let domains = detect_domains(&ctx.main_entities);
        let tags = collect_tags(&ctx.main_entities);

        let summary = match self.ai.summarize_run(&ctx.statistics).await {
            Ok(summary) => summary,
            Err(error) => {
                warn!(%error, "summary generation failed, using template summary");
                fallback_summary(&ctx.statistics)
            }
        };

        Ok(Report {
            generated_at: Utc::now(),
            summary,
            domains,
            tags,
            statistics: ctx.statistics,
            verifications: std::mem::take(&mut ctx.verifications),
        })
    }
}

/// Truncate to at most `max_chars` characters, on a char boundary.
fn truncate_chars(content: &str, max_chars: usize) -> &str {
    match content.char_indices().nth(max_chars) {
        Some((index, _)) => &content[..index],
        None => content,
    }
}
