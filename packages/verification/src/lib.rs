//! Cross-Document Consistency Verification Library
//!
//! Ingests one main document plus a set of reference documents, extracts
//! discrete entities from each, builds a semantic index over them, and
//! cross-checks every main-document entity against its most similar
//! reference entities, producing a confidence-scored list of
//! inconsistencies and a final report.
//!
//! # Design
//!
//! - Explicit pipeline API: `run(main, refs) -> Report`, drivable by any
//!   caller (CLI, service endpoint, test harness)
//! - External services behind traits (`AI`, `DocumentSource`,
//!   `ProgressSink`) so the pipeline is testable without a network
//! - Service failures degrade with documented fallbacks; only document
//!   read failures abort a run
//! - One run at a time: the pipeline exclusively owns its entities, index,
//!   and statistics for the duration of a run
//!
//! # Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use verification::{AnalysisPipeline, DocumentRef, FsDocumentSource, TracingProgress};
//! use verification::ai::OpenAI;
//!
//! let source = FsDocumentSource::new();
//! let ai = OpenAI::from_env()?;
//! let pipeline = AnalysisPipeline::new(source, ai)
//!     .with_progress(Arc::new(TracingProgress));
//!
//! let main = DocumentRef::new("thesis.txt", "docs/thesis.txt");
//! let refs = vec![DocumentRef::new("handbook.txt", "docs/handbook.txt")];
//! let report = pipeline.run(&main, &refs).await?;
//! println!("{}", verification::pipeline::render_text(&report));
//! ```
//!
//! # Modules
//!
//! - [`traits`] - Core trait abstractions (AI, DocumentSource, ProgressSink)
//! - [`types`] - Data model (entities, segments, issues, report, config)
//! - [`pipeline`] - The four-phase analysis pipeline
//! - [`index`] - Run-scoped embedding index and vector math
//! - [`sources`] - Document source implementations
//! - [`security`] - Credential handling
//! - [`testing`] - Mock implementations for testing

pub mod error;
pub mod index;
pub mod pipeline;
pub mod progress;
pub mod security;
pub mod sources;
pub mod testing;
pub mod traits;
pub mod types;

#[cfg(feature = "openai")]
pub mod ai;

// Re-export core types at crate root
pub use error::{AnalysisError, Result};
pub use traits::{
    ai::AI,
    progress::ProgressSink,
    source::{DocumentRef, DocumentSource},
};
pub use types::{
    config::AnalysisConfig,
    entity::{Entity, EntityKind},
    issue::{Issue, IssueKind, SimilarEntity, Verdict, VerificationRecord},
    report::{Report, RunStatistics},
    segment::Segment,
};

// Re-export the pipeline and its components
pub use pipeline::{AnalysisPhase, AnalysisPipeline};

pub use pipeline::{
    average_confidence, collect_tags, detect_domains, fallback_summary, find_similar,
    parse_entities_response, parse_verdict_response, render_text, segment_entities, verify_segment,
};

// Re-export the embedding index and vector helpers
pub use index::{cosine_similarity, fallback_vector, EmbeddingIndex, EmbeddingRecord};

// Re-export document sources and progress sinks
pub use progress::{NullProgress, TracingProgress};
pub use sources::{FsDocumentSource, MemoryDocumentSource};
