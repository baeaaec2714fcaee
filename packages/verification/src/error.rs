//! Typed errors for the verification library.
//!
//! Uses `thiserror` for library errors (not `anyhow`) to provide
//! strongly-typed, composable error handling.

use thiserror::Error;

use crate::pipeline::AnalysisPhase;
use crate::types::report::RunStatistics;

/// Errors that can occur during an analysis run.
#[derive(Debug, Error)]
pub enum AnalysisError {
    /// Configuration error (e.g. missing API key). Fatal before any run starts.
    #[error("config error: {0}")]
    Config(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// AI service unavailable or failed
    #[error("AI service error: {0}")]
    Ai(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// A document's content could not be read
    #[error("failed to read document: {name}")]
    Document {
        name: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Structured response from the reasoning service did not match the schema
    #[error("malformed service response: {0}")]
    MalformedResponse(#[from] serde_json::Error),

    /// Embedding generation failed
    #[error("embedding error: {0}")]
    Embedding(String),

    /// A pipeline phase failed and the run was aborted.
    ///
    /// Carries the statistics accumulated before the failure so partial
    /// progress stays inspectable for diagnostics.
    #[error("analysis failed during the {phase} phase")]
    Phase {
        phase: AnalysisPhase,
        statistics: RunStatistics,
        #[source]
        source: Box<AnalysisError>,
    },
}

impl AnalysisError {
    /// Wrap an error as a phase-fatal failure, attaching the statistics
    /// computed so far.
    pub fn in_phase(self, phase: AnalysisPhase, statistics: RunStatistics) -> Self {
        Self::Phase {
            phase,
            statistics,
            source: Box::new(self),
        }
    }

    /// The phase a fatal error occurred in, if this is a phase failure.
    pub fn phase(&self) -> Option<AnalysisPhase> {
        match self {
            Self::Phase { phase, .. } => Some(*phase),
            _ => None,
        }
    }

    /// Partial run statistics attached to a phase failure.
    pub fn statistics(&self) -> Option<&RunStatistics> {
        match self {
            Self::Phase { statistics, .. } => Some(statistics),
            _ => None,
        }
    }
}

/// Result type alias for analysis operations.
pub type Result<T> = std::result::Result<T, AnalysisError>;
