//! Final report types.

use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::types::issue::VerificationRecord;

/// Aggregate counters maintained across a run.
///
/// Updated as each phase progresses; a phase failure leaves the counters
/// computed so far attached to the error for diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunStatistics {
    /// Entities extracted from the main document
    pub entities: usize,

    /// Entities extracted from all reference documents
    pub reference_entities: usize,

    /// Segments the main document was split into
    pub segments: usize,

    /// Per-entity cross-checks performed
    pub verifications: usize,

    /// Issues detected
    pub issues: usize,
}

impl RunStatistics {
    /// Issue rate as a percentage of verifications (0 when none ran).
    pub fn error_rate_percent(&self) -> f32 {
        if self.verifications == 0 {
            0.0
        } else {
            self.issues as f32 / self.verifications as f32 * 100.0
        }
    }
}

/// The final report produced by a run.
///
/// Created once at the end of the run; immutable afterward.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Report {
    /// When the report was generated
    pub generated_at: DateTime<Utc>,

    /// Narrative summary of the analysis
    pub summary: String,

    /// Coarse subject-matter domains detected in the main document
    pub domains: Vec<String>,

    /// Tag → entity ids that produced it, in first-appearance order
    pub tags: IndexMap<String, Vec<String>>,

    /// Aggregate counters
    pub statistics: RunStatistics,

    /// Per-segment verification outcomes
    pub verifications: Vec<VerificationRecord>,
}

impl Report {
    /// Iterate over every issue across all verification records.
    pub fn issues(&self) -> impl Iterator<Item = &crate::types::issue::Issue> {
        self.verifications.iter().flat_map(|v| v.issues.iter())
    }
}
