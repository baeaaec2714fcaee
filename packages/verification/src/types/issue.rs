//! Issue and verification-outcome types.

use serde::{Deserialize, Serialize};

use crate::types::entity::Entity;
use crate::types::segment::Segment;

/// A reference entity matched to a target by semantic similarity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimilarEntity {
    /// The matched reference entity
    pub entity: Entity,

    /// Cosine similarity to the target, in (0.7, 1.0] after thresholding
    pub similarity: f32,
}

/// The judgment returned by the consistency verifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    /// Whether the assertion is consistent with the references
    pub consistent: bool,

    /// Human-readable rationale
    pub reason: String,

    /// Confidence in the judgment, in [0, 1]
    pub confidence: f32,
}

impl Verdict {
    /// The degraded verdict used when the verification call fails.
    ///
    /// A failed verification is a low-confidence inconsistency, never an
    /// aborted run.
    pub fn verification_failed() -> Self {
        Self {
            consistent: false,
            reason: "verification failed".to_string(),
            confidence: 0.1,
        }
    }
}

/// Severity of a detected issue.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IssueKind {
    /// No reference was found to verify the assertion
    Warning,

    /// The assertion is inconsistent with its references
    Error,
}

/// A single problem detected during cross-verification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    /// Severity
    #[serde(rename = "type")]
    pub kind: IssueKind,

    /// The offending entity
    pub entity: Entity,

    /// Human-readable message
    pub message: String,

    /// References the entity was checked against (empty for warnings)
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub references: Vec<SimilarEntity>,

    /// Confidence score in [0, 1]
    pub confidence: f32,
}

impl Issue {
    /// Build the warning issue for an entity with no retrievable references.
    pub fn no_reference(entity: Entity) -> Self {
        Self {
            kind: IssueKind::Warning,
            entity,
            message: "no reference found to verify this assertion".to_string(),
            references: Vec::new(),
            confidence: 0.3,
        }
    }

    /// Build the error issue for an entity judged inconsistent.
    pub fn inconsistent(entity: Entity, verdict: &Verdict, references: Vec<SimilarEntity>) -> Self {
        Self {
            kind: IssueKind::Error,
            entity,
            message: verdict.reason.clone(),
            references,
            confidence: verdict.confidence,
        }
    }
}

/// The outcome of cross-verifying one segment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VerificationRecord {
    /// The segment that was verified
    pub segment: Segment,

    /// Issues detected in this segment
    pub issues: Vec<Issue>,

    /// Arithmetic mean of the recorded verdict confidences (0.5 if none)
    pub confidence: f32,

    /// True iff zero issues were detected
    pub verified: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::entity::EntityKind;

    #[test]
    fn no_reference_issue_shape() {
        let entity = Entity::new("entity_0", "water boils at 90C", EntityKind::Assertion);
        let issue = Issue::no_reference(entity);

        assert_eq!(issue.kind, IssueKind::Warning);
        assert_eq!(issue.confidence, 0.3);
        assert!(issue.references.is_empty());
        assert_eq!(issue.message, "no reference found to verify this assertion");
    }

    #[test]
    fn degraded_verdict_shape() {
        let verdict = Verdict::verification_failed();
        assert!(!verdict.consistent);
        assert_eq!(verdict.reason, "verification failed");
        assert!((verdict.confidence - 0.1).abs() < f32::EPSILON);
    }

    #[test]
    fn inconsistent_issue_carries_verdict() {
        let entity = Entity::new("entity_1", "the earth is flat", EntityKind::Assertion);
        let reference = SimilarEntity {
            entity: Entity::new("entity_2", "the earth is round", EntityKind::Assertion)
                .with_source("atlas.txt"),
            similarity: 0.91,
        };
        let verdict = Verdict {
            consistent: false,
            reason: "contradicts the reference".to_string(),
            confidence: 0.85,
        };

        let issue = Issue::inconsistent(entity, &verdict, vec![reference]);
        assert_eq!(issue.kind, IssueKind::Error);
        assert_eq!(issue.message, "contradicts the reference");
        assert_eq!(issue.references.len(), 1);
        assert!((issue.confidence - 0.85).abs() < f32::EPSILON);
    }
}
