//! Per-segment cross-verification.

use tracing::warn;

use crate::index::EmbeddingIndex;
use crate::pipeline::retrieval::find_similar;
use crate::traits::ai::AI;
use crate::types::{
    config::AnalysisConfig,
    entity::Entity,
    issue::{Issue, Verdict, VerificationRecord},
    segment::Segment,
};

/// Cross-verify one segment of main-document entities against the
/// reference pool.
///
/// For each entity:
/// - no retrieved references -> a `warning` issue with confidence 0.3, and
///   the verifier is not consulted;
/// - otherwise the verifier judges the entity against its references; an
///   inconsistent verdict becomes an `error` issue, and the verdict's
///   confidence is recorded either way. A failed verifier call degrades to
///   a low-confidence negative verdict instead of aborting the run.
///
/// The segment's aggregate confidence is the arithmetic mean of the
/// recorded confidences, 0.5 when none were recorded.
pub async fn verify_segment<A: AI>(
    ai: &A,
    segment: &Segment,
    references: &[Entity],
    index: &EmbeddingIndex,
    config: &AnalysisConfig,
) -> VerificationRecord {
    let mut issues = Vec::new();
    let mut confidences = Vec::new();

    for entity in &segment.entities {
        let similar = find_similar(entity, references, index, config);

        if similar.is_empty() {
            issues.push(Issue::no_reference(entity.clone()));
            continue;
        }

        let verdict = match ai.verify_consistency(entity, &similar).await {
            Ok(verdict) => verdict,
            Err(error) => {
                warn!(entity = %entity.id, %error, "consistency verification failed");
                Verdict::verification_failed()
            }
        };

        if !verdict.consistent {
            issues.push(Issue::inconsistent(entity.clone(), &verdict, similar));
        }
        confidences.push(verdict.confidence);
    }

    let confidence = average_confidence(&confidences);
    VerificationRecord {
        segment: segment.clone(),
        verified: issues.is_empty(),
        issues,
        confidence,
    }
}

/// Arithmetic mean of recorded confidences; 0.5 for an empty list.
pub fn average_confidence(confidences: &[f32]) -> f32 {
    if confidences.is_empty() {
        0.5
    } else {
        confidences.iter().sum::<f32>() / confidences.len() as f32
    }
}
