//! Similarity-based reference retrieval.

use crate::index::{cosine_similarity, EmbeddingIndex};
use crate::types::{config::AnalysisConfig, entity::Entity, issue::SimilarEntity};

/// Rank candidate reference entities by cosine similarity to the target.
///
/// Returns at most `config.max_references` candidates whose similarity is
/// strictly greater than `config.similarity_threshold`, sorted descending.
/// The sort is stable, so candidates with equal scores keep their original
/// order. A target with no indexed embedding yields no matches.
pub fn find_similar(
    target: &Entity,
    candidates: &[Entity],
    index: &EmbeddingIndex,
    config: &AnalysisConfig,
) -> Vec<SimilarEntity> {
    let Some(target_embedding) = index.embedding(&target.id) else {
        return Vec::new();
    };

    let mut matches: Vec<SimilarEntity> = candidates
        .iter()
        .filter_map(|candidate| {
            let embedding = index.embedding(&candidate.id)?;
            let similarity = cosine_similarity(target_embedding, embedding);
            (similarity > config.similarity_threshold).then(|| SimilarEntity {
                entity: candidate.clone(),
                similarity,
            })
        })
        .collect();

    matches.sort_by(|a, b| {
        b.similarity
            .partial_cmp(&a.similarity)
            .unwrap_or(std::cmp::Ordering::Equal)
    });
    matches.truncate(config.max_references);
    matches
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::entity::EntityKind;

    fn entity(id: &str) -> Entity {
        Entity::new(id, format!("text for {id}"), EntityKind::Assertion)
    }

    fn indexed(pairs: &[(&str, Vec<f32>)]) -> (EmbeddingIndex, Vec<Entity>) {
        let mut index = EmbeddingIndex::new();
        let mut entities = Vec::new();
        for (id, embedding) in pairs {
            let e = entity(id);
            index.insert(e.clone(), embedding.clone());
            entities.push(e);
        }
        (index, entities)
    }

    #[test]
    fn missing_target_embedding_returns_empty() {
        let (index, candidates) = indexed(&[("ref_0", vec![1.0, 0.0])]);
        let target = entity("unindexed");
        let matches = find_similar(&target, &candidates, &index, &AnalysisConfig::default());
        assert!(matches.is_empty());
    }

    #[test]
    fn below_threshold_candidates_are_dropped() {
        let (mut index, candidates) = indexed(&[
            ("ref_0", vec![0.6, 0.8]),
            ("ref_1", vec![0.9, (1.0f32 - 0.81).sqrt()]),
        ]);
        let target = entity("main_0");
        index.insert(target.clone(), vec![1.0, 0.0]);

        let matches = find_similar(&target, &candidates, &index, &AnalysisConfig::default());
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].entity.id, "ref_1");
        assert!(matches[0].similarity > 0.7);
    }

    #[test]
    fn threshold_is_strict_not_inclusive() {
        // Orthogonal vectors give similarity 0.0 exactly; with a 0.0
        // threshold the candidate must still be excluded.
        let config = AnalysisConfig::default().with_similarity_threshold(0.0);
        let (mut index, candidates) = indexed(&[("ref_0", vec![0.0, 1.0])]);
        let target = entity("main_0");
        index.insert(target.clone(), vec![1.0, 0.0]);

        let matches = find_similar(&target, &candidates, &index, &config);
        assert!(matches.is_empty());
    }

    #[test]
    fn results_are_capped_and_descending() {
        let pairs: Vec<(String, Vec<f32>)> = (0..8)
            .map(|i| {
                // Similarities 0.80, 0.81, ... 0.87 in insertion order.
                let s = 0.80 + i as f32 * 0.01;
                (format!("ref_{i}"), vec![s, (1.0 - s * s).sqrt()])
            })
            .collect();

        let mut index = EmbeddingIndex::new();
        let mut candidates = Vec::new();
        for (id, embedding) in &pairs {
            let e = entity(id);
            index.insert(e.clone(), embedding.clone());
            candidates.push(e);
        }
        let target = entity("main_0");
        index.insert(target.clone(), vec![1.0, 0.0]);

        let matches = find_similar(&target, &candidates, &index, &AnalysisConfig::default());
        assert_eq!(matches.len(), 5);
        assert_eq!(matches[0].entity.id, "ref_7");
        for pair in matches.windows(2) {
            assert!(pair[0].similarity >= pair[1].similarity);
        }
        assert!(matches.iter().all(|m| m.similarity > 0.7));
    }

    #[test]
    fn equal_scores_keep_candidate_order() {
        let (mut index, candidates) = indexed(&[
            ("ref_a", vec![1.0, 0.0]),
            ("ref_b", vec![1.0, 0.0]),
            ("ref_c", vec![1.0, 0.0]),
        ]);
        let target = entity("main_0");
        index.insert(target.clone(), vec![1.0, 0.0]);

        let matches = find_similar(&target, &candidates, &index, &AnalysisConfig::default());
        let ids: Vec<_> = matches.iter().map(|m| m.entity.id.as_str()).collect();
        assert_eq!(ids, ["ref_a", "ref_b", "ref_c"]);
    }

    #[test]
    fn unindexed_candidates_are_skipped() {
        let (mut index, mut candidates) = indexed(&[("ref_0", vec![1.0, 0.0])]);
        candidates.push(entity("ref_no_embedding"));
        let target = entity("main_0");
        index.insert(target.clone(), vec![1.0, 0.0]);

        let matches = find_similar(&target, &candidates, &index, &AnalysisConfig::default());
        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].entity.id, "ref_0");
    }
}
