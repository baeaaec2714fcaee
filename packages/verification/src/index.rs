//! Run-scoped embedding index and vector math.
//!
//! The index lives for exactly one run and is discarded afterward; the
//! pipeline owns it exclusively, so no interior locking is needed.

use std::collections::HashMap;

use crate::types::entity::Entity;

/// An entity together with its vector representation.
///
/// Created once per entity during indexing, never mutated afterward.
#[derive(Debug, Clone)]
pub struct EmbeddingRecord {
    /// The indexed entity
    pub entity: Entity,

    /// Fixed-length numeric vector for the entity's text
    pub embedding: Vec<f32>,
}

/// In-memory vector index keyed by entity id.
#[derive(Debug, Default)]
pub struct EmbeddingIndex {
    records: HashMap<String, EmbeddingRecord>,
}

impl EmbeddingIndex {
    /// Create an empty index.
    pub fn new() -> Self {
        Self::default()
    }

    /// Store (or overwrite) the record for the entity's id.
    pub fn insert(&mut self, entity: Entity, embedding: Vec<f32>) {
        let id = entity.id.clone();
        self.records.insert(id, EmbeddingRecord { entity, embedding });
    }

    /// Get the record for an entity id.
    pub fn get(&self, id: &str) -> Option<&EmbeddingRecord> {
        self.records.get(id)
    }

    /// Get just the embedding for an entity id.
    pub fn embedding(&self, id: &str) -> Option<&[f32]> {
        self.records.get(id).map(|r| r.embedding.as_slice())
    }

    /// Number of indexed records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the index is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Cosine similarity between two vectors.
///
/// Mismatched lengths, zero vectors, and non-finite results all yield 0
/// rather than NaN.
pub fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }

    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();

    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }

    let similarity = dot / (norm_a * norm_b);
    if similarity.is_finite() {
        similarity
    } else {
        0.0
    }
}

/// Deterministic hashed bag-of-words vector.
///
/// Used when the embedding service fails: each whitespace-delimited
/// lowercased token is hashed into one of `dimensions` buckets and counted,
/// then the vector is L2-normalized (an all-zero vector stays all-zero).
/// Same text always yields a bit-identical vector.
pub fn fallback_vector(text: &str, dimensions: usize) -> Vec<f32> {
    let mut vector = vec![0.0f32; dimensions];
    if dimensions == 0 {
        return vector;
    }

    for token in text.to_lowercase().split_whitespace() {
        let bucket = token_hash(token) as usize % dimensions;
        vector[bucket] += 1.0;
    }

    let magnitude = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
    if magnitude > 0.0 {
        for v in &mut vector {
            *v /= magnitude;
        }
    }
    vector
}

/// Signed 32-bit overflow-wrapping polynomial hash, folded to a
/// non-negative value.
fn token_hash(token: &str) -> u32 {
    let mut hash: i32 = 0;
    for ch in token.chars() {
        hash = hash.wrapping_shl(5).wrapping_sub(hash).wrapping_add(ch as i32);
    }
    hash.unsigned_abs()
}
