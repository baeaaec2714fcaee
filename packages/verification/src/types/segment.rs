//! Segment type - the unit of cross-verification.

use serde::{Deserialize, Serialize};

use crate::types::entity::Entity;

/// A fixed-size contiguous slice of the main document's entity list.
///
/// Created once during cross-verification, read-only afterward.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    /// Identifier derived from the segment's ordinal position (`segment_<n>`)
    pub id: String,

    /// Entities contained in this segment
    pub entities: Vec<Entity>,

    /// Offset of the first entity in the original list
    pub start_index: usize,

    /// Half-open end offset, clamped to the list length
    pub end_index: usize,
}

impl Segment {
    /// Number of entities in the segment.
    pub fn len(&self) -> usize {
        self.entities.len()
    }

    /// Whether the segment holds no entities.
    pub fn is_empty(&self) -> bool {
        self.entities.is_empty()
    }
}
