//! Segmentation of the main document's entity list.

use crate::types::{entity::Entity, segment::Segment};

/// Split an entity list into fixed-size ordered segments.
///
/// Segments partition the list exactly: no gaps, no overlaps, no
/// duplicates. The last segment may be shorter; an empty list produces no
/// segments. Purely deterministic.
pub fn segment_entities(entities: &[Entity], segment_size: usize) -> Vec<Segment> {
    let size = segment_size.max(1);
    let mut segments = Vec::with_capacity(entities.len().div_ceil(size));

    for (index, chunk) in entities.chunks(size).enumerate() {
        let start_index = index * size;
        segments.push(Segment {
            id: format!("segment_{index}"),
            entities: chunk.to_vec(),
            start_index,
            end_index: (start_index + size).min(entities.len()),
        });
    }

    segments
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::entity::EntityKind;
    use proptest::prelude::*;

    fn entities(count: usize) -> Vec<Entity> {
        (0..count)
            .map(|i| Entity::new(format!("entity_{i}"), format!("text {i}"), EntityKind::Concept))
            .collect()
    }

    #[test]
    fn empty_list_produces_no_segments() {
        assert!(segment_entities(&[], 20).is_empty());
    }

    #[test]
    fn exact_multiple_splits_evenly() {
        let segments = segment_entities(&entities(40), 20);
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].id, "segment_0");
        assert_eq!(segments[1].id, "segment_1");
        assert_eq!(segments[0].start_index, 0);
        assert_eq!(segments[0].end_index, 20);
        assert_eq!(segments[1].start_index, 20);
        assert_eq!(segments[1].end_index, 40);
    }

    #[test]
    fn last_segment_may_be_shorter() {
        let segments = segment_entities(&entities(45), 20);
        assert_eq!(segments.len(), 3);
        assert_eq!(segments[2].len(), 5);
        assert_eq!(segments[2].start_index, 40);
        assert_eq!(segments[2].end_index, 45);
    }

    proptest! {
        #[test]
        fn segments_partition_the_list(count in 0usize..200, size in 1usize..40) {
            let all = entities(count);
            let segments = segment_entities(&all, size);

            // ceil(N/size) segments, 0 for N=0.
            prop_assert_eq!(segments.len(), count.div_ceil(size));

            let rebuilt: Vec<_> = segments
                .iter()
                .flat_map(|s| s.entities.iter().cloned())
                .collect();
            prop_assert_eq!(rebuilt, all);

            for (i, segment) in segments.iter().enumerate() {
                prop_assert_eq!(&segment.id, &format!("segment_{}", i));
                prop_assert_eq!(segment.end_index - segment.start_index, segment.len());
                if i > 0 {
                    prop_assert_eq!(segment.start_index, segments[i - 1].end_index);
                }
            }
        }
    }
}
