//! Property tests for the chunk planner

use proptest::prelude::*;

use jshunter_analysis::{CHUNK_FILL_FACTOR, ChunkPlan};

fn source_text() -> impl Strategy<Value = String> {
    // realistic shape: many short-to-medium lines, some empty
    prop::collection::vec("[ -~]{0,60}", 0..200).prop_map(|lines| lines.join("\n"))
}

proptest! {
    /// Joining the slices in order reproduces the input exactly
    #[test]
    fn prop_reconstruction_is_exact(text in source_text(), limit in 8usize..4000) {
        let plan = ChunkPlan::plan(&text, limit);
        prop_assert_eq!(plan.reconstruct(), text);
    }

    /// Every chunk honors the fill budget unless it is a single oversized line
    #[test]
    fn prop_chunks_fit_the_budget(text in source_text(), limit in 8usize..4000) {
        let plan = ChunkPlan::plan(&text, limit);
        if text.len() <= limit {
            return Ok(());
        }
        let budget = (limit as f64 * CHUNK_FILL_FACTOR) as usize;
        for chunk in plan.chunks() {
            prop_assert!(
                chunk.len() <= budget || !chunk.contains('\n'),
                "multi-line chunk of {} chars exceeds budget {}",
                chunk.len(),
                budget
            );
        }
    }

    /// A text within the limit is one chunk, equal to the whole text
    #[test]
    fn prop_fitting_text_is_a_single_chunk(text in source_text()) {
        let limit = text.len() + 1;
        let plan = ChunkPlan::plan(&text, limit);
        prop_assert!(plan.is_single());
        prop_assert_eq!(plan.chunks()[0].as_str(), text);
    }

    /// Planning is deterministic
    #[test]
    fn prop_planning_is_deterministic(text in source_text(), limit in 8usize..4000) {
        prop_assert_eq!(ChunkPlan::plan(&text, limit), ChunkPlan::plan(&text, limit));
    }

    /// Slices are line-aligned: no chunk boundary splits a line
    #[test]
    fn prop_chunks_are_line_aligned(text in source_text(), limit in 8usize..4000) {
        let plan = ChunkPlan::plan(&text, limit);
        let original: Vec<&str> = text.split('\n').collect();
        let mut rejoined: Vec<&str> = Vec::new();
        for chunk in plan.chunks() {
            rejoined.extend(chunk.split('\n'));
        }
        prop_assert_eq!(rejoined, original);
    }
}
