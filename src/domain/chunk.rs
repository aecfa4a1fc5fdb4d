//! Chunk planning for oversized sources
//!
//! Splits a source text into line-aligned slices that each fit one model
//! call's context budget. Slices never break a line; joining them back with
//! newlines reconstructs the input exactly. Planning is pure and
//! deterministic.

/// Fraction of the context limit a chunk may fill, leaving headroom for the
/// prompt template and the completion.
pub const CHUNK_FILL_FACTOR: f64 = 0.8;

/// An ordered sequence of disjoint, line-aligned slices of one source text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkPlan {
    chunks: Vec<String>,
}

impl ChunkPlan {
    /// Split `text` so that every chunk fits `limit × CHUNK_FILL_FACTOR`
    /// characters, counting the newlines joining its lines.
    ///
    /// A text no longer than `limit` is returned as a single chunk. A single
    /// line longer than the budget cannot be split further and becomes its
    /// own oversized chunk.
    pub fn plan(text: &str, limit: usize) -> Self {
        if text.len() <= limit {
            return Self {
                chunks: vec![text.to_string()],
            };
        }

        let budget = (limit as f64 * CHUNK_FILL_FACTOR) as usize;
        let mut chunks = Vec::new();
        let mut current = String::new();
        let mut current_lines = 0usize;

        for line in text.split('\n') {
            // +1 for the newline that would join this line onto the chunk
            let added = if current_lines == 0 {
                line.len()
            } else {
                line.len() + 1
            };

            if current_lines > 0 && current.len() + added > budget {
                chunks.push(std::mem::take(&mut current));
                current_lines = 0;
            }

            if current_lines > 0 {
                current.push('\n');
            }
            current.push_str(line);
            current_lines += 1;
        }

        if current_lines > 0 {
            chunks.push(current);
        }

        Self { chunks }
    }

    /// The planned slices, in source order
    pub fn chunks(&self) -> &[String] {
        &self.chunks
    }

    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Whether the plan degenerates to the whole text (single-shot path)
    pub fn is_single(&self) -> bool {
        self.chunks.len() == 1
    }

    /// Rejoin the slices; equals the planned text exactly
    pub fn reconstruct(&self) -> String {
        self.chunks.join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_small_text_is_single_chunk() {
        let text = "const a = 1;\nconst b = 2;\nconst c = 3;";
        let plan = ChunkPlan::plan(text, 1_000_000);
        assert!(plan.is_single());
        assert_eq!(plan.chunks()[0], text);
    }

    #[test]
    fn test_oversized_text_splits_on_lines() {
        let lines: Vec<String> = (0..100).map(|i| format!("var line_{:04} = {};", i, i)).collect();
        let text = lines.join("\n");
        let plan = ChunkPlan::plan(&text, 500);

        assert!(plan.len() > 1);
        let budget = (500.0 * CHUNK_FILL_FACTOR) as usize;
        for chunk in plan.chunks() {
            assert!(chunk.len() <= budget, "chunk of {} chars over budget", chunk.len());
            // line-aligned: every chunk starts at a line boundary
            assert!(chunk.starts_with("var "));
        }
    }

    #[test]
    fn test_reconstruction_is_exact() {
        let text = "a\n\nbb\nccc\n";
        let plan = ChunkPlan::plan(text, 4);
        assert_eq!(plan.reconstruct(), text);
    }

    #[test]
    fn test_pathological_line_becomes_own_chunk() {
        let long_line = "x".repeat(300);
        let text = format!("short\n{}\nshort", long_line);
        let plan = ChunkPlan::plan(&text, 100);

        assert!(plan.chunks().iter().any(|c| c.len() == 300));
        assert_eq!(plan.reconstruct(), text);
    }

    #[test]
    fn test_deterministic() {
        let text: String = (0..50).map(|i| format!("line {}\n", i)).collect();
        let first = ChunkPlan::plan(&text, 80);
        let second = ChunkPlan::plan(&text, 80);
        assert_eq!(first, second);
    }
}
