use serde::Serialize;
use std::fmt;

use crate::types::Chunk;

/// Statistics about a split
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SplitStats {
    pub total_chunks: usize,
    pub total_chars: usize,
    pub total_lines: usize,
    pub largest_chunk_chars: usize,

    /// Chunks whose end sits at brace depth zero
    pub balanced_chunks: usize,

    /// Chunks longer than the char soft cap
    pub oversized_chunks: usize,
}

impl SplitStats {
    #[must_use]
    pub fn from_chunks(chunks: &[Chunk], max_chars: usize) -> Self {
        let non_empty = || chunks.iter().filter(|c| c.char_len() > 0);
        Self {
            total_chunks: chunks.len(),
            total_chars: chunks.iter().map(Chunk::char_len).sum(),
            total_lines: non_empty().map(Chunk::line_count).sum(),
            largest_chunk_chars: chunks.iter().map(Chunk::char_len).max().unwrap_or(0),
            balanced_chunks: chunks.iter().filter(|c| c.depth_out == 0).count(),
            oversized_chunks: chunks.iter().filter(|c| c.char_len() > max_chars).count(),
        }
    }
}

impl fmt::Display for SplitStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Chunks: {} | Chars: {} | Lines: {} | Largest: {} | Balanced: {}/{} | Oversized: {}",
            self.total_chunks,
            self.total_chars,
            self.total_lines,
            self.largest_chunk_chars,
            self.balanced_chunks,
            self.total_chunks,
            self.oversized_chunks
        )
    }
}
