//! Retrieval chunk types.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// A bounded span of document text with overlap to its neighbor, used for
/// downstream retrieval indexing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedChunk {
    /// Chunk text
    pub content: String,

    /// Page where the chunk starts (1-indexed)
    pub page_number: u32,

    /// 0-based position in document order, strictly increasing
    pub chunk_index: u32,

    /// Nearest preceding heading text (document title when none seen yet)
    pub heading: String,

    /// Caller-facing metadata (source file, document title)
    pub metadata: BTreeMap<String, String>,
}

impl ParsedChunk {
    /// Chunk length in characters.
    pub fn char_count(&self) -> usize {
        self.content.chars().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_char_count() {
        let chunk = ParsedChunk {
            content: "привет".to_string(),
            page_number: 1,
            chunk_index: 0,
            heading: String::new(),
            metadata: BTreeMap::new(),
        };
        assert_eq!(chunk.char_count(), 6);
        assert_ne!(chunk.content.len(), 6);
    }
}
