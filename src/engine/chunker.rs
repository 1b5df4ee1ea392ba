//! Rolling-buffer chunking for retrieval indexing.
//!
//! The chunker consumes the same per-page records as the Markdown
//! assembler, so chunk boundaries come from semantic units rather than the
//! rendered document string.

use std::collections::BTreeMap;

use crate::model::{DocumentMetadata, PageRecord, ParsedChunk};

/// How far back from the target a split point may be found.
const SPLIT_WINDOW_BACK: usize = 200;

/// How far past the target a split point may be found.
const SPLIT_WINDOW_AHEAD: usize = 100;

/// Split delimiters in priority order: paragraph break, sentence endings,
/// clause boundary, word boundary.
const SPLIT_DELIMITERS: [&str; 7] = ["\n\n", ".\n", ". ", "? ", "! ", ", ", " "];

/// Builds overlapping chunks from page records in document order.
pub struct Chunker {
    chunk_size: usize,
    overlap: usize,
    buffer: String,
    current_page: u32,
    current_heading: String,
    chunk_index: u32,
    chunks: Vec<ParsedChunk>,
    base_metadata: BTreeMap<String, String>,
}

impl Chunker {
    /// Create a chunker for one document.
    pub fn new(chunk_size: usize, overlap: usize, metadata: &DocumentMetadata) -> Self {
        let mut base_metadata = BTreeMap::new();
        base_metadata.insert("source".to_string(), metadata.source.clone());
        base_metadata.insert("title".to_string(), metadata.title.clone());

        Self {
            chunk_size,
            overlap,
            buffer: String::new(),
            current_page: 1,
            current_heading: metadata.title.clone(),
            chunk_index: 0,
            chunks: Vec::new(),
            base_metadata,
        }
    }

    /// Feed one page into the rolling buffer, emitting any full chunks.
    pub fn push_page(&mut self, page: &PageRecord) {
        if let Some(heading) = page.headings.last() {
            self.current_heading = heading.text.clone();
        }

        let mut text = page.text.clone();
        for table in &page.tables {
            text.push_str("\n\n");
            text.push_str(table);
            text.push_str("\n\n");
        }

        self.buffer.push('\n');
        self.buffer.push_str(&text);
        self.drain(page.number);
    }

    fn drain(&mut self, page_number: u32) {
        while self.buffer.chars().count() >= self.chunk_size {
            let split = find_split_point(&self.buffer, self.chunk_size);
            let split_byte = byte_offset(&self.buffer, split);

            let content = self.buffer[..split_byte].trim();
            if !content.is_empty() {
                self.emit(content.to_string());
            }

            // Rewind by the overlap to seed the next chunk; always make
            // progress even when overlap swallows the whole prefix.
            let rewind = split.saturating_sub(self.overlap).max(1);
            let rewind_byte = byte_offset(&self.buffer, rewind);
            self.buffer.drain(..rewind_byte);
            self.current_page = page_number;
        }
    }

    fn emit(&mut self, content: String) {
        self.chunks.push(ParsedChunk {
            content,
            page_number: self.current_page,
            chunk_index: self.chunk_index,
            heading: self.current_heading.clone(),
            metadata: self.base_metadata.clone(),
        });
        self.chunk_index += 1;
    }

    /// Emit any non-empty remainder and return the chunks.
    pub fn finish(mut self) -> Vec<ParsedChunk> {
        let rest = self.buffer.trim().to_string();
        if !rest.is_empty() {
            self.emit(rest);
        }
        self.chunks
    }
}

/// Locate a split point near `target` (both in characters).
///
/// Searches [target − 200, target + 100] for the rightmost occurrence of
/// each delimiter in priority order; the first delimiter present anywhere
/// in the window wins. Falls back to the raw target offset when the window
/// holds no delimiter at all — a mid-token split is the accepted last
/// resort.
pub fn find_split_point(text: &str, target: usize) -> usize {
    let total = text.chars().count();
    if total <= target {
        return total;
    }

    let start = target.saturating_sub(SPLIT_WINDOW_BACK);
    let end = (target + SPLIT_WINDOW_AHEAD).min(total);

    let start_byte = byte_offset(text, start);
    let end_byte = byte_offset(text, end);
    let window = &text[start_byte..end_byte];

    for delimiter in SPLIT_DELIMITERS {
        if let Some(pos) = window.rfind(delimiter) {
            let chars_before = window[..pos].chars().count();
            // Delimiters are ASCII, so byte length equals char length
            return start + chars_before + delimiter.len();
        }
    }

    target
}

/// Byte offset of the `n`-th character (saturating at the end).
fn byte_offset(text: &str, n: usize) -> usize {
    text.char_indices().nth(n).map_or(text.len(), |(i, _)| i)
}
