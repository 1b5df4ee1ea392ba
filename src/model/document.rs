//! Document-level types.

use super::{PageRecord, ParsedChunk};
use serde::{Deserialize, Serialize};

/// Metadata describing the source document.
///
/// Computed once by the engine from the collaborator's document properties
/// and never mutated afterwards.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DocumentMetadata {
    /// Document title (source name stem when the document carries none)
    pub title: String,

    /// Document author ("Unknown" when absent)
    pub author: String,

    /// Document subject (may be empty)
    pub subject: String,

    /// Total number of pages
    pub page_count: u32,

    /// Source identifier (typically the file name)
    pub source: String,

    /// Whether the document carries embedded images
    pub has_images: bool,

    /// Whether the document was classified as a scan
    pub is_scanned: bool,
}

impl DocumentMetadata {
    /// Render the YAML-like frontmatter block emitted after the H1 title.
    ///
    /// Boolean flags appear only when set, matching the reconstruction
    /// output contract.
    pub fn to_frontmatter(&self) -> String {
        let mut lines = vec!["---".to_string()];
        lines.push(format!("author: {}", self.author));
        lines.push(format!("pages: {}", self.page_count));
        lines.push(format!("source: {}", self.source));
        if self.has_images {
            lines.push("has_images: true".to_string());
        }
        if self.is_scanned {
            lines.push("is_scanned: true".to_string());
        }
        lines.push("---\n".to_string());
        lines.join("\n")
    }
}

/// Counters describing filtering decisions made during a parse.
///
/// Exposed so callers can surface data-quality signals without treating
/// them as failures.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QualityMetrics {
    /// Tables accepted into the output
    pub tables_detected: u32,

    /// Table candidates rejected by the acceptance filters
    pub tables_rejected: u32,

    /// Garbage lines dropped from the free-text stream
    pub garbage_lines_filtered: u32,

    /// Tables skipped because an identical markup was already accepted
    pub duplicate_tables_skipped: u32,

    /// Pages rewritten through OCR
    pub ocr_pages: u32,
}

impl QualityMetrics {
    /// Create new empty metrics.
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an accepted table.
    pub fn add_table(&mut self) {
        self.tables_detected += 1;
    }

    /// Record a rejected table candidate.
    pub fn add_rejected_table(&mut self) {
        self.tables_rejected += 1;
    }

    /// Record a filtered garbage line.
    pub fn add_garbage_line(&mut self) {
        self.garbage_lines_filtered += 1;
    }

    /// Record a skipped duplicate table.
    pub fn add_duplicate_table(&mut self) {
        self.duplicate_tables_skipped += 1;
    }

    /// Record an OCR-rewritten page.
    pub fn add_ocr_page(&mut self) {
        self.ocr_pages += 1;
    }
}

/// The complete result of one document parse.
///
/// This is the sole artifact handed to external collaborators; it owns all
/// nested data and is serializable for persistence.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParsedDocument {
    /// Document metadata
    pub metadata: DocumentMetadata,

    /// The assembled Markdown document
    pub markdown: String,

    /// Retrieval chunks in document order
    pub chunks: Vec<ParsedChunk>,

    /// Table of contents: one indented `- title` line per heading
    pub table_of_contents: Vec<String>,

    /// Per-page structured records the Markdown and chunks were built from
    pub pages: Vec<PageRecord>,

    /// Filtering counters
    pub quality_metrics: QualityMetrics,

    /// Human-readable warnings accumulated during the parse
    pub warnings: Vec<String>,
}

impl ParsedDocument {
    /// Get the number of chunks.
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Iterate over every resolved heading in document order.
    pub fn headings(&self) -> impl Iterator<Item = &super::Heading> {
        self.pages.iter().flat_map(|p| p.headings.iter())
    }

    /// Check whether any warnings were recorded.
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }
}
