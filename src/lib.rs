//! # pagemill
//!
//! Document reconstruction engine for extracted PDF content.
//!
//! pagemill turns typed, per-page extraction data (text runs with font
//! metrics, candidate table grids) into a hierarchically-headed Markdown
//! document plus a sequence of overlapping text chunks for
//! retrieval-augmented-generation indexing. PDF byte decoding, OCR, and
//! vision analysis stay behind collaborator traits supplied by the caller;
//! the crate owns only the heuristic reconstruction pipeline and performs
//! no file or network I/O of its own.
//!
//! ## Quick Start
//!
//! ```
//! use pagemill::source::{
//!     BoundingBox, DocumentSource, PageContent, SourceMetadata, TableGrid, TableStrategy,
//!     TextRun,
//! };
//! use pagemill::{parse_document, ParseOptions, Result};
//!
//! struct SinglePage;
//!
//! impl DocumentSource for SinglePage {
//!     fn metadata(&self) -> Result<SourceMetadata> {
//!         Ok(SourceMetadata {
//!             title: "Demo".to_string(),
//!             source: "demo.pdf".to_string(),
//!             page_count: 1,
//!             ..Default::default()
//!         })
//!     }
//!
//!     fn page(&self, number: u32) -> Result<PageContent> {
//!         let run = TextRun::new(
//!             "Hello from a PDF page.",
//!             number,
//!             12.0,
//!             BoundingBox::new(72.0, 72.0, 300.0, 84.0),
//!         );
//!         Ok(PageContent::new(number, vec![run]))
//!     }
//!
//!     fn extract_tables(&self, _number: u32, _strategy: TableStrategy) -> Result<Vec<TableGrid>> {
//!         Ok(Vec::new())
//!     }
//! }
//!
//! fn main() -> Result<()> {
//!     let doc = parse_document(&SinglePage, &ParseOptions::default())?;
//!     assert!(doc.markdown.starts_with("# Demo"));
//!     assert_eq!(doc.chunks.len(), 1);
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Structure recovery**: headings from font size or textual patterns,
//!   with a hierarchy that never skips a level
//! - **Table handling**: strategy cascade, noise/fragment filtering,
//!   Markdown rendering, duplicate suppression
//! - **Scan awareness**: text-density classification with optional OCR
//!   merge-back
//! - **RAG chunking**: bounded, overlapping chunks aligned to sentence and
//!   paragraph boundaries
//! - **Capability injection**: OCR and vision analysis as traits, absent by
//!   default

pub mod engine;
pub mod error;
pub mod model;
pub mod render;
pub mod source;

pub use engine::{DocumentEngine, ParseOptions};
pub use error::{Error, Result};
pub use model::{
    DocumentMetadata, Heading, HeadingCandidate, HeadingSource, PageRecord, ParsedChunk,
    ParsedDocument, QualityMetrics,
};
pub use source::{CancelToken, DocumentSource, OcrProvider, VisionProvider};

/// Parse a document with the given options and no external capabilities.
///
/// Shorthand for [`DocumentEngine::new`] followed by
/// [`parse`](DocumentEngine::parse); use the engine directly to inject OCR
/// or vision providers.
pub fn parse_document<S: DocumentSource + ?Sized>(
    source: &S,
    options: &ParseOptions,
) -> Result<ParsedDocument> {
    DocumentEngine::new(options.clone()).parse(source)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::{BoundingBox, PageContent, SourceMetadata, TableGrid, TableStrategy, TextRun};

    struct TinySource;

    impl DocumentSource for TinySource {
        fn metadata(&self) -> Result<SourceMetadata> {
            Ok(SourceMetadata {
                title: "Tiny".to_string(),
                author: "Someone".to_string(),
                source: "tiny.pdf".to_string(),
                page_count: 1,
                ..Default::default()
            })
        }

        fn page(&self, number: u32) -> Result<PageContent> {
            let run = TextRun::new(
                "A perfectly ordinary sentence of body text lives here, long enough to count as a digital page for the classifier.",
                number,
                11.0,
                BoundingBox::new(70.0, 100.0, 500.0, 111.0),
            );
            Ok(PageContent::new(number, vec![run]))
        }

        fn extract_tables(&self, _number: u32, _strategy: TableStrategy) -> Result<Vec<TableGrid>> {
            Ok(Vec::new())
        }
    }

    #[test]
    fn test_parse_document_end_to_end() {
        let doc = parse_document(&TinySource, &ParseOptions::default()).unwrap();

        assert_eq!(doc.metadata.title, "Tiny");
        assert_eq!(doc.metadata.author, "Someone");
        assert!(doc.markdown.starts_with("# Tiny\n"));
        assert!(doc.markdown.contains("<!-- page 1 -->"));
        assert_eq!(doc.chunks.len(), 1);
        assert_eq!(doc.chunks[0].heading, "Tiny");
        assert!(doc.warnings.is_empty());
    }

    #[test]
    fn test_parsed_document_serializes() {
        let doc = parse_document(&TinySource, &ParseOptions::default()).unwrap();

        let json = serde_json::to_string(&doc).unwrap();
        let restored: ParsedDocument = serde_json::from_str(&json).unwrap();
        assert_eq!(restored.markdown, doc.markdown);
        assert_eq!(restored.chunks.len(), doc.chunks.len());
    }

    #[test]
    fn test_invalid_options_fail_before_source_access() {
        let options = ParseOptions::new().with_chunk_size(10).with_chunk_overlap(10);
        let result = parse_document(&TinySource, &options);
        assert!(matches!(result, Err(Error::InvalidOptions(_))));
    }
}
