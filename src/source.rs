//! Collaborator interfaces and the typed inputs they supply.
//!
//! The engine never touches PDF bytes. Glyph decoding, table cell
//! detection, rasterization, OCR, and vision analysis all live behind the
//! traits in this module; capabilities the caller does not configure
//! default to absent rather than being probed for at runtime.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::error::Result;

/// Axis-aligned bounding box in page coordinates (top-left origin, units as
/// supplied by the extraction collaborator).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    /// Left edge
    pub x0: f32,
    /// Top edge
    pub top: f32,
    /// Right edge
    pub x1: f32,
    /// Bottom edge
    pub bottom: f32,
}

impl BoundingBox {
    /// Create a new bounding box.
    pub fn new(x0: f32, top: f32, x1: f32, bottom: f32) -> Self {
        Self { x0, top, x1, bottom }
    }

    /// Open-interval overlap on both axes.
    ///
    /// Boxes that merely share an edge do not overlap; a run sitting flush
    /// against a table border stays in the free-text stream.
    pub fn overlaps(&self, other: &BoundingBox) -> bool {
        self.x0 < other.x1 && self.x1 > other.x0 && self.top < other.bottom && self.bottom > other.top
    }
}

/// A fragment of extracted text with geometry and font metrics.
///
/// Owned by the page content extractor for one page's processing.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextRun {
    /// The text content
    pub text: String,

    /// Originating page (1-indexed)
    pub page: u32,

    /// Font size in points
    pub font_size: f32,

    /// Position on the page
    pub bbox: BoundingBox,
}

impl TextRun {
    /// Create a new text run.
    pub fn new(text: impl Into<String>, page: u32, font_size: f32, bbox: BoundingBox) -> Self {
        Self {
            text: text.into(),
            page,
            font_size,
            bbox,
        }
    }
}

/// Raw extraction data for one page.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PageContent {
    /// Page number (1-indexed)
    pub number: u32,

    /// Extracted text runs in collaborator order
    pub runs: Vec<TextRun>,

    /// Bounding boxes of tables already detected on this page
    pub table_regions: Vec<BoundingBox>,
}

impl PageContent {
    /// Create page content with no tables.
    pub fn new(number: u32, runs: Vec<TextRun>) -> Self {
        Self {
            number,
            runs,
            table_regions: Vec::new(),
        }
    }

    /// Attach detected table regions.
    pub fn with_table_regions(mut self, regions: Vec<BoundingBox>) -> Self {
        self.table_regions = regions;
        self
    }
}

/// A named table-extraction geometry strategy.
///
/// Strategies are tried in the order returned by [`TableStrategy::cascade`];
/// the first one yielding a non-empty table wins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TableStrategy {
    /// Explicit ruled lines
    RuledLines,
    /// Ruled lines with tighter snap tolerance
    StrictRuledLines,
    /// Text-alignment inference
    TextAlignment,
}

impl TableStrategy {
    /// Strategies in priority order.
    pub fn cascade() -> [TableStrategy; 3] {
        [
            TableStrategy::RuledLines,
            TableStrategy::StrictRuledLines,
            TableStrategy::TextAlignment,
        ]
    }
}

impl fmt::Display for TableStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            TableStrategy::RuledLines => "ruled_lines",
            TableStrategy::StrictRuledLines => "strict_ruled_lines",
            TableStrategy::TextAlignment => "text_alignment",
        };
        f.write_str(name)
    }
}

/// A candidate table: a grid of cell strings extracted under one strategy.
///
/// Rows may be jagged; the renderer pads them to header width. Candidates
/// are subject to acceptance filtering before reaching the output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TableGrid {
    /// Cell contents, row-major
    pub rows: Vec<Vec<String>>,

    /// Table region on the page, when known
    pub bbox: Option<BoundingBox>,

    /// Strategy that produced this candidate
    pub strategy: TableStrategy,
}

impl TableGrid {
    /// Create a grid from rows.
    pub fn new(rows: Vec<Vec<String>>, strategy: TableStrategy) -> Self {
        Self {
            rows,
            bbox: None,
            strategy,
        }
    }

    /// Attach the table's page region.
    pub fn with_bbox(mut self, bbox: BoundingBox) -> Self {
        self.bbox = Some(bbox);
        self
    }

    /// Total non-whitespace characters across all cells.
    pub fn content_len(&self) -> usize {
        self.rows
            .iter()
            .flat_map(|row| row.iter())
            .map(|cell| cell.chars().filter(|c| !c.is_whitespace()).count())
            .sum()
    }
}

/// An embedded image surfaced for vision analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageImage {
    /// Originating page (1-indexed)
    pub page: u32,

    /// Position of the image on the page
    pub index: u32,

    /// Encoded image bytes (format per the collaborator)
    pub bytes: Vec<u8>,
}

/// What a vision provider decided an image is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ImageKind {
    /// A formula or equation
    Formula,
    /// A schematic or flow diagram
    Diagram,
    /// A figure, photo, or labeled illustration
    Illustration,
}

/// Result of analyzing one image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageAnalysis {
    /// Image classification
    pub kind: ImageKind,

    /// Textual description to place into the Markdown stream
    pub description: String,
}

/// Document-level properties from the content collaborator.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SourceMetadata {
    /// Document title (may be empty)
    pub title: String,

    /// Document author (may be empty)
    pub author: String,

    /// Document subject (may be empty)
    pub subject: String,

    /// Source identifier, typically the file name
    pub source: String,

    /// Total number of pages
    pub page_count: u32,
}

/// The per-page content collaborator.
///
/// A failing [`metadata`](DocumentSource::metadata) call is document-fatal
/// (the container cannot be opened); every other method's failure degrades
/// to a warning for that unit.
pub trait DocumentSource {
    /// Document-level properties, including the page count.
    fn metadata(&self) -> Result<SourceMetadata>;

    /// Raw extraction data for one page (1-indexed).
    fn page(&self, number: u32) -> Result<PageContent>;

    /// Re-extract table contents under a named strategy.
    fn extract_tables(&self, number: u32, strategy: TableStrategy) -> Result<Vec<TableGrid>>;

    /// Alternate-decoder fallback for pages with encoding anomalies.
    ///
    /// Returns `Ok(None)` when no alternate decoder is available.
    fn reextract_text(&self, _number: u32) -> Result<Option<String>> {
        Ok(None)
    }

    /// Embedded images for one page. Sources without image support return
    /// an empty list.
    fn page_images(&self, _number: u32) -> Result<Vec<PageImage>> {
        Ok(Vec::new())
    }
}

/// OCR collaborator, invoked only for low-text pages of a scanned document.
pub trait OcrProvider {
    /// Rasterize and recognize one page.
    fn recognize(&self, page_number: u32, languages: &str) -> Result<String>;
}

/// Vision-analysis collaborator for embedded images.
pub trait VisionProvider {
    /// Classify and describe one image, given the nearest heading as
    /// context.
    fn analyze(&self, image: &[u8], context_heading: &str) -> Result<ImageAnalysis>;
}

/// Cooperative cancellation handle for one parse call.
///
/// Checked at page boundaries and before each external collaborator call;
/// a cancelled parse fails with [`Error::Cancelled`](crate::Error::Cancelled)
/// and returns no partial result.
#[derive(Debug, Clone, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
}

impl CancelToken {
    /// Create a new, un-cancelled token.
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation. Safe to call from another thread.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    /// Check whether cancellation was requested.
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bbox_open_interval_overlap() {
        let a = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
        let b = BoundingBox::new(5.0, 5.0, 15.0, 15.0);
        assert!(a.overlaps(&b));

        // Shared edge only: no overlap
        let c = BoundingBox::new(10.0, 0.0, 20.0, 10.0);
        assert!(!a.overlaps(&c));

        let d = BoundingBox::new(30.0, 30.0, 40.0, 40.0);
        assert!(!a.overlaps(&d));
    }

    #[test]
    fn test_strategy_cascade_order() {
        let cascade = TableStrategy::cascade();
        assert_eq!(cascade[0], TableStrategy::RuledLines);
        assert_eq!(cascade[1], TableStrategy::StrictRuledLines);
        assert_eq!(cascade[2], TableStrategy::TextAlignment);
    }

    #[test]
    fn test_table_grid_content_len() {
        let grid = TableGrid::new(
            vec![
                vec!["Name".to_string(), "Age".to_string()],
                vec!["Alice ".to_string(), " 30".to_string()],
            ],
            TableStrategy::RuledLines,
        );
        assert_eq!(grid.content_len(), 14);
    }

    #[test]
    fn test_cancel_token() {
        let token = CancelToken::new();
        assert!(!token.is_cancelled());

        let shared = token.clone();
        shared.cancel();
        assert!(token.is_cancelled());
    }
}
