//! The document reconstruction pipeline.
//!
//! Pages are processed strictly in order: the heading hierarchy tracker and
//! the chunk buffer both carry cross-page state. All mutable per-parse
//! state is created inside [`DocumentEngine::parse`], so one engine can
//! serve concurrent parses of different documents.

mod chunker;
mod content;
mod heading;
mod options;
mod paragraph;
mod scan;
mod table;

pub use chunker::{find_split_point, Chunker};
pub use content::{
    filter_garbage_lines, group_runs_into_lines, is_garbage_line, normalize_text,
    replacement_ratio, VisualLine,
};
pub use heading::{detect_by_font, detect_by_pattern, detect_headings, looks_like_heading, HeadingTracker};
pub use options::ParseOptions;
pub use paragraph::assemble_paragraphs;
pub use scan::{is_low_text, is_scanned_document};
pub use table::{broken_grid_reason, extract_with_strategies, render_table};

use std::collections::{BTreeMap, HashSet};

use crate::error::{Error, Result};
use crate::model::{
    DocumentMetadata, Heading, HeadingCandidate, PageRecord, ParsedDocument, QualityMetrics,
};
use crate::render;
use crate::source::{DocumentSource, OcrProvider, PageContent, PageImage, VisionProvider};

/// Threshold of replacement characters above which the alternate decoder
/// is consulted.
const ENCODING_ANOMALY_RATIO: f32 = 0.1;

/// The reconstruction engine: options plus injected capabilities.
///
/// Capabilities the caller does not inject are simply absent; the engine
/// never probes for them.
pub struct DocumentEngine<'a> {
    options: ParseOptions,
    ocr: Option<&'a dyn OcrProvider>,
    vision: Option<&'a dyn VisionProvider>,
}

/// Mutable state scoped to exactly one parse call.
#[derive(Default)]
struct ParseRun {
    warnings: Vec<String>,
    metrics: QualityMetrics,
    seen_tables: HashSet<String>,
}

/// Per-page intermediate state, frozen into a [`PageRecord`] once the
/// scan/OCR branch has settled.
struct PageDraft {
    number: u32,
    text: String,
    tables: Vec<String>,
    candidates: Vec<HeadingCandidate>,
    ocr_applied: bool,
}

impl PageDraft {
    fn empty(number: u32) -> Self {
        Self {
            number,
            text: String::new(),
            tables: Vec::new(),
            candidates: Vec::new(),
            ocr_applied: false,
        }
    }
}

impl<'a> DocumentEngine<'a> {
    /// Create an engine with the given options and no external
    /// capabilities.
    pub fn new(options: ParseOptions) -> Self {
        Self {
            options,
            ocr: None,
            vision: None,
        }
    }

    /// Inject an OCR provider.
    pub fn with_ocr(mut self, provider: &'a dyn OcrProvider) -> Self {
        self.ocr = Some(provider);
        self
    }

    /// Inject a vision provider for image analysis.
    pub fn with_vision(mut self, provider: &'a dyn VisionProvider) -> Self {
        self.vision = Some(provider);
        self
    }

    /// Parse one document into a [`ParsedDocument`].
    ///
    /// Fails only on invalid options, an unreadable source, or
    /// cancellation; every per-unit failure degrades to a warning on the
    /// result.
    pub fn parse<S: DocumentSource + ?Sized>(&self, source: &S) -> Result<ParsedDocument> {
        self.options.validate()?;
        let mut run = ParseRun::default();

        let src_meta = source.metadata().map_err(|e| match e {
            Error::Source(_) => e,
            other => Error::Source(other.to_string()),
        })?;

        let mut metadata = DocumentMetadata {
            title: effective_title(&src_meta.title, &src_meta.source),
            author: if src_meta.author.trim().is_empty() {
                "Unknown".to_string()
            } else {
                src_meta.author.clone()
            },
            subject: src_meta.subject.clone(),
            page_count: src_meta.page_count,
            source: src_meta.source.clone(),
            has_images: false,
            is_scanned: false,
        };

        let vision = self.configured_vision(&mut run);

        // Pass 1: per-page extraction
        let mut drafts: Vec<PageDraft> = Vec::with_capacity(metadata.page_count as usize);
        for number in 1..=metadata.page_count {
            self.options.check_cancelled()?;
            let draft = match source.page(number) {
                Ok(page) => self.process_page(source, &page, &mut run),
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    run.warnings
                        .push(format!("Page {number} could not be read: {e}"));
                    PageDraft::empty(number)
                }
            };
            drafts.push(draft);
        }

        // Scan classification and the OCR branch
        if scan::is_scanned_document(drafts.iter().map(|d| d.text.as_str())) {
            metadata.is_scanned = true;
            self.apply_ocr(&mut drafts, &mut run)?;
        }

        // Embedded images, fetched only when analysis is active
        let images = self.collect_images(source, &metadata, vision, &mut run)?;
        metadata.has_images = images.values().any(|v| !v.is_empty());

        // Hierarchy resolution freezes the page records
        let pages = resolve_pages(drafts, &mut HeadingTracker::new());

        let markdown = render::assemble_markdown(
            &metadata,
            &pages,
            &images,
            vision,
            &mut run.warnings,
        );
        let table_of_contents = render::extract_toc(&markdown);

        let mut chunker = Chunker::new(self.options.chunk_size, self.options.chunk_overlap, &metadata);
        for page in &pages {
            chunker.push_page(page);
        }
        let chunks = chunker.finish();

        Ok(ParsedDocument {
            metadata,
            markdown,
            chunks,
            table_of_contents,
            pages,
            quality_metrics: run.metrics,
            warnings: run.warnings,
        })
    }

    /// Resolve the vision capability against the `analyze_images` flag.
    fn configured_vision(&self, run: &mut ParseRun) -> Option<&'a dyn VisionProvider> {
        if !self.options.analyze_images {
            return None;
        }
        if self.vision.is_none() {
            run.warnings
                .push("Image analysis requested but no vision provider is configured".to_string());
        }
        self.vision
    }

    fn process_page<S: DocumentSource + ?Sized>(
        &self,
        source: &S,
        page: &PageContent,
        run: &mut ParseRun,
    ) -> PageDraft {
        let number = page.number;

        // Free text: runs outside table regions only
        let outside = content::runs_outside_tables(page);
        let lines = content::group_runs_into_lines(&outside);
        let mut text = content::lines_to_text(&lines);

        // Encoding anomalies: consult the alternate decoder
        if content::replacement_ratio(&text) > ENCODING_ANOMALY_RATIO {
            match source.reextract_text(number) {
                Ok(Some(recovered)) => text = recovered,
                Ok(None) => run.warnings.push(format!(
                    "Page {number} has encoding artifacts and no alternate decoder is available"
                )),
                Err(e) => run
                    .warnings
                    .push(format!("Alternate decoding failed on page {number}: {e}")),
            }
        }

        let text = content::normalize_text(&text);
        let (text, garbage) = content::filter_garbage_lines(&text);
        run.metrics.garbage_lines_filtered += garbage;
        let text = paragraph::assemble_paragraphs(&text);

        // Tables: strategy cascade, then acceptance filtering and
        // document-level dedup
        let mut tables = Vec::new();
        for grid in table::extract_with_strategies(source, number, &mut run.warnings) {
            match table::render_table(&grid) {
                Ok(markup) => {
                    if run.seen_tables.insert(markup.clone()) {
                        run.metrics.add_table();
                        tables.push(markup);
                    } else {
                        log::debug!("page {number}: skipping duplicate table");
                        run.metrics.add_duplicate_table();
                    }
                }
                Err(reason) => {
                    log::debug!("page {number}: rejecting table candidate: {reason}");
                    run.metrics.add_rejected_table();
                }
            }
        }

        // Headings, from the full run set (tables included, as printed)
        let candidates = if self.options.detect_headings {
            let full_lines = content::group_runs_into_lines(&page.runs);
            let full_text = content::lines_to_text(&full_lines);
            heading::detect_headings(page, &full_text)
        } else {
            Vec::new()
        };

        PageDraft {
            number,
            text,
            tables,
            candidates,
            ocr_applied: false,
        }
    }

    /// Re-extract low-text pages through OCR, when enabled and available.
    fn apply_ocr(&self, drafts: &mut [PageDraft], run: &mut ParseRun) -> Result<()> {
        if !self.options.enable_ocr {
            run.warnings
                .push("Document appears to be scanned but OCR is disabled".to_string());
            return Ok(());
        }
        let Some(provider) = self.ocr else {
            run.warnings
                .push("OCR enabled but no OCR provider is configured".to_string());
            return Ok(());
        };

        for draft in drafts.iter_mut() {
            if !scan::is_low_text(&draft.text) {
                continue;
            }
            self.options.check_cancelled()?;
            match provider.recognize(draft.number, &self.options.ocr_languages) {
                Ok(recognized) if !recognized.trim().is_empty() => {
                    draft.text = paragraph::assemble_paragraphs(&recognized);
                    draft.ocr_applied = true;
                    run.metrics.add_ocr_page();
                }
                Ok(_) => {}
                Err(e) => run
                    .warnings
                    .push(format!("OCR failed on page {}: {e}", draft.number)),
            }
        }
        Ok(())
    }

    /// Fetch embedded images per page when vision analysis is active.
    fn collect_images<S: DocumentSource + ?Sized>(
        &self,
        source: &S,
        metadata: &DocumentMetadata,
        vision: Option<&dyn VisionProvider>,
        run: &mut ParseRun,
    ) -> Result<BTreeMap<u32, Vec<PageImage>>> {
        let mut images = BTreeMap::new();
        if vision.is_none() {
            return Ok(images);
        }

        for number in 1..=metadata.page_count {
            self.options.check_cancelled()?;
            match source.page_images(number) {
                Ok(found) if !found.is_empty() => {
                    images.insert(number, found);
                }
                Ok(_) => {}
                Err(e) => run
                    .warnings
                    .push(format!("Image extraction failed on page {number}: {e}")),
            }
        }
        Ok(images)
    }
}

/// Apply hierarchy enforcement in document order and freeze the drafts.
fn resolve_pages(drafts: Vec<PageDraft>, tracker: &mut HeadingTracker) -> Vec<PageRecord> {
    drafts
        .into_iter()
        .map(|draft| {
            let headings = draft
                .candidates
                .iter()
                .map(|candidate| Heading {
                    level: tracker.resolve(candidate.level),
                    text: candidate.text.clone(),
                })
                .collect();
            PageRecord {
                number: draft.number,
                text: draft.text,
                tables: draft.tables,
                headings,
                ocr_applied: draft.ocr_applied,
            }
        })
        .collect()
}

/// Title fallback: the source name without its extension, then a fixed
/// placeholder.
fn effective_title(title: &str, source: &str) -> String {
    let title = title.trim();
    if !title.is_empty() {
        return title.to_string();
    }
    let stem = source.rsplit('/').next().unwrap_or(source);
    let stem = stem.rsplit_once('.').map_or(stem, |(s, _)| s).trim();
    if stem.is_empty() {
        "Untitled".to_string()
    } else {
        stem.to_string()
    }
}
