//! Page-level types.

use serde::{Deserialize, Serialize};

/// How a heading candidate was detected.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HeadingSource {
    /// Detected from relative font size
    Font,
    /// Detected from a textual pattern (chapter/numbered-section/all-caps)
    Pattern,
}

/// A heading candidate before hierarchy resolution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeadingCandidate {
    /// Heading text
    pub text: String,

    /// Detected level (1-3), before hierarchy enforcement
    pub level: u8,

    /// Detection mode that produced this candidate
    pub source: HeadingSource,

    /// Originating page (1-indexed)
    pub page: u32,
}

impl HeadingCandidate {
    /// Create a font-detected candidate.
    pub fn font(text: impl Into<String>, level: u8, page: u32) -> Self {
        Self {
            text: text.into(),
            level,
            source: HeadingSource::Font,
            page,
        }
    }

    /// Create a pattern-detected candidate.
    pub fn pattern(text: impl Into<String>, level: u8, page: u32) -> Self {
        Self {
            text: text.into(),
            level,
            source: HeadingSource::Pattern,
            page,
        }
    }
}

/// A heading after hierarchy resolution.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heading {
    /// Effective level (1-3) after hierarchy enforcement
    pub level: u8,

    /// Heading text
    pub text: String,
}

/// The structured output of one page's processing.
///
/// Built once per page and never mutated afterwards; both the Markdown
/// assembler and the chunker consume the same records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageRecord {
    /// Page number (1-indexed)
    pub number: u32,

    /// Paragraph-assembled page text, tables excluded
    pub text: String,

    /// Accepted table markups in page order
    pub tables: Vec<String>,

    /// Resolved headings in page order
    pub headings: Vec<Heading>,

    /// Whether this page's text came from OCR
    pub ocr_applied: bool,
}

impl PageRecord {
    /// Create an empty record for a page.
    pub fn empty(number: u32) -> Self {
        Self {
            number,
            text: String::new(),
            tables: Vec::new(),
            headings: Vec::new(),
            ocr_applied: false,
        }
    }

    /// Check whether the page carries any content.
    pub fn is_empty(&self) -> bool {
        self.text.trim().is_empty() && self.tables.is_empty() && self.headings.is_empty()
    }

    /// Number of non-whitespace characters in the page text.
    pub fn text_density(&self) -> usize {
        self.text.trim().chars().count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_record() {
        let record = PageRecord::empty(4);
        assert_eq!(record.number, 4);
        assert!(record.is_empty());
        assert_eq!(record.text_density(), 0);
    }

    #[test]
    fn test_candidate_constructors() {
        let font = HeadingCandidate::font("Overview", 1, 2);
        assert_eq!(font.source, HeadingSource::Font);
        assert_eq!(font.level, 1);

        let pattern = HeadingCandidate::pattern("1. Introduction", 2, 1);
        assert_eq!(pattern.source, HeadingSource::Pattern);
        assert_eq!(pattern.page, 1);
    }
}
