//! Parse options and configuration.

use crate::error::{Error, Result};
use crate::source::CancelToken;

/// Options for one document parse.
///
/// Everything the pipeline needs is carried here or injected as a provider
/// argument; there is no process-wide state.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Target chunk size in characters
    pub chunk_size: usize,

    /// Overlap between consecutive chunks in characters
    pub chunk_overlap: usize,

    /// Whether to detect headings
    pub detect_headings: bool,

    /// Whether to OCR low-text pages of scanned documents
    pub enable_ocr: bool,

    /// OCR language set, passed through to the provider (e.g. "rus+eng")
    pub ocr_languages: String,

    /// Whether to run vision analysis on embedded images
    pub analyze_images: bool,

    /// Cooperative cancellation handle
    pub cancel: Option<CancelToken>,
}

impl ParseOptions {
    /// Create new parse options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the target chunk size in characters.
    pub fn with_chunk_size(mut self, size: usize) -> Self {
        self.chunk_size = size;
        self
    }

    /// Set the chunk overlap in characters.
    pub fn with_chunk_overlap(mut self, overlap: usize) -> Self {
        self.chunk_overlap = overlap;
        self
    }

    /// Enable or disable heading detection.
    pub fn with_heading_detection(mut self, detect: bool) -> Self {
        self.detect_headings = detect;
        self
    }

    /// Enable OCR with the given language set.
    pub fn with_ocr(mut self, languages: impl Into<String>) -> Self {
        self.enable_ocr = true;
        self.ocr_languages = languages.into();
        self
    }

    /// Enable or disable image analysis.
    pub fn with_image_analysis(mut self, analyze: bool) -> Self {
        self.analyze_images = analyze;
        self
    }

    /// Attach a cancellation token.
    pub fn with_cancel_token(mut self, token: CancelToken) -> Self {
        self.cancel = Some(token);
        self
    }

    /// Validate option consistency before a parse.
    pub fn validate(&self) -> Result<()> {
        if self.chunk_size == 0 {
            return Err(Error::InvalidOptions("chunk_size must be positive".to_string()));
        }
        if self.chunk_overlap >= self.chunk_size {
            return Err(Error::InvalidOptions(format!(
                "chunk_overlap ({}) must be smaller than chunk_size ({})",
                self.chunk_overlap, self.chunk_size
            )));
        }
        Ok(())
    }

    /// Check the cancellation token, if any.
    pub(crate) fn check_cancelled(&self) -> Result<()> {
        match &self.cancel {
            Some(token) if token.is_cancelled() => Err(Error::Cancelled),
            _ => Ok(()),
        }
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self {
            chunk_size: 1500,
            chunk_overlap: 200,
            detect_headings: true,
            enable_ocr: false,
            ocr_languages: "rus+eng".to_string(),
            analyze_images: false,
            cancel: None,
        }
    }
}
