//! Error types for the pagemill library.

use thiserror::Error;

/// Result type alias for pagemill operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Error types that can occur during document reconstruction.
#[derive(Error, Debug)]
pub enum Error {
    /// The content collaborator could not be opened or enumerated at all.
    ///
    /// This is document-fatal: no partial result is returned.
    #[error("Document source error: {0}")]
    Source(String),

    /// A single page's content could not be fetched from the collaborator.
    #[error("Page {page} content error: {message}")]
    PageContent {
        /// Page number (1-indexed)
        page: u32,
        /// Collaborator-supplied failure description
        message: String,
    },

    /// A table-extraction strategy failed on one page.
    #[error("Table extraction failed on page {page}: {message}")]
    TableExtract {
        /// Page number (1-indexed)
        page: u32,
        /// Strategy failure description
        message: String,
    },

    /// OCR recognition failed for one page.
    #[error("OCR failed on page {page}: {message}")]
    Ocr {
        /// Page number (1-indexed)
        page: u32,
        /// Provider failure description
        message: String,
    },

    /// Image analysis failed for one image.
    #[error("Image analysis error: {0}")]
    Vision(String),

    /// Invalid parse configuration.
    #[error("Invalid options: {0}")]
    InvalidOptions(String),

    /// The parse was cancelled through the caller-supplied token.
    #[error("Parse cancelled")]
    Cancelled,

    /// Generic error with message.
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Whether this error aborts the whole document parse.
    ///
    /// Per-unit failures (one table strategy, one page's OCR, one image)
    /// are downgraded to warnings by the engine; only source-level failures
    /// and cancellation propagate.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Error::Source(_) | Error::Cancelled)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = Error::Cancelled;
        assert_eq!(err.to_string(), "Parse cancelled");

        let err = Error::Ocr {
            page: 3,
            message: "engine unavailable".to_string(),
        };
        assert_eq!(err.to_string(), "OCR failed on page 3: engine unavailable");
    }

    #[test]
    fn test_fatal_classification() {
        assert!(Error::Source("corrupt container".to_string()).is_fatal());
        assert!(Error::Cancelled.is_fatal());
        assert!(!Error::Vision("timeout".to_string()).is_fatal());
        assert!(!Error::TableExtract {
            page: 1,
            message: "snap failure".to_string()
        }
        .is_fatal());
    }
}
