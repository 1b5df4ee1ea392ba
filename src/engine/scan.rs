//! Scanned-document classification.

/// Pages with fewer non-whitespace-trimmed characters than this are
/// considered text-empty (image-only).
const LOW_TEXT_THRESHOLD: usize = 100;

/// Whether a page's extracted text is below the density threshold.
pub fn is_low_text(text: &str) -> bool {
    text.trim().chars().count() < LOW_TEXT_THRESHOLD
}

/// Classify a document as scanned: strictly more than half of its pages
/// are text-empty.
pub fn is_scanned_document<'a, I>(page_texts: I) -> bool
where
    I: IntoIterator<Item = &'a str>,
{
    let mut total = 0usize;
    let mut low = 0usize;
    for text in page_texts {
        total += 1;
        if is_low_text(text) {
            low += 1;
        }
    }
    if total == 0 {
        return false;
    }
    let scanned = low * 2 > total;
    if scanned {
        log::debug!("scan classification: {low} of {total} pages below text threshold");
    }
    scanned
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_low_text_threshold() {
        assert!(is_low_text(""));
        assert!(is_low_text("short"));
        assert!(!is_low_text(&"long enough ".repeat(20)));
    }

    #[test]
    fn test_scanned_classification() {
        let body = "x".repeat(200);
        // 2 of 3 pages empty: scanned
        assert!(is_scanned_document(["", "", body.as_str()]));
        // 1 of 2 pages empty: exactly half, not scanned
        assert!(!is_scanned_document(["", body.as_str()]));
        // no pages: not scanned
        assert!(!is_scanned_document(Vec::<&str>::new()));
    }
}
