//! Heading detection and hierarchy tracking.
//!
//! Two detection modes per page: relative font size (preferred) and textual
//! patterns (fallback when no font metrics are available or nothing stands
//! out typographically). Detected levels are then forced through the
//! hierarchy tracker so the document can only deepen one level at a time.

use regex::Regex;

use super::content::group_runs_into_lines;
use crate::model::HeadingCandidate;
use crate::source::{PageContent, TextRun};

/// Headings must be at least this many characters.
const MIN_HEADING_CHARS: usize = 3;

/// Headings must be at most this many characters.
const MAX_HEADING_CHARS: usize = 200;

/// Font-size ratios over the page baseline for levels 1-3.
const H1_RATIO: f32 = 1.5;
const H2_RATIO: f32 = 1.2;
const H3_RATIO: f32 = 1.1;

/// Numbered remainders longer than this read as list items, not headings.
const MAX_NUMBERED_REMAINDER: usize = 60;

/// Enforces monotonic heading-level transitions for one document parse.
///
/// Holds a single counter: the hierarchy may deepen by exactly one level
/// per step, never skip (an H1 followed by a detected H3 is coerced to H2).
#[derive(Debug, Default)]
pub struct HeadingTracker {
    last_level: u8,
}

impl HeadingTracker {
    /// Create a fresh tracker (state belongs to exactly one parse).
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve a detected level into an effective level and advance.
    pub fn resolve(&mut self, detected_level: u8) -> u8 {
        let effective = detected_level.min(self.last_level + 1).max(1);
        self.last_level = effective;
        effective
    }
}

/// Detect heading candidates for one page.
///
/// Font-based detection runs first; pattern matching is the fallback when
/// the page has no font metrics or nothing stands out by size.
pub fn detect_headings(content: &PageContent, raw_text: &str) -> Vec<HeadingCandidate> {
    let by_font = detect_by_font(&content.runs, content.number);
    if !by_font.is_empty() {
        return by_font;
    }
    detect_by_pattern(raw_text, content.number)
}

/// Font-based detection: lines noticeably larger than the page's modal
/// font size.
pub fn detect_by_font(runs: &[TextRun], page: u32) -> Vec<HeadingCandidate> {
    let Some(base_size) = modal_font_size(runs) else {
        return Vec::new();
    };

    let lines = group_runs_into_lines(runs);
    let mut headings = Vec::new();

    for line in &lines {
        let text = line.text();
        let char_count = text.chars().count();
        if char_count < MIN_HEADING_CHARS || char_count > MAX_HEADING_CHARS {
            continue;
        }

        let avg = line.avg_font_size();
        let level = if avg >= base_size * H1_RATIO {
            1
        } else if avg >= base_size * H2_RATIO {
            2
        } else if avg >= base_size * H3_RATIO && looks_like_heading(&text) {
            3
        } else {
            continue;
        };

        log::debug!(
            "page {page}: font heading L{level} ({avg:.1}pt vs {base_size:.1}pt base): {text:?}"
        );
        headings.push(HeadingCandidate::font(text, level, page));
    }

    headings
}

/// The page's modal font size, weighted by run length.
///
/// Ties break toward the smaller size: the baseline represents body text.
fn modal_font_size(runs: &[TextRun]) -> Option<f32> {
    let mut histogram: std::collections::BTreeMap<i32, usize> = std::collections::BTreeMap::new();
    for run in runs {
        let chars = run.text.chars().count();
        if chars == 0 || run.font_size <= 0.0 {
            continue;
        }
        // 0.1pt buckets
        let key = (run.font_size * 10.0).round() as i32;
        *histogram.entry(key).or_insert(0) += chars;
    }

    histogram
        .iter()
        .max_by(|(ka, ca), (kb, cb)| ca.cmp(cb).then(kb.cmp(ka)))
        .map(|(key, _)| *key as f32 / 10.0)
}

/// Pattern-based fallback detection over raw page lines.
pub fn detect_by_pattern(text: &str, page: u32) -> Vec<HeadingCandidate> {
    let chapter = Regex::new(r"^(Глава|Chapter|Раздел|Section)\s+\d+").unwrap();
    let numbered = Regex::new(r"^\d+\.\s+[A-ZА-ЯЁ]").unwrap();
    let subsection = Regex::new(r"^\d+\.\d+\.?\s+[A-ZА-ЯЁ]").unwrap();
    let all_caps = Regex::new(r"^[A-ZА-ЯЁ][A-ZА-ЯЁ\s]{5,50}$").unwrap();

    let mut headings = Vec::new();
    for line in text.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let matched = chapter.is_match(line)
            || numbered.is_match(line)
            || subsection.is_match(line)
            || all_caps.is_match(line);
        if matched {
            let level = pattern_level(line);
            log::debug!("page {page}: pattern heading L{level}: {line:?}");
            headings.push(HeadingCandidate::pattern(line, level, page));
        }
    }
    headings
}

/// Level implied by a heading's textual shape.
fn pattern_level(text: &str) -> u8 {
    let chapter = Regex::new(r"^(Глава|Chapter|Раздел|Section)\s+\d+").unwrap();
    let three_part = Regex::new(r"^\d+\.\d+\.\d+").unwrap();
    let two_part = Regex::new(r"^\d+\.\d+").unwrap();
    let one_part = Regex::new(r"^\d+\.").unwrap();

    if chapter.is_match(text) {
        1
    } else if three_part.is_match(text) {
        3
    } else if two_part.is_match(text) || one_part.is_match(text) {
        2
    } else {
        3
    }
}

/// Heuristic: does a moderately oversized line read as a heading?
///
/// Short, starts uppercase (or carries a numeric section prefix), and is
/// either fully uppercase or does not close like a sentence. A numbered
/// line whose remainder runs long or ends in a period is a list item, not
/// a heading — the prefix alone does not decide.
pub fn looks_like_heading(text: &str) -> bool {
    if text.is_empty() {
        return false;
    }
    let char_count = text.chars().count();
    if char_count >= 100 {
        return false;
    }

    let numeric_prefix = Regex::new(r"^\d+[.)]\s+(.*)$").unwrap();
    if let Some(caps) = numeric_prefix.captures(text) {
        let remainder = caps.get(1).map(|m| m.as_str()).unwrap_or("");
        return !text.ends_with('.') && remainder.chars().count() < MAX_NUMBERED_REMAINDER;
    }

    let first = match text.chars().next() {
        Some(c) => c,
        None => return false,
    };
    if !first.is_uppercase() {
        return false;
    }

    let letters: Vec<char> = text.chars().filter(|c| c.is_alphabetic()).collect();
    if char_count > 3 && !letters.is_empty() && letters.iter().all(|c| c.is_uppercase()) {
        return true;
    }

    !text.ends_with('.')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::source::BoundingBox;

    fn run(text: &str, top: f32, size: f32) -> TextRun {
        TextRun::new(
            text,
            1,
            size,
            BoundingBox::new(10.0, top, 10.0 + text.len() as f32 * size * 0.5, top + size),
        )
    }

    #[test]
    fn test_tracker_no_skip() {
        let mut tracker = HeadingTracker::new();
        assert_eq!(tracker.resolve(1), 1);
        assert_eq!(tracker.resolve(3), 2);
        assert_eq!(tracker.resolve(3), 3);
        assert_eq!(tracker.resolve(1), 1);
    }

    #[test]
    fn test_tracker_starts_at_one() {
        let mut tracker = HeadingTracker::new();
        assert_eq!(tracker.resolve(3), 1);
    }

    #[test]
    fn test_font_detection_levels() {
        let mut runs = Vec::new();
        // Body text at 12pt dominates the histogram
        for i in 0..20 {
            runs.push(run("body text line of ordinary size", 200.0 + i as f32 * 14.0, 12.0));
        }
        runs.push(run("Chapter One", 20.0, 24.0));
        runs.push(run("Section Overview", 50.0, 15.0));

        let headings = detect_by_font(&runs, 1);
        assert_eq!(headings.len(), 2);
        assert_eq!(headings[0].text, "Chapter One");
        assert_eq!(headings[0].level, 1);
        assert_eq!(headings[1].text, "Section Overview");
        assert_eq!(headings[1].level, 2);
    }

    #[test]
    fn test_font_detection_ignores_extreme_lengths() {
        let mut runs = Vec::new();
        for i in 0..10 {
            runs.push(run("body text line of ordinary size", 200.0 + i as f32 * 14.0, 12.0));
        }
        runs.push(run("AB", 20.0, 24.0));
        let long = "X".repeat(250);
        runs.push(run(&long, 50.0, 24.0));

        assert!(detect_by_font(&runs, 1).is_empty());
    }

    #[test]
    fn test_numbered_list_items_are_not_headings() {
        let items = [
            "1. Машинное обучение — это подраздел искусственного интеллекта.",
            "2. Нейронные сети состоят из множества связанных нейронов.",
            "3. Обучение происходит путем корректировки весов связей.",
        ];
        for item in items {
            assert!(!looks_like_heading(item), "mistaken for heading: {item}");
        }
    }

    #[test]
    fn test_short_numbered_sections_are_headings() {
        let headings = ["1. Введение", "2. Основные понятия", "Глава 1", "ЗАКЛЮЧЕНИЕ"];
        for heading in headings {
            assert!(looks_like_heading(heading), "not recognized: {heading}");
        }
    }

    #[test]
    fn test_pattern_fallback() {
        let text = "Chapter 3\nSome ordinary sentence follows here.\n2.1 Architecture Notes";
        let headings = detect_by_pattern(text, 5);

        assert_eq!(headings.len(), 2);
        assert_eq!(headings[0].text, "Chapter 3");
        assert_eq!(headings[0].level, 1);
        assert_eq!(headings[1].text, "2.1 Architecture Notes");
        assert_eq!(headings[1].level, 2);
        assert!(headings.iter().all(|h| h.page == 5));
    }

    #[test]
    fn test_detect_prefers_font_over_pattern() {
        let mut runs = Vec::new();
        for i in 0..10 {
            runs.push(run("plain body copy for the baseline", 200.0 + i as f32 * 14.0, 12.0));
        }
        runs.push(run("Results Overview", 20.0, 20.0));
        let content = PageContent::new(1, runs);

        let headings = detect_headings(&content, "Chapter 9\nunrelated text");
        assert_eq!(headings.len(), 1);
        assert_eq!(headings[0].text, "Results Overview");
    }
}
