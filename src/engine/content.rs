//! Page content extraction: run partitioning, line grouping, encoding
//! normalization, and garbage filtering.
//!
//! Everything here works on the typed runs supplied by the content
//! collaborator; the table-region partition keeps body text and table cells
//! from duplicating each other downstream.

use regex::Regex;
use unicode_normalization::UnicodeNormalization;

use crate::source::{PageContent, TextRun};

/// Vertical tolerance for grouping runs into visual lines, in points.
const LINE_TOLERANCE: f32 = 3.0;

/// Horizontal gap above which adjacent runs on a line are separated by a
/// space, in points.
const WORD_GAP: f32 = 1.0;

/// A visual line: runs sharing a baseline, sorted left to right.
#[derive(Debug, Clone)]
pub struct VisualLine {
    /// Member runs
    pub runs: Vec<TextRun>,
}

impl VisualLine {
    /// Combined line text with gap-based word spacing.
    pub fn text(&self) -> String {
        let mut result = String::new();
        for (i, run) in self.runs.iter().enumerate() {
            if i > 0 {
                let prev = &self.runs[i - 1];
                let gap = run.bbox.x0 - prev.bbox.x1;
                if gap >= WORD_GAP && !result.ends_with(' ') && !run.text.starts_with(' ') {
                    result.push(' ');
                }
            }
            result.push_str(&run.text);
        }
        result.trim().to_string()
    }

    /// Average font size across the line, weighted by run length.
    pub fn avg_font_size(&self) -> f32 {
        let total_chars: usize = self.runs.iter().map(|r| r.text.chars().count()).sum();
        if total_chars == 0 {
            return 0.0;
        }
        let weighted: f32 = self
            .runs
            .iter()
            .map(|r| r.font_size * r.text.chars().count() as f32)
            .sum();
        weighted / total_chars as f32
    }
}

/// Group runs into visual lines by vertical position.
///
/// Runs whose tops round to the same 3pt bucket share a line; lines come
/// out top-to-bottom, runs within a line left-to-right.
pub fn group_runs_into_lines(runs: &[TextRun]) -> Vec<VisualLine> {
    if runs.is_empty() {
        return Vec::new();
    }

    let mut sorted: Vec<&TextRun> = runs.iter().collect();
    sorted.sort_by(|a, b| {
        let ka = (a.bbox.top / LINE_TOLERANCE).round() as i64;
        let kb = (b.bbox.top / LINE_TOLERANCE).round() as i64;
        ka.cmp(&kb).then(
            a.bbox
                .x0
                .partial_cmp(&b.bbox.x0)
                .unwrap_or(std::cmp::Ordering::Equal),
        )
    });

    let mut lines: Vec<VisualLine> = Vec::new();
    let mut current: Vec<TextRun> = Vec::new();
    let mut current_key: Option<i64> = None;

    for run in sorted {
        let key = (run.bbox.top / LINE_TOLERANCE).round() as i64;
        match current_key {
            Some(k) if k == key => current.push(run.clone()),
            Some(_) => {
                lines.push(VisualLine {
                    runs: std::mem::take(&mut current),
                });
                current_key = Some(key);
                current.push(run.clone());
            }
            None => {
                current_key = Some(key);
                current.push(run.clone());
            }
        }
    }
    if !current.is_empty() {
        lines.push(VisualLine { runs: current });
    }

    lines
}

/// Runs that fall outside every detected table region.
///
/// Overlap is open-interval on both axes, so a run flush against a table
/// border stays in the free-text stream.
pub fn runs_outside_tables(content: &PageContent) -> Vec<TextRun> {
    if content.table_regions.is_empty() {
        return content.runs.clone();
    }
    content
        .runs
        .iter()
        .filter(|run| {
            !content
                .table_regions
                .iter()
                .any(|region| run.bbox.overlaps(region))
        })
        .cloned()
        .collect()
}

/// Join visual lines into raw page text, one line per `\n`.
pub fn lines_to_text(lines: &[VisualLine]) -> String {
    lines
        .iter()
        .map(|l| l.text())
        .collect::<Vec<_>>()
        .join("\n")
}

/// Fraction of replacement characters (U+FFFD) in the text.
pub fn replacement_ratio(text: &str) -> f32 {
    let total = text.chars().count();
    if total == 0 {
        return 0.0;
    }
    let bad = text.chars().filter(|&c| c == '\u{FFFD}').count();
    bad as f32 / total as f32
}

/// Canonically compose (NFC) and clean up raw page text.
///
/// Collapses space runs, caps consecutive newlines at two, and repairs
/// hyphen-newline word breaks.
pub fn normalize_text(text: &str) -> String {
    let composed: String = text.nfc().collect();
    clean_text(&composed)
}

fn clean_text(text: &str) -> String {
    let spaces = Regex::new(r" +").unwrap();
    let text = spaces.replace_all(text, " ");

    let newlines = Regex::new(r"\n{3,}").unwrap();
    let text = newlines.replace_all(&text, "\n\n");

    text.replace("-\n", "").trim().to_string()
}

/// Drop garbage lines from page text, returning the kept text and the
/// number of lines filtered.
pub fn filter_garbage_lines(text: &str) -> (String, u32) {
    let mut kept: Vec<&str> = Vec::new();
    let mut filtered = 0u32;

    for line in text.lines() {
        if is_garbage_line(line) {
            log::debug!("dropping garbage line: {:?}", line);
            filtered += 1;
        } else {
            kept.push(line);
        }
    }

    (kept.join("\n"), filtered)
}

/// Heuristic: a line of extraction noise rather than prose.
pub fn is_garbage_line(line: &str) -> bool {
    let trimmed = line.trim();
    if trimmed.is_empty() {
        return false;
    }

    // Symbol-only line (rules, underscores, decoration)
    if !trimmed.chars().any(|c| c.is_alphanumeric()) {
        return true;
    }

    let tokens: Vec<&str> = trimmed.split_whitespace().collect();

    // Numeric noise: page furniture and coordinate dumps
    if tokens.len() >= 4 && tokens.iter().all(|t| t.chars().all(|c| c.is_ascii_digit())) {
        return true;
    }

    // Single-character repetition
    if tokens.len() >= 5 && tokens.iter().all(|t| t.chars().count() == 1) {
        return true;
    }

    // Vowel-free "words": shattered glyph clusters
    let word_tokens: Vec<&&str> = tokens
        .iter()
        .filter(|t| t.chars().count() >= 3 && t.chars().all(|c| c.is_alphabetic()))
        .collect();
    if word_tokens.len() >= 3 && word_tokens.iter().all(|t| !t.chars().any(is_vowel)) {
        return true;
    }

    false
}

fn is_vowel(c: char) -> bool {
    matches!(
        c.to_lowercase().next().unwrap_or(c),
        'a' | 'e' | 'i' | 'o' | 'u'
            | 'а' | 'е' | 'ё' | 'и' | 'о' | 'у' | 'ы' | 'э' | 'ю' | 'я'
    )
}
