//! Markdown assembly for reconstructed documents.

use std::collections::BTreeMap;

use crate::model::{DocumentMetadata, PageRecord};
use crate::source::{ImageAnalysis, ImageKind, PageImage, VisionProvider};

/// Assemble the full Markdown document from finalized page records.
///
/// Emits the H1 title, the frontmatter block, then per page: resolved
/// headings (one `#` deeper than their level, the H1 being reserved for
/// the title), page text with heading literals removed, accepted tables,
/// image descriptions (when a vision provider is active), and an
/// HTML-comment page marker.
pub fn assemble_markdown(
    metadata: &DocumentMetadata,
    pages: &[PageRecord],
    images: &BTreeMap<u32, Vec<PageImage>>,
    vision: Option<&dyn VisionProvider>,
    warnings: &mut Vec<String>,
) -> String {
    let mut parts: Vec<String> = Vec::new();

    parts.push(format!("# {}\n", metadata.title));
    parts.push(metadata.to_frontmatter());

    let mut current_section = String::new();

    for page in pages {
        for heading in &page.headings {
            current_section = heading.text.clone();
            let marker = "#".repeat(heading.level as usize + 1);
            parts.push(format!("\n{} {}\n", marker, heading.text));
        }

        // Headings are structural markers now; drop their inline copies
        let mut text = page.text.clone();
        for heading in &page.headings {
            text = text.replacen(&heading.text, "", 1);
        }
        let text = text.trim();
        if !text.is_empty() {
            parts.push(text.to_string());
        }

        for table in &page.tables {
            parts.push(format!("\n{table}\n"));
        }

        if let (Some(provider), Some(page_images)) = (vision, images.get(&page.number)) {
            for image in page_images {
                match provider.analyze(&image.bytes, &current_section) {
                    Ok(analysis) => parts.push(format_image(&analysis)),
                    Err(e) => warnings.push(format!(
                        "Image analysis failed on page {}: {e}",
                        page.number
                    )),
                }
            }
        }

        parts.push(format!("\n<!-- page {} -->\n", page.number));
    }

    parts.join("\n")
}

/// Derive the table of contents from the assembled Markdown.
///
/// A view over the emitted document: every `#`-prefixed line at depth ≥ 2
/// becomes one indented `- title` entry. The depth-1 document title is not
/// part of the TOC, so entries correspond one-to-one with resolved
/// headings.
pub fn extract_toc(markdown: &str) -> Vec<String> {
    let mut toc = Vec::new();
    for line in markdown.lines() {
        if !line.starts_with('#') {
            continue;
        }
        let depth = line.chars().take_while(|&c| c == '#').count();
        if depth < 2 {
            continue;
        }
        let title = line.trim_start_matches('#').trim();
        if title.is_empty() {
            continue;
        }
        let level = depth - 1;
        toc.push(format!("{}- {}", "  ".repeat(level - 1), title));
    }
    toc
}

fn format_image(analysis: &ImageAnalysis) -> String {
    match analysis.kind {
        ImageKind::Formula => format!("\n**Formula:**\n```\n{}\n```\n", analysis.description),
        ImageKind::Diagram => format!("\n> **Diagram:** {}\n", analysis.description),
        ImageKind::Illustration => format!("\n*[Figure: {}]*\n", analysis.description),
    }
}
