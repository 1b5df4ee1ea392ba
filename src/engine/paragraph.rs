//! Paragraph assembly: merging extraction-wrapped lines back into prose.

/// Merge fragmented lines into `\n\n`-separated paragraphs.
///
/// A blank line always ends the current paragraph. A non-blank line is
/// joined to the previous one when the previous line ends in a lowercase
/// letter, a comma, or a hyphen (word break, hyphen removed), or when the
/// new line begins with a lowercase letter. The heuristic is deliberately
/// permissive: false joins are cheaper than losing continuity broken by
/// page-extraction line wrapping.
pub fn assemble_paragraphs(text: &str) -> String {
    if text.is_empty() {
        return String::new();
    }

    let mut paragraphs: Vec<String> = Vec::new();
    let mut current: Vec<String> = Vec::new();

    for raw_line in text.lines() {
        let line = raw_line.trim();

        if line.is_empty() {
            flush(&mut paragraphs, &mut current);
            continue;
        }

        if let Some(prev) = current.last() {
            if should_join(prev, line) {
                if prev.ends_with('-') {
                    // Word break: drop the hyphen and fuse the halves
                    let mut merged = prev[..prev.len() - 1].to_string();
                    merged.push_str(line);
                    *current.last_mut().unwrap() = merged;
                } else {
                    current.push(line.to_string());
                }
                continue;
            }
            flush(&mut paragraphs, &mut current);
        }

        current.push(line.to_string());
    }

    flush(&mut paragraphs, &mut current);
    paragraphs.join("\n\n")
}

fn flush(paragraphs: &mut Vec<String>, current: &mut Vec<String>) {
    if !current.is_empty() {
        paragraphs.push(current.join(" "));
        current.clear();
    }
}

fn should_join(prev: &str, line: &str) -> bool {
    let prev_last = prev.chars().last();
    let line_first = line.chars().next();

    prev_last.is_some_and(|c| c.is_lowercase())
        || prev.ends_with(',')
        || prev.ends_with('-')
        || line_first.is_some_and(|c| c.is_alphabetic() && c.is_lowercase())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_blank_line_ends_paragraph() {
        let text = "First paragraph.\n\nSecond paragraph.";
        assert_eq!(
            assemble_paragraphs(text),
            "First paragraph.\n\nSecond paragraph."
        );
    }

    #[test]
    fn test_consecutive_blanks_collapse() {
        let text = "One.\n\n\n\nTwo.";
        assert_eq!(assemble_paragraphs(text), "One.\n\nTwo.");
    }

    #[test]
    fn test_join_on_lowercase_continuation() {
        let text = "The quick brown fox jumps over\nthe lazy dog.";
        assert_eq!(
            assemble_paragraphs(text),
            "The quick brown fox jumps over the lazy dog."
        );
    }

    #[test]
    fn test_join_on_trailing_comma() {
        let text = "First clause,\nSecond clause.";
        assert_eq!(assemble_paragraphs(text), "First clause, Second clause.");
    }

    #[test]
    fn test_hyphen_word_break() {
        let text = "This is an inter-\nnational agreement.";
        assert_eq!(
            assemble_paragraphs(text),
            "This is an international agreement."
        );
    }

    #[test]
    fn test_sentence_boundary_starts_new_paragraph() {
        let text = "First sentence ends here.\nNew Topic starts now.";
        assert_eq!(
            assemble_paragraphs(text),
            "First sentence ends here.\n\nNew Topic starts now."
        );
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(assemble_paragraphs(""), "");
    }

    #[test]
    fn test_cyrillic_continuation() {
        let text = "Машинное обучение изучает методы\nпостроения алгоритмов.";
        assert_eq!(
            assemble_paragraphs(text),
            "Машинное обучение изучает методы построения алгоритмов."
        );
    }
}
