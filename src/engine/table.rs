//! Table extraction: strategy cascade, acceptance filtering, and Markdown
//! rendering.

use crate::source::{DocumentSource, TableGrid, TableStrategy};

/// Minimum non-whitespace characters across all cells for a candidate to
/// count as a table at all.
const MIN_TABLE_CONTENT: usize = 10;

/// Fraction of alphabetic cells starting lowercase above which a grid is
/// considered word-fragmented.
const FRAGMENTATION_RATIO: f32 = 0.5;

/// Fraction of single-character cells above which a grid is considered
/// split.
const SPLIT_CELL_RATIO: f32 = 0.3;

/// Run the strategy cascade for one page.
///
/// The first strategy yielding at least one candidate above the content
/// floor wins; later strategies are not tried, so the same table is never
/// detected twice under different heuristics. A failing strategy is
/// recorded as a warning and treated as yielding nothing.
pub fn extract_with_strategies<S: DocumentSource + ?Sized>(
    source: &S,
    page: u32,
    warnings: &mut Vec<String>,
) -> Vec<TableGrid> {
    for strategy in TableStrategy::cascade() {
        match source.extract_tables(page, strategy) {
            Ok(grids) => {
                let usable: Vec<TableGrid> = grids
                    .into_iter()
                    .filter(|g| g.content_len() >= MIN_TABLE_CONTENT)
                    .collect();
                if !usable.is_empty() {
                    log::debug!(
                        "page {}: table strategy {} produced {} candidate(s)",
                        page,
                        strategy,
                        usable.len()
                    );
                    return usable;
                }
            }
            Err(e) => {
                warnings.push(format!("Table strategy {strategy} failed on page {page}: {e}"));
            }
        }
    }
    Vec::new()
}

/// Render an accepted candidate as a pipe-delimited Markdown table.
///
/// Returns the rejection reason instead when the candidate fails an
/// acceptance filter. Data rows are padded/truncated to header width and
/// embedded newlines in cells flatten to spaces.
pub fn render_table(grid: &TableGrid) -> Result<String, String> {
    if grid.rows.is_empty() {
        return Err("empty grid".to_string());
    }

    if grid.content_len() < MIN_TABLE_CONTENT {
        return Err(format!(
            "below minimum content ({} < {MIN_TABLE_CONTENT} chars)",
            grid.content_len()
        ));
    }

    if let Some(reason) = broken_grid_reason(&grid.rows) {
        return Err(reason);
    }

    let non_empty: Vec<&Vec<String>> = grid
        .rows
        .iter()
        .filter(|row| row.iter().any(|cell| !cell.trim().is_empty()))
        .collect();

    if non_empty.len() < 2 {
        return Err("header-only table".to_string());
    }

    let header: Vec<String> = non_empty[0].iter().map(|c| clean_cell(c)).collect();
    if header.iter().all(|c| c.is_empty()) {
        return Err("empty header row".to_string());
    }

    let mut lines = Vec::with_capacity(non_empty.len() + 1);
    lines.push(format!("| {} |", header.join(" | ")));
    lines.push(format!("| {} |", vec!["---"; header.len()].join(" | ")));

    for row in &non_empty[1..] {
        let mut cells: Vec<String> = row.iter().map(|c| clean_cell(c)).collect();
        cells.resize(header.len(), String::new());
        lines.push(format!("| {} |", cells.join(" | ")));
    }

    Ok(lines.join("\n"))
}

/// Detect grids whose cells are word fragments rather than values.
///
/// Two signatures: alphabetic cells that begin lowercase (a word was torn
/// across a cell boundary), and a high share of single-character cells.
pub fn broken_grid_reason(rows: &[Vec<String>]) -> Option<String> {
    let cells: Vec<&str> = rows
        .iter()
        .flat_map(|row| row.iter())
        .map(|c| c.trim())
        .filter(|c| !c.is_empty())
        .collect();

    if cells.is_empty() {
        return None;
    }

    let alpha_cells: Vec<&&str> = cells
        .iter()
        .filter(|c| c.chars().next().is_some_and(|ch| ch.is_alphabetic()))
        .collect();
    if alpha_cells.len() >= 3 {
        let lowercase = alpha_cells
            .iter()
            .filter(|c| c.chars().next().is_some_and(|ch| ch.is_lowercase()))
            .count();
        let ratio = lowercase as f32 / alpha_cells.len() as f32;
        if ratio > FRAGMENTATION_RATIO {
            return Some(format!(
                "cell fragmentation: {lowercase} of {} cells begin mid-word",
                alpha_cells.len()
            ));
        }
    }

    if cells.len() >= 4 {
        let single = cells.iter().filter(|c| c.chars().count() == 1).count();
        let ratio = single as f32 / cells.len() as f32;
        if ratio > SPLIT_CELL_RATIO {
            return Some(format!(
                "split cells: {single} of {} cells are single characters",
                cells.len()
            ));
        }
    }

    None
}

fn clean_cell(cell: &str) -> String {
    cell.trim().replace('\n', " ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid(rows: Vec<Vec<&str>>) -> TableGrid {
        TableGrid::new(
            rows.into_iter()
                .map(|r| r.into_iter().map(String::from).collect())
                .collect(),
            TableStrategy::RuledLines,
        )
    }

    #[test]
    fn test_render_basic_table() {
        let g = grid(vec![
            vec!["Name", "Age", "City"],
            vec!["Alice", "25", "Moscow"],
            vec!["Bob", "30", "London"],
        ]);

        let md = render_table(&g).unwrap();
        let lines: Vec<&str> = md.lines().collect();
        assert_eq!(lines[0], "| Name | Age | City |");
        assert_eq!(lines[1], "| --- | --- | --- |");
        assert_eq!(lines[2], "| Alice | 25 | Moscow |");
        assert_eq!(lines.len(), 4);
    }

    #[test]
    fn test_jagged_rows_padded_to_header() {
        let g = grid(vec![
            vec!["Col A", "Col B", "Col C"],
            vec!["Only one value here"],
            vec!["One", "Two", "Three", "Four"],
        ]);

        let md = render_table(&g).unwrap();
        for line in md.lines() {
            assert_eq!(line.matches('|').count(), 4, "bad row: {line}");
        }
    }

    #[test]
    fn test_embedded_newlines_flatten() {
        let g = grid(vec![
            vec!["Header one", "Header two"],
            vec!["Multi\nline", "Plain value"],
        ]);

        let md = render_table(&g).unwrap();
        assert!(md.contains("| Multi line |"));
    }

    #[test]
    fn test_header_only_rejected() {
        let g = grid(vec![vec!["Quarterly", "Revenue", "Breakdown"]]);
        let err = render_table(&g).unwrap_err();
        assert!(err.contains("header-only"));
    }

    #[test]
    fn test_low_content_rejected() {
        let g = grid(vec![vec!["a", "b"], vec!["c", "d"]]);
        assert!(render_table(&g).is_err());
    }

    #[test]
    fn test_fragmented_grid_rejected() {
        let rows = vec![
            vec!["И".to_string(), "нструкция".to_string(), "по".to_string()],
            vec!["уст".to_string(), "ановке".to_string(), "де".to_string()],
        ];
        let reason = broken_grid_reason(&rows).unwrap();
        assert!(reason.contains("fragmentation") || reason.contains("split"));
    }

    #[test]
    fn test_good_grid_not_broken() {
        let rows = vec![
            vec!["Name".to_string(), "Age".to_string(), "City".to_string()],
            vec!["Alice".to_string(), "25".to_string(), "Moscow".to_string()],
            vec!["Bob".to_string(), "30".to_string(), "London".to_string()],
        ];
        assert!(broken_grid_reason(&rows).is_none());
    }

    #[test]
    fn test_single_char_grid_rejected() {
        let rows = vec![
            vec!["n".to_string(), "n".to_string(), "n".to_string(), "n".to_string()],
            vec!["n".to_string(), "n".to_string(), "n".to_string(), ".".to_string()],
        ];
        let reason = broken_grid_reason(&rows).unwrap();
        assert!(reason.contains("split"));
    }
}
