//! Benchmarks for pagemill reconstruction performance.
//!
//! Run with: cargo bench
//!
//! These benchmarks drive the pipeline with synthetic page data.

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use pagemill::engine::{find_split_point, Chunker};
use pagemill::source::{
    BoundingBox, DocumentSource, PageContent, SourceMetadata, TableGrid, TableStrategy, TextRun,
};
use pagemill::{parse_document, DocumentMetadata, Heading, PageRecord, ParseOptions, Result};

/// A synthetic source with the given number of text-dense pages.
struct SyntheticSource {
    page_count: u32,
}

impl DocumentSource for SyntheticSource {
    fn metadata(&self) -> Result<SourceMetadata> {
        Ok(SourceMetadata {
            title: "Benchmark Document".to_string(),
            author: "Bench".to_string(),
            source: "bench.pdf".to_string(),
            page_count: self.page_count,
            ..Default::default()
        })
    }

    fn page(&self, number: u32) -> Result<PageContent> {
        let mut runs = Vec::new();
        runs.push(TextRun::new(
            format!("Section {number} Overview"),
            number,
            18.0,
            BoundingBox::new(72.0, 60.0, 300.0, 78.0),
        ));
        for i in 0..40 {
            let y = 100.0 + i as f32 * 14.0;
            runs.push(TextRun::new(
                "A body sentence that stands in for realistic extracted page content during measurement,",
                number,
                12.0,
                BoundingBox::new(72.0, y, 520.0, y + 12.0),
            ));
        }
        Ok(PageContent::new(number, runs))
    }

    fn extract_tables(&self, _number: u32, _strategy: TableStrategy) -> Result<Vec<TableGrid>> {
        Ok(Vec::new())
    }
}

fn synthetic_pages(count: u32) -> Vec<PageRecord> {
    (1..=count)
        .map(|number| PageRecord {
            number,
            text: "A body sentence that stands in for realistic extracted page content. "
                .repeat(40),
            tables: Vec::new(),
            headings: vec![Heading {
                level: 1,
                text: format!("Section {number}"),
            }],
            ocr_applied: false,
        })
        .collect()
}

fn bench_split_point(c: &mut Criterion) {
    let text = "A steady sentence that fills the buffer with prose. ".repeat(100);

    c.bench_function("find_split_point", |b| {
        b.iter(|| find_split_point(black_box(&text), black_box(1500)));
    });
}

fn bench_chunking(c: &mut Criterion) {
    let mut group = c.benchmark_group("chunking");
    let metadata = DocumentMetadata {
        title: "Bench".to_string(),
        source: "bench.pdf".to_string(),
        ..Default::default()
    };

    for page_count in [5u32, 20, 50].iter() {
        let pages = synthetic_pages(*page_count);

        group.bench_function(format!("{page_count}_pages"), |b| {
            b.iter(|| {
                let mut chunker = Chunker::new(1500, 200, black_box(&metadata));
                for page in &pages {
                    chunker.push_page(page);
                }
                chunker.finish()
            });
        });
    }

    group.finish();
}

fn bench_full_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("full_parse");

    for page_count in [1u32, 10, 25].iter() {
        let source = SyntheticSource {
            page_count: *page_count,
        };

        group.bench_function(format!("{page_count}_pages"), |b| {
            b.iter(|| parse_document(black_box(&source), &ParseOptions::default()).unwrap());
        });
    }

    group.finish();
}

criterion_group!(benches, bench_split_point, bench_chunking, bench_full_parse);
criterion_main!(benches);
