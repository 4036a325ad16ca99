//! Benchmarks for block conversion and spreadsheet layout.
//!
//! Run with: cargo bench

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use reviewdoc::parser::{BlockConverter, ParseOptions};
use reviewdoc::render::xlsx::{column_widths, row_heights};
use reviewdoc::TabularOptions;

/// Creates a chapter body resembling editor output.
fn create_chapter_html(paragraphs: usize) -> String {
    let mut html = String::from("<h1>Benchmark chapter</h1>");
    for i in 0..paragraphs {
        html.push_str(&format!(
            "<p>Paragraph {} with <strong>bold</strong> and <em>italic</em> runs and a <a href=\"#\">link</a>.</p>",
            i
        ));
        if i % 20 == 0 {
            html.push_str(
                "<figure class=\"table\"><table><tr><th>Model</th><th>Score</th></tr><tr><td>GCN</td><td>0.81</td></tr></table></figure>",
            );
        }
    }
    html
}

/// Creates rows of mixed-length cells.
fn create_rows(count: usize) -> (Vec<String>, Vec<Vec<String>>) {
    let headers = vec!["title".to_string(), "year".to_string(), "notes".to_string()];
    let rows = (0..count)
        .map(|i| {
            vec![
                format!("Paper title number {} about graph learning", i),
                (2000 + i % 25).to_string(),
                "observation ".repeat(i % 15),
            ]
        })
        .collect();
    (headers, rows)
}

fn bench_block_conversion(c: &mut Criterion) {
    let converter = BlockConverter::new(ParseOptions::default());
    let small = create_chapter_html(10);
    let large = create_chapter_html(500);

    let mut group = c.benchmark_group("block_conversion");
    group.bench_function("10_paragraphs", |b| {
        b.iter(|| converter.convert_html(black_box(&small)))
    });
    group.bench_function("500_paragraphs", |b| {
        b.iter(|| converter.convert_html(black_box(&large)))
    });
    group.finish();
}

fn bench_column_layout(c: &mut Criterion) {
    let (headers, rows) = create_rows(1000);
    let options = TabularOptions::default();

    let mut group = c.benchmark_group("column_layout");
    group.bench_function("widths_1000_rows", |b| {
        b.iter(|| column_widths(black_box(&headers), black_box(&rows), 200))
    });
    let widths = column_widths(&headers, &rows, 200);
    group.bench_function("heights_1000_rows", |b| {
        b.iter(|| row_heights(black_box(&rows), black_box(&widths), &options))
    });
    group.finish();
}

criterion_group!(benches, bench_block_conversion, bench_column_layout);
criterion_main!(benches);
