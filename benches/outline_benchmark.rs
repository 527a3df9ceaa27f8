//! Benchmarks for retoc outline inference.
//!
//! Run with: cargo bench
//!
//! These benchmarks run the inference pipeline over synthetic documents,
//! so they measure the heading sources and reconciler rather than PDF
//! decoding.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use retoc::model::{Document, Heading, HeadingLevel, Page, Table, TableRow, TextSpan};
use retoc::outline::{reconcile, OutlineExtractor, OutlineOptions};

/// Builds a document shaped like a typical report: one chapter heading and
/// one section heading per page over a run of small body text, with a
/// numbered line and an occasional table.
fn create_test_document(page_count: u32) -> Document {
    let mut doc = Document::new();

    for n in 1..=page_count {
        let mut page = Page::new(n);
        page.add_span(TextSpan::new(format!("Chapter {n}"), 20.0));
        page.add_span(TextSpan::new(format!("Scope of Chapter {n}"), 14.0));
        if n % 3 == 0 {
            page.add_span(TextSpan::new("SUMMARY OF FINDINGS", 14.0));
        }
        for i in 0..20 {
            page.add_span(TextSpan::new(
                format!("Body copy sentence {i} carrying ordinary paragraph content."),
                11.0,
            ));
        }

        page.add_line(format!("{n}. Detailed provisions"));
        page.add_line("Plain narrative line without any heading signal.");

        if n % 5 == 0 {
            page.add_table(Table::from_rows(vec![
                TableRow::from_texts(["Item", "Quantity", "Total"]),
                TableRow::from_texts(["Widget", "4", "120.00"]),
            ]));
        }

        doc.add_page(page);
    }

    doc
}

/// Benchmark PDF header sniffing.
fn bench_format_detection(c: &mut Criterion) {
    let pdf_header = b"%PDF-1.7\n%\xe2\xe3\xcf\xd3 rest of file";
    let non_pdf = b"Not a PDF file at all, just random text content";

    c.bench_function("detect_valid_pdf", |b| {
        b.iter(|| retoc::sniff_version(black_box(pdf_header)).unwrap());
    });

    c.bench_function("detect_non_pdf", |b| {
        b.iter(|| retoc::is_pdf_bytes(black_box(non_pdf)));
    });
}

/// Benchmark full outline inference at various document sizes.
fn bench_outline_inference(c: &mut Criterion) {
    let mut group = c.benchmark_group("outline_inference");
    let extractor = OutlineExtractor::new();

    for page_count in [10, 50, 200] {
        let doc = create_test_document(page_count);

        group.bench_function(format!("{}_pages", page_count), |b| {
            b.iter(|| extractor.extract(black_box(&doc), "benchmark"));
        });
    }

    group.finish();
}

/// Benchmark the reconciler alone on a noisy candidate pool.
fn bench_reconcile(c: &mut Criterion) {
    let options = OutlineOptions::default();
    let candidates: Vec<Heading> = (0u32..500)
        .map(|i| {
            let level = match i % 3 {
                0 => HeadingLevel::H1,
                1 => HeadingLevel::H2,
                _ => HeadingLevel::H3,
            };
            // Every tenth candidate duplicates an earlier one.
            let text = format!("Section heading {}", i % 450);
            Heading::new(level, text, (i / 5) + 1)
        })
        .collect();

    c.bench_function("reconcile_500_candidates", |b| {
        b.iter(|| reconcile(black_box(candidates.clone()), &options));
    });
}

criterion_group!(
    benches,
    bench_format_detection,
    bench_outline_inference,
    bench_reconcile,
);
criterion_main!(benches);
