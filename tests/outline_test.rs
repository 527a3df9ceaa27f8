//! Integration tests for outline inference over built documents.

use retoc::model::{Document, Heading, HeadingLevel, Metadata, Page, Table, TableRow, TextSpan};
use retoc::outline::{
    reconcile, FontSizeSource, HeadingSource, OutlineExtractor, OutlineOptions,
};
use retoc::{Error, Result};

/// A three-page contract exercising every candidate source at once:
/// sized spans, a numbered line, an all-caps banner, a table header, and a
/// split heading fragment.
fn create_contract_document() -> Document {
    let mut doc = Document::new();

    let mut page1 = Page::new(1);
    page1.add_span(TextSpan::new("Master Service Agreement", 24.0));
    page1.add_span(TextSpan::new("Definitions", 16.0));
    page1.add_span(TextSpan::new("terms defined below apply throughout", 10.0));
    page1.add_line("1. Scope of Services");
    page1.add_line("The provider performs the services described in this section.");
    doc.add_page(page1);

    let mut page2 = Page::new(2);
    page2.add_span(TextSpan::new("PAYMENT TERMS", 14.0));
    page2.add_span(TextSpan::new("invoices are due within thirty days", 10.0));
    page2.add_line("2) Term and Termination");
    page2.add_table(Table::from_rows(vec![
        TableRow::from_texts(["Deliverable", "Fee"]),
        TableRow::from_texts(["Design document", "4,000"]),
    ]));
    doc.add_page(page2);

    let mut page3 = Page::new(3);
    page3.add_span(TextSpan::new("Intro", 16.0));
    page3.add_span(TextSpan::new("duction", 16.0));
    doc.add_page(page3);

    doc
}

#[test]
fn test_contract_outline_end_to_end() {
    let doc = create_contract_document();
    let result = OutlineExtractor::new().extract(&doc, "contract");

    assert_eq!(result.title, "Master Service Agreement");

    let got: Vec<(&str, HeadingLevel, u32)> = result
        .outline
        .iter()
        .map(|h| (h.text.as_str(), h.level, h.page))
        .collect();
    assert_eq!(
        got,
        vec![
            ("Master Service Agreement", HeadingLevel::H1, 1),
            ("Definitions", HeadingLevel::H2, 1),
            ("Scope of Services", HeadingLevel::H2, 1),
            ("Term and Termination", HeadingLevel::H2, 2),
            ("Deliverable | Fee", HeadingLevel::H2, 2),
            ("PAYMENT TERMS", HeadingLevel::H3, 2),
            ("Intro duction", HeadingLevel::H2, 3),
        ]
    );
}

#[test]
fn test_extraction_is_deterministic() {
    let doc = create_contract_document();
    let extractor = OutlineExtractor::new();

    let first = extractor.extract(&doc, "contract");
    let second = extractor.extract(&doc, "contract");
    assert_eq!(first, second);
}

#[test]
fn test_outline_ordered_by_page_then_level() {
    let doc = create_contract_document();
    let result = OutlineExtractor::new().extract(&doc, "contract");

    let keys: Vec<(u32, u8)> = result
        .outline
        .iter()
        .map(|h| (h.page, h.level.rank()))
        .collect();
    assert!(keys.windows(2).all(|w| w[0] <= w[1]));
}

#[test]
fn test_no_duplicate_headings() {
    let doc = create_contract_document();
    let result = OutlineExtractor::new().extract(&doc, "contract");

    let mut seen = std::collections::HashSet::new();
    for heading in &result.outline {
        assert!(
            seen.insert(heading.text.to_lowercase()),
            "duplicate heading: {}",
            heading.text
        );
    }
}

#[test]
fn test_reconciling_final_outline_changes_nothing() {
    let doc = create_contract_document();
    let result = OutlineExtractor::new().extract(&doc, "contract");

    let again = reconcile(result.outline.clone(), &OutlineOptions::default());
    assert_eq!(again, result.outline);
}

#[test]
fn test_fragments_split_around_lower_level_span_merge_once() {
    // Classification emits "Intro" and "duction" with a smaller heading
    // between them, so the pair only becomes adjacent after sorting.
    let mut page = Page::new(1);
    page.add_span(TextSpan::new("Intro", 24.0));
    page.add_span(TextSpan::new("Something", 16.0));
    page.add_span(TextSpan::new("duction", 24.0));
    let mut doc = Document::new();
    doc.add_page(page);

    let extractor = OutlineExtractor::new();
    let result = extractor.extract(&doc, "fragmented");

    let got: Vec<(&str, HeadingLevel)> = result
        .outline
        .iter()
        .map(|h| (h.text.as_str(), h.level))
        .collect();
    assert_eq!(
        got,
        vec![
            ("Intro duction", HeadingLevel::H1),
            ("Something", HeadingLevel::H2),
        ]
    );

    let again = reconcile(result.outline.clone(), extractor.options());
    assert_eq!(again, result.outline);
}

#[test]
fn test_title_prefers_cleaned_metadata() {
    let mut doc = create_contract_document();
    doc.metadata = Metadata {
        title: Some("Microsoft Word - Consulting Agreement.docx".to_string()),
        ..Default::default()
    };

    let result = OutlineExtractor::new().extract(&doc, "contract");
    assert_eq!(result.title, "Consulting Agreement");
}

#[test]
fn test_title_falls_back_to_stem_for_empty_document() {
    let result = OutlineExtractor::new().extract(&Document::new(), "contract-2024");
    assert_eq!(result.title, "contract-2024");
    assert!(result.outline.is_empty());
}

#[test]
fn test_noise_rejected_end_to_end() {
    let mut page = Page::new(1);
    page.add_span(TextSpan::new("17", 20.0));
    page.add_span(TextSpan::new("3.1", 20.0));
    page.add_span(TextSpan::new("..", 20.0));
    page.add_span(TextSpan::new("AB", 20.0));
    page.add_span(TextSpan::new("Quarterly Review", 20.0));
    let mut doc = Document::new();
    doc.add_page(page);

    let result = OutlineExtractor::new().extract(&doc, "report");
    assert_eq!(result.outline.len(), 1);
    assert_eq!(result.outline[0].text, "Quarterly Review");
    assert_eq!(result.title, "Quarterly Review");
}

#[test]
fn test_custom_denylist_replaces_default() {
    let mut page = Page::new(1);
    page.add_span(TextSpan::new("Signature of the Applicant", 20.0));
    page.add_span(TextSpan::new("Reviewer Comments Section", 20.0));
    let mut doc = Document::new();
    doc.add_page(page);

    // Default denylist drops signature lines.
    let result = OutlineExtractor::new().extract(&doc, "form");
    let texts: Vec<&str> = result.outline.iter().map(|h| h.text.as_str()).collect();
    assert!(!texts.contains(&"Signature of the Applicant"));
    assert!(texts.contains(&"Reviewer Comments Section"));

    // A replacement list drops its own matches and nothing else.
    let options = OutlineOptions::new().with_denylist(["review"]);
    let result = OutlineExtractor::with_options(options).extract(&doc, "form");
    let texts: Vec<&str> = result.outline.iter().map(|h| h.text.as_str()).collect();
    assert!(texts.contains(&"Signature of the Applicant"));
    assert!(!texts.contains(&"Reviewer Comments Section"));
}

#[test]
fn test_size_tolerance_tightens_classification() {
    let mut page = Page::new(1);
    page.add_span(TextSpan::new("Annual Report", 16.0));
    page.add_span(TextSpan::new("Intermediate Heading", 14.5));
    page.add_span(TextSpan::new("Quarterly Figures", 12.0));
    page.add_span(TextSpan::new("body text in the usual place", 10.0));
    let mut doc = Document::new();
    doc.add_page(page);

    let level_of = |result: &retoc::DocumentOutline, text: &str| {
        result
            .outline
            .iter()
            .find(|h| h.text == text)
            .map(|h| h.level)
    };

    // At the default tolerance 14.5 reaches 90% of the 16pt threshold.
    let relaxed = OutlineExtractor::new().extract(&doc, "report");
    assert_eq!(
        level_of(&relaxed, "Intermediate Heading"),
        Some(HeadingLevel::H1)
    );

    let strict = OutlineExtractor::with_options(OutlineOptions::new().with_size_tolerance(1.0))
        .extract(&doc, "report");
    assert_eq!(
        level_of(&strict, "Intermediate Heading"),
        Some(HeadingLevel::H2)
    );
}

struct AbortSource;

impl HeadingSource for AbortSource {
    fn name(&self) -> &str {
        "abort"
    }

    fn produce(&self, _doc: &Document, _options: &OutlineOptions) -> Result<Vec<Heading>> {
        Err(Error::TextExtract("synthetic source failure".to_string()))
    }
}

#[test]
fn test_failing_source_does_not_poison_pipeline() {
    let doc = create_contract_document();

    let extractor = OutlineExtractor::empty(OutlineOptions::default())
        .add_source(Box::new(AbortSource))
        .add_source(Box::new(FontSizeSource));
    let result = extractor.extract(&doc, "contract");

    let texts: Vec<&str> = result.outline.iter().map(|h| h.text.as_str()).collect();
    assert!(texts.contains(&"Master Service Agreement"));
}
