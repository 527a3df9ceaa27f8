//! Outline inference.
//!
//! Four independent candidate sources (font-size classification, numbered
//! lines, all-caps banners, table headers) propose headings; a reconciler
//! dedups, filters noise, orders the survivors by page and level, and
//! merges adjacent fragments. Title resolution runs beside it with its own
//! fallback chain. The result is a flat `{title, outline}` pair.

mod filter;
mod merge;
mod options;
mod sources;
mod thresholds;
mod title;

pub use filter::{filter_headings, is_noise};
pub use merge::merge_fragments;
pub use options::OutlineOptions;
pub use sources::{
    default_sources, AllCapsSource, FontSizeSource, HeadingSource, NumberedLineSource,
    TableHeaderSource,
};
pub use thresholds::{distinct_sizes, SizeThresholds};
pub use title::resolve_title;

use crate::model::{Document, DocumentOutline, Heading};
use log::{debug, warn};
use std::collections::HashSet;

/// Combines candidate sources into one ordered outline.
///
/// ```
/// use retoc::model::{Document, Page, TextSpan};
/// use retoc::outline::OutlineExtractor;
///
/// let mut page = Page::new(1);
/// page.add_span(TextSpan::new("Getting Started", 24.0));
/// page.add_span(TextSpan::new("plain body text", 10.0));
/// let mut doc = Document::new();
/// doc.add_page(page);
///
/// let result = OutlineExtractor::new().extract(&doc, "guide");
/// assert_eq!(result.title, "Getting Started");
/// ```
pub struct OutlineExtractor {
    sources: Vec<Box<dyn HeadingSource>>,
    options: OutlineOptions,
}

impl OutlineExtractor {
    /// Create an extractor with the built-in sources and default options.
    pub fn new() -> Self {
        Self::with_options(OutlineOptions::default())
    }

    /// Create an extractor with the built-in sources and custom options.
    pub fn with_options(options: OutlineOptions) -> Self {
        Self {
            sources: default_sources(),
            options,
        }
    }

    /// Create an extractor with no sources; pair with [`add_source`](Self::add_source).
    pub fn empty(options: OutlineOptions) -> Self {
        Self {
            sources: Vec::new(),
            options,
        }
    }

    /// Append a candidate source after the existing ones.
    pub fn add_source(mut self, source: Box<dyn HeadingSource>) -> Self {
        self.sources.push(source);
        self
    }

    /// The active options.
    pub fn options(&self) -> &OutlineOptions {
        &self.options
    }

    /// Infer the title and outline for a document.
    ///
    /// `stem` is the source filename without extension; it anchors title
    /// fallback. Source failures are logged and cost only that source's
    /// candidates.
    pub fn extract(&self, doc: &Document, stem: &str) -> DocumentOutline {
        let title = resolve_title(doc, stem, &self.options);

        let mut candidates = Vec::new();
        for source in &self.sources {
            match source.produce(doc, &self.options) {
                Ok(found) => {
                    debug!("source {}: {} candidates", source.name(), found.len());
                    candidates.extend(found);
                }
                Err(err) => {
                    warn!("heading source {} failed: {}", source.name(), err);
                }
            }
        }

        let outline = reconcile(candidates, &self.options);
        DocumentOutline::new(title, outline)
    }
}

impl Default for OutlineExtractor {
    fn default() -> Self {
        Self::new()
    }
}

/// Reduce a concatenated candidate pool to the final outline: dedup by
/// normalized text, drop noise, stable-sort by page and level rank, then
/// merge adjacent fragments, repeating the pass until the outline stops
/// changing. The result is a fixed point: running it through `reconcile`
/// again returns it unchanged.
pub fn reconcile(mut candidates: Vec<Heading>, options: &OutlineOptions) -> Vec<Heading> {
    loop {
        let len = candidates.len();
        candidates = dedup_headings(candidates);
        candidates = filter_headings(candidates);
        candidates.sort_by_key(|h| (h.page, h.level.rank()));
        candidates = merge_fragments(candidates, options.fragment_max_chars);
        // Every stage only removes or joins entries, so a pass that keeps
        // the length keeps the outline, and the loop terminates.
        if candidates.len() == len {
            return candidates;
        }
    }
}

/// Keep the first heading for each lowercased, trimmed text key.
///
/// The key is the literal text; punctuation is not folded, so "2. Scope"
/// and "Scope" stay distinct entries.
fn dedup_headings(candidates: Vec<Heading>) -> Vec<Heading> {
    let mut seen = HashSet::new();
    let mut unique = Vec::with_capacity(candidates.len());
    for heading in candidates {
        let key = heading.text.to_lowercase().trim().to_string();
        if seen.insert(key) {
            unique.push(heading);
        }
    }
    unique
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::model::{HeadingLevel, Page, Table, TableRow, TextSpan};

    fn h(level: HeadingLevel, text: &str, page: u32) -> Heading {
        Heading::new(level, text, page)
    }

    #[test]
    fn test_dedup_first_occurrence_wins() {
        let candidates = vec![
            h(HeadingLevel::H1, "Revenue", 1),
            h(HeadingLevel::H2, "revenue", 3),
            h(HeadingLevel::H3, "  REVENUE  ", 5),
        ];
        let unique = dedup_headings(candidates);
        assert_eq!(unique.len(), 1);
        assert_eq!(unique[0].text, "Revenue");
        assert_eq!(unique[0].page, 1);
    }

    #[test]
    fn test_reconcile_orders_by_page_then_level() {
        let candidates = vec![
            h(HeadingLevel::H1, "Appendix", 2),
            h(HeadingLevel::H2, "Methods", 1),
            h(HeadingLevel::H1, "Findings", 1),
        ];
        let outline = reconcile(candidates, &OutlineOptions::default());
        let order: Vec<(u32, HeadingLevel)> =
            outline.iter().map(|h| (h.page, h.level)).collect();
        assert_eq!(
            order,
            vec![
                (1, HeadingLevel::H1),
                (1, HeadingLevel::H2),
                (2, HeadingLevel::H1),
            ]
        );
    }

    #[test]
    fn test_reconcile_is_idempotent() {
        // The fragments arrive split around a lower-level candidate, so
        // they only become adjacent once sorted.
        let candidates = vec![
            h(HeadingLevel::H1, "Intro", 1),
            h(HeadingLevel::H2, "Background", 1),
            h(HeadingLevel::H1, "duction", 1),
            h(HeadingLevel::H1, "Results", 2),
            h(HeadingLevel::H2, "results", 2),
        ];
        let options = OutlineOptions::default();
        let once = reconcile(candidates, &options);
        let twice = reconcile(once.clone(), &options);
        assert_eq!(once, twice);

        let texts: Vec<&str> = once.iter().map(|h| h.text.as_str()).collect();
        assert_eq!(texts, vec!["Intro duction", "Background", "Results"]);
    }

    #[test]
    fn test_extract_full_pipeline() {
        let mut page1 = Page::new(1);
        page1.add_span(TextSpan::new("Service Agreement", 22.0));
        page1.add_span(TextSpan::new("Definitions", 16.0));
        page1.add_span(TextSpan::new("body copy in small print", 10.0));
        page1.add_line("1. Scope of Services");

        let mut page2 = Page::new(2);
        page2.add_span(TextSpan::new("PAYMENT SCHEDULE", 14.0));
        page2.add_table(Table::from_rows(vec![
            TableRow::from_texts(["Milestone", "Amount"]),
            TableRow::from_texts(["Kickoff", "N/A"]),
        ]));

        let mut doc = Document::new();
        doc.add_page(page1);
        doc.add_page(page2);

        let result = OutlineExtractor::new().extract(&doc, "agreement");
        assert_eq!(result.title, "Service Agreement");

        let texts: Vec<&str> = result.outline.iter().map(|h| h.text.as_str()).collect();
        assert!(texts.contains(&"Service Agreement"));
        assert!(texts.contains(&"Definitions"));
        assert!(texts.contains(&"Scope of Services"));
        assert!(texts.contains(&"PAYMENT SCHEDULE"));
        assert!(texts.contains(&"Milestone | Amount"));

        // Ordered by page, then level rank.
        let pages: Vec<u32> = result.outline.iter().map(|h| h.page).collect();
        let mut sorted_pages = pages.clone();
        sorted_pages.sort();
        assert_eq!(pages, sorted_pages);
    }

    #[test]
    fn test_empty_document_yields_stem_title_and_empty_outline() {
        let doc = Document::new();
        let result = OutlineExtractor::new().extract(&doc, "blank");
        assert_eq!(result.title, "blank");
        assert!(result.outline.is_empty());
    }

    struct FailingSource;

    impl HeadingSource for FailingSource {
        fn name(&self) -> &str {
            "failing"
        }

        fn produce(&self, _doc: &Document, _options: &OutlineOptions) -> crate::error::Result<Vec<Heading>> {
            Err(Error::TextExtract("synthetic failure".to_string()))
        }
    }

    #[test]
    fn test_source_failure_is_isolated() {
        let mut page = Page::new(1);
        page.add_span(TextSpan::new("Resilient Heading", 20.0));
        let mut doc = Document::new();
        doc.add_page(page);

        let extractor = OutlineExtractor::empty(OutlineOptions::default())
            .add_source(Box::new(FailingSource))
            .add_source(Box::new(FontSizeSource));
        let result = extractor.extract(&doc, "doc");
        assert_eq!(result.outline.len(), 1);
        assert_eq!(result.outline[0].text, "Resilient Heading");
    }
}
