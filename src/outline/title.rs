//! Title resolution.

use super::filter::{char_count, is_purely_numeric};
use super::OutlineOptions;
use crate::model::Document;

/// Authoring-tool prefix frequently baked into metadata titles.
const AUTHORING_PREFIX: &str = "Microsoft Word - ";
/// Extension fragments stripped from metadata titles, longest first.
const EXTENSION_FRAGMENTS: [&str; 2] = [".docx", ".doc"];

/// Resolve the document title through a strict three-tier fallback:
/// cleaned metadata title, then the largest qualifying first-page span,
/// then the filename stem. Never fails; tier three is total.
pub fn resolve_title(doc: &Document, stem: &str, options: &OutlineOptions) -> String {
    if let Some(title) = metadata_title(doc, stem, options) {
        return title;
    }
    if let Some(title) = largest_first_page_span(doc, options) {
        return title;
    }
    stem.to_string()
}

fn metadata_title(doc: &Document, stem: &str, options: &OutlineOptions) -> Option<String> {
    let raw = doc.metadata.title.as_deref()?.trim();
    if raw.is_empty() {
        return None;
    }
    let lowered = raw.to_lowercase();
    if lowered == "untitled" || lowered == stem.to_lowercase() {
        return None;
    }

    let mut cleaned = raw.replace(AUTHORING_PREFIX, "");
    for fragment in EXTENSION_FRAGMENTS {
        cleaned = cleaned.replace(fragment, "");
    }
    let cleaned = cleaned.trim();
    if char_count(cleaned) > options.min_title_chars {
        Some(cleaned.to_string())
    } else {
        None
    }
}

fn largest_first_page_span(doc: &Document, options: &OutlineOptions) -> Option<String> {
    let page = doc.get_page(1)?;
    let mut largest: Option<(&str, f32)> = None;
    for span in &page.spans {
        let text = span.trimmed();
        if char_count(text) <= options.min_title_chars || is_purely_numeric(text) {
            continue;
        }
        // Strictly greater, so the first of equally-sized spans wins.
        let best = largest.map(|(_, size)| size).unwrap_or(0.0);
        if span.size > best {
            largest = Some((text, span.size));
        }
    }
    largest.map(|(text, _)| text.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Metadata, Page, TextSpan};

    fn doc_with_title(title: Option<&str>) -> Document {
        let mut doc = Document::new();
        doc.metadata = Metadata {
            title: title.map(String::from),
            ..Default::default()
        };
        doc
    }

    fn options() -> OutlineOptions {
        OutlineOptions::default()
    }

    #[test]
    fn test_metadata_title_wins() {
        let doc = doc_with_title(Some("Annual Report 2024"));
        assert_eq!(resolve_title(&doc, "report", &options()), "Annual Report 2024");
    }

    #[test]
    fn test_metadata_artifacts_stripped() {
        let doc = doc_with_title(Some("Microsoft Word - Proposal.docx"));
        assert_eq!(resolve_title(&doc, "proposal-final", &options()), "Proposal");
    }

    #[test]
    fn test_untitled_metadata_rejected() {
        let mut doc = doc_with_title(Some("Untitled"));
        let mut page = Page::new(1);
        page.add_span(TextSpan::new("Quarterly Review", 28.0));
        doc.add_page(page);
        assert_eq!(resolve_title(&doc, "scan01", &options()), "Quarterly Review");
    }

    #[test]
    fn test_metadata_equal_to_stem_rejected() {
        let mut doc = doc_with_title(Some("Report"));
        let mut page = Page::new(1);
        page.add_span(TextSpan::new("Actual Title", 30.0));
        doc.add_page(page);
        assert_eq!(resolve_title(&doc, "REPORT", &options()), "Actual Title");
    }

    #[test]
    fn test_largest_span_skips_numeric_and_short() {
        let mut doc = doc_with_title(None);
        let mut page = Page::new(1);
        page.add_span(TextSpan::new("2024", 40.0));
        page.add_span(TextSpan::new("Q1", 36.0));
        page.add_span(TextSpan::new("Market Outlook", 24.0));
        page.add_span(TextSpan::new("Fine print", 8.0));
        doc.add_page(page);
        assert_eq!(resolve_title(&doc, "doc", &options()), "Market Outlook");
    }

    #[test]
    fn test_first_of_equal_sizes_wins() {
        let mut doc = doc_with_title(None);
        let mut page = Page::new(1);
        page.add_span(TextSpan::new("First Banner", 24.0));
        page.add_span(TextSpan::new("Second Banner", 24.0));
        doc.add_page(page);
        assert_eq!(resolve_title(&doc, "doc", &options()), "First Banner");
    }

    #[test]
    fn test_stem_fallback() {
        let doc = doc_with_title(None);
        assert_eq!(resolve_title(&doc, "invoice-0042", &options()), "invoice-0042");
    }

    #[test]
    fn test_short_cleaned_metadata_falls_through() {
        // After artifact stripping only "Doc" remains, too short to accept.
        let doc = doc_with_title(Some("Doc.docx"));
        assert_eq!(resolve_title(&doc, "paper", &options()), "paper");
    }
}
