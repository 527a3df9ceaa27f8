//! Heading candidate sources.
//!
//! Each source reads one extraction signal (font sizes, numbered lines,
//! capitalization, table headers) and proposes headings independently.
//! The reconciler owns combining them.

use log::debug;
use regex::Regex;

use super::filter::{char_count, is_numeral_like, is_purely_numeric};
use super::thresholds::SizeThresholds;
use super::OutlineOptions;
use crate::error::Result;
use crate::model::{Document, Heading, HeadingLevel};

/// A producer of heading candidates from one extraction signal.
///
/// Sources are isolated: an error returned from [`produce`](Self::produce)
/// costs that source's candidates and nothing else.
pub trait HeadingSource: Send + Sync {
    /// Short name used in logs.
    fn name(&self) -> &str;

    /// Produce candidates in page order, encounter order within a page.
    fn produce(&self, doc: &Document, options: &OutlineOptions) -> Result<Vec<Heading>>;
}

/// The built-in sources in their fixed pipeline order.
pub fn default_sources() -> Vec<Box<dyn HeadingSource>> {
    vec![
        Box::new(FontSizeSource),
        Box::new(NumberedLineSource::new()),
        Box::new(AllCapsSource),
        Box::new(TableHeaderSource),
    ]
}

/// Classifies spans against the document-wide font-size distribution.
#[derive(Debug, Default, Clone, Copy)]
pub struct FontSizeSource;

impl HeadingSource for FontSizeSource {
    fn name(&self) -> &str {
        "font-size"
    }

    fn produce(&self, doc: &Document, options: &OutlineOptions) -> Result<Vec<Heading>> {
        let Some(thresholds) = SizeThresholds::from_document(doc, options.min_size_floor) else {
            return Ok(Vec::new());
        };
        debug!(
            "font-size thresholds: h1={} h2={} h3={} min={}",
            thresholds.h1, thresholds.h2, thresholds.h3, thresholds.min_size
        );

        let mut headings = Vec::new();
        for (page, span) in doc.spans_with_pages() {
            let text = span.trimmed();
            if span.size < thresholds.min_size || char_count(text) < 2 {
                continue;
            }
            if is_purely_numeric(text)
                || is_numeral_like(text)
                || matches_denylist(text, &options.denylist)
            {
                continue;
            }
            let Some(level) = thresholds.classify(span.size, options.size_tolerance) else {
                continue;
            };
            if char_count(text) > options.max_heading_chars {
                continue;
            }
            headings.push(Heading::new(level, text, page));
        }
        Ok(headings)
    }
}

fn matches_denylist(text: &str, denylist: &[String]) -> bool {
    let lowered = text.to_lowercase();
    denylist
        .iter()
        .any(|token| lowered.contains(&token.to_lowercase()))
}

/// Reads numbered or serial-numbered list lines ("1. Scope", "S.No) Item").
#[derive(Debug, Clone)]
pub struct NumberedLineSource {
    pattern: Regex,
}

impl NumberedLineSource {
    /// Create the source with its line pattern.
    pub fn new() -> Self {
        Self {
            pattern: Regex::new(r"^\s*(?:S\.?No\.?|\d+)[\.)]\s*(.+)").unwrap(),
        }
    }
}

impl Default for NumberedLineSource {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadingSource for NumberedLineSource {
    fn name(&self) -> &str {
        "numbered-line"
    }

    fn produce(&self, doc: &Document, _options: &OutlineOptions) -> Result<Vec<Heading>> {
        let mut headings = Vec::new();
        for page in &doc.pages {
            for line in &page.lines {
                let Some(remainder) = self
                    .pattern
                    .captures(line)
                    .and_then(|caps| caps.get(1))
                    .map(|m| m.as_str().trim())
                else {
                    continue;
                };
                if !remainder.is_empty() {
                    headings.push(Heading::new(HeadingLevel::H2, remainder, page.number));
                }
            }
        }
        Ok(headings)
    }
}

/// Treats large, mostly-uppercase spans as section banners.
#[derive(Debug, Default, Clone, Copy)]
pub struct AllCapsSource;

impl HeadingSource for AllCapsSource {
    fn name(&self) -> &str {
        "all-caps"
    }

    fn produce(&self, doc: &Document, options: &OutlineOptions) -> Result<Vec<Heading>> {
        let mut headings = Vec::new();
        for (page, span) in doc.spans_with_pages() {
            let text = span.trimmed();
            let count = char_count(text);
            if count <= options.caps_min_chars {
                continue;
            }
            let upper = text.chars().filter(|c| c.is_uppercase()).count();
            let ratio = upper as f32 / count as f32;
            if ratio > options.caps_ratio && span.size > options.caps_min_size {
                headings.push(Heading::new(HeadingLevel::H1, text, page));
            }
        }
        Ok(headings)
    }
}

/// Promotes table header rows to headings.
#[derive(Debug, Default, Clone, Copy)]
pub struct TableHeaderSource;

impl HeadingSource for TableHeaderSource {
    fn name(&self) -> &str {
        "table-header"
    }

    fn produce(&self, doc: &Document, _options: &OutlineOptions) -> Result<Vec<Heading>> {
        let mut headings = Vec::new();
        for page in &doc.pages {
            for table in &page.tables {
                let Some(header) = table.header_row() else {
                    continue;
                };
                let joined = header.filled_cells().collect::<Vec<_>>().join(" | ");
                if !joined.is_empty() {
                    headings.push(Heading::new(HeadingLevel::H2, joined, page.number));
                }
            }
        }
        Ok(headings)
    }
}
