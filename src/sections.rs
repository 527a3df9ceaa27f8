//! Page-level text sections.
//!
//! Produces one text record per page: the line view when it is rich
//! enough, the raw span view otherwise, detected tables appended as CSV
//! blocks, and an OCR fallback for pages with no usable text layer.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::model::{Document, Page, Table};

/// Marker line inserted before appended table blocks.
const TABLE_MARKER: &str = "[Extracted Tables:]";

/// Options for section extraction.
#[derive(Debug, Clone)]
pub struct SectionOptions {
    /// Below this many chars, fall back to the raw span view
    pub min_text_chars: usize,

    /// Below this many chars, ask the OCR engine for the page
    pub ocr_trigger_chars: usize,

    /// Whether to run language detection on each page
    pub detect_language: bool,
}

impl SectionOptions {
    /// Create new section options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the span-view fallback threshold.
    pub fn with_min_text_chars(mut self, chars: usize) -> Self {
        self.min_text_chars = chars;
        self
    }

    /// Set the OCR trigger threshold.
    pub fn with_ocr_trigger_chars(mut self, chars: usize) -> Self {
        self.ocr_trigger_chars = chars;
        self
    }

    /// Enable or disable language detection.
    pub fn with_language_detection(mut self, detect: bool) -> Self {
        self.detect_language = detect;
        self
    }
}

impl Default for SectionOptions {
    fn default() -> Self {
        Self {
            min_text_chars: 20,
            ocr_trigger_chars: 10,
            detect_language: true,
        }
    }
}

/// Recognizes text on rendered pages.
///
/// Section extraction consults the engine only for pages whose text layer
/// came up nearly empty. `Ok(None)` means the engine has no result for
/// the page; the extracted text is then kept as is.
pub trait OcrEngine: Send + Sync {
    /// Recognize a page by its 1-indexed number.
    fn recognize_page(&self, page_number: u32) -> Result<Option<String>>;
}

/// The default engine: never produces text.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOcr;

impl OcrEngine for NoOcr {
    fn recognize_page(&self, _page_number: u32) -> Result<Option<String>> {
        Ok(None)
    }
}

/// One page of extracted text with provenance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageText {
    /// Source document file name
    pub document: String,

    /// Page number (1-indexed)
    pub page: u32,

    /// Detected language code, or "unknown"
    pub language: String,

    /// Whether OCR produced the text
    pub ocr_used: bool,

    /// Extracted text
    pub text: String,
}

/// Extract per-page text sections from a parsed document.
///
/// `document_name` is recorded verbatim on every page record; callers
/// pass the source file name.
pub fn extract_sections(
    document: &Document,
    document_name: &str,
    ocr: &dyn OcrEngine,
    options: &SectionOptions,
) -> Vec<PageText> {
    document
        .pages
        .iter()
        .map(|page| {
            let (text, ocr_used) = page_section_text(page, ocr, options);
            let language = if options.detect_language && !text.is_empty() {
                detect_language(&text)
            } else {
                "unknown".to_string()
            };
            PageText {
                document: document_name.to_string(),
                page: page.number,
                language,
                ocr_used,
                text,
            }
        })
        .collect()
}

/// Assemble one page's text and report whether OCR produced it.
fn page_section_text(page: &Page, ocr: &dyn OcrEngine, options: &SectionOptions) -> (String, bool) {
    let mut text = page.plain_text().trim().to_string();

    // Line assembly can come up short on sparse pages; the raw span view
    // sometimes still carries the content.
    if text.chars().count() < options.min_text_chars {
        let fallback = page.span_text().trim().to_string();
        if !fallback.is_empty() {
            text = fallback;
        }
    }

    let blocks: Vec<String> = page
        .tables
        .iter()
        .filter(|table| !table.is_empty())
        .map(table_block)
        .collect();
    if !blocks.is_empty() {
        let joined = blocks.join("\n\n");
        text = if text.is_empty() {
            format!("{TABLE_MARKER}\n{joined}")
        } else {
            format!("{text}\n\n{TABLE_MARKER}\n{joined}").trim().to_string()
        };
    }

    if text.chars().count() < options.ocr_trigger_chars {
        match ocr.recognize_page(page.number) {
            Ok(Some(recognized)) => return (recognized, true),
            Ok(None) => {}
            Err(e) => log::warn!("OCR failed on page {}: {}", page.number, e),
        }
    }

    (text, false)
}

/// Render a table as CSV lines, one row per line.
fn table_block(table: &Table) -> String {
    table
        .rows
        .iter()
        .map(|row| row.to_csv_line())
        .collect::<Vec<_>>()
        .join("\n")
}

fn detect_language(text: &str) -> String {
    whatlang::detect(text)
        .map(|info| info.lang().code().to_string())
        .unwrap_or_else(|| "unknown".to_string())
}
