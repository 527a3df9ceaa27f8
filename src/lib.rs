//! # retoc
//!
//! Table-of-contents inference for PDF documents.
//!
//! Most PDFs ship without bookmarks. This library reconstructs a plausible
//! outline from layout signals instead: font-size statistics, numbered
//! lines, all-caps runs, and table headers, reconciled into an ordered
//! heading list under a resolved document title. It also extracts per-page
//! text sections with table blocks and an optional OCR fallback.
//!
//! ## Quick Start
//!
//! ```no_run
//! use retoc::outline_file;
//!
//! fn main() -> retoc::Result<()> {
//!     let outline = outline_file("document.pdf")?;
//!
//!     println!("{}", outline.title);
//!     for heading in &outline.outline {
//!         println!("p{:>3} {} {}", heading.page, heading.level, heading.text);
//!     }
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Heading inference**: font-size thresholds, numbered lines,
//!   all-caps runs, and table headers, each an independent source
//! - **Title resolution**: cleaned metadata title, then the largest
//!   first-page span, then the file name
//! - **Section extraction**: per-page text with CSV table blocks,
//!   language detection, and a pluggable OCR seam
//! - **Parallel parsing**: pages are processed with Rayon

pub mod detect;
pub mod error;
pub mod model;
pub mod outline;
pub mod parser;
pub mod sections;

// Re-export commonly used types
pub use detect::{is_pdf, is_pdf_bytes, sniff_version, sniff_version_from_path};
pub use error::{Error, Result};
pub use model::{
    Document, DocumentOutline, Heading, HeadingLevel, Metadata, Page, Table, TableRow, TextSpan,
};
pub use outline::{HeadingSource, OutlineExtractor, OutlineOptions};
pub use parser::{ErrorMode, ParseOptions, PdfParser};
pub use sections::{extract_sections, NoOcr, OcrEngine, PageText, SectionOptions};

use std::path::Path;

/// Parse a PDF file and return the structured document model.
///
/// # Example
///
/// ```no_run
/// use retoc::parse_file;
///
/// let doc = parse_file("document.pdf").unwrap();
/// println!("Pages: {}", doc.page_count());
/// ```
pub fn parse_file<P: AsRef<Path>>(path: P) -> Result<Document> {
    let parser = PdfParser::open(path)?;
    parser.parse()
}

/// Parse a PDF file with custom options.
///
/// # Example
///
/// ```no_run
/// use retoc::{parse_file_with_options, ParseOptions};
///
/// let options = ParseOptions::new().strict().sequential();
/// let doc = parse_file_with_options("document.pdf", options).unwrap();
/// ```
pub fn parse_file_with_options<P: AsRef<Path>>(path: P, options: ParseOptions) -> Result<Document> {
    let parser = PdfParser::open_with_options(path, options)?;
    parser.parse()
}

/// Parse a PDF from bytes.
pub fn parse_bytes(data: &[u8]) -> Result<Document> {
    let parser = PdfParser::from_bytes(data)?;
    parser.parse()
}

/// Parse a PDF from bytes with custom options.
pub fn parse_bytes_with_options(data: &[u8], options: ParseOptions) -> Result<Document> {
    let parser = PdfParser::from_bytes_with_options(data, options)?;
    parser.parse()
}

/// Infer the outline of a PDF file.
///
/// # Example
///
/// ```no_run
/// use retoc::outline_file;
///
/// let outline = outline_file("document.pdf").unwrap();
/// println!("{} headings", outline.outline.len());
/// ```
pub fn outline_file<P: AsRef<Path>>(path: P) -> Result<DocumentOutline> {
    outline_file_with_options(path, OutlineOptions::default())
}

/// Infer the outline of a PDF file with custom options.
///
/// # Example
///
/// ```no_run
/// use retoc::{outline_file_with_options, OutlineOptions};
///
/// let options = OutlineOptions::new().with_size_tolerance(0.85);
/// let outline = outline_file_with_options("document.pdf", options).unwrap();
/// ```
pub fn outline_file_with_options<P: AsRef<Path>>(
    path: P,
    options: OutlineOptions,
) -> Result<DocumentOutline> {
    let path = path.as_ref();
    let document = parse_file(path)?;
    let stem = file_stem(path);
    Ok(OutlineExtractor::with_options(options).extract(&document, &stem))
}

/// Infer the outline of a PDF given as bytes.
///
/// `stem` stands in for the file name in title resolution.
pub fn outline_bytes(data: &[u8], stem: &str) -> Result<DocumentOutline> {
    let document = parse_bytes(data)?;
    Ok(OutlineExtractor::new().extract(&document, stem))
}

/// Extract per-page text sections from a PDF file.
///
/// Uses default section options and no OCR engine; for OCR or custom
/// thresholds, parse the document and call
/// [`extract_sections`] directly.
///
/// # Example
///
/// ```no_run
/// use retoc::extract_file;
///
/// for section in extract_file("document.pdf").unwrap() {
///     println!("page {} [{}]: {} chars", section.page, section.language, section.text.len());
/// }
/// ```
pub fn extract_file<P: AsRef<Path>>(path: P) -> Result<Vec<PageText>> {
    let path = path.as_ref();
    let document = parse_file(path)?;
    let name = file_name(path);
    Ok(extract_sections(
        &document,
        &name,
        &NoOcr,
        &SectionOptions::default(),
    ))
}

/// File stem for title fallback, empty when the path has none.
fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// Full file name for page records, empty when the path has none.
fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}
