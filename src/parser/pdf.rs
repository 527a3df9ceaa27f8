//! PDF document parser built on lopdf.

use std::path::Path;

use chrono::{DateTime, NaiveDate, Utc};
use lopdf::Document as LopdfDocument;
use rayon::prelude::*;

use crate::detect;
use crate::error::{Error, Result};
use crate::model::{Document, Metadata, Page, TextSpan};

use super::layout::{assemble_lines, decode_text_simple, ContentExtractor};
use super::options::{ErrorMode, ParseOptions};
use super::table_detector::TableDetector;

/// PDF document parser.
///
/// Loads a document once and turns it into the [`Document`] model: per-page
/// sized spans, reading-order lines, and detected tables.
pub struct PdfParser {
    doc: LopdfDocument,
    options: ParseOptions,
}

impl PdfParser {
    /// Open a PDF file.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::open_with_options(path, ParseOptions::default())
    }

    /// Open a PDF file with custom options.
    pub fn open_with_options<P: AsRef<Path>>(path: P, options: ParseOptions) -> Result<Self> {
        let path = path.as_ref();

        // Sniff the header first for a clear error on non-PDF input.
        detect::sniff_version_from_path(path)?;

        let doc = LopdfDocument::load(path)?;
        Ok(Self { doc, options })
    }

    /// Parse a PDF from bytes.
    pub fn from_bytes(data: &[u8]) -> Result<Self> {
        Self::from_bytes_with_options(data, ParseOptions::default())
    }

    /// Parse a PDF from bytes with custom options.
    pub fn from_bytes_with_options(data: &[u8], options: ParseOptions) -> Result<Self> {
        detect::sniff_version(data)?;

        let doc = LopdfDocument::load_mem(data)?;
        Ok(Self { doc, options })
    }

    /// Parse the document into the structured model.
    ///
    /// Pages come out in page order regardless of parallelism. In lenient
    /// mode a page that fails to extract becomes an empty page; in strict
    /// mode the first failure aborts the parse.
    pub fn parse(&self) -> Result<Document> {
        if self.is_encrypted() {
            return Err(Error::Encrypted);
        }

        let mut document = Document::new();
        document.metadata = self.metadata();

        let page_numbers: Vec<u32> = self.doc.get_pages().keys().copied().collect();

        let pages: Vec<Page> = if self.options.parallel {
            page_numbers
                .par_iter()
                .map(|&n| self.page_or_empty(n))
                .collect::<Result<Vec<_>>>()?
        } else {
            page_numbers
                .iter()
                .map(|&n| self.page_or_empty(n))
                .collect::<Result<Vec<_>>>()?
        };

        for page in pages {
            document.add_page(page);
        }

        log::debug!(
            "parsed {} pages from PDF {}",
            document.page_count(),
            self.version()
        );
        Ok(document)
    }

    /// Extract one page, applying the error mode on failure.
    fn page_or_empty(&self, page_num: u32) -> Result<Page> {
        match self.build_page(page_num) {
            Ok(page) => Ok(page),
            Err(e) if self.options.error_mode == ErrorMode::Lenient => {
                log::warn!("failed to extract page {}: {}", page_num, e);
                Ok(Page::new(page_num))
            }
            Err(e) => Err(e),
        }
    }

    /// Build the model page: spans, assembled lines, and tables.
    fn build_page(&self, page_num: u32) -> Result<Page> {
        let extractor = ContentExtractor::new(&self.doc);
        let positioned = extractor.extract_page_spans(page_num)?;

        let mut page = Page::new(page_num);

        if self.options.detect_tables {
            for table in TableDetector::new().detect(&positioned) {
                page.add_table(table);
            }
        }

        for line in assemble_lines(positioned) {
            let text = line.text();
            if !text.trim().is_empty() {
                page.add_line(text);
            }
            for span in line.spans {
                page.add_span(TextSpan::new(span.text, span.size));
            }
        }

        Ok(page)
    }

    /// Extract document metadata from the trailer Info dictionary.
    pub fn metadata(&self) -> Metadata {
        let mut metadata = Metadata::with_version(self.doc.version.clone());
        metadata.page_count = self.page_count();
        metadata.encrypted = self.is_encrypted();

        if let Ok(info_ref) = self
            .doc
            .trailer
            .get(b"Info")
            .and_then(|info| info.as_reference())
        {
            if let Ok(dict) = self.doc.get_dictionary(info_ref) {
                metadata.title = dict_string(dict, b"Title");
                metadata.author = dict_string(dict, b"Author");
                metadata.subject = dict_string(dict, b"Subject");
                metadata.keywords = dict_string(dict, b"Keywords");
                metadata.creator = dict_string(dict, b"Creator");
                metadata.producer = dict_string(dict, b"Producer");
                metadata.created =
                    dict_string(dict, b"CreationDate").as_deref().and_then(parse_pdf_date);
                metadata.modified =
                    dict_string(dict, b"ModDate").as_deref().and_then(parse_pdf_date);
            }
        }

        metadata
    }

    /// Get the number of pages.
    pub fn page_count(&self) -> u32 {
        self.doc.get_pages().len() as u32
    }

    /// Check if the document is encrypted.
    pub fn is_encrypted(&self) -> bool {
        self.doc.is_encrypted()
    }

    /// Get the PDF version from the header (e.g. "1.7").
    pub fn version(&self) -> &str {
        &self.doc.version
    }
}

/// Read a text value from a PDF dictionary.
fn dict_string(dict: &lopdf::Dictionary, key: &[u8]) -> Option<String> {
    match dict.get(key).ok()? {
        lopdf::Object::String(bytes, _) => {
            let text = decode_text_simple(bytes);
            let text = text.trim();
            if text.is_empty() {
                None
            } else {
                Some(text.to_string())
            }
        }
        lopdf::Object::Name(bytes) => String::from_utf8(bytes.clone()).ok(),
        _ => None,
    }
}

/// Parse a PDF date string, `D:YYYYMMDDHHmmSS` with optional suffix.
///
/// Missing fields default to the start of their range; timezone offsets
/// are ignored.
fn parse_pdf_date(s: &str) -> Option<DateTime<Utc>> {
    let s = s.strip_prefix("D:").unwrap_or(s);
    if s.len() < 4 {
        return None;
    }

    let year: i32 = s.get(0..4)?.parse().ok()?;
    let field = |range: std::ops::Range<usize>, default: u32| -> u32 {
        s.get(range).and_then(|v| v.parse().ok()).unwrap_or(default)
    };

    let date = NaiveDate::from_ymd_opt(year, field(4..6, 1), field(6..8, 1))?;
    let time = date.and_hms_opt(field(8..10, 0), field(10..12, 0), field(12..14, 0))?;
    Some(DateTime::from_naive_utc_and_offset(time, Utc))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Datelike, Timelike};
    use lopdf::{Dictionary, Object, StringFormat};

    #[test]
    fn test_parse_pdf_date_full() {
        let date = parse_pdf_date("D:20240115103045+09'00'").unwrap();
        assert_eq!(date.year(), 2024);
        assert_eq!(date.month(), 1);
        assert_eq!(date.day(), 15);
        assert_eq!(date.hour(), 10);
        assert_eq!(date.minute(), 30);
        assert_eq!(date.second(), 45);
    }

    #[test]
    fn test_parse_pdf_date_year_only() {
        let date = parse_pdf_date("D:2024").unwrap();
        assert_eq!(date.year(), 2024);
        assert_eq!(date.month(), 1);
        assert_eq!(date.day(), 1);
    }

    #[test]
    fn test_parse_pdf_date_without_prefix() {
        let date = parse_pdf_date("20231201").unwrap();
        assert_eq!(date.year(), 2023);
        assert_eq!(date.month(), 12);
        assert_eq!(date.day(), 1);
    }

    #[test]
    fn test_parse_pdf_date_rejects_garbage() {
        assert!(parse_pdf_date("D:20").is_none());
        assert!(parse_pdf_date("yesterday").is_none());
        assert!(parse_pdf_date("D:20241399").is_none());
    }

    #[test]
    fn test_dict_string_plain() {
        let mut dict = Dictionary::new();
        dict.set(
            "Title",
            Object::String(b"Annual Report".to_vec(), StringFormat::Literal),
        );
        assert_eq!(
            dict_string(&dict, b"Title"),
            Some("Annual Report".to_string())
        );
    }

    #[test]
    fn test_dict_string_utf16be() {
        let mut dict = Dictionary::new();
        dict.set(
            "Title",
            Object::String(
                vec![0xFE, 0xFF, 0x00, 0x48, 0x00, 0x69],
                StringFormat::Literal,
            ),
        );
        assert_eq!(dict_string(&dict, b"Title"), Some("Hi".to_string()));
    }

    #[test]
    fn test_dict_string_missing_or_blank() {
        let mut dict = Dictionary::new();
        dict.set("Title", Object::String(b"   ".to_vec(), StringFormat::Literal));
        assert_eq!(dict_string(&dict, b"Title"), None);
        assert_eq!(dict_string(&dict, b"Author"), None);
    }
}
