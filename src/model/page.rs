//! Page-level types.

use super::Table;
use serde::{Deserialize, Serialize};

/// A single page, carrying the extraction views outline inference reads:
/// sized spans, plain text lines, and detected tables.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Page {
    /// Page number (1-indexed)
    pub number: u32,

    /// Text spans in reading order
    pub spans: Vec<TextSpan>,

    /// Plain text lines in reading order
    pub lines: Vec<String>,

    /// Tables detected on the page
    pub tables: Vec<Table>,
}

impl Page {
    /// Create a new empty page.
    pub fn new(number: u32) -> Self {
        Self {
            number,
            spans: Vec::new(),
            lines: Vec::new(),
            tables: Vec::new(),
        }
    }

    /// Add a span to the page.
    pub fn add_span(&mut self, span: TextSpan) {
        self.spans.push(span);
    }

    /// Add a text line to the page.
    pub fn add_line(&mut self, line: impl Into<String>) {
        self.lines.push(line.into());
    }

    /// Add a table to the page.
    pub fn add_table(&mut self, table: Table) {
        self.tables.push(table);
    }

    /// Check if the page has no extracted content.
    pub fn is_empty(&self) -> bool {
        self.spans.is_empty() && self.lines.is_empty() && self.tables.is_empty()
    }

    /// Get plain text content of the page (joined lines).
    pub fn plain_text(&self) -> String {
        self.lines.join("\n")
    }

    /// Get the raw span texts joined with newlines.
    ///
    /// A coarser view than [`plain_text`](Self::plain_text), used as a
    /// fallback when line grouping produced almost nothing.
    pub fn span_text(&self) -> String {
        self.spans
            .iter()
            .map(|span| span.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl Default for Page {
    fn default() -> Self {
        Self::new(1)
    }
}

/// A run of text with a uniform font size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextSpan {
    /// Span text
    pub text: String,

    /// Font size in points
    pub size: f32,
}

impl TextSpan {
    /// Create a new span.
    pub fn new(text: impl Into<String>, size: f32) -> Self {
        Self {
            text: text.into(),
            size,
        }
    }

    /// Get the trimmed text.
    pub fn trimmed(&self) -> &str {
        self.text.trim()
    }
}
