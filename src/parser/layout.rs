//! Content-stream text extraction.
//!
//! Walks page content streams to recover text runs with position and font
//! size, then assembles them into reading-order lines. Position feeds line
//! grouping and table detection; the model keeps only text and size.

use std::collections::BTreeMap;

use lopdf::{Document as LopdfDocument, Object, ObjectId};
use unicode_normalization::UnicodeNormalization;

use crate::error::{Error, Result};

/// A text run with page-space position.
///
/// Width is estimated from character count and font size; it only has to be
/// good enough for gap-based spacing and column bucketing.
#[derive(Debug, Clone)]
pub struct PositionedSpan {
    /// Decoded, NFC-normalized text
    pub text: String,
    /// X position (left edge)
    pub x: f32,
    /// Y position (baseline)
    pub y: f32,
    /// Estimated width
    pub width: f32,
    /// Effective font size in points
    pub size: f32,
}

impl PositionedSpan {
    /// Create a span, estimating its width.
    pub fn new(text: impl Into<String>, x: f32, y: f32, size: f32) -> Self {
        let text = text.into();
        let width = text.chars().count() as f32 * size * 0.5;
        Self {
            text,
            x,
            y,
            width,
            size,
        }
    }

    /// Right edge of the estimated bounding box.
    pub fn right(&self) -> f32 {
        self.x + self.width
    }
}

/// A baseline-grouped run of spans.
#[derive(Debug, Clone)]
pub struct Line {
    /// Spans sorted by X position
    pub spans: Vec<PositionedSpan>,
    /// Baseline Y of the first span
    pub y: f32,
}

impl Line {
    fn from_spans(mut spans: Vec<PositionedSpan>) -> Self {
        spans.sort_by(|a, b| a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal));
        let y = spans.first().map(|s| s.y).unwrap_or(0.0);
        Self { spans, y }
    }

    /// Combined text of the line, inserting spaces where X gaps warrant.
    pub fn text(&self) -> String {
        let mut result = String::new();
        for (i, span) in self.spans.iter().enumerate() {
            if i == 0 {
                result.push_str(&span.text);
                continue;
            }
            let prev = &self.spans[i - 1];
            let gap = span.x - prev.right();
            let char_count = span.text.chars().count();
            let avg_char_width = if char_count > 0 && span.width > 0.0 {
                span.width / char_count as f32
            } else {
                span.size * 0.5
            };
            let needs_space = gap > avg_char_width * 0.2
                && !prev.text.ends_with(' ')
                && !span.text.starts_with(' ');
            if needs_space {
                result.push(' ');
            }
            result.push_str(&span.text);
        }
        result
    }
}

/// Group spans into lines by baseline, top-to-bottom.
///
/// Spans within 30% of their font size of the line's anchor baseline join
/// that line. PDF Y grows upward, so lines come out top-first.
pub fn assemble_lines(spans: Vec<PositionedSpan>) -> Vec<Line> {
    if spans.is_empty() {
        return Vec::new();
    }

    let mut spans = spans;
    spans.sort_by(|a, b| {
        let y_cmp = b.y.partial_cmp(&a.y).unwrap_or(std::cmp::Ordering::Equal);
        if y_cmp == std::cmp::Ordering::Equal {
            a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal)
        } else {
            y_cmp
        }
    });

    let mut lines: Vec<Line> = Vec::new();
    let mut current: Vec<PositionedSpan> = Vec::new();
    let mut anchor_y: Option<f32> = None;

    for span in spans {
        let tolerance = span.size * 0.3;
        match anchor_y {
            Some(y) if (span.y - y).abs() <= tolerance => current.push(span),
            _ => {
                if !current.is_empty() {
                    lines.push(Line::from_spans(std::mem::take(&mut current)));
                }
                anchor_y = Some(span.y);
                current.push(span);
            }
        }
    }
    if !current.is_empty() {
        lines.push(Line::from_spans(current));
    }

    lines
}

/// Extracts positioned spans from page content streams.
pub struct ContentExtractor<'a> {
    doc: &'a LopdfDocument,
}

impl<'a> ContentExtractor<'a> {
    /// Create an extractor over a loaded document.
    pub fn new(doc: &'a LopdfDocument) -> Self {
        Self { doc }
    }

    /// Extract the positioned spans of a page (1-indexed).
    pub fn extract_page_spans(&self, page_num: u32) -> Result<Vec<PositionedSpan>> {
        let pages = self.doc.get_pages();
        let page_id = *pages
            .get(&page_num)
            .ok_or(Error::PageOutOfRange(page_num, pages.len() as u32))?;

        let fonts = self
            .doc
            .get_page_fonts(page_id)
            .map_err(|e| Error::PdfParse(e.to_string()))?;

        let content = self.page_content(page_id)?;
        self.interpret(&content, &fonts)
    }

    /// Collect a page's content stream bytes, concatenating stream arrays.
    fn page_content(&self, page_id: ObjectId) -> Result<Vec<u8>> {
        let page_dict = self
            .doc
            .get_dictionary(page_id)
            .map_err(|e| Error::PdfParse(e.to_string()))?;

        let contents = page_dict
            .get(b"Contents")
            .map_err(|e| Error::PdfParse(e.to_string()))?;

        match contents {
            Object::Reference(r) => {
                if let Ok(Object::Stream(s)) = self.doc.get_object(*r) {
                    // Streams without a Filter entry make decompressed_content
                    // error; their raw bytes already are the content.
                    return Ok(s
                        .decompressed_content()
                        .unwrap_or_else(|_| s.content.clone()));
                }
                Err(Error::PdfParse("invalid content stream".to_string()))
            }
            Object::Array(arr) => {
                let mut content = Vec::new();
                for obj in arr {
                    if let Object::Reference(r) = obj {
                        if let Ok(Object::Stream(s)) = self.doc.get_object(*r) {
                            let data = s
                                .decompressed_content()
                                .unwrap_or_else(|_| s.content.clone());
                            content.extend_from_slice(&data);
                            content.push(b' ');
                        }
                    }
                }
                Ok(content)
            }
            _ => Err(Error::PdfParse("invalid content stream".to_string())),
        }
    }

    /// Interpret text operators, tracking the text matrix and active font.
    fn interpret(
        &self,
        content: &[u8],
        fonts: &BTreeMap<Vec<u8>, &lopdf::Dictionary>,
    ) -> Result<Vec<PositionedSpan>> {
        let content =
            lopdf::content::Content::decode(content).map_err(|e| Error::PdfParse(e.to_string()))?;

        let mut spans = Vec::new();
        let mut current_font: Vec<u8> = Vec::new();
        let mut current_size: f32 = 12.0;
        let mut matrix = TextMatrix::default();
        let mut in_text = false;

        for op in content.operations {
            match op.operator.as_str() {
                "BT" => {
                    in_text = true;
                    matrix = TextMatrix::default();
                }
                "ET" => {
                    in_text = false;
                }
                "Tf" => {
                    if op.operands.len() >= 2 {
                        if let Object::Name(name) = &op.operands[0] {
                            current_font = name.clone();
                        }
                        current_size = as_number(&op.operands[1]).unwrap_or(12.0);
                    }
                }
                "Td" | "TD" => {
                    if op.operands.len() >= 2 {
                        let tx = as_number(&op.operands[0]).unwrap_or(0.0);
                        let ty = as_number(&op.operands[1]).unwrap_or(0.0);
                        matrix.translate(tx, ty);
                    }
                }
                "Tm" => {
                    if op.operands.len() >= 6 {
                        matrix.set(
                            as_number(&op.operands[0]).unwrap_or(1.0),
                            as_number(&op.operands[1]).unwrap_or(0.0),
                            as_number(&op.operands[2]).unwrap_or(0.0),
                            as_number(&op.operands[3]).unwrap_or(1.0),
                            as_number(&op.operands[4]).unwrap_or(0.0),
                            as_number(&op.operands[5]).unwrap_or(0.0),
                        );
                    }
                }
                "T*" => {
                    matrix.next_line();
                }
                "Tj" | "TJ" => {
                    if in_text {
                        let text = self.decode_show_text(&op, fonts, &current_font);
                        self.push_span(&mut spans, text, &matrix, current_size);
                    }
                }
                "'" | "\"" => {
                    matrix.next_line();
                    if in_text {
                        let idx = if op.operator == "\"" { 2 } else { 0 };
                        if let Some(Object::String(bytes, _)) = op.operands.get(idx) {
                            let text = self.decode_string(bytes, fonts, &current_font);
                            self.push_span(&mut spans, text, &matrix, current_size);
                        }
                    }
                }
                _ => {}
            }
        }

        Ok(spans)
    }

    fn push_span(
        &self,
        spans: &mut Vec<PositionedSpan>,
        text: String,
        matrix: &TextMatrix,
        font_size: f32,
    ) {
        if text.trim().is_empty() {
            return;
        }
        let normalized: String = text.nfc().collect();
        let (x, y) = matrix.position();
        let effective_size = font_size * matrix.scale();
        spans.push(PositionedSpan::new(normalized, x, y, effective_size));
    }

    /// Decode the string payload of a Tj/TJ operator.
    ///
    /// TJ arrays interleave strings with kerning adjustments in 1/1000 text
    /// space units; large negative adjustments stand in for word spaces.
    fn decode_show_text(
        &self,
        op: &lopdf::content::Operation,
        fonts: &BTreeMap<Vec<u8>, &lopdf::Dictionary>,
        current_font: &[u8],
    ) -> String {
        const SPACE_THRESHOLD: f32 = 200.0;

        if op.operator == "TJ" {
            let Some(Object::Array(arr)) = op.operands.first() else {
                return String::new();
            };
            let mut combined = String::new();
            for item in arr {
                match item {
                    Object::String(bytes, _) => {
                        combined.push_str(&self.decode_string(bytes, fonts, current_font));
                    }
                    Object::Integer(n) => {
                        if -(*n as f32) > SPACE_THRESHOLD
                            && !combined.is_empty()
                            && !combined.ends_with(' ')
                        {
                            combined.push(' ');
                        }
                    }
                    Object::Real(n) => {
                        if -n > SPACE_THRESHOLD && !combined.is_empty() && !combined.ends_with(' ')
                        {
                            combined.push(' ');
                        }
                    }
                    _ => {}
                }
            }
            combined
        } else {
            match op.operands.first() {
                Some(Object::String(bytes, _)) => self.decode_string(bytes, fonts, current_font),
                _ => String::new(),
            }
        }
    }

    fn decode_string(
        &self,
        bytes: &[u8],
        fonts: &BTreeMap<Vec<u8>, &lopdf::Dictionary>,
        current_font: &[u8],
    ) -> String {
        let encoding = fonts
            .get(current_font)
            .and_then(|f| f.get_font_encoding(self.doc).ok());
        match encoding {
            Some(enc) => LopdfDocument::decode_text(&enc, bytes).unwrap_or_default(),
            None => decode_text_simple(bytes),
        }
    }
}

/// Text matrix for tracking position in a content stream.
#[derive(Debug, Clone)]
struct TextMatrix {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
}

impl Default for TextMatrix {
    fn default() -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            e: 0.0,
            f: 0.0,
        }
    }
}

impl TextMatrix {
    fn set(&mut self, a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) {
        self.a = a;
        self.b = b;
        self.c = c;
        self.d = d;
        self.e = e;
        self.f = f;
    }

    fn translate(&mut self, tx: f32, ty: f32) {
        self.e += tx * self.a + ty * self.c;
        self.f += tx * self.b + ty * self.d;
    }

    fn next_line(&mut self) {
        // Default leading; the TL operator is not tracked.
        self.f -= 12.0 * self.d;
    }

    fn position(&self) -> (f32, f32) {
        (self.e, self.f)
    }

    fn scale(&self) -> f32 {
        (self.a * self.a + self.c * self.c).sqrt()
    }
}

fn as_number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

/// Decoding fallback when the font carries no usable encoding:
/// UTF-16BE with BOM, then UTF-8, then Latin-1.
pub(super) fn decode_text_simple(bytes: &[u8]) -> String {
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let utf16: Vec<u16> = bytes[2..]
            .chunks(2)
            .filter_map(|c| {
                if c.len() == 2 {
                    Some(u16::from_be_bytes([c[0], c[1]]))
                } else {
                    None
                }
            })
            .collect();
        return String::from_utf16(&utf16).unwrap_or_default();
    }

    if let Ok(s) = String::from_utf8(bytes.to_vec()) {
        return s;
    }

    bytes.iter().map(|&b| b as char).collect()
}
