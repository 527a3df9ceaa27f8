//! PDF parsing: content-stream text extraction, line assembly, and
//! alignment-based table detection.

mod layout;
mod options;
mod pdf;
mod table_detector;

pub use layout::{assemble_lines, ContentExtractor, Line, PositionedSpan};
pub use options::{ErrorMode, ParseOptions};
pub use pdf::PdfParser;
pub use table_detector::{TableDetector, TableDetectorConfig};
