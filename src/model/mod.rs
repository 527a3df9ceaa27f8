//! Document model types for outline inference.
//!
//! This module defines the intermediate representation that bridges PDF
//! parsing and outline inference: per-page spans, lines, and tables on the
//! input side, headings and the resolved title on the output side.

mod document;
mod outline;
mod page;
mod table;

pub use document::{Document, Metadata};
pub use outline::{DocumentOutline, Heading, HeadingLevel};
pub use page::{Page, TextSpan};
pub use table::{Table, TableRow};
