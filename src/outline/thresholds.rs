//! Font-size threshold derivation.

use crate::model::{Document, HeadingLevel};

/// Heading size thresholds derived from a document's font-size distribution.
///
/// The three largest distinct sizes become the H1/H2/H3 thresholds. With two
/// distinct sizes H3 shares the H2 threshold; with one, all three collapse
/// onto it. `min_size` is the smallest distinct size clamped to a floor.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SizeThresholds {
    /// H1 threshold (largest distinct size)
    pub h1: f32,
    /// H2 threshold
    pub h2: f32,
    /// H3 threshold
    pub h3: f32,
    /// Smallest size a span may have and still classify
    pub min_size: f32,
}

impl SizeThresholds {
    /// Derive thresholds from every positive span size in the document.
    ///
    /// Returns `None` when the document has no sized spans.
    pub fn from_document(doc: &Document, floor: f32) -> Option<Self> {
        Self::from_sizes(distinct_sizes(doc), floor)
    }

    /// Derive thresholds from a size collection.
    ///
    /// Sizes need not be distinct or ordered; non-positive sizes are
    /// ignored. Returns `None` when nothing remains.
    pub fn from_sizes(sizes: impl IntoIterator<Item = f32>, floor: f32) -> Option<Self> {
        let mut distinct: Vec<f32> = sizes.into_iter().filter(|s| *s > 0.0).collect();
        distinct.sort_by(|a, b| b.partial_cmp(a).unwrap_or(std::cmp::Ordering::Equal));
        distinct.dedup();

        let smallest = *distinct.last()?;
        let (h1, h2, h3) = match distinct.len() {
            1 => (distinct[0], distinct[0], distinct[0]),
            2 => (distinct[0], distinct[1], distinct[1]),
            _ => (distinct[0], distinct[1], distinct[2]),
        };

        Some(Self {
            h1,
            h2,
            h3,
            min_size: floor.max(smallest),
        })
    }

    /// Classify a span size, highest level first.
    ///
    /// A size below `min_size` never classifies. Otherwise the span lands on
    /// the first level whose threshold it reaches within `tolerance` (a
    /// fraction, e.g. 0.9).
    pub fn classify(&self, size: f32, tolerance: f32) -> Option<HeadingLevel> {
        if size < self.min_size {
            return None;
        }
        if size >= tolerance * self.h1 {
            Some(HeadingLevel::H1)
        } else if size >= tolerance * self.h2 {
            Some(HeadingLevel::H2)
        } else if size >= tolerance * self.h3 {
            Some(HeadingLevel::H3)
        } else {
            None
        }
    }
}

/// Collect the distinct positive span sizes of a document, descending.
pub fn distinct_sizes(doc: &Document) -> Vec<f32> {
    let mut sizes: Vec<f32> = doc
        .spans_with_pages()
        .map(|(_, span)| span.size)
        .filter(|s| *s > 0.0)
        .collect();
    sizes.sort_by(|a, b| b.partial_cmp(a).unwrap_or(std::cmp::Ordering::Equal));
    sizes.dedup();
    sizes
}
