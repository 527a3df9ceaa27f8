//! Alignment-based table detection.
//!
//! Looks for runs of rows whose spans start at shared X positions, so
//! tables drawn purely with whitespace still match. Detection leaves the
//! spans in place; table text also stays in the page lines.

use std::collections::{HashMap, HashSet};

use crate::model::{Table, TableRow};

use super::layout::PositionedSpan;

/// Tuning knobs for alignment-based table detection.
#[derive(Debug, Clone)]
pub struct TableDetectorConfig {
    /// Minimum rows for a region to count as a table
    pub min_rows: usize,
    /// Minimum aligned columns
    pub min_columns: usize,
    /// Maximum columns before a region is treated as word-level noise
    pub max_columns: usize,
    /// Row grouping tolerance as a fraction of font size
    pub y_tolerance_factor: f32,
    /// Fraction of rows that must share a column edge
    pub min_alignment_ratio: f32,
    /// Minimum horizontal gap between column edges, in points
    pub min_column_gap: f32,
}

impl Default for TableDetectorConfig {
    fn default() -> Self {
        Self {
            min_rows: 2,
            min_columns: 2,
            max_columns: 6,
            y_tolerance_factor: 0.4,
            min_alignment_ratio: 0.3,
            min_column_gap: 15.0,
        }
    }
}

/// Spans sharing a baseline within tolerance.
#[derive(Debug, Clone)]
struct RowCluster {
    spans: Vec<PositionedSpan>,
}

/// Detects tables from span positions alone.
pub struct TableDetector {
    config: TableDetectorConfig,
}

impl TableDetector {
    /// Create a detector with default configuration.
    pub fn new() -> Self {
        Self {
            config: TableDetectorConfig::default(),
        }
    }

    /// Create a detector with custom configuration.
    pub fn with_config(config: TableDetectorConfig) -> Self {
        Self { config }
    }

    /// Detect tables among the given spans.
    pub fn detect(&self, spans: &[PositionedSpan]) -> Vec<Table> {
        if spans.len() < self.config.min_rows * self.config.min_columns {
            return Vec::new();
        }

        let rows = self.cluster_rows(spans);
        if rows.len() < self.config.min_rows {
            return Vec::new();
        }

        let columns = self.column_edges(&rows);
        if columns.len() < self.config.min_columns {
            return Vec::new();
        }

        let mut tables = Vec::new();
        for (start, end) in self.table_regions(&rows, &columns) {
            let region = &rows[start..=end];

            // Columns are re-derived per region; the page-wide edges can
            // include alignment from text outside the table.
            let region_columns = self.column_edges(region);
            if region_columns.len() < self.config.min_columns {
                continue;
            }
            if region_columns.len() > self.config.max_columns {
                log::debug!(
                    "table region rejected: {} columns exceeds {}",
                    region_columns.len(),
                    self.config.max_columns
                );
                continue;
            }
            if is_list_region(region, &region_columns) {
                log::debug!("table region rejected: looks like a list");
                continue;
            }

            tables.push(build_table(region, &region_columns));
        }

        log::debug!("detected {} tables from {} spans", tables.len(), spans.len());
        tables
    }

    /// Group spans into baseline rows, top of the page first.
    fn cluster_rows(&self, spans: &[PositionedSpan]) -> Vec<RowCluster> {
        let mut sorted = spans.to_vec();
        sorted.sort_by(|a, b| {
            let y_cmp = b.y.partial_cmp(&a.y).unwrap_or(std::cmp::Ordering::Equal);
            if y_cmp == std::cmp::Ordering::Equal {
                a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal)
            } else {
                y_cmp
            }
        });

        let mut rows: Vec<RowCluster> = Vec::new();
        let mut current: Vec<PositionedSpan> = Vec::new();
        let mut anchor_y: Option<f32> = None;

        for span in sorted {
            let tolerance = span.size * self.config.y_tolerance_factor;
            match anchor_y {
                Some(y) if (span.y - y).abs() <= tolerance => current.push(span),
                _ => {
                    if !current.is_empty() {
                        rows.push(RowCluster {
                            spans: std::mem::take(&mut current),
                        });
                    }
                    anchor_y = Some(span.y);
                    current.push(span);
                }
            }
        }
        if !current.is_empty() {
            rows.push(RowCluster { spans: current });
        }

        rows
    }

    /// Find X positions where spans repeatedly start across rows.
    ///
    /// Left edges are bucketed to 5pt and counted once per row. Edges seen
    /// in enough rows become column boundaries; boundaries closer together
    /// than `min_column_gap` collapse into the leftmost one.
    fn column_edges(&self, rows: &[RowCluster]) -> Vec<f32> {
        const BUCKET: f32 = 5.0;

        // Rows with a single span carry no alignment signal, so prefer
        // multi-span rows when there are enough of them.
        let multi: Vec<&RowCluster> = rows.iter().filter(|r| r.spans.len() >= 2).collect();
        let candidates: Vec<&RowCluster> = if multi.len() >= self.config.min_rows {
            multi
        } else {
            rows.iter().collect()
        };
        if candidates.is_empty() {
            return Vec::new();
        }

        let mut edge_counts: HashMap<i32, usize> = HashMap::new();
        for row in &candidates {
            let mut seen: HashSet<i32> = HashSet::new();
            for span in &row.spans {
                seen.insert((span.x / BUCKET).round() as i32);
            }
            for bucket in seen {
                *edge_counts.entry(bucket).or_insert(0) += 1;
            }
        }

        let needed =
            ((candidates.len() as f32 * self.config.min_alignment_ratio) as usize).max(2);

        let mut edges: Vec<f32> = edge_counts
            .into_iter()
            .filter(|(_, count)| *count >= needed)
            .map(|(bucket, _)| bucket as f32 * BUCKET)
            .collect();
        edges.sort_by(|a, b| a.partial_cmp(b).unwrap_or(std::cmp::Ordering::Equal));

        let mut merged: Vec<f32> = Vec::new();
        for edge in edges {
            match merged.last() {
                Some(last) if edge - last < self.config.min_column_gap => {}
                _ => merged.push(edge),
            }
        }
        merged
    }

    /// Find contiguous runs of rows that align with the column edges.
    fn table_regions(&self, rows: &[RowCluster], columns: &[f32]) -> Vec<(usize, usize)> {
        let mut regions: Vec<(usize, usize)> = Vec::new();
        let mut start: Option<usize> = None;
        let mut run = 0usize;

        for (i, row) in rows.iter().enumerate() {
            if self.alignment_score(row, columns) >= self.config.min_alignment_ratio {
                if start.is_none() {
                    start = Some(i);
                }
                run += 1;
            } else {
                if let Some(s) = start {
                    if run >= self.config.min_rows {
                        regions.push((s, i - 1));
                    }
                }
                start = None;
                run = 0;
            }
        }
        if let Some(s) = start {
            if run >= self.config.min_rows {
                regions.push((s, rows.len() - 1));
            }
        }

        regions
    }

    /// Fraction of a row's spans that start on a column edge.
    fn alignment_score(&self, row: &RowCluster, columns: &[f32]) -> f32 {
        if row.spans.is_empty() || columns.is_empty() {
            return 0.0;
        }
        let tolerance = 5.0;
        let aligned = row
            .spans
            .iter()
            .filter(|span| columns.iter().any(|col| (span.x - col).abs() <= tolerance))
            .count();
        aligned as f32 / row.spans.len() as f32
    }
}

impl Default for TableDetector {
    fn default() -> Self {
        Self::new()
    }
}

/// Convert a region into a table, one cell slot per column edge.
///
/// Spans landing in the same slot join with a space; slots no span lands
/// in stay `None`.
fn build_table(rows: &[RowCluster], columns: &[f32]) -> Table {
    let mut table = Table::new();
    for cluster in rows {
        let mut slots: Vec<Vec<&str>> = vec![Vec::new(); columns.len()];
        for span in &cluster.spans {
            let text = span.text.trim();
            if text.is_empty() {
                continue;
            }
            slots[column_index(span.x, columns)].push(text);
        }
        let cells = slots
            .into_iter()
            .map(|texts| {
                if texts.is_empty() {
                    None
                } else {
                    Some(texts.join(" "))
                }
            })
            .collect();
        table.add_row(TableRow::new(cells));
    }
    table
}

/// Index of the rightmost column starting at or before the given X, with
/// a small tolerance for ragged alignment.
fn column_index(x: f32, columns: &[f32]) -> usize {
    const TOLERANCE: f32 = 10.0;
    let mut index = 0;
    for (i, &edge) in columns.iter().enumerate() {
        if x >= edge - TOLERANCE {
            index = i;
        }
    }
    index
}

/// Whether a candidate region is really a numbered or bulleted list.
///
/// List markers often split into their own spans, which makes a list look
/// like a two-column table.
fn is_list_region(rows: &[RowCluster], columns: &[f32]) -> bool {
    if columns.len() < 2 || rows.is_empty() {
        return false;
    }

    let mut bullets = 0usize;
    let mut numbers = 0usize;
    for row in rows {
        let leftmost = row
            .spans
            .iter()
            .min_by(|a, b| a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal));
        if let Some(span) = leftmost {
            let text = span.text.trim();
            if is_bullet_marker(text) {
                bullets += 1;
            } else if is_number_marker(text) {
                numbers += 1;
            }
        }
    }

    let bullet_ratio = bullets as f32 / rows.len() as f32;
    if bullet_ratio >= 0.5 {
        return true;
    }

    // Numbered first columns do occur in real tables, so numbers alone
    // only reject two-column regions.
    let marker_ratio = (bullets + numbers) as f32 / rows.len() as f32;
    columns.len() == 2 && marker_ratio >= 0.5
}

fn is_bullet_marker(text: &str) -> bool {
    matches!(
        text,
        "-" | "–" | "—" | "•" | "·" | "*" | "○" | "▪" | "◦" | "■" | "●"
    )
}

/// Number-style list markers: "1.", "12)", "a.", a bare "3".
fn is_number_marker(text: &str) -> bool {
    let cleaned: String = text.chars().filter(|c| !c.is_whitespace()).collect();
    if cleaned.is_empty() {
        return false;
    }
    if cleaned.parse::<u32>().is_ok() {
        return true;
    }
    if let Some(rest) = cleaned.strip_suffix(['.', ')']) {
        if !rest.is_empty() && rest.chars().all(|c| c.is_ascii_digit()) {
            return true;
        }
        let mut chars = rest.chars();
        if let (Some(first), None) = (chars.next(), chars.next()) {
            return first.is_alphabetic();
        }
    }
    false
}
