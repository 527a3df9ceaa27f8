//! Table types.

use serde::{Deserialize, Serialize};

/// A detected table: rows of optional text cells.
///
/// Cells are `None` where the detector found no text in a column slot.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Table {
    /// Rows in the table, first row first
    pub rows: Vec<TableRow>,
}

impl Table {
    /// Create a new empty table.
    pub fn new() -> Self {
        Self { rows: Vec::new() }
    }

    /// Create a table from rows.
    pub fn from_rows(rows: Vec<TableRow>) -> Self {
        Self { rows }
    }

    /// Add a row to the table.
    pub fn add_row(&mut self, row: TableRow) {
        self.rows.push(row);
    }

    /// Get the number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Get the number of columns (based on first row).
    pub fn column_count(&self) -> usize {
        self.rows.first().map(|r| r.cells.len()).unwrap_or(0)
    }

    /// Check if the table is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Get the first row, conventionally the header.
    pub fn header_row(&self) -> Option<&TableRow> {
        self.rows.first()
    }
}

/// A table row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableRow {
    /// Cells in the row; `None` marks an empty slot
    pub cells: Vec<Option<String>>,
}

impl TableRow {
    /// Create a new row with cells.
    pub fn new(cells: Vec<Option<String>>) -> Self {
        Self { cells }
    }

    /// Create a row where every cell has text.
    pub fn from_texts<S: Into<String>>(values: impl IntoIterator<Item = S>) -> Self {
        Self::new(values.into_iter().map(|v| Some(v.into())).collect())
    }

    /// Iterate over the non-empty trimmed cell texts.
    pub fn filled_cells(&self) -> impl Iterator<Item = &str> {
        self.cells
            .iter()
            .filter_map(|cell| cell.as_deref())
            .map(str::trim)
            .filter(|text| !text.is_empty())
    }

    /// Render the row as a CSV-style line; empty slots become empty fields.
    pub fn to_csv_line(&self) -> String {
        self.cells
            .iter()
            .map(|cell| cell.as_deref().unwrap_or(""))
            .collect::<Vec<_>>()
            .join(", ")
    }
}
