//! FILENAME: core/engine/src/dataset.rs
//! PURPOSE: The row store the table derives its views from.
//! CONTEXT: A `Dataset` is supplied once by the loader and shared with the
//! table behind an `Arc`. The table never mutates it; a reload swaps the
//! whole `Arc`. Rows are positional: cell N belongs to column N.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::cell::CellValue;
use crate::error::TableError;
use crate::pagination::PageSize;

/// One record, positionally aligned to the column headers.
pub type Row = Vec<CellValue>;

static EMPTY_CELL: CellValue = CellValue::Empty;

/// Ordered sequence of rows. `None` models a null row, which every
/// derivation drops.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dataset {
    rows: Vec<Option<Row>>,
}

impl Dataset {
    pub fn new(rows: Vec<Option<Row>>) -> Self {
        Dataset { rows }
    }

    /// Build a dataset with no null rows.
    pub fn from_rows(rows: Vec<Row>) -> Self {
        Dataset {
            rows: rows.into_iter().map(Some).collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn row(&self, index: usize) -> Option<&Row> {
        self.rows.get(index).and_then(|r| r.as_ref())
    }

    /// Get a cell, treating short rows and null rows as empty.
    pub fn cell(&self, row: usize, col: usize) -> &CellValue {
        self.row(row)
            .and_then(|r| r.get(col))
            .unwrap_or(&EMPTY_CELL)
    }

    /// Iterate `(index, row)` over non-null rows.
    pub fn present_rows(&self) -> impl Iterator<Item = (usize, &Row)> {
        self.rows
            .iter()
            .enumerate()
            .filter_map(|(i, r)| r.as_ref().map(|row| (i, row)))
    }

    pub fn raw_rows(&self) -> &[Option<Row>] {
        &self.rows
    }
}

/// Get a cell from a row, empty when the row is short.
pub fn row_cell(row: &Row, col: usize) -> &CellValue {
    row.get(col).unwrap_or(&EMPTY_CELL)
}

/// Configuration the host hands to the table at mount time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TableProps {
    /// Column headers; each header is also the column's key.
    pub column_headers: Vec<String>,
    /// Choices offered by the page size selector.
    pub items_per_page_options: Vec<PageSize>,
    pub default_items_per_page: PageSize,
}

impl TableProps {
    pub fn new(column_headers: Vec<String>) -> Self {
        TableProps {
            column_headers,
            items_per_page_options: PageSize::default_options(),
            default_items_per_page: PageSize::default(),
        }
    }

    /// Headers must be non-empty and unique since they double as keys.
    pub fn validate(&self) -> Result<(), TableError> {
        if self.column_headers.is_empty() {
            return Err(TableError::NoColumns);
        }
        let mut seen = HashSet::new();
        for header in &self.column_headers {
            if !seen.insert(header.as_str()) {
                return Err(TableError::DuplicateColumn(header.clone()));
            }
        }
        Ok(())
    }
}
