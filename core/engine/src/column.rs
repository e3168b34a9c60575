//! FILENAME: core/engine/src/column.rs
//! PURPOSE: Per-column interactive state (filter selection, typed text,
//! dropdown visibility) held in an ordered mapping keyed by header.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::cell::fold;
use crate::error::TableError;

/// Horizontal alignment of a column's cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum ColumnAlign {
    #[default]
    Left,
    Center,
    Right,
}

/// State of one column.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnState {
    pub header: String,
    pub align: ColumnAlign,
    /// Selected filter values, folded, in selection order
    selected: Vec<String>,
    /// Search box text not yet committed to the filter
    pub typing: String,
    pub dropdown_visible: bool,
}

impl ColumnState {
    pub fn new(header: impl Into<String>) -> Self {
        ColumnState {
            header: header.into(),
            align: ColumnAlign::Left,
            selected: Vec::new(),
            typing: String::new(),
            dropdown_visible: false,
        }
    }

    pub fn selected(&self) -> &[String] {
        &self.selected
    }

    pub fn has_filter(&self) -> bool {
        !self.selected.is_empty()
    }

    pub fn is_selected(&self, value: &str) -> bool {
        let folded = fold(value);
        self.selected.iter().any(|v| *v == folded)
    }

    /// Add the value if absent, remove it if present.
    /// Returns true when the value is selected afterwards.
    pub fn toggle(&mut self, value: &str) -> bool {
        let folded = fold(value);
        if let Some(pos) = self.selected.iter().position(|v| *v == folded) {
            self.selected.remove(pos);
            false
        } else {
            self.selected.push(folded);
            true
        }
    }

    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }

    /// Text shown in the column's search box.
    pub fn filter_text(&self) -> String {
        if !self.typing.is_empty() {
            return self.typing.clone();
        }
        match self.selected.len() {
            0 => String::new(),
            1 => "1 item selected".to_string(),
            n => format!("{} items selected", n),
        }
    }
}

// ============================================================================
// ORDERED COLUMN MAP
// ============================================================================

/// Columns in display order with lookup by header.
#[derive(Debug, Clone, PartialEq)]
pub struct Columns {
    columns: Vec<ColumnState>,
    index: HashMap<String, usize>,
}

impl Columns {
    /// Headers are assumed unique (see `TableProps::validate`).
    pub fn new(headers: &[String]) -> Self {
        let columns: Vec<ColumnState> = headers.iter().map(ColumnState::new).collect();
        let index = headers
            .iter()
            .enumerate()
            .map(|(i, h)| (h.clone(), i))
            .collect();
        Columns { columns, index }
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub fn position(&self, header: &str) -> Result<usize, TableError> {
        self.index
            .get(header)
            .copied()
            .ok_or_else(|| TableError::UnknownColumn(header.to_string()))
    }

    pub fn get(&self, header: &str) -> Result<&ColumnState, TableError> {
        let pos = self.position(header)?;
        Ok(&self.columns[pos])
    }

    pub fn get_mut(&mut self, header: &str) -> Result<&mut ColumnState, TableError> {
        let pos = self.position(header)?;
        Ok(&mut self.columns[pos])
    }

    pub fn at(&self, pos: usize) -> Option<&ColumnState> {
        self.columns.get(pos)
    }

    pub fn iter(&self) -> impl Iterator<Item = &ColumnState> {
        self.columns.iter()
    }

    pub fn iter_mut(&mut self) -> impl Iterator<Item = &mut ColumnState> {
        self.columns.iter_mut()
    }

    pub fn headers(&self) -> Vec<String> {
        self.columns.iter().map(|c| c.header.clone()).collect()
    }

    /// `(position, selected values)` for every column with an active filter.
    pub fn active_filters(&self) -> Vec<(usize, &[String])> {
        self.columns
            .iter()
            .enumerate()
            .filter(|(_, c)| c.has_filter())
            .map(|(i, c)| (i, c.selected()))
            .collect()
    }
}
