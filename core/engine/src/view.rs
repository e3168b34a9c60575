//! FILENAME: core/engine/src/view.rs
//! PURPOSE: Renderable snapshot of the table.
//! CONTEXT: Produced by `DataTable::derive_view` on every render. Holds
//! copies of the visible cells so a host can serialize it without touching
//! the shared dataset.

use serde::Serialize;

use crate::cell::CellValue;
use crate::column::ColumnAlign;
use crate::pagination::{PageInfo, PageSize};
use crate::sort::SortIndicator;

/// Header state for one column.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ColumnView {
    pub header: String,
    pub align: ColumnAlign,
    pub sort: SortIndicator,
    /// Text for the column search box
    pub filter_text: String,
    pub selected: Vec<String>,
    pub dropdown_visible: bool,
    /// Only populated for the active suggestion column while its dropdown is open
    pub suggestions: Vec<String>,
}

/// A visible row and where it came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewRow {
    pub source_index: usize,
    pub cells: Vec<CellValue>,
}

/// An entry in the page size selector.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSizeOptionView {
    pub value: i64,
    pub label: String,
    pub selected: bool,
}

impl PageSizeOptionView {
    pub fn new(size: PageSize, current: PageSize) -> Self {
        PageSizeOptionView {
            value: size.as_option(),
            label: size.to_string(),
            selected: size == current,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TableView {
    pub columns: Vec<ColumnView>,
    pub rows: Vec<ViewRow>,
    pub page: PageInfo,
    pub global_filter: String,
    pub page_size_options: Vec<PageSizeOptionView>,
}

impl TableView {
    pub fn headers(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.header.as_str()).collect()
    }

    pub fn column(&self, header: &str) -> Option<&ColumnView> {
        self.columns.iter().find(|c| c.header == header)
    }

    /// Display text of every visible cell, row by row.
    pub fn display_rows(&self) -> Vec<Vec<String>> {
        self.rows
            .iter()
            .map(|r| r.cells.iter().map(CellValue::display_value).collect())
            .collect()
    }
}
