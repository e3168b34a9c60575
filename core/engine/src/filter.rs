//! FILENAME: core/engine/src/filter.rs
//! PURPOSE: Row predicates for the column filters and the global filter.
//! CONTEXT: Within a column the selected values are OR-ed; across columns
//! they are AND-ed; the global filter must hit at least one cell. Cells and
//! filter values are both folded with `CellValue::folded` / `fold`, so every
//! match is a case-insensitive substring test.

use crate::cell::fold;
use crate::column::Columns;
use crate::dataset::{row_cell, Dataset, Row};

/// True if the row satisfies every active column filter.
pub fn row_passes_column_filters(row: &Row, active: &[(usize, &[String])]) -> bool {
    active.iter().all(|(col, values)| {
        let cell = row_cell(row, *col).folded();
        values.iter().any(|v| cell.contains(fold(v).as_str()))
    })
}

/// True if the global filter is empty or any cell contains it.
/// `folded_global` must already be folded.
pub fn row_passes_global_filter(row: &Row, column_count: usize, folded_global: &str) -> bool {
    if folded_global.is_empty() {
        return true;
    }
    (0..column_count).any(|col| row_cell(row, col).folded().contains(folded_global))
}

/// Dataset indices of the rows that pass both stages, in dataset order.
/// Null rows never pass.
pub fn filter_rows(dataset: &Dataset, columns: &Columns, global_filter: &str) -> Vec<usize> {
    let active = columns.active_filters();
    let global = fold(global_filter);
    let column_count = columns.len();

    dataset
        .present_rows()
        .filter(|(_, row)| {
            row_passes_column_filters(row, &active)
                && row_passes_global_filter(row, column_count, &global)
        })
        .map(|(i, _)| i)
        .collect()
}
