//! FILENAME: core/engine/src/suggest.rs
//! PURPOSE: Autosuggest values for a column's search box.

use serde::Serialize;
use std::collections::HashSet;

use crate::cell::fold;
use crate::dataset::{row_cell, Dataset};

/// The one column currently showing suggestions.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SuggestionPanel {
    pub column: String,
    pub values: Vec<String>,
}

/// Distinct folded values of column `col` that contain `text`,
/// in order of first occurrence. Blank cells and null rows are skipped.
pub fn compute_suggestions(dataset: &Dataset, col: usize, text: &str) -> Vec<String> {
    let needle = fold(text);
    let mut seen = HashSet::new();
    let mut values = Vec::new();

    for (_, row) in dataset.present_rows() {
        let value = row_cell(row, col).folded();
        // Blank cells never become a suggestion, even for empty text
        if value.is_empty() || !value.contains(needle.as_str()) {
            continue;
        }
        if seen.insert(value.clone()) {
            values.push(value);
        }
    }

    values
}
