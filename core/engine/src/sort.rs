//! FILENAME: core/engine/src/sort.rs
//! PURPOSE: Single-column sort over filtered row indices.

use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

use crate::dataset::Dataset;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub enum SortDirection {
    #[default]
    Ascending,
    Descending,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Ascending => SortDirection::Descending,
            SortDirection::Descending => SortDirection::Ascending,
        }
    }
}

/// The active sort column and direction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SortState {
    pub column: String,
    pub direction: SortDirection,
}

/// Header marker for a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum SortIndicator {
    Unsorted,
    Ascending,
    Descending,
}

impl SortIndicator {
    pub fn for_column(sort: Option<&SortState>, header: &str) -> Self {
        match sort {
            Some(s) if s.column == header => match s.direction {
                SortDirection::Ascending => SortIndicator::Ascending,
                SortDirection::Descending => SortIndicator::Descending,
            },
            _ => SortIndicator::Unsorted,
        }
    }
}

/// Stable sort of `indices` by the display text of column `col`.
/// Comparison is case-sensitive and ordinal; empty cells sort as "".
/// Descending flips the comparator so equal rows keep their input order.
pub fn sort_rows(dataset: &Dataset, indices: &mut [usize], col: usize, direction: SortDirection) {
    // Stringify once instead of per comparison
    let mut keyed: Vec<(String, usize)> = indices
        .iter()
        .map(|&i| (dataset.cell(i, col).display_value(), i))
        .collect();

    keyed.sort_by(|a, b| {
        let ord: Ordering = a.0.cmp(&b.0);
        match direction {
            SortDirection::Ascending => ord,
            SortDirection::Descending => ord.reverse(),
        }
    });

    for (slot, (_, i)) in indices.iter_mut().zip(keyed) {
        *slot = i;
    }
}
