//! FILENAME: core/engine/src/lib.rs
//! PURPOSE: Main library entry point for the table engine.
//! CONTEXT: Re-exports public types and modules for use by other crates.
//!
//! Layers:
//! - `cell` / `dataset`: the rows a loader hands over (WHAT we show)
//! - `column` / `sort` / `pagination` / `suggest`: view state pieces
//! - `filter`: row predicates
//! - `table`: the stateful `DataTable` and its derivation (HOW we show it)
//! - `view`: renderable snapshot for the host

pub mod cell;
pub mod column;
pub mod dataset;
pub mod error;
pub mod filter;
pub mod pagination;
pub mod sort;
pub mod suggest;
pub mod table;
pub mod view;

// Re-export commonly used types at the crate root
pub use cell::{fold, CellValue};
pub use column::{ColumnAlign, ColumnState, Columns};
pub use dataset::{Dataset, Row, TableProps};
pub use error::TableError;
pub use filter::filter_rows;
pub use pagination::{
    page_range, total_pages, PageInfo, PageNav, PageSize, ALL_ROWS_OPTION,
    DEFAULT_ITEMS_PER_PAGE, DEFAULT_PAGE_SIZE_OPTIONS,
};
pub use sort::{sort_rows, SortDirection, SortIndicator, SortState};
pub use suggest::{compute_suggestions, SuggestionPanel};
pub use table::DataTable;
pub use view::{ColumnView, PageSizeOptionView, TableView, ViewRow};

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    fn contacts() -> DataTable {
        let props = TableProps {
            column_headers: vec!["Title".into(), "number".into(), "Choice".into()],
            items_per_page_options: PageSize::default_options(),
            default_items_per_page: PageSize::fixed(2).unwrap(),
        };
        let data = Dataset::new(vec![
            Some(vec!["Alpha".into(), 3.0.into(), "Choice 1".into()]),
            Some(vec!["beta".into(), 12.0.into(), "Choice 2".into()]),
            None,
            Some(vec!["Gamma".into(), CellValue::Empty, "Choice 1".into()]),
            Some(vec!["alphabet".into(), 30.0.into(), CellValue::Empty]),
        ]);
        DataTable::new(props, Arc::new(data)).unwrap()
    }

    #[test]
    fn integration_test_filter_sort_paginate() {
        let mut table = contacts();
        table.search_column("Choice", "choice").unwrap();
        table.select_suggestion("Choice", "choice 1").unwrap();
        table.toggle_sort("Title").unwrap();
        table.toggle_sort("Title").unwrap();

        let view = table.derive_view();
        assert_eq!(view.page.filtered_count, 2);
        assert_eq!(view.page.total_pages, 1);
        // Descending, case-sensitive: "Gamma" > "Alpha"
        assert_eq!(
            view.display_rows(),
            vec![
                vec!["Gamma".to_string(), String::new(), "Choice 1".to_string()],
                vec!["Alpha".to_string(), "3".to_string(), "Choice 1".to_string()],
            ]
        );
        assert_eq!(view.column("Choice").unwrap().filter_text, "1 item selected");
    }

    #[test]
    fn integration_test_global_filter_matches_numbers() {
        let mut table = contacts();
        table.set_global_filter("3");
        assert_eq!(table.filtered_indices(), vec![0, 4]);

        table.set_global_filter("ALPHA");
        let view = table.derive_view();
        assert_eq!(view.rows.len(), 2);
        assert_eq!(view.global_filter, "alpha");
    }

    #[test]
    fn integration_test_page_walk() {
        let mut table = contacts();
        let first = table.derive_view();
        assert_eq!(first.page.total_pages, 2);
        assert!(first.page.has_next);

        table.navigate(PageNav::Next);
        let second = table.derive_view();
        assert_eq!(second.rows.len(), 2);
        assert!(!second.page.has_next);
        assert_eq!(
            second.rows.iter().map(|r| r.source_index).collect::<Vec<_>>(),
            vec![3, 4]
        );
    }
}
