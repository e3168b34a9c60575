//! FILENAME: core/engine/src/table.rs
//! PURPOSE: The stateful data table: view state, its mutators and the
//! filter -> sort -> paginate derivation.
//! CONTEXT: One `DataTable` lives for as long as the host shows the table.
//! Every mutator is a single `&mut self` call, so a handler either applies
//! completely or (on error) not at all. `derive_view` is pure.

use std::sync::Arc;

use crate::cell::fold;
use crate::column::{ColumnState, Columns};
use crate::dataset::{Dataset, TableProps};
use crate::error::TableError;
use crate::filter::filter_rows;
use crate::pagination::{page_range, total_pages, PageInfo, PageNav, PageSize};
use crate::sort::{sort_rows, SortIndicator, SortState};
use crate::suggest::{compute_suggestions, SuggestionPanel};
use crate::view::{ColumnView, PageSizeOptionView, TableView, ViewRow};

#[derive(Debug, Clone)]
pub struct DataTable {
    props: TableProps,
    data: Arc<Dataset>,
    columns: Columns,
    /// Stored folded
    global_filter: String,
    /// 1-based
    current_page: usize,
    page_size: PageSize,
    sort: Option<SortState>,
    suggestions: Option<SuggestionPanel>,
}

impl DataTable {
    /// Mount a table with default view state.
    pub fn new(props: TableProps, data: Arc<Dataset>) -> Result<Self, TableError> {
        props.validate()?;
        let columns = Columns::new(&props.column_headers);
        let page_size = props.default_items_per_page;

        Ok(DataTable {
            props,
            data,
            columns,
            global_filter: String::new(),
            current_page: 1,
            page_size,
            sort: None,
            suggestions: None,
        })
    }

    // ========================================================================
    // ACCESSORS
    // ========================================================================

    pub fn props(&self) -> &TableProps {
        &self.props
    }

    pub fn data(&self) -> &Arc<Dataset> {
        &self.data
    }

    pub fn column_headers(&self) -> &[String] {
        &self.props.column_headers
    }

    pub fn column(&self, header: &str) -> Result<&ColumnState, TableError> {
        self.columns.get(header)
    }

    pub fn global_filter(&self) -> &str {
        &self.global_filter
    }

    pub fn current_page(&self) -> usize {
        self.current_page
    }

    pub fn page_size(&self) -> PageSize {
        self.page_size
    }

    pub fn sort(&self) -> Option<&SortState> {
        self.sort.as_ref()
    }

    pub fn suggestions(&self) -> Option<&SuggestionPanel> {
        self.suggestions.as_ref()
    }

    // ========================================================================
    // FILTER MUTATORS
    // ========================================================================

    /// Add or remove a value from a column's filter set.
    pub fn toggle_column_filter(&mut self, header: &str, value: &str) -> Result<(), TableError> {
        let column = self.columns.get_mut(header)?;
        column.toggle(value);
        column.typing.clear();
        self.current_page = 1;
        Ok(())
    }

    /// Replace the global filter. Input is stored folded.
    pub fn set_global_filter(&mut self, value: &str) {
        self.global_filter = fold(value);
        self.current_page = 1;
    }

    pub fn clear_column_filter(&mut self, header: &str) -> Result<(), TableError> {
        let column = self.columns.get_mut(header)?;
        column.clear_selection();
        column.typing.clear();
        self.current_page = 1;
        Ok(())
    }

    /// Drop every column selection and the global filter.
    pub fn clear_all_filters(&mut self) {
        for column in self.columns.iter_mut() {
            column.clear_selection();
            column.typing.clear();
        }
        self.global_filter.clear();
        self.current_page = 1;
    }

    // ========================================================================
    // AUTOSUGGEST
    // ========================================================================

    /// Record typed text for a column and open its suggestion list.
    /// Any other column's open list is closed first.
    pub fn search_column(&mut self, header: &str, text: &str) -> Result<(), TableError> {
        let pos = self.columns.position(header)?;
        let values = compute_suggestions(&self.data, pos, text);

        if let Some(prev) = self.suggestions.take() {
            if prev.column != header {
                if let Ok(column) = self.columns.get_mut(&prev.column) {
                    column.dropdown_visible = false;
                }
            }
        }

        let column = self.columns.get_mut(header)?;
        column.typing = text.to_string();
        column.dropdown_visible = !values.is_empty();

        self.suggestions = if values.is_empty() {
            None
        } else {
            Some(SuggestionPanel {
                column: header.to_string(),
                values,
            })
        };
        self.current_page = 1;
        Ok(())
    }

    /// Toggle a suggested value in or out of the column filter.
    pub fn select_suggestion(&mut self, header: &str, value: &str) -> Result<(), TableError> {
        self.toggle_column_filter(header, value)
    }

    /// Show or hide a column's dropdown without touching its suggestions.
    pub fn toggle_column_dropdown(&mut self, header: &str) -> Result<(), TableError> {
        let column = self.columns.get_mut(header)?;
        column.dropdown_visible = !column.dropdown_visible;
        Ok(())
    }

    // ========================================================================
    // SORT
    // ========================================================================

    /// Same column flips direction; a new column starts ascending.
    pub fn toggle_sort(&mut self, header: &str) -> Result<(), TableError> {
        self.columns.position(header)?;
        let direction = match &self.sort {
            Some(s) if s.column == header => s.direction.toggled(),
            _ => Default::default(),
        };
        self.sort = Some(SortState {
            column: header.to_string(),
            direction,
        });
        self.current_page = 1;
        Ok(())
    }

    pub fn clear_sort(&mut self) {
        self.sort = None;
        self.current_page = 1;
    }

    // ========================================================================
    // PAGINATION
    // ========================================================================

    pub fn set_page(&mut self, page: usize) -> Result<(), TableError> {
        if page == 0 {
            return Err(TableError::InvalidPage(page));
        }
        self.current_page = page;
        Ok(())
    }

    pub fn navigate(&mut self, nav: PageNav) {
        let total = total_pages(self.filtered_indices().len(), self.page_size);
        self.current_page = nav.target(self.current_page, total);
    }

    pub fn set_page_size(&mut self, size: PageSize) {
        self.page_size = size;
        self.current_page = 1;
    }

    /// Apply a selector value; -1 means all rows.
    pub fn select_page_size_option(&mut self, value: i64) -> Result<(), TableError> {
        let size = PageSize::from_option(value)?;
        self.set_page_size(size);
        Ok(())
    }

    // ========================================================================
    // DATA
    // ========================================================================

    /// Swap in a freshly loaded dataset with the same columns.
    pub fn replace_data(&mut self, data: Arc<Dataset>) {
        self.data = data;
        self.current_page = 1;
        if let Some(prev) = self.suggestions.take() {
            if let Ok(column) = self.columns.get_mut(&prev.column) {
                column.dropdown_visible = false;
            }
        }
    }

    // ========================================================================
    // DERIVATION
    // ========================================================================

    /// Dataset indices passing both filter stages, in dataset order.
    pub fn filtered_indices(&self) -> Vec<usize> {
        filter_rows(&self.data, &self.columns, &self.global_filter)
    }

    /// Filtered indices in display order.
    pub fn sorted_indices(&self) -> Vec<usize> {
        let mut indices = self.filtered_indices();
        if let Some(sort) = &self.sort {
            if let Ok(col) = self.columns.position(&sort.column) {
                sort_rows(&self.data, &mut indices, col, sort.direction);
            }
        }
        indices
    }

    /// Build the view for the current page.
    pub fn derive_view(&self) -> TableView {
        let ordered = self.sorted_indices();
        let page = PageInfo::new(self.current_page, ordered.len(), self.page_size);
        let range = page_range(ordered.len(), self.current_page, self.page_size);
        let column_count = self.columns.len();

        let rows = ordered[range]
            .iter()
            .map(|&i| ViewRow {
                source_index: i,
                cells: (0..column_count)
                    .map(|c| self.data.cell(i, c).clone())
                    .collect(),
            })
            .collect();

        let columns = self
            .columns
            .iter()
            .map(|c| self.column_view(c))
            .collect();

        let page_size_options = self
            .props
            .items_per_page_options
            .iter()
            .map(|s| PageSizeOptionView::new(*s, self.page_size))
            .collect();

        TableView {
            columns,
            rows,
            page,
            global_filter: self.global_filter.clone(),
            page_size_options,
        }
    }

    fn column_view(&self, column: &ColumnState) -> ColumnView {
        let suggestions = match &self.suggestions {
            Some(panel) if panel.column == column.header && column.dropdown_visible => {
                panel.values.clone()
            }
            _ => Vec::new(),
        };

        ColumnView {
            header: column.header.clone(),
            align: column.align,
            sort: SortIndicator::for_column(self.sort.as_ref(), &column.header),
            filter_text: column.filter_text(),
            selected: column.selected().to_vec(),
            dropdown_visible: column.dropdown_visible,
            suggestions,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cell::CellValue;
    use crate::sort::SortDirection;

    fn props() -> TableProps {
        TableProps::new(vec!["Name".to_string(), "Age".to_string()])
    }

    fn sample() -> Arc<Dataset> {
        Arc::new(Dataset::new(vec![
            Some(vec![CellValue::text("Bob"), CellValue::text("30")]),
            Some(vec![CellValue::text("Al"), CellValue::text("25")]),
            Some(vec![CellValue::Empty, CellValue::text("30")]),
        ]))
    }

    fn numbered(n: usize) -> Arc<Dataset> {
        Arc::new(Dataset::from_rows(
            (0..n)
                .map(|i| vec![CellValue::text(format!("row{:02}", i)), CellValue::Number(i as f64)])
                .collect(),
        ))
    }

    #[test]
    fn test_initial_state() {
        let table = DataTable::new(props(), sample()).unwrap();
        assert_eq!(table.current_page(), 1);
        assert_eq!(table.page_size(), PageSize::default());
        assert_eq!(table.global_filter(), "");
        assert!(table.sort().is_none());
        assert!(table.suggestions().is_none());
        assert!(!table.column("Name").unwrap().dropdown_visible);
    }

    #[test]
    fn test_rejects_duplicate_headers() {
        let props = TableProps::new(vec!["A".to_string(), "A".to_string()]);
        assert!(matches!(
            DataTable::new(props, sample()),
            Err(TableError::DuplicateColumn(_))
        ));
    }

    #[test]
    fn test_worked_example() {
        let mut table = DataTable::new(props(), sample()).unwrap();

        table.set_global_filter("3");
        assert_eq!(table.filtered_indices(), vec![0, 2]);

        table.set_global_filter("");
        table.toggle_column_filter("Age", "30").unwrap();
        assert_eq!(table.filtered_indices(), vec![0, 2]);

        table.toggle_column_filter("Age", "30").unwrap();
        table.toggle_sort("Name").unwrap();
        assert_eq!(table.sorted_indices(), vec![2, 1, 0]);
    }

    #[test]
    fn test_global_filter_is_folded_and_resets_page() {
        let mut table = DataTable::new(props(), numbered(20)).unwrap();
        table.set_page(3).unwrap();
        table.set_global_filter("ROW1");
        assert_eq!(table.global_filter(), "row1");
        assert_eq!(table.current_page(), 1);
        assert_eq!(table.filtered_indices().len(), 10);
    }

    #[test]
    fn test_toggle_twice_restores_filter_and_resets_page() {
        let mut table = DataTable::new(props(), numbered(20)).unwrap();
        table.set_page(2).unwrap();
        table.toggle_column_filter("Name", "row0").unwrap();
        assert_eq!(table.current_page(), 1);
        table.set_page(2).unwrap();
        table.toggle_column_filter("Name", "row0").unwrap();
        assert!(table.column("Name").unwrap().selected().is_empty());
        assert_eq!(table.current_page(), 1);
    }

    #[test]
    fn test_toggle_clears_typing() {
        let mut table = DataTable::new(props(), sample()).unwrap();
        table.search_column("Name", "b").unwrap();
        assert_eq!(table.column("Name").unwrap().typing, "b");
        table.select_suggestion("Name", "bob").unwrap();
        let column = table.column("Name").unwrap();
        assert_eq!(column.typing, "");
        assert_eq!(column.filter_text(), "1 item selected");
    }

    #[test]
    fn test_unknown_column_is_error() {
        let mut table = DataTable::new(props(), sample()).unwrap();
        assert_eq!(
            table.toggle_sort("City"),
            Err(TableError::UnknownColumn("City".to_string()))
        );
        assert!(table.toggle_column_filter("City", "x").is_err());
        assert!(table.search_column("City", "x").is_err());
        assert!(table.toggle_column_dropdown("City").is_err());
    }

    #[test]
    fn test_sort_toggle_cycle() {
        let mut table = DataTable::new(props(), sample()).unwrap();
        table.toggle_sort("Name").unwrap();
        assert_eq!(table.sort().unwrap().direction, SortDirection::Ascending);
        table.toggle_sort("Name").unwrap();
        assert_eq!(table.sort().unwrap().direction, SortDirection::Descending);
        table.toggle_sort("Age").unwrap();
        let sort = table.sort().unwrap();
        assert_eq!(sort.column, "Age");
        assert_eq!(sort.direction, SortDirection::Ascending);
        table.clear_sort();
        assert_eq!(table.sorted_indices(), vec![0, 1, 2]);
    }

    #[test]
    fn test_sort_asc_then_desc_keeps_ties_in_filter_order() {
        let mut table = DataTable::new(props(), sample()).unwrap();
        table.toggle_sort("Age").unwrap();
        assert_eq!(table.sorted_indices(), vec![1, 0, 2]);
        table.toggle_sort("Age").unwrap();
        assert_eq!(table.sorted_indices(), vec![0, 2, 1]);
    }

    #[test]
    fn test_pages_concatenate_to_sorted_sequence() {
        let mut table = DataTable::new(props(), numbered(17)).unwrap();
        table.set_page_size(PageSize::fixed(5).unwrap());
        table.toggle_sort("Name").unwrap();
        table.toggle_sort("Name").unwrap();

        let expected = table.sorted_indices();
        let total = table.derive_view().page.total_pages;
        assert_eq!(total, 4);

        let mut seen = Vec::new();
        for page in 1..=total {
            table.set_page(page).unwrap();
            seen.extend(table.derive_view().rows.iter().map(|r| r.source_index));
        }
        assert_eq!(seen, expected);
    }

    #[test]
    fn test_all_option_gives_single_page() {
        let mut table = DataTable::new(props(), numbered(17)).unwrap();
        table.set_page(2).unwrap();
        table.select_page_size_option(-1).unwrap();
        assert_eq!(table.current_page(), 1);
        let view = table.derive_view();
        assert_eq!(view.page.total_pages, 1);
        assert_eq!(view.rows.len(), 17);
        assert!(table.select_page_size_option(0).is_err());
    }

    #[test]
    fn test_navigation() {
        let mut table = DataTable::new(props(), numbered(13)).unwrap();
        table.set_page_size(PageSize::fixed(5).unwrap());
        table.navigate(PageNav::Last);
        assert_eq!(table.current_page(), 3);
        table.navigate(PageNav::Previous);
        assert_eq!(table.current_page(), 2);
        table.navigate(PageNav::First);
        assert_eq!(table.current_page(), 1);
        table.navigate(PageNav::Previous);
        assert_eq!(table.current_page(), 1);
        assert_eq!(table.set_page(0), Err(TableError::InvalidPage(0)));
    }

    #[test]
    fn test_out_of_range_page_is_empty() {
        let mut table = DataTable::new(props(), sample()).unwrap();
        table.set_page(9).unwrap();
        let view = table.derive_view();
        assert!(view.rows.is_empty());
        assert_eq!(view.page.current_page, 9);
    }

    #[test]
    fn test_single_open_suggestion_panel() {
        let mut table = DataTable::new(props(), sample()).unwrap();
        table.search_column("Name", "o").unwrap();
        assert!(table.column("Name").unwrap().dropdown_visible);
        assert_eq!(table.suggestions().unwrap().values, vec!["bob"]);

        table.search_column("Age", "3").unwrap();
        assert!(!table.column("Name").unwrap().dropdown_visible);
        assert!(table.column("Age").unwrap().dropdown_visible);
        let panel = table.suggestions().unwrap();
        assert_eq!(panel.column, "Age");
        assert_eq!(panel.values, vec!["30"]);

        let view = table.derive_view();
        assert!(view.column("Name").unwrap().suggestions.is_empty());
        assert_eq!(view.column("Age").unwrap().suggestions, vec!["30"]);
    }

    #[test]
    fn test_search_without_matches_hides_dropdown() {
        let mut table = DataTable::new(props(), sample()).unwrap();
        table.search_column("Name", "b").unwrap();
        table.search_column("Name", "zz").unwrap();
        assert!(table.suggestions().is_none());
        let column = table.column("Name").unwrap();
        assert!(!column.dropdown_visible);
        assert_eq!(column.filter_text(), "zz");
    }

    #[test]
    fn test_dropdown_toggle_is_independent() {
        let mut table = DataTable::new(props(), sample()).unwrap();
        table.search_column("Name", "a").unwrap();
        table.toggle_column_dropdown("Name").unwrap();
        assert!(!table.column("Name").unwrap().dropdown_visible);
        assert!(table.suggestions().is_some());
        assert!(table.derive_view().column("Name").unwrap().suggestions.is_empty());

        table.toggle_column_dropdown("Name").unwrap();
        assert_eq!(
            table.derive_view().column("Name").unwrap().suggestions,
            vec!["al"]
        );
    }

    #[test]
    fn test_clear_filters() {
        let mut table = DataTable::new(props(), sample()).unwrap();
        table.toggle_column_filter("Age", "30").unwrap();
        table.toggle_column_filter("Name", "bob").unwrap();
        table.set_global_filter("b");
        table.clear_column_filter("Age").unwrap();
        assert_eq!(table.filtered_indices(), vec![0]);
        table.clear_all_filters();
        assert_eq!(table.filtered_indices(), vec![0, 1, 2]);
        assert_eq!(table.global_filter(), "");
    }

    #[test]
    fn test_replace_data() {
        let mut table = DataTable::new(props(), sample()).unwrap();
        table.toggle_column_filter("Age", "30").unwrap();
        table.search_column("Name", "b").unwrap();
        table.set_page(2).unwrap();

        table.replace_data(numbered(3));
        assert_eq!(table.current_page(), 1);
        assert!(table.suggestions().is_none());
        assert!(!table.column("Name").unwrap().dropdown_visible);
        // Filters survive the reload
        assert!(table.column("Age").unwrap().has_filter());
    }

    #[test]
    fn test_view_pads_short_rows() {
        let data = Arc::new(Dataset::new(vec![Some(vec![CellValue::text("only")]), None]));
        let table = DataTable::new(props(), data).unwrap();
        let view = table.derive_view();
        assert_eq!(view.rows.len(), 1);
        assert_eq!(view.rows[0].cells, vec![CellValue::text("only"), CellValue::Empty]);
        assert_eq!(view.display_rows(), vec![vec!["only".to_string(), String::new()]]);
    }

    #[test]
    fn test_view_page_size_options() {
        let table = DataTable::new(props(), sample()).unwrap();
        let view = table.derive_view();
        let labels: Vec<&str> = view.page_size_options.iter().map(|o| o.label.as_str()).collect();
        assert_eq!(labels, vec!["5", "15", "25", "50", "All"]);
        assert!(view.page_size_options.iter().all(|o| !o.selected));
    }

    #[test]
    fn test_view_serializes_camel_case() {
        let mut table = DataTable::new(props(), sample()).unwrap();
        table.toggle_sort("Age").unwrap();
        let json = serde_json::to_value(table.derive_view()).unwrap();
        assert_eq!(json["page"]["totalPages"], 1);
        assert_eq!(json["columns"][1]["sort"], "ascending");
        assert_eq!(json["rows"][0]["sourceIndex"], 1);
        assert_eq!(json["rows"][2]["cells"][0], serde_json::Value::Null);
    }
}
