//! FILENAME: app/src/commands.rs
//! PURPOSE: Command surface over the shared table state.
//! CONTEXT: Each command locks the state, applies one mutator and returns the
//! freshly derived view. Any command issued before the load completes fails
//! with `STILL_LOADING`.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::sync::{MutexGuard, PoisonError};
use table_engine::{DataTable, PageNav, TableError, TableView};

use crate::{log_debug, log_enter, log_error, log_exit, log_info, log_warn, AppState, LoadState};

pub const STILL_LOADING: &str = "Table is still loading";

// ============================================================================
// HELPERS
// ============================================================================

/// Lock the table state. A panic in an earlier command must not lock the
/// session out, so a poisoned lock is taken over as is.
pub(crate) fn lock_table(state: &AppState) -> MutexGuard<'_, LoadState> {
    state.table.lock().unwrap_or_else(|poisoned| {
        log_warn!("CMD", "recovering table state from a poisoned lock");
        PoisonError::into_inner(poisoned)
    })
}

/// Run a mutator against the ready table and return the new view.
fn with_table<F>(state: &AppState, f: F) -> Result<TableView, String>
where
    F: FnOnce(&mut DataTable) -> Result<(), TableError>,
{
    let mut guard = lock_table(state);
    let Some(table) = guard.table_mut() else {
        log_warn!("CMD", "command rejected: {}", STILL_LOADING);
        return Err(STILL_LOADING.to_string());
    };
    f(table).map_err(|e| e.to_string())?;
    Ok(table.derive_view())
}

// ============================================================================
// VIEW & STATE
// ============================================================================

pub fn is_loading(state: &AppState) -> bool {
    lock_table(state).is_loading()
}

pub fn get_table_view(state: &AppState) -> Result<TableView, String> {
    with_table(state, |_| Ok(()))
}

// ============================================================================
// FILTERS
// ============================================================================

pub fn set_global_filter(state: &AppState, value: &str) -> Result<TableView, String> {
    log_debug!("CMD", "set_global_filter {:?}", value);
    with_table(state, |t| {
        t.set_global_filter(value);
        Ok(())
    })
}

pub fn toggle_column_filter(state: &AppState, column: &str, value: &str) -> Result<TableView, String> {
    log_debug!("CMD", "toggle_column_filter {} {:?}", column, value);
    with_table(state, |t| t.toggle_column_filter(column, value))
}

pub fn clear_column_filter(state: &AppState, column: &str) -> Result<TableView, String> {
    with_table(state, |t| t.clear_column_filter(column))
}

pub fn clear_all_filters(state: &AppState) -> Result<TableView, String> {
    with_table(state, |t| {
        t.clear_all_filters();
        Ok(())
    })
}

pub fn search_column(state: &AppState, column: &str, text: &str) -> Result<TableView, String> {
    log_debug!("CMD", "search_column {} {:?}", column, text);
    with_table(state, |t| t.search_column(column, text))
}

pub fn select_suggestion(state: &AppState, column: &str, value: &str) -> Result<TableView, String> {
    with_table(state, |t| t.select_suggestion(column, value))
}

pub fn toggle_column_dropdown(state: &AppState, column: &str) -> Result<TableView, String> {
    with_table(state, |t| t.toggle_column_dropdown(column))
}

// ============================================================================
// SORT & PAGINATION
// ============================================================================

pub fn toggle_sort(state: &AppState, column: &str) -> Result<TableView, String> {
    log_debug!("CMD", "toggle_sort {}", column);
    with_table(state, |t| t.toggle_sort(column))
}

pub fn clear_sort(state: &AppState) -> Result<TableView, String> {
    with_table(state, |t| {
        t.clear_sort();
        Ok(())
    })
}

pub fn set_page(state: &AppState, page: usize) -> Result<TableView, String> {
    with_table(state, |t| t.set_page(page))
}

pub fn navigate_page(state: &AppState, nav: PageNav) -> Result<TableView, String> {
    with_table(state, |t| {
        t.navigate(nav);
        Ok(())
    })
}

/// Apply a page size selector value; -1 means all rows.
pub fn select_page_size(state: &AppState, value: i64) -> Result<TableView, String> {
    log_debug!("CMD", "select_page_size {}", value);
    with_table(state, |t| t.select_page_size_option(value))
}

// ============================================================================
// EXPORT
// ============================================================================

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExportResult {
    pub success: bool,
    pub path: PathBuf,
    pub row_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ExportResult {
    fn failed(path: PathBuf, error: String) -> Self {
        ExportResult {
            success: false,
            path,
            row_count: 0,
            error: Some(error),
        }
    }
}

/// Write every dataset row (ignoring filters, sort and paging) to a workbook.
/// `path` defaults to the configured export path.
pub fn export_to_excel(state: &AppState, path: Option<PathBuf>) -> ExportResult {
    let path = path.unwrap_or_else(|| state.config.export_path.clone());
    log_enter!("EXPORT", "export_to_excel", "path={}", path.display());

    let guard = lock_table(state);
    let table = match &*guard {
        LoadState::Ready(t) => t,
        LoadState::Loading => {
            log_warn!("EXPORT", "export rejected: {}", STILL_LOADING);
            return ExportResult::failed(path, STILL_LOADING.to_string());
        }
    };

    let result = match persistence::export_xlsx(table.column_headers(), table.data(), &path) {
        Ok(row_count) => {
            log_info!("EXPORT", "wrote {} rows to {}", row_count, path.display());
            ExportResult {
                success: true,
                path,
                row_count,
                error: None,
            }
        }
        Err(e) => {
            log_error!("EXPORT", "export to {} failed: {}", path.display(), e);
            ExportResult::failed(path, e.to_string())
        }
    };
    log_exit!("EXPORT", "export_to_excel", "success={}", result.success);
    result
}
