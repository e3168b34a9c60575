//! FILENAME: core/engine/src/pagination.rs
//! PURPOSE: Page size and page arithmetic for the table view.
//! CONTEXT: Page sizes travel across the host boundary as integers where
//! -1 means "show all". Inside the engine that sentinel is the explicit
//! `PageSize::Unbounded` variant so no infinity leaks into page math.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::num::NonZeroUsize;
use std::ops::Range;

use crate::error::TableError;

/// Integer used by hosts to mean "all rows on one page".
pub const ALL_ROWS_OPTION: i64 = -1;

/// Rows per page shown when the host does not choose.
pub const DEFAULT_ITEMS_PER_PAGE: usize = 6;

/// Page size options offered when the host does not choose.
pub const DEFAULT_PAGE_SIZE_OPTIONS: [i64; 5] = [5, 15, 25, 50, ALL_ROWS_OPTION];

// ============================================================================
// PAGE SIZE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i64")]
pub enum PageSize {
    Fixed(NonZeroUsize),
    Unbounded,
}

impl PageSize {
    /// Convert a host option value. -1 selects every row.
    pub fn from_option(value: i64) -> Result<Self, TableError> {
        if value == ALL_ROWS_OPTION {
            return Ok(PageSize::Unbounded);
        }
        usize::try_from(value)
            .ok()
            .and_then(NonZeroUsize::new)
            .map(PageSize::Fixed)
            .ok_or(TableError::InvalidPageSize(value))
    }

    pub fn fixed(n: usize) -> Option<Self> {
        NonZeroUsize::new(n).map(PageSize::Fixed)
    }

    /// Inverse of `from_option`.
    pub fn as_option(&self) -> i64 {
        match self {
            PageSize::Fixed(n) => n.get() as i64,
            PageSize::Unbounded => ALL_ROWS_OPTION,
        }
    }

    pub fn default_options() -> Vec<PageSize> {
        DEFAULT_PAGE_SIZE_OPTIONS
            .iter()
            .filter_map(|v| PageSize::from_option(*v).ok())
            .collect()
    }
}

impl Default for PageSize {
    fn default() -> Self {
        PageSize::Fixed(NonZeroUsize::new(DEFAULT_ITEMS_PER_PAGE).unwrap_or(NonZeroUsize::MIN))
    }
}

impl TryFrom<i64> for PageSize {
    type Error = TableError;

    fn try_from(value: i64) -> Result<Self, Self::Error> {
        PageSize::from_option(value)
    }
}

impl From<PageSize> for i64 {
    fn from(size: PageSize) -> Self {
        size.as_option()
    }
}

impl fmt::Display for PageSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageSize::Fixed(n) => write!(f, "{}", n),
            PageSize::Unbounded => write!(f, "All"),
        }
    }
}

// ============================================================================
// PAGE ARITHMETIC
// ============================================================================

/// Number of pages needed for `row_count` rows.
pub fn total_pages(row_count: usize, size: PageSize) -> usize {
    match size {
        PageSize::Fixed(n) => row_count.div_ceil(n.get()),
        PageSize::Unbounded => 1,
    }
}

/// Half-open range of rows on a 1-based page, clamped to `row_count`.
pub fn page_range(row_count: usize, page: usize, size: PageSize) -> Range<usize> {
    match size {
        PageSize::Fixed(n) => {
            let n = n.get();
            let start = page.saturating_sub(1).saturating_mul(n).min(row_count);
            let end = page.saturating_mul(n).min(row_count);
            start..end
        }
        PageSize::Unbounded => {
            if page == 1 {
                0..row_count
            } else {
                row_count..row_count
            }
        }
    }
}

/// Page navigation buttons.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum PageNav {
    First,
    Previous,
    Next,
    Last,
}

impl PageNav {
    /// Resolve to a concrete page; never below 1.
    pub fn target(&self, current_page: usize, total_pages: usize) -> usize {
        let page = match self {
            PageNav::First => 1,
            PageNav::Previous => current_page.saturating_sub(1),
            // Next is disabled on the last page
            PageNav::Next => current_page.saturating_add(1).min(total_pages),
            PageNav::Last => total_pages,
        };
        page.max(1)
    }
}

/// Pager state for rendering the footer controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PageInfo {
    pub current_page: usize,
    pub total_pages: usize,
    pub filtered_count: usize,
    pub page_size: PageSize,
    pub has_previous: bool,
    pub has_next: bool,
}

impl PageInfo {
    pub fn new(current_page: usize, filtered_count: usize, page_size: PageSize) -> Self {
        let total = total_pages(filtered_count, page_size);
        PageInfo {
            current_page,
            total_pages: total,
            filtered_count,
            page_size,
            has_previous: current_page > 1,
            has_next: current_page < total,
        }
    }
}
