//! FILENAME: core/engine/src/error.rs

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    #[error("Table has no columns")]
    NoColumns,

    #[error("Duplicate column header: {0}")]
    DuplicateColumn(String),

    #[error("Unknown column: {0}")]
    UnknownColumn(String),

    #[error("Invalid page size option: {0}")]
    InvalidPageSize(i64),

    #[error("Invalid page number: {0}")]
    InvalidPage(usize),
}
