//! FILENAME: core/persistence/src/lib.rs
//! Table Persistence Module
//!
//! Exports the full dataset behind a table to a single-sheet XLSX workbook,
//! and reads such a workbook back as headers plus rows.

mod error;
mod xlsx_reader;
mod xlsx_writer;

pub use error::PersistenceError;
pub use xlsx_reader::{load_xlsx, load_xlsx_from_bytes, LoadedSheet};
pub use xlsx_writer::{build_export_workbook, export_xlsx, export_xlsx_to_buffer};

/// Fixed file name used for table exports.
pub const EXPORT_FILE_NAME: &str = "data.xlsx";

/// Name of the single worksheet in an export.
pub const EXPORT_SHEET_NAME: &str = "Sheet1";
