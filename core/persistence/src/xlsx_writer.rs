//! FILENAME: core/persistence/src/xlsx_writer.rs

use crate::{PersistenceError, EXPORT_SHEET_NAME};
use rust_xlsxwriter::{Format, Workbook as XlsxWorkbook, Worksheet};
use std::path::Path;
use table_engine::dataset::row_cell;
use table_engine::{CellValue, Dataset};

/// Excel's column limit.
const MAX_COLUMNS: usize = 16_384;

/// Widest column we size to, in characters.
const MAX_COLUMN_WIDTH: usize = 60;

/// Build the export workbook: bold headers in row 0, then every non-null
/// dataset row in order. Returns the workbook and the data row count.
pub fn build_export_workbook(
    headers: &[String],
    dataset: &Dataset,
) -> Result<(XlsxWorkbook, usize), PersistenceError> {
    if headers.len() > MAX_COLUMNS {
        return Err(PersistenceError::TooManyColumns(headers.len()));
    }

    let mut xlsx = XlsxWorkbook::new();
    let worksheet = xlsx.add_worksheet();
    worksheet.set_name(EXPORT_SHEET_NAME)?;

    let header_format = Format::new().set_bold();
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();

    for (col, header) in headers.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, header, &header_format)?;
    }

    let mut written = 0usize;
    for (_, row) in dataset.present_rows() {
        // Cells past the last header are still written
        let row_width = row.len().max(headers.len());
        if row_width > MAX_COLUMNS {
            return Err(PersistenceError::TooManyColumns(row_width));
        }
        if widths.len() < row_width {
            widths.resize(row_width, 0);
        }

        let excel_row = (written + 1) as u32;
        for (col, width) in widths.iter_mut().enumerate().take(row_width) {
            let cell = row_cell(row, col);
            write_cell(worksheet, excel_row, col as u16, cell)?;
            *width = (*width).max(cell.display_value().chars().count());
        }
        written += 1;
    }

    for (col, width) in widths.iter().enumerate() {
        let width = (*width + 2).min(MAX_COLUMN_WIDTH);
        worksheet.set_column_width(col as u16, width as f64)?;
    }

    Ok((xlsx, written))
}

fn write_cell(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    cell: &CellValue,
) -> Result<(), PersistenceError> {
    match cell {
        CellValue::Empty => {
            worksheet.write_string(row, col, "")?;
        }
        CellValue::Number(n) => {
            worksheet.write_number(row, col, *n)?;
        }
        CellValue::Text(s) => {
            worksheet.write_string(row, col, s)?;
        }
        CellValue::Boolean(b) => {
            worksheet.write_boolean(row, col, *b)?;
        }
    }
    Ok(())
}

/// Write the export workbook to `path`. Returns the data row count.
pub fn export_xlsx(
    headers: &[String],
    dataset: &Dataset,
    path: &Path,
) -> Result<usize, PersistenceError> {
    let (mut xlsx, written) = build_export_workbook(headers, dataset)?;
    xlsx.save(path)?;
    log::debug!("exported {} rows to {}", written, path.display());
    Ok(written)
}

/// Serialize the export workbook to bytes, for hosts that hand the file
/// to a download rather than the filesystem.
pub fn export_xlsx_to_buffer(
    headers: &[String],
    dataset: &Dataset,
) -> Result<Vec<u8>, PersistenceError> {
    let (mut xlsx, written) = build_export_workbook(headers, dataset)?;
    let bytes = xlsx.save_to_buffer()?;
    log::debug!("exported {} rows to buffer ({} bytes)", written, bytes.len());
    Ok(bytes)
}
