// FILENAME: core\persistence\src\xlsx_reader.rs

use crate::PersistenceError;
use calamine::{Data, Range, Reader, Xlsx};
use std::fs::File;
use std::io::{BufReader, Cursor};
use std::path::Path;
use table_engine::{CellValue, Dataset, Row};

/// The first worksheet of a workbook, split into headers and rows.
#[derive(Debug, Clone)]
pub struct LoadedSheet {
    pub sheet_name: String,
    pub column_headers: Vec<String>,
    pub rows: Dataset,
}

pub fn load_xlsx(path: &Path) -> Result<LoadedSheet, PersistenceError> {
    let file = File::open(path)?;
    let mut workbook = Xlsx::new(BufReader::new(file))?;
    first_sheet(&mut workbook)
}

pub fn load_xlsx_from_bytes(bytes: Vec<u8>) -> Result<LoadedSheet, PersistenceError> {
    let mut workbook = Xlsx::new(Cursor::new(bytes))?;
    first_sheet(&mut workbook)
}

fn first_sheet<RS>(workbook: &mut Xlsx<RS>) -> Result<LoadedSheet, PersistenceError>
where
    RS: std::io::Read + std::io::Seek,
{
    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .ok_or_else(|| PersistenceError::InvalidFormat("Workbook contains no sheets".to_string()))?;

    let range = workbook.worksheet_range(&sheet_name)?;

    let (column_headers, rows) = split_range(&range);
    if column_headers.is_empty() {
        return Err(PersistenceError::InvalidFormat(format!(
            "Worksheet '{}' has no header row",
            sheet_name
        )));
    }
    log::debug!(
        "loaded sheet '{}' with {} columns and {} rows",
        sheet_name,
        column_headers.len(),
        rows.len()
    );

    Ok(LoadedSheet {
        sheet_name,
        column_headers,
        rows: Dataset::from_rows(rows),
    })
}

/// First row becomes the headers, the rest become rows as wide as the headers.
fn split_range(range: &Range<Data>) -> (Vec<String>, Vec<Row>) {
    let mut iter = range.rows();

    let column_headers: Vec<String> = match iter.next() {
        Some(header_row) => header_row.iter().map(|c| c.to_string()).collect(),
        None => return (Vec::new(), Vec::new()),
    };

    let width = column_headers.len();
    let rows = iter
        .map(|row| {
            (0..width)
                .map(|col| row.get(col).map(data_to_cell).unwrap_or_default())
                .collect()
        })
        .collect();

    (column_headers, rows)
}

fn data_to_cell(data: &Data) -> CellValue {
    match data {
        Data::Empty => CellValue::Empty,
        Data::String(s) if s.is_empty() => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Float(f) => CellValue::Number(*f),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Bool(b) => CellValue::Boolean(*b),
        Data::Error(e) => CellValue::Text(format!("{:?}", e)),
        Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
        Data::DateTimeIso(s) => CellValue::Text(s.clone()),
        Data::DurationIso(s) => CellValue::Text(s.clone()),
    }
}
