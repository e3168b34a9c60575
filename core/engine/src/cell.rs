//! FILENAME: core/engine/src/cell.rs
//! PURPOSE: Defines the value held by a single table cell.
//! CONTEXT: Rows arrive from a list store as loosely typed primitives
//! (string, number, boolean or null). `CellValue` keeps that shape and owns
//! the one stringification rule every filter, sort and export path reads.

use serde::{Deserialize, Serialize};

/// A primitive-or-null cell value.
/// Serialized untagged so `null`, `30`, `"Bob"` and `true` map directly.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    /// Missing value (`null` or an absent field).
    #[default]
    Empty,
    Boolean(bool),
    Number(f64),
    Text(String),
}

impl CellValue {
    pub fn text(s: impl Into<String>) -> Self {
        CellValue::Text(s.into())
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Returns the cell as display text. Empty cells become "".
    pub fn display_value(&self) -> String {
        match self {
            CellValue::Empty => String::new(),
            CellValue::Number(n) => {
                // Integral values render without a decimal point
                if n.fract() == 0.0 && n.abs() < 1e15 {
                    format!("{:.0}", n)
                } else {
                    format!("{}", n)
                }
            }
            CellValue::Text(s) => s.clone(),
            CellValue::Boolean(b) => if *b { "true" } else { "false" }.to_string(),
        }
    }

    /// Display text lower-cased; the comparison key for all matching.
    pub fn folded(&self) -> String {
        fold(&self.display_value())
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        CellValue::Boolean(value)
    }
}

impl<T: Into<CellValue>> From<Option<T>> for CellValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(CellValue::Empty)
    }
}

/// Case-folds user input the same way cells are folded.
pub fn fold(s: &str) -> String {
    s.to_lowercase()
}
