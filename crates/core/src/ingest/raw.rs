//! Raw cell and row types produced by the file reader.

use std::fmt;

use chrono::NaiveDateTime;

pub(crate) static EMPTY_CELL: RawCell = RawCell::Empty;

/// A single untyped cell as read from a CSV or workbook file.
#[derive(Debug, Clone, PartialEq)]
pub enum RawCell {
    Empty,
    Text(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    /// A native spreadsheet date, already resolved against the workbook's
    /// date system (1900 or 1904).
    DateTime(NaiveDateTime),
    /// A cell holding an error value such as `#N/A` or `#REF!`.
    Error(String),
}

impl RawCell {
    /// `true` for empty cells and whitespace-only text.
    pub fn is_blank(&self) -> bool {
        match self {
            Self::Empty => true,
            Self::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }
}

impl fmt::Display for RawCell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => f.write_str(""),
            Self::Text(s) => f.write_str(s),
            Self::Int(n) => write!(f, "{n}"),
            Self::Float(n) => write!(f, "{n}"),
            Self::Bool(b) => write!(f, "{b}"),
            Self::DateTime(dt) => write!(f, "{dt}"),
            Self::Error(e) => f.write_str(e),
        }
    }
}

/// One data row, positionally aligned with the file's header row.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRow {
    /// 1-based line in the source file (the header is line 1).
    pub line: usize,
    pub cells: Vec<RawCell>,
}

impl RawRow {
    /// Cell at `index`, or [`RawCell::Empty`] past the end of a short row.
    pub fn get(&self, index: usize) -> &RawCell {
        self.cells.get(index).unwrap_or(&EMPTY_CELL)
    }

    pub fn is_blank(&self) -> bool {
        self.cells.iter().all(RawCell::is_blank)
    }
}
