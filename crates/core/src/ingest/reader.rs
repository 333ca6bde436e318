//! File reader: dispatch on extension and stream raw rows.
//!
//! CSV files are streamed record by record with the `csv` crate. Workbooks
//! (`xlsx`, `xls`, `ods`, ...) are opened with `calamine`; the selected sheet
//! is held in memory and rows are yielded from it one at a time.

use std::fmt;
use std::fs::File;
use std::path::Path;

use calamine::{open_workbook_auto, Data, Range, Reader};

use super::raw::{RawCell, RawRow};
use super::IngestError;

/// Extensions read as comma-delimited text.
pub const CSV_EXTENSIONS: &[&str] = &["csv", "txt"];

/// Extensions read as spreadsheet workbooks.
pub const WORKBOOK_EXTENSIONS: &[&str] = &["xlsx", "xlsm", "xlsb", "xls", "ods"];

/// Tabular formats the reader understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileFormat {
    Csv,
    Workbook,
}

impl FileFormat {
    /// Derive the format from a path's extension (case-insensitive).
    pub fn from_path(path: &Path) -> Option<Self> {
        let ext = path.extension()?.to_str()?.to_lowercase();
        if CSV_EXTENSIONS.contains(&ext.as_str()) {
            Some(Self::Csv)
        } else if WORKBOOK_EXTENSIONS.contains(&ext.as_str()) {
            Some(Self::Workbook)
        } else {
            None
        }
    }
}

/// A lazy, single-pass sequence of data rows from one file.
///
/// The header row is consumed on open and exposed via [`RowReader::headers`].
/// Rows whose cells are all blank are skipped.
pub struct RowReader {
    headers: Vec<String>,
    source: RowSource,
}

enum RowSource {
    Csv(csv::StringRecordsIntoIter<File>),
    Sheet {
        range: Range<Data>,
        /// 1-based line number of the range's first row.
        first_line: usize,
        next: usize,
    },
}

impl RowReader {
    /// Open `path`, selecting `sheet` in workbooks (first sheet when `None`).
    ///
    /// Sheet names match exactly first, then case-insensitively. CSV files
    /// ignore the sheet selector.
    pub fn open(path: &Path, sheet: Option<&str>) -> Result<Self, IngestError> {
        if !path.is_file() {
            return Err(IngestError::unreadable(format!(
                "file not found: {}",
                path.display()
            )));
        }

        match FileFormat::from_path(path) {
            Some(FileFormat::Csv) => Self::open_csv(path),
            Some(FileFormat::Workbook) => Self::open_workbook(path, sheet),
            None => Err(IngestError::unreadable(format!(
                "unsupported file type: {}",
                path.display()
            ))),
        }
    }

    /// Header cells as text, trimmed, in file order.
    pub fn headers(&self) -> &[String] {
        &self.headers
    }

    fn open_csv(path: &Path) -> Result<Self, IngestError> {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::All)
            .from_path(path)
            .map_err(|e| IngestError::unreadable(format!("cannot open CSV: {e}")))?;

        let headers: Vec<String> = reader
            .headers()
            .map_err(|e| IngestError::unreadable(format!("malformed CSV header: {e}")))?
            .iter()
            .map(str::to_string)
            .collect();
        ensure_header(&headers)?;

        Ok(Self {
            headers,
            source: RowSource::Csv(reader.into_records()),
        })
    }

    fn open_workbook(path: &Path, sheet: Option<&str>) -> Result<Self, IngestError> {
        let mut workbook = open_workbook_auto(path)
            .map_err(|e| IngestError::unreadable(format!("cannot open workbook: {e}")))?;

        let names = workbook.sheet_names();
        let name = match sheet {
            Some(wanted) => names
                .iter()
                .find(|n| n.as_str() == wanted)
                .or_else(|| names.iter().find(|n| n.eq_ignore_ascii_case(wanted)))
                .cloned()
                .ok_or_else(|| IngestError::unreadable(format!("sheet {wanted:?} not found")))?,
            None => names
                .first()
                .cloned()
                .ok_or_else(|| IngestError::unreadable("workbook has no sheets"))?,
        };

        let range = workbook
            .worksheet_range(&name)
            .map_err(|e| IngestError::unreadable(format!("cannot read sheet {name:?}: {e}")))?;

        let (start_row, _) = range
            .start()
            .ok_or_else(|| IngestError::unreadable(format!("sheet {name:?} is empty")))?;

        let headers: Vec<String> = (0..range.width())
            .map(|col| range.get((0, col)).map(header_text).unwrap_or_default())
            .collect();
        ensure_header(&headers)?;

        Ok(Self {
            headers,
            source: RowSource::Sheet {
                range,
                first_line: start_row as usize + 1,
                next: 1,
            },
        })
    }
}

impl fmt::Debug for RowReader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RowReader")
            .field("headers", &self.headers)
            .finish_non_exhaustive()
    }
}

impl Iterator for RowReader {
    type Item = Result<RawRow, IngestError>;

    fn next(&mut self) -> Option<Self::Item> {
        match &mut self.source {
            RowSource::Csv(records) => loop {
                let record = match records.next()? {
                    Ok(record) => record,
                    Err(e) => {
                        return Some(Err(IngestError::unreadable(format!("malformed CSV: {e}"))))
                    }
                };
                let line = record.position().map_or(0, |p| p.line() as usize);
                let row = RawRow {
                    line,
                    cells: record.iter().map(csv_cell).collect(),
                };
                if !row.is_blank() {
                    return Some(Ok(row));
                }
            },
            RowSource::Sheet {
                range,
                first_line,
                next,
            } => {
                while *next < range.height() {
                    let index = *next;
                    *next += 1;
                    let row = RawRow {
                        line: *first_line + index,
                        cells: (0..range.width())
                            .map(|col| range.get((index, col)).map_or(RawCell::Empty, sheet_cell))
                            .collect(),
                    };
                    if !row.is_blank() {
                        return Some(Ok(row));
                    }
                }
                None
            }
        }
    }
}

fn ensure_header(headers: &[String]) -> Result<(), IngestError> {
    if headers.iter().all(|h| h.trim().is_empty()) {
        return Err(IngestError::unreadable("no header row"));
    }
    Ok(())
}

fn csv_cell(field: &str) -> RawCell {
    if field.is_empty() {
        RawCell::Empty
    } else {
        RawCell::Text(field.to_string())
    }
}

fn sheet_cell(data: &Data) -> RawCell {
    match data {
        Data::Empty => RawCell::Empty,
        Data::String(s) => {
            if s.trim().is_empty() {
                RawCell::Empty
            } else {
                RawCell::Text(s.clone())
            }
        }
        Data::Int(n) => RawCell::Int(*n),
        Data::Float(f) => RawCell::Float(*f),
        Data::Bool(b) => RawCell::Bool(*b),
        Data::DateTime(dt) => dt
            .as_datetime()
            .map_or_else(|| RawCell::Error(dt.as_f64().to_string()), RawCell::DateTime),
        Data::DateTimeIso(s) | Data::DurationIso(s) => RawCell::Text(s.clone()),
        Data::Error(e) => RawCell::Error(e.to_string()),
    }
}

fn header_text(data: &Data) -> String {
    match data {
        Data::String(s) => s.trim().to_string(),
        Data::Float(f) if f.fract() == 0.0 => format!("{}", *f as i64),
        Data::Empty => String::new(),
        other => other.to_string(),
    }
}
