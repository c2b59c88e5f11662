//! Spreadsheet extract reading.
//!
//! Each extract is an `.xlsx` export with one row per company and wide
//! year-suffixed statement columns. The reader keeps the sheet in raw form
//! (headers plus typed cells); the reshaper decides which columns melt into
//! the panel. No cross-extract schema validation happens here: columns
//! present in only some extracts simply yield missing values downstream.

use crate::error::{DataError, Result};
use crate::schema;
use calamine::{Data, Reader, Xlsx, open_workbook};
use std::path::{Path, PathBuf};

/// A single cell of an extract, reduced to the types the pipeline handles.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    /// Numeric cell (floats, ints, bools and serial dates all collapse here).
    Number(f64),
    /// Textual cell, kept verbatim.
    Text(String),
    /// Blank or error cell.
    Empty,
}

impl CellValue {
    /// Numeric view of the cell.
    pub const fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(v) => Some(*v),
            _ => None,
        }
    }

    /// Render the cell as an identifier label.
    pub fn label(&self) -> String {
        match self {
            Self::Text(s) => s.clone(),
            Self::Number(v) => format_numeric(*v),
            Self::Empty => String::new(),
        }
    }
}

/// One worksheet of one extract, as read from disk.
#[derive(Debug, Clone)]
pub struct RawSheet {
    /// Workbook the sheet came from.
    pub path: PathBuf,
    /// Header labels, canonicalized via [`schema::canonical_header`].
    pub headers: Vec<String>,
    /// Data rows, one `CellValue` per header.
    pub rows: Vec<Vec<CellValue>>,
}

impl RawSheet {
    /// Index of a header, if present.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Index of a header, or a typed error naming the sheet's workbook.
    pub fn require_column(&self, name: &str) -> Result<usize> {
        self.column_index(name).ok_or_else(|| DataError::MissingColumn {
            column: name.to_string(),
            path: self.path.clone(),
        })
    }
}

/// Read one worksheet of one extract.
pub fn read_extract(path: impl AsRef<Path>, sheet: &str) -> Result<RawSheet> {
    let path = path.as_ref();
    let mut workbook: Xlsx<_> = open_workbook(path).map_err(|source| DataError::Workbook {
        path: path.to_path_buf(),
        source,
    })?;
    let range = workbook.worksheet_range(sheet).map_err(|source| match source {
        calamine::XlsxError::WorksheetNotFound(_) => DataError::MissingSheet {
            sheet: sheet.to_string(),
            path: path.to_path_buf(),
        },
        other => DataError::Workbook {
            path: path.to_path_buf(),
            source: other,
        },
    })?;

    let mut rows = range.rows();
    let headers: Vec<String> = match rows.next() {
        Some(header_row) => header_row
            .iter()
            .map(|cell| schema::canonical_header(&CellValue::from(cell).label()).to_string())
            .collect(),
        None => {
            return Err(DataError::EmptySheet {
                sheet: sheet.to_string(),
                path: path.to_path_buf(),
            });
        }
    };

    let rows: Vec<Vec<CellValue>> =
        rows.map(|row| row.iter().map(CellValue::from).collect()).collect();
    if rows.is_empty() {
        return Err(DataError::EmptySheet {
            sheet: sheet.to_string(),
            path: path.to_path_buf(),
        });
    }

    Ok(RawSheet {
        path: path.to_path_buf(),
        headers,
        rows,
    })
}

/// Read the same worksheet from every extract, in order.
pub fn read_extracts(paths: &[PathBuf], sheet: &str) -> Result<Vec<RawSheet>> {
    paths.iter().map(|path| read_extract(path, sheet)).collect()
}

/// Replace the vendor's not-available / not-significant sentinels with zero.
///
/// Sentinel cells become numeric zero rather than missing; the downstream
/// zero-count gates are calibrated against that convention.
pub fn scrub_sentinels(sheet: &mut RawSheet) {
    for row in &mut sheet.rows {
        for cell in row.iter_mut() {
            if let CellValue::Text(text) = cell
                && schema::SENTINELS.contains(&text.trim())
            {
                *cell = CellValue::Number(0.0);
            }
        }
    }
}

impl From<&Data> for CellValue {
    fn from(cell: &Data) -> Self {
        match cell {
            Data::Empty | Data::Error(_) => Self::Empty,
            Data::Float(v) => Self::Number(*v),
            Data::Int(v) => Self::Number(*v as f64),
            Data::Bool(v) => Self::Number(if *v { 1.0 } else { 0.0 }),
            Data::String(s) => Self::Text(s.clone()),
            Data::DateTime(dt) => Self::Number(dt.as_f64()),
            Data::DateTimeIso(s) | Data::DurationIso(s) => Self::Text(s.clone()),
        }
    }
}

/// Format a numeric header or identifier without a trailing `.0`.
fn format_numeric(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        value.to_string()
    }
}
