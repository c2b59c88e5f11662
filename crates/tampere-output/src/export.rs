//! Panel export.
//!
//! Writes the final panel to a single file, overwriting whatever is at the
//! path, with no index column. XLSX is the default; CSV is a cheaper
//! alternative when the panel feeds other tooling.

use polars::prelude::*;
use rust_xlsxwriter::Workbook;
use std::fs::File;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur during export.
#[derive(Debug, Error)]
pub enum ExportError {
    /// Workbook writing error.
    #[error("Workbook write error: {0}")]
    Xlsx(#[from] rust_xlsxwriter::XlsxError),

    /// Polars error while serializing.
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Supported output formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Excel workbook with a single sheet.
    Xlsx,
    /// Comma-separated values.
    Csv,
}

impl ExportFormat {
    /// Pick a format from a path's extension; XLSX when in doubt.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("csv") => Self::Csv,
            _ => Self::Xlsx,
        }
    }

    /// File extension for this format.
    pub const fn extension(&self) -> &str {
        match self {
            Self::Xlsx => "xlsx",
            Self::Csv => "csv",
        }
    }
}

/// Write the panel to `path` in the given format, overwriting any existing
/// file. Column order is preserved and no index column is added.
pub fn write_panel(df: &mut DataFrame, path: &Path, format: ExportFormat) -> Result<(), ExportError> {
    match format {
        ExportFormat::Xlsx => write_xlsx(df, path),
        ExportFormat::Csv => write_csv(df, path),
    }
}

fn write_xlsx(df: &DataFrame, path: &Path) -> Result<(), ExportError> {
    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();

    for (col_idx, column) in df.get_columns().iter().enumerate() {
        let col_idx = col_idx as u16;
        worksheet.write_string(0, col_idx, column.name().as_str())?;
        for row_idx in 0..column.len() {
            let row = (row_idx + 1) as u32;
            match column.get(row_idx)? {
                AnyValue::Null => {}
                AnyValue::String(s) => {
                    worksheet.write_string(row, col_idx, s)?;
                }
                AnyValue::StringOwned(s) => {
                    worksheet.write_string(row, col_idx, s.as_str())?;
                }
                AnyValue::Float64(v) => {
                    worksheet.write_number(row, col_idx, v)?;
                }
                AnyValue::Float32(v) => {
                    worksheet.write_number(row, col_idx, f64::from(v))?;
                }
                AnyValue::Int32(v) => {
                    worksheet.write_number(row, col_idx, f64::from(v))?;
                }
                AnyValue::Int64(v) => {
                    worksheet.write_number(row, col_idx, v as f64)?;
                }
                AnyValue::UInt32(v) => {
                    worksheet.write_number(row, col_idx, f64::from(v))?;
                }
                AnyValue::Boolean(v) => {
                    worksheet.write_number(row, col_idx, f64::from(u8::from(v)))?;
                }
                other => {
                    worksheet.write_string(row, col_idx, other.to_string())?;
                }
            }
        }
    }

    workbook.save(path)?;
    Ok(())
}

fn write_csv(df: &mut DataFrame, path: &Path) -> Result<(), ExportError> {
    let mut file = File::create(path)?;
    CsvWriter::new(&mut file).include_header(true).finish(df)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use calamine::{Data, Reader, Xlsx, open_workbook};
    use tempfile::TempDir;

    fn panel() -> DataFrame {
        DataFrame::new(vec![
            Series::new("company".into(), vec!["Alpha Oy", "Beta AB"]).into(),
            Series::new("year".into(), vec![2015i32, 2016]).into(),
            Series::new("roe".into(), vec![0.25f64, 0.125]).into(),
        ])
        .unwrap()
    }

    #[test]
    fn format_follows_the_extension() {
        assert_eq!(ExportFormat::from_path(Path::new("panel.csv")), ExportFormat::Csv);
        assert_eq!(ExportFormat::from_path(Path::new("panel.CSV")), ExportFormat::Csv);
        assert_eq!(ExportFormat::from_path(Path::new("panel.xlsx")), ExportFormat::Xlsx);
        assert_eq!(ExportFormat::from_path(Path::new("panel")), ExportFormat::Xlsx);
        assert_eq!(ExportFormat::Csv.extension(), "csv");
        assert_eq!(ExportFormat::Xlsx.extension(), "xlsx");
    }

    #[test]
    fn xlsx_round_trips_through_calamine() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("panel.xlsx");

        let mut df = panel();
        write_panel(&mut df, &path, ExportFormat::Xlsx).unwrap();

        let mut workbook: Xlsx<_> = open_workbook(&path).unwrap();
        let range = workbook.worksheet_range_at(0).unwrap().unwrap();
        let rows: Vec<_> = range.rows().collect();

        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0][0], Data::String("company".to_string()));
        assert_eq!(rows[1][0], Data::String("Alpha Oy".to_string()));
        assert_eq!(rows[1][1], Data::Float(2015.0));
        assert_eq!(rows[2][2], Data::Float(0.125));
    }

    #[test]
    fn existing_files_are_overwritten() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("panel.xlsx");

        std::fs::write(&path, b"stale").unwrap();
        let mut df = panel();
        write_panel(&mut df, &path, ExportFormat::Xlsx).unwrap();

        let mut workbook: Xlsx<_> = open_workbook(&path).unwrap();
        let range = workbook.worksheet_range_at(0).unwrap().unwrap();
        assert_eq!(range.rows().count(), 3);
    }

    #[test]
    fn csv_has_a_header_and_no_index_column() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("panel.csv");

        let mut df = panel();
        write_panel(&mut df, &path, ExportFormat::Csv).unwrap();

        let text = std::fs::read_to_string(&path).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some("company,year,roe"));
        assert_eq!(lines.next(), Some("Alpha Oy,2015,0.25"));
    }
}
