//! GDP workbook reading.
//!
//! The GDP source is a wide table: one country-code column plus one column
//! per year. It melts into a long (country, year, gdp) frame here so the
//! enricher can join it against the panel by key equality. Country codes are
//! whitespace-trimmed; header columns that do not parse as a 4-digit year are
//! skipped.

use crate::error::{DataError, Result};
use crate::extract::CellValue;
use crate::schema::{GDP_COUNTRY_HEADER, col};
use calamine::{Reader, Xlsx, open_workbook};
use polars::prelude::*;
use std::path::Path;

/// Read the first worksheet of the GDP workbook into a long reference frame.
///
/// Output columns: `country` (trimmed), `year`, `gdp`. Cells that are not
/// numeric stay missing rather than failing the load.
pub fn read_gdp(path: impl AsRef<Path>) -> Result<DataFrame> {
    let path = path.as_ref();
    let mut workbook: Xlsx<_> = open_workbook(path).map_err(|source| DataError::Workbook {
        path: path.to_path_buf(),
        source,
    })?;
    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| DataError::EmptySheet {
            sheet: "0".to_string(),
            path: path.to_path_buf(),
        })?
        .map_err(|source| DataError::Workbook {
            path: path.to_path_buf(),
            source,
        })?;

    let mut rows = range.rows();
    let headers: Vec<String> = rows
        .next()
        .map(|row| row.iter().map(|cell| CellValue::from(cell).label()).collect())
        .unwrap_or_default();

    let country_idx = headers
        .iter()
        .position(|h| h.trim() == GDP_COUNTRY_HEADER)
        .ok_or_else(|| DataError::MissingColumn {
            column: GDP_COUNTRY_HEADER.to_string(),
            path: path.to_path_buf(),
        })?;

    // (column index, year) for every header that reads as a 4-digit year
    let year_columns: Vec<(usize, i32)> = headers
        .iter()
        .enumerate()
        .filter(|(idx, _)| *idx != country_idx)
        .filter_map(|(idx, header)| parse_year(header).map(|year| (idx, year)))
        .collect();

    let mut countries: Vec<String> = Vec::new();
    let mut years: Vec<i32> = Vec::new();
    let mut values: Vec<Option<f64>> = Vec::new();

    for row in rows {
        let country = row
            .get(country_idx)
            .map(|cell| CellValue::from(cell).label().trim().to_string())
            .unwrap_or_default();
        for &(idx, year) in &year_columns {
            countries.push(country.clone());
            years.push(year);
            values.push(row.get(idx).and_then(|cell| CellValue::from(cell).as_number()));
        }
    }

    let df = DataFrame::new(vec![
        Series::new(col::COUNTRY.into(), countries).into(),
        Series::new(col::YEAR.into(), years).into(),
        Series::new(col::GDP.into(), values).into(),
    ])?;
    Ok(df)
}

fn parse_year(header: &str) -> Option<i32> {
    let trimmed = header.trim();
    if trimmed.len() == 4 && trimmed.chars().all(|c| c.is_ascii_digit()) {
        trimmed.parse().ok()
    } else {
        None
    }
}
