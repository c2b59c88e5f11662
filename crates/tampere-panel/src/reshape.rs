//! Wide-to-long-to-wide reshape of the statement extracts.
//!
//! Extracts arrive with one row per company and one column per
//! (feature, year) pair. This module melts every column whose header embeds
//! a 4-digit year into (identifiers, feature, year, value) form, strips the
//! year suffix from the feature label, and folds the long records back into
//! one row per (company, country, sector, year) with one column per feature.
//! The first non-null value wins on duplicate keys, matching a
//! first-aggregator pivot. Headers without an embedded year never reach the
//! panel.

use crate::error::{PanelError, Result};
use polars::prelude::*;
use regex::Regex;
use std::collections::{BTreeMap, BTreeSet};
use std::sync::LazyLock;
use tampere_data::schema::col as cols;
use tampere_data::schema::{COMPANY_HEADER, COUNTRY_HEADER, SECTOR_HEADER, canonical_feature};
use tampere_data::{CellValue, RawSheet};

static YEAR_RUN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\d{4}").expect("static pattern"));
static YEAR_SUFFIX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s*\d{4}$").expect("static pattern"));

/// Bounds on what counts as a year inside a column header.
#[derive(Debug, Clone, Copy)]
pub struct ReshapeConfig {
    /// Lowest accepted year (inclusive).
    pub year_min: i32,
    /// Highest accepted year (exclusive).
    pub year_max: i32,
}

impl Default for ReshapeConfig {
    fn default() -> Self {
        Self {
            year_min: 1900,
            year_max: 2100,
        }
    }
}

/// A melted value column: where it sits in the sheet and what it becomes.
#[derive(Debug)]
struct YearColumn {
    index: usize,
    year: i32,
    feature: String,
}

/// (company, country, sector, year), the panel's primary key.
type PanelKey = (String, String, String, i32);

/// Fold the extracts into a tidy firm-year panel.
///
/// Output rows are unique per (company, country, sector, year) and sorted by
/// that key; output columns are the three identifiers, the year, and one
/// `Float64` column per feature seen in any extract. A feature absent from an
/// extract is simply null for that extract's companies, which is where a
/// schema mismatch across extracts surfaces.
pub fn to_panel(sheets: &[RawSheet], config: &ReshapeConfig) -> Result<DataFrame> {
    let mut features: BTreeSet<String> = BTreeSet::new();
    let mut cells: BTreeMap<PanelKey, BTreeMap<String, f64>> = BTreeMap::new();

    for sheet in sheets {
        let company_idx = sheet.require_column(COMPANY_HEADER)?;
        let country_idx = sheet.require_column(COUNTRY_HEADER)?;
        let sector_idx = sheet.require_column(SECTOR_HEADER)?;
        let id_indices = [company_idx, country_idx, sector_idx];

        let year_columns = year_columns(sheet, &id_indices, config);
        for column in &year_columns {
            features.insert(column.feature.clone());
        }

        for row in &sheet.rows {
            let key_of = |idx: usize| row.get(idx).map(CellValue::label).unwrap_or_default();
            for column in &year_columns {
                let Some(value) = row.get(column.index).and_then(CellValue::as_number) else {
                    continue;
                };
                let key = (
                    key_of(company_idx),
                    key_of(country_idx),
                    key_of(sector_idx),
                    column.year,
                );
                // first non-null value wins on duplicate (key, feature)
                cells
                    .entry(key)
                    .or_default()
                    .entry(column.feature.clone())
                    .or_insert(value);
            }
        }
    }

    if cells.is_empty() {
        return Err(PanelError::EmptyPanel);
    }

    let mut companies: Vec<String> = Vec::with_capacity(cells.len());
    let mut countries: Vec<String> = Vec::with_capacity(cells.len());
    let mut sectors: Vec<String> = Vec::with_capacity(cells.len());
    let mut years: Vec<i32> = Vec::with_capacity(cells.len());
    let mut feature_values: BTreeMap<&str, Vec<Option<f64>>> =
        features.iter().map(|f| (f.as_str(), Vec::with_capacity(cells.len()))).collect();

    for ((company, country, sector, year), row) in &cells {
        companies.push(company.clone());
        countries.push(country.clone());
        sectors.push(sector.clone());
        years.push(*year);
        for (feature, values) in feature_values.iter_mut() {
            values.push(row.get(*feature).copied());
        }
    }

    let mut columns: Vec<Column> = vec![
        Series::new(cols::COMPANY.into(), companies).into(),
        Series::new(cols::COUNTRY.into(), countries).into(),
        Series::new(cols::SECTOR.into(), sectors).into(),
        Series::new(cols::YEAR.into(), years).into(),
    ];
    for (feature, values) in feature_values {
        columns.push(Series::new(feature.into(), values).into());
    }

    Ok(DataFrame::new(columns)?)
}

/// Classify every non-identifier header that embeds an in-range 4-digit year.
fn year_columns(sheet: &RawSheet, id_indices: &[usize], config: &ReshapeConfig) -> Vec<YearColumn> {
    sheet
        .headers
        .iter()
        .enumerate()
        .filter(|(idx, _)| !id_indices.contains(idx))
        .filter_map(|(idx, header)| {
            let year = embedded_year(header, config)?;
            let label = YEAR_SUFFIX.replace(header, "");
            Some(YearColumn {
                index: idx,
                year,
                feature: canonical_feature(&label),
            })
        })
        .collect()
}

/// First 4-digit run in `header` that falls inside the configured range.
fn embedded_year(header: &str, config: &ReshapeConfig) -> Option<i32> {
    YEAR_RUN
        .find_iter(header)
        .filter_map(|m| m.as_str().parse::<i32>().ok())
        .find(|year| (config.year_min..config.year_max).contains(year))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn sheet(headers: &[&str], rows: Vec<Vec<CellValue>>) -> RawSheet {
        RawSheet {
            path: PathBuf::from("test.xlsx"),
            headers: headers.iter().map(|h| (*h).to_string()).collect(),
            rows,
        }
    }

    fn text(s: &str) -> CellValue {
        CellValue::Text(s.to_string())
    }

    fn num(v: f64) -> CellValue {
        CellValue::Number(v)
    }

    fn wide_sheet() -> RawSheet {
        sheet(
            &[
                "Company Name",
                "Country ISO code",
                "BvD sectors",
                "Total assets 2014",
                "Total assets 2015",
                "Shareholders funds 2014",
                "Shareholders funds 2015",
                "Remark",
            ],
            vec![
                vec![
                    text("Alpha Oy"),
                    text("FI"),
                    text("Machinery"),
                    num(100.0),
                    num(120.0),
                    num(40.0),
                    num(44.0),
                    text("keep out"),
                ],
                vec![
                    text("Beta AB"),
                    text("SE"),
                    text("Retail"),
                    num(200.0),
                    num(210.0),
                    num(80.0),
                    num(82.0),
                    text("keep out"),
                ],
            ],
        )
    }

    #[test]
    fn melts_and_pivots_back_to_original_values() {
        let panel = to_panel(&[wide_sheet()], &ReshapeConfig::default()).unwrap();

        // one row per (entity, year)
        assert_eq!(panel.height(), 4);
        let companies = panel.column("company").unwrap().str().unwrap();
        let years = panel.column("year").unwrap().i32().unwrap();
        let total_assets = panel.column("total_assets").unwrap().f64().unwrap();
        let funds = panel.column("shareholders_funds").unwrap().f64().unwrap();

        assert_eq!(companies.get(0), Some("Alpha Oy"));
        assert_eq!(years.get(0), Some(2014));
        assert_eq!(total_assets.get(0), Some(100.0));
        assert_eq!(funds.get(0), Some(40.0));
        assert_eq!(companies.get(3), Some("Beta AB"));
        assert_eq!(years.get(3), Some(2015));
        assert_eq!(total_assets.get(3), Some(210.0));
    }

    #[test]
    fn yearless_columns_never_reach_the_panel() {
        let panel = to_panel(&[wide_sheet()], &ReshapeConfig::default()).unwrap();
        assert!(panel.column("remark").is_err());
        assert_eq!(panel.width(), 6);
    }

    #[test]
    fn first_value_wins_on_duplicate_keys() {
        let duplicate = sheet(
            &["Company Name", "Country ISO code", "BvD sectors", "Total assets 2014"],
            vec![
                vec![text("Alpha Oy"), text("FI"), text("Machinery"), num(999.0)],
                vec![text("Alpha Oy"), text("FI"), text("Machinery"), num(111.0)],
            ],
        );
        let panel = to_panel(&[duplicate], &ReshapeConfig::default()).unwrap();
        assert_eq!(panel.height(), 1);
        let total_assets = panel.column("total_assets").unwrap().f64().unwrap();
        assert_eq!(total_assets.get(0), Some(999.0));
    }

    #[test]
    fn schema_mismatch_yields_missing_values() {
        let narrow = sheet(
            &["Company Name", "Country ISO code", "BvD sectors", "Total assets 2014"],
            vec![vec![text("Gamma GmbH"), text("DE"), text("Chemicals"), num(300.0)]],
        );
        let panel =
            to_panel(&[wide_sheet(), narrow], &ReshapeConfig::default()).unwrap();

        // Gamma has no shareholders-funds column anywhere: null, not an error
        let companies = panel.column("company").unwrap().str().unwrap();
        let funds = panel.column("shareholders_funds").unwrap().f64().unwrap();
        let gamma = (0..panel.height())
            .find(|&i| companies.get(i) == Some("Gamma GmbH"))
            .unwrap();
        assert_eq!(funds.get(gamma), None);
    }

    #[test]
    fn out_of_range_years_are_ignored() {
        let config = ReshapeConfig::default();
        assert_eq!(embedded_year("Total assets 2014", &config), Some(2014));
        assert_eq!(embedded_year("Total assets 2500", &config), None);
        assert_eq!(embedded_year("Total assets", &config), None);
    }

    #[test]
    fn missing_identifier_column_fails() {
        let bad = sheet(&["Company Name", "Total assets 2014"], vec![vec![text("A"), num(1.0)]]);
        let err = to_panel(&[bad], &ReshapeConfig::default()).unwrap_err();
        assert!(matches!(err, PanelError::Data(_)));
    }

    #[test]
    fn empty_extracts_fail() {
        let empty = sheet(
            &["Company Name", "Country ISO code", "BvD sectors", "Total assets 2014"],
            vec![],
        );
        let err = to_panel(&[empty], &ReshapeConfig::default()).unwrap_err();
        assert!(matches!(err, PanelError::EmptyPanel));
    }
}
