//! Row and company-level data-quality gates.
//!
//! The sparse-row gate runs before ratio derivation; the remaining gates run
//! on the labeled panel. The zero-observation gates exclude whole companies:
//! one metric over the threshold removes every row of that company.

use crate::error::Result;
use polars::prelude::*;
use tampere_data::schema::col as cols;

/// Metrics whose zero observations disqualify a whole company.
const ZERO_GATED_METRICS: [&str; 3] = [cols::ROA, cols::FREE_CASH_FLOW, cols::ROE];

/// Thresholds for the data-quality gates.
#[derive(Debug, Clone, Copy)]
pub struct FilterConfig {
    /// Rows with more zero-valued numeric fields than this are dropped.
    pub max_zero_fields: u32,
    /// Companies with more zero observations than this in any gated metric
    /// are dropped entirely.
    pub max_zero_metric_obs: u32,
    /// Companies with this many observations or fewer are dropped.
    pub min_observations: u32,
    /// Rows with a later year than this are dropped.
    pub year_cutoff: i32,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            max_zero_fields: 3,
            max_zero_metric_obs: 2,
            min_observations: 10,
            year_cutoff: 2019,
        }
    }
}

/// Drop rows with too many zero-valued numeric fields.
///
/// Counts zeros across every `Float64` column present at this stage (the
/// statement features and the macro series); nulls are not zeros. Takes the
/// frame eagerly because the column set is data-dependent.
pub fn drop_sparse_rows(df: DataFrame, config: &FilterConfig) -> Result<DataFrame> {
    let zero_flags: Vec<Expr> = df
        .get_columns()
        .iter()
        .filter(|column| column.dtype() == &DataType::Float64)
        .map(|column| is_zero(column.name().as_str()).cast(DataType::UInt32))
        .collect();

    let Some(zero_count) = zero_flags.into_iter().reduce(|acc, e| acc + e) else {
        return Ok(df);
    };

    let filtered = df.lazy().filter(zero_count.lt_eq(lit(config.max_zero_fields))).collect()?;
    Ok(filtered)
}

/// Remove every row of any company with too many zero observations in any
/// one of ROA, free cash flow or ROE.
///
/// The metrics gate sequentially, each on the panel the previous gate left
/// behind; the counts are per company, so the result is order-independent.
pub fn drop_zero_heavy_companies(lf: LazyFrame, config: &FilterConfig) -> LazyFrame {
    ZERO_GATED_METRICS.iter().fold(lf, |acc, metric| {
        acc.filter(
            is_zero(metric)
                .cast(DataType::UInt32)
                .sum()
                .over([col(cols::COMPANY)])
                .lt_eq(lit(config.max_zero_metric_obs)),
        )
    })
}

/// Remove companies with too few observations.
pub fn drop_thin_companies(lf: LazyFrame, config: &FilterConfig) -> LazyFrame {
    lf.filter(
        col(cols::COMPANY)
            .len()
            .over([col(cols::COMPANY)])
            .gt(lit(config.min_observations)),
    )
}

/// Remove rows beyond the year cutoff.
pub fn drop_recent_years(lf: LazyFrame, config: &FilterConfig) -> LazyFrame {
    lf.filter(col(cols::YEAR).lt_eq(lit(config.year_cutoff)))
}

/// Remove any row with a missing value in any column.
pub fn drop_incomplete_rows(lf: LazyFrame) -> LazyFrame {
    lf.drop_nulls(None)
}

/// True when the field is exactly zero; nulls count as non-zero.
fn is_zero(name: &str) -> Expr {
    col(name).eq(lit(0.0)).fill_null(lit(false))
}
