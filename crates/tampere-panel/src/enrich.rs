//! Macro enrichment: interest rates by year, GDP by (country, year).
//!
//! Both joins are left joins; a panel year or country missing from the
//! reference tables propagates nulls rather than failing, and the final
//! completeness gate decides what survives.

use crate::error::Result;
use polars::prelude::*;
use tampere_data::schema::col as cols;

/// Join the interest-rate table by year and add per-company 1-period lags.
///
/// The panel is sorted by (company, year) first so the lag reads each
/// company's prior statement year.
pub fn attach_interest_rates(panel: LazyFrame, rates: DataFrame) -> Result<LazyFrame> {
    let lf = panel
        .join(
            rates.lazy(),
            [col(cols::YEAR)],
            [col(cols::YEAR)],
            JoinArgs::new(JoinType::Left),
        )
        .sort([cols::COMPANY, cols::YEAR], SortMultipleOptions::default())
        .with_columns([
            lag_over_company(cols::RATE_3M, cols::RATE_3M_LAG1),
            lag_over_company(cols::RATE_12M, cols::RATE_12M_LAG1),
        ]);
    Ok(lf)
}

/// Join the long GDP table by (country, year) and add the prior-year GDP.
///
/// The lag is computed on the reference table, per country ordered by year,
/// so it is a calendar lag rather than an artifact of panel row order.
pub fn attach_gdp(panel: LazyFrame, gdp: DataFrame) -> Result<LazyFrame> {
    let gdp_lagged = gdp
        .lazy()
        .sort([cols::COUNTRY, cols::YEAR], SortMultipleOptions::default())
        .with_columns([col(cols::GDP)
            .shift(lit(1))
            .over([col(cols::COUNTRY)])
            .alias(cols::GDP_LAG1)]);

    let lf = panel.join(
        gdp_lagged,
        [col(cols::COUNTRY), col(cols::YEAR)],
        [col(cols::COUNTRY), col(cols::YEAR)],
        JoinArgs::new(JoinType::Left),
    );
    Ok(lf)
}

fn lag_over_company(source: &str, name: &str) -> Expr {
    col(source).shift(lit(1)).over([col(cols::COMPANY)]).alias(name)
}
