//! Inline Euribor reference table.
//!
//! Annual 3-month and 12-month Euribor fixings for 2005-2019. The series is
//! small and static, so it ships inline rather than as another input file.

use crate::error::Result;
use crate::schema::col;
use polars::prelude::*;

/// Years covered by the table, most recent first.
const YEARS: [i32; 15] = [
    2019, 2018, 2017, 2016, 2015, 2014, 2013, 2012, 2011, 2010, 2009, 2008, 2007, 2006, 2005,
];

/// 3-month Euribor, aligned with [`YEARS`].
const EURIBOR_3M: [f64; 15] = [
    -0.383, -0.309, -0.329, -0.319, -0.131, 0.078, 0.287, 0.187, 1.356, 1.006, 0.7, 2.892, 4.684,
    3.725, 2.488,
];

/// 12-month Euribor, aligned with [`YEARS`].
const EURIBOR_12M: [f64; 15] = [
    -0.249, -0.117, -0.186, -0.082, 0.06, 0.325, 0.556, 0.542, 1.947, 1.507, 1.248, 3.049, 4.745,
    4.028, 2.844,
];

/// Build the interest-rate reference frame: one row per year with both series.
pub fn interest_rates() -> Result<DataFrame> {
    let df = DataFrame::new(vec![
        Series::new(col::YEAR.into(), YEARS.to_vec()).into(),
        Series::new(col::RATE_3M.into(), EURIBOR_3M.to_vec()).into(),
        Series::new(col::RATE_12M.into(), EURIBOR_12M.to_vec()).into(),
    ])?;
    Ok(df)
}
