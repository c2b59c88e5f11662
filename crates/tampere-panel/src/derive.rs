//! Ratio, lag and target derivation.
//!
//! Runs after macro enrichment, in this order: the shareholders-funds zero
//! guard, the ROE/ROA/free-cash-flow ratios, the six-field zero drop, the
//! 2-period average of total assets, per-company lag features, the four
//! decline targets and the dense category codes.
//!
//! Zero guards treat nulls as passing: a missing denominator is not a zero
//! denominator, and rows with missing fields fall through to the final
//! completeness gate instead of being dropped here.

use polars::prelude::*;
use tampere_data::schema::col as cols;

/// Fields that must be non-zero after ratio derivation.
const NONZERO_FIELDS: [&str; 6] = [
    cols::OPERATING_CASH_FLOW,
    cols::FIXED_ASSET_ADDITIONS,
    cols::SHAREHOLDERS_FUNDS,
    cols::ROE,
    cols::ROA,
    cols::FREE_CASH_FLOW,
];

/// Fields that receive a per-company 1-period lag.
const LAGGED_FIELDS: [(&str, &str); 4] = [
    (cols::OPERATING_CASH_FLOW, cols::OPERATING_CASH_FLOW_LAG1),
    (cols::FREE_CASH_FLOW, cols::FREE_CASH_FLOW_LAG1),
    (cols::ROA, cols::ROA_LAG1),
    (cols::ROE, cols::ROE_LAG1),
];

/// (lagged field, current field, target) triples for the decline labels.
const LABELS: [(&str, &str, &str); 4] = [
    (cols::ROE_LAG1, cols::ROE, cols::Y_ROE),
    (cols::ROA_LAG1, cols::ROA, cols::Y_ROA),
    (cols::FREE_CASH_FLOW_LAG1, cols::FREE_CASH_FLOW, cols::Y_FCF),
    (cols::OPERATING_CASH_FLOW_LAG1, cols::OPERATING_CASH_FLOW, cols::Y_CFO),
];

/// Compute ROE, ROA and free cash flow, then drop zero-valued key fields.
///
/// Free cash flow is recomputed as operating cash flow minus fixed-asset
/// additions, overwriting the raw extract column of the same name.
pub fn derive_ratios(lf: LazyFrame) -> LazyFrame {
    let nonzero = NONZERO_FIELDS
        .map(nonzero_or_null)
        .into_iter()
        .reduce(|acc, e| acc.and(e))
        .expect("at least one guarded field");

    lf.filter(nonzero_or_null(cols::SHAREHOLDERS_FUNDS))
        .with_columns([
            (col(cols::NET_INCOME) / col(cols::SHAREHOLDERS_FUNDS)).alias(cols::ROE),
            (col(cols::NET_INCOME) / col(cols::TOTAL_ASSETS)).alias(cols::ROA),
            (col(cols::OPERATING_CASH_FLOW) - col(cols::FIXED_ASSET_ADDITIONS))
                .alias(cols::FREE_CASH_FLOW),
        ])
        .filter(nonzero)
}

/// Add the 2-period rolling mean of total assets per company and drop the
/// rows where it is undefined (each company's first retained year).
pub fn average_total_assets(lf: LazyFrame) -> LazyFrame {
    lf.sort([cols::COMPANY, cols::YEAR], SortMultipleOptions::default())
        .with_columns([col(cols::TOTAL_ASSETS)
            .rolling_mean(RollingOptionsFixedWindow {
                window_size: 2,
                min_periods: 2,
                ..Default::default()
            })
            .over([col(cols::COMPANY)])
            .alias(cols::AVG_TOTAL_ASSETS)])
        .filter(col(cols::AVG_TOTAL_ASSETS).is_not_null())
}

/// Add the per-company 1-period lag of the four flow/ratio fields.
pub fn lag_features(lf: LazyFrame) -> LazyFrame {
    lf.sort([cols::COMPANY, cols::YEAR], SortMultipleOptions::default())
        .with_columns(LAGGED_FIELDS.map(|(source, name)| {
            col(source).shift(lit(1)).over([col(cols::COMPANY)]).alias(name)
        }))
}

/// Add the four binary decline targets.
///
/// A target is 1 exactly when the lagged value strictly exceeds the current
/// value: the labels flag year-over-year decline, not growth, and the
/// orientation is part of the target definition. A null lag lands in the
/// `otherwise` arm and yields 0.
pub fn attach_labels(lf: LazyFrame) -> LazyFrame {
    lf.with_columns(LABELS.map(|(lagged, current, name)| {
        when(col(lagged).gt(col(current)))
            .then(lit(1i32))
            .otherwise(lit(0i32))
            .alias(name)
    }))
}

/// Add dense integer codes for the country and sector columns.
///
/// Codes follow lexicographic order of the distinct values present, starting
/// at zero.
pub fn encode_categories(lf: LazyFrame) -> LazyFrame {
    lf.with_columns([
        dense_code(cols::COUNTRY, cols::COUNTRY_CODE),
        dense_code(cols::SECTOR, cols::SECTOR_CODE),
    ])
}

fn dense_code(source: &str, name: &str) -> Expr {
    (col(source)
        .rank(
            RankOptions {
                method: RankMethod::Dense,
                descending: false,
            },
            None,
        )
        .cast(DataType::Int32)
        - lit(1i32))
    .alias(name)
}

/// True when the field is non-zero or missing.
fn nonzero_or_null(name: &str) -> Expr {
    col(name).neq(lit(0.0)).fill_null(lit(true))
}
