//! Column naming for the extracts and the panel.
//!
//! The extracts carry verbose vendor labels with a year suffix per column
//! ("Total assets 2017"). This module maps those labels onto the canonical
//! snake_case column set the rest of the pipeline is written against.

/// Worksheet holding the statement data in every extract.
pub const RESULTS_SHEET: &str = "Results";

/// Canonical company-name header after loading.
pub const COMPANY_HEADER: &str = "Company Name";

/// Country ISO code header in the extracts.
pub const COUNTRY_HEADER: &str = "Country ISO code";

/// Sector classification header in the extracts.
pub const SECTOR_HEADER: &str = "BvD sectors";

/// Country-code header in the GDP workbook.
pub const GDP_COUNTRY_HEADER: &str = "Country Code";

/// Sentinel tokens the vendor uses for not-available / not-significant cells.
pub const SENTINELS: [&str; 2] = ["n.a.", "n.s."];

/// Verbose extract headers renamed at load time.
const HEADER_RENAMES: [(&str, &str); 1] =
    [("Company name Latin alphabet", COMPANY_HEADER)];

/// Known statement features and their canonical panel column names.
const FEATURE_MAP: [(&str, &str); 13] = [
    ("Accounts receivable", col::ACCOUNTS_RECEIVABLE),
    ("Additions to Fixed Assets", col::FIXED_ASSET_ADDITIONS),
    ("Cost of goods sold", col::COST_OF_GOODS_SOLD),
    ("Current ratio", col::CURRENT_RATIO),
    ("Deferred revenue", col::DEFERRED_REVENUE),
    ("Increase/Decrease in Accounts Payable", col::PAYABLES_CHANGE),
    ("Net Cash from Operating Activities", col::OPERATING_CASH_FLOW),
    ("Operating revenue (Turnover)", col::OPERATING_REVENUE),
    ("P/L for period [=Net income]", col::NET_INCOME),
    ("Shareholders funds", col::SHAREHOLDERS_FUNDS),
    ("Total assets", col::TOTAL_ASSETS),
    ("Total liabilities", col::TOTAL_LIABILITIES),
    ("Free Cash Flow", col::FREE_CASH_FLOW),
];

/// Canonical panel column names.
pub mod col {
    /// Company name (entity identifier).
    pub const COMPANY: &str = "company";
    /// Country ISO code.
    pub const COUNTRY: &str = "country";
    /// Vendor sector classification.
    pub const SECTOR: &str = "sector";
    /// Statement year.
    pub const YEAR: &str = "year";

    /// Accounts receivable.
    pub const ACCOUNTS_RECEIVABLE: &str = "accounts_receivable";
    /// Additions to fixed assets (capital expenditure proxy).
    pub const FIXED_ASSET_ADDITIONS: &str = "fixed_asset_additions";
    /// Cost of goods sold.
    pub const COST_OF_GOODS_SOLD: &str = "cost_of_goods_sold";
    /// Current ratio.
    pub const CURRENT_RATIO: &str = "current_ratio";
    /// Deferred revenue.
    pub const DEFERRED_REVENUE: &str = "deferred_revenue";
    /// Increase/decrease in accounts payable.
    pub const PAYABLES_CHANGE: &str = "payables_change";
    /// Net cash from operating activities.
    pub const OPERATING_CASH_FLOW: &str = "operating_cash_flow";
    /// Operating revenue (turnover).
    pub const OPERATING_REVENUE: &str = "operating_revenue";
    /// Net income (P/L for the period).
    pub const NET_INCOME: &str = "net_income";
    /// Shareholders' funds.
    pub const SHAREHOLDERS_FUNDS: &str = "shareholders_funds";
    /// Total assets.
    pub const TOTAL_ASSETS: &str = "total_assets";
    /// Total liabilities.
    pub const TOTAL_LIABILITIES: &str = "total_liabilities";
    /// Free cash flow. Present in the raw extracts and later overwritten
    /// by operating cash flow minus fixed-asset additions.
    pub const FREE_CASH_FLOW: &str = "free_cash_flow";

    /// 3-month Euribor.
    pub const RATE_3M: &str = "rate_3m";
    /// 12-month Euribor.
    pub const RATE_12M: &str = "rate_12m";
    /// 3-month Euribor, lagged one period per company.
    pub const RATE_3M_LAG1: &str = "rate_3m_lag1";
    /// 12-month Euribor, lagged one period per company.
    pub const RATE_12M_LAG1: &str = "rate_12m_lag1";
    /// Gross domestic product of the company's country.
    pub const GDP: &str = "gdp";
    /// GDP of the prior calendar year.
    pub const GDP_LAG1: &str = "gdp_lag1";

    /// Return on equity.
    pub const ROE: &str = "roe";
    /// Return on assets.
    pub const ROA: &str = "roa";
    /// 2-period rolling mean of total assets per company.
    pub const AVG_TOTAL_ASSETS: &str = "avg_total_assets";
    /// Operating cash flow, lagged one period per company.
    pub const OPERATING_CASH_FLOW_LAG1: &str = "operating_cash_flow_lag1";
    /// Free cash flow, lagged one period per company.
    pub const FREE_CASH_FLOW_LAG1: &str = "free_cash_flow_lag1";
    /// Return on assets, lagged one period per company.
    pub const ROA_LAG1: &str = "roa_lag1";
    /// Return on equity, lagged one period per company.
    pub const ROE_LAG1: &str = "roe_lag1";

    /// 1 when ROE declined versus the prior period.
    pub const Y_ROE: &str = "y_roe";
    /// 1 when ROA declined versus the prior period.
    pub const Y_ROA: &str = "y_roa";
    /// 1 when free cash flow declined versus the prior period.
    pub const Y_FCF: &str = "y_fcf";
    /// 1 when operating cash flow declined versus the prior period.
    pub const Y_CFO: &str = "y_cfo";

    /// Dense integer code of the country column.
    pub const COUNTRY_CODE: &str = "country_code";
    /// Dense integer code of the sector column.
    pub const SECTOR_CODE: &str = "sector_code";
}

/// Canonicalize an extract header, applying the known renames.
pub fn canonical_header(raw: &str) -> &str {
    let trimmed = raw.trim();
    HEADER_RENAMES
        .iter()
        .find(|(from, _)| *from == trimmed)
        .map_or(trimmed, |(_, to)| to)
}

/// Map a year-stripped feature label onto its canonical column name.
///
/// Labels outside the known feature set survive under a slugified name so
/// that extracts with extra columns still reshape cleanly.
pub fn canonical_feature(label: &str) -> String {
    let trimmed = label.trim();
    FEATURE_MAP
        .iter()
        .find(|(from, _)| *from == trimmed)
        .map_or_else(|| slugify(trimmed), |(_, to)| (*to).to_string())
}

/// Lowercase a label and collapse non-alphanumeric runs into underscores.
pub fn slugify(label: &str) -> String {
    let mut slug = String::with_capacity(label.len());
    let mut last_underscore = true;
    for ch in label.chars() {
        if ch.is_ascii_alphanumeric() {
            slug.push(ch.to_ascii_lowercase());
            last_underscore = false;
        } else if !last_underscore {
            slug.push('_');
            last_underscore = true;
        }
    }
    while slug.ends_with('_') {
        slug.pop();
    }
    slug
}
