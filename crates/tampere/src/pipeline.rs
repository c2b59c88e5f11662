//! The panel-building pipeline.
//!
//! One linear pass: load and normalize the extracts, reshape them into the
//! firm-year panel, enrich with macro series, derive ratios and targets,
//! apply the data-quality gates, and write the cleaned panel to disk. Each
//! stage consumes the table the previous stage produced; any stage error
//! aborts the run before the output file is touched.

use polars::prelude::*;
use std::collections::HashSet;
use std::path::PathBuf;
use tampere_data::schema::col as cols;
use tampere_data::{gdp, rates, read_extracts, scrub_sentinels};
use tampere_output::summary::label_distribution;
use tampere_output::{ExportFormat, LabelSummary, write_panel};
use tampere_panel::{FilterConfig, ReshapeConfig, derive, enrich, filter, reshape};
use thiserror::Error;

/// Errors that can abort a pipeline run.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Extract or reference-table loading failed.
    #[error(transparent)]
    Data(#[from] tampere_data::DataError),

    /// Panel transformation failed.
    #[error(transparent)]
    Panel(#[from] tampere_panel::PanelError),

    /// Writing the output failed.
    #[error(transparent)]
    Export(#[from] tampere_output::ExportError),

    /// Polars error while collecting a stage.
    #[error("Polars error: {0}")]
    Polars(#[from] PolarsError),
}

/// Everything a pipeline run needs to know.
#[derive(Debug, Clone)]
pub struct PipelineConfig {
    /// Statement extracts sharing the results-sheet layout.
    pub extracts: Vec<PathBuf>,
    /// GDP workbook path.
    pub gdp: PathBuf,
    /// Output file path, overwritten unconditionally.
    pub output: PathBuf,
    /// Worksheet holding the statement data in every extract.
    pub sheet: String,
    /// Output format; inferred from the output extension when `None`.
    pub format: Option<ExportFormat>,
    /// Year bounds for the reshape.
    pub reshape: ReshapeConfig,
    /// Data-quality thresholds.
    pub filter: FilterConfig,
}

impl PipelineConfig {
    /// Configuration with the documented defaults for everything but paths.
    pub fn new(extracts: Vec<PathBuf>, gdp: PathBuf, output: PathBuf) -> Self {
        Self {
            extracts,
            gdp,
            output,
            sheet: tampere_data::schema::RESULTS_SHEET.to_string(),
            format: None,
            reshape: ReshapeConfig::default(),
            filter: FilterConfig::default(),
        }
    }
}

/// What a successful run produced.
#[derive(Debug)]
pub struct PipelineOutcome {
    /// The cleaned panel, as written.
    pub panel: DataFrame,
    /// Target distribution, taken after coding and before the final gates.
    pub summary: LabelSummary,
    /// Rows in the reshaped panel before any gate.
    pub rows_reshaped: usize,
    /// Rows written to the output file.
    pub rows_written: usize,
    /// Distinct companies in the output.
    pub companies_written: usize,
}

/// Run the whole pipeline and write the cleaned panel.
pub fn run(config: &PipelineConfig) -> Result<PipelineOutcome, PipelineError> {
    // Load and normalize
    let mut sheets = read_extracts(&config.extracts, &config.sheet)?;
    for sheet in &mut sheets {
        scrub_sentinels(sheet);
    }

    // Reshape into one row per (company, year)
    let panel = reshape::to_panel(&sheets, &config.reshape)?;
    let rows_reshaped = panel.height();

    // Enrich with macro series
    let lf = enrich::attach_interest_rates(panel.lazy(), rates::interest_rates()?)?;
    let lf = enrich::attach_gdp(lf, gdp::read_gdp(&config.gdp)?)?;

    // Row-quality gate ahead of the ratios
    let enriched = filter::drop_sparse_rows(lf.collect()?, &config.filter)?;

    // Ratios, rolling mean, lags, targets
    let lf = derive::derive_ratios(enriched.lazy());
    let lf = derive::average_total_assets(lf);
    let lf = derive::lag_features(lf);
    let lf = derive::attach_labels(lf);
    let lf = filter::drop_zero_heavy_companies(lf, &config.filter);
    let lf = derive::encode_categories(lf);

    // The distribution is taken before the thin-company, year and
    // completeness gates so it reflects every labeled observation.
    let labeled = lf.collect()?;
    let summary = label_distribution(&labeled)?;

    let lf = filter::drop_thin_companies(labeled.lazy(), &config.filter);
    let lf = filter::drop_recent_years(lf, &config.filter);
    let lf = filter::drop_incomplete_rows(lf);
    let mut cleaned = lf.collect()?;

    // Persist
    let format = config.format.unwrap_or_else(|| ExportFormat::from_path(&config.output));
    write_panel(&mut cleaned, &config.output, format)?;

    let rows_written = cleaned.height();
    let companies_written = distinct_companies(&cleaned)?;

    Ok(PipelineOutcome {
        panel: cleaned,
        summary,
        rows_reshaped,
        rows_written,
        companies_written,
    })
}

fn distinct_companies(df: &DataFrame) -> Result<usize, PipelineError> {
    let companies = df.column(cols::COMPANY)?.str()?;
    let distinct: HashSet<&str> = companies.into_iter().flatten().collect();
    Ok(distinct.len())
}
