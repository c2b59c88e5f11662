//! JSON run report.
//!
//! Captures what a pipeline run read, kept and wrote, so a batch run leaves
//! a machine-readable trace next to the output file.

use crate::summary::LabelSummary;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Errors that can occur while writing the report.
#[derive(Debug, Error)]
pub enum ReportError {
    /// Serialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// A run report for one pipeline execution.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    /// Report generation timestamp.
    pub generated_at: DateTime<Utc>,
    /// Extract files that fed the run.
    pub extracts: Vec<PathBuf>,
    /// Rows in the reshaped panel, before any gate.
    pub rows_reshaped: usize,
    /// Rows written to the output file.
    pub rows_written: usize,
    /// Distinct companies in the output.
    pub companies_written: usize,
    /// Target distribution at summary time.
    pub labels: LabelSummary,
    /// Where the panel was written.
    pub output: PathBuf,
}

impl RunReport {
    /// Create a report stamped with the current time.
    pub fn new(
        extracts: Vec<PathBuf>,
        rows_reshaped: usize,
        rows_written: usize,
        companies_written: usize,
        labels: LabelSummary,
        output: PathBuf,
    ) -> Self {
        Self {
            generated_at: Utc::now(),
            extracts,
            rows_reshaped,
            rows_written,
            companies_written,
            labels,
            output,
        }
    }

    /// Serialize the report as pretty JSON.
    pub fn to_json(&self) -> Result<String, ReportError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Write the report to a file, overwriting any existing one.
    pub fn write(&self, path: &Path) -> Result<(), ReportError> {
        std::fs::write(path, self.to_json()?)?;
        Ok(())
    }
}
