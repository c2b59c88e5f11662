//! Error types for data loading.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for data operations.
pub type Result<T> = std::result::Result<T, DataError>;

/// Errors that can occur while loading extracts and reference tables.
#[derive(Debug, Error)]
pub enum DataError {
    /// Workbook could not be opened or parsed.
    #[error("Failed to read workbook {path}: {source}")]
    Workbook {
        /// Path of the offending workbook.
        path: PathBuf,
        /// Underlying calamine error.
        #[source]
        source: calamine::XlsxError,
    },

    /// Requested worksheet does not exist in the workbook.
    #[error("Worksheet '{sheet}' not found in {path}")]
    MissingSheet {
        /// Name of the missing worksheet.
        sheet: String,
        /// Path of the workbook.
        path: PathBuf,
    },

    /// A required column is absent from a sheet.
    #[error("Missing column '{column}' in {path}")]
    MissingColumn {
        /// Canonical name of the missing column.
        column: String,
        /// Path of the workbook.
        path: PathBuf,
    },

    /// Worksheet contained no data rows.
    #[error("Worksheet '{sheet}' in {path} is empty")]
    EmptySheet {
        /// Name of the empty worksheet.
        sheet: String,
        /// Path of the workbook.
        path: PathBuf,
    },

    /// Polars error while building a reference frame.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
