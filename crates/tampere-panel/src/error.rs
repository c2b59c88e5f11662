//! Error types for panel transformations.

use thiserror::Error;

/// Result type for panel operations.
pub type Result<T> = std::result::Result<T, PanelError>;

/// Errors that can occur while building the panel.
#[derive(Debug, Error)]
pub enum PanelError {
    /// Polars DataFrame error.
    #[error("Polars error: {0}")]
    Polars(#[from] polars::prelude::PolarsError),

    /// Extract-level error surfaced while reshaping.
    #[error("Extract error: {0}")]
    Data(#[from] tampere_data::DataError),

    /// The reshape produced no rows.
    #[error("No (company, year) observations found in the extracts")]
    EmptyPanel,
}
