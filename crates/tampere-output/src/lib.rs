#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod export;
pub mod report;
pub mod summary;

pub use export::{ExportError, ExportFormat, write_panel};
pub use report::RunReport;
pub use summary::{LabelCount, LabelSummary, label_distribution};

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
