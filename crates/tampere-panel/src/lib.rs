#![doc = include_str!("../README.md")]
#![cfg_attr(docsrs, feature(doc_cfg, doc_auto_cfg))]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod derive;
pub mod enrich;
pub mod error;
pub mod filter;
pub mod reshape;

pub use error::{PanelError, Result};
pub use filter::FilterConfig;
pub use reshape::ReshapeConfig;

/// Version information.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
