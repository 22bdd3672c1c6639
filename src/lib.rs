//! # disk-utility
//!
//! Library side of the `disk-utility` CLI: disk usage accounting, unit
//! conversion, zip archive handling, and the configuration they share.
//!
//! ## Main Parts
//!
//! - [`walker::Walker`] - Measures every file and directory under a root path
//! - [`utils::size`] - Base-1024 unit conversion and unit selector parsing
//! - [`archive`] - Zip creation and extraction
//! - [`output`] - Human-readable and JSON reports
//! - [`config`] - Analysis options and the TOML configuration file

pub mod archive;
pub mod config;
pub mod output;
pub mod utils;
pub mod walker;

pub use config::{AggregationMode, AnalyzeOptions};
pub use utils::{Unit, convert, format_in_unit, parse_unit_choice};
pub use walker::{DiskUsage, SizeEntry, WalkError, Walker};
