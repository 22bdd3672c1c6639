//! Configuration types and the persistent configuration file.
//!
//! Options structs in this module are what the library consumes; the
//! [`file`] submodule holds the on-disk TOML representation that feeds them.

pub mod analyze;
pub mod file;

pub use analyze::{AggregationMode, AnalyzeOptions};
pub use file::FileConfig;
