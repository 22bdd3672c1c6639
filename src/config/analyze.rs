//! Analysis configuration for disk usage walks.
//!
//! This module defines the options that control how a directory tree is
//! accounted and what is reported while walking it.

use clap::ValueEnum;
use serde::Deserialize;

use crate::utils::Unit;

/// How file sizes are attributed to directories.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Default, ValueEnum, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AggregationMode {
    /// A directory's size includes every file anywhere beneath it
    #[default]
    Recursive,

    /// A directory's size only includes the files directly inside it
    Direct,
}

/// Configuration for a disk usage analysis.
///
/// This struct contains options that control how the walk aggregates sizes,
/// which unit results are printed in, and how much is reported along the way.
#[derive(Clone, Debug)]
pub struct AnalyzeOptions {
    /// Whether to print every traversal diagnostic as it is collected
    pub verbose: bool,

    /// Unit used when printing sizes (`None` = ask interactively)
    pub unit: Option<Unit>,

    /// Whether directory sizes are recursive or direct-only
    pub aggregation: AggregationMode,
}

impl Default for AnalyzeOptions {
    fn default() -> Self {
        Self {
            verbose: false,
            unit: None,
            aggregation: AggregationMode::Recursive,
        }
    }
}
