//! Command-line interface definition and argument parsing.
//!
//! This module defines all subcommands, arguments, and options using the
//! [clap](https://docs.rs/clap/) library. Running without a subcommand starts
//! the interactive menu instead.
//!
//! Helper methods accept a [`FileConfig`] reference so that config-file
//! values act as defaults that CLI arguments can override (layered config).

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use disk_utility::config::{AggregationMode, AnalyzeOptions, FileConfig};
use disk_utility::utils::Unit;

/// Arguments for the `analyze` subcommand.
#[derive(Args)]
pub struct AnalyzeArgs {
    /// Directory (or file) to analyze
    path: PathBuf,

    /// Unit to print sizes in (kb, mb, gb, tb, bytes)
    ///
    /// When neither this flag nor the config file sets a unit, you are asked
    /// for one after the walk finishes.
    #[arg(short = 'u', long, value_enum)]
    unit: Option<Unit>,

    /// Only count files directly inside each directory
    ///
    /// By default a directory's size includes everything beneath it.
    #[arg(long)]
    direct: bool,

    /// Output results as a single JSON object for scripting/piping
    ///
    /// Suppresses the spinner and colored output. Sizes are formatted in KB
    /// unless a unit is given.
    #[arg(long)]
    json: bool,

    /// Show files and directories that could not be read
    #[arg(short = 'v', long)]
    verbose: bool,
}

/// Arguments for the `zip` subcommand.
#[derive(Args)]
pub struct ZipArgs {
    /// File or directory to compress
    source: PathBuf,

    /// Name of the archive, without the `.zip` extension
    name: String,

    /// Directory to write the archive to
    ///
    /// Defaults to `archive.output_dir` from the config file, then to the
    /// current directory.
    #[arg(short = 'o', long)]
    output_dir: Option<PathBuf>,
}

/// Arguments for the `unzip` subcommand.
#[derive(Args)]
pub struct UnzipArgs {
    /// Path of the `.zip` archive to extract
    archive: PathBuf,

    /// Destination directory (defaults to the current directory)
    dest: Option<PathBuf>,
}

/// Top-level subcommands.
#[derive(Subcommand)]
pub enum Commands {
    /// Report disk usage per directory and per file
    Analyze(AnalyzeArgs),

    /// Compress a file or directory into a zip archive
    Zip(ZipArgs),

    /// Extract a zip archive
    Unzip(UnzipArgs),

    /// Inspect or initialise the configuration file
    Config {
        #[command(subcommand)]
        command: ConfigCommand,
    },
}

/// Subcommands for `config`.
#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Print the effective configuration (file values + defaults for unset keys)
    Show,
    /// Write a default config.toml if none exists yet
    Init,
    /// Print the path to the config file
    Path,
}

/// Main command-line interface structure.
#[derive(Parser)]
#[command(name = "disk-utility")]
#[command(
    about = "Analyze disk usage per file and directory, and zip or unzip files and directories"
)]
#[command(version)]
#[command(author)]
pub struct Cli {
    /// Subcommand to run; without one the interactive menu starts
    #[command(subcommand)]
    pub subcommand: Option<Commands>,
}

impl AnalyzeArgs {
    /// The path to analyze, exactly as given.
    #[must_use]
    pub const fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Whether `--json` structured output mode is enabled.
    #[must_use]
    pub const fn json(&self) -> bool {
        self.json
    }

    /// Extract analysis options from CLI args and config file.
    ///
    /// - **unit**: CLI > config > `None` (ask the user)
    /// - **aggregation**: `--direct` > config > recursive
    /// - **verbose**: CLI flag `||` config value `||` `false`
    #[must_use]
    pub fn analyze_options(&self, config: &FileConfig) -> AnalyzeOptions {
        let aggregation = if self.direct {
            AggregationMode::Direct
        } else {
            config.analyze.aggregation.unwrap_or_default()
        };

        AnalyzeOptions {
            verbose: self.verbose || config.analyze.verbose.unwrap_or(false),
            unit: self.unit.or(config.analyze.unit),
            aggregation,
        }
    }
}

impl ZipArgs {
    /// The file or directory to compress.
    #[must_use]
    pub const fn source(&self) -> &PathBuf {
        &self.source
    }

    /// Archive path without its extension.
    ///
    /// Priority for the directory: CLI `--output-dir` > config file > `.`.
    #[must_use]
    pub fn destination(&self, config: &FileConfig) -> PathBuf {
        self.output_dir
            .clone()
            .or_else(|| config.archive_output_dir())
            .unwrap_or_else(|| PathBuf::from("."))
            .join(&self.name)
    }
}

impl UnzipArgs {
    /// The archive to extract.
    #[must_use]
    pub const fn archive(&self) -> &PathBuf {
        &self.archive
    }

    /// Extraction directory, defaulting to the current directory.
    #[must_use]
    pub fn destination(&self) -> PathBuf {
        self.dest.clone().unwrap_or_else(|| PathBuf::from("."))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;
    use disk_utility::config::file::{FileAnalyzeConfig, FileArchiveConfig};

    fn analyze_args(args: &[&str]) -> AnalyzeArgs {
        match Cli::parse_from(args).subcommand {
            Some(Commands::Analyze(a)) => a,
            _ => panic!("expected analyze subcommand"),
        }
    }

    fn zip_args(args: &[&str]) -> ZipArgs {
        match Cli::parse_from(args).subcommand {
            Some(Commands::Zip(a)) => a,
            _ => panic!("expected zip subcommand"),
        }
    }

    #[test]
    fn test_no_subcommand_means_menu() {
        let cli = Cli::parse_from(["disk-utility"]);
        assert!(cli.subcommand.is_none());
    }

    #[test]
    fn test_analyze_defaults() {
        let args = analyze_args(&["disk-utility", "analyze", "/some/dir"]);
        let opts = args.analyze_options(&FileConfig::default());

        assert_eq!(args.path(), &PathBuf::from("/some/dir"));
        assert!(!args.json());
        assert!(!opts.verbose);
        assert!(opts.unit.is_none());
        assert_eq!(opts.aggregation, AggregationMode::Recursive);
    }

    #[test]
    fn test_analyze_flags() {
        let args = analyze_args(&[
            "disk-utility",
            "analyze",
            ".",
            "--unit",
            "gb",
            "--direct",
            "--json",
            "-v",
        ]);
        let opts = args.analyze_options(&FileConfig::default());

        assert!(args.json());
        assert!(opts.verbose);
        assert_eq!(opts.unit, Some(Unit::Gb));
        assert_eq!(opts.aggregation, AggregationMode::Direct);
    }

    #[test]
    fn test_analyze_unit_values() {
        let cases = [
            ("kb", Unit::Kb),
            ("mb", Unit::Mb),
            ("gb", Unit::Gb),
            ("tb", Unit::Tb),
            ("bytes", Unit::Raw),
        ];

        for (input, expected) in cases {
            let args = analyze_args(&["disk-utility", "analyze", ".", "-u", input]);
            let opts = args.analyze_options(&FileConfig::default());
            assert_eq!(opts.unit, Some(expected));
        }
    }

    #[test]
    fn test_analyze_rejects_unknown_unit() {
        let result = Cli::try_parse_from(["disk-utility", "analyze", ".", "--unit", "pb"]);
        assert!(result.is_err());
    }

    #[test]
    fn test_analyze_requires_path() {
        assert!(Cli::try_parse_from(["disk-utility", "analyze"]).is_err());
    }

    #[test]
    fn test_config_values_used_when_cli_absent() {
        let args = analyze_args(&["disk-utility", "analyze", "."]);
        let config = FileConfig {
            analyze: FileAnalyzeConfig {
                unit: Some(Unit::Tb),
                aggregation: Some(AggregationMode::Direct),
                verbose: Some(true),
            },
            ..FileConfig::default()
        };

        let opts = args.analyze_options(&config);
        assert_eq!(opts.unit, Some(Unit::Tb));
        assert_eq!(opts.aggregation, AggregationMode::Direct);
        assert!(opts.verbose);
    }

    #[test]
    fn test_cli_overrides_config_values() {
        let args = analyze_args(&["disk-utility", "analyze", ".", "--unit", "kb"]);
        let config = FileConfig {
            analyze: FileAnalyzeConfig {
                unit: Some(Unit::Mb),
                ..FileAnalyzeConfig::default()
            },
            ..FileConfig::default()
        };

        assert_eq!(args.analyze_options(&config).unit, Some(Unit::Kb));
    }

    #[test]
    fn test_zip_destination_defaults_to_current_dir() {
        let args = zip_args(&["disk-utility", "zip", "src", "backup"]);
        assert_eq!(args.source(), &PathBuf::from("src"));
        assert_eq!(
            args.destination(&FileConfig::default()),
            PathBuf::from(".").join("backup")
        );
    }

    #[test]
    fn test_zip_destination_layering() {
        let config = FileConfig {
            archive: FileArchiveConfig {
                output_dir: Some(PathBuf::from("/config/archives")),
            },
            ..FileConfig::default()
        };

        let from_config = zip_args(&["disk-utility", "zip", "src", "backup"]);
        assert_eq!(
            from_config.destination(&config),
            PathBuf::from("/config/archives/backup")
        );

        let from_cli = zip_args(&["disk-utility", "zip", "src", "backup", "-o", "/cli/out"]);
        assert_eq!(
            from_cli.destination(&config),
            PathBuf::from("/cli/out/backup")
        );
    }

    #[test]
    fn test_unzip_destination() {
        let cli = Cli::parse_from(["disk-utility", "unzip", "a.zip"]);
        let Some(Commands::Unzip(args)) = cli.subcommand else {
            panic!("expected unzip subcommand");
        };
        assert_eq!(args.archive(), &PathBuf::from("a.zip"));
        assert_eq!(args.destination(), PathBuf::from("."));

        let cli = Cli::parse_from(["disk-utility", "unzip", "a.zip", "/tmp/out"]);
        let Some(Commands::Unzip(args)) = cli.subcommand else {
            panic!("expected unzip subcommand");
        };
        assert_eq!(args.destination(), PathBuf::from("/tmp/out"));
    }

    #[test]
    fn test_config_subcommands() {
        for (input, expected) in [("show", "show"), ("init", "init"), ("path", "path")] {
            let cli = Cli::parse_from(["disk-utility", "config", input]);
            let Some(Commands::Config { command }) = cli.subcommand else {
                panic!("expected config subcommand");
            };
            let name = match command {
                ConfigCommand::Show => "show",
                ConfigCommand::Init => "init",
                ConfigCommand::Path => "path",
            };
            assert_eq!(name, expected);
        }
    }
}
