//! # disk-utility
//!
//! A small CLI tool to see where disk space goes, and to zip or unzip files
//! and directories.
//!
//! ## Features
//!
//! - Per-directory and per-file disk usage in KB, MB, GB or TB (base 1024)
//! - Recursive or direct-only directory totals
//! - Zip creation from a file or directory, and zip extraction
//! - Interactive menu when started without a subcommand
//! - JSON output for scripting
//! - Persistent configuration via `~/.config/disk-utility/config.toml`
//!
//! ## Usage
//!
//! ```bash
//! # Interactive menu
//! disk-utility
//!
//! # Analyze a directory, sizes in MB
//! disk-utility analyze ~/Documents --unit mb
//!
//! # Zip a directory into ./backup.zip, then extract it
//! disk-utility zip ~/Documents backup
//! disk-utility unzip backup.zip restored
//! ```

mod cli;
mod menu;

use std::path::Path;
use std::process::exit;

use anyhow::{Ok, Result, bail};
use clap::Parser;
use cli::{AnalyzeArgs, Cli, Commands, ConfigCommand, UnzipArgs, ZipArgs};
use colored::Colorize;
use disk_utility::{
    archive,
    config::{AggregationMode, AnalyzeOptions, FileConfig},
    output::{JsonReport, render_diagnostics, render_report},
    utils::Unit,
    walker::Walker,
};

/// Entry point for the disk-utility application.
///
/// This function handles all errors gracefully by calling [`inner_main`] and printing
/// any errors to stderr before exiting with a non-zero status code.
fn main() {
    if let Err(err) = inner_main() {
        eprintln!("Error: {err}");

        exit(1);
    }
}

/// Main application logic that can return errors.
///
/// Dispatches to the requested subcommand, or to the interactive menu when
/// none is given.
///
/// # Errors
///
/// Returns errors from a missing analysis root, archive operations, terminal
/// prompts, config file handling, or JSON serialization.
fn inner_main() -> Result<()> {
    let args = Cli::parse();

    match &args.subcommand {
        Some(Commands::Config { command }) => handle_config_command(command),
        Some(Commands::Analyze(analyze)) => run_analyze(analyze),
        Some(Commands::Zip(zip)) => run_zip(zip),
        Some(Commands::Unzip(unzip)) => run_unzip(unzip),
        None => {
            let file_config = load_config(false);
            let options = menu_analyze_options(&file_config);
            menu::run(&file_config, &options)
        }
    }
}

// ── Subcommands ─────────────────────────────────────────────────────────

fn run_analyze(args: &AnalyzeArgs) -> Result<()> {
    let json_mode = args.json();
    let file_config = load_config(json_mode);
    let options = args.analyze_options(&file_config);

    run_analysis(args.path(), &options, json_mode)
}

fn run_zip(args: &ZipArgs) -> Result<()> {
    let file_config = load_config(false);
    let archive = archive::create_archive(args.source(), &args.destination(&file_config))?;

    println!(
        "Your file / directory is zipped as {}",
        archive.display().to_string().green()
    );
    Ok(())
}

fn run_unzip(args: &UnzipArgs) -> Result<()> {
    let destination = args.destination();
    archive::extract_archive(args.archive(), &destination)?;

    println!(
        "Files have been extracted to {}",
        destination.display().to_string().green()
    );
    Ok(())
}

/// Walk `path` and print the report.
///
/// The unit comes from `options`; when it is unset the user is asked for one,
/// except in JSON mode where KB is used.
///
/// # Errors
///
/// Returns an error if `path` does not exist (before anything is printed),
/// if the unit prompt fails, or if JSON serialization fails.
fn run_analysis(path: &Path, options: &AnalyzeOptions, json_mode: bool) -> Result<()> {
    let walker = Walker::new(options.clone()).with_quiet(json_mode);
    let usage = walker.walk(path)?;

    let unit = match options.unit {
        Some(unit) => unit,
        None if json_mode => Unit::default(),
        None => menu::prompt_unit()?,
    };

    if json_mode {
        let report = JsonReport::from_usage(&usage, unit);
        println!("{}", serde_json::to_string_pretty(&report)?);
        return Ok(());
    }

    print!("{}", render_report(&usage, unit));

    // With --verbose the walker already printed them.
    if !options.verbose && !usage.diagnostics.is_empty() {
        eprint!("{}", render_diagnostics(&usage.diagnostics).yellow());
    }

    Ok(())
}

/// Analysis options for the menu, taken from the config file alone.
fn menu_analyze_options(config: &FileConfig) -> AnalyzeOptions {
    AnalyzeOptions {
        verbose: config.analyze.verbose.unwrap_or(false),
        unit: config.analyze.unit,
        aggregation: config.analyze.aggregation.unwrap_or_default(),
    }
}

// ── Config subcommand ────────────────────────────────────────────────

/// Default config file template written by `config init`.
const CONFIG_TEMPLATE: &str = r#"# disk-utility configuration
# All values shown are their defaults. Uncomment and change as needed.

[analyze]
# Unit to print sizes in: kb, mb, gb, tb, bytes
# (when unset, you are asked after each analysis)
# unit = "kb"

# Directory totals: "recursive" (everything beneath) or "direct" (own files only)
# aggregation = "recursive"

# List every file or directory that could not be read
# verbose = false

[archive]
# Directory new archives are written to when none is given
# (defaults to the current directory)
# output_dir = "~/Archives"
"#;

/// Dispatch a `config` subcommand.
fn handle_config_command(cmd: &ConfigCommand) -> Result<()> {
    match cmd {
        ConfigCommand::Path => match FileConfig::config_path() {
            Some(path) => println!("{}", path.display()),
            None => bail!("Could not determine the config directory on this platform"),
        },
        ConfigCommand::Show => show_config()?,
        ConfigCommand::Init => init_config()?,
    }
    Ok(())
}

/// Print the effective configuration (file values merged with defaults).
fn show_config() -> Result<()> {
    let path = FileConfig::config_path();

    let (file_exists, config) = match &path {
        Some(p) if p.exists() => (true, FileConfig::load()?),
        _ => (false, FileConfig::default()),
    };

    match &path {
        Some(p) if file_exists => println!("Config file: {} (found)", p.display()),
        Some(p) => println!(
            "Config file: {} (not found - showing defaults)",
            p.display()
        ),
        None => println!("Config file: (cannot determine path on this platform)"),
    }

    println!();
    println!("{}", format_config(&config));
    Ok(())
}

/// Format a [`FileConfig`] as a human-readable table, showing defaults for `None` fields.
fn format_config(config: &FileConfig) -> String {
    let unit = config.analyze.unit.map_or_else(
        || "(ask)  (default)".to_string(),
        |u| format!("\"{}\"", u.label()),
    );
    let aggregation = match config.analyze.aggregation {
        None => "\"recursive\"  (default)".to_string(),
        Some(AggregationMode::Recursive) => "\"recursive\"".to_string(),
        Some(AggregationMode::Direct) => "\"direct\"".to_string(),
    };
    let verbose = config
        .analyze
        .verbose
        .map_or_else(|| "false  (default)".to_string(), |v| v.to_string());
    let output_dir = config.archive.output_dir.as_ref().map_or_else(
        || "\".\"  (default)".to_string(),
        |p| format!("\"{}\"", p.display()),
    );

    format!(
        "\
[analyze]
unit        = {unit}
aggregation = {aggregation}
verbose     = {verbose}

[archive]
output_dir  = {output_dir}"
    )
}

/// Write a default config template to the config file path if it does not exist yet.
fn init_config() -> Result<()> {
    let Some(path) = FileConfig::config_path() else {
        bail!("Could not determine the config directory on this platform");
    };

    if path.exists() {
        println!("Config file already exists at: {}", path.display());
        println!("Remove it first if you want to regenerate it.");
        return Ok(());
    }

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            anyhow::anyhow!(
                "Failed to create config directory {}: {e}",
                parent.display()
            )
        })?;
    }

    std::fs::write(&path, CONFIG_TEMPLATE)
        .map_err(|e| anyhow::anyhow!("Failed to write config file {}: {e}", path.display()))?;

    println!("Config file written to: {}", path.display());
    Ok(())
}

/// Load the configuration file, falling back to defaults on failure.
fn load_config(json_mode: bool) -> FileConfig {
    match FileConfig::load() {
        std::result::Result::Ok(config) => config,
        Err(e) => {
            if !json_mode {
                eprintln!("{} {e}", "Warning: Failed to load config file:".yellow());
            }
            FileConfig::default()
        }
    }
}
