//! Interactive menu.
//!
//! Running `disk-utility` without a subcommand lands here: a loop offering
//! zip, unzip, analyze and exit until the user leaves. A failed operation is
//! reported and the menu is shown again.

use std::{
    fmt,
    path::{Path, PathBuf},
};

use anyhow::Result;
use colored::Colorize;
use inquire::{InquireError, Select, Text};

use disk_utility::{
    archive,
    config::{AnalyzeOptions, FileConfig},
    utils::{Unit, parse_unit_choice},
};

/// Entries of the main menu, in display order.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
enum MenuChoice {
    Zip,
    Unzip,
    Analyze,
    Exit,
}

impl MenuChoice {
    const ALL: [Self; 4] = [Self::Zip, Self::Unzip, Self::Analyze, Self::Exit];
}

impl fmt::Display for MenuChoice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Zip => "A. Zip Directories / Files",
            Self::Unzip => "B. Unzip Files",
            Self::Analyze => "C. Analyze Disk Space",
            Self::Exit => "D. Exit",
        };
        f.write_str(label)
    }
}

/// Run the menu loop until the user picks "Exit" or cancels the main prompt.
///
/// # Errors
///
/// Returns an error only if the terminal cannot be used for prompting.
pub fn run(config: &FileConfig, options: &AnalyzeOptions) -> Result<()> {
    loop {
        let choice = match Select::new(
            "Welcome to Disk Utility! What do you want to perform?",
            MenuChoice::ALL.to_vec(),
        )
        .prompt()
        {
            Ok(choice) => choice,
            Err(InquireError::OperationCanceled | InquireError::OperationInterrupted) => {
                return Ok(());
            }
            Err(e) => return Err(e.into()),
        };

        let outcome = match choice {
            MenuChoice::Zip => zip_flow(config),
            MenuChoice::Unzip => unzip_flow(),
            MenuChoice::Analyze => analyze_flow(options),
            MenuChoice::Exit => {
                println!(
                    "{}",
                    "Thank you for using the Disk Utility Tool!\nExiting the program......"
                        .green()
                );
                return Ok(());
            }
        };

        if let Err(e) = outcome {
            eprintln!("{} {e}", "An error occurred:".red());
        }
        println!();
    }
}

/// Ask for a unit selector until a valid one is entered.
///
/// # Errors
///
/// Returns an error if the prompt is canceled or the terminal fails.
pub fn prompt_unit() -> Result<Unit> {
    loop {
        let input = Text::new("Please choose the conversion unit:")
            .with_help_message("'a' for KB, 'b' for MB, 'c' for GB, 'd' for TB")
            .prompt()?;

        match parse_unit_choice(&input) {
            Ok(unit) => return Ok(unit),
            Err(e) => eprintln!("{}", e.to_string().yellow()),
        }
    }
}

fn zip_flow(config: &FileConfig) -> Result<()> {
    let source = Text::new("Please enter the path of your desired directory or file to zip:")
        .prompt()?;
    let name = Text::new("Enter the name for the output zip file (without extension):")
        .prompt()?;
    let output_dir = Text::new("Enter the directory where you want to save the zip file:")
        .with_help_message("leave blank for the configured default or the current directory")
        .prompt()?;

    let output_dir = non_blank(&output_dir)
        .or_else(|| config.archive_output_dir())
        .unwrap_or_else(|| PathBuf::from("."));

    let archive = archive::create_archive(Path::new(source.trim()), &output_dir.join(name.trim()))?;
    println!(
        "Your file / directory is zipped as {}",
        archive.display().to_string().green()
    );
    Ok(())
}

fn unzip_flow() -> Result<()> {
    let archive_path = Text::new("Please enter the path of the zip file to unpack:").prompt()?;
    let archive_path = Path::new(archive_path.trim());

    if !archive::is_zip_file(archive_path) {
        eprintln!(
            "{}",
            "The specified path does not point to a zip file.".yellow()
        );
        return Ok(());
    }

    let destination = Text::new("Enter the destination directory:")
        .with_help_message("leave blank to extract in the current directory")
        .prompt()?;
    let destination = non_blank(&destination).unwrap_or_else(|| PathBuf::from("."));

    archive::extract_archive(archive_path, &destination)?;
    println!(
        "Files have been extracted to {}",
        destination.display().to_string().green()
    );
    Ok(())
}

fn analyze_flow(options: &AnalyzeOptions) -> Result<()> {
    let path = Text::new("Please enter the path of your desired directory to analyze:").prompt()?;
    crate::run_analysis(Path::new(path.trim()), options, false)
}

/// `None` for blank input, otherwise the trimmed input as a path.
fn non_blank(input: &str) -> Option<PathBuf> {
    let trimmed = input.trim();
    (!trimmed.is_empty()).then(|| PathBuf::from(trimmed))
}
