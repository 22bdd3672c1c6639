//! Zip archive creation and extraction.
//!
//! Directories are archived with their contents stored relative to the
//! directory itself, so extracting the archive recreates the contents rather
//! than the enclosing folder. Single files are stored under their base name.

use std::{
    ffi::OsString,
    fs::{self, File},
    io,
    path::{Path, PathBuf},
};

use anyhow::{Result, anyhow, bail};
use walkdir::WalkDir;
use zip::{CompressionMethod, ZipArchive, ZipWriter, write::SimpleFileOptions};

/// Extension appended to archives created by [`create_archive`].
pub const ARCHIVE_EXTENSION: &str = "zip";

/// Compress `source` into `<dest_without_ext>.zip`.
///
/// Returns the path of the written archive.
///
/// # Errors
///
/// Returns an error if:
/// - `source` is neither an existing file nor an existing directory
/// - The archive file cannot be created (e.g. its parent directory is missing)
/// - Any file under `source` cannot be read while archiving
///
/// No archive is left at the destination when an error is returned.
pub fn create_archive(source: &Path, dest_without_ext: &Path) -> Result<PathBuf> {
    let dest = archive_path(dest_without_ext);

    if !source.is_dir() && !source.is_file() {
        bail!(
            "The path provided does not exist or is not valid: {}",
            source.display()
        );
    }

    if let Err(e) = write_archive(source, &dest) {
        let _ = fs::remove_file(&dest);
        return Err(e);
    }

    Ok(dest)
}

/// Write the archive for `source` to `dest`, which may be left partial on error.
fn write_archive(source: &Path, dest: &Path) -> Result<()> {
    let file = File::create(dest)
        .map_err(|e| anyhow!("Failed to create archive {}: {e}", dest.display()))?;
    let mut writer = ZipWriter::new(file);
    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

    if source.is_dir() {
        add_directory_contents(&mut writer, source, dest, options)?;
    } else {
        let name = source
            .file_name()
            .ok_or_else(|| {
                anyhow!(
                    "Cannot archive a path without a file name: {}",
                    source.display()
                )
            })?
            .to_string_lossy()
            .into_owned();
        add_file(&mut writer, source, name, options)?;
    }

    writer
        .finish()
        .map_err(|e| anyhow!("Failed to finish archive {}: {e}", dest.display()))?;

    Ok(())
}

/// Extract the zip archive at `archive` into `dest_dir`.
///
/// The destination directory is created if it does not exist.
///
/// # Errors
///
/// Returns an error if:
/// - `archive` is not an existing file with a `.zip` extension
/// - The destination cannot be created
/// - The archive is corrupt or contains entries with unsafe paths
pub fn extract_archive(archive: &Path, dest_dir: &Path) -> Result<()> {
    if !is_zip_file(archive) {
        bail!(
            "The specified path does not point to a zip file: {}",
            archive.display()
        );
    }

    fs::create_dir_all(dest_dir).map_err(|e| {
        anyhow!(
            "Failed to create destination directory {}: {e}",
            dest_dir.display()
        )
    })?;

    let file = File::open(archive)
        .map_err(|e| anyhow!("Failed to open archive {}: {e}", archive.display()))?;
    let mut zip = ZipArchive::new(file)
        .map_err(|e| anyhow!("Failed to read zip archive {}: {e}", archive.display()))?;

    zip.extract(dest_dir)
        .map_err(|e| anyhow!("Failed to extract {}: {e}", archive.display()))?;

    Ok(())
}

/// Whether `path` is an existing file ending in `.zip` (case-insensitive).
#[must_use]
pub fn is_zip_file(path: &Path) -> bool {
    path.is_file()
        && path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case(ARCHIVE_EXTENSION))
}

/// `dest_without_ext` with `.zip` appended, keeping any dots already in the name.
fn archive_path(dest_without_ext: &Path) -> PathBuf {
    let mut name = OsString::from(dest_without_ext.as_os_str());
    name.push(".");
    name.push(ARCHIVE_EXTENSION);
    PathBuf::from(name)
}

fn add_directory_contents(
    writer: &mut ZipWriter<File>,
    root: &Path,
    dest: &Path,
    options: SimpleFileOptions,
) -> Result<()> {
    // The archive may be written inside the directory being archived.
    let dest = fs::canonicalize(dest).ok();

    for entry in WalkDir::new(root).min_depth(1).sort_by_file_name() {
        let entry = entry.map_err(|e| anyhow!("Failed to read {}: {e}", root.display()))?;
        let name = entry_name(root, entry.path())?;

        // Links to directories are stored as empty directories, never followed.
        let is_dir = entry.file_type().is_dir()
            || (entry.path_is_symlink()
                && fs::metadata(entry.path()).is_ok_and(|m| m.is_dir()));

        if is_dir {
            writer
                .add_directory(name, options)
                .map_err(|e| anyhow!("Failed to add {}: {e}", entry.path().display()))?;
            continue;
        }

        if dest.is_some() && fs::canonicalize(entry.path()).ok() == dest {
            continue;
        }

        add_file(writer, entry.path(), name, options)?;
    }

    Ok(())
}

fn add_file(
    writer: &mut ZipWriter<File>,
    path: &Path,
    name: String,
    options: SimpleFileOptions,
) -> Result<()> {
    let mut input =
        File::open(path).map_err(|e| anyhow!("Failed to open {}: {e}", path.display()))?;

    writer
        .start_file(name, options)
        .map_err(|e| anyhow!("Failed to add {}: {e}", path.display()))?;
    io::copy(&mut input, writer)
        .map_err(|e| anyhow!("Failed to compress {}: {e}", path.display()))?;

    Ok(())
}

/// Archive entry name for `path`: relative to `root`, `/`-separated.
fn entry_name(root: &Path, path: &Path) -> Result<String> {
    let relative = path
        .strip_prefix(root)
        .map_err(|_| anyhow!("{} is not under {}", path.display(), root.display()))?;

    Ok(relative
        .components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/"))
}
