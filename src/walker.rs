//! Disk usage accounting.
//!
//! This module provides the traversal that measures every file and directory
//! beneath a root path. The walk is sequential and depth-first; each directory
//! is listed before its contents, and its total is only finalized once the
//! traversal has left its subtree.

use std::{
    fs,
    path::{Path, PathBuf},
};

use colored::Colorize;
use indicatif::{ProgressBar, ProgressStyle};
use thiserror::Error;
use walkdir::{DirEntry, WalkDir};

use crate::config::{AggregationMode, AnalyzeOptions};

/// Errors that stop an analysis before any traversal happens.
#[derive(Debug, Error)]
pub enum WalkError {
    /// The root path handed to the walker does not exist.
    #[error("path does not exist: {}", .0.display())]
    PathNotFound(PathBuf),
}

/// A path and the number of bytes accounted to it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SizeEntry {
    /// File or directory path, as produced by the traversal
    pub path: PathBuf,

    /// Size in bytes
    pub size: u64,
}

/// Result of one walk.
///
/// Both entry lists are in traversal order and contain each path once.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DiskUsage {
    /// The path the walk started from
    pub root: PathBuf,

    /// How directory sizes were aggregated
    pub aggregation: AggregationMode,

    /// One entry per directory visited, root included
    pub directories: Vec<SizeEntry>,

    /// One entry per file visited
    pub files: Vec<SizeEntry>,

    /// Problems met along the way (unreadable files or directories)
    pub diagnostics: Vec<String>,
}

impl DiskUsage {
    fn new(root: &Path, aggregation: AggregationMode) -> Self {
        Self {
            root: root.to_path_buf(),
            aggregation,
            directories: Vec::new(),
            files: Vec::new(),
            diagnostics: Vec::new(),
        }
    }

    /// Size recorded for the directory at `path`, if it was visited.
    #[must_use]
    pub fn directory_size(&self, path: &Path) -> Option<u64> {
        find_size(&self.directories, path)
    }

    /// Size recorded for the file at `path`, if it was visited.
    #[must_use]
    pub fn file_size(&self, path: &Path) -> Option<u64> {
        find_size(&self.files, path)
    }

    /// Total bytes of every file found under the root.
    #[must_use]
    pub fn total_size(&self) -> u64 {
        self.files.iter().map(|f| f.size).sum()
    }
}

fn find_size(entries: &[SizeEntry], path: &Path) -> Option<u64> {
    entries.iter().find(|e| e.path == path).map(|e| e.size)
}

/// A directory whose subtree is still being walked.
struct OpenDir {
    depth: usize,
    index: usize,
    total: u64,
}

/// Walks a directory tree and accounts the size of everything in it.
#[derive(Debug)]
pub struct Walker {
    /// Aggregation and reporting options
    options: AnalyzeOptions,

    /// When `true`, suppresses the progress spinner and diagnostic printing.
    quiet: bool,
}

impl Walker {
    /// Create a new walker with the specified options.
    ///
    /// # Examples
    ///
    /// ```
    /// # use disk_utility::{config::AnalyzeOptions, walker::Walker};
    /// let walker = Walker::new(AnalyzeOptions::default()).with_quiet(true);
    /// ```
    #[must_use]
    pub const fn new(options: AnalyzeOptions) -> Self {
        Self {
            options,
            quiet: false,
        }
    }

    /// Enable or disable quiet mode.
    ///
    /// Quiet mode hides the spinner and skips printing diagnostics, which is
    /// required for `--json` output so that only the final JSON is printed.
    /// Diagnostics are still collected on the returned [`DiskUsage`].
    #[must_use]
    pub const fn with_quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    /// Walk `root` and measure every directory and file beneath it.
    ///
    /// Files whose size cannot be read are recorded with size 0, and
    /// directories that cannot be listed contribute nothing from their
    /// contents. Each of these adds one line to [`DiskUsage::diagnostics`];
    /// neither stops the walk.
    ///
    /// Symlinks are not followed. A symlink to a file counts as a file with
    /// its target's size, a symlink to a directory is skipped, and a broken
    /// symlink is an unreadable file.
    ///
    /// # Errors
    ///
    /// Returns [`WalkError::PathNotFound`] if `root` does not exist.
    pub fn walk(&self, root: &Path) -> Result<DiskUsage, WalkError> {
        if !root.exists() {
            return Err(WalkError::PathNotFound(root.to_path_buf()));
        }

        let progress = self.progress_bar();
        let mut usage = DiskUsage::new(root, self.options.aggregation);
        let mut open: Vec<OpenDir> = Vec::new();

        for entry in WalkDir::new(root).sort_by_file_name() {
            let entry = match entry {
                Ok(entry) => entry,
                Err(err) => {
                    let path = err
                        .path()
                        .map_or_else(|| root.display().to_string(), |p| p.display().to_string());
                    usage
                        .diagnostics
                        .push(format!("Could not read directory: {path} ({err})"));
                    continue;
                }
            };

            self.close_finished(&mut open, &mut usage, entry.depth());

            if entry.file_type().is_dir() {
                open.push(OpenDir {
                    depth: entry.depth(),
                    index: usage.directories.len(),
                    total: 0,
                });
                usage.directories.push(SizeEntry {
                    path: entry.into_path(),
                    size: 0,
                });
                continue;
            }

            let Some(size) = Self::file_size(&entry, &mut usage.diagnostics) else {
                continue;
            };

            if let Some(parent) = open.last_mut() {
                parent.total += size;
            }
            usage.files.push(SizeEntry {
                path: entry.into_path(),
                size,
            });

            progress.set_message(format!("Analyzing... {} files", usage.files.len()));
        }

        self.close_finished(&mut open, &mut usage, 0);

        progress.finish_with_message("✅ Analysis complete");

        if self.options.verbose && !self.quiet {
            for diagnostic in &usage.diagnostics {
                eprintln!("{}", diagnostic.red());
            }
        }

        Ok(usage)
    }

    /// Finalize every open directory at `depth` or deeper.
    ///
    /// In recursive mode a finished directory's total is added to its parent.
    fn close_finished(&self, open: &mut Vec<OpenDir>, usage: &mut DiskUsage, depth: usize) {
        while let Some(done) = open.pop_if(|dir| dir.depth >= depth) {
            usage.directories[done.index].size = done.total;

            if self.options.aggregation == AggregationMode::Recursive
                && let Some(parent) = open.last_mut()
            {
                parent.total += done.total;
            }
        }
    }

    /// Size of a non-directory entry.
    ///
    /// Returns `None` for symlinks that resolve to a directory, and `Some(0)`
    /// (with a diagnostic) when the size cannot be read.
    fn file_size(entry: &DirEntry, diagnostics: &mut Vec<String>) -> Option<u64> {
        match fs::metadata(entry.path()) {
            Ok(metadata) if metadata.is_dir() => None,
            Ok(metadata) => Some(metadata.len()),
            Err(err) => {
                diagnostics.push(format!(
                    "Could not access file: {} ({err})",
                    entry.path().display()
                ));
                Some(0)
            }
        }
    }

    fn progress_bar(&self) -> ProgressBar {
        if self.quiet {
            return ProgressBar::hidden();
        }

        let pb = ProgressBar::new_spinner();
        pb.set_style(
            ProgressStyle::default_spinner()
                .template("{spinner:.green} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        pb.set_message("Analyzing...");
        pb.enable_steady_tick(std::time::Duration::from_millis(100));
        pb
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn quiet_walker(aggregation: AggregationMode) -> Walker {
        Walker::new(AnalyzeOptions {
            aggregation,
            ..AnalyzeOptions::default()
        })
        .with_quiet(true)
    }

    /// Helper to create a file of `len` bytes, ensuring parent dirs exist.
    fn create_file(path: &Path, len: usize) {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, vec![b'x'; len]).unwrap();
    }

    #[test]
    fn test_missing_root_is_path_not_found() {
        let temp_dir = TempDir::new().unwrap();
        let missing = temp_dir.path().join("does-not-exist");

        let err = quiet_walker(AggregationMode::Recursive)
            .walk(&missing)
            .unwrap_err();

        assert!(matches!(err, WalkError::PathNotFound(ref p) if p == &missing));
        assert!(err.to_string().contains("path does not exist"));
    }

    #[test]
    fn test_empty_directory_has_zero_size() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();

        let usage = quiet_walker(AggregationMode::Recursive).walk(root).unwrap();

        assert_eq!(usage.directories.len(), 1);
        assert_eq!(usage.directory_size(root), Some(0));
        assert!(usage.files.is_empty());
        assert!(usage.diagnostics.is_empty());
    }

    #[test]
    fn test_single_file_size_is_exact() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("data.bin");
        create_file(&file, 12_345);

        let usage = quiet_walker(AggregationMode::Recursive)
            .walk(temp_dir.path())
            .unwrap();

        assert_eq!(usage.file_size(&file), Some(12_345));
        assert_eq!(usage.directory_size(temp_dir.path()), Some(12_345));
    }

    #[test]
    fn test_recursive_sizes_include_subdirectories() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        create_file(&root.join("top.txt"), 10);
        create_file(&root.join("a").join("one.txt"), 20);
        create_file(&root.join("a").join("b").join("two.txt"), 30);
        create_file(&root.join("c").join("three.txt"), 40);

        let usage = quiet_walker(AggregationMode::Recursive).walk(root).unwrap();

        assert_eq!(usage.directory_size(root), Some(100));
        assert_eq!(usage.directory_size(&root.join("a")), Some(50));
        assert_eq!(usage.directory_size(&root.join("a").join("b")), Some(30));
        assert_eq!(usage.directory_size(&root.join("c")), Some(40));
        assert_eq!(usage.total_size(), 100);
    }

    #[test]
    fn test_direct_sizes_exclude_subdirectories() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        create_file(&root.join("top.txt"), 10);
        create_file(&root.join("a").join("one.txt"), 20);
        create_file(&root.join("a").join("b").join("two.txt"), 30);

        let usage = quiet_walker(AggregationMode::Direct).walk(root).unwrap();

        assert_eq!(usage.aggregation, AggregationMode::Direct);
        assert_eq!(usage.directory_size(root), Some(10));
        assert_eq!(usage.directory_size(&root.join("a")), Some(20));
        assert_eq!(usage.directory_size(&root.join("a").join("b")), Some(30));
        assert_eq!(usage.total_size(), 60);
    }

    #[test]
    fn test_parent_listed_before_children() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        create_file(&root.join("a").join("b").join("f.txt"), 1);

        let usage = quiet_walker(AggregationMode::Recursive).walk(root).unwrap();
        let order: Vec<_> = usage.directories.iter().map(|d| d.path.clone()).collect();

        assert_eq!(
            order,
            vec![root.to_path_buf(), root.join("a"), root.join("a").join("b")]
        );
    }

    #[test]
    fn test_sibling_directories_do_not_leak_into_each_other() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        create_file(&root.join("a").join("deep").join("f.txt"), 7);
        create_file(&root.join("b").join("g.txt"), 3);

        let usage = quiet_walker(AggregationMode::Recursive).walk(root).unwrap();

        assert_eq!(usage.directory_size(&root.join("a")), Some(7));
        assert_eq!(usage.directory_size(&root.join("a").join("deep")), Some(7));
        assert_eq!(usage.directory_size(&root.join("b")), Some(3));
        assert_eq!(usage.directory_size(root), Some(10));
    }

    #[test]
    fn test_root_may_be_a_file() {
        let temp_dir = TempDir::new().unwrap();
        let file = temp_dir.path().join("lonely.txt");
        create_file(&file, 64);

        let usage = quiet_walker(AggregationMode::Recursive).walk(&file).unwrap();

        assert!(usage.directories.is_empty());
        assert_eq!(usage.files.len(), 1);
        assert_eq!(usage.file_size(&file), Some(64));
    }

    #[test]
    fn test_walk_is_idempotent() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        create_file(&root.join("x").join("1.txt"), 11);
        create_file(&root.join("y").join("2.txt"), 22);
        create_file(&root.join("3.txt"), 33);

        let walker = quiet_walker(AggregationMode::Recursive);
        let first = walker.walk(root).unwrap();
        let second = walker.walk(root).unwrap();

        assert_eq!(first, second);
    }

    #[cfg(unix)]
    #[test]
    fn test_broken_symlink_is_recorded_as_zero_with_one_diagnostic() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        create_file(&root.join("good.txt"), 100);
        let bad = root.join("bad.txt");
        std::os::unix::fs::symlink(root.join("missing-target"), &bad).unwrap();

        let usage = quiet_walker(AggregationMode::Recursive).walk(root).unwrap();

        assert_eq!(usage.file_size(&bad), Some(0));
        assert_eq!(usage.directory_size(root), Some(100));
        assert_eq!(usage.diagnostics.len(), 1);
        assert!(usage.diagnostics[0].contains("bad.txt"));
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_to_directory_is_not_descended() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        create_file(&root.join("real").join("f.txt"), 5);
        std::os::unix::fs::symlink(root.join("real"), root.join("alias")).unwrap();

        let usage = quiet_walker(AggregationMode::Recursive).walk(root).unwrap();

        assert_eq!(usage.directory_size(root), Some(5));
        assert!(usage.directory_size(&root.join("alias")).is_none());
        assert!(usage.file_size(&root.join("alias")).is_none());
        assert_eq!(usage.files.len(), 1);
    }

    #[cfg(unix)]
    #[test]
    fn test_symlink_to_file_counts_target_size() {
        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        create_file(&root.join("target.bin"), 40);
        std::os::unix::fs::symlink(root.join("target.bin"), root.join("link.bin")).unwrap();

        let usage = quiet_walker(AggregationMode::Recursive).walk(root).unwrap();

        assert_eq!(usage.file_size(&root.join("link.bin")), Some(40));
        assert_eq!(usage.directory_size(root), Some(80));
    }

    #[cfg(unix)]
    #[test]
    fn test_unlistable_directory_is_zero_with_one_diagnostic() {
        use std::os::unix::fs::PermissionsExt;

        let temp_dir = TempDir::new().unwrap();
        let root = temp_dir.path();
        let locked = root.join("locked");
        create_file(&locked.join("hidden.txt"), 300);
        create_file(&root.join("open").join("seen.txt"), 20);
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o000)).unwrap();

        // Running as root ignores directory permissions.
        if fs::read_dir(&locked).is_ok() {
            fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();
            return;
        }

        let usage = quiet_walker(AggregationMode::Recursive).walk(root).unwrap();
        fs::set_permissions(&locked, fs::Permissions::from_mode(0o755)).unwrap();

        assert_eq!(usage.directory_size(&locked), Some(0));
        assert_eq!(usage.directory_size(&root.join("open")), Some(20));
        assert_eq!(usage.directory_size(root), Some(20));
        assert_eq!(usage.diagnostics.len(), 1);
        assert!(usage.diagnostics[0].starts_with("Could not read directory"));
        assert!(usage.diagnostics[0].contains("locked"));
    }
}
