//! Non-recursive scanning of the target directory.
//!
//! The scanner lists regular files directly inside the target directory.
//! Subdirectories, including category folders left by earlier runs, are
//! never entered, which is what makes repeated runs idempotent. Files the
//! ignore rules claim are dropped here, before classification.

use crate::filters::CompiledIgnore;
use std::fs;
use std::path::{Path, PathBuf};

/// A regular file found directly inside the target directory.
#[derive(Debug, Clone)]
pub struct ScannedFile {
    /// File name as it appears in the directory.
    pub name: String,
    /// Full path to the file.
    pub path: PathBuf,
    /// Lowercased extension without the dot; `None` when the name has no
    /// extension.
    pub extension: Option<String>,
}

/// Errors that can occur while scanning.
#[derive(Debug)]
pub enum ScanError {
    /// The target directory could not be listed.
    ReadDirFailed {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl std::fmt::Display for ScanError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ScanError::ReadDirFailed { path, source } => {
                write!(f, "Error reading directory {}: {}", path.display(), source)
            }
        }
    }
}

impl std::error::Error for ScanError {}

/// Lists the files to organize, sorted by name.
///
/// Only regular files directly inside `dir` are returned; subdirectories,
/// symlinks, and anything matching the ignore rules are left alone.
/// Individual entries that cannot be inspected are skipped, an unreadable
/// directory is an error. Sorting keeps previews and the action log in a
/// stable order regardless of how the platform enumerates the directory.
pub fn scan_directory(dir: &Path, rules: &CompiledIgnore) -> Result<Vec<ScannedFile>, ScanError> {
    let entries = fs::read_dir(dir).map_err(|e| ScanError::ReadDirFailed {
        path: dir.to_path_buf(),
        source: e,
    })?;

    let mut files = Vec::new();
    for entry in entries.flatten() {
        if let Ok(file_type) = entry.file_type()
            && file_type.is_file()
        {
            let path = entry.path();
            if rules.is_ignored(&path) {
                continue;
            }
            let name = entry.file_name().to_string_lossy().to_string();
            let extension = path
                .extension()
                .map(|ext| ext.to_string_lossy().to_lowercase());
            files.push(ScannedFile {
                name,
                path,
                extension,
            });
        }
    }

    files.sort_by(|a, b| a.name.cmp(&b.name));
    Ok(files)
}
