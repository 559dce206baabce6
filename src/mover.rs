//! Moving files into category folders.
//!
//! The mover creates category directories on demand and never overwrites: a
//! name collision at the destination is resolved by probing `name (1).ext`,
//! `name (2).ext`, and so on until a free name is found. Planning and
//! executing are separate entry points so dry-run can show exact
//! destinations, rename suffixes included, without touching the filesystem.

use std::fs;
use std::path::{Path, PathBuf};

/// A move the organizer performed or, in dry-run, would perform.
#[derive(Debug, Clone)]
pub struct MoveRecord {
    /// Where the file was before the move.
    pub source: PathBuf,
    /// Where the file ended up (or would end up).
    pub destination: PathBuf,
    /// The category folder it was filed under.
    pub category: String,
    /// True when a collision forced a numeric-suffix rename.
    pub renamed: bool,
}

impl MoveRecord {
    /// The destination file name, for log lines about renames.
    pub fn destination_name(&self) -> String {
        self.destination
            .file_name()
            .map(|n| n.to_string_lossy().to_string())
            .unwrap_or_default()
    }
}

/// Errors that can occur while creating folders or moving files.
#[derive(Debug)]
pub enum MoveError {
    /// The target directory is missing or not usable as a base.
    InvalidBasePath {
        path: PathBuf,
        source: std::io::Error,
    },
    /// A category directory could not be created.
    DirectoryCreationFailed {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The rename itself failed.
    FileMoveFailed {
        from: PathBuf,
        to: PathBuf,
        source: std::io::Error,
    },
    /// The source path has no file-name component.
    MissingFileName { path: PathBuf },
}

impl std::fmt::Display for MoveError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MoveError::InvalidBasePath { path, source } => {
                write!(f, "Invalid base path {}: {}", path.display(), source)
            }
            MoveError::DirectoryCreationFailed { path, source } => {
                write!(
                    f,
                    "Failed to create directory {}: {}",
                    path.display(),
                    source
                )
            }
            MoveError::FileMoveFailed { from, to, source } => {
                write!(
                    f,
                    "Failed to move {} to {}: {}",
                    from.display(),
                    to.display(),
                    source
                )
            }
            MoveError::MissingFileName { path } => {
                write!(f, "Path has no file name component: {}", path.display())
            }
        }
    }
}

impl std::error::Error for MoveError {}

/// Result type for mover operations.
pub type MoveResult<T> = Result<T, MoveError>;

/// Files files into category subdirectories of a base directory.
pub struct Mover;

impl Mover {
    /// Computes where a file would go, without touching the filesystem.
    ///
    /// The destination already accounts for collisions: if
    /// `<base>/<category>/<name>` is taken, the returned record carries the
    /// first free `name (N).ext` variant and `renamed` is set. This is the
    /// dry-run path.
    pub fn plan_move(
        base_path: &Path,
        file_path: &Path,
        category: &str,
    ) -> MoveResult<MoveRecord> {
        let file_name = file_path
            .file_name()
            .ok_or_else(|| MoveError::MissingFileName {
                path: file_path.to_path_buf(),
            })?;

        let desired = base_path.join(category).join(file_name);
        let destination = Self::available_name(&desired);
        let renamed = destination != desired;

        Ok(MoveRecord {
            source: file_path.to_path_buf(),
            destination,
            category: category.to_string(),
            renamed,
        })
    }

    /// Moves a file into its category folder, creating the folder on demand.
    ///
    /// The returned record says where the file went and whether a collision
    /// forced a rename.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use std::path::Path;
    /// use tidybot::mover::Mover;
    ///
    /// let record = Mover::move_to_category(
    ///     Path::new("/home/user/Downloads"),
    ///     Path::new("/home/user/Downloads/report.pdf"),
    ///     "Documents",
    /// )?;
    /// println!("now at {}", record.destination.display());
    /// # Ok::<(), tidybot::mover::MoveError>(())
    /// ```
    pub fn move_to_category(
        base_path: &Path,
        file_path: &Path,
        category: &str,
    ) -> MoveResult<MoveRecord> {
        if !base_path.exists() {
            return Err(MoveError::InvalidBasePath {
                path: base_path.to_path_buf(),
                source: std::io::Error::new(
                    std::io::ErrorKind::NotFound,
                    "base path does not exist",
                ),
            });
        }

        let category_path = base_path.join(category);
        fs::create_dir_all(&category_path).map_err(|e| MoveError::DirectoryCreationFailed {
            path: category_path.clone(),
            source: e,
        })?;

        let record = Self::plan_move(base_path, file_path, category)?;
        fs::rename(&record.source, &record.destination).map_err(|e| MoveError::FileMoveFailed {
            from: record.source.clone(),
            to: record.destination.clone(),
            source: e,
        })?;

        Ok(record)
    }

    /// Creates every listed category folder under `base_path`, returning the
    /// names that were actually created (existing folders are left alone).
    /// Used by the first-run setup.
    pub fn create_category_folders<'a, I>(base_path: &Path, names: I) -> MoveResult<Vec<String>>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut created = Vec::new();
        for name in names {
            let path = base_path.join(name);
            if path.exists() {
                continue;
            }
            fs::create_dir_all(&path).map_err(|e| MoveError::DirectoryCreationFailed {
                path: path.clone(),
                source: e,
            })?;
            created.push(name.to_string());
        }
        Ok(created)
    }

    /// Finds a destination name that is not already taken.
    ///
    /// If `desired` is free it is returned unchanged; otherwise the search
    /// appends ` (1)`, ` (2)`, and so on to the stem, preserving the
    /// extension: `report.pdf` → `report (1).pdf`, `README` → `README (1)`,
    /// `a.tar.gz` → `a.tar (1).gz`.
    pub fn available_name(desired: &Path) -> PathBuf {
        if !desired.exists() {
            return desired.to_path_buf();
        }

        let stem = desired
            .file_stem()
            .map(|s| s.to_string_lossy().to_string())
            .unwrap_or_default();
        let extension = desired.extension().map(|e| e.to_string_lossy().to_string());
        let parent = desired.parent().unwrap_or_else(|| Path::new(""));

        let mut counter = 1usize;
        loop {
            let candidate_name = match &extension {
                Some(ext) => format!("{} ({}).{}", stem, counter, ext),
                None => format!("{} ({})", stem, counter),
            };
            let candidate = parent.join(candidate_name);
            if !candidate.exists() {
                return candidate;
            }
            counter += 1;
        }
    }
}
