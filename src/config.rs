//! TidyBot configuration: the category map and where it lives on disk.
//!
//! The configuration is a single JSON file (`config.json`) holding the
//! downloads path, the category→extensions table, and a first-run marker.
//! Loading is self-healing: a missing file is created from defaults and a
//! malformed file is backed up and regenerated, so a broken config never
//! prevents a run.
//!
//! # Configuration File Format
//!
//! ```json
//! {
//!   "initialized": false,
//!   "downloads_path": "~/Downloads",
//!   "file_categories": {
//!     "Archives": [".zip", ".rar", ".7z"],
//!     "Documents": [".pdf", ".txt"],
//!     "Others": []
//!   }
//! }
//! ```
//!
//! Extensions may be written with or without the leading dot and in any
//! case; the classifier normalizes both sides before matching.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};

/// File name of the main configuration inside the app-data directory.
pub const CONFIG_FILE_NAME: &str = "config.json";
/// File name of the append-only action log inside the app-data directory.
pub const LOG_FILE_NAME: &str = "tidybot.log";
/// File name of the optional ignore-rules file inside the app-data directory.
pub const FILTER_FILE_NAME: &str = "filters.toml";

/// Errors that can occur while locating, reading, or writing configuration.
#[derive(Debug)]
pub enum ConfigError {
    /// The app-data directory could not be created.
    AppDirCreationFailed {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The configuration file exists but could not be read.
    ReadFailed {
        path: PathBuf,
        source: std::io::Error,
    },
    /// The configuration file could not be written.
    WriteFailed {
        path: PathBuf,
        source: std::io::Error,
    },
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::AppDirCreationFailed { path, source } => {
                write!(
                    f,
                    "Could not create app data directory {}: {}",
                    path.display(),
                    source
                )
            }
            ConfigError::ReadFailed { path, source } => {
                write!(f, "Could not read config file {}: {}", path.display(), source)
            }
            ConfigError::WriteFailed { path, source } => {
                write!(
                    f,
                    "Could not write config file {}: {}",
                    path.display(),
                    source
                )
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Resolved locations of everything TidyBot keeps outside the organized
/// directory: the config file, the action log, and the ignore-rules file.
///
/// By default all three live in the per-platform app-data directory
/// (`%APPDATA%\TidyBot` on Windows, `~/.config/tidybot` elsewhere). An
/// explicit `--config FILE` override relocates the whole set next to the
/// given file, which is how the integration tests keep runs hermetic.
#[derive(Debug, Clone)]
pub struct AppPaths {
    /// Directory holding the files below.
    pub data_dir: PathBuf,
    /// Main JSON configuration file.
    pub config_file: PathBuf,
    /// Append-only action log.
    pub log_file: PathBuf,
    /// Ignore-rules file consulted after the per-directory rc file.
    pub filter_file: PathBuf,
}

impl AppPaths {
    /// Resolves the application paths, honoring an explicit config override.
    pub fn resolve(config_override: Option<&Path>) -> Self {
        match config_override {
            Some(file) => {
                let data_dir = file
                    .parent()
                    .filter(|p| !p.as_os_str().is_empty())
                    .map(Path::to_path_buf)
                    .unwrap_or_else(|| PathBuf::from("."));
                AppPaths {
                    config_file: file.to_path_buf(),
                    log_file: data_dir.join(LOG_FILE_NAME),
                    filter_file: data_dir.join(FILTER_FILE_NAME),
                    data_dir,
                }
            }
            None => {
                let data_dir = default_data_dir();
                AppPaths {
                    config_file: data_dir.join(CONFIG_FILE_NAME),
                    log_file: data_dir.join(LOG_FILE_NAME),
                    filter_file: data_dir.join(FILTER_FILE_NAME),
                    data_dir,
                }
            }
        }
    }

    /// Creates the app-data directory if it does not exist yet.
    ///
    /// Nothing else can run without this directory, so the caller should
    /// treat a failure here as fatal.
    pub fn ensure_data_dir(&self) -> Result<(), ConfigError> {
        fs::create_dir_all(&self.data_dir).map_err(|e| ConfigError::AppDirCreationFailed {
            path: self.data_dir.clone(),
            source: e,
        })
    }
}

/// Picks the per-platform app-data directory.
fn default_data_dir() -> PathBuf {
    if cfg!(windows)
        && let Ok(appdata) = env::var("APPDATA")
    {
        return PathBuf::from(appdata).join("TidyBot");
    }
    if let Ok(home) = env::var("HOME") {
        return PathBuf::from(home).join(".config").join("tidybot");
    }
    // No home to anchor to; keep everything local.
    PathBuf::from(".tidybot")
}

/// The outcome of [`Config::load_or_create`], returned as data so the caller
/// can report what happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadStatus {
    /// The config file existed and parsed cleanly.
    Loaded,
    /// No config file was found; defaults were written to disk.
    CreatedDefault,
    /// The config file was malformed; defaults were regenerated.
    Regenerated {
        /// Where the broken file was copied, when the backup succeeded.
        backup: Option<PathBuf>,
        /// The parse error that triggered regeneration.
        reason: String,
    },
}

/// TidyBot's persistent configuration.
///
/// The on-disk `config.json` layout is stable across releases, and missing
/// fields fall back to their defaults instead of failing the parse, so an
/// existing config keeps loading after an upgrade.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Whether first-run category-folder creation has already happened.
    #[serde(default)]
    pub initialized: bool,
    /// The directory to organize. A leading `~` is expanded at use time;
    /// the raw string is preserved on save.
    #[serde(default = "default_downloads_path")]
    pub downloads_path: String,
    /// Category name → extension list. `BTreeMap` keeps category order
    /// deterministic, which the classifier relies on for duplicate
    /// extensions.
    #[serde(default = "default_file_categories")]
    pub file_categories: BTreeMap<String, Vec<String>>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            initialized: false,
            downloads_path: default_downloads_path(),
            file_categories: default_file_categories(),
        }
    }
}

impl Config {
    /// Loads the configuration from `path`, healing whatever is wrong with it.
    ///
    /// * Missing file: defaults are written to `path` and returned.
    /// * Malformed JSON: the broken file is copied to `config.json.bak`
    ///   (best effort), then defaults are written and returned.
    /// * Valid file: returned as-is.
    ///
    /// # Errors
    ///
    /// Returns an error only for I/O failures that healing cannot paper
    /// over: an unreadable existing file, or a config that cannot be
    /// written back.
    pub fn load_or_create(path: &Path) -> Result<(Config, LoadStatus), ConfigError> {
        if !path.exists() {
            let config = Config::default();
            config.save(path)?;
            return Ok((config, LoadStatus::CreatedDefault));
        }

        let content = fs::read_to_string(path).map_err(|e| ConfigError::ReadFailed {
            path: path.to_path_buf(),
            source: e,
        })?;

        match serde_json::from_str::<Config>(&content) {
            Ok(config) => Ok((config, LoadStatus::Loaded)),
            Err(parse_err) => {
                let backup_target = path.with_extension("json.bak");
                let backup = fs::copy(path, &backup_target).ok().map(|_| backup_target);
                let config = Config::default();
                config.save(path)?;
                Ok((
                    config,
                    LoadStatus::Regenerated {
                        backup,
                        reason: parse_err.to_string(),
                    },
                ))
            }
        }
    }

    /// Writes the configuration to `path` as pretty-printed JSON.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let json = serde_json::to_string_pretty(self).map_err(|e| ConfigError::WriteFailed {
            path: path.to_path_buf(),
            source: std::io::Error::new(std::io::ErrorKind::InvalidData, e),
        })?;
        fs::write(path, json).map_err(|e| ConfigError::WriteFailed {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Returns the downloads directory with any leading `~` expanded.
    pub fn downloads_dir(&self) -> PathBuf {
        expand_tilde(&self.downloads_path)
    }
}

fn default_downloads_path() -> String {
    "~/Downloads".to_string()
}

/// The built-in category table. `.dmg` and `.pkg` appear in both `Archives`
/// and `Programs`; the classifier resolves the tie in category name order,
/// so `Archives` wins.
fn default_file_categories() -> BTreeMap<String, Vec<String>> {
    fn exts(list: &[&str]) -> Vec<String> {
        list.iter().map(|e| (*e).to_string()).collect()
    }

    let mut categories = BTreeMap::new();
    categories.insert(
        "Archives".to_string(),
        exts(&[
            ".zip", ".rar", ".7z", ".tar", ".gz", ".bz2", ".xz", ".iso", ".dmg", ".pkg",
        ]),
    );
    categories.insert(
        "Documents".to_string(),
        exts(&[
            ".pdf", ".doc", ".docx", ".txt", ".rtf", ".odt", ".xls", ".xlsx", ".ppt", ".pptx",
            ".csv", ".md", ".epub", ".mobi",
        ]),
    );
    categories.insert(
        "Graphics".to_string(),
        exts(&[
            ".jpg", ".jpeg", ".png", ".gif", ".bmp", ".svg", ".webp", ".tiff", ".psd", ".raw",
            ".ico", ".heic", ".mp4", ".mov", ".avi", ".mkv", ".wmv", ".flv", ".webm", ".m4v",
            ".mp3", ".wav", ".flac", ".aac", ".ogg", ".wma", ".m4a", ".aiff", ".mid", ".midi",
        ]),
    );
    categories.insert("Others".to_string(), Vec::new());
    categories.insert(
        "Programs".to_string(),
        exts(&[
            ".exe", ".msi", ".deb", ".rpm", ".appimage", ".bat", ".sh", ".cmd", ".apk", ".dmg",
            ".pkg",
        ]),
    );
    categories
}

/// Expands a leading `~` or `~/` against the current user's home directory.
///
/// Paths without a tilde are returned unchanged, as is anything when no
/// home directory can be determined.
pub fn expand_tilde(path: &str) -> PathBuf {
    expand_tilde_with(path, home_dir().as_deref())
}

fn home_dir() -> Option<PathBuf> {
    let var = if cfg!(windows) { "USERPROFILE" } else { "HOME" };
    env::var_os(var).map(PathBuf::from)
}

fn expand_tilde_with(path: &str, home: Option<&Path>) -> PathBuf {
    if path == "~"
        && let Some(home) = home
    {
        return home.to_path_buf();
    }
    if let Some(rest) = path.strip_prefix("~/").or_else(|| path.strip_prefix("~\\"))
        && let Some(home) = home
    {
        return home.join(rest);
    }
    PathBuf::from(path)
}
