//! Ignore rules: files the organizer must leave alone.
//!
//! Rules are loaded from a TOML file and compiled once per run. Discovery
//! order:
//! 1. an explicit `--filters FILE`
//! 2. `.tidybotrc.toml` inside the directory being organized
//! 3. `filters.toml` in the app-data directory
//! 4. built-in defaults
//!
//! The built-in defaults skip hidden files, TidyBot's own artifacts, common
//! OS droppings, and in-progress browser downloads.
//!
//! # Rules File Format
//!
//! ```toml
//! [ignore]
//! skip_hidden = true
//! filenames = ["Thumbs.db", "desktop.ini"]
//! extensions = ["crdownload", "part", "download"]
//! patterns = ["*.partial"]
//! regex = ['^~\$.*']
//!
//! [ignore.keep]
//! patterns = ["*.part"]
//! ```

use crate::config::{AppPaths, LOG_FILE_NAME};
use glob::Pattern;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

/// Per-directory rules file looked for inside the target directory.
pub const RC_FILE_NAME: &str = ".tidybotrc.toml";

/// Errors that can occur while loading or compiling ignore rules.
#[derive(Debug)]
pub enum FilterError {
    /// An explicitly requested rules file does not exist.
    NotFound(PathBuf),
    /// A rules file exists but could not be read.
    ReadFailed {
        path: PathBuf,
        source: std::io::Error,
    },
    /// A rules file is not valid TOML.
    ParseFailed { path: PathBuf, reason: String },
    /// A glob pattern failed to compile.
    InvalidGlobPattern(String),
    /// A regex pattern failed to compile, with the reason.
    InvalidRegexPattern { pattern: String, reason: String },
}

impl std::fmt::Display for FilterError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FilterError::NotFound(path) => {
                write!(f, "Ignore rules file not found: {}", path.display())
            }
            FilterError::ReadFailed { path, source } => {
                write!(
                    f,
                    "Could not read ignore rules {}: {}",
                    path.display(),
                    source
                )
            }
            FilterError::ParseFailed { path, reason } => {
                write!(f, "Invalid ignore rules in {}: {}", path.display(), reason)
            }
            FilterError::InvalidGlobPattern(pattern) => {
                write!(f, "Invalid glob pattern '{}'", pattern)
            }
            FilterError::InvalidRegexPattern { pattern, reason } => {
                write!(f, "Invalid regex pattern '{}': {}", pattern, reason)
            }
        }
    }
}

impl std::error::Error for FilterError {}

/// Top-level structure of a rules file.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct IgnoreConfig {
    #[serde(default)]
    pub ignore: IgnoreRules,
}

/// Which files to leave in place, before any classification happens.
///
/// Every field has a protective default; writing `extensions = []`
/// explicitly opts out of the in-progress-download protection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IgnoreRules {
    /// Skip dotfiles. Defaults to true.
    #[serde(default = "default_skip_hidden")]
    pub skip_hidden: bool,

    /// Exact file names to skip.
    #[serde(default = "default_ignored_filenames")]
    pub filenames: Vec<String>,

    /// Extensions to skip, case-insensitive, without the dot.
    #[serde(default = "default_ignored_extensions")]
    pub extensions: Vec<String>,

    /// Glob patterns to skip.
    #[serde(default)]
    pub patterns: Vec<String>,

    /// File-name regex patterns to skip.
    #[serde(default)]
    pub regex: Vec<String>,

    /// Whitelist that overrides every rule above.
    #[serde(default)]
    pub keep: KeepRules,
}

impl Default for IgnoreRules {
    fn default() -> Self {
        IgnoreRules {
            skip_hidden: default_skip_hidden(),
            filenames: default_ignored_filenames(),
            extensions: default_ignored_extensions(),
            patterns: Vec::new(),
            regex: Vec::new(),
            keep: KeepRules::default(),
        }
    }
}

/// Glob patterns that override the skip rules.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KeepRules {
    #[serde(default)]
    pub patterns: Vec<String>,
}

fn default_skip_hidden() -> bool {
    true
}

/// TidyBot's own artifacts plus the usual OS droppings.
fn default_ignored_filenames() -> Vec<String> {
    vec![
        LOG_FILE_NAME.to_string(),
        RC_FILE_NAME.to_string(),
        "Thumbs.db".to_string(),
        "desktop.ini".to_string(),
    ]
}

/// In-progress browser downloads. Moving these out from under the browser
/// breaks the download.
fn default_ignored_extensions() -> Vec<String> {
    vec![
        "crdownload".to_string(),
        "part".to_string(),
        "download".to_string(),
    ]
}

impl IgnoreConfig {
    /// Loads ignore rules following the discovery order, returning the rules
    /// together with the path they came from (`None` for built-in defaults).
    ///
    /// # Errors
    ///
    /// Returns an error if an explicitly requested file is missing, or if
    /// any discovered file cannot be read or parsed. A missing rc file or
    /// app-data file is not an error; discovery simply moves on.
    pub fn load(
        explicit: Option<&Path>,
        target_dir: &Path,
        paths: &AppPaths,
    ) -> Result<(Self, Option<PathBuf>), FilterError> {
        if let Some(path) = explicit {
            if !path.exists() {
                return Err(FilterError::NotFound(path.to_path_buf()));
            }
            return Self::load_from_file(path).map(|c| (c, Some(path.to_path_buf())));
        }

        let rc_file = target_dir.join(RC_FILE_NAME);
        if rc_file.exists() {
            return Self::load_from_file(&rc_file).map(|c| (c, Some(rc_file)));
        }

        if paths.filter_file.exists() {
            return Self::load_from_file(&paths.filter_file)
                .map(|c| (c, Some(paths.filter_file.clone())));
        }

        Ok((IgnoreConfig::default(), None))
    }

    fn load_from_file(path: &Path) -> Result<Self, FilterError> {
        let content = fs::read_to_string(path).map_err(|e| FilterError::ReadFailed {
            path: path.to_path_buf(),
            source: e,
        })?;
        toml::from_str(&content).map_err(|e| FilterError::ParseFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })
    }

    /// Compiles the rules into matchers, validating every pattern.
    pub fn compile(self) -> Result<CompiledIgnore, FilterError> {
        CompiledIgnore::new(self.ignore)
    }
}

/// Pre-compiled rule set; patterns are parsed once, matching is per-file.
pub struct CompiledIgnore {
    skip_hidden: bool,
    filenames: HashSet<String>,
    extensions: HashSet<String>,
    patterns: Vec<Pattern>,
    regexes: Vec<Regex>,
    keep_patterns: Vec<Pattern>,
}

impl CompiledIgnore {
    fn new(rules: IgnoreRules) -> Result<Self, FilterError> {
        let patterns = rules
            .patterns
            .iter()
            .map(|pattern| {
                Pattern::new(pattern)
                    .map_err(|_| FilterError::InvalidGlobPattern(pattern.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let keep_patterns = rules
            .keep
            .patterns
            .iter()
            .map(|pattern| {
                Pattern::new(pattern)
                    .map_err(|_| FilterError::InvalidGlobPattern(pattern.clone()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let regexes = rules
            .regex
            .iter()
            .map(|pattern| {
                Regex::new(pattern).map_err(|e| FilterError::InvalidRegexPattern {
                    pattern: pattern.clone(),
                    reason: e.to_string(),
                })
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(CompiledIgnore {
            skip_hidden: rules.skip_hidden,
            filenames: rules.filenames.into_iter().collect(),
            extensions: rules
                .extensions
                .iter()
                .map(|ext| ext.trim_start_matches('.').to_lowercase())
                .collect(),
            patterns,
            regexes,
            keep_patterns,
        })
    }

    /// Returns true when the organizer must leave `file_path` alone.
    ///
    /// Checks run in order with early termination:
    /// 1. keep-list (whitelist), which overrides every other rule
    /// 2. hidden-file check
    /// 3. exact file name
    /// 4. extension
    /// 5. glob pattern
    /// 6. regex pattern
    pub fn is_ignored(&self, file_path: &Path) -> bool {
        let file_name = file_path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_default();

        if self
            .keep_patterns
            .iter()
            .any(|pattern| pattern.matches_path(file_path))
        {
            return false;
        }

        if self.skip_hidden && file_name.starts_with('.') {
            return true;
        }

        if self.filenames.contains(file_name.as_ref()) {
            return true;
        }

        if let Some(ext) = file_path.extension() {
            let ext = ext.to_string_lossy().to_lowercase();
            if self.extensions.contains(&ext) {
                return true;
            }
        }

        if self
            .patterns
            .iter()
            .any(|pattern| pattern.matches_path(file_path))
        {
            return true;
        }

        self.regexes.iter().any(|regex| regex.is_match(&file_name))
    }
}
