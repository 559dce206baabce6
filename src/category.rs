//! Extension-to-category classification.
//!
//! A [`CategoryMap`] is built once per run from the configured
//! category→extensions table. Categories are visited in name order and the
//! first category claiming an extension wins, so the duplicate `.dmg`/`.pkg`
//! entries in the default table resolve to `Archives`. Unknown extensions and
//! extensionless files fall back to the `Others` bucket.
//!
//! Classification is purely name-based; file contents are never read.

use std::collections::{BTreeMap, HashMap};

/// Bucket for files no category claims. Applies even when the user removed
/// the `Others` entry from their config.
pub const FALLBACK_CATEGORY: &str = "Others";

/// Maps file extensions to category folder names.
#[derive(Debug, Clone)]
pub struct CategoryMap {
    by_extension: HashMap<String, String>,
    folders: Vec<String>,
}

impl CategoryMap {
    /// Builds the lookup table from a configured category table.
    ///
    /// Extensions are normalized (lowercased, leading dot stripped), so
    /// `".PDF"`, `"pdf"`, and `".pdf"` all describe the same claim. When two
    /// categories list the same extension, the one earlier in name order
    /// keeps it.
    ///
    /// # Examples
    ///
    /// ```
    /// use std::collections::BTreeMap;
    /// use tidybot::category::CategoryMap;
    ///
    /// let mut table = BTreeMap::new();
    /// table.insert("Documents".to_string(), vec![".pdf".to_string()]);
    /// table.insert("Music".to_string(), vec!["mp3".to_string()]);
    ///
    /// let map = CategoryMap::new(&table);
    /// assert_eq!(map.classify(Some("pdf")), "Documents");
    /// assert_eq!(map.classify(Some("MP3")), "Music");
    /// ```
    pub fn new(file_categories: &BTreeMap<String, Vec<String>>) -> Self {
        let mut by_extension = HashMap::new();
        for (category, extensions) in file_categories {
            for ext in extensions {
                let key = normalize_extension(ext);
                if key.is_empty() {
                    continue;
                }
                // First claim wins; BTreeMap iteration makes "first"
                // mean name order.
                by_extension.entry(key).or_insert_with(|| category.clone());
            }
        }

        let mut folders: Vec<String> = file_categories.keys().cloned().collect();
        if !file_categories.contains_key(FALLBACK_CATEGORY) {
            folders.push(FALLBACK_CATEGORY.to_string());
        }

        CategoryMap {
            by_extension,
            folders,
        }
    }

    /// Returns the category folder for a file extension.
    ///
    /// The input may carry a leading dot and any casing. `None` (no
    /// extension) and unclaimed extensions classify to [`FALLBACK_CATEGORY`].
    ///
    /// # Examples
    ///
    /// ```
    /// use std::collections::BTreeMap;
    /// use tidybot::category::CategoryMap;
    ///
    /// let mut table = BTreeMap::new();
    /// table.insert("Documents".to_string(), vec![".pdf".to_string()]);
    ///
    /// let map = CategoryMap::new(&table);
    /// assert_eq!(map.classify(Some(".PDF")), "Documents");
    /// assert_eq!(map.classify(Some("xyz")), "Others");
    /// assert_eq!(map.classify(None), "Others");
    /// ```
    pub fn classify(&self, extension: Option<&str>) -> &str {
        if let Some(ext) = extension {
            let key = normalize_extension(ext);
            if let Some(category) = self.by_extension.get(&key) {
                return category;
            }
        }
        FALLBACK_CATEGORY
    }

    /// All folder names in order: every configured category plus the
    /// fallback bucket. Used for first-run folder creation.
    pub fn folder_names(&self) -> &[String] {
        &self.folders
    }

    /// Number of distinct extensions with a category claim.
    pub fn extension_count(&self) -> usize {
        self.by_extension.len()
    }
}

fn normalize_extension(ext: &str) -> String {
    ext.trim().trim_start_matches('.').to_lowercase()
}
