//! Output and logging module.
//!
//! Provides a centralized interface for all CLI output, including colored
//! messages, progress tracking, and the summary table. Every user-facing
//! action is also appended to the log file, so a run can be audited after
//! the fact. Console and log file are independent sinks: the console shows
//! INFO and above, the file additionally records DEBUG lines.

use chrono::Local;
use colored::*;
use indicatif::{ProgressBar, ProgressStyle};
use std::collections::BTreeMap;
use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;

/// Manages all CLI output with consistent styling, mirrored to a log file.
///
/// This struct provides methods for:
/// - Success messages (green with ✓)
/// - Error messages (red with ✗)
/// - Warning messages (yellow with ⚠)
/// - Info messages (cyan)
/// - Dry-run notices (yellow with a `[DRY RUN]` prefix)
/// - Progress bars for move operations
/// - Summary tables with per-category statistics
///
/// If the log file cannot be opened the reporter warns once and keeps
/// running console-only.
pub struct Reporter {
    log: Option<File>,
}

impl Reporter {
    /// Creates a reporter, opening `log_path` for appending if given.
    ///
    /// # Arguments
    ///
    /// * `log_path` - Log file to append to, or `None` for console-only output
    pub fn new(log_path: Option<&Path>) -> Self {
        let log = log_path.and_then(|path| {
            match OpenOptions::new().create(true).append(true).open(path) {
                Ok(file) => Some(file),
                Err(e) => {
                    eprintln!(
                        "{} Could not open log file {}: {}",
                        "⚠".yellow(),
                        path.display(),
                        e
                    );
                    None
                }
            }
        });
        Reporter { log }
    }

    /// Appends one timestamped line to the log file, if one is open.
    ///
    /// Writes are best effort; a failed write is silently discarded, just
    /// as an unopenable log file downgrades the reporter to console-only.
    fn append(&self, level: &str, message: &str) {
        if let Some(mut file) = self.log.as_ref() {
            let line = format!(
                "{} - tidybot - {} - {}\n",
                Local::now().format("%Y-%m-%d %H:%M:%S"),
                level,
                message
            );
            let _ = file.write_all(line.as_bytes());
        }
    }

    /// Prints a success message in green with a checkmark and logs it.
    ///
    /// # Arguments
    ///
    /// * `message` - The message to display
    ///
    /// # Example
    ///
    /// ```no_run
    /// use tidybot::report::Reporter;
    /// let reporter = Reporter::new(None);
    /// reporter.success("Downloads folder organized!");
    /// ```
    pub fn success(&self, message: &str) {
        println!("{} {}", "✓".green(), message);
        self.append("INFO", message);
    }

    /// Prints an error message in red with an X mark and logs it.
    ///
    /// # Arguments
    ///
    /// * `message` - The message to display
    ///
    /// # Example
    ///
    /// ```no_run
    /// use tidybot::report::Reporter;
    /// let reporter = Reporter::new(None);
    /// reporter.error("Failed to move file");
    /// ```
    pub fn error(&self, message: &str) {
        eprintln!("{} {}", "✗".red(), message);
        self.append("ERROR", message);
    }

    /// Prints a warning message in yellow with a warning symbol and logs it.
    ///
    /// # Arguments
    ///
    /// * `message` - The message to display
    ///
    /// # Example
    ///
    /// ```no_run
    /// use tidybot::report::Reporter;
    /// let reporter = Reporter::new(None);
    /// reporter.warning("Some files could not be organized");
    /// ```
    pub fn warning(&self, message: &str) {
        println!("{} {}", "⚠".yellow(), message);
        self.append("WARNING", message);
    }

    /// Prints an info message in cyan and logs it.
    ///
    /// # Arguments
    ///
    /// * `message` - The message to display
    ///
    /// # Example
    ///
    /// ```no_run
    /// use tidybot::report::Reporter;
    /// let reporter = Reporter::new(None);
    /// reporter.info("Organizing directory: /home/user/Downloads");
    /// ```
    pub fn info(&self, message: &str) {
        println!("{}", message.cyan());
        self.append("INFO", message);
    }

    /// Records a message in the log file only, without console output.
    ///
    /// # Arguments
    ///
    /// * `message` - The message to log
    pub fn debug(&self, message: &str) {
        self.append("DEBUG", message);
    }

    /// Records an error in the log file only.
    ///
    /// Used on fatal paths where `main` prints the error itself, so the
    /// log captures it without a duplicate console line.
    ///
    /// # Arguments
    ///
    /// * `message` - The message to log
    pub fn log_error(&self, message: &str) {
        self.append("ERROR", message);
    }

    /// Prints a dry-run notice in yellow and logs it.
    ///
    /// The `[DRY RUN]` prefix is added here so callers pass only the
    /// would-be action.
    ///
    /// # Arguments
    ///
    /// * `message` - The dry-run message
    pub fn dry_run_notice(&self, message: &str) {
        let line = format!("[DRY RUN] {}", message);
        println!("{}", line.yellow());
        self.append("INFO", &line);
    }

    /// Prints a section header.
    ///
    /// # Arguments
    ///
    /// * `header` - The header text
    pub fn header(&self, header: &str) {
        println!("\n{}", header.bold());
    }

    /// Prints a line above an active progress bar and logs it.
    ///
    /// Going through the progress bar keeps the bar itself from being
    /// garbled by interleaved output.
    ///
    /// # Arguments
    ///
    /// * `pb` - The active progress bar
    /// * `message` - The message to display
    pub fn progress_println(&self, pb: &ProgressBar, message: &str) {
        pb.println(message);
        self.append("INFO", message);
    }

    /// Prints an error above an active progress bar and logs it.
    ///
    /// # Arguments
    ///
    /// * `pb` - The active progress bar
    /// * `message` - The message to display
    pub fn progress_error(&self, pb: &ProgressBar, message: &str) {
        pb.println(format!("{} {}", "✗".red(), message));
        self.append("ERROR", message);
    }

    /// Creates and returns a progress bar for file operations.
    ///
    /// # Arguments
    ///
    /// * `total` - Total number of items to process
    ///
    /// # Returns
    ///
    /// A configured `ProgressBar` ready for use.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use tidybot::report::Reporter;
    /// let pb = Reporter::create_progress_bar(100);
    /// pb.inc(1); // Increment by 1
    /// pb.finish_with_message("Completed!");
    /// ```
    pub fn create_progress_bar(total: u64) -> ProgressBar {
        let pb = ProgressBar::new(total);
        pb.set_style(
            ProgressStyle::default_bar()
                .template("{spinner:.cyan} [{bar:40.cyan/blue}] {pos}/{len} {msg}")
                .expect("Invalid progress bar template")
                .progress_chars("█▓░"),
        );
        pb
    }

    /// Prints a summary table with file statistics by category.
    ///
    /// # Arguments
    ///
    /// * `category_counts` - Map of category names to file counts
    /// * `total_files` - Total number of files organized
    ///
    /// # Example
    ///
    /// ```no_run
    /// use tidybot::report::Reporter;
    /// use std::collections::BTreeMap;
    ///
    /// let mut counts = BTreeMap::new();
    /// counts.insert("Documents".to_string(), 15);
    /// counts.insert("Graphics".to_string(), 8);
    /// let reporter = Reporter::new(None);
    /// reporter.summary_table(&counts, 23);
    /// ```
    pub fn summary_table(&self, category_counts: &BTreeMap<String, usize>, total_files: usize) {
        self.header("SUMMARY");

        // Calculate column widths
        let max_category_len = category_counts
            .keys()
            .map(|name| name.len())
            .max()
            .unwrap_or(0)
            .max(8); // At least "Category" width

        // Print header
        println!(
            "{:<width$} | {}",
            "Category".bold(),
            "Files".bold(),
            width = max_category_len
        );
        println!("{}", "-".repeat(max_category_len + 10));

        // Print rows
        for (category, count) in category_counts {
            let file_word = if *count == 1 { "file" } else { "files" };
            println!(
                "{:<width$} | {} {}",
                category,
                count.to_string().green(),
                file_word,
                width = max_category_len
            );
        }

        // Print footer
        println!("{}", "-".repeat(max_category_len + 10));
        println!(
            "{:<width$} | {} {}",
            "Total".bold(),
            total_files.to_string().green().bold(),
            if total_files == 1 { "file" } else { "files" },
            width = max_category_len
        );

        let rows: Vec<String> = category_counts
            .iter()
            .map(|(category, count)| format!("{}={}", category, count))
            .collect();
        self.append(
            "INFO",
            &format!("Summary: {} (total {})", rows.join(", "), total_files),
        );
    }
}
