//! Command-line interface module for tidybot.
//!
//! This module handles all CLI-related functionality including:
//! - Run option handling and validation
//! - Configuration loading and self-healing reporting
//! - First-run category folder setup
//! - Organization orchestration, live and dry-run

use crate::category::CategoryMap;
use crate::config::{AppPaths, Config, LoadStatus};
use crate::filters::IgnoreConfig;
use crate::mover::Mover;
use crate::report::Reporter;
use crate::scanner::{ScannedFile, scan_directory};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Options controlling a single organizer run.
#[derive(Debug, Clone, Default)]
pub struct RunOptions {
    /// Directory to organize, overriding the configured downloads path.
    pub directory: Option<PathBuf>,
    /// If true, log every action without touching the target directory.
    pub dry_run: bool,
    /// Explicit config file; its directory also receives the log file and
    /// the ignore-rules file.
    pub config_file: Option<PathBuf>,
    /// Explicit ignore-rules file, bypassing discovery.
    pub filter_file: Option<PathBuf>,
}

/// Runs the organizer with the given options.
///
/// This is the main entry point for CLI operations. It loads (or heals)
/// the configuration, performs first-run folder setup, scans the target
/// directory, classifies each file by extension, and moves every file into
/// its category folder. With `dry_run` set it only logs what would happen.
///
/// # Arguments
///
/// * `options` - The options for this run
///
/// # Examples
///
/// ```no_run
/// use tidybot::cli::{RunOptions, run};
///
/// let result = run(RunOptions {
///     dry_run: true,
///     ..RunOptions::default()
/// });
/// match result {
///     Ok(()) => println!("Preview complete"),
///     Err(e) => eprintln!("Error: {}", e),
/// }
/// ```
pub fn run(options: RunOptions) -> Result<(), String> {
    let paths = AppPaths::resolve(options.config_file.as_deref());
    paths.ensure_data_dir().map_err(|e| e.to_string())?;

    let reporter = Reporter::new(Some(&paths.log_file));
    reporter.info("TidyBot started.");
    reporter.debug(&format!("Config directory: {}", paths.data_dir.display()));
    reporter.debug(&format!("Config file: {}", paths.config_file.display()));

    let (mut config, status) =
        Config::load_or_create(&paths.config_file).map_err(|e| fail(&reporter, e.to_string()))?;
    report_load_status(&reporter, &status);

    let target_dir = match &options.directory {
        Some(dir) => dir.clone(),
        None => config.downloads_dir(),
    };
    if !target_dir.is_dir() {
        return Err(fail(
            &reporter,
            format!("Downloads path does not exist: {}", target_dir.display()),
        ));
    }
    reporter.info(&format!("Organizing contents of: {}", target_dir.display()));

    let (ignore_config, rules_source) =
        IgnoreConfig::load(options.filter_file.as_deref(), &target_dir, &paths)
            .map_err(|e| fail(&reporter, e.to_string()))?;
    match &rules_source {
        Some(path) => reporter.debug(&format!("Ignore rules loaded from: {}", path.display())),
        None => reporter.debug("Using built-in ignore rules."),
    }
    let rules = ignore_config
        .compile()
        .map_err(|e| fail(&reporter, e.to_string()))?;

    let category_map = CategoryMap::new(&config.file_categories);
    reporter.debug(&format!(
        "Category map: {} extension(s) across {} folder(s).",
        category_map.extension_count(),
        category_map.folder_names().len()
    ));

    if !config.initialized {
        reporter.info("First run detected. Creating category folders...");
        if options.dry_run {
            for name in category_map.folder_names() {
                if !target_dir.join(name).exists() {
                    reporter.dry_run_notice(&format!(
                        "Would create '{}/{}'",
                        target_dir.display(),
                        name
                    ));
                }
            }
            reporter.dry_run_notice("Would set 'initialized' to true");
        } else {
            let created = Mover::create_category_folders(
                &target_dir,
                category_map.folder_names().iter().map(String::as_str),
            )
            .map_err(|e| fail(&reporter, e.to_string()))?;
            for name in &created {
                reporter.success(&format!("Created folder: {}", name));
            }

            config.initialized = true;
            match config.save(&paths.config_file) {
                Ok(()) => reporter.info("Config updated: initialized = true"),
                Err(e) => reporter.error(&format!("Error saving config: {}", e)),
            }
        }
    }

    let files =
        scan_directory(&target_dir, &rules).map_err(|e| fail(&reporter, e.to_string()))?;
    if files.is_empty() {
        reporter.info("No files found to organize.");
        reporter.info("TidyBot finished successfully.");
        return Ok(());
    }
    reporter.debug(&format!("Found {} file(s) to organize.", files.len()));

    let failed = if options.dry_run {
        preview_moves(&reporter, &target_dir, &files, &category_map)
    } else {
        execute_moves(&reporter, &target_dir, &files, &category_map)
    };

    if failed > 0 {
        reporter.warning(&format!(
            "{} file(s) could not be organized. See errors above.",
            failed
        ));
    }
    reporter.info("TidyBot finished successfully.");
    Ok(())
}

/// Logs a fatal error to the log file and returns it for `main` to print.
fn fail(reporter: &Reporter, message: String) -> String {
    reporter.log_error(&message);
    message
}

/// Reports how configuration loading went, echoing the self-healing steps.
fn report_load_status(reporter: &Reporter, status: &LoadStatus) {
    match status {
        LoadStatus::Loaded => reporter.debug("Configuration loaded."),
        LoadStatus::CreatedDefault => {
            reporter.info("No config file found. Creating default configuration.");
        }
        LoadStatus::Regenerated { backup, reason } => {
            reporter.warning(&format!(
                "Config file is corrupted: {}. Creating backup and generating new config.",
                reason
            ));
            match backup {
                Some(path) => reporter.info(&format!(
                    "Backup of corrupted config saved to: {}",
                    path.display()
                )),
                None => reporter.warning("Could not create backup of corrupted config."),
            }
            reporter.info("New default config created.");
        }
    }
}

/// Logs what a live run would do, without touching the target directory.
///
/// Returns the number of files that could not be planned.
fn preview_moves(
    reporter: &Reporter,
    base_path: &Path,
    files: &[ScannedFile],
    category_map: &CategoryMap,
) -> usize {
    let mut category_counts: BTreeMap<String, usize> = BTreeMap::new();
    let mut failed = 0;

    for file in files {
        let category = category_map.classify(file.extension.as_deref());
        match Mover::plan_move(base_path, &file.path, category) {
            Ok(record) => {
                if record.renamed {
                    reporter.dry_run_notice(&format!(
                        "Would move '{}' to '{}/' as '{}'",
                        file.name,
                        category,
                        record.destination_name()
                    ));
                } else {
                    reporter
                        .dry_run_notice(&format!("Would move '{}' to '{}/'", file.name, category));
                }
                *category_counts.entry(category.to_string()).or_insert(0) += 1;
            }
            Err(e) => {
                reporter.error(&format!("Error planning move for {}: {}", file.name, e));
                failed += 1;
            }
        }
    }

    let planned: usize = category_counts.values().sum();
    reporter.summary_table(&category_counts, planned);
    reporter.success("Dry run complete. No files were modified.");
    failed
}

/// Moves every file into its category folder, reporting each action.
///
/// Failures are reported and counted but do not stop the run.
fn execute_moves(
    reporter: &Reporter,
    base_path: &Path,
    files: &[ScannedFile],
    category_map: &CategoryMap,
) -> usize {
    let pb = Reporter::create_progress_bar(files.len() as u64);
    let mut category_counts: BTreeMap<String, usize> = BTreeMap::new();
    let mut failed = 0;

    for file in files {
        pb.set_message(file.name.clone());
        let category = category_map.classify(file.extension.as_deref());

        match Mover::move_to_category(base_path, &file.path, category) {
            Ok(record) => {
                if record.renamed {
                    reporter.progress_println(
                        &pb,
                        &format!(
                            "Moved and renamed: {} -> {}/{}",
                            file.name,
                            category,
                            record.destination_name()
                        ),
                    );
                } else {
                    reporter
                        .progress_println(&pb, &format!("Moved: {} -> {}/", file.name, category));
                }
                *category_counts.entry(category.to_string()).or_insert(0) += 1;
            }
            Err(e) => {
                reporter.progress_error(&pb, &format!("Error moving {}: {}", file.name, e));
                failed += 1;
            }
        }
        pb.inc(1);
    }
    pb.finish_and_clear();

    let moved: usize = category_counts.values().sum();
    reporter.summary_table(&category_counts, moved);
    failed
}
