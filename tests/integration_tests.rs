use tidybot::cli::{RunOptions, run};
/// Integration tests for tidybot
///
/// These tests simulate real-world usage scenarios, testing the complete
/// end-to-end behavior of the organizer against a throwaway downloads
/// directory and an isolated app-data directory.
///
/// Test categories:
/// 1. First run and basic organization
/// 2. Extension matching and classification
/// 3. Collision handling
/// 4. Dry-run mode verification
/// 5. Idempotence and repeated runs
/// 6. Configuration handling and self-healing
/// 7. Ignore rules
/// 8. Action logging
/// 9. Edge cases
use std::fs::{self, File};
use std::io::Write;
use std::path::PathBuf;
use tempfile::TempDir;

// ============================================================================
// Test Utilities
// ============================================================================

/// A test fixture with a temporary downloads directory to organize and a
/// separate app-data directory for the config and log, so tests never touch
/// the real home directory.
struct TestFixture {
    temp_dir: TempDir,
}

impl TestFixture {
    /// Create a new fixture with empty `downloads/` and `app/` directories.
    fn new() -> Self {
        let temp_dir = TempDir::new().expect("Failed to create temp directory");
        fs::create_dir(temp_dir.path().join("downloads"))
            .expect("Failed to create downloads directory");
        fs::create_dir(temp_dir.path().join("app")).expect("Failed to create app directory");
        TestFixture { temp_dir }
    }

    /// The directory being organized.
    fn downloads(&self) -> PathBuf {
        self.temp_dir.path().join("downloads")
    }

    /// The isolated app-data directory.
    fn app_dir(&self) -> PathBuf {
        self.temp_dir.path().join("app")
    }

    /// The config file the runs use, inside the app-data directory.
    fn config_file(&self) -> PathBuf {
        self.app_dir().join("config.json")
    }

    /// The log file the runs append to.
    fn log_file(&self) -> PathBuf {
        self.app_dir().join("tidybot.log")
    }

    /// Options for a run against this fixture's directories.
    fn options(&self, dry_run: bool) -> RunOptions {
        RunOptions {
            directory: Some(self.downloads()),
            dry_run,
            config_file: Some(self.config_file()),
            filter_file: None,
        }
    }

    /// Runs the organizer for real.
    fn organize(&self) -> Result<(), String> {
        run(self.options(false))
    }

    /// Runs the organizer in dry-run mode.
    fn preview(&self) -> Result<(), String> {
        run(self.options(true))
    }

    /// Create a file with content in the downloads directory.
    fn create_file(&self, name: &str, content: &str) {
        let file_path = self.downloads().join(name);
        let mut file = File::create(&file_path).expect("Failed to create file");
        file.write_all(content.as_bytes())
            .expect("Failed to write file content");
    }

    /// Create multiple files at once with placeholder content.
    fn create_files(&self, names: &[&str]) {
        for name in names {
            self.create_file(name, "content");
        }
    }

    /// Create a subdirectory of the downloads directory.
    fn create_subdir(&self, name: &str) {
        fs::create_dir_all(self.downloads().join(name)).expect("Failed to create subdirectory");
    }

    /// Assert that a directory exists under downloads.
    fn assert_dir_exists(&self, rel_path: &str) {
        let path = self.downloads().join(rel_path);
        assert!(
            path.exists() && path.is_dir(),
            "Directory should exist: {}",
            path.display()
        );
    }

    /// Assert that a file exists under downloads.
    fn assert_file_exists(&self, rel_path: &str) {
        let path = self.downloads().join(rel_path);
        assert!(
            path.exists() && path.is_file(),
            "File should exist: {}",
            path.display()
        );
    }

    /// Assert that a file does NOT exist under downloads.
    fn assert_file_not_exists(&self, rel_path: &str) {
        let path = self.downloads().join(rel_path);
        assert!(!path.exists(), "File should not exist: {}", path.display());
    }

    /// Count files directly in downloads (non-recursive).
    fn count_files(&self) -> usize {
        fs::read_dir(self.downloads())
            .expect("Failed to read directory")
            .filter_map(|entry| {
                entry
                    .ok()
                    .filter(|e| e.metadata().map(|m| m.is_file()).unwrap_or(false))
            })
            .count()
    }

    /// Count directories directly in downloads.
    fn count_dirs(&self) -> usize {
        fs::read_dir(self.downloads())
            .expect("Failed to read directory")
            .filter_map(|entry| {
                entry
                    .ok()
                    .filter(|e| e.metadata().map(|m| m.is_dir()).unwrap_or(false))
            })
            .count()
    }

    /// List every file under downloads recursively, sorted.
    fn list_files_recursive(&self) -> Vec<PathBuf> {
        fn walk(dir: &PathBuf, files: &mut Vec<PathBuf>) {
            if let Ok(entries) = fs::read_dir(dir) {
                for entry in entries.flatten() {
                    let path = entry.path();
                    if path.is_file() {
                        files.push(path);
                    } else if path.is_dir() {
                        walk(&path, files);
                    }
                }
            }
        }
        let mut files = Vec::new();
        walk(&self.downloads(), &mut files);
        files.sort();
        files
    }

    /// The persisted configuration, parsed.
    fn read_config(&self) -> tidybot::Config {
        let raw = fs::read_to_string(self.config_file()).expect("Failed to read config");
        serde_json::from_str(&raw).expect("Config should be valid JSON")
    }

    /// The full contents of the log file.
    fn read_log(&self) -> String {
        fs::read_to_string(self.log_file()).unwrap_or_default()
    }
}

/// The category folders created by the default configuration.
const DEFAULT_FOLDERS: [&str; 5] = ["Archives", "Documents", "Graphics", "Others", "Programs"];

// ============================================================================
// Test Suite 1: First Run and Basic Organization
// ============================================================================

#[test]
fn test_first_run_creates_category_folders() {
    let fixture = TestFixture::new();

    let result = fixture.organize();

    assert!(result.is_ok(), "Should succeed on empty directory");
    for folder in DEFAULT_FOLDERS {
        fixture.assert_dir_exists(folder);
    }
    assert_eq!(fixture.count_dirs(), 5);

    let config = fixture.read_config();
    assert!(
        config.initialized,
        "First run should persist initialized = true"
    );
}

#[test]
fn test_second_run_does_not_repeat_first_run_setup() {
    let fixture = TestFixture::new();
    fixture.organize().expect("first run failed");

    // Removing an empty category folder must not be undone by a plain rerun.
    fs::remove_dir(fixture.downloads().join("Archives")).expect("Failed to remove folder");
    fixture.organize().expect("second run failed");

    assert!(
        !fixture.downloads().join("Archives").exists(),
        "A plain rerun must not recreate deleted category folders"
    );
}

#[test]
fn test_mover_recreates_deleted_category_on_demand() {
    let fixture = TestFixture::new();
    fixture.organize().expect("first run failed");

    fs::remove_dir(fixture.downloads().join("Archives")).expect("Failed to remove folder");
    fixture.create_file("backup.zip", "zip");
    fixture.organize().expect("second run failed");

    fixture.assert_file_exists("Archives/backup.zip");
}

#[test]
fn test_organize_single_document() {
    let fixture = TestFixture::new();
    fixture.create_file("report.pdf", "pdf content");

    let result = fixture.organize();

    assert!(result.is_ok());
    fixture.assert_file_exists("Documents/report.pdf");
    fixture.assert_file_not_exists("report.pdf");
}

#[test]
fn test_organize_mixed_file_types() {
    let fixture = TestFixture::new();
    fixture.create_files(&[
        "archive.zip",
        "notes.md",
        "report.pdf",
        "sheet.csv",
        "photo.jpg",
        "movie.mp4",
        "song.mp3",
        "setup.exe",
        "install.sh",
        "mystery.xyz",
    ]);

    let result = fixture.organize();

    assert!(result.is_ok());
    fixture.assert_file_exists("Archives/archive.zip");
    fixture.assert_file_exists("Documents/notes.md");
    fixture.assert_file_exists("Documents/report.pdf");
    fixture.assert_file_exists("Documents/sheet.csv");
    fixture.assert_file_exists("Graphics/photo.jpg");
    fixture.assert_file_exists("Graphics/movie.mp4");
    fixture.assert_file_exists("Graphics/song.mp3");
    fixture.assert_file_exists("Programs/setup.exe");
    fixture.assert_file_exists("Programs/install.sh");
    fixture.assert_file_exists("Others/mystery.xyz");

    assert_eq!(fixture.count_files(), 0, "Root should be empty");
}

#[test]
fn test_organize_preserves_file_content() {
    let fixture = TestFixture::new();
    fixture.create_file("report.pdf", "the exact bytes");

    fixture.organize().expect("organize failed");

    let moved = fixture.downloads().join("Documents/report.pdf");
    assert_eq!(
        fs::read_to_string(&moved).expect("Failed to read moved file"),
        "the exact bytes"
    );
}

// ============================================================================
// Test Suite 2: Extension Matching and Classification
// ============================================================================

#[test]
fn test_extension_matching_is_case_insensitive() {
    let fixture = TestFixture::new();
    fixture.create_files(&["photo.JPG", "notes.PDF", "setup.EXE"]);

    fixture.organize().expect("organize failed");

    fixture.assert_file_exists("Graphics/photo.JPG");
    fixture.assert_file_exists("Documents/notes.PDF");
    fixture.assert_file_exists("Programs/setup.EXE");
}

#[test]
fn test_only_the_last_extension_counts() {
    let fixture = TestFixture::new();
    fixture.create_files(&["archive.tar.gz", "notes.backup.pdf"]);

    fixture.organize().expect("organize failed");

    fixture.assert_file_exists("Archives/archive.tar.gz");
    fixture.assert_file_exists("Documents/notes.backup.pdf");
}

#[test]
fn test_files_without_extension_go_to_others() {
    let fixture = TestFixture::new();
    fixture.create_files(&["README", "LICENSE"]);

    fixture.organize().expect("organize failed");

    fixture.assert_file_exists("Others/README");
    fixture.assert_file_exists("Others/LICENSE");
}

#[test]
fn test_duplicate_extension_resolved_by_category_order() {
    // .dmg and .pkg are listed under both Archives and Programs; the first
    // category in name order wins.
    let fixture = TestFixture::new();
    fixture.create_files(&["app.dmg", "tool.pkg"]);

    fixture.organize().expect("organize failed");

    fixture.assert_file_exists("Archives/app.dmg");
    fixture.assert_file_exists("Archives/tool.pkg");
}

#[test]
fn test_custom_categories_from_config_are_honored() {
    let fixture = TestFixture::new();

    let mut config = tidybot::Config::default();
    config.initialized = true;
    config
        .file_categories
        .insert("Code".to_string(), vec![".rs".to_string(), ".py".to_string()]);
    config.save(&fixture.config_file()).expect("save failed");

    fixture.create_files(&["main.rs", "script.py", "report.pdf"]);
    fixture.organize().expect("organize failed");

    fixture.assert_file_exists("Code/main.rs");
    fixture.assert_file_exists("Code/script.py");
    fixture.assert_file_exists("Documents/report.pdf");
}

// ============================================================================
// Test Suite 3: Collision Handling
// ============================================================================

#[test]
fn test_collision_renames_instead_of_overwriting() {
    let fixture = TestFixture::new();
    fixture.create_subdir("Documents");
    fixture.create_file("Documents/report.pdf", "existing");
    fixture.create_file("report.pdf", "incoming");

    fixture.organize().expect("organize failed");

    fixture.assert_file_exists("Documents/report.pdf");
    fixture.assert_file_exists("Documents/report (1).pdf");
    assert_eq!(
        fs::read_to_string(fixture.downloads().join("Documents/report.pdf"))
            .expect("Failed to read"),
        "existing",
        "The existing file must keep its content"
    );
    assert_eq!(
        fs::read_to_string(fixture.downloads().join("Documents/report (1).pdf"))
            .expect("Failed to read"),
        "incoming"
    );
}

#[test]
fn test_repeated_collisions_increment_the_suffix() {
    let fixture = TestFixture::new();
    fixture.create_subdir("Documents");
    fixture.create_file("Documents/report.pdf", "first");
    fixture.create_file("Documents/report (1).pdf", "second");
    fixture.create_file("report.pdf", "third");

    fixture.organize().expect("organize failed");

    fixture.assert_file_exists("Documents/report (2).pdf");
}

#[test]
fn test_collision_with_multi_dot_name() {
    let fixture = TestFixture::new();
    fixture.create_subdir("Archives");
    fixture.create_file("Archives/backup.tar.gz", "existing");
    fixture.create_file("backup.tar.gz", "incoming");

    fixture.organize().expect("organize failed");

    fixture.assert_file_exists("Archives/backup.tar (1).gz");
}

// ============================================================================
// Test Suite 4: Dry-Run Mode
// ============================================================================

#[test]
fn test_dry_run_moves_nothing() {
    let fixture = TestFixture::new();
    fixture.create_files(&["report.pdf", "photo.jpg", "mystery.xyz"]);

    let result = fixture.preview();

    assert!(result.is_ok());
    fixture.assert_file_exists("report.pdf");
    fixture.assert_file_exists("photo.jpg");
    fixture.assert_file_exists("mystery.xyz");
    assert_eq!(
        fixture.count_dirs(),
        0,
        "Dry-run must not create directories"
    );
}

#[test]
fn test_dry_run_does_not_mark_first_run_complete() {
    let fixture = TestFixture::new();
    fixture.create_file("report.pdf", "pdf");

    fixture.preview().expect("dry run failed");

    let config = fixture.read_config();
    assert!(
        !config.initialized,
        "Dry-run must not persist the initialized flag"
    );
}

#[test]
fn test_repeated_dry_runs_see_the_same_state() {
    let fixture = TestFixture::new();
    fixture.create_files(&["report.pdf", "photo.jpg"]);

    fixture.preview().expect("first dry run failed");
    let after_first = fixture.list_files_recursive();
    fixture.preview().expect("second dry run failed");
    let after_second = fixture.list_files_recursive();

    assert_eq!(after_first, after_second);
    assert_eq!(fixture.count_files(), 2);
}

#[test]
fn test_dry_run_then_organize() {
    let fixture = TestFixture::new();
    fixture.create_files(&["report.pdf", "photo.jpg"]);

    fixture.preview().expect("dry run failed");
    assert_eq!(fixture.count_files(), 2, "Preview must leave files in place");

    fixture.organize().expect("organize failed");
    fixture.assert_file_exists("Documents/report.pdf");
    fixture.assert_file_exists("Graphics/photo.jpg");
    assert_eq!(fixture.count_files(), 0);
}

#[test]
fn test_dry_run_logs_planned_moves() {
    let fixture = TestFixture::new();
    fixture.create_file("report.pdf", "pdf");

    fixture.preview().expect("dry run failed");

    let log = fixture.read_log();
    assert!(
        log.contains("[DRY RUN] Would move 'report.pdf' to 'Documents/'"),
        "Log should record the planned move, got:\n{}",
        log
    );
}

#[test]
fn test_dry_run_reports_planned_rename() {
    let fixture = TestFixture::new();
    fixture.create_subdir("Documents");
    fixture.create_file("Documents/report.pdf", "existing");
    fixture.create_file("report.pdf", "incoming");

    fixture.preview().expect("dry run failed");

    let log = fixture.read_log();
    assert!(
        log.contains("[DRY RUN] Would move 'report.pdf' to 'Documents/' as 'report (1).pdf'"),
        "Log should record the planned rename, got:\n{}",
        log
    );
    fixture.assert_file_exists("report.pdf");
    fixture.assert_file_not_exists("Documents/report (1).pdf");
}

// ============================================================================
// Test Suite 5: Idempotence and Repeated Runs
// ============================================================================

#[test]
fn test_organize_is_idempotent() {
    let fixture = TestFixture::new();
    fixture.create_files(&["report.pdf", "photo.jpg", "mystery.xyz"]);

    fixture.organize().expect("first run failed");
    let after_first = fixture.list_files_recursive();

    fixture.organize().expect("second run failed");
    let after_second = fixture.list_files_recursive();

    assert_eq!(
        after_first, after_second,
        "Organizing an already-organized folder must change nothing"
    );
}

#[test]
fn test_organize_then_add_files_then_organize_again() {
    let fixture = TestFixture::new();
    fixture.create_file("report1.pdf", "pdf");

    fixture.organize().expect("first run failed");
    fixture.assert_file_exists("Documents/report1.pdf");

    fixture.create_file("report2.pdf", "pdf");
    fixture.create_file("photo.jpg", "jpg");

    fixture.organize().expect("second run failed");
    fixture.assert_file_exists("Documents/report1.pdf");
    fixture.assert_file_exists("Documents/report2.pdf");
    fixture.assert_file_exists("Graphics/photo.jpg");
}

#[test]
fn test_organize_with_existing_category_directories() {
    let fixture = TestFixture::new();
    fixture.create_subdir("Documents");
    fixture.create_file("Documents/existing.pdf", "old");
    fixture.create_file("new_doc.pdf", "new");

    fixture.organize().expect("organize failed");

    fixture.assert_file_exists("Documents/existing.pdf");
    fixture.assert_file_exists("Documents/new_doc.pdf");
}

// ============================================================================
// Test Suite 6: Configuration Handling and Self-Healing
// ============================================================================

#[test]
fn test_missing_config_is_created_with_defaults() {
    let fixture = TestFixture::new();

    fixture.organize().expect("organize failed");

    let config = fixture.read_config();
    assert_eq!(config.file_categories.len(), 5);
    assert!(config.file_categories.contains_key("Others"));
}

#[test]
fn test_corrupted_config_is_backed_up_and_regenerated() {
    let fixture = TestFixture::new();
    fs::write(fixture.config_file(), "{{{ definitely not json")
        .expect("Failed to write corrupted config");
    fixture.create_file("report.pdf", "pdf");

    let result = fixture.organize();

    assert!(result.is_ok(), "A corrupted config must not stop the run");
    fixture.assert_file_exists("Documents/report.pdf");

    let backup = fixture.app_dir().join("config.json.bak");
    assert_eq!(
        fs::read_to_string(&backup).expect("Backup should exist"),
        "{{{ definitely not json"
    );
    let config = fixture.read_config();
    assert_eq!(config.file_categories.len(), 5);
}

#[test]
fn test_configured_downloads_path_is_used_without_override() {
    let fixture = TestFixture::new();

    let mut config = tidybot::Config::default();
    config.initialized = true;
    config.downloads_path = fixture.downloads().to_string_lossy().to_string();
    config.save(&fixture.config_file()).expect("save failed");

    fixture.create_file("report.pdf", "pdf");

    let options = RunOptions {
        directory: None,
        dry_run: false,
        config_file: Some(fixture.config_file()),
        filter_file: None,
    };
    run(options).expect("run failed");

    fixture.assert_file_exists("Documents/report.pdf");
}

#[test]
fn test_missing_downloads_path_fails_the_run() {
    let fixture = TestFixture::new();

    let mut config = tidybot::Config::default();
    config.initialized = true;
    config.downloads_path = fixture
        .temp_dir
        .path()
        .join("nowhere")
        .to_string_lossy()
        .to_string();
    config.save(&fixture.config_file()).expect("save failed");

    let options = RunOptions {
        directory: None,
        dry_run: false,
        config_file: Some(fixture.config_file()),
        filter_file: None,
    };
    let err = run(options).expect_err("missing downloads path must fail");
    assert!(err.contains("Downloads path does not exist"));
}

// ============================================================================
// Test Suite 7: Ignore Rules
// ============================================================================

#[test]
fn test_rc_file_in_target_directory_is_applied() {
    let fixture = TestFixture::new();
    fixture.create_file(".tidybotrc.toml", "[ignore]\npatterns = [\"*.keep\"]\n");
    fixture.create_file("data.keep", "keep me here");
    fixture.create_file("report.pdf", "pdf");

    fixture.organize().expect("organize failed");

    fixture.assert_file_exists("data.keep");
    fixture.assert_file_exists(".tidybotrc.toml");
    fixture.assert_file_exists("Documents/report.pdf");
}

#[test]
fn test_in_progress_downloads_are_skipped_by_default() {
    let fixture = TestFixture::new();
    fixture.create_files(&["movie.mp4.crdownload", "archive.zip.part", "movie.mp4"]);

    fixture.organize().expect("organize failed");

    fixture.assert_file_exists("movie.mp4.crdownload");
    fixture.assert_file_exists("archive.zip.part");
    fixture.assert_file_exists("Graphics/movie.mp4");
}

#[test]
fn test_hidden_files_stay_put_by_default() {
    let fixture = TestFixture::new();
    fixture.create_files(&[".env", "report.pdf"]);

    fixture.organize().expect("organize failed");

    fixture.assert_file_exists(".env");
    fixture.assert_file_exists("Documents/report.pdf");
}

#[test]
fn test_explicit_filter_file_overrides_discovery() {
    let fixture = TestFixture::new();
    let rules = fixture.temp_dir.path().join("rules.toml");
    fs::write(&rules, "[ignore]\nextensions = [\"pdf\"]\n").expect("Failed to write rules");

    fixture.create_files(&["report.pdf", "photo.jpg"]);

    let options = RunOptions {
        filter_file: Some(rules),
        ..fixture.options(false)
    };
    run(options).expect("run failed");

    fixture.assert_file_exists("report.pdf");
    fixture.assert_file_exists("Graphics/photo.jpg");
}

// ============================================================================
// Test Suite 8: Action Logging
// ============================================================================

#[test]
fn test_log_file_records_the_whole_run() {
    let fixture = TestFixture::new();
    fixture.create_file("report.pdf", "pdf");

    fixture.organize().expect("organize failed");

    let log = fixture.read_log();
    assert!(log.contains("TidyBot started."));
    assert!(log.contains("extension(s) across"));
    assert!(log.contains("Moved: report.pdf -> Documents/"));
    assert!(log.contains("TidyBot finished successfully."));
}

#[test]
fn test_log_file_records_renames() {
    let fixture = TestFixture::new();
    fixture.create_subdir("Documents");
    fixture.create_file("Documents/report.pdf", "existing");
    fixture.create_file("report.pdf", "incoming");

    fixture.organize().expect("organize failed");

    let log = fixture.read_log();
    assert!(
        log.contains("Moved and renamed: report.pdf -> Documents/report (1).pdf"),
        "Log should record the rename, got:\n{}",
        log
    );
}

// ============================================================================
// Test Suite 9: Edge Cases
// ============================================================================

#[test]
fn test_special_characters_in_filenames() {
    let fixture = TestFixture::new();
    fixture.create_files(&["song [remix].mp3", "document - final.pdf", "photo (1).jpg"]);

    fixture.organize().expect("organize failed");

    fixture.assert_file_exists("Graphics/song [remix].mp3");
    fixture.assert_file_exists("Documents/document - final.pdf");
    fixture.assert_file_exists("Graphics/photo (1).jpg");
}

#[test]
fn test_subdirectories_are_left_alone() {
    let fixture = TestFixture::new();
    fixture.create_subdir("nested");
    fixture.create_file("nested/inner.pdf", "pdf");
    fixture.create_file("outer.pdf", "pdf");

    fixture.organize().expect("organize failed");

    fixture.assert_file_exists("nested/inner.pdf");
    fixture.assert_file_exists("Documents/outer.pdf");
    fixture.assert_file_not_exists("Documents/inner.pdf");
}

#[test]
#[cfg(unix)]
fn test_one_failed_move_does_not_abort_the_run() {
    let fixture = TestFixture::new();

    let mut config = tidybot::Config::default();
    config.initialized = true;
    config.save(&fixture.config_file()).expect("save failed");

    // A dangling symlink occupies the Documents path: the scanner skips
    // it, and the mover cannot replace it with a directory.
    std::os::unix::fs::symlink(
        fixture.temp_dir.path().join("missing-target"),
        fixture.downloads().join("Documents"),
    )
    .expect("Failed to create symlink");

    fixture.create_file("report.pdf", "pdf");
    fixture.create_file("photo.jpg", "jpg");

    let result = fixture.organize();

    assert!(result.is_ok(), "A single failed move must not fail the run");
    fixture.assert_file_exists("Graphics/photo.jpg");
    fixture.assert_file_exists("report.pdf");

    let log = fixture.read_log();
    assert!(
        log.contains("Error moving report.pdf"),
        "Log should record the failed move, got:\n{}",
        log
    );
    assert!(
        log.contains("1 file(s) could not be organized"),
        "Log should record the end-of-run warning, got:\n{}",
        log
    );
}

#[test]
fn test_organize_empty_directory() {
    let fixture = TestFixture::new();

    let result = fixture.organize();

    assert!(result.is_ok(), "Should succeed on empty directory");
    assert_eq!(fixture.count_files(), 0);

    let log = fixture.read_log();
    assert!(log.contains("No files found to organize."));
}
