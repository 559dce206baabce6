use clap::Parser;
use std::path::PathBuf;
use tidybot::cli::{RunOptions, run};

/// Organize your Downloads folder into category subfolders by file extension.
#[derive(Parser, Debug)]
#[command(name = "tidybot", version, about)]
struct Cli {
    /// Directory to organize instead of the configured downloads path.
    directory: Option<PathBuf>,

    /// Simulate organization without moving any files.
    #[arg(long)]
    dry_run: bool,

    /// Use this config file instead of the per-platform default.
    #[arg(long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Use this ignore-rules file instead of the discovered one.
    #[arg(long, value_name = "FILE")]
    filters: Option<PathBuf>,
}

fn main() {
    let cli = Cli::parse();

    let options = RunOptions {
        directory: cli.directory,
        dry_run: cli.dry_run,
        config_file: cli.config,
        filter_file: cli.filters,
    };

    if let Err(e) = run(options) {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}
