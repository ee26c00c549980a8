use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, ValueEnum};
use log::info;

use todo_review::report::{ProgressReporter, RenderOptions, render_json, render_text};
use todo_review::{ScanConfig, ScanJob, ScanRoots};

/// Review TODO, FIXME and other annotation comments across a codebase
#[derive(Debug, Parser)]
#[command(name = "todo_review", version)]
struct Cli {
    /// Directories or files to scan; defaults to the current directory
    paths: Vec<PathBuf>,

    /// Path to a TOML configuration file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Output format for the report
    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    /// Match annotation patterns case sensitively
    #[arg(long)]
    case_sensitive: bool,

    /// Show the containing folder next to each file name
    #[arg(long)]
    include_folder: bool,

    /// Suppress the progress spinner
    #[arg(long)]
    no_progress: bool,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => ScanConfig::load(path)?,
        None => ScanConfig::default(),
    };
    if cli.case_sensitive {
        config.case_sensitive = true;
    }

    let paths = if cli.paths.is_empty() {
        vec![PathBuf::from(".")]
    } else {
        cli.paths.clone()
    };
    let roots = ScanRoots::from_paths(paths);

    info!(
        "Scanning {} directories and {} files",
        roots.directories.len(),
        roots.explicit_files.len()
    );

    // Configuration errors abort here, before any traversal
    let handle = ScanJob::new(&config, roots)?.spawn();

    if !cli.no_progress {
        ProgressReporter::new().watch(&handle);
    }
    let result = handle.wait()?;

    match cli.format {
        OutputFormat::Text => {
            let options = RenderOptions {
                include_folder: cli.include_folder,
                ..Default::default()
            };
            print!("{}", render_text(&result, &options));
        }
        OutputFormat::Json => println!("{}", render_json(&result)?),
    }

    Ok(())
}
