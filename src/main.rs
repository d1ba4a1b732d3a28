//! Comment Batch - Extract comments from pasted HTML into a CSV batch.
//!
//! QUICK START:
//!   comment-batch extract page.html        # Append comments from a saved page
//!   pbpaste | comment-batch extract        # ...or from the clipboard
//!   comment-batch status                   # How many comments are batched
//!   comment-batch download -o out.csv      # Save the batch and start over
//!   comment-batch merge a.csv b.csv        # Combine earlier downloads
//!
//! Run one command at a time per batch: the batch file is not locked.

mod cli;

use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

use clap::Parser;
use colored::Colorize;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::{Cli, Commands};
use comment_batch::application::{
    format_clear, format_extract, format_json, format_records_table, format_status, merge,
    BatchService, OutputFormat,
};
use comment_batch::domain::{self, AppConfig, AppError, Resource};
use comment_batch::infrastructure::{
    ensure_config_exists, load_config, load_config_from_file, resolve_config_path,
};

fn main() {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose);

    if let Err(e) = run(cli) {
        eprintln!("{} {}", "Error:".red().bold(), e);
        std::process::exit(1);
    }
}

/// Main application logic.
fn run(cli: Cli) -> domain::Result<()> {
    let format = cli
        .output_format()
        .map_err(|e| AppError::Config { message: e })?;

    let config_path = resolve_config_path(cli.config.as_deref(), cli.data_dir.as_deref());
    let data_dir = cli.data_dir.as_deref();

    // An explicit --config must exist; the default location may not.
    let load = || -> domain::Result<AppConfig> {
        let mut config = if cli.config.is_some() {
            load_config_from_file(&config_path)?
        } else {
            load_config(&config_path)?
        };
        if let Some(dir) = data_dir {
            config.paths.data_dir = Some(dir.to_path_buf());
        }
        Ok(config)
    };

    match &cli.command {
        Commands::Extract { file } => cmd_extract(&load()?, file.as_deref(), format)?,
        Commands::Download { output } => cmd_download(&load()?, output.clone(), format)?,
        Commands::Clear => cmd_clear(&load()?, format)?,
        Commands::Merge {
            files,
            output,
            keep_batch,
        } => cmd_merge(&load()?, files, output.clone(), *keep_batch, format)?,
        Commands::Status => cmd_status(&load()?, format)?,
        Commands::Preview { limit } => cmd_preview(&load()?, *limit)?,
        Commands::Init => cmd_init(&config_path, data_dir)?,
    }

    Ok(())
}

/// Extract comments from a file or stdin.
fn cmd_extract(config: &AppConfig, file: Option<&Path>, format: OutputFormat) -> domain::Result<()> {
    let html = match file {
        Some(path) if path != Path::new("-") => fs::read_to_string(path)
            .map_err(|e| AppError::io(format!("Failed to read {}", path.display()), e))?,
        _ => {
            let mut buf = String::new();
            std::io::stdin()
                .read_to_string(&mut buf)
                .map_err(|e| AppError::io("Failed to read stdin", e))?;
            buf
        }
    };

    if html.trim().is_empty() {
        return Err(AppError::invalid_input("HTML content must not be empty."));
    }

    let response = BatchService::from_config(config).extract(&html)?;

    match format {
        OutputFormat::Text => println!("{}", format_extract(&response)),
        OutputFormat::Json => println!("{}", format_json(&response)?),
    }

    Ok(())
}

/// Write the batch to disk and clear it.
fn cmd_download(
    config: &AppConfig,
    output: Option<PathBuf>,
    format: OutputFormat,
) -> domain::Result<()> {
    let path = output.unwrap_or_else(|| PathBuf::from(&config.batch.download_name));
    let download = BatchService::from_config(config).download_to(&path)?;

    match format {
        OutputFormat::Text => println!(
            "{} Downloaded batch to {} and cleared it",
            "✓".green().bold(),
            path.display().to_string().cyan()
        ),
        OutputFormat::Json => println!(
            "{}",
            format_json(&serde_json::json!({
                "path": path.display().to_string(),
                "bytes": download.bytes.len(),
            }))?
        ),
    }

    Ok(())
}

/// Delete the batch.
fn cmd_clear(config: &AppConfig, format: OutputFormat) -> domain::Result<()> {
    let response = BatchService::from_config(config).clear()?;

    match format {
        OutputFormat::Text => println!("{}", format_clear(&response)),
        OutputFormat::Json => println!("{}", format_json(&response)?),
    }

    Ok(())
}

/// Merge CSV files, then clear the batch unless asked to keep it.
fn cmd_merge(
    config: &AppConfig,
    files: &[PathBuf],
    output: Option<PathBuf>,
    keep_batch: bool,
    format: OutputFormat,
) -> domain::Result<()> {
    let resources = files
        .iter()
        .map(|path| -> domain::Result<Resource> {
            let content = fs::read_to_string(path)
                .map_err(|e| AppError::io(format!("Failed to read {}", path.display()), e))?;
            let name = path
                .file_name()
                .map_or_else(|| path.display().to_string(), |n| n.to_string_lossy().into_owned());
            Ok(Resource::new(name, content))
        })
        .collect::<domain::Result<Vec<_>>>()?;

    let merged = merge(&resources, &config.batch.merged_name)?;
    let path = output.unwrap_or_else(|| PathBuf::from(&merged.name));

    fs::write(&path, merged.content.as_bytes())
        .map_err(|e| AppError::io(format!("Failed to write {}", path.display()), e))?;

    let cleared = if keep_batch {
        None
    } else {
        Some(BatchService::from_config(config).clear_after_merge()?)
    };

    match format {
        OutputFormat::Text => {
            println!(
                "{} Merged {} files into {}",
                "✓".green().bold(),
                files.len(),
                path.display().to_string().cyan()
            );
            if let Some(response) = &cleared {
                println!("{}", format_clear(response));
            }
        }
        OutputFormat::Json => println!(
            "{}",
            format_json(&serde_json::json!({
                "path": path.display().to_string(),
                "inputs": files.len(),
                "clear": cleared,
            }))?
        ),
    }

    Ok(())
}

/// Show batch state.
fn cmd_status(config: &AppConfig, format: OutputFormat) -> domain::Result<()> {
    let status = BatchService::from_config(config).status()?;

    match format {
        OutputFormat::Text => println!("{}", format_status(&status)),
        OutputFormat::Json => println!("{}", format_json(&status)?),
    }

    Ok(())
}

/// Show batch records without modifying them.
fn cmd_preview(config: &AppConfig, limit: usize) -> domain::Result<()> {
    let service = BatchService::from_config(config);
    let records = service.store().records()?;

    if records.is_empty() {
        println!("{} Batch is empty", "•".yellow());
        return Ok(());
    }

    println!("{}", format_records_table(&records, limit));
    Ok(())
}

/// Write the default configuration file.
fn cmd_init(path: &Path, data_dir: Option<&Path>) -> domain::Result<()> {
    if ensure_config_exists(path)? {
        println!("{} Created {}", "✓".green().bold(), path.display());
    } else {
        println!("{} {} already exists", "•".yellow(), path.display());
    }

    let mut config = load_config_from_file(path)?;
    if let Some(dir) = data_dir {
        config.paths.data_dir = Some(dir.to_path_buf());
    }
    println!("  Batch file: {}", config.batch_file_path().display());

    Ok(())
}

/// Setup tracing/logging based on verbosity level.
fn setup_logging(verbosity: u8) {
    let filter = match verbosity {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(false)
                .without_time()
                .with_writer(std::io::stderr),
        )
        .with(filter)
        .init();
}
