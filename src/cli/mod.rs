//! CLI interface using clap.
//!
//! Provides command-line arguments and subcommands for the tool.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use comment_batch::application::OutputFormat;

/// Comment Batch - Extract comments from pasted HTML into a CSV batch.
///
/// Typical flow: extract page.html (repeat) → download → merge old exports.
#[derive(Parser, Debug)]
#[command(name = "comment-batch")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Enable verbose logging (use multiple times for more verbosity).
    #[arg(short, long, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Output format: text or json.
    #[arg(short, long, default_value = "text")]
    pub format: String,

    /// Configuration file (defaults to ~/.comment-batch/config.toml).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Data directory holding the batch file.
    #[arg(long)]
    pub data_dir: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Extract comments from HTML and append them to the batch.
    Extract {
        /// HTML file to read (stdin if omitted or "-").
        file: Option<PathBuf>,
    },

    /// Write the batch to a file and clear it.
    Download {
        /// Output file path (defaults to the configured download name).
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Delete the batch.
    Clear,

    /// Merge previously downloaded CSV files into one.
    Merge {
        /// CSV files to merge, in order (at least 2).
        #[arg(required = true)]
        files: Vec<PathBuf>,

        /// Output file path (defaults to the configured merged name).
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Keep the current batch instead of clearing it after the merge.
        #[arg(long)]
        keep_batch: bool,
    },

    /// Show batch state and record count.
    Status,

    /// Show the records currently in the batch.
    Preview {
        /// Maximum number of records to show.
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Write the default configuration file if missing.
    Init,
}

impl Cli {
    /// Parse the output format argument.
    pub fn output_format(&self) -> Result<OutputFormat, String> {
        self.format.parse()
    }
}
