//! CLI command definitions.
//!
//! This module defines the structure of all CLI subcommands.

use std::path::PathBuf;

use clap::{Args, Subcommand, ValueEnum};

/// Check command arguments.
#[derive(Debug, Args)]
pub struct CheckCommand {
    /// Description file (defaults to the configured path)
    pub file: Option<PathBuf>,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Tree command arguments.
#[derive(Debug, Args)]
pub struct TreeCommand {
    /// Description file (defaults to the configured path)
    pub file: Option<PathBuf>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "plain")]
    pub format: OutputFormat,
}

/// Format command arguments.
#[derive(Debug, Args)]
pub struct FmtCommand {
    /// Description file (defaults to the configured path)
    pub file: Option<PathBuf>,

    /// Write the formatted document here instead of stdout
    #[arg(short, long, value_name = "OUT")]
    pub output: Option<PathBuf>,

    /// Only verify that the document survives a write/parse round trip
    #[arg(long, conflicts_with = "output")]
    pub check: bool,

    /// Spaces per nesting level (overrides the configured indent)
    #[arg(long, value_parser = clap::value_parser!(u8).range(0..=8))]
    pub indent: Option<u8>,
}

/// Pack command arguments.
#[derive(Debug, Args)]
pub struct PackCommand {
    /// Folder to compress (overrides the configured source)
    #[arg(long, value_name = "DIR")]
    pub source: Option<PathBuf>,

    /// Archive to write (overrides the configured destination)
    #[arg(long, value_name = "FILE")]
    pub dest: Option<PathBuf>,

    /// Deflate level 0-9 (overrides the configured level)
    #[arg(long, value_parser = clap::value_parser!(u32).range(0..=9))]
    pub level: Option<u32>,

    /// Output as JSON
    #[arg(short, long)]
    pub json: bool,
}

/// Configuration commands.
#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show {
        /// Output as JSON
        #[arg(short, long)]
        json: bool,
    },

    /// Show the configuration file path
    Path,

    /// Validate configuration
    Validate {
        /// Path to configuration file to validate
        #[arg(short, long)]
        file: Option<PathBuf>,
    },
}

/// Output format for commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Plain text output
    #[default]
    Plain,
    /// JSON output
    Json,
}
