//! Command-line interface for urdfpack.
//!
//! This module provides the CLI structure for the `urdfpack` binary.

mod commands;
mod format;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub use commands::{
    CheckCommand, ConfigCommand, FmtCommand, OutputFormat, PackCommand, TreeCommand,
};
pub use format::{check_round_trip, description_path, RoundTrip};

/// urdfpack - Check, format and package robot descriptions
///
/// Validates URDF robot descriptions as kinematic trees, rewrites them in a
/// canonical form, and zips the package folder they ship in.
#[derive(Debug, Parser)]
#[command(name = "urdfpack")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to custom configuration file
    #[arg(short, long, global = true, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Increase verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// The command to execute
    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Parse and validate a robot description
    Check(CheckCommand),

    /// Print the kinematic tree
    Tree(TreeCommand),

    /// Rewrite a robot description in canonical form
    Fmt(FmtCommand),

    /// Zip the package folder
    Pack(PackCommand),

    /// View or validate configuration
    #[command(subcommand)]
    Config(ConfigCommand),
}

impl Cli {
    /// Get the verbosity level based on flags.
    #[must_use]
    pub fn verbosity(&self) -> crate::logging::Verbosity {
        crate::logging::Verbosity::from_flags(self.verbose, self.quiet)
    }
}
