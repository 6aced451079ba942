//! `urdfpack` - CLI for robot description checking and packaging
//!
//! This binary provides the command-line interface for validating,
//! formatting and packaging URDF robot descriptions.

#![warn(missing_debug_implementations)]
#![deny(unsafe_code)]

use std::path::PathBuf;

use clap::Parser;
use tracing::{debug, info};

use urdfpack::archive::Packer;
use urdfpack::cli::{
    check_round_trip, description_path, CheckCommand, Cli, Command, ConfigCommand, FmtCommand,
    OutputFormat, PackCommand, RoundTrip, TreeCommand,
};
use urdfpack::logging::Verbosity;
use urdfpack::{init_logging, urdf, validation, Config};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let verbosity = cli.verbosity();

    // Initialize logging based on verbosity
    init_logging(verbosity);

    // Config commands load (or skip) the configuration themselves
    let command = match cli.command {
        Command::Config(cmd) => return handle_config(cmd, cli.config),
        command => command,
    };

    let config = Config::load_from(cli.config)?;
    debug!(?config, "Loaded configuration");

    match command {
        Command::Check(cmd) => handle_check(&config, &cmd, verbosity),
        Command::Tree(cmd) => handle_tree(&config, &cmd),
        Command::Fmt(cmd) => handle_fmt(&config, &cmd, verbosity),
        Command::Pack(cmd) => handle_pack(&config, cmd, verbosity),
        // Dispatched before the configuration is loaded.
        Command::Config(_) => Ok(()),
    }
}

fn handle_check(
    config: &Config,
    cmd: &CheckCommand,
    verbosity: Verbosity,
) -> Result<(), Box<dyn std::error::Error>> {
    let path = description_path(config, cmd.file.as_deref());
    let robot = urdf::parse_file(&path)?;
    let tree = validation::validate(&robot)?;
    info!(path = %path.display(), "Description is valid");

    if cmd.json {
        let report = serde_json::json!({
            "file": path,
            "robot": robot.name,
            "root": tree.root(),
            "links": robot.links.len(),
            "joints": robot.joints.len(),
            "dof": robot.dof(),
            "leaves": tree.leaves(),
            "valid": true,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else if verbosity.shows_summaries() {
        println!("{}: ok", path.display());
        println!("  Robot:   {}", robot.name);
        println!("  Root:    {}", tree.root());
        println!("  Links:   {}", robot.links.len());
        println!("  Joints:  {}", robot.joints.len());
        println!("  DOF:     {}", robot.dof());
        println!("  Leaves:  {}", tree.leaves().join(", "));
    }
    Ok(())
}

fn handle_tree(config: &Config, cmd: &TreeCommand) -> Result<(), Box<dyn std::error::Error>> {
    let path = description_path(config, cmd.file.as_deref());
    let robot = urdf::parse_file(&path)?;
    let tree = validation::validate(&robot)?;

    match cmd.format {
        OutputFormat::Plain => print!("{}", tree.render(&robot)),
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(&tree)?),
    }
    Ok(())
}

fn handle_fmt(
    config: &Config,
    cmd: &FmtCommand,
    verbosity: Verbosity,
) -> Result<(), Box<dyn std::error::Error>> {
    let path = description_path(config, cmd.file.as_deref());
    let indent = cmd.indent.map_or(config.format.indent, usize::from);

    let robot = urdf::parse_file(&path)?;
    let formatted = urdf::write_string(&robot, indent)?;

    if cmd.check {
        let outcome = check_round_trip(&path, &robot, &formatted)?;
        if verbosity.shows_summaries() {
            match outcome {
                RoundTrip::Canonical => println!("{}: ok (canonical)", path.display()),
                RoundTrip::Preserved => println!(
                    "{}: ok (round trip preserved, not in canonical form)",
                    path.display()
                ),
            }
        }
        return Ok(());
    }

    match &cmd.output {
        Some(out) => {
            std::fs::write(out, &formatted)?;
            info!(from = %path.display(), to = %out.display(), "Formatted description written");
        }
        None => print!("{formatted}"),
    }
    Ok(())
}

fn handle_pack(
    config: &Config,
    cmd: PackCommand,
    verbosity: Verbosity,
) -> Result<(), Box<dyn std::error::Error>> {
    let mut pack = config.pack.clone();
    if let Some(source) = cmd.source {
        pack.source = source;
    }
    if let Some(dest) = cmd.dest {
        pack.destination = dest;
    }
    if let Some(level) = cmd.level {
        pack.compression_level = level;
    }
    pack.validate()?;

    let summary = Packer::new(pack).pack()?;

    if cmd.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else if verbosity.shows_summaries() {
        println!(
            "{} -> {}",
            summary.source.display(),
            summary.destination.display()
        );
        println!("  Files:        {}", summary.files);
        println!("  Directories:  {}", summary.directories);
        println!("  Excluded:     {}", summary.excluded);
        println!("  Input bytes:  {}", summary.uncompressed_bytes);
        println!("  Archive size: {}", summary.archive_bytes);
        println!("  BLAKE3:       {}", summary.blake3);
        println!("  Created:      {}", summary.created_at.to_rfc3339());
    }
    Ok(())
}

fn handle_config(
    cmd: ConfigCommand,
    config_path: Option<PathBuf>,
) -> Result<(), Box<dyn std::error::Error>> {
    match cmd {
        ConfigCommand::Show { json } => {
            let config = Config::load_from(config_path)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&config)?);
            } else {
                println!("Current Configuration");
                println!("=====================");
                println!();
                println!("[Description]");
                println!("  Path:               {}", config.description.path.display());
                println!();
                println!("[Format]");
                println!("  Indent:             {}", config.format.indent);
                println!();
                println!("[Pack]");
                println!("  Source:             {}", config.pack.source.display());
                println!("  Destination:        {}", config.pack.destination.display());
                println!("  Compression level:  {}", config.pack.compression_level);
                println!("  Include root dir:   {}", config.pack.include_root_dir);
                println!(
                    "  Exclude patterns:   {}",
                    config.pack.exclude_patterns.join("  ")
                );
            }
        }
        ConfigCommand::Path => {
            let path = config_path.unwrap_or_else(Config::default_config_path);
            println!("{}", path.display());
        }
        ConfigCommand::Validate { file } => {
            let path = file
                .or(config_path)
                .unwrap_or_else(Config::default_config_path);
            println!("Validating configuration: {}", path.display());
            Config::load_from(Some(path))?;
            println!("Configuration is valid.");
        }
    }
    Ok(())
}
