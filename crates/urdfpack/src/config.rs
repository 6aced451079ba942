//! Configuration management for urdfpack.
//!
//! This module provides configuration loading and validation using figment,
//! supporting TOML config files, environment variables, and defaults.

use std::path::PathBuf;

use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Default configuration file name.
const CONFIG_FILE_NAME: &str = "config.toml";

/// Application directory name under the platform config dir.
const APP_DIR_NAME: &str = "urdfpack";

/// Prefix for environment variable overrides.
const ENV_PREFIX: &str = "URDFPACK_";

/// Largest accepted indent width.
pub const MAX_INDENT: usize = 8;

/// Largest deflate compression level.
pub const MAX_COMPRESSION_LEVEL: u32 = 9;

/// Application configuration.
///
/// Configuration is loaded from (in order of precedence, highest first):
/// 1. Environment variables (prefixed with `URDFPACK_`, nested keys joined
///    with `__`, e.g. `URDFPACK_PACK__COMPRESSION_LEVEL=9`)
/// 2. TOML config file at `~/.config/urdfpack/config.toml`
/// 3. Default values
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Robot description location.
    pub description: DescriptionConfig,
    /// URDF output formatting.
    pub format: FormatConfig,
    /// Archive packing.
    pub pack: PackConfig,
}

/// Where the robot description lives.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DescriptionConfig {
    /// Description file used when a command is given no path.
    pub path: PathBuf,
}

/// How URDF documents are written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatConfig {
    /// Spaces per nesting level; 0 writes a single line.
    pub indent: usize,
}

/// What gets packed, and where to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PackConfig {
    /// Folder to compress.
    pub source: PathBuf,
    /// Archive to write.
    pub destination: PathBuf,
    /// Deflate level, 0 (store-like) to 9 (smallest).
    pub compression_level: u32,
    /// Prefix entries with the source folder's own name.
    pub include_root_dir: bool,
    /// Regexes matched against `/`-separated paths relative to the source;
    /// matching files and directories are left out.
    pub exclude_patterns: Vec<String>,
}

impl Default for DescriptionConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("robot_hw.urdf"),
        }
    }
}

impl Default for FormatConfig {
    fn default() -> Self {
        Self { indent: 2 }
    }
}

impl Default for PackConfig {
    fn default() -> Self {
        Self {
            source: PathBuf::from("robotics_toolbox"),
            destination: PathBuf::from("robotics_toolbox.zip"),
            compression_level: 6,
            include_root_dir: true,
            exclude_patterns: default_exclude_patterns(),
        }
    }
}

/// Default exclusions: Python bytecode and VCS metadata.
fn default_exclude_patterns() -> Vec<String> {
    vec![
        r"(^|/)__pycache__(/|$)".to_string(),
        r"\.py[co]$".to_string(),
        r"(^|/)\.git(/|$)".to_string(),
    ]
}

impl Config {
    /// Load configuration from all sources.
    ///
    /// Configuration is loaded in this order (later sources override earlier):
    /// 1. Default values
    /// 2. TOML config file (if exists)
    /// 3. Environment variables (prefixed with `URDFPACK_`)
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading or parsing fails.
    pub fn load() -> Result<Self> {
        Self::load_from(None)
    }

    /// Load configuration with an optional custom config path.
    ///
    /// # Errors
    ///
    /// Returns an error if configuration loading, parsing or validation fails.
    pub fn load_from(config_path: Option<PathBuf>) -> Result<Self> {
        let config_file = config_path.unwrap_or_else(Self::default_config_path);

        let figment = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Toml::file(&config_file))
            .merge(Env::prefixed(ENV_PREFIX).split("__"));

        let config: Config = figment.extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Get the default configuration file path.
    #[must_use]
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from(".config"))
            .join(APP_DIR_NAME)
            .join(CONFIG_FILE_NAME)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if any configuration values are invalid.
    pub fn validate(&self) -> Result<()> {
        if self.description.path.as_os_str().is_empty() {
            return Err(Error::ConfigValidation {
                message: "description.path must not be empty".to_string(),
            });
        }

        if self.format.indent > MAX_INDENT {
            return Err(Error::ConfigValidation {
                message: format!(
                    "format.indent ({}) must be between 0 and {MAX_INDENT}",
                    self.format.indent
                ),
            });
        }

        self.pack.validate()
    }
}

impl PackConfig {
    /// Validate the packing settings on their own.
    ///
    /// # Errors
    ///
    /// Returns an error if a path is empty, the compression level is out of
    /// range, or an exclude pattern is not a valid regex.
    pub fn validate(&self) -> Result<()> {
        if self.source.as_os_str().is_empty() {
            return Err(Error::ConfigValidation {
                message: "pack.source must not be empty".to_string(),
            });
        }

        if self.destination.as_os_str().is_empty() {
            return Err(Error::ConfigValidation {
                message: "pack.destination must not be empty".to_string(),
            });
        }

        if self.compression_level > MAX_COMPRESSION_LEVEL {
            return Err(Error::ConfigValidation {
                message: format!(
                    "pack.compression_level ({}) must be between 0 and {MAX_COMPRESSION_LEVEL}",
                    self.compression_level
                ),
            });
        }

        for pattern in &self.exclude_patterns {
            if let Err(e) = regex::Regex::new(pattern) {
                return Err(Error::ConfigValidation {
                    message: format!("invalid regex pattern {pattern:?}: {e}"),
                });
            }
        }

        Ok(())
    }
}
