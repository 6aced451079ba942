//! Shared logic behind the description commands.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::model::Robot;
use crate::urdf;

/// Outcome of `fmt --check` for a description that survives the round trip.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundTrip {
    /// The file already is the canonical output, byte for byte.
    Canonical,
    /// Rewriting would change the text but not the robot.
    Preserved,
}

/// The file a description command operates on: `file` if given, else the
/// configured description path.
#[must_use]
pub fn description_path(config: &Config, file: Option<&Path>) -> PathBuf {
    file.map_or_else(|| config.description.path.clone(), Path::to_path_buf)
}

/// Reparse `formatted` and require the same graph as `robot`, which was
/// read from `path`.
///
/// # Errors
///
/// Returns [`Error::RoundTrip`] if the graphs differ, or a parse or read
/// error if `formatted` or `path` cannot be read back.
pub fn check_round_trip(path: &Path, robot: &Robot, formatted: &str) -> Result<RoundTrip> {
    let reparsed = urdf::parse_str(formatted)?;
    if !reparsed.same_graph(robot) {
        return Err(Error::RoundTrip {
            path: path.to_path_buf(),
        });
    }

    let original = fs::read_to_string(path).map_err(|source| Error::FileRead {
        path: path.to_path_buf(),
        source,
    })?;
    let outcome = if original == formatted {
        RoundTrip::Canonical
    } else {
        RoundTrip::Preserved
    };
    debug!(path = %path.display(), ?outcome, "Round trip checked");
    Ok(outcome)
}
