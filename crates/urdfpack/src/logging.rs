//! Logging setup for urdfpack.
//!
//! Log output goes to stderr through `tracing-subscriber`, so command output
//! on stdout stays machine-readable. The `-v`/`-q` flags pick a default
//! filter; `RUST_LOG` replaces it entirely.

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

/// How much the binary reports, from the `-v` and `-q` flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum Verbosity {
    /// Errors only. Human-readable summaries on stdout are suppressed too.
    Quiet,
    /// Completed operations and warnings.
    #[default]
    Normal,
    /// Per-element parse and pack steps.
    Verbose,
    /// Everything, including dependency debug output.
    Trace,
}

impl Verbosity {
    /// Resolve the command-line flags; `quiet` wins over any `-v`.
    #[must_use]
    pub fn from_flags(verbose: u8, quiet: bool) -> Self {
        match (quiet, verbose) {
            (true, _) => Self::Quiet,
            (false, 0) => Self::Normal,
            (false, 1) => Self::Verbose,
            (false, _) => Self::Trace,
        }
    }

    /// Default `EnvFilter` directive for this level.
    ///
    /// Warnings from dependencies stay visible at every level but quiet.
    #[must_use]
    pub fn directive(self) -> &'static str {
        match self {
            Self::Quiet => "error",
            Self::Normal => "warn,urdfpack=info",
            Self::Verbose => "warn,urdfpack=debug",
            Self::Trace => "debug,urdfpack=trace",
        }
    }

    /// Whether human-readable summaries should be printed.
    #[must_use]
    pub fn shows_summaries(self) -> bool {
        self != Self::Quiet
    }
}

/// Initialize the logging system.
///
/// Call once at startup; later calls leave the first subscriber in place.
/// `RUST_LOG`, when set and valid, overrides the verbosity default.
///
/// ```no_run
/// use urdfpack::{init_logging, logging::Verbosity};
///
/// init_logging(Verbosity::from_flags(1, false));
/// ```
pub fn init_logging(verbosity: Verbosity) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(verbosity.directive()));

    // Targets from -v up.
    let show_target = verbosity >= Verbosity::Verbose;
    let subscriber = tracing_subscriber::registry().with(env_filter).with(
        fmt::layer()
            .with_writer(std::io::stderr)
            .with_target(show_target)
            .without_time(),
    );

    let _ = subscriber.try_init();
}

/// Quiet subscriber for unit tests; only warnings reach the test output.
#[cfg(test)]
pub fn init_test_logging() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter("warn")
        .with_test_writer()
        .try_init();
}
