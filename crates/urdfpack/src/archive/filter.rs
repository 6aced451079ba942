//! Path exclusion for the packer.

use std::path::{Component, Path};

use regex::Regex;
use tracing::{trace, warn};

/// Regex-based exclusion over paths relative to the packed folder.
///
/// Paths are matched in `/`-separated form on every platform, so the same
/// patterns work everywhere.
#[derive(Debug, Clone, Default)]
pub struct ExcludeFilter {
    patterns: Vec<Regex>,
}

impl ExcludeFilter {
    /// Compile `patterns`, dropping any that are not valid regexes.
    #[must_use]
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Self {
        let patterns = patterns
            .iter()
            .map(AsRef::as_ref)
            .filter_map(|p: &str| match Regex::new(p) {
                Ok(r) => Some(r),
                Err(e) => {
                    warn!(pattern = %p, error = %e, "Invalid exclude pattern");
                    None
                }
            })
            .collect();
        Self { patterns }
    }

    /// Number of active patterns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    /// True when nothing is excluded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Whether `relative` should be left out of the archive.
    #[must_use]
    pub fn is_excluded(&self, relative: &Path) -> bool {
        if self.patterns.is_empty() {
            return false;
        }
        let key = to_slash(relative);
        let hit = self.patterns.iter().find(|r| r.is_match(&key));
        if let Some(pattern) = hit {
            trace!(path = %key, pattern = %pattern.as_str(), "Excluded");
        }
        hit.is_some()
    }
}

/// Join the normal components of `path` with `/`.
pub(crate) fn to_slash(path: &Path) -> String {
    path.components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy()),
            _ => None,
        })
        .collect::<Vec<_>>()
        .join("/")
}
