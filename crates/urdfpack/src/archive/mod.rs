//! Zip packaging of a source folder.
//!
//! The [`Packer`] compresses one folder into one archive:
//!
//! - the folder is walked recursively in file-name order, so the same tree
//!   always produces the same entry order
//! - files and directories matching an exclude pattern are skipped, and an
//!   excluded directory is not descended into
//! - directories become explicit entries
//! - symbolic links are followed, so a linked folder is packed as a copy;
//!   a link back to one of its own ancestors is skipped
//! - with `include_root_dir`, entries are prefixed with the folder's own name
//!
//! The archive is first written to a sibling `.partial` file and renamed over
//! the destination only once it is complete.

mod filter;

use std::fs::{self, File};
use std::io::{self, BufReader, BufWriter};
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::{debug, info, warn};
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::config::PackConfig;
use crate::error::{Error, Result};

pub use filter::ExcludeFilter;

/// Outcome of a successful [`Packer::pack`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PackSummary {
    /// The folder that was packed.
    pub source: PathBuf,
    /// The archive that was written.
    pub destination: PathBuf,
    /// Number of file entries.
    pub files: usize,
    /// Number of directory entries.
    pub directories: usize,
    /// Files and directories skipped by the exclude patterns.
    pub excluded: usize,
    /// Total size of the packed files before compression.
    pub uncompressed_bytes: u64,
    /// Size of the archive on disk.
    pub archive_bytes: u64,
    /// BLAKE3 digest of the archive, hex encoded.
    pub blake3: String,
    /// When the archive was completed.
    pub created_at: DateTime<Utc>,
}

/// One entry to be written.
#[derive(Debug)]
struct Entry {
    path: PathBuf,
    name: String,
    is_dir: bool,
}

/// Packs a folder into a zip archive.
#[derive(Debug)]
pub struct Packer {
    config: PackConfig,
    filter: ExcludeFilter,
}

impl Packer {
    /// Create a packer for `config`.
    ///
    /// Invalid exclude patterns are logged and ignored; use
    /// [`PackConfig::validate`] to reject them up front.
    #[must_use]
    pub fn new(config: PackConfig) -> Self {
        let filter = ExcludeFilter::new(&config.exclude_patterns);
        Self { config, filter }
    }

    /// The configuration this packer runs with.
    #[must_use]
    pub fn config(&self) -> &PackConfig {
        &self.config
    }

    /// Compress the source folder into the destination archive.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SourceNotFound`] if the source is not a directory,
    /// [`Error::Walk`] if it cannot be traversed, and I/O or zip errors if
    /// the archive cannot be written. On error any partial output is
    /// removed and an existing destination is left untouched.
    pub fn pack(&self) -> Result<PackSummary> {
        let source = &self.config.source;
        if !source.is_dir() {
            return Err(Error::SourceNotFound {
                path: source.clone(),
            });
        }

        let destination = &self.config.destination;
        if let Some(parent) = destination.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| Error::DirectoryCreate {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }

        let partial = partial_path(destination);
        let skip = [absolute(destination), absolute(&partial)];
        let (entries, excluded) = self.collect_entries(&skip)?;

        debug!(
            source = %source.display(),
            entries = entries.len(),
            excluded,
            "Collected archive entries"
        );

        let uncompressed_bytes = match self.write_archive(&partial, &entries) {
            Ok(bytes) => bytes,
            Err(e) => {
                let _ = fs::remove_file(&partial);
                return Err(e);
            }
        };
        if let Err(e) = fs::rename(&partial, destination) {
            let _ = fs::remove_file(&partial);
            return Err(e.into());
        }

        let (archive_bytes, digest) = digest_file(destination)?;

        let directories = entries.iter().filter(|e| e.is_dir).count();
        let summary = PackSummary {
            source: source.clone(),
            destination: destination.clone(),
            files: entries.len() - directories,
            directories,
            excluded,
            uncompressed_bytes,
            archive_bytes,
            blake3: digest,
            created_at: Utc::now(),
        };

        info!(
            destination = %destination.display(),
            files = summary.files,
            directories = summary.directories,
            bytes = summary.archive_bytes,
            "Archive written"
        );
        Ok(summary)
    }

    /// Walk the source, returning entries to write and the number skipped.
    fn collect_entries(&self, skip: &[Option<PathBuf>]) -> Result<(Vec<Entry>, usize)> {
        let source = &self.config.source;
        let prefix = if self.config.include_root_dir {
            root_name(source)
        } else {
            None
        };

        let mut entries = Vec::new();
        if let Some(prefix) = &prefix {
            entries.push(Entry {
                path: source.clone(),
                name: format!("{prefix}/"),
                is_dir: true,
            });
        }

        let mut excluded = 0;
        let walker = WalkDir::new(source)
            .min_depth(1)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_entry(|entry| {
                let relative = entry.path().strip_prefix(source).unwrap_or(entry.path());
                if self.filter.is_excluded(relative) {
                    excluded += 1;
                    return false;
                }
                true
            });

        for item in walker {
            let item = match item {
                Ok(item) => item,
                Err(e) if e.loop_ancestor().is_some() => {
                    warn!(path = ?e.path(), "Skipping symbolic link that loops back to an ancestor");
                    continue;
                }
                Err(e) => {
                    return Err(Error::Walk {
                        path: source.clone(),
                        source: e,
                    })
                }
            };

            if skip.iter().flatten().any(|s| Some(s) == absolute(item.path()).as_ref()) {
                continue;
            }

            let relative = item.path().strip_prefix(source).map_err(|_| {
                Error::internal(format!(
                    "walked path {} is outside {}",
                    item.path().display(),
                    source.display()
                ))
            })?;

            let mut name = filter::to_slash(relative);
            if let Some(prefix) = &prefix {
                name = format!("{prefix}/{name}");
            }

            let is_dir = item.file_type().is_dir();
            if is_dir {
                name.push('/');
            }

            entries.push(Entry {
                path: item.path().to_path_buf(),
                name,
                is_dir,
            });
        }

        Ok((entries, excluded))
    }

    /// Write `entries` into a new archive at `path`, returning the bytes read.
    fn write_archive(&self, path: &Path, entries: &[Entry]) -> Result<u64> {
        let file = File::create(path)?;
        let mut zip = ZipWriter::new(BufWriter::new(file));
        let options = self.file_options();
        let mut total = 0;

        for entry in entries {
            if entry.is_dir {
                debug!(entry = %entry.name, "Adding directory");
                zip.add_directory(entry.name.as_str(), options)?;
                continue;
            }

            debug!(entry = %entry.name, "Adding file");
            zip.start_file(entry.name.as_str(), options)?;
            let mut reader = BufReader::new(File::open(&entry.path).map_err(|e| {
                Error::FileRead {
                    path: entry.path.clone(),
                    source: e,
                }
            })?);
            total += io::copy(&mut reader, &mut zip).map_err(|e| Error::FileRead {
                path: entry.path.clone(),
                source: e,
            })?;
        }

        let writer = zip.finish()?;
        writer.into_inner().map_err(|e| Error::Io(e.into_error()))?;
        Ok(total)
    }

    /// Entry options; timestamps are pinned so identical trees give
    /// identical archives.
    fn file_options(&self) -> SimpleFileOptions {
        let options = SimpleFileOptions::default().last_modified_time(zip::DateTime::default());
        match self.config.compression_level {
            0 => options.compression_method(CompressionMethod::Stored),
            level => options
                .compression_method(CompressionMethod::Deflated)
                .compression_level(Some(i64::from(level))),
        }
    }
}

/// Size and hex BLAKE3 digest of a file, hashed in a streaming pass.
fn digest_file(path: &Path) -> Result<(u64, String)> {
    let read_error = |e| Error::FileRead {
        path: path.to_path_buf(),
        source: e,
    };
    let file = File::open(path).map_err(read_error)?;
    let size = file.metadata().map_err(read_error)?.len();
    let mut hasher = blake3::Hasher::new();
    hasher.update_reader(file).map_err(read_error)?;
    Ok((size, hasher.finalize().to_hex().to_string()))
}

/// `archive.zip` becomes `archive.zip.partial` in the same directory.
fn partial_path(destination: &Path) -> PathBuf {
    let mut name = destination
        .file_name()
        .map(std::ffi::OsStr::to_os_string)
        .unwrap_or_default();
    name.push(".partial");
    destination.with_file_name(name)
}

/// Name of the source folder itself, resolving `.` and the like.
fn root_name(source: &Path) -> Option<String> {
    let resolved = fs::canonicalize(source).ok()?;
    resolved
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
}

/// Best-effort absolute form of a path whose file may not exist yet.
fn absolute(path: &Path) -> Option<PathBuf> {
    let file_name = path.file_name()?;
    let parent = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    Some(fs::canonicalize(parent).ok()?.join(file_name))
}
