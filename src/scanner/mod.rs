//! Filesystem scanning: enumeration and content fingerprinting.
//!
//! This module owns the filesystem-facing half of the pipeline:
//! - [`walker`]: directory enumeration (recursive, direct, and subfolder
//!   collection for per-folder mode)
//! - [`fingerprint`]: the sparse positional content fingerprint used to
//!   split same-size buckets without reading files whole
//!
//! Only regular files participate. Symlinks, directories, devices, and
//! entries whose metadata cannot be read are skipped; skips are logged, not
//! fatal.

pub mod fingerprint;
pub mod walker;

use std::path::PathBuf;
use std::time::SystemTime;

pub use fingerprint::{
    FingerprintError, Fingerprinter, DEFAULT_SAMPLE_POINTS, DEFAULT_SAMPLE_SIZE,
};
pub use walker::{collect_subdirs, enumerate_direct, enumerate_recursive};

/// Metadata for a discovered regular file.
///
/// Created once during enumeration and immutable for the rest of the scan;
/// every later pipeline stage refers back to this snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileRecord {
    /// Path as produced by enumeration
    pub path: PathBuf,
    /// File size in bytes at enumeration time
    pub size: u64,
    /// Last modification time at enumeration time
    pub modified: SystemTime,
}

impl FileRecord {
    #[must_use]
    pub fn new(path: PathBuf, size: u64, modified: SystemTime) -> Self {
        Self {
            path,
            size,
            modified,
        }
    }

    /// Final path component as a display string.
    #[must_use]
    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| self.path.to_string_lossy().into_owned())
    }

    /// Byte length of the final path component.
    ///
    /// This is the quantity the longest-name/shortest-name retention
    /// strategies compare.
    #[must_use]
    pub fn file_name_len(&self) -> usize {
        self.path
            .file_name()
            .map(|n| n.as_encoded_bytes().len())
            .unwrap_or(0)
    }
}

/// Errors that can occur while scanning a directory.
#[derive(thiserror::Error, Debug)]
pub enum ScanError {
    /// The target path was not found.
    #[error("path not found: {0}")]
    NotFound(PathBuf),

    /// The target path exists but is not a directory.
    #[error("not a directory: {0}")]
    NotADirectory(PathBuf),

    /// An I/O error occurred while reading the directory itself.
    #[error("I/O error for {path}: {source}")]
    Io {
        /// Path where the error occurred
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
