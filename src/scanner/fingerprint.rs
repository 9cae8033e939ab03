//! Sparse positional content fingerprint.
//!
//! # Overview
//!
//! The fingerprint is the middle tier of duplicate detection: a cheap
//! signature that splits a same-size bucket without reading the files
//! whole. It samples a handful of fixed windows (start, evenly spaced
//! interior points, end) and reduces each window with a rolling
//! `h = h * 31 + byte` hash over wrapping `u32`.
//!
//! Equal fingerprints are necessary but not sufficient for file equality;
//! the byte-exact comparator always has the last word. Unequal
//! fingerprints prove inequality, which is what makes the stage safe to
//! use as a filter.
//!
//! Files no larger than twice the sample window take the `SMALL` path:
//! the windows would overlap most of the file anyway, so they skip
//! straight to the exact comparator with the literal fingerprint
//! `"{size}|SMALL"`.

use std::fs::File;
use std::io::{Read, Seek, SeekFrom};
use std::path::{Path, PathBuf};

use super::FileRecord;

/// Default number of interior sample points.
pub const DEFAULT_SAMPLE_POINTS: usize = 4;

/// Default sample window size in bytes.
pub const DEFAULT_SAMPLE_SIZE: usize = 4096;

/// Errors that can occur while fingerprinting a file.
#[derive(thiserror::Error, Debug)]
pub enum FingerprintError {
    /// The file could not be opened for reading.
    #[error("cannot open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A sample window could not be read in full.
    ///
    /// Short reads are treated the same as hard I/O failures: the file is
    /// excluded from further comparison rather than fingerprinted from
    /// partial data.
    #[error("cannot read {path} at offset {offset}: {source}")]
    Read {
        path: PathBuf,
        offset: u64,
        #[source]
        source: std::io::Error,
    },
}

/// Sparse fingerprint generator.
///
/// Holds the sampling parameters for one scan. The fingerprint of a file is
/// fully determined by its contents plus these two numbers, so records with
/// different parameters must never share a bucket.
#[derive(Debug, Clone, Copy)]
pub struct Fingerprinter {
    sample_points: usize,
    sample_size: usize,
}

impl Default for Fingerprinter {
    fn default() -> Self {
        Self {
            sample_points: DEFAULT_SAMPLE_POINTS,
            sample_size: DEFAULT_SAMPLE_SIZE,
        }
    }
}

impl Fingerprinter {
    /// Create a fingerprinter with explicit parameters.
    ///
    /// `sample_size` is clamped to at least 1 byte; a zero-byte window
    /// could never distinguish anything.
    #[must_use]
    pub fn new(sample_points: usize, sample_size: usize) -> Self {
        Self {
            sample_points,
            sample_size: sample_size.max(1),
        }
    }

    /// Largest file size that takes the `SMALL` path.
    #[must_use]
    pub fn small_threshold(&self) -> u64 {
        2 * self.sample_size as u64
    }

    /// Compute the fingerprint string for `record`.
    ///
    /// Returns `"{size}|SMALL"` for files at or below the small threshold
    /// (no I/O), otherwise `"{size}|h0|h1|…|"` with one hash per distinct
    /// sample offset, in offset order and with the trailing separator.
    ///
    /// # Errors
    ///
    /// Fails if the file cannot be opened or any sample window cannot be
    /// read in full.
    pub fn fingerprint(&self, record: &FileRecord) -> Result<String, FingerprintError> {
        let size = record.size;

        if size <= self.small_threshold() {
            return Ok(format!("{size}|SMALL"));
        }

        let offsets = self.sample_offsets(size);
        let mut file = File::open(&record.path).map_err(|e| FingerprintError::Open {
            path: record.path.clone(),
            source: e,
        })?;

        let mut buffer = vec![0u8; self.sample_size];
        let mut signature = format!("{size}|");

        for offset in offsets {
            let window = self.sample_size.min((size - offset) as usize);
            let hash = hash_window(&mut file, &record.path, offset, &mut buffer[..window])?;
            signature.push_str(&hash.to_string());
            signature.push('|');
        }

        Ok(signature)
    }

    /// Ordered, deduplicated sample offsets for a file of `size` bytes.
    ///
    /// `{0}` plus `sample_points` evenly spaced interior offsets plus a
    /// window flush with the end of the file.
    fn sample_offsets(&self, size: u64) -> Vec<u64> {
        let mut offsets = vec![0];

        for i in 1..=self.sample_points as u64 {
            offsets.push(size * i / (self.sample_points as u64 + 1));
        }

        offsets.push(size - (self.sample_size as u64).min(size));

        offsets.sort_unstable();
        offsets.dedup();
        offsets
    }
}

fn hash_window(
    file: &mut File,
    path: &Path,
    offset: u64,
    buffer: &mut [u8],
) -> Result<u32, FingerprintError> {
    let read_err = |source| FingerprintError::Read {
        path: path.to_path_buf(),
        offset,
        source,
    };

    file.seek(SeekFrom::Start(offset)).map_err(read_err)?;
    file.read_exact(buffer).map_err(read_err)?;

    let mut hash: u32 = 0;
    for &byte in buffer.iter() {
        hash = hash.wrapping_mul(31).wrapping_add(u32::from(byte));
    }

    Ok(hash)
}
