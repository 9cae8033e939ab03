//! Byte-exact comparison and candidate clustering.
//!
//! # Overview
//!
//! The final detection tier. Two files are duplicates iff they have the
//! same length and the same bytes at every offset; that is exactly what
//! [`files_identical`] checks, in 64 KiB blocks, stopping at the first
//! difference. Nothing upstream of this tier can put a file into a
//! [`DuplicateGroup`].
//!
//! Any I/O failure during a pairwise comparison demotes the pair to "not
//! equal". The conservative direction matters: a read error can hide a
//! duplicate (harmless, the file just stays), but must never invent one
//! (that could delete unique data).

use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};

use super::groups::DuplicateGroup;
use crate::scanner::FileRecord;

/// Block size for pairwise comparison reads.
const COMPARE_BLOCK_SIZE: usize = 64 * 1024;

/// Errors that can occur during byte-exact comparison.
#[derive(thiserror::Error, Debug)]
pub enum CompareError {
    /// A file could not be opened or statted.
    #[error("cannot open {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A read returned fewer bytes than the file length promised.
    #[error("cannot read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

fn open_err(path: &Path) -> impl FnOnce(std::io::Error) -> CompareError + '_ {
    move |source| CompareError::Open {
        path: path.to_path_buf(),
        source,
    }
}

fn read_err(path: &Path) -> impl FnOnce(std::io::Error) -> CompareError + '_ {
    move |source| CompareError::Read {
        path: path.to_path_buf(),
        source,
    }
}

/// Compare two files byte-by-byte.
///
/// Sizes are re-read from the filesystem so a file that changed since
/// enumeration cannot slip through on stale metadata. Zero-length files
/// are equal to each other by definition.
///
/// # Errors
///
/// Fails if either file cannot be statted, opened, or read in full; the
/// caller decides whether that means "skip the pair" or something worse.
pub fn files_identical(a: &Path, b: &Path) -> Result<bool, CompareError> {
    let size_a = std::fs::metadata(a).map_err(open_err(a))?.len();
    let size_b = std::fs::metadata(b).map_err(open_err(b))?.len();

    if size_a != size_b {
        return Ok(false);
    }
    if size_a == 0 {
        return Ok(true);
    }

    let mut file_a = File::open(a).map_err(open_err(a))?;
    let mut file_b = File::open(b).map_err(open_err(b))?;

    let mut buf_a = vec![0u8; COMPARE_BLOCK_SIZE];
    let mut buf_b = vec![0u8; COMPARE_BLOCK_SIZE];

    let mut remaining = size_a;
    while remaining > 0 {
        let to_read = COMPARE_BLOCK_SIZE.min(remaining as usize);

        file_a.read_exact(&mut buf_a[..to_read]).map_err(read_err(a))?;
        file_b.read_exact(&mut buf_b[..to_read]).map_err(read_err(b))?;

        if buf_a[..to_read] != buf_b[..to_read] {
            return Ok(false);
        }

        remaining -= to_read as u64;
    }

    Ok(true)
}

/// Cluster one fingerprint bucket into confirmed duplicate groups.
///
/// Greedy in input order: each unprocessed record anchors a group, every
/// later unprocessed record that compares byte-identical joins it. Groups
/// of fewer than two members are not emitted. A comparison failure is
/// logged and counts as "not equal" for that pair only.
#[must_use]
pub fn cluster_group(candidates: &[FileRecord]) -> Vec<DuplicateGroup> {
    let mut groups = Vec::new();
    let mut processed = vec![false; candidates.len()];

    for i in 0..candidates.len() {
        if processed[i] {
            continue;
        }

        let mut members = vec![candidates[i].clone()];
        processed[i] = true;

        for j in (i + 1)..candidates.len() {
            if processed[j] {
                continue;
            }

            match files_identical(&candidates[i].path, &candidates[j].path) {
                Ok(true) => {
                    members.push(candidates[j].clone());
                    processed[j] = true;
                }
                Ok(false) => {}
                Err(e) => {
                    log::warn!(
                        "Comparison failed for {}: {e}",
                        candidates[j].path.display()
                    );
                }
            }
        }

        if members.len() > 1 {
            groups.push(DuplicateGroup::new(candidates[i].size, members));
        }
    }

    groups
}
