//! Directory enumeration.
//!
//! # Overview
//!
//! Three entry points feed the detection pipeline:
//! - [`enumerate_recursive`]: every regular file in a subtree (flat mode)
//! - [`enumerate_direct`]: the direct regular-file children of one
//!   directory (per-folder mode)
//! - [`collect_subdirs`]: a directory plus all of its descendant
//!   directories, parents first (the per-folder processing order)
//!
//! Recursive traversal uses [`jwalk`] with sorted children, so enumeration
//! order is deterministic for a given tree. Entries that are not regular
//! files are skipped; entries whose metadata cannot be read are logged to
//! stderr and dropped, never fatal. Only a problem with the root itself
//! (missing, not a directory) aborts the enumeration.

use std::fs;
use std::path::{Path, PathBuf};

use jwalk::WalkDir;

use super::{FileRecord, ScanError};

/// Verify the root is an accessible directory, mapping failures to the
/// typed error a caller can print as a single line.
fn check_root(dir: &Path) -> Result<(), ScanError> {
    let metadata = fs::metadata(dir).map_err(|e| match e.kind() {
        std::io::ErrorKind::NotFound => ScanError::NotFound(dir.to_path_buf()),
        _ => ScanError::Io {
            path: dir.to_path_buf(),
            source: e,
        },
    })?;

    if !metadata.is_dir() {
        return Err(ScanError::NotADirectory(dir.to_path_buf()));
    }

    Ok(())
}

fn sorted_walk(root: &Path) -> WalkDir {
    WalkDir::new(root)
        .follow_links(false)
        .skip_hidden(false)
        .process_read_dir(|_depth, _path, _state, children| {
            // Sort children for deterministic enumeration order
            children.sort_by(|a, b| match (a, b) {
                (Ok(a), Ok(b)) => a.file_name().cmp(b.file_name()),
                (Ok(_), Err(_)) => std::cmp::Ordering::Less,
                (Err(_), Ok(_)) => std::cmp::Ordering::Greater,
                (Err(_), Err(_)) => std::cmp::Ordering::Equal,
            });
        })
}

/// Enumerate every regular file in the subtree rooted at `root`.
///
/// Symlinks are not followed and do not appear in the result. Per-entry
/// failures are logged and skipped.
///
/// # Errors
///
/// Fails only if `root` is missing, unreadable, or not a directory.
pub fn enumerate_recursive(root: &Path) -> Result<Vec<FileRecord>, ScanError> {
    check_root(root)?;

    let mut records = Vec::new();

    for entry in sorted_walk(root) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                log::warn!("Failed to read directory entry under {}: {e}", root.display());
                continue;
            }
        };

        let file_type = entry.file_type();
        if !file_type.is_file() {
            // Directories, symlinks, devices: not candidates.
            continue;
        }

        let path = entry.path();
        match record_for(&path) {
            Some(record) => records.push(record),
            None => continue,
        }
    }

    Ok(records)
}

/// Enumerate the direct children of `dir` that are regular files.
///
/// Results are sorted by path so a directory always enumerates the same
/// way regardless of readdir order.
///
/// # Errors
///
/// Fails only if `dir` is missing, unreadable, or not a directory.
pub fn enumerate_direct(dir: &Path) -> Result<Vec<FileRecord>, ScanError> {
    check_root(dir)?;

    let read_dir = fs::read_dir(dir).map_err(|e| ScanError::Io {
        path: dir.to_path_buf(),
        source: e,
    })?;

    let mut records = Vec::new();

    for entry in read_dir {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                log::warn!("Failed to read directory entry in {}: {e}", dir.display());
                continue;
            }
        };

        match entry.file_type() {
            Ok(file_type) if file_type.is_file() => {}
            Ok(_) => continue,
            Err(e) => {
                log::warn!("Failed to stat {}: {e}", entry.path().display());
                continue;
            }
        }

        if let Some(record) = record_for(&entry.path()) {
            records.push(record);
        }
    }

    records.sort_by(|a, b| a.path.cmp(&b.path));

    Ok(records)
}

/// Collect `root` plus every descendant directory.
///
/// Ordered by ascending path-string length with full path as tie-break, so
/// parents come before their descendants and the per-folder processing
/// order is reproducible.
///
/// # Errors
///
/// Fails only if `root` is missing, unreadable, or not a directory.
pub fn collect_subdirs(root: &Path) -> Result<Vec<PathBuf>, ScanError> {
    check_root(root)?;

    let mut dirs = vec![root.to_path_buf()];

    for entry in sorted_walk(root) {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                log::warn!("Failed to read directory entry under {}: {e}", root.display());
                continue;
            }
        };

        if entry.file_type().is_dir() {
            let path = entry.path();
            if path != root {
                dirs.push(path);
            }
        }
    }

    dirs.sort_by(|a, b| {
        let len_a = a.as_os_str().len();
        let len_b = b.as_os_str().len();
        len_a.cmp(&len_b).then_with(|| a.cmp(b))
    });

    Ok(dirs)
}

fn record_for(path: &Path) -> Option<FileRecord> {
    let metadata = match fs::symlink_metadata(path) {
        Ok(m) => m,
        Err(e) => {
            log::warn!("Failed to read metadata for {}: {e}", path.display());
            return None;
        }
    };

    let modified = match metadata.modified() {
        Ok(t) => t,
        Err(e) => {
            log::warn!("Failed to read mtime for {}: {e}", path.display());
            return None;
        }
    };

    Some(FileRecord::new(
        path.to_path_buf(),
        metadata.len(),
        modified,
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use std::io::Write;
    use tempfile::TempDir;

    fn write_file(dir: &Path, name: &str, content: &[u8]) -> PathBuf {
        let path = dir.join(name);
        File::create(&path).unwrap().write_all(content).unwrap();
        path
    }

    #[test]
    fn test_enumerate_recursive_finds_nested_files() {
        let dir = TempDir::new().unwrap();
        write_file(dir.path(), "a.txt", b"aaa");
        fs::create_dir(dir.path().join("sub")).unwrap();
        write_file(&dir.path().join("sub"), "b.txt", b"bbbb");

        let records = enumerate_recursive(dir.path()).unwrap();

        assert_eq!(records.len(), 2);
        assert!(records.iter().any(|r| r.file_name() == "a.txt" && r.size == 3));
        assert!(records.iter().any(|r| r.file_name() == "b.txt" && r.size == 4));
    }

    #[test]
    fn test_enumerate_recursive_is_deterministic() {
        let dir = TempDir::new().unwrap();
        for name in ["zeta.txt", "alpha.txt", "mid.txt"] {
            write_file(dir.path(), name, b"x");
        }

        let first = enumerate_recursive(dir.path()).unwrap();
        let second = enumerate_recursive(dir.path()).unwrap();

        let paths: Vec<_> = first.iter().map(|r| r.path.clone()).collect();
        let paths_again: Vec<_> = second.iter().map(|r| r.path.clone()).collect();
        assert_eq!(paths, paths_again);
    }

    #[test]
    fn test_enumerate_direct_ignores_subdirectories() {
        let dir = TempDir::new().unwrap();
        write_file(dir.path(), "top.txt", b"top");
        fs::create_dir(dir.path().join("sub")).unwrap();
        write_file(&dir.path().join("sub"), "nested.txt", b"nested");

        let records = enumerate_direct(dir.path()).unwrap();

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].file_name(), "top.txt");
    }

    #[test]
    fn test_enumerate_direct_sorted_by_path() {
        let dir = TempDir::new().unwrap();
        for name in ["c.txt", "a.txt", "b.txt"] {
            write_file(dir.path(), name, b"x");
        }

        let records = enumerate_direct(dir.path()).unwrap();
        let names: Vec<_> = records.iter().map(FileRecord::file_name).collect();

        assert_eq!(names, vec!["a.txt", "b.txt", "c.txt"]);
    }

    #[test]
    fn test_collect_subdirs_parents_first() {
        let dir = TempDir::new().unwrap();
        fs::create_dir_all(dir.path().join("a/deep")).unwrap();
        fs::create_dir(dir.path().join("b")).unwrap();

        let dirs = collect_subdirs(dir.path()).unwrap();

        assert_eq!(dirs[0], dir.path());
        assert_eq!(dirs.len(), 4);
        let deep_pos = dirs
            .iter()
            .position(|d| d.ends_with("a/deep"))
            .unwrap();
        let parent_pos = dirs.iter().position(|d| d.ends_with("a")).unwrap();
        assert!(parent_pos < deep_pos);
    }

    #[test]
    fn test_missing_root_is_typed_error() {
        let result = enumerate_recursive(Path::new("/no/such/dupesweep/dir"));
        assert!(matches!(result, Err(ScanError::NotFound(_))));
    }

    #[test]
    fn test_file_root_is_not_a_directory() {
        let dir = TempDir::new().unwrap();
        let file = write_file(dir.path(), "plain.txt", b"x");

        let result = enumerate_direct(&file);
        assert!(matches!(result, Err(ScanError::NotADirectory(_))));
    }
}
