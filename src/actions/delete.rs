//! Plan application: deleting the copies the operator chose not to keep.
//!
//! # Overview
//!
//! [`apply_plan`] walks a [`RetentionPlan`] over its [`ScanResult`] and
//! deletes every member not in its group's keep set. Kept members are
//! never touched, and the plan's non-empty invariant means every group
//! retains at least one copy no matter what the filesystem does.
//!
//! In dry-run mode nothing is deleted; the same walk emits "would delete"
//! lines and accumulates the projected byte count instead. A failed
//! deletion is logged and counted, and the walk continues.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use crate::console::{format_size, Console};
use crate::duplicates::ScanResult;
use crate::retention::RetentionPlan;

/// Error type for deletion operations.
#[derive(thiserror::Error, Debug)]
pub enum DeleteError {
    /// File was not found (may have been deleted or moved since the scan).
    #[error("file not found: {0}")]
    NotFound(PathBuf),

    /// Permission denied when attempting to delete.
    #[error("permission denied: {0}")]
    PermissionDenied(PathBuf),

    /// General I/O error.
    #[error("I/O error for {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Delete a single file, mapping I/O failures to the typed error.
///
/// # Errors
///
/// Fails if the file is missing, protected, or the unlink itself fails.
pub fn delete_file(path: &Path) -> Result<(), DeleteError> {
    fs::remove_file(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => DeleteError::NotFound(path.to_path_buf()),
        io::ErrorKind::PermissionDenied => DeleteError::PermissionDenied(path.to_path_buf()),
        _ => DeleteError::Io {
            path: path.to_path_buf(),
            source: e,
        },
    })
}

/// Outcome of applying a retention plan.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeletionReport {
    /// Files deleted (or, in dry-run, that would have been)
    pub deleted: usize,
    /// Deletions that failed
    pub failed: usize,
    /// Bytes reclaimed (projected in dry-run)
    pub bytes_reclaimed: u64,
    /// Whether this was a simulation
    pub dry_run: bool,
}

impl DeletionReport {
    /// One-line human summary.
    #[must_use]
    pub fn summary(&self) -> String {
        if self.dry_run {
            format!(
                "Would delete {} file(s), reclaiming {} (projected)",
                self.deleted,
                format_size(self.bytes_reclaimed)
            )
        } else if self.failed > 0 {
            format!(
                "Deleted {} file(s), {} failed, reclaimed {}",
                self.deleted,
                self.failed,
                format_size(self.bytes_reclaimed)
            )
        } else {
            format!(
                "Deleted {} file(s), reclaimed {}",
                self.deleted,
                format_size(self.bytes_reclaimed)
            )
        }
    }
}

/// Apply a retention plan to the filesystem.
///
/// Walks groups in order and members in index order, deleting every member
/// whose 1-based index is not in the group's keep set. Kept members are
/// never touched. Failures are logged, counted, and skipped.
pub fn apply_plan(
    console: &mut dyn Console,
    result: &ScanResult,
    plan: &RetentionPlan,
    dry_run: bool,
) -> DeletionReport {
    console.emit("\nDeleting duplicate files...");

    let mut report = DeletionReport {
        dry_run,
        ..DeletionReport::default()
    };

    for (g, group) in result.groups.iter().enumerate() {
        for (i, file) in group.files.iter().enumerate() {
            if plan.is_kept(g, i + 1) {
                continue;
            }

            if dry_run {
                console.emit(&format!(
                    "✓ [dry-run] would delete: [{}] {}",
                    i + 1,
                    file.file_name()
                ));
                report.deleted += 1;
                report.bytes_reclaimed += file.size;
                continue;
            }

            match delete_file(&file.path) {
                Ok(()) => {
                    console.emit(&format!("✓ deleted: [{}] {}", i + 1, file.file_name()));
                    log::debug!("Deleted {}", file.path.display());
                    report.deleted += 1;
                    report.bytes_reclaimed += file.size;
                }
                Err(e) => {
                    console.emit_error(&format!("✗ delete failed: [{}] {e}", i + 1));
                    log::warn!("Delete failed: {e}");
                    report.failed += 1;
                }
            }
        }
    }

    console.emit("");
    console.emit(&"=".repeat(50));
    console.emit(&report.summary());
    if report.dry_run {
        console.emit("Note: dry run, no files were actually deleted");
    }
    console.emit(&"=".repeat(50));

    report
}
