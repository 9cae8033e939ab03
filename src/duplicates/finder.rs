//! Scan orchestration over one directory scope.
//!
//! # Overview
//!
//! [`DuplicateFinder`] drives the three detection tiers over a single
//! scope: either a whole subtree treated as one flat namespace
//! ([`DuplicateFinder::scan_tree`]) or the direct children of one
//! directory ([`DuplicateFinder::scan_folder`], the per-folder mode unit).
//!
//! Ordering is deterministic for a given enumeration order: size buckets
//! iterate ascending, fingerprint buckets iterate in lexicographic key
//! order, and members keep enumeration order all the way into the emitted
//! groups. The operator-visible 1-based indices rest on this.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use crate::progress::ProgressCallback;
use crate::scanner::{
    enumerate_direct, enumerate_recursive, FileRecord, Fingerprinter, ScanError,
    DEFAULT_SAMPLE_POINTS, DEFAULT_SAMPLE_SIZE,
};

use super::compare::cluster_group;
use super::groups::{bucket_by_size, ScanResult};

/// Configuration for a [`DuplicateFinder`].
#[derive(Clone)]
pub struct FinderConfig {
    sample_points: usize,
    sample_size: usize,
    progress: Option<Arc<dyn ProgressCallback>>,
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl FinderConfig {
    #[must_use]
    pub fn new() -> Self {
        Self {
            sample_points: DEFAULT_SAMPLE_POINTS,
            sample_size: DEFAULT_SAMPLE_SIZE,
            progress: None,
        }
    }

    /// Set the fingerprint sample point count.
    #[must_use]
    pub fn with_sample_points(mut self, points: usize) -> Self {
        self.sample_points = points;
        self
    }

    /// Set the fingerprint window size in bytes.
    #[must_use]
    pub fn with_sample_size(mut self, size: usize) -> Self {
        self.sample_size = size;
        self
    }

    /// Attach a progress callback.
    #[must_use]
    pub fn with_progress(mut self, progress: Arc<dyn ProgressCallback>) -> Self {
        self.progress = Some(progress);
        self
    }
}

impl std::fmt::Debug for FinderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FinderConfig")
            .field("sample_points", &self.sample_points)
            .field("sample_size", &self.sample_size)
            .field("progress", &self.progress.is_some())
            .finish()
    }
}

/// Drives enumeration, bucketing, fingerprinting, and exact comparison
/// over one directory scope.
pub struct DuplicateFinder {
    fingerprinter: Fingerprinter,
    progress: Option<Arc<dyn ProgressCallback>>,
}

impl DuplicateFinder {
    #[must_use]
    pub fn new(config: FinderConfig) -> Self {
        Self {
            fingerprinter: Fingerprinter::new(config.sample_points, config.sample_size),
            progress: config.progress,
        }
    }

    /// Finder with default fingerprint parameters and no progress output.
    #[must_use]
    pub fn with_defaults() -> Self {
        Self::new(FinderConfig::new())
    }

    /// Scan the whole subtree under `root` as one flat namespace.
    ///
    /// # Errors
    ///
    /// Fails only if `root` itself cannot be enumerated; per-file
    /// problems are logged and the files dropped.
    pub fn scan_tree(&self, root: &Path) -> Result<ScanResult, ScanError> {
        log::debug!("Scanning tree at {}", root.display());
        self.phase_start("enumerate");
        let files = enumerate_recursive(root);
        self.phase_end("enumerate");
        Ok(self.detect(files?))
    }

    /// Scan only the direct children of `dir` (per-folder mode unit).
    ///
    /// # Errors
    ///
    /// Fails only if `dir` itself cannot be enumerated.
    pub fn scan_folder(&self, dir: &Path) -> Result<ScanResult, ScanError> {
        log::debug!("Scanning folder {}", dir.display());
        let files = enumerate_direct(dir)?;
        Ok(self.detect(files))
    }

    /// Run tiers two and three over an enumerated file list.
    fn detect(&self, files: Vec<FileRecord>) -> ScanResult {
        let (buckets, stats) = bucket_by_size(files);

        let mut result = ScanResult {
            groups: Vec::new(),
            total_files: stats.total_files,
            total_bytes: stats.total_bytes,
        };

        // Tier two: split size buckets by sparse fingerprint. BTreeMap
        // keys keep the downstream group order deterministic.
        self.phase_start("fingerprint");
        let mut fingerprint_buckets: BTreeMap<String, Vec<FileRecord>> = BTreeMap::new();
        let mut fingerprinted = 0usize;

        for members in buckets.into_values() {
            for record in members {
                match self.fingerprinter.fingerprint(&record) {
                    Ok(signature) => {
                        fingerprint_buckets.entry(signature).or_default().push(record);
                    }
                    Err(e) => {
                        log::warn!("Fingerprint failed for {}: {e}", record.path.display());
                    }
                }
                fingerprinted += 1;
                self.file_tick(fingerprinted);
            }
        }
        self.phase_end("fingerprint");

        // Tier three: byte-exact confirmation within each surviving bucket.
        self.phase_start("verify");
        let mut verified = 0usize;

        for candidates in fingerprint_buckets.into_values() {
            if candidates.len() < 2 {
                continue;
            }
            verified += candidates.len();
            self.file_tick(verified);
            result.groups.extend(cluster_group(&candidates));
        }
        self.phase_end("verify");

        log::debug!(
            "Scan produced {} duplicate group(s) from {} file(s)",
            result.groups.len(),
            result.total_files
        );

        result
    }

    fn phase_start(&self, phase: &str) {
        if let Some(p) = &self.progress {
            p.on_phase_start(phase);
        }
    }

    fn file_tick(&self, count: usize) {
        if let Some(p) = &self.progress {
            p.on_file(count);
        }
    }

    fn phase_end(&self, phase: &str) {
        if let Some(p) = &self.progress {
            p.on_phase_end(phase);
        }
    }
}
