//! Size bucketing and duplicate group types.
//!
//! # Overview
//!
//! Size bucketing is the first detection tier: files are grouped by exact
//! byte length, and buckets with a single member are discarded, since a
//! file with a unique size cannot have a duplicate. This eliminates most
//! files without any file I/O.
//!
//! The module also defines [`DuplicateGroup`] (the confirmed output of the
//! exact comparator) and [`ScanResult`] (everything one scan produced).
//!
//! # Example
//!
//! ```
//! use dupesweep::duplicates::bucket_by_size;
//! use dupesweep::scanner::FileRecord;
//! use std::path::PathBuf;
//! use std::time::SystemTime;
//!
//! let files = vec![
//!     FileRecord::new(PathBuf::from("/a.txt"), 100, SystemTime::now()),
//!     FileRecord::new(PathBuf::from("/b.txt"), 100, SystemTime::now()),
//!     FileRecord::new(PathBuf::from("/c.txt"), 200, SystemTime::now()),
//! ];
//!
//! let (buckets, stats) = bucket_by_size(files);
//!
//! // Only the 100-byte bucket survives; the 200-byte file is unique.
//! assert_eq!(buckets.len(), 1);
//! assert_eq!(buckets[&100].len(), 2);
//! assert_eq!(stats.eliminated_unique, 1);
//! ```

use std::collections::BTreeMap;

use crate::scanner::FileRecord;

/// A group of files proven byte-identical by the exact comparator.
///
/// Always has at least two members. Member order is enumeration order and
/// is the basis of every 1-based index the operator sees.
#[derive(Debug, Clone)]
pub struct DuplicateGroup {
    /// Byte length shared by every member
    pub size: u64,
    /// Members, in enumeration order
    pub files: Vec<FileRecord>,
}

impl DuplicateGroup {
    #[must_use]
    pub fn new(size: u64, files: Vec<FileRecord>) -> Self {
        Self { size, files }
    }

    /// Number of files in this group.
    #[must_use]
    pub fn len(&self) -> usize {
        self.files.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    /// Copies beyond the first (what default retention would delete).
    #[must_use]
    pub fn duplicate_count(&self) -> usize {
        self.files.len().saturating_sub(1)
    }

    /// Bytes freed if all copies but one were deleted.
    #[must_use]
    pub fn wasted_space(&self) -> u64 {
        self.size * self.duplicate_count() as u64
    }
}

/// Everything one scan produced.
#[derive(Debug, Clone, Default)]
pub struct ScanResult {
    /// Confirmed duplicate groups, in pipeline emission order
    pub groups: Vec<DuplicateGroup>,
    /// Regular files enumerated in this scope
    pub total_files: usize,
    /// Combined size of the enumerated files
    pub total_bytes: u64,
}

impl ScanResult {
    /// Whether the scan found any duplicates at all.
    #[must_use]
    pub fn has_duplicates(&self) -> bool {
        !self.groups.is_empty()
    }

    /// Files that default retention (keep the first of each group) would
    /// delete.
    #[must_use]
    pub fn deletable_files(&self) -> usize {
        self.groups.iter().map(DuplicateGroup::duplicate_count).sum()
    }

    /// Bytes that default retention would reclaim.
    #[must_use]
    pub fn reclaimable_bytes(&self) -> u64 {
        self.groups.iter().map(DuplicateGroup::wasted_space).sum()
    }
}

/// Statistics from the size-bucketing tier.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BucketStats {
    /// Files fed into the bucketer
    pub total_files: usize,
    /// Combined size of those files
    pub total_bytes: u64,
    /// Distinct sizes observed
    pub unique_sizes: usize,
    /// Files discarded because their size was unique
    pub eliminated_unique: usize,
    /// Files forwarded to the fingerprint tier
    pub candidate_files: usize,
    /// Buckets forwarded to the fingerprint tier
    pub candidate_buckets: usize,
}

/// Group files by exact byte length, keeping only buckets with 2+ members.
///
/// Zero-length files participate like any others: two empty files are a
/// legitimate duplicate pair. Within a bucket, input order is preserved;
/// buckets iterate in ascending size order.
#[must_use]
pub fn bucket_by_size(
    files: impl IntoIterator<Item = FileRecord>,
) -> (BTreeMap<u64, Vec<FileRecord>>, BucketStats) {
    let mut buckets: BTreeMap<u64, Vec<FileRecord>> = BTreeMap::new();
    let mut stats = BucketStats::default();

    for file in files {
        stats.total_files += 1;
        stats.total_bytes += file.size;
        buckets.entry(file.size).or_default().push(file);
    }

    stats.unique_sizes = buckets.len();

    buckets.retain(|size, members| {
        if members.len() < 2 {
            stats.eliminated_unique += 1;
            log::debug!(
                "Eliminated unique size {size}: {}",
                members[0].path.display()
            );
            false
        } else {
            stats.candidate_files += members.len();
            stats.candidate_buckets += 1;
            true
        }
    });

    log::debug!(
        "Size bucketing: {} files, {} candidates in {} buckets",
        stats.total_files,
        stats.candidate_files,
        stats.candidate_buckets
    );

    (buckets, stats)
}
