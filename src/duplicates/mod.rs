//! Duplicate detection pipeline.
//!
//! Detection runs in three tiers, each cheaper than the next at proving
//! files *different*:
//!
//! 1. **Size bucketing** ([`groups`]): files with different lengths cannot
//!    be duplicates. Metadata only, no file I/O.
//! 2. **Sparse fingerprint** ([`crate::scanner::fingerprint`]): same-size
//!    buckets are split by a positional signature read from a few small
//!    windows.
//! 3. **Byte-exact comparison** ([`compare`]): candidates that survive both
//!    filters are confirmed byte-by-byte. Only this tier can declare two
//!    files duplicates.
//!
//! [`finder`] drives the tiers over one directory scope and assembles the
//! [`ScanResult`].

pub mod compare;
pub mod finder;
pub mod groups;

pub use compare::{cluster_group, files_identical, CompareError};
pub use finder::{DuplicateFinder, FinderConfig};
pub use groups::{bucket_by_size, BucketStats, DuplicateGroup, ScanResult};
