//! Retention planning: which member of each duplicate group survives.
//!
//! # Overview
//!
//! A [`RetentionPlan`] records, for every group of a scan, the non-empty
//! set of 1-based member indices to keep. The deleter removes exactly the
//! complement. The plan starts at "keep the first copy of every group" and
//! is mutated by the review loop, either per-index or through one of the
//! automatic strategies.
//!
//! The non-empty invariant is enforced at every mutation: no sequence of
//! plan operations can produce a group slated for total deletion.

use std::collections::BTreeSet;

use crate::duplicates::{DuplicateGroup, ScanResult};

/// Automatic keep-one selection strategies.
///
/// Ties are broken by scan order: when several members share the winning
/// key, the lowest 1-based index is kept.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutoStrategy {
    /// Keep the member with the greatest modification time.
    Newest,
    /// Keep the member with the least modification time.
    Oldest,
    /// Keep the member with the longest file name (in bytes).
    LongestName,
    /// Keep the member with the shortest file name (in bytes).
    ShortestName,
}

impl AutoStrategy {
    /// Human-readable strategy name, as shown in prompts and summaries.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Newest => "newest",
            Self::Oldest => "oldest",
            Self::LongestName => "longest-name",
            Self::ShortestName => "shortest-name",
        }
    }

    /// Pick the 1-based index of the member this strategy keeps.
    ///
    /// Scans members in order with strict comparisons, so the first
    /// member with the winning key wins ties for all four strategies.
    #[must_use]
    pub fn select(&self, group: &DuplicateGroup) -> usize {
        debug_assert!(!group.is_empty());

        let mut keep = 1;

        for (i, file) in group.files.iter().enumerate().skip(1) {
            let better = match self {
                Self::Newest => file.modified > group.files[keep - 1].modified,
                Self::Oldest => file.modified < group.files[keep - 1].modified,
                Self::LongestName => file.file_name_len() > group.files[keep - 1].file_name_len(),
                Self::ShortestName => file.file_name_len() < group.files[keep - 1].file_name_len(),
            };
            if better {
                keep = i + 1;
            }
        }

        keep
    }
}

/// Per-group keep sets for one scan result.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetentionPlan {
    /// 1-based kept indices per group; invariant: non-empty, within range
    keep: Vec<BTreeSet<usize>>,
    /// Member count per group, for range validation
    group_sizes: Vec<usize>,
}

impl RetentionPlan {
    /// Default plan for a scan result: keep the first member of every
    /// group.
    #[must_use]
    pub fn for_result(result: &ScanResult) -> Self {
        let group_sizes = result.groups.iter().map(DuplicateGroup::len).collect();
        let keep = result
            .groups
            .iter()
            .map(|_| BTreeSet::from([1]))
            .collect();
        Self { keep, group_sizes }
    }

    /// Number of groups this plan covers.
    #[must_use]
    pub fn group_count(&self) -> usize {
        self.keep.len()
    }

    /// Kept indices for group `g` (0-based group index).
    #[must_use]
    pub fn kept(&self, g: usize) -> &BTreeSet<usize> {
        &self.keep[g]
    }

    /// Whether member `index` (1-based) of group `g` is kept.
    #[must_use]
    pub fn is_kept(&self, g: usize, index: usize) -> bool {
        self.keep[g].contains(&index)
    }

    /// Reset every group to the default keep-first plan.
    pub fn reset_default(&mut self) {
        for set in &mut self.keep {
            *set = BTreeSet::from([1]);
        }
    }

    /// Replace group `g`'s keep set with the strategy's single pick.
    ///
    /// `group` must be the same group the plan was built from; its length
    /// is asserted against the recorded size.
    pub fn apply_auto(&mut self, g: usize, strategy: AutoStrategy, group: &DuplicateGroup) {
        debug_assert_eq!(self.group_sizes[g], group.len());
        self.keep[g] = BTreeSet::from([strategy.select(group)]);
    }

    /// Apply a strategy to every group.
    pub fn apply_auto_all(&mut self, strategy: AutoStrategy, groups: &[DuplicateGroup]) {
        for (g, group) in groups.iter().enumerate() {
            self.apply_auto(g, strategy, group);
        }
    }

    /// Replace group `g`'s keep set.
    ///
    /// Rejected (plan unchanged, `false` returned) if the set is empty or
    /// contains an index outside `1..=len`.
    pub fn set_group(&mut self, g: usize, set: BTreeSet<usize>) -> bool {
        if set.is_empty() {
            log::debug!("Rejected empty keep set for group {}", g + 1);
            return false;
        }
        if set.iter().any(|&i| i < 1 || i > self.group_sizes[g]) {
            log::debug!("Rejected out-of-range keep set for group {}", g + 1);
            return false;
        }

        self.keep[g] = set;
        true
    }

    /// Total members kept across all groups.
    #[must_use]
    pub fn kept_count(&self) -> usize {
        self.keep.iter().map(BTreeSet::len).sum()
    }

    /// Total members slated for deletion.
    #[must_use]
    pub fn delete_count(&self) -> usize {
        self.group_sizes
            .iter()
            .zip(&self.keep)
            .map(|(&len, kept)| len - kept.len())
            .sum()
    }

    /// Bytes the deleter would reclaim under this plan.
    #[must_use]
    pub fn reclaimed_bytes(&self, result: &ScanResult) -> u64 {
        result
            .groups
            .iter()
            .zip(&self.keep)
            .map(|(group, kept)| (group.len() - kept.len()) as u64 * group.size)
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::FileRecord;
    use std::path::PathBuf;
    use std::time::{Duration, SystemTime};

    fn file_at(name: &str, mtime_offset: u64) -> FileRecord {
        FileRecord::new(
            PathBuf::from(format!("/test/{name}")),
            100,
            SystemTime::UNIX_EPOCH + Duration::from_secs(mtime_offset),
        )
    }

    fn result_with_group(files: Vec<FileRecord>) -> ScanResult {
        ScanResult {
            groups: vec![DuplicateGroup::new(100, files)],
            total_files: 0,
            total_bytes: 0,
        }
    }

    #[test]
    fn test_default_plan_keeps_first() {
        let result = result_with_group(vec![file_at("a", 1), file_at("b", 2)]);
        let plan = RetentionPlan::for_result(&result);

        assert_eq!(plan.group_count(), 1);
        assert_eq!(plan.kept(0), &BTreeSet::from([1]));
        assert!(plan.is_kept(0, 1));
        assert!(!plan.is_kept(0, 2));
    }

    #[test]
    fn test_newest_keeps_latest_mtime() {
        let result = result_with_group(vec![
            file_at("t1", 10),
            file_at("t2", 20),
            file_at("t3", 30),
            file_at("t4", 40),
        ]);
        let mut plan = RetentionPlan::for_result(&result);

        plan.apply_auto_all(AutoStrategy::Newest, &result.groups);

        assert_eq!(plan.kept(0), &BTreeSet::from([4]));
    }

    #[test]
    fn test_oldest_keeps_earliest_mtime() {
        let result = result_with_group(vec![file_at("t1", 10), file_at("t2", 5), file_at("t3", 30)]);
        let mut plan = RetentionPlan::for_result(&result);

        plan.apply_auto(0, AutoStrategy::Oldest, &result.groups[0]);

        assert_eq!(plan.kept(0), &BTreeSet::from([2]));
    }

    #[test]
    fn test_name_length_strategies() {
        let result = result_with_group(vec![
            file_at("medium.txt", 0),
            file_at("a.txt", 0),
            file_at("the_longest_name.txt", 0),
        ]);
        let mut plan = RetentionPlan::for_result(&result);

        plan.apply_auto(0, AutoStrategy::LongestName, &result.groups[0]);
        assert_eq!(plan.kept(0), &BTreeSet::from([3]));

        plan.apply_auto(0, AutoStrategy::ShortestName, &result.groups[0]);
        assert_eq!(plan.kept(0), &BTreeSet::from([2]));
    }

    #[test]
    fn test_ties_keep_lowest_index() {
        let result = result_with_group(vec![
            file_at("aa.txt", 7),
            file_at("bb.txt", 7),
            file_at("cc.txt", 7),
        ]);
        let mut plan = RetentionPlan::for_result(&result);

        for strategy in [
            AutoStrategy::Newest,
            AutoStrategy::Oldest,
            AutoStrategy::LongestName,
            AutoStrategy::ShortestName,
        ] {
            plan.apply_auto(0, strategy, &result.groups[0]);
            assert_eq!(
                plan.kept(0),
                &BTreeSet::from([1]),
                "strategy {} broke the tie away from the first member",
                strategy.name()
            );
        }
    }

    #[test]
    fn test_set_group_accepts_valid_subset() {
        let result = result_with_group(vec![file_at("a", 1), file_at("b", 2), file_at("c", 3)]);
        let mut plan = RetentionPlan::for_result(&result);

        assert!(plan.set_group(0, BTreeSet::from([1, 3])));
        assert_eq!(plan.kept(0), &BTreeSet::from([1, 3]));
    }

    #[test]
    fn test_set_group_rejects_empty() {
        let result = result_with_group(vec![file_at("a", 1), file_at("b", 2)]);
        let mut plan = RetentionPlan::for_result(&result);

        assert!(!plan.set_group(0, BTreeSet::new()));
        assert_eq!(plan.kept(0), &BTreeSet::from([1]));
    }

    #[test]
    fn test_set_group_rejects_out_of_range() {
        let result = result_with_group(vec![file_at("a", 1), file_at("b", 2)]);
        let mut plan = RetentionPlan::for_result(&result);

        assert!(!plan.set_group(0, BTreeSet::from([1, 3])));
        assert_eq!(plan.kept(0), &BTreeSet::from([1]));
    }

    #[test]
    fn test_reset_default() {
        let result = result_with_group(vec![file_at("a", 1), file_at("b", 2)]);
        let mut plan = RetentionPlan::for_result(&result);

        plan.set_group(0, BTreeSet::from([2]));
        plan.reset_default();

        assert_eq!(plan.kept(0), &BTreeSet::from([1]));
    }

    #[test]
    fn test_metrics() {
        let groups = vec![
            DuplicateGroup::new(1000, vec![file_at("a", 1), file_at("b", 2)]),
            DuplicateGroup::new(
                50,
                vec![file_at("x", 1), file_at("y", 2), file_at("z", 3)],
            ),
        ];
        let result = ScanResult {
            groups,
            total_files: 5,
            total_bytes: 2150,
        };
        let mut plan = RetentionPlan::for_result(&result);

        assert_eq!(plan.kept_count(), 2);
        assert_eq!(plan.delete_count(), 3);
        assert_eq!(plan.reclaimed_bytes(&result), 1000 + 2 * 50);

        plan.set_group(1, BTreeSet::from([1, 2]));
        assert_eq!(plan.kept_count(), 3);
        assert_eq!(plan.delete_count(), 2);
        assert_eq!(plan.reclaimed_bytes(&result), 1000 + 50);
    }
}
