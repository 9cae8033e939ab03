//! Interactive retention review.
//!
//! # Overview
//!
//! [`customize_retention`] runs the operator-facing command loop that edits
//! a [`RetentionPlan`] over a completed scan. Everything flows through the
//! [`Console`] port, so the loop is driven identically by a terminal or a
//! scripted test harness.
//!
//! Commands (first token, case-insensitive):
//!
//! | command | effect |
//! |---------|--------|
//! | `list` | re-display all groups with numbering |
//! | `view <g>` | display group `g` alone |
//! | `<g>` | edit group `g`'s keep set via a digit string |
//! | `auto` | apply a strategy to one group |
//! | `all` | apply a strategy to every group |
//! | `done` | finish (EOF is equivalent) |
//!
//! Member selection uses the digits `1..9` with no separators (`13` keeps
//! members 1 and 3). Groups with ten or more members cannot be fully
//! addressed this way and must be narrowed with `auto` or `all` instead.

use std::collections::BTreeSet;

use crate::console::{format_mtime, format_size, Console};
use crate::duplicates::{DuplicateGroup, ScanResult};
use crate::retention::{AutoStrategy, RetentionPlan};

/// Display all duplicate groups with 1-based numbering and the current
/// keep/delete marking.
pub fn display_groups(console: &mut dyn Console, result: &ScanResult, plan: &RetentionPlan) {
    console.emit("");
    console.emit(&"=".repeat(72));
    console.emit("Duplicate groups");
    console.emit(&"=".repeat(72));

    for (g, group) in result.groups.iter().enumerate() {
        console.emit(&format!(
            "\nGroup {} ({} files, {} each):",
            g + 1,
            group.len(),
            format_size(group.size)
        ));
        console.emit(&"-".repeat(60));

        for (i, file) in group.files.iter().enumerate() {
            let marker = if plan.is_kept(g, i + 1) {
                "✓ keep"
            } else {
                "✗ delete"
            };
            console.emit(&format!("  [{}] {marker}: {}", i + 1, file.file_name()));
            console.emit(&format!("      path: {}", file.path.display()));
            console.emit(&format!(
                "      size: {}, modified: {}",
                format_size(file.size),
                format_mtime(file.modified)
            ));
        }
    }

    console.emit(&"=".repeat(72));
}

/// Display a single group with full detail.
fn display_single_group(console: &mut dyn Console, group: &DuplicateGroup, number: usize) {
    console.emit("");
    console.emit(&"=".repeat(60));
    console.emit(&format!("Group {number} ({} files):", group.len()));
    console.emit(&"=".repeat(60));

    for (i, file) in group.files.iter().enumerate() {
        console.emit(&format!("  [{}] {}", i + 1, file.file_name()));
        console.emit(&format!("      path: {}", file.path.display()));
        console.emit(&format!(
            "      size: {}, modified: {}",
            format_size(file.size),
            format_mtime(file.modified)
        ));
    }

    console.emit(&"=".repeat(60));
}

/// Display the retention plan with per-group markings and totals.
pub fn display_retention(console: &mut dyn Console, result: &ScanResult, plan: &RetentionPlan) {
    console.emit("");
    console.emit(&"=".repeat(72));
    console.emit("Retention plan");
    console.emit(&"=".repeat(72));

    for (g, group) in result.groups.iter().enumerate() {
        console.emit(&format!("\nGroup {}:", g + 1));

        for (i, file) in group.files.iter().enumerate() {
            let marker = if plan.is_kept(g, i + 1) {
                "✓ keep"
            } else {
                "✗ delete"
            };
            console.emit(&format!("  {marker} [{}] {}", i + 1, file.file_name()));
        }

        console.emit(&format!("  keeping {} file(s)", plan.kept(g).len()));
    }

    console.emit(&"=".repeat(72));
    console.emit(&format!(
        "Total: keep {} file(s), delete {} file(s), reclaim {}",
        plan.kept_count(),
        plan.delete_count(),
        format_size(plan.reclaimed_bytes(result))
    ));
    console.emit(&"=".repeat(72));
}

/// Run the interactive retention-review loop.
///
/// Returns when the operator enters `done` or the input reaches EOF. The
/// plan always satisfies its non-empty invariant on return.
pub fn customize_retention(
    console: &mut dyn Console,
    result: &ScanResult,
    plan: &mut RetentionPlan,
) {
    console.emit("");
    console.emit("Customize retention");
    console.emit("Commands:");
    console.emit("  - a group number (e.g. 1) to view and edit that group's kept files");
    console.emit("  - 'all' to auto-select for every group");
    console.emit("  - 'auto' to auto-select for one group");
    console.emit("  - 'list' to show all duplicate groups");
    console.emit("  - 'view <n>' to show one group in detail");
    console.emit("  - 'done' to finish");

    loop {
        console.prompt("\ncommand (group#/all/auto/list/done/view): ");

        let Some(input) = console.read_line() else {
            break;
        };
        let input = input.trim().to_string();
        if input.is_empty() {
            continue;
        }

        let command = input.to_lowercase();

        if command == "done" {
            break;
        } else if command == "list" {
            display_groups(console, result, plan);
        } else if command == "all" {
            let strategy = prompt_strategy(console);
            plan.apply_auto_all(strategy, &result.groups);
            console.emit(&format!(
                "Applied strategy '{}' to all groups",
                strategy.name()
            ));
            display_retention(console, result, plan);
        } else if command.starts_with("view") {
            handle_view(console, result, plan, &input);
        } else if command == "auto" {
            handle_auto(console, result, plan);
        } else {
            handle_group_edit(console, result, plan, &input);
        }
    }
}

/// Prompt for a strategy by menu number. Unknown input falls back to
/// `newest`.
fn prompt_strategy(console: &mut dyn Console) -> AutoStrategy {
    console.emit("Select retention strategy:");
    console.emit("  1. keep the newest file");
    console.emit("  2. keep the oldest file");
    console.emit("  3. keep the file with the longest name");
    console.emit("  4. keep the file with the shortest name");
    console.prompt("choice (1-4): ");

    let choice = console.read_line().unwrap_or_default();
    match choice.trim() {
        "1" => AutoStrategy::Newest,
        "2" => AutoStrategy::Oldest,
        "3" => AutoStrategy::LongestName,
        "4" => AutoStrategy::ShortestName,
        _ => {
            console.emit("Unknown choice, using default strategy (newest)");
            AutoStrategy::Newest
        }
    }
}

/// Parse a 1-based group number against the result, reporting problems.
fn parse_group_number(
    console: &mut dyn Console,
    result: &ScanResult,
    text: &str,
) -> Option<usize> {
    match text.trim().parse::<usize>() {
        Ok(n) if n >= 1 && n <= result.groups.len() => Some(n),
        Ok(n) => {
            console.emit_error(&format!(
                "Group {n} is out of range (1-{})",
                result.groups.len()
            ));
            None
        }
        Err(_) => {
            console.emit_error(&format!("Invalid group number '{}'", text.trim()));
            None
        }
    }
}

/// `view <g>`: the only command parsed from within a single line.
fn handle_view(
    console: &mut dyn Console,
    result: &ScanResult,
    _plan: &RetentionPlan,
    input: &str,
) {
    let mut tokens = input.split_whitespace();
    let _ = tokens.next();

    match tokens.next() {
        Some(arg) => {
            if let Some(n) = parse_group_number(console, result, arg) {
                display_single_group(console, &result.groups[n - 1], n);
            }
        }
        None => console.emit_error("Usage: view <group number>"),
    }
}

/// `auto`: prompt for a group, then a strategy, and apply it there.
fn handle_auto(console: &mut dyn Console, result: &ScanResult, plan: &mut RetentionPlan) {
    console.prompt("group number to auto-select: ");

    let Some(reply) = console.read_line() else {
        return;
    };
    let Some(n) = parse_group_number(console, result, &reply) else {
        return;
    };

    let strategy = prompt_strategy(console);
    plan.apply_auto(n - 1, strategy, &result.groups[n - 1]);
    console.emit(&format!(
        "Applied strategy '{}' to group {n}",
        strategy.name()
    ));
}

/// Bare group number: display the group and read a digit-string keep set.
fn handle_group_edit(
    console: &mut dyn Console,
    result: &ScanResult,
    plan: &mut RetentionPlan,
    input: &str,
) {
    let Some(n) = parse_group_number(console, result, input) else {
        return;
    };
    let group = &result.groups[n - 1];

    display_single_group(console, group, n);

    let current: Vec<String> = plan.kept(n - 1).iter().map(|i| format!("[{i}]")).collect();
    console.emit(&format!("Currently kept: {}", current.join(" ")));

    console.prompt("members to keep (digits with no separators, e.g. 13): ");
    let Some(selection) = console.read_line() else {
        return;
    };

    let Some(keep_set) = parse_digit_selection(console, group, selection.trim()) else {
        return;
    };

    if keep_set.is_empty() {
        console.emit_error("At least one file must be kept");
        return;
    }

    if plan.set_group(n - 1, keep_set) {
        let updated: Vec<String> = plan.kept(n - 1).iter().map(|i| format!("[{i}]")).collect();
        console.emit(&format!("Group {n} retention updated: {}", updated.join(" ")));
    }
}

/// Parse a digit-string member selection.
///
/// Every character must be a digit `1..9` naming a member of `group`;
/// duplicates collapse. Any invalid character aborts the whole edit
/// (returns `None` after reporting).
fn parse_digit_selection(
    console: &mut dyn Console,
    group: &DuplicateGroup,
    selection: &str,
) -> Option<BTreeSet<usize>> {
    let mut keep_set = BTreeSet::new();

    for c in selection.chars() {
        if !('1'..='9').contains(&c) {
            console.emit_error(&format!("Invalid character '{c}' in selection"));
            return None;
        }

        let member = c as usize - '0' as usize;
        if member > group.len() {
            console.emit_error(&format!(
                "Member {member} is out of range (1-{})",
                group.len()
            ));
            return None;
        }

        keep_set.insert(member);
    }

    Some(keep_set)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scanner::FileRecord;
    use std::collections::VecDeque;
    use std::path::PathBuf;
    use std::time::{Duration, SystemTime};

    /// Console driven by a pre-scripted input queue, capturing output.
    struct ScriptedConsole {
        input: VecDeque<String>,
        pub output: Vec<String>,
        pub errors: Vec<String>,
    }

    impl ScriptedConsole {
        fn new(lines: &[&str]) -> Self {
            Self {
                input: lines.iter().map(|s| s.to_string()).collect(),
                output: Vec::new(),
                errors: Vec::new(),
            }
        }
    }

    impl Console for ScriptedConsole {
        fn prompt(&mut self, text: &str) {
            self.output.push(text.to_string());
        }

        fn read_line(&mut self) -> Option<String> {
            self.input.pop_front()
        }

        fn emit(&mut self, line: &str) {
            self.output.push(line.to_string());
        }

        fn emit_error(&mut self, line: &str) {
            self.errors.push(line.to_string());
        }

        fn confirm(&mut self, _question: &str, default_yes: bool) -> bool {
            match self.read_line() {
                None => default_yes,
                Some(reply) if reply.trim().is_empty() => default_yes,
                Some(reply) => reply.trim().to_lowercase().starts_with('y'),
            }
        }
    }

    fn file_at(name: &str, mtime_offset: u64) -> FileRecord {
        FileRecord::new(
            PathBuf::from(format!("/test/{name}")),
            100,
            SystemTime::UNIX_EPOCH + Duration::from_secs(mtime_offset),
        )
    }

    fn three_member_result() -> ScanResult {
        ScanResult {
            groups: vec![DuplicateGroup::new(
                100,
                vec![file_at("a.txt", 10), file_at("b.txt", 20), file_at("c.txt", 30)],
            )],
            total_files: 3,
            total_bytes: 300,
        }
    }

    #[test]
    fn test_done_exits_without_changes() {
        let result = three_member_result();
        let mut plan = RetentionPlan::for_result(&result);
        let mut console = ScriptedConsole::new(&["done"]);

        customize_retention(&mut console, &result, &mut plan);

        assert_eq!(plan.kept(0), &std::collections::BTreeSet::from([1]));
    }

    #[test]
    fn test_eof_is_equivalent_to_done() {
        let result = three_member_result();
        let mut plan = RetentionPlan::for_result(&result);
        let mut console = ScriptedConsole::new(&[]);

        customize_retention(&mut console, &result, &mut plan);

        assert_eq!(plan.kept(0), &std::collections::BTreeSet::from([1]));
    }

    #[test]
    fn test_digit_string_selects_members() {
        let result = three_member_result();
        let mut plan = RetentionPlan::for_result(&result);
        // Edit group 1, keep members 1 and 3, then finish.
        let mut console = ScriptedConsole::new(&["1", "13", "done"]);

        customize_retention(&mut console, &result, &mut plan);

        assert_eq!(plan.kept(0), &std::collections::BTreeSet::from([1, 3]));
    }

    #[test]
    fn test_duplicate_digits_collapse() {
        let result = three_member_result();
        let mut plan = RetentionPlan::for_result(&result);
        let mut console = ScriptedConsole::new(&["1", "1133", "done"]);

        customize_retention(&mut console, &result, &mut plan);

        assert_eq!(plan.kept(0), &std::collections::BTreeSet::from([1, 3]));
    }

    #[test]
    fn test_invalid_character_aborts_edit() {
        let result = three_member_result();
        let mut plan = RetentionPlan::for_result(&result);
        let mut console = ScriptedConsole::new(&["1", "1x3", "done"]);

        customize_retention(&mut console, &result, &mut plan);

        assert_eq!(plan.kept(0), &std::collections::BTreeSet::from([1]));
        assert!(console.errors.iter().any(|e| e.contains("Invalid character")));
    }

    #[test]
    fn test_out_of_range_digit_aborts_edit() {
        let result = three_member_result();
        let mut plan = RetentionPlan::for_result(&result);
        let mut console = ScriptedConsole::new(&["1", "14", "done"]);

        customize_retention(&mut console, &result, &mut plan);

        assert_eq!(plan.kept(0), &std::collections::BTreeSet::from([1]));
        assert!(console.errors.iter().any(|e| e.contains("out of range")));
    }

    #[test]
    fn test_empty_selection_rejected() {
        let result = three_member_result();
        let mut plan = RetentionPlan::for_result(&result);
        let mut console = ScriptedConsole::new(&["1", "", "done"]);

        customize_retention(&mut console, &result, &mut plan);

        assert_eq!(plan.kept(0), &std::collections::BTreeSet::from([1]));
        assert!(console
            .errors
            .iter()
            .any(|e| e.contains("At least one file must be kept")));
    }

    #[test]
    fn test_all_applies_strategy_everywhere() {
        let result = ScanResult {
            groups: vec![
                DuplicateGroup::new(100, vec![file_at("a", 10), file_at("b", 20)]),
                DuplicateGroup::new(100, vec![file_at("x", 30), file_at("y", 5)]),
            ],
            total_files: 4,
            total_bytes: 400,
        };
        let mut plan = RetentionPlan::for_result(&result);
        // 'all', strategy 1 (newest), then done.
        let mut console = ScriptedConsole::new(&["all", "1", "done"]);

        customize_retention(&mut console, &result, &mut plan);

        assert_eq!(plan.kept(0), &std::collections::BTreeSet::from([2]));
        assert_eq!(plan.kept(1), &std::collections::BTreeSet::from([1]));
    }

    #[test]
    fn test_unknown_strategy_falls_back_to_newest() {
        let result = three_member_result();
        let mut plan = RetentionPlan::for_result(&result);
        let mut console = ScriptedConsole::new(&["all", "7", "done"]);

        customize_retention(&mut console, &result, &mut plan);

        // Newest of mtimes 10 < 20 < 30 is member 3.
        assert_eq!(plan.kept(0), &std::collections::BTreeSet::from([3]));
        assert!(console
            .output
            .iter()
            .any(|l| l.contains("using default strategy")));
    }

    #[test]
    fn test_auto_targets_single_group() {
        let result = ScanResult {
            groups: vec![
                DuplicateGroup::new(100, vec![file_at("a", 10), file_at("b", 20)]),
                DuplicateGroup::new(100, vec![file_at("x", 30), file_at("y", 5)]),
            ],
            total_files: 4,
            total_bytes: 400,
        };
        let mut plan = RetentionPlan::for_result(&result);
        // 'auto' on group 2 with strategy 2 (oldest).
        let mut console = ScriptedConsole::new(&["auto", "2", "2", "done"]);

        customize_retention(&mut console, &result, &mut plan);

        assert_eq!(plan.kept(0), &std::collections::BTreeSet::from([1]));
        assert_eq!(plan.kept(1), &std::collections::BTreeSet::from([2]));
    }

    #[test]
    fn test_out_of_range_group_reported() {
        let result = three_member_result();
        let mut plan = RetentionPlan::for_result(&result);
        let mut console = ScriptedConsole::new(&["9", "done"]);

        customize_retention(&mut console, &result, &mut plan);

        assert!(console.errors.iter().any(|e| e.contains("out of range")));
        assert_eq!(plan.kept(0), &std::collections::BTreeSet::from([1]));
    }

    #[test]
    fn test_non_numeric_command_reported() {
        let result = three_member_result();
        let mut plan = RetentionPlan::for_result(&result);
        let mut console = ScriptedConsole::new(&["bogus", "done"]);

        customize_retention(&mut console, &result, &mut plan);

        assert!(console
            .errors
            .iter()
            .any(|e| e.contains("Invalid group number")));
    }

    #[test]
    fn test_view_displays_without_mutating() {
        let result = three_member_result();
        let mut plan = RetentionPlan::for_result(&result);
        let mut console = ScriptedConsole::new(&["view 1", "view", "view 5", "done"]);

        customize_retention(&mut console, &result, &mut plan);

        assert!(console.output.iter().any(|l| l.contains("Group 1")));
        assert!(console.errors.iter().any(|e| e.contains("Usage: view")));
        assert!(console.errors.iter().any(|e| e.contains("out of range")));
        assert_eq!(plan.kept(0), &std::collections::BTreeSet::from([1]));
    }

    #[test]
    fn test_commands_are_case_insensitive() {
        let result = three_member_result();
        let mut plan = RetentionPlan::for_result(&result);
        let mut console = ScriptedConsole::new(&["LIST", "DONE"]);

        customize_retention(&mut console, &result, &mut plan);

        assert!(console.output.iter().any(|l| l.contains("Duplicate groups")));
    }
}
