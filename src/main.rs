//! dupesweep - Interactive duplicate file reclamation
//!
//! Entry point: argument handling, directory validation, and the
//! scan → review → confirm → delete cycle in both scan modes.

use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{bail, Result};
use clap::Parser;

use dupesweep::actions::apply_plan;
use dupesweep::cli::{Cli, ScanMode};
use dupesweep::console::{format_size, Console, StdConsole};
use dupesweep::duplicates::{DuplicateFinder, FinderConfig, ScanResult};
use dupesweep::logging;
use dupesweep::progress::Progress;
use dupesweep::retention::RetentionPlan;
use dupesweep::review;
use dupesweep::scanner::collect_subdirs;

fn main() -> Result<()> {
    // Exit codes: clap defaults to 2 for usage errors, but this tool's
    // contract is 1 for bad arguments and 0 for --help.
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) => {
            let code = if e.use_stderr() { 1 } else { 0 };
            let _ = e.print();
            std::process::exit(code);
        }
    };

    logging::init_logging(cli.verbose);

    if cli.size == 0 {
        bail!("fingerprint window size must be at least 1 byte");
    }

    let metadata = std::fs::metadata(&cli.directory);
    match metadata {
        Err(_) => bail!("directory does not exist: {}", cli.directory.display()),
        Ok(m) if !m.is_dir() => bail!("path is not a directory: {}", cli.directory.display()),
        Ok(_) => {}
    }

    log::debug!(
        "Starting: dir={}, mode={:?}, dry_run={}, points={}, size={}",
        cli.directory.display(),
        cli.mode,
        cli.dry_run,
        cli.points,
        cli.size
    );

    let finder = DuplicateFinder::new(
        FinderConfig::new()
            .with_sample_points(cli.points)
            .with_sample_size(cli.size)
            .with_progress(Arc::new(Progress::new(true))),
    );
    let mut console = StdConsole::new(cli.yes);

    match cli.mode {
        ScanMode::All => run_flat(&cli, &finder, &mut console),
        ScanMode::Folder => run_per_folder(&cli, &finder, &mut console),
    }
}

/// Flat mode: one recursive scan, one review cycle.
fn run_flat(cli: &Cli, finder: &DuplicateFinder, console: &mut dyn Console) -> Result<()> {
    console.emit(&format!(
        "Scanning {} recursively...",
        cli.directory.display()
    ));

    let started = Instant::now();
    let result = finder.scan_tree(&cli.directory)?;

    console.emit(&format!(
        "Scan complete: {} file(s), {} total, {} ms",
        result.total_files,
        format_size(result.total_bytes),
        started.elapsed().as_millis()
    ));
    console.emit(&format!(
        "Found {} duplicate group(s): {} duplicate file(s), {} reclaimable",
        result.groups.len(),
        result.deletable_files(),
        format_size(result.reclaimable_bytes())
    ));

    if !result.has_duplicates() {
        console.emit("No duplicate files found.");
        return Ok(());
    }

    review_and_apply(console, &result, cli.dry_run);
    Ok(())
}

/// Per-folder mode: one scan and review cycle per directory, parents
/// first, with a continue prompt between folders.
fn run_per_folder(cli: &Cli, finder: &DuplicateFinder, console: &mut dyn Console) -> Result<()> {
    console.emit("Collecting folders...");
    let folders = collect_subdirs(&cli.directory)?;
    console.emit(&format!("Found {} folder(s) to process", folders.len()));

    let mut processed = 0usize;
    let mut aborted = false;

    for (i, folder) in folders.iter().enumerate() {
        console.emit(&format!("\n{}", "-".repeat(60)));
        console.emit(&format!(
            "[{}/{}] Processing folder: {}",
            i + 1,
            folders.len(),
            folder.display()
        ));
        console.emit(&"-".repeat(60));

        process_folder(cli, finder, console, folder);
        processed += 1;

        let has_next = i + 1 < folders.len();
        if has_next && !cli.yes && !console.confirm("\nContinue to the next folder?", true) {
            console.emit("Stopping at operator request.");
            aborted = true;
            break;
        }
    }

    console.emit(&format!("\n{}", "=".repeat(50)));
    console.emit(&format!("Done. Processed {processed} folder(s)."));
    if aborted {
        console.emit(&format!(
            "Skipped {} remaining folder(s).",
            folders.len() - processed
        ));
    }
    console.emit(&"=".repeat(50));

    Ok(())
}

/// Scan and review one folder. Folder-level failures are reported and
/// skipped; they never abort the remaining folders.
fn process_folder(cli: &Cli, finder: &DuplicateFinder, console: &mut dyn Console, folder: &Path) {
    let started = Instant::now();
    let result = match finder.scan_folder(folder) {
        Ok(result) => result,
        Err(e) => {
            console.emit_error(&format!("Error: {e}"));
            return;
        }
    };

    console.emit(&format!(
        "Files: {}, size: {}, duplicate groups: {}, {} ms",
        result.total_files,
        format_size(result.total_bytes),
        result.groups.len(),
        started.elapsed().as_millis()
    ));
    console.emit(&format!(
        "Deletable: {} file(s), reclaimable: {}",
        result.deletable_files(),
        format_size(result.reclaimable_bytes())
    ));

    if !result.has_duplicates() {
        if cli.no_skip {
            console.emit("No duplicates in this folder.");
        } else {
            log::debug!("Skipping folder without duplicates: {}", folder.display());
        }
        return;
    }

    review_and_apply(console, &result, cli.dry_run);
}

/// The shared review cycle: listing, optional customization, delete
/// confirmation, plan application.
fn review_and_apply(console: &mut dyn Console, result: &ScanResult, dry_run: bool) {
    let mut plan = RetentionPlan::for_result(result);

    review::display_groups(console, result, &plan);

    if console.confirm("Customize which files to keep?", false) {
        review::customize_retention(console, result, &mut plan);
        review::display_retention(console, result, &plan);
    }

    if !console.confirm(
        "Delete the files not kept under this plan? (cannot be undone)",
        false,
    ) {
        console.emit("Deletion skipped.");
        return;
    }

    apply_plan(console, result, &plan, dry_run);
}
