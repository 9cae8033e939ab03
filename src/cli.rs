//! Command-line interface definitions for dupesweep.
//!
//! All arguments are defined with the clap derive API. There are no
//! subcommands: the tool takes one target directory plus flags controlling
//! scan mode, fingerprint parameters, and confirmation behavior.
//!
//! # Example
//!
//! ```bash
//! # Scan a whole tree as one namespace, simulate only
//! dupesweep --dry-run ~/Downloads
//!
//! # Deduplicate folder by folder, announcing folders with no duplicates
//! dupesweep --mode folder --no-skip ~/photos
//!
//! # Wider fingerprint sampling for large media files
//! dupesweep --points 8 --size 16384 /srv/media
//! ```

use clap::{Parser, ValueEnum};
use std::path::PathBuf;

/// Scan scope: the whole tree as one namespace, or each folder separately.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ScanMode {
    /// One recursive scan; files anywhere in the tree can be duplicates.
    All,
    /// One scan per directory; files are never compared across directories.
    Folder,
}

/// Interactive duplicate file reclamation.
///
/// Scans a directory for byte-identical regular files, lets you review each
/// duplicate group and choose which copies to keep, then deletes the rest.
#[derive(Debug, Parser)]
#[command(name = "dupesweep")]
#[command(author, version, about)]
pub struct Cli {
    /// Directory to scan
    pub directory: PathBuf,

    /// Compute and report but never delete
    #[arg(short = 'd', long = "dry-run")]
    pub dry_run: bool,

    /// Include progress and per-file scan chatter
    #[arg(short = 'v', long = "verbose")]
    pub verbose: bool,

    /// Auto-confirm all prompts
    #[arg(short = 'y', long = "yes")]
    pub yes: bool,

    /// Scan mode
    #[arg(short = 'm', long = "mode", value_enum, default_value = "all")]
    pub mode: ScanMode,

    /// In folder mode, announce folders with no duplicates instead of
    /// skipping them silently
    #[arg(short = 'n', long = "no-skip")]
    pub no_skip: bool,

    /// Fingerprint sample point count
    #[arg(short = 'p', long = "points", value_name = "N", default_value_t = 4)]
    pub points: usize,

    /// Fingerprint window size in bytes
    #[arg(short = 's', long = "size", value_name = "BYTES", default_value_t = 4096)]
    pub size: usize,
}
