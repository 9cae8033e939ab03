//! Progress reporting for the scan pipeline.
//!
//! The finder reports through the [`ProgressCallback`] trait; the binary
//! installs an [`indicatif`]-backed [`Progress`] so long scans show a
//! spinner with a running count. None of this is load-bearing: a finder
//! without a callback behaves identically.

use std::sync::Mutex;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};

/// Callback for pipeline phase progress.
pub trait ProgressCallback: Send + Sync {
    /// A pipeline phase started (e.g. "enumerate", "fingerprint",
    /// "verify").
    fn on_phase_start(&self, phase: &str);

    /// One file was handled in the current phase.
    fn on_file(&self, count: usize);

    /// The current phase finished.
    fn on_phase_end(&self, phase: &str);
}

/// Spinner-based progress display.
pub struct Progress {
    bar: Mutex<Option<ProgressBar>>,
    enabled: bool,
}

impl Progress {
    /// Create a progress display. Disabled bars swallow every update,
    /// which keeps dry scripted runs and tests quiet.
    #[must_use]
    pub fn new(enabled: bool) -> Self {
        Self {
            bar: Mutex::new(None),
            enabled,
        }
    }
}

impl ProgressCallback for Progress {
    fn on_phase_start(&self, phase: &str) {
        if !self.enabled {
            return;
        }

        let bar = ProgressBar::new_spinner();
        bar.set_style(
            ProgressStyle::with_template("{spinner:.green} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        bar.set_message(format!("{phase}..."));
        bar.enable_steady_tick(Duration::from_millis(100));

        if let Ok(mut slot) = self.bar.lock() {
            *slot = Some(bar);
        }
    }

    fn on_file(&self, count: usize) {
        if let Ok(slot) = self.bar.lock() {
            if let Some(bar) = slot.as_ref() {
                if count % 64 == 0 {
                    bar.set_message(format!("{count} files"));
                }
                bar.tick();
            }
        }
    }

    fn on_phase_end(&self, _phase: &str) {
        if let Ok(mut slot) = self.bar.lock() {
            if let Some(bar) = slot.take() {
                bar.finish_and_clear();
            }
        }
    }
}
