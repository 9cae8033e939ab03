//! Operator I/O port.
//!
//! Every interactive exchange goes through the [`Console`] trait: the review
//! loop and the deleter never touch stdio directly. [`StdConsole`] is the
//! production implementation; tests drive the same code with a scripted
//! implementation instead of a terminal.
//!
//! Auto-confirm mode (`--yes`) short-circuits [`Console::confirm`] to always
//! answer yes, announcing the skipped question so the transcript stays
//! readable.

use std::io::{self, BufRead, Write};
use std::time::SystemTime;

use bytesize::ByteSize;
use chrono::{DateTime, Local};

/// Line-oriented operator port.
///
/// `read_line` returns `None` on EOF; callers treat EOF as the operator
/// walking away (equivalent to `done` in the review loop, or the default
/// answer for a confirmation).
pub trait Console {
    /// Print `text` without a trailing newline and flush, leaving the
    /// cursor on the prompt line.
    fn prompt(&mut self, text: &str);

    /// Read one line, without the trailing newline. `None` means EOF.
    fn read_line(&mut self) -> Option<String>;

    /// Print one line of normal output.
    fn emit(&mut self, line: &str);

    /// Print one line of error output.
    fn emit_error(&mut self, line: &str);

    /// Ask a yes/no question and return the answer.
    ///
    /// An empty reply selects `default_yes`; otherwise any reply starting
    /// with `y` or `Y` is yes and everything else is no.
    fn confirm(&mut self, question: &str, default_yes: bool) -> bool;
}

/// Production console on stdin/stdout/stderr.
pub struct StdConsole {
    auto_confirm: bool,
}

impl StdConsole {
    #[must_use]
    pub fn new(auto_confirm: bool) -> Self {
        Self { auto_confirm }
    }
}

impl Console for StdConsole {
    fn prompt(&mut self, text: &str) {
        print!("{text}");
        let _ = io::stdout().flush();
    }

    fn read_line(&mut self) -> Option<String> {
        let mut line = String::new();
        match io::stdin().lock().read_line(&mut line) {
            Ok(0) => None,
            Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
            Err(e) => {
                log::warn!("Failed to read from stdin: {e}");
                None
            }
        }
    }

    fn emit(&mut self, line: &str) {
        println!("{line}");
    }

    fn emit_error(&mut self, line: &str) {
        eprintln!("{line}");
    }

    fn confirm(&mut self, question: &str, default_yes: bool) -> bool {
        if self.auto_confirm {
            self.emit(&format!("{question} (auto-confirmed: yes)"));
            return true;
        }

        self.prompt(&format!(
            "{question} [{}]: ",
            if default_yes { "Y/n" } else { "y/N" }
        ));

        match self.read_line() {
            None => default_yes,
            Some(reply) => {
                let reply = reply.trim();
                if reply.is_empty() {
                    default_yes
                } else {
                    reply.chars().next().is_some_and(|c| c.eq_ignore_ascii_case(&'y'))
                }
            }
        }
    }
}

/// Format a byte count with IEC binary units.
#[must_use]
pub fn format_size(bytes: u64) -> String {
    ByteSize::b(bytes).to_string()
}

/// Format a modification time as local `YYYY-MM-DD HH:MM:SS`.
#[must_use]
pub fn format_mtime(mtime: SystemTime) -> String {
    let local: DateTime<Local> = mtime.into();
    local.format("%Y-%m-%d %H:%M:%S").to_string()
}
