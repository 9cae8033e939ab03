//! Shared test helpers: a scripted operator console and fixture builders.
#![allow(dead_code)]

use std::collections::VecDeque;
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

use dupesweep::console::Console;

/// Console driven by a pre-scripted input queue.
///
/// `read_line` pops the queue; EOF after it drains. `confirm` consumes a
/// line from the same queue, so scripts read exactly like an operator
/// session transcript.
pub struct ScriptedConsole {
    input: VecDeque<String>,
    pub output: Vec<String>,
    pub errors: Vec<String>,
}

impl ScriptedConsole {
    pub fn new(lines: &[&str]) -> Self {
        Self {
            input: lines.iter().map(|s| s.to_string()).collect(),
            output: Vec::new(),
            errors: Vec::new(),
        }
    }

    pub fn output_contains(&self, needle: &str) -> bool {
        self.output.iter().any(|l| l.contains(needle))
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

    fn confirm(&mut self, question: &str, default_yes: bool) -> bool {
        self.output.push(question.to_string());
        match self.read_line() {
            None => default_yes,
            Some(reply) if reply.trim().is_empty() => default_yes,
            Some(reply) => reply.trim().to_lowercase().starts_with('y'),
        }
    }
}

/// Write a file with the given content, returning its path.
pub fn write_file(dir: &Path, name: &str, content: &[u8]) -> PathBuf {
    let path = dir.join(name);
    File::create(&path).unwrap().write_all(content).unwrap();
    path
}
