//! Reporting and display traits
//!
//! These traits let the engine report progress without depending on a
//! terminal implementation. The binary renders them with colors; tests
//! use [`NoReport`] or a recording implementation.

use crate::action::Action;
use std::cell::RefCell;

/// Receives planning progress.
///
/// `indent` is the nesting depth: 0 for databases and servers, 1 for
/// their forests and properties.
pub trait Reporter {
    /// Called before reading remote state ("checking the database: foo").
    fn check(&self, indent: usize, what: &str, name: Option<&str>);

    /// Called before queueing an additive or corrective action
    /// ("need to create database: foo").
    fn add(&self, indent: usize, verb: &str, what: &str, name: Option<&str>);

    /// Called before queueing a subtractive action ("need to detach forest: foo").
    fn remove(&self, indent: usize, verb: &str, what: &str, name: Option<&str>);
}

/// No-op reporter
pub struct NoReport;

impl Reporter for NoReport {
    fn check(&self, _indent: usize, _what: &str, _name: Option<&str>) {}
    fn add(&self, _indent: usize, _verb: &str, _what: &str, _name: Option<&str>) {}
    fn remove(&self, _indent: usize, _verb: &str, _what: &str, _name: Option<&str>) {}
}

/// Reporter that forwards to the `log` facade at info level.
pub struct LogReporter;

impl Reporter for LogReporter {
    fn check(&self, indent: usize, what: &str, name: Option<&str>) {
        log::info!("{}checking {}{}", pad(indent), what, suffix(name));
    }

    fn add(&self, indent: usize, verb: &str, what: &str, name: Option<&str>) {
        log::info!("{}need to {} {}{}", pad(indent), verb, what, suffix(name));
    }

    fn remove(&self, indent: usize, verb: &str, what: &str, name: Option<&str>) {
        log::info!("{}need to {} {}{}", pad(indent), verb, what, suffix(name));
    }
}

/// Reporter that keeps every line, for assertions.
#[derive(Default)]
pub struct RecordingReporter {
    lines: RefCell<Vec<String>>,
}

impl RecordingReporter {
    /// Create an empty recorder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Recorded lines, in order.
    pub fn lines(&self) -> Vec<String> {
        self.lines.borrow().clone()
    }

    fn push(&self, line: String) {
        self.lines.borrow_mut().push(line);
    }
}

impl Reporter for RecordingReporter {
    fn check(&self, indent: usize, what: &str, name: Option<&str>) {
        self.push(format!("{}checking {}{}", pad(indent), what, suffix(name)));
    }

    fn add(&self, indent: usize, verb: &str, what: &str, name: Option<&str>) {
        self.push(format!("{}need to {} {}{}", pad(indent), verb, what, suffix(name)));
    }

    fn remove(&self, indent: usize, verb: &str, what: &str, name: Option<&str>) {
        self.push(format!("{}need to {} {}{}", pad(indent), verb, what, suffix(name)));
    }
}

fn pad(indent: usize) -> String {
    "   ".repeat(indent)
}

fn suffix(name: Option<&str>) -> String {
    name.map(|n| format!(": {}", n)).unwrap_or_default()
}

/// Receives the resolved space for display (`show` command).
pub trait Display {
    /// Start a new entity block.
    fn entity(&mut self, kind: &str, name: &str);

    /// A single-valued field of the current entity.
    fn field(&mut self, key: &str, value: &str);

    /// A multi-valued field of the current entity.
    fn list(&mut self, key: &str, items: &[String]);
}

/// Progress callback for execution
pub trait ExecProgress {
    /// Called before sending an action.
    fn on_action_start(&mut self, index: usize, total: usize, action: &Action);

    /// Called after an action succeeded.
    fn on_action_complete(&mut self, index: usize, action: &Action);
}

/// No-op progress callback
pub struct NoProgress;

impl ExecProgress for NoProgress {
    fn on_action_start(&mut self, _index: usize, _total: usize, _action: &Action) {}
    fn on_action_complete(&mut self, _index: usize, _action: &Action) {}
}
