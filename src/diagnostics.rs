//! User-facing warnings
//!
//! Degraded builds are reported, not failed. Warnings go through a
//! [`DiagnosticSink`] so callers (and tests) decide where they end up.

use std::cell::RefCell;

/// Receives warnings about degraded but recoverable states
pub trait DiagnosticSink {
    fn warn(&self, message: &str);
}

/// Writes warnings to stderr
#[derive(Debug, Clone, Copy, Default)]
pub struct StderrDiagnostics;

impl DiagnosticSink for StderrDiagnostics {
    fn warn(&self, message: &str) {
        eprintln!("warning: {message}");
    }
}

/// Keeps warnings in memory
#[derive(Debug, Default)]
pub struct RecordingDiagnostics {
    messages: RefCell<Vec<String>>,
}

impl RecordingDiagnostics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Warnings received so far, oldest first
    pub fn messages(&self) -> Vec<String> {
        self.messages.borrow().clone()
    }

    pub fn len(&self) -> usize {
        self.messages.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.messages.borrow().is_empty()
    }
}

impl DiagnosticSink for RecordingDiagnostics {
    fn warn(&self, message: &str) {
        self.messages.borrow_mut().push(message.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recording_keeps_order() {
        let sink = RecordingDiagnostics::new();
        assert!(sink.is_empty());

        sink.warn("first");
        sink.warn("second");

        assert_eq!(sink.len(), 2);
        assert_eq!(sink.messages(), vec!["first", "second"]);
    }
}
