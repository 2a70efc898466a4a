//! Diagnostic sink shared by every pipeline stage.
//!
//! Stages never print errors themselves; they hand them to a [`Reporter`]
//! passed in by the caller, which also remembers whether anything went wrong
//! so the driver can skip later phases and pick an exit code.

use log::{info, warn};

use crate::error::LoxError;

pub trait Reporter {
    /// Record a scanner, parser or resolver error.
    fn static_error(&mut self, error: &LoxError);

    /// Record an error that aborted execution.
    fn runtime_error(&mut self, error: &LoxError);

    /// Clear both flags (the REPL does this after every line).
    fn reset(&mut self);

    fn had_error(&self) -> bool;

    fn had_runtime_error(&self) -> bool;
}

/// Writes diagnostics to stderr.
#[derive(Debug, Default)]
pub struct ConsoleReporter {
    had_error: bool,
    had_runtime_error: bool,
}

impl ConsoleReporter {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Reporter for ConsoleReporter {
    fn static_error(&mut self, error: &LoxError) {
        warn!("Static error: {}", error);
        eprintln!("{}", error);
        self.had_error = true;
    }

    fn runtime_error(&mut self, error: &LoxError) {
        warn!("Runtime error: {}", error);
        eprintln!("{}", error);
        self.had_runtime_error = true;
    }

    fn reset(&mut self) {
        info!("Reporter flags cleared");
        self.had_error = false;
        self.had_runtime_error = false;
    }

    fn had_error(&self) -> bool {
        self.had_error
    }

    fn had_runtime_error(&self) -> bool {
        self.had_runtime_error
    }
}

/// Keeps rendered diagnostics in memory, in the order they were reported.
#[derive(Debug, Default)]
pub struct CollectingReporter {
    pub static_errors: Vec<String>,
    pub runtime_errors: Vec<String>,
    had_error: bool,
    had_runtime_error: bool,
}

impl CollectingReporter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every diagnostic line, static ones first.
    pub fn messages(&self) -> Vec<String> {
        self.static_errors
            .iter()
            .chain(self.runtime_errors.iter())
            .cloned()
            .collect()
    }
}

impl Reporter for CollectingReporter {
    fn static_error(&mut self, error: &LoxError) {
        self.static_errors.push(error.to_string());
        self.had_error = true;
    }

    fn runtime_error(&mut self, error: &LoxError) {
        self.runtime_errors.push(error.to_string());
        self.had_runtime_error = true;
    }

    fn reset(&mut self) {
        self.had_error = false;
        self.had_runtime_error = false;
    }

    fn had_error(&self) -> bool {
        self.had_error
    }

    fn had_runtime_error(&self) -> bool {
        self.had_runtime_error
    }
}
