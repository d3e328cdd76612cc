//! Recoverable parse diagnostics and the sink they are delivered through.
//!
//! The parser never decides how a recoverable condition is displayed or
//! persisted; it hands a [`ParseDiagnostic`] to whatever [`DiagnosticSink`]
//! the caller injected. [`CollectingSink`] accumulates diagnostics for
//! library embedding and tests; [`StderrSink`] renders them as colored
//! warnings for CLI use.

use std::fmt;
use std::io::Write;

use serde::Serialize;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// One recoverable event observed during a parse.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParseDiagnostic {
    /// The logical line the diagnostic refers to.
    pub line: String,
    /// Human-readable description of the condition.
    pub message: String,
}

impl ParseDiagnostic {
    /// A line whose keyword matched no registry entry. The line is skipped;
    /// the rest of the script still parses.
    pub fn unrecognized_command(line: &str) -> Self {
        Self {
            line: line.to_string(),
            message: format!("unrecognised script command: {line}"),
        }
    }
}

impl fmt::Display for ParseDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

/// Destination for recoverable diagnostics.
pub trait DiagnosticSink {
    fn report(&mut self, diagnostic: ParseDiagnostic);
}

/// Accumulates diagnostics in memory.
#[derive(Debug, Default)]
pub struct CollectingSink {
    diagnostics: Vec<ParseDiagnostic>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn diagnostics(&self) -> &[ParseDiagnostic] {
        &self.diagnostics
    }

    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    pub fn into_inner(self) -> Vec<ParseDiagnostic> {
        self.diagnostics
    }
}

impl DiagnosticSink for CollectingSink {
    fn report(&mut self, diagnostic: ParseDiagnostic) {
        self.diagnostics.push(diagnostic);
    }
}

/// Writes diagnostics to stderr as colored warnings.
pub struct StderrSink {
    stream: StandardStream,
}

impl StderrSink {
    pub fn new() -> Self {
        Self {
            stream: StandardStream::stderr(ColorChoice::Auto),
        }
    }
}

impl Default for StderrSink {
    fn default() -> Self {
        Self::new()
    }
}

impl DiagnosticSink for StderrSink {
    fn report(&mut self, diagnostic: ParseDiagnostic) {
        // Diagnostics are best-effort output; a broken stderr must not fail
        // the parse.
        let _ = self
            .stream
            .set_color(ColorSpec::new().set_fg(Some(Color::Yellow)).set_bold(true));
        let _ = write!(self.stream, "warning");
        let _ = self.stream.reset();
        let _ = writeln!(self.stream, ": {diagnostic}");
    }
}
