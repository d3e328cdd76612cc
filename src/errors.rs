//! Unified error type for the Quill script front-end.
//!
//! Every fallible routine in the crate returns [`QuillError`]. Structural
//! failures (unterminated literals, unbalanced delimiters, arity violations)
//! abort the parse that raised them with no partial results. Unrecognized
//! commands are not errors at all; they travel through [`crate::diagnostics`]
//! and the rest of the script still parses.
//!
//! Spans point into the text span the failing routine was scanning, which is
//! also the content carried by the error's source context, so miette reports
//! always render the offending text with the failure position underlined.

use std::fmt;
use std::sync::Arc;

use miette::{Diagnostic, LabeledSpan, NamedSource, SourceSpan};
use thiserror::Error;

// ============================================================================
// SOURCE CONTEXT - Error reporting infrastructure
// ============================================================================

/// Source context for error reporting: the text a routine was scanning when it
/// failed, plus a display name for diagnostics.
#[derive(Debug, Clone)]
pub struct SourceContext {
    pub name: String,
    pub content: String,
}

impl SourceContext {
    /// Create a source context with an explicit display name.
    pub fn from_source(name: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            content: content.into(),
        }
    }

    /// Create a source context named `script`, the default for errors raised
    /// while scanning a detached script span.
    pub fn script(content: impl Into<String>) -> Self {
        Self::from_source("script", content)
    }

    /// Convert to NamedSource for use with miette error reporting.
    pub fn to_named_source(&self) -> Arc<NamedSource<String>> {
        Arc::new(NamedSource::new(self.name.clone(), self.content.clone()))
    }
}

// ============================================================================
// ERROR TYPE - Single struct, kind + source + diagnostic data
// ============================================================================

/// The single error type: what went wrong, where, and how to help.
#[derive(Debug, Error)]
#[error("{kind}")]
pub struct QuillError {
    /// What went wrong (type-specific data).
    pub kind: ErrorKind,
    /// Where it happened.
    pub source_info: SourceInfo,
    /// How to help.
    pub diagnostic_info: DiagnosticInfo,
}

/// All error kinds as a clean enum - no duplicate fields.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ErrorKind {
    /// A string literal was still open at the end of its span.
    #[error("missing closing quote in string literal")]
    MalformedLiteral,

    /// An open delimiter was never matched by its closing counterpart.
    #[error("missing '{close}' to match '{open}'")]
    UnbalancedDelimiter { open: char, close: char },

    /// A fixed-arity command was given an unacceptable parameter count.
    #[error("expected {expected} parameter(s) for '{keyword}', got {actual}")]
    ArityMismatch {
        keyword: String,
        expected: String,
        actual: usize,
    },

    /// A command's required syntax element is absent entirely.
    #[error("missing {element}")]
    MissingElement { element: String },

    /// Brace blocks nested deeper than the parser is willing to recurse.
    #[error("maximum block nesting depth ({limit}) exceeded")]
    RecursionLimit { limit: usize },
}

/// Context-specific source information.
#[derive(Debug, Clone)]
pub struct SourceInfo {
    pub source: Arc<NamedSource<String>>,
    pub primary_span: SourceSpan,
}

/// Diagnostic enhancement data.
#[derive(Debug, Clone)]
pub struct DiagnosticInfo {
    pub help: Option<String>,
    pub error_code: String,
}

impl QuillError {
    /// Create a structural parse error over the given source span.
    pub fn structural(
        kind: ErrorKind,
        source: &SourceContext,
        span: impl Into<SourceSpan>,
    ) -> Self {
        let error_code = format!("quill::parse::{}", kind.code_suffix());
        Self {
            kind,
            source_info: SourceInfo {
                source: source.to_named_source(),
                primary_span: span.into(),
            },
            diagnostic_info: DiagnosticInfo {
                help: None,
                error_code,
            },
        }
    }

    /// Attach a help message to an existing error.
    pub fn with_help(mut self, help: impl Into<String>) -> Self {
        self.diagnostic_info.help = Some(help.into());
        self
    }

    fn primary_label(&self) -> String {
        match &self.kind {
            ErrorKind::MalformedLiteral => "string opened here".into(),
            ErrorKind::UnbalancedDelimiter { .. } => "opened here".into(),
            ErrorKind::ArityMismatch { .. } => "in this command".into(),
            ErrorKind::MissingElement { .. } => "in this command".into(),
            ErrorKind::RecursionLimit { .. } => "block nested here".into(),
        }
    }
}

impl ErrorKind {
    /// Error code suffix used in diagnostic codes.
    pub const fn code_suffix(&self) -> &'static str {
        match self {
            Self::MalformedLiteral => "malformed_literal",
            Self::UnbalancedDelimiter { .. } => "unbalanced_delimiter",
            Self::ArityMismatch { .. } => "arity_mismatch",
            Self::MissingElement { .. } => "missing_element",
            Self::RecursionLimit { .. } => "recursion_limit",
        }
    }
}

impl Diagnostic for QuillError {
    fn code<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        Some(Box::new(&self.diagnostic_info.error_code))
    }

    fn help<'a>(&'a self) -> Option<Box<dyn fmt::Display + 'a>> {
        self.diagnostic_info
            .help
            .as_ref()
            .map(|h| Box::new(h) as Box<dyn fmt::Display>)
    }

    fn labels(&self) -> Option<Box<dyn Iterator<Item = LabeledSpan> + '_>> {
        let labels = vec![LabeledSpan::new_with_span(
            Some(self.primary_label()),
            self.source_info.primary_span,
        )];
        Some(Box::new(labels.into_iter()))
    }

    fn source_code(&self) -> Option<&dyn miette::SourceCode> {
        Some(&*self.source_info.source)
    }
}

// ============================================================================
// ERROR FORMATTING UTILITIES
// ============================================================================

/// Prints a QuillError with full miette diagnostics.
///
/// Use this for user-facing error display in CLI contexts.
pub fn print_report(error: QuillError) {
    let report = miette::Report::new(error);
    eprintln!("{report:?}");
}
