//! Command registry: the keyword table the parser dispatches against.
//!
//! The registry is an explicit value passed by reference into every parse,
//! never ambient global state. Build one at the entrypoint and share it; a
//! built registry is read-only, so concurrent parses can borrow the same
//! instance freely. This also makes per-dialect registries trivial: a test or
//! a game system registers exactly the commands it speaks.
//!
//! ## Usage Workflow
//! ```rust
//! use quill::registry::CommandRegistry;
//! // 1. Build the registry once at the entrypoint
//! let registry = CommandRegistry::with_default_commands();
//! // 2. Pass it by reference into every parse
//! assert!(!registry.is_empty());
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use crate::parser::CustomParser;

/// A single command definition: either a fixed set of acceptable parameter
/// counts, or a custom structural parser for compound syntax.
#[derive(Debug)]
pub struct CommandDef {
    pub kind: CommandKind,
}

#[derive(Debug)]
pub enum CommandKind {
    /// Plain `keyword(a, b, ...)` syntax with statically declared acceptable
    /// parameter counts.
    FixedArity { counts: Vec<usize> },
    /// Bespoke structural parsing beyond comma-separated parameters, e.g. a
    /// nested sub-block. The parser function may recurse into the script
    /// parser through its session.
    Custom { parse: CustomParser },
}

/// Keyword-to-definition table. Immutable once built.
#[derive(Debug, Default)]
pub struct CommandRegistry {
    commands: HashMap<String, Arc<CommandDef>>,
}

impl CommandRegistry {
    /// An empty registry. Most callers want [`with_default_commands`]
    /// instead.
    ///
    /// [`with_default_commands`]: CommandRegistry::with_default_commands
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a registry populated with the built-in command set.
    pub fn with_default_commands() -> Self {
        let mut registry = Self::new();
        registry.register_fixed("msg", &[1]);
        registry.register_custom("if", crate::parser::parse_if);
        registry
    }

    /// Registers a fixed-arity command accepting any of the given parameter
    /// counts. Re-registering a keyword replaces its definition.
    pub fn register_fixed(&mut self, keyword: impl Into<String>, counts: &[usize]) {
        self.commands.insert(
            keyword.into(),
            Arc::new(CommandDef {
                kind: CommandKind::FixedArity {
                    counts: counts.to_vec(),
                },
            }),
        );
    }

    /// Registers a command with a custom structural parser.
    pub fn register_custom(&mut self, keyword: impl Into<String>, parse: CustomParser) {
        self.commands.insert(
            keyword.into(),
            Arc::new(CommandDef {
                kind: CommandKind::Custom { parse },
            }),
        );
    }

    /// Looks up a definition by exact keyword.
    pub fn lookup(&self, keyword: &str) -> Option<&Arc<CommandDef>> {
        self.commands.get(keyword)
    }

    /// Finds the command a line dispatches to: the longest registered keyword
    /// that prefixes the line and is followed by a non-word character (or the
    /// end of the line). Longest-match-wins keeps dispatch deterministic, and
    /// the word-boundary check keeps `ifx(...)` from matching `if`.
    pub fn find_match(&self, line: &str) -> Option<(&str, &Arc<CommandDef>)> {
        self.commands
            .iter()
            .filter(|(keyword, _)| {
                line.starts_with(keyword.as_str()) && word_boundary_after(line, keyword.len())
            })
            .max_by_key(|(keyword, _)| keyword.len())
            .map(|(keyword, definition)| (keyword.as_str(), definition))
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }
}

fn word_boundary_after(line: &str, end: usize) -> bool {
    match line[end..].chars().next() {
        Some(c) => !(c.is_alphanumeric() || c == '_'),
        None => true,
    }
}
