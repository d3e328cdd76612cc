//! Quill Script Parser - keyword dispatch and the top-level parse loop.
//!
//! Turns a script-block body into an ordered sequence of [`CommandNode`]s.
//! This parser is purely syntactic: expressions are carried verbatim, nothing
//! is resolved, type-checked, or evaluated.
//!
//! Error policy: structural failures (unterminated literals, unbalanced
//! delimiters, arity violations) abort the whole parse with no partial
//! results. An unrecognized keyword is recoverable: the line is skipped, a
//! diagnostic is delivered to the session's sink, and the rest of the script
//! still parses. Authors may reference commands not yet registered without
//! losing their script.

use std::sync::Arc;

use serde::Serialize;

use crate::diagnostics::{DiagnosticSink, ParseDiagnostic};
use crate::errors::{ErrorKind, QuillError, SourceContext};
use crate::lines::{next_logical_line, strip_surrounding_braces};
use crate::registry::{CommandDef, CommandKind, CommandRegistry};
use crate::scan::{extract_delimited, split_parameters};

/// Maximum nesting depth of brace blocks before a parse is rejected with
/// [`ErrorKind::RecursionLimit`] instead of risking stack exhaustion.
pub const MAX_BLOCK_DEPTH: usize = 64;

/// A custom command's structural parser: raw line text in, structured
/// parameter value out. May recurse into the script parser via the session.
pub type CustomParser = fn(&str, &mut ParseSession<'_>) -> Result<CommandParams, QuillError>;

/// Structured parameter value of one parsed command.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum CommandParams {
    /// Comma-separated parameters of a fixed-arity command, quotes retained.
    Positional(Vec<String>),
    /// An `if`-style compound: the condition text verbatim plus the
    /// recursively parsed block it guards.
    Conditional {
        expression: String,
        then_block: Vec<CommandNode>,
    },
}

/// The parsed, structured representation of one script command. Created once
/// during parsing, immutable thereafter. The raw line is a full copy, not a
/// view into the source.
#[derive(Debug, Clone, Serialize)]
pub struct CommandNode {
    pub keyword: String,
    pub line: String,
    #[serde(skip)]
    pub definition: Arc<CommandDef>,
    pub params: CommandParams,
}

// Node identity is its parsed content; the definition is just a link back to
// the registry entry the keyword resolved to.
impl PartialEq for CommandNode {
    fn eq(&self, other: &Self) -> bool {
        self.keyword == other.keyword && self.line == other.line && self.params == other.params
    }
}

/// Working state of one top-level parse call: the injected registry, the
/// diagnostic sink, and the current block nesting depth. Each parse owns its
/// session exclusively; nothing is shared across calls.
pub struct ParseSession<'a> {
    registry: &'a CommandRegistry,
    sink: &'a mut dyn DiagnosticSink,
    depth: usize,
}

impl<'a> ParseSession<'a> {
    pub fn registry(&self) -> &'a CommandRegistry {
        self.registry
    }

    /// Delivers a recoverable diagnostic to the session's sink.
    pub fn diagnose(&mut self, diagnostic: ParseDiagnostic) {
        self.sink.report(diagnostic);
    }

    /// Parses a nested script block, stripping one layer of surrounding
    /// braces first. Custom command parsers call this to build their
    /// sub-block sequences.
    pub fn parse_block(&mut self, text: &str) -> Result<Vec<CommandNode>, QuillError> {
        if self.depth >= MAX_BLOCK_DEPTH {
            return Err(QuillError::structural(
                ErrorKind::RecursionLimit {
                    limit: MAX_BLOCK_DEPTH,
                },
                &SourceContext::script(text),
                0..text.len(),
            ));
        }
        self.depth += 1;
        let result = parse_block_body(text, self);
        self.depth -= 1;
        result
    }
}

/// Parses a script-block body into an ordered sequence of command nodes.
///
/// The registry decides which keywords exist; the sink receives a diagnostic
/// for every line whose keyword is unrecognized. Node order is source order,
/// which is semantically meaningful since commands execute sequentially.
pub fn parse_script(
    source: &str,
    registry: &CommandRegistry,
    sink: &mut dyn DiagnosticSink,
) -> Result<Vec<CommandNode>, QuillError> {
    let mut session = ParseSession {
        registry,
        sink,
        depth: 0,
    };
    session.parse_block(source)
}

fn parse_block_body(
    text: &str,
    session: &mut ParseSession<'_>,
) -> Result<Vec<CommandNode>, QuillError> {
    let mut remaining = strip_surrounding_braces(text).to_string();
    let mut nodes = Vec::new();

    loop {
        let split = next_logical_line(&remaining)?;

        if !split.line.is_empty() {
            match dispatch(&split.line, session)? {
                Some(node) => nodes.push(node),
                None => session.diagnose(ParseDiagnostic::unrecognized_command(&split.line)),
            }
        }

        match split.remainder {
            Some(rest) => remaining = rest,
            None => break,
        }
    }

    Ok(nodes)
}

/// Dispatches one logical line against the registry. `Ok(None)` means no
/// registered keyword matched, which is the caller's cue to skip the line
/// with a diagnostic.
fn dispatch(
    line: &str,
    session: &mut ParseSession<'_>,
) -> Result<Option<CommandNode>, QuillError> {
    let Some((keyword, definition)) = session.registry().find_match(line) else {
        return Ok(None);
    };
    let keyword = keyword.to_string();
    let definition = Arc::clone(definition);

    let params = match &definition.kind {
        CommandKind::FixedArity { counts } => {
            let params = match extract_delimited(line, '(', ')')? {
                Some(span) => split_parameters(&span.content),
                None => Vec::new(),
            };
            if !counts.contains(&params.len()) {
                let expected = counts
                    .iter()
                    .map(ToString::to_string)
                    .collect::<Vec<_>>()
                    .join(" or ");
                return Err(QuillError::structural(
                    ErrorKind::ArityMismatch {
                        keyword,
                        expected,
                        actual: params.len(),
                    },
                    &SourceContext::script(line),
                    0..line.len(),
                ));
            }
            CommandParams::Positional(params)
        }
        CommandKind::Custom { parse } => parse(line, session)?,
    };

    Ok(Some(CommandNode {
        keyword,
        line: line.to_string(),
        definition,
        params,
    }))
}

/// Structural parser for the built-in `if` command: extracts the
/// parenthesized condition verbatim and recursively parses whatever follows
/// it as the guarded block.
pub fn parse_if(
    line: &str,
    session: &mut ParseSession<'_>,
) -> Result<CommandParams, QuillError> {
    let Some(condition) = extract_delimited(line, '(', ')')? else {
        return Err(QuillError::structural(
            ErrorKind::MissingElement {
                element: "parenthesized condition".into(),
            },
            &SourceContext::script(line),
            0..line.len(),
        )
        .with_help("an if command reads as: if (condition) { commands }"));
    };

    let then_block = session.parse_block(&condition.remainder)?;

    Ok(CommandParams::Conditional {
        expression: condition.content,
        then_block,
    })
}
