//! Logical-line segmentation for script blocks.
//!
//! A logical line is one command's worth of source text. Usually that is a
//! newline-delimited line, but when a brace block opens before the line would
//! otherwise end, the whole balanced `{...}` block is folded into the line so
//! the parser always dispatches on complete commands. A single-line block is
//! inlined with its braces dropped; a multi-line block keeps its braces so the
//! command's own parser can recurse into it as a distinct unit.

use crate::errors::QuillError;
use crate::scan::{extract_delimited, obscure_strings, DelimitedSpan};

/// One logical line peeled off the front of a script block. `remainder` is
/// `None` once the input is exhausted; the line itself is trimmed, the
/// remainder never is.
#[derive(Debug, Clone, PartialEq)]
pub struct LineSplit {
    pub line: String,
    pub remainder: Option<String>,
}

/// Removes one layer of surrounding braces, if and only if the trimmed text
/// both starts with `{` and ends with `}`.
pub fn strip_surrounding_braces(text: &str) -> &str {
    let trimmed = text.trim();
    if trimmed.len() >= 2 && trimmed.starts_with('{') && trimmed.ends_with('}') {
        &trimmed[1..trimmed.len() - 1]
    } else {
        trimmed
    }
}

/// Peels one logical line off the front of `text`.
///
/// Positions of the first `{`, the first newline, and the first `//` comment
/// marker are compared on the obscured view, so none of them can be found
/// inside a string literal. A brace block is folded into the line only when it
/// opens before the line would otherwise end and no comment marker precedes
/// it.
pub fn next_logical_line(text: &str) -> Result<LineSplit, QuillError> {
    let obscured = obscure_strings(text)?;
    let brace = obscured.find('{');
    let comment = obscured.find("//");

    let Some(newline) = obscured.find('\n') else {
        // Final line. A brace block can still open here; extracting it folds
        // single-line blocks and rejects unterminated ones.
        if let Some(b) = brace {
            if comment.map_or(true, |c| c > b) {
                if let Some(block) = extract_delimited(text, '{', '}')? {
                    return Ok(fold_block(&text[..b], block));
                }
            }
        }
        return Ok(LineSplit {
            line: text.trim().to_string(),
            remainder: None,
        });
    };

    if let Some(b) = brace {
        let comment_first = comment.is_some_and(|c| c < b);
        if b < newline && !comment_first {
            if let Some(block) = extract_delimited(text, '{', '}')? {
                return Ok(fold_block(&text[..b], block));
            }
        }
    }

    Ok(LineSplit {
        line: text[..newline].trim().to_string(),
        remainder: remainder_of(text[newline + 1..].to_string()),
    })
}

/// Reassembles a line whose brace block opened before its newline. Multi-line
/// block content keeps its braces; single-line content is inlined without
/// them.
fn fold_block(before_brace: &str, block: DelimitedSpan) -> LineSplit {
    let line = if block.content.contains('\n') {
        format!("{before_brace}{{{}}}", block.content)
    } else {
        format!("{before_brace}{}", block.content)
    };
    LineSplit {
        line: line.trim().to_string(),
        remainder: remainder_of(block.remainder),
    }
}

fn remainder_of(rest: String) -> Option<String> {
    if rest.is_empty() {
        None
    } else {
        Some(rest)
    }
}
