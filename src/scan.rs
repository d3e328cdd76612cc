//! Low-level scanning routines shared by the line segmenter and the parser.
//!
//! All text handling in this crate is built on one trick: before any
//! structural scan (for `{`, `(`, `,` or `//`) the text is *obscured*, meaning
//! every character inside a quoted string literal is replaced by a neutral
//! filler. Structural scans then use plain substring search on the obscured
//! view while slicing the original text, so delimiter-shaped characters inside
//! string literals can never misfire.
//!
//! Every routine here is a pure function returning newly owned data; callers
//! own what they receive.

use crate::errors::{ErrorKind, QuillError, SourceContext};

/// Filler character for obscured string-literal content. Not a quote and not
/// any delimiter the structural scans look for.
const OBSCURE_FILLER: u8 = b'-';

/// The text strictly between a matched delimiter pair, plus everything after
/// the closing delimiter. `content` and `remainder` are slices of the original
/// (non-obscured) text, copied out.
#[derive(Debug, Clone, PartialEq)]
pub struct DelimitedSpan {
    pub content: String,
    pub remainder: String,
}

/// Splits text into alternating outside-quote / inside-quote segments.
///
/// A backslash causes the following character to be copied verbatim, so an
/// escaped quote never toggles quote state. The backslash itself stays in the
/// segment: rejoining the segments with `"` between them reconstructs the
/// input exactly. The first segment is always outside quotes, and the segment
/// count is always odd for well-formed input.
///
/// Fails with [`ErrorKind::MalformedLiteral`] if a string literal is still
/// open at the end of the text.
pub fn split_quotes(text: &str) -> Result<Vec<String>, QuillError> {
    let mut segments = Vec::new();
    let mut current = String::new();
    let mut process_next = true;
    let mut inside_quote = false;
    let mut open_quote_pos = 0;

    for (pos, ch) in text.char_indices() {
        let process_this = process_next;
        process_next = true;

        if process_this {
            if ch == '\\' {
                process_next = false;
            } else if ch == '"' {
                segments.push(std::mem::take(&mut current));
                inside_quote = !inside_quote;
                if inside_quote {
                    open_quote_pos = pos;
                }
                continue;
            }
        }

        current.push(ch);
    }

    if inside_quote {
        return Err(QuillError::structural(
            ErrorKind::MalformedLiteral,
            &SourceContext::script(text),
            open_quote_pos..text.len(),
        ));
    }

    segments.push(current);
    Ok(segments)
}

/// Produces an equal-length view of `text` in which the content of every
/// quoted string literal is replaced by [`OBSCURE_FILLER`]. Quote delimiters
/// and unquoted text pass through unchanged.
///
/// The padding is byte-for-byte, so any byte offset found in the obscured view
/// is valid in the original text, and every offset outside a literal lands on
/// a character boundary there.
pub fn obscure_strings(text: &str) -> Result<String, QuillError> {
    let segments = split_quotes(text)?;
    let last = segments.len() - 1;
    let mut result = String::with_capacity(text.len());

    let mut inside_quote = false;
    for (i, segment) in segments.iter().enumerate() {
        if inside_quote {
            for _ in 0..segment.len() {
                result.push(OBSCURE_FILLER as char);
            }
        } else {
            result.push_str(segment);
        }
        if i < last {
            result.push('"');
        }
        inside_quote = !inside_quote;
    }

    Ok(result)
}

/// Finds the first `open` delimiter (ignoring any inside string literals) and
/// returns the balanced span up to its matching `close`, handling arbitrary
/// nesting of the same pair. Returns `Ok(None)` when `open` never appears,
/// which is distinct from failure.
///
/// Fails with [`ErrorKind::UnbalancedDelimiter`] if the text ends before the
/// matching close delimiter.
pub fn extract_delimited(
    text: &str,
    open: char,
    close: char,
) -> Result<Option<DelimitedSpan>, QuillError> {
    let obscured = obscure_strings(text)?;
    let Some(start) = obscured.find(open) else {
        return Ok(None);
    };

    let content_start = start + open.len_utf8();
    let mut depth = 1usize;

    for (offset, ch) in obscured[content_start..].char_indices() {
        if ch == open {
            depth += 1;
        } else if ch == close {
            depth -= 1;
            if depth == 0 {
                let pos = content_start + offset;
                return Ok(Some(DelimitedSpan {
                    content: text[content_start..pos].to_string(),
                    remainder: text[pos + close.len_utf8()..].to_string(),
                }));
            }
        }
    }

    Err(QuillError::structural(
        ErrorKind::UnbalancedDelimiter { open, close },
        &SourceContext::script(text),
        start..text.len(),
    ))
}

/// Splits the contents of a parenthesized argument list into individual
/// parameters on top-level commas only. Commas inside string literals or
/// inside nested parentheses do not split; a backslash shields the following
/// character from all structural logic. Each parameter is trimmed of
/// surrounding whitespace.
///
/// Empty or whitespace-only input yields no parameters at all, so `cmd()`
/// carries zero parameters rather than one empty one.
pub fn split_parameters(text: &str) -> Vec<String> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    let mut result = Vec::new();
    let mut current = String::new();
    let mut process_next = true;
    let mut inside_quote = false;
    let mut depth = 0usize;

    for ch in text.chars() {
        let process_this = process_next;
        process_next = true;

        if process_this {
            if ch == '\\' {
                process_next = false;
            } else if ch == '"' {
                inside_quote = !inside_quote;
            } else if !inside_quote {
                if ch == '(' {
                    depth += 1;
                } else if ch == ')' {
                    depth = depth.saturating_sub(1);
                } else if ch == ',' && depth == 0 {
                    result.push(std::mem::take(&mut current));
                    continue;
                }
            }
        }

        current.push(ch);
    }

    result.push(current);
    result
        .into_iter()
        .map(|param| param.trim().to_string())
        .collect()
}
