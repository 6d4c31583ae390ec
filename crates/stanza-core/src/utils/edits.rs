//! Safe edit synthesis.
//!
//! Every function returns `None` instead of an edit whenever the change could
//! touch more than intended: a statement pair on one line, a removal span
//! crossing a line break or a comment, a key that is not a bare identifier.
//! The violation is still reported by the caller, just without a fix.
//!
//! Functions taking `comments` never place a line break inside a comment and
//! never delete comment text.
//!
//! All produced edits are idempotent: re-running the check that requested
//! them on the edited text yields no further edit for the same pair.

use stanza_ast::Span;
use tracing::trace;

use super::lines::{has_line_break, is_blank, Gap};
use crate::types::Edit;

fn overlaps_comment(comments: &[Span], start: usize, end: usize) -> bool {
    comments.iter().any(|c| c.start < end && start < c.end)
}

fn in_comment(comments: &[Span], offset: usize) -> bool {
    comments.iter().any(|c| c.start <= offset && offset < c.end)
}

/// Adds one blank line between two statements.
///
/// Duplicates the first line break of the gap that lies outside a comment,
/// so comments and indentation stay untouched and the original `\n` / `\r\n`
/// style is kept.
#[must_use]
pub fn insert_blank_line(
    source: &str,
    prev_end: usize,
    next_start: usize,
    comments: &[Span],
) -> Option<Edit> {
    let gap = Gap::new(source, prev_end, next_start)?.masking(comments);
    let Some((idx, line_break)) = gap.first_line_break() else {
        trace!(prev_end, next_start, "statements share a line, no blank line inserted");
        return None;
    };
    Some(Edit::insert(prev_end + idx, line_break))
}

/// Drops every blank line between two statements.
///
/// Non-blank interior lines (comments) are kept whole, each followed by the
/// gap's line break. Blank lines inside a block comment are part of the
/// comment and stay. Returns `None` when the gap has no interior line at all.
#[must_use]
pub fn remove_blank_lines(
    source: &str,
    prev_end: usize,
    next_start: usize,
    comments: &[Span],
) -> Option<Edit> {
    let gap = Gap::new(source, prev_end, next_start)?.masking(comments);
    let lines = gap.line_ranges();
    if lines.len() < 3 {
        return None;
    }
    let (_, line_break) = gap.first_line_break()?;

    let last = lines.len() - 1;
    let mut rebuilt = String::with_capacity(gap.text().len());
    rebuilt.push_str(gap.line(lines[0]));
    rebuilt.push_str(line_break);
    for &range in &lines[1..last] {
        if !gap.is_blank_line(range) {
            rebuilt.push_str(gap.line(range));
            rebuilt.push_str(line_break);
        }
    }
    rebuilt.push_str(gap.line(lines[last]));

    if rebuilt == gap.text() {
        return None;
    }
    Some(Edit::replace(prev_end, next_start, rebuilt))
}

fn is_horizontal(b: u8) -> bool {
    b == b' ' || b == b'\t'
}

fn skip_horizontal(bytes: &[u8], mut idx: usize) -> usize {
    while idx < bytes.len() && is_horizontal(bytes[idx]) {
        idx += 1;
    }
    idx
}

fn skip_horizontal_back(bytes: &[u8], mut idx: usize) -> usize {
    while idx > 0 && is_horizontal(bytes[idx - 1]) {
        idx -= 1;
    }
    idx
}

fn skip_whitespace(bytes: &[u8], mut idx: usize) -> usize {
    while idx < bytes.len() && bytes[idx].is_ascii_whitespace() {
        idx += 1;
    }
    idx
}

fn skip_whitespace_back(bytes: &[u8], mut idx: usize) -> usize {
    while idx > 0 && bytes[idx - 1].is_ascii_whitespace() {
        idx -= 1;
    }
    idx
}

/// Removes a list element together with one adjacent separator.
///
/// Prefers the separator after the element (plus the horizontal whitespace
/// following it); otherwise takes the separator before it (plus the
/// whitespace between it and the element). Refuses when a comment stands
/// between the element and its neighbour, when the span would touch a
/// comment, or when it crosses a line break.
#[must_use]
pub fn remove_list_element(
    source: &str,
    element: Span,
    separator: u8,
    comments: &[Span],
) -> Option<Edit> {
    if element.start > element.end || element.end > source.len() {
        return None;
    }
    let bytes = source.as_bytes();
    let mut start = element.start;
    let mut end = element.end;

    let after = skip_whitespace(bytes, element.end);
    let before = skip_whitespace_back(bytes, element.start);
    if in_comment(comments, after) || (before > 0 && in_comment(comments, before - 1)) {
        trace!(start, end, "comment next to list element");
        return None;
    }

    if bytes.get(after) == Some(&separator) {
        end = skip_horizontal(bytes, after + 1);
    } else if before > 0 && bytes[before - 1] == separator {
        start = skip_horizontal_back(bytes, before - 1);
    }

    let removed = source.get(start..end)?;
    if has_line_break(removed) || overlaps_comment(comments, start, end) {
        trace!(start, end, "list element removal crosses a line break or comment");
        return None;
    }
    Some(Edit::remove(start, end))
}

/// Removes a single-line statement together with its line.
///
/// Refuses when the statement spans several lines or shares its line with
/// anything other than whitespace.
#[must_use]
pub fn remove_whole_line(source: &str, stmt: Span) -> Option<Edit> {
    let text = stmt.text(source)?;
    if has_line_break(text) {
        return None;
    }

    let before = source.get(..stmt.start)?;
    let line_start = before.rfind('\n').map_or(0, |i| i + 1);
    if !before.get(line_start..).is_some_and(is_blank) {
        trace!(start = stmt.start, "statement shares its line with preceding code");
        return None;
    }

    let rest = source.get(stmt.end..)?;
    let line_end = rest.find('\n');
    let tail = &rest[..line_end.unwrap_or(rest.len())];
    if !is_blank(tail.strip_suffix('\r').unwrap_or(tail)) {
        trace!(end = stmt.end, "statement shares its line with trailing code");
        return None;
    }

    let end = line_end.map_or(source.len(), |i| stmt.end + i + 1);
    Some(Edit::remove(line_start, end))
}

/// Returns true for a bare ASCII identifier (`[A-Za-z_$][A-Za-z0-9_$]*`).
#[must_use]
pub fn is_identifier_name(text: &str) -> bool {
    let mut chars = text.chars();
    let Some(first) = chars.next() else {
        return false;
    };
    (first.is_ascii_alphabetic() || first == '_' || first == '$')
        && chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}

/// A computed member access keyed by a string literal (`obj['key']`).
#[derive(Debug, Clone, Copy)]
pub struct BracketAccess<'a> {
    /// Whole access range.
    pub access: Span,
    /// Receiver range.
    pub object: Span,
    /// Literal key text between the quotes.
    pub key: &'a str,
    /// Accessed through `?.`.
    pub optional: bool,
    /// Receiver is a plain identifier.
    pub simple_receiver: bool,
}

/// Rewrites `obj['key']` to `obj.key`.
///
/// Refuses unless the key is a bare identifier, the receiver is a plain
/// identifier, the whole access sits on one line and no comment lies in the
/// replaced range.
#[must_use]
pub fn dot_access(source: &str, access: &BracketAccess<'_>, comments: &[Span]) -> Option<Edit> {
    if !access.simple_receiver || !is_identifier_name(access.key) {
        return None;
    }
    if !access.access.contains(access.object) {
        return None;
    }
    if overlaps_comment(comments, access.object.end, access.access.end) {
        trace!(start = access.object.end, "comment inside bracket access");
        return None;
    }
    let text = access.access.text(source)?;
    if has_line_break(text) {
        return None;
    }

    let replacement = if access.optional {
        format!("?.{}", access.key)
    } else {
        format!(".{}", access.key)
    };
    Some(Edit::replace(
        access.object.end,
        access.access.end,
        replacement,
    ))
}
