//! Line-break aware gap analysis.
//!
//! A "gap" is the source text between the end of one statement and the start
//! of the next. Line breaks are `\n` or `\r\n`; both are handled the same so
//! results never depend on the file's line-ending convention.
//!
//! Comments inside a gap can be masked with [`Gap::masking`], so a line break
//! or blank line inside a block comment never counts as one between the
//! statements.

use std::borrow::Cow;

use stanza_ast::Span;

/// Returns the source text in `[prev_end, next_start)`.
///
/// `None` when the offsets are reversed, out of bounds or split a character,
/// so callers skip the pair instead of guessing.
#[must_use]
pub fn gap(source: &str, prev_end: usize, next_start: usize) -> Option<&str> {
    if prev_end > next_start {
        return None;
    }
    source.get(prev_end..next_start)
}

/// Splits `text` on `\n` and `\r\n`.
///
/// The result always has `line breaks + 1` segments.
#[must_use]
pub fn segments(text: &str) -> Vec<&str> {
    text.split('\n')
        .map(|seg| seg.strip_suffix('\r').unwrap_or(seg))
        .collect()
}

/// Returns the offset and text of the first line break in `text`.
#[must_use]
pub fn first_line_break(text: &str) -> Option<(usize, &'static str)> {
    let idx = text.find('\n')?;
    if idx > 0 && text.as_bytes()[idx - 1] == b'\r' {
        Some((idx - 1, "\r\n"))
    } else {
        Some((idx, "\n"))
    }
}

/// Returns true if `text` contains a line break.
#[must_use]
pub fn has_line_break(text: &str) -> bool {
    text.contains('\n')
}

/// Returns true if the segment holds nothing but spaces, tabs or a BOM.
#[must_use]
pub fn is_blank(segment: &str) -> bool {
    segment
        .chars()
        .all(|c| matches!(c, ' ' | '\t' | '\u{feff}'))
}

/// Returns true if `text` contains at least one fully blank line.
///
/// Requires three or more segments with a blank interior one: a single
/// line break followed by indentation is not a blank line.
#[must_use]
pub fn contains_blank_line(text: &str) -> bool {
    let segs = segments(text);
    segs.len() >= 3 && segs[1..segs.len() - 1].iter().any(|s| is_blank(s))
}

/// Returns true if a blank line separates `prev_end` from `next_start`.
///
/// Invalid offsets report `false`.
#[must_use]
pub fn has_blank_line(source: &str, prev_end: usize, next_start: usize) -> bool {
    gap(source, prev_end, next_start).is_some_and(contains_blank_line)
}

/// The text between two statements, optionally with its comments masked.
///
/// Masking replaces every byte of a comment with a non-blank placeholder of
/// the same width, so offsets into the masked view match the source.
#[derive(Debug, Clone)]
pub struct Gap<'a> {
    start: usize,
    text: &'a str,
    masked: Cow<'a, str>,
}

impl<'a> Gap<'a> {
    /// Slices the gap `[prev_end, next_start)`, `None` for invalid offsets.
    #[must_use]
    pub fn new(source: &'a str, prev_end: usize, next_start: usize) -> Option<Self> {
        let text = gap(source, prev_end, next_start)?;
        Some(Self {
            start: prev_end,
            text,
            masked: Cow::Borrowed(text),
        })
    }

    /// Hides every comment overlapping the gap.
    #[must_use]
    pub fn masking(mut self, comments: &[Span]) -> Self {
        let end = self.start + self.text.len();
        let mut bytes = self.masked.as_bytes().to_vec();
        let mut touched = false;

        for comment in comments
            .iter()
            .filter(|c| c.start < end && self.start < c.end)
        {
            let from = comment.start.max(self.start) - self.start;
            let to = comment.end.min(end) - self.start;
            bytes[from..to].fill(b'#');
            touched = true;
        }

        if touched {
            // Comment and gap bounds are char boundaries, so the bytes stay UTF-8.
            if let Ok(masked) = String::from_utf8(bytes) {
                self.masked = Cow::Owned(masked);
            }
        }
        self
    }

    /// Original gap text.
    #[must_use]
    pub fn text(&self) -> &'a str {
        self.text
    }

    /// True if a blank line lies outside every masked comment.
    #[must_use]
    pub fn has_blank_line(&self) -> bool {
        contains_blank_line(&self.masked)
    }

    /// Relative offset and text of the first unmasked line break.
    #[must_use]
    pub fn first_line_break(&self) -> Option<(usize, &'static str)> {
        first_line_break(&self.masked)
    }

    /// Relative byte ranges of the gap's lines, line breaks excluded.
    ///
    /// A masked multi-line comment stays inside one range.
    #[must_use]
    pub fn line_ranges(&self) -> Vec<(usize, usize)> {
        let bytes = self.masked.as_bytes();
        let mut ranges = Vec::new();
        let mut from = 0;
        for (idx, &b) in bytes.iter().enumerate() {
            if b == b'\n' {
                let to = if idx > from && bytes[idx - 1] == b'\r' {
                    idx - 1
                } else {
                    idx
                };
                ranges.push((from, to));
                from = idx + 1;
            }
        }
        ranges.push((from, bytes.len()));
        ranges
    }

    /// Original text of a line range.
    #[must_use]
    pub fn line(&self, range: (usize, usize)) -> &'a str {
        self.text.get(range.0..range.1).unwrap_or("")
    }

    /// True if the line range holds no code and no comment.
    #[must_use]
    pub fn is_blank_line(&self, range: (usize, usize)) -> bool {
        self.masked.get(range.0..range.1).is_some_and(is_blank)
    }
}
