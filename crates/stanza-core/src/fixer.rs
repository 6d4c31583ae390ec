//! Application of fix edits to source text.

use thiserror::Error;
use tracing::{debug, trace, warn};

use crate::types::Edit;

/// Upper bound on lint-and-fix passes for a single file.
pub const MAX_FIX_PASSES: usize = 10;

/// Errors raised while applying edits.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FixError {
    /// An edit range lies outside the text or splits a character.
    #[error("invalid edit range {start}..{end} for text length {len}")]
    InvalidRange {
        /// Start of the rejected range.
        start: usize,
        /// End of the rejected range.
        end: usize,
        /// Length of the text the edit was applied to.
        len: usize,
    },
}

/// Result of applying a batch of edits.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Applied {
    /// Text after the edits.
    pub text: String,
    /// Number of edits written.
    pub applied: usize,
    /// Number of edits dropped because they overlapped an earlier one.
    pub skipped: usize,
}

/// Applies non-overlapping edits to `source`.
///
/// Edits are ordered by position; an edit overlapping one already accepted
/// is dropped and left for a later pass.
///
/// # Errors
///
/// Returns [`FixError::InvalidRange`] if an accepted edit does not fit the
/// text. Nothing is applied in that case.
pub fn apply_edits(source: &str, mut edits: Vec<Edit>) -> Result<Applied, FixError> {
    edits.sort_by(|a, b| a.start.cmp(&b.start).then(a.end.cmp(&b.end)));

    let mut accepted: Vec<Edit> = Vec::with_capacity(edits.len());
    let mut skipped = 0;
    for edit in edits {
        if accepted.last().is_some_and(|prev| prev.overlaps(&edit)) {
            trace!(start = edit.start, end = edit.end, "dropping overlapping edit");
            skipped += 1;
            continue;
        }
        accepted.push(edit);
    }

    for edit in &accepted {
        if edit.start > edit.end
            || !source.is_char_boundary(edit.start)
            || !source.is_char_boundary(edit.end)
        {
            return Err(FixError::InvalidRange {
                start: edit.start,
                end: edit.end,
                len: source.len(),
            });
        }
    }

    let mut text = source.to_string();
    for edit in accepted.iter().rev() {
        text.replace_range(edit.start..edit.end, &edit.replacement);
    }

    Ok(Applied {
        text,
        applied: accepted.len(),
        skipped,
    })
}

/// Outcome of [`fix_until_stable`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FixOutcome {
    /// Final text.
    pub text: String,
    /// Total edits applied across all passes.
    pub applied: usize,
    /// Passes that applied at least one edit.
    pub passes: usize,
}

/// Repeatedly collects and applies edits until none remain.
///
/// `collect` re-lints the current text and returns the fix edits it offers.
/// Stops when no edit is offered, when a pass changes nothing, or after
/// [`MAX_FIX_PASSES`]. When a pass reproduces an earlier text, conflicting
/// fixes are undoing each other: the outcome rewinds to that earlier text and
/// the edits of the cycle are not counted.
///
/// # Errors
///
/// Propagates [`FixError`] from [`apply_edits`].
pub fn fix_until_stable<F>(source: &str, mut collect: F) -> Result<FixOutcome, FixError>
where
    F: FnMut(&str) -> Vec<Edit>,
{
    // Text after each pass with the running edit count, starting at the source.
    let mut history = vec![(source.to_string(), 0)];

    while history.len() <= MAX_FIX_PASSES {
        let Some((text, applied)) = history.last() else {
            break;
        };
        let edits = collect(text);
        if edits.is_empty() {
            break;
        }
        let pass = apply_edits(text, edits)?;
        if pass.text == *text {
            break;
        }
        let applied = applied + pass.applied;

        if let Some(seen) = history.iter().position(|(t, _)| *t == pass.text) {
            warn!(
                cycle = history.len() - seen,
                "fixes undo each other, keeping the text before the cycle"
            );
            history.truncate(seen + 1);
            break;
        }
        history.push((pass.text, applied));
    }

    let passes = history.len() - 1;
    let (text, applied) = history.pop().unwrap_or_default();
    debug!(applied, passes, "fixing finished");
    Ok(FixOutcome {
        text,
        applied,
        passes,
    })
}
