//! Core types for lint violations, fixes and results.

use miette::{Diagnostic, SourceSpan};
use serde::{Deserialize, Serialize};
use stanza_ast::Span;
use std::path::PathBuf;

/// Severity level for lint violations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Informational message, does not fail lint.
    Info,
    /// Warning that should be addressed.
    Warning,
    /// Error that must be fixed.
    Error,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Info => write!(f, "info"),
            Self::Warning => write!(f, "warning"),
            Self::Error => write!(f, "error"),
        }
    }
}

/// Source code location.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Location {
    /// File path relative to project root.
    pub file: PathBuf,
    /// Line number (1-indexed).
    pub line: usize,
    /// Column number (1-indexed, in characters).
    pub column: usize,
    /// Byte offset in file.
    pub offset: usize,
    /// Length of the span in bytes.
    pub length: usize,
}

impl Location {
    /// Creates a location for a byte span of `content`.
    #[must_use]
    pub fn from_span(file: PathBuf, content: &str, span: Span) -> Self {
        let offset = span.start.min(content.len());
        let before = content.get(..offset).unwrap_or("");
        let line = before.matches('\n').count() + 1;
        let line_start = before.rfind('\n').map_or(0, |i| i + 1);
        let column = before
            .get(line_start..)
            .map_or(0, |l| l.chars().count())
            + 1;

        Self {
            file,
            line,
            column,
            offset,
            length: span.len(),
        }
    }

    /// Creates a new location with explicit values.
    #[must_use]
    pub fn new(file: PathBuf, line: usize, column: usize) -> Self {
        Self {
            file,
            line,
            column,
            offset: 0,
            length: 0,
        }
    }
}

/// A text replacement over `[start, end)` of the original source.
///
/// Insertions have `start == end`; deletions have an empty replacement.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Edit {
    /// First replaced byte.
    pub start: usize,
    /// One past the last replaced byte.
    pub end: usize,
    /// Text written in place of the range.
    pub replacement: String,
}

impl Edit {
    /// Replaces `[start, end)` with `replacement`.
    #[must_use]
    pub fn replace(start: usize, end: usize, replacement: impl Into<String>) -> Self {
        Self {
            start,
            end,
            replacement: replacement.into(),
        }
    }

    /// Inserts `text` at `at`.
    #[must_use]
    pub fn insert(at: usize, text: impl Into<String>) -> Self {
        Self::replace(at, at, text)
    }

    /// Deletes `[start, end)`.
    #[must_use]
    pub fn remove(start: usize, end: usize) -> Self {
        Self::replace(start, end, String::new())
    }

    /// Returns true if the two edits touch overlapping bytes.
    ///
    /// Two insertions at the same offset also conflict, since their relative
    /// order would be arbitrary.
    #[must_use]
    pub fn overlaps(&self, other: &Self) -> bool {
        if self.start == other.start {
            return true;
        }
        self.start < other.end && other.start < self.end
    }
}

/// A suggested fix for a violation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Suggestion {
    /// Human-readable description of the fix.
    pub message: String,
    /// Automatic edit, `None` when the fix was refused as unsafe.
    pub edit: Option<Edit>,
}

impl Suggestion {
    /// Creates a new suggestion with automatic fix.
    #[must_use]
    pub fn with_fix(message: impl Into<String>, edit: Edit) -> Self {
        Self {
            message: message.into(),
            edit: Some(edit),
        }
    }

    /// Creates a suggestion whose fix may have been refused.
    #[must_use]
    pub fn with_optional_fix(message: impl Into<String>, edit: Option<Edit>) -> Self {
        Self {
            message: message.into(),
            edit,
        }
    }
}

/// A lint violation found during analysis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Violation {
    /// Rule code (e.g., "ST001").
    pub code: String,
    /// Rule name (e.g., "statement-grouping").
    pub rule: String,
    /// Stable message identifier (e.g., "expectedBlankLine").
    pub message_id: String,
    /// Severity of this violation.
    pub severity: Severity,
    /// Primary location of the violation.
    pub location: Location,
    /// Human-readable message.
    pub message: String,
    /// Optional suggestion for fixing.
    pub suggestion: Option<Suggestion>,
}

impl Violation {
    /// Creates a new violation.
    #[must_use]
    pub fn new(
        code: impl Into<String>,
        rule: impl Into<String>,
        message_id: impl Into<String>,
        severity: Severity,
        location: Location,
        message: impl Into<String>,
    ) -> Self {
        Self {
            code: code.into(),
            rule: rule.into(),
            message_id: message_id.into(),
            severity,
            location,
            message: message.into(),
            suggestion: None,
        }
    }

    /// Adds a suggestion to this violation.
    #[must_use]
    pub fn with_suggestion(mut self, suggestion: Suggestion) -> Self {
        self.suggestion = Some(suggestion);
        self
    }

    /// The automatic fix, if one was synthesized.
    #[must_use]
    pub fn fix(&self) -> Option<&Edit> {
        self.suggestion.as_ref().and_then(|s| s.edit.as_ref())
    }

    /// Returns true if an automatic fix is available.
    #[must_use]
    pub fn is_fixable(&self) -> bool {
        self.fix().is_some()
    }
}

impl std::fmt::Display for Violation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}:{}:{}: {} [{}/{}] {}",
            self.location.file.display(),
            self.location.line,
            self.location.column,
            self.severity,
            self.code,
            self.message_id,
            self.message
        )
    }
}

/// A violation rendered as a miette diagnostic.
#[derive(Debug, thiserror::Error, Diagnostic)]
#[error("{message}")]
pub struct ViolationDiagnostic {
    message: String,
    #[help]
    help: Option<String>,
    #[label("{label_message}")]
    span: SourceSpan,
    label_message: String,
}

impl From<&Violation> for ViolationDiagnostic {
    fn from(v: &Violation) -> Self {
        Self {
            message: format!("[{}] {}", v.code, v.message),
            help: v.suggestion.as_ref().map(|s| s.message.clone()),
            span: SourceSpan::from((v.location.offset, v.location.length)),
            label_message: format!("{}/{}", v.rule, v.message_id),
        }
    }
}

/// Result of running lint analysis.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct LintResult {
    /// All violations found.
    pub violations: Vec<Violation>,
    /// Number of files checked.
    pub files_checked: usize,
    /// Number of files rewritten by `--fix`.
    #[serde(default)]
    pub files_fixed: usize,
}

impl LintResult {
    /// Creates a new empty result.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns true if there are any errors.
    #[must_use]
    pub fn has_errors(&self) -> bool {
        self.violations
            .iter()
            .any(|v| v.severity == Severity::Error)
    }

    /// Counts violations by severity.
    #[must_use]
    pub fn count_by_severity(&self) -> (usize, usize, usize) {
        let count = |severity| {
            self.violations
                .iter()
                .filter(|v| v.severity == severity)
                .count()
        };
        (
            count(Severity::Error),
            count(Severity::Warning),
            count(Severity::Info),
        )
    }

    /// Number of violations carrying an automatic fix.
    #[must_use]
    pub fn fixable_count(&self) -> usize {
        self.violations.iter().filter(|v| v.is_fixable()).count()
    }

    /// Adds violations from another result.
    pub fn extend(&mut self, other: Self) {
        self.violations.extend(other.violations);
        self.files_checked += other.files_checked;
        self.files_fixed += other.files_fixed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_violation(severity: Severity) -> Violation {
        Violation::new(
            "ST001",
            "statement-grouping",
            "expectedBlankLine",
            severity,
            Location::new(PathBuf::from("src/app.ts"), 2, 1),
            "Expected a blank line before this statement",
        )
    }

    #[test]
    fn location_from_span_counts_lines_and_chars() {
        let content = "const a = 1;\nconst é = 2;\n";
        let loc = Location::from_span(PathBuf::from("a.ts"), content, Span::new(22, 23));
        assert_eq!(loc.line, 2);
        assert_eq!(loc.column, 9);
        assert_eq!(loc.offset, 22);
        assert_eq!(loc.length, 1);
    }

    #[test]
    fn location_clamps_out_of_range_offsets() {
        let loc = Location::from_span(PathBuf::from("a.ts"), "ab", Span::new(10, 12));
        assert_eq!(loc.offset, 2);
        assert_eq!(loc.line, 1);
    }

    #[test]
    fn edit_overlap() {
        let a = Edit::replace(0, 4, "x");
        assert!(a.overlaps(&Edit::replace(3, 6, "")));
        assert!(!a.overlaps(&Edit::replace(4, 6, "")));
        assert!(Edit::insert(5, "\n").overlaps(&Edit::insert(5, "\n")));
        assert!(!Edit::insert(4, "\n").overlaps(&Edit::replace(5, 6, "")));
    }

    #[test]
    fn violation_without_suggestion_is_not_fixable() {
        assert!(!make_violation(Severity::Warning).is_fixable());
    }

    #[test]
    fn refused_fix_keeps_help_text() {
        let v = make_violation(Severity::Warning)
            .with_suggestion(Suggestion::with_optional_fix("Insert a blank line", None));
        assert!(!v.is_fixable());
        let diagnostic = ViolationDiagnostic::from(&v);
        assert_eq!(diagnostic.help.as_deref(), Some("Insert a blank line"));
    }

    #[test]
    fn fix_is_exposed_with_suggestion() {
        let v = make_violation(Severity::Warning).with_suggestion(Suggestion::with_fix(
            "Insert a blank line",
            Edit::insert(3, "\n"),
        ));
        assert!(v.is_fixable());
        assert_eq!(v.fix().map(|e| e.start), Some(3));
    }

    #[test]
    fn display_includes_message_id() {
        let display = format!("{}", make_violation(Severity::Error));
        assert_eq!(
            display,
            "src/app.ts:2:1: error [ST001/expectedBlankLine] Expected a blank line before this statement"
        );
    }

    #[test]
    fn counts_by_severity() {
        let mut result = LintResult::new();
        result.violations.push(make_violation(Severity::Warning));
        assert!(!result.has_errors());
        assert_eq!(result.count_by_severity(), (0, 1, 0));
    }
}
