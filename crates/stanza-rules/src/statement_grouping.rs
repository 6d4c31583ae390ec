//! Rule requiring a blank line wherever the statement group changes.
//!
//! Statements are grouped by [`classify`]: imports, declarations, `this`
//! assignments, plain calls and so on. Two adjacent statements of different
//! groups must be separated by a blank line, and so must two statements of an
//! isolated group (functions, classes, types, interfaces, test blocks).
//!
//! The rule only ever adds blank lines. It never asks for one to be removed.
//!
//! # Configuration
//!
//! - `loggers`: receivers whose calls count as logging (default: `["console", "logger"]`)
//! - `test_callees`: bare callees that open a test block (default: `["it", "describe"]`)

use stanza_ast::{Program, Span, Stmt};
use stanza_core::utils::{insert_blank_line, Gap};
use stanza_core::{FileContext, Rule, RuleConfig, Severity, Suggestion, Violation};
use tracing::trace;

use crate::classify::{classify, ClassifyOptions, GroupTag};
use crate::lists::statement_lists;

/// Rule code for statement-grouping.
pub const CODE: &str = "ST001";

/// Rule name for statement-grouping.
pub const NAME: &str = "statement-grouping";

/// Message id for a missing blank line.
pub const EXPECTED_BLANK_LINE: &str = "expectedBlankLine";

/// Requires blank lines between statements of different groups.
#[derive(Debug, Clone)]
pub struct StatementGrouping {
    /// Name sets used by the classifier.
    pub options: ClassifyOptions,
    /// Custom severity.
    pub severity: Severity,
}

impl Default for StatementGrouping {
    fn default() -> Self {
        Self::new()
    }
}

impl StatementGrouping {
    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            options: ClassifyOptions::default(),
            severity: Severity::Warning,
        }
    }

    /// Creates the rule from its configuration block.
    #[must_use]
    pub fn from_config(config: &RuleConfig) -> Self {
        Self::new().options(ClassifyOptions::from_config(config))
    }

    /// Sets the classifier name sets.
    #[must_use]
    pub fn options(mut self, options: ClassifyOptions) -> Self {
        self.options = options;
        self
    }

    /// Sets the severity level.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }

    fn check_pair(
        &self,
        ctx: &FileContext,
        comments: &[Span],
        prev: &Stmt,
        next: &Stmt,
    ) -> Option<Violation> {
        let prev_tag = classify(prev, &self.options);
        let next_tag = classify(next, &self.options);
        if !needs_blank_line(prev_tag, next_tag) {
            return None;
        }

        let (prev_end, next_start) = (prev.span().end, next.span().start);
        let gap = Gap::new(ctx.content, prev_end, next_start)?.masking(comments);
        if gap.has_blank_line() {
            return None;
        }

        trace!(%prev_tag, %next_tag, next_start, "missing group separator");
        let message = if prev_tag == next_tag {
            format!("Expected blank line between {next_tag} statements")
        } else {
            format!("Expected blank line between {prev_tag} and {next_tag} statements")
        };

        Some(
            Violation::new(
                CODE,
                NAME,
                EXPECTED_BLANK_LINE,
                self.severity,
                ctx.location(next.span()),
                message,
            )
            .with_suggestion(Suggestion::with_optional_fix(
                "Insert a blank line",
                insert_blank_line(ctx.content, prev_end, next_start, comments),
            )),
        )
    }
}

/// A group change, or two members of an isolated group.
fn needs_blank_line(prev: GroupTag, next: GroupTag) -> bool {
    prev != next || next.requires_isolation()
}

impl Rule for StatementGrouping {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Requires a blank line between statements of different groups"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn is_fixable(&self) -> bool {
        true
    }

    fn check(&self, ctx: &FileContext, program: &Program) -> Vec<Violation> {
        let mut violations: Vec<_> = statement_lists(program)
            .into_iter()
            .flat_map(|list| list.windows(2))
            .filter_map(|pair| self.check_pair(ctx, &program.comments, &pair[0], &pair[1]))
            .collect();
        violations.sort_by_key(|v| v.location.offset);
        violations
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stanza_ast::{parse, SourceType};
    use stanza_core::apply_edits;
    use std::path::Path;

    fn check_with(rule: &StatementGrouping, code: &str) -> Vec<Violation> {
        let program = parse(code, SourceType::TypeScript).expect("Failed to parse");
        let ctx = FileContext::new(Path::new("test.ts"), code, Path::new("."));
        rule.check(&ctx, &program)
    }

    fn check_code(code: &str) -> Vec<Violation> {
        check_with(&StatementGrouping::new(), code)
    }

    fn fix_code(code: &str) -> String {
        let edits = check_code(code)
            .iter()
            .filter_map(Violation::fix)
            .cloned()
            .collect();
        apply_edits(code, edits).expect("fixes apply").text
    }

    #[test]
    fn test_group_change_requires_blank_line() {
        let violations = check_code("const a = 1;\nfoo();");
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].code, CODE);
        assert_eq!(violations[0].message_id, EXPECTED_BLANK_LINE);
        assert_eq!(violations[0].location.line, 2);
        assert!(violations[0].message.contains("const and call"));
    }

    #[test]
    fn test_same_group_needs_nothing() {
        assert!(check_code("const a = 1;\nconst b = 2;\n\nfoo();\nbar();\nbaz();").is_empty());
    }

    #[test]
    fn test_isolated_groups_need_separation() {
        let violations = check_code("function a() {}\nfunction b() {}");
        assert_eq!(violations.len(), 1);
        assert!(violations[0].message.contains("between function statements"));

        let violations = check_code("it('a', () => {});\nit('b', () => {});");
        assert_eq!(violations.len(), 1);
    }

    #[test]
    fn test_never_removes_blank_lines() {
        assert!(check_code("const a = 1;\n\n\nconst b = 2;").is_empty());
    }

    #[test]
    fn test_fix_inserts_blank_line_and_is_idempotent() {
        let fixed = fix_code("import a from 'a';\nconst b = a;\nthis.c = b;\n");
        assert_eq!(fixed, "import a from 'a';\n\nconst b = a;\n\nthis.c = b;\n");
        assert!(check_code(&fixed).is_empty());
    }

    #[test]
    fn test_fix_keeps_comments() {
        let fixed = fix_code("a = 1;\n// explain\nfoo();\n");
        assert_eq!(fixed, "a = 1;\n\n// explain\nfoo();\n");
        assert!(check_code(&fixed).is_empty());
    }

    #[test]
    fn test_same_line_pair_is_not_fixable() {
        let violations = check_code("a = 1; foo();");
        assert_eq!(violations.len(), 1);
        assert!(!violations[0].is_fixable());
    }

    #[test]
    fn test_nested_lists_are_checked() {
        let code = "\
function f() {
  const a = 1;
  foo(a);
}

class C {
  static {
    this.x = 1;
    bar();
  }
}

switch (k) {
  case 1:
    k = 2;
    go();
}
";
        let lines: Vec<_> = check_code(code).iter().map(|v| v.location.line).collect();
        assert_eq!(lines, vec![3, 9, 16]);
    }

    #[test]
    fn test_logging_calls_form_their_own_group() {
        let violations = check_code("console.log(1);\nlogger.info(2);\nrun();");
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].location.line, 3);
    }

    #[test]
    fn test_configured_loggers() {
        let config: RuleConfig = toml::from_str("loggers = [\"log\"]").expect("valid config");
        let rule = StatementGrouping::from_config(&config);
        let violations = check_with(&rule, "log.info(1);\nconsole.log(2);");
        assert_eq!(violations.len(), 1);
        assert!(violations[0].message.contains("other and call"));
    }
}
