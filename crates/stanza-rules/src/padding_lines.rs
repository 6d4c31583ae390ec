//! Rule enforcing blank-line padding between statement kinds.
//!
//! Each adjacent statement pair is looked up in a [`PaddingTable`]; the first
//! matching entry decides whether a blank line is required (`always`) or
//! forbidden (`never`). Pairs matching no entry are left alone.
//!
//! # Configuration
//!
//! - `table`: list of `{ blankLine, prev, next }` entries replacing the
//!   default table. Selectors are `"*"`, a kind name or a list of kind names.

use stanza_ast::{Program, Span, Stmt};
use stanza_core::utils::{insert_blank_line, remove_blank_lines, Gap};
use stanza_core::{FileContext, Rule, RuleConfig, Severity, Suggestion, Violation};

use crate::classify::coarse_kind;
use crate::lists::statement_lists;
use crate::padding_table::{BlankLine, PaddingTable};

/// Rule code for padding-line-between-statements.
pub const CODE: &str = "ST002";

/// Rule name for padding-line-between-statements.
pub const NAME: &str = "padding-line-between-statements";

/// Message id for a missing blank line.
pub const EXPECTED_BLANK_LINE: &str = "expectedBlankLine";

/// Message id for a forbidden blank line.
pub const UNEXPECTED_BLANK_LINE: &str = "unexpectedBlankLine";

/// Enforces the padding table between adjacent statements.
#[derive(Debug, Clone)]
pub struct PaddingLines {
    /// Adjacency rules.
    pub table: PaddingTable,
    /// Custom severity.
    pub severity: Severity,
}

impl Default for PaddingLines {
    fn default() -> Self {
        Self::new()
    }
}

impl PaddingLines {
    /// Creates a new rule with the default table.
    #[must_use]
    pub fn new() -> Self {
        Self {
            table: PaddingTable::default(),
            severity: Severity::Warning,
        }
    }

    /// Creates the rule from its configuration block.
    #[must_use]
    pub fn from_config(config: &RuleConfig) -> Self {
        Self::new().table(PaddingTable::from_value(config.get("table")))
    }

    /// Replaces the adjacency table.
    #[must_use]
    pub fn table(mut self, table: PaddingTable) -> Self {
        self.table = table;
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
        let (prev_kind, next_kind) = (coarse_kind(prev), coarse_kind(next));
        let rule = self.table.lookup(prev_kind, next_kind)?;

        let (prev_end, next_start) = (prev.span().end, next.span().start);
        let blank = Gap::new(ctx.content, prev_end, next_start)?
            .masking(comments)
            .has_blank_line();

        let (message_id, message, suggestion) = match (rule.policy, blank) {
            (BlankLine::Always, false) => (
                EXPECTED_BLANK_LINE,
                format!("Expected blank line before this {next_kind} statement"),
                Suggestion::with_optional_fix(
                    "Insert a blank line",
                    insert_blank_line(ctx.content, prev_end, next_start, comments),
                ),
            ),
            (BlankLine::Never, true) => (
                UNEXPECTED_BLANK_LINE,
                format!("Unexpected blank line between {prev_kind} and {next_kind} statements"),
                Suggestion::with_optional_fix(
                    "Remove the blank line",
                    remove_blank_lines(ctx.content, prev_end, next_start, comments),
                ),
            ),
            _ => return None,
        };

        Some(
            Violation::new(
                CODE,
                NAME,
                message_id,
                self.severity,
                ctx.location(next.span()),
                message,
            )
            .with_suggestion(suggestion),
        )
    }
}

impl Rule for PaddingLines {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Requires or forbids blank lines between statement kinds"
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
    use crate::classify::CoarseKind;
    use crate::padding_table::{PaddingRule, Selector};
    use stanza_ast::{parse, SourceType};
    use stanza_core::apply_edits;
    use std::path::Path;

    fn check_with(rule: &PaddingLines, code: &str) -> Vec<Violation> {
        let program = parse(code, SourceType::TypeScript).expect("Failed to parse");
        let ctx = FileContext::new(Path::new("test.ts"), code, Path::new("."));
        rule.check(&ctx, &program)
    }

    fn check_code(code: &str) -> Vec<Violation> {
        check_with(&PaddingLines::new(), code)
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
    fn test_function_then_declaration() {
        let code = "function alpha() {}\nconst beta = 1;";
        let violations = check_code(code);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].message_id, EXPECTED_BLANK_LINE);
        assert_eq!(fix_code(code), "function alpha() {}\n\nconst beta = 1;");
    }

    #[test]
    fn test_blank_line_between_declarations_is_removed() {
        let code = "const alpha = 1;\n\nconst beta = 2;";
        let violations = check_code(code);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].message_id, UNEXPECTED_BLANK_LINE);
        assert_eq!(fix_code(code), "const alpha = 1;\nconst beta = 2;");
    }

    #[test]
    fn test_removal_keeps_comment_lines() {
        let code = "let a = 1;\n\n// why\n\nvar b = 2;\n";
        assert_eq!(fix_code(code), "let a = 1;\n// why\nvar b = 2;\n");
    }

    #[test]
    fn test_crlf_is_preserved() {
        let code = "const a = 1;\r\n\r\nconst b = 2;\r\nif (b) {\r\n  go();\r\n}\r\n";
        let fixed = fix_code(code);
        assert_eq!(
            fixed,
            "const a = 1;\r\nconst b = 2;\r\n\r\nif (b) {\r\n  go();\r\n}\r\n"
        );
        assert!(check_code(&fixed).is_empty());
    }

    #[test]
    fn test_return_needs_padding() {
        let code = "function f() {\n  const a = 1;\n  return a;\n}\n";
        assert_eq!(
            fix_code(code),
            "function f() {\n  const a = 1;\n\n  return a;\n}\n"
        );
    }

    #[test]
    fn test_unmatched_pairs_are_ignored() {
        assert!(check_code("foo();\nbar();\n\n\nbaz();").is_empty());
    }

    #[test]
    fn test_same_line_pair_reported_without_fix() {
        let violations = check_code("const a = 1; if (a) {}");
        assert_eq!(violations.len(), 1);
        assert!(!violations[0].is_fixable());
    }

    #[test]
    fn test_custom_table() {
        let rule = PaddingLines::new().table(PaddingTable::new(vec![PaddingRule::new(
            BlankLine::Never,
            Selector::Any,
            Selector::Kind(CoarseKind::Expression),
        )]));
        let violations = check_with(&rule, "const a = 1;\n\nfoo();\n\nbar();");
        assert_eq!(violations.len(), 2);
        assert!(violations
            .iter()
            .all(|v| v.message_id == UNEXPECTED_BLANK_LINE));
    }

    #[test]
    fn test_table_from_config() {
        let config: RuleConfig =
            toml::from_str(r#"table = [{ blankLine = "always", prev = "*", next = "*" }]"#)
                .expect("valid config");
        let rule = PaddingLines::from_config(&config);
        assert_eq!(check_with(&rule, "foo();\nbar();").len(), 1);

        let broken: RuleConfig = toml::from_str("table = 3").expect("valid config");
        assert_eq!(PaddingLines::from_config(&broken).table, PaddingTable::default());
    }
}
