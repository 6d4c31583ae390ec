//! Rule preferring `obj.key` over `obj['key']`.
//!
//! Every computed member access keyed by a string literal is reported. The
//! rewrite is only offered for a bare identifier key on a plain identifier
//! receiver, with the whole access on one line.

use stanza_ast::ast::{Expr, Member, MemberProp};
use stanza_ast::visit::walk_expr;
use stanza_ast::{Program, Span, Visit};
use stanza_core::utils::{dot_access, BracketAccess};
use stanza_core::{FileContext, Rule, Severity, Suggestion, Violation};

/// Rule code for dot-notation.
pub const CODE: &str = "ST004";

/// Rule name for dot-notation.
pub const NAME: &str = "dot-notation";

/// Message id for a bracket access that could use dot notation.
pub const USE_DOT_NOTATION: &str = "useDotNotation";

/// Prefers dot notation for string-literal member keys.
#[derive(Debug, Clone)]
pub struct DotNotation {
    /// Custom severity.
    pub severity: Severity,
}

impl Default for DotNotation {
    fn default() -> Self {
        Self::new()
    }
}

impl DotNotation {
    /// Creates a new rule with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self {
            severity: Severity::Warning,
        }
    }

    /// Sets the severity level.
    #[must_use]
    pub fn severity(mut self, severity: Severity) -> Self {
        self.severity = severity;
        self
    }
}

impl Rule for DotNotation {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Prefers dot notation over string-literal bracket access"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn is_fixable(&self) -> bool {
        true
    }

    fn check(&self, ctx: &FileContext, program: &Program) -> Vec<Violation> {
        let mut visitor = BracketVisitor {
            ctx,
            rule: self,
            comments: &program.comments,
            violations: Vec::new(),
        };
        visitor.visit_program(program);
        visitor.violations
    }
}

struct BracketVisitor<'a> {
    ctx: &'a FileContext<'a>,
    rule: &'a DotNotation,
    comments: &'a [Span],
    violations: Vec<Violation>,
}

impl BracketVisitor<'_> {
    fn check_member(&mut self, member: &Member) {
        let MemberProp::Computed(key) = &member.property else {
            return;
        };
        let Expr::Str(key) = key.as_ref() else {
            return;
        };

        let access = BracketAccess {
            access: member.span,
            object: member.object.span(),
            key: &key.raw,
            optional: member.optional,
            simple_receiver: matches!(member.object.as_ref(), Expr::Ident(_)),
        };

        self.violations.push(
            Violation::new(
                CODE,
                NAME,
                USE_DOT_NOTATION,
                self.rule.severity,
                self.ctx.location(key.span),
                format!("['{}'] is better written in dot notation", key.raw),
            )
            .with_suggestion(Suggestion::with_optional_fix(
                format!("Use .{}", key.raw),
                dot_access(self.ctx.content, &access, self.comments),
            )),
        );
    }
}

impl<'ast> Visit<'ast> for BracketVisitor<'_> {
    fn visit_expr(&mut self, expr: &'ast Expr) {
        if let Expr::Member(member) = expr {
            self.check_member(member);
        }
        walk_expr(self, expr);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stanza_ast::{parse, SourceType};
    use stanza_core::apply_edits;
    use std::path::Path;

    fn check_code(code: &str) -> Vec<Violation> {
        let program = parse(code, SourceType::TypeScript).expect("Failed to parse");
        let ctx = FileContext::new(Path::new("test.ts"), code, Path::new("."));
        DotNotation::new().check(&ctx, &program)
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
    fn test_rewrites_identifier_key() {
        let violations = check_code("obj['alpha'];");
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].message_id, USE_DOT_NOTATION);
        assert_eq!(fix_code("obj['alpha'];"), "obj.alpha;");
        assert_eq!(fix_code("obj[\"alpha\"] = 1;"), "obj.alpha = 1;");
    }

    #[test]
    fn test_invalid_key_is_reported_without_fix() {
        let violations = check_code("obj['not-valid'];");
        assert_eq!(violations.len(), 1);
        assert!(!violations[0].is_fixable());
        assert_eq!(fix_code("obj['not-valid'];"), "obj['not-valid'];");
    }

    #[test]
    fn test_complex_receiver_is_not_fixable() {
        let violations = check_code("a.b['c'];\nget()['d'];");
        assert_eq!(violations.len(), 2);
        assert!(violations.iter().all(|v| !v.is_fixable()));
    }

    #[test]
    fn test_optional_access_keeps_question_dot() {
        assert_eq!(fix_code("obj?.['alpha'];"), "obj?.alpha;");
    }

    #[test]
    fn test_multi_line_access_is_not_fixable() {
        let violations = check_code("obj[\n  'alpha'\n];");
        assert_eq!(violations.len(), 1);
        assert!(!violations[0].is_fixable());
    }

    #[test]
    fn test_non_literal_keys_are_ignored() {
        assert!(check_code("obj[key];\nobj[0];\nobj[`a`];").is_empty());
    }

    #[test]
    fn test_nested_accesses_are_found() {
        let code = "function f() {\n  return () => cfg['port'];\n}\n";
        assert_eq!(fix_code(code), "function f() {\n  return () => cfg.port;\n}\n");
    }
}
