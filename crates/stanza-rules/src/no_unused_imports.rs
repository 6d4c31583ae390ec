//! Rule reporting import bindings that are never referenced.
//!
//! References come from the decoded program: every identifier or type name
//! mentioned outside import declarations counts as a use.
//!
//! Fixes are only offered when exactly one edit can be made safely:
//!
//! - every binding unused: the whole declaration is removed with its line
//! - exactly one binding unused: that specifier is removed with one comma
//! - two or more unused (but not all): reported without a fix
//!
//! Side-effect imports (`import 'polyfill';`) are never reported.

use stanza_ast::ast::{ImportDecl, ImportSpecifier, SpecifierKind};
use stanza_ast::{Program, Span, Stmt};
use stanza_core::utils::{has_line_break, remove_list_element, remove_whole_line};
use stanza_core::{Edit, FileContext, Rule, Severity, Suggestion, Violation};
use tracing::trace;

/// Rule code for no-unused-imports.
pub const CODE: &str = "ST003";

/// Rule name for no-unused-imports.
pub const NAME: &str = "no-unused-imports";

/// Message id for a single unused binding.
pub const UNUSED_IMPORT: &str = "unusedImport";

/// Message id for a declaration whose bindings are all unused.
pub const UNUSED_IMPORT_DECLARATION: &str = "unusedImportDeclaration";

/// Reports unused import bindings.
#[derive(Debug, Clone)]
pub struct NoUnusedImports {
    /// Custom severity.
    pub severity: Severity,
}

impl Default for NoUnusedImports {
    fn default() -> Self {
        Self::new()
    }
}

impl NoUnusedImports {
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

    fn check_import(
        &self,
        ctx: &FileContext,
        program: &Program,
        import: &ImportDecl,
        out: &mut Vec<Violation>,
    ) {
        let unused: Vec<&ImportSpecifier> = import
            .specifiers
            .iter()
            .filter(|spec| !program.is_referenced(&spec.local))
            .collect();

        match unused.as_slice() {
            [] => {}
            all if all.len() == import.specifiers.len() => {
                out.push(
                    Violation::new(
                        CODE,
                        NAME,
                        UNUSED_IMPORT_DECLARATION,
                        self.severity,
                        ctx.location(import.span),
                        format!("All imports from '{}' are unused", import.source),
                    )
                    .with_suggestion(Suggestion::with_optional_fix(
                        "Remove the import declaration",
                        remove_whole_line(ctx.content, import.span),
                    )),
                );
            }
            [only] => {
                let edit = remove_specifier(ctx.content, &program.comments, import, only);
                out.push(self.unused_specifier(ctx, only, edit));
            }
            several => {
                trace!(
                    count = several.len(),
                    "several unused specifiers, no fix offered"
                );
                out.extend(
                    several
                        .iter()
                        .map(|spec| self.unused_specifier(ctx, spec, None)),
                );
            }
        }
    }

    fn unused_specifier(
        &self,
        ctx: &FileContext,
        spec: &ImportSpecifier,
        edit: Option<Edit>,
    ) -> Violation {
        Violation::new(
            CODE,
            NAME,
            UNUSED_IMPORT,
            self.severity,
            ctx.location(spec.span),
            format!("'{}' is imported but never used", spec.local),
        )
        .with_suggestion(Suggestion::with_optional_fix(
            format!("Remove '{}' from the import", spec.local),
            edit,
        ))
    }
}

/// Removes one specifier, refusing when the declaration spans several lines
/// or when the specifier is the only named one beside a default import.
fn remove_specifier(
    source: &str,
    comments: &[Span],
    import: &ImportDecl,
    spec: &ImportSpecifier,
) -> Option<Edit> {
    if import.span.text(source).map_or(true, has_line_break) {
        return None;
    }
    let has_default = import
        .specifiers
        .iter()
        .any(|s| s.kind == SpecifierKind::Default);
    if spec.kind == SpecifierKind::Named && has_default && import.named_count() == 1 {
        return None;
    }
    remove_list_element(source, spec.span, b',', comments)
}

impl Rule for NoUnusedImports {
    fn name(&self) -> &'static str {
        NAME
    }

    fn code(&self) -> &'static str {
        CODE
    }

    fn description(&self) -> &'static str {
        "Reports import bindings that are never used"
    }

    fn default_severity(&self) -> Severity {
        self.severity
    }

    fn is_fixable(&self) -> bool {
        true
    }

    fn check(&self, ctx: &FileContext, program: &Program) -> Vec<Violation> {
        let mut violations = Vec::new();
        for stmt in &program.body {
            if let Stmt::Import(import) = stmt {
                self.check_import(ctx, program, import, &mut violations);
            }
        }
        violations
    }
}
