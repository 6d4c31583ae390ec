//! Filesystem-backed analyzer tests.

use stanza_ast::Program;
use stanza_core::utils::insert_blank_line;
use stanza_core::{Analyzer, FileContext, Rule, Severity, Suggestion, Violation};
use std::fs;

/// Requires a blank line between every pair of top-level statements.
struct SpaceEverything;

impl Rule for SpaceEverything {
    fn name(&self) -> &'static str {
        "space-everything"
    }

    fn code(&self) -> &'static str {
        "TEST100"
    }

    fn check(&self, ctx: &FileContext, program: &Program) -> Vec<Violation> {
        program
            .body
            .windows(2)
            .filter(|pair| {
                !stanza_core::utils::has_blank_line(
                    ctx.content,
                    pair[0].span().end,
                    pair[1].span().start,
                )
            })
            .map(|pair| {
                let (prev, next) = (pair[0].span(), pair[1].span());
                Violation::new(
                    self.code(),
                    self.name(),
                    "expectedBlankLine",
                    Severity::Error,
                    ctx.location(next),
                    "Expected blank line before this statement.",
                )
                .with_suggestion(Suggestion::with_optional_fix(
                    "insert a blank line",
                    insert_blank_line(ctx.content, prev.end, next.start, &program.comments),
                ))
            })
            .collect()
    }
}

#[test]
fn analyze_discovers_script_files_only() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("a.ts"), "a();\nb();\n").unwrap();
    fs::write(dir.path().join("b.js"), "a();\n\nb();\n").unwrap();
    fs::write(dir.path().join("notes.md"), "a();\nb();\n").unwrap();
    fs::create_dir(dir.path().join("node_modules")).unwrap();
    fs::write(dir.path().join("node_modules/x.js"), "a();\nb();\n").unwrap();

    let analyzer = Analyzer::builder()
        .root(dir.path())
        .rule(SpaceEverything)
        .build()
        .unwrap();
    let result = analyzer.analyze().unwrap();

    assert_eq!(result.files_checked, 2);
    assert_eq!(result.violations.len(), 1);
    assert!(result.violations[0].location.file.ends_with("a.ts"));
    assert!(result.has_errors());
}

#[test]
fn unparsable_files_are_skipped_unless_strict() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join("broken.ts"), "const = ;\n").unwrap();
    fs::write(dir.path().join("ok.ts"), "a();\n").unwrap();

    let lenient = Analyzer::builder()
        .root(dir.path())
        .rule(SpaceEverything)
        .build()
        .unwrap();
    assert_eq!(lenient.analyze().unwrap().files_checked, 1);

    let strict = Analyzer::builder()
        .root(dir.path())
        .rule(SpaceEverything)
        .fail_on_parse_error(true)
        .build()
        .unwrap();
    assert!(strict.analyze().is_err());
}

#[test]
fn fix_rewrites_files_in_place() {
    let dir = tempfile::tempdir().unwrap();
    let file = dir.path().join("a.ts");
    fs::write(&file, "a();\r\nb();\r\nc(); d();\r\n").unwrap();

    let analyzer = Analyzer::builder()
        .root(dir.path())
        .rule(SpaceEverything)
        .build()
        .unwrap();
    let result = analyzer.fix().unwrap();

    assert_eq!(result.files_fixed, 1);
    assert_eq!(
        fs::read_to_string(&file).unwrap(),
        "a();\r\n\r\nb();\r\n\r\nc(); d();\r\n"
    );
    // `c(); d();` share a line, so that pair is reported but never fixed.
    assert_eq!(result.violations.len(), 1);
    assert!(!result.violations[0].is_fixable());
}
