//! Shared output formatting for lint results.

use anyhow::{Context, Result};
use miette::{NamedSource, Report};
use stanza_core::{LintResult, Severity, Violation, ViolationDiagnostic};
use std::collections::HashMap;
use std::path::Path;

use crate::OutputFormat;

/// Print lint results in the specified format.
pub fn print(result: &LintResult, format: OutputFormat) -> Result<()> {
    match format {
        OutputFormat::Text => print_text(result),
        OutputFormat::Json => return print_json(result),
        OutputFormat::Compact => print_compact(result),
        OutputFormat::Pretty => return print_pretty(result),
    }
    Ok(())
}

fn severity_indicator(severity: Severity) -> &'static str {
    match severity {
        Severity::Error => "\x1b[31merror\x1b[0m",
        Severity::Warning => "\x1b[33mwarning\x1b[0m",
        Severity::Info => "\x1b[34minfo\x1b[0m",
    }
}

fn print_text(result: &LintResult) {
    for violation in &result.violations {
        println!(
            "{} {} at {}:{}:{}",
            violation.code,
            violation.rule,
            violation.location.file.display(),
            violation.location.line,
            violation.location.column,
        );
        println!(
            "  {}: {}",
            severity_indicator(violation.severity),
            violation.message
        );
        if let Some(suggestion) = &violation.suggestion {
            let marker = if suggestion.edit.is_some() { " (fixable)" } else { "" };
            println!("  = help: {}{marker}", suggestion.message);
        }
        println!();
    }

    print_summary(result);
}

fn print_summary(result: &LintResult) {
    let (errors, warnings, infos) = result.count_by_severity();
    let summary_color = if errors > 0 {
        "\x1b[31m"
    } else if warnings > 0 {
        "\x1b[33m"
    } else {
        "\x1b[32m"
    };

    println!(
        "{}Found {} error(s), {} warning(s), {} info(s) in {} file(s)\x1b[0m",
        summary_color, errors, warnings, infos, result.files_checked
    );

    let fixable = result.fixable_count();
    if result.files_fixed > 0 {
        println!("Fixed {} file(s)", result.files_fixed);
    }
    if fixable > 0 {
        println!("{fixable} violation(s) can be fixed with --fix");
    }
}

fn print_json(result: &LintResult) -> Result<()> {
    let json = serde_json::to_string_pretty(result)?;
    println!("{json}");
    Ok(())
}

fn print_compact(result: &LintResult) {
    for violation in &result.violations {
        println!(
            "{}:{}:{}: {} [{}] {}",
            violation.location.file.display(),
            violation.location.line,
            violation.location.column,
            violation.severity,
            violation.code,
            violation.message,
        );
    }
}

fn print_pretty(result: &LintResult) -> Result<()> {
    let mut sources: HashMap<&Path, String> = HashMap::new();

    for violation in &result.violations {
        let file = violation.location.file.as_path();
        if !sources.contains_key(file) {
            let content = std::fs::read_to_string(file)
                .with_context(|| format!("Failed to read {}", file.display()))?;
            sources.insert(file, content);
        }
        let content = sources.get(file).cloned().unwrap_or_default();
        println!("{:?}", render(violation, content));
    }

    print_summary(result);
    Ok(())
}

fn render(violation: &Violation, content: String) -> Report {
    let name = violation.location.file.display().to_string();
    Report::new(ViolationDiagnostic::from(violation))
        .with_source_code(NamedSource::new(name, content))
}

#[cfg(test)]
mod tests {
    use super::*;
    use stanza_core::{Edit, Location, Suggestion};
    use std::path::PathBuf;

    #[test]
    fn pretty_report_names_rule_and_file() {
        let violation = Violation::new(
            "ST004",
            "dot-notation",
            "useDotNotation",
            Severity::Warning,
            Location {
                file: PathBuf::from("src/a.ts"),
                line: 1,
                column: 4,
                offset: 3,
                length: 9,
            },
            "['alpha'] is better written in dot notation",
        )
        .with_suggestion(Suggestion::with_fix(
            "use obj.alpha",
            Edit::replace(3, 12, ".alpha"),
        ));

        let report = render(&violation, "obj['alpha'];\n".to_string());
        assert!(report.to_string().contains("[ST004]"));
        assert!(report.source_code().is_some());
    }
}
