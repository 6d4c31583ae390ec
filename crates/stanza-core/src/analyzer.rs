//! Core analyzer for orchestrating lint execution.

use crate::config::Config;
use crate::context::FileContext;
use crate::fixer::{fix_until_stable, FixError, FixOutcome};
use crate::rule::{Rule, RuleBox};
use crate::types::{LintResult, Violation};

use stanza_ast::{Program, SourceType};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, info, warn};

/// Errors that can occur during analysis.
#[derive(Debug, Error)]
pub enum AnalyzerError {
    /// IO error reading or writing files.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Error parsing a source file.
    #[error("Parse error in {path}: {message}")]
    Parse {
        /// Path to the file that failed to parse.
        path: PathBuf,
        /// Parse error message.
        message: String,
    },

    /// Glob pattern error.
    #[error("Invalid glob pattern: {0}")]
    Glob(#[from] glob::PatternError),

    /// Directory walk error.
    #[error("Failed to walk directory: {0}")]
    Walk(#[from] ignore::Error),

    /// Configuration error.
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// A fix could not be applied.
    #[error("Fix error: {0}")]
    Fix(#[from] FixError),
}

/// Builder for configuring an [`Analyzer`].
#[derive(Default)]
pub struct AnalyzerBuilder {
    root: Option<PathBuf>,
    rules: Vec<RuleBox>,
    exclude_patterns: Vec<String>,
    config: Option<Config>,
    fail_on_parse_error: bool,
}

impl AnalyzerBuilder {
    /// Creates a new builder with default settings.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the root directory (or single file) to analyze.
    #[must_use]
    pub fn root(mut self, path: impl Into<PathBuf>) -> Self {
        self.root = Some(path.into());
        self
    }

    /// Adds a rule to the analyzer.
    #[must_use]
    pub fn rule<R: Rule + 'static>(mut self, rule: R) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    /// Adds a boxed rule to the analyzer.
    #[must_use]
    pub fn rule_box(mut self, rule: RuleBox) -> Self {
        self.rules.push(rule);
        self
    }

    /// Adds several boxed rules to the analyzer.
    #[must_use]
    pub fn rules(mut self, rules: impl IntoIterator<Item = RuleBox>) -> Self {
        self.rules.extend(rules);
        self
    }

    /// Adds an exclude glob pattern.
    #[must_use]
    pub fn exclude(mut self, pattern: impl Into<String>) -> Self {
        self.exclude_patterns.push(pattern.into());
        self
    }

    /// Adds multiple exclude glob patterns.
    #[must_use]
    pub fn excludes<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.exclude_patterns
            .extend(patterns.into_iter().map(Into::into));
        self
    }

    /// Sets the configuration.
    #[must_use]
    pub fn config(mut self, config: Config) -> Self {
        self.config = Some(config);
        self
    }

    /// Sets whether to fail on parse errors (default: false).
    #[must_use]
    pub fn fail_on_parse_error(mut self, fail: bool) -> Self {
        self.fail_on_parse_error = fail;
        self
    }

    /// Builds the analyzer.
    ///
    /// # Errors
    ///
    /// Returns an error if the current directory cannot be resolved or an
    /// exclude pattern is not a valid glob.
    pub fn build(self) -> Result<Analyzer, AnalyzerError> {
        let config = self.config.unwrap_or_default();
        let root = self
            .root
            .unwrap_or_else(|| config.analyzer.root.clone());

        let root = if root.is_absolute() {
            root
        } else {
            std::env::current_dir()?.join(&root)
        };

        let mut patterns = self.exclude_patterns;
        patterns.extend(config.analyzer.exclude.iter().cloned());
        let exclude = patterns
            .iter()
            .map(String::as_str)
            .map(glob::Pattern::new)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Analyzer {
            root,
            rules: self.rules,
            exclude,
            config,
            fail_on_parse_error: self.fail_on_parse_error,
        })
    }
}

/// The main analyzer that orchestrates lint execution.
///
/// Use [`Analyzer::builder()`] to construct an instance.
pub struct Analyzer {
    root: PathBuf,
    rules: Vec<RuleBox>,
    exclude: Vec<glob::Pattern>,
    config: Config,
    fail_on_parse_error: bool,
}

impl Analyzer {
    /// Creates a new builder for configuring an analyzer.
    #[must_use]
    pub fn builder() -> AnalyzerBuilder {
        AnalyzerBuilder::new()
    }

    /// Returns the root directory being analyzed.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Returns the number of registered rules.
    #[must_use]
    pub fn rule_count(&self) -> usize {
        self.rules.len()
    }

    /// Analyzes all files and returns the results.
    ///
    /// # Errors
    ///
    /// Returns an error if file discovery or reading fails, or if a file
    /// fails to parse while `fail_on_parse_error` is set.
    pub fn analyze(&self) -> Result<LintResult, AnalyzerError> {
        info!("Starting analysis at {:?}", self.root);

        let mut result = LintResult::new();
        let files = self.discover_files()?;

        info!("Found {} files to analyze", files.len());

        for file_path in &files {
            let content = std::fs::read_to_string(file_path)?;
            match self.lint_source(file_path, &content) {
                Ok(violations) => {
                    result.violations.extend(violations);
                    result.files_checked += 1;
                }
                Err(err) => self.skip_unparsable(err)?,
            }
        }

        sort_violations(&mut result.violations);

        info!(
            "Analysis complete: {} violations in {} files",
            result.violations.len(),
            result.files_checked
        );

        Ok(result)
    }

    /// Applies fixes to every discovered file and returns what remains.
    ///
    /// Changed files are written back in place.
    ///
    /// # Errors
    ///
    /// Same conditions as [`Analyzer::analyze`], plus write failures.
    pub fn fix(&self) -> Result<LintResult, AnalyzerError> {
        info!("Fixing files under {:?}", self.root);

        let mut result = LintResult::new();
        for file_path in &self.discover_files()? {
            let content = std::fs::read_to_string(file_path)?;
            let outcome = match self.fix_source(file_path, &content) {
                Ok(outcome) => outcome,
                Err(err) => {
                    self.skip_unparsable(err)?;
                    continue;
                }
            };

            if outcome.text != content {
                debug!(
                    "Writing {} ({} edits in {} passes)",
                    file_path.display(),
                    outcome.applied,
                    outcome.passes
                );
                std::fs::write(file_path, &outcome.text)?;
                result.files_fixed += 1;
            }

            result
                .violations
                .extend(self.lint_source(file_path, &outcome.text)?);
            result.files_checked += 1;
        }

        sort_violations(&mut result.violations);
        info!(
            "Fixed {} files, {} violations remain",
            result.files_fixed,
            result.violations.len()
        );
        Ok(result)
    }

    /// Lints an in-memory source. `path` selects the grammar and is used for
    /// locations.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyzerError::Parse`] if the source does not parse.
    pub fn lint_source(&self, path: &Path, source: &str) -> Result<Vec<Violation>, AnalyzerError> {
        let program = parse_file(path, source)?;
        let mut violations = self.run_rules(path, source, &program);
        sort_violations(&mut violations);
        Ok(violations)
    }

    /// Fixes an in-memory source until no further fix is offered.
    ///
    /// # Errors
    ///
    /// Returns [`AnalyzerError::Parse`] if the source does not parse, or if
    /// the fixed text no longer parses (the caller keeps the original).
    pub fn fix_source(&self, path: &Path, source: &str) -> Result<FixOutcome, AnalyzerError> {
        parse_file(path, source)?;

        let outcome = fix_until_stable(source, |text| match parse_file(path, text) {
            Ok(program) => self
                .run_rules(path, text, &program)
                .iter()
                .filter_map(Violation::fix)
                .cloned()
                .collect(),
            Err(_) => Vec::new(),
        })?;

        if outcome.applied > 0 {
            parse_file(path, &outcome.text).map_err(|_| AnalyzerError::Parse {
                path: path.to_path_buf(),
                message: "fixed output no longer parses".to_string(),
            })?;
        }
        Ok(outcome)
    }

    fn run_rules(&self, path: &Path, source: &str, program: &Program) -> Vec<Violation> {
        let ctx = FileContext::new(path, source, &self.root);
        let mut violations = Vec::new();

        for rule in &self.rules {
            if !self.config.is_rule_enabled(rule.name()) {
                debug!("Skipping disabled rule: {}", rule.name());
                continue;
            }

            let rule_violations = rule.check(&ctx, program);
            let rule_violations = self.apply_severity_override(rule.name(), rule_violations);
            violations.extend(rule_violations);
        }

        violations
    }

    fn skip_unparsable(&self, err: AnalyzerError) -> Result<(), AnalyzerError> {
        match err {
            AnalyzerError::Parse { path, message } => {
                warn!("Failed to parse {}: {}", path.display(), message);
                if self.fail_on_parse_error {
                    return Err(AnalyzerError::Parse { path, message });
                }
                Ok(())
            }
            other => Err(other),
        }
    }

    /// Applies severity overrides from configuration.
    fn apply_severity_override(
        &self,
        rule_name: &str,
        mut violations: Vec<Violation>,
    ) -> Vec<Violation> {
        if let Some(severity) = self.config.rule_severity(rule_name) {
            for v in &mut violations {
                v.severity = severity;
            }
        }
        violations
    }

    /// Discovers all JavaScript/TypeScript files to analyze.
    fn discover_files(&self) -> Result<Vec<PathBuf>, AnalyzerError> {
        let mut builder = ignore::WalkBuilder::new(&self.root);
        builder
            .hidden(false)
            .git_ignore(self.config.analyzer.respect_gitignore)
            .require_git(false);

        let mut files = Vec::new();
        for entry in builder.build() {
            let entry = entry?;
            let path = entry.path();

            if !path.is_file() || SourceType::from_path(path).is_none() {
                continue;
            }

            if self.should_exclude(path) {
                debug!("Excluding: {}", path.display());
                continue;
            }

            files.push(path.to_path_buf());
        }

        files.sort();
        Ok(files)
    }

    /// Checks if a path matches an exclude pattern, either as given or
    /// relative to the root.
    fn should_exclude(&self, path: &Path) -> bool {
        let relative = path.strip_prefix(&self.root).unwrap_or(path);
        self.exclude
            .iter()
            .any(|pattern| pattern.matches_path(path) || pattern.matches_path(relative))
    }
}

fn parse_file(path: &Path, source: &str) -> Result<Program, AnalyzerError> {
    let source_type = SourceType::from_path(path).unwrap_or(SourceType::TypeScript);
    stanza_ast::parse(source, source_type).map_err(|e| AnalyzerError::Parse {
        path: path.to_path_buf(),
        message: e.to_string(),
    })
}

/// Sorts violations by file, then line, then column. Stable, so rules keep
/// their registration order on ties.
fn sort_violations(violations: &mut [Violation]) {
    violations.sort_by(|a, b| {
        a.location
            .file
            .cmp(&b.location.file)
            .then(a.location.line.cmp(&b.location.line))
            .then(a.location.column.cmp(&b.location.column))
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Edit, Location, Severity, Suggestion};

    /// Flags the first statement of files lacking a `// ok` marker.
    struct MarkFirst;

    impl Rule for MarkFirst {
        fn name(&self) -> &'static str {
            "mark-first"
        }
        fn code(&self) -> &'static str {
            "TEST001"
        }

        fn check(&self, ctx: &FileContext, program: &Program) -> Vec<Violation> {
            if ctx.content.starts_with("// ok") {
                return Vec::new();
            }
            program
                .body
                .first()
                .map(|stmt| {
                    Violation::new(
                        self.code(),
                        self.name(),
                        "missingMarker",
                        Severity::Warning,
                        ctx.location(stmt.span()),
                        "missing marker",
                    )
                    .with_suggestion(Suggestion::with_fix(
                        "add marker",
                        Edit::insert(0, "// ok\n"),
                    ))
                })
                .into_iter()
                .collect()
        }
    }

    #[test]
    fn builder_defaults() {
        let analyzer = Analyzer::builder()
            .root(".")
            .build()
            .expect("Failed to build analyzer");

        assert!(analyzer.root().exists());
        assert_eq!(analyzer.rule_count(), 0);
    }

    #[test]
    fn invalid_exclude_pattern_fails_build() {
        let result = Analyzer::builder().root(".").exclude("[").build();
        assert!(matches!(result, Err(AnalyzerError::Glob(_))));
    }

    #[test]
    fn exclude_patterns() {
        let analyzer = Analyzer::builder()
            .root("/foo")
            .exclude("**/generated/**")
            .build()
            .expect("Failed to build analyzer");

        assert!(analyzer.should_exclude(Path::new("/foo/node_modules/x/index.js")));
        assert!(analyzer.should_exclude(Path::new("/foo/src/generated/a.ts")));
        assert!(!analyzer.should_exclude(Path::new("/foo/src/lib.ts")));
    }

    #[test]
    fn lint_source_runs_rules() {
        let analyzer = Analyzer::builder().rule(MarkFirst).build().unwrap();
        let violations = analyzer
            .lint_source(Path::new("a.ts"), "a();\nb();")
            .unwrap();
        assert_eq!(violations.len(), 1);
        assert!(violations[0].is_fixable());
    }

    #[test]
    fn disabled_rules_and_severity_overrides() {
        let config = Config::parse(
            r#"
[rules.mark-first]
severity = "error"
"#,
        )
        .unwrap();
        let analyzer = Analyzer::builder()
            .rule(MarkFirst)
            .config(config)
            .build()
            .unwrap();
        let violations = analyzer.lint_source(Path::new("a.ts"), "a();").unwrap();
        assert_eq!(violations[0].severity, Severity::Error);

        let config = Config::parse("[rules.mark-first]\nenabled = false\n").unwrap();
        let analyzer = Analyzer::builder()
            .rule(MarkFirst)
            .config(config)
            .build()
            .unwrap();
        assert!(analyzer
            .lint_source(Path::new("a.ts"), "a();")
            .unwrap()
            .is_empty());
    }

    #[test]
    fn parse_errors_surface_from_lint_source() {
        let analyzer = Analyzer::builder().rule(MarkFirst).build().unwrap();
        let err = analyzer
            .lint_source(Path::new("a.ts"), "const = ;")
            .unwrap_err();
        assert!(matches!(err, AnalyzerError::Parse { .. }));
    }

    #[test]
    fn fix_source_reaches_fixed_point() {
        let analyzer = Analyzer::builder().rule(MarkFirst).build().unwrap();
        let outcome = analyzer.fix_source(Path::new("a.ts"), "a();\n").unwrap();
        assert_eq!(outcome.text, "// ok\na();\n");
        assert_eq!(outcome.passes, 1);
    }

    #[test]
    fn sorting_is_by_position() {
        let mut violations = vec![
            Violation::new(
                "T",
                "t",
                "m",
                Severity::Info,
                Location::new(PathBuf::from("a.ts"), 3, 1),
                "",
            ),
            Violation::new(
                "T",
                "t",
                "m",
                Severity::Info,
                Location::new(PathBuf::from("a.ts"), 1, 5),
                "",
            ),
        ];
        sort_violations(&mut violations);
        assert_eq!(violations[0].location.line, 1);
    }
}
