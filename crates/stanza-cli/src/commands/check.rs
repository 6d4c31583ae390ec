//! Check command implementation.

use anyhow::{Context, Result};
use stanza_core::{Analyzer, Config, RuleBox, RuleConfig};
use stanza_rules::{rule_by_name, rules_from_config, RULE_NAMES};
use std::path::Path;

use crate::config_resolver::ConfigSource;
use crate::OutputFormat;

/// Flags of `stanza check`.
#[derive(Debug, Clone, Default)]
pub struct CheckOptions {
    /// Output format.
    pub format: OutputFormat,
    /// Comma-separated rule names or codes.
    pub rules_filter: Option<String>,
    /// Extra exclude patterns.
    pub exclude: Vec<String>,
    /// Rewrite files with their fixes.
    pub fix: bool,
}

/// Runs the check command.
///
/// Returns `true` when error-level violations remain.
pub fn run(path: &Path, options: &CheckOptions, source: &ConfigSource) -> Result<bool> {
    let config = load_config(source)?;

    let rules = match &options.rules_filter {
        Some(filter) => {
            let names: Vec<&str> = filter.split(',').map(str::trim).collect();
            filter_rules(&names, &config)
        }
        None => rules_from_config(&config),
    };

    let analyzer = Analyzer::builder()
        .root(path)
        .config(config)
        .excludes(options.exclude.iter().cloned())
        .rules(rules)
        .build()
        .context("Failed to build analyzer")?;

    tracing::info!("Analyzing {:?} with {} rules", path, analyzer.rule_count());

    let result = if options.fix {
        analyzer.fix().context("Fixing failed")?
    } else {
        analyzer.analyze().context("Analysis failed")?
    };

    super::output::print(&result, options.format)?;

    Ok(result.has_errors())
}

fn load_config(source: &ConfigSource) -> Result<Config> {
    let Some(path) = source.path() else {
        return Ok(Config::default());
    };
    if source.is_global() {
        tracing::info!("Using global config: {}", path.display());
    }
    Config::from_file(path).with_context(|| format!("Failed to load config: {}", path.display()))
}

/// Builds the rules named on the command line, by name or code.
fn filter_rules(requested: &[&str], config: &Config) -> Vec<RuleBox> {
    let defaults = RuleConfig::default();
    let available: Vec<RuleBox> = RULE_NAMES
        .iter()
        .filter_map(|name| rule_by_name(name, config.rule(name).unwrap_or(&defaults)))
        .collect();

    for name in requested {
        if !available
            .iter()
            .any(|r| r.name() == *name || r.code() == *name)
        {
            tracing::warn!("Unknown rule: {}", name);
        }
    }

    available
        .into_iter()
        .filter(|r| requested.contains(&r.name()) || requested.contains(&r.code()))
        .collect()
}
