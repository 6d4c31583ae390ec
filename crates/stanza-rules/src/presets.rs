//! Rule presets and config-driven rule construction.

use stanza_core::{Config, RuleBox, RuleConfig};
use tracing::{debug, warn};

use crate::{dot_notation, no_unused_imports, padding_lines, statement_grouping};
use crate::{DotNotation, NoUnusedImports, PaddingLines, StatementGrouping};

/// Names of every built-in rule, in registration order.
pub const RULE_NAMES: [&str; 4] = [
    statement_grouping::NAME,
    padding_lines::NAME,
    no_unused_imports::NAME,
    dot_notation::NAME,
];

/// Preset configurations for stanza.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    /// Grouping, unused imports and dot notation.
    Recommended,
    /// Every built-in rule, including the padding table.
    All,
}

impl Preset {
    /// Parses a preset name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "recommended" => Some(Self::Recommended),
            "all" => Some(Self::All),
            _ => None,
        }
    }

    /// Names of the rules in this preset.
    #[must_use]
    pub fn rule_names(self) -> &'static [&'static str] {
        match self {
            Self::Recommended => &[
                statement_grouping::NAME,
                no_unused_imports::NAME,
                dot_notation::NAME,
            ],
            Self::All => &RULE_NAMES,
        }
    }

    /// Returns the rules for this preset with default settings.
    #[must_use]
    pub fn rules(self) -> Vec<RuleBox> {
        let defaults = RuleConfig::default();
        self.rule_names()
            .iter()
            .filter_map(|name| rule_by_name(name, &defaults))
            .collect()
    }
}

/// Returns the recommended set of rules.
///
/// Includes:
/// - `statement-grouping` (ST001) - Blank lines between statement groups
/// - `no-unused-imports` (ST003) - Unused import bindings
/// - `dot-notation` (ST004) - `obj.key` over `obj['key']`
#[must_use]
pub fn recommended_rules() -> Vec<RuleBox> {
    Preset::Recommended.rules()
}

/// Returns all available rules.
///
/// The default padding table forbids blank lines between declarations while
/// `statement-grouping` wants one between `const` and `let`. Such pairs stay
/// reported and the fixer leaves them untouched.
#[must_use]
pub fn all_rules() -> Vec<RuleBox> {
    Preset::All.rules()
}

/// Builds a rule by name from its configuration block.
#[must_use]
pub fn rule_by_name(name: &str, config: &RuleConfig) -> Option<RuleBox> {
    let rule: RuleBox = match name {
        statement_grouping::NAME => Box::new(StatementGrouping::from_config(config)),
        padding_lines::NAME => Box::new(PaddingLines::from_config(config)),
        no_unused_imports::NAME => Box::new(NoUnusedImports::new()),
        dot_notation::NAME => Box::new(DotNotation::new()),
        _ => return None,
    };
    Some(rule)
}

/// Builds the rule set described by a configuration.
///
/// Starts from the configured preset (default: recommended) and adds rules
/// explicitly enabled in `[rules.*]`. Each rule reads its own options once.
/// Disabled rules are still returned; the analyzer skips them.
#[must_use]
pub fn rules_from_config(config: &Config) -> Vec<RuleBox> {
    let preset = match config.preset.as_deref() {
        None => Preset::Recommended,
        Some(name) => Preset::from_name(name).unwrap_or_else(|| {
            warn!("Unknown preset '{name}', using recommended");
            Preset::Recommended
        }),
    };

    let defaults = RuleConfig::default();
    RULE_NAMES
        .iter()
        .filter(|&&name| {
            preset.rule_names().contains(&name)
                || config.rule(name).and_then(|c| c.enabled) == Some(true)
        })
        .filter_map(|name| {
            debug!("Activating rule: {name}");
            rule_by_name(name, config.rule(name).unwrap_or(&defaults))
        })
        .collect()
}
