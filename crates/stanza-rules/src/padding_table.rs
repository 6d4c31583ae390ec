//! Adjacency rules for padding lines between statements.
//!
//! A table is an ordered list of `(policy, prev, next)` entries; the first
//! entry whose selectors match a statement pair decides whether a blank line
//! is required or forbidden between them.

use std::fmt;

use tracing::debug;

use crate::classify::CoarseKind;

/// What a matching entry demands between two statements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BlankLine {
    /// At least one blank line.
    Always,
    /// No blank line.
    Never,
}

impl BlankLine {
    /// Parses `"always"` / `"never"`.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "always" => Some(Self::Always),
            "never" => Some(Self::Never),
            _ => None,
        }
    }
}

/// Statement kinds an entry applies to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selector {
    /// `"*"`: any statement.
    Any,
    /// A single kind.
    Kind(CoarseKind),
    /// Any of several kinds.
    Kinds(Vec<CoarseKind>),
}

impl Selector {
    /// Returns true if `kind` is selected.
    #[must_use]
    pub fn matches(&self, kind: CoarseKind) -> bool {
        match self {
            Self::Any => true,
            Self::Kind(k) => *k == kind,
            Self::Kinds(kinds) => kinds.contains(&kind),
        }
    }

    /// Parses `"*"`, a kind name, or an array of kind names.
    ///
    /// Unknown names, non-string elements and empty arrays are rejected.
    #[must_use]
    pub fn from_value(value: &toml::Value) -> Option<Self> {
        match value {
            toml::Value::String(name) => Self::from_name(name),
            toml::Value::Array(items) if !items.is_empty() => {
                let mut kinds = Vec::with_capacity(items.len());
                for item in items {
                    match Self::from_name(item.as_str()?)? {
                        Self::Any => return Some(Self::Any),
                        Self::Kind(kind) => kinds.push(kind),
                        Self::Kinds(more) => kinds.extend(more),
                    }
                }
                Some(Self::Kinds(kinds))
            }
            _ => None,
        }
    }

    fn from_name(name: &str) -> Option<Self> {
        if name == "*" {
            return Some(Self::Any);
        }
        CoarseKind::from_name(name).map(Self::Kind)
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => f.write_str("*"),
            Self::Kind(kind) => write!(f, "{kind}"),
            Self::Kinds(kinds) => {
                let names: Vec<_> = kinds.iter().map(|k| k.as_str()).collect();
                write!(f, "[{}]", names.join(", "))
            }
        }
    }
}

/// One table entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaddingRule {
    /// Required spacing.
    pub policy: BlankLine,
    /// Selector for the earlier statement.
    pub prev: Selector,
    /// Selector for the later statement.
    pub next: Selector,
}

impl PaddingRule {
    /// Creates an entry.
    #[must_use]
    pub fn new(policy: BlankLine, prev: Selector, next: Selector) -> Self {
        Self { policy, prev, next }
    }

    /// Parses `{ blankLine = "...", prev = ..., next = ... }`.
    #[must_use]
    pub fn from_value(value: &toml::Value) -> Option<Self> {
        let table = value.as_table()?;
        Some(Self {
            policy: BlankLine::from_name(table.get("blankLine")?.as_str()?)?,
            prev: Selector::from_value(table.get("prev")?)?,
            next: Selector::from_value(table.get("next")?)?,
        })
    }
}

/// Ordered adjacency rules, first match wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaddingTable {
    rules: Vec<PaddingRule>,
}

const DECLARATIONS: [CoarseKind; 3] = [CoarseKind::Var, CoarseKind::Let, CoarseKind::Const];

const CONTROL: [CoarseKind; 6] = [
    CoarseKind::If,
    CoarseKind::For,
    CoarseKind::While,
    CoarseKind::Do,
    CoarseKind::Switch,
    CoarseKind::Try,
];

impl Default for PaddingTable {
    fn default() -> Self {
        use BlankLine::{Always, Never};
        use CoarseKind::{Expression, Function, Return};

        let decls = || Selector::Kinds(DECLARATIONS.to_vec());
        let control = || Selector::Kinds(CONTROL.to_vec());
        let kind = Selector::Kind;

        Self::new(vec![
            PaddingRule::new(Always, decls(), kind(Function)),
            PaddingRule::new(Always, kind(Function), decls()),
            PaddingRule::new(Always, decls(), control()),
            PaddingRule::new(Always, control(), decls()),
            PaddingRule::new(Always, control(), kind(Expression)),
            PaddingRule::new(Always, kind(Expression), control()),
            PaddingRule::new(Always, Selector::Any, kind(Return)),
            PaddingRule::new(Never, decls(), decls()),
            PaddingRule::new(Always, kind(Function), kind(Function)),
            PaddingRule::new(Always, kind(Function), kind(Expression)),
            PaddingRule::new(Always, kind(Expression), kind(Function)),
        ])
    }
}

impl PaddingTable {
    /// Creates a table from explicit entries.
    #[must_use]
    pub fn new(rules: Vec<PaddingRule>) -> Self {
        Self { rules }
    }

    /// Builds a table from the `table` option.
    ///
    /// Malformed entries are dropped. A missing option, a value that is not
    /// an array, or an array with no usable entry yields the default table.
    #[must_use]
    pub fn from_value(value: Option<&toml::Value>) -> Self {
        let Some(items) = value.and_then(toml::Value::as_array) else {
            return Self::default();
        };

        let rules: Vec<_> = items
            .iter()
            .filter_map(|item| {
                let rule = PaddingRule::from_value(item);
                if rule.is_none() {
                    debug!("Dropping malformed padding entry: {item}");
                }
                rule
            })
            .collect();

        if rules.is_empty() {
            debug!("No usable padding entries, using defaults");
            return Self::default();
        }
        Self::new(rules)
    }

    /// The entries in evaluation order.
    #[must_use]
    pub fn rules(&self) -> &[PaddingRule] {
        &self.rules
    }

    /// Returns the first entry matching the pair.
    #[must_use]
    pub fn lookup(&self, prev: CoarseKind, next: CoarseKind) -> Option<&PaddingRule> {
        self.rules
            .iter()
            .find(|rule| rule.prev.matches(prev) && rule.next.matches(next))
    }
}
