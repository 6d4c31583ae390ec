//! Rule trait for defining lint rules.

use stanza_ast::Program;

use crate::context::FileContext;
use crate::types::{Severity, Violation};

/// A per-file lint rule over the decoded statement tree.
///
/// Rules receive the typed [`Program`] together with the raw source held by
/// the [`FileContext`]. They never mutate either; fixes are returned as
/// edits attached to each [`Violation`].
///
/// # Example
///
/// ```ignore
/// use stanza_core::{FileContext, Rule, Violation};
/// use stanza_ast::Program;
///
/// pub struct NoEmptyFile;
///
/// impl Rule for NoEmptyFile {
///     fn name(&self) -> &'static str { "no-empty-file" }
///     fn code(&self) -> &'static str { "ST900" }
///
///     fn check(&self, ctx: &FileContext, program: &Program) -> Vec<Violation> {
///         Vec::new()
///     }
/// }
/// ```
pub trait Rule: Send + Sync {
    /// Returns the kebab-case name of this rule (e.g., "dot-notation").
    fn name(&self) -> &'static str;

    /// Returns the rule code (e.g., "ST004").
    fn code(&self) -> &'static str;

    /// Returns a brief description of what this rule checks.
    fn description(&self) -> &'static str {
        ""
    }

    /// Returns the default severity for violations from this rule.
    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    /// Whether violations of this rule may carry an automatic fix.
    fn is_fixable(&self) -> bool {
        false
    }

    /// Checks a single file and returns any violations found, in document
    /// order.
    fn check(&self, ctx: &FileContext, program: &Program) -> Vec<Violation>;
}

/// Type alias for boxed Rule trait objects.
pub type RuleBox = Box<dyn Rule>;
