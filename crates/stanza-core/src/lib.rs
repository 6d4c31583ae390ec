//! # stanza-core
//!
//! Core framework for stanza: the [`Rule`] trait, violations with fix edits,
//! blank-line analysis and the safe edit synthesizer shared by all rules.
//!
//! - [`Rule`] trait for per-file rules over a decoded [`stanza_ast::Program`]
//! - [`Analyzer`] for discovering files, linting and fixing them
//! - [`Violation`] for representing lint findings and their [`Edit`]s
//! - [`utils`] for line-break aware gap analysis and edit synthesis
//!
//! ## Example
//!
//! ```ignore
//! use stanza_core::Analyzer;
//!
//! let analyzer = Analyzer::builder()
//!     .root("./src")
//!     .rule(MyRule::new())
//!     .build()?;
//!
//! let result = analyzer.analyze()?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

mod analyzer;
mod config;
mod context;
pub mod fixer;
mod rule;
mod types;

/// Utility modules for rule implementations.
pub mod utils;

pub use analyzer::{Analyzer, AnalyzerBuilder, AnalyzerError};
pub use config::{AnalyzerConfig, Config, ConfigError, RuleConfig};
pub use context::FileContext;
pub use fixer::{apply_edits, fix_until_stable, FixError, FixOutcome};
pub use rule::{Rule, RuleBox};
pub use types::{
    Edit, LintResult, Location, Severity, Suggestion, Violation, ViolationDiagnostic,
};
