//! # stanza-rules
//!
//! Built-in statement layout and safe-removal rules for stanza.
//!
//! ## Available Rules
//!
//! | Code | Name | Description |
//! |------|------|-------------|
//! | ST001 | `statement-grouping` | Blank line wherever the statement group changes |
//! | ST002 | `padding-line-between-statements` | Blank lines required or forbidden by a kind table |
//! | ST003 | `no-unused-imports` | Import bindings that are never referenced |
//! | ST004 | `dot-notation` | `obj.key` instead of `obj['key']` |
//!
//! All four rules offer fixes, and every fix is refused rather than applied
//! when it could disturb a comment or a multi-line construct.
//!
//! ## Usage
//!
//! ```ignore
//! use stanza_core::Analyzer;
//! use stanza_rules::{NoUnusedImports, StatementGrouping};
//!
//! let analyzer = Analyzer::builder()
//!     .root("./src")
//!     .rule(StatementGrouping::new())
//!     .rule(NoUnusedImports::new())
//!     .build()?;
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod classify;
pub mod dot_notation;
mod lists;
pub mod no_unused_imports;
pub mod padding_lines;
pub mod padding_table;
pub mod peel;
mod presets;
pub mod statement_grouping;

pub use classify::{classify, coarse_kind, ClassifyOptions, CoarseKind, GroupTag};
pub use dot_notation::DotNotation;
pub use no_unused_imports::NoUnusedImports;
pub use padding_lines::PaddingLines;
pub use padding_table::{BlankLine, PaddingRule, PaddingTable, Selector};
pub use peel::{member_root, peel};
pub use presets::{all_rules, recommended_rules, rule_by_name, rules_from_config, Preset, RULE_NAMES};
pub use statement_grouping::StatementGrouping;

/// Re-export core types for convenience.
pub use stanza_core::{Rule, Severity, Violation};
