//! Statement classification.
//!
//! [`classify`] assigns the fine-grained [`GroupTag`] used by the
//! `statement-grouping` rule; [`coarse_kind`] assigns the [`CoarseKind`]
//! matched by padding table selectors.

use std::fmt;

use stanza_ast::ast::{AssignOp, Expr, MemberProp, UnaryOp, VarDecl, VarKind};
use stanza_ast::Stmt;
use stanza_core::utils::NameSet;
use stanza_core::RuleConfig;

use crate::peel::{is_this_rooted, peel};

/// Logging receivers recognized by default.
pub const DEFAULT_LOGGERS: &[&str] = &["console", "logger"];

/// Test-block callees recognized by default.
pub const DEFAULT_TEST_CALLEES: &[&str] = &["it", "describe"];

/// Semantic group of a statement.
///
/// Variants are listed in classification precedence order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum GroupTag {
    /// Directive prologue entry (`'use strict';` at the top of a body).
    Directive,
    /// `'use strict'` outside the directive prologue.
    UseStrict,
    /// `import` declaration.
    Import,
    /// `export * from` re-export.
    ExportAll,
    /// Type alias.
    Type,
    /// Interface declaration.
    Interface,
    /// Function declaration or function-valued variable declaration.
    Function,
    /// Class declaration.
    Class,
    /// `it(...)` / `describe(...)` block.
    Test,
    /// `this.x = ...`.
    ThisAssign,
    /// `this.x += ...`, `this.x++`.
    ThisMutation,
    /// `delete this.x`.
    ThisDelete,
    /// Plain assignment.
    Assign,
    /// Compound assignment or update.
    Mutation,
    /// `delete` of anything else.
    Delete,
    /// Non-logging call or `new` expression.
    Call,
    /// `var` declaration.
    Var,
    /// `let` declaration.
    Let,
    /// `const` declaration.
    Const,
    /// `try` statement.
    Control,
    /// Anything else.
    Other,
}

impl GroupTag {
    /// Stable label used in messages and configuration.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Directive => "directive",
            Self::UseStrict => "use-strict",
            Self::Import => "import",
            Self::ExportAll => "export-all",
            Self::Type => "type",
            Self::Interface => "interface",
            Self::Function => "function",
            Self::Class => "class",
            Self::Test => "test",
            Self::ThisAssign => "this-assign",
            Self::ThisMutation => "this-mutation",
            Self::ThisDelete => "this-delete",
            Self::Assign => "assign",
            Self::Mutation => "mutation",
            Self::Delete => "delete",
            Self::Call => "call",
            Self::Var => "var",
            Self::Let => "let",
            Self::Const => "const",
            Self::Control => "control",
            Self::Other => "other",
        }
    }

    /// Groups whose members are separated from each other as well.
    #[must_use]
    pub fn requires_isolation(self) -> bool {
        matches!(
            self,
            Self::Test | Self::Type | Self::Interface | Self::Function | Self::Class
        )
    }
}

impl fmt::Display for GroupTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Name sets consulted by [`classify`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifyOptions {
    /// Receivers whose method calls are logging, not `call` statements.
    pub loggers: NameSet,
    /// Bare callees that open a test block.
    pub test_callees: NameSet,
}

impl Default for ClassifyOptions {
    fn default() -> Self {
        Self {
            loggers: NameSet::new(DEFAULT_LOGGERS.iter().copied()),
            test_callees: NameSet::new(DEFAULT_TEST_CALLEES.iter().copied()),
        }
    }
}

impl ClassifyOptions {
    /// Reads `loggers` and `test_callees`; missing or empty lists keep the
    /// defaults.
    #[must_use]
    pub fn from_config(config: &RuleConfig) -> Self {
        Self {
            loggers: NameSet::or_defaults(config.get_str_array("loggers"), DEFAULT_LOGGERS),
            test_callees: NameSet::or_defaults(
                config.get_str_array("test_callees"),
                DEFAULT_TEST_CALLEES,
            ),
        }
    }
}

/// Assigns a statement to its group. First match in precedence order wins.
#[must_use]
pub fn classify(stmt: &Stmt, options: &ClassifyOptions) -> GroupTag {
    match stmt {
        Stmt::Directive(_) => GroupTag::Directive,
        Stmt::Expr(s) if matches!(&s.expr, Expr::Str(lit) if lit.raw == "use strict") => {
            GroupTag::UseStrict
        }
        Stmt::Import(_) => GroupTag::Import,
        Stmt::ExportAll(_) => GroupTag::ExportAll,
        Stmt::Export(export) => export
            .declaration
            .as_deref()
            .map_or(GroupTag::Other, |decl| classify(decl, options)),
        Stmt::TypeAlias(_) => GroupTag::Type,
        Stmt::Interface(_) => GroupTag::Interface,
        Stmt::Function(_) => GroupTag::Function,
        Stmt::Class(_) => GroupTag::Class,
        Stmt::Expr(s) => classify_expr(&s.expr, options),
        Stmt::Var(decl) if is_function_valued(decl) => GroupTag::Function,
        Stmt::Var(decl) => match decl.kind {
            VarKind::Var => GroupTag::Var,
            VarKind::Let => GroupTag::Let,
            VarKind::Const => GroupTag::Const,
        },
        Stmt::Try(_) => GroupTag::Control,
        _ => GroupTag::Other,
    }
}

fn classify_expr(expr: &Expr, options: &ClassifyOptions) -> GroupTag {
    match peel(expr) {
        Expr::Call(call) if is_test_callee(&call.callee, options) => GroupTag::Test,
        Expr::Assign(assign) => {
            let on_this = is_this_rooted(&assign.target);
            match (&assign.op, on_this) {
                (AssignOp::Plain, true) => GroupTag::ThisAssign,
                (AssignOp::Compound(_), true) => GroupTag::ThisMutation,
                (AssignOp::Plain, false) => GroupTag::Assign,
                (AssignOp::Compound(_), false) => GroupTag::Mutation,
            }
        }
        Expr::Update(update) if is_this_rooted(&update.argument) => GroupTag::ThisMutation,
        Expr::Update(_) => GroupTag::Mutation,
        Expr::Unary(unary) if unary.op == UnaryOp::Delete => {
            if is_this_rooted(&unary.argument) {
                GroupTag::ThisDelete
            } else {
                GroupTag::Delete
            }
        }
        Expr::Call(call) | Expr::New(call) if !is_logging_call(&call.callee, options) => {
            GroupTag::Call
        }
        _ => GroupTag::Other,
    }
}

fn is_test_callee(callee: &Expr, options: &ClassifyOptions) -> bool {
    peel(callee)
        .as_ident()
        .is_some_and(|name| options.test_callees.contains(name))
}

/// `console.log(...)`, `logger.info(...)`, `this.logger.warn(...)`.
fn is_logging_call(callee: &Expr, options: &ClassifyOptions) -> bool {
    let Expr::Member(method) = peel(callee) else {
        return false;
    };
    match peel(&method.object) {
        Expr::Ident(ident) => options.loggers.contains(&ident.name),
        Expr::Member(receiver) => {
            matches!(peel(&receiver.object), Expr::This(_))
                && matches!(
                    &receiver.property,
                    MemberProp::Ident(prop) if options.loggers.contains(&prop.name)
                )
        }
        _ => false,
    }
}

/// Every declarator is initialised with a function or arrow expression.
fn is_function_valued(decl: &VarDecl) -> bool {
    !decl.declarators.is_empty()
        && decl.declarators.iter().all(|d| {
            d.init
                .as_ref()
                .is_some_and(|init| matches!(peel(init), Expr::Function(_) | Expr::Arrow(_)))
        })
}

/// `namespace N {}` may surface as an expression statement.
fn is_namespace(expr: &Expr) -> bool {
    matches!(expr, Expr::Other(other) if other.kind == "internal_module" || other.kind == "module")
}

/// Statement kind as seen by padding table selectors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CoarseKind {
    /// Function declaration or function-valued variable declaration.
    Function,
    /// `var` declaration.
    Var,
    /// `let` declaration.
    Let,
    /// `const` declaration.
    Const,
    /// Expression statement, directives included.
    Expression,
    /// `if` statement.
    If,
    /// `for`, `for...in`, `for...of`.
    For,
    /// `while` loop.
    While,
    /// `do...while` loop.
    Do,
    /// `switch` statement.
    Switch,
    /// `try` statement.
    Try,
    /// `return` statement.
    Return,
    /// Anything else.
    Other,
}

impl CoarseKind {
    /// Every kind, in declaration order.
    pub const ALL: [Self; 13] = [
        Self::Function,
        Self::Var,
        Self::Let,
        Self::Const,
        Self::Expression,
        Self::If,
        Self::For,
        Self::While,
        Self::Do,
        Self::Switch,
        Self::Try,
        Self::Return,
        Self::Other,
    ];

    /// Configuration name of the kind.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Function => "function",
            Self::Var => "var",
            Self::Let => "let",
            Self::Const => "const",
            Self::Expression => "expression",
            Self::If => "if",
            Self::For => "for",
            Self::While => "while",
            Self::Do => "do",
            Self::Switch => "switch",
            Self::Try => "try",
            Self::Return => "return",
            Self::Other => "other",
        }
    }

    /// Parses a configuration name.
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|kind| kind.as_str() == name)
    }
}

impl fmt::Display for CoarseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Assigns a statement to its padding kind.
#[must_use]
pub fn coarse_kind(stmt: &Stmt) -> CoarseKind {
    match stmt {
        Stmt::Function(_) => CoarseKind::Function,
        Stmt::Var(decl) if is_function_valued(decl) => CoarseKind::Function,
        Stmt::Var(decl) => match decl.kind {
            VarKind::Var => CoarseKind::Var,
            VarKind::Let => CoarseKind::Let,
            VarKind::Const => CoarseKind::Const,
        },
        Stmt::Export(export) => export
            .declaration
            .as_deref()
            .map_or(CoarseKind::Other, coarse_kind),
        Stmt::Expr(s) if is_namespace(&s.expr) => CoarseKind::Other,
        Stmt::Expr(_) | Stmt::Directive(_) => CoarseKind::Expression,
        Stmt::If(_) => CoarseKind::If,
        Stmt::For(_) => CoarseKind::For,
        Stmt::While(_) => CoarseKind::While,
        Stmt::DoWhile(_) => CoarseKind::Do,
        Stmt::Switch(_) => CoarseKind::Switch,
        Stmt::Try(_) => CoarseKind::Try,
        Stmt::Return(_) => CoarseKind::Return,
        _ => CoarseKind::Other,
    }
}
