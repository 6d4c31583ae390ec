//! Strongly-typed statement and expression tree.
//!
//! Every node is a closed variant carrying its byte range into the source
//! text. Shapes the linter has no use for decode to [`Stmt::Other`] or
//! [`Expr::Other`], which still hold their decoded children so nested
//! function bodies stay reachable.

use std::collections::BTreeSet;

/// Half-open byte range `[start, end)` into the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    /// First byte of the node.
    pub start: usize,
    /// One past the last byte of the node.
    pub end: usize,
}

impl Span {
    /// Creates a new span.
    #[must_use]
    pub const fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Length in bytes.
    #[must_use]
    pub const fn len(self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Returns true for zero-width spans.
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.len() == 0
    }

    /// Slices `source` with this span, `None` when it does not fit.
    #[must_use]
    pub fn text(self, source: &str) -> Option<&str> {
        if self.start > self.end {
            return None;
        }
        source.get(self.start..self.end)
    }

    /// Returns true if `other` lies entirely inside this span.
    #[must_use]
    pub const fn contains(self, other: Span) -> bool {
        self.start <= other.start && other.end <= self.end
    }
}

/// A decoded source file.
#[derive(Debug, Clone, Default)]
pub struct Program {
    /// Whole-file range.
    pub span: Span,
    /// Top-level statements in document order.
    pub body: Vec<Stmt>,
    /// Ranges of every comment in the file.
    pub comments: Vec<Span>,
    /// Names referenced anywhere outside import declarations.
    pub references: BTreeSet<String>,
}

impl Program {
    /// Returns true if `name` is referenced outside import declarations.
    #[must_use]
    pub fn is_referenced(&self, name: &str) -> bool {
        self.references.contains(name)
    }

    /// Returns true if any comment overlaps `span`.
    #[must_use]
    pub fn has_comment_within(&self, span: Span) -> bool {
        self.comments
            .iter()
            .any(|c| c.start < span.end && span.start < c.end)
    }
}

/// A `{ ... }` statement list.
#[derive(Debug, Clone, Default)]
pub struct Block {
    /// Range including the braces.
    pub span: Span,
    /// Statements between the braces.
    pub body: Vec<Stmt>,
}

/// Statement node.
#[derive(Debug, Clone)]
pub enum Stmt {
    /// String literal in a directive prologue (`'use strict';`).
    Directive(Directive),
    /// `import ... from '...'`.
    Import(ImportDecl),
    /// `export * from '...'` and `export * as ns from '...'`.
    ExportAll(ExportAll),
    /// Any other `export` form.
    Export(ExportDecl),
    /// `type Alias = ...`.
    TypeAlias(Named),
    /// `interface Name { ... }`.
    Interface(Named),
    /// Function declaration (including overload signatures).
    Function(Function),
    /// Class declaration.
    Class(Class),
    /// Expression statement.
    Expr(ExprStmt),
    /// `var`, `let` or `const` declaration.
    Var(VarDecl),
    /// `if` statement.
    If(IfStmt),
    /// `for`, `for ... in` and `for ... of`.
    For(Loop),
    /// `while` loop.
    While(Loop),
    /// `do ... while` loop.
    DoWhile(Loop),
    /// `switch` statement.
    Switch(Switch),
    /// `try` statement.
    Try(Try),
    /// `return` statement.
    Return(Return),
    /// Bare block statement.
    Block(Block),
    /// Everything else (throw, labels, namespaces, enums, ...).
    Other(OtherStmt),
}

impl Stmt {
    /// Byte range of the statement.
    #[must_use]
    pub fn span(&self) -> Span {
        match self {
            Self::Directive(d) => d.span,
            Self::Import(i) => i.span,
            Self::ExportAll(e) => e.span,
            Self::Export(e) => e.span,
            Self::TypeAlias(n) | Self::Interface(n) => n.span,
            Self::Function(f) => f.span,
            Self::Class(c) => c.span,
            Self::Expr(e) => e.span,
            Self::Var(v) => v.span,
            Self::If(i) => i.span,
            Self::For(l) | Self::While(l) | Self::DoWhile(l) => l.span,
            Self::Switch(s) => s.span,
            Self::Try(t) => t.span,
            Self::Return(r) => r.span,
            Self::Block(b) => b.span,
            Self::Other(o) => o.span,
        }
    }
}

/// Directive prologue entry.
#[derive(Debug, Clone)]
pub struct Directive {
    /// Statement range.
    pub span: Span,
    /// Unquoted directive text.
    pub value: String,
}

/// One bound name of an import declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportSpecifier {
    /// Range of the whole specifier (`a as b`, `* as ns`, `def`).
    pub span: Span,
    /// Local binding name.
    pub local: String,
    /// Specifier form.
    pub kind: SpecifierKind,
}

/// Import specifier form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpecifierKind {
    /// `import def from`.
    Default,
    /// `import * as ns from`.
    Namespace,
    /// `import { a } from`.
    Named,
}

/// Import declaration.
#[derive(Debug, Clone)]
pub struct ImportDecl {
    /// Statement range.
    pub span: Span,
    /// Module specifier, unquoted.
    pub source: String,
    /// `import type { ... }`.
    pub type_only: bool,
    /// Bound names in source order. Empty for side-effect imports.
    pub specifiers: Vec<ImportSpecifier>,
}

impl ImportDecl {
    /// Number of specifiers inside the `{ ... }` list.
    #[must_use]
    pub fn named_count(&self) -> usize {
        self.specifiers
            .iter()
            .filter(|s| s.kind == SpecifierKind::Named)
            .count()
    }
}

/// `export * from '...'`.
#[derive(Debug, Clone)]
pub struct ExportAll {
    /// Statement range.
    pub span: Span,
    /// Module specifier, unquoted.
    pub source: String,
}

/// `export` wrapping a declaration, an expression or a clause.
#[derive(Debug, Clone)]
pub struct ExportDecl {
    /// Statement range.
    pub span: Span,
    /// `export default ...`.
    pub is_default: bool,
    /// Wrapped declaration, if any.
    pub declaration: Option<Box<Stmt>>,
    /// Exported expression (`export default expr`).
    pub value: Option<Expr>,
}

/// Declaration identified only by its name.
#[derive(Debug, Clone)]
pub struct Named {
    /// Statement range.
    pub span: Span,
    /// Declared name.
    pub name: String,
}

/// Function declaration.
#[derive(Debug, Clone)]
pub struct Function {
    /// Statement range.
    pub span: Span,
    /// Declared name.
    pub name: Option<String>,
    /// Body; `None` for overload signatures and ambient declarations.
    pub body: Option<Block>,
}

/// Class declaration or expression.
#[derive(Debug, Clone)]
pub struct Class {
    /// Node range.
    pub span: Span,
    /// Declared name.
    pub name: Option<String>,
    /// `abstract class`.
    pub is_abstract: bool,
    /// Members in source order.
    pub members: Vec<ClassMember>,
}

/// Class member.
#[derive(Debug, Clone)]
pub struct ClassMember {
    /// Member range, decorators included.
    pub span: Span,
    /// Member form.
    pub kind: MemberKind,
    /// `public` / `protected` / `private`.
    pub accessibility: Option<Accessibility>,
    /// `static` modifier.
    pub is_static: bool,
    /// `abstract` modifier.
    pub is_abstract: bool,
    /// Decorator ranges.
    pub decorators: Vec<Span>,
    /// Method or static-block body.
    pub body: Option<Block>,
    /// Property initializer.
    pub value: Option<Expr>,
}

/// Class member form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberKind {
    /// Method, getter, setter or constructor.
    Method,
    /// Field definition.
    Property,
    /// `static { ... }`.
    StaticBlock,
    /// Index and method signatures.
    Other,
}

/// TypeScript accessibility modifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Accessibility {
    /// `public`.
    Public,
    /// `protected`.
    Protected,
    /// `private`.
    Private,
}

/// Expression statement.
#[derive(Debug, Clone)]
pub struct ExprStmt {
    /// Statement range, terminating semicolon included.
    pub span: Span,
    /// Wrapped expression.
    pub expr: Expr,
}

/// Declaration keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VarKind {
    /// `var`.
    Var,
    /// `let`.
    Let,
    /// `const`.
    Const,
}

impl VarKind {
    /// Keyword text.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Var => "var",
            Self::Let => "let",
            Self::Const => "const",
        }
    }
}

/// Variable declaration.
#[derive(Debug, Clone)]
pub struct VarDecl {
    /// Statement range.
    pub span: Span,
    /// Declaration keyword.
    pub kind: VarKind,
    /// Declarators in source order.
    pub declarators: Vec<Declarator>,
}

/// One `name = init` entry of a declaration.
#[derive(Debug, Clone)]
pub struct Declarator {
    /// Declarator range.
    pub span: Span,
    /// Binding pattern text.
    pub name: String,
    /// Initializer.
    pub init: Option<Expr>,
}

/// `if` statement.
#[derive(Debug, Clone)]
pub struct IfStmt {
    /// Statement range.
    pub span: Span,
    /// Condition.
    pub test: Expr,
    /// Then branch.
    pub consequent: Box<Stmt>,
    /// Else branch.
    pub alternate: Option<Box<Stmt>>,
}

/// Loop statement.
#[derive(Debug, Clone)]
pub struct Loop {
    /// Statement range.
    pub span: Span,
    /// Header expressions (init, test, update, iterated value).
    pub head: Vec<Expr>,
    /// Loop body.
    pub body: Box<Stmt>,
}

/// `switch` statement.
#[derive(Debug, Clone)]
pub struct Switch {
    /// Statement range.
    pub span: Span,
    /// Switched value.
    pub discriminant: Expr,
    /// `case` and `default` clauses.
    pub cases: Vec<SwitchCase>,
}

/// `case x:` or `default:` clause.
#[derive(Debug, Clone)]
pub struct SwitchCase {
    /// Clause range.
    pub span: Span,
    /// Case value; `None` for `default`.
    pub test: Option<Expr>,
    /// Consequent statements.
    pub body: Vec<Stmt>,
}

/// `try` statement.
#[derive(Debug, Clone)]
pub struct Try {
    /// Statement range.
    pub span: Span,
    /// Protected block.
    pub block: Block,
    /// `catch` body.
    pub handler: Option<Block>,
    /// `finally` body.
    pub finalizer: Option<Block>,
}

/// `return` statement.
#[derive(Debug, Clone)]
pub struct Return {
    /// Statement range.
    pub span: Span,
    /// Returned value.
    pub argument: Option<Expr>,
}

/// Statement with no dedicated variant.
#[derive(Debug, Clone, Default)]
pub struct OtherStmt {
    /// Statement range.
    pub span: Span,
    /// Tree-sitter node kind, for diagnostics.
    pub kind: &'static str,
    /// Nested statements (labelled bodies, `with` bodies).
    pub stmts: Vec<Stmt>,
    /// Nested blocks (namespace bodies).
    pub blocks: Vec<Block>,
    /// Nested expressions.
    pub exprs: Vec<Expr>,
}

/// Expression node.
#[derive(Debug, Clone)]
pub enum Expr {
    /// Identifier reference.
    Ident(Ident),
    /// `this`.
    This(Span),
    /// String literal.
    Str(Str),
    /// `a.b`, `a[b]`, `a?.b`.
    Member(Member),
    /// `f(...)`.
    Call(Call),
    /// `new F(...)`.
    New(Call),
    /// `a = b`, `a += b`, ...
    Assign(Assign),
    /// `a++`, `--a`.
    Update(Update),
    /// `delete a`, `void a`, `!a`, ...
    Unary(Unary),
    /// `await a`.
    Await(Wrapped),
    /// `(a)`.
    Paren(Wrapped),
    /// Top of an optional chain (`a?.b.c()`).
    Chain(Wrapped),
    /// `function () {}` and object-literal methods.
    Function(FunctionExpr),
    /// `() => ...`.
    Arrow(Arrow),
    /// `class {}` in expression position.
    Class(Class),
    /// Everything else.
    Other(OtherExpr),
}

impl Expr {
    /// Byte range of the expression.
    #[must_use]
    pub fn span(&self) -> Span {
        match self {
            Self::Ident(i) => i.span,
            Self::This(s) => *s,
            Self::Str(s) => s.span,
            Self::Member(m) => m.span,
            Self::Call(c) | Self::New(c) => c.span,
            Self::Assign(a) => a.span,
            Self::Update(u) => u.span,
            Self::Unary(u) => u.span,
            Self::Await(w) | Self::Paren(w) | Self::Chain(w) => w.span,
            Self::Function(f) => f.span,
            Self::Arrow(a) => a.span,
            Self::Class(c) => c.span,
            Self::Other(o) => o.span,
        }
    }

    /// Identifier name, if this is a bare identifier.
    #[must_use]
    pub fn as_ident(&self) -> Option<&str> {
        match self {
            Self::Ident(i) => Some(&i.name),
            _ => None,
        }
    }
}

/// Identifier.
#[derive(Debug, Clone)]
pub struct Ident {
    /// Identifier range.
    pub span: Span,
    /// Identifier text.
    pub name: String,
}

/// String literal.
#[derive(Debug, Clone)]
pub struct Str {
    /// Literal range, quotes included.
    pub span: Span,
    /// Raw text between the quotes, escapes untouched.
    pub raw: String,
}

/// Member access.
#[derive(Debug, Clone)]
pub struct Member {
    /// Whole access range.
    pub span: Span,
    /// Receiver.
    pub object: Box<Expr>,
    /// Accessed property.
    pub property: MemberProp,
    /// `?.` directly before the property.
    pub optional: bool,
}

/// Member property.
#[derive(Debug, Clone)]
pub enum MemberProp {
    /// `a.b`.
    Ident(Ident),
    /// `a.#b`.
    Private(Ident),
    /// `a[b]`.
    Computed(Box<Expr>),
}

/// Call or construction.
#[derive(Debug, Clone)]
pub struct Call {
    /// Whole call range.
    pub span: Span,
    /// Called expression.
    pub callee: Box<Expr>,
    /// Arguments in source order.
    pub arguments: Vec<Expr>,
}

/// Assignment operator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AssignOp {
    /// `=`.
    Plain,
    /// `+=`, `??=`, ... with its operator text.
    Compound(String),
}

/// Assignment.
#[derive(Debug, Clone)]
pub struct Assign {
    /// Whole assignment range.
    pub span: Span,
    /// Operator.
    pub op: AssignOp,
    /// Assigned target.
    pub target: Box<Expr>,
    /// Assigned value.
    pub value: Box<Expr>,
}

/// Increment or decrement operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOp {
    /// `++`.
    Increment,
    /// `--`.
    Decrement,
}

/// Update expression.
#[derive(Debug, Clone)]
pub struct Update {
    /// Whole expression range.
    pub span: Span,
    /// Operator.
    pub op: UpdateOp,
    /// Updated target.
    pub argument: Box<Expr>,
}

/// Unary operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    /// `delete`.
    Delete,
    /// `void`.
    Void,
    /// `typeof`.
    Typeof,
    /// `!`.
    Not,
    /// `-`.
    Minus,
    /// `+`.
    Plus,
    /// `~`.
    BitNot,
}

/// Unary expression.
#[derive(Debug, Clone)]
pub struct Unary {
    /// Whole expression range.
    pub span: Span,
    /// Operator.
    pub op: UnaryOp,
    /// Operand.
    pub argument: Box<Expr>,
}

/// Single-child wrapper (`await`, parentheses, optional chain).
#[derive(Debug, Clone)]
pub struct Wrapped {
    /// Wrapper range.
    pub span: Span,
    /// Wrapped expression.
    pub expr: Box<Expr>,
}

/// Function expression.
#[derive(Debug, Clone)]
pub struct FunctionExpr {
    /// Expression range.
    pub span: Span,
    /// Body.
    pub body: Block,
}

/// Arrow function.
#[derive(Debug, Clone)]
pub struct Arrow {
    /// Expression range.
    pub span: Span,
    /// Body.
    pub body: ArrowBody,
}

/// Arrow function body.
#[derive(Debug, Clone)]
pub enum ArrowBody {
    /// `=> { ... }`.
    Block(Block),
    /// `=> expr`.
    Expr(Box<Expr>),
}

/// Expression with no dedicated variant.
#[derive(Debug, Clone)]
pub struct OtherExpr {
    /// Expression range.
    pub span: Span,
    /// Tree-sitter node kind, for diagnostics.
    pub kind: &'static str,
    /// Decoded sub-expressions.
    pub children: Vec<Expr>,
}
