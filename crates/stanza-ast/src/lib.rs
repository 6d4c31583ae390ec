//! # stanza-ast
//!
//! Typed JavaScript/TypeScript statement tree for stanza rules.
//!
//! Parsing is delegated to Tree-sitter (`tree-sitter-typescript`). The
//! resulting concrete tree is decoded once into the closed variant set in
//! [`ast`], so rules pattern-match [`Stmt`] and [`Expr`] instead of probing
//! node kinds and optional fields.
//!
//! ```ignore
//! use stanza_ast::{parse, SourceType};
//!
//! let program = parse("const a = 1;", SourceType::TypeScript)?;
//! assert_eq!(program.body.len(), 1);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod ast;
mod decode;
pub mod visit;

use std::path::Path;

use tree_sitter::{Language, Node, Parser};

pub use ast::{Expr, Program, Span, Stmt};
pub use decode::MAX_NESTING;
pub use visit::Visit;

/// Grammar used to parse a file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceType {
    /// `.ts`, `.mts`, `.cts`.
    TypeScript,
    /// `.tsx` and plain JavaScript (`.js`, `.jsx`, `.mjs`, `.cjs`).
    Tsx,
}

impl SourceType {
    /// File extensions handled by the linter.
    pub const EXTENSIONS: &'static [&'static str] =
        &["js", "jsx", "mjs", "cjs", "ts", "tsx", "mts", "cts"];

    /// Picks the grammar for a path, `None` for unsupported extensions.
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        match path.extension().and_then(|e| e.to_str())? {
            "ts" | "mts" | "cts" => Some(Self::TypeScript),
            "tsx" | "js" | "jsx" | "mjs" | "cjs" => Some(Self::Tsx),
            _ => None,
        }
    }

    fn language(self) -> Language {
        match self {
            Self::TypeScript => tree_sitter_typescript::LANGUAGE_TYPESCRIPT.into(),
            Self::Tsx => tree_sitter_typescript::LANGUAGE_TSX.into(),
        }
    }
}

/// Errors produced while building a [`Program`].
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    /// The grammar could not be loaded into the parser.
    #[error("failed to load grammar: {0}")]
    Language(#[from] tree_sitter::LanguageError),

    /// Tree-sitter returned no tree.
    #[error("parser produced no syntax tree")]
    NoTree,

    /// The source contains a syntax error.
    #[error("syntax error at {line}:{column}")]
    Syntax {
        /// Line number (1-indexed).
        line: usize,
        /// Column number (1-indexed).
        column: usize,
    },

    /// The syntax tree nests deeper than the decoder accepts.
    #[error("syntax nested {depth} levels deep, limit is {limit}")]
    TooDeep {
        /// Deepest nesting found, parentheses excluded.
        depth: usize,
        /// Configured limit, see [`MAX_NESTING`].
        limit: usize,
    },
}

/// Parses `source` and decodes it into a typed [`Program`].
///
/// # Errors
///
/// Returns [`ParseError::Syntax`] for sources Tree-sitter could only recover
/// with error nodes; rules never run on partially understood input.
/// Returns [`ParseError::TooDeep`] when the tree nests deeper than
/// [`MAX_NESTING`].
pub fn parse(source: &str, source_type: SourceType) -> Result<Program, ParseError> {
    let mut parser = Parser::new();
    parser.set_language(&source_type.language())?;

    let tree = parser.parse(source, None).ok_or(ParseError::NoTree)?;
    let root = tree.root_node();

    if root.has_error() {
        let (line, column) = first_error(root);
        tracing::debug!("syntax error at {line}:{column}");
        return Err(ParseError::Syntax { line, column });
    }

    decode::Decoder::new(source).program(root)
}

/// Position of the first error or missing node, 1-indexed.
fn first_error(root: Node<'_>) -> (usize, usize) {
    let mut node = root;
    'outer: loop {
        if node.is_error() || node.is_missing() {
            break;
        }
        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            if child.is_error() || child.is_missing() || child.has_error() {
                node = child;
                continue 'outer;
            }
        }
        break;
    }
    let pos = node.start_position();
    (pos.row + 1, pos.column + 1)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::{
        AssignOp, Expr, MemberProp, SpecifierKind, Stmt, UnaryOp, UpdateOp, VarKind,
    };

    fn program(src: &str) -> Program {
        parse(src, SourceType::TypeScript).expect("fixture should parse")
    }

    fn expr_of(stmt: &Stmt) -> &Expr {
        match stmt {
            Stmt::Expr(e) => &e.expr,
            other => panic!("expected expression statement, got {other:?}"),
        }
    }

    #[test]
    fn source_type_from_extension() {
        assert_eq!(
            SourceType::from_path(Path::new("a/b.ts")),
            Some(SourceType::TypeScript)
        );
        assert_eq!(
            SourceType::from_path(Path::new("a/b.jsx")),
            Some(SourceType::Tsx)
        );
        assert_eq!(SourceType::from_path(Path::new("a/b.rs")), None);
    }

    #[test]
    fn syntax_error_is_reported() {
        let err = parse("const = ;", SourceType::TypeScript).unwrap_err();
        assert!(matches!(err, ParseError::Syntax { line: 1, .. }));
    }

    #[test]
    fn long_paren_runs_collapse() {
        let depth = 5000;
        let src = format!("{}go(){};", "(".repeat(depth), ")".repeat(depth));
        let p = program(&src);
        let Expr::Paren(paren) = expr_of(&p.body[0]) else {
            panic!("expected parenthesized expression");
        };
        assert_eq!(paren.span.len(), src.len() - 1);
        assert!(matches!(&*paren.expr, Expr::Call(_)));
    }

    #[test]
    fn deep_nesting_is_refused() {
        let depth = 1000;
        let src = format!("x = {}1{};", "[".repeat(depth), "]".repeat(depth));
        let err = parse(&src, SourceType::TypeScript).unwrap_err();
        assert!(
            matches!(err, ParseError::TooDeep { depth, limit } if depth > limit && limit == MAX_NESTING)
        );
    }

    #[test]
    fn moderate_nesting_decodes() {
        let src = format!("x = {}1{};", "[".repeat(50), "]".repeat(50));
        let p = program(&src);
        assert_eq!(p.body.len(), 1);
    }

    #[test]
    fn references_skip_reexports() {
        let p = program("import { alpha } from 'a';\nexport { alpha } from 'b';\nexport { beta };\n");
        assert!(!p.references.contains("alpha"));
        assert!(p.references.contains("beta"));
    }

    #[test]
    fn spans_cover_statements() {
        let src = "function alpha() {}\nconst beta = 1;";
        let p = program(src);
        assert_eq!(p.body.len(), 2);
        assert_eq!(p.body[0].span().text(src), Some("function alpha() {}"));
        assert_eq!(p.body[1].span().text(src), Some("const beta = 1;"));
    }

    #[test]
    fn directive_prologue_only_at_start() {
        let p = program("'use strict';\nfoo();\n'use strict';\n");
        assert!(matches!(&p.body[0], Stmt::Directive(d) if d.value == "use strict"));
        assert!(matches!(&p.body[1], Stmt::Expr(_)));
        assert!(matches!(expr_of(&p.body[2]), Expr::Str(s) if s.raw == "use strict"));
    }

    #[test]
    fn decodes_import_specifiers() {
        let p = program("import def, { alpha, beta as gamma } from 'x';");
        let Stmt::Import(import) = &p.body[0] else {
            panic!("expected import");
        };
        assert_eq!(import.source, "x");
        let locals: Vec<_> = import.specifiers.iter().map(|s| s.local.as_str()).collect();
        assert_eq!(locals, vec!["def", "alpha", "gamma"]);
        assert_eq!(import.specifiers[0].kind, SpecifierKind::Default);
        assert_eq!(import.named_count(), 2);
    }

    #[test]
    fn namespace_import() {
        let p = program("import * as ns from 'x';");
        let Stmt::Import(import) = &p.body[0] else {
            panic!("expected import");
        };
        assert_eq!(import.specifiers[0].kind, SpecifierKind::Namespace);
        assert_eq!(import.specifiers[0].local, "ns");
    }

    #[test]
    fn references_skip_imports() {
        let p = program("import { alpha, beta } from 'x';\nalpha();\nlet v: Gamma;");
        assert!(p.is_referenced("alpha"));
        assert!(!p.is_referenced("beta"));
        assert!(p.is_referenced("Gamma"));
    }

    #[test]
    fn collects_comments() {
        let src = "// one\nconst a = 1; /* two */\n";
        let p = program(src);
        assert_eq!(p.comments.len(), 2);
        assert_eq!(p.comments[0].text(src), Some("// one"));
    }

    #[test]
    fn decodes_declaration_kinds() {
        let p = program("var a = 1;\nlet b = 2;\nconst c = () => 1;");
        let kinds: Vec<_> = p
            .body
            .iter()
            .map(|s| match s {
                Stmt::Var(v) => v.kind,
                other => panic!("unexpected {other:?}"),
            })
            .collect();
        assert_eq!(kinds, vec![VarKind::Var, VarKind::Let, VarKind::Const]);
        let Stmt::Var(c) = &p.body[2] else {
            unreachable!()
        };
        assert!(matches!(c.declarators[0].init, Some(Expr::Arrow(_))));
    }

    #[test]
    fn decodes_assignments_and_updates() {
        let p = program("this.a = 1;\nb += 2;\nc++;\ndelete d.e;");
        assert!(matches!(expr_of(&p.body[0]), Expr::Assign(a) if a.op == AssignOp::Plain));
        assert!(
            matches!(expr_of(&p.body[1]), Expr::Assign(a) if a.op == AssignOp::Compound("+=".into()))
        );
        assert!(matches!(expr_of(&p.body[2]), Expr::Update(u) if u.op == UpdateOp::Increment));
        assert!(matches!(expr_of(&p.body[3]), Expr::Unary(u) if u.op == UnaryOp::Delete));
    }

    #[test]
    fn subscript_is_computed_member() {
        let src = "obj['alpha'];";
        let p = program(src);
        let Expr::Member(member) = expr_of(&p.body[0]) else {
            panic!("expected member");
        };
        assert_eq!(member.object.as_ident(), Some("obj"));
        assert!(matches!(&member.property, MemberProp::Computed(k) if matches!(k.as_ref(), Expr::Str(s) if s.raw == "alpha")));
    }

    #[test]
    fn optional_chain_is_wrapped_once() {
        let p = program("a?.b.c();");
        let Expr::Chain(chain) = expr_of(&p.body[0]) else {
            panic!("expected chain wrapper");
        };
        assert!(matches!(chain.expr.as_ref(), Expr::Call(_)));
    }

    #[test]
    fn switch_cases_hold_statements() {
        let p = program("switch (x) {\n  case 1:\n    a();\n    b();\n  default:\n    c();\n}");
        let Stmt::Switch(switch) = &p.body[0] else {
            panic!("expected switch");
        };
        assert_eq!(switch.cases.len(), 2);
        assert_eq!(switch.cases[0].body.len(), 2);
        assert!(switch.cases[1].test.is_none());
    }

    #[test]
    fn class_members_keep_modifiers() {
        let p = program("class A {\n  private static x = 1;\n  static {\n    init();\n  }\n}");
        let Stmt::Class(class) = &p.body[0] else {
            panic!("expected class");
        };
        assert_eq!(class.members.len(), 2);
        assert!(class.members[0].is_static);
        assert_eq!(
            class.members[0].accessibility,
            Some(crate::ast::Accessibility::Private)
        );
        assert_eq!(class.members[1].body.as_ref().map(|b| b.body.len()), Some(1));
    }
}
