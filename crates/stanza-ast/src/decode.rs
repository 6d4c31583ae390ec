//! Tree-sitter node → typed tree conversion.
//!
//! The decoder runs once per file. Rules never see tree-sitter nodes; they
//! pattern-match the closed variant set in [`crate::ast`].
//!
//! Decoding recurses with the tree, so [`Decoder::program`] first measures the
//! nesting depth with an iterative walk and refuses trees deeper than
//! [`MAX_NESTING`]. Runs of parentheses collapse into a single
//! [`Expr::Paren`] and do not count towards the limit.

use std::collections::BTreeSet;

use tree_sitter::Node;

use crate::ParseError;
use crate::ast::{
    Accessibility, Arrow, ArrowBody, Assign, AssignOp, Block, Call, Class, ClassMember,
    Declarator, Directive, ExportAll, ExportDecl, Expr, ExprStmt, Function, FunctionExpr, Ident,
    IfStmt, ImportDecl, ImportSpecifier, Loop, Member, MemberKind, MemberProp, Named, OtherExpr,
    OtherStmt, Program, Return, Span, SpecifierKind, Stmt, Str, Switch, SwitchCase, Try, Unary,
    UnaryOp, Update, UpdateOp, VarDecl, VarKind, Wrapped,
};

/// Deepest syntax nesting the decoder accepts, parentheses excluded.
pub const MAX_NESTING: usize = 160;

/// Facts gathered by the iterative pre-pass.
struct Scan {
    comments: Vec<Span>,
    references: BTreeSet<String>,
    depth: usize,
}

/// Converts a syntax-error-free tree into a [`Program`].
pub(crate) struct Decoder<'a> {
    src: &'a str,
}

fn span_of(node: Node<'_>) -> Span {
    Span::new(node.start_byte(), node.end_byte())
}

fn named_children(node: Node<'_>) -> Vec<Node<'_>> {
    let mut cursor = node.walk();
    let children = node
        .named_children(&mut cursor)
        .filter(|c| !c.is_extra())
        .collect();
    children
}

fn has_token(node: Node<'_>, kind: &str) -> bool {
    let mut cursor = node.walk();
    let found = node.children(&mut cursor).any(|c| c.kind() == kind);
    found
}

fn is_statement_kind(kind: &str) -> bool {
    kind.ends_with("_statement") || kind.ends_with("_declaration")
}

impl<'a> Decoder<'a> {
    pub(crate) fn new(src: &'a str) -> Self {
        Self { src }
    }

    fn text(&self, node: Node<'_>) -> &'a str {
        self.src
            .get(node.start_byte()..node.end_byte())
            .unwrap_or("")
    }

    fn unquote(&self, node: Node<'_>) -> String {
        let raw = self.text(node);
        if raw.len() >= 2 {
            raw.get(1..raw.len() - 1).unwrap_or("").to_string()
        } else {
            String::new()
        }
    }

    fn field_text(&self, node: Node<'_>, field: &str) -> Option<String> {
        node.child_by_field_name(field)
            .map(|n| self.text(n).to_string())
    }

    pub(crate) fn program(&self, root: Node<'_>) -> Result<Program, ParseError> {
        let scan = self.scan(root);
        if scan.depth > MAX_NESTING {
            tracing::debug!(depth = scan.depth, "syntax tree too deep to decode");
            return Err(ParseError::TooDeep {
                depth: scan.depth,
                limit: MAX_NESTING,
            });
        }
        Ok(Program {
            span: span_of(root),
            body: self.statements(root, true),
            comments: scan.comments,
            references: scan.references,
        })
    }

    /// Collects comment ranges, referenced names and the nesting depth in one
    /// iterative walk.
    ///
    /// Import declarations and re-exports (`export { a } from 'b'`) only name
    /// bindings of other modules, so their identifiers are not references.
    fn scan(&self, root: Node<'_>) -> Scan {
        let mut comments = Vec::new();
        let mut references = BTreeSet::new();
        let mut cursor = root.walk();
        // Whether each ancestor on the cursor path counts towards the depth.
        let mut ancestors: Vec<bool> = Vec::new();
        let mut depth = 0;
        let mut max_depth = 0;

        'walk: loop {
            let node = cursor.node();
            let descend = match node.kind() {
                "import_statement" => false,
                "export_statement" if node.child_by_field_name("source").is_some() => false,
                "comment" | "html_comment" => {
                    comments.push(span_of(node));
                    false
                }
                "identifier" | "type_identifier" | "shorthand_property_identifier" => {
                    references.insert(self.text(node).to_string());
                    false
                }
                _ => true,
            };

            if descend && cursor.goto_first_child() {
                let counts = node.kind() != "parenthesized_expression";
                if counts {
                    depth += 1;
                    max_depth = max_depth.max(depth);
                }
                ancestors.push(counts);
                continue;
            }
            loop {
                if cursor.goto_next_sibling() {
                    break;
                }
                if !cursor.goto_parent() {
                    break 'walk;
                }
                if ancestors.pop() == Some(true) {
                    depth -= 1;
                }
            }
        }

        Scan {
            comments,
            references,
            depth: max_depth,
        }
    }

    fn statements(&self, parent: Node<'_>, prologue: bool) -> Vec<Stmt> {
        let mut in_prologue = prologue;
        let mut out = Vec::new();

        for child in named_children(parent) {
            if child.kind() == "hash_bang_line" {
                continue;
            }
            if in_prologue {
                if let Some(directive) = self.directive(child) {
                    out.push(Stmt::Directive(directive));
                    continue;
                }
                in_prologue = false;
            }
            out.push(self.stmt(child));
        }

        out
    }

    fn directive(&self, node: Node<'_>) -> Option<Directive> {
        if node.kind() != "expression_statement" {
            return None;
        }
        match named_children(node).as_slice() {
            [only] if only.kind() == "string" => Some(Directive {
                span: span_of(node),
                value: self.unquote(*only),
            }),
            _ => None,
        }
    }

    fn block(&self, node: Node<'_>, prologue: bool) -> Block {
        Block {
            span: span_of(node),
            body: self.statements(node, prologue),
        }
    }

    fn stmt(&self, node: Node<'_>) -> Stmt {
        let span = span_of(node);
        match node.kind() {
            "import_statement" => Stmt::Import(self.import(node)),
            "export_statement" => self.export(node),
            "type_alias_declaration" => Stmt::TypeAlias(Named {
                span,
                name: self.field_text(node, "name").unwrap_or_default(),
            }),
            "interface_declaration" => Stmt::Interface(Named {
                span,
                name: self.field_text(node, "name").unwrap_or_default(),
            }),
            "function_declaration" | "generator_function_declaration" | "function_signature" => {
                Stmt::Function(Function {
                    span,
                    name: self.field_text(node, "name"),
                    body: node
                        .child_by_field_name("body")
                        .map(|b| self.block(b, true)),
                })
            }
            "class_declaration" | "abstract_class_declaration" => Stmt::Class(self.class(node)),
            "expression_statement" => match named_children(node).first() {
                Some(inner) => Stmt::Expr(ExprStmt {
                    span,
                    expr: self.expr(*inner),
                }),
                None => self.other_stmt(node),
            },
            "lexical_declaration" | "variable_declaration" => Stmt::Var(self.var(node)),
            "if_statement" => self.if_stmt(node),
            "for_statement" | "for_in_statement" => Stmt::For(self.loop_stmt(node)),
            "while_statement" => Stmt::While(self.loop_stmt(node)),
            "do_statement" => Stmt::DoWhile(self.loop_stmt(node)),
            "switch_statement" => self.switch(node),
            "try_statement" => self.try_stmt(node),
            "return_statement" => Stmt::Return(Return {
                span,
                argument: named_children(node).first().map(|n| self.expr(*n)),
            }),
            "statement_block" => Stmt::Block(self.block(node, false)),
            _ => self.other_stmt(node),
        }
    }

    fn other_stmt(&self, node: Node<'_>) -> Stmt {
        let mut other = OtherStmt {
            span: span_of(node),
            kind: node.kind(),
            ..OtherStmt::default()
        };
        for child in named_children(node) {
            let kind = child.kind();
            if kind == "statement_block" {
                other.blocks.push(self.block(child, false));
            } else if is_statement_kind(kind) {
                other.stmts.push(self.stmt(child));
            } else {
                other.exprs.push(self.expr(child));
            }
        }
        Stmt::Other(other)
    }

    fn import(&self, node: Node<'_>) -> ImportDecl {
        let mut specifiers = Vec::new();

        for clause in named_children(node) {
            if clause.kind() != "import_clause" {
                continue;
            }
            for part in named_children(clause) {
                match part.kind() {
                    "identifier" => specifiers.push(ImportSpecifier {
                        span: span_of(part),
                        local: self.text(part).to_string(),
                        kind: SpecifierKind::Default,
                    }),
                    "namespace_import" => {
                        let local = named_children(part)
                            .into_iter()
                            .find(|n| n.kind() == "identifier")
                            .map(|n| self.text(n).to_string())
                            .unwrap_or_default();
                        specifiers.push(ImportSpecifier {
                            span: span_of(part),
                            local,
                            kind: SpecifierKind::Namespace,
                        });
                    }
                    "named_imports" => {
                        for spec in named_children(part) {
                            if spec.kind() != "import_specifier" {
                                continue;
                            }
                            let local = self
                                .field_text(spec, "alias")
                                .or_else(|| self.field_text(spec, "name"))
                                .unwrap_or_default();
                            specifiers.push(ImportSpecifier {
                                span: span_of(spec),
                                local,
                                kind: SpecifierKind::Named,
                            });
                        }
                    }
                    _ => {}
                }
            }
        }

        ImportDecl {
            span: span_of(node),
            source: node
                .child_by_field_name("source")
                .map(|s| self.unquote(s))
                .unwrap_or_default(),
            type_only: has_token(node, "type"),
            specifiers,
        }
    }

    fn export(&self, node: Node<'_>) -> Stmt {
        let span = span_of(node);
        let declaration = node.child_by_field_name("declaration");
        let wildcard = has_token(node, "*") || has_token(node, "namespace_export");

        if declaration.is_none() && wildcard {
            return Stmt::ExportAll(ExportAll {
                span,
                source: node
                    .child_by_field_name("source")
                    .map(|s| self.unquote(s))
                    .unwrap_or_default(),
            });
        }

        Stmt::Export(ExportDecl {
            span,
            is_default: has_token(node, "default"),
            declaration: declaration.map(|d| Box::new(self.stmt(d))),
            value: node.child_by_field_name("value").map(|v| self.expr(v)),
        })
    }

    fn class(&self, node: Node<'_>) -> Class {
        let mut members = Vec::new();
        // TypeScript puts method decorators before the member, as siblings.
        let mut pending = Vec::new();

        if let Some(body) = node.child_by_field_name("body") {
            for child in named_children(body) {
                if child.kind() == "decorator" {
                    pending.push(span_of(child));
                    continue;
                }
                let mut member = self.class_member(child);
                if let Some(first) = pending.first() {
                    member.span.start = first.start;
                }
                member.decorators.splice(0..0, pending.drain(..));
                members.push(member);
            }
        }

        Class {
            span: span_of(node),
            name: self.field_text(node, "name"),
            is_abstract: node.kind() == "abstract_class_declaration",
            members,
        }
    }

    fn class_member(&self, node: Node<'_>) -> ClassMember {
        let kind = match node.kind() {
            "method_definition" => MemberKind::Method,
            "public_field_definition" | "field_definition" => MemberKind::Property,
            "class_static_block" => MemberKind::StaticBlock,
            _ => MemberKind::Other,
        };

        let mut member = ClassMember {
            span: span_of(node),
            kind,
            accessibility: None,
            is_static: kind == MemberKind::StaticBlock,
            is_abstract: node.kind() == "abstract_method_signature",
            decorators: Vec::new(),
            body: node
                .child_by_field_name("body")
                .or_else(|| {
                    named_children(node)
                        .into_iter()
                        .find(|c| c.kind() == "statement_block")
                })
                .filter(|b| b.kind() == "statement_block")
                .map(|b| self.block(b, kind == MemberKind::Method)),
            value: node.child_by_field_name("value").map(|v| self.expr(v)),
        };

        let mut cursor = node.walk();
        for child in node.children(&mut cursor) {
            match child.kind() {
                "static" => member.is_static = true,
                "abstract" => member.is_abstract = true,
                "decorator" => member.decorators.push(span_of(child)),
                "accessibility_modifier" => {
                    member.accessibility = match self.text(child) {
                        "public" => Some(Accessibility::Public),
                        "protected" => Some(Accessibility::Protected),
                        "private" => Some(Accessibility::Private),
                        _ => None,
                    };
                }
                _ => {}
            }
        }

        member
    }

    fn var(&self, node: Node<'_>) -> VarDecl {
        let kind = if node.kind() == "variable_declaration" {
            VarKind::Var
        } else {
            match node.child_by_field_name("kind").map(|k| self.text(k)) {
                Some("let") => VarKind::Let,
                _ => VarKind::Const,
            }
        };

        let declarators = named_children(node)
            .into_iter()
            .filter(|d| d.kind() == "variable_declarator")
            .map(|d| Declarator {
                span: span_of(d),
                name: self.field_text(d, "name").unwrap_or_default(),
                init: d.child_by_field_name("value").map(|v| self.expr(v)),
            })
            .collect();

        VarDecl {
            span: span_of(node),
            kind,
            declarators,
        }
    }

    fn if_stmt(&self, node: Node<'_>) -> Stmt {
        let test = node
            .child_by_field_name("condition")
            .map_or_else(|| self.empty_expr(node), |c| self.expr(c));
        let consequent = node
            .child_by_field_name("consequence")
            .map_or_else(|| self.empty_stmt(node), |c| self.stmt(c));
        let alternate = node
            .child_by_field_name("alternative")
            .and_then(|else_clause| named_children(else_clause).first().copied())
            .map(|s| Box::new(self.stmt(s)));

        Stmt::If(IfStmt {
            span: span_of(node),
            test,
            consequent: Box::new(consequent),
            alternate,
        })
    }

    fn loop_stmt(&self, node: Node<'_>) -> Loop {
        let body_node = node.child_by_field_name("body");
        let mut head = Vec::new();

        for child in named_children(node) {
            if Some(child) == body_node {
                continue;
            }
            match child.kind() {
                "empty_statement" => {}
                "expression_statement" => {
                    head.extend(named_children(child).into_iter().map(|n| self.expr(n)));
                }
                "lexical_declaration" | "variable_declaration" => {
                    head.extend(
                        self.var(child)
                            .declarators
                            .into_iter()
                            .filter_map(|d| d.init),
                    );
                }
                _ => head.push(self.expr(child)),
            }
        }

        Loop {
            span: span_of(node),
            head,
            body: Box::new(
                body_node.map_or_else(|| self.empty_stmt(node), |b| self.stmt(b)),
            ),
        }
    }

    fn switch(&self, node: Node<'_>) -> Stmt {
        let discriminant = node
            .child_by_field_name("value")
            .map_or_else(|| self.empty_expr(node), |v| self.expr(v));

        let cases = node
            .child_by_field_name("body")
            .map(|body| {
                named_children(body)
                    .into_iter()
                    .filter(|c| matches!(c.kind(), "switch_case" | "switch_default"))
                    .map(|c| self.switch_case(c))
                    .collect()
            })
            .unwrap_or_default();

        Stmt::Switch(Switch {
            span: span_of(node),
            discriminant,
            cases,
        })
    }

    fn switch_case(&self, node: Node<'_>) -> SwitchCase {
        let value = node.child_by_field_name("value");
        let body = named_children(node)
            .into_iter()
            .filter(|c| Some(*c) != value)
            .map(|c| self.stmt(c))
            .collect();

        SwitchCase {
            span: span_of(node),
            test: value.map(|v| self.expr(v)),
            body,
        }
    }

    fn try_stmt(&self, node: Node<'_>) -> Stmt {
        let clause_body = |field: &str| {
            node.child_by_field_name(field)
                .and_then(|clause| clause.child_by_field_name("body"))
                .map(|b| self.block(b, false))
        };

        Stmt::Try(Try {
            span: span_of(node),
            block: node
                .child_by_field_name("body")
                .map(|b| self.block(b, false))
                .unwrap_or_default(),
            handler: clause_body("handler"),
            finalizer: clause_body("finalizer"),
        })
    }

    fn empty_expr(&self, node: Node<'_>) -> Expr {
        Expr::Other(OtherExpr {
            span: Span::new(node.start_byte(), node.start_byte()),
            kind: "missing",
            children: Vec::new(),
        })
    }

    fn empty_stmt(&self, node: Node<'_>) -> Stmt {
        Stmt::Other(OtherStmt {
            span: Span::new(node.end_byte(), node.end_byte()),
            kind: "missing",
            ..OtherStmt::default()
        })
    }

    fn boxed(&self, node: Option<Node<'_>>, parent: Node<'_>) -> Box<Expr> {
        Box::new(node.map_or_else(|| self.empty_expr(parent), |n| self.expr(n)))
    }

    fn first_expr(&self, node: Node<'_>) -> Box<Expr> {
        self.boxed(named_children(node).first().copied(), node)
    }

    fn expr(&self, node: Node<'_>) -> Expr {
        let span = span_of(node);
        let decoded = match node.kind() {
            "identifier" | "property_identifier" | "shorthand_property_identifier" => {
                Expr::Ident(Ident {
                    span,
                    name: self.text(node).to_string(),
                })
            }
            "this" => Expr::This(span),
            "string" => Expr::Str(Str {
                span,
                raw: self.unquote(node),
            }),
            "parenthesized_expression" => {
                let mut inner = node;
                while inner.kind() == "parenthesized_expression" {
                    match named_children(inner).first() {
                        Some(child) => inner = *child,
                        None => break,
                    }
                }
                let expr = if inner.kind() == "parenthesized_expression" {
                    self.empty_expr(inner)
                } else {
                    self.expr(inner)
                };
                Expr::Paren(Wrapped {
                    span,
                    expr: Box::new(expr),
                })
            }
            "await_expression" => Expr::Await(Wrapped {
                span,
                expr: self.first_expr(node),
            }),
            "member_expression" => {
                let property = node.child_by_field_name("property").map_or(
                    MemberProp::Ident(Ident {
                        span: Span::new(span.end, span.end),
                        name: String::new(),
                    }),
                    |p| {
                        let ident = Ident {
                            span: span_of(p),
                            name: self.text(p).to_string(),
                        };
                        if p.kind() == "private_property_identifier" {
                            MemberProp::Private(ident)
                        } else {
                            MemberProp::Ident(ident)
                        }
                    },
                );
                Expr::Member(Member {
                    span,
                    object: self.boxed(node.child_by_field_name("object"), node),
                    property,
                    optional: has_token(node, "optional_chain"),
                })
            }
            "subscript_expression" => Expr::Member(Member {
                span,
                object: self.boxed(node.child_by_field_name("object"), node),
                property: MemberProp::Computed(
                    self.boxed(node.child_by_field_name("index"), node),
                ),
                optional: has_token(node, "optional_chain"),
            }),
            "call_expression" => Expr::Call(Call {
                span,
                callee: self.boxed(node.child_by_field_name("function"), node),
                arguments: self.arguments(node),
            }),
            "new_expression" => Expr::New(Call {
                span,
                callee: self.boxed(node.child_by_field_name("constructor"), node),
                arguments: self.arguments(node),
            }),
            "assignment_expression" => Expr::Assign(Assign {
                span,
                op: AssignOp::Plain,
                target: self.boxed(node.child_by_field_name("left"), node),
                value: self.boxed(node.child_by_field_name("right"), node),
            }),
            "augmented_assignment_expression" => Expr::Assign(Assign {
                span,
                op: AssignOp::Compound(self.field_text(node, "operator").unwrap_or_default()),
                target: self.boxed(node.child_by_field_name("left"), node),
                value: self.boxed(node.child_by_field_name("right"), node),
            }),
            "update_expression" => Expr::Update(Update {
                span,
                op: match node.child_by_field_name("operator").map(|o| self.text(o)) {
                    Some("--") => UpdateOp::Decrement,
                    _ => UpdateOp::Increment,
                },
                argument: self.boxed(node.child_by_field_name("argument"), node),
            }),
            "unary_expression" => {
                let op = match node.child_by_field_name("operator").map(|o| self.text(o)) {
                    Some("delete") => Some(UnaryOp::Delete),
                    Some("void") => Some(UnaryOp::Void),
                    Some("typeof") => Some(UnaryOp::Typeof),
                    Some("!") => Some(UnaryOp::Not),
                    Some("-") => Some(UnaryOp::Minus),
                    Some("+") => Some(UnaryOp::Plus),
                    Some("~") => Some(UnaryOp::BitNot),
                    _ => None,
                };
                match op {
                    Some(op) => Expr::Unary(Unary {
                        span,
                        op,
                        argument: self.boxed(node.child_by_field_name("argument"), node),
                    }),
                    None => self.other_expr(node),
                }
            }
            "function_expression" | "function" | "generator_function" | "method_definition" => {
                match node.child_by_field_name("body") {
                    Some(body) => Expr::Function(FunctionExpr {
                        span,
                        body: self.block(body, true),
                    }),
                    None => self.other_expr(node),
                }
            }
            "arrow_function" => match node.child_by_field_name("body") {
                Some(body) if body.kind() == "statement_block" => Expr::Arrow(Arrow {
                    span,
                    body: ArrowBody::Block(self.block(body, true)),
                }),
                Some(body) => Expr::Arrow(Arrow {
                    span,
                    body: ArrowBody::Expr(Box::new(self.expr(body))),
                }),
                None => self.other_expr(node),
            },
            "class" => Expr::Class(self.class(node)),
            _ => self.other_expr(node),
        };

        if matches!(
            node.kind(),
            "member_expression" | "subscript_expression" | "call_expression"
        ) && is_chain_top(node)
            && chain_has_optional(node)
        {
            return Expr::Chain(Wrapped {
                span,
                expr: Box::new(decoded),
            });
        }

        decoded
    }

    fn arguments(&self, node: Node<'_>) -> Vec<Expr> {
        node.child_by_field_name("arguments")
            .map(|args| {
                if args.kind() == "arguments" {
                    named_children(args)
                        .into_iter()
                        .map(|a| self.expr(a))
                        .collect()
                } else {
                    vec![self.expr(args)]
                }
            })
            .unwrap_or_default()
    }

    fn other_expr(&self, node: Node<'_>) -> Expr {
        let mut children = Vec::new();
        for child in named_children(node) {
            if child.kind() == "statement_block" {
                // Namespace and module bodies surface as function-like blocks.
                children.push(Expr::Function(FunctionExpr {
                    span: span_of(child),
                    body: self.block(child, false),
                }));
            } else {
                children.push(self.expr(child));
            }
        }
        Expr::Other(OtherExpr {
            span: span_of(node),
            kind: node.kind(),
            children,
        })
    }
}

/// A member/call node is the top of its chain unless its parent continues it.
fn is_chain_top(node: Node<'_>) -> bool {
    let Some(parent) = node.parent() else {
        return true;
    };
    let continued_by = match parent.kind() {
        "member_expression" | "subscript_expression" => parent.child_by_field_name("object"),
        "call_expression" => parent.child_by_field_name("function"),
        _ => None,
    };
    continued_by != Some(node)
}

fn chain_has_optional(node: Node<'_>) -> bool {
    let mut current = node;
    loop {
        if has_token(current, "optional_chain") {
            return true;
        }
        let next = match current.kind() {
            "member_expression" | "subscript_expression" => current.child_by_field_name("object"),
            "call_expression" => current.child_by_field_name("function"),
            _ => None,
        };
        match next {
            Some(n) => current = n,
            None => return false,
        }
    }
}
