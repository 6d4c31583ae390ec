//! Read-only traversal of the typed tree.
//!
//! Mirrors the `syn::visit` style: every `visit_*` method has a default that
//! recurses through the matching free `walk_*` function, so implementors
//! override only the nodes they care about and call `walk_*` to keep
//! descending.

use crate::ast::{
    ArrowBody, Block, Class, Expr, MemberProp, Program, Stmt, SwitchCase,
};

/// Visitor over a [`Program`].
pub trait Visit<'ast> {
    /// Visits the whole file.
    fn visit_program(&mut self, program: &'ast Program) {
        walk_program(self, program);
    }

    /// Visits a `{ ... }` statement list.
    fn visit_block(&mut self, block: &'ast Block) {
        walk_block(self, block);
    }

    /// Visits a `case` / `default` clause.
    fn visit_switch_case(&mut self, case: &'ast SwitchCase) {
        walk_switch_case(self, case);
    }

    /// Visits a statement.
    fn visit_stmt(&mut self, stmt: &'ast Stmt) {
        walk_stmt(self, stmt);
    }

    /// Visits a class declaration or expression.
    fn visit_class(&mut self, class: &'ast Class) {
        walk_class(self, class);
    }

    /// Visits an expression.
    fn visit_expr(&mut self, expr: &'ast Expr) {
        walk_expr(self, expr);
    }
}

/// Recurses into the top-level statements.
pub fn walk_program<'ast, V: Visit<'ast> + ?Sized>(v: &mut V, program: &'ast Program) {
    for stmt in &program.body {
        v.visit_stmt(stmt);
    }
}

/// Recurses into the block's statements.
pub fn walk_block<'ast, V: Visit<'ast> + ?Sized>(v: &mut V, block: &'ast Block) {
    for stmt in &block.body {
        v.visit_stmt(stmt);
    }
}

/// Recurses into the case value and consequent statements.
pub fn walk_switch_case<'ast, V: Visit<'ast> + ?Sized>(v: &mut V, case: &'ast SwitchCase) {
    if let Some(test) = &case.test {
        v.visit_expr(test);
    }
    for stmt in &case.body {
        v.visit_stmt(stmt);
    }
}

/// Recurses into member bodies and initializers.
pub fn walk_class<'ast, V: Visit<'ast> + ?Sized>(v: &mut V, class: &'ast Class) {
    for member in &class.members {
        if let Some(value) = &member.value {
            v.visit_expr(value);
        }
        if let Some(body) = &member.body {
            v.visit_block(body);
        }
    }
}

/// Recurses into every child of the statement.
pub fn walk_stmt<'ast, V: Visit<'ast> + ?Sized>(v: &mut V, stmt: &'ast Stmt) {
    match stmt {
        Stmt::Directive(_)
        | Stmt::Import(_)
        | Stmt::ExportAll(_)
        | Stmt::TypeAlias(_)
        | Stmt::Interface(_) => {}
        Stmt::Export(export) => {
            if let Some(decl) = &export.declaration {
                v.visit_stmt(decl);
            }
            if let Some(value) = &export.value {
                v.visit_expr(value);
            }
        }
        Stmt::Function(function) => {
            if let Some(body) = &function.body {
                v.visit_block(body);
            }
        }
        Stmt::Class(class) => v.visit_class(class),
        Stmt::Expr(expr_stmt) => v.visit_expr(&expr_stmt.expr),
        Stmt::Var(decl) => {
            for declarator in &decl.declarators {
                if let Some(init) = &declarator.init {
                    v.visit_expr(init);
                }
            }
        }
        Stmt::If(if_stmt) => {
            v.visit_expr(&if_stmt.test);
            v.visit_stmt(&if_stmt.consequent);
            if let Some(alternate) = &if_stmt.alternate {
                v.visit_stmt(alternate);
            }
        }
        Stmt::For(l) | Stmt::While(l) | Stmt::DoWhile(l) => {
            for expr in &l.head {
                v.visit_expr(expr);
            }
            v.visit_stmt(&l.body);
        }
        Stmt::Switch(switch) => {
            v.visit_expr(&switch.discriminant);
            for case in &switch.cases {
                v.visit_switch_case(case);
            }
        }
        Stmt::Try(try_stmt) => {
            v.visit_block(&try_stmt.block);
            if let Some(handler) = &try_stmt.handler {
                v.visit_block(handler);
            }
            if let Some(finalizer) = &try_stmt.finalizer {
                v.visit_block(finalizer);
            }
        }
        Stmt::Return(ret) => {
            if let Some(argument) = &ret.argument {
                v.visit_expr(argument);
            }
        }
        Stmt::Block(block) => v.visit_block(block),
        Stmt::Other(other) => {
            for stmt in &other.stmts {
                v.visit_stmt(stmt);
            }
            for block in &other.blocks {
                v.visit_block(block);
            }
            for expr in &other.exprs {
                v.visit_expr(expr);
            }
        }
    }
}

/// Recurses into every child of the expression.
pub fn walk_expr<'ast, V: Visit<'ast> + ?Sized>(v: &mut V, expr: &'ast Expr) {
    match expr {
        Expr::Ident(_) | Expr::This(_) | Expr::Str(_) => {}
        Expr::Member(member) => {
            v.visit_expr(&member.object);
            if let MemberProp::Computed(key) = &member.property {
                v.visit_expr(key);
            }
        }
        Expr::Call(call) | Expr::New(call) => {
            v.visit_expr(&call.callee);
            for arg in &call.arguments {
                v.visit_expr(arg);
            }
        }
        Expr::Assign(assign) => {
            v.visit_expr(&assign.target);
            v.visit_expr(&assign.value);
        }
        Expr::Update(update) => v.visit_expr(&update.argument),
        Expr::Unary(unary) => v.visit_expr(&unary.argument),
        Expr::Await(w) | Expr::Paren(w) | Expr::Chain(w) => v.visit_expr(&w.expr),
        Expr::Function(function) => v.visit_block(&function.body),
        Expr::Arrow(arrow) => match &arrow.body {
            ArrowBody::Block(block) => v.visit_block(block),
            ArrowBody::Expr(body) => v.visit_expr(body),
        },
        Expr::Class(class) => v.visit_class(class),
        Expr::Other(other) => {
            for child in &other.children {
                v.visit_expr(child);
            }
        }
    }
}
