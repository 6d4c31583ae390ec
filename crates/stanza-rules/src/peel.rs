//! Transparent wrapper removal.
//!
//! Parentheses, `await`, the optional-chain wrapper and `void` do not change
//! what a statement "is" for grouping purposes: `await this.save()` is still a
//! call, `(a = b)` is still an assignment.

use stanza_ast::ast::{Expr, UnaryOp};

/// Returns the first expression below any transparent wrappers.
#[must_use]
pub fn peel(mut expr: &Expr) -> &Expr {
    loop {
        expr = match expr {
            Expr::Paren(w) | Expr::Await(w) | Expr::Chain(w) => &w.expr,
            Expr::Unary(unary) if unary.op == UnaryOp::Void => &unary.argument,
            _ => return expr,
        };
    }
}

/// Walks down `object` links of a member chain to its root.
///
/// Transparent wrappers are peeled at every step, so `(this.a)?.b.c` roots
/// at `this`.
#[must_use]
pub fn member_root(expr: &Expr) -> &Expr {
    let mut current = peel(expr);
    while let Expr::Member(member) = current {
        current = peel(&member.object);
    }
    current
}

/// Returns true if `expr` is a member chain rooted at `this`.
#[must_use]
pub fn is_this_rooted(expr: &Expr) -> bool {
    matches!(peel(expr), Expr::Member(_)) && matches!(member_root(expr), Expr::This(_))
}

#[cfg(test)]
mod tests {
    use super::*;
    use stanza_ast::{parse, SourceType, Stmt};

    fn first_expr(src: &str) -> Expr {
        let program = parse(src, SourceType::TypeScript).expect("fixture should parse");
        match program.body.into_iter().next() {
            Some(Stmt::Expr(stmt)) => stmt.expr,
            other => panic!("expected expression statement, got {other:?}"),
        }
    }

    #[test]
    fn peels_nested_wrappers() {
        let expr = first_expr("void ((await (go())));");
        assert!(matches!(peel(&expr), Expr::Call(_)));
    }

    #[test]
    fn keeps_non_transparent_unary() {
        let expr = first_expr("!go();");
        assert!(matches!(peel(&expr), Expr::Unary(u) if u.op == UnaryOp::Not));
    }

    #[test]
    fn peels_optional_chain() {
        let expr = first_expr("a?.b();");
        assert!(matches!(peel(&expr), Expr::Call(_)));
    }

    #[test]
    fn member_root_through_wrappers() {
        let expr = first_expr("(this.a)?.b.c;");
        assert!(matches!(member_root(&expr), Expr::This(_)));
        assert!(is_this_rooted(&expr));

        let expr = first_expr("other.a.b;");
        assert_eq!(member_root(&expr).as_ident(), Some("other"));
        assert!(!is_this_rooted(&expr));
    }

    #[test]
    fn bare_this_is_not_a_member_chain() {
        let expr = first_expr("this;");
        assert!(!is_this_rooted(&expr));
    }
}
