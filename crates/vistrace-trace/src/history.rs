//! Substitution-history machinery: deterministic expression rendering and
//! the last-fill combination rule for parallel stage lists.

use vistrace_ast::ast::{Expr, Lit};

use crate::env::Env;
use crate::error::TraceError;
use crate::value::render_float;

/// Ordered text stages from literal source to evaluated result.
pub type History = Vec<String>;

/// Combine parallel stage lists index by index, repeating the shorter
/// list's last element to match the longest.
///
/// `[["1","2","3"],["4"]]` becomes `[["1","4"],["2","4"],["3","4"]]`.
pub(crate) fn transpose_last_fill(lists: &[Vec<String>]) -> Vec<Vec<String>> {
    let rows = lists.iter().map(Vec::len).max().unwrap_or(0);
    (0..rows)
        .map(|i| {
            lists
                .iter()
                .filter_map(|stages| {
                    stages
                        .get(i)
                        .or_else(|| stages.last())
                        .map(String::clone)
                })
                .collect()
        })
        .collect()
}

/// Operator precedence for rendering; higher binds tighter.
pub(crate) fn precedence(expr: &Expr) -> u8 {
    use vistrace_ast::ast::{BinOp, BoolOp};
    match expr {
        Expr::Bool { op: BoolOp::Or, .. } => 1,
        Expr::Bool {
            op: BoolOp::And, ..
        } => 2,
        Expr::Compare { .. } => 3,
        Expr::Binary { op, .. } => match op {
            BinOp::Add | BinOp::Sub => 4,
            BinOp::Mul | BinOp::Div | BinOp::FloorDiv => 5,
        },
        Expr::Lit(..) | Expr::Var(_) | Expr::List { .. } | Expr::Call { .. } => 6,
    }
}

/// Whether `child` must be parenthesized under a parent of `parent_prec`.
/// Right operands of equal precedence keep their parens (`a - (b - c)`).
pub(crate) fn needs_parens(child: &Expr, parent_prec: u8, is_right: bool) -> bool {
    let child_prec = precedence(child);
    if is_right {
        child_prec <= parent_prec
    } else {
        child_prec < parent_prec
    }
}

pub(crate) fn wrap(text: String, parens: bool) -> String {
    if parens {
        format!("({text})")
    } else {
        text
    }
}

/// Does the expression reference at least one variable?
pub(crate) fn contains_var(expr: &Expr) -> bool {
    match expr {
        Expr::Var(_) => true,
        Expr::Lit(..) => false,
        Expr::Binary { lhs, rhs, .. }
        | Expr::Compare { lhs, rhs, .. }
        | Expr::Bool { lhs, rhs, .. } => contains_var(lhs) || contains_var(rhs),
        Expr::List { elts, .. } => elts.iter().any(contains_var),
        Expr::Call { args, .. } => args.iter().any(contains_var),
    }
}

/// Render the expression's original source text from the tree.
pub(crate) fn render_source(expr: &Expr) -> String {
    // env = None can never fail
    render(expr, None).unwrap_or_default()
}

/// Render the expression with every variable replaced by its current
/// bound value. Substitution is driven by the tree, not by text
/// pattern-matching, so partial-token matches cannot happen.
pub(crate) fn render_substituted(expr: &Expr, env: &Env) -> Result<String, TraceError> {
    render(expr, Some(env))
}

fn render(expr: &Expr, env: Option<&Env>) -> Result<String, TraceError> {
    match expr {
        Expr::Lit(lit, _) => Ok(render_lit(lit)),
        Expr::Var(id) => match env {
            Some(env) => Ok(env.get(&id.text)?.to_string()),
            None => Ok(id.text.clone()),
        },
        Expr::Binary { lhs, op, rhs, .. } => render_infix(lhs, op.symbol(), rhs, expr, env),
        Expr::Compare { lhs, op, rhs, .. } => render_infix(lhs, op.symbol(), rhs, expr, env),
        Expr::Bool { lhs, op, rhs, .. } => render_infix(lhs, op.symbol(), rhs, expr, env),
        Expr::List { elts, .. } => {
            let parts = elts
                .iter()
                .map(|e| render(e, env))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(format!("[{}]", parts.join(", ")))
        }
        Expr::Call { callee, args, .. } => {
            let parts = args
                .iter()
                .map(|e| render(e, env))
                .collect::<Result<Vec<_>, _>>()?;
            Ok(format!("{}({})", callee.text, parts.join(", ")))
        }
    }
}

fn render_infix(
    lhs: &Expr,
    sym: &str,
    rhs: &Expr,
    parent: &Expr,
    env: Option<&Env>,
) -> Result<String, TraceError> {
    let prec = precedence(parent);
    let l = wrap(render(lhs, env)?, needs_parens(lhs, prec, false));
    let r = wrap(render(rhs, env)?, needs_parens(rhs, prec, true));
    Ok(format!("{l} {sym} {r}"))
}

pub(crate) fn render_lit(lit: &Lit) -> String {
    match lit {
        Lit::Int(v) => format!("{v}"),
        Lit::Float(v) => render_float(*v),
        Lit::Str(s) => format!("'{s}'"),
        Lit::Bool(true) => "True".to_string(),
        Lit::Bool(false) => "False".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vistrace_ast::ast::{BinOp, Ident};
    use vistrace_ast::span::Span;

    fn sp() -> Span {
        Span { start: 0, end: 0 }
    }

    fn int(v: i64) -> Expr {
        Expr::Lit(Lit::Int(v), sp())
    }

    fn var(name: &str) -> Expr {
        Expr::Var(Ident {
            text: name.into(),
            span: sp(),
        })
    }

    fn bin(lhs: Expr, op: BinOp, rhs: Expr) -> Expr {
        Expr::Binary {
            lhs: Box::new(lhs),
            op,
            rhs: Box::new(rhs),
            span: sp(),
        }
    }

    #[test]
    fn last_fill_repeats_the_short_list() {
        let combined = transpose_last_fill(&[
            vec!["1".into(), "2".into(), "3".into()],
            vec!["4".into()],
        ]);
        assert_eq!(
            combined,
            vec![
                vec!["1".to_string(), "4".to_string()],
                vec!["2".to_string(), "4".to_string()],
                vec!["3".to_string(), "4".to_string()],
            ]
        );
    }

    #[test]
    fn renders_with_minimal_parens() {
        // (a + 1) * 2 keeps its parens; a + 1 * 2 gains none
        let grouped = bin(bin(var("a"), BinOp::Add, int(1)), BinOp::Mul, int(2));
        assert_eq!(render_source(&grouped), "(a + 1) * 2");

        let flat = bin(var("a"), BinOp::Add, bin(int(1), BinOp::Mul, int(2)));
        assert_eq!(render_source(&flat), "a + 1 * 2");
    }

    #[test]
    fn right_operand_of_equal_precedence_is_grouped() {
        let e = bin(int(1), BinOp::Sub, bin(int(2), BinOp::Sub, int(3)));
        assert_eq!(render_source(&e), "1 - (2 - 3)");
    }

    #[test]
    fn substitution_uses_bound_values() {
        let mut env = Env::new();
        env.set("a", crate::value::Value::Int(7));
        let e = bin(var("a"), BinOp::Add, int(1));
        assert_eq!(render_substituted(&e, &env).unwrap(), "7 + 1");
    }
}
